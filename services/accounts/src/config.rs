//! Command-line and environment configuration for the account service.

use std::net::SocketAddr;

use clap::Parser;

/// Serve the Garden Defence account and score API.
#[derive(Clone, Debug, Parser)]
#[command(name = "garden-defence-accounts", version)]
pub struct Options {
    /// SQLite database URL; the file is created when missing.
    #[arg(
        long,
        env = "GARDEN_DEFENCE_DATABASE_URL",
        default_value = "sqlite://garden-defence.db"
    )]
    pub database_url: String,

    /// Socket address the HTTP server binds to.
    #[arg(long, env = "GARDEN_DEFENCE_LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,

    /// Upper bound on pooled database connections.
    #[arg(long, env = "GARDEN_DEFENCE_DB_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Skip creating the `demo` account on startup.
    #[arg(long)]
    pub no_seed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_locally() {
        let options = Options::parse_from(["garden-defence-accounts"]);

        assert_eq!(options.listen.port(), 3000);
        assert!(options.listen.ip().is_loopback());
        assert!(!options.no_seed);
    }

    #[test]
    fn flags_override_defaults() {
        let options = Options::parse_from([
            "garden-defence-accounts",
            "--database-url",
            "sqlite::memory:",
            "--listen",
            "0.0.0.0:8080",
            "--no-seed",
        ]);

        assert_eq!(options.database_url, "sqlite::memory:");
        assert_eq!(options.listen.port(), 8080);
        assert!(options.no_seed);
    }
}
