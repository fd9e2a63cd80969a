#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Account and score service backing Garden Defence.
//!
//! Players register or log in with a username and password and submit the
//! score of each won game. Data lives in SQLite.

mod config;
mod error;
mod routes;
mod store;

pub use config::Options;
pub use error::AccountsError;
pub use routes::{router, SCORE_PAGE_SIZE};
pub use store::{NewScore, ScoreRecord, Store, UserRecord, DEMO_PASSWORD, DEMO_USERNAME};

/// Opens the store described by `options`, creates the schema and seeds the demo account.
pub async fn prepare_store(options: &Options) -> Result<Store, sqlx::Error> {
    let store = Store::connect(&options.database_url, options.max_connections).await?;
    store.migrate().await?;
    if !options.no_seed {
        store.seed_demo_user().await?;
    }
    Ok(store)
}
