//! SQLite-backed persistence for users and game scores.

use std::str::FromStr;

use serde::Serialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Row, SqlitePool,
};

/// Username of the account seeded for local play.
pub const DEMO_USERNAME: &str = "demo";
/// Password of the seeded demo account.
pub const DEMO_PASSWORD: &str = "demo123";
const DEMO_EMAIL: &str = "demo@example.com";

const SCHEMA: [&str; 2] = [
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        email TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS game_scores (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        level INTEGER NOT NULL,
        score INTEGER NOT NULL,
        waves INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
];

/// Stored account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    /// Row identifier.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Password as submitted at registration.
    pub password: String,
    /// Optional contact address.
    pub email: Option<String>,
}

/// Score submission prior to storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NewScore {
    /// Owner of the score.
    pub user_id: i64,
    /// Level the game was played on.
    pub level: i64,
    /// Final score.
    pub score: i64,
    /// Waves cleared.
    pub waves: i64,
}

/// Stored score row, serialised as returned by the HTTP API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Row identifier.
    pub id: i64,
    /// Owner of the score.
    pub user_id: i64,
    /// Level the game was played on.
    pub level: i64,
    /// Final score.
    pub score: i64,
    /// Waves cleared.
    pub waves: i64,
    /// Insertion timestamp in SQLite's `YYYY-MM-DD HH:MM:SS` form.
    pub created_at: String,
}

impl ScoreRecord {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            level: row.try_get("level")?,
            score: row.try_get("score")?,
            waves: row.try_get("waves")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Handle to the account database, cheap to clone.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens (creating if needed) the database at `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Opens a private in-memory database that lives as long as the store.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Creates the tables when they do not exist yet.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            let _ = sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Ensures the demo account exists without touching an existing one.
    pub async fn seed_demo_user(&self) -> Result<(), sqlx::Error> {
        let inserted = sqlx::query(
            "INSERT INTO users (username, password, email) VALUES (?, ?, ?)
             ON CONFLICT(username) DO NOTHING",
        )
        .bind(DEMO_USERNAME)
        .bind(DEMO_PASSWORD)
        .bind(DEMO_EMAIL)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if inserted > 0 {
            tracing::info!(username = DEMO_USERNAME, "seeded demo user");
        }
        Ok(())
    }

    /// Looks up an account by username.
    pub async fn find_user(&self, username: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        let row = sqlx::query("SELECT id, username, password, email FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| {
            Ok(UserRecord {
                id: row.try_get("id")?,
                username: row.try_get("username")?,
                password: row.try_get("password")?,
                email: row.try_get("email")?,
            })
        })
        .transpose()
    }

    /// Inserts a new account and returns its identifier.
    ///
    /// A concurrent registration of the same name surfaces as a unique
    /// constraint violation from the driver.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let row = sqlx::query(
            "INSERT INTO users (username, password, email) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(username)
        .bind(password)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        row.try_get("id")
    }

    /// Stores a score and returns the persisted row.
    pub async fn insert_score(&self, score: NewScore) -> Result<ScoreRecord, sqlx::Error> {
        let row = sqlx::query(
            "INSERT INTO game_scores (user_id, level, score, waves) VALUES (?, ?, ?, ?)
             RETURNING id, user_id, level, score, waves, created_at",
        )
        .bind(score.user_id)
        .bind(score.level)
        .bind(score.score)
        .bind(score.waves)
        .fetch_one(&self.pool)
        .await?;
        ScoreRecord::from_row(&row)
    }

    /// Highest `limit` scores of a user, best first.
    pub async fn top_scores(&self, user_id: i64, limit: i64) -> Result<Vec<ScoreRecord>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT id, user_id, level, score, waves, created_at FROM game_scores
             WHERE user_id = ? ORDER BY score DESC, id ASC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(ScoreRecord::from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> Store {
        let store = Store::in_memory().await.expect("in-memory database");
        store.migrate().await.expect("schema");
        store
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = store().await;
        store.seed_demo_user().await.expect("first seed");
        store.seed_demo_user().await.expect("second seed");

        let demo = store
            .find_user(DEMO_USERNAME)
            .await
            .expect("query")
            .expect("demo user");
        assert_eq!(demo.password, DEMO_PASSWORD);
        assert_eq!(demo.email.as_deref(), Some(DEMO_EMAIL));
    }

    #[tokio::test]
    async fn duplicate_username_is_a_unique_violation() {
        let store = store().await;
        let _ = store.create_user("ana", "pw", None).await.expect("first");

        let error = store
            .create_user("ana", "other", None)
            .await
            .expect_err("duplicate must fail");

        assert!(error
            .as_database_error()
            .is_some_and(|error| error.is_unique_violation()));
    }

    #[tokio::test]
    async fn top_scores_are_limited_and_ordered() {
        let store = store().await;
        let user_id = store.create_user("ana", "pw", None).await.expect("user");
        for score in [30, 10, 50, 20] {
            let _ = store
                .insert_score(NewScore {
                    user_id,
                    level: 1,
                    score,
                    waves: 5,
                })
                .await
                .expect("score");
        }

        let scores = store.top_scores(user_id, 3).await.expect("query");

        let values: Vec<i64> = scores.iter().map(|record| record.score).collect();
        assert_eq!(values, vec![50, 30, 20]);
    }

    #[tokio::test]
    async fn scores_require_an_existing_user() {
        let store = store().await;

        let result = store
            .insert_score(NewScore {
                user_id: 42,
                level: 1,
                score: 10,
                waves: 1,
            })
            .await;

        assert!(result.is_err());
    }
}
