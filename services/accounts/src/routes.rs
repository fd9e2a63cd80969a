//! HTTP routes of the account service.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::AccountsError,
    store::{NewScore, ScoreRecord, Store},
};

/// Number of scores returned by the leaderboard query.
pub const SCORE_PAGE_SIZE: i64 = 10;

/// Builds the service router over the provided store.
pub fn router(store: Store) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/game/score", post(save_score).get(list_scores))
        .with_state(store)
}

#[derive(Debug, Deserialize)]
struct Credentials {
    username: Option<String>,
    password: Option<String>,
    email: Option<String>,
}

impl Credentials {
    fn required(&self) -> Result<(&str, &str), AccountsError> {
        let username = self.username.as_deref().filter(|value| !value.is_empty());
        let password = self.password.as_deref().filter(|value| !value.is_empty());
        match (username, password) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(AccountsError::Validation(
                "username and password are required",
            )),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    user_id: i64,
    username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreSubmission {
    user_id: Option<Value>,
    level: Option<i64>,
    score: Option<i64>,
    waves: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreQuery {
    user_id: Option<String>,
}

async fn health() -> &'static str {
    "ok"
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AccountsError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| {
            tracing::debug!(%rejection, "rejected request body");
            AccountsError::Validation("request body must be a JSON object")
        })
}

/// Accepts positive identifiers given either as a JSON number or a numeric string.
fn parse_user_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().filter(|id| *id > 0),
        Value::String(text) => parse_user_id_text(text),
        _ => None,
    }
}

fn parse_user_id_text(text: &str) -> Option<i64> {
    text.trim().parse().ok().filter(|id: &i64| *id > 0)
}

#[tracing::instrument(skip_all)]
async fn register(
    State(store): State<Store>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<AccountResponse>, AccountsError> {
    let credentials = json_body(payload)?;
    let (username, password) = credentials.required()?;
    let failure = AccountsError::database("registration failed, please retry");

    if store.find_user(username).await.map_err(failure)?.is_some() {
        return Err(AccountsError::UsernameTaken);
    }

    let email = credentials.email.as_deref().filter(|value| !value.is_empty());
    let user_id = match store.create_user(username, password, email).await {
        Ok(id) => id,
        Err(error)
            if error
                .as_database_error()
                .is_some_and(|error| error.is_unique_violation()) =>
        {
            return Err(AccountsError::UsernameTaken);
        }
        Err(error) => {
            return Err(AccountsError::database("registration failed, please retry")(
                error,
            ))
        }
    };

    tracing::info!(user_id, username, "registered user");
    Ok(Json(AccountResponse {
        user_id,
        username: username.to_owned(),
    }))
}

#[tracing::instrument(skip_all)]
async fn login(
    State(store): State<Store>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<AccountResponse>, AccountsError> {
    let credentials = json_body(payload)?;
    let (username, password) = credentials.required()?;

    let user = store
        .find_user(username)
        .await
        .map_err(AccountsError::database("login failed, please retry"))?
        .filter(|user| user.password == password)
        .ok_or(AccountsError::InvalidCredentials)?;

    tracing::info!(user_id = user.id, "user logged in");
    Ok(Json(AccountResponse {
        user_id: user.id,
        username: user.username,
    }))
}

#[tracing::instrument(skip_all)]
async fn save_score(
    State(store): State<Store>,
    payload: Result<Json<ScoreSubmission>, JsonRejection>,
) -> Result<Json<ScoreRecord>, AccountsError> {
    let submission = json_body(payload)?;
    let user_id = submission.user_id.as_ref().and_then(parse_user_id);
    let (Some(user_id), Some(level), Some(score), Some(waves)) =
        (user_id, submission.level, submission.score, submission.waves)
    else {
        return Err(AccountsError::Validation("missing required fields"));
    };

    let record = store
        .insert_score(NewScore {
            user_id,
            level,
            score,
            waves,
        })
        .await
        .map_err(AccountsError::database("failed to save score"))?;

    tracing::info!(user_id, score, waves, "saved score");
    Ok(Json(record))
}

#[tracing::instrument(skip_all)]
async fn list_scores(
    State(store): State<Store>,
    Query(query): Query<ScoreQuery>,
) -> Result<Json<Vec<ScoreRecord>>, AccountsError> {
    let user_id = query
        .user_id
        .as_deref()
        .and_then(parse_user_id_text)
        .ok_or(AccountsError::Validation("missing user id"))?;

    let scores = store
        .top_scores(user_id, SCORE_PAGE_SIZE)
        .await
        .map_err(AccountsError::database("failed to load scores"))?;
    Ok(Json(scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_id_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_user_id(&json!(7)), Some(7));
        assert_eq!(parse_user_id(&json!(" 12 ")), Some(12));
        assert_eq!(parse_user_id(&json!("seven")), None);
        assert_eq!(parse_user_id(&json!(0)), None);
        assert_eq!(parse_user_id(&json!(null)), None);
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let credentials = Credentials {
            username: Some(String::new()),
            password: Some("secret".to_owned()),
            email: None,
        };

        assert!(matches!(
            credentials.required(),
            Err(AccountsError::Validation(_))
        ));
    }
}
