//! Blocking client for the account and score service.

use reqwest::{blocking::Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Level recorded for every submitted score; the game has a single lawn.
pub(crate) const GAME_LEVEL: i64 = 1;

/// Account returned by registration and login.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Account {
    pub(crate) user_id: i64,
    pub(crate) username: String,
}

/// Stored score as reported by the service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoreEntry {
    pub(crate) id: i64,
    pub(crate) level: i64,
    pub(crate) score: i64,
    pub(crate) waves: i64,
    pub(crate) created_at: String,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreSubmission {
    user_id: i64,
    level: i64,
    score: i64,
    waves: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Failures talking to the account service.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ClientError {
    /// The request could not be sent or the reply could not be decoded.
    #[error("account service request failed")]
    Transport(#[from] reqwest::Error),
    /// The service answered with an error status.
    #[error("account service rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
}

/// Thin wrapper around the service's JSON endpoints.
#[derive(Clone, Debug)]
pub(crate) struct AccountClient {
    base_url: String,
    http: Client,
}

impl AccountClient {
    pub(crate) fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<Account, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&Credentials {
                username,
                password,
                email,
            })
            .send()?;
        decode(response)
    }

    pub(crate) fn login(&self, username: &str, password: &str) -> Result<Account, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&Credentials {
                username,
                password,
                email: None,
            })
            .send()?;
        decode(response)
    }

    pub(crate) fn submit_score(
        &self,
        user_id: i64,
        score: u32,
        waves: u32,
    ) -> Result<ScoreEntry, ClientError> {
        let response = self
            .http
            .post(self.url("/api/game/score"))
            .json(&ScoreSubmission {
                user_id,
                level: GAME_LEVEL,
                score: i64::from(score),
                waves: i64::from(waves),
            })
            .send()?;
        decode(response)
    }

    pub(crate) fn scores(&self, user_id: i64) -> Result<Vec<ScoreEntry>, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/game/score?userId={user_id}")))
            .send()?;
        decode(response)
    }
}

fn decode<T>(response: reqwest::blocking::Response) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        return Ok(response.json()?);
    }
    let body = response.text()?;
    Err(rejection(status, &body))
}

fn rejection(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.error)
        .unwrap_or_else(|_| body.trim().to_owned());
    ClientError::Rejected { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_prefers_error_field() {
        let error = rejection(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"invalid username or password"}"#,
        );

        assert_eq!(
            error.to_string(),
            "account service rejected the request (401 Unauthorized): invalid username or password"
        );
    }

    #[test]
    fn rejection_falls_back_to_raw_body() {
        let error = rejection(StatusCode::BAD_GATEWAY, "upstream down\n");

        assert!(matches!(
            error,
            ClientError::Rejected { ref message, .. } if message == "upstream down"
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let client = AccountClient::new("http://localhost:3000/");

        assert_eq!(
            client.url("/api/auth/login"),
            "http://localhost:3000/api/auth/login"
        );
    }

    #[test]
    fn score_submission_uses_service_field_names() {
        let body = serde_json::to_value(ScoreSubmission {
            user_id: 3,
            level: GAME_LEVEL,
            score: 120,
            waves: 5,
        })
        .expect("serializable");

        assert_eq!(
            body,
            serde_json::json!({ "userId": 3, "level": 1, "score": 120, "waves": 5 })
        );
    }
}
