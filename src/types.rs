//! Wire schemas for every backend endpoint.
//!
//! Responses are parsed into these types at the network boundary (see
//! [`crate::api`]) so the rest of the crate never touches untyped JSON.
//! Field names follow the backend's JSON; Rust-side names are normalized.

use serde::{Deserialize, Deserializer, Serialize};

/// The minimal recipe record used for list rendering.
///
/// The backend returns whole recipe rows plus an aggregate `avg_rating`;
/// unknown columns are ignored. Description and image may be `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    #[serde(rename = "recipe_name", alias = "name")]
    pub name: String,
    #[serde(
        rename = "recipe_description",
        alias = "description",
        default,
        deserialize_with = "string_or_null"
    )]
    pub description: String,
    #[serde(
        rename = "recipe_image",
        alias = "image",
        default,
        deserialize_with = "string_or_null"
    )]
    pub image: String,
    /// Average of all user ratings, 0 when unrated.
    #[serde(
        rename = "avg_rating",
        alias = "average_rating",
        default,
        deserialize_with = "rating_value"
    )]
    pub average_rating: f64,
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Averages computed in SQL arrive either as JSON numbers or as decimal
/// strings (`"3.6666666666666667"`), depending on the driver.
fn rating_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Raw::Number(n)) => Ok(n),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid rating value {s:?}"))),
    }
}

/// `GET /api/recipes`, `/api/cookbook`, `/api/recommended`
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionResponse {
    pub recipes: Vec<RecipeSummary>,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// `POST /login` on success.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub redirect: String,
}

/// `POST /signup`
#[derive(Debug, Clone, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Settings updates, account deletion, cookbook toggle/save.
///
/// `message` is optional on the wire; a 2xx reply without one is treated as
/// an unexpected response by the callers.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /check-cookbook/<name>`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CookbookStatus {
    pub in_cookbook: bool,
}

/// Body of `POST /rate-recipe`.
///
/// `rating` is forwarded exactly as the form supplied it; range and type
/// checks belong to the server.
#[derive(Debug, Clone, Serialize)]
pub struct RatingSubmission {
    pub recipe_name: String,
    pub rating: serde_json::Value,
}

impl RatingSubmission {
    /// Build a submission from raw form input: integral text becomes a JSON
    /// integer, other numeric text a float, anything else is sent as a
    /// string, absence as `null`.
    pub fn from_form_value(recipe_name: &str, raw: Option<&str>) -> Self {
        let rating = match raw {
            None => serde_json::Value::Null,
            Some(text) => {
                let trimmed = text.trim();
                if let Ok(n) = trimmed.parse::<i64>() {
                    serde_json::Value::from(n)
                } else {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(serde_json::Value::Number)
                        .unwrap_or_else(|| serde_json::Value::String(text.to_string()))
                }
            }
        };
        Self {
            recipe_name: recipe_name.to_string(),
            rating,
        }
    }
}

/// `POST /rate-recipe` replies with exactly one of `message` or `error`.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Error payload shape shared by the backend's non-2xx JSON replies.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ErrorBody {
    /// Human-readable text: the server's `message`, else the raw `error`,
    /// with `details` appended in parentheses when present.
    ///
    /// Rating replies use `{error, details}` and read `error` directly.
    pub fn summary(&self) -> Option<String> {
        let head = self.message.as_deref().or(self.error.as_deref())?;
        Some(match &self.details {
            Some(details) => format!("{head} ({details})"),
            None => head.to_string(),
        })
    }
}

/// Reply of the remote test runner.
///
/// Two shapes exist in the wild. `/run-tests` reports `passed` and an
/// `exit_code`; the older `/run-test` reports a free-form `message` with
/// either `output` or `error`. `Outcome` is tried first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TestRunReport {
    Outcome {
        passed: bool,
        #[serde(default)]
        output: Option<String>,
        #[serde(default)]
        error: Option<String>,
        exit_code: i32,
    },
    Message {
        message: String,
        #[serde(default)]
        output: Option<String>,
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        exit_code: Option<i32>,
    },
}

impl TestRunReport {
    /// Legacy replies without an exit code pass when no error was reported.
    pub fn passed(&self) -> bool {
        match self {
            TestRunReport::Outcome { passed, .. } => *passed,
            TestRunReport::Message {
                exit_code, error, ..
            } => match exit_code {
                Some(code) => *code == 0,
                None => error.is_none(),
            },
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            TestRunReport::Outcome { exit_code, .. } => Some(*exit_code),
            TestRunReport::Message { exit_code, .. } => *exit_code,
        }
    }

    /// The server's own status line. Only the legacy shape carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            TestRunReport::Outcome { .. } => None,
            TestRunReport::Message { message, .. } => Some(message),
        }
    }

    /// Captured runner output, falling back to the error text.
    pub fn detail(&self) -> Option<&str> {
        let (output, error) = match self {
            TestRunReport::Outcome { output, error, .. }
            | TestRunReport::Message { output, error, .. } => (output, error),
        };
        output
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(error.as_deref())
    }
}
