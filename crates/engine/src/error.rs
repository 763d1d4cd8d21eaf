//! Engine errors and the response envelope used at the output boundary.

use serde::Serialize;
use thiserror::Error;

/// Failures surfaced to callers as `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("Hero \"{0}\" not found in profiles")]
    HeroNotFound(String),

    #[error("Enemy \"{0}\" not found in profiles")]
    EnemyNotFound(String),

    /// One or more duo allies are unknown; carries the comma-joined slugs.
    #[error("Hero not found: {0}")]
    AllyNotFound(String),

    /// The hero has no usable build statistics; carries the display name.
    #[error("No build data for {0}")]
    NoBuildData(String),

    #[error("No ability data for {0}")]
    NoAbilityData(String),
}

/// Serialized result of an engine operation: the payload itself, or `{error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response<T> {
    Ok(T),
    Error { error: String },
}

impl<T> Response<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Response::Ok(v) => Some(v),
            Response::Error { .. } => None,
        }
    }
}

impl<T> From<Result<T, EngineError>> for Response<T> {
    fn from(result: Result<T, EngineError>) -> Self {
        match result {
            Ok(v) => Response::Ok(v),
            Err(e) => Response::Error { error: e.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            EngineError::HeroNotFound("grux".into()).to_string(),
            "Hero \"grux\" not found in profiles"
        );
        assert_eq!(EngineError::NoBuildData("Grux".into()).to_string(), "No build data for Grux");
        assert_eq!(EngineError::AllyNotFound("a, b".into()).to_string(), "Hero not found: a, b");
        assert_eq!(EngineError::NoAbilityData("kallari".into()).to_string(), "No ability data for kallari");
    }

    #[test]
    fn test_response_serializes_error_envelope() {
        let r: Response<u32> = Err(EngineError::EnemyNotFound("x".into())).into();
        assert!(r.is_error());
        let json = serde_json::to_string(&r).expect("serialize");
        assert_eq!(json, r#"{"error":"Enemy \"x\" not found in profiles"}"#);
    }

    #[test]
    fn test_response_ok_is_transparent() {
        let r: Response<Vec<u32>> = Ok(vec![1, 2]).into();
        assert_eq!(serde_json::to_string(&r).expect("serialize"), "[1,2]");
        assert_eq!(r.ok(), Some(vec![1, 2]));
    }
}
