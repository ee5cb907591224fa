//! Parsing of progress updates sent by clients

use serde::Deserialize;
use serde_json::Value;

use super::UnlockError;
use crate::domain::{Chapter, Completion, Difficulty, Mode, MAX_SCORE};

/// Progress update body as received over the wire.
///
/// Every field is optional here so that missing values turn into a
/// [`UnlockError::Validation`] with a useful message instead of a generic
/// decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompletion {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Integer or numeric string
    #[serde(default)]
    pub chapter: Option<Value>,
    #[serde(default)]
    pub score_to_add: Option<Value>,
}

impl RawCompletion {
    pub fn validate(&self) -> Result<Completion, UnlockError> {
        let mode = self
            .mode
            .as_deref()
            .ok_or_else(|| missing("mode"))?
            .parse::<Mode>()
            .map_err(UnlockError::Validation)?;
        let difficulty = self
            .difficulty
            .as_deref()
            .ok_or_else(|| missing("difficulty"))?
            .parse::<Difficulty>()
            .map_err(UnlockError::Validation)?;
        let chapter = parse_chapter(self.chapter.as_ref().ok_or_else(|| missing("chapter"))?)?;
        let score_to_add =
            parse_score(self.score_to_add.as_ref().ok_or_else(|| missing("scoreToAdd"))?)?;

        Ok(Completion {
            mode,
            difficulty,
            chapter,
            score_to_add,
        })
    }
}

impl From<Completion> for RawCompletion {
    fn from(c: Completion) -> Self {
        Self {
            mode: Some(c.mode.as_str().to_string()),
            difficulty: Some(c.difficulty.as_str().to_string()),
            chapter: Some(Value::from(c.chapter.get())),
            score_to_add: Some(Value::from(c.score_to_add)),
        }
    }
}

fn missing(field: &str) -> UnlockError {
    UnlockError::Validation(format!("{field} is required"))
}

fn parse_chapter(value: &Value) -> Result<Chapter, UnlockError> {
    let number = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Null => return Err(missing("chapter")),
        _ => None,
    };
    number
        .and_then(|n| u8::try_from(n).ok())
        .and_then(Chapter::new)
        .ok_or_else(|| UnlockError::Validation(format!("invalid chapter: {value}")))
}

fn parse_score(value: &Value) -> Result<u64, UnlockError> {
    match value {
        Value::Null => Err(missing("scoreToAdd")),
        Value::Number(n) => n.as_u64().filter(|v| *v <= MAX_SCORE).ok_or_else(|| {
            UnlockError::Validation(format!(
                "scoreToAdd must be an integer between 0 and {MAX_SCORE}, got {n}"
            ))
        }),
        other => Err(UnlockError::Validation(format!(
            "scoreToAdd must be a number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawCompletion {
        serde_json::from_value(value).unwrap()
    }

    fn validation_message(value: Value) -> String {
        match raw(value).validate() {
            Err(UnlockError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_body() {
        let completion = raw(json!({
            "mode": "words", "difficulty": "facil", "chapter": "3", "scoreToAdd": 10
        }))
        .validate()
        .unwrap();
        assert_eq!(completion.mode, Mode::Words);
        assert_eq!(completion.difficulty, Difficulty::Easy);
        assert_eq!(completion.chapter.get(), 3);
        assert_eq!(completion.score_to_add, 10);
    }

    #[test]
    fn test_zero_score_is_allowed() {
        let completion = raw(json!({
            "mode": "sentences", "difficulty": "difficult", "chapter": 10, "scoreToAdd": 0
        }))
        .validate()
        .unwrap();
        assert_eq!(completion.score_to_add, 0);
    }

    #[test]
    fn test_largest_storable_score_is_allowed() {
        let completion = raw(json!({
            "mode": "words", "difficulty": "easy", "chapter": 1, "scoreToAdd": MAX_SCORE
        }))
        .validate()
        .unwrap();
        assert_eq!(completion.score_to_add, MAX_SCORE);
    }

    #[test]
    fn test_missing_fields() {
        assert!(validation_message(json!({})).contains("mode"));
        assert!(
            validation_message(json!({"mode": "words", "difficulty": "easy", "chapter": 1}))
                .contains("scoreToAdd")
        );
        assert!(
            validation_message(
                json!({"mode": "words", "difficulty": "easy", "chapter": 1, "scoreToAdd": null})
            )
            .contains("scoreToAdd")
        );
    }

    #[test]
    fn test_malformed_fields() {
        for body in [
            json!({"mode": "letters", "difficulty": "easy", "chapter": 1, "scoreToAdd": 10}),
            json!({"mode": "words", "difficulty": "hard", "chapter": 1, "scoreToAdd": 10}),
            json!({"mode": "words", "difficulty": "easy", "chapter": 0, "scoreToAdd": 10}),
            json!({"mode": "words", "difficulty": "easy", "chapter": 11, "scoreToAdd": 10}),
            json!({"mode": "words", "difficulty": "easy", "chapter": "x", "scoreToAdd": 10}),
            json!({"mode": "words", "difficulty": "easy", "chapter": 2.5, "scoreToAdd": 10}),
            json!({"mode": "words", "difficulty": "easy", "chapter": 1, "scoreToAdd": -5}),
            json!({"mode": "words", "difficulty": "easy", "chapter": 1, "scoreToAdd": 1.5}),
            json!({"mode": "words", "difficulty": "easy", "chapter": 1, "scoreToAdd": "10"}),
            json!({
                "mode": "words", "difficulty": "easy", "chapter": 1, "scoreToAdd": MAX_SCORE + 1
            }),
            json!({"mode": "words", "difficulty": "easy", "chapter": 1, "scoreToAdd": u64::MAX}),
        ] {
            assert!(
                matches!(raw(body.clone()).validate(), Err(UnlockError::Validation(_))),
                "{body} passed validation"
            );
        }
    }
}
