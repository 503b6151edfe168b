//! Recovery of a [`GeneratedBreakdown`] from free-form model output.
//!
//! Models wrap JSON in code fences, add a sentence of prose before or after
//! it, or leave a trailing comma behind. The pipeline here tolerates those
//! three cases and nothing else:
//!
//! 1. strip leading/trailing ``` fences (optionally tagged `json`)
//! 2. cut the first `{` through the last `}`
//! 3. strict parse, then a single trailing-comma repair pass
//! 4. require `userStories` and `engineeringTasks`

use crate::types::GeneratedBreakdown;
use serde_json::Value;
use thiserror::Error;

const REQUIRED_KEYS: [&str; 2] = ["userStories", "engineeringTasks"];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no JSON found in model response")]
    NoJson,

    #[error("malformed JSON in model response: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

/// Parse raw model text into a validated breakdown.
pub fn extract_breakdown(raw: &str) -> Result<GeneratedBreakdown, ExtractionError> {
    let unfenced = strip_fences(raw);
    let candidate = json_region(unfenced).ok_or(ExtractionError::NoJson)?;

    let value = match serde_json::from_str::<Value>(candidate) {
        Ok(v) => v,
        Err(_) => {
            let repaired = remove_trailing_commas(candidate);
            serde_json::from_str::<Value>(&repaired).map_err(ExtractionError::Malformed)?
        }
    };

    validate_schema(&value)?;

    serde_json::from_value(value).map_err(|e| ExtractionError::InvalidSchema(e.to_string()))
}

fn strip_fences(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```") {
        s = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// First `{` through last `}`, inclusive.
fn json_region(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&s[start..=end])
}

/// Drop commas whose next non-whitespace character closes an object or
/// array. String literals are copied through untouched.
fn remove_trailing_commas(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = s[i + 1..].chars().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some('}' | ']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn validate_schema(value: &Value) -> Result<(), ExtractionError> {
    let Some(obj) = value.as_object() else {
        return Err(ExtractionError::InvalidSchema(
            "response is not a JSON object".into(),
        ));
    };
    for key in REQUIRED_KEYS {
        if matches!(obj.get(key), None | Some(Value::Null)) {
            return Err(ExtractionError::InvalidSchema(format!("missing {key}")));
        }
    }
    Ok(())
}
