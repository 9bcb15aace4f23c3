//! Normalization of raw completion text into a [`NormalizedResult`].
//!
//! The parsed payload is treated as an untyped JSON tree and checked field by
//! field before anything is trusted. Options fail fast: one malformed option
//! fails the whole normalization. Trade-offs degrade: a malformed trade-off is
//! dropped and the rest are kept.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use super::{NormalizedResult, OptionAnalysis, TradeOff};

/// Reasons a completion cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response root must be a JSON object")]
    NotAnObject,

    #[error("response is missing an 'options' array")]
    MissingOptions,

    #[error("response 'options' array is empty")]
    EmptyOptions,

    #[error("option at index {index} is not an object")]
    OptionNotObject { index: usize },

    #[error("option at index {index} has a missing or blank 'name'")]
    InvalidOptionName { index: usize },

    #[error("option '{name}' has a missing or non-array '{field}' field")]
    InvalidList { name: String, field: &'static str },
}

/// Normalizes raw completion text.
///
/// # Errors
///
/// Returns a [`NormalizationError`] when the text does not parse, the root is
/// not an object, `options` is missing/empty, or any option entry is invalid.
pub fn normalize(raw: &str) -> Result<NormalizedResult, NormalizationError> {
    let payload = extract_json_payload(raw);

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| NormalizationError::InvalidJson(e.to_string()))?;

    let root = value.as_object().ok_or(NormalizationError::NotAnObject)?;

    let raw_options = root
        .get("options")
        .and_then(Value::as_array)
        .ok_or(NormalizationError::MissingOptions)?;

    if raw_options.is_empty() {
        return Err(NormalizationError::EmptyOptions);
    }

    let options = raw_options
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize_option(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let trade_offs = root
        .get("tradeOffs")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| normalize_trade_off(index, entry))
                .collect()
        })
        .unwrap_or_default();

    Ok(NormalizedResult {
        options,
        trade_offs,
    })
}

/// Locates the JSON payload inside raw completion text.
///
/// Prefers the interior of a fenced code block, then the first balanced
/// `{...}` span, then the whole trimmed text.
pub fn extract_json_payload(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(inner) = fenced_block(trimmed) {
        return inner;
    }

    if let Some(start) = trimmed.find('{') {
        if let Some(span) = balanced_object(trimmed, start) {
            return span;
        }
    }

    trimmed
}

fn fenced_block(s: &str) -> Option<&str> {
    let open = line_start_fence(s)?;
    let after_fence = &s[open + 3..];

    // Skip an info string such as `json` on the opening fence line.
    let body_start = after_fence
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(after_fence.len());
    let body = &after_fence[body_start..];

    let close = line_start_fence(body).or_else(|| body.rfind("```"))?;
    Some(body[..close].trim())
}

// A fence only counts when nothing but whitespace precedes it on its line, so
// backticks inside a JSON string value are never mistaken for one.
fn line_start_fence(s: &str) -> Option<usize> {
    s.match_indices("```").map(|(at, _)| at).find(|&at| {
        let line_start = s[..at].rfind('\n').map_or(0, |nl| nl + 1);
        s[line_start..at].trim().is_empty()
    })
}

fn balanced_object(s: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn normalize_option(index: usize, entry: &Value) -> Result<OptionAnalysis, NormalizationError> {
    let object = entry
        .as_object()
        .ok_or(NormalizationError::OptionNotObject { index })?;

    let name = non_blank(object.get("name"))
        .ok_or(NormalizationError::InvalidOptionName { index })?;

    let pros = string_list(object, "pros", &name)?;
    let cons = string_list(object, "cons", &name)?;
    let scores = object
        .get("scores")
        .and_then(Value::as_object)
        .map(score_map)
        .unwrap_or_default();

    Ok(OptionAnalysis {
        name,
        pros,
        cons,
        scores,
    })
}

fn string_list(
    object: &Map<String, Value>,
    field: &'static str,
    name: &str,
) -> Result<Vec<String>, NormalizationError> {
    let items = object
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| NormalizationError::InvalidList {
            name: name.to_string(),
            field,
        })?;

    Ok(items.iter().filter_map(|item| non_blank(Some(item))).collect())
}

// Scores are advisory: strings are kept verbatim, other non-null values are
// rendered as JSON text, nulls are dropped.
fn score_map(scores: &Map<String, Value>) -> BTreeMap<String, String> {
    scores
        .iter()
        .filter_map(|(constraint, rating)| match rating {
            Value::Null => None,
            Value::String(s) => Some((constraint.clone(), s.clone())),
            other => Some((constraint.clone(), other.to_string())),
        })
        .collect()
}

fn normalize_trade_off(index: usize, entry: &Value) -> Option<TradeOff> {
    let Some(object) = entry.as_object() else {
        tracing::debug!(index, "Dropping trade-off: entry is not an object");
        return None;
    };

    let scenario = non_blank(object.get("scenario"));
    let recommendation = non_blank(object.get("recommendation"));

    match (scenario, recommendation) {
        (Some(scenario), Some(recommendation)) => Some(TradeOff {
            scenario,
            recommendation,
        }),
        (scenario, recommendation) => {
            tracing::debug!(
                index,
                has_scenario = scenario.is_some(),
                has_recommendation = recommendation.is_some(),
                "Dropping trade-off: missing or blank field"
            );
            None
        }
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    let trimmed = value?.as_str()?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
