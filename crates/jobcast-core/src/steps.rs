//! Step outcomes: decoding the JSON `steps` input and applying the
//! configured allow-list.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Result;

/// Step name → outcome, in the order the workflow engine produced them.
pub type StepOutcomes = IndexMap<String, String>;

/// Decode the JSON-encoded `steps` input. Empty input means no steps.
///
/// The workflow engine serializes each step either as a bare outcome string
/// or as an object carrying an `outcome` field alongside conclusion/outputs;
/// both shapes are accepted.
pub fn decode_steps(input: &str) -> Result<StepOutcomes> {
    let input = if input.is_empty() { "{}" } else { input };
    let raw: IndexMap<String, Value> = serde_json::from_str(input)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let outcome = match value {
                Value::String(s) => s,
                Value::Object(ref obj) => obj
                    .get("outcome")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                other => other.to_string(),
            };
            (name, outcome)
        })
        .collect())
}

/// Apply the allow-list. An empty list reports everything; otherwise keep
/// exactly the listed steps, in the outcome map's own order. Allow-list
/// entries that match no step are ignored.
pub fn filter_steps(outcomes: StepOutcomes, allowed: &[String]) -> StepOutcomes {
    if allowed.is_empty() {
        return outcomes;
    }
    outcomes
        .into_iter()
        .filter(|(name, _)| allowed.iter().any(|a| a == name))
        .collect()
}
