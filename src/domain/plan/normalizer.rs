//! Plan Normalizer - turns generated text into a weekly plan or a fallback.
//!
//! Generated output is untrusted. Normalization never fails: anything that
//! cannot be read as a plan becomes a [`PlanOutcome::Fallback`] carrying the
//! original text.

use serde::ser::{Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::document::WeeklyPlanDocument;
use super::recipe::RecipeOutcome;

/// Error text placed in both halves of a fallback document.
pub const UNPARSED_PLAN_ERROR: &str = "Could not parse structured plan";

/// Prefix of a tagged metric line.
pub const METRIC_PREFIX: &str = "METRIC:";

/// Result of normalizing a generated plan.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// The text was a plan document; kept verbatim.
    Structured(WeeklyPlanDocument),
    /// The text could not be read as a plan.
    Fallback { raw_response: String },
}

impl PlanOutcome {
    pub fn is_structured(&self) -> bool {
        matches!(self, PlanOutcome::Structured(_))
    }

    /// Value to store as the weekly nutrition plan.
    pub fn nutrition_plan(&self) -> Value {
        match self {
            PlanOutcome::Structured(doc) => doc.nutrition_plan().clone(),
            PlanOutcome::Fallback { raw_response } => fallback_section(raw_response),
        }
    }

    /// Value to store as the weekly workout plan.
    pub fn workout_plan(&self) -> Value {
        match self {
            PlanOutcome::Structured(doc) => doc.workout_plan().clone(),
            PlanOutcome::Fallback { raw_response } => fallback_section(raw_response),
        }
    }

    /// The JSON document callers receive.
    pub fn to_document(&self) -> Value {
        match self {
            PlanOutcome::Structured(doc) => Value::Object(doc.as_map().clone()),
            PlanOutcome::Fallback { raw_response } => json!({
                "nutrition_plan": fallback_section(raw_response),
                "workout_plan": fallback_section(raw_response),
            }),
        }
    }
}

impl Serialize for PlanOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

fn fallback_section(raw_response: &str) -> Value {
    json!({
        "error": UNPARSED_PLAN_ERROR,
        "raw_response": raw_response,
    })
}

/// Stateless normalizer.
pub struct PlanNormalizer;

impl PlanNormalizer {
    /// Reads generated text as a weekly plan.
    ///
    /// The whole text is tried first. If that fails, Markdown code fences and
    /// any prose around the outermost JSON object are removed and the result
    /// is tried once more. A document counts as a plan when it is an object
    /// with both `nutrition_plan` and `workout_plan`.
    pub fn normalize(raw: &str) -> PlanOutcome {
        if let Some(doc) = parse_plan(raw) {
            return Self::structured(doc);
        }

        let cleaned = extract_json_object(raw);
        if cleaned != raw {
            if let Some(doc) = parse_plan(cleaned) {
                return Self::structured(doc);
            }
        }

        tracing::warn!(length = raw.len(), "Generated plan was not a plan document");
        PlanOutcome::Fallback {
            raw_response: raw.to_string(),
        }
    }

    /// Collects `METRIC:<KEY>:<VALUE>` lines into lowercase key → trimmed value.
    ///
    /// Lines without the exact prefix, or with any field count other than
    /// three, are skipped. A repeated key keeps its last value.
    pub fn parse_metrics(raw: &str) -> BTreeMap<String, String> {
        let mut metrics = BTreeMap::new();

        for line in raw.lines() {
            if !line.starts_with(METRIC_PREFIX) {
                continue;
            }
            let fields: Vec<&str> = line.split(':').collect();
            let [_, key, value] = fields.as_slice() else {
                tracing::debug!(line, "Skipping malformed metric line");
                continue;
            };
            let key = key.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            metrics.insert(key, value.trim().to_string());
        }

        metrics
    }

    /// Reads generated text as a recipe. Same cleaning as [`Self::normalize`].
    pub fn normalize_recipe(raw: &str) -> RecipeOutcome {
        RecipeOutcome::from_generated(raw)
    }

    fn structured(doc: WeeklyPlanDocument) -> PlanOutcome {
        let violations = doc.shape_violations();
        if !violations.is_empty() {
            tracing::debug!(
                count = violations.len(),
                "Generated plan deviates from the canonical schema"
            );
        }
        PlanOutcome::Structured(doc)
    }
}

fn parse_plan(text: &str) -> Option<WeeklyPlanDocument> {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(WeeklyPlanDocument::from_value)
}

/// Strips code fences and surrounding prose from generated JSON.
///
/// Returns the span from the first `{` to the last `}` of the de-fenced text,
/// or the de-fenced text itself when it holds no braces.
pub(crate) fn extract_json_object(raw: &str) -> &str {
    let mut text = raw.trim();
    for fence in ["```json", "```JSON", "```"] {
        if let Some(rest) = text.strip_prefix(fence) {
            text = rest;
            break;
        }
    }
    text = text.trim();
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim();
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}
