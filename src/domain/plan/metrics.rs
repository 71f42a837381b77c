//! Numeric targets read out of tagged metric lines.

use std::collections::BTreeMap;

use crate::domain::nutrition::NutritionTargets;

/// Targets found among parsed metrics. A missing or unreadable value is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricTargets {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

impl MetricTargets {
    /// Reads the `calories`, `protein`, `carbs` and `fat` metrics.
    pub fn from_metrics(metrics: &BTreeMap<String, String>) -> Self {
        let read = |key: &str| metrics.get(key).and_then(|v| leading_number(v));
        Self {
            calories: read("calories"),
            protein_g: read("protein"),
            carbs_g: read("carbs"),
            fat_g: read("fat"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == MetricTargets::default()
    }

    /// Overlays the values found onto `base`, keeping whatever is missing.
    pub fn overlay(&self, base: NutritionTargets) -> NutritionTargets {
        NutritionTargets {
            daily_calories: self.calories.unwrap_or(base.daily_calories),
            protein_target_g: self.protein_g.unwrap_or(base.protein_target_g),
            fat_target_g: self.fat_g.unwrap_or(base.fat_target_g),
            carbs_target_g: self.carbs_g.unwrap_or(base.carbs_target_g),
        }
    }
}

/// Parses the number a value starts with, ignoring thousands separators and
/// any unit after it ("2,200 kcal" → 2200). Negative numbers are rejected.
fn leading_number(raw: &str) -> Option<f64> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
