//! HTTP DTOs for the profile, nutrition and weekly plan endpoints.
//!
//! These types decouple the HTTP API from domain types. Request field names
//! accept the short forms older clients send (`height`, `weight`,
//! `target_weight`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::nutrition::{
    ActivityLevel, Gender, NutritionTargets, Profile, ProfileChanges, TargetWarning, WeightEntry,
};
use crate::domain::plan::RecipeOutcome;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `PUT /api/profile`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileRequest {
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    #[serde(alias = "height")]
    pub height_cm: Option<f64>,
    #[serde(alias = "weight")]
    pub weight_kg: Option<f64>,
    #[serde(alias = "target_weight")]
    pub target_weight_kg: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub timeline: Option<String>,
    pub meal_preference: Option<String>,
}

impl From<ProfileRequest> for ProfileChanges {
    fn from(req: ProfileRequest) -> Self {
        ProfileChanges {
            gender: req.gender,
            age: req.age,
            height_cm: req.height_cm,
            weight_kg: req.weight_kg,
            target_weight_kg: req.target_weight_kg,
            activity_level: req.activity_level,
            timeline: req.timeline,
            meal_preference: req.meal_preference,
        }
    }
}

/// A weight sent either as a number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WeightValue {
    Number(f64),
    Text(String),
}

/// Body of `POST /api/nutrition/update-weight`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWeightRequest {
    #[serde(default)]
    pub weight: Option<WeightValue>,
}

impl UpdateWeightRequest {
    /// The weight in kilograms, or a validation error when absent or not numeric.
    pub fn weight_kg(&self) -> Result<f64, DomainError> {
        match &self.weight {
            None => Err(DomainError::validation("weight", "Weight value is required")),
            Some(WeightValue::Number(n)) => Ok(*n),
            Some(WeightValue::Text(s)) if s.trim().is_empty() => {
                Err(DomainError::validation("weight", "Weight value is required"))
            }
            Some(WeightValue::Text(s)) => s.trim().parse::<f64>().map_err(|_| {
                DomainError::validation("weight", format!("Weight must be a number, got '{}'", s))
            }),
        }
    }
}

/// Body of `POST /api/weekly-plan`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWeeklyPlanRequest {
    #[serde(default)]
    pub nutrition_plan: Option<Value>,
    #[serde(default)]
    pub workout_plan: Option<Value>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Daily targets as the API names them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetsResponse {
    pub daily_calories: f64,
    pub protein_target: f64,
    pub fat_target: f64,
    pub carbs_target: f64,
}

impl From<NutritionTargets> for TargetsResponse {
    fn from(t: NutritionTargets) -> Self {
        Self {
            daily_calories: t.daily_calories,
            protein_target: t.protein_target_g,
            fat_target: t.fat_target_g,
            carbs_target: t.carbs_target_g,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightEntryResponse {
    pub weight: f64,
    pub timestamp: Timestamp,
}

impl From<&WeightEntry> for WeightEntryResponse {
    fn from(entry: &WeightEntry) -> Self {
        Self {
            weight: entry.weight_kg,
            timestamp: entry.recorded_at,
        }
    }
}

/// Full profile view.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub gender: Gender,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub target_weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub timeline: Option<String>,
    pub meal_preference: String,
    pub bmi: f64,
    pub targets: Option<TargetsResponse>,
    pub weight_log: Vec<WeightEntryResponse>,
    pub weekly_nutrition_plan: Value,
    pub weekly_workout_plan: Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        let bmi = (p.bmi() * 10.0).round() / 10.0;
        Self {
            user_id: p.user_id.to_string(),
            gender: p.gender,
            age: p.age,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            target_weight_kg: p.target_weight_kg,
            activity_level: p.activity_level,
            timeline: p.timeline,
            meal_preference: p.meal_preference,
            bmi,
            targets: p.targets.map(TargetsResponse::from),
            weight_log: p.weight_log.iter().map(WeightEntryResponse::from).collect(),
            weekly_nutrition_plan: p.weekly_nutrition_plan,
            weekly_workout_plan: p.weekly_workout_plan,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Response of `GET /api/nutrition`.
#[derive(Debug, Clone, Serialize)]
pub struct NutritionTargetsResponse {
    #[serde(flatten)]
    pub targets: TargetsResponse,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TargetWarning>,
}

/// Response of `GET /api/nutrition/plan`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsPlanResponse {
    pub nutrition_plan: BTreeMap<String, String>,
    pub targets: Option<TargetsResponse>,
    pub message: String,
}

/// Response of `GET /api/nutrition/recipe`.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeResponse {
    pub recipe: RecipeOutcome,
    pub message: String,
}

/// Response of `POST /api/nutrition/update-weight`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateWeightResponse {
    pub message: String,
    pub current_weight: f64,
    pub progress: Vec<WeightEntryResponse>,
}

/// Response of both weekly plan endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyPlanResponse {
    pub weekly_nutrition_plan: Value,
    pub weekly_workout_plan: Value,
    pub message: String,
    /// Present on generation only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}
