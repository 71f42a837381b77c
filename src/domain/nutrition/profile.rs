//! Profile snapshot - the biometric record a user maintains.
//!
//! A `Profile` is a plain value. Handlers load it through the
//! `ProfileRepository` port, mutate a copy, and save it back; nothing in here
//! knows about storage.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Timestamp, UserId, ValidationError};

use super::calculator::{BodyMetrics, NutritionTargets};

/// Biological sex used by the BMR formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "M", alias = "m", alias = "Male")]
    Male,
    #[serde(alias = "F", alias = "f", alias = "Female")]
    Female,
    #[serde(alias = "O", alias = "o", alias = "Other")]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            "o" | "other" => Ok(Gender::Other),
            _ => Err(ValidationError::invalid_format(
                "gender",
                format!("expected male, female or other, got '{}'", s),
            )),
        }
    }
}

/// Self-reported activity level.
///
/// Parsing never fails: matching is case-insensitive and anything
/// unrecognised (including an empty string) is treated as sedentary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Lenient parse, defaulting to `Sedentary`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Sedentary,
        }
    }

    /// TDEE multiplier applied to the BMR.
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

impl From<String> for ActivityLevel {
    fn from(raw: String) -> Self {
        ActivityLevel::parse_lenient(&raw)
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the append-only weight history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub weight_kg: f64,
    pub recorded_at: Timestamp,
}

/// Partial set of profile fields supplied by a client.
///
/// `None` leaves the current value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub timeline: Option<String>,
    pub meal_preference: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        *self == ProfileChanges::default()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("height_cm", self.height_cm),
            ("weight_kg", self.weight_kg),
            ("target_weight_kg", self.target_weight_kg),
        ] {
            if let Some(v) = value {
                ensure_positive(field, v)?;
            }
        }
        Ok(())
    }
}

/// Snapshot of a user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub gender: Gender,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub target_weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub timeline: Option<String>,
    pub meal_preference: String,
    pub targets: Option<NutritionTargets>,
    pub weight_log: Vec<WeightEntry>,
    pub weekly_nutrition_plan: Value,
    pub weekly_workout_plan: Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    /// Builds a new profile from client-supplied fields.
    ///
    /// # Errors
    ///
    /// - `EmptyField` when gender, age, height, weight or target weight is missing
    /// - `NotPositive` when a body measurement is zero, negative or not finite
    pub fn create(user_id: UserId, changes: ProfileChanges) -> Result<Self, ValidationError> {
        changes.validate()?;

        let now = Timestamp::now();
        Ok(Self {
            user_id,
            gender: changes.gender.ok_or_else(|| ValidationError::empty_field("gender"))?,
            age: changes.age.ok_or_else(|| ValidationError::empty_field("age"))?,
            height_cm: changes
                .height_cm
                .ok_or_else(|| ValidationError::empty_field("height_cm"))?,
            weight_kg: changes
                .weight_kg
                .ok_or_else(|| ValidationError::empty_field("weight_kg"))?,
            target_weight_kg: changes
                .target_weight_kg
                .ok_or_else(|| ValidationError::empty_field("target_weight_kg"))?,
            activity_level: changes.activity_level.unwrap_or_default(),
            timeline: changes.timeline,
            meal_preference: changes.meal_preference.unwrap_or_default(),
            targets: None,
            weight_log: Vec::new(),
            weekly_nutrition_plan: Value::Object(Map::new()),
            weekly_workout_plan: Value::Object(Map::new()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update. Computed targets are left as they were.
    pub fn apply(&mut self, changes: ProfileChanges) -> Result<(), ValidationError> {
        changes.validate()?;

        if let Some(gender) = changes.gender {
            self.gender = gender;
        }
        if let Some(age) = changes.age {
            self.age = age;
        }
        if let Some(height) = changes.height_cm {
            self.height_cm = height;
        }
        if let Some(weight) = changes.weight_kg {
            self.weight_kg = weight;
        }
        if let Some(target) = changes.target_weight_kg {
            self.target_weight_kg = target;
        }
        if let Some(level) = changes.activity_level {
            self.activity_level = level;
        }
        if changes.timeline.is_some() {
            self.timeline = changes.timeline;
        }
        if let Some(pref) = changes.meal_preference {
            self.meal_preference = pref;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// The inputs the calculator reads.
    pub fn body_metrics(&self) -> BodyMetrics {
        BodyMetrics {
            gender: self.gender,
            age: self.age,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            target_weight_kg: self.target_weight_kg,
            activity_level: self.activity_level,
        }
    }

    /// Body mass index, kg/m².
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        self.weight_kg / (height_m * height_m)
    }

    /// Overwrites the stored targets.
    pub fn set_targets(&mut self, targets: NutritionTargets) {
        self.targets = Some(targets);
        self.updated_at = Timestamp::now();
    }

    /// Sets the current weight and appends it to the history.
    pub fn record_weight(
        &mut self,
        weight_kg: f64,
        recorded_at: Timestamp,
    ) -> Result<&WeightEntry, ValidationError> {
        ensure_positive("weight", weight_kg)?;

        self.weight_kg = weight_kg;
        self.updated_at = recorded_at;
        self.weight_log.push(WeightEntry {
            weight_kg,
            recorded_at,
        });
        Ok(&self.weight_log[self.weight_log.len() - 1])
    }

    /// Replaces both weekly plans wholesale.
    pub fn replace_weekly_plans(&mut self, nutrition: Value, workout: Value) {
        self.weekly_nutrition_plan = nutrition;
        self.weekly_workout_plan = workout;
        self.updated_at = Timestamp::now();
    }

    /// Merges the given plans into the stored ones, one top-level key at a time.
    pub fn merge_weekly_plans(
        &mut self,
        nutrition: Option<Map<String, Value>>,
        workout: Option<Map<String, Value>>,
    ) {
        if let Some(entries) = nutrition {
            merge_keys(&mut self.weekly_nutrition_plan, entries);
        }
        if let Some(entries) = workout {
            merge_keys(&mut self.weekly_workout_plan, entries);
        }
        self.updated_at = Timestamp::now();
    }
}

fn merge_keys(target: &mut Value, entries: Map<String, Value>) {
    match target {
        Value::Object(existing) => existing.extend(entries),
        other => *other = Value::Object(entries),
    }
}

fn ensure_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::not_positive(field, value))
    }
}
