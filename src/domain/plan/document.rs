//! Canonical weekly plan schema.
//!
//! Generated plans are passed through as raw JSON; these types describe the
//! shape they are expected to have and are used to report deviations without
//! rejecting the document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Day of the week used as a plan key. Keys are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl FromStr for Weekday {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" => Ok(Weekday::Monday),
            "tuesday" => Ok(Weekday::Tuesday),
            "wednesday" => Ok(Weekday::Wednesday),
            "thursday" => Ok(Weekday::Thursday),
            "friday" => Ok(Weekday::Friday),
            "saturday" => Ok(Weekday::Saturday),
            "sunday" => Ok(Weekday::Sunday),
            _ => Err(()),
        }
    }
}

/// A single meal with its macros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub meal: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionDay {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    #[serde(default)]
    pub snacks: Vec<Meal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub rest: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub focus: String,
    pub exercises: Vec<Exercise>,
}

/// Where a generated plan departs from the canonical schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeViolation {
    /// Dotted path, e.g. `nutrition_plan.monday`.
    pub path: String,
    pub reason: String,
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// A generated plan object carrying both `nutrition_plan` and `workout_plan`.
///
/// The document is kept exactly as it was parsed, extra keys included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeeklyPlanDocument(Map<String, Value>);

impl WeeklyPlanDocument {
    pub const NUTRITION_KEY: &'static str = "nutrition_plan";
    pub const WORKOUT_KEY: &'static str = "workout_plan";

    /// Accepts a JSON value if it is an object with both plan keys.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map)
                if map.contains_key(Self::NUTRITION_KEY) && map.contains_key(Self::WORKOUT_KEY) =>
            {
                Some(Self(map))
            }
            _ => None,
        }
    }

    pub fn nutrition_plan(&self) -> &Value {
        &self.0[Self::NUTRITION_KEY]
    }

    pub fn workout_plan(&self) -> &Value {
        &self.0[Self::WORKOUT_KEY]
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Lists every place the document disagrees with the canonical schema.
    pub fn shape_violations(&self) -> Vec<ShapeViolation> {
        let mut violations = Vec::new();
        check_days::<NutritionDay>(Self::NUTRITION_KEY, self.nutrition_plan(), &mut violations);
        check_days::<WorkoutDay>(Self::WORKOUT_KEY, self.workout_plan(), &mut violations);
        violations
    }
}

fn check_days<T: serde::de::DeserializeOwned>(
    section: &str,
    value: &Value,
    violations: &mut Vec<ShapeViolation>,
) {
    let Some(days) = value.as_object() else {
        violations.push(ShapeViolation {
            path: section.to_string(),
            reason: "expected an object keyed by weekday".to_string(),
        });
        return;
    };

    for (key, day) in days {
        let path = format!("{}.{}", section, key);
        if key.parse::<Weekday>().is_err() {
            violations.push(ShapeViolation {
                path: path.clone(),
                reason: "key is not a weekday".to_string(),
            });
        }
        if let Err(e) = serde_json::from_value::<T>(day.clone()) {
            violations.push(ShapeViolation {
                path,
                reason: e.to_string(),
            });
        }
    }
}
