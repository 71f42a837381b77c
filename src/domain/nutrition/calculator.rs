//! Nutrition Calculator - daily calorie and macronutrient targets.
//!
//! Energy needs follow the Mifflin-St Jeor equation (Mifflin et al., 1990)
//! scaled by an activity multiplier, then shifted by a fixed 500 kcal toward
//! the target weight. Protein is weight based (2.2 g/kg), fat takes a quarter
//! of the calories and carbohydrate fills the rest.
//!
//! # Edge Cases
//!
//! - Every output is rounded half away from zero, each from the unrounded
//!   intermediates, so the macros may not sum exactly to the calorie figure.
//! - Outputs are never negative. A negative calorie budget or carbohydrate
//!   remainder is clamped to zero and reported as a [`TargetWarning`].
//! - Non-positive or non-finite body measurements are rejected with
//!   `InvalidProfile` instead of producing NaN or infinity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::DomainError;

use super::profile::{ActivityLevel, Gender};

/// Calories added or removed when the target weight differs from the current one.
pub const GOAL_ADJUSTMENT_KCAL: f64 = 500.0;

/// Daily protein per kilogram of body weight.
pub const PROTEIN_G_PER_KG: f64 = 2.2;

/// Share of daily calories allocated to fat.
pub const FAT_CALORIE_SHARE: f64 = 0.25;

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// The subset of a profile the formula depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMetrics {
    pub gender: Gender,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub target_weight_kg: f64,
    pub activity_level: ActivityLevel,
}

/// Daily targets, in kcal and grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub daily_calories: f64,
    pub protein_target_g: f64,
    pub fat_target_g: f64,
    pub carbs_target_g: f64,
}

/// A value the formula drove below zero before it was clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetWarning {
    CaloriesClamped { computed_kcal: f64 },
    CarbsClamped { computed_g: f64 },
}

impl fmt::Display for TargetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetWarning::CaloriesClamped { computed_kcal } => write!(
                f,
                "calorie target of {:.0} kcal was negative and has been set to 0",
                computed_kcal
            ),
            TargetWarning::CarbsClamped { computed_g } => write!(
                f,
                "carbohydrate target of {:.0} g was negative and has been set to 0",
                computed_g
            ),
        }
    }
}

/// Targets plus any clamping that happened on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCalculation {
    pub targets: NutritionTargets,
    pub warnings: Vec<TargetWarning>,
}

/// Stateless calculator.
pub struct NutritionCalculator;

impl NutritionCalculator {
    /// Computes daily targets for the given body metrics.
    ///
    /// # Errors
    ///
    /// `InvalidProfile` when height, weight or target weight is not a
    /// positive finite number, or when the inputs are too large to compute.
    pub fn calculate(metrics: &BodyMetrics) -> Result<TargetCalculation, DomainError> {
        ensure_measurement("height_cm", metrics.height_cm)?;
        ensure_measurement("weight_kg", metrics.weight_kg)?;
        ensure_measurement("target_weight_kg", metrics.target_weight_kg)?;

        let bmr = Self::bmr(metrics.gender, metrics.weight_kg, metrics.height_cm, metrics.age);
        let tdee = bmr * metrics.activity_level.multiplier();
        let mut calories =
            tdee + Self::goal_adjustment(metrics.weight_kg, metrics.target_weight_kg);

        let mut warnings = Vec::new();

        if calories < 0.0 {
            let warning = TargetWarning::CaloriesClamped {
                computed_kcal: calories,
            };
            tracing::warn!(computed_kcal = calories, "Calorie target clamped to zero");
            warnings.push(warning);
            calories = 0.0;
        }

        let protein = metrics.weight_kg * PROTEIN_G_PER_KG;
        let fat = FAT_CALORIE_SHARE * calories / KCAL_PER_G_FAT;
        let mut carbs =
            (calories - protein * KCAL_PER_G_PROTEIN - fat * KCAL_PER_G_FAT) / KCAL_PER_G_CARBS;

        if carbs < 0.0 {
            tracing::warn!(computed_g = carbs, "Carbohydrate target clamped to zero");
            warnings.push(TargetWarning::CarbsClamped { computed_g: carbs });
            carbs = 0.0;
        }

        let targets = NutritionTargets {
            daily_calories: calories.round(),
            protein_target_g: protein.round(),
            fat_target_g: fat.round(),
            carbs_target_g: carbs.round(),
        };

        if ![
            targets.daily_calories,
            targets.protein_target_g,
            targets.fat_target_g,
            targets.carbs_target_g,
        ]
        .iter()
        .all(|v| v.is_finite())
        {
            return Err(DomainError::invalid_profile(
                "profile",
                "Profile values are too large to compute targets",
            ));
        }

        Ok(TargetCalculation { targets, warnings })
    }

    /// Mifflin-St Jeor basal metabolic rate, kcal/day.
    pub fn bmr(gender: Gender, weight_kg: f64, height_cm: f64, age: u32) -> f64 {
        let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
        match gender {
            Gender::Male => base + 5.0,
            Gender::Female | Gender::Other => base - 161.0,
        }
    }

    /// Signed calorie shift toward the target weight.
    pub fn goal_adjustment(weight_kg: f64, target_weight_kg: f64) -> f64 {
        if target_weight_kg < weight_kg {
            -GOAL_ADJUSTMENT_KCAL
        } else if target_weight_kg > weight_kg {
            GOAL_ADJUSTMENT_KCAL
        } else {
            0.0
        }
    }
}

fn ensure_measurement(field: &str, value: f64) -> Result<(), DomainError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::invalid_profile(
            field,
            format!("{} must be a positive number, got {}", field, value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use proptest::prelude::*;

    fn reference_metrics() -> BodyMetrics {
        BodyMetrics {
            gender: Gender::Male,
            age: 30,
            height_cm: 175.0,
            weight_kg: 70.0,
            target_weight_kg: 65.0,
            activity_level: ActivityLevel::Moderate,
        }
    }

    #[test]
    fn reference_profile_targets() {
        // BMR 1648.75, TDEE 2555.56, loss adjustment -> 2055.56 kcal
        let result = NutritionCalculator::calculate(&reference_metrics()).unwrap();

        assert_eq!(result.targets.daily_calories, 2056.0);
        assert_eq!(result.targets.protein_target_g, 154.0);
        assert_eq!(result.targets.fat_target_g, 57.0);
        assert_eq!(result.targets.carbs_target_g, 231.0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn bmr_for_reference_male() {
        let bmr = NutritionCalculator::bmr(Gender::Male, 70.0, 175.0, 30);
        assert!((bmr - 1648.75).abs() < 1e-9);
    }

    #[test]
    fn female_and_other_use_lower_offset() {
        let male = NutritionCalculator::bmr(Gender::Male, 70.0, 175.0, 30);
        let female = NutritionCalculator::bmr(Gender::Female, 70.0, 175.0, 30);
        let other = NutritionCalculator::bmr(Gender::Other, 70.0, 175.0, 30);

        assert!((male - female - 166.0).abs() < 1e-9);
        assert_eq!(female, other);

        let mut metrics = reference_metrics();
        metrics.gender = Gender::Female;
        let result = NutritionCalculator::calculate(&metrics).unwrap();
        assert!(result.targets.daily_calories < 2056.0);
    }

    #[test]
    fn unknown_activity_uses_sedentary_multiplier() {
        let mut metrics = reference_metrics();
        metrics.activity_level = ActivityLevel::parse_lenient("");
        let result = NutritionCalculator::calculate(&metrics).unwrap();

        let expected = (1648.75 * 1.2 - 500.0_f64).round();
        assert_eq!(result.targets.daily_calories, expected);
    }

    #[test]
    fn equal_target_weight_means_no_adjustment() {
        let mut metrics = reference_metrics();
        metrics.target_weight_kg = metrics.weight_kg;
        let result = NutritionCalculator::calculate(&metrics).unwrap();

        assert_eq!(result.targets.daily_calories, (1648.75 * 1.55_f64).round());
    }

    #[test]
    fn higher_target_weight_adds_surplus() {
        assert_eq!(NutritionCalculator::goal_adjustment(70.0, 75.0), 500.0);
        assert_eq!(NutritionCalculator::goal_adjustment(70.0, 65.0), -500.0);
        assert_eq!(NutritionCalculator::goal_adjustment(70.0, 70.0), 0.0);
    }

    #[test]
    fn zero_height_is_invalid_profile() {
        let mut metrics = reference_metrics();
        metrics.height_cm = 0.0;
        let err = NutritionCalculator::calculate(&metrics).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidProfile);
        assert_eq!(err.details.get("field"), Some(&"height_cm".to_string()));
    }

    #[test]
    fn negative_or_nan_weight_is_invalid_profile() {
        for weight in [-70.0, f64::NAN, f64::INFINITY] {
            let mut metrics = reference_metrics();
            metrics.weight_kg = weight;
            let err = NutritionCalculator::calculate(&metrics).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidProfile);
        }
    }

    #[test]
    fn carbs_clamped_when_protein_dominates() {
        let metrics = BodyMetrics {
            gender: Gender::Female,
            age: 80,
            height_cm: 150.0,
            weight_kg: 150.0,
            target_weight_kg: 100.0,
            activity_level: ActivityLevel::Sedentary,
        };
        let result = NutritionCalculator::calculate(&metrics).unwrap();

        assert_eq!(result.targets.carbs_target_g, 0.0);
        assert_eq!(result.warnings.len(), 1);
        assert!(matches!(result.warnings[0], TargetWarning::CarbsClamped { computed_g } if computed_g < 0.0));
    }

    #[test]
    fn negative_calories_clamped_to_zero() {
        let metrics = BodyMetrics {
            gender: Gender::Female,
            age: 100,
            height_cm: 1.0,
            weight_kg: 1.0,
            target_weight_kg: 0.5,
            activity_level: ActivityLevel::Sedentary,
        };
        let result = NutritionCalculator::calculate(&metrics).unwrap();

        assert_eq!(result.targets.daily_calories, 0.0);
        assert_eq!(result.targets.fat_target_g, 0.0);
        assert_eq!(result.targets.carbs_target_g, 0.0);
        assert!(matches!(result.warnings[0], TargetWarning::CaloriesClamped { .. }));
        assert!(matches!(result.warnings[1], TargetWarning::CarbsClamped { .. }));
    }

    #[test]
    fn repeated_calculation_is_identical() {
        let metrics = reference_metrics();
        let first = NutritionCalculator::calculate(&metrics).unwrap();
        let second = NutritionCalculator::calculate(&metrics).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn warning_serializes_with_kind_tag() {
        let json = serde_json::to_value(TargetWarning::CarbsClamped { computed_g: -2.0 }).unwrap();
        assert_eq!(json["kind"], "carbs_clamped");
    }

    fn any_gender() -> impl Strategy<Value = Gender> {
        prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
    }

    fn any_activity() -> impl Strategy<Value = ActivityLevel> {
        prop_oneof![
            Just(ActivityLevel::Sedentary),
            Just(ActivityLevel::Light),
            Just(ActivityLevel::Moderate),
            Just(ActivityLevel::Active),
            Just(ActivityLevel::VeryActive),
        ]
    }

    proptest! {
        #[test]
        fn valid_profiles_yield_finite_non_negative_targets(
            gender in any_gender(),
            activity_level in any_activity(),
            age in 0u32..120,
            height_cm in 0.1f64..250.0,
            weight_kg in 0.1f64..400.0,
            target_weight_kg in 0.1f64..400.0,
        ) {
            let metrics = BodyMetrics { gender, age, height_cm, weight_kg, target_weight_kg, activity_level };
            let result = NutritionCalculator::calculate(&metrics).unwrap();
            let t = result.targets;
            for value in [t.daily_calories, t.protein_target_g, t.fat_target_g, t.carbs_target_g] {
                prop_assert!(value.is_finite());
                prop_assert!(value >= 0.0);
            }
        }
    }
}
