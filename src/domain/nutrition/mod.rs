//! Nutrition module - profile snapshots and target calculation.

mod calculator;
mod profile;

pub use calculator::{
    BodyMetrics, NutritionCalculator, NutritionTargets, TargetCalculation, TargetWarning,
    FAT_CALORIE_SHARE, GOAL_ADJUSTMENT_KCAL, PROTEIN_G_PER_KG,
};
pub use profile::{ActivityLevel, Gender, Profile, ProfileChanges, WeightEntry};
