//! PostgreSQL implementation of ProfileRepository.
//!
//! Profiles live in `profiles`; the weight history lives in `weight_log` and
//! is only ever inserted into.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::nutrition::{
    ActivityLevel, Gender, NutritionTargets, Profile, WeightEntry,
};
use crate::ports::ProfileRepository;

/// PostgreSQL implementation of the ProfileRepository port.
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a profile.
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    user_id: String,
    gender: String,
    age: i32,
    height_cm: f64,
    weight_kg: f64,
    target_weight_kg: f64,
    activity_level: String,
    timeline: Option<String>,
    meal_preference: String,
    daily_calories: Option<f64>,
    protein_target_g: Option<f64>,
    fat_target_g: Option<f64>,
    carbs_target_g: Option<f64>,
    weekly_nutrition_plan: Value,
    weekly_workout_plan: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct WeightRow {
    weight_kg: f64,
    recorded_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self, weight_log: Vec<WeightRow>) -> Result<Profile, DomainError> {
        let gender: Gender = self.gender.parse().map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid gender value: {}", e))
        })?;
        let user_id = UserId::new(self.user_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
        })?;
        let age = u32::try_from(self.age).map_err(|_| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid age value: {}", self.age))
        })?;

        let targets = match (
            self.daily_calories,
            self.protein_target_g,
            self.fat_target_g,
            self.carbs_target_g,
        ) {
            (Some(daily_calories), Some(protein_target_g), Some(fat_target_g), Some(carbs_target_g)) => {
                Some(NutritionTargets {
                    daily_calories,
                    protein_target_g,
                    fat_target_g,
                    carbs_target_g,
                })
            }
            _ => None,
        };

        Ok(Profile {
            user_id,
            gender,
            age,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            target_weight_kg: self.target_weight_kg,
            activity_level: ActivityLevel::parse_lenient(&self.activity_level),
            timeline: self.timeline,
            meal_preference: self.meal_preference,
            targets,
            weight_log: weight_log
                .into_iter()
                .map(|row| WeightEntry {
                    weight_kg: row.weight_kg,
                    recorded_at: Timestamp::from_datetime(row.recorded_at),
                })
                .collect(),
            weekly_nutrition_plan: self.weekly_nutrition_plan,
            weekly_workout_plan: self.weekly_workout_plan,
            created_at: Timestamp::from_datetime(self.created_at),
            updated_at: Timestamp::from_datetime(self.updated_at),
        })
    }
}

fn age_column(profile: &Profile) -> Result<i32, DomainError> {
    i32::try_from(profile.age).map_err(|_| DomainError::validation("age", "Age is out of range"))
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn create(&self, profile: &Profile) -> Result<(), DomainError> {
        let targets = profile.targets;

        sqlx::query(
            r#"
            INSERT INTO profiles (
                user_id, gender, age, height_cm, weight_kg, target_weight_kg,
                activity_level, timeline, meal_preference,
                daily_calories, protein_target_g, fat_target_g, carbs_target_g,
                weekly_nutrition_plan, weekly_workout_plan, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(profile.user_id.as_str())
        .bind(profile.gender.as_str())
        .bind(age_column(profile)?)
        .bind(profile.height_cm)
        .bind(profile.weight_kg)
        .bind(profile.target_weight_kg)
        .bind(profile.activity_level.as_str())
        .bind(&profile.timeline)
        .bind(&profile.meal_preference)
        .bind(targets.map(|t| t.daily_calories))
        .bind(targets.map(|t| t.protein_target_g))
        .bind(targets.map(|t| t.fat_target_g))
        .bind(targets.map(|t| t.carbs_target_g))
        .bind(&profile.weekly_nutrition_plan)
        .bind(&profile.weekly_workout_plan)
        .bind(profile.created_at.as_datetime())
        .bind(profile.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("profiles_pkey") {
                    return DomainError::new(ErrorCode::ValidationFailed, "Profile already exists");
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save profile: {}", e))
        })?;

        Ok(())
    }

    async fn update(&self, profile: &Profile) -> Result<(), DomainError> {
        let targets = profile.targets;

        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                gender = $2,
                age = $3,
                height_cm = $4,
                weight_kg = $5,
                target_weight_kg = $6,
                activity_level = $7,
                timeline = $8,
                meal_preference = $9,
                daily_calories = $10,
                protein_target_g = $11,
                fat_target_g = $12,
                carbs_target_g = $13,
                weekly_nutrition_plan = $14,
                weekly_workout_plan = $15,
                updated_at = $16
            WHERE user_id = $1
            "#,
        )
        .bind(profile.user_id.as_str())
        .bind(profile.gender.as_str())
        .bind(age_column(profile)?)
        .bind(profile.height_cm)
        .bind(profile.weight_kg)
        .bind(profile.target_weight_kg)
        .bind(profile.activity_level.as_str())
        .bind(&profile.timeline)
        .bind(&profile.meal_preference)
        .bind(targets.map(|t| t.daily_calories))
        .bind(targets.map(|t| t.protein_target_g))
        .bind(targets.map(|t| t.fat_target_g))
        .bind(targets.map(|t| t.carbs_target_g))
        .bind(&profile.weekly_nutrition_plan)
        .bind(&profile.weekly_workout_plan)
        .bind(profile.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update profile: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::ProfileNotFound, "Profile not found"));
        }

        Ok(())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, DomainError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT user_id, gender, age, height_cm, weight_kg, target_weight_kg,
                   activity_level, timeline, meal_preference,
                   daily_calories, protein_target_g, fat_target_g, carbs_target_g,
                   weekly_nutrition_plan, weekly_workout_plan, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find profile: {}", e))
        })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let weights: Vec<WeightRow> = sqlx::query_as(
            r#"
            SELECT weight_kg, recorded_at
            FROM weight_log
            WHERE user_id = $1
            ORDER BY recorded_at ASC, id ASC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to load weight log: {}", e))
        })?;

        row.into_profile(weights).map(Some)
    }

    async fn append_weight(
        &self,
        user_id: &UserId,
        entry: &WeightEntry,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(DomainError::database)?;

        let result = sqlx::query(
            r#"
            UPDATE profiles SET weight_kg = $2, updated_at = $3
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .bind(entry.weight_kg)
        .bind(entry.recorded_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update weight: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::ProfileNotFound, "Profile not found"));
        }

        sqlx::query(
            r#"
            INSERT INTO weight_log (user_id, weight_kg, recorded_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id.as_str())
        .bind(entry.weight_kg)
        .bind(entry.recorded_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to append weight: {}", e))
        })?;

        tx.commit().await.map_err(DomainError::database)?;
        Ok(())
    }

    async fn save_targets(
        &self,
        user_id: &UserId,
        targets: &NutritionTargets,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                daily_calories = $2,
                protein_target_g = $3,
                fat_target_g = $4,
                carbs_target_g = $5,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .bind(targets.daily_calories)
        .bind(targets.protein_target_g)
        .bind(targets.fat_target_g)
        .bind(targets.carbs_target_g)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save targets: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::ProfileNotFound, "Profile not found"));
        }

        Ok(())
    }

    async fn save_weekly_plans(
        &self,
        user_id: &UserId,
        nutrition_plan: &Value,
        workout_plan: &Value,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                weekly_nutrition_plan = $2,
                weekly_workout_plan = $3,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .bind(nutrition_plan)
        .bind(workout_plan)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save weekly plans: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::ProfileNotFound, "Profile not found"));
        }

        Ok(())
    }
}
