//! Prompt templates sent to the text generator.
//!
//! Each prompt is built from a profile snapshot only; nothing is looked up.

use crate::domain::nutrition::Profile;

/// System instruction shared by every prompt.
pub const SYSTEM_PROMPT: &str =
    "You are an expert nutritionist and fitness planner. Answer exactly in the format requested.";

fn profile_block(profile: &Profile) -> String {
    format!(
        "User Profile:\n\
         - Gender: {gender}\n\
         - Age: {age}\n\
         - Height: {height} cm\n\
         - Current Weight: {weight} kg\n\
         - Target Weight: {target} kg\n\
         - Timeline: {timeline}\n\
         - Activity Level: {activity}\n\
         - BMI: {bmi:.1}\n\
         - Meal Preferences: {meal}\n",
        gender = profile.gender,
        age = profile.age,
        height = profile.height_cm,
        weight = profile.weight_kg,
        target = profile.target_weight_kg,
        timeline = profile.timeline.as_deref().unwrap_or("not specified"),
        activity = profile.activity_level,
        bmi = profile.bmi(),
        meal = non_empty_or(&profile.meal_preference, "no preference"),
    )
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Asks for daily targets as tagged metric lines.
pub fn metrics_plan_prompt(profile: &Profile) -> String {
    format!(
        "Create a personalized nutrition and exercise plan for this user.\n\n\
         {profile}\n\
         The plan should include:\n\
         1. Daily caloric intake\n\
         2. Macronutrient breakdown (protein, carbs, fat in grams)\n\
         3. Exercise routine for the week\n\
         4. Weekly progress targets\n\n\
         Report the figures on their own lines, exactly as follows:\n\
         METRIC:CALORIES:<calories_value>\n\
         METRIC:PROTEIN:<protein_value>\n\
         METRIC:CARBS:<carbs_value>\n\
         METRIC:FAT:<fat_value>\n\
         METRIC:EXERCISE:<exercise_plan>\n",
        profile = profile_block(profile),
    )
}

/// Asks for a seven-day plan in the canonical JSON shape.
pub fn weekly_plan_prompt(profile: &Profile) -> String {
    let targets = match &profile.targets {
        Some(t) => format!(
            "Daily targets: {:.0} kcal, {:.0} g protein, {:.0} g carbs, {:.0} g fat.\n",
            t.daily_calories, t.protein_target_g, t.carbs_target_g, t.fat_target_g
        ),
        None => String::new(),
    };

    format!(
        "Create a weekly meal plan and workout plan, Monday to Sunday, for this user.\n\n\
         {profile}{targets}\n\
         Respond with a single JSON object and no other text, in this shape:\n\
         {{\n\
           \"nutrition_plan\": {{\n\
             \"monday\": {{\n\
               \"breakfast\": {{\"meal\": \"...\", \"calories\": 0, \"protein\": 0, \"carbs\": 0, \"fat\": 0}},\n\
               \"lunch\": {{...}},\n\
               \"dinner\": {{...}},\n\
               \"snacks\": [{{...}}]\n\
             }}\n\
           }},\n\
           \"workout_plan\": {{\n\
             \"monday\": {{\n\
               \"focus\": \"...\",\n\
               \"exercises\": [{{\"name\": \"...\", \"sets\": 3, \"reps\": 10, \"rest\": \"60s\"}}]\n\
             }}\n\
           }}\n\
         }}\n",
        profile = profile_block(profile),
        targets = targets,
    )
}

/// Asks for a quick recipe matching the stored targets.
pub fn recipe_prompt(profile: &Profile) -> String {
    let (calories, protein, carbs, fat) = profile
        .targets
        .map(|t| {
            (
                t.daily_calories,
                t.protein_target_g,
                t.carbs_target_g,
                t.fat_target_g,
            )
        })
        .unwrap_or_default();

    format!(
        "Based on the following preferences and dietary requirements, create a quick recipe.\n\
         User Preferences: {meal}\n\
         Daily Caloric Intake: {calories:.0}\n\
         Protein Target: {protein:.0}g\n\
         Carbs Target: {carbs:.0}g\n\
         Fat Target: {fat:.0}g\n\n\
         Respond with a single JSON object and no other text:\n\
         {{\"name\": \"...\", \"ingredients\": [\"...\"], \"instructions\": [\"...\"], \
         \"nutrition\": {{\"calories\": \"...\", \"protein\": \"...\", \"carbs\": \"...\", \"fat\": \"...\"}}}}\n",
        meal = non_empty_or(&profile.meal_preference, "no preference"),
    )
}
