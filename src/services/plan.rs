use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use std::fmt::Write;
use crate::clients::gemini::GeminiClient;
use crate::errors::UpstreamError;
use crate::models::plan::{DietDay, Exercise, FitnessPlan, Meal, WorkoutDay};
use crate::models::profile::{DietaryPreference, UserProfile};

lazy_static! {
    // Leading ``` or ```json fence, or a trailing ``` fence.
    static ref CODE_FENCE: Regex = Regex::new(r"^\s*```(json)?\s*|```\s*$").unwrap();
}

const SCHEMA_EXAMPLE: &str = r#"{
  "workoutPlan": [
    {
      "day": "Day 1",
      "exercises": [
        {
          "name": "Exercise Name",
          "sets": 3,
          "reps": "10-12",
          "rest": "60s",
          "description": "Brief description"
        }
      ]
    }
  ],
  "dietPlan": [
    {
      "day": "Day 1",
      "meals": [
        {
          "type": "breakfast",
          "name": "Meal Name",
          "calories": 350,
          "protein": "20g",
          "carbs": "45g",
          "fats": "10g",
          "description": "Brief description"
        }
      ]
    }
  ],
  "tips": ["Tip 1", "Tip 2", "Tip 3", "Tip 4", "Tip 5"],
  "motivation": "Motivational message here"
}"#;

/// Builds the plan prompt with every profile field and the expected JSON shape.
pub fn build_prompt(profile: &UserProfile) -> String {
    let mut prompt = String::from(
        "You are an expert fitness coach and nutritionist. Create a comprehensive, personalized fitness plan.\n\n",
    );

    // Writing into a String cannot fail.
    let _ = writeln!(prompt, "User Profile:");
    let _ = writeln!(prompt, "- Name: {}", profile.name);
    let _ = writeln!(prompt, "- Age: {}, Gender: {}", profile.age, profile.gender);
    let _ = writeln!(prompt, "- Height: {}cm, Weight: {}kg", profile.height, profile.weight);
    let _ = writeln!(prompt, "- Fitness Goal: {}", profile.fitness_goal);
    let _ = writeln!(prompt, "- Fitness Level: {}", profile.fitness_level);
    let _ = writeln!(prompt, "- Workout Location: {}", profile.workout_location);
    let _ = writeln!(prompt, "- Dietary Preference: {}", profile.dietary_preference);
    if let Some(history) = profile.medical_history() {
        let _ = writeln!(prompt, "- Medical History: {}", history);
    }
    let _ = writeln!(prompt, "- Stress Level: {}", profile.stress_level);

    prompt.push_str(
        "\nCreate a detailed 7-day plan. Return ONLY a valid JSON object with NO markdown formatting.\n\n",
    );
    prompt.push_str("Required structure:\n");
    prompt.push_str(SCHEMA_EXAMPLE);
    prompt.push_str("\n\nReturn only the JSON object without any extra text.\n");
    prompt
}

/// Strips markdown fences and isolates the outermost `{...}` span.
pub fn extract_json(text: &str) -> String {
    let cleaned = CODE_FENCE.replace_all(text, "");
    let cleaned = cleaned.trim();

    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(first), Some(last)) if last > first => cleaned[first..=last].to_string(),
        _ => cleaned.to_string(),
    }
}

/// Parses raw model output into a plan that satisfies the section contract.
pub fn parse_plan(text: &str) -> Result<FitnessPlan, UpstreamError> {
    let plan: FitnessPlan = serde_json::from_str(&extract_json(text))?;
    plan.check_sections().map_err(UpstreamError::InvalidPlan)?;
    Ok(plan)
}

/// Asks the model for a plan. Any failure yields [`fallback_plan`].
pub async fn generate_fitness_plan(gemini: &GeminiClient, profile: &UserProfile) -> FitnessPlan {
    info!("Generating fitness plan for {}", profile.name);

    let result = match gemini.generate_text(&build_prompt(profile)).await {
        Ok(text) => parse_plan(&text),
        Err(err) => Err(err),
    };

    match result {
        Ok(plan) => {
            info!(
                "Fitness plan generated successfully ({} workout days, {} diet days)",
                plan.workout_plan.len(),
                plan.diet_plan.len()
            );
            plan
        }
        Err(err) => {
            warn!("Gemini failed, returning fallback plan: {}", err);
            fallback_plan(profile)
        }
    }
}

fn exercise(name: &str, sets: u32, reps: &str, rest: &str, description: &str) -> Exercise {
    Exercise {
        name: name.to_string(),
        sets,
        reps: reps.to_string(),
        rest: rest.to_string(),
        description: description.to_string(),
        ..Exercise::default()
    }
}

fn workout_day(day: &str, exercises: Vec<Exercise>) -> WorkoutDay {
    WorkoutDay {
        day: day.to_string(),
        exercises,
        ..WorkoutDay::default()
    }
}

fn meal(
    meal_type: &str,
    name: &str,
    calories: u32,
    protein: &str,
    carbs: &str,
    fats: &str,
    description: &str,
) -> Meal {
    Meal {
        meal_type: meal_type.to_string(),
        name: name.to_string(),
        calories,
        protein: protein.to_string(),
        carbs: carbs.to_string(),
        fats: fats.to_string(),
        description: description.to_string(),
        ..Meal::default()
    }
}

/// Hand-authored plan used whenever the model cannot be reached or its output
/// is unusable. Depends only on dietary preference and name.
pub fn fallback_plan(profile: &UserProfile) -> FitnessPlan {
    let vegetarian = profile.dietary_preference == DietaryPreference::Vegetarian;
    let (lunch, dinner) = if vegetarian {
        ("Paneer & Veg Bowl", "Dal + Roti + Salad")
    } else {
        ("Grilled Chicken & Rice", "Fish + Veggies")
    };

    FitnessPlan {
        workout_plan: vec![
            workout_day(
                "Day 1 - Upper Body",
                vec![exercise(
                    "Push-ups",
                    3,
                    "10-15",
                    "60s",
                    "Classic upper body exercise targeting chest, shoulders, and triceps",
                )],
            ),
            workout_day(
                "Day 2 - Lower Body",
                vec![exercise(
                    "Squats",
                    4,
                    "12-15",
                    "90s",
                    "Fundamental leg exercise for overall lower body strength",
                )],
            ),
            workout_day(
                "Day 3 - Cardio & Core",
                vec![exercise("Running/Jogging", 1, "20-30 min", "0s", "Cardiovascular endurance training")],
            ),
            workout_day(
                "Day 4 - Active Recovery",
                vec![exercise("Stretching", 1, "15 min", "0s", "Full body flexibility work")],
            ),
            workout_day(
                "Day 5 - Full Body",
                vec![exercise("Burpees", 3, "10-15", "90s", "Full body conditioning exercise")],
            ),
            workout_day(
                "Day 6 - Flexibility & Balance",
                vec![exercise("Yoga Flow", 1, "30 min", "0s", "Improve flexibility and mental focus")],
            ),
            workout_day(
                "Day 7 - Rest",
                vec![exercise("Complete Rest", 0, "N/A", "N/A", "Allow your body to fully recover")],
            ),
        ],
        diet_plan: vec![DietDay {
            day: "Day 1".to_string(),
            meals: vec![
                meal("breakfast", "Oatmeal with Fruits", 350, "15g", "45g", "10g", "Healthy fiber-rich breakfast"),
                meal("lunch", lunch, 500, "35g", "50g", "15g", "Balanced protein-rich meal"),
                meal("dinner", dinner, 450, "30g", "40g", "12g", "Light and nutritious dinner"),
            ],
            ..DietDay::default()
        }],
        tips: vec![
            "Stay hydrated throughout the day".to_string(),
            "Sleep at least 7–8 hours".to_string(),
            "Warm up before workouts".to_string(),
            "Focus on proper form".to_string(),
            "Stay consistent".to_string(),
        ],
        motivation: format!("{}, consistency will transform you. Stay strong 💪", profile.name),
        ..FitnessPlan::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::gemini::tests::{client_for, text_response};
    use crate::models::profile::tests::sample_profile;
    use crate::models::profile::StressLevel;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_PLAN: &str = r#"{
        "workoutPlan": [{ "day": "Day 1", "exercises": [{ "name": "Deadlift", "sets": 5, "reps": "5", "rest": "120s", "description": "Hinge" }] }],
        "dietPlan": [{ "day": "Day 1", "meals": [{ "type": "lunch", "name": "Tofu Stir Fry", "calories": 520, "protein": "30g", "carbs": "55g", "fats": "18g", "description": "Wok" }] }],
        "tips": ["Sleep well"],
        "motivation": "Lift heavy, Alex"
    }"#;

    #[test]
    fn prompt_embeds_profile_fields() {
        let mut profile = sample_profile("Alex", DietaryPreference::Keto);
        profile.medical_history = Some("asthma".to_string());
        profile.stress_level = StressLevel::High;

        let prompt = build_prompt(&profile);
        assert!(prompt.contains("- Name: Alex"));
        assert!(prompt.contains("- Age: 25, Gender: male"));
        assert!(prompt.contains("- Height: 170cm, Weight: 70kg"));
        assert!(prompt.contains("- Fitness Goal: general-fitness"));
        assert!(prompt.contains("- Dietary Preference: keto"));
        assert!(prompt.contains("- Medical History: asthma"));
        assert!(prompt.contains("- Stress Level: high"));
        assert!(prompt.contains("\"workoutPlan\""));
        assert!(prompt.contains("NO markdown"));
    }

    #[test]
    fn prompt_omits_absent_medical_history() {
        let prompt = build_prompt(&sample_profile("Alex", DietaryPreference::Vegan));
        assert!(!prompt.contains("Medical History"));
    }

    #[test]
    fn extract_json_strips_fences() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json(text), "{\"a\": 1}");

        let text = "  ```\n{\"a\": {\"b\": 2}}\n```  ";
        assert_eq!(extract_json(text), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn extract_json_isolates_outermost_object() {
        let text = "Sure! Here is your plan:\n{\"tips\": [\"x\"], \"nested\": {\"y\": 1}}\nEnjoy!";
        assert_eq!(extract_json(text), "{\"tips\": [\"x\"], \"nested\": {\"y\": 1}}");
    }

    #[test]
    fn extract_json_leaves_braceless_text_alone() {
        assert_eq!(extract_json("```\nno json here\n```"), "no json here");
        assert_eq!(extract_json("} backwards {"), "} backwards {");
    }

    #[test]
    fn parse_plan_rejects_missing_sections() {
        let err = parse_plan(r#"{"workoutPlan": [], "tips": ["a"], "motivation": "m"}"#).unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidPlan(_)));

        let err = parse_plan("not json at all").unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidJson(_)));
    }

    #[test]
    fn fallback_follows_dietary_preference() {
        let veg = fallback_plan(&sample_profile("Alex", DietaryPreference::Vegetarian));
        assert_eq!(veg.diet_plan[0].meals[1].name, "Paneer & Veg Bowl");
        assert_eq!(veg.diet_plan[0].meals[2].name, "Dal + Roti + Salad");

        for diet in [
            DietaryPreference::NonVegetarian,
            DietaryPreference::Vegan,
            DietaryPreference::Keto,
            DietaryPreference::Paleo,
        ] {
            let plan = fallback_plan(&sample_profile("Alex", diet));
            assert_eq!(plan.diet_plan[0].meals[1].name, "Grilled Chicken & Rice");
            assert_eq!(plan.diet_plan[0].meals[2].name, "Fish + Veggies");
        }
    }

    #[test]
    fn fallback_satisfies_section_contract() {
        let plan = fallback_plan(&sample_profile("Jordan", DietaryPreference::Paleo));
        assert!(plan.check_sections().is_ok());
        assert_eq!(plan.workout_plan.len(), 7);
        assert_eq!(plan.tips.len(), 5);
        assert!(plan.motivation.starts_with("Jordan, "));
    }

    #[tokio::test]
    async fn uses_model_output_when_valid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(text_response(&format!("```json\n{}\n```", VALID_PLAN)))
            .expect(1)
            .mount(&server)
            .await;

        let profile = sample_profile("Alex", DietaryPreference::Vegetarian);
        let plan = generate_fitness_plan(&client_for(&server, Some("k")), &profile).await;
        assert_eq!(plan.workout_plan[0].exercises[0].name, "Deadlift");
        assert_eq!(plan.motivation, "Lift heavy, Alex");
    }

    #[tokio::test]
    async fn range_valued_sets_keep_the_model_plan() {
        let server = MockServer::start().await;
        let body = VALID_PLAN.replace(r#""sets": 5"#, r#""sets": "3-4""#);
        assert!(body.contains("3-4"));
        Mock::given(method("POST"))
            .respond_with(text_response(&body))
            .mount(&server)
            .await;

        let profile = sample_profile("Alex", DietaryPreference::Vegetarian);
        let plan = generate_fitness_plan(&client_for(&server, Some("k")), &profile).await;
        assert_eq!(plan.workout_plan[0].exercises[0].name, "Deadlift");
        assert_eq!(plan.workout_plan[0].exercises[0].sets, 3);
    }

    #[tokio::test]
    async fn network_failure_returns_vegetarian_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let profile = sample_profile("Alex", DietaryPreference::Vegetarian);
        let plan = generate_fitness_plan(&client_for(&server, Some("k")), &profile).await;
        assert_eq!(plan.diet_plan[0].day, "Day 1");
        assert_eq!(plan.diet_plan[0].meals[1].name, "Paneer & Veg Bowl");
        assert_eq!(plan, fallback_plan(&profile));
    }

    #[tokio::test]
    async fn unreachable_host_returns_fallback() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            &crate::config::GeminiConfig {
                api_key: Some("k".to_string()),
                model: "gemini-1.5-flash".to_string(),
                base_url: "http://127.0.0.1:9".to_string(),
            },
        );

        let profile = sample_profile("Alex", DietaryPreference::Keto);
        let plan = generate_fitness_plan(&client, &profile).await;
        assert_eq!(plan, fallback_plan(&profile));
    }

    #[tokio::test]
    async fn malformed_or_incomplete_output_returns_fallback() {
        for body in ["I cannot help with that.", r#"{"workoutPlan": [], "dietPlan": []}"#] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(text_response(body))
                .mount(&server)
                .await;

            let profile = sample_profile("Alex", DietaryPreference::NonVegetarian);
            let plan = generate_fitness_plan(&client_for(&server, Some("k")), &profile).await;
            assert_eq!(plan, fallback_plan(&profile));
        }
    }

    #[tokio::test]
    async fn missing_credentials_return_fallback() {
        let server = MockServer::start().await;
        let profile = sample_profile("Alex", DietaryPreference::Vegetarian);
        let plan = generate_fitness_plan(&client_for(&server, None), &profile).await;
        assert!(plan.check_sections().is_ok());
        assert_eq!(plan.diet_plan[0].meals[1].name, "Paneer & Veg Bowl");
    }
}
