use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 7-day workout and diet plan, produced by the model or by the fallback.
///
/// Model output is read field by field: a value of the wrong type falls back
/// to its default instead of failing the plan, and keys outside the known
/// shape are kept in `extra` so the plan round-trips as the model wrote it.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FitnessPlan {
    #[serde(default, deserialize_with = "lenient_list")]
    pub workout_plan: Vec<WorkoutDay>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub diet_plan: Vec<DietDay>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub tips: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub motivation: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct WorkoutDay {
    #[serde(default, deserialize_with = "lenient_string")]
    pub day: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub exercises: Vec<Exercise>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Exercise {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub sets: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reps: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rest: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct DietDay {
    #[serde(default, deserialize_with = "lenient_string")]
    pub day: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub meals: Vec<Meal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Meal {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub meal_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub calories: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub protein: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub carbs: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fats: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FitnessPlan {
    /// Checks the one contract every plan must satisfy: all four sections
    /// present and non-empty.
    pub fn check_sections(&self) -> Result<(), String> {
        let mut missing = Vec::new();
        if self.workout_plan.is_empty() {
            missing.push("workoutPlan");
        }
        if self.diet_plan.is_empty() {
            missing.push("dietPlan");
        }
        if self.tips.is_empty() {
            missing.push("tips");
        }
        if self.motivation.trim().is_empty() {
            missing.push("motivation");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("missing or empty: {}", missing.join(", ")))
        }
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// `"sets": "3-4"` reads as 3, `"calories": 350.0` as 350; anything else is 0.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && *f <= u32::MAX as f64).map(|f| f.round() as u32))
            .unwrap_or_default(),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or_default()
        }
        _ => 0,
    })
}

// `"reps": 12` becomes "12"; null, arrays and objects become "".
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(scalar_text)
            .filter(|item| !item.trim().is_empty())
            .collect(),
        _ => Vec::new(),
    })
}

// Entries that are not objects are skipped; a non-array section is empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_model_output_with_loose_types() {
        let plan: FitnessPlan = serde_json::from_value(json!({
            "workoutPlan": [{
                "day": "Day 1",
                "exercises": [{ "name": "Squats", "sets": "4", "reps": 12, "rest": "90s" }]
            }],
            "dietPlan": [{
                "day": "Day 1",
                "meals": [{
                    "type": "breakfast",
                    "name": "Oats",
                    "calories": 350.0,
                    "protein": "15g",
                    "carbs": "45g",
                    "fats": "10g"
                }]
            }],
            "tips": ["Hydrate"],
            "motivation": "Keep going"
        }))
        .unwrap();

        let exercise = &plan.workout_plan[0].exercises[0];
        assert_eq!(exercise.sets, 4);
        assert_eq!(exercise.reps, "12");
        assert_eq!(exercise.description, "");
        assert_eq!(plan.diet_plan[0].meals[0].calories, 350);
        assert_eq!(plan.diet_plan[0].meals[0].meal_type, "breakfast");
        assert!(plan.check_sections().is_ok());
    }

    #[test]
    fn odd_field_values_do_not_fail_the_plan() {
        let plan: FitnessPlan = serde_json::from_value(json!({
            "workoutPlan": [{
                "day": "Day 1",
                "exercises": [
                    { "name": "Squats", "sets": "3-4", "reps": "8-10", "description": null },
                    { "sets": "a few", "rest": null },
                    "stretch a bit"
                ]
            }],
            "dietPlan": [{ "day": 1, "meals": [{ "type": "snack", "calories": "about 200", "protein": null }] }],
            "tips": ["Rest", null, 7],
            "motivation": "Go"
        }))
        .unwrap();

        let exercises = &plan.workout_plan[0].exercises;
        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises[0].sets, 3);
        assert_eq!(exercises[0].description, "");
        assert_eq!(exercises[1].name, "");
        assert_eq!(exercises[1].sets, 0);
        let meal = &plan.diet_plan[0].meals[0];
        assert_eq!(plan.diet_plan[0].day, "1");
        assert_eq!(meal.name, "");
        assert_eq!(meal.calories, 0);
        assert_eq!(plan.tips, vec!["Rest".to_string(), "7".to_string()]);
        assert!(plan.check_sections().is_ok());
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let raw = json!({
            "workoutPlan": [{
                "day": "Day 1",
                "focus": "legs",
                "exercises": [{ "name": "Lunges", "sets": 3, "reps": "12", "rest": "60s", "description": "", "tempo": "2-0-2" }]
            }],
            "dietPlan": [{ "day": "Day 1", "meals": [{ "type": "lunch", "name": "Rice", "calories": 400, "protein": "10g", "carbs": "80g", "fats": "5g", "description": "", "fiber": "3g" }] }],
            "tips": ["Sleep"],
            "motivation": "Onward",
            "weeklySummary": "Strength focus"
        });

        let plan: FitnessPlan = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(plan.extra["weeklySummary"], "Strength focus");
        assert_eq!(plan.workout_plan[0].exercises[0].extra["tempo"], "2-0-2");
        assert_eq!(serde_json::to_value(&plan).unwrap(), raw);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(FitnessPlan::default()).unwrap();
        assert!(value.get("workoutPlan").is_some());
        assert!(value.get("dietPlan").is_some());
    }

    #[test]
    fn check_sections_lists_every_gap() {
        let plan: FitnessPlan = serde_json::from_value(json!({
            "workoutPlan": [],
            "tips": ["one"],
            "motivation": "  "
        }))
        .unwrap();

        let err = plan.check_sections().unwrap_err();
        assert!(err.contains("workoutPlan"));
        assert!(err.contains("dietPlan"));
        assert!(err.contains("motivation"));
        assert!(!err.contains("tips"));
    }
}
