use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;
use crate::utils::validation::validate_not_blank;

/// Profile submitted by the fitness form. Immutable once submitted.
#[derive(Deserialize, Serialize, Validate, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[validate(custom = "validate_not_blank")]
    pub name: String,

    #[validate(range(min = 10, max = 100, message = "Age must be between 10 and 100"))]
    pub age: u32,

    pub gender: Gender,

    /// Centimetres.
    #[validate(range(min = 50, max = 300, message = "Height must be between 50 and 300 cm"))]
    pub height: u32,

    /// Kilograms.
    #[validate(range(min = 20, max = 500, message = "Weight must be between 20 and 500 kg"))]
    pub weight: u32,

    pub fitness_goal: FitnessGoal,
    pub fitness_level: FitnessLevel,
    pub workout_location: WorkoutLocation,
    pub dietary_preference: DietaryPreference,

    #[validate(length(max = 1000, message = "Medical history must be at most 1000 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,

    #[serde(default)]
    pub stress_level: StressLevel,
}

impl UserProfile {
    /// Medical history with blank input treated as absent.
    pub fn medical_history(&self) -> Option<&str> {
        self.medical_history
            .as_deref()
            .map(str::trim)
            .filter(|history| !history.is_empty())
    }
}

// Each enum serializes to the same kebab-case tag the form posts.
macro_rules! form_enum {
    ($name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        #[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

form_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

form_enum!(FitnessGoal {
    WeightLoss => "weight-loss",
    MuscleGain => "muscle-gain",
    GeneralFitness => "general-fitness",
    Endurance => "endurance",
    Flexibility => "flexibility",
});

form_enum!(FitnessLevel {
    Beginner => "beginner",
    Intermediate => "intermediate",
    Advanced => "advanced",
});

form_enum!(WorkoutLocation {
    Home => "home",
    Gym => "gym",
    Outdoor => "outdoor",
});

form_enum!(DietaryPreference {
    Vegetarian => "vegetarian",
    NonVegetarian => "non-vegetarian",
    Vegan => "vegan",
    Keto => "keto",
    Paleo => "paleo",
});

form_enum!(StressLevel {
    Low => "low",
    Medium => "medium",
    High => "high",
});

impl Default for StressLevel {
    fn default() -> Self {
        StressLevel::Medium
    }
}
