use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::models::plan::FitnessPlan;
use crate::models::profile::UserProfile;

/// Contents of one `fitness-store` entry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub fitness_plan: Option<FitnessPlan>,
    pub user_data: Option<UserProfile>,
    pub dark_mode: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoreSnapshot {
    pub fn new(dark_mode: bool) -> Self {
        let now = Utc::now();
        StoreSnapshot {
            fitness_plan: None,
            user_data: None,
            dark_mode,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
