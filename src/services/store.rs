use log::{debug, info};
use moka::sync::Cache;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;
use crate::clients::gemini::GeminiClient;
use crate::errors::AppError;
use crate::models::plan::FitnessPlan;
use crate::models::profile::UserProfile;
use crate::models::store::StoreSnapshot;
use crate::services::plan::generate_fitness_plan;

pub const STORE_NAME: &str = "fitness-store";

/// Per-client `fitness-store` snapshots, evicted after a period without access.
#[derive(Clone)]
pub struct FitnessStore {
    entries: Cache<Uuid, Arc<Mutex<StoreSnapshot>>>,
}

impl FitnessStore {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        FitnessStore {
            entries: Cache::builder()
                .name(STORE_NAME)
                .max_capacity(capacity)
                .time_to_idle(ttl)
                .build(),
        }
    }

    /// Opens a new empty store. Dark mode starts from the client's system
    /// preference when it sends one.
    pub fn create(&self, prefers_dark: Option<bool>) -> (Uuid, StoreSnapshot) {
        let id = Uuid::new_v4();
        let snapshot = StoreSnapshot::new(prefers_dark.unwrap_or(false));
        self.entries.insert(id, Arc::new(Mutex::new(snapshot.clone())));
        info!("Created {} {}", STORE_NAME, id);
        (id, snapshot)
    }

    pub fn get(&self, id: Uuid) -> Result<StoreSnapshot, AppError> {
        let entry = self.entry(id)?;
        let snapshot = lock(&entry)?;
        Ok(snapshot.clone())
    }

    pub fn set_fitness_plan(&self, id: Uuid, plan: FitnessPlan) -> Result<StoreSnapshot, AppError> {
        plan.check_sections()
            .map_err(|msg| AppError::BadRequest(format!("Invalid fitness plan: {}", msg)))?;

        self.update(id, move |snapshot| {
            snapshot.fitness_plan = Some(plan);
            snapshot.touch();
        })
        .map(|(snapshot, _)| snapshot)
    }

    pub fn set_user_data(&self, id: Uuid, profile: UserProfile) -> Result<StoreSnapshot, AppError> {
        self.update(id, move |snapshot| {
            snapshot.user_data = Some(profile);
            snapshot.touch();
        })
        .map(|(snapshot, _)| snapshot)
    }

    /// Records a submitted profile together with the plan generated for it.
    pub fn set_generated(&self, id: Uuid, profile: UserProfile, plan: FitnessPlan) -> Result<StoreSnapshot, AppError> {
        plan.check_sections()
            .map_err(|msg| AppError::BadRequest(format!("Invalid fitness plan: {}", msg)))?;

        self.update(id, move |snapshot| {
            snapshot.user_data = Some(profile);
            snapshot.fitness_plan = Some(plan);
            snapshot.touch();
        })
        .map(|(snapshot, _)| snapshot)
    }

    /// Forgets the plan and the profile. Dark mode is kept.
    pub fn clear_plan(&self, id: Uuid) -> Result<StoreSnapshot, AppError> {
        self.update(id, |snapshot| {
            snapshot.fitness_plan = None;
            snapshot.user_data = None;
            snapshot.touch();
        })
        .map(|(snapshot, _)| snapshot)
    }

    pub fn toggle_dark_mode(&self, id: Uuid) -> Result<bool, AppError> {
        self.update(id, |snapshot| {
            snapshot.dark_mode = !snapshot.dark_mode;
            snapshot.touch();
            snapshot.dark_mode
        })
        .map(|(_, dark_mode)| dark_mode)
    }

    fn update<F, R>(&self, id: Uuid, f: F) -> Result<(StoreSnapshot, R), AppError>
    where
        F: FnOnce(&mut StoreSnapshot) -> R,
    {
        let entry = self.entry(id)?;
        let mut snapshot = lock(&entry)?;

        let out = f(&mut snapshot);
        debug!("{} {} updated at {}", STORE_NAME, id, snapshot.updated_at);
        Ok((snapshot.clone(), out))
    }

    fn entry(&self, id: Uuid) -> Result<Arc<Mutex<StoreSnapshot>>, AppError> {
        self.entries
            .get(&id)
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))
    }
}

fn lock(entry: &Mutex<StoreSnapshot>) -> Result<MutexGuard<'_, StoreSnapshot>, AppError> {
    entry
        .lock()
        .map_err(|_| AppError::InternalServerError("Store entry is poisoned".to_string()))
}

/// Form submit: generates a plan for the profile and stores both at once.
/// Unknown ids are rejected before the model is called.
pub async fn generate_for(
    store: &FitnessStore,
    gemini: &GeminiClient,
    id: Uuid,
    profile: UserProfile,
) -> Result<StoreSnapshot, AppError> {
    store.get(id)?;
    let plan = generate_fitness_plan(gemini, &profile).await;
    store.set_generated(id, profile, plan)
}
