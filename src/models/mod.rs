pub mod plan;
pub mod profile;
pub mod store;
