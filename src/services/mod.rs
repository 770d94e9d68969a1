pub mod image;
pub mod motivation;
pub mod plan;
pub mod store;
