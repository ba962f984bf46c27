pub mod classify;
pub mod dedup;
pub mod degradation;
pub mod distance;
pub mod geocode;
pub mod normalize;
pub mod orchestrator;
pub mod query;
pub mod rating;
pub mod recommend;

pub use crate::domain::model::{Place, SearchOutcome};
pub use crate::utils::error::Result;
pub use orchestrator::SearchOrchestrator;
