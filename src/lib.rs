pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};

pub use adapters::{KakaoLocalAdapter, NaverLocalAdapter, StaticCatalog};
pub use config::TomlConfig;
pub use crate::core::distance::format_distance;
pub use crate::core::recommend::{annotate_recommendations, StageRecommendation};
pub use crate::core::SearchOrchestrator;
pub use domain::model::{Category, Distance, HealthState, Location, Place, SearchOutcome};
pub use utils::error::{Result, SearchError};
