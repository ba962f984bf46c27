use crate::domain::model::Location;
use crate::utils::error::{Result, SearchError};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "scalp-place-finder")]
#[command(about = "Find hair-loss clinics, scalp-care salons, wig shops and scalp tattoo studios nearby")]
pub struct CliConfig {
    /// 搜尋字串，例如「탈모병원」或「가발전문점」
    pub query: String,

    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    pub lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lon: Option<f64>,

    /// 搜尋半徑（公尺）
    #[arg(long)]
    pub radius: Option<u32>,

    /// TOML 配置檔路徑
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// 自我檢測階段，用來標記推薦地點
    #[arg(long)]
    pub stage: Option<u8>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn location(&self) -> Option<Location> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Location::new(lat, lon)),
            _ => None,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("query", &self.query)?;
        if let Some(location) = self.location() {
            validate_range("lat", location.latitude, -90.0, 90.0)?;
            validate_range("lon", location.longitude, -180.0, 180.0)?;
        }
        if let Some(stage) = self.stage {
            validate_range("stage", stage, 0, 7)?;
        }
        if self.radius == Some(0) {
            return Err(SearchError::InvalidConfigValueError {
                field: "radius".to_string(),
                value: "0".to_string(),
                reason: "Radius must be positive".to_string(),
            });
        }
        Ok(())
    }
}
