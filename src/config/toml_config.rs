use crate::core::geocode::DEFAULT_GEOCODE_CONCURRENCY;
use crate::core::rating::{MAX_RATING, MIN_RATING};
use crate::domain::model::DEFAULT_RADIUS_METERS;
use crate::utils::error::{Result, SearchError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub rating: RatingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_radius")]
    pub default_radius_meters: u32,
    #[serde(default = "default_max_radius")]
    pub max_radius_meters: u32,
    #[serde(default = "default_min_live_results")]
    pub min_live_results: usize,
    #[serde(default = "default_geocode_concurrency")]
    pub geocode_concurrency: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_meters: default_radius(),
            max_radius_meters: default_max_radius(),
            min_live_results: default_min_live_results(),
            geocode_concurrency: default_geocode_concurrency(),
        }
    }
}

impl SearchConfig {
    /// 把呼叫者傳入的半徑限制在 1..=max_radius_meters
    pub fn effective_radius(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_radius_meters)
            .clamp(1, self.max_radius_meters.max(1))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub kakao: KakaoConfig,
    #[serde(default)]
    pub naver: NaverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KakaoConfig {
    #[serde(default = "default_kakao_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_kakao_search_path")]
    pub search_path: String,
    pub health_path: Option<String>,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u64,
    #[serde(default = "default_search_timeout")]
    pub search_timeout_seconds: u64,
}

impl Default for KakaoConfig {
    fn default() -> Self {
        Self {
            base_url: default_kakao_base_url(),
            api_key: None,
            search_path: default_kakao_search_path(),
            health_path: None,
            probe_timeout_seconds: default_probe_timeout(),
            search_timeout_seconds: default_search_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaverConfig {
    #[serde(default = "default_naver_base_url")]
    pub base_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default = "default_naver_search_path")]
    pub search_path: String,
    pub health_path: Option<String>,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u64,
    #[serde(default = "default_search_timeout")]
    pub search_timeout_seconds: u64,
}

impl Default for NaverConfig {
    fn default() -> Self {
        Self {
            base_url: default_naver_base_url(),
            client_id: None,
            client_secret: None,
            search_path: default_naver_search_path(),
            health_path: None,
            probe_timeout_seconds: default_probe_timeout(),
            search_timeout_seconds: default_search_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// 未設定時使用內建的目錄資料
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingMode {
    #[default]
    Random,
    Fixed,
    Seeded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingConfig {
    #[serde(default)]
    pub strategy: RatingMode,
    #[serde(default = "default_fixed_rating")]
    pub value: f64,
    #[serde(default)]
    pub seed: u64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            strategy: RatingMode::default(),
            value: default_fixed_rating(),
            seed: 0,
        }
    }
}

fn default_radius() -> u32 {
    DEFAULT_RADIUS_METERS
}

fn default_max_radius() -> u32 {
    20_000
}

fn default_min_live_results() -> usize {
    1
}

fn default_geocode_concurrency() -> usize {
    DEFAULT_GEOCODE_CONCURRENCY
}

fn default_kakao_base_url() -> String {
    "https://dapi.kakao.com".to_string()
}

fn default_kakao_search_path() -> String {
    "/v2/local/search/keyword.json".to_string()
}

fn default_naver_base_url() -> String {
    "https://openapi.naver.com".to_string()
}

fn default_naver_search_path() -> String {
    "/v1/search/local.json".to_string()
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_search_timeout() -> u64 {
    12
}

fn default_fixed_rating() -> f64 {
    4.5
}

impl KakaoConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_seconds)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_seconds)
    }
}

impl NaverConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_seconds)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_seconds)
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SearchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SearchError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 沒有配置檔時，金鑰直接從環境變數讀取
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.providers.kakao.api_key = std::env::var("KAKAO_REST_API_KEY").ok();
        config.providers.naver.client_id = std::env::var("NAVER_CLIENT_ID").ok();
        config.providers.naver.client_secret = std::env::var("NAVER_CLIENT_SECRET").ok();
        config
    }

    /// 替換環境變數 (例如 ${KAKAO_REST_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SearchError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("providers.kakao.base_url", &self.providers.kakao.base_url)?;
        validate_url("providers.naver.base_url", &self.providers.naver.base_url)?;
        validate_non_empty_string("providers.kakao.search_path", &self.providers.kakao.search_path)?;
        validate_non_empty_string("providers.naver.search_path", &self.providers.naver.search_path)?;

        for (field, seconds) in [
            ("providers.kakao.probe_timeout_seconds", self.providers.kakao.probe_timeout_seconds),
            ("providers.kakao.search_timeout_seconds", self.providers.kakao.search_timeout_seconds),
            ("providers.naver.probe_timeout_seconds", self.providers.naver.probe_timeout_seconds),
            ("providers.naver.search_timeout_seconds", self.providers.naver.search_timeout_seconds),
        ] {
            validate_positive_number(field, seconds, 1)?;
        }

        validate_positive_number(
            "search.max_radius_meters",
            u64::from(self.search.max_radius_meters),
            1,
        )?;
        validate_range(
            "search.default_radius_meters",
            self.search.default_radius_meters,
            1,
            self.search.max_radius_meters,
        )?;
        validate_positive_number(
            "search.min_live_results",
            self.search.min_live_results as u64,
            1,
        )?;
        validate_range("search.geocode_concurrency", self.search.geocode_concurrency, 1, 8)?;

        if self.rating.strategy == RatingMode::Fixed {
            validate_range("rating.value", self.rating.value, MIN_RATING, MAX_RATING)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[search]
default_radius_meters = 3000
min_live_results = 3
geocode_concurrency = 6

[providers.kakao]
base_url = "http://localhost:9000"
api_key = "kakao-key"
health_path = "/health"
probe_timeout_seconds = 2

[providers.naver]
client_id = "id"
client_secret = "secret"

[catalog]
path = "./data/fallback_places.json"

[rating]
strategy = "seeded"
seed = 7
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.search.default_radius_meters, 3000);
        assert_eq!(config.search.max_radius_meters, 20_000);
        assert_eq!(config.search.min_live_results, 3);
        assert_eq!(config.providers.kakao.health_path.as_deref(), Some("/health"));
        assert_eq!(config.providers.kakao.probe_timeout(), Duration::from_secs(2));
        assert_eq!(config.providers.kakao.search_timeout(), Duration::from_secs(12));
        assert_eq!(config.providers.naver.base_url, "https://openapi.naver.com");
        assert_eq!(config.rating.strategy, RatingMode::Seeded);
        assert_eq!(config.rating.seed, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.search.default_radius_meters, DEFAULT_RADIUS_METERS);
        assert_eq!(config.search.geocode_concurrency, DEFAULT_GEOCODE_CONCURRENCY);
        assert_eq!(config.rating.strategy, RatingMode::Random);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SCALP_TEST_KAKAO_KEY", "secret-kakao-key");

        let toml_content = r#"
[providers.kakao]
api_key = "${SCALP_TEST_KAKAO_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.providers.kakao.api_key.as_deref(),
            Some("secret-kakao-key")
        );

        std::env::remove_var("SCALP_TEST_KAKAO_KEY");
    }

    #[test]
    fn test_config_validation() {
        let invalid_url = TomlConfig::from_toml_str(
            r#"
[providers.naver]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(invalid_url.validate().is_err());

        let too_parallel = TomlConfig::from_toml_str(
            r#"
[search]
geocode_concurrency = 32
"#,
        )
        .unwrap();
        assert!(too_parallel.validate().is_err());

        let bad_rating = TomlConfig::from_toml_str(
            r#"
[rating]
strategy = "fixed"
value = 3.2
"#,
        )
        .unwrap();
        assert!(bad_rating.validate().is_err());
    }

    #[test]
    fn test_effective_radius_is_clamped() {
        let search = TomlConfig::default().search;
        assert_eq!(search.effective_radius(None), DEFAULT_RADIUS_METERS);
        assert_eq!(search.effective_radius(Some(50_000)), 20_000);
        assert_eq!(search.effective_radius(Some(0)), 1);
    }

    #[test]
    fn test_effective_radius_with_zero_max() {
        let search = SearchConfig {
            max_radius_meters: 0,
            ..SearchConfig::default()
        };
        assert_eq!(search.effective_radius(None), 1);
        assert_eq!(search.effective_radius(Some(3000)), 1);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[search]
default_radius_meters = 10000
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.search.default_radius_meters, 10_000);
    }
}
