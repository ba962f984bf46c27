use crate::domain::model::ProviderKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Provider {provider} unavailable: {message}")]
    ProviderUnavailable {
        provider: ProviderKind,
        message: String,
    },

    #[error("Provider {provider} timed out after {timeout_secs}s")]
    ProviderTimeout {
        provider: ProviderKind,
        timeout_secs: u64,
    },

    #[error("Provider {provider} returned a malformed response: {message}")]
    ProviderMalformedResponse {
        provider: ProviderKind,
        message: String,
    },

    #[error("Geocoding failed for '{keyword}': {message}")]
    GeocodeFailure { keyword: String, message: String },

    #[error("No usable results after filtering")]
    NoUsableResults,

    #[error("Search was cancelled")]
    Cancelled,

    #[error("Fallback catalog error: {message}")]
    CatalogError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl SearchError {
    /// 上游供應商造成的錯誤（健康檢查或搜尋失敗）
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            SearchError::ProviderUnavailable { .. }
                | SearchError::ProviderTimeout { .. }
                | SearchError::ProviderMalformedResponse { .. }
        )
    }

    pub fn provider(&self) -> Option<ProviderKind> {
        match self {
            SearchError::ProviderUnavailable { provider, .. }
            | SearchError::ProviderTimeout { provider, .. }
            | SearchError::ProviderMalformedResponse { provider, .. } => Some(*provider),
            _ => None,
        }
    }

    /// 給 CLI 使用者的修正建議
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SearchError::ProviderUnavailable { .. } | SearchError::ProviderTimeout { .. } => {
                "Check network connectivity and provider credentials"
            }
            SearchError::ProviderMalformedResponse { .. } => "Verify the provider base_url points at the real API",
            SearchError::GeocodeFailure { .. } => "Try a more specific address",
            SearchError::CatalogError { .. } | SearchError::SerializationError(_) => {
                "Check the fallback catalog JSON file"
            }
            SearchError::ConfigError { .. }
            | SearchError::InvalidConfigValueError { .. } => "Review the TOML configuration and CLI flags",
            SearchError::IoError(_) => "Check that the file exists and is readable",
            SearchError::NoUsableResults | SearchError::Cancelled => "Retry the search",
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failures_are_classified() {
        let timeout = SearchError::ProviderTimeout {
            provider: ProviderKind::Naver,
            timeout_secs: 12,
        };
        assert!(timeout.is_provider_failure());
        assert_eq!(timeout.provider(), Some(ProviderKind::Naver));
        assert_eq!(timeout.to_string(), "Provider naver timed out after 12s");

        let geocode = SearchError::GeocodeFailure {
            keyword: "강남역".to_string(),
            message: "no documents".to_string(),
        };
        assert!(!geocode.is_provider_failure());
        assert_eq!(geocode.provider(), None);
        assert!(!SearchError::NoUsableResults.is_provider_failure());
    }
}
