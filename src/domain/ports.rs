use crate::domain::model::{Category, Location, Place, ProviderKind, RawRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 送往供應商的搜尋請求
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub query: String,
    pub location: Option<Location>,
    pub radius_meters: u32,
}

#[async_trait]
pub trait PlaceProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// 座標字串轉換為度數時使用的倍率
    fn coordinate_scale(&self) -> f64;

    async fn health_check(&self) -> Result<()>;

    async fn search(&self, request: &ProviderRequest) -> Result<Vec<RawRecord>>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(
        &self,
        keyword: &str,
        bias: Option<Location>,
        radius_meters: u32,
    ) -> Result<Location>;
}

pub trait RatingStrategy: Send + Sync {
    fn rating(&self) -> f64;
}

/// 去重比對鍵；相同鍵視為同一地點
pub trait DedupStrategy: Send + Sync {
    fn key(&self, place: &Place) -> String;
}

pub trait RecommendationPolicy {
    fn is_recommended(&self, category: Category) -> bool;
}
