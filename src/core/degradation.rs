use crate::adapters::catalog::StaticCatalog;
use crate::core::dedup::deduplicate;
use crate::core::distance::rank;
use crate::domain::model::{Category, HealthState, Location, Place};
use crate::domain::ports::{DedupStrategy, PlaceProvider};
use crate::utils::error::SearchError;
use futures::future::join_all;
use std::sync::Arc;

/// 每次搜尋重新檢查的健康狀態；不保留跨呼叫記憶
pub fn assess(probe_results: &[bool]) -> HealthState {
    let healthy = probe_results.iter().filter(|ok| **ok).count();
    if healthy == probe_results.len() && healthy > 0 {
        HealthState::Healthy
    } else if healthy == 0 {
        HealthState::Unavailable
    } else {
        HealthState::Degraded
    }
}

/// 即時管線的結果為何需要靜態目錄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// 直接使用即時結果
    None,
    /// 即時結果太少，附加靜態目錄
    Augment,
    /// 完全以靜態目錄取代
    Substitute,
}

pub struct DegradationController {
    catalog: Arc<StaticCatalog>,
    min_live_results: usize,
}

impl DegradationController {
    pub fn new(catalog: Arc<StaticCatalog>, min_live_results: usize) -> Self {
        Self {
            catalog,
            min_live_results: min_live_results.max(1),
        }
    }

    /// 同時檢查所有供應商
    pub async fn probe(&self, providers: &[Arc<dyn PlaceProvider>]) -> HealthState {
        let results = join_all(providers.iter().map(|provider| async move {
            match provider.health_check().await {
                Ok(()) => true,
                Err(e) => {
                    let kind = e.provider().unwrap_or_else(|| provider.kind());
                    tracing::warn!("🩺 {} health probe failed: {}", kind, e);
                    false
                }
            }
        }))
        .await;

        let state = assess(&results);
        tracing::info!("🩺 Provider health: {:?} ({:?})", state, results);
        state
    }

    pub fn decide(&self, raw_record_count: usize, live_results: usize) -> Fallback {
        if raw_record_count == 0 || live_results == 0 {
            tracing::warn!(
                "⚠️ {} (raw records: {}, usable: {})",
                SearchError::NoUsableResults,
                raw_record_count,
                live_results
            );
            Fallback::Substitute
        } else if live_results < self.min_live_results {
            Fallback::Augment
        } else {
            Fallback::None
        }
    }

    /// 依意圖過濾、依位置排序的靜態目錄結果
    pub fn catalog_places(
        &self,
        intent: Option<Category>,
        origin: Option<Location>,
        radius_meters: u32,
    ) -> Vec<Place> {
        let places = self.catalog.places_for(intent);
        tracing::info!(
            "📚 Using {} catalog entries for intent {:?}",
            places.len(),
            intent
        );
        rank(places, origin, radius_meters)
    }

    /// 即時結果在前，靜態目錄在後，再重新去重排序
    pub fn augment(
        &self,
        live: Vec<Place>,
        intent: Option<Category>,
        origin: Option<Location>,
        radius_meters: u32,
        strategy: &dyn DedupStrategy,
    ) -> Vec<Place> {
        let mut combined = live;
        combined.extend(self.catalog.places_for(intent));
        rank(deduplicate(combined, strategy), origin, radius_meters)
    }
}
