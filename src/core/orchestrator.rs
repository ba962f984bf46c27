use crate::adapters::{KakaoLocalAdapter, NaverLocalAdapter, StaticCatalog};
use crate::config::toml_config::{RatingMode, SearchConfig, TomlConfig};
use crate::core::classify::classify;
use crate::core::dedup::{deduplicate, ensure_unique_ids, ExactMatch};
use crate::core::degradation::{DegradationController, Fallback};
use crate::core::distance::rank;
use crate::core::geocode::GeocodeResolver;
use crate::core::normalize::normalize_record;
use crate::core::query::{normalize_query, NormalizedQuery};
use crate::core::rating::{FixedRating, RandomRating, SeededRating};
use crate::domain::model::{HealthState, Location, Place, ProviderKind, RawRecord, SearchOutcome, SearchQuery};
use crate::domain::ports::{DedupStrategy, Geocoder, PlaceProvider, ProviderRequest, RatingStrategy};
use crate::utils::error::{Result, SearchError};
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;
use tracing::Level;

struct ProviderOutcome {
    kind: ProviderKind,
    scale: f64,
    result: Result<Vec<RawRecord>>,
}

/// 串接查詢正規化、供應商搜尋、分類、座標修補、去重、距離排序與降級。
///
/// `search_places` 不會回傳錯誤：所有失敗都轉為較少或來自靜態目錄的結果。
pub struct SearchOrchestrator {
    providers: Vec<Arc<dyn PlaceProvider>>,
    resolver: GeocodeResolver,
    controller: DegradationController,
    rating: Arc<dyn RatingStrategy>,
    dedup: Arc<dyn DedupStrategy>,
    settings: SearchConfig,
}

impl SearchOrchestrator {
    pub fn new(
        providers: Vec<Arc<dyn PlaceProvider>>,
        geocoder: Arc<dyn Geocoder>,
        catalog: Arc<StaticCatalog>,
        settings: SearchConfig,
    ) -> Self {
        Self {
            providers,
            resolver: GeocodeResolver::new(geocoder, settings.geocode_concurrency),
            controller: DegradationController::new(catalog, settings.min_live_results),
            rating: Arc::new(RandomRating::new()),
            dedup: Arc::new(ExactMatch),
            settings,
        }
    }

    /// 依配置建立 Kakao、Naver 兩個供應商與靜態目錄
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| SearchError::ConfigError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        let kakao = Arc::new(KakaoLocalAdapter::with_client(
            client.clone(),
            config.providers.kakao.clone(),
        ));
        let naver = Arc::new(NaverLocalAdapter::with_client(
            client,
            config.providers.naver.clone(),
        ));

        let catalog = match &config.catalog.path {
            Some(path) => StaticCatalog::from_path(path)?,
            None => StaticCatalog::embedded()?,
        };

        let rating: Arc<dyn RatingStrategy> = match config.rating.strategy {
            RatingMode::Random => Arc::new(RandomRating::new()),
            RatingMode::Fixed => Arc::new(FixedRating(config.rating.value)),
            RatingMode::Seeded => Arc::new(SeededRating::new(config.rating.seed)),
        };

        let providers: Vec<Arc<dyn PlaceProvider>> = vec![kakao.clone(), naver];
        Ok(Self::new(providers, kakao, Arc::new(catalog), config.search.clone()).with_rating(rating))
    }

    pub fn with_rating(mut self, rating: Arc<dyn RatingStrategy>) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_dedup_strategy(mut self, dedup: Arc<dyn DedupStrategy>) -> Self {
        self.dedup = dedup;
        self
    }

    /// 對外主要介面
    pub async fn search_places(
        &self,
        query: &str,
        location: Option<Location>,
        radius_meters: Option<u32>,
    ) -> SearchOutcome {
        self.search_places_with_cancel(query, location, radius_meters, CancellationToken::new())
            .await
    }

    /// 與 `search_places` 相同，但 token 觸發時會放棄進行中的供應商與地理編碼請求
    pub async fn search_places_with_cancel(
        &self,
        query: &str,
        location: Option<Location>,
        radius_meters: Option<u32>,
        cancel: CancellationToken,
    ) -> SearchOutcome {
        let radius = self.settings.effective_radius(radius_meters);
        let mut search_query = SearchQuery::new(query).with_radius(radius);
        if let Some(location) = location.filter(|l| l.latitude.is_finite() && l.longitude.is_finite()) {
            search_query = search_query.with_location(location);
        }
        self.run(&search_query, &cancel).await
    }

    async fn run(&self, query: &SearchQuery, cancel: &CancellationToken) -> SearchOutcome {
        let normalized = normalize_query(&query.text);
        tracing::info!(
            "🔍 Searching '{}' (intent: {:?}, radius: {}m, location: {})",
            query.text,
            normalized.category,
            query.radius_meters,
            query.location.is_some()
        );

        let state = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Self::cancelled(HealthState::Unavailable),
            state = self.controller.probe(&self.providers) => state,
        };

        if state != HealthState::Healthy {
            tracing::warn!("⚠️ Providers {:?}, skipping live search", state);
            return self.fallback(state, &normalized, query);
        }

        let outcomes = self.fetch_all(&normalized, query, cancel).await;
        if cancel.is_cancelled() {
            return Self::cancelled(state);
        }

        let (raw_count, candidates) = Self::collect_candidates(outcomes, &normalized, query, self.rating.as_ref());
        if raw_count == 0 {
            tracing::warn!("⚠️ Both providers returned zero records");
            return self.fallback(HealthState::Degraded, &normalized, query);
        }

        let resolved = self
            .resolver
            .resolve_all(candidates, query.location, query.radius_meters, cancel)
            .await;
        if cancel.is_cancelled() {
            return Self::cancelled(state);
        }

        let unique = deduplicate(resolved, self.dedup.as_ref());
        let mut places = rank(unique, query.location, query.radius_meters);

        let approximate = match self.controller.decide(raw_count, places.len()) {
            Fallback::Substitute => {
                return self.fallback(HealthState::Degraded, &normalized, query);
            }
            Fallback::Augment => {
                tracing::info!("📚 Only {} live results, augmenting with catalog", places.len());
                places = self.controller.augment(
                    places,
                    normalized.category,
                    query.location,
                    query.radius_meters,
                    self.dedup.as_ref(),
                );
                true
            }
            Fallback::None => false,
        };

        ensure_unique_ids(&mut places);
        tracing::info!("✅ Returning {} places for '{}'", places.len(), query.text);
        SearchOutcome {
            places,
            state,
            approximate,
            cancelled: false,
        }
    }

    /// 同時呼叫所有供應商；各自獨立的 task，一方失敗不影響另一方
    async fn fetch_all(
        &self,
        normalized: &NormalizedQuery,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Vec<ProviderOutcome> {
        let request = ProviderRequest {
            query: normalized.provider_query.clone(),
            location: query.location,
            radius_meters: query.radius_meters,
        };

        let handles = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            let request = request.clone();
            let token = cancel.child_token();
            AbortOnDropHandle::new(tokio::spawn(async move {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(SearchError::Cancelled),
                    result = provider.search(&request) => result,
                }
            }))
        });

        let joined = join_all(handles).await;

        self.providers
            .iter()
            .zip(joined)
            .map(|(provider, joined)| {
                let kind = provider.kind();
                let result = joined.unwrap_or_else(|e| {
                    Err(SearchError::ProviderUnavailable {
                        provider: kind,
                        message: format!("search task failed: {}", e),
                    })
                });
                if let Err(e) = &result {
                    log_search_failure(kind, e);
                }
                ProviderOutcome {
                    kind,
                    scale: provider.coordinate_scale(),
                    result,
                }
            })
            .collect()
    }

    fn collect_candidates(
        outcomes: Vec<ProviderOutcome>,
        normalized: &NormalizedQuery,
        query: &SearchQuery,
        rating: &dyn RatingStrategy,
    ) -> (usize, Vec<Place>) {
        let mut raw_count = 0;
        let mut candidates = Vec::new();

        for outcome in outcomes {
            let Ok(records) = outcome.result else {
                continue;
            };
            raw_count += records.len();

            let before = candidates.len();
            for record in &records {
                match classify(record, normalized.category, &query.text) {
                    Some(category) => candidates.push(normalize_record(
                        outcome.kind,
                        outcome.scale,
                        record,
                        category,
                        rating,
                    )),
                    None => tracing::debug!("🚫 {}: excluded '{}'", outcome.kind, record.name),
                }
            }
            tracing::debug!(
                "{}: kept {} of {} records",
                outcome.kind,
                candidates.len() - before,
                records.len()
            );
        }

        (raw_count, candidates)
    }

    fn fallback(&self, state: HealthState, normalized: &NormalizedQuery, query: &SearchQuery) -> SearchOutcome {
        let mut places = self
            .controller
            .catalog_places(normalized.category, query.location, query.radius_meters);
        ensure_unique_ids(&mut places);
        SearchOutcome {
            places,
            state,
            approximate: true,
            cancelled: false,
        }
    }

    fn cancelled(state: HealthState) -> SearchOutcome {
        tracing::info!("🛑 Search cancelled");
        SearchOutcome {
            places: Vec::new(),
            state,
            approximate: false,
            cancelled: true,
        }
    }
}

/// 取消不算失敗，由 `cancelled` 以 info 記錄
fn failure_log_level(error: &SearchError) -> Option<Level> {
    match error {
        SearchError::Cancelled => None,
        e if e.is_provider_failure() => Some(Level::WARN),
        _ => Some(Level::ERROR),
    }
}

fn log_search_failure(kind: ProviderKind, error: &SearchError) {
    match failure_log_level(error) {
        Some(level) if level == Level::WARN => tracing::warn!("⚠️ {} search failed: {}", kind, error),
        Some(_) => tracing::error!("❌ {} search error: {}", kind, error),
        None => tracing::debug!("{} search abandoned", kind),
    }
}
