use crate::core::distance::assign_distance;
use crate::domain::model::{Location, Place};
use crate::domain::ports::Geocoder;
use crate::utils::error::{Result, SearchError};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_GEOCODE_CONCURRENCY: usize = 4;

/// 為座標缺失或無效的候選地點補上座標
pub struct GeocodeResolver {
    geocoder: Arc<dyn Geocoder>,
    concurrency: usize,
}

impl GeocodeResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, concurrency: usize) -> Self {
        Self {
            geocoder,
            concurrency: concurrency.max(1),
        }
    }

    /// 依序嘗試道路地址、地址、名稱
    fn keywords(place: &Place) -> Vec<String> {
        [
            place.road_address.as_deref(),
            Some(place.address.as_str()),
            Some(place.name.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
    }

    async fn lookup(&self, place: &Place, bias: Option<Location>, radius_meters: u32) -> Result<Location> {
        let mut last_error = SearchError::GeocodeFailure {
            keyword: place.name.clone(),
            message: "no lookup keyword".to_string(),
        };

        for keyword in Self::keywords(place) {
            match self.geocoder.geocode(&keyword, bias, radius_meters).await {
                Ok(location) if location.is_usable() => return Ok(location),
                Ok(location) => {
                    last_error = SearchError::GeocodeFailure {
                        keyword,
                        message: format!(
                            "result ({}, {}) outside bounding box",
                            location.latitude, location.longitude
                        ),
                    };
                }
                Err(e) => last_error = e,
            }
        }
        Err(last_error)
    }

    async fn repair(
        &self,
        mut place: Place,
        bias: Option<Location>,
        radius_meters: u32,
        cancel: &CancellationToken,
    ) -> Place {
        if place.coordinates().is_some() {
            return place;
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SearchError::Cancelled),
            result = self.lookup(&place, bias, radius_meters) => result,
        };

        match outcome {
            Ok(location) => {
                tracing::debug!(
                    "📍 Geocoded '{}' to ({:.5}, {:.5})",
                    place.name,
                    location.latitude,
                    location.longitude
                );
                place.set_coordinates(location);
                assign_distance(&mut place, bias);
            }
            Err(e) => {
                tracing::warn!("📍 Geocode failed for '{}': {}", place.name, e);
                // 無效座標清空，距離視為未知
                place.latitude = None;
                place.longitude = None;
                assign_distance(&mut place, bias);
            }
        }
        place
    }

    /// 以有限並行度修補座標，保持輸入順序
    pub async fn resolve_all(
        &self,
        places: Vec<Place>,
        bias: Option<Location>,
        radius_meters: u32,
        cancel: &CancellationToken,
    ) -> Vec<Place> {
        let pending = places.iter().filter(|p| p.coordinates().is_none()).count();
        if pending == 0 {
            return places;
        }
        tracing::info!(
            "📍 Resolving coordinates for {} places (concurrency {})",
            pending,
            self.concurrency
        );

        stream::iter(places)
            .map(|place| self.repair(place, bias, radius_meters, cancel))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
