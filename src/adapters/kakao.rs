use crate::adapters::http::{fetch_json, join_url, probe};
use crate::config::toml_config::KakaoConfig;
use crate::core::normalize::parse_coordinates;
use crate::domain::model::{Location, ProviderKind, RawRecord};
use crate::domain::ports::{Geocoder, PlaceProvider, ProviderRequest};
use crate::utils::error::{Result, SearchError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

/// Kakao API 的半徑上限
const MAX_RADIUS_METERS: u32 = 20_000;
const PAGE_SIZE: u32 = 15;
const PROBE_QUERY: &str = "탈모";

#[derive(Debug, Deserialize)]
struct KakaoResponse {
    #[serde(default)]
    documents: Vec<KakaoDocument>,
}

#[derive(Debug, Deserialize)]
struct KakaoDocument {
    #[serde(default)]
    id: String,
    #[serde(default)]
    place_name: String,
    #[serde(default)]
    category_name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    address_name: String,
    #[serde(default)]
    road_address_name: String,
    x: Option<String>,
    y: Option<String>,
}

impl From<KakaoDocument> for RawRecord {
    fn from(doc: KakaoDocument) -> Self {
        RawRecord {
            native_id: Some(doc.id).filter(|id| !id.is_empty()),
            name: doc.place_name,
            category_text: doc.category_name,
            address: doc.address_name,
            road_address: Some(doc.road_address_name).filter(|a| !a.is_empty()),
            phone: Some(doc.phone).filter(|p| !p.is_empty()),
            x: doc.x,
            y: doc.y,
        }
    }
}

/// Kakao Local 關鍵字搜尋；座標為十進位度數字串
pub struct KakaoLocalAdapter {
    client: Client,
    config: KakaoConfig,
}

impl KakaoLocalAdapter {
    pub fn new(config: KakaoConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: KakaoConfig) -> Self {
        Self { client, config }
    }

    fn keyword_request(
        &self,
        query: &str,
        location: Option<Location>,
        radius_meters: u32,
        size: u32,
    ) -> RequestBuilder {
        let mut request = self
            .client
            .get(join_url(&self.config.base_url, &self.config.search_path))
            .query(&[("query", query.to_string()), ("size", size.to_string())]);

        if let Some(location) = location {
            request = request.query(&[
                ("x", location.longitude.to_string()),
                ("y", location.latitude.to_string()),
                ("radius", radius_meters.min(MAX_RADIUS_METERS).to_string()),
            ]);
        }

        if let Some(key) = &self.config.api_key {
            request = request.header("Authorization", format!("KakaoAK {}", key));
        }
        request
    }
}

#[async_trait]
impl PlaceProvider for KakaoLocalAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Kakao
    }

    fn coordinate_scale(&self) -> f64 {
        1.0
    }

    async fn health_check(&self) -> Result<()> {
        let request = match &self.config.health_path {
            Some(path) => self.client.get(join_url(&self.config.base_url, path)),
            None => self.keyword_request(PROBE_QUERY, None, 0, 1),
        };
        probe(ProviderKind::Kakao, request, self.config.probe_timeout()).await
    }

    async fn search(&self, request: &ProviderRequest) -> Result<Vec<RawRecord>> {
        tracing::debug!("📡 kakao: searching '{}'", request.query);
        let response: KakaoResponse = fetch_json(
            ProviderKind::Kakao,
            self.keyword_request(&request.query, request.location, request.radius_meters, PAGE_SIZE),
            self.config.search_timeout(),
        )
        .await?;

        tracing::info!("📡 kakao: {} documents for '{}'", response.documents.len(), request.query);
        Ok(response.documents.into_iter().map(RawRecord::from).collect())
    }
}

#[async_trait]
impl Geocoder for KakaoLocalAdapter {
    async fn geocode(&self, keyword: &str, bias: Option<Location>, radius_meters: u32) -> Result<Location> {
        let response: KakaoResponse = fetch_json(
            ProviderKind::Kakao,
            self.keyword_request(keyword, bias, radius_meters, 5),
            self.config.search_timeout(),
        )
        .await
        .map_err(|e| SearchError::GeocodeFailure {
            keyword: keyword.to_string(),
            message: e.to_string(),
        })?;

        response
            .documents
            .iter()
            .find_map(|doc| parse_coordinates(doc.x.as_deref(), doc.y.as_deref(), 1.0))
            .ok_or_else(|| SearchError::GeocodeFailure {
                keyword: keyword.to_string(),
                message: "no document with usable coordinates".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn adapter(server: &MockServer) -> KakaoLocalAdapter {
        KakaoLocalAdapter::new(KakaoConfig {
            base_url: server.base_url(),
            api_key: Some("test-key".to_string()),
            ..KakaoConfig::default()
        })
    }

    #[tokio::test]
    async fn search_sends_location_and_auth_header() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/local/search/keyword.json")
                .query_param("query", "탈모 피부과")
                .query_param("x", "127.0276")
                .query_param("y", "37.4979")
                .query_param("radius", "20000")
                .header("Authorization", "KakaoAK test-key");
            then.status(200).json_body(serde_json::json!({
                "documents": [{
                    "id": "26338954",
                    "place_name": "모제림의원",
                    "category_name": "의료,건강 > 병원 > 피부과",
                    "phone": "02-555-0000",
                    "address_name": "서울 강남구 역삼동 822",
                    "road_address_name": "서울 강남구 테헤란로 119",
                    "x": "127.0301",
                    "y": "37.4995"
                }],
                "meta": {"total_count": 1}
            }));
        });

        let records = adapter(&server)
            .search(&ProviderRequest {
                query: "탈모 피부과".to_string(),
                location: Some(Location::new(37.4979, 127.0276)),
                radius_meters: 50_000,
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].native_id.as_deref(), Some("26338954"));
        assert_eq!(records[0].road_address.as_deref(), Some("서울 강남구 테헤란로 119"));
        assert_eq!(records[0].x.as_deref(), Some("127.0301"));
    }

    #[tokio::test]
    async fn health_check_uses_configured_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200);
        });

        let adapter = KakaoLocalAdapter::new(KakaoConfig {
            base_url: server.base_url(),
            health_path: Some("/health".to_string()),
            ..KakaoConfig::default()
        });

        assert!(adapter.health_check().await.is_ok());
        mock.assert();
    }

    #[tokio::test]
    async fn geocode_takes_first_usable_document() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/v2/local/search/keyword.json")
                .query_param("query", "서울 강남구 테헤란로 119");
            then.status(200).json_body(serde_json::json!({
                "documents": [
                    {"place_name": "bad", "x": "0", "y": "0"},
                    {"place_name": "good", "x": "127.0301", "y": "37.4995"}
                ]
            }));
        });

        let location = adapter(&server)
            .geocode("서울 강남구 테헤란로 119", None, 5000)
            .await
            .unwrap();
        assert_eq!(location, Location::new(37.4995, 127.0301));
    }

    #[tokio::test]
    async fn geocode_without_documents_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/local/search/keyword.json");
            then.status(200).json_body(serde_json::json!({"documents": []}));
        });

        let result = adapter(&server).geocode("없는 주소", None, 5000).await;
        assert!(matches!(result, Err(SearchError::GeocodeFailure { .. })));
    }
}
