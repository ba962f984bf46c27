use crate::adapters::http::{fetch_json, join_url, probe};
use crate::config::toml_config::NaverConfig;
use crate::domain::model::{ProviderKind, RawRecord};
use crate::domain::ports::{PlaceProvider, ProviderRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

/// mapx/mapy 為 WGS84 度數乘上 10^7 的整數字串
pub const NAVER_COORDINATE_SCALE: f64 = 1e-7;

/// Naver 地區搜尋一次最多回傳 5 筆
const DISPLAY: u32 = 5;
const PROBE_QUERY: &str = "탈모";

#[derive(Debug, Deserialize)]
struct NaverResponse {
    #[serde(default)]
    items: Vec<NaverItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NaverItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    telephone: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    road_address: String,
    mapx: Option<String>,
    mapy: Option<String>,
}

impl From<NaverItem> for RawRecord {
    fn from(item: NaverItem) -> Self {
        RawRecord {
            native_id: None,
            name: item.title,
            category_text: item.category,
            address: item.address,
            road_address: Some(item.road_address).filter(|a| !a.is_empty()),
            phone: Some(item.telephone).filter(|p| !p.is_empty()),
            x: item.mapx,
            y: item.mapy,
        }
    }
}

/// Naver 地區搜尋；不接受位置參數，也不提供原生 id
pub struct NaverLocalAdapter {
    client: Client,
    config: NaverConfig,
}

impl NaverLocalAdapter {
    pub fn new(config: NaverConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: NaverConfig) -> Self {
        Self { client, config }
    }

    fn local_request(&self, query: &str, display: u32) -> RequestBuilder {
        let mut request = self
            .client
            .get(join_url(&self.config.base_url, &self.config.search_path))
            .query(&[("query", query.to_string()), ("display", display.to_string())]);

        if let Some(id) = &self.config.client_id {
            request = request.header("X-Naver-Client-Id", id);
        }
        if let Some(secret) = &self.config.client_secret {
            request = request.header("X-Naver-Client-Secret", secret);
        }
        request
    }
}

#[async_trait]
impl PlaceProvider for NaverLocalAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Naver
    }

    fn coordinate_scale(&self) -> f64 {
        NAVER_COORDINATE_SCALE
    }

    async fn health_check(&self) -> Result<()> {
        let request = match &self.config.health_path {
            Some(path) => self.client.get(join_url(&self.config.base_url, path)),
            None => self.local_request(PROBE_QUERY, 1),
        };
        probe(ProviderKind::Naver, request, self.config.probe_timeout()).await
    }

    async fn search(&self, request: &ProviderRequest) -> Result<Vec<RawRecord>> {
        tracing::debug!("📡 naver: searching '{}'", request.query);
        let response: NaverResponse = fetch_json(
            ProviderKind::Naver,
            self.local_request(&request.query, DISPLAY),
            self.config.search_timeout(),
        )
        .await?;

        tracing::info!("📡 naver: {} items for '{}'", response.items.len(), request.query);
        Ok(response.items.into_iter().map(RawRecord::from).collect())
    }
}
