use serde::{Deserialize, Serialize};
use std::fmt;

/// 預設搜尋半徑（公尺）
pub const DEFAULT_RADIUS_METERS: u32 = 5000;

/// 沒有電話資料時顯示的字串
pub const NO_PHONE: &str = "전화번호 없음";

// 韓半島邊界框
const KOREA_LAT_RANGE: (f64, f64) = (33.0, 39.0);
const KOREA_LON_RANGE: (f64, f64) = (124.0, 132.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "탈모병원")]
    HospitalClinic,
    #[serde(rename = "탈모미용실")]
    SpecialtySalon,
    #[serde(rename = "가발전문점")]
    WigShop,
    #[serde(rename = "두피문신")]
    ScalpTattooStudio,
    #[serde(rename = "기타")]
    Other,
}

impl Category {
    pub const DOMAIN: [Category; 4] = [
        Category::HospitalClinic,
        Category::SpecialtySalon,
        Category::WigShop,
        Category::ScalpTattooStudio,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::HospitalClinic => "탈모병원",
            Category::SpecialtySalon => "탈모미용실",
            Category::WigShop => "가발전문점",
            Category::ScalpTattooStudio => "두피문신",
            Category::Other => "기타",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Kakao,
    Naver,
    Catalog,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Kakao => "kakao",
            ProviderKind::Naver => "naver",
            ProviderKind::Catalog => "catalog",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// 座標必須是有限值且落在韓半島邊界框內
    pub fn is_usable(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (KOREA_LAT_RANGE.0..=KOREA_LAT_RANGE.1).contains(&self.latitude)
            && (KOREA_LON_RANGE.0..=KOREA_LON_RANGE.1).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub location: Option<Location>,
    pub radius_meters: u32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: None,
            radius_meters: DEFAULT_RADIUS_METERS,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_radius(mut self, radius_meters: u32) -> Self {
        self.radius_meters = radius_meters;
        self
    }
}

/// 供應商原始資料，座標保留原始字串交由正規化處理
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub native_id: Option<String>,
    pub name: String,
    pub category_text: String,
    pub address: String,
    pub road_address: Option<String>,
    pub phone: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
}

/// 與呼叫者之間的距離
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "meters", rename_all = "snake_case")]
pub enum Distance {
    /// 呼叫者沒有提供位置
    NotRequested,
    Known(f64),
    /// 座標無法解析
    Unknown,
}

impl Distance {
    pub fn meters(self) -> Option<f64> {
        match self {
            Distance::Known(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub address: String,
    pub road_address: Option<String>,
    pub phone: String,
    pub category: Category,
    pub specialties: Vec<String>,
    pub rating: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance: Distance,
    pub is_recommended: bool,
    pub source: ProviderKind,
}

impl Place {
    /// 可用的座標；超出邊界框的視為無效
    pub fn coordinates(&self) -> Option<Location> {
        let location = Location::new(self.latitude?, self.longitude?);
        location.is_usable().then_some(location)
    }

    pub fn set_coordinates(&mut self, location: Location) {
        self.latitude = Some(location.latitude);
        self.longitude = Some(location.longitude);
    }

    pub fn distance_meters(&self) -> Option<f64> {
        self.distance.meters()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
    Unavailable,
}

/// `search_places` 的回傳值，永遠不含錯誤
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub places: Vec<Place>,
    pub state: HealthState,
    /// 結果含靜態目錄資料時為 true
    pub approximate: bool,
    pub cancelled: bool,
}

impl SearchOutcome {
    pub fn into_places(self) -> Vec<Place> {
        self.places
    }
}
