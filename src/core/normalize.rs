use crate::core::classify::derive_specialties;
use crate::domain::model::{Category, Distance, Location, Place, ProviderKind, RawRecord, NO_PHONE};
use crate::domain::ports::RatingStrategy;
use regex::Regex;
use std::sync::LazyLock;

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid markup regex"));

/// 移除供應商標記（例如 `<b>`）與常見 HTML 實體
pub fn strip_markup(text: &str) -> String {
    MARKUP
        .replace_all(text, "")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .trim()
        .to_string()
}

/// 依供應商倍率解析座標；無法解析或超出邊界框時回傳 None
pub fn parse_coordinates(x: Option<&str>, y: Option<&str>, scale: f64) -> Option<Location> {
    let lon = x?.trim().parse::<f64>().ok()? * scale;
    let lat = y?.trim().parse::<f64>().ok()? * scale;
    let location = Location::new(lat, lon);
    location.is_usable().then_some(location)
}

fn slug(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

pub fn synthesize_id(provider: ProviderKind, native_id: Option<&str>, name: &str) -> String {
    match native_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!("{}-{}", provider, id),
        None => format!("{}-{}", provider, slug(name)),
    }
}

/// 將單筆原始資料轉為候選地點；類別由 CategoryFilter 事先決定
pub fn normalize_record(
    provider: ProviderKind,
    scale: f64,
    record: &RawRecord,
    category: Category,
    rating: &dyn RatingStrategy,
) -> Place {
    let name = strip_markup(&record.name);
    let coordinates = parse_coordinates(record.x.as_deref(), record.y.as_deref(), scale);
    if coordinates.is_none() {
        tracing::debug!(
            "📍 {}: '{}' has unusable coordinates ({:?}, {:?})",
            provider,
            name,
            record.x,
            record.y
        );
    }

    let phone = record
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(NO_PHONE)
        .to_string();

    let road_address = record
        .road_address
        .as_deref()
        .map(strip_markup)
        .filter(|a| !a.is_empty());

    let specialties = derive_specialties(category, &format!("{} {}", name, record.category_text));

    Place {
        id: synthesize_id(provider, record.native_id.as_deref(), &name),
        address: strip_markup(&record.address),
        road_address,
        phone,
        category,
        specialties,
        rating: rating.rating(),
        latitude: coordinates.map(|c| c.latitude),
        longitude: coordinates.map(|c| c.longitude),
        distance: Distance::NotRequested,
        is_recommended: false,
        source: provider,
        name,
    }
}
