use crate::core::distance::format_distance;
use crate::domain::model::{Distance, HealthState, Place, SearchOutcome};
use crate::utils::error::{Result, SearchError};
use serde::Serialize;

/// CSV 一列；專長標籤以「|」串接
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    address: &'a str,
    road_address: &'a str,
    phone: &'a str,
    specialties: String,
    rating: f64,
    latitude: Option<f64>,
    longitude: Option<f64>,
    distance_meters: Option<f64>,
    recommended: bool,
    source: &'a str,
}

impl<'a> From<&'a Place> for CsvRow<'a> {
    fn from(place: &'a Place) -> Self {
        Self {
            id: &place.id,
            name: &place.name,
            category: place.category.label(),
            address: &place.address,
            road_address: place.road_address.as_deref().unwrap_or(""),
            phone: &place.phone,
            specialties: place.specialties.join("|"),
            rating: place.rating,
            latitude: place.latitude,
            longitude: place.longitude,
            distance_meters: place.distance_meters().map(f64::round),
            recommended: place.is_recommended,
            source: place.source.as_str(),
        }
    }
}

fn distance_label(distance: Distance) -> String {
    match distance {
        Distance::Known(meters) => format_distance(meters),
        Distance::Unknown => "거리 미상".to_string(),
        Distance::NotRequested => "-".to_string(),
    }
}

pub fn render_table(outcome: &SearchOutcome) -> String {
    let mut lines = Vec::new();

    if outcome.cancelled {
        lines.push("🛑 검색이 취소되었습니다".to_string());
        return lines.join("\n");
    }
    if outcome.state != HealthState::Healthy || outcome.approximate {
        lines.push(format!(
            "⚠️ 일부 결과는 저장된 목록에서 제공됩니다 (상태: {:?})",
            outcome.state
        ));
    }
    if outcome.places.is_empty() {
        lines.push("검색 결과가 없습니다".to_string());
        return lines.join("\n");
    }

    for (index, place) in outcome.places.iter().enumerate() {
        let marker = if place.is_recommended { " 👍" } else { "" };
        lines.push(format!(
            "{:>2}. {} [{}] {} ★{:.1}{}",
            index + 1,
            place.name,
            place.category,
            distance_label(place.distance),
            place.rating,
            marker
        ));
        lines.push(format!(
            "    {} | {}",
            place.road_address.as_deref().unwrap_or(&place.address),
            place.phone
        ));
        if !place.specialties.is_empty() {
            lines.push(format!("    #{}", place.specialties.join(" #")));
        }
    }
    lines.join("\n")
}

pub fn render_json(outcome: &SearchOutcome) -> Result<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

pub fn render_csv(places: &[Place]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for place in places {
        writer
            .serialize(CsvRow::from(place))
            .map_err(|e| SearchError::ConfigError {
                message: format!("CSV serialization failed: {}", e),
            })?;
    }

    let bytes = writer.into_inner().map_err(|e| SearchError::ConfigError {
        message: format!("CSV flush failed: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| SearchError::ConfigError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}
