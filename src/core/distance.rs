use crate::domain::model::{Distance, Location, Place};
use std::cmp::Ordering;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine 大圓距離（公尺）
pub fn haversine_distance(a: Location, b: Location) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// 1000m 未滿顯示公尺，以上顯示一位小數公里
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round() as u64)
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}

pub fn assign_distance(place: &mut Place, origin: Option<Location>) {
    place.distance = match (origin, place.coordinates()) {
        (None, _) => Distance::NotRequested,
        (Some(origin), Some(coordinates)) => Distance::Known(haversine_distance(origin, coordinates)),
        (Some(_), None) => Distance::Unknown,
    };
}

fn by_distance(a: &Place, b: &Place) -> Ordering {
    match (a.distance, b.distance) {
        (Distance::Known(x), Distance::Known(y)) => x.total_cmp(&y),
        (Distance::Known(_), _) => Ordering::Less,
        (_, Distance::Known(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// 計算距離、過濾半徑並由近到遠排序。
///
/// 座標未知的地點不參與半徑過濾，排在所有已知距離之後；
/// 沒有呼叫者位置時保持原順序。
pub fn rank(mut places: Vec<Place>, origin: Option<Location>, radius_meters: u32) -> Vec<Place> {
    for place in &mut places {
        assign_distance(place, origin);
    }

    if origin.is_none() {
        return places;
    }

    let radius = f64::from(radius_meters);
    places.retain(|p| match p.distance {
        Distance::Known(meters) => meters <= radius,
        _ => true,
    });
    places.sort_by(by_distance);
    places
}
