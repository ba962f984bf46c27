use crate::domain::model::Place;
use crate::domain::ports::DedupStrategy;
use std::collections::{HashMap, HashSet};

/// 名稱與地址去除前後空白後完全相同才視為重複
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl DedupStrategy for ExactMatch {
    fn key(&self, place: &Place) -> String {
        format!("{}\u{1f}{}", place.name.trim(), place.address.trim())
    }
}

/// 忽略大小寫與所有空白的比對；較寬鬆，可能誤合併
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactMatch;

impl DedupStrategy for CompactMatch {
    fn key(&self, place: &Place) -> String {
        let compact = |s: &str| -> String {
            s.chars()
                .filter(|c| !c.is_whitespace())
                .flat_map(char::to_lowercase)
                .collect()
        };
        format!("{}\u{1f}{}", compact(&place.name), compact(&place.address))
    }
}

/// 先出現者保留，不做欄位合併
pub fn deduplicate(places: Vec<Place>, strategy: &dyn DedupStrategy) -> Vec<Place> {
    let before = places.len();
    let mut seen = HashSet::new();
    let unique: Vec<Place> = places
        .into_iter()
        .filter(|place| seen.insert(strategy.key(place)))
        .collect();

    if unique.len() < before {
        tracing::debug!("🧹 Removed {} duplicate places", before - unique.len());
    }
    unique
}

/// 合成 id 衝突時依序加上 -2、-3 後綴
pub fn ensure_unique_ids(places: &mut [Place]) {
    let mut taken: HashSet<String> = places.iter().map(|p| p.id.clone()).collect();
    let mut seen: HashMap<String, u32> = HashMap::new();

    for place in places.iter_mut() {
        let count = seen.entry(place.id.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            continue;
        }

        let mut suffix = *count;
        let mut candidate = format!("{}-{}", place.id, suffix);
        while taken.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}-{}", place.id, suffix);
        }
        taken.insert(candidate.clone());
        place.id = candidate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Category, Distance, ProviderKind};

    fn place(id: &str, name: &str, address: &str, source: ProviderKind) -> Place {
        Place {
            id: id.to_string(),
            name: name.to_string(),
            address: address.to_string(),
            road_address: None,
            phone: "02-000-0000".to_string(),
            category: Category::HospitalClinic,
            specialties: vec!["탈모치료".to_string()],
            rating: 4.5,
            latitude: None,
            longitude: None,
            distance: Distance::NotRequested,
            is_recommended: false,
            source,
        }
    }

    #[test]
    fn first_seen_record_wins() {
        let places = vec![
            place("kakao-1", "모제림의원", "서울 강남구 역삼동 1", ProviderKind::Kakao),
            place("naver-모제림의원", " 모제림의원 ", "서울 강남구 역삼동 1 ", ProviderKind::Naver),
            place("naver-2", "모제림의원", "서울 서초구 서초동 2", ProviderKind::Naver),
        ];

        let unique = deduplicate(places, &ExactMatch);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].source, ProviderKind::Kakao);
        assert_eq!(unique[1].id, "naver-2");
    }

    #[test]
    fn exact_match_keeps_near_duplicates() {
        let places = vec![
            place("a", "모제림의원", "서울 강남구 역삼동 1", ProviderKind::Kakao),
            place("b", "모제림 의원", "서울 강남구 역삼동 1", ProviderKind::Naver),
        ];
        assert_eq!(deduplicate(places.clone(), &ExactMatch).len(), 2);
        assert_eq!(deduplicate(places, &CompactMatch).len(), 1);
    }

    #[test]
    fn colliding_ids_get_suffixes() {
        let mut places = vec![
            place("naver-x", "x", "1", ProviderKind::Naver),
            place("naver-x", "x", "2", ProviderKind::Naver),
            place("naver-x-2", "y", "3", ProviderKind::Naver),
            place("naver-x", "x", "4", ProviderKind::Naver),
        ];
        ensure_unique_ids(&mut places);
        let ids: Vec<&str> = places.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["naver-x", "naver-x-3", "naver-x-2", "naver-x-4"]);
    }
}
