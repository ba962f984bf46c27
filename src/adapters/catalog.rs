use crate::core::classify::derive_specialties;
use crate::core::rating::{MAX_RATING, MIN_RATING};
use crate::domain::model::{Category, Distance, Place, ProviderKind, NO_PHONE};
use crate::utils::error::{Result, SearchError};
use serde::Deserialize;
use std::path::Path;

const EMBEDDED_CATALOG: &str = include_str!("../../data/fallback_places.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    name: String,
    address: String,
    road_address: Option<String>,
    phone: Option<String>,
    category: Category,
    #[serde(default)]
    specialties: Vec<String>,
    rating: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// 供應商全部失效時使用的靜態地點目錄
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    places: Vec<Place>,
}

impl StaticCatalog {
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_CATALOG)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let catalog = Self::from_json_str(&content)?;
        tracing::info!(
            "📚 Loaded {} catalog entries from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(content)?;
        if entries.is_empty() {
            return Err(SearchError::CatalogError {
                message: "catalog has no entries".to_string(),
            });
        }

        let places = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_place(index))
            .collect();
        Ok(Self { places })
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// 沒有意圖時回傳全部項目（包含「기타」）
    pub fn places_for(&self, intent: Option<Category>) -> Vec<Place> {
        self.places
            .iter()
            .filter(|place| intent.map_or(true, |category| place.category == category))
            .cloned()
            .collect()
    }
}

impl CatalogEntry {
    fn into_place(self, index: usize) -> Place {
        let specialties = if self.specialties.is_empty() {
            derive_specialties(self.category, &self.name)
        } else {
            self.specialties
        };

        Place {
            id: format!("{}-{}", ProviderKind::Catalog, index + 1),
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            road_address: self.road_address.filter(|a| !a.trim().is_empty()),
            phone: self
                .phone
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| NO_PHONE.to_string()),
            category: self.category,
            specialties,
            rating: self
                .rating
                .unwrap_or(MIN_RATING)
                .clamp(MIN_RATING, MAX_RATING),
            latitude: self.latitude,
            longitude: self.longitude,
            distance: Distance::NotRequested,
            is_recommended: false,
            source: ProviderKind::Catalog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn embedded_catalog_is_valid() {
        let catalog = StaticCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());

        let ids: HashSet<&str> = catalog.places.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());

        for place in &catalog.places {
            assert!(place.coordinates().is_some(), "{} has unusable coordinates", place.name);
            assert!((MIN_RATING..=MAX_RATING).contains(&place.rating));
            assert!(!place.specialties.is_empty());
        }

        for category in Category::DOMAIN {
            assert!(
                !catalog.places_for(Some(category)).is_empty(),
                "no catalog entries for {category}"
            );
        }
    }

    #[test]
    fn places_for_filters_by_intent() {
        let catalog = StaticCatalog::embedded().unwrap();
        let wigs = catalog.places_for(Some(Category::WigShop));
        assert!(wigs.iter().all(|p| p.category == Category::WigShop));
        assert_eq!(catalog.places_for(None).len(), catalog.len());
    }

    #[test]
    fn entry_defaults_are_filled() {
        let catalog = StaticCatalog::from_json_str(
            r#"[{"name": " 모모샵 ", "address": "서울 중구", "category": "가발전문점"}]"#,
        )
        .unwrap();
        let place = &catalog.places[0];
        assert_eq!(place.name, "모모샵");
        assert_eq!(place.phone, NO_PHONE);
        assert_eq!(place.rating, MIN_RATING);
        assert_eq!(place.specialties, vec!["맞춤가발", "부분가발"]);
        assert!(place.coordinates().is_none());
    }

    #[test]
    fn rejects_empty_or_malformed_catalog() {
        assert!(matches!(
            StaticCatalog::from_json_str("[]"),
            Err(SearchError::CatalogError { .. })
        ));
        assert!(matches!(
            StaticCatalog::from_json_str("{not json"),
            Err(SearchError::SerializationError(_))
        ));
    }

    #[test]
    fn loads_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"name": "SMP 스튜디오", "address": "서울 강남구", "category": "두피문신", "latitude": 37.5, "longitude": 127.03}]"#,
        )
        .unwrap();

        let catalog = StaticCatalog::from_path(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.places_for(Some(Category::ScalpTattooStudio)).len(), 1);
    }
}
