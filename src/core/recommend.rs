use crate::domain::model::{Category, Place};
use crate::domain::ports::RecommendationPolicy;

/// 自我檢測階段（0–7）對應的推薦類別
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRecommendation {
    categories: Vec<Category>,
}

impl StageRecommendation {
    pub fn for_stage(stage: u8) -> Self {
        let categories = match stage {
            0 | 1 => vec![Category::SpecialtySalon],
            2 | 3 => vec![Category::HospitalClinic, Category::SpecialtySalon],
            4 | 5 => vec![Category::HospitalClinic, Category::ScalpTattooStudio],
            _ => vec![
                Category::WigShop,
                Category::ScalpTattooStudio,
                Category::HospitalClinic,
            ],
        };
        Self { categories }
    }
}

impl RecommendationPolicy for StageRecommendation {
    fn is_recommended(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

pub fn annotate_recommendations(places: &mut [Place], policy: &dyn RecommendationPolicy) {
    for place in places {
        place.is_recommended = policy.is_recommended(place.category);
    }
}
