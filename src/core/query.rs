use crate::domain::model::Category;

/// 查詢正規化結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub category: Option<Category>,
    pub provider_query: String,
}

struct SynonymEntry {
    category: Category,
    synonyms: &'static [&'static str],
    provider_query: &'static str,
}

// 依序比對：較具體的類別放前面，避免「두피」相關詞被醫院類別先吃掉
const SYNONYMS: &[SynonymEntry] = &[
    SynonymEntry {
        category: Category::ScalpTattooStudio,
        synonyms: &[
            "두피문신",
            "두피 문신",
            "두피타투",
            "두피 타투",
            "smp",
            "scalp tattoo",
            "scalp micropigmentation",
        ],
        provider_query: "두피문신 SMP",
    },
    SynonymEntry {
        category: Category::WigShop,
        synonyms: &["가발전문점", "가발 전문점", "가발", "헤어피스", "wig"],
        provider_query: "가발 전문점",
    },
    SynonymEntry {
        category: Category::SpecialtySalon,
        synonyms: &[
            "탈모미용실",
            "탈모 미용실",
            "두피관리",
            "두피 관리",
            "두피케어",
            "두피 케어",
            "미용실",
            "헤어샵",
            "salon",
        ],
        provider_query: "두피케어 미용실",
    },
    SynonymEntry {
        category: Category::HospitalClinic,
        synonyms: &[
            "탈모병원",
            "탈모 병원",
            "모발이식 전문 병원",
            "모발이식",
            "탈모클리닉",
            "탈모 클리닉",
            "피부과",
            "hospital",
            "clinic",
        ],
        provider_query: "탈모 피부과",
    },
];

/// 將自由輸入的查詢對應到標準類別與供應商查詢字串；不會失敗
pub fn normalize_query(raw: &str) -> NormalizedQuery {
    let lowered = raw.trim().to_lowercase();

    for entry in SYNONYMS {
        if entry.synonyms.iter().any(|s| lowered.contains(s)) {
            tracing::debug!(
                "🔎 Query '{}' resolved to {} ({})",
                raw,
                entry.category,
                entry.provider_query
            );
            return NormalizedQuery {
                category: Some(entry.category),
                provider_query: entry.provider_query.to_string(),
            };
        }
    }

    NormalizedQuery {
        category: None,
        provider_query: raw.to_string(),
    }
}
