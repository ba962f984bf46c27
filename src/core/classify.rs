use crate::core::normalize::strip_markup;
use crate::domain::model::{Category, RawRecord};

const MEDICAL_KEYWORDS: &[&str] = &[
    "병원",
    "의원",
    "클리닉",
    "피부과",
    "모발이식",
    "한의원",
    "성형외과",
    "의료",
    "clinic",
    "hospital",
    "dermatology",
];

const BEAUTY_KEYWORDS: &[&str] = &[
    "미용실",
    "미용",
    "헤어",
    "두피케어",
    "두피관리",
    "두피 관리",
    "살롱",
    "바버",
    "이발",
];

const TATTOO_KEYWORDS: &[&str] = &[
    "두피문신",
    "두피 문신",
    "두피타투",
    "smp",
    "문신",
    "타투",
    "tattoo",
    "반영구",
];

const WIG_KEYWORDS: &[&str] = &["가발", "헤어피스", "wig", "증모"];

// 美容室命名方式差異很大，連生活/居家護理業種與英文字詞一併放行
const SALON_SECONDARY_KEYWORDS: &[&str] = &[
    "생활",
    "가정",
    "홈케어",
    "뷰티",
    "hair",
    "salon",
    "style",
    "스타일",
];

const HAIR_LOSS_KEYWORD: &str = "탈모";

/// 單筆原始資料的關鍵字判斷結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub medical: bool,
    pub beauty: bool,
    pub tattoo: bool,
    pub wig: bool,
    pub salon_secondary: bool,
    /// 使用者原始查詢提到「탈모」
    pub query_mentions_hair_loss: bool,
}

impl Signals {
    pub fn evaluate(record: &RawRecord, raw_query: &str) -> Self {
        // 標記可能把關鍵字切開（例如 `<b>두피</b>케어`），比對前先移除
        let haystack = format!(
            "{} {}",
            strip_markup(&record.name),
            strip_markup(&record.category_text)
        )
        .to_lowercase();
        Self {
            medical: contains_any(&haystack, MEDICAL_KEYWORDS),
            beauty: contains_any(&haystack, BEAUTY_KEYWORDS),
            tattoo: contains_any(&haystack, TATTOO_KEYWORDS),
            wig: contains_any(&haystack, WIG_KEYWORDS),
            salon_secondary: contains_any(&haystack, SALON_SECONDARY_KEYWORDS),
            query_mentions_hair_loss: raw_query.contains(HAIR_LOSS_KEYWORD),
        }
    }

    fn tattoo_studio(&self) -> bool {
        self.tattoo
    }

    fn medical(&self) -> bool {
        self.medical
    }

    fn beauty(&self) -> bool {
        self.beauty
    }

    fn salon_secondary(&self) -> bool {
        self.salon_secondary
    }

    fn wig_shop(&self) -> bool {
        self.wig
    }

    fn hair_loss_beauty(&self) -> bool {
        self.beauty && self.query_mentions_hair_loss
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// 規則適用的查詢意圖
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentMatch {
    Exactly(Category),
    /// 醫院類別或無法判斷意圖時
    HospitalOrUnresolved,
}

impl IntentMatch {
    fn matches(self, intent: Option<Category>) -> bool {
        match self {
            IntentMatch::Exactly(category) => intent == Some(category),
            IntentMatch::HospitalOrUnresolved => {
                matches!(intent, None | Some(Category::HospitalClinic) | Some(Category::Other))
            }
        }
    }
}

pub struct InclusionRule {
    pub name: &'static str,
    pub intent: IntentMatch,
    pub predicate: fn(&Signals) -> bool,
    pub result: Category,
}

/// 依優先順序排列的納入規則；第一條符合的規則決定類別
pub const RULES: &[InclusionRule] = &[
    InclusionRule {
        name: "tattoo-studio",
        intent: IntentMatch::Exactly(Category::ScalpTattooStudio),
        predicate: Signals::tattoo_studio,
        result: Category::ScalpTattooStudio,
    },
    InclusionRule {
        name: "tattoo-medical",
        intent: IntentMatch::Exactly(Category::ScalpTattooStudio),
        predicate: Signals::medical,
        result: Category::HospitalClinic,
    },
    InclusionRule {
        name: "salon-beauty",
        intent: IntentMatch::Exactly(Category::SpecialtySalon),
        predicate: Signals::beauty,
        result: Category::SpecialtySalon,
    },
    InclusionRule {
        name: "salon-medical",
        intent: IntentMatch::Exactly(Category::SpecialtySalon),
        predicate: Signals::medical,
        result: Category::HospitalClinic,
    },
    InclusionRule {
        name: "salon-secondary",
        intent: IntentMatch::Exactly(Category::SpecialtySalon),
        predicate: Signals::salon_secondary,
        result: Category::SpecialtySalon,
    },
    InclusionRule {
        name: "wig-shop",
        intent: IntentMatch::Exactly(Category::WigShop),
        predicate: Signals::wig_shop,
        result: Category::WigShop,
    },
    InclusionRule {
        name: "medical",
        intent: IntentMatch::HospitalOrUnresolved,
        predicate: Signals::medical,
        result: Category::HospitalClinic,
    },
    InclusionRule {
        name: "hair-loss-beauty",
        intent: IntentMatch::HospitalOrUnresolved,
        predicate: Signals::hair_loss_beauty,
        result: Category::SpecialtySalon,
    },
];

/// 回傳符合的類別；不符合任何規則的資料應被排除
pub fn classify(record: &RawRecord, intent: Option<Category>, raw_query: &str) -> Option<Category> {
    let signals = Signals::evaluate(record, raw_query);
    RULES
        .iter()
        .filter(|rule| rule.intent.matches(intent))
        .find(|rule| (rule.predicate)(&signals))
        .map(|rule| {
            tracing::trace!("'{}' matched rule {}", record.name, rule.name);
            rule.result
        })
}

const SPECIALTY_KEYWORDS: &[(&str, &str)] = &[
    ("모발이식", "모발이식"),
    ("피부과", "피부과 진료"),
    ("한의원", "한방 탈모치료"),
    ("클리닉", "탈모클리닉"),
    ("두피", "두피케어"),
    ("탈모", "탈모치료"),
    ("가발", "맞춤가발"),
    ("증모", "증모술"),
    ("문신", "두피문신"),
    ("smp", "SMP"),
    ("헤어", "헤어케어"),
];

fn default_specialties(category: Category) -> [&'static str; 2] {
    match category {
        Category::HospitalClinic => ["탈모치료", "두피진단"],
        Category::SpecialtySalon => ["두피케어", "탈모케어"],
        Category::WigShop => ["맞춤가발", "부분가발"],
        Category::ScalpTattooStudio => ["두피문신", "SMP"],
        Category::Other => ["탈모상담", "두피관리"],
    }
}

/// 由名稱與業種文字推導專長標籤；沒有命中時使用類別預設的兩個標籤
pub fn derive_specialties(category: Category, source_text: &str) -> Vec<String> {
    let lowered = source_text.to_lowercase();
    let mut tags: Vec<String> = Vec::new();
    for (keyword, tag) in SPECIALTY_KEYWORDS {
        if lowered.contains(keyword) && !tags.iter().any(|t| t == tag) {
            tags.push((*tag).to_string());
        }
    }

    if tags.is_empty() {
        tags = default_specialties(category)
            .iter()
            .map(|t| (*t).to_string())
            .collect();
    }
    tags
}
