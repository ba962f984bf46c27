// Adapters layer: concrete implementations for external systems (place providers, fallback catalog).

pub mod catalog;
pub mod http;
pub mod kakao;
pub mod naver;

pub use catalog::StaticCatalog;
pub use kakao::KakaoLocalAdapter;
pub use naver::NaverLocalAdapter;
