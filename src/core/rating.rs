use crate::domain::ports::RatingStrategy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

pub const MIN_RATING: f64 = 4.0;
pub const MAX_RATING: f64 = 5.0;

fn round_rating(value: f64) -> f64 {
    ((value * 10.0).round() / 10.0).clamp(MIN_RATING, MAX_RATING)
}

/// 固定評分，測試與離線環境使用
#[derive(Debug, Clone, Copy)]
pub struct FixedRating(pub f64);

impl RatingStrategy for FixedRating {
    fn rating(&self) -> f64 {
        round_rating(self.0)
    }
}

/// 以種子初始化的評分產生器，相同種子產生相同序列
pub struct SeededRating {
    rng: Mutex<StdRng>,
}

impl SeededRating {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl RatingStrategy for SeededRating {
    fn rating(&self) -> f64 {
        // 產生器狀態不會因 panic 而失效，直接沿用
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        round_rating(rng.random_range(MIN_RATING..=MAX_RATING))
    }
}

/// 正式環境使用：由作業系統取得種子
pub struct RandomRating(SeededRating);

impl RandomRating {
    pub fn new() -> Self {
        Self(SeededRating::from_rng(StdRng::from_os_rng()))
    }
}

impl Default for RandomRating {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingStrategy for RandomRating {
    fn rating(&self) -> f64 {
        self.0.rating()
    }
}
