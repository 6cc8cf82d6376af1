/// Модели движка

pub mod forecasting;
pub mod recommendations;

pub use forecasting::SpendingForecaster;
pub use recommendations::{RecommendationEngine, RecommendationPolicy};
