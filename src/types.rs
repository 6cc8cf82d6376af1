/// Типы данных для движка бюджетной аналитики

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Суммы расходов по категориям за один месяц
pub type CategoryTotals = HashMap<String, f64>;

/// История по месяцам: от старых к новым, без пропусков
/// (месяц без трат — явный 0.0, а не отсутствующая запись)
pub type HistoricalSeries = Vec<CategoryTotals>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLimit {
    pub category: String,
    pub limit: f64, // >= 0, валюта
}

/// Календарный контекст месяца. Вычисляется заново на каждый вызов
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonthContext {
    pub reference_date: NaiveDate,
    pub is_current_month: bool,
    pub current_day_of_month: u32, // 1..=31
    pub total_days_in_month: u32,  // 28..=31
    pub days_remaining: u32,
    pub day_progress: f64, // 0..100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    BudgetExceeded,
    TrajectoryWarning,
    CriticalAlert,
    PaceMonitor,
    Optimization,
    OnTrack,
    Unbudgeted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub r#type: RecommendationType,
    pub message: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
    #[serde(default)]
    pub action_items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>, // 0..1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<DataQuality>,
}

/// Входные данные для оценки бюджета
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsInput {
    pub current_totals: CategoryTotals,
    pub history: HistoricalSeries,
    pub limits: Vec<BudgetLimit>,
    pub reference_date: NaiveDate,
}

/// Запрос прогноза по одной категории (или по итогу)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub history: Vec<f64>, // помесячные суммы, от старых к новым
    pub current_spent: f64,
    pub reference_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastOutput {
    pub projected_total: f64,
    pub next_month: f64,
    pub daily_rate: f64,
    pub trend: Trend,
    pub confidence: f64,
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsOutput {
    pub recommendations: Option<Vec<Recommendation>>,
    pub forecast: Option<ForecastOutput>,
}
