//! Генератор бюджетных рекомендаций

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::EngineError;
use crate::models::forecasting::SpendingForecaster;
use crate::preprocessing::CalendarContext;
use crate::types::{
    InsightsInput, MonthContext, Priority, Recommendation, RecommendationType, Trend,
};

/// Пороги решающей лестницы. Единые для всех категорий в рамках вызова
#[derive(Debug, Clone)]
pub struct RecommendationPolicy {
    /// projected/limit, с которого предупреждение о траектории критично
    pub severe_overshoot_ratio: f64,
    /// used/limit для раннего сигнала о слишком быстром темпе
    pub high_usage_ratio: f64,
    /// сколько дней до конца месяца ещё считается «рано»
    pub early_days_remaining: u32,
    /// used/limit для перевода категории под наблюдение
    pub moderate_usage_ratio: f64,
    /// projected/limit для перевода категории под наблюдение
    pub watch_projection_ratio: f64,
    /// projected/limit, ниже которого падающему тренду предлагается ужать лимит
    pub optimization_headroom_ratio: f64,
    /// ожидаемая длина окна истории; None — принимается любая
    pub expected_history_len: Option<usize>,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            severe_overshoot_ratio: 1.2,
            high_usage_ratio: 0.8,
            early_days_remaining: 10,
            moderate_usage_ratio: 0.5,
            watch_projection_ratio: 0.85,
            optimization_headroom_ratio: 0.7,
            expected_history_len: None,
        }
    }
}

pub struct RecommendationEngine {
    policy: RecommendationPolicy,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self {
            policy: RecommendationPolicy::default(),
        }
    }

    pub fn with_policy(policy: RecommendationPolicy) -> Self {
        Self { policy }
    }

    /// Оценка всех категорий с лимитами. Чистая функция входа:
    /// никакого состояния между вызовами не сохраняется.
    ///
    /// Порядок результата: бюджетные категории в порядке переданных лимитов,
    /// затем категории без лимита по алфавиту
    pub fn evaluate(
        &self,
        input: &InsightsInput,
        today: NaiveDate,
    ) -> Result<Vec<Recommendation>, EngineError> {
        self.validate(input)?;

        let ctx = CalendarContext::month_context(input.reference_date, today);
        let mut recommendations = Vec::with_capacity(input.limits.len());

        for budget in &input.limits {
            let used = input
                .current_totals
                .get(&budget.category)
                .copied()
                .unwrap_or(0.0);
            // отсутствие категории в месяце — явный ноль
            let series: Vec<f64> = input
                .history
                .iter()
                .map(|month| month.get(&budget.category).copied().unwrap_or(0.0))
                .collect();

            let mut forecaster = SpendingForecaster::new(&series);
            forecaster.train();

            let projected = forecaster.predict_current_month(
                used,
                ctx.current_day_of_month,
                ctx.total_days_in_month,
            );
            let daily_rate = used / ctx.current_day_of_month.max(1) as f64;

            recommendations.push(self.classify(
                &budget.category,
                used,
                budget.limit,
                projected,
                daily_rate,
                &forecaster,
                &ctx,
            ));
        }

        recommendations.extend(self.unbudgeted_entries(input, &ctx));

        tracing::debug!(
            "Evaluated {} budgeted and {} total categories for {}",
            input.limits.len(),
            recommendations.len(),
            input.reference_date
        );

        Ok(recommendations)
    }

    fn validate(&self, input: &InsightsInput) -> Result<(), EngineError> {
        for budget in &input.limits {
            if !budget.limit.is_finite() || budget.limit < 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "budget limit for '{}' must be a non-negative number",
                    budget.category
                )));
            }
        }
        for (category, &amount) in &input.current_totals {
            if !amount.is_finite() || amount < 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "current total for '{}' must be a non-negative number",
                    category
                )));
            }
        }
        for (month_idx, month) in input.history.iter().enumerate() {
            for (category, &amount) in month {
                if !amount.is_finite() || amount < 0.0 {
                    return Err(EngineError::InvalidInput(format!(
                        "history month {} has a negative amount for '{}'",
                        month_idx, category
                    )));
                }
            }
        }
        if let Some(expected) = self.policy.expected_history_len {
            if input.history.len() != expected {
                return Err(EngineError::InvalidInput(format!(
                    "history window must contain exactly {} months, got {}",
                    expected,
                    input.history.len()
                )));
            }
        }
        Ok(())
    }

    /// Решающая лестница: правила проверяются сверху вниз,
    /// срабатывает первое подходящее
    #[allow(clippy::too_many_arguments)]
    fn classify(
        &self,
        category: &str,
        used: f64,
        limit: f64,
        projected: f64,
        daily_rate: f64,
        forecaster: &SpendingForecaster,
        ctx: &MonthContext,
    ) -> Recommendation {
        let policy = &self.policy;
        // после правила «превышено» либо limit > 0, либо used == limit == 0
        let usage_ratio = if limit > 0.0 { used / limit } else { 0.0 };

        let mut recommendation = Recommendation {
            category: category.to_string(),
            r#type: RecommendationType::OnTrack,
            message: String::new(),
            priority: Priority::Low,
            suggested_limit: None,
            insight: None,
            action_items: Vec::new(),
            days_remaining: Some(ctx.days_remaining),
            daily_rate: Some(daily_rate),
            projected_total: Some(projected),
            confidence: Some(forecaster.confidence()),
            data_quality: Some(forecaster.data_quality()),
        };

        if used >= limit && (used > 0.0 || limit > 0.0) {
            recommendation.r#type = RecommendationType::BudgetExceeded;
            recommendation.priority = Priority::Critical;
            recommendation.message = format!(
                "'{}' budget exceeded: {:.2} spent of {:.2}",
                category, used, limit
            );
            recommendation.insight = Some(format!(
                "You are {:.2} over budget with {} days left in the month.",
                used - limit,
                ctx.days_remaining
            ));
            recommendation.action_items = vec![
                format!("Pause non-essential '{}' spending for the rest of the month", category),
                format!("Review the largest recent '{}' transactions", category),
            ];
        } else if limit > 0.0 && projected >= limit {
            let overshoot = projected / limit;
            recommendation.r#type = RecommendationType::TrajectoryWarning;
            recommendation.priority = if overshoot >= policy.severe_overshoot_ratio {
                Priority::Critical
            } else {
                Priority::High
            };
            let remaining_daily = (limit - used) / ctx.days_remaining.max(1) as f64;
            recommendation.message = format!(
                "'{}' is on track to exceed its budget: projected {:.2} vs limit {:.2}",
                category, projected, limit
            );
            recommendation.insight = Some(format!(
                "At {:.2} per day the limit will be crossed before month end.",
                daily_rate
            ));
            recommendation.action_items = vec![
                format!(
                    "Keep '{}' under {:.2} per day for the remaining {} days",
                    category, remaining_daily, ctx.days_remaining
                ),
                format!("Defer planned '{}' purchases to next month", category),
            ];
        } else if usage_ratio >= policy.high_usage_ratio
            && ctx.days_remaining >= policy.early_days_remaining
        {
            recommendation.r#type = RecommendationType::CriticalAlert;
            recommendation.priority = Priority::High;
            recommendation.message = format!(
                "'{}' has used {:.0}% of its budget with {} days remaining",
                category,
                usage_ratio * 100.0,
                ctx.days_remaining
            );
            recommendation.insight = Some(format!(
                "Only {:.2} is left; the current pace of {:.2} per day is too fast this early.",
                limit - used,
                daily_rate
            ));
            recommendation.action_items = vec![
                format!("Slow down '{}' spending until next month", category),
                format!("Plan the remaining {:.2} across {} days", limit - used, ctx.days_remaining),
            ];
        } else if usage_ratio >= policy.moderate_usage_ratio
            || (limit > 0.0 && projected >= limit * policy.watch_projection_ratio)
        {
            recommendation.r#type = RecommendationType::PaceMonitor;
            recommendation.priority = Priority::Medium;
            recommendation.message = format!(
                "'{}' is worth watching: {:.0}% used, projected {:.2} of {:.2}",
                category,
                usage_ratio * 100.0,
                projected,
                limit
            );
            recommendation.insight = Some(
                "The projection stays under the limit, but the trend is close enough to track."
                    .to_string(),
            );
            recommendation.action_items = vec![format!(
                "Check '{}' again in a few days; projected spend is {:.2}",
                category, projected
            )];
        } else if forecaster.trend() == Trend::Falling
            && limit > 0.0
            && projected <= limit * policy.optimization_headroom_ratio
            && projected > 0.0
        {
            let suggested = (projected * 1.2).max(used).min(limit * 0.9);
            recommendation.r#type = RecommendationType::Optimization;
            recommendation.priority = Priority::Low;
            recommendation.suggested_limit = Some(suggested);
            recommendation.message = format!(
                "'{}' is trending down; the limit could drop from {:.2} to {:.2}",
                category, limit, suggested
            );
            recommendation.insight = Some(format!(
                "Spending has been falling and the projection is {:.2}; freeing the difference makes room in other categories.",
                projected
            ));
            recommendation.action_items = vec![format!(
                "Lower the '{}' limit to {:.2} and move the rest into savings",
                category, suggested
            )];
        } else {
            recommendation.message = format!(
                "'{}' is in the safe zone: {:.2} of {:.2} used",
                category, used, limit
            );
            recommendation.action_items =
                vec![format!("No action needed for '{}' this month", category)];
        }

        recommendation
    }

    /// Категории с тратами, но без лимита — информационные записи.
    /// Сортируются по имени, чтобы порядок обхода HashMap не протекал наружу
    fn unbudgeted_entries(&self, input: &InsightsInput, ctx: &MonthContext) -> Vec<Recommendation> {
        let budgeted: HashSet<&str> = input.limits.iter().map(|b| b.category.as_str()).collect();

        let mut categories: Vec<(&String, f64)> = input
            .current_totals
            .iter()
            .filter(|(category, _)| !budgeted.contains(category.as_str()))
            .map(|(category, &amount)| (category, amount))
            .collect();
        categories.sort_by(|a, b| a.0.cmp(b.0));

        categories
            .into_iter()
            .map(|(category, amount)| Recommendation {
                category: category.clone(),
                r#type: RecommendationType::Unbudgeted,
                message: format!(
                    "'{}' has no budget: {:.2} spent this month",
                    category, amount
                ),
                priority: Priority::Low,
                suggested_limit: None,
                insight: Some(format!(
                    "Unbudgeted categories are not scored; set a limit to include '{}' in the analysis.",
                    category
                )),
                action_items: vec![format!("Set a monthly limit for '{}'", category)],
                days_remaining: Some(ctx.days_remaining),
                daily_rate: None,
                projected_total: None,
                confidence: None,
                data_quality: None,
            })
            .collect()
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}
