//! Прогноз расходов по одной категории

use crate::preprocessing::{DataPoint, LinearFit, StatisticsKernel};
use crate::types::{DataQuality, Trend};

/// До этого дня месяца run-rate ненадёжен и почти не учитывается
const EARLY_MONTH_DAYS: u32 = 7;
/// Вес run-rate в начале месяца
const EARLY_REALITY_WEIGHT: f64 = 0.1;
/// Потолок прогноза: максимум истории с запасом в полтора раза
const VOLATILITY_CAP_RATIO: f64 = 1.5;

/// Прогнозатор строится из помесячной истории категории (от старых к новым).
/// Нулевые месяцы означают «нет данных», а не «не тратили», поэтому
/// отфильтровываются до подгонки, а x-индексы сжимаются без пропусков —
/// иначе нули утянули бы тренд к нулю
pub struct SpendingForecaster {
    points: Vec<DataPoint>,
    history: Vec<f64>, // те же значения, без нулей
    fit: Option<LinearFit>,
    is_trained: bool,
}

impl SpendingForecaster {
    pub fn new(monthly_totals: &[f64]) -> Self {
        let history: Vec<f64> = monthly_totals.iter().copied().filter(|&v| v > 0.0).collect();
        let points: Vec<DataPoint> = history
            .iter()
            .enumerate()
            .map(|(i, &y)| DataPoint {
                x: (i + 1) as f64,
                y,
            })
            .collect();

        Self {
            points,
            history,
            fit: None,
            is_trained: false,
        }
    }

    /// Подгонка МНК по отфильтрованным точкам.
    /// Меньше двух точек — модель остаётся необученной, прогнозы
    /// деградируют до средних/run-rate, но не падают
    pub fn train(&mut self) {
        if self.points.len() < 2 {
            return;
        }
        let fit = StatisticsKernel::linear_regression(&self.points);
        tracing::debug!(
            "Forecaster trained on {} points: slope={:.2}, intercept={:.2}",
            self.points.len(),
            fit.slope,
            fit.intercept
        );
        self.fit = Some(fit);
        self.is_trained = true;
    }

    /// Прогноз итога текущего месяца: смесь run-rate и исторического
    /// среднего, с демпфированием в начале месяца, потолком волатильности
    /// и нижней границей в уже потраченное
    pub fn predict_current_month(
        &self,
        current_spent: f64,
        day_of_month: u32,
        days_in_month: u32,
    ) -> f64 {
        let day = day_of_month.max(1) as f64;
        let days = days_in_month.max(1) as f64;
        let run_rate = current_spent / day * days;

        let mut prediction = if self.history.is_empty() {
            run_rate
        } else {
            let history_avg = StatisticsKernel::mean(&self.history);
            let reality_weight = if day_of_month < EARLY_MONTH_DAYS {
                EARLY_REALITY_WEIGHT
            } else {
                day / days
            };
            run_rate * reality_weight + history_avg * (1.0 - reality_weight)
        };

        if let Some(max) = self.history.iter().copied().reduce(f64::max) {
            prediction = prediction.min(max * VOLATILITY_CAP_RATIO);
        }

        // уже потраченное — нижняя граница в любом случае
        prediction.max(current_spent)
    }

    /// Прогноз следующего месяца: линейный шаг за последнюю точку,
    /// усреднённый 50/50 с прогнозом текущего месяца.
    /// Необученная модель возвращает прогноз текущего месяца как есть
    pub fn predict_next_month(&self, current_month_projection: f64) -> f64 {
        match self.fit {
            Some(fit) if self.is_trained => {
                let next_x = (self.points.len() + 1) as f64;
                let linear = fit.slope * next_x + fit.intercept;
                ((linear + current_month_projection) / 2.0).max(0.0)
            }
            _ => current_month_projection,
        }
    }

    /// Число месяцев с реальными данными
    pub fn non_zero_months(&self) -> usize {
        self.points.len()
    }

    pub fn data_quality(&self) -> DataQuality {
        match self.non_zero_months() {
            n if n >= 4 => DataQuality::Excellent,
            n if n >= 2 => DataQuality::Good,
            1 => DataQuality::Fair,
            _ => DataQuality::Poor,
        }
    }

    pub fn confidence(&self) -> f64 {
        match self.data_quality() {
            DataQuality::Excellent => 0.9,
            DataQuality::Good => 0.7,
            DataQuality::Fair => 0.5,
            DataQuality::Poor => 0.3,
        }
    }

    pub fn trend(&self) -> Trend {
        StatisticsKernel::classify_trend(&self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_months_are_compressed_out() {
        let forecaster = SpendingForecaster::new(&[0.0, 100.0, 0.0, 200.0]);
        assert_eq!(forecaster.points.len(), 2);
        assert_eq!(forecaster.points[0], DataPoint { x: 1.0, y: 100.0 });
        assert_eq!(forecaster.points[1], DataPoint { x: 2.0, y: 200.0 });
    }

    #[test]
    fn prediction_never_drops_below_current_spent() {
        let mut forecaster = SpendingForecaster::new(&[100.0, 120.0, 110.0]);
        forecaster.train();
        // потрачено уже больше любого исторического потолка
        let prediction = forecaster.predict_current_month(900.0, 28, 30);
        assert!(prediction >= 900.0);
    }

    #[test]
    fn prediction_respects_volatility_cap() {
        let mut forecaster = SpendingForecaster::new(&[100.0, 150.0, 120.0]);
        forecaster.train();
        // день 20 из 30: run-rate = 300, смесь ≈ 241 — выше потолка 225
        let prediction = forecaster.predict_current_month(200.0, 20, 30);
        assert!((prediction - 225.0).abs() < 1e-9);
    }

    #[test]
    fn early_month_pins_reality_weight() {
        // run-rate = 100/3*30 = 1000, среднее истории = 100,
        // день < 7 → вес ровно 0.1: 0.1*1000 + 0.9*100 = 190
        let mut forecaster = SpendingForecaster::new(&[40.0, 100.0, 160.0]);
        forecaster.train();
        let prediction = forecaster.predict_current_month(100.0, 3, 30);
        assert!((prediction - 190.0).abs() < 1e-9);
    }

    #[test]
    fn no_history_falls_back_to_run_rate() {
        let mut forecaster = SpendingForecaster::new(&[]);
        forecaster.train();
        let prediction = forecaster.predict_current_month(50.0, 10, 30);
        assert!((prediction - 150.0).abs() < 1e-9);
    }

    #[test]
    fn untrained_next_month_returns_projection_unchanged() {
        let mut forecaster = SpendingForecaster::new(&[0.0, 0.0, 300.0]);
        forecaster.train(); // одна точка — обучение не происходит
        assert_eq!(forecaster.predict_next_month(275.0), 275.0);
    }

    #[test]
    fn trained_next_month_damps_linear_step() {
        let mut forecaster = SpendingForecaster::new(&[100.0, 200.0, 300.0]);
        forecaster.train();
        // линия y = 100x, шаг к x=4 даёт 400; среднее с прогнозом 300 → 350
        let next = forecaster.predict_next_month(300.0);
        assert!((next - 350.0).abs() < 1e-9);
    }

    #[test]
    fn next_month_is_floored_at_zero() {
        let mut forecaster = SpendingForecaster::new(&[500.0, 300.0, 100.0]);
        forecaster.train();
        // линия падает: y = -200x + 700, x=4 → -100; среднее с 0 → отрицательное
        let next = forecaster.predict_next_month(0.0);
        assert!(next >= 0.0);
    }

    #[test]
    fn quality_tiers_follow_non_zero_month_count() {
        assert_eq!(
            SpendingForecaster::new(&[10.0, 20.0, 30.0, 40.0]).data_quality(),
            DataQuality::Excellent
        );
        assert_eq!(
            SpendingForecaster::new(&[10.0, 0.0, 20.0]).data_quality(),
            DataQuality::Good
        );
        assert_eq!(
            SpendingForecaster::new(&[0.0, 0.0, 20.0]).data_quality(),
            DataQuality::Fair
        );
        assert_eq!(SpendingForecaster::new(&[0.0, 0.0]).data_quality(), DataQuality::Poor);
        assert_eq!(SpendingForecaster::new(&[0.0, 0.0]).confidence(), 0.3);
    }
}
