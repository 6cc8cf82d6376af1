//! Статистическое ядро: чистые функции без состояния

use ndarray::ArrayView1;

use crate::types::Trend;

/// Точка для регрессии: x — сквозной индекс месяца (с 1), y — сумма
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

/// Результат подгонки прямой методом наименьших квадратов
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Доля от среднего, ниже которой наклон считается «стабильным»
const STABLE_SLOPE_RATIO: f64 = 0.05;

pub struct StatisticsKernel;

impl StatisticsKernel {
    /// Среднее арифметическое. Для пустого среза — 0.0 по соглашению:
    /// «нет данных» везде в движке трактуется как нулевая база
    pub fn mean(values: &[f64]) -> f64 {
        ArrayView1::from(values).mean().unwrap_or(0.0)
    }

    /// Выборочное стандартное отклонение (делитель N-1).
    /// Меньше двух значений — 0.0
    pub fn standard_deviation(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        ArrayView1::from(values).std(1.0)
    }

    /// МНК в замкнутой форме:
    /// slope = (N·Σxy − Σx·Σy) / (N·Σx² − (Σx)²), intercept = (Σy − slope·Σx) / N
    ///
    /// Меньше двух точек — вырожденный нулевой результат, не ошибка.
    /// Нулевой знаменатель (все x совпали) — slope 0, intercept = mean(y)
    pub fn linear_regression(points: &[DataPoint]) -> LinearFit {
        let n = points.len() as f64;
        if points.len() < 2 {
            return LinearFit {
                slope: 0.0,
                intercept: 0.0,
            };
        }

        let sum_x: f64 = points.iter().map(|p| p.x).sum();
        let sum_y: f64 = points.iter().map(|p| p.y).sum();
        let sum_xy: f64 = points.iter().map(|p| p.x * p.y).sum();
        let sum_x2: f64 = points.iter().map(|p| p.x * p.x).sum();

        let denominator = n * sum_x2 - sum_x * sum_x;
        if denominator.abs() < f64::EPSILON {
            return LinearFit {
                slope: 0.0,
                intercept: sum_y / n,
            };
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;

        LinearFit { slope, intercept }
    }

    /// Классификация тренда по знаку и величине наклона относительно среднего.
    /// |slope| < 5% от среднего (или нулевое среднее) — Stable
    pub fn classify_trend(values: &[f64]) -> Trend {
        let points: Vec<DataPoint> = values
            .iter()
            .enumerate()
            .map(|(i, &y)| DataPoint {
                x: (i + 1) as f64,
                y,
            })
            .collect();

        let fit = Self::linear_regression(&points);
        let mean = Self::mean(values);

        if mean.abs() < f64::EPSILON || fit.slope.abs() < STABLE_SLOPE_RATIO * mean.abs() {
            Trend::Stable
        } else if fit.slope > 0.0 {
            Trend::Rising
        } else {
            Trend::Falling
        }
    }
}
