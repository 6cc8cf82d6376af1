/// Модуль подготовки данных

pub mod calendar;
pub mod statistics;

pub use calendar::CalendarContext;
pub use statistics::{DataPoint, LinearFit, StatisticsKernel};
