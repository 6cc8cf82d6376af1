/// Ошибки движка

use thiserror::Error;

/// Вырожденные числовые ситуации (пустая история, нулевой лимит,
/// меньше двух точек для регрессии) ошибками не считаются —
/// для них определено явное поведение по умолчанию
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
