use thiserror::Error;

/// Errors a counter actor can return from `on_receive`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    #[error("Counter overflow at state {0}")]
    Overflow(i64),
}
