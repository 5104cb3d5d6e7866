//! Error types for the control path. The render path never fails.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("unknown route: {0:?}")]
    UnknownRoute(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// The render side has not drained the control queue yet.
    #[error("control queue is full")]
    QueueFull,
}

pub type Result<T> = std::result::Result<T, EngineError>;
