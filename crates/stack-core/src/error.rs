use thiserror::Error;

use crate::params::ParamKey;

/// Failure reported by a [`GeometryBackend`](crate::resources::GeometryBackend).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("could not allocate {0}")]
    Allocation(&'static str),
    #[error("graphics context error: {0}")]
    Context(String),
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),
    #[error("parameter `{key}` received non-finite value {value}")]
    NonFinite { key: ParamKey, value: f32 },
    #[error("parameter `{key}` must be positive, got {value}")]
    NonPositive { key: ParamKey, value: f32 },
    #[error("geometry backend failure: {0}")]
    Backend(#[from] BackendError),
}

pub type SceneResult<T> = Result<T, SceneError>;
