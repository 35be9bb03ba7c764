pub mod blotter_app;

pub use blotter_app::{AppStats, BlotterApp};

/// 服务生命周期错误类型
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("服务已经在运行")]
    AlreadyRunning,

    #[error("服务未运行")]
    NotRunning,

    #[error("内部错误: {0}")]
    InternalError(String),
}
