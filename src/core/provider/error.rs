use thiserror::Error;

/// Provider统一错误类型
///
/// 数据源相关的错误都转换为此类型，网格核心本身不产生错误
/// （坏数据走容忍降级路径，见单元格解析与树展平）
#[derive(Error, Debug)]
pub enum ProviderError {
    /// 初始化错误
    #[error("provider initialization failed: {message}")]
    InitializationError { message: String },

    /// 快照生成错误
    #[error("snapshot generation failed: {message}")]
    GenerationError { message: String },

    /// Provider已停止，拒绝继续供数
    #[error("provider is stopped")]
    Stopped,
}

pub type ProviderResult<T> = Result<T, ProviderError>;
