use serde::{Deserialize, Serialize};

/// 数据提供者类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// 固定快照（拉取模型的退化情形）
    Static,
    /// 合成数据（批量生成 + 可选的持续流式更新）
    Synthetic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Static => "static",
            ProviderKind::Synthetic => "synthetic",
        }
    }
}

/// Provider运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    Created,
    Running,
    Stopped,
}

/// 合成数据配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// 批量生成的订单总数
    pub total_orders: usize,
    /// 其中根订单的期望数量
    pub root_orders: usize,
    /// 是否在批量生成之后继续流式追加订单
    pub stream_updates: bool,
    /// 新订单的创建间隔（毫秒）
    pub create_interval_ms: u64,
    /// 新订单从NEW转为FILLED的延迟（毫秒）
    pub fill_interval_ms: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            total_orders: 10_000,
            root_orders: 2_000,
            stream_updates: true,
            create_interval_ms: 2000,
            fill_interval_ms: 1000,
        }
    }
}
