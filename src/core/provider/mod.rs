// Provider抽象层 - 统一的订单数据源接口
//
// 网格核心对数据来源一视同仁：每个刷新周期开始时把数据源解析为
// 一份具体的订单序列（拉取模型），静态序列只是它的退化情形。
// 数据源归外部所有，核心只做只读消费

pub mod error;
pub mod synthetic_provider;
pub mod types;

pub use error::{ProviderError, ProviderResult};
pub use synthetic_provider::{generate_orders, SyntheticOrderProvider};
pub use types::{ProviderKind, ProviderStatus, SyntheticConfig};

use async_trait::async_trait;

use crate::grid::data_structures::OrderNode;

/// 订单数据源抽象
#[async_trait]
pub trait OrderProvider: Send {
    /// 数据源类型
    fn kind(&self) -> ProviderKind;

    /// 当前运行状态
    fn status(&self) -> ProviderStatus;

    /// 拉取当前的完整订单快照
    async fn fetch_snapshot(&mut self) -> ProviderResult<Vec<OrderNode>>;

    /// 停止数据源（之后的拉取应当失败）
    fn stop(&mut self);
}

/// 静态数据源 - 固定订单序列
pub struct StaticOrderProvider {
    orders: Vec<OrderNode>,
    status: ProviderStatus,
}

impl StaticOrderProvider {
    pub fn new(orders: Vec<OrderNode>) -> Self {
        Self {
            orders,
            status: ProviderStatus::Created,
        }
    }
}

#[async_trait]
impl OrderProvider for StaticOrderProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Static
    }

    fn status(&self) -> ProviderStatus {
        self.status
    }

    async fn fetch_snapshot(&mut self) -> ProviderResult<Vec<OrderNode>> {
        if self.status == ProviderStatus::Stopped {
            return Err(ProviderError::Stopped);
        }
        self.status = ProviderStatus::Running;
        Ok(self.orders.clone())
    }

    fn stop(&mut self) {
        self.status = ProviderStatus::Stopped;
    }
}
