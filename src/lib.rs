// 核心模块
pub mod app;
pub mod core;
pub mod grid;

#[cfg(feature = "gui")]
pub mod gui;

// 重新导出主要类型
pub use app::{AppStats, BlotterApp, ServiceError};
pub use core::{
    OrderProvider, ProviderError, ProviderKind, ProviderResult, RepeatingTask,
    StaticOrderProvider, SyntheticConfig, SyntheticOrderProvider,
};
pub use grid::{
    CellContent, ChangeRecord, ChangeTracker, ColumnDescriptor, ColumnKey, ColumnLayout,
    FieldValue, GridConfig, GridRowModel, GridStats, HighlightAnimator, OrderNode, OrderStatus,
    Side, SortDirection, SortSpec, TreeGridConfig,
};

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 初始化日志系统 - 禁用控制台输出以避免干扰UI
pub fn init_logging() {
    // 对于图形界面应用，日志重定向到文件而不是控制台
    use std::fs::OpenOptions;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("order_sight.log")
        .unwrap_or_else(|_| {
            // 如果无法创建日志文件，就完全禁用日志
            std::fs::File::create("/dev/null").unwrap()
        });

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter_level(log::LevelFilter::Warn) // 只记录警告和错误
        .init();
}

/// 库的配置结构
#[derive(Debug, Clone)]
pub struct Config {
    /// 合成数据的订单总数
    pub total_orders: usize,
    /// 其中根订单的期望数量
    pub root_orders: usize,
    /// 数据刷新间隔（毫秒）
    pub refresh_interval_ms: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total_orders: 10_000,
            root_orders: 2_000,
            refresh_interval_ms: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn new(total_orders: usize) -> Self {
        Self {
            total_orders,
            ..Default::default()
        }
    }

    pub fn with_root_orders(mut self, roots: usize) -> Self {
        self.root_orders = roots;
        self
    }

    pub fn with_refresh_interval(mut self, interval_ms: u64) -> Self {
        self.refresh_interval_ms = interval_ms;
        self
    }

    pub fn with_log_level(mut self, level: String) -> Self {
        self.log_level = level;
        self
    }
}
