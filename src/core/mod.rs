pub mod provider;
pub mod scheduler;

pub use scheduler::RepeatingTask;

// Provider模块的公共API导出
pub use provider::{
    generate_orders, OrderProvider, ProviderError, ProviderKind, ProviderResult, ProviderStatus,
    StaticOrderProvider, SyntheticConfig, SyntheticOrderProvider,
};
