use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::ServiceError;
use crate::core::{OrderProvider, ProviderResult, RepeatingTask};
use crate::grid::GridRowModel;
use crate::Config;

/// 应用统计信息
#[derive(Debug, Clone, Default)]
pub struct AppStats {
    pub displayed_rows: usize,
    pub total_rows: usize,
    pub live_change_records: usize,
    pub total_refreshes: u64,
    pub total_changes_detected: u64,
    pub total_records_swept: u64,
    pub skipped_child_refs: u64,
}

/// 订单网格应用 - 数据源与行模型的所有者
///
/// 启动后运行两个相互独立的周期任务：
/// 1. 数据刷新：拉取快照 -> 变更diff -> 可见行重建（严格按此顺序）
/// 2. 变更清扫：删除超过过期窗口的变更记录（只删除，不创建）
///
/// 行模型放在互斥锁后面；渲染面在一次渲染趟内持锁读取，
/// 观察到的行/列/变更状态因此是一致的
pub struct BlotterApp {
    config: Config,
    row_model: Arc<Mutex<GridRowModel>>,
    provider: Arc<tokio::sync::Mutex<Box<dyn OrderProvider>>>,
    refresh_task: Option<RepeatingTask>,
    sweep_task: Option<RepeatingTask>,
    running: bool,
}

impl BlotterApp {
    /// 用默认列布局和合成数据源组装应用
    pub fn with_synthetic_data(config: Config) -> Self {
        use crate::core::{SyntheticConfig, SyntheticOrderProvider};
        use crate::grid::{ColumnKey, ColumnLayout, GridConfig, SortDirection};

        let synthetic = SyntheticConfig {
            total_orders: config.total_orders,
            root_orders: config.root_orders,
            ..Default::default()
        };
        let provider = Box::new(SyntheticOrderProvider::new(synthetic));
        let row_model = GridRowModel::new(GridConfig::default(), ColumnLayout::default_order_layout())
            .with_default_sort(ColumnKey::Created, SortDirection::Descending);
        Self::new(config, provider, row_model)
    }

    pub fn new(config: Config, provider: Box<dyn OrderProvider>, row_model: GridRowModel) -> Self {
        Self {
            config,
            row_model: Arc::new(Mutex::new(row_model)),
            provider: Arc::new(tokio::sync::Mutex::new(provider)),
            refresh_task: None,
            sweep_task: None,
            running: false,
        }
    }

    /// 手动执行一个完整刷新周期（未启动周期任务时使用）
    pub async fn refresh_once(&self) -> ProviderResult<()> {
        let orders = {
            let mut provider = self.provider.lock().await;
            provider.fetch_snapshot().await?
        };
        let mut model = lock_model(&self.row_model);
        model.apply_snapshot(orders, Instant::now());
        Ok(())
    }

    /// 启动刷新与清扫两个周期任务（需在tokio运行时内调用）
    pub fn start(&mut self) -> Result<(), ServiceError> {
        if self.running {
            return Err(ServiceError::AlreadyRunning);
        }

        let refresh_interval = Duration::from_millis(self.config.refresh_interval_ms);
        let provider = self.provider.clone();
        let model = self.row_model.clone();
        self.refresh_task = Some(RepeatingTask::spawn_async(
            "data-refresh",
            refresh_interval,
            move || {
                let provider = provider.clone();
                let model = model.clone();
                async move {
                    let snapshot = {
                        let mut provider = provider.lock().await;
                        provider.fetch_snapshot().await
                    };
                    match snapshot {
                        Ok(orders) => {
                            let mut model = lock_model(&model);
                            model.apply_snapshot(orders, Instant::now());
                        }
                        Err(e) => log::warn!("快照拉取失败: {}", e),
                    }
                }
            },
        ));

        let sweep_interval = {
            let model = lock_model(&self.row_model);
            Duration::from_millis(model.config().sweep_interval_ms)
        };
        let model = self.row_model.clone();
        self.sweep_task = Some(RepeatingTask::spawn("change-sweep", sweep_interval, move || {
            let mut model = lock_model(&model);
            model.sweep_expired(Instant::now());
        }));

        self.running = true;
        log::info!("应用已启动: 刷新 {:?}, 清扫 {:?}", refresh_interval, sweep_interval);
        Ok(())
    }

    /// 取消周期任务并停止数据源
    pub async fn shutdown(&mut self) -> Result<(), ServiceError> {
        if !self.running {
            return Err(ServiceError::NotRunning);
        }
        if let Some(task) = self.refresh_task.take() {
            task.cancel_and_wait().await;
        }
        if let Some(task) = self.sweep_task.take() {
            task.cancel_and_wait().await;
        }
        self.provider.lock().await.stop();
        self.running = false;
        log::info!("应用已停止");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 行模型的共享句柄（渲染面在一次渲染趟内持锁）
    pub fn row_model(&self) -> Arc<Mutex<GridRowModel>> {
        self.row_model.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> AppStats {
        let model = lock_model(&self.row_model);
        let (displayed_rows, total_rows) = model.row_counts();
        let grid = model.stats();
        AppStats {
            displayed_rows,
            total_rows,
            live_change_records: model.live_change_count(),
            total_refreshes: grid.total_refreshes,
            total_changes_detected: grid.total_changes_detected,
            total_records_swept: grid.total_records_swept,
            skipped_child_refs: grid.skipped_child_refs,
        }
    }
}

/// 锁中毒时继续使用内部数据：单条坏记录不应让整个网格失效
pub(crate) fn lock_model(model: &Arc<Mutex<GridRowModel>>) -> std::sync::MutexGuard<'_, GridRowModel> {
    model.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
