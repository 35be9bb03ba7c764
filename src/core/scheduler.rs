use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// 可取消的周期性任务
///
/// 固定周期执行回调，取消后在下一个tick干净退出，不泄漏定时器。
/// 必须在tokio运行时内创建
pub struct RepeatingTask {
    name: &'static str,
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RepeatingTask {
    /// 启动同步回调的周期任务
    pub fn spawn<F>(name: &'static str, period: Duration, mut task: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self::spawn_async(name, period, move || {
            task();
            async {}
        })
    }

    /// 启动异步回调的周期任务
    pub fn spawn_async<F, Fut>(name: &'static str, period: Duration, mut task: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if flag.load(Ordering::Relaxed) {
                    break;
                }
                task().await;
            }
            log::debug!("周期任务 {} 已退出", name);
        });

        log::info!("周期任务 {} 已启动, 周期 {:?}", name, period);
        Self {
            name,
            cancelled,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// 请求停止（下一个tick生效）
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// 停止并等待任务退出
    pub async fn cancel_and_wait(mut self) {
        self.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                log::warn!("周期任务 {} 退出异常: {}", self.name, e);
            }
        }
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
