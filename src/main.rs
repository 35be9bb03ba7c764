use order_sight::{init_logging, Config};

#[cfg(not(feature = "gui"))]
#[tokio::main]
async fn main() {
    use order_sight::BlotterApp;
    use std::time::Duration;

    init_logging();

    let config = Config::default();
    let mut app = BlotterApp::with_synthetic_data(config);
    if let Err(e) = app.start() {
        log::error!("启动失败: {}", e);
        return;
    }

    println!("order_sight v{} (headless) - Ctrl-C退出", order_sight::VERSION);

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let stats = app.stats();
                println!(
                    "Displayed rows: {} / Total rows: {} | 活跃变更: {} | 刷新: {} | 已清扫: {}",
                    stats.displayed_rows,
                    stats.total_rows,
                    stats.live_change_records,
                    stats.total_refreshes,
                    stats.total_records_swept,
                );
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if let Err(e) = app.shutdown().await {
        log::warn!("停止失败: {}", e);
    }
}

#[cfg(feature = "gui")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    order_sight::gui::run_gui(Config::default())
}
