use std::time::Duration;

use eframe::egui;

use super::grid_widget::GridWidget;
use crate::app::blotter_app::lock_model;
use crate::app::BlotterApp;
use crate::Config;

/// 订单网格GUI
///
/// 数据刷新与变更清扫在后台tokio运行时的周期任务里推进；
/// 渲染面在一次update内持锁读取行模型，观察到一致的状态
pub struct BlotterGui {
    app: BlotterApp,
    widget: GridWidget,
    // 周期任务运行其上，随GUI存活
    _runtime: tokio::runtime::Runtime,
}

impl BlotterGui {
    pub fn new(app: BlotterApp, runtime: tokio::runtime::Runtime) -> Self {
        Self {
            app,
            widget: GridWidget::new(),
            _runtime: runtime,
        }
    }
}

impl eframe::App for BlotterGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let stats = self.app.stats();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Displayed rows: {}", stats.displayed_rows));
                ui.separator();
                ui.label(format!("Total rows: {}", stats.total_rows));
                ui.separator();
                ui.label(format!("活跃变更: {}", stats.live_change_records));
                ui.separator();
                ui.label(format!("刷新次数: {}", stats.total_refreshes));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let model = self.app.row_model();
            let mut model = lock_model(&model);
            self.widget.show(ui, &mut model);
        });

        // 后台任务在持续更新数据，保持一个温和的重绘节奏
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

/// 启动GUI：创建后台运行时、启动周期任务、进入eframe主循环
pub fn run_gui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let mut app = BlotterApp::with_synthetic_data(config);
    {
        let _guard = runtime.enter();
        app.start()?;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title("order_sight"),
        ..Default::default()
    };

    eframe::run_native(
        "order_sight",
        options,
        Box::new(move |_cc| Box::new(BlotterGui::new(app, runtime))),
    )?;
    Ok(())
}
