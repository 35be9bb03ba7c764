use std::time::Instant;

use eframe::egui;

use crate::grid::{CellContent, GridRowModel};

/// 闪烁填充色（变更单元格背后的青绿色）
const FLASH_COLOR: egui::Color32 = egui::Color32::from_rgb(0x00, 0x79, 0x6b);
/// 悬停行的背景色
const HOVER_COLOR: egui::Color32 = egui::Color32::from_rgb(0x17, 0x35, 0x5d);
/// 闪烁的基础不透明度，强度在此之上缩放
const FLASH_BASE_ALPHA: f32 = 0.7;

const ROW_HEIGHT: f32 = 20.0;
const HEADER_HEIGHT: f32 = 24.0;
const INDENT_PER_LEVEL: f32 = 14.0;

/// 渲染面收集的交互，统一在一帧结束时回放给行模型
enum GridAction {
    HeaderClicked(usize),
    MoveColumn(usize, usize),
    ResizeColumn(usize, f32),
    ToggleExpand(String),
}

/// 订单树形网格组件
///
/// 虚拟化渲染：表体只物化滚入视口的行，每个单元格按需向行模型
/// 查询内容与闪烁强度。悬停状态是纯展示状态，归本组件所有
pub struct GridWidget {
    hover_row: Option<usize>,
    dragged_column: Option<usize>,
}

impl Default for GridWidget {
    fn default() -> Self {
        Self {
            hover_row: None,
            dragged_column: None,
        }
    }
}

impl GridWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, model: &mut GridRowModel) {
        let now = Instant::now();
        let mut actions: Vec<GridAction> = Vec::new();
        let mut hovered: Option<usize> = None;

        self.render_header(ui, model, &mut actions);
        ui.separator();
        self.render_body(ui, model, now, &mut actions, &mut hovered);

        self.hover_row = hovered;

        for action in actions {
            match action {
                GridAction::HeaderClicked(index) => model.header_clicked(index),
                GridAction::MoveColumn(from, to) => model.move_column(from, to),
                GridAction::ResizeColumn(index, width) => model.resize_column(index, width),
                GridAction::ToggleExpand(id) => model.toggle_expand(&id),
            }
        }

        // 只要还有活跃闪烁就持续请求重绘，全部衰减后停止
        if model.has_active_flashes(now) {
            ui.ctx().request_repaint();
        }
    }

    /// 自绘表头：点击排序、拖动换位、右缘拖动调宽
    fn render_header(
        &mut self,
        ui: &mut egui::Ui,
        model: &GridRowModel,
        actions: &mut Vec<GridAction>,
    ) {
        let column_count = model.columns().len();
        let mut header_rects: Vec<egui::Rect> = Vec::with_capacity(column_count);

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            for index in 0..column_count {
                let Some(descriptor) = model.columns().descriptor_at(index) else {
                    continue;
                };
                let title = model
                    .header_title(index)
                    .unwrap_or_else(|| descriptor.title.clone());
                let width = descriptor.width;

                let (rect, response) = ui.allocate_exact_size(
                    egui::Vec2::new(width, HEADER_HEIGHT),
                    egui::Sense::click_and_drag(),
                );
                header_rects.push(rect);

                if response.hovered() {
                    ui.painter().rect_filled(rect, 0.0, HOVER_COLOR);
                }
                ui.painter().text(
                    rect.left_center() + egui::Vec2::new(6.0, 0.0),
                    egui::Align2::LEFT_CENTER,
                    &title,
                    egui::TextStyle::Button.resolve(ui.style()),
                    ui.visuals().strong_text_color(),
                );

                if response.clicked() {
                    actions.push(GridAction::HeaderClicked(index));
                }
                if response.drag_started() {
                    self.dragged_column = Some(index);
                }

                // 右缘的窄条用于拖动调宽
                let (handle_rect, handle) = ui.allocate_exact_size(
                    egui::Vec2::new(4.0, HEADER_HEIGHT),
                    egui::Sense::drag(),
                );
                ui.painter().vline(
                    handle_rect.center().x,
                    handle_rect.y_range(),
                    ui.visuals().widgets.noninteractive.bg_stroke,
                );
                if handle.dragged() {
                    let new_width = (width + handle.drag_delta().x).max(40.0);
                    actions.push(GridAction::ResizeColumn(index, new_width));
                }
            }
        });

        // 拖动释放：按指针落点决定目标列位置
        if let Some(from) = self.dragged_column {
            let released = ui.input(|i| i.pointer.any_released());
            if released {
                if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
                    if let Some(to) = header_rects.iter().position(|r| {
                        pos.x >= r.left() && pos.x <= r.right()
                    }) {
                        if to != from {
                            actions.push(GridAction::MoveColumn(from, to));
                        }
                    }
                }
                self.dragged_column = None;
            }
        }
    }

    /// 虚拟化表体：只渲染视口内的行
    fn render_body(
        &self,
        ui: &mut egui::Ui,
        model: &GridRowModel,
        now: Instant,
        actions: &mut Vec<GridAction>,
        hovered: &mut Option<usize>,
    ) {
        use egui_extras::{Column, TableBuilder};

        let column_count = model.columns().len();
        let row_count = model.visible_row_count();
        let hover_row = self.hover_row;

        let mut table = TableBuilder::new(ui)
            .striped(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .vscroll(true);
        for index in 0..column_count {
            let width = model
                .columns()
                .descriptor_at(index)
                .map(|d| d.width)
                .unwrap_or(100.0);
            table = table.column(Column::exact(width));
        }

        table.body(|body| {
            body.rows(ROW_HEIGHT, row_count, |mut row| {
                let row_index = row.index();
                for column_index in 0..column_count {
                    row.col(|ui| {
                        let rect = ui.max_rect();

                        if Some(row_index) == hover_row {
                            ui.painter().rect_filled(rect, 0.0, HOVER_COLOR);
                        }

                        // 变更闪烁：强度乘以基础不透明度后铺在内容下方
                        let intensity = model.cell_intensity(column_index, row_index, now);
                        if intensity > 0.0 {
                            let alpha = (intensity * FLASH_BASE_ALPHA * 255.0) as u8;
                            ui.painter().rect_filled(
                                rect.shrink(1.0),
                                0.0,
                                egui::Color32::from_rgba_unmultiplied(
                                    FLASH_COLOR.r(),
                                    FLASH_COLOR.g(),
                                    FLASH_COLOR.b(),
                                    alpha,
                                ),
                            );
                        }

                        match model.cell_at(column_index, row_index) {
                            CellContent::Loading => {
                                ui.weak("…");
                            }
                            CellContent::Text { display, .. } => {
                                ui.label(display);
                            }
                            CellContent::Tree {
                                display,
                                depth,
                                has_children,
                                expanded,
                                node_id,
                            } => {
                                ui.add_space(depth as f32 * INDENT_PER_LEVEL);
                                if has_children {
                                    let icon = if expanded { "▼" } else { "▶" };
                                    if ui.small_button(icon).clicked() {
                                        actions.push(GridAction::ToggleExpand(node_id));
                                    }
                                } else {
                                    ui.add_space(18.0);
                                }
                                ui.label(display);
                            }
                        }

                        if ui.ui_contains_pointer() {
                            *hovered = Some(row_index);
                        }
                    });
                }
            });
        });
    }
}
