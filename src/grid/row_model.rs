use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use super::cells::CellContent;
use super::change_tracker::{ChangeRecord, ChangeTracker};
use super::columns::ColumnLayout;
use super::data_structures::{ColumnKey, GridConfig, GridStats, OrderNode};
use super::flatten::flatten_visible_rows;
use super::highlight::HighlightAnimator;
use super::sort::{SortDirection, SortSpec};

/// 行模型管理器 - 网格核心的所有者
///
/// 持有当前快照、展开集合、排序规格、列布局与变更跟踪器，
/// 向渲染面提供按需的单元格解析和高亮强度查询。
///
/// 状态变更采用显式依赖跟踪：重算键 = 快照版本 + 排序版本 + 展开版本，
/// 每个变更入口自增对应版本并立即重建可见行序列，保证下一次单元格
/// 查询之前重算已经完成。重建是全量的，非增量
pub struct GridRowModel {
    config: GridConfig,
    columns: ColumnLayout,
    animator: HighlightAnimator,
    tracker: ChangeTracker,

    snapshot: Vec<OrderNode>,
    index_by_id: HashMap<String, usize>,
    expanded: HashSet<String>,
    sort: Option<SortSpec>,

    visible_rows: Vec<usize>,

    // 重算键
    snapshot_version: u64,
    sort_version: u64,
    expand_version: u64,
    flattened_for: (u64, u64, u64),

    stats: GridStats,
}

impl GridRowModel {
    pub fn new(config: GridConfig, columns: ColumnLayout) -> Self {
        let animator = HighlightAnimator::new(&config);
        let tracker = ChangeTracker::new(Duration::from_millis(config.change_expiry_ms));
        Self {
            config,
            columns,
            animator,
            tracker,
            snapshot: Vec::new(),
            index_by_id: HashMap::new(),
            expanded: HashSet::new(),
            sort: None,
            visible_rows: Vec::new(),
            snapshot_version: 0,
            sort_version: 0,
            expand_version: 0,
            flattened_for: (0, 0, 0),
            stats: GridStats::default(),
        }
    }

    /// 设置初始排序（表头交互之前生效）
    pub fn with_default_sort(mut self, key: ColumnKey, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec { key, direction });
        self.sort_version += 1;
        self
    }

    // ==================== 刷新周期 ====================

    /// 应用一次新的数据快照
    ///
    /// 先diff后flatten：变更跟踪完成之后可见行序列才会重建，
    /// 不会出现某一帧里节点已变化而变更记录还没就位的情况
    pub fn apply_snapshot(&mut self, orders: Vec<OrderNode>, now: Instant) {
        let columns = self.columns.keys();
        let detected = self.tracker.diff(&orders, &columns, now);
        self.stats.total_changes_detected += detected as u64;

        self.index_by_id = orders
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.id.is_empty())
            .map(|(index, node)| (node.id.clone(), index))
            .collect();
        self.snapshot = orders;
        self.snapshot_version += 1;
        self.stats.total_refreshes += 1;

        self.recompute_if_stale();
    }

    /// 清扫过期的变更记录，返回删除数量
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let removed = self.tracker.sweep_expired(now);
        self.stats.total_records_swept += removed as u64;
        removed
    }

    fn recompute_if_stale(&mut self) {
        let key = (self.snapshot_version, self.sort_version, self.expand_version);
        if key == self.flattened_for {
            return;
        }

        let result = flatten_visible_rows(
            &self.snapshot,
            &self.index_by_id,
            self.config.tree.as_ref(),
            self.sort,
            &self.expanded,
        );
        self.visible_rows = result.rows;
        self.stats.skipped_child_refs += result.skipped_child_refs;
        self.stats.total_flatten_rebuilds += 1;
        self.flattened_for = key;
    }

    // ==================== 用户交互 ====================

    /// 表头点击：同列且当前为升序时转降序，其余情况设为升序
    pub fn header_clicked(&mut self, column_index: usize) {
        let Some(descriptor) = self.columns.descriptor_at(column_index) else {
            return;
        };
        let key = descriptor.key;
        let direction = match self.sort {
            Some(spec) if spec.key == key && spec.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.set_sort(Some(SortSpec { key, direction }));
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        if self.sort == sort {
            return;
        }
        self.sort = sort;
        self.sort_version += 1;
        self.recompute_if_stale();
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort
    }

    /// 翻转节点的展开状态，并立即重建可见行序列
    pub fn toggle_expand(&mut self, id: &str) {
        if id.is_empty() {
            return;
        }
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
        self.expand_version += 1;
        self.recompute_if_stale();
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// 列拖动换位（不影响行序，无需重建可见行）
    pub fn move_column(&mut self, from: usize, to: usize) {
        self.columns.move_column(from, to);
    }

    /// 列宽调整
    pub fn resize_column(&mut self, index: usize, new_width: f32) {
        self.columns.resize_column(index, new_width);
    }

    // ==================== 渲染面查询 ====================

    /// 解析虚拟坐标 (列, 行) 的单元格内容
    ///
    /// 行越界或列没有描述符时返回占位单元格，绝不报错；
    /// 树形列的单元格带缩进深度与展开手柄信息
    pub fn cell_at(&self, column_index: usize, row_index: usize) -> CellContent {
        let Some(descriptor) = self.columns.descriptor_at(column_index) else {
            return CellContent::Loading;
        };
        let Some(&snapshot_index) = self.visible_rows.get(row_index) else {
            return CellContent::Loading;
        };

        let node = &self.snapshot[snapshot_index];
        let value = node.field(descriptor.key);
        let display = match descriptor.formatter {
            Some(formatter) => formatter(&value),
            None => value.display(),
        };

        if let Some(tree) = &self.config.tree {
            if tree.tree_column == descriptor.key {
                return CellContent::Tree {
                    display,
                    depth: node.depth,
                    has_children: node.has_children(),
                    expanded: self.expanded.contains(&node.id),
                    node_id: node.id.clone(),
                };
            }
        }

        CellContent::Text { display, raw: value }
    }

    pub fn node_at_row(&self, row_index: usize) -> Option<&OrderNode> {
        self.visible_rows
            .get(row_index)
            .map(|&index| &self.snapshot[index])
    }

    /// 可见行数
    pub fn visible_row_count(&self) -> usize {
        self.visible_rows.len()
    }

    /// 快照总行数
    pub fn total_row_count(&self) -> usize {
        self.snapshot.len()
    }

    /// 状态栏用的 (显示行数, 总行数)
    pub fn row_counts(&self) -> (usize, usize) {
        (self.visible_rows.len(), self.snapshot.len())
    }

    // ==================== 高亮查询 ====================

    /// 行级闪烁强度
    pub fn row_intensity(&self, row_index: usize, now: Instant) -> f32 {
        let Some(node) = self.node_at_row(row_index) else {
            return 0.0;
        };
        match self.tracker.record(&node.id) {
            Some(record) => self.animator.record_intensity(record, now),
            None => 0.0,
        }
    }

    /// 单元格级闪烁强度
    pub fn cell_intensity(&self, column_index: usize, row_index: usize, now: Instant) -> f32 {
        let Some(descriptor) = self.columns.descriptor_at(column_index) else {
            return 0.0;
        };
        let Some(node) = self.node_at_row(row_index) else {
            return 0.0;
        };
        match self.tracker.record(&node.id) {
            Some(record) => self.animator.field_intensity(record, descriptor.key, now),
            None => 0.0,
        }
    }

    /// 是否仍有活跃闪烁（渲染面据此持续请求重绘）
    pub fn has_active_flashes(&self, now: Instant) -> bool {
        self.animator
            .any_active(self.tracker.records().map(|(_, r)| r), now)
    }

    pub fn change_record(&self, id: &str) -> Option<&ChangeRecord> {
        self.tracker.record(id)
    }

    pub fn live_change_count(&self) -> usize {
        self.tracker.len()
    }

    // ==================== 访问器 ====================

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn header_title(&self, column_index: usize) -> Option<String> {
        self.columns.header_title(column_index, self.sort)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn animator(&self) -> &HighlightAnimator {
        &self.animator
    }

    pub fn stats(&self) -> &GridStats {
        &self.stats
    }
}
