use once_cell::sync::Lazy;

use super::data_structures::{ColumnKey, FieldValue};
use super::sort::{SortDirection, SortSpec};

/// 单元格自定义格式化函数：值 -> 展示文本
pub type CellFormatter = fn(&FieldValue) -> String;

/// 列描述符
///
/// key 是稳定标识，拖动列顺序后依然指向同一字段
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    pub key: ColumnKey,
    pub title: String,
    pub width: f32,
    pub formatter: Option<CellFormatter>,
}

impl ColumnDescriptor {
    pub fn new(key: ColumnKey, title: &str, width: f32) -> Self {
        Self {
            key,
            title: title.to_string(),
            width,
            formatter: None,
        }
    }

    pub fn with_formatter(mut self, formatter: CellFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

/// 列布局管理器 - 有序的列集合，支持拖动换位与宽度调整
///
/// 两个操作都立即对后续的单元格解析和表头查询生效
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnLayout {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// 默认的订单列布局
    pub fn default_order_layout() -> Self {
        Self::new(DEFAULT_ORDER_COLUMNS.clone())
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn descriptor_at(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    pub fn index_of(&self, key: ColumnKey) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// 当前展示的列键序列（diff只对比展示中的字段）
    pub fn keys(&self) -> Vec<ColumnKey> {
        self.columns.iter().map(|c| c.key).collect()
    }

    /// 把 from 位置的列移动到 to 位置，其余列相对顺序不变
    pub fn move_column(&mut self, from: usize, to: usize) {
        if from >= self.columns.len() || to >= self.columns.len() || from == to {
            return;
        }
        let descriptor = self.columns.remove(from);
        self.columns.insert(to, descriptor);
    }

    /// 仅替换指定列的宽度
    pub fn resize_column(&mut self, index: usize, new_width: f32) {
        if let Some(descriptor) = self.columns.get_mut(index) {
            descriptor.width = new_width;
        }
    }

    /// 表头标题，活跃排序列带 ▲/▼ 指示符
    pub fn header_title(&self, index: usize, sort: Option<SortSpec>) -> Option<String> {
        let descriptor = self.columns.get(index)?;
        let indicator = match sort {
            Some(spec) if spec.key == descriptor.key => match spec.direction {
                SortDirection::Ascending => " ▲",
                SortDirection::Descending => " ▼",
            },
            _ => "",
        };
        Some(format!("{}{}", descriptor.title, indicator))
    }
}

/// 默认订单列集合（含每列的展示格式化）
static DEFAULT_ORDER_COLUMNS: Lazy<Vec<ColumnDescriptor>> = Lazy::new(|| {
    vec![
        ColumnDescriptor::new(ColumnKey::Id, "Order ID", 200.0),
        ColumnDescriptor::new(ColumnKey::Status, "Status", 150.0),
        ColumnDescriptor::new(ColumnKey::Created, "Created", 180.0).with_formatter(fmt_timestamp),
        ColumnDescriptor::new(ColumnKey::Updated, "Updated", 180.0).with_formatter(fmt_timestamp),
        ColumnDescriptor::new(ColumnKey::Quantity, "Quantity", 120.0).with_formatter(fmt_quantity),
        ColumnDescriptor::new(ColumnKey::Side, "Side", 80.0),
        ColumnDescriptor::new(ColumnKey::FilledQuantity, "Filled", 120.0)
            .with_formatter(fmt_quantity),
        ColumnDescriptor::new(ColumnKey::LimitPrice, "Limit Price", 120.0)
            .with_formatter(fmt_limit_price),
        ColumnDescriptor::new(ColumnKey::FilledPrice, "Filled Price", 120.0)
            .with_formatter(fmt_filled_price),
        ColumnDescriptor::new(ColumnKey::Trader, "Trader", 150.0),
        ColumnDescriptor::new(ColumnKey::Venue, "Venue", 80.0),
        ColumnDescriptor::new(ColumnKey::Account, "Account", 120.0),
        ColumnDescriptor::new(ColumnKey::Strategy, "Strategy", 150.0),
    ]
});

fn fmt_timestamp(value: &FieldValue) -> String {
    match value {
        FieldValue::Time(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => String::new(),
    }
}

fn fmt_quantity(value: &FieldValue) -> String {
    match value {
        FieldValue::Integer(n) => n.to_string(),
        _ => "0".to_string(),
    }
}

fn fmt_limit_price(value: &FieldValue) -> String {
    match value {
        FieldValue::Number(p) => format!("{:.4}", p),
        _ => "0.0000".to_string(),
    }
}

fn fmt_filled_price(value: &FieldValue) -> String {
    match value {
        FieldValue::Number(p) => format!("{:.4}", p),
        _ => "-".to_string(),
    }
}
