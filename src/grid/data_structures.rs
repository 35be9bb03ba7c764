use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 订单方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::PartiallyFilled => "PARTIALLY_FILLED",
            OrderStatus::Filled => "FILLED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Rejected => "REJECTED",
        }
    }
}

/// 列标识 - 字段的稳定键，与列的显示位置无关
///
/// 行数据的读取永远通过列键进行，不使用位置下标，
/// 因此拖动列顺序不会导致表头与数据错位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKey {
    Id,
    Status,
    Created,
    Updated,
    Quantity,
    Side,
    FilledQuantity,
    LimitPrice,
    FilledPrice,
    Trader,
    Venue,
    Account,
    Strategy,
    Notes,
}

/// 类型化字段值 - 排序、差异对比、单元格展示统一使用
///
/// Absent 表示缺失值（排序时恒排最后，展示为空字符串）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Time(DateTime<Utc>),
    Absent,
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// 默认的文本展示形式（列可以用自定义格式化函数覆盖）
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format!("{}", n),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Time(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
            FieldValue::Absent => String::new(),
        }
    }
}

/// FX订单节点 - 一条层级订单记录（根订单或拆分出的子订单）
///
/// 不变式：
/// - id 在快照内唯一，子订单的 depth 等于父订单 depth + 1
/// - child_ids 中的每个 id 应当能在同一快照中解析到（解析失败被容忍并跳过）
/// - 节点是不可变的值快照，每次刷新整体替换而不是原地修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderNode {
    pub id: String,
    pub depth: u32,
    pub parent_id: Option<String>,
    pub child_ids: Vec<String>,
    pub currency_pair: String,
    pub side: Side,
    pub order_quantity: i64,
    pub limit_price: Option<f64>,
    pub filled_price: Option<f64>,
    pub filled_quantity: i64,
    pub status: OrderStatus,
    pub created_timestamp: DateTime<Utc>,
    pub updated_timestamp: DateTime<Utc>,
    pub trader: String,
    pub venue: String,
    pub account: String,
    pub strategy: String,
    pub notes: String,
}

impl OrderNode {
    pub fn has_children(&self) -> bool {
        !self.child_ids.is_empty()
    }

    /// 按列键读取字段值
    pub fn field(&self, key: ColumnKey) -> FieldValue {
        match key {
            ColumnKey::Id => FieldValue::Text(self.id.clone()),
            ColumnKey::Status => FieldValue::Text(self.status.as_str().to_string()),
            ColumnKey::Created => FieldValue::Time(self.created_timestamp),
            ColumnKey::Updated => FieldValue::Time(self.updated_timestamp),
            ColumnKey::Quantity => FieldValue::Integer(self.order_quantity),
            ColumnKey::Side => FieldValue::Text(self.side.as_str().to_string()),
            ColumnKey::FilledQuantity => FieldValue::Integer(self.filled_quantity),
            ColumnKey::LimitPrice => match self.limit_price {
                Some(p) => FieldValue::Number(p),
                None => FieldValue::Absent,
            },
            ColumnKey::FilledPrice => match self.filled_price {
                Some(p) => FieldValue::Number(p),
                None => FieldValue::Absent,
            },
            ColumnKey::Trader => FieldValue::Text(self.trader.clone()),
            ColumnKey::Venue => FieldValue::Text(self.venue.clone()),
            ColumnKey::Account => FieldValue::Text(self.account.clone()),
            ColumnKey::Strategy => FieldValue::Text(self.strategy.clone()),
            ColumnKey::Notes => FieldValue::Text(self.notes.clone()),
        }
    }
}

/// 树形网格配置 - 指定承载展开/收起手柄的列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeGridConfig {
    pub tree_column: ColumnKey,
}

/// 网格核心配置
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// 树形配置，None 时退化为平面表格
    pub tree: Option<TreeGridConfig>,
    /// 变更记录过期窗口（毫秒）
    pub change_expiry_ms: u64,
    /// 过期记录清扫间隔（毫秒）
    pub sweep_interval_ms: u64,
    /// 闪烁总时长（毫秒）
    pub flash_duration_ms: u64,
    /// 闪烁脉冲周期（毫秒）
    pub flash_period_ms: u64,
    /// 包络开始衰减时的进度占比
    pub fade_out_start: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tree: Some(TreeGridConfig {
                tree_column: ColumnKey::Id,
            }),
            change_expiry_ms: 2000,
            sweep_interval_ms: 500,
            flash_duration_ms: 5000,
            flash_period_ms: 1500,
            fade_out_start: 0.7,
        }
    }
}

/// 网格统计信息
#[derive(Debug, Clone, Default)]
pub struct GridStats {
    /// 已应用的快照次数
    pub total_refreshes: u64,
    /// 可见行序列的重建次数
    pub total_flatten_rebuilds: u64,
    /// 累计检测到的变更节点数
    pub total_changes_detected: u64,
    /// 累计清扫掉的过期变更记录数
    pub total_records_swept: u64,
    /// 累计跳过的无法解析的子节点引用数
    pub skipped_child_refs: u64,
}
