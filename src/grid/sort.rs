use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::data_structures::{ColumnKey, FieldValue, OrderNode};

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// 排序规格 - 由表头点击维护
///
/// 排序独立作用于每个兄弟分组内部（根订单是一组，每个节点的直接子订单各是一组），
/// 从不跨层级全局排序，以保持树的父子嵌套结构
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: ColumnKey,
    pub direction: SortDirection,
}

/// 比较两个字段值
///
/// 规则：
/// - 双方缺失视为相等（稳定排序保持快照顺序）
/// - 仅一方缺失时，缺失方恒排最后，降序也不反转
/// - 双方都存在时按自然顺序比较，再按方向取正/反
pub fn compare_field_values(a: &FieldValue, b: &FieldValue, direction: SortDirection) -> Ordering {
    match (a.is_absent(), b.is_absent()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let natural = natural_order(a, b);
            match direction {
                SortDirection::Ascending => natural,
                SortDirection::Descending => natural.reverse(),
            }
        }
    }
}

/// 同类型按值比较；异构类型退化为固定的类型秩比较，从不报错
fn natural_order(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => OrderedFloat(*x).cmp(&OrderedFloat(*y)),
        (FieldValue::Integer(x), FieldValue::Integer(y)) => x.cmp(y),
        (FieldValue::Number(x), FieldValue::Integer(y)) => {
            OrderedFloat(*x).cmp(&OrderedFloat(*y as f64))
        }
        (FieldValue::Integer(x), FieldValue::Number(y)) => {
            OrderedFloat(*x as f64).cmp(&OrderedFloat(*y))
        }
        (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
        (FieldValue::Time(x), FieldValue::Time(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::Number(_) | FieldValue::Integer(_) => 0,
        FieldValue::Text(_) => 1,
        FieldValue::Time(_) => 2,
        FieldValue::Absent => 3,
    }
}

/// 对一个兄弟分组排序
///
/// `siblings` 是快照内的下标序列；排序是稳定的，相等元素保持快照顺序。
/// 本函数对层级一无所知，由树展平器按分组逐一调用
pub fn sort_siblings(snapshot: &[OrderNode], siblings: &mut [usize], spec: SortSpec) {
    siblings.sort_by(|&a, &b| {
        let va = snapshot[a].field(spec.key);
        let vb = snapshot[b].field(spec.key);
        compare_field_values(&va, &vb, spec.direction)
    });
}
