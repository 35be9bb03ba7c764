use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::data_structures::{ColumnKey, FieldValue, OrderNode};

/// 单个字段的变更前后值
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub previous: FieldValue,
    pub current: FieldValue,
}

/// 变更记录 - 某个节点相对上一快照检测到的差异
///
/// 生命周期：diff首次检测到新id或字段变化时创建；过期前再次diff到
/// 同一节点时合并（字段并集、is_new取或、时间戳换成最新）；
/// 由周期清扫在年龄超过过期窗口后删除
#[derive(Debug, Clone)]
pub struct ChangeRecord {
    pub is_new: bool,
    pub updated_fields: HashMap<ColumnKey, FieldChange>,
    pub timestamp: Instant,
}

impl ChangeRecord {
    /// 该记录是否会影响指定列的展示（新节点影响所有列）
    pub fn affects(&self, key: ColumnKey) -> bool {
        self.is_new || self.updated_fields.contains_key(&key)
    }
}

/// 变更跟踪器 - 对比相邻两次快照，维护带过期窗口的变更记录
///
/// 记录归本跟踪器独占所有；单元格解析与高亮动画只做只读访问。
/// 清扫只删除、从不创建，与diff周期相互独立
#[derive(Debug)]
pub struct ChangeTracker {
    records: HashMap<String, ChangeRecord>,
    previous: HashMap<String, OrderNode>,
    // 基线快照是否已记录（空快照也算有效基线）
    primed: bool,
    expiry: Duration,
}

impl ChangeTracker {
    pub fn new(expiry: Duration) -> Self {
        Self {
            records: HashMap::new(),
            previous: HashMap::new(),
            primed: false,
            expiry,
        }
    }

    /// 对比当前快照与上一快照，把检测到的变更合并进存活记录
    ///
    /// 首次调用只记住快照不产生记录（初始数据不算“变更”）。
    /// id为空的节点无法被跟踪，整体跳过。
    /// 返回本轮产生变更的节点数
    pub fn diff(&mut self, current: &[OrderNode], columns: &[ColumnKey], now: Instant) -> usize {
        if !self.primed {
            self.remember(current);
            self.primed = true;
            return 0;
        }

        let mut fresh: HashMap<String, ChangeRecord> = HashMap::new();
        for node in current {
            if node.id.is_empty() {
                continue;
            }

            match self.previous.get(&node.id) {
                None => {
                    fresh.insert(
                        node.id.clone(),
                        ChangeRecord {
                            is_new: true,
                            updated_fields: HashMap::new(),
                            timestamp: now,
                        },
                    );
                }
                Some(previous) => {
                    let mut updated_fields = HashMap::new();
                    for &key in columns {
                        let current_value = node.field(key);
                        let previous_value = previous.field(key);
                        if current_value != previous_value {
                            updated_fields.insert(
                                key,
                                FieldChange {
                                    previous: previous_value,
                                    current: current_value,
                                },
                            );
                        }
                    }
                    if !updated_fields.is_empty() {
                        fresh.insert(
                            node.id.clone(),
                            ChangeRecord {
                                is_new: false,
                                updated_fields,
                                timestamp: now,
                            },
                        );
                    }
                }
            }
        }

        let detected = fresh.len();
        for (id, change) in fresh {
            match self.records.get_mut(&id) {
                Some(existing) => {
                    // 合并：字段按并集（后到覆盖同名字段），is_new取或，时间戳取最新
                    existing.is_new = existing.is_new || change.is_new;
                    existing.updated_fields.extend(change.updated_fields);
                    existing.timestamp = change.timestamp;
                }
                None => {
                    self.records.insert(id, change);
                }
            }
        }

        self.remember(current);
        detected
    }

    /// 删除年龄超过过期窗口的记录，返回删除数量
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let expiry = self.expiry;
        let before = self.records.len();
        self.records
            .retain(|_, record| now.duration_since(record.timestamp) <= expiry);
        before - self.records.len()
    }

    pub fn record(&self, id: &str) -> Option<&ChangeRecord> {
        self.records.get(id)
    }

    pub fn records(&self) -> impl Iterator<Item = (&String, &ChangeRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn remember(&mut self, current: &[OrderNode]) {
        self.previous = current
            .iter()
            .filter(|n| !n.id.is_empty())
            .map(|n| (n.id.clone(), n.clone()))
            .collect();
    }
}
