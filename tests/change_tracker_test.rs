mod common;

use std::thread;
use std::time::{Duration, Instant};

use common::order;
use order_sight::{ColumnKey, ColumnLayout, FieldValue, GridConfig, GridRowModel};

fn new_model() -> GridRowModel {
    GridRowModel::new(GridConfig::default(), ColumnLayout::default_order_layout())
}

#[test]
fn quantity_update_produces_field_level_change_record() {
    let mut model = new_model();
    let t0 = Instant::now();

    let mut first = order("5", 0, None, &[]);
    first.order_quantity = 100;
    model.apply_snapshot(vec![first.clone()], t0);

    // 首个快照只是基线，不产生变更记录
    assert!(model.change_record("5").is_none());

    let mut second = first.clone();
    second.order_quantity = 150;
    model.apply_snapshot(vec![second], t0 + Duration::from_millis(100));

    let record = model.change_record("5").expect("应产生变更记录");
    assert!(!record.is_new);
    let change = record
        .updated_fields
        .get(&ColumnKey::Quantity)
        .expect("数量字段应被记录");
    assert_eq!(change.previous, FieldValue::Integer(100));
    assert_eq!(change.current, FieldValue::Integer(150));
}

#[test]
fn unknown_id_is_marked_new() {
    let mut model = new_model();
    let t0 = Instant::now();

    model.apply_snapshot(vec![order("a", 0, None, &[])], t0);
    model.apply_snapshot(
        vec![order("a", 0, None, &[]), order("b", 0, None, &[])],
        t0 + Duration::from_millis(50),
    );

    let record = model.change_record("b").expect("新id应产生记录");
    assert!(record.is_new);
    assert!(record.updated_fields.is_empty());
    assert!(model.change_record("a").is_none(), "未变化的节点没有记录");
}

#[test]
fn nodes_arriving_after_an_empty_baseline_are_new() {
    let mut model = new_model();
    let t0 = Instant::now();

    // 空快照也是有效基线，之后出现的节点算新节点
    model.apply_snapshot(Vec::new(), t0);
    model.apply_snapshot(
        vec![order("a", 0, None, &[])],
        t0 + Duration::from_millis(50),
    );

    let record = model.change_record("a").expect("空基线后的节点应产生记录");
    assert!(record.is_new);
}

#[test]
fn successive_changes_merge_and_refresh_timestamp() {
    let mut model = new_model();
    let t0 = Instant::now();
    let t1 = t0 + Duration::from_millis(200);
    let t2 = t0 + Duration::from_millis(400);

    let mut base = order("m", 0, None, &[]);
    base.order_quantity = 100;
    model.apply_snapshot(vec![base.clone()], t0);

    let mut step1 = base.clone();
    step1.order_quantity = 150;
    model.apply_snapshot(vec![step1.clone()], t1);

    let mut step2 = step1.clone();
    step2.trader = "Jane Wilson".to_string();
    model.apply_snapshot(vec![step2], t2);

    // t1的数量变更与t2的交易员变更都在，时间戳是t2
    let record = model.change_record("m").expect("记录应存活");
    assert!(record.updated_fields.contains_key(&ColumnKey::Quantity));
    assert!(record.updated_fields.contains_key(&ColumnKey::Trader));
    assert_eq!(record.timestamp, t2);
    assert!(!record.is_new);
}

#[test]
fn field_reverting_to_original_value_registers_again() {
    // 同一字段在两次diff里来回变化：每次都重新登记闪烁，
    // 记录里保存的是最近一次diff的前后值
    let mut model = new_model();
    let t0 = Instant::now();
    let t1 = t0 + Duration::from_millis(100);
    let t2 = t0 + Duration::from_millis(200);

    let mut base = order("r", 0, None, &[]);
    base.order_quantity = 100;
    model.apply_snapshot(vec![base.clone()], t0);

    let mut up = base.clone();
    up.order_quantity = 150;
    model.apply_snapshot(vec![up], t1);

    model.apply_snapshot(vec![base], t2);

    let record = model.change_record("r").expect("记录应存活");
    let change = record.updated_fields.get(&ColumnKey::Quantity).expect("数量字段在");
    assert_eq!(change.previous, FieldValue::Integer(150));
    assert_eq!(change.current, FieldValue::Integer(100));
    assert_eq!(record.timestamp, t2);
}

#[test]
fn merge_keeps_is_new_flag_from_earlier_diff() {
    let mut model = new_model();
    let t0 = Instant::now();
    let t1 = t0 + Duration::from_millis(100);
    let t2 = t0 + Duration::from_millis(200);

    model.apply_snapshot(vec![order("a", 0, None, &[])], t0);

    let mut fresh = order("n", 0, None, &[]);
    fresh.order_quantity = 100;
    model.apply_snapshot(vec![order("a", 0, None, &[]), fresh.clone()], t1);

    let mut updated = fresh.clone();
    updated.order_quantity = 200;
    model.apply_snapshot(vec![order("a", 0, None, &[]), updated], t2);

    let record = model.change_record("n").expect("记录应存活");
    assert!(record.is_new, "合并后保留isNew标记");
    assert!(record.updated_fields.contains_key(&ColumnKey::Quantity));
    assert_eq!(record.timestamp, t2);
}

#[test]
fn sweep_removes_records_past_expiry_window() {
    let mut model = new_model();
    let t0 = Instant::now();

    let mut base = order("s", 0, None, &[]);
    base.order_quantity = 100;
    model.apply_snapshot(vec![base.clone()], t0);

    let mut changed = base.clone();
    changed.order_quantity = 150;
    let detected_at = t0 + Duration::from_millis(10);
    model.apply_snapshot(vec![changed], detected_at);
    assert!(model.change_record("s").is_some());

    // 过期窗口内清扫不删除
    let removed = model.sweep_expired(detected_at + Duration::from_millis(1999));
    assert_eq!(removed, 0);
    assert!(model.change_record("s").is_some());

    // 超过2000ms后被清扫
    let removed = model.sweep_expired(detected_at + Duration::from_millis(2001));
    assert_eq!(removed, 1);
    assert!(model.change_record("s").is_none());
}

#[test]
fn sweep_removes_expired_records_in_real_time() {
    let mut model = new_model();

    let mut base = order("t", 0, None, &[]);
    base.order_quantity = 100;
    model.apply_snapshot(vec![base.clone()], Instant::now());

    let mut changed = base.clone();
    changed.order_quantity = 175;
    model.apply_snapshot(vec![changed], Instant::now());
    assert_eq!(model.live_change_count(), 1);

    // 等待超过2秒的过期窗口
    thread::sleep(Duration::from_millis(2100));
    model.sweep_expired(Instant::now());

    assert_eq!(model.live_change_count(), 0, "过期记录应被清扫");
}

#[test]
fn nodes_without_id_are_not_tracked() {
    let mut model = new_model();
    let t0 = Instant::now();

    let mut anonymous = order("", 0, None, &[]);
    anonymous.order_quantity = 100;
    model.apply_snapshot(vec![anonymous.clone(), order("a", 0, None, &[])], t0);

    anonymous.order_quantity = 999;
    model.apply_snapshot(
        vec![anonymous, order("a", 0, None, &[])],
        t0 + Duration::from_millis(50),
    );

    assert!(model.change_record("").is_none(), "无id节点不参与变更跟踪");
    assert_eq!(model.live_change_count(), 0);
}

#[test]
fn only_displayed_columns_are_diffed() {
    let mut model = new_model();
    let t0 = Instant::now();

    let mut base = order("d", 0, None, &[]);
    base.notes = "before".to_string();
    model.apply_snapshot(vec![base.clone()], t0);

    // Notes不在默认列布局里，变化不应登记
    let mut changed = base.clone();
    changed.notes = "after".to_string();
    model.apply_snapshot(vec![changed], t0 + Duration::from_millis(50));

    assert!(model.change_record("d").is_none());
}
