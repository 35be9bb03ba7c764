use chrono::{TimeZone, Utc};
use order_sight::{GridRowModel, OrderNode, OrderStatus, Side};

/// 构造一条测试订单
pub fn order(id: &str, depth: u32, parent_id: Option<&str>, child_ids: &[&str]) -> OrderNode {
    OrderNode {
        id: id.to_string(),
        depth,
        parent_id: parent_id.map(|p| p.to_string()),
        child_ids: child_ids.iter().map(|c| c.to_string()).collect(),
        currency_pair: "USD/EUR".to_string(),
        side: Side::Buy,
        order_quantity: 100_000,
        limit_price: Some(1.0),
        filled_price: None,
        filled_quantity: 0,
        status: OrderStatus::New,
        created_timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        updated_timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        trader: "John Smith".to_string(),
        venue: "JPM".to_string(),
        account: "Main".to_string(),
        strategy: "Momentum".to_string(),
        notes: String::new(),
    }
}

/// 当前可见行的id序列
pub fn visible_ids(model: &GridRowModel) -> Vec<String> {
    (0..model.visible_row_count())
        .filter_map(|row| model.node_at_row(row).map(|n| n.id.clone()))
        .collect()
}
