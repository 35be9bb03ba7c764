use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::error::{ProviderError, ProviderResult};
use super::types::{ProviderKind, ProviderStatus, SyntheticConfig};
use super::OrderProvider;
use crate::grid::data_structures::{OrderNode, OrderStatus, Side};

const BASE_CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "JPY", "AUD", "NZD", "CAD", "CHF"];
const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Alex", "Sarah", "Michael", "Emma", "David", "Olivia",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Jones", "Brown", "Davis", "Miller", "Wilson",
];
const VENUES: &[&str] = &[
    "JPM", "CITI", "BARC", "GS", "MS", "HSBC", "UBS", "CS", "DB", "BOA",
];
const ACCOUNTS: &[&str] = &[
    "Main", "Hedge", "Client-A", "Client-B", "Client-C", "Prop", "Alpha", "Beta", "Delta", "Gamma",
];
const STRATEGIES: &[&str] = &[
    "Momentum",
    "Mean Reversion",
    "Carry",
    "Volatility",
    "Directional",
    "Arbitrage",
    "Market Making",
    "Trend Following",
];

// 流式追加使用的小样本池
const STREAM_PAIRS: &[&str] = &["USD/EUR", "GBP/USD", "JPY/USD", "AUD/CAD"];
const STREAM_TRADERS: &[&str] = &["John Smith", "Jane Wilson", "Alex Johnson", "Sarah Davis"];
const STREAM_VENUES: &[&str] = &["JPM", "CITI", "BARC", "GS", "MS"];
const STREAM_ACCOUNTS: &[&str] = &["Main", "Hedge", "Client-A", "Client-B"];
const STREAM_STRATEGIES: &[&str] = &["Momentum", "Mean Reversion", "Carry", "Volatility"];

/// 合成订单数据源
///
/// 首次拉取生成完整的层级订单集；之后按配置的节奏追加新订单
/// （50%概率带两个子订单），并在延迟之后把它们转为FILLED，
/// 持续制造供变更跟踪器检测的字段差异
pub struct SyntheticOrderProvider {
    config: SyntheticConfig,
    orders: Vec<OrderNode>,
    status: ProviderStatus,
    next_stream_id: u64,
    last_create: Option<Instant>,
    // 到期后整批转为FILLED的订单id
    pending_fills: Vec<(Instant, Vec<String>)>,
}

impl SyntheticOrderProvider {
    pub fn new(config: SyntheticConfig) -> Self {
        Self {
            config,
            orders: Vec::new(),
            status: ProviderStatus::Created,
            next_stream_id: 10_000,
            last_create: None,
            pending_fills: Vec::new(),
        }
    }

    /// 推进流式更新：先落地到期的成交，再按间隔追加新订单
    fn advance(&mut self, now: Instant) {
        let mut due_ids: Vec<String> = Vec::new();
        self.pending_fills.retain(|(deadline, ids)| {
            if now >= *deadline {
                due_ids.extend(ids.iter().cloned());
                false
            } else {
                true
            }
        });
        if !due_ids.is_empty() {
            self.fill_orders(&due_ids);
        }

        let create_due = match self.last_create {
            Some(last) => now.duration_since(last).as_millis() as u64 >= self.config.create_interval_ms,
            None => true,
        };
        if create_due {
            let batch = self.create_order_batch();
            self.pending_fills.push((
                now + std::time::Duration::from_millis(self.config.fill_interval_ms),
                batch,
            ));
            self.last_create = Some(now);
        }
    }

    /// 追加一个新订单（50%概率带两个子订单），返回本批次的订单id
    fn create_order_batch(&mut self) -> Vec<String> {
        let mut rng = rand::thread_rng();

        let parent_id = format!("order-{}", self.next_stream_id);
        self.next_stream_id += 1;

        let currency_pair = pick(&mut rng, STREAM_PAIRS).to_string();
        let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
        let order_quantity = rng.gen_range(100_000..1_100_000) as i64;
        let limit_price = round4(rng.gen_range(0.5..2.0));
        let created = Utc::now();

        let has_children = rng.gen_bool(0.5);
        let child_ids: Vec<String> = if has_children {
            vec![
                format!("{}-child-0", parent_id),
                format!("{}-child-1", parent_id),
            ]
        } else {
            Vec::new()
        };

        let parent = OrderNode {
            id: parent_id.clone(),
            depth: 0,
            parent_id: None,
            child_ids: child_ids.clone(),
            currency_pair: currency_pair.clone(),
            side,
            order_quantity,
            limit_price: Some(limit_price),
            filled_price: None,
            filled_quantity: 0,
            status: OrderStatus::New,
            created_timestamp: created,
            updated_timestamp: created,
            trader: pick(&mut rng, STREAM_TRADERS).to_string(),
            venue: pick(&mut rng, STREAM_VENUES).to_string(),
            account: pick(&mut rng, STREAM_ACCOUNTS).to_string(),
            strategy: pick(&mut rng, STREAM_STRATEGIES).to_string(),
            notes: if has_children {
                "Order with 2 children".to_string()
            } else {
                "Order without children".to_string()
            },
        };

        let mut batch_ids = vec![parent_id.clone()];
        let mut batch = vec![parent];

        if has_children {
            let child_quantity = order_quantity / 2;
            for (index, child_id) in child_ids.iter().enumerate() {
                let offset = if index == 0 { 0.01 } else { -0.01 };
                let child_created = created + ChronoDuration::seconds(index as i64 + 1);
                let mut child = batch[0].clone();
                child.id = child_id.clone();
                child.depth = 1;
                child.parent_id = Some(parent_id.clone());
                child.child_ids = Vec::new();
                child.order_quantity = child_quantity;
                child.limit_price = Some(round4(limit_price + offset));
                child.created_timestamp = child_created;
                child.updated_timestamp = child_created;
                child.notes = format!("Child {} for {}", index + 1, parent_id);
                batch_ids.push(child_id.clone());
                batch.push(child);
            }
        }

        self.orders.extend(batch);
        batch_ids
    }

    /// 把指定订单转为FILLED：全量成交，价格在限价附近
    fn fill_orders(&mut self, ids: &[String]) {
        let mut rng = rand::thread_rng();
        let now = Utc::now();
        for order in self.orders.iter_mut() {
            if !ids.contains(&order.id) {
                continue;
            }
            let offset = if rng.gen_bool(0.5) { 0.0025 } else { -0.0025 };
            order.status = OrderStatus::Filled;
            order.filled_quantity = order.order_quantity;
            order.filled_price = order.limit_price.map(|p| p + offset);
            order.updated_timestamp = now;
        }
    }
}

#[async_trait]
impl OrderProvider for SyntheticOrderProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Synthetic
    }

    fn status(&self) -> ProviderStatus {
        self.status
    }

    async fn fetch_snapshot(&mut self) -> ProviderResult<Vec<OrderNode>> {
        match self.status {
            ProviderStatus::Stopped => return Err(ProviderError::Stopped),
            ProviderStatus::Created => {
                self.orders = generate_orders(&self.config);
                self.status = ProviderStatus::Running;
                log::info!("合成数据源已生成 {} 条订单", self.orders.len());
            }
            ProviderStatus::Running => {
                if self.config.stream_updates {
                    self.advance(Instant::now());
                }
            }
        }
        Ok(self.orders.clone())
    }

    fn stop(&mut self) {
        self.status = ProviderStatus::Stopped;
    }
}

/// 批量生成层级订单测试数据
///
/// 根订单数量取 max(5000, 配置值) 再压到总量的30%以内，剩余额度
/// 分配给最多5层深的子订单树：第1层每节点2-5个子单，往下逐层递减，
/// 子单数量从父单拆分。约90%的根会分到子订单额度
pub fn generate_orders(config: &SyntheticConfig) -> Vec<OrderNode> {
    let mut rng = rand::thread_rng();
    let count = config.total_orders;
    let min_required_roots = config.root_orders.max(5000);
    let actual_root_count = min_required_roots.min(count * 3 / 10).max(1);

    let end = Utc::now();
    let start = end - ChronoDuration::days(30);

    let mut orders: Vec<OrderNode> = Vec::with_capacity(count);
    for i in 0..actual_root_count {
        let currency_pair = random_currency_pair(&mut rng);
        let order_quantity = rng.gen_range(100_000..1_100_000) as i64;
        let limit_price = round4(rng.gen_range(0.5..2.0));
        let (status, filled_quantity, filled_price) =
            random_fill_state(&mut rng, order_quantity, limit_price, 0.05);

        orders.push(OrderNode {
            id: format!("order-{}", i),
            depth: 0,
            parent_id: None,
            child_ids: Vec::new(),
            currency_pair: currency_pair.clone(),
            side: if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell },
            order_quantity,
            limit_price: Some(limit_price),
            filled_price,
            filled_quantity,
            status,
            created_timestamp: random_time(&mut rng, start, end),
            updated_timestamp: random_time(&mut rng, start, end),
            trader: format!("{} {}", pick(&mut rng, FIRST_NAMES), pick(&mut rng, LAST_NAMES)),
            venue: pick(&mut rng, VENUES).to_string(),
            account: pick(&mut rng, ACCOUNTS).to_string(),
            strategy: pick(&mut rng, STRATEGIES).to_string(),
            notes: format!("Root order for {}", currency_pair),
        });
    }

    let remaining = count.saturating_sub(actual_root_count);
    if remaining == 0 {
        return orders;
    }

    // 选出将要挂子订单的根：前30%保证命中低序号，其余随机
    let target_with_children = actual_root_count * 9 / 10;
    let roots_with_children = target_with_children.min(remaining / 3).max(1);
    let orders_per_root = (remaining / roots_with_children).max(5);

    let guaranteed = roots_with_children * 3 / 10;
    let mut selected: Vec<usize> = (0..guaranteed.min(actual_root_count)).collect();
    let mut rest: Vec<usize> = (guaranteed..actual_root_count).collect();
    rest.shuffle(&mut rng);
    selected.extend(
        rest.into_iter()
            .take(roots_with_children.saturating_sub(selected.len())),
    );
    selected.shuffle(&mut rng);

    let mut all_children: Vec<OrderNode> = Vec::new();
    let mut budget = remaining;
    for root_index in selected {
        if budget == 0 {
            break;
        }
        let allocation = orders_per_root.min(budget);
        let parent = orders[root_index].clone();
        let children = create_child_orders(&mut rng, &parent, 1, allocation, allocation);
        orders[root_index].child_ids = children
            .iter()
            .filter(|c| c.parent_id.as_deref() == Some(parent.id.as_str()))
            .map(|c| c.id.clone())
            .collect();
        budget = budget.saturating_sub(children.len());
        all_children.extend(children);
    }

    log::debug!(
        "批量生成完成: {} 根订单, {} 子订单",
        actual_root_count,
        all_children.len()
    );
    orders.extend(all_children);
    orders
}

/// 递归生成某个父订单的子树，最多5层，每层的扇出随层级递减
fn create_child_orders(
    rng: &mut impl Rng,
    parent: &OrderNode,
    level: u32,
    max_children: usize,
    remaining: usize,
) -> Vec<OrderNode> {
    if level > 5 || remaining == 0 {
        return Vec::new();
    }

    let (min_count, max_count): (usize, usize) = match level {
        1 => (2.min(remaining), 5),
        2 => (2.min(remaining), 4),
        3 => (1.min(remaining), 3),
        4 => (0, 2),
        _ => (0, 1),
    };
    let child_count = rng
        .gen_range(min_count..=max_count)
        .max(min_count)
        .min(max_children)
        .min(remaining);
    if child_count == 0 {
        return Vec::new();
    }

    let mut children: Vec<OrderNode> = Vec::new();
    let mut remaining_for_descendants = remaining - child_count;

    for i in 0..child_count {
        let child_quantity = parent.order_quantity / child_count as i64;
        let parent_limit = parent.limit_price.unwrap_or(1.0);
        let limit_price = round4(parent_limit + rng.gen_range(-0.01..0.01));
        let (status, filled_quantity, filled_price) =
            random_fill_state(rng, child_quantity, parent_limit, 0.02);

        let created = parent.created_timestamp
            + ChronoDuration::milliseconds(rng.gen_range(0..30 * 60 * 1000));
        let updated = parent.created_timestamp
            + ChronoDuration::milliseconds(rng.gen_range(30 * 60 * 1000..90 * 60 * 1000));

        let mut child = OrderNode {
            id: format!("{}-child-{}", parent.id, i),
            depth: level,
            parent_id: Some(parent.id.clone()),
            child_ids: Vec::new(),
            currency_pair: parent.currency_pair.clone(),
            side: parent.side,
            order_quantity: child_quantity,
            limit_price: Some(limit_price),
            filled_price,
            filled_quantity,
            status,
            created_timestamp: created,
            updated_timestamp: updated,
            trader: parent.trader.clone(),
            venue: pick(rng, VENUES).to_string(),
            account: parent.account.clone(),
            strategy: parent.strategy.clone(),
            notes: format!("Child order for {}", parent.id),
        };

        if level < 5 && remaining_for_descendants > 0 {
            let allocation = match level {
                1 => ((remaining_for_descendants as f64 / (child_count as f64 * 0.7)) as usize).max(5),
                2 => ((remaining_for_descendants as f64 / (child_count as f64 * 0.8)) as usize).max(3),
                _ => (remaining_for_descendants / child_count).max(2),
            };
            let limit = allocation.min(remaining_for_descendants);
            if limit > 0 {
                let grandchildren = create_child_orders(rng, &child, level + 1, limit, limit);
                child.child_ids = grandchildren
                    .iter()
                    .filter(|g| g.parent_id.as_deref() == Some(child.id.as_str()))
                    .map(|g| g.id.clone())
                    .collect();
                remaining_for_descendants =
                    remaining_for_descendants.saturating_sub(grandchildren.len());
                children.push(child);
                children.extend(grandchildren);
                continue;
            }
        }

        children.push(child);
    }

    children
}

fn random_currency_pair(rng: &mut impl Rng) -> String {
    let base = pick(rng, BASE_CURRENCIES);
    loop {
        let quote = pick(rng, BASE_CURRENCIES);
        if quote != base {
            return format!("{}/{}", base, quote);
        }
    }
}

/// 随机的成交状态三元组 (状态, 成交量, 成交价)
fn random_fill_state(
    rng: &mut impl Rng,
    quantity: i64,
    limit_price: f64,
    price_jitter: f64,
) -> (OrderStatus, i64, Option<f64>) {
    let roll: f64 = rng.gen();
    if roll > 0.7 {
        let price = round4(limit_price + rng.gen_range(-price_jitter..price_jitter));
        (OrderStatus::Filled, quantity, Some(price))
    } else if roll > 0.5 {
        let filled = (quantity as f64 * rng.gen::<f64>()) as i64;
        let price = round4(limit_price + rng.gen_range(-price_jitter..price_jitter));
        (OrderStatus::PartiallyFilled, filled, Some(price))
    } else {
        (OrderStatus::New, 0, None)
    }
}

fn random_time(rng: &mut impl Rng, start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    let span_ms = (end - start).num_milliseconds().max(1);
    start + ChronoDuration::milliseconds(rng.gen_range(0..span_ms))
}

fn pick<'a>(rng: &mut impl Rng, values: &'a [&'a str]) -> &'a str {
    values[rng.gen_range(0..values.len())]
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
