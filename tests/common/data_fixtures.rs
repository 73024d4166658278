//! 测试数据生成模块
//!
//! 提供一个确定性的订单表：行由固定种子的 `StdRng` 生成，
//! 同样的比例因子和分区参数总是产生同样的行序列。

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tablestats::core::{Accessor, Column, ColumnDef, ColumnType, Table};

/// 比例因子为 1 时的订单行数
pub const ORDERS_PER_SCALE_FACTOR: f64 = 150_000.0;
/// 比例因子为 1 时的客户数
pub const CUSTOMERS_PER_SCALE_FACTOR: f64 = 15_000.0;

pub const ORDER_STATUSES: [&str; 3] = ["F", "O", "P"];
pub const ORDER_PRIORITIES: [&str; 5] = ["1-URGENT", "2-HIGH", "3-MEDIUM", "4-NOT SPECIFIED", "5-LOW"];

const COMMENT_WORDS: [&str; 12] = [
    "furiously", "carefully", "quickly", "final", "pending", "regular", "deposits", "requests",
    "accounts", "packages", "ideas", "sleep",
];

const SEED: u64 = 0x5eed_0d5;

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_key: i64,
    pub cust_key: i64,
    pub order_status: String,
    pub total_price: f64,
    pub order_date: NaiveDate,
    pub order_priority: String,
    pub clerk: String,
    pub ship_priority: i32,
    pub comment: String,
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1992, 1, 1).expect("valid date")
}

pub fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1998, 8, 2).expect("valid date")
}

pub fn order_count(scale_factor: f64) -> u64 {
    (ORDERS_PER_SCALE_FACTOR * scale_factor) as u64
}

/// 订单表
pub struct OrdersTable {
    columns: Vec<ColumnDef<Order>>,
}

impl OrdersTable {
    pub fn new() -> Self {
        Self {
            columns: orders_columns(),
        }
    }

    /// 把 o_orderdate 错误地接到整数读取器上的订单表
    pub fn with_misdeclared_date() -> Self {
        let mut columns = orders_columns();
        for column in columns.iter_mut() {
            if column.name() == "o_orderdate" {
                *column = ColumnDef::new(
                    "o_orderdate",
                    ColumnType::Date,
                    Accessor::Integer(Box::new(|o: &Order| Some(o.ship_priority))),
                );
            }
        }
        Self { columns }
    }

    /// 带一个无法识别类型列的订单表
    pub fn with_unsupported_column() -> Self {
        let mut columns = orders_columns();
        columns.push(ColumnDef::other("o_extra", "decimal(12,2)"));
        Self { columns }
    }
}

fn orders_columns() -> Vec<ColumnDef<Order>> {
    vec![
        ColumnDef::identifier("o_orderkey", |o: &Order| o.order_key),
        ColumnDef::identifier("o_custkey", |o: &Order| o.cust_key),
        ColumnDef::varchar("o_orderstatus", 1, |o: &Order| o.order_status.clone()),
        ColumnDef::double("o_totalprice", |o: &Order| o.total_price),
        ColumnDef::date("o_orderdate", |o: &Order| o.order_date),
        ColumnDef::varchar("o_orderpriority", 15, |o: &Order| o.order_priority.clone()),
        ColumnDef::varchar("o_clerk", 15, |o: &Order| o.clerk.clone()),
        ColumnDef::integer("o_shippriority", |o: &Order| o.ship_priority),
        ColumnDef::varchar("o_comment", 79, |o: &Order| o.comment.clone()),
    ]
}

impl Table for OrdersTable {
    type Row = Order;
    type Rows = OrderGenerator;

    fn name(&self) -> &str {
        "orders"
    }

    fn columns(&self) -> &[ColumnDef<Order>] {
        &self.columns
    }

    fn create_generator(&self, scale_factor: f64, part: u32, part_count: u32) -> OrderGenerator {
        OrderGenerator::new(scale_factor, part, part_count)
    }
}

/// 订单行生成器
pub struct OrderGenerator {
    rng: StdRng,
    next: u64,
    end: u64,
    customers: i64,
    date_span: i64,
}

impl OrderGenerator {
    pub fn new(scale_factor: f64, part: u32, part_count: u32) -> Self {
        let total = order_count(scale_factor);
        let part_count = part_count.max(1) as u64;
        let part = (part.max(1) as u64).min(part_count);
        let start = total * (part - 1) / part_count;
        let end = total * part / part_count;

        Self {
            rng: StdRng::seed_from_u64(SEED ^ part ^ (part_count << 32)),
            next: start,
            end,
            customers: ((CUSTOMERS_PER_SCALE_FACTOR * scale_factor) as i64).max(1),
            date_span: (end_date() - start_date()).num_days(),
        }
    }
}

impl Iterator for OrderGenerator {
    type Item = Order;

    fn next(&mut self) -> Option<Order> {
        if self.next >= self.end {
            return None;
        }
        self.next += 1;

        let rng = &mut self.rng;
        let word_count = rng.gen_range(3..=8);
        let comment = (0..word_count)
            .map(|_| COMMENT_WORDS[rng.gen_range(0..COMMENT_WORDS.len())])
            .collect::<Vec<_>>()
            .join(" ");

        Some(Order {
            order_key: self.next as i64,
            cust_key: rng.gen_range(1..=self.customers),
            order_status: ORDER_STATUSES[rng.gen_range(0..ORDER_STATUSES.len())].to_string(),
            total_price: (rng.gen_range(90_000..=50_000_000) as f64) / 100.0,
            order_date: start_date() + Duration::days(rng.gen_range(0..=self.date_span)),
            order_priority: ORDER_PRIORITIES[rng.gen_range(0..ORDER_PRIORITIES.len())].to_string(),
            clerk: format!("Clerk#{:09}", rng.gen_range(1..=1000)),
            ship_priority: 0,
            comment,
        })
    }
}
