//! Single-customer profile with derived spending stats and a demo timeline.

use chrono::NaiveDate;
use evocrm_core::types::Customer;
use serde::Serialize;

/// Orders shown for every customer until order history exists.
pub const DEMO_ORDER_COUNT: u32 = 24;
const LOYALTY_RATE: f64 = 0.1;
const ANNUAL_VALUE_FACTOR: f64 = 4.0;
const OVERVIEW_ACTIVITY: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerStats {
    pub total_spent: f64,
    pub orders: u32,
    pub average_order_value: f64,
    pub loyalty_points: f64,
    pub annual_value: f64,
}

impl CustomerStats {
    pub fn for_customer(customer: &Customer) -> Self {
        let spent = customer.total_spent;
        Self {
            total_spent: spent,
            orders: DEMO_ORDER_COUNT,
            average_order_value: (spent / f64::from(DEMO_ORDER_COUNT)).round(),
            loyalty_points: (spent * LOYALTY_RATE).round(),
            annual_value: spent * ANNUAL_VALUE_FACTOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub date: NaiveDate,
    pub action: &'static str,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub date: NaiveDate,
    pub author: &'static str,
    pub content: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub title: &'static str,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetail {
    pub customer: Customer,
    pub stats: CustomerStats,
    /// Most recent entries of `activities`, for the overview tab.
    pub recent_activity: Vec<Activity>,
    pub activities: Vec<Activity>,
    pub notes: Vec<Note>,
    pub tasks: Vec<Task>,
    pub back_to: &'static str,
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

impl CustomerDetail {
    pub fn new(customer: Customer) -> Self {
        let activities = vec![
            Activity { date: day(2024, 2, 15), action: "Made a purchase", amount: Some(1250.0) },
            Activity { date: day(2024, 2, 10), action: "Updated contact info", amount: None },
            Activity { date: day(2024, 1, 28), action: "Submitted support ticket", amount: None },
            Activity { date: day(2024, 1, 15), action: "Made a purchase", amount: Some(890.0) },
        ];
        let notes = vec![
            Note { date: day(2024, 2, 12), author: "Evano", content: "Customer requested priority support." },
            Note { date: day(2024, 1, 20), author: "Sarah", content: "Follow up on renewal next month." },
        ];
        let tasks = vec![
            Task { title: "Send renewal quote", due_date: day(2024, 3, 1), status: TaskStatus::Pending },
            Task { title: "Schedule quarterly review", due_date: day(2024, 3, 15), status: TaskStatus::Completed },
        ];

        Self {
            stats: CustomerStats::for_customer(&customer),
            customer,
            recent_activity: activities.iter().take(OVERVIEW_ACTIVITY).cloned().collect(),
            activities,
            notes,
            tasks,
            back_to: "/customers",
        }
    }
}
