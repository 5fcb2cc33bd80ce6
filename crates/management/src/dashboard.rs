//! Stat cards and chart series computed from the held records.

use evocrm_core::types::{
    Campaign, CampaignStatus, CampaignType, ChannelShare, Customer, CustomerStatus, Invoice, InvoiceStatus,
    Product, ProductStatus, RevenuePoint,
};
use serde::Serialize;

const ACTIVE_AVATARS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: f64,
    /// `value` as the card renders it, without prefix or suffix.
    pub display: String,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub prefix: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub suffix: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub avatars: Vec<String>,
}

impl StatCard {
    fn new(title: &'static str, value: f64) -> Self {
        Self {
            title,
            value,
            display: format_stat_value(value),
            prefix: "",
            suffix: "",
            avatars: Vec::new(),
        }
    }

    fn prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = prefix;
        self
    }

    fn suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = suffix;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub customers: Vec<StatCard>,
    pub products: Vec<StatCard>,
    pub income: Vec<StatCard>,
    pub campaigns: Vec<StatCard>,
    pub revenue: Vec<RevenuePoint>,
    pub channels: Vec<ChannelShare>,
}

/// `1.2M` from a million up, thousands separators from a thousand up,
/// otherwise the plain number.
pub fn format_stat_value(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        group_thousands(value)
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// At most three fraction digits, trailing zeros dropped.
fn group_thousands(value: f64) -> String {
    let fixed = format!("{value:.3}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac}")
    }
}

pub fn customer_cards(customers: &[Customer]) -> Vec<StatCard> {
    let active: Vec<&Customer> = customers
        .iter()
        .filter(|c| c.status == CustomerStatus::Active)
        .collect();
    let members = customers.iter().filter(|c| c.total_spent > 0.0).count();

    let mut active_now = StatCard::new("Active Now", active.len() as f64);
    active_now.avatars = active
        .iter()
        .take(ACTIVE_AVATARS)
        .map(|c| c.avatar.clone())
        .collect();

    vec![
        StatCard::new("Total Customers", customers.len() as f64),
        StatCard::new("Members", members as f64),
        active_now,
    ]
}

pub fn product_cards(products: &[Product]) -> Vec<StatCard> {
    let count = |status: ProductStatus| products.iter().filter(|p| p.status == status).count() as f64;
    vec![
        StatCard::new("Total Products", products.len() as f64),
        StatCard::new("In Stock", count(ProductStatus::InStock)),
        StatCard::new("Low Stock", count(ProductStatus::LowStock)),
        StatCard::new("Out of Stock", count(ProductStatus::OutOfStock)),
    ]
}

pub fn income_cards(invoices: &[Invoice], revenue: &[RevenuePoint]) -> Vec<StatCard> {
    let total = |status: InvoiceStatus| -> f64 {
        invoices
            .iter()
            .filter(|i| i.status == status)
            .map(|i| i.amount)
            .sum()
    };
    let this_month = revenue.last().map(|p| p.revenue).unwrap_or(0.0);
    vec![
        StatCard::new("Total Revenue", total(InvoiceStatus::Paid)).prefix("$"),
        StatCard::new("This Month", this_month).prefix("$"),
        StatCard::new("Pending Invoices", total(InvoiceStatus::Pending)).prefix("$"),
        StatCard::new("Overdue", total(InvoiceStatus::Overdue)).prefix("$"),
    ]
}

/// Clicks over recipients as a percentage with one decimal.
pub fn conversion_rate(campaigns: &[Campaign]) -> f64 {
    let recipients: u64 = campaigns.iter().map(|c| c.recipients).sum();
    if recipients == 0 {
        return 0.0;
    }
    let clicks: u64 = campaigns.iter().map(|c| c.clicks).sum();
    (clicks as f64 / recipients as f64 * 1000.0).round() / 10.0
}

pub fn campaign_cards(campaigns: &[Campaign]) -> Vec<StatCard> {
    let active = campaigns
        .iter()
        .filter(|c| c.status == CampaignStatus::Active)
        .count();
    let emails_sent: u64 = campaigns
        .iter()
        .filter(|c| c.kind == CampaignType::Email && c.sent_date.is_some())
        .map(|c| c.recipients)
        .sum();
    vec![
        StatCard::new("Total Campaigns", campaigns.len() as f64),
        StatCard::new("Active Campaigns", active as f64),
        StatCard::new("Emails Sent", emails_sent as f64),
        StatCard::new("Conversion Rate", conversion_rate(campaigns)).suffix("%"),
    ]
}

/// Share of recipients per channel, in whole percents.
pub fn channel_share(campaigns: &[Campaign]) -> Vec<ChannelShare> {
    let total: u64 = campaigns.iter().map(|c| c.recipients).sum();
    [CampaignType::Email, CampaignType::Sms]
        .into_iter()
        .map(|kind| {
            let reached: u64 = campaigns
                .iter()
                .filter(|c| c.kind == kind)
                .map(|c| c.recipients)
                .sum();
            let value = if total == 0 {
                0
            } else {
                (reached as f64 / total as f64 * 100.0).round() as u32
            };
            ChannelShare {
                name: kind.label().to_string(),
                value,
            }
        })
        .collect()
}
