//! CRM domain records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Customer ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub country: String,
    pub status: CustomerStatus,
    pub avatar: String,
    pub joined_date: NaiveDate,
    pub total_spent: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    #[default]
    Active,
    Inactive,
}

impl CustomerStatus {
    pub fn label(self) -> &'static str {
        match self {
            CustomerStatus::Active => "Active",
            CustomerStatus::Inactive => "Inactive",
        }
    }
}

// ─── Product ───────────────────────────────────────────────────────────────

/// Product record. `status` is entered by the user and is not derived from `stock`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub status: ProductStatus,
    pub image: String,
    pub sku: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    InStock,
    LowStock,
    OutOfStock,
}

impl ProductStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProductStatus::InStock => "In Stock",
            ProductStatus::LowStock => "Low Stock",
            ProductStatus::OutOfStock => "Out of Stock",
        }
    }
}

/// Categories offered by the product editor.
pub const PRODUCT_CATEGORIES: [&str; 4] = ["Electronics", "Furniture", "Accessories", "Software"];

// ─── Invoice ───────────────────────────────────────────────────────────────

/// Invoice record. `customer_name` is a denormalized copy taken at creation
/// time; `customer_id` is not checked against the customer list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub customer_id: String,
    pub customer_name: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
}

impl InvoiceStatus {
    pub fn label(self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Overdue => "Overdue",
        }
    }
}

// ─── Campaign ──────────────────────────────────────────────────────────────

/// Marketing campaign. `opens` and `clicks` are entered manually.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CampaignType,
    pub sent_date: Option<NaiveDate>,
    pub recipients: u64,
    pub opens: u64,
    pub clicks: u64,
    pub status: CampaignStatus,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    #[default]
    Email,
    Sms,
}

impl CampaignType {
    pub fn label(self) -> &'static str {
        match self {
            CampaignType::Email => "Email",
            CampaignType::Sms => "SMS",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Active,
    Completed,
}

impl CampaignStatus {
    pub fn label(self) -> &'static str {
        match self {
            CampaignStatus::Draft => "Draft",
            CampaignStatus::Active => "Active",
            CampaignStatus::Completed => "Completed",
        }
    }
}

// ─── Charts ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevenuePoint {
    pub month: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelShare {
    pub name: String,
    pub value: u32,
}
