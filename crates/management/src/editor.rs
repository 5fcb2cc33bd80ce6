//! Editor form → record mapping.
//!
//! Only presence of required fields is checked. Records come back with an
//! empty `id` (and `invoice_number`); the store assigns those on insert.

use chrono::NaiveDate;
use evocrm_core::types::{Campaign, Customer, Invoice, Product};
use evocrm_core::{CrmError, CrmResult};

use crate::models::{CampaignForm, CustomerForm, InvoiceForm, ProductForm};

pub const DEFAULT_CUSTOMER_AVATAR: &str =
    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=100&h=100&fit=crop&crop=face";
pub const DEFAULT_PRODUCT_IMAGE: &str =
    "https://images.unsplash.com/photo-1517336714731-489689fd1ca8?w=100&h=100&fit=crop";
pub const DEFAULT_PRODUCT_CATEGORY: &str = "Electronics";

fn required_text(value: Option<String>, field: &'static str) -> CrmResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(CrmError::Validation { field })
}

fn required<T>(value: Option<T>, field: &'static str) -> CrmResult<T> {
    value.ok_or(CrmError::Validation { field })
}

fn text_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl CustomerForm {
    pub fn build(self, today: NaiveDate) -> CrmResult<Customer> {
        Ok(Customer {
            id: String::new(),
            name: required_text(self.name, "name")?,
            email: required_text(self.email, "email")?,
            phone: required_text(self.phone, "phone")?,
            company: required_text(self.company, "company")?,
            country: required_text(self.country, "country")?,
            status: self.status.unwrap_or_default(),
            avatar: text_or(self.avatar, DEFAULT_CUSTOMER_AVATAR),
            joined_date: self.joined_date.unwrap_or(today),
            total_spent: self.total_spent.unwrap_or(0.0),
        })
    }
}

impl ProductForm {
    pub fn build(self) -> CrmResult<Product> {
        Ok(Product {
            id: String::new(),
            name: required_text(self.name, "name")?,
            sku: required_text(self.sku, "sku")?,
            price: required(self.price, "price")?,
            stock: required(self.stock, "stock")?,
            category: text_or(self.category, DEFAULT_PRODUCT_CATEGORY),
            status: self.status.unwrap_or_default(),
            image: text_or(self.image, DEFAULT_PRODUCT_IMAGE),
        })
    }
}

impl InvoiceForm {
    /// `customer_name` is copied from the matching customer when there is one.
    pub fn build(self, today: NaiveDate, customers: &[Customer]) -> CrmResult<Invoice> {
        let customer_id = required_text(self.customer_id, "customer_id")?;
        let amount = required(self.amount, "amount")?;
        let due_date = required(self.due_date, "due_date")?;
        let customer_name = customers
            .iter()
            .find(|c| c.id == customer_id)
            .map(|c| c.name.clone())
            .or(self.customer_name)
            .unwrap_or_default();

        Ok(Invoice {
            id: String::new(),
            invoice_number: String::new(),
            customer_id,
            customer_name,
            amount,
            due_date,
            status: self.status.unwrap_or_default(),
            created_at: today,
        })
    }
}

impl CampaignForm {
    pub fn build(self) -> CrmResult<Campaign> {
        Ok(Campaign {
            id: String::new(),
            name: required_text(self.name, "name")?,
            kind: self.kind.unwrap_or_default(),
            sent_date: self.sent_date,
            recipients: self.recipients.unwrap_or(0),
            opens: self.opens.unwrap_or(0),
            clicks: self.clicks.unwrap_or(0),
            status: self.status.unwrap_or_default(),
        })
    }
}
