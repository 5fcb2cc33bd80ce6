//! Management request/response types: editor forms, filters and API envelopes.

use chrono::NaiveDate;
use evocrm_core::types::{CampaignStatus, CampaignType, CustomerStatus, InvoiceStatus, ProductStatus};
use serde::{Deserialize, Deserializer, Serialize};

/// Accepts a date, `null`, or an empty string (read as no date).
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

// ─── Editor forms ──────────────────────────────────────────────────────────

/// Fields submitted by the customer editor. Every field is optional on the
/// wire; required ones are checked when the record is built.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    pub name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub status: Option<CustomerStatus>,
    pub avatar: Option<String>,
    #[serde(deserialize_with = "optional_date")]
    pub joined_date: Option<NaiveDate>,
    pub total_spent: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub status: Option<ProductStatus>,
    pub image: Option<String>,
    pub sku: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InvoiceForm {
    pub customer_id: Option<String>,
    /// Used only when `customer_id` matches no known customer.
    pub customer_name: Option<String>,
    pub amount: Option<f64>,
    #[serde(deserialize_with = "optional_date")]
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CampaignForm {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<CampaignType>,
    #[serde(deserialize_with = "optional_date")]
    pub sent_date: Option<NaiveDate>,
    pub recipients: Option<u64>,
    pub opens: Option<u64>,
    pub clicks: Option<u64>,
    pub status: Option<CampaignStatus>,
    /// Accepted from the editor and discarded.
    pub template: Option<String>,
    /// Accepted from the editor and discarded.
    pub tags: Option<String>,
}

// ─── Filters & selections ──────────────────────────────────────────────────

/// Invoice status filter applied before the table search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceFilter {
    #[default]
    All,
    Paid,
    Pending,
    Overdue,
}

impl InvoiceFilter {
    pub fn matches(self, status: InvoiceStatus) -> bool {
        match self {
            InvoiceFilter::All => true,
            InvoiceFilter::Paid => status == InvoiceStatus::Paid,
            InvoiceFilter::Pending => status == InvoiceStatus::Pending,
            InvoiceFilter::Overdue => status == InvoiceStatus::Overdue,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceListParams {
    #[serde(default)]
    pub status: InvoiceFilter,
}

/// Ids picked with the row checkboxes.
#[derive(Debug, Clone, Deserialize)]
pub struct Selection {
    pub ids: Vec<String>,
}

// ─── Responses ─────────────────────────────────────────────────────────────

/// A created or updated record plus the confirmation shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct Saved<T> {
    pub message: String,
    pub record: T,
}

impl<T> Saved<T> {
    pub fn new(message: impl Into<String>, record: T) -> Self {
        Self {
            message: message.into(),
            record,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteResponse {
    pub message: String,
    pub deleted: usize,
}

/// One bar of the campaign performance chart; rates are whole percents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignPerformance {
    pub name: String,
    pub opens: u32,
    pub clicks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_form_accepts_empty_sent_date() {
        let form: CampaignForm = serde_json::from_str(
            r#"{"name":"Spring","type":"sms","sent_date":"","template":"t1","tags":"a,b"}"#,
        )
        .unwrap();
        assert_eq!(form.sent_date, None);
        assert_eq!(form.kind, Some(CampaignType::Sms));
        assert_eq!(form.recipients, None);
    }

    #[test]
    fn test_invoice_form_parses_due_date() {
        let form: InvoiceForm =
            serde_json::from_str(r#"{"customer_id":"4","amount":120.5,"due_date":"2024-03-01"}"#).unwrap();
        assert_eq!(form.due_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(serde_json::from_str::<InvoiceForm>(r#"{"due_date":"03/01/2024"}"#).is_err());
    }

    #[test]
    fn test_invoice_filter() {
        assert!(InvoiceFilter::All.matches(InvoiceStatus::Overdue));
        assert!(InvoiceFilter::Paid.matches(InvoiceStatus::Paid));
        assert!(!InvoiceFilter::Paid.matches(InvoiceStatus::Pending));
        let params: InvoiceListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.status, InvoiceFilter::All);
    }
}
