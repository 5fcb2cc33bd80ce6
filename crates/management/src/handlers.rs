//! Axum REST handlers for the CRM pages.

use crate::customer_detail::CustomerDetail;
use crate::dashboard::DashboardStats;
use crate::models::*;
use crate::pages::Pages;
use crate::store::CrmStore;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use evocrm_browser::{BrowseQuery, ExportFile, PageView, Record, RecordBrowser};
use evocrm_core::types::{Campaign, Customer, Invoice, Product};
use evocrm_core::CrmError;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Confirmation text attached to file downloads.
pub const MESSAGE_HEADER: &str = "x-evocrm-message";

/// Shared management state.
#[derive(Clone)]
pub struct ManagementState {
    pub store: Arc<CrmStore>,
    pub pages: Arc<Pages>,
}

impl ManagementState {
    pub fn new(store: Arc<CrmStore>, pages: Pages) -> Self {
        Self {
            store,
            pages: Arc::new(pages),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(err: CrmError) -> ApiError {
    let status = match &err {
        CrmError::Validation { .. } => StatusCode::BAD_REQUEST,
        CrmError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(error = %err, "Management request failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.code().to_string(),
            message: err.to_string(),
        }),
    )
}

fn csv_response(file: ExportFile, message: Option<&str>) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    let mut response = (
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        file.body,
    )
        .into_response();
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        response.headers_mut().insert(header::CONTENT_DISPOSITION, value);
    }
    if let Some(value) = message.and_then(|m| HeaderValue::from_str(m).ok()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(MESSAGE_HEADER), value);
    }
    response
}

fn export_page<T: Record>(browser: &RecordBrowser, rows: &[T], query: &BrowseQuery) -> Result<Response, ApiError> {
    match browser.export(rows, query).map_err(api_error)? {
        Some(file) => {
            metrics::counter!("crm.exports").increment(1);
            let message = format!("{} exported successfully!", browser.title());
            Ok(csv_response(file, Some(&message)))
        }
        None => Err(api_error(CrmError::not_found("Export", browser.title()))),
    }
}

fn created<T: Serialize>(message: &'static str, record: T) -> (StatusCode, Json<Saved<T>>) {
    (StatusCode::CREATED, Json(Saved::new(message, record)))
}

// ─── Dashboard ─────────────────────────────────────────────────────────────

pub async fn dashboard(State(state): State<ManagementState>) -> Json<DashboardStats> {
    Json(state.store.dashboard_stats())
}

// ─── Customers ─────────────────────────────────────────────────────────────

pub async fn list_customers(
    State(state): State<ManagementState>,
    Query(query): Query<BrowseQuery>,
) -> Json<PageView<Customer>> {
    Json(state.pages.customers.view(&state.store.customers(), &query))
}

pub async fn create_customer(
    State(state): State<ManagementState>,
    Json(form): Json<CustomerForm>,
) -> Result<(StatusCode, Json<Saved<Customer>>), ApiError> {
    let customer = state.store.create_customer(form).map_err(api_error)?;
    metrics::counter!("crm.customers.created").increment(1);
    Ok(created("Customer added successfully!", customer))
}

pub async fn get_customer(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerDetail>, ApiError> {
    state.store.customer_detail(&id).map(Json).map_err(api_error)
}

pub async fn export_customers(
    State(state): State<ManagementState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Response, ApiError> {
    export_page(&state.pages.customers, &state.store.customers(), &query)
}

pub async fn bulk_delete_customers(
    State(state): State<ManagementState>,
    Json(selection): Json<Selection>,
) -> Json<BulkDeleteResponse> {
    let deleted = state.store.delete_customers(&selection.ids);
    metrics::counter!("crm.customers.deleted").increment(deleted as u64);
    Json(BulkDeleteResponse {
        message: format!("{deleted} customers deleted"),
        deleted,
    })
}

pub async fn bulk_export_customers(
    State(state): State<ManagementState>,
    Json(selection): Json<Selection>,
) -> Result<Response, ApiError> {
    let file = state
        .store
        .export_selected_customers(&selection.ids)
        .map_err(api_error)?;
    metrics::counter!("crm.exports").increment(1);
    Ok(csv_response(file, Some("Selected customers exported!")))
}

// ─── Products ──────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<ManagementState>,
    Query(query): Query<BrowseQuery>,
) -> Json<PageView<Product>> {
    Json(state.pages.products.view(&state.store.products(), &query))
}

pub async fn create_product(
    State(state): State<ManagementState>,
    Json(form): Json<ProductForm>,
) -> Result<(StatusCode, Json<Saved<Product>>), ApiError> {
    let product = state.store.create_product(form).map_err(api_error)?;
    metrics::counter!("crm.products.created").increment(1);
    Ok(created("Product added successfully!", product))
}

pub async fn update_product(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
    Json(form): Json<ProductForm>,
) -> Result<Json<Saved<Product>>, ApiError> {
    let product = state.store.update_product(&id, form).map_err(api_error)?;
    Ok(Json(Saved::new("Product updated successfully!", product)))
}

pub async fn delete_product(
    State(state): State<ManagementState>,
    Path(id): Path<String>,
) -> Result<Json<Saved<String>>, ApiError> {
    if state.store.delete_product(&id) {
        metrics::counter!("crm.products.deleted").increment(1);
        Ok(Json(Saved::new("Product deleted successfully!", id)))
    } else {
        Err(api_error(CrmError::not_found("Product", id)))
    }
}

pub async fn export_products(
    State(state): State<ManagementState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Response, ApiError> {
    export_page(&state.pages.products, &state.store.products(), &query)
}

// ─── Invoices ──────────────────────────────────────────────────────────────

pub async fn list_invoices(
    State(state): State<ManagementState>,
    Query(params): Query<InvoiceListParams>,
    Query(query): Query<BrowseQuery>,
) -> Json<PageView<Invoice>> {
    let rows = state.store.invoices(params.status);
    Json(state.pages.invoices.view(&rows, &query))
}

pub async fn create_invoice(
    State(state): State<ManagementState>,
    Json(form): Json<InvoiceForm>,
) -> Result<(StatusCode, Json<Saved<Invoice>>), ApiError> {
    let invoice = state.store.create_invoice(form).map_err(api_error)?;
    metrics::counter!("crm.invoices.created").increment(1);
    Ok(created("Invoice created successfully!", invoice))
}

pub async fn export_invoices(
    State(state): State<ManagementState>,
    Query(params): Query<InvoiceListParams>,
    Query(query): Query<BrowseQuery>,
) -> Result<Response, ApiError> {
    let rows = state.store.invoices(params.status);
    export_page(&state.pages.invoices, &rows, &query)
}

// ─── Campaigns ─────────────────────────────────────────────────────────────

pub async fn list_campaigns(
    State(state): State<ManagementState>,
    Query(query): Query<BrowseQuery>,
) -> Json<PageView<Campaign>> {
    Json(state.pages.campaigns.view(&state.store.campaigns(), &query))
}

pub async fn create_campaign(
    State(state): State<ManagementState>,
    Json(form): Json<CampaignForm>,
) -> Result<(StatusCode, Json<Saved<Campaign>>), ApiError> {
    let campaign = state.store.create_campaign(form).map_err(api_error)?;
    metrics::counter!("crm.campaigns.created").increment(1);
    Ok(created("Campaign created successfully!", campaign))
}

pub async fn export_campaigns(
    State(state): State<ManagementState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Response, ApiError> {
    export_page(&state.pages.campaigns, &state.store.campaigns(), &query)
}

pub async fn campaign_performance(State(state): State<ManagementState>) -> Json<Vec<CampaignPerformance>> {
    Json(state.store.campaign_performance())
}
