//! Management API router. Mounts the CRM page endpoints under /api/v1.

use crate::handlers::{self, ManagementState};
use axum::routing::{get, post, put};
use axum::Router;

/// CRM page routes bound to `state`. The caller adds the session guard.
pub fn management_router(state: ManagementState) -> Router {
    Router::new()
        // Dashboard
        .route("/api/v1/dashboard", get(handlers::dashboard))
        // Customers
        .route("/api/v1/customers", get(handlers::list_customers).post(handlers::create_customer))
        .route("/api/v1/customers/export", get(handlers::export_customers))
        .route("/api/v1/customers/bulk-delete", post(handlers::bulk_delete_customers))
        .route("/api/v1/customers/bulk-export", post(handlers::bulk_export_customers))
        .route("/api/v1/customers/:id", get(handlers::get_customer))
        // Products
        .route("/api/v1/products", get(handlers::list_products).post(handlers::create_product))
        .route("/api/v1/products/export", get(handlers::export_products))
        .route("/api/v1/products/:id", put(handlers::update_product).delete(handlers::delete_product))
        // Invoices
        .route("/api/v1/invoices", get(handlers::list_invoices).post(handlers::create_invoice))
        .route("/api/v1/invoices/export", get(handlers::export_invoices))
        // Campaigns
        .route("/api/v1/campaigns", get(handlers::list_campaigns).post(handlers::create_campaign))
        .route("/api/v1/campaigns/export", get(handlers::export_campaigns))
        .route("/api/v1/campaigns/performance", get(handlers::campaign_performance))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::Pages;
    use crate::store::CrmStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use evocrm_core::config::IdStrategy;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let store = Arc::new(CrmStore::with_demo_data(IdStrategy::Monotonic));
        management_router(ManagementState::new(store, Pages::default()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec(), headers)
    }

    async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes, _) = send(app, method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_list_customers_paginates_newest_first() {
        let app = app();
        let (status, page) = send_json(&app, Method::GET, "/api/v1/customers?page=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["page"], 2);
        assert_eq!(page["total_entries"], 10);
        assert_eq!(page["rows"].as_array().unwrap().len(), 2);
        assert_eq!(page["rows"][1]["name"], "Jane Cooper");
    }

    #[tokio::test]
    async fn test_create_customer_then_list() {
        let app = app();
        let form = json!({
            "name": "Devon Lane",
            "company": "Intel",
            "phone": "(555) 555-0101",
            "email": "devon@intel.com",
            "country": "Canada",
            "joined_date": ""
        });
        let (status, saved) = send_json(&app, Method::POST, "/api/v1/customers", Some(form)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(saved["message"], "Customer added successfully!");
        assert_eq!(saved["record"]["id"], "11");
        assert_eq!(saved["record"]["status"], "active");

        let (_, page) = send_json(&app, Method::GET, "/api/v1/customers?q=devon", None).await;
        assert_eq!(page["total_entries"], 1);
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let app = app();
        let (status, body) =
            send_json(&app, Method::POST, "/api/v1/products", Some(json!({ "name": "Hub" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_failed");
        assert_eq!(body["message"], "Missing required field: sku");
    }

    #[tokio::test]
    async fn test_customer_detail_and_not_found() {
        let app = app();
        let (status, detail) = send_json(&app, Method::GET, "/api/v1/customers/10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["stats"]["orders"], 24);
        assert_eq!(detail["stats"]["loyalty_points"], 4520.0);

        let (status, body) = send_json(&app, Method::GET, "/api/v1/customers/77", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_bulk_delete_and_export() {
        let app = app();
        let (status, body) = send_json(
            &app,
            Method::POST,
            "/api/v1/customers/bulk-delete",
            Some(json!({ "ids": ["1", "2"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "2 customers deleted");

        let (status, bytes, headers) = send(&app, Method::GET, "/api/v1/customers/export", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_DISPOSITION], "attachment; filename=\"customers.csv\"");
        assert_eq!(headers[handlers::MESSAGE_HEADER], "All Customers exported successfully!");
        let csv = String::from_utf8(bytes).unwrap();
        assert_eq!(csv.lines().count(), 9);
        assert!(!csv.contains("Jane Cooper"));

        let (_, bytes, headers) = send(
            &app,
            Method::POST,
            "/api/v1/customers/bulk-export",
            Some(json!({ "ids": ["4"] })),
        )
        .await;
        assert_eq!(headers[handlers::MESSAGE_HEADER], "Selected customers exported!");
        assert!(String::from_utf8(bytes).unwrap().contains("Marvin McKinney"));
    }

    #[tokio::test]
    async fn test_page_export_confirms_with_title() {
        let app = app();
        let (status, bytes, headers) = send(&app, Method::GET, "/api/v1/invoices/export?status=overdue", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[handlers::MESSAGE_HEADER], "Invoices exported successfully!");
        assert!(String::from_utf8(bytes).unwrap().starts_with("Invoice #,Customer"));

        let (_, _, headers) = send(&app, Method::GET, "/api/v1/products/export", None).await;
        assert_eq!(headers[handlers::MESSAGE_HEADER], "All Products exported successfully!");
    }

    #[tokio::test]
    async fn test_update_and_delete_product() {
        let app = app();
        let form = json!({ "name": "Standing Desk XL", "sku": "SD-002", "price": 999.0, "stock": 4, "status": "low_stock" });
        let (status, saved) = send_json(&app, Method::PUT, "/api/v1/products/4", Some(form)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["message"], "Product updated successfully!");
        assert_eq!(saved["record"]["id"], "4");

        let (status, _) = send_json(&app, Method::DELETE, "/api/v1/products/4", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send_json(&app, Method::DELETE, "/api/v1/products/4", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invoice_filter_combines_with_search() {
        let app = app();
        let (_, page) = send_json(&app, Method::GET, "/api/v1/invoices?status=pending&q=inv-00", None).await;
        assert_eq!(page["total_entries"], 3);

        let (_, page) = send_json(&app, Method::GET, "/api/v1/invoices?status=paid&q=jacob", None).await;
        assert_eq!(page["total_entries"], 1);
        assert_eq!(page["rows"][0]["invoice_number"], "INV-004");
    }

    #[tokio::test]
    async fn test_campaign_performance_and_dashboard() {
        let app = app();
        let (_, bars) = send_json(&app, Method::GET, "/api/v1/campaigns/performance", None).await;
        assert_eq!(bars.as_array().unwrap().len(), 5);

        let (status, stats) = send_json(&app, Method::GET, "/api/v1/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["customers"][0]["value"], 10.0);
        assert_eq!(stats["channels"][1]["name"], "SMS");
    }
}
