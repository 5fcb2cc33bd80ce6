//! CRM management backend: the record collections and the dashboard built
//! from them.
//!
//! Records live in memory for the life of the process.

pub mod customer_detail;
pub mod dashboard;
pub mod editor;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod pages;
pub mod router;
pub mod seed;
pub mod store;

pub use handlers::ManagementState;
pub use pages::Pages;
pub use router::management_router;
pub use store::CrmStore;
