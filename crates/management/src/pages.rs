//! Table presets for the four record pages.

use evocrm_browser::{Column, RecordBrowser};

/// One configured browser per page, sharing a page size.
#[derive(Debug, Clone)]
pub struct Pages {
    pub customers: RecordBrowser,
    pub products: RecordBrowser,
    pub invoices: RecordBrowser,
    pub campaigns: RecordBrowser,
}

impl Pages {
    pub fn new(page_size: usize) -> Self {
        Self {
            customers: customers().page_size(page_size),
            products: products().page_size(page_size),
            invoices: invoices().page_size(page_size),
            campaigns: campaigns().page_size(page_size),
        }
    }
}

impl Default for Pages {
    fn default() -> Self {
        Self::new(evocrm_browser::DEFAULT_PAGE_SIZE)
    }
}

pub fn customers() -> RecordBrowser {
    RecordBrowser::new(
        "All Customers",
        vec![
            Column::new("name", "Customer Name"),
            Column::new("company", "Company"),
            Column::new("phone", "Phone Number"),
            Column::new("email", "Email"),
            Column::new("country", "Country"),
            Column::new("status", "Status"),
        ],
    )
    .subtitle("Active Members")
    .searchable(&["name", "email", "company"])
    .sortable_by_name()
    .export_as("customers")
}

pub fn products() -> RecordBrowser {
    RecordBrowser::new(
        "All Products",
        vec![
            Column::new("name", "Product Name"),
            Column::new("sku", "SKU"),
            Column::new("category", "Category"),
            Column::new("price", "Price"),
            Column::new("stock", "Stock"),
            Column::new("status", "Status"),
        ],
    )
    .subtitle("Product Inventory")
    .searchable(&["name", "category", "sku"])
    .export_as("products")
}

pub fn invoices() -> RecordBrowser {
    RecordBrowser::new(
        "Invoices",
        vec![
            Column::new("invoice_number", "Invoice #"),
            Column::new("customer_name", "Customer"),
            Column::new("amount", "Amount"),
            Column::new("due_date", "Due Date"),
            Column::new("status", "Status"),
        ],
    )
    .subtitle("All transactions")
    .searchable(&["invoice_number", "customer_name"])
    .export_as("invoices")
}

pub fn campaigns() -> RecordBrowser {
    RecordBrowser::new(
        "All Campaigns",
        vec![
            Column::new("name", "Campaign Name"),
            Column::new("type", "Type"),
            Column::new("sent_date", "Sent Date"),
            Column::new("recipients", "Recipients"),
            Column::new("opens", "Opens"),
            Column::new("clicks", "Clicks"),
            Column::new("status", "Status"),
        ],
    )
    .subtitle("Marketing activities")
    .searchable(&["name", "type"])
    .export_as("campaigns")
}

/// Header row of the selected-customers export.
pub fn selected_customer_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name"),
        Column::new("company", "Company"),
        Column::new("phone", "Phone"),
        Column::new("email", "Email"),
        Column::new("country", "Country"),
        Column::new("status", "Status"),
    ]
}
