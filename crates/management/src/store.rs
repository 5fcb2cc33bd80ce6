//! In-memory CRM store.
//!
//! Each collection is an ordered `Vec` behind a `parking_lot::RwLock`;
//! append order is the chronological order the browser sorts by. Nothing
//! is persisted.

use chrono::{Local, NaiveDate};
use evocrm_browser::{to_csv, ExportFile};
use evocrm_core::config::{IdStrategy, StoreConfig};
use evocrm_core::types::{Campaign, CampaignStatus, Customer, Invoice, Product, RevenuePoint};
use evocrm_core::{CrmError, CrmResult};
use parking_lot::RwLock;
use tracing::info;

use crate::customer_detail::CustomerDetail;
use crate::dashboard::{self, DashboardStats};
use crate::ids::{invoice_number, IdAllocator};
use crate::models::{
    CampaignForm, CampaignPerformance, CustomerForm, InvoiceFilter, InvoiceForm, ProductForm,
};
use crate::pages::selected_customer_columns;
use crate::seed;

const PERFORMANCE_BARS: usize = 5;
const PERFORMANCE_NAME_CHARS: usize = 15;

struct Collection<T> {
    rows: RwLock<Vec<T>>,
    ids: IdAllocator,
}

impl<T> Collection<T> {
    fn new(strategy: IdStrategy) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            ids: IdAllocator::new(strategy),
        }
    }
}

impl<T: Clone> Collection<T> {
    fn snapshot(&self) -> Vec<T> {
        self.rows.read().clone()
    }
}

pub struct CrmStore {
    customers: Collection<Customer>,
    products: Collection<Product>,
    invoices: Collection<Invoice>,
    campaigns: Collection<Campaign>,
    revenue: RwLock<Vec<RevenuePoint>>,
}

impl Default for CrmStore {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl CrmStore {
    /// Empty store.
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            customers: Collection::new(strategy),
            products: Collection::new(strategy),
            invoices: Collection::new(strategy),
            campaigns: Collection::new(strategy),
            revenue: RwLock::new(Vec::new()),
        }
    }

    pub fn with_demo_data(strategy: IdStrategy) -> Self {
        let store = Self::new(strategy);
        store.load(
            seed::customers(),
            seed::products(),
            seed::invoices(),
            seed::campaigns(),
            seed::revenue(),
        );
        store
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        let store = if config.seed_demo_data {
            Self::with_demo_data(config.id_strategy)
        } else {
            Self::new(config.id_strategy)
        };
        info!(
            seeded = config.seed_demo_data,
            id_strategy = ?config.id_strategy,
            "CRM store initialized (in-memory)"
        );
        store
    }

    /// Append existing records, keeping their ids.
    pub fn load(
        &self,
        customers: Vec<Customer>,
        products: Vec<Product>,
        invoices: Vec<Invoice>,
        campaigns: Vec<Campaign>,
        revenue: Vec<RevenuePoint>,
    ) {
        for c in &customers {
            self.customers.ids.observe(&c.id);
        }
        for p in &products {
            self.products.ids.observe(&p.id);
        }
        for i in &invoices {
            self.invoices.ids.observe(&i.id);
        }
        for c in &campaigns {
            self.campaigns.ids.observe(&c.id);
        }
        self.customers.rows.write().extend(customers);
        self.products.rows.write().extend(products);
        self.invoices.rows.write().extend(invoices);
        self.campaigns.rows.write().extend(campaigns);
        self.revenue.write().extend(revenue);
    }

    // ─── Customers ─────────────────────────────────────────────────────────

    pub fn customers(&self) -> Vec<Customer> {
        self.customers.snapshot()
    }

    pub fn customer(&self, id: &str) -> Option<Customer> {
        self.customers.rows.read().iter().find(|c| c.id == id).cloned()
    }

    pub fn customer_detail(&self, id: &str) -> CrmResult<CustomerDetail> {
        self.customer(id)
            .map(CustomerDetail::new)
            .ok_or_else(|| CrmError::not_found("Customer", id))
    }

    pub fn create_customer(&self, form: CustomerForm) -> CrmResult<Customer> {
        let mut customer = form.build(today())?;
        let mut rows = self.customers.rows.write();
        customer.id = self.customers.ids.allocate(rows.len()).to_string();
        rows.push(customer.clone());
        info!(customer_id = %customer.id, name = %customer.name, "Customer created");
        Ok(customer)
    }

    /// Remove every customer whose id is in `ids`. Returns how many went.
    pub fn delete_customers(&self, ids: &[String]) -> usize {
        let mut rows = self.customers.rows.write();
        let before = rows.len();
        rows.retain(|c| !ids.contains(&c.id));
        let removed = before - rows.len();
        info!(requested = ids.len(), removed, "Customers deleted");
        removed
    }

    /// CSV of the selected customers in list order.
    pub fn export_selected_customers(&self, ids: &[String]) -> CrmResult<ExportFile> {
        let rows = self.customers.rows.read();
        let selected = rows.iter().filter(|c| ids.contains(&c.id));
        let body = to_csv(selected, &selected_customer_columns())?;
        Ok(ExportFile::csv("selected-customers", body))
    }

    // ─── Products ──────────────────────────────────────────────────────────

    pub fn products(&self) -> Vec<Product> {
        self.products.snapshot()
    }

    pub fn create_product(&self, form: ProductForm) -> CrmResult<Product> {
        let mut product = form.build()?;
        let mut rows = self.products.rows.write();
        product.id = self.products.ids.allocate(rows.len()).to_string();
        rows.push(product.clone());
        info!(product_id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    /// Replace a product in place; its id and position are kept.
    pub fn update_product(&self, id: &str, form: ProductForm) -> CrmResult<Product> {
        let mut product = form.build()?;
        let mut rows = self.products.rows.write();
        let slot = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CrmError::not_found("Product", id))?;
        product.id = slot.id.clone();
        *slot = product.clone();
        info!(product_id = %id, "Product updated");
        Ok(product)
    }

    pub fn delete_product(&self, id: &str) -> bool {
        let mut rows = self.products.rows.write();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        let removed = rows.len() < before;
        if removed {
            info!(product_id = %id, "Product deleted");
        }
        removed
    }

    // ─── Invoices ──────────────────────────────────────────────────────────

    pub fn invoices(&self, filter: InvoiceFilter) -> Vec<Invoice> {
        self.invoices
            .rows
            .read()
            .iter()
            .filter(|i| filter.matches(i.status))
            .cloned()
            .collect()
    }

    pub fn create_invoice(&self, form: InvoiceForm) -> CrmResult<Invoice> {
        let mut invoice = {
            let customers = self.customers.rows.read();
            form.build(today(), &customers)?
        };
        let mut rows = self.invoices.rows.write();
        let n = self.invoices.ids.allocate(rows.len());
        invoice.id = n.to_string();
        invoice.invoice_number = invoice_number(n);
        rows.push(invoice.clone());
        info!(invoice = %invoice.invoice_number, amount = invoice.amount, "Invoice created");
        Ok(invoice)
    }

    pub fn revenue(&self) -> Vec<RevenuePoint> {
        self.revenue.read().clone()
    }

    /// Every dashboard card and chart, computed from current contents.
    pub fn dashboard_stats(&self) -> DashboardStats {
        let customers = self.customers.rows.read();
        let products = self.products.rows.read();
        let invoices = self.invoices.rows.read();
        let campaigns = self.campaigns.rows.read();
        let revenue = self.revenue.read();
        DashboardStats {
            customers: dashboard::customer_cards(&customers),
            products: dashboard::product_cards(&products),
            income: dashboard::income_cards(&invoices, &revenue),
            campaigns: dashboard::campaign_cards(&campaigns),
            revenue: revenue.clone(),
            channels: dashboard::channel_share(&campaigns),
        }
    }

    // ─── Campaigns ─────────────────────────────────────────────────────────

    pub fn campaigns(&self) -> Vec<Campaign> {
        self.campaigns.snapshot()
    }

    pub fn create_campaign(&self, form: CampaignForm) -> CrmResult<Campaign> {
        let mut campaign = form.build()?;
        let mut rows = self.campaigns.rows.write();
        campaign.id = self.campaigns.ids.allocate(rows.len()).to_string();
        rows.push(campaign.clone());
        info!(campaign_id = %campaign.id, name = %campaign.name, "Campaign created");
        Ok(campaign)
    }

    /// Open and click rates of the first five campaigns that went out.
    pub fn campaign_performance(&self) -> Vec<CampaignPerformance> {
        let percent = |part: u64, whole: u64| -> u32 {
            if whole == 0 {
                0
            } else {
                (part as f64 / whole as f64 * 100.0).round() as u32
            }
        };

        self.campaigns
            .rows
            .read()
            .iter()
            .filter(|c| c.status != CampaignStatus::Draft)
            .take(PERFORMANCE_BARS)
            .map(|c| CampaignPerformance {
                name: if c.name.chars().count() > PERFORMANCE_NAME_CHARS {
                    let short: String = c.name.chars().take(PERFORMANCE_NAME_CHARS).collect();
                    format!("{short}...")
                } else {
                    c.name.clone()
                },
                opens: percent(c.opens, c.recipients),
                clicks: percent(c.clicks, c.recipients),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evocrm_core::types::{CampaignType, InvoiceStatus, ProductStatus};

    fn customer_form(name: &str) -> CustomerForm {
        CustomerForm {
            name: Some(name.into()),
            company: Some("Intel".into()),
            phone: Some("(555) 555-0101".into()),
            email: Some(format!("{}@intel.com", name.to_lowercase())),
            country: Some("Canada".into()),
            ..CustomerForm::default()
        }
    }

    fn product_form(name: &str) -> ProductForm {
        ProductForm {
            name: Some(name.into()),
            sku: Some("NEW-001".into()),
            price: Some(49.0),
            stock: Some(3),
            status: Some(ProductStatus::LowStock),
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_create_customer_id_is_count_plus_one() {
        for strategy in [IdStrategy::Monotonic, IdStrategy::LegacyLength] {
            let store = CrmStore::with_demo_data(strategy);
            let count = store.customers().len();
            let created = store.create_customer(customer_form("Devon")).unwrap();
            assert_eq!(created.id, (count + 1).to_string());
            assert_eq!(store.customers().len(), count + 1);
            assert_eq!(store.customers().last(), Some(&created));
        }
    }

    #[test]
    fn test_ids_after_delete_depend_on_strategy() {
        let legacy = CrmStore::with_demo_data(IdStrategy::LegacyLength);
        legacy.delete_customers(&["3".to_string()]);
        let collided = legacy.create_customer(customer_form("Devon")).unwrap();
        assert_eq!(collided.id, "10");
        assert_eq!(legacy.customers().iter().filter(|c| c.id == "10").count(), 2);

        let monotonic = CrmStore::with_demo_data(IdStrategy::Monotonic);
        monotonic.delete_customers(&["3".to_string()]);
        let fresh = monotonic.create_customer(customer_form("Devon")).unwrap();
        assert_eq!(fresh.id, "11");
    }

    #[test]
    fn test_invalid_form_leaves_collection_untouched() {
        let store = CrmStore::with_demo_data(IdStrategy::Monotonic);
        let err = store.create_customer(CustomerForm::default()).unwrap_err();
        assert!(matches!(err, CrmError::Validation { field: "name" }));
        assert_eq!(store.customers().len(), 10);
        // The failed attempt did not consume an id.
        assert_eq!(store.create_customer(customer_form("Devon")).unwrap().id, "11");
    }

    #[test]
    fn test_bulk_delete_removes_only_selected() {
        let store = CrmStore::with_demo_data(IdStrategy::Monotonic);
        let ids = vec!["2".to_string(), "5".to_string(), "nope".to_string()];
        assert_eq!(store.delete_customers(&ids), 2);

        let remaining: Vec<String> = store.customers().into_iter().map(|c| c.id).collect();
        assert_eq!(remaining, vec!["1", "3", "4", "6", "7", "8", "9", "10"]);

        let export = crate::pages::customers()
            .export(&store.customers(), &Default::default())
            .unwrap()
            .unwrap();
        assert!(!export.body.contains("Floyd Miles"));
        assert!(!export.body.contains("Jerome Bell"));
        assert!(export.body.contains("Jane Cooper"));
    }

    #[test]
    fn test_export_selected_customers() {
        let store = CrmStore::with_demo_data(IdStrategy::Monotonic);
        let file = store
            .export_selected_customers(&["4".to_string(), "1".to_string()])
            .unwrap();
        assert_eq!(file.file_name, "selected-customers.csv");
        assert_eq!(
            file.body,
            "Name,Company,Phone,Email,Country,Status\n\
             Jane Cooper,Microsoft,(225) 555-0118,jane@microsoft.com,United States,Active\n\
             Marvin McKinney,Tesla,(252) 555-0126,marvin@tesla.com,Iran,Active"
        );
    }

    #[test]
    fn test_update_product_keeps_id_and_position() {
        let store = CrmStore::with_demo_data(IdStrategy::Monotonic);
        let updated = store.update_product("3", product_form("Ergonomic Chair v2")).unwrap();
        assert_eq!(updated.id, "3");

        let products = store.products();
        assert_eq!(products.len(), 8);
        assert_eq!(products[2], updated);
        assert_eq!(products[2].status, ProductStatus::LowStock);

        let missing = store.update_product("99", product_form("Ghost")).unwrap_err();
        assert!(matches!(missing, CrmError::NotFound { .. }));
    }

    #[test]
    fn test_delete_product() {
        let store = CrmStore::with_demo_data(IdStrategy::Monotonic);
        assert!(store.delete_product("8"));
        assert!(!store.delete_product("8"));
        assert_eq!(store.products().len(), 7);
        assert_eq!(store.create_product(product_form("Hub")).unwrap().id, "9");
    }

    #[test]
    fn test_create_invoice_numbers_and_customer_name() {
        let store = CrmStore::with_demo_data(IdStrategy::Monotonic);
        let invoice = store
            .create_invoice(InvoiceForm {
                customer_id: Some("7".into()),
                amount: Some(720.0),
                due_date: NaiveDate::from_ymd_opt(2024, 4, 1),
                ..InvoiceForm::default()
            })
            .unwrap();
        assert_eq!(invoice.id, "9");
        assert_eq!(invoice.invoice_number, "INV-009");
        assert_eq!(invoice.customer_name, "Jacob Jones");
        assert_eq!(invoice.status, InvoiceStatus::Pending);
    }

    #[test]
    fn test_invoice_status_filter() {
        let store = CrmStore::with_demo_data(IdStrategy::Monotonic);
        assert_eq!(store.invoices(InvoiceFilter::All).len(), 8);
        let overdue: Vec<String> = store
            .invoices(InvoiceFilter::Overdue)
            .into_iter()
            .map(|i| i.invoice_number)
            .collect();
        assert_eq!(overdue, vec!["INV-003", "INV-006"]);
        assert_eq!(store.invoices(InvoiceFilter::Paid).len(), 3);
    }

    #[test]
    fn test_campaign_performance() {
        let store = CrmStore::with_demo_data(IdStrategy::Monotonic);
        store
            .create_campaign(CampaignForm {
                name: Some("Late Sender".into()),
                kind: Some(CampaignType::Sms),
                status: Some(CampaignStatus::Active),
                ..CampaignForm::default()
            })
            .unwrap();

        let bars = store.campaign_performance();
        let names: Vec<&str> = bars.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Summer Sale 202...",
                "New Product Lau...",
                "Flash Sale Aler...",
                "Valentine Speci...",
                "Weekend Deals",
            ]
        );
        assert_eq!((bars[0].opens, bars[0].clicks), (57, 14));
        assert_eq!((bars[2].opens, bars[2].clicks), (90, 23));
    }

    #[test]
    fn test_performance_with_no_recipients_is_zero() {
        let store = CrmStore::new(IdStrategy::Monotonic);
        store
            .create_campaign(CampaignForm {
                name: Some("Empty".into()),
                status: Some(CampaignStatus::Active),
                ..CampaignForm::default()
            })
            .unwrap();
        let bars = store.campaign_performance();
        assert_eq!((bars[0].opens, bars[0].clicks), (0, 0));
    }

    #[test]
    fn test_dashboard_follows_mutations() {
        let store = CrmStore::with_demo_data(IdStrategy::Monotonic);
        assert_eq!(store.dashboard_stats().customers[0].value, 10.0);
        store.delete_customers(&["1".to_string(), "2".to_string()]);
        store.create_product(product_form("Hub")).unwrap();

        let stats = store.dashboard_stats();
        assert_eq!(stats.customers[0].value, 8.0);
        assert_eq!(stats.products[0].value, 9.0);
        assert_eq!(stats.revenue.len(), 12);
    }

    #[test]
    fn test_empty_store_from_config() {
        let store = CrmStore::from_config(&StoreConfig {
            seed_demo_data: false,
            id_strategy: IdStrategy::Monotonic,
        });
        assert!(store.customers().is_empty());
        assert_eq!(store.dashboard_stats().income[1].value, 0.0);
        assert_eq!(store.create_customer(customer_form("First")).unwrap().id, "1");
    }

    #[test]
    fn test_customer_detail_not_found() {
        let store = CrmStore::with_demo_data(IdStrategy::Monotonic);
        assert_eq!(store.customer_detail("4").unwrap().customer.name, "Marvin McKinney");
        let err = store.customer_detail("404").unwrap_err();
        assert_eq!(err.code(), "not_found");
    }
}
