//! Demo records loaded into a fresh store.

use chrono::NaiveDate;
use evocrm_core::types::{
    Campaign, CampaignStatus, CampaignType, Customer, CustomerStatus, Invoice, InvoiceStatus, Product,
    ProductStatus, RevenuePoint,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn avatar(photo: &str) -> String {
    format!("https://images.unsplash.com/photo-{photo}?w=100&h=100&fit=crop&crop=face")
}

fn product_image(photo: &str) -> String {
    format!("https://images.unsplash.com/photo-{photo}?w=100&h=100&fit=crop")
}

pub fn customers() -> Vec<Customer> {
    use CustomerStatus::{Active, Inactive};
    let rows = [
        ("Jane Cooper", "Microsoft", "(225) 555-0118", "jane@microsoft.com", "United States", Active, "1494790108377-be9c29b29330", date(2023, 1, 15), 12500.0),
        ("Floyd Miles", "Yahoo", "(205) 555-0100", "floyd@yahoo.com", "Kiribati", Inactive, "1507003211169-0a1dd7228f2d", date(2023, 2, 20), 8200.0),
        ("Ronald Richards", "Adobe", "(302) 555-0107", "ronald@adobe.com", "Israel", Inactive, "1500648767791-00dcc994a43e", date(2023, 3, 10), 15300.0),
        ("Marvin McKinney", "Tesla", "(252) 555-0126", "marvin@tesla.com", "Iran", Active, "1472099645785-5658abf4ff4e", date(2023, 4, 5), 22100.0),
        ("Jerome Bell", "Google", "(629) 555-0129", "jerome@google.com", "Réunion", Active, "1599566150163-29194dcabd36", date(2023, 5, 12), 18900.0),
        ("Kathryn Murphy", "Meta", "(406) 555-0120", "kathryn@meta.com", "Curaçao", Active, "1438761681033-6461ffad8d80", date(2023, 6, 18), 9800.0),
        ("Jacob Jones", "Amazon", "(208) 555-0112", "jacob@amazon.com", "Brazil", Active, "1552058544-f2b08422138a", date(2023, 7, 22), 31200.0),
        ("Kristin Watson", "Netflix", "(704) 555-0127", "kristin@netflix.com", "Åland Islands", Inactive, "1544005313-94ddf0286df2", date(2023, 8, 30), 14600.0),
        ("Robert Fox", "Spotify", "(312) 555-0198", "robert@spotify.com", "Sweden", Active, "1570295999919-56ceb5ecca61", date(2023, 9, 14), 7800.0),
        ("Emily Johnson", "Apple", "(415) 555-0145", "emily@apple.com", "United States", Active, "1580489944761-15a19d654956", date(2023, 10, 1), 45200.0),
    ];

    rows.into_iter()
        .enumerate()
        .map(
            |(i, (name, company, phone, email, country, status, photo, joined_date, total_spent))| Customer {
                id: (i + 1).to_string(),
                name: name.into(),
                company: company.into(),
                phone: phone.into(),
                email: email.into(),
                country: country.into(),
                status,
                avatar: avatar(photo),
                joined_date,
                total_spent,
            },
        )
        .collect()
}

pub fn products() -> Vec<Product> {
    use ProductStatus::{InStock, LowStock, OutOfStock};
    let rows = [
        ("MacBook Pro 14\"", "Electronics", 1999.0, 45, InStock, "1517336714731-489689fd1ca8", "MBP-14-001"),
        ("Wireless Headphones", "Electronics", 299.0, 8, LowStock, "1505740420928-5e560c06d30e", "WH-001"),
        ("Ergonomic Chair", "Furniture", 599.0, 0, OutOfStock, "1592078615290-033ee584e267", "EC-001"),
        ("Standing Desk", "Furniture", 899.0, 23, InStock, "1518455027359-f3f8164ba6bd", "SD-001"),
        ("Mechanical Keyboard", "Electronics", 159.0, 67, InStock, "1511467687858-23d96c32e4ae", "MK-001"),
        ("4K Monitor", "Electronics", 449.0, 5, LowStock, "1527443224154-c4a3942d3acf", "4KM-001"),
        ("USB-C Hub", "Accessories", 79.0, 120, InStock, "1625723044792-44de16ccb4e9", "UCH-001"),
        ("Webcam HD", "Electronics", 129.0, 0, OutOfStock, "1587826080692-f439cd0b70da", "WC-001"),
    ];

    rows.into_iter()
        .enumerate()
        .map(|(i, (name, category, price, stock, status, photo, sku))| Product {
            id: (i + 1).to_string(),
            name: name.into(),
            category: category.into(),
            price,
            stock,
            status,
            image: product_image(photo),
            sku: sku.into(),
        })
        .collect()
}

pub fn invoices() -> Vec<Invoice> {
    use InvoiceStatus::{Overdue, Paid, Pending};
    let rows = [
        ("1", "Jane Cooper", 2500.0, date(2024, 2, 15), Paid, date(2024, 1, 15)),
        ("4", "Marvin McKinney", 4200.0, date(2024, 2, 20), Pending, date(2024, 1, 20)),
        ("5", "Jerome Bell", 1800.0, date(2024, 1, 10), Overdue, date(2023, 12, 10)),
        ("7", "Jacob Jones", 6500.0, date(2024, 2, 28), Paid, date(2024, 1, 28)),
        ("10", "Emily Johnson", 3200.0, date(2024, 3, 1), Pending, date(2024, 2, 1)),
        ("6", "Kathryn Murphy", 890.0, date(2024, 1, 5), Overdue, date(2023, 12, 5)),
        ("9", "Robert Fox", 1500.0, date(2024, 3, 10), Paid, date(2024, 2, 10)),
        ("3", "Ronald Richards", 4800.0, date(2024, 2, 25), Pending, date(2024, 1, 25)),
    ];

    rows.into_iter()
        .enumerate()
        .map(|(i, (customer_id, customer_name, amount, due_date, status, created_at))| Invoice {
            id: (i + 1).to_string(),
            invoice_number: crate::ids::invoice_number(i as u64 + 1),
            customer_id: customer_id.into(),
            customer_name: customer_name.into(),
            amount,
            due_date,
            status,
            created_at,
        })
        .collect()
}

pub fn campaigns() -> Vec<Campaign> {
    use CampaignStatus::{Active, Completed, Draft};
    use CampaignType::{Email, Sms};
    let rows = [
        ("Summer Sale 2024", Email, Some(date(2024, 1, 15)), 15000, 8500, 2100, Completed),
        ("New Product Launch", Email, Some(date(2024, 2, 1)), 22000, 12000, 4500, Active),
        ("Flash Sale Alert", Sms, Some(date(2024, 2, 5)), 8000, 7200, 1800, Completed),
        ("Valentine Special", Email, Some(date(2024, 2, 14)), 18000, 9800, 3200, Active),
        ("Customer Feedback", Email, None, 0, 0, 0, Draft),
        ("Weekend Deals", Sms, Some(date(2024, 1, 28)), 5000, 4200, 980, Completed),
    ];

    rows.into_iter()
        .enumerate()
        .map(|(i, (name, kind, sent_date, recipients, opens, clicks, status))| Campaign {
            id: (i + 1).to_string(),
            name: name.into(),
            kind,
            sent_date,
            recipients,
            opens,
            clicks,
            status,
        })
        .collect()
}

pub fn revenue() -> Vec<RevenuePoint> {
    [
        ("Jan", 42000.0),
        ("Feb", 38000.0),
        ("Mar", 55000.0),
        ("Apr", 48000.0),
        ("May", 62000.0),
        ("Jun", 58000.0),
        ("Jul", 71000.0),
        ("Aug", 65000.0),
        ("Sep", 78000.0),
        ("Oct", 82000.0),
        ("Nov", 75000.0),
        ("Dec", 95000.0),
    ]
    .into_iter()
    .map(|(month, revenue)| RevenuePoint {
        month: month.into(),
        revenue,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_sizes_and_ids() {
        assert_eq!(customers().len(), 10);
        assert_eq!(products().len(), 8);
        assert_eq!(invoices().len(), 8);
        assert_eq!(campaigns().len(), 6);
        assert_eq!(revenue().len(), 12);

        let ids: Vec<String> = customers().into_iter().map(|c| c.id).collect();
        assert_eq!(ids.first().map(String::as_str), Some("1"));
        assert_eq!(ids.last().map(String::as_str), Some("10"));
    }

    #[test]
    fn test_invoice_customer_names_match_customers() {
        let customers = customers();
        for invoice in invoices() {
            let customer = customers.iter().find(|c| c.id == invoice.customer_id).unwrap();
            assert_eq!(customer.name, invoice.customer_name);
        }
        assert_eq!(invoices()[7].invoice_number, "INV-008");
    }
}
