use evocrm_core::types::{Campaign, Customer, Invoice, Product};

use crate::record::{FieldValue, Record};

impl Record for Customer {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        Some(match key {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            "company" => self.company.as_str().into(),
            "phone" => self.phone.as_str().into(),
            "email" => self.email.as_str().into(),
            "country" => self.country.as_str().into(),
            "status" => self.status.label().into(),
            "avatar" => self.avatar.as_str().into(),
            "joined_date" => self.joined_date.to_string().into(),
            "total_spent" => self.total_spent.into(),
            _ => return None,
        })
    }
}

impl Record for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        Some(match key {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            "category" => self.category.as_str().into(),
            "price" => self.price.into(),
            "stock" => self.stock.into(),
            "status" => self.status.label().into(),
            "image" => self.image.as_str().into(),
            "sku" => self.sku.as_str().into(),
            _ => return None,
        })
    }
}

impl Record for Invoice {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        Some(match key {
            "id" => self.id.as_str().into(),
            "invoice_number" => self.invoice_number.as_str().into(),
            "customer_id" => self.customer_id.as_str().into(),
            "customer_name" => self.customer_name.as_str().into(),
            "amount" => self.amount.into(),
            "due_date" => self.due_date.to_string().into(),
            "status" => self.status.label().into(),
            "created_at" => self.created_at.to_string().into(),
            _ => return None,
        })
    }
}

impl Record for Campaign {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        Some(match key {
            "id" => self.id.as_str().into(),
            "name" => self.name.as_str().into(),
            "type" => self.kind.label().into(),
            "sent_date" => self.sent_date.map(|d| d.to_string()).into(),
            "recipients" => self.recipients.into(),
            "opens" => self.opens.into(),
            "clicks" => self.clicks.into(),
            "status" => self.status.label().into(),
            _ => return None,
        })
    }
}
