use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::query::LineItemPayload;

/// Statuses the console offers when filtering or updating purchases.
pub const PURCHASE_STATUSES: &[&str] = &["pending", "approved", "received", "cancelled", "paid"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: i64,
    pub invoice_number: String,
    pub purchase_date: String,
    pub supplier_id: i64,
    #[serde(default)]
    pub supplier_name: Option<String>,
    pub store_id: i64,
    #[serde(default)]
    pub store_name: Option<String>,
    pub subtotal: f64,
    #[serde(default)]
    pub tax_amount: f64,
    #[serde(default)]
    pub discount_amount: f64,
    pub grand_total: f64,
    pub status: String,
    pub payment_status: String,
    pub payment_due_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub id: i64,
    pub purchase_id: i64,
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseDetail {
    #[serde(flatten)]
    pub purchase: Purchase,
    #[serde(default)]
    pub items: Vec<PurchaseItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchasePayload {
    pub supplier_id: i64,
    pub store_id: i64,
    pub purchase_date: NaiveDate,
    pub payment_due_date: NaiveDate,
    pub items: Vec<LineItemPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,
}
