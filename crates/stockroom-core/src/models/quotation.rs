use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::query::LineItemPayload;

/// Statuses the console offers when filtering or updating quotations.
pub const QUOTATION_STATUSES: &[&str] = &["pending", "approved", "rejected", "completed"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: i64,
    pub quotation_number: String,
    pub quotation_date: String,
    pub customer_id: i64,
    #[serde(default)]
    pub customer_name: Option<String>,
    pub store_id: i64,
    #[serde(default)]
    pub store_name: Option<String>,
    pub subtotal: f64,
    #[serde(default)]
    pub discount_amount: f64,
    pub grand_total: f64,
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItem {
    pub id: i64,
    pub quotation_id: i64,
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Quotation header together with its line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationDetail {
    #[serde(flatten)]
    pub quotation: Quotation,
    #[serde(default)]
    pub items: Vec<QuotationItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotationPayload {
    pub customer_id: i64,
    pub store_id: i64,
    pub quotation_date: NaiveDate,
    pub items: Vec<LineItemPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,
}

impl CreateQuotationPayload {
    /// Sum of line totals before discount.
    pub fn subtotal(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.unit_price * f64::from(item.quantity))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quotation_detail() {
        let json = r#"{"id":3,"quotationNumber":"QT-2024-0003","quotationDate":"2024-03-01",
            "customerId":9,"customerName":"PT Maju","storeId":1,"storeName":"Gudang",
            "subtotal":90000,"discountAmount":5000,"grandTotal":85000,"status":"pending",
            "notes":"","createdAt":null,"updatedAt":null,
            "items":[{"id":1,"quotationId":3,"productId":"p1","productName":"Kopi",
                      "quantity":2,"unitPrice":45000,"subtotal":90000}]}"#;
        let detail: QuotationDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.quotation.quotation_number, "QT-2024-0003");
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].unit_price, 45000.0);
    }

    #[test]
    fn test_create_payload_shape() {
        let payload = CreateQuotationPayload {
            customer_id: 9,
            store_id: 1,
            quotation_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            items: vec![LineItemPayload {
                product_id: "p1".to_string(),
                quantity: 2,
                unit_price: 45000.0,
            }],
            notes: None,
            discount_amount: Some(5000.0),
        };
        assert_eq!(payload.subtotal(), 90000.0);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["quotationDate"], "2024-03-01");
        assert_eq!(value["items"][0]["unitPrice"], 45000.0);
        assert!(value.get("notes").is_none());
    }
}
