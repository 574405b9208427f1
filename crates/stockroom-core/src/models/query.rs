use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::akun::AkunType;
use super::stock::MovementType;

/// Rows per page the console requests by default.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Common parameters accepted by every `.../all` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            search: None,
            sort_by: None,
            sort_order: None,
        }
    }
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: page.max(1),
            ..Self::default()
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Blank search terms are dropped rather than sent as `search=`.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self
    }

    pub fn sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(column.into());
        self.sort_order = Some(order);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementFilter {
    pub store_id: Option<String>,
    pub product_id: Option<String>,
    pub movement_type: Option<MovementType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationFilter {
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseFilter {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AkunFilter {
    #[serde(rename = "type")]
    pub akun_type: Option<AkunType>,
}

/// One product line on a quotation or purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemPayload {
    #[serde(rename = "productId")]
    pub product_id: String,
    pub quantity: u32,
    #[serde(rename = "unitPrice")]
    pub unit_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiRequest;

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(ListQuery::page(0).page, 1);
    }

    #[test]
    fn test_list_query_wire_names() {
        let query = ListQuery::page(3)
            .search("kopi")
            .sort("createdAt", SortOrder::Desc);
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["page"], 3);
        assert_eq!(value["search"], "kopi");
        assert_eq!(value["sortBy"], "createdAt");
        assert_eq!(value["sortOrder"], "desc");
    }

    #[test]
    fn test_blank_search_dropped() {
        let query = ListQuery::default().search("   ");
        assert_eq!(query.search, None);
    }

    #[test]
    fn test_stock_filter_query_pairs() {
        let filter = StockMovementFilter {
            movement_type: Some(MovementType::Out),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        let request = ApiRequest::get("/api/stock-movements/all")
            .query(&filter)
            .unwrap();
        assert_eq!(
            request.query_pairs(),
            &[
                ("movementType".to_string(), "out".to_string()),
                ("startDate".to_string(), "2024-01-31".to_string()),
            ]
        );
    }

    #[test]
    fn test_akun_filter_uses_type_key() {
        let value = serde_json::to_value(AkunFilter {
            akun_type: Some(AkunType::Supplier),
        })
        .unwrap();
        assert_eq!(value["type"], "supplier");
    }
}
