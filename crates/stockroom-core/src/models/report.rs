use chrono::NaiveDate;
use serde::Serialize;

use super::stock::MovementType;

/// Named periods accepted as `filterType`, besides `custom`.
pub const REPORT_PERIODS: &[&str] = &[
    "today",
    "yesterday",
    "this_week",
    "last_week",
    "this_month",
    "last_month",
    "this_year",
    "last_year",
];

/// PDF reports the backend can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Inventory,
    Purchases,
    Quotations,
    StockMovements,
}

impl ReportKind {
    pub fn path(&self) -> &'static str {
        match self {
            ReportKind::Inventory => "/api/reports/inventory/pdf",
            ReportKind::Purchases => "/api/reports/purchases/pdf",
            ReportKind::Quotations => "/api/reports/quotations/pdf",
            ReportKind::StockMovements => "/api/reports/stock-movements/pdf",
        }
    }

    /// Suggested file name for a downloaded report.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ReportKind::Inventory => "inventory-report",
            ReportKind::Purchases => "purchases-report",
            ReportKind::Quotations => "quotations-report",
            ReportKind::StockMovements => "stock-movements-report",
        }
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inventory" => Ok(ReportKind::Inventory),
            "purchases" => Ok(ReportKind::Purchases),
            "quotations" => Ok(ReportKind::Quotations),
            "stock-movements" => Ok(ReportKind::StockMovements),
            other => Err(format!("unknown report '{}'", other)),
        }
    }
}

/// Body for every `/api/reports/*/pdf` call. `start_date`/`end_date` only
/// matter when `filter_type` is `custom`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParams {
    pub filter_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement_type: Option<MovementType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            filter_type: "this_month".to_string(),
            store_id: None,
            category_id: None,
            product_id: None,
            supplier_id: None,
            customer_id: None,
            movement_type: None,
            start_date: None,
            end_date: None,
            title: None,
        }
    }
}

impl ReportParams {
    /// A custom date range report.
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            filter_type: "custom".to_string(),
            start_date: Some(start),
            end_date: Some(end),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_serialize_minimal() {
        let value = serde_json::to_value(ReportParams::default()).unwrap();
        assert_eq!(value, serde_json::json!({ "filterType": "this_month" }));
    }

    #[test]
    fn test_custom_range() {
        let params = ReportParams::custom(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        let value = serde_json::to_value(params).unwrap();
        assert_eq!(value["filterType"], "custom");
        assert_eq!(value["endDate"], "2024-01-31");
    }

    #[test]
    fn test_report_kind_paths() {
        let kind: ReportKind = "stock-movements".parse().unwrap();
        assert_eq!(kind.path(), "/api/reports/stock-movements/pdf");
    }
}
