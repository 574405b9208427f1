use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct DashboardGeneralSummary {
    pub total_users: u64,
    pub total_products: u64,
    pub total_categories: u64,
    pub total_stores: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub amount: f64,
    pub date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSpecificSummary {
    #[serde(default)]
    pub sales_total: f64,
    #[serde(default)]
    pub purchases_total: f64,
    #[serde(default)]
    pub transactions_count: u64,
    #[serde(default)]
    pub recent_transactions: Vec<RecentTransaction>,
}

/// Window for the time-filtered dashboard summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    Today,
    Yesterday,
    #[default]
    Last7Days,
    Last30Days,
    ThisMonth,
    LastMonth,
    ThisYear,
}

impl TimeFilter {
    pub const ALL: [TimeFilter; 7] = [
        TimeFilter::Today,
        TimeFilter::Yesterday,
        TimeFilter::Last7Days,
        TimeFilter::Last30Days,
        TimeFilter::ThisMonth,
        TimeFilter::LastMonth,
        TimeFilter::ThisYear,
    ];

    /// Value sent as `time_filter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Today => "today",
            TimeFilter::Yesterday => "yesterday",
            TimeFilter::Last7Days => "last_7_days",
            TimeFilter::Last30Days => "last_30_days",
            TimeFilter::ThisMonth => "this_month",
            TimeFilter::LastMonth => "last_month",
            TimeFilter::ThisYear => "this_year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeFilter::Today => "Today",
            TimeFilter::Yesterday => "Yesterday",
            TimeFilter::Last7Days => "Last 7 Days",
            TimeFilter::Last30Days => "Last 30 Days",
            TimeFilter::ThisMonth => "This Month",
            TimeFilter::LastMonth => "Last Month",
            TimeFilter::ThisYear => "This Year",
        }
    }
}

impl std::str::FromStr for TimeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| format!("unknown time filter '{}'", s))
    }
}
