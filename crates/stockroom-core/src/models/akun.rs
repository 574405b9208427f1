use serde::{Deserialize, Serialize};

/// Which side of a trade an akun sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum AkunType {
    Supplier,
    Customer,
}

impl std::fmt::Display for AkunType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AkunType::Supplier => write!(f, "supplier"),
            AkunType::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for AkunType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supplier" => Ok(AkunType::Supplier),
            "customer" => Ok(AkunType::Customer),
            other => Err(format!(
                "unknown akun type '{}', expected supplier or customer",
                other
            )),
        }
    }
}

/// A customer or supplier party record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Akun {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub akun_type: AkunType,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AkunPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(rename = "type")]
    pub akun_type: AkunType,
    pub phone: String,
    pub email: String,
    pub address: String,
}
