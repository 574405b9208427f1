//! Outbound call descriptors.
//!
//! An `ApiRequest` is built once and never mutated by the client. Whether a
//! dispatch is the first try or the post-refresh replay travels separately
//! as an `Attempt`, so two in-flight calls can never share retry state.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;

/// Which dispatch of a logical call this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    First,
    /// Replay after a successful session renewal. A 401 here is final.
    Retry,
}

impl Attempt {
    pub fn is_retry(self) -> bool {
        matches!(self, Attempt::Retry)
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append query parameters from any serializable map-like value.
    /// `None` fields are skipped.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, ApiError> {
        let value = serde_json::to_value(params)
            .map_err(|e| ApiError::InvalidRequest(format!("Unserializable query: {}", e)))?;
        match value {
            Value::Object(map) => {
                for (key, value) in map {
                    if let Some(rendered) = Self::render_query_value(&value) {
                        self.query.push((key, rendered));
                    }
                }
                Ok(self)
            }
            Value::Null => Ok(self),
            other => Err(ApiError::InvalidRequest(format!(
                "Query parameters must be an object, got {}",
                other
            ))),
        }
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Unserializable body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    fn render_query_value(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Filter {
        page: u32,
        search: Option<String>,
        sort_order: &'static str,
    }

    #[test]
    fn test_query_skips_none_fields() {
        let request = ApiRequest::get("/api/categories/all")
            .query(&Filter {
                page: 2,
                search: None,
                sort_order: "desc",
            })
            .unwrap();

        assert_eq!(
            request.query_pairs(),
            &[
                ("page".to_string(), "2".to_string()),
                ("sortOrder".to_string(), "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_accumulates() {
        let request = ApiRequest::get("/api/products/all")
            .query(&json!({ "page": 1 }))
            .unwrap()
            .query(&json!({ "categoryId": "c-1" }))
            .unwrap();
        assert_eq!(request.query_pairs().len(), 2);
    }

    #[test]
    fn test_query_rejects_non_object() {
        assert!(ApiRequest::get("/x").query(&vec![1, 2]).is_err());
    }

    #[test]
    fn test_json_body() {
        let request = ApiRequest::post("/api/store/delete")
            .json(&json!({ "id": "5" }))
            .unwrap();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.body(), Some(&json!({ "id": "5" })));
    }
}
