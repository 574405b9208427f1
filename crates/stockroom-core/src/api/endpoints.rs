//! Typed helpers for every backend endpoint.
//!
//! All of them go through `ApiClient::execute`, so they share bearer
//! injection and session renewal. Logout is the exception: it is sent once. Listings use `GET <base>/all`; detail,
//! create, update and delete are `POST`s with the id in the body.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::{ApiClient, ApiError, ApiRequest};
use crate::auth::Credentials;
use crate::models::{
    Akun, AkunFilter, AkunPayload, AuthTokens, Category, CategoryPayload,
    CreatePurchasePayload, CreateQuotationPayload, CreateStockMovementPayload, CreateUserPayload,
    DashboardGeneralSummary, DashboardSpecificSummary, ListQuery, Paginated, Product,
    ProductDetail, ProductFilter, ProductPayload, Purchase, PurchaseDetail, PurchaseFilter,
    Quotation, QuotationDetail, QuotationFilter, ReportKind, ReportParams, StockMovement,
    StockMovementFilter, Store, StorePayload, TimeFilter, User,
};

const CATEGORIES: &str = "/api/categories";
const STORES: &str = "/api/store";
const PRODUCTS: &str = "/api/products";
const STOCK_MOVEMENTS: &str = "/api/stock-movements";
const QUOTATIONS: &str = "/api/quotations";
const PURCHASES: &str = "/api/purchases";
const AKUNS: &str = "/api/akun";

impl ApiClient {
    // ===== Generic resource calls =====

    async fn list<T: DeserializeOwned, F: Serialize>(
        &self,
        base: &str,
        query: &ListQuery,
        filter: &F,
    ) -> Result<Paginated<T>, ApiError> {
        let request = ApiRequest::get(format!("{}/all", base))
            .query(query)?
            .query(filter)?;
        let page: Paginated<T> = self.call(&request).await?.into_data()?;
        debug!(
            resource = base,
            rows = page.data.len(),
            total = page.pagination.total_data,
            "Listing fetched"
        );
        Ok(page)
    }

    async fn post_data<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = ApiRequest::post(path).json(body)?;
        self.call(&request).await?.into_data()
    }

    async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let request = ApiRequest::post(path).json(body)?;
        self.call::<serde_json::Value>(&request).await?.into_unit()
    }

    async fn post_pdf<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<u8>, ApiError> {
        let request = ApiRequest::post(path).json(body)?;
        self.call_bytes(&request).await
    }

    async fn detail<T: DeserializeOwned, I: Serialize>(&self, base: &str, id: I) -> Result<T, ApiError> {
        self.post_data(&format!("{}/detail", base), &json!({ "id": id }))
            .await
    }

    async fn delete<I: Serialize>(&self, base: &str, id: I) -> Result<(), ApiError> {
        self.post_unit(&format!("{}/delete", base), &json!({ "id": id }))
            .await
    }

    // ===== Auth =====

    /// Log in and store the issued token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let tokens: AuthTokens = self
            .post_data(
                "/api/auth/login",
                &json!({ "email": email, "password": password }),
            )
            .await?;
        self.establish(&Credentials::from(tokens));
        Ok(())
    }

    /// Log out. Local credentials are cleared whatever the server says.
    ///
    /// An expired session is not renewed just to be logged out.
    pub async fn logout(&self) {
        let result = match ApiRequest::post("/api/auth/logout").json(&json!({})) {
            Ok(request) => self.execute_once(&request).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!(error = %e, "Logout request failed");
        }
        self.end_session();
    }

    // ===== Users =====

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.call(&ApiRequest::get("/api/user/profile"))
            .await?
            .into_data()
    }

    pub async fn update_profile(&self, fullname: &str) -> Result<(), ApiError> {
        self.post_unit("/api/user/update", &json!({ "fullname": fullname }))
            .await
    }

    pub async fn create_user(&self, payload: &CreateUserPayload) -> Result<(), ApiError> {
        self.post_unit("/api/user/create", payload).await
    }

    // ===== Dashboard =====

    pub async fn dashboard_general(&self) -> Result<DashboardGeneralSummary, ApiError> {
        self.call(&ApiRequest::get("/api/dashboard/summary-general"))
            .await?
            .into_data()
    }

    pub async fn dashboard_specific(
        &self,
        filter: TimeFilter,
    ) -> Result<DashboardSpecificSummary, ApiError> {
        let request = ApiRequest::get("/api/dashboard/summary-specific")
            .query(&json!({ "time_filter": filter.as_str() }))?;
        self.call(&request).await?.into_data()
    }

    // ===== Categories =====

    pub async fn list_categories(&self, query: &ListQuery) -> Result<Paginated<Category>, ApiError> {
        self.list(CATEGORIES, query, &()).await
    }

    pub async fn category(&self, id: &str) -> Result<Category, ApiError> {
        self.detail(CATEGORIES, id).await
    }

    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<(), ApiError> {
        self.post_unit(&format!("{}/create", CATEGORIES), payload).await
    }

    pub async fn update_category(&self, payload: &CategoryPayload) -> Result<(), ApiError> {
        self.post_unit(&format!("{}/update", CATEGORIES), payload).await
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.delete(CATEGORIES, id).await
    }

    // ===== Stores =====

    pub async fn list_stores(&self, query: &ListQuery) -> Result<Paginated<Store>, ApiError> {
        self.list(STORES, query, &()).await
    }

    pub async fn store(&self, id: &str) -> Result<Store, ApiError> {
        self.detail(STORES, id).await
    }

    pub async fn create_store(&self, payload: &StorePayload) -> Result<(), ApiError> {
        self.post_unit(&format!("{}/create", STORES), payload).await
    }

    pub async fn update_store(&self, payload: &StorePayload) -> Result<(), ApiError> {
        self.post_unit(&format!("{}/update", STORES), payload).await
    }

    pub async fn delete_store(&self, id: &str) -> Result<(), ApiError> {
        self.delete(STORES, id).await
    }

    // ===== Products =====

    pub async fn list_products(
        &self,
        query: &ListQuery,
        filter: &ProductFilter,
    ) -> Result<Paginated<Product>, ApiError> {
        self.list(PRODUCTS, query, filter).await
    }

    pub async fn product(&self, id: &str) -> Result<ProductDetail, ApiError> {
        self.detail(PRODUCTS, id).await
    }

    pub async fn create_product(&self, payload: &ProductPayload) -> Result<(), ApiError> {
        self.post_unit(&format!("{}/create", PRODUCTS), payload).await
    }

    pub async fn update_product(&self, payload: &ProductPayload) -> Result<(), ApiError> {
        self.post_unit(&format!("{}/update", PRODUCTS), payload).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        self.delete(PRODUCTS, id).await
    }

    // ===== Stock movements =====

    pub async fn list_stock_movements(
        &self,
        query: &ListQuery,
        filter: &StockMovementFilter,
    ) -> Result<Paginated<StockMovement>, ApiError> {
        self.list(STOCK_MOVEMENTS, query, filter).await
    }

    pub async fn stock_movement(&self, id: i64) -> Result<StockMovement, ApiError> {
        self.detail(STOCK_MOVEMENTS, id).await
    }

    pub async fn create_stock_movement(
        &self,
        payload: &CreateStockMovementPayload,
    ) -> Result<(), ApiError> {
        self.post_unit(&format!("{}/create", STOCK_MOVEMENTS), payload)
            .await
    }

    // ===== Quotations =====

    pub async fn list_quotations(
        &self,
        query: &ListQuery,
        filter: &QuotationFilter,
    ) -> Result<Paginated<Quotation>, ApiError> {
        self.list(QUOTATIONS, query, filter).await
    }

    pub async fn quotation(&self, id: i64) -> Result<QuotationDetail, ApiError> {
        self.detail(QUOTATIONS, id).await
    }

    pub async fn create_quotation(&self, payload: &CreateQuotationPayload) -> Result<(), ApiError> {
        self.post_unit(&format!("{}/create", QUOTATIONS), payload).await
    }

    pub async fn update_quotation_status(&self, id: i64, status: &str) -> Result<(), ApiError> {
        self.post_unit(
            &format!("{}/update-status", QUOTATIONS),
            &json!({ "id": id, "status": status }),
        )
        .await
    }

    pub async fn export_quotation_pdf(&self, id: i64) -> Result<Vec<u8>, ApiError> {
        self.post_pdf(&format!("{}/export-pdf", QUOTATIONS), &json!({ "id": id }))
            .await
    }

    // ===== Purchases =====

    pub async fn list_purchases(
        &self,
        query: &ListQuery,
        filter: &PurchaseFilter,
    ) -> Result<Paginated<Purchase>, ApiError> {
        self.list(PURCHASES, query, filter).await
    }

    pub async fn purchase(&self, id: i64) -> Result<PurchaseDetail, ApiError> {
        self.detail(PURCHASES, id).await
    }

    pub async fn create_purchase(&self, payload: &CreatePurchasePayload) -> Result<(), ApiError> {
        self.post_unit(&format!("{}/create", PURCHASES), payload).await
    }

    pub async fn update_purchase_status(&self, id: i64, status: &str) -> Result<(), ApiError> {
        self.post_unit(
            &format!("{}/update-status", PURCHASES),
            &json!({ "id": id, "status": status }),
        )
        .await
    }

    pub async fn update_purchase_payment_status(
        &self,
        id: i64,
        payment_status: &str,
    ) -> Result<(), ApiError> {
        self.post_unit(
            &format!("{}/update-payment-status", PURCHASES),
            &json!({ "id": id, "paymentStatus": payment_status }),
        )
        .await
    }

    pub async fn export_purchase_pdf(&self, id: i64) -> Result<Vec<u8>, ApiError> {
        self.post_pdf(&format!("{}/export-pdf", PURCHASES), &json!({ "id": id }))
            .await
    }

    // ===== Akuns =====

    pub async fn list_akuns(
        &self,
        query: &ListQuery,
        filter: &AkunFilter,
    ) -> Result<Paginated<Akun>, ApiError> {
        self.list(AKUNS, query, filter).await
    }

    pub async fn akun(&self, id: i64) -> Result<Akun, ApiError> {
        self.detail(AKUNS, id).await
    }

    pub async fn create_akun(&self, payload: &AkunPayload) -> Result<(), ApiError> {
        self.post_unit(&format!("{}/create", AKUNS), payload).await
    }

    pub async fn update_akun(&self, payload: &AkunPayload) -> Result<(), ApiError> {
        self.post_unit(&format!("{}/update", AKUNS), payload).await
    }

    pub async fn delete_akun(&self, id: i64) -> Result<(), ApiError> {
        self.delete(AKUNS, id).await
    }

    // ===== Reports =====

    pub async fn generate_report(
        &self,
        kind: ReportKind,
        params: &ReportParams,
    ) -> Result<Vec<u8>, ApiError> {
        self.post_pdf(kind.path(), params).await
    }
}

