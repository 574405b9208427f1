//! Data models for the inventory API.
//!
//! This module contains the wire types exchanged with the backend:
//!
//! - `ApiResponse`, `Paginated`, `PaginationInfo`: the shared envelopes
//! - `ListQuery` and per-resource filters for `.../all` endpoints
//! - Catalog types: `Category`, `Store`, `Product`
//! - Stock types: `StockMovement`, `StockByStore`
//! - Trade documents: `Quotation`, `Purchase` and their line items
//! - Parties and people: `Akun`, `User`
//! - Dashboard summaries and report parameters

pub mod akun;
pub mod catalog;
pub mod dashboard;
pub mod envelope;
pub mod purchase;
pub mod query;
pub mod quotation;
pub mod report;
pub mod stock;
pub mod user;

pub use akun::{Akun, AkunPayload, AkunType};
pub use catalog::{
    Category, CategoryPayload, Product, ProductCategory, ProductDetail, ProductPayload, Store,
    StorePayload,
};
pub use dashboard::{DashboardGeneralSummary, DashboardSpecificSummary, RecentTransaction, TimeFilter};
pub use envelope::{ApiResponse, AuthTokens, Paginated, PaginationInfo};
pub use purchase::{
    CreatePurchasePayload, Purchase, PurchaseDetail, PurchaseItem, PURCHASE_STATUSES,
};
pub use query::{
    AkunFilter, LineItemPayload, ListQuery, ProductFilter, PurchaseFilter, QuotationFilter,
    SortOrder, StockMovementFilter,
};
pub use quotation::{
    CreateQuotationPayload, Quotation, QuotationDetail, QuotationItem, QUOTATION_STATUSES,
};
pub use report::{ReportKind, ReportParams, REPORT_PERIODS};
pub use stock::{CreateStockMovementPayload, MovementType, StockByStore, StockMovement};
pub use user::{CreateUserPayload, User};
