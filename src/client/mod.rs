//! Shop-floor API transports.
//!
//! ## Module Map
//!
//! | Module    | Responsibility                                            |
//! |-----------|-----------------------------------------------------------|
//! | `graphql` | POST `{query, variables}` envelope to a single endpoint   |
//! | `rest`    | Verb-based calls to resource paths under one base URL     |
//!
//! Both transports implement [`ShopFloorApi`]; the store is written against
//! the trait, so either transport (or a scripted test double) slots in.
//! Neither transport retries, caches, or has side effects beyond the
//! outbound call.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::{ApiConfig, Protocol};
use crate::errors::ApiError;
use crate::mapper;
use crate::models::{
    Dashboard, Defect, DefectCategory, Department, NewDefect, NewDefectCategory, NewDepartment,
    NewPart, NewQuality, NewWorkCenter, PageParams, Part, Quality, WorkCenter,
};

pub mod graphql;
pub mod rest;

pub use graphql::GraphqlClient;
pub use rest::RestClient;

/// Operations exposed by the shop-floor API, independent of transport.
#[async_trait]
pub trait ShopFloorApi: Send + Sync {
    async fn list_departments(&self, page: PageParams) -> Result<Vec<Department>, ApiError>;
    async fn get_department(&self, id: i64) -> Result<Department, ApiError>;
    async fn department_by_title(&self, title: &str) -> Result<Department, ApiError>;
    async fn add_department(&self, input: &NewDepartment) -> Result<Department, ApiError>;
    async fn update_department(
        &self,
        id: i64,
        input: &NewDepartment,
    ) -> Result<Department, ApiError>;
    async fn delete_department(&self, id: i64) -> Result<bool, ApiError>;

    async fn list_parts(&self, page: PageParams) -> Result<Vec<Part>, ApiError>;
    async fn get_part(&self, id: i64) -> Result<Part, ApiError>;
    async fn add_part(&self, input: &NewPart) -> Result<Part, ApiError>;

    async fn list_work_centers(&self, page: PageParams) -> Result<Vec<WorkCenter>, ApiError>;
    async fn add_work_center(&self, input: &NewWorkCenter) -> Result<WorkCenter, ApiError>;

    async fn list_qualities(&self, page: PageParams) -> Result<Vec<Quality>, ApiError>;
    async fn qualities_by_part(&self, part_id: i64) -> Result<Vec<Quality>, ApiError>;
    async fn add_quality(&self, input: &NewQuality) -> Result<Quality, ApiError>;

    async fn list_defects(&self, page: PageParams) -> Result<Vec<Defect>, ApiError>;
    async fn add_defect(&self, input: &NewDefect) -> Result<Defect, ApiError>;

    async fn list_defect_categories(
        &self,
        page: PageParams,
    ) -> Result<Vec<DefectCategory>, ApiError>;
    async fn add_defect_category(
        &self,
        input: &NewDefectCategory,
    ) -> Result<DefectCategory, ApiError>;

    /// Departments + parts fetched as one logical unit for the overview.
    async fn dashboard(&self) -> Result<Dashboard, ApiError>;
}

/// Construct the transport selected by `config.protocol`.
pub fn build_api(config: &ApiConfig) -> Arc<dyn ShopFloorApi> {
    match config.protocol {
        Protocol::Graphql => Arc::new(GraphqlClient::new(config.endpoint.clone())),
        Protocol::Rest => Arc::new(RestClient::new(config.endpoint.clone())),
    }
}

/// Serialize an outbound payload through the canonical mapper. Both
/// transports route every write through here.
pub(crate) fn encode<T: Serialize>(input: &T) -> Result<Value, ApiError> {
    mapper::canonical_value(input)
        .map_err(|e| ApiError::Network(format!("failed to encode request payload: {e}")))
}
