//! GraphQL transport.
//!
//! One POST of `{query, variables}` per operation, answered with the
//! `{data, errors}` envelope. A structured error list outranks the HTTP
//! status; transport and decode failures surface as [`ApiError::Network`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use super::{ShopFloorApi, encode};
use crate::errors::{ApiError, GRAPHQL_ERROR_CODE};
use crate::mapper;
use crate::models::{
    Dashboard, Defect, DefectCategory, Department, NewDefect, NewDefectCategory, NewDepartment,
    NewPart, NewQuality, NewWorkCenter, PageParams, Part, Quality, WorkCenter,
};

// ── Wire envelope ─────────────────────────────────────────────────────

/// Request envelope sent to the endpoint.
#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

/// Response envelope: exactly one of `data` or a non-empty `errors`.
#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorPayload>>,
}

/// A single structured error from the server.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlErrorPayload {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

/// Apply the unwrap policy: structured errors first, then the HTTP status,
/// then the data payload.
fn unwrap_envelope(status: u16, envelope: GraphqlResponse) -> Result<Value, ApiError> {
    let errors = envelope.errors.unwrap_or_default();
    if let Some(first) = errors.first() {
        let code = first
            .extensions
            .as_ref()
            .and_then(|e| e.code.clone())
            .unwrap_or_else(|| GRAPHQL_ERROR_CODE.to_string());
        return Err(ApiError::Server {
            code,
            message: first.message.clone(),
        });
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::Http { status });
    }
    envelope.data.ok_or_else(|| {
        ApiError::Network("response envelope carried neither data nor errors".to_string())
    })
}

/// Pull one named field out of a `data` payload.
fn take_field(data: &mut Value, field: &str) -> Result<Value, ApiError> {
    match data.get_mut(field) {
        Some(value) => Ok(value.take()),
        None => Err(ApiError::Network(format!(
            "response data missing field '{field}'"
        ))),
    }
}

// ── Operation strings ─────────────────────────────────────────────────

const DEPARTMENTS: &str = "query GetDepartments($limit: Int, $offset: Int) { departments(limit: $limit, offset: $offset) { id title description } }";
const DEPARTMENT: &str = "query GetDepartment($id: Int!) { department(id: $id) { id title description } }";
const DEPARTMENT_BY_TITLE: &str = "query GetDepartmentByTitle($title: String!) { departmentByTitle(title: $title) { id title description } }";
const ADD_DEPARTMENT: &str = "mutation CreateDepartment($data: DepartmentInput!) { addDepartment(departmentData: $data) { id title description } }";
const UPDATE_DEPARTMENT: &str = "mutation UpdateDepartment($id: Int!, $data: DepartmentInput!) { updateDepartment(id: $id, data: $data) { id title description } }";
const DELETE_DEPARTMENT: &str = "mutation DeleteDepartment($id: Int!) { deleteDepartment(id: $id) }";

const PARTS: &str = "query GetParts($limit: Int, $offset: Int) { parts(limit: $limit, offset: $offset) { id name departmentId } }";
const PART: &str = "query GetPart($id: Int!) { part(id: $id) { id name departmentId } }";
const ADD_PART: &str = "mutation CreatePart($data: PartInput!) { addPart(partData: $data) { id name departmentId } }";

const WORK_CENTERS: &str = "query GetWorkCenters($limit: Int, $offset: Int) { workCenters(limit: $limit, offset: $offset) { id name code departmentId } }";
const ADD_WORK_CENTER: &str = "mutation AddWorkCenter($data: WorkCenterInput!) { addWorkCenter(data: $data) { id name code departmentId } }";

const QUALITIES: &str = "query GetQualities($limit: Int, $offset: Int) { qualities(limit: $limit, offset: $offset) { id passFail defectCount partId } }";
const ADD_QUALITY: &str = "mutation AddQuality($data: QualityInput!) { addQuality(qualityData: $data) { id passFail defectCount partId } }";

const DEFECTS: &str = "query GetDefects($limit: Int, $offset: Int) { defects(limit: $limit, offset: $offset) { id title description partId defectCategoryId } }";
const ADD_DEFECT: &str = "mutation AddDefect($data: DefectInput!) { addDefect(defectData: $data) { id title description partId defectCategoryId } }";

const DEFECT_CATEGORIES: &str = "query GetDefectCategories($limit: Int, $offset: Int) { defectCategories(limit: $limit, offset: $offset) { id title departmentId } }";
const ADD_DEFECT_CATEGORY: &str = "mutation AddDefectCategory($data: DefectCategoryInput!) { addDefectCategory(defCatData: $data) { id title departmentId } }";

const DASHBOARD: &str = "query DashboardData { departments { id title description } parts { id name departmentId } }";

// ── Client ────────────────────────────────────────────────────────────

/// GraphQL client for the shop-floor API.
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Issue one operation and return the canonicalized `data` payload.
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, ApiError> {
        let mut variables = variables;
        mapper::canonicalize(&mut variables);
        debug!("graphql request to {}", self.endpoint);
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&GraphqlRequest { query, variables })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        let envelope: GraphqlResponse = resp.json().await.map_err(|e| {
            ApiError::Network(format!("invalid response body (HTTP {status}): {e}"))
        })?;
        let mut data = unwrap_envelope(status, envelope)?;
        mapper::canonicalize(&mut data);
        Ok(data)
    }

    /// Execute and decode a single field of the `data` payload.
    async fn field<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        name: &str,
    ) -> Result<T, ApiError> {
        let mut data = self.execute(query, variables).await?;
        let value = take_field(&mut data, name)?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::Network(format!("failed to decode '{name}': {e}")))
    }

    fn page_vars(page: PageParams) -> Value {
        let (limit, offset) = page.coerce();
        json!({"limit": limit, "offset": offset})
    }
}

#[async_trait]
impl ShopFloorApi for GraphqlClient {
    async fn list_departments(&self, page: PageParams) -> Result<Vec<Department>, ApiError> {
        self.field(DEPARTMENTS, Self::page_vars(page), "departments")
            .await
    }

    async fn get_department(&self, id: i64) -> Result<Department, ApiError> {
        self.field(DEPARTMENT, json!({"id": id}), "department").await
    }

    async fn department_by_title(&self, title: &str) -> Result<Department, ApiError> {
        self.field(
            DEPARTMENT_BY_TITLE,
            json!({"title": title}),
            "departmentByTitle",
        )
        .await
    }

    async fn add_department(&self, input: &NewDepartment) -> Result<Department, ApiError> {
        self.field(
            ADD_DEPARTMENT,
            json!({"data": encode(input)?}),
            "addDepartment",
        )
        .await
    }

    async fn update_department(
        &self,
        id: i64,
        input: &NewDepartment,
    ) -> Result<Department, ApiError> {
        self.field(
            UPDATE_DEPARTMENT,
            json!({"id": id, "data": encode(input)?}),
            "updateDepartment",
        )
        .await
    }

    async fn delete_department(&self, id: i64) -> Result<bool, ApiError> {
        self.field(DELETE_DEPARTMENT, json!({"id": id}), "deleteDepartment")
            .await
    }

    async fn list_parts(&self, page: PageParams) -> Result<Vec<Part>, ApiError> {
        self.field(PARTS, Self::page_vars(page), "parts").await
    }

    async fn get_part(&self, id: i64) -> Result<Part, ApiError> {
        self.field(PART, json!({"id": id}), "part").await
    }

    async fn add_part(&self, input: &NewPart) -> Result<Part, ApiError> {
        self.field(ADD_PART, json!({"data": encode(input)?}), "addPart")
            .await
    }

    async fn list_work_centers(&self, page: PageParams) -> Result<Vec<WorkCenter>, ApiError> {
        self.field(WORK_CENTERS, Self::page_vars(page), "workCenters")
            .await
    }

    async fn add_work_center(&self, input: &NewWorkCenter) -> Result<WorkCenter, ApiError> {
        self.field(
            ADD_WORK_CENTER,
            json!({"data": encode(input)?}),
            "addWorkCenter",
        )
        .await
    }

    async fn list_qualities(&self, page: PageParams) -> Result<Vec<Quality>, ApiError> {
        self.field(QUALITIES, Self::page_vars(page), "qualities")
            .await
    }

    /// The schema exposes no per-part filter, so this narrows client-side
    /// the same way the UI always has.
    async fn qualities_by_part(&self, part_id: i64) -> Result<Vec<Quality>, ApiError> {
        let all = self.list_qualities(PageParams::default()).await?;
        Ok(all
            .into_iter()
            .filter(|q| q.part_id == Some(part_id))
            .collect())
    }

    async fn add_quality(&self, input: &NewQuality) -> Result<Quality, ApiError> {
        self.field(ADD_QUALITY, json!({"data": encode(input)?}), "addQuality")
            .await
    }

    async fn list_defects(&self, page: PageParams) -> Result<Vec<Defect>, ApiError> {
        self.field(DEFECTS, Self::page_vars(page), "defects").await
    }

    async fn add_defect(&self, input: &NewDefect) -> Result<Defect, ApiError> {
        self.field(ADD_DEFECT, json!({"data": encode(input)?}), "addDefect")
            .await
    }

    async fn list_defect_categories(
        &self,
        page: PageParams,
    ) -> Result<Vec<DefectCategory>, ApiError> {
        self.field(DEFECT_CATEGORIES, Self::page_vars(page), "defectCategories")
            .await
    }

    async fn add_defect_category(
        &self,
        input: &NewDefectCategory,
    ) -> Result<DefectCategory, ApiError> {
        self.field(
            ADD_DEFECT_CATEGORY,
            json!({"data": encode(input)?}),
            "addDefectCategory",
        )
        .await
    }

    async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        let data = self.execute(DASHBOARD, json!({})).await?;
        serde_json::from_value(data)
            .map_err(|e| ApiError::Network(format!("failed to decode dashboard: {e}")))
    }
}
