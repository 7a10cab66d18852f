//! REST transport.
//!
//! Verb-based calls against resource paths under a single base URL
//! (`/departments`, `/parts`, `/quality/:part_id`, ...). Responses are plain
//! JSON records, canonicalized before decoding. Non-2xx responses surface as
//! [`ApiError::Http`]; undecodable bodies as [`ApiError::Network`].

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ShopFloorApi, encode};
use crate::errors::ApiError;
use crate::mapper;
use crate::models::{
    Dashboard, Defect, DefectCategory, Department, NewDefect, NewDefectCategory, NewDepartment,
    NewPart, NewQuality, NewWorkCenter, PageParams, Part, Quality, WorkCenter,
};

/// REST client for the shop-floor API.
pub struct RestClient {
    http: reqwest::Client,
    base: String,
}

impl RestClient {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(ApiError::Http { status });
        }
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ApiError::Network(format!("invalid response body (HTTP {status}): {e}")))?;
        mapper::from_canonical(body)
            .map_err(|e| ApiError::Network(format!("failed to decode response: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {}{}", self.base, path);
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(resp).await
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: PageParams,
    ) -> Result<T, ApiError> {
        let (limit, offset) = page.coerce();
        debug!("GET {}{} limit={} offset={}", self.base, path, limit, offset);
        let resp = self
            .http
            .get(self.url(path))
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        debug!("POST {}{}", self.base, path);
        let resp = self
            .http
            .post(self.url(path))
            .json(&encode(body)?)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(resp).await
    }

    async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        debug!("PUT {}{}", self.base, path);
        let resp = self
            .http
            .put(self.url(path))
            .json(&encode(body)?)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(resp).await
    }

    async fn delete_path<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("DELETE {}{}", self.base, path);
        let resp = self
            .http
            .delete(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(resp).await
    }
}

#[async_trait]
impl ShopFloorApi for RestClient {
    async fn list_departments(&self, page: PageParams) -> Result<Vec<Department>, ApiError> {
        self.get_page("/departments", page).await
    }

    async fn get_department(&self, id: i64) -> Result<Department, ApiError> {
        self.get(&format!("/departments/{id}")).await
    }

    async fn department_by_title(&self, title: &str) -> Result<Department, ApiError> {
        debug!("GET {}/departments/by-title", self.base);
        let resp = self
            .http
            .get(self.url("/departments/by-title"))
            .query(&[("title", title)])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode(resp).await
    }

    async fn add_department(&self, input: &NewDepartment) -> Result<Department, ApiError> {
        self.post("/departments", input).await
    }

    async fn update_department(
        &self,
        id: i64,
        input: &NewDepartment,
    ) -> Result<Department, ApiError> {
        self.put(&format!("/departments/{id}"), input).await
    }

    async fn delete_department(&self, id: i64) -> Result<bool, ApiError> {
        self.delete_path(&format!("/departments/{id}")).await
    }

    async fn list_parts(&self, page: PageParams) -> Result<Vec<Part>, ApiError> {
        self.get_page("/parts", page).await
    }

    async fn get_part(&self, id: i64) -> Result<Part, ApiError> {
        self.get(&format!("/parts/{id}")).await
    }

    async fn add_part(&self, input: &NewPart) -> Result<Part, ApiError> {
        self.post("/parts", input).await
    }

    async fn list_work_centers(&self, page: PageParams) -> Result<Vec<WorkCenter>, ApiError> {
        self.get_page("/work-centers", page).await
    }

    async fn add_work_center(&self, input: &NewWorkCenter) -> Result<WorkCenter, ApiError> {
        self.post("/work-centers", input).await
    }

    async fn list_qualities(&self, page: PageParams) -> Result<Vec<Quality>, ApiError> {
        self.get_page("/qualities", page).await
    }

    async fn qualities_by_part(&self, part_id: i64) -> Result<Vec<Quality>, ApiError> {
        self.get(&format!("/quality/{part_id}")).await
    }

    async fn add_quality(&self, input: &NewQuality) -> Result<Quality, ApiError> {
        self.post("/qualities", input).await
    }

    async fn list_defects(&self, page: PageParams) -> Result<Vec<Defect>, ApiError> {
        self.get_page("/defects", page).await
    }

    async fn add_defect(&self, input: &NewDefect) -> Result<Defect, ApiError> {
        self.post("/defects", input).await
    }

    async fn list_defect_categories(
        &self,
        page: PageParams,
    ) -> Result<Vec<DefectCategory>, ApiError> {
        self.get_page("/defect-categories", page).await
    }

    async fn add_defect_category(
        &self,
        input: &NewDefectCategory,
    ) -> Result<DefectCategory, ApiError> {
        self.post("/defect-categories", input).await
    }

    /// No rollup endpoint exists; compose it from the two list calls.
    async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        let departments = self.list_departments(PageParams::default()).await?;
        let parts = self.list_parts(PageParams::default()).await?;
        Ok(Dashboard { departments, parts })
    }
}
