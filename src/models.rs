//! Canonical record shapes for the shop-floor domain.
//!
//! Every record uses one fixed key set with camelCase wire casing; the
//! mapper normalizes whatever the server actually sent before these types
//! ever see it. Foreign references are nullable because older server
//! versions omit them entirely.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not supply a limit.
pub const DEFAULT_LIMIT: u32 = 50;
/// Largest page size the server accepts.
pub const MAX_LIMIT: u32 = 200;

/// A production department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A manufactured part, optionally assigned to a department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub department_id: Option<i64>,
}

/// A work center on the floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkCenter {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub department_id: Option<i64>,
}

/// A quality inspection record for a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quality {
    pub id: i64,
    pub pass_fail: bool,
    pub defect_count: i64,
    #[serde(default)]
    pub part_id: Option<i64>,
}

/// A recorded defect on a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defect {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub part_id: Option<i64>,
    #[serde(default)]
    pub defect_category_id: Option<i64>,
}

/// A category grouping defects, owned by a department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectCategory {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub department_id: Option<i64>,
}

/// The dashboard rollup: departments and parts fetched as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub departments: Vec<Department>,
    pub parts: Vec<Part>,
}

// ── Input shapes ──────────────────────────────────────────────────────

/// Payload for creating or updating a department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDepartment {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Payload for creating a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPart {
    pub name: String,
    #[serde(default)]
    pub department_id: Option<i64>,
}

/// Payload for creating a work center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkCenter {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub department_id: Option<i64>,
}

/// Payload for recording a quality inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuality {
    pub pass_fail: bool,
    pub defect_count: i64,
    #[serde(default)]
    pub part_id: Option<i64>,
}

/// Payload for recording a defect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDefect {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub part_id: Option<i64>,
    #[serde(default)]
    pub defect_category_id: Option<i64>,
}

/// Payload for creating a defect category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDefectCategory {
    pub title: String,
    #[serde(default)]
    pub department_id: Option<i64>,
}

// ── Pagination ────────────────────────────────────────────────────────

/// Pagination window accepted by every list operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PageParams {
    /// Clamp to the window the server accepts: a missing or zero limit
    /// becomes the default, oversized limits are capped, offset defaults
    /// to zero.
    pub fn coerce(self) -> (u32, u32) {
        let limit = match self.limit {
            None | Some(0) => DEFAULT_LIMIT,
            Some(l) => l.min(MAX_LIMIT),
        };
        (limit, self.offset.unwrap_or(0))
    }
}
