//! Client-side state store.
//!
//! An explicit context object owned by the caller — nothing here is a
//! process-wide singleton. One [`Slot`] per logical resource key holds the
//! last committed payload, the last error, and an in-flight count. Every
//! action marks its key loading on entry, records and re-raises failures,
//! and releases the loading mark on all exit paths.
//!
//! Fetches additionally take a monotonically increasing ticket per key. A
//! completion only commits if no newer completion already has, so a stale
//! response can never overwrite a fresher one; discarded completions are
//! logged and still returned to their caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use crate::client::ShopFloorApi;
use crate::errors::ApiError;
use crate::models::{
    Dashboard, Defect, DefectCategory, Department, NewDefect, NewDefectCategory, NewDepartment,
    NewPart, NewQuality, NewWorkCenter, PageParams, Part, Quality, WorkCenter,
};

/// Lifecycle of a resource key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Error,
}

/// Point-in-time view of one resource key.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Snapshot<T> {
    /// Loading outranks a sticky error, which outranks idle.
    pub fn status(&self) -> Status {
        if self.loading {
            Status::Loading
        } else if self.error.is_some() {
            Status::Error
        } else {
            Status::Idle
        }
    }
}

struct SlotState<T> {
    data: Option<T>,
    error: Option<String>,
    committed: u64,
    in_flight: u32,
}

impl<T> Default for SlotState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            committed: 0,
            in_flight: 0,
        }
    }
}

/// One resource key's state plus its sequencing ticket counter.
struct Slot<T> {
    name: &'static str,
    tickets: AtomicU64,
    state: Mutex<SlotState<T>>,
}

impl<T: Clone> Slot<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            tickets: AtomicU64::new(0),
            state: Mutex::new(SlotState::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark a fetch in flight and hand out its sequencing ticket.
    fn begin(&self) -> u64 {
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed) + 1;
        self.lock().in_flight += 1;
        ticket
    }

    /// Complete a fetch. Commits only if no newer completion already has;
    /// the loading mark is released either way, and the result goes back to
    /// the caller untouched.
    fn settle(&self, ticket: u64, result: Result<T, ApiError>) -> Result<T, ApiError> {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if ticket <= state.committed {
            warn!(
                "{}: discarding stale response (ticket {ticket} <= {})",
                self.name, state.committed
            );
            return result;
        }
        state.committed = ticket;
        match result {
            Ok(value) => {
                state.data = Some(value.clone());
                state.error = None;
                Ok(value)
            }
            Err(err) => {
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Mark a mutation in flight. Mutations are not sequenced: they never
    /// rewrite the cached payload, only the error bookkeeping.
    fn begin_flight(&self) {
        self.lock().in_flight += 1;
    }

    fn settle_mutation<R>(&self, result: Result<R, ApiError>) -> Result<R, ApiError> {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        match result {
            Ok(value) => {
                state.error = None;
                Ok(value)
            }
            Err(err) => {
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn snapshot(&self) -> Snapshot<T> {
        let state = self.lock();
        Snapshot {
            data: state.data.clone(),
            loading: state.in_flight > 0,
            error: state.error.clone(),
        }
    }
}

/// The shop-floor store: per-key slots composed over a transport.
pub struct ShopFloorStore {
    api: Arc<dyn ShopFloorApi>,
    departments: Slot<Vec<Department>>,
    parts: Slot<Vec<Part>>,
    work_centers: Slot<Vec<WorkCenter>>,
    qualities: Slot<Vec<Quality>>,
    defects: Slot<Vec<Defect>>,
    defect_categories: Slot<Vec<DefectCategory>>,
    dashboard: Slot<Dashboard>,
}

impl ShopFloorStore {
    pub fn new(api: Arc<dyn ShopFloorApi>) -> Self {
        Self {
            api,
            departments: Slot::new("departments"),
            parts: Slot::new("parts"),
            work_centers: Slot::new("work_centers"),
            qualities: Slot::new("qualities"),
            defects: Slot::new("defects"),
            defect_categories: Slot::new("defect_categories"),
            dashboard: Slot::new("dashboard"),
        }
    }

    // ── Departments ───────────────────────────────────────────────────

    pub async fn fetch_departments(
        &self,
        page: PageParams,
    ) -> Result<Vec<Department>, ApiError> {
        let ticket = self.departments.begin();
        let result = self.api.list_departments(page).await;
        self.departments.settle(ticket, result)
    }

    pub async fn add_department(&self, input: &NewDepartment) -> Result<Department, ApiError> {
        self.departments.begin_flight();
        let result = self.api.add_department(input).await;
        self.departments.settle_mutation(result)
    }

    pub async fn update_department(
        &self,
        id: i64,
        input: &NewDepartment,
    ) -> Result<Department, ApiError> {
        self.departments.begin_flight();
        let result = self.api.update_department(id, input).await;
        self.departments.settle_mutation(result)
    }

    pub async fn delete_department(&self, id: i64) -> Result<bool, ApiError> {
        self.departments.begin_flight();
        let result = self.api.delete_department(id).await;
        self.departments.settle_mutation(result)
    }

    pub fn departments(&self) -> Snapshot<Vec<Department>> {
        self.departments.snapshot()
    }

    // ── Parts ─────────────────────────────────────────────────────────

    pub async fn fetch_parts(&self, page: PageParams) -> Result<Vec<Part>, ApiError> {
        let ticket = self.parts.begin();
        let result = self.api.list_parts(page).await;
        self.parts.settle(ticket, result)
    }

    pub async fn add_part(&self, input: &NewPart) -> Result<Part, ApiError> {
        self.parts.begin_flight();
        let result = self.api.add_part(input).await;
        self.parts.settle_mutation(result)
    }

    pub fn parts(&self) -> Snapshot<Vec<Part>> {
        self.parts.snapshot()
    }

    // ── Work centers ──────────────────────────────────────────────────

    pub async fn fetch_work_centers(
        &self,
        page: PageParams,
    ) -> Result<Vec<WorkCenter>, ApiError> {
        let ticket = self.work_centers.begin();
        let result = self.api.list_work_centers(page).await;
        self.work_centers.settle(ticket, result)
    }

    pub async fn add_work_center(&self, input: &NewWorkCenter) -> Result<WorkCenter, ApiError> {
        self.work_centers.begin_flight();
        let result = self.api.add_work_center(input).await;
        self.work_centers.settle_mutation(result)
    }

    pub fn work_centers(&self) -> Snapshot<Vec<WorkCenter>> {
        self.work_centers.snapshot()
    }

    // ── Quality ───────────────────────────────────────────────────────

    pub async fn fetch_qualities(&self, page: PageParams) -> Result<Vec<Quality>, ApiError> {
        let ticket = self.qualities.begin();
        let result = self.api.list_qualities(page).await;
        self.qualities.settle(ticket, result)
    }

    pub async fn fetch_qualities_for_part(
        &self,
        part_id: i64,
    ) -> Result<Vec<Quality>, ApiError> {
        let ticket = self.qualities.begin();
        let result = self.api.qualities_by_part(part_id).await;
        self.qualities.settle(ticket, result)
    }

    pub async fn add_quality(&self, input: &NewQuality) -> Result<Quality, ApiError> {
        self.qualities.begin_flight();
        let result = self.api.add_quality(input).await;
        self.qualities.settle_mutation(result)
    }

    pub fn qualities(&self) -> Snapshot<Vec<Quality>> {
        self.qualities.snapshot()
    }

    // ── Defects ───────────────────────────────────────────────────────

    pub async fn fetch_defects(&self, page: PageParams) -> Result<Vec<Defect>, ApiError> {
        let ticket = self.defects.begin();
        let result = self.api.list_defects(page).await;
        self.defects.settle(ticket, result)
    }

    pub async fn add_defect(&self, input: &NewDefect) -> Result<Defect, ApiError> {
        self.defects.begin_flight();
        let result = self.api.add_defect(input).await;
        self.defects.settle_mutation(result)
    }

    pub fn defects(&self) -> Snapshot<Vec<Defect>> {
        self.defects.snapshot()
    }

    pub async fn fetch_defect_categories(
        &self,
        page: PageParams,
    ) -> Result<Vec<DefectCategory>, ApiError> {
        let ticket = self.defect_categories.begin();
        let result = self.api.list_defect_categories(page).await;
        self.defect_categories.settle(ticket, result)
    }

    pub async fn add_defect_category(
        &self,
        input: &NewDefectCategory,
    ) -> Result<DefectCategory, ApiError> {
        self.defect_categories.begin_flight();
        let result = self.api.add_defect_category(input).await;
        self.defect_categories.settle_mutation(result)
    }

    pub fn defect_categories(&self) -> Snapshot<Vec<DefectCategory>> {
        self.defect_categories.snapshot()
    }

    // ── Dashboard ─────────────────────────────────────────────────────

    pub async fn fetch_dashboard(&self) -> Result<Dashboard, ApiError> {
        let ticket = self.dashboard.begin();
        let result = self.api.dashboard().await;
        self.dashboard.settle(ticket, result)
    }

    pub fn dashboard(&self) -> Snapshot<Dashboard> {
        self.dashboard.snapshot()
    }
}
