//! Typed input and intermediate data model for one roster solve.
//!
//! Everything here is owned by the caller (employees, shops, leave, special
//! requests) or derived and dropped at the end of a single `solve` call
//! (templates, demand entries). Identifiers are plain integers; name-based
//! keys (fixed days off, excluded names) are normalised to lowercase/trimmed
//! strings at the config-loader boundary, not here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub type EmployeeId = u32;
pub type ShopId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    FullTime,
    PartTime,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShiftType {
    Am,
    Pm,
    Full,
}

impl ShiftType {
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftType::Am => "AM",
            ShiftType::Pm => "PM",
            ShiftType::Full => "FULL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageMode {
    Split,
    Flexible,
    FullDayOnly,
}

impl Default for CoverageMode {
    fn default() -> Self {
        CoverageMode::Flexible
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub company: String,
    pub contract: ContractKind,
    /// Whole hours, e.g. 40 for a full-timer, <=20 for a student.
    pub weekly_hour_target: u32,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub am_only: bool,
    pub primary_shop: Option<ShopId>,
    #[serde(default)]
    pub secondary_shops: Vec<ShopId>,
}

fn default_true() -> bool {
    true
}

impl Employee {
    pub fn weekly_target_tenths(&self) -> i64 {
        self.weekly_hour_target as i64 * 10
    }

    pub fn allowed_shops(&self, assignments: &[(EmployeeId, ShopId, bool)]) -> HashSet<ShopId> {
        let mut shops: HashSet<ShopId> = self.primary_shop.into_iter().collect();
        shops.extend(self.secondary_shops.iter().copied());
        shops.extend(
            assignments
                .iter()
                .filter(|(e, _, _)| *e == self.id)
                .map(|(_, s, _)| *s),
        );
        shops
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStaffing {
    pub min_am: u32,
    pub min_pm: u32,
    pub target_am: u32,
    pub target_pm: u32,
    pub max_staff: u32,
    #[serde(default)]
    pub is_mandatory: bool,
}

impl Default for DayStaffing {
    fn default() -> Self {
        // Spec default when a shop has no per-day entry for a given day.
        Self {
            min_am: 1,
            min_pm: 1,
            target_am: 2,
            target_pm: 2,
            max_staff: 10,
            is_mandatory: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffingConfig {
    #[serde(default)]
    pub coverage_mode: CoverageMode,
    /// Indexed by day 0=Mon..6=Sun; `None` means "use the default".
    #[serde(default)]
    pub days: [Option<DayStaffing>; 7],
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SundayConfig {
    #[serde(default)]
    pub closed: bool,
    pub max_staff: Option<u32>,
    pub custom_open: Option<String>,
    pub custom_close: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimmingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub trim_am: bool,
    #[serde(default)]
    pub trim_pm: bool,
    #[serde(default)]
    pub trim_from_start_hours: u32,
    #[serde(default)]
    pub trim_from_end_hours: u32,
    #[serde(default = "default_trim_threshold")]
    pub trim_when_more_than: u32,
    #[serde(default)]
    pub extension_eligible: bool,
}

fn default_trim_threshold() -> u32 {
    2
}

impl Default for TrimmingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trim_am: false,
            trim_pm: false,
            trim_from_start_hours: 0,
            trim_from_end_hours: 0,
            trim_when_more_than: default_trim_threshold(),
            extension_eligible: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub company: String,
    pub open: String,
    pub close: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub can_be_solo: bool,
    #[serde(default)]
    pub min_staff_at_close: u32,
    #[serde(default)]
    pub day_in_day_out: bool,
    #[serde(default)]
    pub staffing: RawField<StaffingConfig>,
    #[serde(default)]
    pub sunday: RawField<SundayConfig>,
    #[serde(default)]
    pub trimming: RawField<TrimmingConfig>,
}

/// Named set of high-traffic shops that never operate solo and receive
/// specialised trim/coverage rules. Matched case-insensitively on name.
pub const LARGE_SHOP_NAMES: &[&str] = &["Hamrun", "Sliema", "Valletta"];

pub fn is_large_shop(name: &str) -> bool {
    LARGE_SHOP_NAMES
        .iter()
        .any(|n| n.eq_ignore_ascii_case(name.trim()))
}

/// A sub-field that may arrive already structured, as a serialised (JSON)
/// string, or not at all. Decoded once at the config-loader boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawField<T> {
    Structured(T),
    Serialized(String),
    Absent,
}

impl<T> Default for RawField<T> {
    fn default() -> Self {
        RawField::Absent
    }
}

impl<T> RawField<T>
where
    T: for<'de> Deserialize<'de>,
{
    /// Tolerant resolution: malformed or absent sub-fields fall back to
    /// `default` silently; the caller never sees a parse error here.
    pub fn resolve(self, default: T) -> T {
        match self {
            RawField::Structured(v) => v,
            RawField::Serialized(s) => serde_json::from_str(&s).unwrap_or(default),
            RawField::Absent => default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTemplate {
    pub shop_id: ShopId,
    pub day: u8,
    pub shift_type: ShiftType,
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub duration_tenths: u32,
    pub is_mandatory: bool,
}

impl ShiftTemplate {
    pub fn template_id(&self) -> String {
        format!("{}_{}_{}", self.shop_id, self.day, self.shift_type.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandEntry {
    pub shop_id: ShopId,
    pub day: u8,
    pub min_am: u32,
    pub min_pm: u32,
    pub target_am: u32,
    pub target_pm: u32,
    pub max_staff: u32,
    pub is_mandatory: bool,
    pub is_solo: bool,
    pub coverage_mode: CoverageMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub employee_id: EmployeeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub approved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialRequest {
    pub employee_id: EmployeeId,
    pub shop_id: ShopId,
    pub day: u8,
    pub shift_type: ShiftType,
    pub explicit_start: Option<String>,
    pub explicit_end: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousWeekSundayShift {
    pub shop_id: ShopId,
    pub employee_id: EmployeeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub shop_id: ShopId,
    pub shop_name: String,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub date: NaiveDate,
    pub day: u8,
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub duration_tenths: u32,
    pub shift_type: ShiftType,
    pub is_trimmed: bool,
}

/// Top-level input contract for one solve call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRequest {
    pub week_start: NaiveDate,
    pub employees: Vec<Employee>,
    pub shops: Vec<Shop>,
    #[serde(default)]
    pub assignments: Vec<ExplicitAssignment>,
    #[serde(default)]
    pub leave_requests: Vec<LeaveRequest>,
    #[serde(default)]
    pub fixed_days_off: std::collections::HashMap<String, Vec<String>>,
    #[serde(default)]
    pub special_requests: Vec<SpecialRequest>,
    #[serde(default)]
    pub previous_week_sunday_shifts: Vec<PreviousWeekSundayShift>,
    #[serde(default)]
    pub excluded_employee_ids: HashSet<EmployeeId>,
    #[serde(default)]
    pub am_only_employee_names: HashSet<String>,
    pub time_limit_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitAssignment {
    pub employee_id: EmployeeId,
    pub shop_id: ShopId,
    #[serde(default)]
    pub is_primary: bool,
}
