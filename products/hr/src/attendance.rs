use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use platform_backend::{Filter, OrderBy, RecordId, SharedClient};
use serde::{Deserialize, Serialize};

use crate::{
    error::{BatchAction, HrError, HrResult},
    gateway::{TableGateway, TableSpec},
    values::ExternalRef,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(default)]
    pub employee_id: Option<ExternalRef>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TableSpec for Attendance {
    const TABLE: &'static str = "Attendance_c";
    const ENTITY: &'static str = "attendance";
    const FIELDS: &'static [&'static str] = &[
        "Id",
        "employeeId",
        "date",
        "checkIn",
        "checkOut",
        "status",
        "notes",
    ];
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceInput {
    pub employee_id: Option<ExternalRef>,
    pub date: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttendanceRow<'a> {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    employee_id: Option<&'a ExternalRef>,
    date: Option<&'a str>,
    check_in: Option<&'a str>,
    check_out: Option<&'a str>,
    status: Option<&'a str>,
    notes: Option<&'a str>,
}

impl<'a> AttendanceRow<'a> {
    fn new(id: Option<RecordId>, input: &'a AttendanceInput) -> Self {
        Self {
            id,
            employee_id: input.employee_id.as_ref(),
            date: input.date.as_deref(),
            check_in: input.check_in.as_deref(),
            check_out: input.check_out.as_deref(),
            status: input.status.as_deref(),
            notes: input.notes.as_deref(),
        }
    }
}

/// Record gateway for the `Attendance_c` table.
#[derive(Clone)]
pub struct AttendanceGateway {
    table: TableGateway<Attendance>,
}

impl AttendanceGateway {
    pub fn new(client: SharedClient) -> Self {
        Self {
            table: TableGateway::new(client),
        }
    }

    /// All attendance entries, most recent day first.
    pub async fn get_all(&self) -> HrResult<Vec<Attendance>> {
        let params = self.table.select().order(OrderBy::desc("date"));
        self.table.fetch(params, "fetching attendance").await
    }

    pub async fn get_by_id(&self, id: RecordId) -> HrResult<Attendance> {
        self.table.get(id).await
    }

    /// Entries of one employee, most recent day first.
    pub async fn get_by_employee_id(&self, employee_id: &ExternalRef) -> HrResult<Vec<Attendance>> {
        let params = self
            .table
            .select()
            .filter(Filter::equal_to("employeeId", employee_id.to_string()))
            .order(OrderBy::desc("date"));
        self.table
            .fetch(
                params,
                &format!("fetching attendance for employee {employee_id}"),
            )
            .await
    }

    /// Entries for the UTC calendar day of `date` (a date or an RFC 3339 timestamp).
    pub async fn get_by_date(&self, date: &str) -> HrResult<Vec<Attendance>> {
        let day = calendar_day(date)?;
        let params = self
            .table
            .select()
            .filter(Filter::equal_to("date", day.format("%Y-%m-%d").to_string()));
        self.table
            .fetch(params, &format!("fetching attendance for date {day}"))
            .await
    }

    /// Records attendance; missing notes are stored as an empty string.
    pub async fn create(&self, input: &AttendanceInput) -> HrResult<Attendance> {
        let mut row = AttendanceRow::new(None, input);
        row.notes = Some(row.notes.unwrap_or_default());
        self.table.create(&row).await
    }

    pub async fn update(&self, id: RecordId, input: &AttendanceInput) -> HrResult<Attendance> {
        let row = AttendanceRow::new(Some(id), input);
        self.table.update(BatchAction::Update, &row).await
    }

    pub async fn delete(&self, id: RecordId) -> HrResult<bool> {
        self.table.delete(id).await
    }
}

/// Offset-less timestamps are read as UTC.
fn calendar_day(input: &str) -> HrResult<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(day);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc).date_naive());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.date());
    }
    Err(HrError::InvalidInput(format!("invalid attendance date {input:?}")))
}
