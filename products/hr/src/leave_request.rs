use chrono::{SecondsFormat, Utc};
use platform_backend::{Filter, OrderBy, RecordId, SharedClient};
use serde::{Deserialize, Serialize};

use crate::{
    error::{BatchAction, HrResult},
    gateway::{TableGateway, TableSpec},
    values::{ExternalRef, non_empty},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(default)]
    pub employee_id: Option<ExternalRef>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, rename = "type")]
    pub leave_type: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub approved_by: Option<ExternalRef>,
    #[serde(default)]
    pub request_date: Option<String>,
}

impl TableSpec for LeaveRequest {
    const TABLE: &'static str = "LeaveRequest_c";
    const ENTITY: &'static str = "leave request";
    const FIELDS: &'static [&'static str] = &[
        "Id",
        "employeeId",
        "startDate",
        "endDate",
        "type",
        "reason",
        "status",
        "approvedBy",
        "requestDate",
    ];
}

/// Leave request fields as submitted by a caller.
///
/// `create` ignores `status`, `approved_by` and `request_date`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestInput {
    pub employee_id: Option<ExternalRef>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(rename = "type")]
    pub leave_type: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
    pub approved_by: Option<ExternalRef>,
    pub request_date: Option<String>,
}

impl From<LeaveRequest> for LeaveRequestInput {
    fn from(record: LeaveRequest) -> Self {
        Self {
            employee_id: record.employee_id,
            start_date: record.start_date,
            end_date: record.end_date,
            leave_type: record.leave_type,
            reason: record.reason,
            status: record.status,
            approved_by: record.approved_by,
            request_date: record.request_date,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LeaveRequestRow<'a> {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    employee_id: Option<&'a ExternalRef>,
    start_date: Option<&'a str>,
    end_date: Option<&'a str>,
    #[serde(rename = "type")]
    leave_type: Option<&'a str>,
    reason: Option<&'a str>,
    status: Option<&'a str>,
    approved_by: Option<&'a ExternalRef>,
    request_date: Option<&'a str>,
}

impl<'a> LeaveRequestRow<'a> {
    fn new(id: Option<RecordId>, input: &'a LeaveRequestInput) -> Self {
        Self {
            id,
            employee_id: input.employee_id.as_ref(),
            start_date: input.start_date.as_deref(),
            end_date: input.end_date.as_deref(),
            leave_type: input.leave_type.as_deref(),
            reason: input.reason.as_deref(),
            status: input.status.as_deref(),
            approved_by: input.approved_by.as_ref(),
            request_date: input.request_date.as_deref(),
        }
    }
}

/// Record gateway for the `LeaveRequest_c` table.
#[derive(Clone)]
pub struct LeaveRequestGateway {
    table: TableGateway<LeaveRequest>,
}

impl LeaveRequestGateway {
    pub fn new(client: SharedClient) -> Self {
        Self {
            table: TableGateway::new(client),
        }
    }

    /// All leave requests, newest request first.
    pub async fn get_all(&self) -> HrResult<Vec<LeaveRequest>> {
        let params = self.table.select().order(OrderBy::desc("requestDate"));
        self.table.fetch(params, "fetching leave requests").await
    }

    pub async fn get_by_id(&self, id: RecordId) -> HrResult<LeaveRequest> {
        self.table.get(id).await
    }

    pub async fn get_by_employee_id(
        &self,
        employee_id: &ExternalRef,
    ) -> HrResult<Vec<LeaveRequest>> {
        let params = self
            .table
            .select()
            .filter(Filter::equal_to("employeeId", employee_id.to_string()))
            .order(OrderBy::desc("requestDate"));
        self.table
            .fetch(
                params,
                &format!("fetching leave requests for employee {employee_id}"),
            )
            .await
    }

    /// Requests in `status`; a missing or empty status lists every request.
    pub async fn get_by_status(&self, status: Option<&str>) -> HrResult<Vec<LeaveRequest>> {
        let Some(status) = non_empty(status) else {
            return self.get_all().await;
        };
        let params = self
            .table
            .select()
            .filter(Filter::equal_to("status", status))
            .order(OrderBy::desc("requestDate"));
        self.table
            .fetch(
                params,
                &format!("fetching leave requests with status {status}"),
            )
            .await
    }

    /// Files a new request: always `Pending`, unapproved, stamped with the
    /// current time.
    pub async fn create(&self, input: &LeaveRequestInput) -> HrResult<LeaveRequest> {
        let requested_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let unapproved = ExternalRef::Text(String::new());
        let mut row = LeaveRequestRow::new(None, input);
        row.status = Some(LeaveStatus::Pending.as_str());
        row.approved_by = Some(&unapproved);
        row.request_date = Some(&requested_at);
        self.table.create(&row).await
    }

    pub async fn update(&self, id: RecordId, input: &LeaveRequestInput) -> HrResult<LeaveRequest> {
        let row = LeaveRequestRow::new(Some(id), input);
        self.table.update(BatchAction::Update, &row).await
    }

    pub async fn approve(
        &self,
        id: RecordId,
        approver: impl Into<ExternalRef>,
    ) -> HrResult<LeaveRequest> {
        self.decide(id, LeaveStatus::Approved, approver.into()).await
    }

    pub async fn reject(
        &self,
        id: RecordId,
        approver: impl Into<ExternalRef>,
    ) -> HrResult<LeaveRequest> {
        self.decide(id, LeaveStatus::Rejected, approver.into()).await
    }

    /// Reads the current request and writes it back with only `status` and
    /// `approvedBy` changed. There is no version check between the read and
    /// the write, so a concurrent update in that window is overwritten.
    async fn decide(
        &self,
        id: RecordId,
        status: LeaveStatus,
        approver: ExternalRef,
    ) -> HrResult<LeaveRequest> {
        let current = self.table.get(id).await?;
        let mut input = LeaveRequestInput::from(current);
        input.status = Some(status.as_str().to_string());
        input.approved_by = Some(approver);

        let action = match status {
            LeaveStatus::Rejected => BatchAction::Reject,
            _ => BatchAction::Approve,
        };
        let row = LeaveRequestRow::new(Some(id), &input);
        self.table.update(action, &row).await
    }

    pub async fn delete(&self, id: RecordId) -> HrResult<bool> {
        self.table.delete(id).await
    }
}
