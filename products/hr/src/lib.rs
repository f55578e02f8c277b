//! HR vertical slice: record gateways over the hosted backend.
//!
//! Each gateway owns one table and exposes CRUD plus its entity-specific
//! queries. Gateways hold no state besides the shared client, so they are
//! cheap to clone and safe to use concurrently.

mod attendance;
mod department;
mod employee;
mod error;
mod gateway;
mod leave_request;
mod values;

use platform_backend::SharedClient;

pub use attendance::{Attendance, AttendanceGateway, AttendanceInput};
pub use department::{Department, DepartmentGateway, DepartmentInput};
pub use employee::{Employee, EmployeeGateway, EmployeeInput};
pub use error::{BatchAction, HrError, HrResult};
pub use gateway::TableSpec;
pub use leave_request::{LeaveRequest, LeaveRequestGateway, LeaveRequestInput, LeaveStatus};
pub use values::{Amount, ExternalRef};

/// One gateway per HR table, all sharing a client.
#[derive(Clone)]
pub struct HrModule {
    pub employees: EmployeeGateway,
    pub departments: DepartmentGateway,
    pub attendance: AttendanceGateway,
    pub leave_requests: LeaveRequestGateway,
}

impl HrModule {
    pub fn new(client: SharedClient) -> Self {
        Self {
            employees: EmployeeGateway::new(client.clone()),
            departments: DepartmentGateway::new(client.clone()),
            attendance: AttendanceGateway::new(client.clone()),
            leave_requests: LeaveRequestGateway::new(client),
        }
    }
}
