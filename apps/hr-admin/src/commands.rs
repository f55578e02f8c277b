use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use platform_backend::RecordId;
use products_hr::{
    AttendanceInput, DepartmentInput, EmployeeInput, ExternalRef, HrModule, LeaveRequestInput,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;

#[derive(Subcommand, Debug)]
pub enum EmployeeCommand {
    /// List every employee
    List,
    Get { id: RecordId },
    Create(DataArg),
    /// Replace every field of an employee
    Update {
        id: RecordId,
        #[command(flatten)]
        data: DataArg,
    },
    Delete { id: RecordId },
    /// Match names, email, department and role
    Search { query: String },
    /// Employees of one department; omitted lists everyone
    ByDepartment { department: Option<String> },
}

#[derive(Subcommand, Debug)]
pub enum DepartmentCommand {
    List,
    Get { id: RecordId },
    Create(DataArg),
    Update {
        id: RecordId,
        #[command(flatten)]
        data: DataArg,
    },
    Delete { id: RecordId },
}

#[derive(Subcommand, Debug)]
pub enum AttendanceCommand {
    List,
    Get { id: RecordId },
    Create(DataArg),
    Update {
        id: RecordId,
        #[command(flatten)]
        data: DataArg,
    },
    Delete { id: RecordId },
    ByEmployee {
        #[arg(value_parser = parse_ref)]
        employee_id: ExternalRef,
    },
    /// Entries for a day (YYYY-MM-DD or RFC 3339 timestamp)
    ByDate { date: String },
}

#[derive(Subcommand, Debug)]
pub enum LeaveCommand {
    List,
    Get { id: RecordId },
    /// File a new request; it starts out Pending
    Create(DataArg),
    Update {
        id: RecordId,
        #[command(flatten)]
        data: DataArg,
    },
    Delete { id: RecordId },
    ByEmployee {
        #[arg(value_parser = parse_ref)]
        employee_id: ExternalRef,
    },
    /// Requests in a status; omitted lists everything
    ByStatus { status: Option<String> },
    Approve(Decision),
    Reject(Decision),
}

#[derive(Args, Debug)]
pub struct DataArg {
    /// JSON document, or `@path` to read it from a file
    #[arg(long)]
    data: String,
}

impl DataArg {
    fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = match self.data.strip_prefix('@') {
            Some(path) => {
                let path = PathBuf::from(path);
                std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?
            }
            None => self.data.clone(),
        };
        serde_json::from_str(&raw).context("invalid --data document")
    }
}

#[derive(Args, Debug)]
pub struct Decision {
    id: RecordId,
    /// Id of the approving employee
    #[arg(long, value_parser = parse_ref)]
    by: ExternalRef,
}

fn parse_ref(raw: &str) -> Result<ExternalRef, String> {
    let trimmed = raw.trim();
    Ok(match trimmed.parse::<i64>() {
        Ok(number) => ExternalRef::from(number),
        Err(_) => ExternalRef::Text(trimmed.to_string()),
    })
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

fn deleted(id: RecordId) -> Result<()> {
    print(&json!({ "Id": id, "deleted": true }))
}

pub async fn employees(hr: &HrModule, command: EmployeeCommand) -> Result<()> {
    let gateway = &hr.employees;
    match command {
        EmployeeCommand::List => print(&gateway.get_all().await?),
        EmployeeCommand::Get { id } => print(&gateway.get_by_id(id).await?),
        EmployeeCommand::Create(data) => {
            let input: EmployeeInput = data.parse()?;
            print(&gateway.create(&input).await?)
        }
        EmployeeCommand::Update { id, data } => {
            let input: EmployeeInput = data.parse()?;
            print(&gateway.update(id, &input).await?)
        }
        EmployeeCommand::Delete { id } => {
            gateway.delete(id).await?;
            deleted(id)
        }
        EmployeeCommand::Search { query } => print(&gateway.search(&query).await?),
        EmployeeCommand::ByDepartment { department } => {
            print(&gateway.filter_by_department(department.as_deref()).await?)
        }
    }
}

pub async fn departments(hr: &HrModule, command: DepartmentCommand) -> Result<()> {
    let gateway = &hr.departments;
    match command {
        DepartmentCommand::List => print(&gateway.get_all().await?),
        DepartmentCommand::Get { id } => print(&gateway.get_by_id(id).await?),
        DepartmentCommand::Create(data) => {
            let input: DepartmentInput = data.parse()?;
            print(&gateway.create(&input).await?)
        }
        DepartmentCommand::Update { id, data } => {
            let input: DepartmentInput = data.parse()?;
            print(&gateway.update(id, &input).await?)
        }
        DepartmentCommand::Delete { id } => {
            gateway.delete(id).await?;
            deleted(id)
        }
    }
}

pub async fn attendance(hr: &HrModule, command: AttendanceCommand) -> Result<()> {
    let gateway = &hr.attendance;
    match command {
        AttendanceCommand::List => print(&gateway.get_all().await?),
        AttendanceCommand::Get { id } => print(&gateway.get_by_id(id).await?),
        AttendanceCommand::Create(data) => {
            let input: AttendanceInput = data.parse()?;
            print(&gateway.create(&input).await?)
        }
        AttendanceCommand::Update { id, data } => {
            let input: AttendanceInput = data.parse()?;
            print(&gateway.update(id, &input).await?)
        }
        AttendanceCommand::Delete { id } => {
            gateway.delete(id).await?;
            deleted(id)
        }
        AttendanceCommand::ByEmployee { employee_id } => {
            print(&gateway.get_by_employee_id(&employee_id).await?)
        }
        AttendanceCommand::ByDate { date } => print(&gateway.get_by_date(&date).await?),
    }
}

pub async fn leave(hr: &HrModule, command: LeaveCommand) -> Result<()> {
    let gateway = &hr.leave_requests;
    match command {
        LeaveCommand::List => print(&gateway.get_all().await?),
        LeaveCommand::Get { id } => print(&gateway.get_by_id(id).await?),
        LeaveCommand::Create(data) => {
            let input: LeaveRequestInput = data.parse()?;
            print(&gateway.create(&input).await?)
        }
        LeaveCommand::Update { id, data } => {
            let input: LeaveRequestInput = data.parse()?;
            print(&gateway.update(id, &input).await?)
        }
        LeaveCommand::Delete { id } => {
            gateway.delete(id).await?;
            deleted(id)
        }
        LeaveCommand::ByEmployee { employee_id } => {
            print(&gateway.get_by_employee_id(&employee_id).await?)
        }
        LeaveCommand::ByStatus { status } => {
            print(&gateway.get_by_status(status.as_deref()).await?)
        }
        LeaveCommand::Approve(decision) => {
            print(&gateway.approve(decision.id, decision.by).await?)
        }
        LeaveCommand::Reject(decision) => print(&gateway.reject(decision.id, decision.by).await?),
    }
}
