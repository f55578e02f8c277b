use platform_backend::{Filter, Operator, OrderBy, RecordId, SharedClient, WhereGroup};
use serde::{Deserialize, Serialize};

use crate::{
    error::{BatchAction, HrResult},
    gateway::{TableGateway, TableSpec},
    values::{Amount, lenient_f64, non_empty},
};

const DEFAULT_STATUS: &str = "Active";

/// Columns matched by [`EmployeeGateway::search`].
const SEARCH_FIELDS: &[&str] = &["firstName", "lastName", "email", "department", "role"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub hire_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub salary: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
}

impl TableSpec for Employee {
    const TABLE: &'static str = "employee_c";
    const ENTITY: &'static str = "employee";
    const FIELDS: &'static [&'static str] = &[
        "Id",
        "firstName",
        "lastName",
        "email",
        "phone",
        "photoUrl",
        "department",
        "role",
        "hireDate",
        "salary",
        "status",
        "address",
        "emergencyContact",
    ];
}

/// Employee fields as submitted by a caller, for create and update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,
    pub hire_date: Option<String>,
    pub salary: Option<Amount>,
    pub status: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeRow<'a> {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    first_name: Option<&'a str>,
    last_name: Option<&'a str>,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    photo_url: Option<&'a str>,
    department: Option<&'a str>,
    role: Option<&'a str>,
    hire_date: Option<&'a str>,
    salary: f64,
    status: Option<&'a str>,
    address: Option<&'a str>,
    emergency_contact: Option<&'a str>,
}

impl<'a> EmployeeRow<'a> {
    fn new(id: Option<RecordId>, input: &'a EmployeeInput) -> Self {
        Self {
            id,
            first_name: input.first_name.as_deref(),
            last_name: input.last_name.as_deref(),
            email: input.email.as_deref(),
            phone: input.phone.as_deref(),
            photo_url: input.photo_url.as_deref(),
            department: input.department.as_deref(),
            role: input.role.as_deref(),
            hire_date: input.hire_date.as_deref(),
            salary: input.salary.as_ref().map_or(0.0, Amount::to_number),
            status: input.status.as_deref(),
            address: input.address.as_deref(),
            emergency_contact: input.emergency_contact.as_deref(),
        }
    }
}

/// Record gateway for the `employee_c` table.
#[derive(Clone)]
pub struct EmployeeGateway {
    table: TableGateway<Employee>,
}

impl EmployeeGateway {
    pub fn new(client: SharedClient) -> Self {
        Self {
            table: TableGateway::new(client),
        }
    }

    /// All employees, by id ascending.
    pub async fn get_all(&self) -> HrResult<Vec<Employee>> {
        let params = self.table.select().order(OrderBy::asc("Id"));
        self.table.fetch(params, "fetching employees").await
    }

    pub async fn get_by_id(&self, id: RecordId) -> HrResult<Employee> {
        self.table.get(id).await
    }

    /// Employees whose first name, last name, email, department or role
    /// contains `query`.
    pub async fn search(&self, query: &str) -> HrResult<Vec<Employee>> {
        let params = self
            .table
            .select()
            .group(WhereGroup::any_field(SEARCH_FIELDS, Operator::Contains, query));
        self.table
            .fetch(params, &format!("searching employees for {query:?}"))
            .await
    }

    /// Employees of one department; a missing or empty department lists everyone.
    pub async fn filter_by_department(&self, department: Option<&str>) -> HrResult<Vec<Employee>> {
        let Some(department) = non_empty(department) else {
            return self.get_all().await;
        };
        let params = self
            .table
            .select()
            .filter(Filter::equal_to("department", department));
        self.table
            .fetch(params, &format!("filtering employees by department {department}"))
            .await
    }

    /// Creates an employee. Status defaults to `Active`; salary is coerced
    /// to a number.
    pub async fn create(&self, input: &EmployeeInput) -> HrResult<Employee> {
        let mut row = EmployeeRow::new(None, input);
        row.status = Some(non_empty(row.status).unwrap_or(DEFAULT_STATUS));
        self.table.create(&row).await
    }

    /// Replaces every field of employee `id` with `input`.
    pub async fn update(&self, id: RecordId, input: &EmployeeInput) -> HrResult<Employee> {
        let row = EmployeeRow::new(Some(id), input);
        self.table.update(BatchAction::Update, &row).await
    }

    pub async fn delete(&self, id: RecordId) -> HrResult<bool> {
        self.table.delete(id).await
    }
}
