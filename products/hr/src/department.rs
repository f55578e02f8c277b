use platform_backend::{OrderBy, RecordId, SharedClient};
use serde::{Deserialize, Serialize};

use crate::{
    error::{BatchAction, HrResult},
    gateway::{TableGateway, TableSpec},
    values::{ExternalRef, lenient_i64},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub manager_id: Option<ExternalRef>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub employee_count: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TableSpec for Department {
    const TABLE: &'static str = "Department_c";
    const ENTITY: &'static str = "department";
    const FIELDS: &'static [&'static str] =
        &["Id", "name", "managerId", "employeeCount", "description"];
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentInput {
    pub name: Option<String>,
    pub manager_id: Option<ExternalRef>,
    pub employee_count: Option<i64>,
    pub description: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DepartmentRow<'a> {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    name: Option<&'a str>,
    manager_id: Option<&'a ExternalRef>,
    employee_count: Option<i64>,
    description: Option<&'a str>,
}

impl<'a> DepartmentRow<'a> {
    fn new(id: Option<RecordId>, input: &'a DepartmentInput) -> Self {
        Self {
            id,
            name: input.name.as_deref(),
            manager_id: input.manager_id.as_ref(),
            employee_count: input.employee_count,
            description: input.description.as_deref(),
        }
    }
}

/// Record gateway for the `Department_c` table.
#[derive(Clone)]
pub struct DepartmentGateway {
    table: TableGateway<Department>,
}

impl DepartmentGateway {
    pub fn new(client: SharedClient) -> Self {
        Self {
            table: TableGateway::new(client),
        }
    }

    pub async fn get_all(&self) -> HrResult<Vec<Department>> {
        let params = self.table.select().order(OrderBy::asc("Id"));
        self.table.fetch(params, "fetching departments").await
    }

    pub async fn get_by_id(&self, id: RecordId) -> HrResult<Department> {
        self.table.get(id).await
    }

    /// Creates a department; a missing employee count starts at 0.
    pub async fn create(&self, input: &DepartmentInput) -> HrResult<Department> {
        let mut row = DepartmentRow::new(None, input);
        row.employee_count = Some(row.employee_count.unwrap_or(0));
        self.table.create(&row).await
    }

    pub async fn update(&self, id: RecordId, input: &DepartmentInput) -> HrResult<Department> {
        let row = DepartmentRow::new(Some(id), input);
        self.table.update(BatchAction::Update, &row).await
    }

    pub async fn delete(&self, id: RecordId) -> HrResult<bool> {
        self.table.delete(id).await
    }
}
