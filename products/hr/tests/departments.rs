mod common;

use platform_backend::RecordId;
use products_hr::{Department, DepartmentInput, ExternalRef, TableSpec};
use serde_json::json;

use common::{in_memory, record};

#[tokio::test]
async fn create_defaults_employee_count_to_zero() {
    let (_backend, hr) = in_memory();
    let created = hr
        .departments
        .create(&DepartmentInput {
            name: Some("Engineering".into()),
            manager_id: Some(ExternalRef::from(3_i64)),
            description: Some("Builds things".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created.employee_count, Some(0));
    let fetched = hr.departments.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.manager_id, Some(ExternalRef::from(3_i64)));
}

#[tokio::test]
async fn update_passes_fields_through() {
    let (_backend, hr) = in_memory();
    let created = hr
        .departments
        .create(&DepartmentInput {
            name: Some("Ops".into()),
            employee_count: Some(4),
            description: Some("Keeps the lights on".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.employee_count, Some(4));

    let replacement = DepartmentInput {
        name: Some("Operations".into()),
        manager_id: Some(ExternalRef::from("EMP-7")),
        ..Default::default()
    };
    hr.departments.update(created.id, &replacement).await.unwrap();

    let fetched = hr.departments.get_by_id(created.id).await.unwrap();
    assert_eq!(
        fetched,
        Department {
            id: created.id,
            name: Some("Operations".into()),
            manager_id: Some(ExternalRef::from("EMP-7")),
            employee_count: None,
            description: None,
        }
    );
}

#[tokio::test]
async fn get_all_lists_in_id_order_and_tolerates_text_counts() {
    let (backend, hr) = in_memory();
    assert!(hr.departments.get_all().await.unwrap().is_empty());

    backend.seed(
        Department::TABLE,
        [
            record(json!({ "name": "HR", "employeeCount": "12" })),
            record(json!({ "name": "Legal", "employeeCount": 3 })),
        ],
    );
    let all = hr.departments.get_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].employee_count, Some(12));
    assert_eq!(all[1].name.as_deref(), Some("Legal"));
}

#[tokio::test]
async fn delete_removes_the_department() {
    let (backend, hr) = in_memory();
    let ids = backend.seed(Department::TABLE, [record(json!({ "name": "Temp" }))]);

    assert!(hr.departments.delete(ids[0]).await.unwrap());
    assert!(backend.rows(Department::TABLE).is_empty());
    assert!(
        hr.departments
            .get_by_id(RecordId::new(1))
            .await
            .unwrap_err()
            .is_not_found()
    );
}
