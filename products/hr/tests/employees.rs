mod common;

use std::collections::BTreeSet;

use platform_backend::RecordId;
use products_hr::{Amount, BatchAction, Employee, EmployeeInput, HrError, TableSpec};
use serde_json::json;

use common::{in_memory, record};

fn input(first: &str, last: &str, email: &str) -> EmployeeInput {
    EmployeeInput {
        first_name: Some(first.into()),
        last_name: Some(last.into()),
        email: Some(email.into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn get_all_on_empty_table_is_empty() {
    let (_backend, hr) = in_memory();
    let employees = hr.employees.get_all().await.unwrap();
    assert!(employees.is_empty());
}

#[tokio::test]
async fn create_coerces_salary_and_defaults_status() {
    let (backend, hr) = in_memory();
    let mut data = input("A", "B", "a@b.com");
    data.salary = Some(Amount::from("50000"));

    let created = hr.employees.create(&data).await.unwrap();
    assert_eq!(created.salary, Some(50000.0));
    assert_eq!(created.status.as_deref(), Some("Active"));

    let stored = &backend.rows(Employee::TABLE)[0];
    assert_eq!(stored["salary"], json!(50000.0));
    assert_eq!(stored["status"], json!("Active"));

    let fetched = hr.employees.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.first_name.as_deref(), Some("A"));
    assert_eq!(fetched.email.as_deref(), Some("a@b.com"));
}

#[tokio::test]
async fn create_keeps_explicit_status_and_zeroes_bad_salary() {
    let (_backend, hr) = in_memory();
    let mut data = input("Rita", "Moreno", "rita@corp.test");
    data.status = Some("On Leave".into());
    data.salary = Some(Amount::from("n/a"));

    let created = hr.employees.create(&data).await.unwrap();
    assert_eq!(created.status.as_deref(), Some("On Leave"));
    assert_eq!(created.salary, Some(0.0));

    let mut blank = input("Sam", "Lowe", "sam@corp.test");
    blank.status = Some(String::new());
    let created = hr.employees.create(&blank).await.unwrap();
    assert_eq!(created.status.as_deref(), Some("Active"));

    let mut spaces = input("Tom", "Vale", "tom@corp.test");
    spaces.status = Some("  ".into());
    let created = hr.employees.create(&spaces).await.unwrap();
    assert_eq!(created.status.as_deref(), Some("  "));
}

#[tokio::test]
async fn update_replaces_every_field() {
    let (_backend, hr) = in_memory();
    let mut original = input("Nina", "Park", "nina@corp.test");
    original.phone = Some("555-0101".into());
    original.department = Some("Finance".into());
    original.salary = Some(Amount::from(70000.0));
    let created = hr.employees.create(&original).await.unwrap();

    let mut replacement = input("Nina", "Park-Lee", "nina.lee@corp.test");
    replacement.salary = Some(Amount::from("72000"));
    replacement.status = Some("Active".into());
    let updated = hr.employees.update(created.id, &replacement).await.unwrap();

    let fetched = hr.employees.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, updated);
    assert_eq!(fetched.last_name.as_deref(), Some("Park-Lee"));
    assert_eq!(fetched.salary, Some(72000.0));
    assert_eq!(fetched.phone, None);
    assert_eq!(fetched.department, None);
}

#[tokio::test]
async fn update_of_missing_employee_fails_the_batch() {
    let (_backend, hr) = in_memory();
    let err = hr
        .employees
        .update(RecordId::new(404), &input("X", "Y", "x@y.z"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HrError::BatchFailed {
            action: BatchAction::Update,
            failed: 1,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Failed to update employee record");
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let (_backend, hr) = in_memory();
    let created = hr
        .employees
        .create(&input("Omar", "Haddad", "omar@corp.test"))
        .await
        .unwrap();

    assert!(hr.employees.delete(created.id).await.unwrap());

    let err = hr.employees.get_by_id(created.id).await.unwrap_err();
    assert!(err.is_not_found(), "expected not found, got {err:?}");

    let err = hr.employees.delete(created.id).await.unwrap_err();
    assert!(matches!(
        err,
        HrError::BatchFailed {
            action: BatchAction::Delete,
            ..
        }
    ));
}

#[tokio::test]
async fn get_all_orders_by_id() {
    let (backend, hr) = in_memory();
    backend.seed(
        Employee::TABLE,
        [
            record(json!({ "firstName": "Zed", "salary": "41000" })),
            record(json!({ "firstName": "Amy", "salary": 52000 })),
        ],
    );

    let employees = hr.employees.get_all().await.unwrap();
    let ids: Vec<i64> = employees.iter().map(|e| e.id.get()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(employees[0].salary, Some(41000.0));
    assert_eq!(employees[1].salary, Some(52000.0));
}

#[tokio::test]
async fn search_returns_union_across_fields_without_duplicates() {
    let (backend, hr) = in_memory();
    backend.seed(
        Employee::TABLE,
        [
            record(json!({ "firstName": "Alison", "lastName": "Park", "email": "alison@x.test", "department": "Finance", "role": "Analyst" })),
            record(json!({ "firstName": "Mark", "lastName": "Johnson", "email": "mark@x.test", "department": "Sales", "role": "Rep" })),
            record(json!({ "firstName": "Eve", "lastName": "Stone", "email": "eve@person.test", "department": "Ops", "role": "Lead" })),
            record(json!({ "firstName": "Tom", "lastName": "Hill", "email": "tom@x.test", "department": "Personnel", "role": "Clerk" })),
            record(json!({ "firstName": "Sue", "lastName": "Lee", "email": "sue@x.test", "department": "Legal", "role": "Liaison" })),
            record(json!({ "firstName": "Jo", "lastName": "Bloggs", "email": "jo@x.test", "department": "IT", "role": "Admin", "phone": "son" })),
            record(json!({ "firstName": "Samson", "lastName": "Jameson", "email": "samson@x.test", "department": "Sales", "role": "Rep" })),
        ],
    );

    let found = hr.employees.search("son").await.unwrap();
    let ids: Vec<i64> = found.iter().map(|e| e.id.get()).collect();
    let unique: BTreeSet<i64> = ids.iter().copied().collect();

    assert_eq!(ids.len(), unique.len(), "duplicates in {ids:?}");
    assert_eq!(unique, BTreeSet::from([1, 2, 3, 4, 5, 7]));
}

#[tokio::test]
async fn filter_by_department_falls_back_only_when_empty() {
    let (backend, hr) = in_memory();
    backend.seed(
        Employee::TABLE,
        [
            record(json!({ "firstName": "Ana", "department": "Sales" })),
            record(json!({ "firstName": "Ben", "department": "Support" })),
            record(json!({ "firstName": "Cleo", "department": "Sales" })),
        ],
    );

    let sales = hr.employees.filter_by_department(Some("Sales")).await.unwrap();
    let names: Vec<_> = sales.iter().filter_map(|e| e.first_name.as_deref()).collect();
    assert_eq!(names, vec!["Ana", "Cleo"]);

    assert_eq!(hr.employees.filter_by_department(None).await.unwrap().len(), 3);
    assert_eq!(hr.employees.filter_by_department(Some("")).await.unwrap().len(), 3);
    assert!(
        hr.employees
            .filter_by_department(Some("  "))
            .await
            .unwrap()
            .is_empty()
    );
}
