mod common;

use platform_backend::{BatchResponse, QueryResponse, RecordId, RecordOutcome, RecordResponse};
use products_hr::{
    Amount, BatchAction, DepartmentInput, Employee, EmployeeInput, HrError, LeaveRequest,
    TableSpec,
};
use serde_json::json;

use common::{Call, ScriptedClient, TransportFault, in_memory, record};

#[tokio::test]
async fn unsuccessful_fetch_surfaces_backend_message() {
    let (_client, hr) = ScriptedClient {
        query: QueryResponse::Failure {
            message: "Table employee_c is not configured".into(),
        },
        ..Default::default()
    }
    .into_module();

    let err = hr.employees.get_all().await.unwrap_err();
    assert!(matches!(err, HrError::Backend { .. }));
    assert_eq!(err.to_string(), "Table employee_c is not configured");
}

#[tokio::test]
async fn successful_fetch_without_data_is_empty() {
    let (_client, hr) = ScriptedClient::default().into_module();
    assert!(hr.leave_requests.get_all().await.unwrap().is_empty());
    assert!(hr.employees.search("x").await.unwrap().is_empty());
}

#[tokio::test]
async fn transport_failures_unwrap_embedded_message() {
    let (_client, hr) = ScriptedClient {
        fault: Some(TransportFault::Rejected {
            status: 401,
            message: "Invalid public key".into(),
        }),
        ..Default::default()
    }
    .into_module();

    let err = hr.departments.get_by_id(RecordId::new(1)).await.unwrap_err();
    assert!(matches!(err, HrError::Transport { status: 401, .. }));
    assert_eq!(err.to_string(), "Invalid public key");
}

#[tokio::test]
async fn transport_failures_without_message_stay_raw() {
    let (_client, hr) = ScriptedClient {
        fault: Some(TransportFault::Unreachable("connection refused".into())),
        ..Default::default()
    }
    .into_module();

    let err = hr.attendance.get_all().await.unwrap_err();
    assert!(matches!(err, HrError::Client(_)));
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn any_failed_entry_fails_the_whole_batch() {
    let (_client, hr) = ScriptedClient {
        batch: BatchResponse::Completed {
            results: vec![
                RecordOutcome::Succeeded {
                    data: Some(record(json!({ "Id": 1, "name": "Kept" }))),
                },
                RecordOutcome::Failed {
                    message: Some("name is required".into()),
                    errors: Vec::new(),
                },
            ],
        },
        ..Default::default()
    }
    .into_module();

    let err = hr
        .departments
        .create(&DepartmentInput::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HrError::BatchFailed {
            action: BatchAction::Create,
            failed: 1,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Failed to create department record");
}

#[tokio::test]
async fn unsuccessful_mutation_surfaces_backend_message() {
    let (_client, hr) = ScriptedClient {
        batch: BatchResponse::Failure {
            message: "Rate limit exceeded".into(),
        },
        ..Default::default()
    }
    .into_module();

    let err = hr.employees.delete(RecordId::new(3)).await.unwrap_err();
    assert_eq!(err.to_string(), "Rate limit exceeded");
}

#[tokio::test]
async fn completed_batch_without_record_is_reported() {
    let (_client, hr) = ScriptedClient {
        batch: BatchResponse::Completed {
            results: vec![RecordOutcome::Succeeded { data: None }],
        },
        ..Default::default()
    }
    .into_module();

    let err = hr
        .employees
        .create(&EmployeeInput::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        HrError::MissingData {
            action: BatchAction::Create,
            ..
        }
    ));
}

#[tokio::test]
async fn create_submits_one_record_in_wire_shape() {
    let (client, hr) = ScriptedClient {
        batch: BatchResponse::Completed {
            results: vec![RecordOutcome::Succeeded {
                data: Some(record(json!({ "Id": 10, "firstName": "A" }))),
            }],
        },
        ..Default::default()
    }
    .into_module();

    let created = hr
        .employees
        .create(&EmployeeInput {
            first_name: Some("A".into()),
            last_name: Some("B".into()),
            email: Some("a@b.com".into()),
            salary: Some(Amount::from("50000")),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id, RecordId::new(10));

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    let Call::Create { table, records } = &calls[0] else {
        panic!("expected create call, got {calls:?}");
    };
    assert_eq!(table, Employee::TABLE);
    assert_eq!(
        records,
        &vec![record(json!({
            "firstName": "A",
            "lastName": "B",
            "email": "a@b.com",
            "phone": null,
            "photoUrl": null,
            "department": null,
            "role": null,
            "hireDate": null,
            "salary": 50000.0,
            "status": "Active",
            "address": null,
            "emergencyContact": null
        }))]
    );
}

#[tokio::test]
async fn approve_reads_then_writes_the_full_record() {
    let current = json!({
        "Id": 6,
        "employeeId": 3,
        "startDate": "2024-08-01",
        "endDate": "2024-08-09",
        "type": "Vacation",
        "reason": "Summer",
        "status": "Pending",
        "approvedBy": "",
        "requestDate": "2024-07-01T10:00:00.000Z"
    });
    let mut approved = current.clone();
    approved["status"] = json!("Approved");
    approved["approvedBy"] = json!(11);

    let (client, hr) = ScriptedClient {
        record: RecordResponse::Success {
            data: Some(record(current)),
        },
        batch: BatchResponse::Completed {
            results: vec![RecordOutcome::Succeeded {
                data: Some(record(approved.clone())),
            }],
        },
        ..Default::default()
    }
    .into_module();

    hr.leave_requests
        .approve(RecordId::new(6), 11_i64)
        .await
        .unwrap();

    assert_eq!(
        client.calls(),
        vec![
            Call::Get {
                table: LeaveRequest::TABLE.into(),
                id: RecordId::new(6),
            },
            Call::Update {
                table: LeaveRequest::TABLE.into(),
                records: vec![record(approved)],
            },
        ]
    );
}

#[tokio::test]
async fn failed_approval_reports_the_action() {
    let (_client, hr) = ScriptedClient {
        record: RecordResponse::Success {
            data: Some(record(json!({ "Id": 2, "status": "Pending" }))),
        },
        batch: BatchResponse::Completed {
            results: vec![RecordOutcome::Failed {
                message: None,
                errors: Vec::new(),
            }],
        },
        ..Default::default()
    }
    .into_module();

    let err = hr
        .leave_requests
        .reject(RecordId::new(2), 1_i64)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to reject leave request");
}

#[tokio::test]
async fn backend_outage_fails_every_operation() {
    let (backend, hr) = in_memory();
    backend.set_outage(Some("Service unavailable"));

    let err = hr.employees.get_all().await.unwrap_err();
    assert_eq!(err.to_string(), "Service unavailable");
    let err = hr
        .attendance
        .create(&Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::Backend { .. }));

    backend.set_outage(None);
    assert!(hr.employees.get_all().await.unwrap().is_empty());
}
