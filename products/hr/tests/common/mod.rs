#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use platform_backend::{
    BackendError, BatchResponse, InMemoryRecords, QueryParams, QueryResponse, Record, RecordId,
    RecordResponse, RecordsClient,
};
use products_hr::HrModule;
use serde_json::Value;

/// Gateways backed by a fresh in-memory store.
pub fn in_memory() -> (InMemoryRecords, HrModule) {
    let backend = InMemoryRecords::new();
    let hr = HrModule::new(Arc::new(backend.clone()));
    (backend, hr)
}

pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// How a [`ScriptedClient`] fails before reaching the backend.
#[derive(Clone, Debug)]
pub enum TransportFault {
    /// Error response carrying a message body.
    Rejected { status: u16, message: String },
    /// Failure with nothing to unwrap.
    Unreachable(String),
}

impl TransportFault {
    fn to_error(&self) -> BackendError {
        match self {
            TransportFault::Rejected { status, message } => BackendError::Rejected {
                status: *status,
                message: message.clone(),
            },
            TransportFault::Unreachable(reason) => BackendError::Unavailable(reason.clone()),
        }
    }
}

/// Client double answering every call with canned responses and keeping
/// a log of what it was asked.
pub struct ScriptedClient {
    pub query: QueryResponse,
    pub record: RecordResponse,
    pub batch: BatchResponse,
    pub fault: Option<TransportFault>,
    pub calls: Mutex<Vec<Call>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Fetch { table: String, params: QueryParams },
    Get { table: String, id: RecordId },
    Create { table: String, records: Vec<Record> },
    Update { table: String, records: Vec<Record> },
    Delete { table: String, ids: Vec<RecordId> },
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self {
            query: QueryResponse::Success { data: Vec::new() },
            record: RecordResponse::Success { data: None },
            batch: BatchResponse::Completed {
                results: Vec::new(),
            },
            fault: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedClient {
    pub fn into_module(self) -> (Arc<ScriptedClient>, HrModule) {
        let client = Arc::new(self);
        let hr = HrModule::new(client.clone());
        (client, hr)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer<T: Clone>(&self, call: Call, response: &T) -> Result<T, BackendError> {
        self.calls.lock().unwrap().push(call);
        match &self.fault {
            Some(fault) => Err(fault.to_error()),
            None => Ok(response.clone()),
        }
    }
}

#[async_trait]
impl RecordsClient for ScriptedClient {
    async fn fetch_records(
        &self,
        table: &str,
        params: &QueryParams,
    ) -> Result<QueryResponse, BackendError> {
        let call = Call::Fetch {
            table: table.to_string(),
            params: params.clone(),
        };
        self.answer(call, &self.query)
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        _params: &QueryParams,
    ) -> Result<RecordResponse, BackendError> {
        let call = Call::Get {
            table: table.to_string(),
            id,
        };
        self.answer(call, &self.record)
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, BackendError> {
        let call = Call::Create {
            table: table.to_string(),
            records,
        };
        self.answer(call, &self.batch)
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, BackendError> {
        let call = Call::Update {
            table: table.to_string(),
            records,
        };
        self.answer(call, &self.batch)
    }

    async fn delete_records(
        &self,
        table: &str,
        ids: Vec<RecordId>,
    ) -> Result<BatchResponse, BackendError> {
        let call = Call::Delete {
            table: table.to_string(),
            ids,
        };
        self.answer(call, &self.batch)
    }
}
