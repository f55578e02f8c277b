//! Request/response normalization shared by every HR table.

use std::marker::PhantomData;

use platform_backend::{
    BatchResponse, BatchSplit, QueryParams, QueryResponse, Record, RecordId, RecordResponse,
    SharedClient,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::error;

use crate::error::{BatchAction, HrError, HrResult};

/// Static description of a backend table and its typed row.
pub trait TableSpec: DeserializeOwned {
    const TABLE: &'static str;
    /// Singular noun used in messages ("leave request").
    const ENTITY: &'static str;
    /// Columns projected on every read, in order.
    const FIELDS: &'static [&'static str];
}

pub(crate) struct TableGateway<R> {
    client: SharedClient,
    _row: PhantomData<fn() -> R>,
}

impl<R> Clone for TableGateway<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _row: PhantomData,
        }
    }
}

impl<R: TableSpec> TableGateway<R> {
    pub(crate) fn new(client: SharedClient) -> Self {
        Self {
            client,
            _row: PhantomData,
        }
    }

    /// Query projecting every column of the table.
    pub(crate) fn select(&self) -> QueryParams {
        QueryParams::select(R::FIELDS)
    }

    pub(crate) async fn fetch(&self, params: QueryParams, context: &str) -> HrResult<Vec<R>> {
        let result = self.try_fetch(&params).await;
        self.logged(result, context)
    }

    pub(crate) async fn get(&self, id: RecordId) -> HrResult<R> {
        let result = self.try_get(id).await;
        self.logged(result, &format!("fetching {} with ID {id}", R::ENTITY))
    }

    pub(crate) async fn create<T: Serialize>(&self, row: &T) -> HrResult<R> {
        let result = self.try_create(row).await;
        self.logged(result, &format!("creating {}", R::ENTITY))
    }

    /// Submits `row` (which carries its `Id`) as a single-record update.
    pub(crate) async fn update<T: Serialize>(&self, action: BatchAction, row: &T) -> HrResult<R> {
        let result = self.try_update(action, row).await;
        let context = match action {
            BatchAction::Approve => format!("approving {}", R::ENTITY),
            BatchAction::Reject => format!("rejecting {}", R::ENTITY),
            _ => format!("updating {}", R::ENTITY),
        };
        self.logged(result, &context)
    }

    pub(crate) async fn delete(&self, id: RecordId) -> HrResult<bool> {
        let result = self.try_delete(id).await;
        self.logged(result, &format!("deleting {} with ID {id}", R::ENTITY))
    }

    async fn try_fetch(&self, params: &QueryParams) -> HrResult<Vec<R>> {
        match self.client.fetch_records(R::TABLE, params).await? {
            QueryResponse::Success { data } => data.into_iter().map(decode::<R>).collect(),
            QueryResponse::Failure { message } => Err(HrError::Backend { message }),
        }
    }

    async fn try_get(&self, id: RecordId) -> HrResult<R> {
        let params = self.select();
        match self.client.get_record_by_id(R::TABLE, id, &params).await? {
            RecordResponse::Success { data: Some(record) } => decode(record),
            RecordResponse::Success { data: None } => Err(HrError::NotFound {
                entity: R::ENTITY,
                id: id.to_string(),
            }),
            RecordResponse::Failure { message } => Err(HrError::Backend { message }),
        }
    }

    async fn try_create<T: Serialize>(&self, row: &T) -> HrResult<R> {
        let record = encode(row)?;
        let response = self.client.create_records(R::TABLE, vec![record]).await?;
        let split = self.settle(BatchAction::Create, response)?;
        self.first_record(BatchAction::Create, split)
    }

    async fn try_update<T: Serialize>(&self, action: BatchAction, row: &T) -> HrResult<R> {
        let record = encode(row)?;
        let response = self.client.update_records(R::TABLE, vec![record]).await?;
        let split = self.settle(action, response)?;
        self.first_record(action, split)
    }

    async fn try_delete(&self, id: RecordId) -> HrResult<bool> {
        let response = self.client.delete_records(R::TABLE, vec![id]).await?;
        self.settle(BatchAction::Delete, response)?;
        Ok(true)
    }

    /// Fails the whole call when any entry of the batch failed.
    fn settle(&self, action: BatchAction, response: BatchResponse) -> HrResult<BatchSplit> {
        let results = match response {
            BatchResponse::Completed { results } => results,
            BatchResponse::Failure { message } => return Err(HrError::Backend { message }),
        };
        let split = BatchSplit::from_outcomes(results);
        if !split.failed.is_empty() {
            let failed = split.failed.len();
            let details = serde_json::to_string(&split.failed).unwrap_or_default();
            error!(
                entity = R::ENTITY,
                table = R::TABLE,
                failed,
                records = %details,
                "failed to {action} {failed} {} records",
                R::ENTITY
            );
            return Err(HrError::BatchFailed {
                action,
                entity: R::ENTITY,
                failed,
            });
        }
        Ok(split)
    }

    fn first_record(&self, action: BatchAction, split: BatchSplit) -> HrResult<R> {
        let record = split.first_record().ok_or(HrError::MissingData {
            action,
            entity: R::ENTITY,
        })?;
        decode(record)
    }

    fn logged<T>(&self, result: HrResult<T>, context: &str) -> HrResult<T> {
        if let Err(err) = &result {
            error!(entity = R::ENTITY, table = R::TABLE, error = %err, "error {context}");
        }
        result
    }
}

fn decode<R: TableSpec>(record: Record) -> HrResult<R> {
    serde_json::from_value(Value::Object(record)).map_err(|source| HrError::Decode {
        entity: R::ENTITY,
        source,
    })
}

fn encode<T: Serialize>(row: &T) -> HrResult<Record> {
    match serde_json::to_value(row).map_err(HrError::Encode)? {
        Value::Object(record) => Ok(record),
        other => Err(HrError::InvalidInput(format!(
            "expected a record object, got {other}"
        ))),
    }
}
