use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    BackendError, BatchResponse, QueryParams, QueryResponse, Record, RecordId, RecordResponse,
};

/// Handle shared by every gateway.
pub type SharedClient = Arc<dyn RecordsClient>;

/// The five operations of the hosted record backend.
///
/// Implementations return `Ok` whenever the backend answered, including
/// answers with `success: false`; `Err` is reserved for calls that never
/// produced a decodable answer.
#[async_trait]
pub trait RecordsClient: Send + Sync {
    async fn fetch_records(
        &self,
        table: &str,
        params: &QueryParams,
    ) -> Result<QueryResponse, BackendError>;

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &QueryParams,
    ) -> Result<RecordResponse, BackendError>;

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, BackendError>;

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, BackendError>;

    async fn delete_records(
        &self,
        table: &str,
        ids: Vec<RecordId>,
    ) -> Result<BatchResponse, BackendError>;
}
