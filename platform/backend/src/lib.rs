//! Client seam for the hosted record backend.
//!
//! Every HR table lives in the hosted backend and is reached through
//! [`RecordsClient`]. Two implementations ship here: [`HttpRecordsClient`]
//! for the real service and [`InMemoryRecords`] for dev stub mode and tests.

mod client;
mod config;
mod error;
mod http;
mod id;
mod memory;
mod query;
mod response;

pub use client::{RecordsClient, SharedClient};
pub use config::BackendSettings;
pub use error::BackendError;
pub use http::HttpRecordsClient;
pub use id::{ParseRecordIdError, RecordId};
pub use memory::InMemoryRecords;
pub use query::{
    Condition, ConditionGroup, FieldName, FieldSelector, Filter, Logic, Operator, OrderBy,
    PagingInfo, QueryParams, SortType, WhereGroup,
};
pub use response::{BatchResponse, BatchSplit, QueryResponse, Record, RecordOutcome, RecordResponse};

/// Name of the identifier column on every table.
pub const ID_FIELD: &str = "Id";
