use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A backend row: field name to scalar value.
pub type Record = Map<String, Value>;

const DEFAULT_FAILURE: &str = "backend request failed";

/// Result of `fetchRecords`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "QueryEnvelope")]
pub enum QueryResponse {
    Success { data: Vec<Record> },
    Failure { message: String },
}

/// Result of `getRecordById`. `data` is absent when no such record exists.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RecordEnvelope")]
pub enum RecordResponse {
    Success { data: Option<Record> },
    Failure { message: String },
}

/// Result of a batch mutation (`createRecord`, `updateRecord`, `deleteRecord`).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "BatchEnvelope")]
pub enum BatchResponse {
    /// The request itself went through; each entry reports its own outcome.
    Completed { results: Vec<RecordOutcome> },
    Failure { message: String },
}

/// Per-record outcome inside a batch mutation.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(from = "OutcomeEnvelope", into = "OutcomeEnvelope")]
pub enum RecordOutcome {
    Succeeded {
        data: Option<Record>,
    },
    Failed {
        message: Option<String>,
        errors: Vec<Value>,
    },
}

impl RecordOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RecordOutcome::Succeeded { .. })
    }
}

/// Batch outcomes split into succeeded payloads and failed entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchSplit {
    pub succeeded: Vec<Option<Record>>,
    pub failed: Vec<RecordOutcome>,
}

impl BatchSplit {
    pub fn from_outcomes(outcomes: Vec<RecordOutcome>) -> Self {
        let mut split = Self::default();
        for outcome in outcomes {
            match outcome {
                RecordOutcome::Succeeded { data } => split.succeeded.push(data),
                failed @ RecordOutcome::Failed { .. } => split.failed.push(failed),
            }
        }
        split
    }

    /// Payload of the first successful entry, if it carried one.
    pub fn first_record(self) -> Option<Record> {
        self.succeeded.into_iter().flatten().next()
    }
}

#[derive(Deserialize)]
struct QueryEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Vec<Record>>,
}

impl From<QueryEnvelope> for QueryResponse {
    fn from(env: QueryEnvelope) -> Self {
        if env.success {
            QueryResponse::Success {
                data: env.data.unwrap_or_default(),
            }
        } else {
            QueryResponse::Failure {
                message: failure_message(env.message),
            }
        }
    }
}

#[derive(Deserialize)]
struct RecordEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Record>,
}

impl From<RecordEnvelope> for RecordResponse {
    fn from(env: RecordEnvelope) -> Self {
        if env.success {
            RecordResponse::Success { data: env.data }
        } else {
            RecordResponse::Failure {
                message: failure_message(env.message),
            }
        }
    }
}

#[derive(Deserialize)]
struct BatchEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    results: Option<Vec<RecordOutcome>>,
}

impl From<BatchEnvelope> for BatchResponse {
    fn from(env: BatchEnvelope) -> Self {
        if env.success {
            BatchResponse::Completed {
                results: env.results.unwrap_or_default(),
            }
        } else {
            BatchResponse::Failure {
                message: failure_message(env.message),
            }
        }
    }
}

#[derive(Deserialize, Serialize)]
struct OutcomeEnvelope {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<Value>,
}

impl From<OutcomeEnvelope> for RecordOutcome {
    fn from(env: OutcomeEnvelope) -> Self {
        if env.success {
            RecordOutcome::Succeeded { data: env.data }
        } else {
            RecordOutcome::Failed {
                message: env.message,
                errors: env.errors,
            }
        }
    }
}

impl From<RecordOutcome> for OutcomeEnvelope {
    fn from(outcome: RecordOutcome) -> Self {
        match outcome {
            RecordOutcome::Succeeded { data } => OutcomeEnvelope {
                success: true,
                message: None,
                data,
                errors: Vec::new(),
            },
            RecordOutcome::Failed { message, errors } => OutcomeEnvelope {
                success: false,
                message,
                data: None,
                errors,
            },
        }
    }
}

fn failure_message(message: Option<String>) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FAILURE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn successful_fetch_without_data_is_empty() {
        let response: QueryResponse = serde_json::from_value(json!({ "success": true })).unwrap();
        assert_eq!(response, QueryResponse::Success { data: Vec::new() });

        let response: QueryResponse =
            serde_json::from_value(json!({ "success": true, "data": null })).unwrap();
        assert_eq!(response, QueryResponse::Success { data: Vec::new() });
    }

    #[test]
    fn failure_keeps_backend_message() {
        let response: RecordResponse =
            serde_json::from_value(json!({ "success": false, "message": "Table not found" }))
                .unwrap();
        assert_eq!(
            response,
            RecordResponse::Failure {
                message: "Table not found".into()
            }
        );

        let response: BatchResponse = serde_json::from_value(json!({ "success": false })).unwrap();
        assert_eq!(
            response,
            BatchResponse::Failure {
                message: DEFAULT_FAILURE.into()
            }
        );
    }

    #[test]
    fn batch_split_separates_failed_entries() {
        let response: BatchResponse = serde_json::from_value(json!({
            "success": true,
            "results": [
                { "success": true, "data": { "Id": 1 } },
                { "success": false, "message": "email is required", "errors": [{ "fieldLabel": "email" }] }
            ]
        }))
        .unwrap();

        let BatchResponse::Completed { results } = response else {
            panic!("expected completed batch");
        };
        let split = BatchSplit::from_outcomes(results);
        assert_eq!(split.failed.len(), 1);
        assert_eq!(
            serde_json::to_value(&split.failed[0]).unwrap(),
            json!({ "success": false, "message": "email is required", "errors": [{ "fieldLabel": "email" }] })
        );
        assert_eq!(split.first_record().unwrap()["Id"], json!(1));
    }
}
