use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    BackendError, BatchResponse, Condition, ConditionGroup, Filter, ID_FIELD, Logic, Operator,
    OrderBy, QueryParams, QueryResponse, Record, RecordId, RecordOutcome, RecordResponse,
    RecordsClient, SortType, WhereGroup,
};

/// In-process stand-in for the hosted backend.
///
/// Cloning shares the underlying tables. `Contains` matching is
/// case-insensitive, like the hosted service.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRecords {
    inner: Arc<Mutex<Store>>,
}

#[derive(Debug, Default)]
struct Store {
    tables: HashMap<String, Table>,
    outage: Option<String>,
}

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Record>,
}

impl Table {
    fn insert(&mut self, mut record: Record) -> Record {
        self.last_id += 1;
        record.insert(ID_FIELD.to_string(), Value::from(self.last_id));
        self.rows.insert(self.last_id, record.clone());
        record
    }
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts rows directly, bypassing batch semantics. Returns assigned ids.
    pub fn seed(&self, table: &str, records: impl IntoIterator<Item = Record>) -> Vec<RecordId> {
        let mut store = self.store();
        let table = store.tables.entry(table.to_string()).or_default();
        records
            .into_iter()
            .map(|mut record| {
                record.remove(ID_FIELD);
                table.insert(record);
                RecordId::new(table.last_id)
            })
            .collect()
    }

    /// Full rows of `table` in id order.
    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.store()
            .tables
            .get(table)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// While set, every call answers `success: false` with `message`.
    pub fn set_outage(&self, message: Option<&str>) {
        self.store().outage = message.map(str::to_owned);
    }
}

#[async_trait]
impl RecordsClient for InMemoryRecords {
    async fn fetch_records(
        &self,
        table: &str,
        params: &QueryParams,
    ) -> Result<QueryResponse, BackendError> {
        let store = self.store();
        if let Some(message) = store.outage.clone() {
            return Ok(QueryResponse::Failure { message });
        }

        let mut rows: Vec<&Record> = store
            .tables
            .get(table)
            .map(|t| t.rows.values().filter(|row| matches_query(row, params)).collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| compare_rows(a, b, &params.order_by));

        let (offset, limit) = params
            .paging_info
            .map(|p| (p.offset as usize, p.limit as usize))
            .unwrap_or((0, usize::MAX));
        let data = rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| project(row, params))
            .collect();
        Ok(QueryResponse::Success { data })
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &QueryParams,
    ) -> Result<RecordResponse, BackendError> {
        let store = self.store();
        if let Some(message) = store.outage.clone() {
            return Ok(RecordResponse::Failure { message });
        }
        let data = store
            .tables
            .get(table)
            .and_then(|t| t.rows.get(&id.get()))
            .map(|row| project(row, params));
        Ok(RecordResponse::Success { data })
    }

    async fn create_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, BackendError> {
        let mut store = self.store();
        if let Some(message) = store.outage.clone() {
            return Ok(BatchResponse::Failure { message });
        }
        let table = store.tables.entry(table.to_string()).or_default();
        let results = records
            .into_iter()
            .map(|mut record| {
                record.remove(ID_FIELD);
                RecordOutcome::Succeeded {
                    data: Some(table.insert(record)),
                }
            })
            .collect();
        Ok(BatchResponse::Completed { results })
    }

    async fn update_records(
        &self,
        table: &str,
        records: Vec<Record>,
    ) -> Result<BatchResponse, BackendError> {
        let mut store = self.store();
        if let Some(message) = store.outage.clone() {
            return Ok(BatchResponse::Failure { message });
        }
        let table = store.tables.entry(table.to_string()).or_default();
        let results = records
            .into_iter()
            .map(|record| {
                let Some(id) = record.get(ID_FIELD).and_then(RecordId::from_value) else {
                    return failed("Id is required for update");
                };
                let Some(row) = table.rows.get_mut(&id.get()) else {
                    return failed(&format!("Record with Id {id} does not exist"));
                };
                for (field, value) in record {
                    if field != ID_FIELD {
                        row.insert(field, value);
                    }
                }
                RecordOutcome::Succeeded {
                    data: Some(row.clone()),
                }
            })
            .collect();
        Ok(BatchResponse::Completed { results })
    }

    async fn delete_records(
        &self,
        table: &str,
        ids: Vec<RecordId>,
    ) -> Result<BatchResponse, BackendError> {
        let mut store = self.store();
        if let Some(message) = store.outage.clone() {
            return Ok(BatchResponse::Failure { message });
        }
        let table = store.tables.entry(table.to_string()).or_default();
        let results = ids
            .into_iter()
            .map(|id| match table.rows.remove(&id.get()) {
                Some(_) => RecordOutcome::Succeeded { data: None },
                None => failed(&format!("Record with Id {id} does not exist")),
            })
            .collect();
        Ok(BatchResponse::Completed { results })
    }
}

fn failed(message: &str) -> RecordOutcome {
    RecordOutcome::Failed {
        message: Some(message.to_string()),
        errors: Vec::new(),
    }
}

fn project(row: &Record, params: &QueryParams) -> Record {
    if params.fields.is_empty() {
        return row.clone();
    }
    params
        .field_names()
        .filter_map(|name| row.get(name).map(|value| (name.to_string(), value.clone())))
        .collect()
}

fn matches_query(row: &Record, params: &QueryParams) -> bool {
    params.filters.iter().all(|filter| matches_filter(row, filter))
        && params.where_groups.iter().all(|group| matches_group(row, group))
}

fn matches_filter(row: &Record, filter: &Filter) -> bool {
    test_values(row.get(&filter.field_name), filter.operator, &filter.values)
}

fn matches_condition(row: &Record, condition: &Condition) -> bool {
    test_values(row.get(&condition.field_name), condition.operator, &condition.values)
}

fn matches_group(row: &Record, group: &WhereGroup) -> bool {
    let conditions = group.conditions.iter().map(|c| matches_condition(row, c));
    let sub_groups = group.sub_groups.iter().map(|g| matches_sub_group(row, g));
    let mut outcomes = conditions.chain(sub_groups).peekable();
    if outcomes.peek().is_none() {
        return true;
    }
    combine(group.operator, outcomes)
}

fn matches_sub_group(row: &Record, group: &ConditionGroup) -> bool {
    if group.conditions.is_empty() {
        return true;
    }
    combine(
        group.operator,
        group.conditions.iter().map(|c| matches_condition(row, c)),
    )
}

fn combine(logic: Logic, mut outcomes: impl Iterator<Item = bool>) -> bool {
    match logic {
        Logic::And => outcomes.all(|hit| hit),
        Logic::Or => outcomes.any(|hit| hit),
    }
}

fn test_values(actual: Option<&Value>, operator: Operator, expected: &[String]) -> bool {
    let actual = actual.unwrap_or(&Value::Null);
    if operator.is_negated() {
        expected.iter().all(|value| test_value(actual, operator, value))
    } else {
        expected.iter().any(|value| test_value(actual, operator, value))
    }
}

fn test_value(actual: &Value, operator: Operator, expected: &str) -> bool {
    let text = value_text(actual);
    match operator {
        Operator::EqualTo => loosely_equal(actual, &text, expected),
        Operator::NotEqualTo => !loosely_equal(actual, &text, expected),
        Operator::Contains => text.to_lowercase().contains(&expected.to_lowercase()),
        Operator::DoesNotContain => !text.to_lowercase().contains(&expected.to_lowercase()),
        Operator::StartsWith => text.to_lowercase().starts_with(&expected.to_lowercase()),
        Operator::GreaterThan => compare_text(actual, &text, expected) == Some(Ordering::Greater),
        Operator::LessThan => compare_text(actual, &text, expected) == Some(Ordering::Less),
        Operator::GreaterThanOrEqualTo => matches!(
            compare_text(actual, &text, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::LessThanOrEqualTo => matches!(
            compare_text(actual, &text, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn loosely_equal(actual: &Value, text: &str, expected: &str) -> bool {
    match (actual.as_f64(), expected.trim().parse::<f64>()) {
        (Some(a), Ok(b)) => a == b,
        _ => text == expected,
    }
}

fn compare_text(actual: &Value, text: &str, expected: &str) -> Option<Ordering> {
    if actual.is_null() {
        return None;
    }
    match (actual.as_f64(), expected.trim().parse::<f64>()) {
        (Some(a), Ok(b)) => a.partial_cmp(&b),
        _ => Some(text.cmp(expected)),
    }
}

fn compare_rows(a: &Record, b: &Record, order_by: &[OrderBy]) -> Ordering {
    order_by
        .iter()
        .map(|order| {
            let ordering = compare_values(a.get(&order.field_name), b.get(&order.field_name));
            match order.sort_type {
                SortType::Asc => ordering,
                SortType::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => value_text(a).cmp(&value_text(b)),
        },
    }
}
