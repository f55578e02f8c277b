use serde::{Deserialize, Serialize};

/// Query parameters understood by `fetchRecords` and `getRecordById`.
///
/// Field casing mirrors the backend wire format, which mixes PascalCase
/// (`where`) and camelCase (`whereGroups`, `orderBy`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSelector>,
    #[serde(default, rename = "where", skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub where_groups: Vec<WhereGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging_info: Option<PagingInfo>,
}

impl QueryParams {
    /// Projects the given columns, in order.
    pub fn select(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|name| FieldSelector::new(*name)).collect(),
            ..Self::default()
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn group(mut self, group: WhereGroup) -> Self {
        self.where_groups.push(group);
        self
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn page(mut self, limit: u32, offset: u32) -> Self {
        self.paging_info = Some(PagingInfo { limit, offset });
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldSelector::name)
    }
}

/// `{ "field": { "Name": "..." } }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelector {
    pub field: FieldName,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldName {
    pub name: String,
}

impl FieldSelector {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            field: FieldName { name: name.into() },
        }
    }

    pub fn name(&self) -> &str {
        &self.field.name
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    EqualTo,
    NotEqualTo,
    Contains,
    DoesNotContain,
    StartsWith,
    GreaterThan,
    LessThan,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
}

impl Operator {
    /// Negated operators must hold for every value instead of any value.
    pub fn is_negated(self) -> bool {
        matches!(self, Operator::NotEqualTo | Operator::DoesNotContain)
    }
}

/// Entry of the top-level `where` list. Entries are AND-combined.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filter {
    pub field_name: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field_name: field.into(),
            operator,
            values: vec![value.into()],
        }
    }

    pub fn equal_to(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Operator::EqualTo, value)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logic {
    And,
    Or,
}

/// Entry of `whereGroups`: a boolean tree over conditions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereGroup {
    pub operator: Logic,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_groups: Vec<ConditionGroup>,
}

impl WhereGroup {
    /// OR group with one single-condition sub-group per field, matching
    /// records where any field satisfies `operator` against `value`.
    pub fn any_field(fields: &[&str], operator: Operator, value: &str) -> Self {
        Self {
            operator: Logic::Or,
            conditions: Vec::new(),
            sub_groups: fields
                .iter()
                .map(|field| ConditionGroup {
                    conditions: vec![Condition::new(*field, operator, value)],
                    operator: Logic::Or,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionGroup {
    pub conditions: Vec<Condition>,
    pub operator: Logic,
}

/// Condition inside a where group; camelCase on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub field_name: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field_name: field.into(),
            operator,
            values: vec![value.into()],
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortType {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "sorttype")]
    pub sort_type: SortType,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field_name: field.into(),
            sort_type: SortType::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field_name: field.into(),
            sort_type: SortType::Desc,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: u32,
    pub offset: u32,
}
