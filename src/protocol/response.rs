//! Response decoding: the `ok` discriminant, relation headers, and rows.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{EngineError, Result};

/// Field names of a returned relation, with by-name position lookup.
///
/// Built once per response and shared by every row of the relation.
#[derive(Debug, Clone)]
pub struct RelationHeader {
    fields: Vec<String>,
    index: HashMap<String, usize>,
}

impl RelationHeader {
    pub fn new(fields: Vec<String>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(position, field)| (field.clone(), position))
            .collect();
        Self { fields, index }
    }

    /// Field names in relation order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Position of `name` within each row, if the relation has such a field.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// One row of a returned relation. Field order is exactly as the engine
/// returned it.
#[derive(Debug, Clone)]
pub struct RelationRow {
    /// Header shared by all rows of the relation; absent when the engine
    /// returned none.
    pub headers: Option<Arc<RelationHeader>>,
    /// Field values in relation order.
    pub values: Vec<Value>,
}

impl RelationRow {
    /// Value at position `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Value of the field called `name`. `None` when the relation carries no
    /// headers or no field by that name.
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        let headers = self.headers.as_ref()?;
        self.values.get(headers.index_of(name)?)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for RelationRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.values).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// Successful query payload: nullable headers plus rows of values.
#[derive(Debug, Deserialize)]
struct QueryOk {
    #[serde(default)]
    headers: Option<Vec<String>>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

/// Successful export payload.
#[derive(Debug, Deserialize)]
struct DataOk {
    #[serde(default)]
    data: Value,
}

/// Parse a response document and split on the `ok` discriminant. An absent
/// or non-true `ok` means the whole document is the error.
fn check_ok(text: &str) -> Result<Value> {
    let doc: Value = serde_json::from_str(text)?;
    match doc.get("ok").and_then(Value::as_bool) {
        Some(true) => Ok(doc),
        _ => Err(EngineError { details: doc }.into()),
    }
}

/// Decode a query response into rows sharing one header.
pub(crate) fn decode_rows(text: &str) -> Result<Vec<RelationRow>> {
    let doc = check_ok(text)?;
    let payload: QueryOk = serde_json::from_value(doc)?;
    let headers = payload
        .headers
        .map(|fields| Arc::new(RelationHeader::new(fields)));
    Ok(payload
        .rows
        .into_iter()
        .map(|values| RelationRow {
            headers: headers.clone(),
            values,
        })
        .collect())
}

/// Decode an export-style response into its `data` payload.
pub(crate) fn decode_data(text: &str) -> Result<Value> {
    let doc = check_ok(text)?;
    let payload: DataOk = serde_json::from_value(doc)?;
    Ok(payload.data)
}

/// Decode an acknowledgement-only response (import, backup, restore).
pub(crate) fn decode_unit(text: &str) -> Result<()> {
    check_ok(text).map(|_| ())
}
