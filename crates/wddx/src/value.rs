//! [`Value`] — the tagged union every part of the codec operates on.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::ValueError;

/// Wire type names for the scalar tags the codec knows about.
pub mod tags {
    pub const STRING: &str = "string";
    pub const INTEGER: &str = "integer";
    pub const NUMBER: &str = "number";
    pub const DATE_TIME: &str = "dateTime";
    pub const BOOLEAN: &str = "boolean";
    pub const NULL: &str = "null";
    pub const STRUCT: &str = "struct";
    pub const ARRAY: &str = "array";
    pub const RECORDSET: &str = "recordset";

    /// Element names with a fixed structural meaning in a packet. A scalar
    /// written under one of these would be read back as something else.
    pub const RESERVED: &[&str] = &[
        NULL, BOOLEAN, STRUCT, ARRAY, RECORDSET, "var", "field", "wddxPacket", "header", "data",
    ];
}

/// The element name a scalar tagged `type_tag` is written under: the tag
/// itself, or `string` when the tag is reserved or not an XML name.
pub fn scalar_wire_tag(type_tag: &str) -> &str {
    if tags::RESERVED.contains(&type_tag) || !is_xml_name(type_tag) {
        tags::STRING
    } else {
        type_tag
    }
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Format used for `dateTime` scalars: UTC, second precision, `Z` suffix.
pub(crate) const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A WDDX value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    /// A typed primitive. `type_tag` is the wire element name
    /// (`string`, `integer`, `number`, `dateTime`, ...).
    Scalar { text: String, type_tag: String },
    Array(Vec<Value>),
    Struct(Struct),
    Recordset(Recordset),
}

impl Value {
    /// A typed scalar. Reserved or malformed tags become `string`, see
    /// [`scalar_wire_tag`].
    pub fn scalar(text: impl Into<String>, type_tag: impl Into<String>) -> Self {
        let type_tag = type_tag.into();
        let type_tag = if scalar_wire_tag(&type_tag) == type_tag {
            type_tag
        } else {
            tags::STRING.to_owned()
        };
        Value::Scalar {
            text: text.into(),
            type_tag,
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::scalar(text, tags::STRING)
    }

    pub fn integer(n: i64) -> Self {
        Value::scalar(n.to_string(), tags::INTEGER)
    }

    pub fn number(n: f64) -> Self {
        Value::scalar(n.to_string(), tags::NUMBER)
    }

    pub fn boolean(b: bool) -> Self {
        Value::Boolean(b)
    }

    pub fn date_time(dt: DateTime<Utc>) -> Self {
        Value::scalar(dt.format(DATE_TIME_FORMAT).to_string(), tags::DATE_TIME)
    }

    /// The element name this value is written as.
    pub fn wire_tag(&self) -> &str {
        match self {
            Value::Null => tags::NULL,
            Value::Boolean(_) => tags::BOOLEAN,
            Value::Scalar { type_tag, .. } => scalar_wire_tag(type_tag),
            Value::Array(_) => tags::ARRAY,
            Value::Struct(_) => tags::STRUCT,
            Value::Recordset(_) => tags::RECORDSET,
        }
    }

    /// Text of a scalar, `None` for every other variant.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Scalar { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a.as_slice()),
            _ => None,
        }
    }

    pub fn as_recordset(&self) -> Option<&Recordset> {
        match self {
            Value::Recordset(r) => Some(r),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::integer(i),
                None => Value::number(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                let mut s = Struct::new();
                for (k, v) in obj {
                    s.insert(k, Value::from(v));
                }
                Value::Struct(s)
            }
        }
    }
}

// ----------------------------------------------------------------
// Struct

/// How struct keys are compared on insert and lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyPolicy {
    #[default]
    CaseSensitive,
    /// Keys that differ only in case address the same entry. The spelling of
    /// the first insert is kept.
    CaseInsensitive,
}

impl KeyPolicy {
    fn fold(self, key: &str) -> String {
        match self {
            KeyPolicy::CaseSensitive => key.to_owned(),
            KeyPolicy::CaseInsensitive => key.to_lowercase(),
        }
    }
}

/// Ordered string-keyed map. Iteration follows first-insert order.
///
/// Equality compares key/value pairs regardless of order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Struct {
    policy: KeyPolicy,
    // folded key -> (key as first inserted, value)
    entries: IndexMap<String, (String, Value)>,
}

impl Struct {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: KeyPolicy) -> Self {
        Self {
            policy,
            entries: IndexMap::new(),
        }
    }

    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    /// Insert or overwrite. Returns the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.entries.entry(self.policy.fold(&key)) {
            indexmap::map::Entry::Occupied(mut e) => {
                Some(std::mem::replace(&mut e.get_mut().1, value))
            }
            indexmap::map::Entry::Vacant(e) => {
                e.insert((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(&self.policy.fold(key)).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&self.policy.fold(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.values().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Struct {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut s = Struct::new();
        for (k, v) in iter {
            s.insert(k, v);
        }
        s
    }
}

// ----------------------------------------------------------------
// Recordset

/// A recordset column: its name and the scalar type of its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub type_tag: String,
}

impl Column {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }
}

/// Tabular value: named columns and rows aligned to them.
///
/// Every row holds exactly one cell per column; the constructors enforce it
/// and there is no way to edit cells afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recordset {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Recordset {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Result<Self, ValueError> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(ValueError::RowWidth {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Rows already known to be one cell per column.
    pub(crate) fn from_aligned(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn builder() -> RecordsetBuilder {
        RecordsetBuilder::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Comma-joined column names, in declared order.
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Cells of column `index`, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c.name == column)?;
        self.rows.get(row)?.get(index)
    }
}

/// Column-then-row assembly of a [`Recordset`].
#[derive(Debug, Default)]
pub struct RecordsetBuilder {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl RecordsetBuilder {
    pub fn column(mut self, name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        self.columns.push(Column::new(name, type_tag));
        self
    }

    pub fn row(mut self, cells: Vec<Value>) -> Self {
        self.rows.push(cells);
        self
    }

    pub fn build(self) -> Result<Recordset, ValueError> {
        Recordset::new(self.columns, self.rows)
    }
}
