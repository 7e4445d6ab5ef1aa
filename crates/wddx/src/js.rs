//! Script-variable bridge: renders a [`Value`] as a JSON assignment
//! statement, `name = <json>;`.
//!
//! Recordsets use the "row" layout: an array with one object per row, keyed
//! by column name.

use serde_json::{Map, Number};

use crate::value::tags;
use crate::{parse, Value, WddxError};

/// Convert a value to JSON.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Scalar { text, type_tag } => scalar_to_json(text, type_tag),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Struct(s) => serde_json::Value::Object(
            s.iter()
                .map(|(k, v)| (k.to_owned(), to_json(v)))
                .collect(),
        ),
        Value::Recordset(rs) => serde_json::Value::Array(
            rs.rows()
                .iter()
                .map(|row| {
                    let obj: Map<String, serde_json::Value> = rs
                        .columns()
                        .iter()
                        .zip(row)
                        .map(|(column, cell)| (column.name.clone(), to_json(cell)))
                        .collect();
                    serde_json::Value::Object(obj)
                })
                .collect(),
        ),
    }
}

fn scalar_to_json(text: &str, type_tag: &str) -> serde_json::Value {
    let number = match type_tag {
        tags::INTEGER => text.trim().parse::<i64>().ok().map(Number::from),
        tags::NUMBER => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64),
        _ => None,
    };
    number.map_or_else(
        || serde_json::Value::String(text.to_owned()),
        serde_json::Value::Number,
    )
}

/// Render `value` as `variable_name = <json>;`.
///
/// ```
/// use wddx::{serialize_to_javascript, Value};
///
/// let v = Value::Array(vec![Value::integer(1), Value::string("a")]);
/// assert_eq!(serialize_to_javascript(&v, "data"), r#"data = [1,"a"];"#);
/// ```
pub fn serialize_to_javascript(value: &Value, variable_name: &str) -> String {
    format!("{variable_name} = {};", to_json(value))
}

/// Parse a WDDX packet and render it as an assignment statement.
pub fn translate_to_javascript(wddx: &str, variable_name: &str) -> Result<String, WddxError> {
    let value = parse(wddx)?;
    Ok(serialize_to_javascript(&value, variable_name))
}
