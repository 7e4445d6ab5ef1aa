//! WDDX encoder: [`Value`] → packet text.
//!
//! Output is a single XML fragment with no whitespace between tags.

use crate::coerce::normalize_date_time;
use crate::escape::{escape_attribute, escape_text};
use crate::value::{scalar_wire_tag, tags, Recordset, Struct};
use crate::Value;

const PACKET_OPEN: &str = r#"<wddxPacket version="1.0"><header/><data>"#;
const PACKET_CLOSE: &str = "</data></wddxPacket>";

/// Options controlling WDDX encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderOptions {
    /// Written as the `type` attribute of every `<recordset>`.
    pub recordset_type: String,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            recordset_type: "query".to_owned(),
        }
    }
}

/// WDDX encoder — appends packet text to an internal buffer.
#[derive(Debug, Default)]
pub struct WddxEncoder {
    out: String,
    pub options: EncoderOptions,
}

impl WddxEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EncoderOptions) -> Self {
        Self {
            out: String::new(),
            options,
        }
    }

    // ----------------------------------------------------------------
    // Public encode entry-points

    /// Encode `value` wrapped in the packet envelope.
    pub fn encode(&mut self, value: &Value) -> String {
        self.out.clear();
        self.out.push_str(PACKET_OPEN);
        self.write_any(value);
        self.out.push_str(PACKET_CLOSE);
        std::mem::take(&mut self.out)
    }

    /// Encode `value` without the envelope.
    pub fn encode_object(&mut self, value: &Value) -> String {
        self.out.clear();
        self.write_any(value);
        std::mem::take(&mut self.out)
    }

    // ----------------------------------------------------------------
    // Core write dispatch

    pub fn write_any(&mut self, value: &Value) {
        match value {
            Value::Recordset(rs) => self.write_recordset(rs),
            Value::Boolean(b) => self.write_boolean(*b),
            Value::Array(items) => {
                self.out.push_str(r#"<array length=""#);
                self.out.push_str(&items.len().to_string());
                self.out.push_str(r#"">"#);
                for item in items {
                    self.write_any(item);
                }
                self.close(tags::ARRAY);
            }
            Value::Struct(s) => self.write_struct(s),
            Value::Scalar { text, type_tag } => self.write_scalar(text, type_tag),
            Value::Null => {
                self.open(tags::NULL);
                self.close(tags::NULL);
            }
        }
    }

    fn write_boolean(&mut self, b: bool) {
        self.out.push_str(if b {
            r#"<boolean value="true"/>"#
        } else {
            r#"<boolean value="false"/>"#
        });
    }

    fn write_struct(&mut self, s: &Struct) {
        self.open(tags::STRUCT);
        for (key, value) in s.iter() {
            self.out.push_str(r#"<var name=""#);
            self.out.push_str(&escape_attribute(key));
            self.out.push_str(r#"">"#);
            self.write_any(value);
            self.out.push_str("</var>");
        }
        self.close(tags::STRUCT);
    }

    fn write_scalar(&mut self, text: &str, type_tag: &str) {
        let type_tag = scalar_wire_tag(type_tag);
        self.open(type_tag);
        if type_tag == tags::DATE_TIME {
            // Normalised dates are plain ASCII and need no escaping.
            match normalize_date_time(text) {
                Some(iso) => self.out.push_str(&iso),
                None => self.out.push_str(&escape_text(text)),
            }
        } else {
            self.out.push_str(&escape_text(text));
        }
        self.close(type_tag);
    }

    /// Recordsets are column-major: every cell of a column is written before
    /// the next column starts.
    pub fn write_recordset(&mut self, rs: &Recordset) {
        self.out.push_str(r#"<recordset rowCount=""#);
        self.out.push_str(&rs.row_count().to_string());
        self.out.push_str(r#"" fieldNames=""#);
        self.out.push_str(&rs.column_list());
        self.out.push_str(r#"" type=""#);
        self.out.push_str(&self.options.recordset_type);
        self.out.push_str(r#"">"#);
        for (i, column) in rs.columns().iter().enumerate() {
            self.out.push_str(r#"<field name=""#);
            self.out.push_str(&escape_attribute(column.name.as_str()));
            self.out.push_str(r#"">"#);
            for cell in rs.column_values(i) {
                self.write_any(cell);
            }
            self.out.push_str("</field>");
        }
        self.close(tags::RECORDSET);
    }

    fn open(&mut self, tag: &str) {
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push('>');
    }

    fn close(&mut self, tag: &str) {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }
}

/// Serialize `value` as a complete WDDX packet.
///
/// ```
/// use wddx::{serialize, Value};
///
/// assert_eq!(
///     serialize(&Value::Boolean(true)),
///     r#"<wddxPacket version="1.0"><header/><data><boolean value="true"/></data></wddxPacket>"#
/// );
/// ```
pub fn serialize(value: &Value) -> String {
    WddxEncoder::new().encode(value)
}

/// Serialize `value` as a bare WDDX fragment, without the packet envelope.
pub fn serialize_object(value: &Value) -> String {
    WddxEncoder::new().encode_object(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn boolean_has_no_closing_tag() {
        assert_eq!(serialize_object(&Value::Boolean(true)), r#"<boolean value="true"/>"#);
        assert_eq!(serialize_object(&Value::Boolean(false)), r#"<boolean value="false"/>"#);
    }

    #[test]
    fn scalars_use_their_tag_and_escape_text() {
        assert_eq!(
            serialize_object(&Value::string("foo < bar & baz > qux")),
            "<string>foo &lt; bar &amp; baz &gt; qux</string>"
        );
        assert_eq!(serialize_object(&Value::integer(42)), "<integer>42</integer>");
        assert_eq!(serialize_object(&Value::number(1.5)), "<number>1.5</number>");
        assert_eq!(serialize_object(&Value::Null), "<null></null>");
    }

    #[test]
    fn scalars_never_take_structural_tags() {
        let raw = |text: &str, tag: &str| Value::Scalar {
            text: text.to_owned(),
            type_tag: tag.to_owned(),
        };
        assert_eq!(serialize_object(&raw("true", "boolean")), "<string>true</string>");
        assert_eq!(serialize_object(&raw("x", "struct")), "<string>x</string>");
        assert_eq!(serialize_object(&raw("x", "a b")), "<string>x</string>");
        assert_eq!(serialize_object(&raw("x", "binary")), "<binary>x</binary>");
    }

    #[test]
    fn date_time_is_iso_utc() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            serialize_object(&Value::date_time(dt)),
            "<dateTime>2024-01-01T00:00:00Z</dateTime>"
        );
        assert_eq!(
            serialize_object(&Value::scalar("2024-01-01T02:00:00+02:00", "dateTime")),
            "<dateTime>2024-01-01T00:00:00Z</dateTime>"
        );
        assert_eq!(
            serialize_object(&Value::scalar("<soon>", "dateTime")),
            "<dateTime>&lt;soon&gt;</dateTime>"
        );
    }

    #[test]
    fn array_carries_length() {
        let v = Value::Array(vec![Value::string("foo"), Value::string("bar")]);
        assert_eq!(
            serialize_object(&v),
            r#"<array length="2"><string>foo</string><string>bar</string></array>"#
        );
    }

    #[test]
    fn struct_escapes_keys() {
        let s: Struct = vec![
            ("<script>alert('xss')</script>", Value::string("value")),
            ("normal", Value::string("data")),
        ]
        .into_iter()
        .collect();
        let out = serialize_object(&Value::Struct(s));
        assert_eq!(
            out,
            concat!(
                "<struct>",
                r#"<var name="&lt;script&gt;alert(&apos;xss&apos;)&lt;/script&gt;"><string>value</string></var>"#,
                r#"<var name="normal"><string>data</string></var>"#,
                "</struct>"
            )
        );
    }

    #[test]
    fn recordset_type_is_configurable() {
        let rs = Recordset::builder().column("a", "string").build().unwrap();
        let mut encoder = WddxEncoder::with_options(EncoderOptions {
            recordset_type: "coldfusion.sql.QueryTable".to_owned(),
        });
        assert_eq!(
            encoder.encode_object(&Value::Recordset(rs)),
            r#"<recordset rowCount="0" fieldNames="a" type="coldfusion.sql.QueryTable"><field name="a"></field></recordset>"#
        );
    }

    #[test]
    fn encoder_is_reusable() {
        let mut encoder = WddxEncoder::new();
        let first = encoder.encode(&Value::integer(1));
        let second = encoder.encode(&Value::integer(1));
        assert_eq!(first, second);
    }
}
