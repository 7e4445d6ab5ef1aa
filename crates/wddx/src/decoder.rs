//! WDDX decoder: packet text → [`Value`].
//!
//! Dispatch is by element name. `recordset`, `struct`, `array` and `boolean`
//! are decoded here; every other element is a scalar whose text and tag name
//! go to the configured [`Coerce`] implementation.
//!
//! The decoder is lenient about irregular packets: a `var` or `field` without
//! a `name` is skipped, as is any struct child that is not a `var` and any
//! recordset child that is not a `field`. A missing recordset cell becomes
//! `Null`. An array's `length` attribute is ignored in favour of its actual
//! children, and a recordset's `rowCount` never exceeds its longest field.

use crate::coerce::parse_boolean;
use crate::value::{tags, Column, KeyPolicy, Recordset, Struct};

const VAR: &str = "var";
const FIELD: &str = "field";
use crate::{Coerce, DefaultCoercion, Value, WddxError, XmlDocument, XmlElement};

/// Options controlling WDDX decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Key policy of every struct the decoder builds.
    pub key_policy: KeyPolicy,
}

/// WDDX decoder over a [`Coerce`] implementation.
#[derive(Debug, Clone, Default)]
pub struct WddxDecoder<C = DefaultCoercion> {
    coercion: C,
    pub options: DecoderOptions,
}

impl WddxDecoder<DefaultCoercion> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Coerce> WddxDecoder<C> {
    pub fn with_coercion(coercion: C) -> Self {
        Self {
            coercion,
            options: DecoderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse packet text.
    pub fn decode_str(&self, xml: &str) -> Result<Value, WddxError> {
        let doc = XmlDocument::parse(xml)?;
        self.decode_document(&doc)
    }

    /// Decode an already parsed packet document.
    pub fn decode_document(&self, doc: &XmlDocument) -> Result<Value, WddxError> {
        let packet = doc.first_child_named("wddxPacket").ok_or_else(|| {
            WddxError::InvalidPacket(format!("root element is <{}>", doc.root.name))
        })?;
        let data = packet
            .first_child_named("data")
            .ok_or_else(|| WddxError::InvalidPacket("missing <data> element".to_owned()))?;
        let payload = data
            .child_elements()
            .next()
            .ok_or_else(|| WddxError::InvalidPacket("empty <data> element".to_owned()))?;
        Ok(self.decode_element(payload))
    }

    // ----------------------------------------------------------------
    // Core read dispatch

    pub fn decode_element(&self, el: &XmlElement) -> Value {
        match el.name.as_str() {
            tags::RECORDSET => Value::Recordset(self.read_recordset(el)),
            tags::STRUCT => Value::Struct(self.read_struct(el)),
            tags::ARRAY => Value::Array(
                el.child_elements()
                    .map(|child| self.decode_element(child))
                    .collect(),
            ),
            tags::BOOLEAN => el
                .attr("value")
                .and_then(parse_boolean)
                .map_or(Value::Null, Value::Boolean),
            other => self.coercion.coerce(&el.text(), other),
        }
    }

    fn read_struct(&self, el: &XmlElement) -> Struct {
        let mut out = Struct::with_policy(self.options.key_policy);
        for var in el.child_elements().filter(|child| child.name == VAR) {
            let Some(key) = var.attr("name") else {
                tracing::debug!(element = %var.name, "struct member without name skipped");
                continue;
            };
            let value = var
                .child_elements()
                .next()
                .map_or(Value::Null, |child| self.decode_element(child));
            out.insert(key, value);
        }
        out
    }

    fn read_recordset(&self, el: &XmlElement) -> Recordset {
        let fields: Vec<(&XmlElement, Vec<&XmlElement>)> = el
            .child_elements()
            .filter(|field| field.name == FIELD)
            .filter(|field| {
                let named = field.attr("name").is_some();
                if !named {
                    tracing::debug!("recordset field without name skipped");
                }
                named
            })
            .map(|field| (field, field.child_elements().collect()))
            .collect();

        let columns: Vec<Column> = fields
            .iter()
            .map(|(field, _)| {
                Column::new(
                    field.attr("name").unwrap_or_default(),
                    field.attr("type").unwrap_or(tags::STRING),
                )
            })
            .collect();

        // Rows past the longest field would be all padding; without fields
        // there is no cell data at all.
        let longest = fields.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
        let row_count = match el.attr("rowCount").and_then(|n| n.trim().parse::<usize>().ok()) {
            Some(n) if n > longest => {
                tracing::debug!(row_count = n, longest, "rowCount capped to field length");
                longest
            }
            Some(n) => n,
            None => longest,
        };

        let rows: Vec<Vec<Value>> = (0..row_count)
            .map(|idx| {
                fields
                    .iter()
                    .map(|(field, cells)| match cells.get(idx) {
                        Some(cell) => self.decode_element(cell),
                        None => {
                            tracing::debug!(
                                field = field.attr("name"),
                                row = idx,
                                "missing recordset cell"
                            );
                            Value::Null
                        }
                    })
                    .collect()
            })
            .collect();

        Recordset::from_aligned(columns, rows)
    }
}

/// Parse a WDDX packet with the default coercion.
///
/// Fails with [`WddxError::InvalidPacket`] when the text is not XML or has no
/// `wddxPacket`/`data` envelope.
pub fn parse(xml: &str) -> Result<Value, WddxError> {
    WddxDecoder::new().decode_str(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(xml: &str) -> Value {
        let doc = XmlDocument::parse(xml).unwrap();
        WddxDecoder::new().decode_element(&doc.root)
    }

    #[test]
    fn array_length_is_advisory() {
        assert_eq!(
            decode(r#"<array length="99"><string>a</string></array>"#),
            Value::Array(vec![Value::string("a")])
        );
    }

    #[test]
    fn duplicate_struct_keys_last_wins() {
        let v = decode(
            r#"<struct><var name="a"><integer>1</integer></var><var name="a"><integer>2</integer></var></struct>"#,
        );
        let s = v.as_struct().unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("a"), Some(&Value::integer(2)));
    }

    #[test]
    fn struct_key_policy_from_options() {
        let doc = XmlDocument::parse(
            r#"<struct><var name="Foo"><string>x</string></var><var name="foo"><string>y</string></var></struct>"#,
        )
        .unwrap();
        let decoder = WddxDecoder::new().with_options(DecoderOptions {
            key_policy: KeyPolicy::CaseInsensitive,
        });
        let v = decoder.decode_element(&doc.root);
        let s = v.as_struct().unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("FOO"), Some(&Value::string("y")));
    }

    #[test]
    fn irregular_struct_members() {
        let v = decode(r#"<struct><var><string>x</string></var><var name="empty"/></struct>"#);
        let s = v.as_struct().unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("empty"), Some(&Value::Null));
    }

    #[test]
    fn boolean_reads_attribute() {
        assert_eq!(decode(r#"<boolean value="true"/>"#), Value::Boolean(true));
        assert_eq!(decode(r#"<boolean value="false"/>"#), Value::Boolean(false));
        assert_eq!(decode(r#"<boolean value="maybe"/>"#), Value::Null);
        assert_eq!(decode("<boolean/>"), Value::Null);
    }

    #[test]
    fn unknown_scalar_tag_is_string() {
        assert_eq!(decode("<binary>AAEC</binary>"), Value::string("AAEC"));
        assert_eq!(decode("<string>a &amp; b</string>"), Value::string("a & b"));
    }

    #[test]
    fn recordset_with_missing_cells() {
        let v = decode(concat!(
            r#"<recordset rowCount="2" fieldNames="a,b">"#,
            r#"<field name="a"><string>x</string><string>y</string></field>"#,
            r#"<field name="b" type="integer"><integer>1</integer></field>"#,
            r#"<field><string>ignored</string></field>"#,
            "</recordset>"
        ));
        let rs = v.as_recordset().unwrap();
        assert_eq!(
            rs.columns(),
            &[Column::new("a", "string"), Column::new("b", "integer")]
        );
        assert_eq!(
            rs.rows(),
            &[
                vec![Value::string("x"), Value::integer(1)],
                vec![Value::string("y"), Value::Null],
            ]
        );
    }

    #[test]
    fn recordset_without_row_count_uses_longest_field() {
        let v = decode(r#"<recordset><field name="a"><string>x</string><string>y</string></field></recordset>"#);
        assert_eq!(v.as_recordset().unwrap().row_count(), 2);
    }

    #[test]
    fn oversized_row_count_is_capped() {
        let v = decode(r#"<recordset rowCount="18446744073709551615" fieldNames="" type="query"></recordset>"#);
        assert_eq!(v.as_recordset().unwrap().row_count(), 0);

        let v = decode(r#"<recordset rowCount="5000000" fieldNames="a"><field name="a"/></recordset>"#);
        assert_eq!(v.as_recordset().unwrap().row_count(), 0);

        let v = decode(concat!(
            r#"<recordset rowCount="1000000000000" fieldNames="a,b">"#,
            r#"<field name="a"><string>x</string><string>y</string></field>"#,
            r#"<field name="b"><string>z</string></field>"#,
            "</recordset>"
        ));
        let rs = v.as_recordset().unwrap();
        assert_eq!(
            rs.rows(),
            &[
                vec![Value::string("x"), Value::string("z")],
                vec![Value::string("y"), Value::Null],
            ]
        );
    }

    #[test]
    fn parse_survives_huge_row_count() {
        let packet = concat!(
            r#"<wddxPacket version="1.0"><header/><data>"#,
            r#"<recordset rowCount="18446744073709551615" fieldNames="" type="query"></recordset>"#,
            "</data></wddxPacket>"
        );
        let v = parse(packet).unwrap();
        assert_eq!(v.as_recordset().unwrap().row_count(), 0);
    }

    #[test]
    fn only_var_and_field_children_count() {
        let v = decode(concat!(
            "<struct>",
            r#"<var name="a"><string>1</string></var>"#,
            r#"<item name="b"><string>2</string></item>"#,
            "</struct>"
        ));
        let s = v.as_struct().unwrap();
        assert_eq!(s.keys().collect::<Vec<_>>(), vec!["a"]);

        let v = decode(concat!(
            r#"<recordset rowCount="1" fieldNames="a">"#,
            r#"<field name="a"><string>x</string></field>"#,
            r#"<column name="b"><string>y</string></column>"#,
            "</recordset>"
        ));
        assert_eq!(v.as_recordset().unwrap().columns(), &[Column::new("a", "string")]);
    }

    #[test]
    fn structural_scalar_tags_round_trip_as_strings() {
        for tag in ["boolean", "struct", "array", "recordset", "a b"] {
            let packet = crate::serialize(&Value::Scalar {
                text: "true".to_owned(),
                type_tag: tag.to_owned(),
            });
            assert_eq!(parse(&packet).unwrap(), Value::string("true"), "tag {tag:?}");
        }
    }

    #[test]
    fn custom_coercion_is_used_for_scalars() {
        let decoder = WddxDecoder::with_coercion(|text: &str, tag: &str| {
            Value::scalar(text.to_uppercase(), tag)
        });
        let doc = XmlDocument::parse("<array><string>a</string><boolean value=\"true\"/></array>").unwrap();
        assert_eq!(
            decoder.decode_element(&doc.root),
            Value::Array(vec![Value::scalar("A", "string"), Value::Boolean(true)])
        );
    }

    #[test]
    fn envelope_errors() {
        assert!(matches!(parse("<root/>"), Err(WddxError::InvalidPacket(_))));
        assert!(matches!(parse("not xml"), Err(WddxError::InvalidPacket(_))));
        assert!(matches!(
            parse(r#"<wddxPacket version="1.0"><header/></wddxPacket>"#),
            Err(WddxError::InvalidPacket(_))
        ));
        assert!(matches!(
            parse(r#"<wddxPacket version="1.0"><header/><data> </data></wddxPacket>"#),
            Err(WddxError::InvalidPacket(_))
        ));
    }
}
