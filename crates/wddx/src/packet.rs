//! "Is this a WDDX packet?" predicate.
//!
//! Only the presence of the `wddxPacket` wrapper is checked. A wrapper with
//! broken internals still counts as a packet.

use crate::value::tags;
use crate::{Value, XmlDocument, XmlElement};

const PACKET_ELEMENT: &str = "wddxPacket";

/// Input to [`looks_like_wddx_packet`].
#[derive(Debug, Clone, Copy)]
pub enum Candidate<'a> {
    Document(&'a XmlDocument),
    Element(&'a XmlElement),
    Text(&'a str),
    Value(&'a Value),
}

impl<'a> From<&'a XmlDocument> for Candidate<'a> {
    fn from(doc: &'a XmlDocument) -> Self {
        Candidate::Document(doc)
    }
}

impl<'a> From<&'a XmlElement> for Candidate<'a> {
    fn from(el: &'a XmlElement) -> Self {
        Candidate::Element(el)
    }
}

impl<'a> From<&'a str> for Candidate<'a> {
    fn from(s: &'a str) -> Self {
        Candidate::Text(s)
    }
}

impl<'a> From<&'a Value> for Candidate<'a> {
    fn from(v: &'a Value) -> Self {
        Candidate::Value(v)
    }
}

/// True when `input` holds a `wddxPacket` element as a direct child.
///
/// Text is parsed as XML first; text that is not XML is `false`. A `Value` is
/// tested as text only when it is a string scalar. Never panics, never fails.
///
/// ```
/// use wddx::looks_like_wddx_packet;
///
/// assert!(looks_like_wddx_packet(r#"<wddxPacket version="1.0"><header/></wddxPacket>"#));
/// assert!(!looks_like_wddx_packet("plain string"));
/// assert!(!looks_like_wddx_packet("<root><foo>bar</foo></root>"));
/// ```
pub fn looks_like_wddx_packet<'a>(input: impl Into<Candidate<'a>>) -> bool {
    match input.into() {
        Candidate::Document(doc) => doc.first_child_named(PACKET_ELEMENT).is_some(),
        Candidate::Element(el) => el.first_child_named(PACKET_ELEMENT).is_some(),
        Candidate::Text(text) => text_is_packet(text),
        Candidate::Value(Value::Scalar { text, type_tag }) if type_tag == tags::STRING => {
            text_is_packet(text)
        }
        Candidate::Value(_) => false,
    }
}

fn text_is_packet(text: &str) -> bool {
    XmlDocument::parse(text)
        .map(|doc| doc.first_child_named(PACKET_ELEMENT).is_some())
        .unwrap_or(false)
}
