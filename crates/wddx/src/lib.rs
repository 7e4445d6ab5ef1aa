//! WDDX packet codec.
//!
//! Converts between an in-memory [`Value`] tree (structs, arrays, recordsets,
//! typed scalars) and WDDX, the XML wire format for typed data exchange:
//!
//! ```text
//! <wddxPacket version="1.0"><header/><data>VALUE</data></wddxPacket>
//! ```
//!
//! # Example
//!
//! ```
//! use wddx::{parse, serialize, Struct, Value};
//!
//! let mut s = Struct::new();
//! s.insert("foo", Value::string("bar"));
//! s.insert("isWDDX", Value::Boolean(true));
//!
//! let packet = serialize(&Value::Struct(s.clone()));
//! assert!(packet.contains(r#"<var name="isWDDX"><boolean value="true"/></var>"#));
//! assert_eq!(parse(&packet).unwrap(), Value::Struct(s));
//! ```

pub mod action;
pub mod coerce;
pub mod decoder;
pub mod dom;
pub mod encoder;
pub mod error;
pub mod escape;
pub mod js;
pub mod packet;
pub mod value;

pub use action::{run, Action, Dialect, WddxOptions};
pub use coerce::{Coerce, DefaultCoercion};
pub use decoder::{parse, DecoderOptions, WddxDecoder};
pub use dom::{XmlDocument, XmlElement, XmlNode};
pub use encoder::{serialize, serialize_object, EncoderOptions, WddxEncoder};
pub use error::{ValueError, WddxError, XmlError};
pub use escape::{escape_attribute, escape_text};
pub use js::{serialize_to_javascript, to_json, translate_to_javascript};
pub use packet::{looks_like_wddx_packet, Candidate};
pub use value::{Column, KeyPolicy, Recordset, RecordsetBuilder, Struct, Value};
