//! The four conversions a host's WDDX tag exposes, with their options.
//!
//! Action names depend on the host dialect: `bx2wddx`, `wddx2bx`, `bx2js`,
//! `wddx2js` for [`Dialect::Bx`]; `cfml2wddx`, `wddx2cfml`, `cfml2js`,
//! `wddx2js` for [`Dialect::Cfml`].

use serde::Deserialize;

use crate::{
    serialize_to_javascript, translate_to_javascript, DecoderOptions, EncoderOptions, KeyPolicy,
    Value, WddxDecoder, WddxEncoder, WddxError,
};

/// Host language flavour; decides the action names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Bx,
    Cfml,
}

impl Dialect {
    fn tag(self) -> &'static str {
        match self {
            Dialect::Bx => "bx",
            Dialect::Cfml => "cfml",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Value → WDDX packet.
    ToWddx,
    /// WDDX packet → value.
    FromWddx,
    /// Value → script assignment.
    ToJs,
    /// WDDX packet → script assignment.
    WddxToJs,
}

impl Action {
    pub fn from_name(name: &str, dialect: Dialect) -> Result<Self, WddxError> {
        let tag = dialect.tag();
        let lower = name.trim().to_ascii_lowercase();
        [Action::ToWddx, Action::FromWddx, Action::ToJs, Action::WddxToJs]
            .into_iter()
            .find(|action| action.name(dialect) == lower)
            .ok_or_else(|| {
                WddxError::UnknownAction(format!(
                    "{name} (expected one of {tag}2wddx, wddx2{tag}, {tag}2js, wddx2js)"
                ))
            })
    }

    pub fn name(self, dialect: Dialect) -> String {
        let tag = dialect.tag();
        match self {
            Action::ToWddx => format!("{tag}2wddx"),
            Action::FromWddx => format!("wddx2{tag}"),
            Action::ToJs => format!("{tag}2js"),
            Action::WddxToJs => "wddx2js".to_owned(),
        }
    }

    /// Whether the input is packet text rather than a value.
    pub fn reads_packet(self) -> bool {
        matches!(self, Action::FromWddx | Action::WddxToJs)
    }
}

/// Options of one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WddxOptions {
    pub action: String,
    pub dialect: Dialect,
    /// Variable name for the `*2js` actions; `<action>_JS` when unset.
    pub top_level_variable: Option<String>,
    /// Accepted for compatibility; DTD validation is not performed.
    pub validate: bool,
    /// Accepted for compatibility; input must always be valid XML.
    pub xml_conform: bool,
    pub key_policy: KeyPolicy,
    pub recordset_type: String,
}

impl Default for WddxOptions {
    fn default() -> Self {
        Self {
            action: Action::ToWddx.name(Dialect::Bx),
            dialect: Dialect::Bx,
            top_level_variable: None,
            validate: false,
            xml_conform: true,
            key_policy: KeyPolicy::CaseSensitive,
            recordset_type: EncoderOptions::default().recordset_type,
        }
    }
}

/// Run the conversion `options.action` names on `input`.
///
/// Packet-reading actions take a string scalar holding the packet; the others
/// take any value. Text results come back as string scalars.
pub fn run(options: &WddxOptions, input: Value) -> Result<Value, WddxError> {
    let action = Action::from_name(&options.action, options.dialect)?;

    if options.validate {
        tracing::warn!("WDDX DTDs are no longer published; validation cannot be performed");
    }
    if !options.xml_conform {
        tracing::warn!("only valid XML is accepted; xml_conform is ignored");
    }

    let variable = options
        .top_level_variable
        .clone()
        .unwrap_or_else(|| format!("{}_JS", options.action));

    tracing::debug!(action = %action.name(options.dialect), "running WDDX action");
    let out = match action {
        Action::ToWddx => {
            let mut encoder = WddxEncoder::with_options(EncoderOptions {
                recordset_type: options.recordset_type.clone(),
            });
            Value::string(encoder.encode(&input))
        }
        Action::ToJs => Value::string(serialize_to_javascript(&input, &variable)),
        Action::FromWddx => WddxDecoder::new()
            .with_options(DecoderOptions {
                key_policy: options.key_policy,
            })
            .decode_str(packet_text(&input)?)?,
        Action::WddxToJs => {
            Value::string(translate_to_javascript(packet_text(&input)?, &variable)?)
        }
    };
    Ok(out)
}

fn packet_text(input: &Value) -> Result<&str, WddxError> {
    input
        .as_text()
        .ok_or(WddxError::InvalidInput("expected WDDX packet text"))
}
