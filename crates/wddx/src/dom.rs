//! Owned XML tree the decoder walks.
//!
//! Built from `quick-xml` events. Only what WDDX needs is kept: element
//! names, attributes in document order, and element/text children. Comments,
//! processing instructions, declarations and doctypes are dropped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::XmlError;

/// A node in the tree: either a text leaf or an element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Unescaped text or CDATA content.
    Text(String),
    Element(XmlElement),
}

/// An element: name, ordered attributes, children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Unescaped value of attribute `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements in document order; text children are skipped.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    pub fn first_child_named(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|el| el.name == name)
    }

    /// Concatenated text of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(s) => out.push_str(s),
                XmlNode::Element(el) => el.collect_text(out),
            }
        }
    }
}

/// A parsed document with exactly one root element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

impl XmlDocument {
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader.read_event().map_err(syntax)?;
            match event {
                Event::Start(start) => stack.push(open_element(&start)?),
                Event::Empty(start) => {
                    let el = open_element(&start)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::End(_) => {
                    // quick-xml has already matched the end name to its start
                    let el = stack
                        .pop()
                        .ok_or_else(|| XmlError::Syntax("unexpected end tag".to_owned()))?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::Text(text) => {
                    let s = text.unescape().map_err(syntax)?;
                    push_text(&mut stack, &s)?;
                }
                Event::CData(data) => {
                    let s = String::from_utf8(data.into_inner().into_owned())
                        .map_err(|e| XmlError::Syntax(e.to_string()))?;
                    push_text(&mut stack, &s)?;
                }
                Event::Eof => break,
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.name));
        }
        root.map(|root| XmlDocument { root })
            .ok_or(XmlError::NoRootElement)
    }

    /// The root element if it is called `name`.
    ///
    /// The document node's only child is its root, so this is the
    /// document-level counterpart of [`XmlElement::first_child_named`].
    pub fn first_child_named(&self, name: &str) -> Option<&XmlElement> {
        (self.root.name == name).then_some(&self.root)
    }
}

fn syntax(e: impl std::fmt::Display) -> XmlError {
    XmlError::Syntax(e.to_string())
}

fn open_element(start: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let name = String::from_utf8(start.name().as_ref().to_vec()).map_err(syntax)?;
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(syntax)?;
        let key = String::from_utf8(attr.key.as_ref().to_vec()).map_err(syntax)?;
        let value = attr.unescape_value().map_err(syntax)?.into_owned();
        attrs.push((key, value));
    }
    Ok(XmlElement {
        name,
        attrs,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    el: XmlElement,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(el));
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::Syntax(format!(
            "second root element <{}>",
            el.name
        )));
    }
    *root = Some(el);
    Ok(())
}

fn push_text(stack: &mut [XmlElement], s: &str) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => {
            if let Some(XmlNode::Text(prev)) = parent.children.last_mut() {
                prev.push_str(s);
            } else {
                parent.children.push(XmlNode::Text(s.to_owned()));
            }
            Ok(())
        }
        // whitespace around the root is fine, anything else is not
        None if s.trim().is_empty() => Ok(()),
        None => Err(XmlError::Syntax("text outside the root element".to_owned())),
    }
}
