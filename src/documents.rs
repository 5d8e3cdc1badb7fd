//! XML document handling
//!
//! This module builds an owned, in-memory element tree from XML text and
//! provides the lookups the converters need: direct-child search and
//! descendant search in document order.
//!
//! Lookups match an element only when its name is exactly the one asked for
//! and it belongs to no namespace. `<d:list>` and a `<list>` under a default
//! `xmlns` are different elements from a plain `<list>`.

use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::borrow::Cow;

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Element name as written, including any prefix
    pub name: String,
    /// Namespace URI the name resolves to, if any
    pub namespace: Option<String>,
    /// Character data before the first child element, if any
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
            text: None,
            children: Vec::new(),
        }
    }

    /// Check whether this is the un-namespaced element `name`
    pub fn is_named(&self, name: &str) -> bool {
        self.namespace.is_none() && self.name == name
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append character data. Text after the first child element is tail
    /// text and does not belong to this element.
    fn push_text(&mut self, text: &str) {
        if !self.children.is_empty() {
            return;
        }
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    /// Find the first direct child with the given name
    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|e| e.is_named(name))
    }

    /// Iterate over every element below this one, in document order
    pub fn iter_descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Find every element below this one with the given name, in document order.
    ///
    /// The receiver itself is never yielded; nested matches all are.
    pub fn descendants<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.iter_descendants().filter(move |e| e.is_named(name))
    }
}

/// Pre-order walk over an element's subtree
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// XML Document representation
#[derive(Debug, Clone)]
pub struct Document {
    /// Root element of the document
    pub root: Element,
}

impl Document {
    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Parse an XML document, enforcing the given limits
    pub fn parse_with_limits(xml: &str, limits: &Limits) -> Result<Self> {
        limits.check_xml_size(xml.len())?;

        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = NsReader::from_str(xml);
        reader.trim_text(false);
        reader.check_end_names(true);

        let mut root: Option<Element> = None;
        let mut element_stack: Vec<Element> = Vec::new();

        loop {
            let resolved = reader
                .read_resolved_event()
                .map(|(ns, event)| (owned_namespace(ns), event));
            let (namespace, event) = match resolved {
                Ok(pair) => pair,
                Err(e) => return Err(malformed(e.to_string(), reader.buffer_position())),
            };
            let position = reader.buffer_position();

            match event {
                Event::Start(e) => {
                    check_single_root(root.as_ref(), &element_stack, position)?;
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    element_stack.push(parse_element(&e, namespace, position)?);
                }
                Event::End(_) => {
                    let current = element_stack
                        .pop()
                        .ok_or_else(|| malformed("unexpected end tag", position))?;
                    match element_stack.last_mut() {
                        Some(parent) => parent.add_child(current),
                        None => root = Some(current),
                    }
                }
                Event::Empty(e) => {
                    check_single_root(root.as_ref(), &element_stack, position)?;
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    let element = parse_element(&e, namespace, position)?;
                    match element_stack.last_mut() {
                        Some(parent) => parent.add_child(element),
                        None => root = Some(element),
                    }
                }
                Event::Text(e) => {
                    let raw = utf8(&e, "text", position)?;
                    let normalized = normalize_newlines(raw);
                    match element_stack.last_mut() {
                        Some(current) => {
                            let text = quick_xml::escape::unescape(&normalized).map_err(|err| {
                                malformed(format!("failed to unescape text: {}", err), position)
                            })?;
                            current.push_text(&text);
                        }
                        None if !normalized.trim().is_empty() => {
                            let message = "character data outside the root element";
                            return Err(malformed(message, position));
                        }
                        None => {}
                    }
                }
                Event::CData(e) => {
                    let raw = utf8(&e, "CDATA", position)?;
                    match element_stack.last_mut() {
                        Some(current) => current.push_text(&normalize_newlines(raw)),
                        None => {
                            let message = "CDATA section outside the root element";
                            return Err(malformed(message, position));
                        }
                    }
                }
                Event::Eof => break,
                _ => {} // Declarations, comments, processing instructions, doctype
            }
        }

        let position = reader.buffer_position();
        if let Some(open) = element_stack.last() {
            return Err(malformed(format!("unclosed element <{}>", open.name), position));
        }

        let root = root.ok_or_else(|| malformed("no root element found", position))?;
        Ok(Document { root })
    }

    /// Find every element below the root with the given name, in document order
    pub fn descendants<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.root.descendants(name)
    }
}

/// Build an element from a start tag. Attributes are checked for
/// well-formedness but not kept.
fn parse_element(
    start: &BytesStart,
    namespace: std::result::Result<Option<String>, String>,
    position: usize,
) -> Result<Element> {
    let name = utf8(start.name().as_ref(), "element name", position)?.to_string();
    let namespace = namespace.map_err(|message| malformed(message, position))?;

    for attr_result in start.attributes() {
        let attr = attr_result
            .map_err(|e| malformed(format!("failed to parse attribute: {}", e), position))?;
        attr.unescape_value().map_err(|e| {
            malformed(format!("failed to unescape attribute value: {}", e), position)
        })?;
    }

    Ok(Element::new(name, namespace))
}

fn owned_namespace(resolved: ResolveResult<'_>) -> std::result::Result<Option<String>, String> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(String::from_utf8_lossy(ns.0).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(format!(
            "unbound namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        )),
    }
}

fn check_single_root(root: Option<&Element>, stack: &[Element], position: usize) -> Result<()> {
    if root.is_some() && stack.is_empty() {
        return Err(malformed("more than one root element", position));
    }
    Ok(())
}

fn utf8<'a>(bytes: &'a [u8], what: &str, position: usize) -> Result<&'a str> {
    std::str::from_utf8(bytes)
        .map_err(|e| malformed(format!("invalid UTF-8 in {}: {}", what, e), position))
}

fn malformed(message: impl Into<String>, position: usize) -> Error {
    Error::Parse(ParseError::new(message).with_position(position))
}

/// XML line-end handling: `\r\n` and lone `\r` both become `\n`
fn normalize_newlines(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}
