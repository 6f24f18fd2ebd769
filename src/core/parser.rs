//! XML parser
//!
//! This module parses XML text into an owned [`Element`] tree. Element and
//! attribute names bound to a namespace are stored in Clark notation, and
//! the namespace declarations of each element are kept on that element so
//! the serializer can reproduce them.

use crate::core::element::{Element, Node};
use crate::core::error::{JxmlError, JxmlResult};
use crate::core::namespace::{clark, NamespaceMap};
use crate::types::attribute::Attribute;
use log::trace;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::name::{PrefixDeclaration, QName, ResolveResult};
use quick_xml::NsReader;

/// Deepest element nesting accepted, as in libxml2 without `XML_PARSE_HUGE`
///
/// Tree traversals recurse per level, so deeper input is rejected here.
pub const MAX_DEPTH: usize = 256;

/// Parser for XML documents
#[derive(Debug, Default)]
pub struct XmlParser {
    stack: Vec<Element>,
    root: Option<Element>,
}

impl XmlParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a complete XML document and return its root element
    pub fn parse(xml: &str) -> JxmlResult<Element> {
        Self::new().parse_document(xml)
    }

    fn parse_document(mut self, xml: &str) -> JxmlResult<Element> {
        if xml.trim().is_empty() {
            return Err(JxmlError::ParseError("Empty document".to_string()));
        }

        let mut reader = NsReader::from_str(xml);
        reader.config_mut().trim_text(false);

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    self.check_depth()?;
                    let element = Self::open_element(&reader, &e)?;
                    self.stack.push(element);
                }
                Ok(Event::Empty(e)) => {
                    self.check_depth()?;
                    let element = Self::open_element(&reader, &e)?;
                    self.close_element(element)?;
                }
                Ok(Event::End(_)) => {
                    let element = self.stack.pop().ok_or_else(|| {
                        JxmlError::ParseError("Unexpected closing tag".to_string())
                    })?;
                    self.close_element(element)?;
                }
                Ok(Event::Text(e)) => {
                    // Decode XML entities (e.g., &quot; -> ")
                    let raw_text = String::from_utf8_lossy(e.as_ref());
                    let text = match unescape(&raw_text) {
                        Ok(unescaped) => unescaped.to_string(),
                        Err(_) => raw_text.to_string(),
                    };
                    self.push_text(&text)?;
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                    self.push_text(&text)?;
                }
                Ok(Event::GeneralRef(e)) => {
                    let text = Self::resolve_reference(&e)?;
                    self.push_text(&text)?;
                }
                Ok(Event::Comment(e)) => {
                    let text = String::from_utf8_lossy(e.as_ref()).to_string();
                    self.push_node(Node::Comment(text));
                }
                Ok(Event::PI(e)) => {
                    let target = String::from_utf8_lossy(e.target()).to_string();
                    let content = String::from_utf8_lossy(e.content()).trim().to_string();
                    self.push_node(Node::ProcessingInstruction { target, content });
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(JxmlError::ParseError(format!(
                        "XML parsing error at position {}: {}",
                        reader.error_position(),
                        e
                    )));
                }
                // declaration and doctype
                _ => {}
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(JxmlError::ParseError(format!(
                "Unclosed element '{}'",
                open.tag
            )));
        }

        let root = self
            .root
            .ok_or_else(|| JxmlError::ParseError("No root element".to_string()))?;
        trace!("parsed document with root <{}>", root.tag);
        Ok(root)
    }

    fn check_depth(&self) -> JxmlResult<()> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(JxmlError::ParseError(format!(
                "Elements nested deeper than {} levels",
                MAX_DEPTH
            )));
        }
        Ok(())
    }

    /// Build an element from a start tag, resolving its names
    fn open_element(reader: &NsReader<&[u8]>, e: &BytesStart<'_>) -> JxmlResult<Element> {
        let (resolved, local) = reader.resolve_element(e.name());
        let tag = Self::resolved_name(resolved, local.as_ref(), e.name())?;

        let mut element = Element::new(tag);
        for attr in e.attributes() {
            let attr = attr.map_err(|err| {
                JxmlError::ParseError(format!("Invalid attribute on <{}>: {}", element.tag, err))
            })?;
            // Decode XML entities in attribute values (e.g., &quot; -> ")
            let raw_value = String::from_utf8_lossy(attr.value.as_ref());
            let value = unescape(&raw_value)
                .map_err(|err| JxmlError::ParseError(format!("Invalid attribute value: {}", err)))?
                .to_string();

            if let Some(binding) = attr.key.as_namespace_binding() {
                let prefix = match binding {
                    PrefixDeclaration::Default => String::new(),
                    PrefixDeclaration::Named(prefix) => String::from_utf8_lossy(prefix).to_string(),
                };
                Self::declare(&mut element.namespaces, &prefix, &value)?;
                continue;
            }

            let (resolved, local) = reader.resolve_attribute(attr.key);
            let name = Self::resolved_name(resolved, local.as_ref(), attr.key)?;
            element.attributes.push(Attribute::new(name, value));
        }
        Ok(element)
    }

    fn declare(map: &mut NamespaceMap, prefix: &str, uri: &str) -> JxmlResult<()> {
        map.declare(prefix, uri)
            .map_err(|_| JxmlError::ParseError(format!("Duplicate declaration of prefix '{}'", prefix)))
    }

    /// Turn a resolved name into plain or Clark notation
    fn resolved_name(resolved: ResolveResult<'_>, local: &[u8], qname: QName<'_>) -> JxmlResult<String> {
        let local = String::from_utf8_lossy(local);
        match resolved {
            ResolveResult::Bound(ns) => Ok(clark(&String::from_utf8_lossy(ns.as_ref()), &local)),
            ResolveResult::Unbound => Ok(local.to_string()),
            ResolveResult::Unknown(prefix) => Err(JxmlError::ParseError(format!(
                "Namespace prefix '{}' of '{}' is not declared",
                String::from_utf8_lossy(&prefix),
                String::from_utf8_lossy(qname.as_ref())
            ))),
        }
    }

    /// Resolve a character or predefined entity reference
    fn resolve_reference(e: &BytesRef<'_>) -> JxmlResult<String> {
        if let Some(ch) = e
            .resolve_char_ref()
            .map_err(|err| JxmlError::ParseError(format!("Invalid character reference: {}", err)))?
        {
            return Ok(ch.to_string());
        }
        let name = String::from_utf8_lossy(e.as_ref());
        resolve_predefined_entity(&name)
            .map(str::to_string)
            .ok_or_else(|| JxmlError::ParseError(format!("Unknown entity '&{};'", name)))
    }

    /// Attach a finished element to its parent, or make it the root
    fn close_element(&mut self, element: Element) -> JxmlResult<()> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Node::Element(element));
            return Ok(());
        }
        if self.root.is_some() {
            return Err(JxmlError::ParseError(format!(
                "Multiple root elements, found extra <{}>",
                element.tag
            )));
        }
        self.root = Some(element);
        Ok(())
    }

    fn push_text(&mut self, text: &str) -> JxmlResult<()> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.append_text(text);
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(JxmlError::ParseError(
                "Text content outside of the root element".to_string(),
            )),
        }
    }

    /// Comments and processing instructions outside the root are dropped
    fn push_node(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }
}
