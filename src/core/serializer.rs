//! XML serializer
//!
//! This module serializes an [`Element`] tree back to XML text. Names in
//! Clark notation are written with a prefix that is in scope at that point,
//! declaring one when needed, so a parsed document serializes with its
//! original declarations and a transformed one stays well-formed.

use crate::core::element::{Element, Node};
use crate::core::error::{JxmlError, JxmlResult};
use crate::core::namespace::{ns, split_clark, well_known_prefix, NamespaceMap};
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt;
use std::io::Cursor;

/// Options controlling serializer output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Indent nested elements by this many spaces; `None` writes compact output
    pub indent: Option<usize>,
    /// Emit an `<?xml version="1.0" encoding="UTF-8"?>` declaration
    pub xml_declaration: bool,
}

impl SerializeOptions {
    /// Indented output, as used for human-readable configuration
    pub fn pretty() -> Self {
        Self {
            indent: Some(2),
            xml_declaration: false,
        }
    }
}

/// Serializer for XML trees
#[derive(Debug, Clone, Default)]
pub struct XmlSerializer {
    options: SerializeOptions,
}

impl XmlSerializer {
    /// Create a new serializer
    pub fn new(options: SerializeOptions) -> Self {
        Self { options }
    }

    /// Serialize an element and its subtree
    pub fn to_string(&self, root: &Element) -> JxmlResult<String> {
        let cursor = Cursor::new(Vec::new());
        let mut writer = match self.options.indent {
            Some(width) => Writer::new_with_indent(cursor, b' ', width),
            None => Writer::new(cursor),
        };

        if self.options.xml_declaration {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }

        let mut scopes = Vec::new();
        self.write_element(&mut writer, root, &mut scopes)?;

        let result = writer.into_inner().into_inner();
        String::from_utf8(result)
            .map_err(|e| JxmlError::SerializationError(format!("UTF-8 encoding error: {}", e)))
    }

    fn write_element(
        &self,
        writer: &mut Writer<Cursor<Vec<u8>>>,
        element: &Element,
        scopes: &mut Vec<NamespaceMap>,
    ) -> JxmlResult<()> {
        let mut decls = element.namespaces.clone();
        let name = Self::element_name(&element.tag, scopes, &mut decls)?;

        let mut attributes = Vec::with_capacity(element.attributes.len());
        for attr in &element.attributes {
            let attr_name = Self::attribute_name(&attr.name, scopes, &mut decls)?;
            attributes.push((attr_name, attr.value.as_str()));
        }

        let mut start = BytesStart::new(name.as_str());
        for (prefix, uri) in decls.iter() {
            let key = if prefix.is_empty() {
                "xmlns".to_string()
            } else {
                format!("xmlns:{}", prefix)
            };
            start.push_attribute((key.as_str(), uri));
        }
        for (attr_name, value) in &attributes {
            start.push_attribute((attr_name.as_str(), *value));
        }

        if element.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        scopes.push(decls);
        for child in &element.children {
            match child {
                Node::Element(child) => self.write_element(writer, child, scopes)?,
                Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
                Node::Comment(text) => {
                    if text.contains("--") || text.ends_with('-') {
                        return Err(JxmlError::SerializationError(format!(
                            "Comment cannot contain '--' or end with '-': {}",
                            text
                        )));
                    }
                    writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?
                }
                Node::ProcessingInstruction { target, content } => {
                    Self::check_name(target)?;
                    let pi = if content.is_empty() {
                        target.clone()
                    } else {
                        format!("{} {}", target, content)
                    };
                    writer.write_event(Event::PI(BytesPI::new(pi)))?
                }
            }
        }
        scopes.pop();
        writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Qualified name for an element tag, declaring namespaces on `decls` as needed
    fn element_name(tag: &str, scopes: &[NamespaceMap], decls: &mut NamespaceMap) -> JxmlResult<String> {
        let (uri, local) = split_clark(tag);
        Self::check_name(local)?;

        let Some(uri) = uri else {
            // A bare tag must not inherit a default namespace
            if lookup(scopes, decls, "").is_some_and(|u| !u.is_empty()) {
                decls.remove("");
                if lookup(scopes, decls, "").is_some_and(|u| !u.is_empty()) {
                    decls.declare("", "")?;
                }
            }
            return Ok(local.to_string());
        };

        if uri.is_empty() {
            return Err(JxmlError::SerializationError(format!(
                "Empty namespace in tag '{}'",
                tag
            )));
        }
        if uri == ns::XML {
            return Ok(format!("{}:{}", ns::XML_PREFIX, local));
        }
        if lookup(scopes, decls, "") == Some(uri) {
            return Ok(local.to_string());
        }
        if let Some(prefix) = bound_prefix(scopes, decls, uri) {
            return Ok(format!("{}:{}", prefix, local));
        }
        if !decls.has_prefix("") {
            decls.declare("", uri)?;
            return Ok(local.to_string());
        }
        let prefix = fresh_prefix(scopes, decls, uri);
        decls.declare(&prefix, uri)?;
        Ok(format!("{}:{}", prefix, local))
    }

    /// Qualified name for an attribute; namespaced attributes always need a prefix
    fn attribute_name(name: &str, scopes: &[NamespaceMap], decls: &mut NamespaceMap) -> JxmlResult<String> {
        let (uri, local) = split_clark(name);
        Self::check_name(local)?;

        let Some(uri) = uri.filter(|u| !u.is_empty()) else {
            return Ok(local.to_string());
        };
        if uri == ns::XML {
            return Ok(format!("{}:{}", ns::XML_PREFIX, local));
        }
        if let Some(prefix) = bound_prefix(scopes, decls, uri) {
            return Ok(format!("{}:{}", prefix, local));
        }
        let prefix = fresh_prefix(scopes, decls, uri);
        decls.declare(&prefix, uri)?;
        Ok(format!("{}:{}", prefix, local))
    }

    fn check_name(name: &str) -> JxmlResult<()> {
        let starts_ok = name
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_');
        let chars_ok = name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));
        if starts_ok && chars_ok {
            Ok(())
        } else {
            Err(JxmlError::SerializationError(format!(
                "Invalid XML name: '{}'",
                name
            )))
        }
    }
}

/// Resolve a prefix against the local declarations, then the enclosing scopes
fn lookup<'a>(scopes: &'a [NamespaceMap], decls: &'a NamespaceMap, prefix: &str) -> Option<&'a str> {
    decls
        .get_uri(prefix)
        .or_else(|| scopes.iter().rev().find_map(|m| m.get_uri(prefix)))
}

/// A non-default prefix currently bound to `uri`
fn bound_prefix(scopes: &[NamespaceMap], decls: &NamespaceMap, uri: &str) -> Option<String> {
    std::iter::once(decls)
        .chain(scopes.iter().rev())
        .flat_map(|m| m.iter())
        .find(|(prefix, u)| {
            !prefix.is_empty() && *u == uri && lookup(scopes, decls, prefix) == Some(uri)
        })
        .map(|(prefix, _)| prefix.to_string())
}

/// The conventional prefix for `uri` if it is free, otherwise `ns0`, `ns1`, ...
fn fresh_prefix(scopes: &[NamespaceMap], decls: &NamespaceMap, uri: &str) -> String {
    if let Some(prefix) = well_known_prefix(uri) {
        if lookup(scopes, decls, prefix).is_none() {
            return prefix.to_string();
        }
    }
    (0..)
        .map(|n| format!("ns{}", n))
        .find(|p| lookup(scopes, decls, p).is_none())
        .unwrap_or_default()
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let xml = XmlSerializer::default().to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::XmlParser;

    #[test]
    fn test_serialize_roundtrip_declarations() {
        let xml = r#"<rpc-reply xmlns="urn:ietf:params:xml:ns:netconf:base:1.0" xmlns:junos="http://xml.juniper.net/junos/21.4R0/junos"><ok junos:style="brief"/></rpc-reply>"#;
        let root = XmlParser::parse(xml).unwrap();
        assert_eq!(root.to_string(), xml);
    }

    #[test]
    fn test_serialize_escapes_text_and_attributes() {
        let mut root = Element::new("description");
        root.set_attribute("note", "a \"b\"");
        root.set_text("x < y & z");
        assert_eq!(
            root.to_string(),
            r#"<description note="a &quot;b&quot;">x &lt; y &amp; z</description>"#
        );
    }

    #[test]
    fn test_serialize_declares_clark_names() {
        let mut root = Element::new(format!("{{{}}}rpc-reply", ns::NETCONF));
        root.set_attribute("{http://xml.juniper.net/junos/21.4R0/junos}style", "brief");
        root.append(Element::new("configuration"));
        assert_eq!(
            root.to_string(),
            r#"<rpc-reply xmlns="urn:ietf:params:xml:ns:netconf:base:1.0" xmlns:junos="http://xml.juniper.net/junos/21.4R0/junos" junos:style="brief"><configuration xmlns=""/></rpc-reply>"#
        );
    }

    #[test]
    fn test_serialize_stripped_tags_drop_default() {
        let xml = r#"<rpc-reply xmlns="urn:ietf:params:xml:ns:netconf:base:1.0"><ok/></rpc-reply>"#;
        let mut root = XmlParser::parse(xml).unwrap();
        root.for_each_mut(&mut |e| {
            let local = e.local_name().to_string();
            e.tag = local;
        });
        assert_eq!(root.to_string(), "<rpc-reply><ok/></rpc-reply>");
    }

    #[test]
    fn test_serialize_options() {
        let mut root = Element::new("a");
        root.append(Element::new("b"));
        let serializer = XmlSerializer::new(SerializeOptions {
            indent: Some(2),
            xml_declaration: true,
        });
        let out = serializer.to_string(&root).unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains("\n  <b/>"));
    }

    #[test]
    fn test_serialize_comments() {
        let serializer = XmlSerializer::default();
        let mut root = Element::new("configuration");
        root.children.push(Node::Comment(" edited by ops - r1 ".to_string()));
        assert_eq!(
            serializer.to_string(&root).unwrap(),
            "<configuration><!-- edited by ops - r1 --></configuration>"
        );

        for bad in ["a--b", "ends-", "-"] {
            let mut root = Element::new("configuration");
            root.children.push(Node::Comment(bad.to_string()));
            assert!(matches!(
                serializer.to_string(&root),
                Err(JxmlError::SerializationError(_))
            ));
        }
    }

    #[test]
    fn test_serialize_rejects_invalid_names() {
        let serializer = XmlSerializer::default();
        assert!(serializer.to_string(&Element::new("bad tag")).is_err());
        assert!(serializer.to_string(&Element::new("")).is_err());
        let mut root = Element::new("a");
        root.set_attribute("1x", "v");
        assert!(serializer.to_string(&root).is_err());
    }
}
