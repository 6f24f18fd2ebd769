//! XML tree types
//!
//! This module defines the owned tree used throughout the crate:
//! - Element: a tagged element with attributes, namespace declarations and children
//! - Node: a child of an element (element, text, comment or processing instruction)
//!
//! Tags of namespaced elements are stored in Clark notation (`{uri}local`).

use crate::core::error::JxmlResult;
use crate::core::namespace::{local_name, NamespaceMap};
use crate::core::xpath::XPath;
use crate::types::attribute::Attribute;

/// A node in the XML tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A child element
    Element(Element),
    /// Character data (already unescaped)
    Text(String),
    /// A comment
    Comment(String),
    /// A processing instruction
    ProcessingInstruction {
        /// The PI target
        target: String,
        /// The PI content after the target
        content: String,
    },
}

impl Node {
    /// Create a new text node
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Get the element, if this is an element node
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Get a mutable reference to the element, if this is an element node
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Get the text, if this is a text node
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An XML element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Element tag, plain or in Clark notation
    pub tag: String,
    /// Attributes in document order
    pub attributes: Vec<Attribute>,
    /// Namespace declarations made on this element
    pub namespaces: NamespaceMap,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create a new empty element
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Create a new element holding a single text node
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(tag);
        element.children.push(Node::Text(text.into()));
        element
    }

    /// Copy of this element without its children
    pub fn shallow_clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attributes: self.attributes.clone(),
            namespaces: self.namespaces.clone(),
            children: Vec::new(),
        }
    }

    /// Local part of the tag
    pub fn local_name(&self) -> &str {
        local_name(&self.tag)
    }

    /// Text before the first non-text child, like lxml's `.text`
    pub fn text(&self) -> Option<&str> {
        self.children.first().and_then(Node::as_text)
    }

    /// Replace the leading text of this element
    pub fn set_text(&mut self, text: impl Into<String>) {
        match self.children.first_mut() {
            Some(Node::Text(existing)) => *existing = text.into(),
            _ => self.children.insert(0, Node::Text(text.into())),
        }
    }

    /// Concatenation of all descendant text, the XPath string-value
    pub fn string_value(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
                _ => {}
            }
        }
    }

    /// Get an attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Check if an attribute is present
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Set an attribute, overwriting an existing value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    /// Remove an attribute, returning its value
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(pos).value)
    }

    /// Append a child element, returning `self` so appends can be chained
    pub fn append(&mut self, child: Element) -> &mut Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Append text, merging with a trailing text node
    pub fn append_text(&mut self, text: &str) {
        match self.children.last_mut() {
            Some(Node::Text(existing)) => existing.push_str(text),
            _ => self.children.push(Node::Text(text.to_string())),
        }
    }

    /// Iterate over child elements
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Iterate mutably over child elements
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// First child element, like lxml's `element[0]`
    pub fn first_element(&self) -> Option<&Element> {
        self.elements().next()
    }

    /// Depth-first iterator over this element and all descendant elements
    pub fn iter(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Visit this element and all descendant elements depth-first
    pub fn for_each_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        f(self);
        for child in self.elements_mut() {
            child.for_each_mut(f);
        }
    }

    /// Element at a location produced by XPath evaluation
    ///
    /// A location is the list of child indices (into `children`) leading
    /// from this element down to the target; the empty location is `self`.
    pub fn at(&self, location: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &index in location {
            current = current.children.get(index)?.as_element()?;
        }
        Some(current)
    }

    /// First element matching a path relative to this element
    pub fn find(&self, path: &str) -> JxmlResult<Option<&Element>> {
        let xpath = XPath::parse(path)?;
        Ok(xpath
            .select_from(self)
            .into_iter()
            .next()
            .and_then(|loc| self.at(&loc)))
    }

    /// All elements matching a path relative to this element, in document order
    pub fn find_all(&self, path: &str) -> JxmlResult<Vec<&Element>> {
        let xpath = XPath::parse(path)?;
        Ok(xpath
            .select_from(self)
            .iter()
            .filter_map(|loc| self.at(loc))
            .collect())
    }

    /// Text of the first matching element
    ///
    /// A matching element without text yields an empty string.
    pub fn findtext(&self, path: &str) -> JxmlResult<Option<String>> {
        Ok(self
            .find(path)?
            .map(|e| e.text().unwrap_or_default().to_string()))
    }
}

/// Depth-first, document-order iterator over elements
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack
            .extend(current.children.iter().rev().filter_map(Node::as_element));
        Some(current)
    }
}
