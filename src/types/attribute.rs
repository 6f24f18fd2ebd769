//! Attribute type for XML elements
//!
//! Attribute names follow the same convention as element tags: a plain
//! name for un-namespaced attributes, Clark notation (`{uri}local`) otherwise.

use std::fmt;

/// A single attribute on an XML element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    /// The attribute name, possibly in Clark notation
    pub name: String,
    /// The unescaped attribute value
    pub value: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Get the local part of the attribute name
    pub fn local_name(&self) -> &str {
        crate::core::namespace::local_name(&self.name)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_new() {
        let attr = Attribute::new("inactive", "inactive");
        assert_eq!(attr.name, "inactive");
        assert_eq!(attr.value, "inactive");
    }

    #[test]
    fn test_attribute_local_name() {
        let attr = Attribute::new("{http://xml.juniper.net/junos/*/junos}changed", "x");
        assert_eq!(attr.local_name(), "changed");
        assert_eq!(attr.to_string(), "{http://xml.juniper.net/junos/*/junos}changed=\"x\"");
    }
}
