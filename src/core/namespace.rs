//! Namespace handling for XML trees
//!
//! Element tags and attribute names carry their namespace in Clark notation,
//! `{uri}local`, the same way lxml reports them. This module provides the
//! helpers for that notation, the well-known Junos namespaces, and the
//! per-element map of namespace declarations seen in a parsed document.

use crate::core::error::{JxmlError, JxmlResult};

/// Well-known namespaces in Junos NETCONF replies
pub mod ns {
    /// NETCONF base namespace
    pub const NETCONF: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";
    /// Junos XML management namespace
    pub const XNM: &str = "http://xml.juniper.net/xnm/1.1/xnm";
    /// Junos commit script namespace
    pub const JCS: &str = "http://xml.juniper.net/junos/commit-scripts/1.0";
    /// XML namespace (for xml:lang, etc.)
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    /// Prefix of the versioned Junos namespace, e.g. `http://xml.juniper.net/junos/21.4R0/junos`
    pub const JUNOS_PREFIX_URI: &str = "http://xml.juniper.net/junos/";
    /// NETCONF prefix
    pub const NETCONF_PREFIX: &str = "nc";
    /// XNM prefix
    pub const XNM_PREFIX: &str = "xnm";
    /// Commit script prefix
    pub const JCS_PREFIX: &str = "jcs";
    /// Junos prefix
    pub const JUNOS_PREFIX: &str = "junos";
    /// XML prefix
    pub const XML_PREFIX: &str = "xml";
}

/// Split a name in Clark notation into its namespace URI and local part
///
/// Names without a `{uri}` part return `None` for the namespace.
pub fn split_clark(name: &str) -> (Option<&str>, &str) {
    if let Some(rest) = name.strip_prefix('{') {
        if let Some(end) = rest.find('}') {
            return (Some(&rest[..end]), &rest[end + 1..]);
        }
    }
    (None, name)
}

/// Get the local part of a name in Clark notation
pub fn local_name(name: &str) -> &str {
    split_clark(name).1
}

/// Build a Clark notation name from a namespace URI and local name
///
/// An empty URI yields the bare local name.
pub fn clark(uri: &str, local: &str) -> String {
    if uri.is_empty() {
        local.to_string()
    } else {
        format!("{{{}}}{}", uri, local)
    }
}

/// Get the conventional prefix for a well-known namespace URI
pub fn well_known_prefix(uri: &str) -> Option<&'static str> {
    match uri {
        ns::NETCONF => Some(ns::NETCONF_PREFIX),
        ns::XNM => Some(ns::XNM_PREFIX),
        ns::JCS => Some(ns::JCS_PREFIX),
        ns::XML => Some(ns::XML_PREFIX),
        _ if uri.starts_with(ns::JUNOS_PREFIX_URI) && uri.ends_with("/junos") => {
            Some(ns::JUNOS_PREFIX)
        }
        _ => None,
    }
}

/// Namespace declarations made on a single element
///
/// The empty prefix stands for the default namespace (`xmlns="..."`).
/// Declarations keep document order so serialization reproduces them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    decls: Vec<(String, String)>,
}

impl NamespaceMap {
    /// Create an empty namespace map
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a namespace URI for a prefix
    ///
    /// # Returns
    ///
    /// Returns an error if the prefix is already declared to a different URI
    pub fn declare(&mut self, prefix: &str, uri: &str) -> JxmlResult<()> {
        if let Some(existing_uri) = self.get_uri(prefix) {
            if existing_uri != uri {
                return Err(JxmlError::BadParam(format!(
                    "Prefix '{}' is already declared to '{}'",
                    prefix, existing_uri
                )));
            }
            return Ok(());
        }

        self.decls.push((prefix.to_string(), uri.to_string()));
        Ok(())
    }

    /// Remove the declaration for a prefix, returning its URI
    pub fn remove(&mut self, prefix: &str) -> Option<String> {
        let pos = self.decls.iter().position(|(p, _)| p == prefix)?;
        Some(self.decls.remove(pos).1)
    }

    /// Get the URI declared for a prefix
    pub fn get_uri(&self, prefix: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, u)| u.as_str())
    }

    /// Get the first prefix declared for a URI
    pub fn get_prefix(&self, uri: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|(_, u)| u == uri)
            .map(|(p, _)| p.as_str())
    }

    /// Check if a prefix is declared
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.get_uri(prefix).is_some()
    }

    /// Iterate over `(prefix, uri)` declarations in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decls.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Check if there are no declarations
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_clark() {
        assert_eq!(
            split_clark("{urn:ietf:params:xml:ns:netconf:base:1.0}rpc-reply"),
            (Some(ns::NETCONF), "rpc-reply")
        );
        assert_eq!(split_clark("rpc-reply"), (None, "rpc-reply"));
        // an unterminated brace is not a namespace
        assert_eq!(split_clark("{broken"), (None, "{broken"));
    }

    #[test]
    fn test_clark_roundtrip() {
        assert_eq!(clark(ns::XNM, "error"), format!("{{{}}}error", ns::XNM));
        assert_eq!(clark("", "error"), "error");
        assert_eq!(local_name(&clark(ns::XNM, "error")), "error");
    }

    #[test]
    fn test_well_known_prefix() {
        assert_eq!(well_known_prefix(ns::NETCONF), Some("nc"));
        assert_eq!(
            well_known_prefix("http://xml.juniper.net/junos/21.4R0/junos"),
            Some("junos")
        );
        assert_eq!(well_known_prefix(ns::JCS), Some("jcs"));
        assert_eq!(well_known_prefix("http://example.com/ns"), None);
    }

    #[test]
    fn test_namespace_map_declare() {
        let mut map = NamespaceMap::new();
        assert!(map.declare("", ns::NETCONF).is_ok());
        assert!(map.declare("junos", "http://xml.juniper.net/junos/*/junos").is_ok());
        assert_eq!(map.get_uri(""), Some(ns::NETCONF));
        assert_eq!(map.get_prefix(ns::NETCONF), Some(""));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_namespace_map_conflicting_prefix() {
        let mut map = NamespaceMap::new();
        assert!(map.declare("ex", "http://example.com/ns1").is_ok());
        assert!(map.declare("ex", "http://example.com/ns1").is_ok());
        assert!(map.declare("ex", "http://example.com/ns2").is_err());
        assert_eq!(map.remove("ex").as_deref(), Some("http://example.com/ns1"));
        assert!(map.is_empty());
    }
}
