//! Extraction of `<rpc-error>` details
//!
//! A failed Junos RPC answers with an `<rpc-error>`, usually wrapped in an
//! `<rpc-reply>`:
//!
//! ```text
//! <rpc-reply xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
//!   <rpc-error>
//!     <error-severity>error</error-severity>
//!     <source-daemon>dcd</source-daemon>
//!     <error-path>[edit interfaces]</error-path>
//!     <error-info><bad-element>ge-0/0/99</bad-element></error-info>
//!     <error-message>syntax error</error-message>
//!   </rpc-error>
//! </rpc-reply>
//! ```
//!
//! [`rpc_error`] flattens those fields into an [`RpcErrorRecord`].

use crate::core::element::Element;
use crate::core::error::JxmlResult;
use crate::core::parser::XmlParser;
use crate::junos::transform::remove_namespaces;
use std::fmt;

/// The fields of an `<rpc-error>`, `None` where the element is missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RpcErrorRecord {
    /// `error-severity`
    pub severity: Option<String>,
    /// `source-daemon`
    pub source: Option<String>,
    /// `error-path`
    pub edit_path: Option<String>,
    /// `error-info/bad-element`
    pub bad_element: Option<String>,
    /// `error-message`
    pub message: Option<String>,
}

impl RpcErrorRecord {
    /// Parse an `<rpc-error>` or `<rpc-reply>` document and extract its fields
    pub fn from_xml(xml: &str) -> JxmlResult<Self> {
        let mut root = XmlParser::parse(xml)?;
        Ok(rpc_error(&mut root))
    }

    /// Whether the device reported this as a warning rather than an error
    pub fn is_warning(&self) -> bool {
        self.severity.as_deref() == Some("warning")
    }
}

impl fmt::Display for RpcErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.severity.as_deref().unwrap_or("error"),
            self.message.as_deref().unwrap_or("unknown error")
        )?;
        if let Some(bad_element) = &self.bad_element {
            write!(f, " (bad element: {})", bad_element)?;
        }
        if let Some(edit_path) = &self.edit_path {
            write!(f, " at {}", edit_path)?;
        }
        Ok(())
    }
}

/// Extract the fields of an `<rpc-error>` into a record
///
/// Namespaces are stripped from `rpc_xml` in place first. When the root is
/// an `<rpc-reply>`, its first child element is taken as the error. Missing
/// fields are `None`; a found element without text gives an empty string.
/// Unexpected shapes give a record of `None`s.
pub fn rpc_error(rpc_xml: &mut Element) -> RpcErrorRecord {
    remove_namespaces(rpc_xml);

    let error = if rpc_xml.tag == "rpc-reply" {
        rpc_xml.first_element()
    } else {
        Some(&*rpc_xml)
    };
    let Some(error) = error else {
        return RpcErrorRecord::default();
    };

    let find_strip = |path: &str| -> Option<String> {
        error
            .find(path)
            .ok()
            .flatten()
            .map(|e| e.text().unwrap_or_default().trim().to_string())
    };

    RpcErrorRecord {
        severity: find_strip("error-severity"),
        source: find_strip("source-daemon"),
        edit_path: find_strip("error-path"),
        bad_element: find_strip("error-info/bad-element"),
        message: find_strip("error-message"),
    }
}
