//! # JXMLKit
//!
//! XML helpers for driving Junos devices over NETCONF.
//!
//! The crate works on replies that a NETCONF client has already received;
//! it does not open sessions itself. It provides:
//!
//! - edit-operation attributes such as [`junos::ops::DEL`] and
//!   [`junos::ops::BEFORE`] for `<load-configuration>` payloads
//! - [`rpc_error`] to flatten an `<rpc-error>` into an [`RpcErrorRecord`]
//! - [`remove_namespaces`] and the [`NORMALIZE`] transform
//! - [`conf_transform`] to cut one configuration stanza out of a larger tree
//! - [`cscript_conf`] to render an on-box commit script reply
//!
//! ## Quick Start
//!
//! ```rust
//! use jxmlkit::{rpc_error, XmlParser};
//!
//! let reply = r#"<rpc-reply xmlns="urn:ietf:params:xml:ns:netconf:base:1.0">
//!   <rpc-error>
//!     <error-severity>error</error-severity>
//!     <error-message>syntax error</error-message>
//!   </rpc-error>
//! </rpc-reply>"#;
//!
//! let mut root = XmlParser::parse(reply)?;
//! let err = rpc_error(&mut root);
//! assert_eq!(err.message.as_deref(), Some("syntax error"));
//! # Ok::<(), jxmlkit::JxmlError>(())
//! ```

pub mod core;
pub mod junos;
pub mod types;

// Re-export main types for convenience
pub use crate::core::{
    Element, JxmlError, JxmlResult, NamespaceMap, Node, SerializeOptions, XPath, XmlParser,
    XmlSerializer,
};
pub use junos::{
    conf_transform, cscript_conf, remove_namespaces, rpc_error, CscriptError, OpAttrs,
    RpcErrorRecord, SubtreeSelection, TreeTransform, NORMALIZE,
};
pub use types::Attribute;
