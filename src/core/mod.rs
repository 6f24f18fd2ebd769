//! XML Core module
//!
//! This module contains the XML substrate the Junos helpers work on:
//! an owned element tree, parsing, serialization and XPath selection.

pub mod element;
pub mod error;
pub mod namespace;
pub mod parser;
pub mod serializer;
pub mod xpath;

pub use element::{Descendants, Element, Node};
pub use error::{JxmlError, JxmlResult};
pub use namespace::{clark, local_name, split_clark, NamespaceMap};
pub use parser::XmlParser;
pub use serializer::{SerializeOptions, XmlSerializer};
pub use xpath::{Axis, NameTest, Predicate, Step, XPath};
