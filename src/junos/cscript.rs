//! Commit script configuration replies
//!
//! On-box commit scripts receive the candidate configuration as a reply
//! that still carries the device's namespaces. [`cscript_conf`] renders it
//! the way a NETCONF client renders an RPC reply: through the Junos device
//! handler's reply transform, wrapped in an [`NcElement`].
//!
//! [`cscript_conf`] is best-effort and answers `None` on any failure;
//! [`try_cscript_conf`] reports why.

use crate::core::element::Element;
use crate::core::error::{JxmlError, JxmlResult};
use crate::core::parser::XmlParser;
use crate::core::serializer::XmlSerializer;
use crate::junos::transform::{TreeTransform, STRIP_NAMESPACES};
use log::debug;
use std::fmt;
use thiserror::Error;

/// Why a commit script reply could not be rendered
#[derive(Debug, Error)]
pub enum CscriptError {
    /// No device handler exists for the requested device name
    #[error("Unknown device handler '{0}'")]
    UnknownDevice(String),

    /// The device handler has no reply transform
    #[error("Device handler '{device}' has no reply transform")]
    NoReplyTransform { device: String },

    /// The reply could not be serialized
    #[error("Failed to serialize reply: {0}")]
    Serialize(#[source] JxmlError),

    /// The serialized reply could not be parsed back
    #[error("Failed to parse reply: {0}")]
    Parse(#[source] JxmlError),

    /// The reply transform failed
    #[error("Reply transform failed: {0}")]
    Transform(#[source] JxmlError),

    /// The reply transform produced no document
    #[error("Reply transform produced an empty document")]
    EmptyDocument,
}

/// Parameters selecting a device handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceParams {
    pub name: String,
}

impl DeviceParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// `{name: "junos"}`
    pub fn junos() -> Self {
        Self::new("junos")
    }
}

/// Vendor-specific handling of NETCONF replies
pub trait DeviceHandler: Send + Sync {
    /// Handler name, as given in [`DeviceParams`]
    fn name(&self) -> &str;

    /// Transform applied to every reply, if the device needs one
    fn transform_reply(&self) -> Option<&dyn TreeTransform>;

    /// Parse a serialized reply and apply the reply transform
    fn wrap_reply(&self, reply: &str) -> Result<NcElement, CscriptError> {
        let transform = self
            .transform_reply()
            .ok_or_else(|| CscriptError::NoReplyTransform {
                device: self.name().to_string(),
            })?;
        NcElement::new(reply, transform)
    }
}

/// Junos: replies are rebuilt without namespaces
#[derive(Debug, Default, Clone, Copy)]
pub struct JunosDeviceHandler;

impl DeviceHandler for JunosDeviceHandler {
    fn name(&self) -> &str {
        "junos"
    }

    fn transform_reply(&self) -> Option<&dyn TreeTransform> {
        Some(&STRIP_NAMESPACES)
    }
}

/// Generic NETCONF device without reply post-processing
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDeviceHandler;

impl DeviceHandler for DefaultDeviceHandler {
    fn name(&self) -> &str {
        "default"
    }

    fn transform_reply(&self) -> Option<&dyn TreeTransform> {
        None
    }
}

/// Look up the device handler for `params`
pub fn make_device_handler(params: &DeviceParams) -> Result<Box<dyn DeviceHandler>, CscriptError> {
    let handler: Box<dyn DeviceHandler> = match params.name.to_ascii_lowercase().as_str() {
        "junos" => Box::new(JunosDeviceHandler),
        "default" => Box::new(DefaultDeviceHandler),
        _ => return Err(CscriptError::UnknownDevice(params.name.clone())),
    };
    debug!("using device handler '{}'", handler.name());
    Ok(handler)
}

/// A parsed reply after the device's reply transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NcElement {
    doc: Element,
}

impl NcElement {
    /// Parse `reply` and run it through `transform`
    pub fn new(reply: &str, transform: &dyn TreeTransform) -> Result<Self, CscriptError> {
        let root = XmlParser::parse(reply).map_err(CscriptError::Parse)?;
        let doc = transform
            .transform(&root)
            .map_err(CscriptError::Transform)?
            .ok_or(CscriptError::EmptyDocument)?;
        Ok(Self { doc })
    }

    /// The transformed document
    pub fn doc(&self) -> &Element {
        &self.doc
    }

    pub fn into_doc(self) -> Element {
        self.doc
    }

    pub fn find(&self, path: &str) -> JxmlResult<Option<&Element>> {
        self.doc.find(path)
    }

    pub fn findtext(&self, path: &str) -> JxmlResult<Option<String>> {
        self.doc.findtext(path)
    }
}

impl fmt::Display for NcElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.doc, f)
    }
}

/// Render a commit script reply with an explicit device handler
pub fn cscript_conf_with(handler: &dyn DeviceHandler, reply: &Element) -> Result<Element, CscriptError> {
    let xml = XmlSerializer::default()
        .to_string(reply)
        .map_err(CscriptError::Serialize)?;
    Ok(handler.wrap_reply(&xml)?.into_doc())
}

/// Render a commit script reply with the Junos device handler
pub fn try_cscript_conf(reply: &Element) -> Result<Element, CscriptError> {
    let handler = make_device_handler(&DeviceParams::junos())?;
    cscript_conf_with(handler.as_ref(), reply)
}

/// Render a commit script reply, or `None` if that fails for any reason
pub fn cscript_conf(reply: &Element) -> Option<Element> {
    match try_cscript_conf(reply) {
        Ok(doc) => Some(doc),
        Err(e) => {
            debug!("commit script reply discarded: {}", e);
            None
        }
    }
}
