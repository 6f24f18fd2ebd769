//! Junos NETCONF helpers
//!
//! Edit-operation attributes, `<rpc-error>` extraction, configuration
//! sub-tree selection and commit script reply rendering.

pub mod cscript;
pub mod ops;
pub mod rpc_error;
pub mod transform;

pub use cscript::{
    cscript_conf, cscript_conf_with, make_device_handler, try_cscript_conf, CscriptError,
    DefaultDeviceHandler, DeviceHandler, DeviceParams, JunosDeviceHandler, NcElement,
};
pub use ops::OpAttrs;
pub use rpc_error::{rpc_error, RpcErrorRecord};
pub use transform::{
    conf_transform, remove_namespaces, Normalize, SubtreeSelection, TreeTransform, CONF_XSLT,
    NORMALIZE, NORMALIZE_XSLT, STRIP_NAMESPACES,
};
