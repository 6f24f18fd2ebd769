//! Tests for commit script reply rendering

use jxmlkit::junos::cscript::{
    cscript_conf_with, make_device_handler, DefaultDeviceHandler, DeviceParams,
};
use jxmlkit::{cscript_conf, CscriptError, Element, XmlParser};
use pretty_assertions::assert_eq;

const CONFIGURATION: &str = include_str!("fixtures/configuration.xml");

fn configuration() -> Element {
    let reply = XmlParser::parse(CONFIGURATION).unwrap();
    reply.first_element().unwrap().clone()
}

#[test]
fn configuration_without_namespaces() {
    let doc = cscript_conf(&configuration()).unwrap();

    assert_eq!(doc.tag, "configuration");
    assert_eq!(doc.get_attribute("commit-user"), Some("admin"));
    assert_eq!(doc.get_attribute("commit-seconds"), Some("1700000000"));
    assert!(doc.iter().all(|e| e.namespaces.is_empty() && !e.tag.starts_with('{')));
    assert_eq!(doc.findtext("system/host-name").unwrap().as_deref(), Some("r1"));
    assert_eq!(
        doc.find("interfaces/interface[name='ge-0/0/1']")
            .unwrap()
            .unwrap()
            .get_attribute("inactive"),
        Some("inactive")
    );
}

#[test]
fn rendered_configuration_serializes_plain() {
    let doc = cscript_conf(&configuration()).unwrap();
    let xml = doc.to_string();

    assert!(xml.starts_with("<configuration commit-seconds=\"1700000000\""));
    assert!(!xml.contains("xmlns"));
}

#[test]
fn whole_reply() {
    let reply = XmlParser::parse(CONFIGURATION).unwrap();
    let doc = cscript_conf(&reply).unwrap();

    assert_eq!(doc.tag, "rpc-reply");
    assert_eq!(doc.findtext("configuration/version").unwrap().as_deref(), Some("21.4R3.15"));
}

#[test]
fn unusable_reply_gives_none() {
    assert!(cscript_conf(&Element::new("bad tag")).is_none());
}

#[test]
fn explicit_handlers() {
    let reply = configuration();

    let junos = make_device_handler(&DeviceParams::junos()).unwrap();
    assert_eq!(
        cscript_conf_with(junos.as_ref(), &reply).unwrap(),
        cscript_conf(&reply).unwrap()
    );
    assert!(matches!(
        cscript_conf_with(&DefaultDeviceHandler, &reply),
        Err(CscriptError::NoReplyTransform { device }) if device == "default"
    ));
}
