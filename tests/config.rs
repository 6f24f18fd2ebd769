//! Tests for configuration sub-tree selection and edit attributes

use jxmlkit::{conf_transform, remove_namespaces, Element, XmlParser};

const CONFIGURATION: &str = include_str!("fixtures/configuration.xml");

fn stripped_config() -> Element {
    let mut reply = XmlParser::parse(CONFIGURATION).unwrap();
    remove_namespaces(&mut reply);
    reply
}

mod subtree {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_interface() {
        let doc = stripped_config();
        let out = conf_transform(
            &doc,
            "rpc-reply/configuration/interfaces/interface[name='ge-0/0/0']",
        )
        .unwrap()
        .unwrap();

        let config = out.find("configuration").unwrap().unwrap();
        assert_eq!(
            config.elements().map(|e| e.tag.as_str()).collect::<Vec<_>>(),
            vec!["interfaces"]
        );
        let interfaces = out.find_all("configuration/interfaces/interface").unwrap();
        assert_eq!(interfaces.len(), 1);
        assert_eq!(
            out.findtext("configuration/interfaces/interface/unit/family/inet/address/name")
                .unwrap()
                .as_deref(),
            Some("192.0.2.1/31")
        );
    }

    #[test]
    fn ancestors_keep_attributes() {
        let doc = stripped_config();
        let out = conf_transform(&doc, "//system/host-name").unwrap().unwrap();

        let config = out.find("configuration").unwrap().unwrap();
        assert_eq!(
            config.get_attribute("{http://xml.juniper.net/junos/21.4R0/junos}commit-user"),
            Some("admin")
        );
        assert_eq!(config.text(), None);
        assert_eq!(out.findtext("configuration/system/host-name").unwrap().as_deref(), Some("r1"));
        assert!(out.find("configuration/system/services").unwrap().is_none());
        assert!(out.find("configuration/version").unwrap().is_none());
    }

    #[test]
    fn several_selections_share_ancestors() {
        let doc = stripped_config();
        let out = conf_transform(&doc, "//interfaces/interface/name").unwrap().unwrap();

        let names: Vec<String> = out
            .find_all("configuration/interfaces/interface/name")
            .unwrap()
            .into_iter()
            .map(|e| e.string_value())
            .collect();
        assert_eq!(names, vec!["ge-0/0/0", "ge-0/0/1", "lo0"]);
        assert!(out.find("configuration/protocols").unwrap().is_none());
        assert!(out.find("configuration/interfaces/interface/unit").unwrap().is_none());
    }

    #[test]
    fn nothing_selected() {
        let doc = stripped_config();
        assert!(conf_transform(&doc, "rpc-reply/configuration/snmp").unwrap().is_none());
    }

    #[test]
    fn namespaced_tags_are_not_matched_by_local_names() {
        let doc = XmlParser::parse(CONFIGURATION).unwrap();
        assert!(conf_transform(&doc, "rpc-reply/configuration").unwrap().is_none());
    }
}

mod edits {
    use super::*;
    use pretty_assertions::assert_eq;
    use jxmlkit::junos::ops::{self, AFTER, DEACTIVATE, DEL, REPLACE};

    #[test]
    fn build_edit_configuration() {
        let mut old = Element::new("interface");
        DEL.apply_to(&mut old);
        old.append(Element::with_text("name", "ge-0/0/1"));

        let mut lo = Element::new("interface");
        REPLACE.merge(&DEACTIVATE).apply_to(&mut lo);
        lo.append(Element::with_text("name", "lo0"));

        let mut interfaces = Element::new("interfaces");
        interfaces.append(old).append(lo);
        let mut config = Element::new("configuration");
        config.append(interfaces);

        assert_eq!(
            config.to_string(),
            "<configuration><interfaces>\
<interface delete=\"delete\"><name>ge-0/0/1</name></interface>\
<interface replace=\"replace\" inactive=\"inactive\"><name>lo0</name></interface>\
</interfaces></configuration>"
        );
    }

    #[test]
    fn reorder_term() {
        let mut term = Element::new("term");
        AFTER.merge(&ops::name("allow-ssh")).apply_to(&mut term);
        term.append(Element::with_text("name", "allow-netconf"));

        assert_eq!(
            term.to_string(),
            r#"<term insert="after" name="allow-ssh"><name>allow-netconf</name></term>"#
        );
        assert_eq!(AFTER.len(), 1);
    }
}
