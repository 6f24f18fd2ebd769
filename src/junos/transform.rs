//! Tree transforms for Junos replies
//!
//! - [`remove_namespaces`] strips namespaces from element tags in place
//! - [`Normalize`] rebuilds a tree with local names only and, optionally,
//!   collapsed whitespace ([`NORMALIZE`], [`STRIP_NAMESPACES`])
//! - [`SubtreeSelection`] prunes a configuration document down to one
//!   selected stanza and its ancestors ([`conf_transform`])
//!
//! The transforms implement [`TreeTransform`], the seam where an XSLT
//! engine would otherwise sit. [`CONF_XSLT`] and [`NORMALIZE_XSLT`] carry
//! the equivalent XSLT 1.0 stylesheets for tools that run them on-box.

use crate::core::element::{Element, Node};
use crate::core::error::JxmlResult;
use crate::core::namespace::local_name;
use crate::core::xpath::XPath;
use log::trace;
use std::collections::BTreeSet;

/// XSLT 1.0 equivalent of [`SubtreeSelection`]
pub const CONF_XSLT: &str = r#"<xsl:stylesheet xmlns:xsl="http://www.w3.org/1999/XSL/Transform" version="1.0">
    <xsl:output method="xml" indent="yes"/>
    <xsl:strip-space elements="*"/>

    <xsl:param name="subSelectionXPath" />

    <xsl:template match="/">
        <xsl:apply-templates
            select="$subSelectionXPath/ancestor::*[position()=last()]"/>
    </xsl:template>

    <xsl:template match="*">
        <xsl:choose>
            <xsl:when test="$subSelectionXPath/ancestor::*
                [generate-id() = generate-id(current())]">
                <xsl:copy>
                    <xsl:copy-of select="@*"/>
                    <xsl:choose>
                        <xsl:when test="generate-id(.)=
                            generate-id($subSelectionXPath/ancestor::*[1])">
                            <xsl:copy-of select="$subSelectionXPath"/>
                        </xsl:when>
                        <xsl:otherwise>
                            <xsl:apply-templates select="*"/>
                        </xsl:otherwise>
                    </xsl:choose>
                </xsl:copy>
            </xsl:when>
            <xsl:otherwise/>
        </xsl:choose>
    </xsl:template>
</xsl:stylesheet>"#;

/// XSLT 1.0 equivalent of [`NORMALIZE`]
pub const NORMALIZE_XSLT: &str = r#"<xsl:stylesheet version="1.0" xmlns:xsl="http://www.w3.org/1999/XSL/Transform">
    <xsl:output method="xml" indent="no"/>

    <xsl:template match="/|comment()|processing-instruction()">
        <xsl:copy>
            <xsl:apply-templates/>
        </xsl:copy>
    </xsl:template>

    <xsl:template match="*">
        <xsl:element name="{local-name()}">
            <xsl:apply-templates select="@*|node()"/>
        </xsl:element>
    </xsl:template>

    <xsl:template match="@*">
        <xsl:attribute name="{local-name()}">
            <xsl:value-of select="."/>
        </xsl:attribute>
    </xsl:template>

    <xsl:template match="text()">
        <xsl:value-of select="normalize-space(.)"/>
    </xsl:template>
</xsl:stylesheet>"#;

/// A document-to-document transform
///
/// `Ok(None)` is an empty result document.
pub trait TreeTransform: Send + Sync {
    fn transform(&self, doc: &Element) -> JxmlResult<Option<Element>>;
}

/// Strip the namespace from every element tag, in place
///
/// Visits `xml` and all its descendants; a tag such as `{uri}rpc-reply`
/// becomes `rpc-reply`. Attributes and namespace declarations are left as
/// they are. Applying it twice is the same as applying it once.
pub fn remove_namespaces(xml: &mut Element) -> &mut Element {
    xml.for_each_mut(&mut |elem| {
        if let Some(i) = elem.tag.find('}') {
            if i > 0 {
                elem.tag.drain(..=i);
            }
        }
    });
    xml
}

/// Rebuild a tree using local names only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalize {
    /// Apply XPath `normalize-space` to text, dropping text that ends up empty
    pub collapse_whitespace: bool,
}

/// Local names with collapsed whitespace
pub static NORMALIZE: Normalize = Normalize::new(true);

/// Local names with text kept as-is
pub static STRIP_NAMESPACES: Normalize = Normalize::new(false);

impl Normalize {
    pub const fn new(collapse_whitespace: bool) -> Self {
        Self {
            collapse_whitespace,
        }
    }

    fn rebuild(&self, element: &Element) -> Element {
        let mut out = Element::new(local_name(&element.tag));
        for attr in &element.attributes {
            out.set_attribute(attr.local_name(), attr.value.as_str());
        }
        for child in &element.children {
            match child {
                Node::Element(child) => {
                    out.append(self.rebuild(child));
                }
                Node::Text(text) if self.collapse_whitespace => {
                    let collapsed = normalize_space(text);
                    if !collapsed.is_empty() {
                        out.append_text(&collapsed);
                    }
                }
                Node::Text(text) => out.append_text(text),
                other => out.children.push(other.clone()),
            }
        }
        out
    }
}

impl Default for Normalize {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TreeTransform for Normalize {
    fn transform(&self, doc: &Element) -> JxmlResult<Option<Element>> {
        Ok(Some(self.rebuild(doc)))
    }
}

/// XPath `normalize-space`
fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prune a document to the selected elements and their ancestor chain
///
/// Every ancestor of a selected element is copied with its attributes but
/// without text, and only those of its children that lead to a selection
/// are kept. Selected elements are copied with their whole subtree, minus
/// whitespace-only text. The XPath is evaluated against the document node,
/// so `configuration/system` and `/configuration/system` are equivalent.
///
/// Output is rooted at the topmost ancestor of the selection. The root
/// element has no ancestor, so it is dropped from the selection, and a
/// path selecting only the root yields no document.
#[derive(Debug, Clone)]
pub struct SubtreeSelection {
    xpath: XPath,
}

impl SubtreeSelection {
    /// Compile a selection for `xpath`
    pub fn new(xpath: &str) -> JxmlResult<Self> {
        Ok(Self {
            xpath: XPath::parse(xpath)?,
        })
    }

    /// The compiled selection path
    pub fn xpath(&self) -> &XPath {
        &self.xpath
    }

    fn prune(element: &Element, here: &mut Vec<usize>, selected: &BTreeSet<Vec<usize>>) -> Element {
        let mut out = element.shallow_clone();
        for (i, child) in element.children.iter().enumerate() {
            let Node::Element(child) = child else {
                continue;
            };
            here.push(i);
            if selected.contains(here.as_slice()) {
                out.append(strip_space(child));
            } else if leads_to_selection(here, selected) {
                out.append(Self::prune(child, here, selected));
            }
            here.pop();
        }
        out
    }
}

impl TreeTransform for SubtreeSelection {
    fn transform(&self, doc: &Element) -> JxmlResult<Option<Element>> {
        let mut selected: BTreeSet<Vec<usize>> =
            self.xpath.select_document(doc).into_iter().collect();
        trace!(
            "sub-tree selection '{}' matched {} element(s)",
            self.xpath.as_str(),
            selected.len()
        );

        selected.remove(&Vec::new());
        if selected.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::prune(doc, &mut Vec::new(), &selected)))
    }
}

/// Whether some selected location lies below `here`
fn leads_to_selection(here: &[usize], selected: &BTreeSet<Vec<usize>>) -> bool {
    selected
        .range(here.to_vec()..)
        .next()
        .is_some_and(|loc| loc.starts_with(here))
}

/// Deep copy without whitespace-only text nodes
fn strip_space(element: &Element) -> Element {
    let mut out = element.shallow_clone();
    for child in &element.children {
        match child {
            Node::Element(child) => {
                out.append(strip_space(child));
            }
            Node::Text(text) if text.trim().is_empty() => {}
            other => out.children.push(other.clone()),
        }
    }
    out
}

/// Select one configuration stanza, with its ancestors, out of `doc`
pub fn conf_transform(doc: &Element, xpath: &str) -> JxmlResult<Option<Element>> {
    SubtreeSelection::new(xpath)?.transform(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::XmlParser;

    const CONFIG: &str = r#"<configuration>
  <system><host-name>r1</host-name></system>
  <interfaces>
    <interface>
      <name>ge-0/0/0</name>
      <unit><name>0</name><family><inet/></family></unit>
    </interface>
    <interface inactive="inactive">
      <name>ge-0/0/1</name>
    </interface>
  </interfaces>
</configuration>"#;

    #[test]
    fn test_remove_namespaces_idempotent() {
        let xml = r#"<a:rpc-reply xmlns:a="urn:a" xmlns="urn:b"><data><a:x/></data></a:rpc-reply>"#;
        let mut once = XmlParser::parse(xml).unwrap();
        remove_namespaces(&mut once);
        let tags: Vec<String> = once.iter().map(|e| e.tag.clone()).collect();
        assert_eq!(tags, vec!["rpc-reply", "data", "x"]);

        let mut twice = once.clone();
        remove_namespaces(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_namespaces_plain_tags() {
        let mut root = Element::new("configuration");
        root.append(Element::new("system"));
        let before = root.clone();
        assert_eq!(*remove_namespaces(&mut root), before);
    }

    #[test]
    fn test_subtree_selection_keeps_ancestors_only() {
        let doc = XmlParser::parse(CONFIG).unwrap();
        let out = conf_transform(&doc, "configuration/interfaces/interface[name='ge-0/0/0']")
            .unwrap()
            .unwrap();

        assert_eq!(
            out.to_string(),
            "<configuration><interfaces><interface><name>ge-0/0/0</name>\
<unit><name>0</name><family><inet/></family></unit></interface></interfaces></configuration>"
        );
    }

    #[test]
    fn test_subtree_selection_keeps_ancestor_attributes() {
        let doc = XmlParser::parse(CONFIG).unwrap();
        let out = conf_transform(&doc, "//interface[@inactive]/name").unwrap().unwrap();
        assert_eq!(
            out.to_string(),
            r#"<configuration><interfaces><interface inactive="inactive"><name>ge-0/0/1</name></interface></interfaces></configuration>"#
        );
    }

    #[test]
    fn test_subtree_selection_empty_and_root() {
        let doc = XmlParser::parse(CONFIG).unwrap();
        assert!(conf_transform(&doc, "configuration/protocols").unwrap().is_none());
        assert!(conf_transform(&doc, "/configuration").unwrap().is_none());
        assert!(conf_transform(&doc, "//interface/..").unwrap().is_some());
        assert!(conf_transform(&doc, "//interfaces/..").unwrap().is_none());
        assert!(conf_transform(&doc, "configuration[").is_err());

        let selection = SubtreeSelection::new("//interface[@inactive]").unwrap();
        assert_eq!(selection.xpath().as_str(), "//interface[@inactive]");
        let out = selection.transform(&doc).unwrap().unwrap();
        assert_eq!(out.find_all("interfaces/interface").unwrap().len(), 1);
    }

    #[test]
    fn test_normalize() {
        let xml = r#"<rpc-reply xmlns="urn:ietf:params:xml:ns:netconf:base:1.0" xmlns:junos="http://xml.juniper.net/junos/*/junos">
  <output junos:style="terse">  up
     down  </output>
  <!-- c -->
</rpc-reply>"#;
        let doc = XmlParser::parse(xml).unwrap();
        let out = NORMALIZE.transform(&doc).unwrap().unwrap();
        assert_eq!(
            out.to_string(),
            r#"<rpc-reply><output style="terse">up down</output><!-- c --></rpc-reply>"#
        );

        let kept = STRIP_NAMESPACES.transform(&doc).unwrap().unwrap();
        assert_eq!(kept.tag, "rpc-reply");
        assert_eq!(kept.find("output").unwrap().unwrap().text(), Some("  up\n     down  "));
    }
}
