//! Junos XML edit-operation attributes
//!
//! Junos marks configuration changes with attributes on the element being
//! changed:
//! - [`DEL`] deletes the element
//! - [`REN`] renames it, together with [`name`] for the new name
//! - [`ACTIVATE`] / [`DEACTIVATE`] toggle the `inactive` state
//! - [`REPLACE`] replaces the element instead of merging
//! - [`BEFORE`] / [`AFTER`] (or [`insert`]) reorder it, together with [`name`]
//!
//! [`NAMES_ONLY`] and the `INHERIT*` constants are attributes for
//! `<get-configuration>` rather than edits.
//!
//! The constants are immutable values; [`OpAttrs::with`] and
//! [`OpAttrs::merge`] return new values instead of touching the constant.
//!
//! ```
//! use jxmlkit::junos::ops::{self, BEFORE};
//! use jxmlkit::Element;
//!
//! let mut term = Element::new("term");
//! BEFORE.merge(&ops::name("deny-all")).apply_to(&mut term);
//! assert_eq!(term.get_attribute("insert"), Some("before"));
//! assert_eq!(term.get_attribute("name"), Some("deny-all"));
//! ```

use crate::core::element::Element;
use std::borrow::Cow;
use std::fmt;

type Pair = (&'static str, Cow<'static, str>);

/// An ordered, immutable set of operation attributes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpAttrs {
    pairs: Cow<'static, [Pair]>,
}

// Builds a const OpAttrs from literal pairs
macro_rules! op_attrs {
    ($($key:literal => $value:literal),+ $(,)?) => {{
        const PAIRS: &[Pair] = &[$(($key, Cow::Borrowed($value))),+];
        OpAttrs {
            pairs: Cow::Borrowed(PAIRS),
        }
    }};
}

/// Delete a configuration element
pub const DEL: OpAttrs = op_attrs!("delete" => "delete");
/// Rename a configuration element, requires [`name`]
pub const REN: OpAttrs = op_attrs!("rename" => "rename");
/// Activate a configuration element
pub const ACTIVATE: OpAttrs = op_attrs!("active" => "active");
/// Deactivate a configuration element
pub const DEACTIVATE: OpAttrs = op_attrs!("inactive" => "inactive");
/// Replace a configuration element
pub const REPLACE: OpAttrs = op_attrs!("replace" => "replace");
/// Reorder before another element, requires [`name`]
pub const BEFORE: OpAttrs = op_attrs!("insert" => "before");
/// Reorder after another element, requires [`name`]
pub const AFTER: OpAttrs = op_attrs!("insert" => "after");
/// Only fetch object identifiers with `<get-configuration>`
pub const NAMES_ONLY: OpAttrs = op_attrs!("recurse" => "false");
/// Fetch configuration with apply-groups inheritance resolved
pub const INHERIT: OpAttrs = op_attrs!("inherit" => "inherit");
/// Inherit, annotating where each group value came from
pub const INHERIT_GROUPS: OpAttrs = op_attrs!("inherit" => "inherit", "groups" => "groups");
/// Inherit including defaults, annotating groups
pub const INHERIT_DEFAULTS: OpAttrs = op_attrs!("inherit" => "defaults", "groups" => "groups");

/// The `name` attribute, naming the target of a rename or reorder
pub fn name(name: impl Into<String>) -> OpAttrs {
    OpAttrs::single("name", name.into())
}

/// The `insert` attribute with an arbitrary directive, e.g. `"before"`
pub fn insert(cmd: impl Into<String>) -> OpAttrs {
    OpAttrs::single("insert", cmd.into())
}

impl OpAttrs {
    fn single(key: &'static str, value: String) -> Self {
        Self {
            pairs: Cow::Owned(vec![(key, Cow::Owned(value))]),
        }
    }

    /// Iterate over `(name, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (*k, v.as_ref()))
    }

    /// Value for an attribute name
    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// A copy with one more attribute; an existing key gets the new value
    pub fn with(&self, key: &'static str, value: impl Into<String>) -> Self {
        let mut pairs = self.pairs.to_vec();
        let value = Cow::Owned(value.into());
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => pairs.push((key, value)),
        }
        Self {
            pairs: Cow::Owned(pairs),
        }
    }

    /// A copy combining both sets, `other` winning on duplicate keys
    pub fn merge(&self, other: &OpAttrs) -> Self {
        let mut pairs = self.pairs.to_vec();
        for (key, value) in other.pairs.iter() {
            match pairs.iter_mut().find(|(k, _)| k == key) {
                Some(pair) => pair.1 = value.clone(),
                None => pairs.push((*key, value.clone())),
            }
        }
        Self {
            pairs: Cow::Owned(pairs),
        }
    }

    /// Set every attribute on `element`
    pub fn apply_to(&self, element: &mut Element) {
        for (key, value) in self.iter() {
            element.set_attribute(key, value);
        }
    }
}

impl fmt::Display for OpAttrs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}=\"{}\"", key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEL.get("delete"), Some("delete"));
        assert_eq!(REN.get("rename"), Some("rename"));
        assert_eq!(ACTIVATE.get("active"), Some("active"));
        assert_eq!(DEACTIVATE.get("inactive"), Some("inactive"));
        assert_eq!(REPLACE.get("replace"), Some("replace"));
        assert_eq!(NAMES_ONLY.get("recurse"), Some("false"));
        assert_eq!(INHERIT.iter().collect::<Vec<_>>(), vec![("inherit", "inherit")]);
        assert_eq!(
            INHERIT_GROUPS.iter().collect::<Vec<_>>(),
            vec![("inherit", "inherit"), ("groups", "groups")]
        );
        assert_eq!(
            INHERIT_DEFAULTS.iter().collect::<Vec<_>>(),
            vec![("inherit", "defaults"), ("groups", "groups")]
        );
    }

    #[test]
    fn test_generators_agree_with_constants() {
        assert_eq!(insert("before"), BEFORE);
        assert_eq!(insert("after"), AFTER);
        assert_eq!(name("foo").iter().collect::<Vec<_>>(), vec![("name", "foo")]);
        assert_eq!(name("").get("name"), Some(""));
    }

    #[test]
    fn test_with_leaves_constant_untouched() {
        let augmented = DEL.with("name", "ge-0/0/0");
        assert_eq!(augmented.len(), 2);
        assert_eq!(DEL.len(), 1);
        assert_eq!(DEL.get("name"), None);

        let overwritten = BEFORE.with("insert", "after");
        assert_eq!(overwritten, AFTER);
        assert_eq!(BEFORE.get("insert"), Some("before"));
    }

    #[test]
    fn test_merge_and_apply() {
        let attrs = REN.merge(&name("ge-0/0/1"));
        let mut iface = Element::new("interface");
        attrs.apply_to(&mut iface);
        assert_eq!(iface.get_attribute("rename"), Some("rename"));
        assert_eq!(iface.get_attribute("name"), Some("ge-0/0/1"));
        assert_eq!(attrs.to_string(), r#"rename="rename" name="ge-0/0/1""#);
    }
}
