//! XPath path handling for XML trees
//!
//! This module parses and evaluates the XPath subset used by Junos
//! tooling to address configuration objects:
//! - `interfaces/interface` - child steps
//! - `/configuration/system` - absolute path from the document node
//! - `//interface` - descendant step
//! - `.` and `..` - self and parent
//! - `interface[name='ge-0/0/0']`, `unit[2]`, `unit[last()]`,
//!   `interface[@inactive]`, `name[text()='lo0']` - predicates
//!
//! Evaluation yields element locations: the list of child indices leading
//! from the root element to each selected element, in document order.

use crate::core::element::{Element, Node};
use crate::core::error::{JxmlError, JxmlResult};
use std::collections::BTreeSet;

/// Axis a step moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `name` - children of the context node
    Child,
    /// `//name` - children of the context node or any of its descendants
    Descendant,
    /// `.` - the context node itself
    SelfNode,
    /// `..` - the parent of the context node
    Parent,
}

/// Node test of a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameTest {
    /// `*`
    Any,
    /// An exact tag, plain or in Clark notation
    Name(String),
}

impl NameTest {
    fn matches(&self, element: &Element) -> bool {
        match self {
            NameTest::Any => true,
            NameTest::Name(name) => element.tag == *name,
        }
    }
}

/// A bracketed predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[n]` - 1-based position
    Position(usize),
    /// `[last()]`
    Last,
    /// `[@name]` or `[@name='value']`
    Attribute { name: String, value: Option<String> },
    /// `[child]` or `[child='value']`
    Child { name: String, value: Option<String> },
    /// `[text()='value']`
    Text(String),
}

/// A single location step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub test: NameTest,
    pub predicates: Vec<Predicate>,
}

/// A compiled XPath expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPath {
    /// Whether the path starts at the document node
    pub absolute: bool,
    pub steps: Vec<Step>,
    source: String,
}

/// Evaluation context: the document node or an element location
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Context {
    Document,
    Element(Vec<usize>),
}

impl XPath {
    /// Parse an XPath expression
    pub fn parse(path: &str) -> JxmlResult<XPath> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(JxmlError::BadXPath("Empty path".to_string()));
        }

        let (absolute, rest, leading_descendant) = if let Some(rest) = trimmed.strip_prefix("//") {
            (true, rest, true)
        } else if let Some(rest) = trimmed.strip_prefix('/') {
            (true, rest, false)
        } else {
            (false, trimmed, false)
        };

        let mut steps = Vec::new();
        if !(absolute && rest.is_empty() && !leading_descendant) {
            for (descendant, text) in split_steps(rest, leading_descendant)? {
                steps.push(parse_step(&text, descendant)?);
            }
        }

        Ok(XPath {
            absolute,
            steps,
            source: trimmed.to_string(),
        })
    }

    /// The expression this path was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Evaluate with `root` as the context element
    ///
    /// Relative paths start at `root`; absolute paths start at the document
    /// node whose only child is `root`.
    pub fn select_from(&self, root: &Element) -> Vec<Vec<usize>> {
        let start = if self.absolute {
            Context::Document
        } else {
            Context::Element(Vec::new())
        };
        self.evaluate(root, start)
    }

    /// Evaluate with the document node as the context
    ///
    /// This is how an XSLT parameter is evaluated against an input document:
    /// a relative first step matches the root element itself.
    pub fn select_document(&self, root: &Element) -> Vec<Vec<usize>> {
        self.evaluate(root, Context::Document)
    }

    fn evaluate(&self, root: &Element, start: Context) -> Vec<Vec<usize>> {
        let mut current = BTreeSet::new();
        current.insert(start);

        for step in &self.steps {
            let mut next = BTreeSet::new();
            for ctx in &current {
                apply_step(root, ctx, step, &mut next);
            }
            current = next;
            if current.is_empty() {
                break;
            }
        }

        current
            .into_iter()
            .filter_map(|ctx| match ctx {
                Context::Element(loc) => Some(loc),
                Context::Document => None,
            })
            .collect()
    }
}

/// Split the step list on `/` outside quotes, brackets and Clark braces
fn split_steps(path: &str, leading_descendant: bool) -> JxmlResult<Vec<(bool, String)>> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut descendant = leading_descendant;
    let mut quote: Option<char> = None;
    let mut brackets = 0usize;
    let mut in_brace = false;
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            current.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' if brackets > 0 => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' if !in_brace => {
                brackets += 1;
                current.push(ch);
            }
            ']' if !in_brace => {
                if brackets == 0 {
                    return Err(JxmlError::BadXPath("Unexpected ']'".to_string()));
                }
                brackets -= 1;
                current.push(ch);
            }
            '{' if brackets == 0 => {
                in_brace = true;
                current.push(ch);
            }
            '}' if in_brace => {
                in_brace = false;
                current.push(ch);
            }
            '|' if brackets == 0 && !in_brace => {
                return Err(JxmlError::NotSupported(format!(
                    "Union expressions are not supported: '{}'",
                    path
                )));
            }
            '/' if brackets == 0 && !in_brace => {
                if current.trim().is_empty() {
                    return Err(JxmlError::BadXPath(format!("Empty step in '{}'", path)));
                }
                segments.push((descendant, current.trim().to_string()));
                current.clear();
                descendant = chars.next_if_eq(&'/').is_some();
            }
            _ => current.push(ch),
        }
    }

    if quote.is_some() {
        return Err(JxmlError::BadXPath("Unterminated string literal".to_string()));
    }
    if brackets > 0 {
        return Err(JxmlError::BadXPath("Unclosed bracket".to_string()));
    }
    if in_brace {
        return Err(JxmlError::BadXPath("Unclosed namespace brace".to_string()));
    }
    if current.trim().is_empty() {
        return Err(JxmlError::BadXPath(format!("Trailing '/' in '{}'", path)));
    }
    segments.push((descendant, current.trim().to_string()));
    Ok(segments)
}

fn parse_step(text: &str, descendant: bool) -> JxmlResult<Step> {
    let name_end = if text.starts_with('{') {
        let close = text
            .find('}')
            .ok_or_else(|| JxmlError::BadXPath("Unclosed namespace brace".to_string()))?;
        text[close..].find('[').map(|i| close + i)
    } else {
        text.find('[')
    };
    let (name, mut rest) = match name_end {
        Some(i) => (text[..i].trim(), &text[i..]),
        None => (text.trim(), ""),
    };

    let (axis, test) = match name {
        "." | ".." if descendant => {
            return Err(JxmlError::NotSupported(format!(
                "'{}' after '//' is not supported",
                name
            )))
        }
        "." => (Axis::SelfNode, NameTest::Any),
        ".." => (Axis::Parent, NameTest::Any),
        "*" => (axis_for(descendant), NameTest::Any),
        _ => (axis_for(descendant), NameTest::Name(validate_name(name)?.to_string())),
    };

    let mut predicates = Vec::new();
    while !rest.is_empty() {
        let close = predicate_end(rest)?;
        predicates.push(parse_predicate(rest[1..close].trim())?);
        rest = rest[close + 1..].trim_start();
    }

    if !predicates.is_empty() && matches!(axis, Axis::SelfNode | Axis::Parent) {
        return Err(JxmlError::NotSupported(format!(
            "Predicates on '{}' are not supported",
            name
        )));
    }

    Ok(Step {
        axis,
        test,
        predicates,
    })
}

fn axis_for(descendant: bool) -> Axis {
    if descendant {
        Axis::Descendant
    } else {
        Axis::Child
    }
}

/// Index of the `]` closing the predicate that opens `text`
fn predicate_end(text: &str) -> JxmlResult<usize> {
    if !text.starts_with('[') {
        return Err(JxmlError::BadXPath(format!("Expected '[' at '{}'", text)));
    }
    let mut quote: Option<char> = None;
    for (i, ch) in text.char_indices().skip(1) {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '[') => {
                return Err(JxmlError::NotSupported(
                    "Nested predicates are not supported".to_string(),
                ))
            }
            (None, ']') => return Ok(i),
            _ => {}
        }
    }
    Err(JxmlError::BadXPath("Unclosed bracket".to_string()))
}

fn parse_predicate(body: &str) -> JxmlResult<Predicate> {
    if body.is_empty() {
        return Err(JxmlError::BadXPath("Empty predicate".to_string()));
    }
    if body.chars().all(|c| c.is_ascii_digit()) {
        let index = body
            .parse::<usize>()
            .map_err(|_| JxmlError::BadXPath(format!("Invalid position: {}", body)))?;
        if index == 0 {
            return Err(JxmlError::BadXPath("Positions start at 1".to_string()));
        }
        return Ok(Predicate::Position(index));
    }
    if body == "last()" {
        return Ok(Predicate::Last);
    }
    if let Some(op) = boolean_operator(body) {
        return Err(JxmlError::NotSupported(format!(
            "'{}' in predicates is not supported: [{}]",
            op, body
        )));
    }

    let (lhs, value) = match split_equals(body) {
        Some((lhs, rhs)) => (lhs.trim(), Some(parse_literal(rhs.trim())?)),
        None => (body, None),
    };

    if let Some(attr) = lhs.strip_prefix('@') {
        return Ok(Predicate::Attribute {
            name: validate_name(attr.trim())?.to_string(),
            value,
        });
    }
    if lhs == "text()" {
        return value
            .map(Predicate::Text)
            .ok_or_else(|| JxmlError::NotSupported("Bare text() predicate".to_string()));
    }
    Ok(Predicate::Child {
        name: validate_name(lhs)?.to_string(),
        value,
    })
}

/// The first `and`, `or` or `|` outside string literals
fn boolean_operator(body: &str) -> Option<&'static str> {
    let mut quote: Option<char> = None;
    let mut word = String::new();
    let mut words = 0usize;
    for ch in body.chars().chain(std::iter::once(' ')) {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
                continue;
            }
            None if ch == '\'' || ch == '"' => {
                quote = Some(ch);
                words += 1;
                continue;
            }
            None if ch == '|' => return Some("|"),
            None => {}
        }
        if ch.is_whitespace() || matches!(ch, '(' | ')' | '=') {
            match word.as_str() {
                "and" if words > 0 => return Some("and"),
                "or" if words > 0 => return Some("or"),
                "" => {}
                _ => words += 1,
            }
            word.clear();
        } else {
            word.push(ch);
        }
    }
    None
}

/// Split on the first `=` outside a string literal
fn split_equals(body: &str) -> Option<(&str, &str)> {
    let mut quote: Option<char> = None;
    for (i, ch) in body.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '=') => return Some((&body[..i], &body[i + 1..])),
            _ => {}
        }
    }
    None
}

fn parse_literal(text: &str) -> JxmlResult<String> {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('\'' | '"')), Some(close)) if open == close && text.len() >= 2 => {
            let inner = &text[1..text.len() - 1];
            if inner.contains(open) {
                return Err(JxmlError::BadXPath(format!(
                    "Unexpected {} inside string literal: {}",
                    open, text
                )));
            }
            Ok(inner.to_string())
        }
        _ => Err(JxmlError::BadXPath(format!(
            "Expected a quoted string literal, found: {}",
            text
        ))),
    }
}

fn validate_name(name: &str) -> JxmlResult<&str> {
    let bad = name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '=' | '[' | ']' | '@' | '(' | ')' | '|'));
    if bad {
        return Err(JxmlError::BadXPath(format!("Invalid name test: '{}'", name)));
    }
    Ok(name)
}

fn element_at<'a>(root: &'a Element, ctx: &Context) -> Option<&'a Element> {
    match ctx {
        Context::Document => None,
        Context::Element(loc) => root.at(loc),
    }
}

fn children(root: &Element, ctx: &Context) -> Vec<Vec<usize>> {
    match ctx {
        Context::Document => vec![Vec::new()],
        Context::Element(loc) => {
            let Some(element) = root.at(loc) else {
                return Vec::new();
            };
            element
                .children
                .iter()
                .enumerate()
                .filter(|(_, node)| node.is_element())
                .map(|(i, _)| {
                    let mut child = loc.clone();
                    child.push(i);
                    child
                })
                .collect()
        }
    }
}

fn descendant_or_self(root: &Element, ctx: &Context, out: &mut Vec<Context>) {
    out.push(ctx.clone());
    for child in children(root, ctx) {
        descendant_or_self(root, &Context::Element(child), out);
    }
}

fn apply_step(root: &Element, ctx: &Context, step: &Step, out: &mut BTreeSet<Context>) {
    match step.axis {
        Axis::SelfNode => {
            out.insert(ctx.clone());
        }
        Axis::Parent => {
            if let Context::Element(loc) = ctx {
                let parent = match loc.split_last() {
                    Some((_, parent)) => Context::Element(parent.to_vec()),
                    None => Context::Document,
                };
                out.insert(parent);
            }
        }
        Axis::Child => select_children(root, ctx, step, out),
        Axis::Descendant => {
            let mut scope = Vec::new();
            descendant_or_self(root, ctx, &mut scope);
            for node in &scope {
                select_children(root, node, step, out);
            }
        }
    }
}

fn select_children(root: &Element, ctx: &Context, step: &Step, out: &mut BTreeSet<Context>) {
    let mut candidates: Vec<Vec<usize>> = children(root, ctx)
        .into_iter()
        .filter(|loc| root.at(loc).is_some_and(|e| step.test.matches(e)))
        .collect();

    for predicate in &step.predicates {
        candidates = apply_predicate(root, candidates, predicate);
    }

    out.extend(candidates.into_iter().map(Context::Element));
}

fn apply_predicate(root: &Element, candidates: Vec<Vec<usize>>, predicate: &Predicate) -> Vec<Vec<usize>> {
    match predicate {
        Predicate::Position(n) => candidates.into_iter().nth(n - 1).into_iter().collect(),
        Predicate::Last => candidates.into_iter().last().into_iter().collect(),
        _ => candidates
            .into_iter()
            .filter(|loc| {
                element_at(root, &Context::Element(loc.clone()))
                    .is_some_and(|e| predicate_holds(e, predicate))
            })
            .collect(),
    }
}

fn predicate_holds(element: &Element, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Attribute { name, value } => match (element.get_attribute(name), value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
            (None, _) => false,
        },
        Predicate::Child { name, value } => element
            .elements()
            .filter(|c| c.tag == *name)
            .any(|c| value.as_ref().map_or(true, |v| c.string_value() == *v)),
        Predicate::Text(value) => element
            .children
            .iter()
            .any(|n| matches!(n, Node::Text(t) if t == value)),
        Predicate::Position(_) | Predicate::Last => true,
    }
}
