//! Concrete syntax tree produced by the grammar.
//!
//! The tree is lossless: concatenating every leaf in pre-order yields the
//! exact source text that was parsed. Trivia (whitespace and comments) is
//! always attached after the token it follows, never before it.

use std::fmt;

use serde::Serialize;

/// Kind of anonymous pass-through nodes. Never retained inside a typed node.
pub const ANONYMOUS: &str = "";

/// Kind of comment nodes emitted by the trivia skipper.
pub const COMMENT: &str = "Comment";

/// Kind of whitespace-run nodes emitted by the trivia skipper.
pub const WHITESPACE: &str = "Whitespace";

/// Identity of a tree element, unique within one parse session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CstId(pub u32);

impl fmt::Display for CstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source owned by a single parse session.
#[derive(Debug, Default)]
pub struct IdGen {
    next: u32,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> CstId {
        let id = CstId(self.next);
        self.next += 1;
        id
    }
}

/// A concrete syntax tree element.
///
/// `Node::kind` names the grammar production, `field` the role the node plays
/// in its parent production and `group` the alternation family it was chosen
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "$", rename_all = "lowercase")]
pub enum Cst {
    Leaf {
        id: CstId,
        text: String,
    },
    Node {
        id: CstId,
        #[serde(rename = "type")]
        kind: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        group: Option<&'static str>,
        children: Vec<Cst>,
    },
}

/// Inline anonymous nodes into a flat child list.
pub(crate) fn flatten(children: Vec<Cst>) -> Vec<Cst> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        inline_into(&mut out, child);
    }
    out
}

fn inline_into(out: &mut Vec<Cst>, child: Cst) {
    match child {
        Cst::Node {
            kind: ANONYMOUS,
            children,
            ..
        } => {
            for grandchild in children {
                inline_into(out, grandchild);
            }
        }
        other => out.push(other),
    }
}

impl Cst {
    pub fn leaf(ids: &mut IdGen, text: impl Into<String>) -> Cst {
        Cst::Leaf {
            id: ids.next_id(),
            text: text.into(),
        }
    }

    /// Build a node, inlining any anonymous children.
    pub fn node(ids: &mut IdGen, kind: &'static str, children: Vec<Cst>) -> Cst {
        let children = flatten(children);
        Cst::Node {
            id: ids.next_id(),
            kind,
            field: None,
            group: None,
            children,
        }
    }

    pub fn id(&self) -> CstId {
        match self {
            Cst::Leaf { id, .. } | Cst::Node { id, .. } => *id,
        }
    }

    /// Production kind, or `None` for leaves.
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            Cst::Leaf { .. } => None,
            Cst::Node { kind, .. } => Some(*kind),
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            Cst::Leaf { .. } => None,
            Cst::Node { field, .. } => *field,
        }
    }

    pub fn group(&self) -> Option<&'static str> {
        match self {
            Cst::Leaf { .. } => None,
            Cst::Node { group, .. } => *group,
        }
    }

    pub fn children(&self) -> &[Cst] {
        match self {
            Cst::Leaf { .. } => &[],
            Cst::Node { children, .. } => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Cst::Leaf { .. })
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Cst::Node { .. })
    }

    pub fn is_kind(&self, expected: &str) -> bool {
        self.kind() == Some(expected)
    }

    /// Whitespace and comment nodes. Leaves are never trivia on their own,
    /// whatever their text.
    pub fn is_trivia(&self) -> bool {
        match self {
            Cst::Leaf { .. } => false,
            Cst::Node { kind, .. } => *kind == WHITESPACE || *kind == COMMENT,
        }
    }

    /// Raw text of a leaf.
    pub fn leaf_text(&self) -> Option<&str> {
        match self {
            Cst::Leaf { text, .. } => Some(text),
            Cst::Node { .. } => None,
        }
    }

    pub(crate) fn set_field(&mut self, name: &'static str) {
        if let Cst::Node { field, .. } = self {
            *field = Some(name);
        }
    }

    pub(crate) fn clear_field(&mut self) {
        if let Cst::Node { field, .. } = self {
            *field = None;
        }
    }

    pub(crate) fn set_group(&mut self, name: &'static str) {
        if let Cst::Node { group, .. } = self {
            *group = Some(name);
        }
    }

    /// Source text covered by this subtree, trivia included.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    pub fn write_text(&self, out: &mut String) {
        match self {
            Cst::Leaf { text, .. } => out.push_str(text),
            Cst::Node { children, .. } => {
                for child in children {
                    child.write_text(out);
                }
            }
        }
    }

    /// Text of the subtree with trivia removed, tokens separated by nothing.
    pub fn token_text(&self) -> String {
        let mut out = String::new();
        self.write_tokens(&mut out);
        out
    }

    fn write_tokens(&self, out: &mut String) {
        if self.is_trivia() {
            return;
        }
        match self {
            Cst::Leaf { text, .. } => out.push_str(text),
            Cst::Node { children, .. } => {
                for child in children {
                    child.write_tokens(out);
                }
            }
        }
    }

    /// Typed child nodes, skipping tokens and comments.
    pub fn nodes(&self) -> impl Iterator<Item = &Cst> {
        self.children()
            .iter()
            .filter(|c| c.is_node() && !c.is_trivia())
    }

    pub fn child_by_field(&self, name: &str) -> Option<&Cst> {
        self.children().iter().find(|c| c.field() == Some(name))
    }

    pub fn children_by_field<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Cst> {
        self.children()
            .iter()
            .filter(move |c| c.field() == Some(name))
    }

    pub fn child_by_kind(&self, kind: &str) -> Option<&Cst> {
        self.children().iter().find(|c| c.kind() == Some(kind))
    }

    pub fn children_by_group<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Cst> {
        self.children()
            .iter()
            .filter(move |c| c.group() == Some(name))
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Cst::Leaf { .. } => 1,
            Cst::Node { children, .. } => children.iter().map(Cst::leaf_count).sum(),
        }
    }

    /// Structural equality that ignores ids.
    pub fn same_shape(&self, other: &Cst) -> bool {
        match (self, other) {
            (Cst::Leaf { text: a, .. }, Cst::Leaf { text: b, .. }) => a == b,
            (
                Cst::Node {
                    kind: ka,
                    field: fa,
                    group: ga,
                    children: ca,
                    ..
                },
                Cst::Node {
                    kind: kb,
                    field: fb,
                    group: gb,
                    children: cb,
                    ..
                },
            ) => {
                ka == kb
                    && fa == fb
                    && ga == gb
                    && ca.len() == cb.len()
                    && ca.iter().zip(cb).all(|(a, b)| a.same_shape(b))
            }
            _ => false,
        }
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            Cst::Leaf { text, .. } => writeln!(f, "{}{:?}", indent, text),
            Cst::Node {
                kind,
                field,
                group,
                children,
                ..
            } => {
                write!(f, "{}{}", indent, kind)?;
                if let Some(field) = field {
                    write!(f, " field={}", field)?;
                }
                if let Some(group) = group {
                    write!(f, " group={}", group)?;
                }
                writeln!(f)?;
                for child in children {
                    child.fmt_tree(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Cst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_children_are_inlined() {
        let mut ids = IdGen::new();
        let a = Cst::leaf(&mut ids, "a");
        let b = Cst::leaf(&mut ids, "b");
        let inner = Cst::node(&mut ids, ANONYMOUS, vec![a, b]);
        let outer_anon = Cst::node(&mut ids, ANONYMOUS, vec![inner]);
        let typed = Cst::node(&mut ids, "Pair", vec![outer_anon]);

        assert_eq!(typed.children().len(), 2);
        assert!(typed.children().iter().all(Cst::is_leaf));
        assert_eq!(typed.text(), "ab");
    }

    #[test]
    fn ids_are_monotonic_per_generator() {
        let mut ids = IdGen::new();
        let first = Cst::leaf(&mut ids, "x");
        let second = Cst::leaf(&mut ids, "y");
        assert!(first.id() < second.id());

        let mut fresh = IdGen::new();
        assert_eq!(Cst::leaf(&mut fresh, "x").id(), first.id());
    }

    #[test]
    fn same_shape_ignores_ids() {
        let mut ids = IdGen::new();
        let foo = Cst::leaf(&mut ids, "foo");
        let a = Cst::node(&mut ids, "Id", vec![foo]);
        let _burn = ids.next_id();
        let foo = Cst::leaf(&mut ids, "foo");
        let b = Cst::node(&mut ids, "Id", vec![foo]);
        assert_ne!(a, b);
        assert!(a.same_shape(&b));

        let bar = Cst::leaf(&mut ids, "bar");
        let c = Cst::node(&mut ids, "Id", vec![bar]);
        assert!(!a.same_shape(&c));
    }

    #[test]
    fn trivia_classification() {
        let mut ids = IdGen::new();
        assert!(!Cst::leaf(&mut ids, ";").is_trivia());
        assert!(!Cst::leaf(&mut ids, "").is_trivia());
        // a bare whitespace leaf is content, e.g. a string body
        assert!(!Cst::leaf(&mut ids, " \n\t").is_trivia());
        let space = Cst::leaf(&mut ids, " \n\t");
        assert!(Cst::node(&mut ids, WHITESPACE, vec![space]).is_trivia());
        let text = Cst::leaf(&mut ids, "// x");
        let comment = Cst::node(&mut ids, COMMENT, vec![text]);
        assert!(comment.is_trivia());
    }

    #[test]
    fn token_text_skips_trivia() {
        let mut ids = IdGen::new();
        let text = Cst::leaf(&mut ids, "/* c */");
        let comment = Cst::node(&mut ids, COMMENT, vec![text]);
        let space = Cst::leaf(&mut ids, " ");
        let space = Cst::node(&mut ids, WHITESPACE, vec![space]);
        let children = vec![
            Cst::leaf(&mut ids, "x"),
            space,
            comment,
            Cst::leaf(&mut ids, "+"),
            Cst::leaf(&mut ids, "y"),
        ];
        let node = Cst::node(&mut ids, "Add", children);
        assert_eq!(node.text(), "x /* c */+y");
        assert_eq!(node.token_text(), "x+y");
    }

    #[test]
    fn serializes_with_tag() {
        let mut ids = IdGen::new();
        let foo = Cst::leaf(&mut ids, "foo");
        let mut node = Cst::node(&mut ids, "Id", vec![foo]);
        node.set_field("name");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["$"], "node");
        assert_eq!(json["type"], "Id");
        assert_eq!(json["field"], "name");
        assert!(json.get("group").is_none());
        assert_eq!(json["children"][0]["$"], "leaf");
        assert_eq!(json["children"][0]["text"], "foo");
    }
}
