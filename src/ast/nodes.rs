use crate::{ast::Operator, value::Value};

/// Abstract Syntax Tree node produced by the parser.
///
/// The tree is owned outright: every node owns its children and nothing is
/// shared. Parsing always yields a [`Node::Root`] wrapping the top-level
/// expression; `And`/`Or` produced by the parser have at least two operands.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Top of a parsed filter
    Root(Box<Node>),

    /// Conjunction, operands in source order
    ///
    /// # Example
    /// ```text
    /// a = 1 AND b = 2 AND c = 3
    /// ```
    And(Vec<Node>),

    /// Disjunction, operands in source order
    ///
    /// # Example
    /// ```text
    /// a = 1 OR b = 2
    /// ```
    Or(Vec<Node>),

    /// Negation
    ///
    /// # Example
    /// ```text
    /// NOT status = ACTIVE
    /// ```
    Not(Box<Node>),

    /// Single field/operator/value predicate
    ///
    /// # Example
    /// ```text
    /// score >= 75
    /// tag IN [a, b]
    /// ```
    Comparison {
        field: String,
        operator: Operator,
        value: Value,
    },
}

impl Node {
    pub fn comparison(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Node::Comparison {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// The expression under a [`Node::Root`], or the node itself.
    pub fn body(&self) -> &Node {
        match self {
            Node::Root(inner) => inner,
            other => other,
        }
    }

    /// Nesting depth of the tree; a single comparison has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Node::Root(inner) => inner.depth(),
            Node::Not(inner) => 1 + inner.depth(),
            Node::And(children) | Node::Or(children) => {
                1 + children.iter().map(Node::depth).max().unwrap_or(0)
            }
            Node::Comparison { .. } => 1,
        }
    }

    /// Field names referenced by the tree, in order of first appearance.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Node::Root(inner) | Node::Not(inner) => inner.collect_fields(out),
            Node::And(children) | Node::Or(children) => {
                for child in children {
                    child.collect_fields(out);
                }
            }
            Node::Comparison { field, .. } => {
                if !out.contains(&field.as_str()) {
                    out.push(field);
                }
            }
        }
    }
}
