//! Recursive descent parser for filter text.
//!
//! ```text
//! Expr        ::= OrExpr
//! OrExpr      ::= AndExpr ( "OR" AndExpr )*
//! AndExpr     ::= UnaryExpr ( "AND" UnaryExpr )*
//! UnaryExpr   ::= ( "NOT" | "!" | "~" ) UnaryExpr | Primary
//! Primary     ::= "(" Expr ")" | FieldName Operator Value
//! Operator    ::= "=" | "==" | "IS" | "!=" | "<>" | "~=" | ">" | ">=" | "<" | "<="
//!               | "IN" | "NOT IN" | "CONTAINS" | "STARTS WITH" | "ENDS WITH"
//! Value       ::= Scalar | "[" ( Scalar ( "," Scalar )* )? "]"
//! Scalar      ::= StringLit | Literal | IntLit | DecimalLit | BoolLit | "null"
//! ```
//!
//! Keywords are matched case-insensitively; field names and literals keep
//! their case.
//!
//! [`ParserOptions::max_depth`] bounds two things: the parentheses and
//! negations open at any point of the text, and the nesting of the resulting
//! tree, where every `AND`, `OR` and `NOT` node is one level. The second
//! measure is what the canonical form spends, so text printed by
//! [`QueryPrinter`](crate::QueryPrinter) always parses under the options that
//! accepted the tree.

use crate::{
    ast::{Node, Operator, Spanned, Token},
    error::{FilterError, FilterResult, ParseError},
    lexer::{Lexer, Position},
    value::Value,
};

/// Limits applied while parsing untrusted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Deepest allowed nesting of parentheses, negations and connectives.
    pub max_depth: usize,
    /// Longest accepted input, in bytes.
    pub max_input_len: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_depth: 64,
            max_input_len: 64 * 1024,
        }
    }
}

impl ParserOptions {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = max_input_len;
        self
    }

    /// Rejects input over the length limit before any lexing happens.
    pub fn check_length(&self, text: &str) -> FilterResult<()> {
        if text.len() > self.max_input_len {
            return Err(FilterError::InputTooLong {
                length: text.len(),
                limit: self.max_input_len,
            });
        }
        Ok(())
    }
}

pub struct Parser {
    lexer: Lexer,
    current: Spanned,
    options: ParserOptions,
    depth: usize,
}

impl Parser {
    pub fn new(lexer: Lexer) -> FilterResult<Self> {
        Self::with_options(lexer, ParserOptions::default())
    }

    pub fn with_options(mut lexer: Lexer, options: ParserOptions) -> FilterResult<Self> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            options,
            depth: 0,
        })
    }

    fn advance(&mut self) -> FilterResult<Spanned> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn check(&self, token: &Token) -> bool {
        &self.current.token == token
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        self.current.token.is_keyword(keyword)
    }

    fn error(&self, expected: impl Into<String>) -> FilterError {
        ParseError::new(self.current.position, expected, self.current.token.to_string()).into()
    }

    fn expect(&mut self, token: Token, expected: &str) -> FilterResult<()> {
        if !self.check(&token) {
            return Err(self.error(expected));
        }
        self.advance()?;
        Ok(())
    }

    fn expect_keyword(&mut self, keyword: &str, expected: &str) -> FilterResult<()> {
        if !self.check_keyword(keyword) {
            return Err(self.error(expected));
        }
        self.advance()?;
        Ok(())
    }

    fn enter(&mut self) -> FilterResult<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(self.error(format!(
                "at most {} levels of nesting",
                self.options.max_depth
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Rejects a connective or negation whose canonical text would nest
    /// deeper than the limit.
    fn nested(&self, node: Node, start: Position) -> FilterResult<Node> {
        let levels = node.depth().saturating_sub(1);
        if levels > self.options.max_depth {
            return Err(ParseError::new(
                start,
                format!("at most {} levels of nesting", self.options.max_depth),
                format!("an expression nested {} levels deep", levels),
            )
            .into());
        }
        Ok(node)
    }

    /// Parse a complete filter, wrapped in [`Node::Root`].
    pub fn parse(&mut self) -> FilterResult<Node> {
        if self.check(&Token::Eof) {
            return Err(self.error("a filter expression"));
        }
        let expr = self.parse_or()?;
        if !self.check(&Token::Eof) {
            return Err(self.error("`AND`, `OR` or end of input"));
        }
        Ok(Node::Root(Box::new(expr)))
    }

    fn parse_or(&mut self) -> FilterResult<Node> {
        let start = self.current.position;
        let first = self.parse_and()?;
        if !self.check_keyword("OR") {
            return Ok(first);
        }

        let mut operands = vec![first];
        while self.check_keyword("OR") {
            self.advance()?;
            operands.push(self.parse_and()?);
        }
        self.nested(Node::Or(operands), start)
    }

    fn parse_and(&mut self) -> FilterResult<Node> {
        let start = self.current.position;
        let first = self.parse_unary()?;
        if !self.check_keyword("AND") {
            return Ok(first);
        }

        let mut operands = vec![first];
        while self.check_keyword("AND") {
            self.advance()?;
            operands.push(self.parse_unary()?);
        }
        self.nested(Node::And(operands), start)
    }

    fn parse_unary(&mut self) -> FilterResult<Node> {
        let negation = self.check_keyword("NOT")
            || self.check(&Token::Bang)
            || self.check(&Token::Tilde);
        if !negation {
            return self.parse_primary();
        }

        let start = self.current.position;
        self.enter()?;
        self.advance()?;
        let inner = self.parse_unary()?;
        self.leave();
        self.nested(Node::Not(Box::new(inner)), start)
    }

    fn parse_primary(&mut self) -> FilterResult<Node> {
        match &self.current.token {
            Token::LParen => {
                self.enter()?;
                self.advance()?;
                let inner = self.parse_or()?;
                self.expect(Token::RParen, "`)`")?;
                self.leave();
                Ok(inner)
            }
            Token::Word(w) if !(w.eq_ignore_ascii_case("AND") || w.eq_ignore_ascii_case("OR")) => {
                let field = w.clone();
                self.advance()?;
                self.parse_comparison(field)
            }
            _ => Err(self.error("a comparison, `NOT` or `(`")),
        }
    }

    fn parse_comparison(&mut self, field: String) -> FilterResult<Node> {
        let operator = self.parse_operator()?;
        let value_position = self.current.position;
        let value = self.parse_value()?;

        if operator.takes_list() != value.is_list() {
            let expected = if operator.takes_list() {
                format!("a list after `{}`", operator)
            } else {
                format!("a single value after `{}`", operator)
            };
            return Err(ParseError::new(value_position, expected, describe_value(&value)).into());
        }

        Ok(Node::Comparison {
            field,
            operator,
            value,
        })
    }

    fn parse_operator(&mut self) -> FilterResult<Operator> {
        let operator = match &self.current.token {
            Token::Eq | Token::EqEq => Operator::Eq,
            Token::NotEq => Operator::Neq,
            Token::Lt => Operator::Lt,
            Token::LtEq => Operator::Lte,
            Token::Gt => Operator::Gt,
            Token::GtEq => Operator::Gte,
            t if t.is_keyword("IS") => Operator::Eq,
            t if t.is_keyword("IN") => Operator::In,
            t if t.is_keyword("CONTAINS") => Operator::Contains,
            t if t.is_keyword("NOT") => {
                self.advance()?;
                self.expect_keyword("IN", "`IN` after `NOT`")?;
                return Ok(Operator::NotIn);
            }
            t if t.is_keyword("STARTS") => {
                self.advance()?;
                self.expect_keyword("WITH", "`WITH` after `STARTS`")?;
                return Ok(Operator::StartsWith);
            }
            t if t.is_keyword("ENDS") => {
                self.advance()?;
                self.expect_keyword("WITH", "`WITH` after `ENDS`")?;
                return Ok(Operator::EndsWith);
            }
            _ => return Err(self.error("a comparison operator")),
        };
        self.advance()?;
        Ok(operator)
    }

    fn parse_value(&mut self) -> FilterResult<Value> {
        if !self.check(&Token::LBracket) {
            return self.parse_scalar();
        }

        self.advance()?; // consume '['
        let mut items = vec![];
        if self.check(&Token::RBracket) {
            self.advance()?;
            return Ok(Value::List(items));
        }

        loop {
            items.push(self.parse_scalar()?);
            if self.check(&Token::Comma) {
                self.advance()?;
            } else if self.check(&Token::RBracket) {
                self.advance()?;
                return Ok(Value::List(items));
            } else {
                return Err(self.error("`,` or `]`"));
            }
        }
    }

    fn parse_scalar(&mut self) -> FilterResult<Value> {
        let value = match &self.current.token {
            Token::String(s) => Value::String(s.clone()),
            Token::Integer(n) => Value::Integer(*n),
            Token::Decimal(n) => Value::Decimal(*n),
            Token::Word(w) if w.eq_ignore_ascii_case("true") => Value::Boolean(true),
            Token::Word(w) if w.eq_ignore_ascii_case("false") => Value::Boolean(false),
            Token::Word(w) if w.eq_ignore_ascii_case("null") => Value::Null,
            Token::Word(w) => Value::Literal(w.clone()),
            _ => return Err(self.error("a value")),
        };
        self.advance()?;
        Ok(value)
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::List(_) => "a list".to_string(),
        other => format!("{} {}", other.kind_name(), other),
    }
}

/// Lexes and parses `text` with default limits.
///
/// ```
/// use filter_lang::{parse, Node, Operator, Value};
///
/// let root = parse("a IN [1,2,3]").unwrap();
/// assert_eq!(
///     root.body(),
///     &Node::comparison("a", Operator::In, vec![1i64, 2, 3]),
/// );
/// ```
pub fn parse(text: &str) -> FilterResult<Node> {
    parse_with(text, &ParserOptions::default())
}

/// Lexes and parses `text` under the given limits.
pub fn parse_with(text: &str, options: &ParserOptions) -> FilterResult<Node> {
    options.check_length(text)?;
    let mut parser = Parser::with_options(Lexer::new(text), *options)?;
    parser.parse()
}
