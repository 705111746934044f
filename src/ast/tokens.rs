use std::fmt;

use crate::lexer::Position;

/// Lexical token produced by the [`Lexer`](crate::lexer::Lexer).
///
/// Bare words are never classified as keywords by the lexer. The parser
/// decides whether a [`Token::Word`] is a connective, an operator keyword or
/// a literal depending on where it appears.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Bare word made of letters, digits and underscores
    ///
    /// # Examples
    /// ```text
    /// status
    /// ACTIVE
    /// AND
    /// ```
    Word(String),

    /// String literal enclosed in double quotes
    ///
    /// There is no escape processing: the literal ends at the next `"`.
    ///
    /// # Examples
    /// ```text
    /// "active"
    /// "Māori"
    /// ```
    String(String),

    /// Integer literal, optionally negative
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -7
    /// ```
    Integer(i64),

    /// Decimal literal (contains a `.`)
    ///
    /// # Examples
    /// ```text
    /// 100.50
    /// -0.25
    /// ```
    Decimal(f64),

    // Comparison symbols
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`, `<>` or `~=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,

    // Negation symbols
    /// `!` (synonym for `NOT`)
    Bang,
    /// `~` (synonym for `NOT`)
    Tilde,

    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,

    /// End of input
    Eof,
}

/// Coarse classification of a token, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Keyword,
    StringLiteral,
    NumberLiteral,
    BooleanLiteral,
    OperatorSymbol,
    Punctuation,
    EndOfInput,
}

/// Words the grammar reserves at keyword positions (compared case-insensitively).
pub const KEYWORDS: &[&str] = &[
    "AND", "OR", "NOT", "IN", "IS", "CONTAINS", "STARTS", "ENDS", "WITH", "NULL",
];

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Word(w) if w.eq_ignore_ascii_case("true") || w.eq_ignore_ascii_case("false") => {
                TokenKind::BooleanLiteral
            }
            Token::Word(w) if KEYWORDS.iter().any(|k| w.eq_ignore_ascii_case(k)) => {
                TokenKind::Keyword
            }
            Token::Word(_) => TokenKind::Identifier,
            Token::String(_) => TokenKind::StringLiteral,
            Token::Integer(_) | Token::Decimal(_) => TokenKind::NumberLiteral,
            Token::Eq
            | Token::EqEq
            | Token::NotEq
            | Token::Lt
            | Token::LtEq
            | Token::Gt
            | Token::GtEq
            | Token::Bang
            | Token::Tilde => TokenKind::OperatorSymbol,
            Token::LParen | Token::RParen | Token::LBracket | Token::RBracket | Token::Comma => {
                TokenKind::Punctuation
            }
            Token::Eof => TokenKind::EndOfInput,
        }
    }

    /// True when this is a bare word equal to `keyword`, ignoring ASCII case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => match self.kind() {
                TokenKind::Keyword => write!(f, "keyword `{}`", w),
                TokenKind::BooleanLiteral => write!(f, "boolean `{}`", w),
                _ => write!(f, "`{}`", w),
            },
            Token::String(s) => write!(f, "string \"{}\"", s),
            Token::Integer(n) => write!(f, "integer {}", n),
            Token::Decimal(n) => write!(f, "decimal {}", n),
            Token::Eq => f.write_str("`=`"),
            Token::EqEq => f.write_str("`==`"),
            Token::NotEq => f.write_str("`!=`"),
            Token::Lt => f.write_str("`<`"),
            Token::LtEq => f.write_str("`<=`"),
            Token::Gt => f.write_str("`>`"),
            Token::GtEq => f.write_str("`>=`"),
            Token::Bang => f.write_str("`!`"),
            Token::Tilde => f.write_str("`~`"),
            Token::LParen => f.write_str("`(`"),
            Token::RParen => f.write_str("`)`"),
            Token::LBracket => f.write_str("`[`"),
            Token::RBracket => f.write_str("`]`"),
            Token::Comma => f.write_str("`,`"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// A token together with the position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    /// Raw source text of the token (empty for [`Token::Eof`]).
    pub lexeme: String,
    pub position: Position,
}
