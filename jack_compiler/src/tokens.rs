//! Tokens
use std::fmt;

use smol_str::SmolStr;

/// Largest integer constant the stack machine can push.
pub const MAX_INT_CONSTANT: u16 = 32767;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text. String literals keep their surrounding quotes.
    pub lexeme: SmolStr,
    pub span: Span,
}

impl Token {
    /// Numeric payload of an integer constant.
    ///
    /// Returns `None` if the token is not an integer constant, or
    /// the value does not fit into the stack machine's constant range.
    pub fn int_value(&self) -> Option<u16> {
        if self.kind != TokenKind::IntegerConstant {
            return None;
        }
        self.lexeme
            .parse::<u16>()
            .ok()
            .filter(|value| *value <= MAX_INT_CONSTANT)
    }

    /// Unquoted content of a string constant.
    pub fn string_value(&self) -> Option<&str> {
        if self.kind != TokenKind::StringConstant {
            return None;
        }
        self.lexeme
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
    }

    /// Text shown between the tags of the token's markup element.
    pub fn markup_payload(&self) -> String {
        match self.kind {
            TokenKind::StringConstant => escape_markup(self.string_value().unwrap_or_default()),
            _ => escape_markup(&self.lexeme),
        }
    }

    /// Render the token as an inline markup element.
    ///
    /// ```
    /// use jack_compiler::tokens::{Span, Token, TokenKind};
    ///
    /// let token = Token {
    ///     kind: TokenKind::classify("<"),
    ///     lexeme: "<".into(),
    ///     span: Span::default(),
    /// };
    /// assert_eq!(token.to_markup(), "<symbol> &lt; </symbol>");
    /// ```
    pub fn to_markup(&self) -> String {
        let tag = self.kind.tag_name();
        format!("<{tag}> {} </{tag}>", self.markup_payload())
    }

    #[inline]
    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.kind == TokenKind::Symbol(symbol)
    }

    #[inline]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Reserved identifiers
    Keyword(Keyword),
    Symbol(Symbol),
    Identifier,
    /// Number literal
    IntegerConstant,
    /// String literal, delimited by double quotes
    StringConstant,
}

impl TokenKind {
    /// Classify a lexeme.
    ///
    /// The kind is derived entirely from the text, in order:
    /// string literal, keyword, symbol, integer literal and
    /// finally identifier.
    pub fn classify(lexeme: &str) -> Self {
        if lexeme.starts_with('"') {
            TokenKind::StringConstant
        } else if let Some(keyword) = Keyword::parse(lexeme) {
            TokenKind::Keyword(keyword)
        } else if let Some(symbol) = Symbol::parse_str(lexeme) {
            TokenKind::Symbol(symbol)
        } else if !lexeme.is_empty() && lexeme.chars().all(|c| c.is_ascii_digit()) {
            TokenKind::IntegerConstant
        } else {
            TokenKind::Identifier
        }
    }

    /// Element name used in the parse trace and token listing.
    pub fn tag_name(&self) -> &'static str {
        match self {
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Symbol(_) => "symbol",
            TokenKind::Identifier => "identifier",
            TokenKind::IntegerConstant => "integerConstant",
            TokenKind::StringConstant => "stringConstant",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Keyword(keyword) => write!(f, "{keyword}"),
            TokenKind::Symbol(symbol) => write!(f, "{symbol}"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::IntegerConstant => write!(f, "integer constant"),
            TokenKind::StringConstant => write!(f, "string constant"),
        }
    }
}

/// Reserved keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Keyword {
    // ------------------------------------------------------------------------
    // Declarations
    Class,        // class
    Constructor,  // constructor
    Function,     // function
    Method,       // method
    Field,        // field
    Static,       // static
    Var,          // var

    // ------------------------------------------------------------------------
    // Types
    Int,          // int
    Char,         // char
    Boolean,      // boolean
    Void,         // void

    // ------------------------------------------------------------------------
    // Constants
    True,         // true
    False,        // false
    Null,         // null
    This,         // this

    // ------------------------------------------------------------------------
    // Statements
    Let,          // let
    Do,           // do
    If,           // if
    Else,         // else
    While,        // while
    Return,       // return
}

impl Keyword {
    #[rustfmt::skip]
    pub fn parse(text: impl AsRef<str>) -> Option<Self> {
        match text.as_ref() {
            "class"       => Some(Self::Class),
            "constructor" => Some(Self::Constructor),
            "function"    => Some(Self::Function),
            "method"      => Some(Self::Method),
            "field"       => Some(Self::Field),
            "static"      => Some(Self::Static),
            "var"         => Some(Self::Var),
            // ----------------------------------------------------------------
            "int"         => Some(Self::Int),
            "char"        => Some(Self::Char),
            "boolean"     => Some(Self::Boolean),
            "void"        => Some(Self::Void),
            // ----------------------------------------------------------------
            "true"        => Some(Self::True),
            "false"       => Some(Self::False),
            "null"        => Some(Self::Null),
            "this"        => Some(Self::This),
            // ----------------------------------------------------------------
            "let"         => Some(Self::Let),
            "do"          => Some(Self::Do),
            "if"          => Some(Self::If),
            "else"        => Some(Self::Else),
            "while"       => Some(Self::While),
            "return"      => Some(Self::Return),
            _ => None,
        }
    }

    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class       => "class",
            Self::Constructor => "constructor",
            Self::Function    => "function",
            Self::Method      => "method",
            Self::Field       => "field",
            Self::Static      => "static",
            Self::Var         => "var",
            Self::Int         => "int",
            Self::Char        => "char",
            Self::Boolean     => "boolean",
            Self::Void        => "void",
            Self::True        => "true",
            Self::False       => "false",
            Self::Null        => "null",
            Self::This        => "this",
            Self::Let         => "let",
            Self::Do          => "do",
            Self::If          => "if",
            Self::Else        => "else",
            Self::While       => "while",
            Self::Return      => "return",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single character structural symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Symbol {
    LeftBrace,    // {
    RightBrace,   // }
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    Dot,          // .
    Comma,        // ,
    Semicolon,    // ;
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Amp,          // &
    Pipe,         // |
    Less,         // <
    Greater,      // >
    Eq,           // =
    Tilde,        // ~
}

impl Symbol {
    #[rustfmt::skip]
    pub fn parse(c: char) -> Option<Self> {
        match c {
            '{' => Some(Self::LeftBrace),
            '}' => Some(Self::RightBrace),
            '(' => Some(Self::LeftParen),
            ')' => Some(Self::RightParen),
            '[' => Some(Self::LeftBracket),
            ']' => Some(Self::RightBracket),
            '.' => Some(Self::Dot),
            ',' => Some(Self::Comma),
            ';' => Some(Self::Semicolon),
            '+' => Some(Self::Plus),
            '-' => Some(Self::Minus),
            '*' => Some(Self::Star),
            '/' => Some(Self::Slash),
            '&' => Some(Self::Amp),
            '|' => Some(Self::Pipe),
            '<' => Some(Self::Less),
            '>' => Some(Self::Greater),
            '=' => Some(Self::Eq),
            '~' => Some(Self::Tilde),
            _ => None,
        }
    }

    /// Parse a lexeme consisting of exactly one symbol character.
    pub fn parse_str(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::parse(c),
            _ => None,
        }
    }

    #[rustfmt::skip]
    pub fn as_char(&self) -> char {
        match self {
            Self::LeftBrace    => '{',
            Self::RightBrace   => '}',
            Self::LeftParen    => '(',
            Self::RightParen   => ')',
            Self::LeftBracket  => '[',
            Self::RightBracket => ']',
            Self::Dot          => '.',
            Self::Comma        => ',',
            Self::Semicolon    => ';',
            Self::Plus         => '+',
            Self::Minus        => '-',
            Self::Star         => '*',
            Self::Slash        => '/',
            Self::Amp          => '&',
            Self::Pipe         => '|',
            Self::Less         => '<',
            Self::Greater      => '>',
            Self::Eq           => '=',
            Self::Tilde        => '~',
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Replace characters that would break the markup output.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '&' => escaped.push_str("&amp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Span {
    /// Byte offset of the token in the source.
    pub index: u32,
    /// Number of bytes covered.
    pub size: u32,
    /// 1-based line of the first character.
    pub line: u32,
    /// 1-based column of the first character.
    pub column: u32,
}

impl Span {
    pub fn new(index: u32, size: u32) -> Self {
        Self {
            index,
            size,
            ..Default::default()
        }
    }

    #[inline]
    pub fn fragment<'a>(&self, text: &'a str) -> &'a str {
        &text[(self.index as usize)..(self.end() as usize)]
    }

    /// Ending index of the span, exclusive.
    #[inline]
    pub fn end(&self) -> u32 {
        self.index + self.size
    }

    /// Slice out the full source line that contains the start of the span.
    ///
    /// The returned line excludes the trailing line break.
    pub fn surrounding_line<'a>(&self, text: &'a str) -> (&'a str, Span) {
        let index = (self.index as usize).min(text.len());

        let start = text[..index].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let end = text[index..]
            .find(|c| c == '\n' || c == '\r')
            .map(|i| index + i)
            .unwrap_or(text.len());

        let line_span = Span {
            index: start as u32,
            size: (end - start) as u32,
            line: self.line,
            column: 1,
        };

        (&text[start..end], line_span)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
