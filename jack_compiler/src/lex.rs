//! Lexical analysis (tokenizer)
use crate::tokens::{Span, Symbol, Token, TokenKind};

use itertools::{multipeek, MultiPeek};
use std::{error, fmt, iter::Iterator, str::CharIndices};

/// Run the lexer over the whole source, producing the complete
/// token sequence of one compilation unit.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}

/// Lexical analyzer.
///
/// Comments and whitespace are discarded, so every produced
/// token is significant to the grammar.
pub struct Lexer<'a> {
    source: SourceText<'a>,
    token_start: SourcePos,
}

impl<'a> Lexer<'a> {
    pub fn new(source_code: &'a str) -> Self {
        Self {
            source: SourceText::new(source_code),
            token_start: SourcePos {
                position: 0,
                line: 1,
                column: 1,
            },
        }
    }

    /// Scan the source characters and construct the next token.
    ///
    /// Returns `Ok(None)` when the end of the source is reached.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        loop {
            self.consume_whitespace();
            self.start_token();

            let next_char = match self.source.next_char() {
                Some(c) => c,
                None => return Ok(None),
            };

            match next_char {
                '/' => match self.source.peek_char() {
                    Some('/') => self.consume_line_comment(),
                    Some('*') => self.consume_block_comment()?,
                    _ => return Ok(Some(self.make_token())),
                },
                '"' => return self.consume_string().map(Some),
                c if is_word_char(c) => return Ok(Some(self.consume_word())),
                c if Symbol::parse(c).is_some() => return Ok(Some(self.make_token())),
                c => {
                    return Err(LexError::UnknownCharacter {
                        character: c,
                        span: self.make_span(),
                    })
                }
            }
        }
    }

    /// Prime the lexer state for recording a new token.
    fn start_token(&mut self) {
        self.token_start = self.source.position();
    }

    fn make_span(&self) -> Span {
        let start = &self.token_start;
        let end = self.source.offset;

        // start and end can be equal, and a token can have 0 size.
        debug_assert!(end >= start.position);

        Span {
            index: start.position as u32,
            size: (end - start.position) as u32,
            line: start.line as u32,
            column: start.column as u32,
        }
    }

    /// Build a token from the source text between the recorded start
    /// position and the current cursor.
    fn make_token(&self) -> Token {
        let span = self.make_span();
        let lexeme = span.fragment(self.source.original);

        Token {
            kind: TokenKind::classify(lexeme),
            lexeme: lexeme.into(),
            span,
        }
    }

    /// Consume whitespace characters, including line breaks.
    fn consume_whitespace(&mut self) {
        while let Some(c) = self.source.peek_char() {
            if c.is_whitespace() {
                self.source.next_char();
            } else {
                break;
            }
        }
    }

    /// Erase comment line up to, but not including, the trailing newline.
    fn consume_line_comment(&mut self) {
        while let Some(c) = self.source.peek_char() {
            if is_newline(c) {
                break;
            }
            self.source.next_char();
        }
    }

    /// Erase a comment surrounded by `/*` and `*/`.
    ///
    /// The comment ends at the first closing marker and may span lines.
    fn consume_block_comment(&mut self) -> Result<(), LexError> {
        // Opening star
        self.source.next_char();

        loop {
            match self.source.next_char() {
                Some('*') => {
                    if self.source.peek_char() == Some('/') {
                        self.source.next_char();
                        return Ok(());
                    }
                }
                Some(_) => {}
                None => {
                    return Err(LexError::UnterminatedComment {
                        span: self.make_span(),
                    })
                }
            }
        }
    }

    /// Make a string literal token.
    ///
    /// The opening quote has been consumed. Everything up to the next
    /// quote is one opaque token, including symbol characters. The
    /// literal must close on the line it opens.
    fn consume_string(&mut self) -> Result<Token, LexError> {
        loop {
            match self.source.peek_char() {
                Some('"') => {
                    self.source.next_char();
                    return Ok(self.make_token());
                }
                Some(c) if !is_newline(c) => {
                    self.source.next_char();
                }
                _ => {
                    return Err(LexError::UnterminatedString {
                        span: self.make_span(),
                    })
                }
            }
        }
    }

    /// Make a keyword, identifier or number literal token from
    /// a maximal run of word characters.
    fn consume_word(&mut self) -> Token {
        while let Some(c) = self.source.peek_char() {
            if is_word_char(c) {
                self.source.next_char();
            } else {
                break;
            }
        }

        self.make_token()
    }
}

/// Implement `Lexer` as an interator for consuming
/// tokens lazily.
impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_newline(c: char) -> bool {
    matches!(c, '\r' | '\n')
}

/// Wrapper for source code that keeps a cursor position.
///
/// Allows forward lookup via peeking.
struct SourceText<'a> {
    /// Keep reference to the source so the lexer can
    /// slice fragments from it.
    original: &'a str,

    /// Iterator over UTF-8 encoded source code.
    ///
    /// An important semantic feature of `MultiPeek` is that peeking advances
    /// the internal peek cursor by 1. Each call will return the next element.
    /// The peek cursor offset is restored to 0 when calling `MultiPeek::next()`
    /// or `MultiPeek::reset_peek()`.
    chars: MultiPeek<CharIndices<'a>>,

    /// Byte position of the next character to be consumed.
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> SourceText<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            original: source,
            chars: multipeek(source.char_indices()),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn position(&self) -> SourcePos {
        SourcePos {
            position: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    /// Advance the cursor and return the consumed character.
    fn next_char(&mut self) -> Option<char> {
        let (index, c) = self.chars.next()?;
        self.offset = index + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Look at the next character without consuming it.
    ///
    /// Unlike the raw `MultiPeek`, repeated calls return
    /// the same character.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.reset_peek();
        let c = self.chars.peek().map(|(_, c)| *c);
        self.chars.reset_peek();
        c
    }
}

#[derive(Debug, Default)]
struct SourcePos {
    position: usize,
    column: usize,
    line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// Character outside of the word and symbol alphabets.
    UnknownCharacter { character: char, span: Span },
    /// Opening double quote without a closing partner on the same line.
    UnterminatedString { span: Span },
    /// Block comment without a closing `*/`.
    UnterminatedComment { span: Span },
}

impl LexError {
    pub fn span(&self) -> &Span {
        match self {
            LexError::UnknownCharacter { span, .. } => span,
            LexError::UnterminatedString { span } => span,
            LexError::UnterminatedComment { span } => span,
        }
    }
}

impl error::Error for LexError {}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LexError::UnknownCharacter { character, span } => {
                write!(f, "{span}: unknown character {character:?}")
            }
            LexError::UnterminatedString { span } => {
                write!(f, "{span}: unterminated string literal")
            }
            LexError::UnterminatedComment { span } => {
                write!(f, "{span}: unterminated block comment")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tokens::Keyword;

    fn lexemes(source: &str) -> Vec<String> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.lexeme.to_string())
            .collect()
    }

    #[test]
    fn test_words_and_symbols() {
        assert_eq!(
            lexemes("let x[i]=y+1;"),
            vec!["let", "x", "[", "i", "]", "=", "y", "+", "1", ";"]
        );
    }

    #[test]
    fn test_comments_are_stripped() {
        let source = "/** doc\n * more */ class // trailing\n Main /* inline */ {}";
        assert_eq!(lexemes(source), vec!["class", "Main", "{", "}"]);
    }

    #[test]
    fn test_string_is_opaque() {
        let tokens = tokenize("do f(\"a; (b) // c\");").unwrap();
        assert_eq!(tokens[3].kind, TokenKind::StringConstant);
        assert_eq!(tokens[3].string_value(), Some("a; (b) // c"));
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("let s = \"oops;\n").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
        assert_eq!(err.span().line, 1);
        assert_eq!(err.span().column, 9);
    }

    #[test]
    fn test_string_ends_at_line_break() {
        let err = tokenize("do f(\"one\ntwo\");").unwrap_err();
        assert_eq!(
            err,
            LexError::UnterminatedString {
                span: Span {
                    index: 5,
                    size: 4,
                    line: 1,
                    column: 6
                }
            }
        );

        let err = tokenize("do f(\"one\r\n\");").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("class /* never closed").unwrap_err();
        assert!(matches!(err, LexError::UnterminatedComment { .. }));
    }

    #[test]
    fn test_unknown_character() {
        let err = tokenize("let x = 1 $ 2;").unwrap_err();
        assert_eq!(
            err,
            LexError::UnknownCharacter {
                character: '$',
                span: Span {
                    index: 10,
                    size: 1,
                    line: 1,
                    column: 11
                }
            }
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("class Main {\n  field int x;\n}").unwrap();
        let field = &tokens[3];
        assert_eq!(field.kind, TokenKind::Keyword(Keyword::Field));
        assert_eq!((field.span.line, field.span.column), (2, 3));
        assert_eq!(field.span.fragment("class Main {\n  field int x;\n}"), "field");
    }

    #[test]
    fn test_slash_is_division() {
        assert_eq!(lexemes("a / b"), vec!["a", "/", "b"]);
    }
}
