use jack_compiler::{
    compile::{CompileError, Limit},
    compile_str, lex::LexError, parsing::ParseError,
    token_stream::TokenError, JackError,
};

#[test]
fn test_undefined_symbol() {
    let source = "class E {\n  function void f() {\n    let x = 1;\n    return;\n  }\n}";
    let err = compile_str(source).unwrap_err();

    match &err {
        JackError::Compile(CompileError::UndefinedSymbol { name, span }) => {
            assert_eq!(name, "x");
            assert_eq!((span.line, span.column), (3, 9));
        }
        _ => panic!("expected undefined symbol, got {err}"),
    }
    assert_eq!(err.span().map(|s| s.surrounding_line(source).0), Some("    let x = 1;"));
}

#[test]
fn test_missing_semicolon() {
    let err = compile_str("class E { function void f() { var int x; let x = 1 } }").unwrap_err();

    match err {
        JackError::Parse(ParseError::Token(TokenError::Mismatch { encountered, .. })) => {
            assert_eq!(encountered.lexeme, "}");
        }
        _ => panic!("expected token mismatch, got {err}"),
    }
}

#[test]
fn test_unexpected_end_of_source() {
    let err = compile_str("class E {").unwrap_err();
    assert!(matches!(
        err,
        JackError::Parse(ParseError::Token(TokenError::EndOfSource { .. }))
    ));
}

#[test]
fn test_unterminated_string() {
    let err = compile_str("class E { function void f() { do Output.printString(\"oops); return; } }")
        .unwrap_err();
    assert!(matches!(err, JackError::Lex(LexError::UnterminatedString { .. })));
}

#[test]
fn test_integer_range() {
    assert!(compile_str("class E { function int f() { return 32767; } }").is_ok());

    let err = compile_str("class E { function int f() { return 32768; } }").unwrap_err();
    match err {
        JackError::Parse(ParseError::IntegerRange { token }) => assert_eq!(token.lexeme, "32768"),
        _ => panic!("expected integer range error, got {err}"),
    }
}

#[test]
fn test_trailing_tokens() {
    let err = compile_str("class A { } class B { }").unwrap_err();
    match err {
        JackError::Parse(ParseError::TrailingTokens { token }) => {
            assert_eq!(token.lexeme, "class");
            assert_eq!(token.span.column, 13);
        }
        _ => panic!("expected trailing tokens, got {err}"),
    }
}

#[test]
fn test_duplicate_field() {
    let err = compile_str("class D { field int a; static char a; }").unwrap_err();
    assert!(matches!(
        err,
        JackError::Compile(CompileError::SymbolExists { .. })
    ));
}

#[test]
fn test_error_messages() {
    let err = compile_str("class E { function void f() { let y = 2; return; } }").unwrap_err();
    assert_eq!(err.to_string(), "compile error: 1:35: undefined symbol 'y'");
}

#[test]
fn test_argument_count_limit() {
    let args = vec!["0"; usize::from(u16::MAX)].join(",");

    // A function call has no receiver, so every slot is available.
    let source = format!("class A {{ function void f() {{ do Sys.run({args}); return; }} }}");
    assert!(compile_str(&source).is_ok());

    // The implicit receiver pushes the count past the limit.
    let source = format!("class A {{ method void f() {{ do run({args}); return; }} }}");
    let err = compile_str(&source).unwrap_err();
    match err {
        JackError::Compile(CompileError::LimitExceeded { limit, span }) => {
            assert_eq!(limit, Limit::Arguments);
            assert_eq!(span.column, 32);
        }
        _ => panic!("expected argument limit, got {err}"),
    }
}

#[test]
fn test_string_across_lines() {
    let err = compile_str("class E { function void f() {\n do Output.printString(\"a\nb\"); return; } }")
        .unwrap_err();
    match err {
        JackError::Lex(LexError::UnterminatedString { span }) => {
            assert_eq!((span.line, span.column), (2, 24));
        }
        _ => panic!("expected unterminated string, got {err}"),
    }
}
