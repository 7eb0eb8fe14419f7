use jack_compiler::{compile_str, lex::tokenize, tokens::TokenKind};
use pretty_assertions::assert_eq;

const MAIN: &str = include_str!("Main.jack");
const MAIN_TRACE: &str = include_str!("Main.xml");
const SQUARE: &str = include_str!("Square.jack");

/// Split an inline token element into its tag and payload.
fn inline_token(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix('<')?;
    let (tag, rest) = rest.split_once("> ")?;
    let payload = rest.strip_suffix(format!(" </{tag}>").as_str())?;
    Some((tag, payload))
}

fn unescape(payload: &str) -> String {
    payload
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[test]
fn test_main_trace() {
    let unit = compile_str(MAIN).unwrap();
    assert_eq!(unit.trace, MAIN_TRACE);
}

#[test]
fn test_trace_tokens_match_listing() {
    let unit = compile_str(SQUARE).unwrap();

    let from_trace: Vec<&str> = unit
        .trace
        .lines()
        .filter(|line| inline_token(line).is_some())
        .map(str::trim_start)
        .collect();
    let from_listing: Vec<&str> = unit
        .tokens
        .lines()
        .filter(|line| *line != "<tokens>" && *line != "</tokens>")
        .collect();

    assert_eq!(from_trace, from_listing);
}

#[test]
fn test_trace_round_trip() {
    let unit = compile_str(SQUARE).unwrap();

    // Rebuild source text from the inline token elements only.
    let source: Vec<String> = unit
        .trace
        .lines()
        .filter_map(inline_token)
        .map(|(tag, payload)| match tag {
            "stringConstant" => format!("\"{}\"", unescape(payload)),
            _ => unescape(payload),
        })
        .collect();
    let relexed = tokenize(&source.join("\n")).unwrap();
    let original = tokenize(SQUARE).unwrap();

    let kinds = |tokens: &[jack_compiler::tokens::Token]| -> Vec<(TokenKind, String)> {
        tokens
            .iter()
            .map(|t| (t.kind, t.lexeme.to_string()))
            .collect()
    };
    assert_eq!(kinds(&relexed), kinds(&original));
}

#[test]
fn test_trace_escaping() {
    let unit = compile_str(SQUARE).unwrap();

    assert!(unit.trace.contains("<symbol> &lt; </symbol>"));
    assert!(unit.trace.contains("<symbol> &gt; </symbol>"));
    assert!(unit
        .trace
        .contains("<stringConstant> Size: &lt;&amp;  </stringConstant>"));
    assert!(!unit.trace.contains("<symbol> < </symbol>"));
}

#[test]
fn test_trace_nesting() {
    let unit = compile_str(SQUARE).unwrap();
    let mut open: Vec<&str> = vec![];

    for line in unit.trace.lines() {
        let text = line.trim_start();
        let indent = line.len() - text.len();

        if inline_token(line).is_some() {
            assert_eq!(indent, open.len() * 2, "misplaced token {text}");
        } else if let Some(tag) = text.strip_prefix("</") {
            let tag = tag.trim_end_matches('>');
            assert_eq!(open.pop(), Some(tag));
            assert_eq!(indent, open.len() * 2);
        } else {
            assert_eq!(indent, open.len() * 2);
            open.push(text.trim_start_matches('<').trim_end_matches('>'));
        }
    }

    assert!(open.is_empty());
    assert_eq!(unit.trace.matches("<subroutineDec>").count(), 6);
    assert_eq!(unit.trace.matches("<classVarDec>").count(), 3);
    assert_eq!(unit.trace.matches("<whileStatement>").count(), 2);
}
