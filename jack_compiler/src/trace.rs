//! Parse trace.
//!
//! Serializes the grammar derivation of a class as nested markup,
//! one element per production and one inline element per token.
use crate::{
    parsing::{
        AstVisitor, Class, ClassVarDec, Delimited, DoStatement, Expression, Ident, IfStatement,
        LetStatement, ReturnStatement, Statements, SubroutineCall, SubroutineDec, Term,
        WhileStatement,
    },
    tokens::Token,
};

const INDENT: &str = "  ";

/// Render the parse trace of a class.
pub fn write_trace(class: &Class) -> String {
    let mut writer = TraceWriter::new();
    writer.class(class);
    writer.finish()
}

/// Render the flat token listing of a unit.
pub fn token_listing(tokens: &[Token]) -> String {
    let mut out = String::from("<tokens>\n");
    for token in tokens {
        out.push_str(&token.to_markup());
        out.push('\n');
    }
    out.push_str("</tokens>\n");
    out
}

/// Markup writer tracking the nesting depth.
#[derive(Debug, Default)]
pub struct TraceWriter {
    out: String,
    depth: usize,
}

impl TraceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, tag: &str) {
        self.line(&format!("<{tag}>"));
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth -= 1;
        self.line(&format!("</{tag}>"));
    }

    fn token(&mut self, token: &Token) {
        self.line(&token.to_markup());
    }

    fn ident(&mut self, ident: &Ident) {
        self.token(&ident.token);
    }

    fn idents(&mut self, names: &Delimited<Ident>) {
        for item in &names.items {
            self.ident(&item.item);
            if let Some(comma) = &item.comma {
                self.token(comma);
            }
        }
    }
}

impl AstVisitor for TraceWriter {
    type Output = ();

    fn class(&mut self, class: &Class) {
        self.open("class");
        self.token(&class.keyword);
        self.ident(&class.name);
        self.token(&class.left_brace);
        for dec in &class.vars {
            self.class_var_dec(dec);
        }
        for dec in &class.subroutines {
            self.subroutine_dec(dec);
        }
        self.token(&class.right_brace);
        self.close("class");
    }

    fn class_var_dec(&mut self, dec: &ClassVarDec) {
        self.open("classVarDec");
        self.token(&dec.keyword);
        self.token(dec.ty.token());
        self.idents(&dec.names);
        self.token(&dec.semicolon);
        self.close("classVarDec");
    }

    fn subroutine_dec(&mut self, dec: &SubroutineDec) {
        self.open("subroutineDec");
        self.token(&dec.keyword);
        self.token(dec.return_type.token());
        self.ident(&dec.name);
        self.token(&dec.left_paren);

        self.open("parameterList");
        for item in &dec.params.params.items {
            self.token(item.item.ty.token());
            self.ident(&item.item.name);
            if let Some(comma) = &item.comma {
                self.token(comma);
            }
        }
        self.close("parameterList");

        self.token(&dec.right_paren);

        let body = &dec.body;
        self.open("subroutineBody");
        self.token(&body.left_brace);
        for var in &body.vars {
            self.open("varDec");
            self.token(&var.keyword);
            self.token(var.ty.token());
            self.idents(&var.names);
            self.token(&var.semicolon);
            self.close("varDec");
        }
        self.statements(&body.statements);
        self.token(&body.right_brace);
        self.close("subroutineBody");

        self.close("subroutineDec");
    }

    fn statements(&mut self, statements: &Statements) {
        self.open("statements");
        for stmt in &statements.stmts {
            self.stmt(stmt);
        }
        self.close("statements");
    }

    fn let_stmt(&mut self, stmt: &LetStatement) {
        self.open("letStatement");
        self.token(&stmt.keyword);
        self.ident(&stmt.name);
        if let Some(subscript) = &stmt.subscript {
            self.token(&subscript.left_bracket);
            self.expression(&subscript.expr);
            self.token(&subscript.right_bracket);
        }
        self.token(&stmt.eq);
        self.expression(&stmt.value);
        self.token(&stmt.semicolon);
        self.close("letStatement");
    }

    fn if_stmt(&mut self, stmt: &IfStatement) {
        self.open("ifStatement");
        self.token(&stmt.keyword);
        self.token(&stmt.left_paren);
        self.expression(&stmt.condition);
        self.token(&stmt.right_paren);
        self.token(&stmt.then_block.left_brace);
        self.statements(&stmt.then_block.statements);
        self.token(&stmt.then_block.right_brace);
        if let Some(else_branch) = &stmt.else_branch {
            self.token(&else_branch.keyword);
            self.token(&else_branch.block.left_brace);
            self.statements(&else_branch.block.statements);
            self.token(&else_branch.block.right_brace);
        }
        self.close("ifStatement");
    }

    fn while_stmt(&mut self, stmt: &WhileStatement) {
        self.open("whileStatement");
        self.token(&stmt.keyword);
        self.token(&stmt.left_paren);
        self.expression(&stmt.condition);
        self.token(&stmt.right_paren);
        self.token(&stmt.body.left_brace);
        self.statements(&stmt.body.statements);
        self.token(&stmt.body.right_brace);
        self.close("whileStatement");
    }

    fn do_stmt(&mut self, stmt: &DoStatement) {
        self.open("doStatement");
        self.token(&stmt.keyword);
        self.subroutine_call(&stmt.call);
        self.token(&stmt.semicolon);
        self.close("doStatement");
    }

    fn return_stmt(&mut self, stmt: &ReturnStatement) {
        self.open("returnStatement");
        self.token(&stmt.keyword);
        if let Some(value) = &stmt.value {
            self.expression(value);
        }
        self.token(&stmt.semicolon);
        self.close("returnStatement");
    }

    fn expression(&mut self, expr: &Expression) {
        self.open("expression");
        self.term(&expr.first);
        for (op, term) in &expr.rest {
            self.token(&op.token);
            self.term(term);
        }
        self.close("expression");
    }

    fn term(&mut self, term: &Term) {
        self.open("term");
        match term {
            Term::Integer(lit) => self.token(&lit.token),
            Term::String(lit) => self.token(&lit.token),
            Term::Keyword(lit) => self.token(&lit.token),
            Term::Paren(paren) => {
                self.token(&paren.left_paren);
                self.expression(&paren.expr);
                self.token(&paren.right_paren);
            }
            Term::Unary(unary) => {
                self.token(&unary.operator.token);
                self.term(&unary.term);
            }
            Term::Index(index) => {
                self.ident(&index.name);
                self.token(&index.subscript.left_bracket);
                self.expression(&index.subscript.expr);
                self.token(&index.subscript.right_bracket);
            }
            Term::Call(call) => self.subroutine_call(call),
            Term::Var(ident) => self.ident(ident),
        }
        self.close("term");
    }

    /// Calls have no element of their own; their tokens are
    /// inlined into the enclosing production.
    fn subroutine_call(&mut self, call: &SubroutineCall) {
        if let Some(receiver) = &call.receiver {
            self.ident(&receiver.name);
            self.token(&receiver.dot);
        }
        self.ident(&call.name);
        self.token(&call.left_paren);

        self.open("expressionList");
        for item in &call.args.exprs.items {
            self.expression(&item.item);
            if let Some(comma) = &item.comma {
                self.token(comma);
            }
        }
        self.close("expressionList");

        self.token(&call.right_paren);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{lex::tokenize, parsing::Parse, token_stream::TokenStream};

    #[test]
    fn test_token_listing() {
        let tokens = tokenize("if (x < 0) { let s = \"a&b\"; }").unwrap();
        let listing = token_listing(&tokens);
        let mut lines = listing.lines();

        assert_eq!(lines.next(), Some("<tokens>"));
        assert_eq!(lines.next(), Some("<keyword> if </keyword>"));
        assert_eq!(lines.next(), Some("<symbol> ( </symbol>"));
        assert_eq!(lines.next(), Some("<identifier> x </identifier>"));
        assert_eq!(lines.next(), Some("<symbol> &lt; </symbol>"));
        assert_eq!(lines.next(), Some("<integerConstant> 0 </integerConstant>"));
        assert!(listing.contains("<stringConstant> a&amp;b </stringConstant>"));
        assert_eq!(listing.lines().last(), Some("</tokens>"));
    }

    #[test]
    fn test_empty_parameter_list() {
        let mut stream =
            TokenStream::from_source("class A { function void f() { return; } }").unwrap();
        let class = Class::parse(&mut stream).unwrap();
        let trace = write_trace(&class);

        assert!(trace.contains("    <parameterList>\n    </parameterList>\n"));
        assert!(trace.starts_with("<class>\n  <keyword> class </keyword>\n"));
        assert!(trace.ends_with("  <symbol> } </symbol>\n</class>\n"));
    }
}
