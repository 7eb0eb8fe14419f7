use super::{
    block::Statements,
    expr::{Expression, SubroutineCall, Term},
    func::SubroutineDec,
    stmts::{DoStatement, IfStatement, LetStatement, ReturnStatement, Statement, WhileStatement},
    unit::{Class, ClassVarDec},
};

/// Walks the syntax tree of one compilation unit.
///
/// Implementors decide the traversal order of child nodes inside
/// each production; only statement dispatch is shared.
pub trait AstVisitor {
    type Output;

    fn class(&mut self, class: &Class) -> Self::Output;
    fn class_var_dec(&mut self, dec: &ClassVarDec) -> Self::Output;
    fn subroutine_dec(&mut self, dec: &SubroutineDec) -> Self::Output;
    fn statements(&mut self, statements: &Statements) -> Self::Output;
    fn let_stmt(&mut self, stmt: &LetStatement) -> Self::Output;
    fn if_stmt(&mut self, stmt: &IfStatement) -> Self::Output;
    fn while_stmt(&mut self, stmt: &WhileStatement) -> Self::Output;
    fn do_stmt(&mut self, stmt: &DoStatement) -> Self::Output;
    fn return_stmt(&mut self, stmt: &ReturnStatement) -> Self::Output;
    fn expression(&mut self, expr: &Expression) -> Self::Output;
    fn term(&mut self, term: &Term) -> Self::Output;
    fn subroutine_call(&mut self, call: &SubroutineCall) -> Self::Output;

    #[inline]
    fn stmt(&mut self, stmt: &Statement) -> Self::Output {
        match stmt {
            Statement::Let(stmt) => self.let_stmt(stmt),
            Statement::If(stmt) => self.if_stmt(stmt),
            Statement::While(stmt) => self.while_stmt(stmt),
            Statement::Do(stmt) => self.do_stmt(stmt),
            Statement::Return(stmt) => self.return_stmt(stmt),
        }
    }
}
