use super::{
    ir::{ArithOp, LabelKind, Segment, VmCommand},
    symbol::{SymbolError, SymbolKind, SymbolTable},
    CompileError, Limit,
};
use crate::{
    parsing::{
        AstVisitor, Class, ClassVarDec, ClassVarKind, DoStatement, Expression, Ident, IfStatement,
        KeywordValue, LetStatement, ReturnStatement, Statements, StringConstant, SubroutineCall,
        SubroutineDec, SubroutineKind, Term, WhileStatement,
    },
    tokens::{Span, MAX_INT_CONSTANT},
};
use smol_str::SmolStr;

/// Scratch slot for values in transit.
const TEMP_SCRATCH: u16 = 0;
/// Pointer slot bound to the current object.
const POINTER_THIS: u16 = 0;
/// Pointer slot bound to the current array element.
const POINTER_THAT: u16 = 1;

/// Code generator.
///
/// Walks the syntax tree of one class and emits stack machine
/// instructions, maintaining the symbol table along the way.
/// One generator compiles exactly one unit; nothing is shared
/// between units.
pub struct CodeGen {
    /// Resulting generated code.
    code: Vec<VmCommand>,
    symbols: SymbolTable,
    /// Qualifier for subroutine names and the type of `this`.
    class_name: SmolStr,
    /// Declared return type of the subroutine being compiled.
    returns_void: bool,
}

impl CodeGen {
    #[inline]
    pub fn new() -> Self {
        Self {
            code: vec![],
            symbols: SymbolTable::new(),
            class_name: SmolStr::default(),
            returns_void: false,
        }
    }

    pub fn compile(mut self, class: &Class) -> Result<Vec<VmCommand>, CompileError> {
        self.class(class)?;
        Ok(self.code)
    }

    #[inline]
    fn emit(&mut self, command: VmCommand) {
        self.code.push(command)
    }

    #[inline]
    fn push(&mut self, segment: Segment, index: u16) {
        self.emit(VmCommand::Push(segment, index))
    }

    #[inline]
    fn pop(&mut self, segment: Segment, index: u16) {
        self.emit(VmCommand::Pop(segment, index))
    }

    fn define(&mut self, ident: &Ident, ty: SmolStr, kind: SymbolKind) -> Result<(), CompileError> {
        self.symbols
            .define(ident.name.clone(), ty, kind)
            .map(|_| ())
            .map_err(|err| symbol_error(err, ident.token.span))
    }

    fn next_label(&mut self, kind: LabelKind, span: Span) -> Result<u16, CompileError> {
        let index = match kind {
            LabelKind::WhileExp | LabelKind::WhileEnd => self.symbols.next_while_label(),
            _ => self.symbols.next_if_label(),
        };
        index.ok_or(CompileError::LimitExceeded {
            limit: Limit::Labels,
            span,
        })
    }

    /// Storage location of a variable.
    fn resolve(&self, ident: &Ident) -> Result<(Segment, u16), CompileError> {
        self.symbols
            .lookup(ident.name.as_str())
            .map(|symbol| (Segment::from(symbol.kind), symbol.index))
            .ok_or_else(|| CompileError::UndefinedSymbol {
                name: ident.name.clone(),
                span: ident.token.span,
            })
    }

    /// Leave the address `base + index` on the stack.
    fn emit_element_address(&mut self, name: &Ident, index: &Expression) -> Result<(), CompileError> {
        let (segment, slot) = self.resolve(name)?;
        self.push(segment, slot);
        self.expression(index)?;
        self.emit(VmCommand::Arithmetic(ArithOp::Add));
        Ok(())
    }

    /// Build a string object by appending one character at a time.
    fn emit_string(&mut self, lit: &StringConstant) -> Result<(), CompileError> {
        let span = lit.token.span;
        let len = lit.value.chars().count();
        let size = u16::try_from(len)
            .ok()
            .filter(|size| *size <= MAX_INT_CONSTANT)
            .ok_or(CompileError::StringLength { len, span })?;

        self.push(Segment::Constant, size);
        self.emit(VmCommand::call("String.new", 1));

        for character in lit.value.chars() {
            let code = u16::try_from(u32::from(character))
                .ok()
                .filter(|code| *code <= MAX_INT_CONSTANT)
                .ok_or(CompileError::CharacterRange { character, span })?;
            self.push(Segment::Constant, code);
            self.emit(VmCommand::call("String.appendChar", 2));
        }

        Ok(())
    }
}

fn symbol_error(err: SymbolError, span: Span) -> CompileError {
    match err {
        SymbolError::Exists { name } => CompileError::SymbolExists { name, span },
        SymbolError::SlotsExhausted { kind } => CompileError::LimitExceeded {
            limit: Limit::Slots(kind),
            span,
        },
    }
}

impl Default for CodeGen {
    fn default() -> Self {
        Self::new()
    }
}

impl AstVisitor for CodeGen {
    type Output = Result<(), CompileError>;

    fn class(&mut self, class: &Class) -> Self::Output {
        self.class_name = class.name.name.clone();
        log::debug!("compiling class {}", self.class_name);

        for dec in &class.vars {
            self.class_var_dec(dec)?;
        }
        for dec in &class.subroutines {
            self.subroutine_dec(dec)?;
        }

        Ok(())
    }

    fn class_var_dec(&mut self, dec: &ClassVarDec) -> Self::Output {
        let kind = match dec.kind {
            ClassVarKind::Static => SymbolKind::Static,
            ClassVarKind::Field => SymbolKind::Field,
        };

        for name in dec.names.iter() {
            self.define(name, dec.ty.name(), kind)?;
        }

        Ok(())
    }

    /// The function header needs the local count, so every
    /// declaration is registered before anything is emitted.
    fn subroutine_dec(&mut self, dec: &SubroutineDec) -> Self::Output {
        self.symbols.start_subroutine();
        self.returns_void = dec.return_type.is_void();

        if dec.kind == SubroutineKind::Method {
            // Receiver occupies argument 0, ahead of declared parameters.
            self.symbols
                .define("this", self.class_name.clone(), SymbolKind::Argument)
                .map_err(|err| symbol_error(err, dec.name.token.span))?;
        }

        for param in dec.params.params.iter() {
            self.define(&param.name, param.ty.name(), SymbolKind::Argument)?;
        }

        for var in &dec.body.vars {
            for name in var.names.iter() {
                self.define(name, var.ty.name(), SymbolKind::Local)?;
            }
        }

        let name = SmolStr::from(format!("{}.{}", self.class_name, dec.name.name));
        let locals = self.symbols.var_count(SymbolKind::Local);
        debug_assert_eq!(usize::from(locals), dec.body.local_count());
        log::debug!("compiling {:?} {} with {} locals", dec.kind, name, locals);
        self.emit(VmCommand::Function { name, locals });

        match dec.kind {
            SubroutineKind::Constructor => {
                let size = self.symbols.field_count();
                self.push(Segment::Constant, size);
                self.emit(VmCommand::call("Memory.alloc", 1));
                self.pop(Segment::Pointer, POINTER_THIS);
            }
            SubroutineKind::Method => {
                self.push(Segment::Argument, 0);
                self.pop(Segment::Pointer, POINTER_THIS);
            }
            SubroutineKind::Function => {}
        }

        self.statements(&dec.body.statements)
    }

    fn statements(&mut self, statements: &Statements) -> Self::Output {
        for stmt in &statements.stmts {
            self.stmt(stmt)?;
        }
        Ok(())
    }

    fn let_stmt(&mut self, stmt: &LetStatement) -> Self::Output {
        match &stmt.subscript {
            None => {
                self.expression(&stmt.value)?;
                let (segment, index) = self.resolve(&stmt.name)?;
                self.pop(segment, index);
            }
            Some(subscript) => {
                // Address is computed before the value, which may itself
                // rebind the array pointer while it is evaluated.
                self.emit_element_address(&stmt.name, &subscript.expr)?;
                self.expression(&stmt.value)?;
                self.pop(Segment::Temp, TEMP_SCRATCH);
                self.pop(Segment::Pointer, POINTER_THAT);
                self.push(Segment::Temp, TEMP_SCRATCH);
                self.pop(Segment::That, 0);
            }
        }
        Ok(())
    }

    fn if_stmt(&mut self, stmt: &IfStatement) -> Self::Output {
        let index = self.next_label(LabelKind::IfTrue, stmt.keyword.span)?;
        let if_true = LabelKind::IfTrue.at(index);
        let if_false = LabelKind::IfFalse.at(index);
        let if_end = LabelKind::IfEnd.at(index);

        self.expression(&stmt.condition)?;
        self.emit(VmCommand::IfGoto(if_true));
        self.emit(VmCommand::Goto(if_false));
        self.emit(VmCommand::Label(if_true));
        self.statements(&stmt.then_block.statements)?;
        self.emit(VmCommand::Goto(if_end));
        self.emit(VmCommand::Label(if_false));
        if let Some(else_branch) = &stmt.else_branch {
            self.statements(&else_branch.block.statements)?;
        }
        self.emit(VmCommand::Label(if_end));

        Ok(())
    }

    fn while_stmt(&mut self, stmt: &WhileStatement) -> Self::Output {
        let index = self.next_label(LabelKind::WhileExp, stmt.keyword.span)?;
        let top = LabelKind::WhileExp.at(index);
        let end = LabelKind::WhileEnd.at(index);

        self.emit(VmCommand::Label(top));
        self.expression(&stmt.condition)?;
        self.emit(VmCommand::Arithmetic(ArithOp::Not));
        self.emit(VmCommand::IfGoto(end));
        self.statements(&stmt.body.statements)?;
        self.emit(VmCommand::Goto(top));
        self.emit(VmCommand::Label(end));

        Ok(())
    }

    fn do_stmt(&mut self, stmt: &DoStatement) -> Self::Output {
        self.subroutine_call(&stmt.call)?;
        self.pop(Segment::Temp, TEMP_SCRATCH);
        Ok(())
    }

    /// Every call leaves exactly one value on the stack. A bare
    /// `return` yields zero, also in a subroutine declared with a
    /// value type.
    fn return_stmt(&mut self, stmt: &ReturnStatement) -> Self::Output {
        match &stmt.value {
            Some(value) => self.expression(value)?,
            None => {
                if !self.returns_void {
                    log::warn!(
                        "{}: bare return in subroutine with a value type yields 0",
                        stmt.keyword.span
                    );
                }
                self.push(Segment::Constant, 0)
            }
        }
        self.emit(VmCommand::Return);
        Ok(())
    }

    /// Operators apply strictly left to right.
    fn expression(&mut self, expr: &Expression) -> Self::Output {
        self.term(&expr.first)?;
        for (op, term) in &expr.rest {
            self.term(term)?;
            self.emit(VmCommand::binary(op.kind));
        }
        Ok(())
    }

    fn term(&mut self, term: &Term) -> Self::Output {
        match term {
            Term::Integer(lit) => self.push(Segment::Constant, lit.value),
            Term::String(lit) => self.emit_string(lit)?,
            Term::Keyword(lit) => match lit.value {
                KeywordValue::True => {
                    self.push(Segment::Constant, 0);
                    self.emit(VmCommand::Arithmetic(ArithOp::Not));
                }
                KeywordValue::False | KeywordValue::Null => self.push(Segment::Constant, 0),
                KeywordValue::This => self.push(Segment::Pointer, POINTER_THIS),
            },
            Term::Paren(paren) => self.expression(&paren.expr)?,
            Term::Unary(unary) => {
                self.term(&unary.term)?;
                self.emit(VmCommand::unary(unary.operator.kind));
            }
            Term::Index(index) => {
                self.emit_element_address(&index.name, &index.subscript.expr)?;
                self.pop(Segment::Pointer, POINTER_THAT);
                self.push(Segment::That, 0);
            }
            Term::Call(call) => self.subroutine_call(call)?,
            Term::Var(ident) => {
                let (segment, index) = self.resolve(ident)?;
                self.push(segment, index);
            }
        }
        Ok(())
    }

    /// Resolve the call target and its implicit receiver.
    ///
    /// - `name(..)` is a method on the current object.
    /// - `var.name(..)` is a method on a variable, qualified with the variable's type.
    /// - `Class.name(..)` is a function or constructor, without a receiver.
    fn subroutine_call(&mut self, call: &SubroutineCall) -> Self::Output {
        let (qualifier, receivers) = match &call.receiver {
            None => {
                self.push(Segment::Pointer, POINTER_THIS);
                (self.class_name.clone(), 1)
            }
            Some(receiver) => {
                let variable = self
                    .symbols
                    .lookup(receiver.name.name.as_str())
                    .map(|symbol| (symbol.ty.clone(), Segment::from(symbol.kind), symbol.index));

                match variable {
                    Some((ty, segment, index)) => {
                        self.push(segment, index);
                        (ty, 1)
                    }
                    None => (receiver.name.name.clone(), 0),
                }
            }
        };

        for arg in call.args.exprs.iter() {
            self.expression(arg)?;
        }

        let name = format!("{}.{}", qualifier, call.name.name);
        let args = u16::try_from(call.args.len() + receivers).map_err(|_| {
            CompileError::LimitExceeded {
                limit: Limit::Arguments,
                span: call.name.token.span,
            }
        })?;
        self.emit(VmCommand::call(name, args));

        Ok(())
    }
}
