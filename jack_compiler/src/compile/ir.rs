//! Stack machine instructions.
use crate::{
    compile::symbol::SymbolKind,
    parsing::{BinOpKind, UnaryOpKind},
};
use smol_str::SmolStr;
use std::fmt;

/// One instruction of the stack machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmCommand {
    /// `push segment index`
    Push(Segment, u16),
    /// `pop segment index`
    Pop(Segment, u16),
    Arithmetic(ArithOp),
    Label(Label),
    Goto(Label),
    /// Pops the top of the stack and jumps if it is not zero.
    IfGoto(Label),
    /// Function header with the number of locals to allocate.
    Function { name: SmolStr, locals: u16 },
    Call { name: SmolStr, args: u16 },
    Return,
}

impl VmCommand {
    #[inline]
    pub fn call(name: impl Into<SmolStr>, args: u16) -> Self {
        VmCommand::Call {
            name: name.into(),
            args,
        }
    }

    /// Instruction sequence for a binary operator.
    ///
    /// Multiplication and division have no native instruction and
    /// are delegated to the math library.
    #[rustfmt::skip]
    pub fn binary(op: BinOpKind) -> Self {
        use ArithOp as A;
        match op {
            BinOpKind::Add => VmCommand::Arithmetic(A::Add),
            BinOpKind::Sub => VmCommand::Arithmetic(A::Sub),
            BinOpKind::And => VmCommand::Arithmetic(A::And),
            BinOpKind::Or  => VmCommand::Arithmetic(A::Or),
            BinOpKind::Lt  => VmCommand::Arithmetic(A::Lt),
            BinOpKind::Gt  => VmCommand::Arithmetic(A::Gt),
            BinOpKind::Eq  => VmCommand::Arithmetic(A::Eq),
            BinOpKind::Mul => VmCommand::call("Math.multiply", 2),
            BinOpKind::Div => VmCommand::call("Math.divide", 2),
        }
    }

    pub fn unary(op: UnaryOpKind) -> Self {
        match op {
            UnaryOpKind::Neg => VmCommand::Arithmetic(ArithOp::Neg),
            UnaryOpKind::Not => VmCommand::Arithmetic(ArithOp::Not),
        }
    }

    /// Net change in stack depth when the instruction executes.
    ///
    /// A call consumes its arguments and leaves the return value.
    /// `return` is counted as consuming the returned value.
    pub fn stack_effect(&self) -> i32 {
        match self {
            VmCommand::Push(_, _) => 1,
            VmCommand::Pop(_, _) => -1,
            VmCommand::Arithmetic(op) if op.is_unary() => 0,
            VmCommand::Arithmetic(_) => -1,
            VmCommand::Label(_) | VmCommand::Goto(_) => 0,
            VmCommand::IfGoto(_) => -1,
            VmCommand::Function { .. } => 0,
            VmCommand::Call { args, .. } => 1 - i32::from(*args),
            VmCommand::Return => -1,
        }
    }
}

/// Outputs instruction in the textual stack machine syntax.
impl fmt::Display for VmCommand {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VmCommand::Push(segment, index)   => write!(f, "push {} {}", segment, index),
            VmCommand::Pop(segment, index)    => write!(f, "pop {} {}", segment, index),
            VmCommand::Arithmetic(op)         => write!(f, "{}", op),
            VmCommand::Label(label)           => write!(f, "label {}", label),
            VmCommand::Goto(label)            => write!(f, "goto {}", label),
            VmCommand::IfGoto(label)          => write!(f, "if-goto {}", label),
            VmCommand::Function { name, locals } => write!(f, "function {} {}", name, locals),
            VmCommand::Call { name, args }    => write!(f, "call {} {}", name, args),
            VmCommand::Return                 => write!(f, "return"),
        }
    }
}

/// Render a program, one instruction per line.
pub fn render(code: &[VmCommand]) -> String {
    let mut out = String::new();
    for command in code {
        out.push_str(&command.to_string());
        out.push('\n');
    }
    out
}

/// Abstract memory region of the stack machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Argument => "argument",
            Segment::Local    => "local",
            Segment::Static   => "static",
            Segment::This     => "this",
            Segment::That     => "that",
            Segment::Pointer  => "pointer",
            Segment::Temp     => "temp",
        }
    }
}

/// Fields live in the segment of the current object.
impl From<SymbolKind> for Segment {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Static => Segment::Static,
            SymbolKind::Field => Segment::This,
            SymbolKind::Argument => Segment::Argument,
            SymbolKind::Local => Segment::Local,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl ArithOp {
    #[inline]
    pub fn is_unary(&self) -> bool {
        matches!(self, ArithOp::Neg | ArithOp::Not)
    }
}

impl fmt::Display for ArithOp {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArithOp::Add => write!(f, "add"),
            ArithOp::Sub => write!(f, "sub"),
            ArithOp::Neg => write!(f, "neg"),
            ArithOp::Eq  => write!(f, "eq"),
            ArithOp::Gt  => write!(f, "gt"),
            ArithOp::Lt  => write!(f, "lt"),
            ArithOp::And => write!(f, "and"),
            ArithOp::Or  => write!(f, "or"),
            ArithOp::Not => write!(f, "not"),
        }
    }
}

/// Branch target, made unique by its numeric suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    pub kind: LabelKind,
    pub index: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    IfTrue,
    IfFalse,
    IfEnd,
    WhileExp,
    WhileEnd,
}

impl LabelKind {
    #[inline]
    pub fn at(self, index: u16) -> Label {
        Label { kind: self, index }
    }
}

impl fmt::Display for Label {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = match self.kind {
            LabelKind::IfTrue   => "IF_TRUE",
            LabelKind::IfFalse  => "IF_FALSE",
            LabelKind::IfEnd    => "IF_END",
            LabelKind::WhileExp => "WHILE_EXP",
            LabelKind::WhileEnd => "WHILE_END",
        };
        write!(f, "{}{}", prefix, self.index)
    }
}
