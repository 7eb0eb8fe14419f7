//! Symbol table with a class scope and a subroutine scope.
use smol_str::SmolStr;
use std::{collections::BTreeMap, error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: SmolStr,
    /// Declared type, either a primitive or a class name.
    pub ty: SmolStr,
    pub kind: SymbolKind,
    /// Slot within the symbol's storage kind.
    pub index: u16,
}

/// Storage kind of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Static,
    Field,
    Argument,
    Local,
}

impl SymbolKind {
    /// Class level kinds outlive a single subroutine.
    #[inline]
    pub fn is_class_level(&self) -> bool {
        matches!(self, SymbolKind::Static | SymbolKind::Field)
    }

    fn slot(&self) -> usize {
        match self {
            SymbolKind::Static => 0,
            SymbolKind::Field => 1,
            SymbolKind::Argument => 2,
            SymbolKind::Local => 3,
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolKind::Static => write!(f, "static"),
            SymbolKind::Field => write!(f, "field"),
            SymbolKind::Argument => write!(f, "argument"),
            SymbolKind::Local => write!(f, "local"),
        }
    }
}

/// Two level symbol table for one compilation unit.
///
/// Statics and fields live in the class scope for the whole unit.
/// Arguments and locals live in the subroutine scope, which is
/// cleared at the start of every subroutine. Lookups prefer the
/// subroutine scope.
///
/// The table also hands out the numeric suffixes for branch labels.
/// Those counters are never reset, so every label in the unit is
/// unique regardless of which subroutine it appears in.
#[derive(Debug, Default)]
pub struct SymbolTable {
    class_scope: BTreeMap<SmolStr, Symbol>,
    subroutine_scope: BTreeMap<SmolStr, Symbol>,
    /// Next free slot per storage kind.
    counters: [u16; 4],
    if_labels: u16,
    while_labels: u16,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new symbol at the next free slot of its kind.
    ///
    /// Fails if the name already exists in the scope the kind belongs to.
    /// A subroutine level name may shadow a class level one.
    pub fn define(
        &mut self,
        name: impl Into<SmolStr>,
        ty: impl Into<SmolStr>,
        kind: SymbolKind,
    ) -> Result<&Symbol, SymbolError> {
        let name = name.into();
        let scope = if kind.is_class_level() {
            &mut self.class_scope
        } else {
            &mut self.subroutine_scope
        };

        if scope.contains_key(&name) {
            return Err(SymbolError::Exists { name });
        }

        let counter = &mut self.counters[kind.slot()];
        let index = *counter;
        *counter = counter
            .checked_add(1)
            .ok_or(SymbolError::SlotsExhausted { kind })?;

        log::trace!("define {} {} {}", kind, name, index);

        Ok(scope.entry(name.clone()).or_insert(Symbol {
            ty: ty.into(),
            name,
            kind,
            index,
        }))
    }

    /// Clear the subroutine scope and its slot counters.
    ///
    /// Class scope and label counters are untouched.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
        self.counters[SymbolKind::Argument.slot()] = 0;
        self.counters[SymbolKind::Local.slot()] = 0;
    }

    /// Lookup the given symbol name according to the scope rules.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    /// Number of symbols defined so far with the given kind.
    #[inline]
    pub fn var_count(&self, kind: SymbolKind) -> u16 {
        self.counters[kind.slot()]
    }

    /// Number of fields, which is the size of an instance.
    #[inline]
    pub fn field_count(&self) -> u16 {
        self.var_count(SymbolKind::Field)
    }

    /// Suffix for the next `if` construct, or `None` once the
    /// counter is exhausted.
    pub fn next_if_label(&mut self) -> Option<u16> {
        let index = self.if_labels;
        self.if_labels = index.checked_add(1)?;
        Some(index)
    }

    pub fn next_while_label(&mut self) -> Option<u16> {
        let index = self.while_labels;
        self.while_labels = index.checked_add(1)?;
        Some(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    /// Attempt to define a name twice in the same scope.
    Exists { name: SmolStr },
    /// Every slot of the storage kind is taken.
    SlotsExhausted { kind: SymbolKind },
}

impl error::Error for SymbolError {}

impl fmt::Display for SymbolError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolError::Exists { name } => write!(f, "symbol '{}' is already defined", name),
            SymbolError::SlotsExhausted { kind } => write!(f, "out of {} slots", kind),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_slots_per_kind() {
        let mut table = SymbolTable::new();
        table.define("a", "int", SymbolKind::Field).unwrap();
        table.define("b", "int", SymbolKind::Static).unwrap();
        table.define("c", "Point", SymbolKind::Field).unwrap();

        assert_eq!(table.lookup("a").map(|s| s.index), Some(0));
        assert_eq!(table.lookup("b").map(|s| s.index), Some(0));
        assert_eq!(table.lookup("c").map(|s| s.index), Some(1));
        assert_eq!(table.field_count(), 2);
    }

    #[test]
    fn test_subroutine_scope_reset() {
        let mut table = SymbolTable::new();
        table.define("count", "int", SymbolKind::Static).unwrap();

        table.start_subroutine();
        table.define("x", "int", SymbolKind::Local).unwrap();
        table.define("y", "int", SymbolKind::Argument).unwrap();
        assert_eq!(table.var_count(SymbolKind::Local), 1);

        table.start_subroutine();
        assert!(table.lookup("x").is_none());
        assert!(table.lookup("count").is_some());
        assert_eq!(table.var_count(SymbolKind::Local), 0);
        assert_eq!(table.var_count(SymbolKind::Static), 1);

        let x = table.define("x", "boolean", SymbolKind::Local).unwrap();
        assert_eq!(x.ty, "boolean");
        assert_eq!(x.index, 0);
    }

    #[test]
    fn test_shadowing() {
        let mut table = SymbolTable::new();
        table.define("x", "int", SymbolKind::Field).unwrap();
        table.start_subroutine();
        table.define("x", "char", SymbolKind::Argument).unwrap();

        let x = table.lookup("x").unwrap();
        assert_eq!(x.kind, SymbolKind::Argument);
        assert_eq!(x.ty, "char");
    }

    #[test]
    fn test_duplicate_in_scope() {
        let mut table = SymbolTable::new();
        table.start_subroutine();
        table.define("i", "int", SymbolKind::Local).unwrap();
        let err = table.define("i", "int", SymbolKind::Argument).unwrap_err();
        assert_eq!(err, SymbolError::Exists { name: "i".into() });
        // Failed definition does not consume a slot.
        assert_eq!(table.var_count(SymbolKind::Argument), 0);
    }

    #[test]
    fn test_labels_survive_subroutines() {
        let mut table = SymbolTable::new();
        assert_eq!(table.next_if_label(), Some(0));
        assert_eq!(table.next_while_label(), Some(0));
        table.start_subroutine();
        assert_eq!(table.next_if_label(), Some(1));
        assert_eq!(table.next_if_label(), Some(2));
        assert_eq!(table.next_while_label(), Some(1));
    }

    #[test]
    fn test_label_counter_exhausted() {
        let mut table = SymbolTable::new();
        table.if_labels = u16::MAX - 1;
        assert_eq!(table.next_if_label(), Some(u16::MAX - 1));
        assert_eq!(table.next_if_label(), None);
        assert_eq!(table.next_if_label(), None);

        table.while_labels = u16::MAX;
        assert_eq!(table.next_while_label(), None);
    }

    #[test]
    fn test_slots_exhausted() {
        let mut table = SymbolTable::new();
        table.start_subroutine();
        table.counters[SymbolKind::Local.slot()] = u16::MAX;

        let err = table.define("a", "int", SymbolKind::Local).unwrap_err();
        assert_eq!(err, SymbolError::SlotsExhausted { kind: SymbolKind::Local });
        assert!(table.lookup("a").is_none());
        assert_eq!(table.var_count(SymbolKind::Local), u16::MAX);
    }
}
