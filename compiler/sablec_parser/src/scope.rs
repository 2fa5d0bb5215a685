//! Symbol tables and the scope stack of the parser.

use indexmap::IndexMap;

use sablec_ast::Annotation;
use sablec_token::Token;

/// Lifecycle position of a symbol.
///
/// A symbol may move forward through the states but never backwards:
/// `Declared` becomes `Defined`, never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclState {
    #[default]
    None,
    /// Reserved slot for a function whose declaration is still being parsed.
    Uninitialized,
    /// Name and type known, no value yet.
    Declared,
    /// Has a value: assigned variable, function with a body, enum member.
    Defined,
    /// Bound within a function parameter table.
    FnParam,
}

/// One function parameter, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct FnParam {
    pub token: Token,
    pub annotation: Annotation,
}

/// A named entry of a symbol table.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub token: Token,
    pub annotation: Annotation,
    pub state: DeclState,
    /// field table of a struct type, empty otherwise
    pub struct_fields: SymbolTable,
    /// parameter table of a function, empty otherwise
    pub fn_params: SymbolTable,
    /// parameters registered against this function, in declaration order
    pub param_list: Vec<FnParam>,
}

impl Symbol {
    pub fn new(token: Token, annotation: Annotation, state: DeclState) -> Symbol {
        Symbol {
            token,
            annotation,
            state,
            struct_fields: SymbolTable::new(),
            fn_params: SymbolTable::new(),
            param_list: Vec::new(),
        }
    }
}

/// Mapping from identifier lexeme to [`Symbol`].
///
/// Iteration order is insertion order, so parameter and field tables keep
/// their declaration order for free.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymbolTable {
    entries: IndexMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable {
            entries: IndexMap::new(),
        }
    }

    /// Insert or overwrite: re-adding a name with an advanced declaration
    /// state replaces the prior entry. Returns a clone of the stored symbol.
    pub fn add(&mut self, key: &str, symbol: Symbol) -> Symbol {
        self.entries.insert(key.to_string(), symbol.clone());
        symbol
    }

    pub fn retrieve(&self, key: &str) -> Option<&Symbol> {
        self.entries.get(key)
    }

    pub fn is_in(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Append `param` to the parameter list of the function stored under
    /// `fn_key`. Does nothing when the function is not in this table.
    pub fn register_fn_param(&mut self, fn_key: &str, param: FnParam) {
        if let Some(symbol) = self.entries.get_mut(fn_key) {
            symbol.param_list.push(param);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Symbol)> {
        self.entries.iter()
    }
}

/// The scope stack: index 0 is the outermost (global) table.
///
/// A transient shadow slot can redirect the "current" table to an explicit
/// one, used while parsing a struct body (field table) or a function body
/// (parameter table) without pushing a stack frame. The shadowed table is
/// owned by the slot for that duration and handed back by
/// [`ScopeStack::unshadow`].
#[derive(Debug, Clone)]
pub struct ScopeStack {
    tables: Vec<SymbolTable>,
    shadow: Option<SymbolTable>,
}

impl ScopeStack {
    pub fn new() -> ScopeStack {
        ScopeStack {
            tables: vec![SymbolTable::new()],
            shadow: None,
        }
    }

    /// Current nesting depth, 0 at global scope.
    pub fn depth(&self) -> usize {
        self.tables.len() - 1
    }

    pub fn begin_scope(&mut self) {
        self.tables.push(SymbolTable::new());
    }

    /// Pop and destroy the innermost table.
    ///
    /// # Panics
    ///
    /// Ending the global scope is a compiler bug, not a user error.
    pub fn end_scope(&mut self) {
        if self.tables.len() == 1 {
            panic!("scope underflow: cannot end the global scope");
        }

        self.tables.pop();
    }

    /// The table declarations currently go into: the shadow slot when set,
    /// the innermost stack table otherwise.
    pub fn current(&self) -> &SymbolTable {
        self.shadow
            .as_ref()
            .unwrap_or_else(|| self.tables.last().unwrap())
    }

    pub fn current_mut(&mut self) -> &mut SymbolTable {
        if self.shadow.is_some() {
            self.shadow.as_mut().unwrap()
        } else {
            self.tables.last_mut().unwrap()
        }
    }

    /// Walk the enclosing scopes, innermost first, without looking at the
    /// current table.
    ///
    /// While a shadow is active the whole stack counts as "outer".
    pub fn exists_in_outer(&self, key: &str) -> Option<&Symbol> {
        let outer = if self.shadow.is_some() {
            &self.tables[..]
        } else {
            &self.tables[..self.tables.len() - 1]
        };

        outer.iter().rev().find_map(|table| table.retrieve(key))
    }

    /// Resolve `key` in the current table, then the enclosing scopes.
    pub fn lookup(&self, key: &str) -> Option<&Symbol> {
        self.current()
            .retrieve(key)
            .or_else(|| self.exists_in_outer(key))
    }

    /// Redirect the current table to `table` until [`ScopeStack::unshadow`].
    pub fn shadow(&mut self, table: SymbolTable) {
        self.shadow = Some(table);
    }

    /// Remove the shadow and hand its table back.
    ///
    /// # Panics
    ///
    /// Calling this with no shadow in place is a compiler bug.
    pub fn unshadow(&mut self) -> SymbolTable {
        self.shadow
            .take()
            .expect("unshadow called with no shadowed symbol table")
    }

    pub fn is_shadowing(&self) -> bool {
        self.shadow.is_some()
    }

    /// The global table.
    pub fn global(&self) -> &SymbolTable {
        &self.tables[0]
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        ScopeStack::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sablec_ast::TypeKind;
    use sablec_token::TokenKind;

    fn sym(state: DeclState) -> Symbol {
        Symbol::new(
            Token::dummy(),
            Annotation::of_type(TokenKind::I32),
            state,
        )
    }

    #[test]
    fn add_then_retrieve() {
        let mut table = SymbolTable::new();
        assert!(!table.is_in("x"));

        table.add("x", sym(DeclState::Declared));
        assert!(table.is_in("x"));
        assert_eq!(table.retrieve("x").unwrap().state, DeclState::Declared);
        assert_eq!(
            table.retrieve("x").unwrap().annotation.ostensible,
            TypeKind::Int
        );
    }

    #[test]
    fn re_add_advances_state() {
        let mut table = SymbolTable::new();
        table.add("x", sym(DeclState::Declared));
        table.add("x", sym(DeclState::Defined));

        assert_eq!(table.len(), 1);
        assert_eq!(table.retrieve("x").unwrap().state, DeclState::Defined);
    }

    #[test]
    fn fn_param_registration_keeps_order() {
        let mut table = SymbolTable::new();
        table.add("f", sym(DeclState::Declared));

        for name in ["a", "b", "c"] {
            let mut tok = Token::dummy();
            tok.line = name.as_bytes()[0] as u32;
            table.register_fn_param(
                "f",
                FnParam {
                    token: tok,
                    annotation: Annotation::of_type(TokenKind::I32),
                },
            );
        }

        let f = table.retrieve("f").unwrap();
        let lines: Vec<u32> = f.param_list.iter().map(|p| p.token.line).collect();
        assert_eq!(lines, vec![b'a' as u32, b'b' as u32, b'c' as u32]);
    }

    #[test]
    fn outer_scope_lookup() {
        let mut scopes = ScopeStack::new();
        scopes.current_mut().add("g", sym(DeclState::Defined));

        scopes.begin_scope();
        scopes.current_mut().add("l", sym(DeclState::Declared));

        assert!(scopes.current().is_in("l"));
        assert!(!scopes.current().is_in("g"));
        assert!(scopes.exists_in_outer("g").is_some());
        assert!(scopes.exists_in_outer("l").is_none());
        assert!(scopes.lookup("g").is_some());

        scopes.end_scope();
        assert!(scopes.lookup("l").is_none());
    }

    #[test]
    fn shadow_redirects_current_table() {
        let mut scopes = ScopeStack::new();
        scopes.current_mut().add("g", sym(DeclState::Defined));

        scopes.shadow(SymbolTable::new());
        assert!(scopes.is_shadowing());
        assert!(!scopes.current().is_in("g"));

        scopes.current_mut().add("field", sym(DeclState::Declared));
        // the whole stack is outer while shadowing
        assert!(scopes.exists_in_outer("g").is_some());

        let fields = scopes.unshadow();
        assert!(fields.is_in("field"));
        assert!(scopes.current().is_in("g"));
        assert!(!scopes.current().is_in("field"));
    }

    #[test]
    #[should_panic(expected = "scope underflow")]
    fn ending_global_scope_panics() {
        let mut scopes = ScopeStack::new();
        scopes.end_scope();
    }
}
