use crate::types::{Symbol, SymbolFilter, SymbolKind};

/// Selects symbols matching any of a set of name/receiver filters.
///
/// `filters` must be non-empty; callers reject empty filter lists before
/// reaching the engine.
pub struct SymbolFilterEngine<'a> {
    filters: &'a [SymbolFilter],
}

impl<'a> SymbolFilterEngine<'a> {
    pub fn new(filters: &'a [SymbolFilter]) -> Self {
        Self { filters }
    }

    /// Keeps the symbols matched by at least one filter, in input order.
    pub fn filter(&self, symbols: Vec<Symbol>) -> Vec<Symbol> {
        symbols.into_iter().filter(|s| self.is_match(s)).collect()
    }

    /// Returns `true` if any filter selects `symbol`.
    pub fn is_match(&self, symbol: &Symbol) -> bool {
        self.filters.iter().any(|f| matches_filter(symbol, f))
    }
}

/// Exact, case-sensitive name match. For methods a non-empty filter
/// receiver must equal the symbol's receiver (`*T` and `T` differ).
pub fn matches_filter(symbol: &Symbol, filter: &SymbolFilter) -> bool {
    if symbol.name != filter.name {
        return false;
    }
    match &symbol.kind {
        SymbolKind::Method { receiver } => {
            filter.receiver.is_empty() || *receiver == filter.receiver
        }
        SymbolKind::Function
        | SymbolKind::Struct
        | SymbolKind::Interface
        | SymbolKind::Variable
        | SymbolKind::Constant
        | SymbolKind::Field
        | SymbolKind::Other => true,
    }
}
