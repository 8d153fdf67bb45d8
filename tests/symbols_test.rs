use modgraph::symbols::{matches_filter, SymbolFilterEngine};
use modgraph::types::{Symbol, SymbolFilter, SymbolKind};

fn symbol(name: &str, kind: SymbolKind) -> Symbol {
    Symbol {
        name: name.to_string(),
        kind,
        signature: format!("{}()", name),
        doc: None,
        body: None,
        file_path: "buffer.go".to_string(),
        line: 1,
    }
}

fn method(name: &str, receiver: &str) -> Symbol {
    symbol(
        name,
        SymbolKind::Method {
            receiver: receiver.to_string(),
        },
    )
}

fn names(symbols: &[Symbol]) -> Vec<String> {
    symbols
        .iter()
        .map(|s| match s.receiver() {
            Some(r) => format!("({}).{}", r, s.name),
            None => s.name.clone(),
        })
        .collect()
}

#[test]
fn test_receiver_pointer_and_value_differ() {
    let symbols = vec![method("Write", "*Buffer"), method("Write", "Buffer")];

    let pointer = [SymbolFilter::method("Write", "*Buffer")];
    let matched = SymbolFilterEngine::new(&pointer).filter(symbols.clone());
    assert_eq!(names(&matched), vec!["(*Buffer).Write"]);

    let value = [SymbolFilter::method("Write", "Buffer")];
    let matched = SymbolFilterEngine::new(&value).filter(symbols);
    assert_eq!(names(&matched), vec!["(Buffer).Write"]);
}

#[test]
fn test_empty_receiver_matches_any_method() {
    let symbols = vec![
        method("Write", "*Buffer"),
        method("Write", "*File"),
        method("Read", "*Buffer"),
    ];
    let filters = [SymbolFilter::named("Write")];
    let matched = SymbolFilterEngine::new(&filters).filter(symbols);
    assert_eq!(names(&matched), vec!["(*Buffer).Write", "(*File).Write"]);
}

#[test]
fn test_receiver_ignored_for_non_methods() {
    let func = symbol("NewBuffer", SymbolKind::Function);
    assert!(matches_filter(&func, &SymbolFilter::method("NewBuffer", "*Buffer")));
    assert!(matches_filter(
        &symbol("Buffer", SymbolKind::Struct),
        &SymbolFilter::method("Buffer", "anything")
    ));
}

#[test]
fn test_name_match_is_exact_and_case_sensitive() {
    let func = symbol("NewBuffer", SymbolKind::Function);
    assert!(!matches_filter(&func, &SymbolFilter::named("newbuffer")));
    assert!(!matches_filter(&func, &SymbolFilter::named("New")));
    assert!(!matches_filter(&func, &SymbolFilter::named("NewBuffer2")));
}

#[test]
fn test_input_order_preserved_and_each_symbol_once() {
    let symbols = vec![
        symbol("Reset", SymbolKind::Function),
        method("Len", "*Buffer"),
        symbol("MinRead", SymbolKind::Constant),
        symbol("ErrTooLarge", SymbolKind::Variable),
    ];
    // Overlapping filters select Len twice; it must appear once.
    let filters = [
        SymbolFilter::named("ErrTooLarge"),
        SymbolFilter::named("Len"),
        SymbolFilter::method("Len", "*Buffer"),
        SymbolFilter::named("Reset"),
    ];
    let matched = SymbolFilterEngine::new(&filters).filter(symbols);
    assert_eq!(names(&matched), vec!["Reset", "(*Buffer).Len", "ErrTooLarge"]);
}

#[test]
fn test_no_match_yields_empty() {
    let filters = [SymbolFilter::named("Missing")];
    let engine = SymbolFilterEngine::new(&filters);
    assert!(engine.filter(vec![symbol("Present", SymbolKind::Interface)]).is_empty());
    assert!(engine.filter(Vec::new()).is_empty());
}

#[test]
fn test_symbol_kind_serializes_with_receiver() {
    let json = serde_json::to_value(method("Write", "*Buffer")).unwrap();
    assert_eq!(json["kind"], "method");
    assert_eq!(json["receiver"], "*Buffer");

    let json = serde_json::to_value(symbol("Buffer", SymbolKind::Struct)).unwrap();
    assert_eq!(json["kind"], "struct");
    assert!(json.get("receiver").is_none());
}

#[test]
fn test_filter_deserializes_without_receiver() {
    let filter: SymbolFilter = serde_json::from_str(r#"{"name":"Write"}"#).unwrap();
    assert_eq!(filter, SymbolFilter::named("Write"));
}
