use bufrcheck_syntax::{Category, Node, RepeatCount, SyntaxDiagnostics, parse_source};

#[test]
fn test_realistic_template() {
    let source = r#"
# synop-like section
301090, 302031
101000 031001 302034
103000 031002 007004 011001 011002
"#;
    let mut sink = SyntaxDiagnostics::new();
    let template = parse_source(source, &mut sink);

    assert!(sink.is_empty());
    assert_eq!(template.children.len(), 4);

    match &template.children[2] {
        Node::Replication(r) => {
            assert_eq!(r.spec.count, RepeatCount::Delayed);
            assert_eq!(r.span.line, 4);
            assert_eq!(r.children.len(), 1);
        }
        other => panic!("Expected replication, got {:?}", other),
    }

    match &template.children[3] {
        Node::Replication(r) => {
            assert_eq!(r.delayed_count.as_ref().map(|d| d.descriptor.y), Some(2));
            assert_eq!(r.children.len(), 3);
        }
        other => panic!("Expected replication, got {:?}", other),
    }
}

#[test]
fn test_structured_and_packed_codes_agree() {
    let mut a = SyntaxDiagnostics::new();
    let mut b = SyntaxDiagnostics::new();
    let packed = parse_source("102002 001001 001002", &mut a);
    let structured = parse_source("1-02-002 0-01-001 0-01-002", &mut b);

    assert!(a.is_empty() && b.is_empty());
    assert_eq!(packed.node_count(), structured.node_count());
    assert_eq!(packed.node_count(), 3);
}

#[test]
fn test_syntax_diagnostics_are_categorized() {
    let mut sink = SyntaxDiagnostics::new();
    parse_source("001001 0x01 001002", &mut sink);

    assert_eq!(sink.len(), 1);
    let diagnostic = &sink.diagnostics()[0];
    assert_eq!(diagnostic.category, Category::Syntax);
    assert_eq!(diagnostic.span.col, 8);
}

#[test]
fn test_each_parse_has_its_own_sink() {
    let mut first = SyntaxDiagnostics::new();
    let mut second = SyntaxDiagnostics::new();

    parse_source("bad", &mut first);
    parse_source("001001", &mut second);

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}

#[test]
fn test_parse_is_deterministic() {
    let source = "102002 101000 031001 001001 ?? 001002";
    let mut a = SyntaxDiagnostics::new();
    let mut b = SyntaxDiagnostics::new();

    let first = parse_source(source, &mut a);
    let second = parse_source(source, &mut b);

    assert_eq!(first, second);
    assert_eq!(a.diagnostics(), b.diagnostics());
}

#[test]
fn test_tree_display() {
    let mut sink = SyntaxDiagnostics::new();
    let template = parse_source("101000 031001 001001", &mut sink);
    let rendered = template.to_string();

    assert!(rendered.starts_with("template\n"));
    assert!(rendered.contains("101000 replication width=1 count=delayed (1/1 present) @1:1"));
    assert!(rendered.contains("[count] 031001 delayed descriptor replication factor"));
    assert!(rendered.contains("    001001 element @1:15"));
}
