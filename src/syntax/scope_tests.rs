use pretty_assertions::assert_eq;

use super::*;

fn parse(source: &str) -> Tree {
    build_tree(source, "test.ts").unwrap()
}

fn names<'a>(scope: &'a ScopeDescriptor<'_>) -> Vec<&'a str> {
    scope.members.iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn class_members_in_declaration_order() {
    let source = "class Store {\n  b = 1;\n  a() {}\n  c: string;\n}\n";
    let tree = parse(source);
    let offset = source.find("a()").unwrap();

    let scope = find_containing_scope(&tree, source, offset).unwrap();
    assert_eq!(scope.kind, ScopeKind::Class);
    assert_eq!(names(&scope), vec!["b", "a", "c"]);
    assert_eq!(
        scope
            .members
            .iter()
            .map(|m| m.syntax_kind)
            .collect::<Vec<_>>(),
        vec![MemberKind::Property, MemberKind::Method, MemberKind::Property]
    );

    for pair in scope.members.windows(2) {
        assert!(pair[0].span.end <= pair[1].span.start);
    }
}

#[test]
fn field_span_takes_its_semicolon() {
    let source = "class Store {\n  count = 1;\n}\n";
    let tree = parse(source);
    let scope = find_containing_scope(&tree, source, source.find("count").unwrap()).unwrap();
    let span = scope.members[0].span;
    assert_eq!(&source[span.start..span.end], "count = 1;");
}

#[test]
fn object_literal_scope() {
    let source = "const obj = {\n  a() {},\n  b: 2,\n  c,\n};\n";
    let tree = parse(source);
    let scope = find_containing_scope(&tree, source, source.find("b:").unwrap()).unwrap();
    assert_eq!(scope.kind, ScopeKind::Object);
    assert_eq!(names(&scope), vec!["a", "b", "c"]);
}

#[test]
fn interface_scope() {
    let source = "interface Shape {\n  area(): number;\n  name: string;\n}\n";
    let tree = parse(source);
    let scope = find_containing_scope(&tree, source, source.find("name").unwrap()).unwrap();
    assert_eq!(scope.kind, ScopeKind::Interface);
    assert_eq!(names(&scope), vec!["area", "name"]);
    assert_eq!(scope.members[0].syntax_kind, MemberKind::Method);
}

#[test]
fn namespace_scope() {
    let source = "namespace Tools {\n  export const a = 1;\n  function f() {}\n}\n";
    let tree = parse(source);
    let scope = find_containing_scope(&tree, source, source.find("f()").unwrap()).unwrap();
    assert_eq!(scope.kind, ScopeKind::Module);
    assert_eq!(names(&scope), vec!["a", "f"]);
}

#[test]
fn file_scope_when_outside_any_container() {
    let source = "const a = 1;\nfunction b() {}\nlet { c } = d;\n";
    let tree = parse(source);
    let scope = find_containing_scope(&tree, source, 0).unwrap();
    assert_eq!(scope.anchor.kind(), "program");
    assert_eq!(names(&scope), vec!["a", "b", ""]);
    assert_eq!(scope.members[2].syntax_kind, MemberKind::Variable);
}

#[test]
fn offset_beyond_source_has_no_scope() {
    let source = "const a = 1;";
    let tree = parse(source);
    assert!(find_containing_scope(&tree, source, source.len() + 1).is_none());
}

#[test]
fn exported_member_spans_the_export_keyword() {
    let source = "export function foo() {\n  return 1;\n}\n";
    let tree = parse(source);
    let member = find_member_at_position(&tree, source, source.find("return").unwrap()).unwrap();
    assert_eq!(member.name, "foo");
    assert_eq!(member.syntax_kind, MemberKind::Function);
    assert_eq!(member.span.start, 0);
}

#[test]
fn member_at_position_is_the_outermost_declaration() {
    let source = "class A {\n  run() {\n    const x = 1;\n  }\n}\n";
    let tree = parse(source);
    let member = find_member_at_position(&tree, source, source.find("x =").unwrap()).unwrap();
    assert_eq!(member.name, "run");
    assert_eq!(member.syntax_kind, MemberKind::Method);
}

#[test]
fn doc_comment_and_decorator_travel_with_member() {
    let source = "class A {\n  /** doc */\n  @dec()\n  m() {}\n}\n";
    let tree = parse(source);
    let scope = find_containing_scope(&tree, source, source.find("m()").unwrap()).unwrap();
    let span = scope.members[0].span;
    assert_eq!(span.start, source.find("/**").unwrap());
    assert_eq!(span.end, source.find("m() {}").unwrap() + "m() {}".len());
}

#[test]
fn malformed_input_still_yields_members() {
    let source = "class A {\n  m() {}\n  n( {\n";
    let tree = parse(source);
    assert!(find_containing_scope(&tree, source, 3).is_some());
}

#[test]
fn script_kind_from_file_names() {
    assert_eq!(ScriptKind::from_file_name("a.tsx"), ScriptKind::Tsx);
    assert_eq!(ScriptKind::from_file_name("a.jsx"), ScriptKind::Tsx);
    assert_eq!(ScriptKind::from_file_name("a.mjs"), ScriptKind::Js);
    assert_eq!(ScriptKind::from_file_name("a.ts"), ScriptKind::Ts);
    assert_eq!(ScriptKind::from_file_name("Untitled-1"), ScriptKind::Ts);
    assert_eq!(
        ScriptKind::infer("Untitled-1", "javascriptreact"),
        ScriptKind::Tsx
    );
}

#[test]
fn declared_names_cover_destructuring() {
    let source = "const { a, b: [c] } = obj, d = 2;";
    let tree = parse(source);
    let statement = tree.root_node().named_child(0).unwrap();
    assert_eq!(declared_names(statement, source), vec!["a", "c", "d"]);
}

#[test]
fn interface_members_leave_their_separators() {
    let source = "interface I {\n  z: string;\n  y(): void\n  x: number,\n}\n";
    let tree = parse(source);
    let scope = find_containing_scope(&tree, source, source.find("y()").unwrap()).unwrap();
    let texts = scope
        .members
        .iter()
        .map(|m| &source[m.span.start..m.span.end])
        .collect::<Vec<_>>();
    assert_eq!(texts, vec!["z: string", "y(): void", "x: number"]);
}

#[test]
fn anonymous_default_export_is_an_unnamed_function() {
    let source = "function b() {}\nexport default function () {}\nconst a = 1;\n";
    let tree = parse(source);
    let scope = find_containing_scope(&tree, source, 0).unwrap();
    assert_eq!(names(&scope), vec!["b", "", "a"]);
    assert_eq!(scope.members[1].syntax_kind, MemberKind::Function);
    assert_eq!(scope.members[1].span.start, source.find("export").unwrap());

    let member = find_member_at_position(&tree, source, source.find("default").unwrap()).unwrap();
    assert_eq!(member.name, "");
    assert_eq!(member.span.start, source.find("export").unwrap());
}
