//! End-to-end tests driving source text through the lexer and parser.

use sablec_ast::{AstNode, NodeKind, TypeKind};
use sablec_diag::DiagnosticSink;
use sablec_lexer::Lexer;

use crate::fold::fold;
use crate::scope::DeclState;
use crate::value::Value;
use crate::Parser;

fn parse(src: &str) -> (Box<AstNode>, Parser) {
    let sink = DiagnosticSink::new();
    let fid = sink.register_file("test.sb".to_string(), src.to_string());
    let lexer = Lexer::new(sink.clone(), src.to_string(), fid);
    let mut parser = Parser::new(lexer, sink, fid);

    let ast = parser.build_ast();
    (ast, parser)
}

/// First statement of the program.
fn first_stmt(ast: &AstNode) -> &AstNode {
    ast.left().expect("program has no statements")
}

/// Statement at position `n` along the chain spine.
fn nth_stmt(ast: &AstNode, n: usize) -> &AstNode {
    let mut link = ast;
    for _ in 0..n {
        link = link.right().expect("chain spine ended early");
    }
    link.left().expect("chain link with no statement")
}

/// Structural equality that ignores spans and line numbers: node kind,
/// token kind, lexeme, and children.
fn same_shape(a: &AstNode, a_src: &str, b: &AstNode, b_src: &str) -> bool {
    if a.kind != b.kind || a.token.kind != b.token.kind {
        return false;
    }
    if a.token.lexeme(a_src) != b.token.lexeme(b_src) {
        return false;
    }

    for slot in 0..3 {
        match (&a.children[slot], &b.children[slot]) {
            (None, None) => {}
            (Some(ca), Some(cb)) => {
                if !same_shape(ca, a_src, cb, b_src) {
                    return false;
                }
            }
            _ => return false,
        }
    }

    true
}

/* ======= Declarations and assignment ======= */

#[test]
fn bool_true_literal_ok() {
    let src = "bool check = true;";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());

    let check = parser.scopes.global().retrieve("check").unwrap();
    assert_eq!(check.state, DeclState::Defined);
    assert_eq!(check.annotation.ostensible, TypeKind::Bool);
    assert_eq!(check.annotation.actual, TypeKind::Bool);

    let assignment = first_stmt(&ast);
    assert_eq!(assignment.kind, NodeKind::Assignment);
    let rhs = assignment.right().unwrap();
    assert_eq!(rhs.kind, NodeKind::Literal);
    assert_eq!(rhs.token.lexeme(src), "true");
}

#[test]
fn bool_false_literal_ok() {
    let (_, parser) = parse("bool check = false;");
    assert!(!parser.sink.failed());
}

#[test]
fn bool_number_assignment_is_type_disagreement() {
    let (_, parser) = parse("bool check = 2;");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E022".to_string()));
}

#[test]
fn redeclaration_in_same_scope() {
    let (_, parser) = parse("i32 x; i32 x;");

    assert!(parser.sink.failed());
    assert_eq!(parser.sink.error_count(), 1);
    assert!(parser.sink.codes().contains(&"E014".to_string()));
}

#[test]
fn declaration_without_value_stays_declared() {
    let (ast, parser) = parse("i32 x;");

    assert!(!parser.sink.failed());
    assert_eq!(
        parser.scopes.global().retrieve("x").unwrap().state,
        DeclState::Declared
    );
    assert_eq!(first_stmt(&ast).kind, NodeKind::Declaration);
}

#[test]
fn defined_symbols_have_an_actual_kind() {
    let (_, parser) = parse(
        "i32 a = 1; bool b = true; string s = \"hi\"; char c = 'x'; f64 f = 1.5;",
    );

    assert!(!parser.sink.failed());
    for (_, symbol) in parser.scopes.global().iter() {
        assert_eq!(symbol.state, DeclState::Defined);
        assert_ne!(symbol.annotation.actual, TypeKind::None);
    }
}

#[test]
fn assignment_to_undeclared_name_errors() {
    let (_, parser) = parse("y = 3;");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E011".to_string()));
}

#[test]
fn assignment_in_non_assign_position_errors() {
    let (_, parser) = parse("i32 x = 1; i32 y = 1 + x = 5;");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E019".to_string()));
}

#[test]
fn narrow_width_initialiser_overflow() {
    let (_, parser) = parse("u8 small = 256;");
    assert!(parser.sink.codes().contains(&"E023".to_string()));

    let (_, parser) = parse("i8 small = 127;");
    assert!(!parser.sink.failed());
}

/* ======= Constant folding ======= */

#[test]
fn not_false_folds_to_true() {
    let src = "bool check = !false;";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());
    let rhs = first_stmt(&ast).right().unwrap();
    assert_eq!(fold(rhs, src), Some(Value::Bool(true)));
}

#[test]
fn not_true_folds_to_false() {
    let src = "bool check = !true;";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());
    let rhs = first_stmt(&ast).right().unwrap();
    assert_eq!(fold(rhs, src), Some(Value::Bool(false)));
}

#[test]
fn logical_and_or_truth_table() {
    let cases = [
        ("bool check = false && false;", false),
        ("bool check = true && false;", false),
        ("bool check = false && true;", false),
        ("bool check = true && true;", true),
        ("bool check = false || false;", false),
        ("bool check = true || false;", true),
        ("bool check = false || true;", true),
        ("bool check = true || true;", true),
    ];

    for (src, expected) in cases {
        let (ast, parser) = parse(src);
        assert!(!parser.sink.failed(), "unexpected error for {src}");

        let rhs = first_stmt(&ast).right().unwrap();
        assert_eq!(fold(rhs, src), Some(Value::Bool(expected)), "for {src}");
    }
}

#[test]
fn complex_bool_expression_folds_to_true() {
    let src = "bool check = (true && (false || true) && !false);";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());
    let rhs = first_stmt(&ast).right().unwrap();
    assert_eq!(fold(rhs, src), Some(Value::Bool(true)));
}

#[test]
fn arithmetic_and_comparison_folding() {
    let src = "i32 x = 2 + 3 * 4;";
    let (ast, parser) = parse(src);
    assert!(!parser.sink.failed());
    assert_eq!(
        fold(first_stmt(&ast).right().unwrap(), src),
        Some(Value::Int(14))
    );

    let src = "bool check = 2 < 3;";
    let (ast, _) = parse(src);
    assert_eq!(
        fold(first_stmt(&ast).right().unwrap(), src),
        Some(Value::Bool(true))
    );

    let src = "bool check = 1 != 2;";
    let (ast, _) = parse(src);
    assert_eq!(
        fold(first_stmt(&ast).right().unwrap(), src),
        Some(Value::Bool(true))
    );
}

#[test]
fn bitwise_folding() {
    let src = "i32 x = 12 ^ 10;";
    let (ast, _) = parse(src);
    assert_eq!(
        fold(first_stmt(&ast).right().unwrap(), src),
        Some(Value::Int(6))
    );

    let src = "i32 x = 1 << 4;";
    let (ast, _) = parse(src);
    assert_eq!(
        fold(first_stmt(&ast).right().unwrap(), src),
        Some(Value::Int(16))
    );

    let src = "i32 x = ~0;";
    let (ast, _) = parse(src);
    assert_eq!(
        fold(first_stmt(&ast).right().unwrap(), src),
        Some(Value::Int(-1))
    );
}

#[test]
fn non_constant_expressions_do_not_fold() {
    let src = "i32 x = 1; i32 y = x + 1;";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());
    let rhs = nth_stmt(&ast, 1).right().unwrap();
    assert_eq!(fold(rhs, src), None);
}

/* ======= Precedence ======= */

#[test]
fn and_and_or_share_logical_precedence() {
    // (a && b) || c: the top operator is the one written last
    let src = "bool check = true && false || true;";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());
    let rhs = first_stmt(&ast).right().unwrap();
    assert_eq!(rhs.kind, NodeKind::BinaryOp);
    assert_eq!(rhs.token.lexeme(src), "||");
    assert_eq!(rhs.left().unwrap().token.lexeme(src), "&&");
}

#[test]
fn bitwise_operators_share_bitwise_precedence() {
    // (a | b) & c
    let src = "i32 x = 1 | 2 & 3;";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());
    let rhs = first_stmt(&ast).right().unwrap();
    assert_eq!(rhs.token.lexeme(src), "&");
    assert_eq!(rhs.left().unwrap().token.lexeme(src), "|");
}

#[test]
fn factor_binds_tighter_than_term() {
    let src = "i32 x = 2 + 3 * 4;";
    let (ast, _) = parse(src);

    let rhs = first_stmt(&ast).right().unwrap();
    assert_eq!(rhs.token.lexeme(src), "+");
    assert_eq!(rhs.right().unwrap().token.lexeme(src), "*");
}

#[test]
fn unary_minus_and_grouping() {
    let src = "i32 x = -(2 + 3);";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());
    let rhs = first_stmt(&ast).right().unwrap();
    assert_eq!(rhs.kind, NodeKind::UnaryOp);
    assert_eq!(rhs.token.lexeme(src), "-");
    assert_eq!(rhs.left().unwrap().token.lexeme(src), "+");
    assert_eq!(fold(rhs, src), Some(Value::Int(-5)));
}

/* ======= Chains ======= */

#[test]
fn chain_spine_is_well_formed() {
    let (ast, parser) = parse("i32 a = 1; i32 b = 2; i32 c = 3;");

    assert!(!parser.sink.failed());
    assert_eq!(ast.kind, NodeKind::Start);

    let mut link: &AstNode = &ast;
    let mut stmts = 0;
    loop {
        if link.is_empty_chain() {
            break;
        }

        assert!(link.left().is_some(), "chain link with no statement");
        stmts += 1;
        link = link.right().expect("chain link with no tail");
    }

    assert_eq!(stmts, 3);
    assert!(link.left().is_none() && link.right().is_none());
}

#[test]
fn empty_program_is_an_empty_start_node() {
    let (ast, parser) = parse("");

    assert!(!parser.sink.failed());
    assert_eq!(ast.kind, NodeKind::Start);
    assert!(ast.left().is_none() && ast.right().is_none());
}

/* ======= Control flow ======= */

#[test]
fn if_else_chain() {
    let src = "i32 x = 1; if (x == 1) { x = 2; } else if (x == 2) { x = 3; } else { x = 4; }";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());

    let if_node = nth_stmt(&ast, 1);
    assert_eq!(if_node.kind, NodeKind::If);
    assert_eq!(if_node.left().unwrap().token.lexeme(src), "==");
    assert_eq!(if_node.middle().unwrap().kind, NodeKind::Chain);

    let else_branch = if_node.right().unwrap();
    assert_eq!(else_branch.kind, NodeKind::If);
    assert_eq!(else_branch.right().unwrap().kind, NodeKind::Chain);
}

#[test]
fn while_loop() {
    let src = "i32 i = 0; while i < 3 { i = i + 1; }";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());

    let while_node = nth_stmt(&ast, 1);
    assert_eq!(while_node.kind, NodeKind::While);
    assert_eq!(while_node.left().unwrap().token.lexeme(src), "<");
    assert!(while_node.middle().is_none());
    assert_eq!(while_node.right().unwrap().kind, NodeKind::Chain);
}

#[test]
fn for_desugars_to_init_plus_while() {
    let for_src = "for (i32 i = 0; i < 3; i++) { i32 y = 2; }";
    let (for_ast, parser) = parse(for_src);
    assert!(!parser.sink.failed());

    let while_src = "i32 i = 0; while (i < 3) { i32 y = 2; i++; }";
    let (while_ast, parser) = parse(while_src);
    assert!(!parser.sink.failed());

    // for parses to STATEMENT(init, while); the while program has them as
    // two top-level statements
    let stmt = first_stmt(&for_ast);
    assert_eq!(stmt.kind, NodeKind::Statement);

    let for_init = stmt.left().unwrap();
    let for_while = stmt.right().unwrap();

    let plain_init = nth_stmt(&while_ast, 0);
    let plain_while = nth_stmt(&while_ast, 1);

    assert!(same_shape(for_init, for_src, plain_init, while_src));
    assert!(same_shape(for_while, for_src, plain_while, while_src));
}

#[test]
fn loop_variable_stays_in_the_for_scope() {
    let (_, parser) = parse("for (i32 i = 0; i < 3; i++) { } i32 j = i;");

    // `i` is gone once the for scope ends
    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E011".to_string()));
}

#[test]
fn break_and_continue_require_semicolons() {
    let (_, parser) = parse("i32 i = 0; while i < 3 { break; }");
    assert!(!parser.sink.failed());

    let (_, parser) = parse("i32 i = 0; while i < 3 { continue; }");
    assert!(!parser.sink.failed());

    let (_, parser) = parse("i32 i = 0; while i < 3 { break }");
    assert!(parser.sink.failed());
}

#[test]
fn ternary_over_grouping() {
    let src = "i32 x = (1 == 1) ? 2 :: 3;";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());

    let rhs = first_stmt(&ast).right().unwrap();
    assert_eq!(rhs.kind, NodeKind::If);
    assert_eq!(rhs.left().unwrap().token.lexeme(src), "==");
    assert_eq!(rhs.middle().unwrap().token.lexeme(src), "2");
    assert_eq!(rhs.right().unwrap().token.lexeme(src), "3");
}

/* ======= Increment, decrement, compound assignment ======= */

#[test]
fn postfix_increment_requires_defined() {
    let src = "i32 x = 1; x++;";
    let (ast, parser) = parse(src);
    assert!(!parser.sink.failed());
    assert_eq!(nth_stmt(&ast, 1).kind, NodeKind::PostfixIncrement);

    let (_, parser) = parse("i32 x; x++;");
    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E020".to_string()));
}

#[test]
fn prefix_increment() {
    let src = "i32 x = 1; ++x;";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());
    let node = nth_stmt(&ast, 1);
    assert_eq!(node.kind, NodeKind::PrefixIncrement);
    assert_eq!(node.left().unwrap().kind, NodeKind::Identifier);
}

#[test]
fn terse_assignment_shapes() {
    let src = "i32 x = 1; x += 2;";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());
    let terse = nth_stmt(&ast, 1);
    assert_eq!(terse.kind, NodeKind::TerseAssignment);
    assert_eq!(terse.token.lexeme(src), "+=");
    assert_eq!(terse.left().unwrap().kind, NodeKind::Identifier);
    assert_eq!(terse.right().unwrap().token.lexeme(src), "2");
}

#[test]
fn terse_assignment_requires_defined() {
    let (_, parser) = parse("i32 x; x <<= 1;");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E020".to_string()));
}

/* ======= Arrays ======= */

#[test]
fn array_declaration_and_subscript() {
    let src = "i32[3] arr = 0; i32 x = arr[0];";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());

    let arr = parser.scopes.global().retrieve("arr").unwrap();
    assert!(arr.annotation.is_array);
    assert_eq!(arr.annotation.array_size, 3);

    let access = nth_stmt(&ast, 1).right().unwrap();
    assert_eq!(access.kind, NodeKind::Identifier);
    assert_eq!(access.middle().unwrap().kind, NodeKind::ArraySubscript);
}

#[test]
fn subscript_by_identifier_requires_defined() {
    let (_, parser) = parse("i32[4] arr = 0; i32 i; i32 x = arr[i];");
    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E021".to_string()));

    let (_, parser) = parse("i32[4] arr = 0; i32 i = 1; i32 x = arr[i];");
    assert!(!parser.sink.failed());
}

#[test]
fn subscripted_assignment() {
    let src = "i32[4] arr = 0; arr[2] = 9;";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());
    let assignment = nth_stmt(&ast, 1);
    assert_eq!(assignment.kind, NodeKind::Assignment);
    assert_eq!(assignment.middle().unwrap().kind, NodeKind::ArraySubscript);
    assert_eq!(assignment.right().unwrap().token.lexeme(src), "9");
}

/* ======= Enums ======= */

#[test]
fn enum_members_are_defined_symbols() {
    let (ast, parser) = parse("enum Color { RED, GREEN, BLUE }");

    assert!(!parser.sink.failed());

    let color = parser.scopes.global().retrieve("Color").unwrap();
    assert_eq!(color.annotation.ostensible, TypeKind::Enum);

    for name in ["RED", "GREEN", "BLUE"] {
        let member = parser.scopes.global().retrieve(name).unwrap();
        assert_eq!(member.state, DeclState::Defined);
        assert_eq!(member.annotation.ostensible, TypeKind::Enum);
        assert_eq!(member.annotation.actual, TypeKind::Int);
    }

    // the enum name node carries the member chain at LEFT
    let enum_node = first_stmt(&ast);
    assert_eq!(enum_node.left().unwrap().kind, NodeKind::Chain);
}

#[test]
fn enum_member_with_explicit_value() {
    let src = "enum Flags { A = 1, B }";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());

    let members = first_stmt(&ast).left().unwrap();
    let a = members.left().unwrap();
    assert_eq!(a.kind, NodeKind::Assignment);
    assert_eq!(a.right().unwrap().token.lexeme(src), "1");

    let b = members.right().unwrap().left().unwrap();
    assert_eq!(b.kind, NodeKind::EnumIdentifier);
}

#[test]
fn duplicate_enum_member_errors() {
    let (_, parser) = parse("enum Color { RED, RED }");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E017".to_string()));
}

#[test]
fn enum_needs_no_trailing_semicolon() {
    let (_, parser) = parse("enum Color { RED } i32 x;");
    assert!(!parser.sink.failed());

    let (_, parser) = parse("enum Color { RED }; i32 x;");
    assert!(!parser.sink.failed());
}

/* ======= Structs ======= */

#[test]
fn struct_fields_stay_out_of_the_enclosing_scope() {
    let (_, parser) = parse("struct Point { i32 x; i32 y; } i32 z;");

    assert!(!parser.sink.failed());

    let point = parser.scopes.global().retrieve("Point").unwrap();
    assert_eq!(point.state, DeclState::Defined);
    assert_eq!(point.annotation.ostensible, TypeKind::Struct);
    assert!(point.struct_fields.is_in("x"));
    assert!(point.struct_fields.is_in("y"));

    assert!(!parser.scopes.global().is_in("x"));
    assert!(parser.scopes.global().is_in("z"));
}

#[test]
fn empty_struct_body_errors() {
    let (_, parser) = parse("struct Empty { }");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E018".to_string()));
}

#[test]
fn struct_redeclaration_errors() {
    let (_, parser) = parse("struct P { i32 x; } struct P { i32 y; }");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E014".to_string()));
}

/* ======= Functions ======= */

#[test]
fn function_definition_and_call() {
    let src = "i32 add(i32 a, i32 b) :: i32 { return a + b; } \
               i32 main() :: i32 { return add(1, 2); }";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());

    for name in ["add", "main"] {
        let f = parser.scopes.global().retrieve(name).unwrap();
        assert_eq!(f.state, DeclState::Defined);
        assert!(f.annotation.is_function);
        assert_eq!(f.annotation.ostensible, TypeKind::Int);
    }

    let add = parser.scopes.global().retrieve("add").unwrap();
    assert_eq!(add.param_list.len(), 2);
    assert!(add.fn_params.is_in("a"));
    assert!(add.fn_params.is_in("b"));

    let add_node = first_stmt(&ast);
    assert_eq!(add_node.kind, NodeKind::Function);
    assert_eq!(add_node.left().unwrap().kind, NodeKind::FunctionReturnType);
    assert_eq!(add_node.middle().unwrap().kind, NodeKind::FunctionParam);
    assert_eq!(add_node.right().unwrap().kind, NodeKind::FunctionBody);

    // the call inside main's body
    let main_body = nth_stmt(&ast, 1).right().unwrap();
    let ret = main_body.left().unwrap();
    assert_eq!(ret.kind, NodeKind::Return);
    let call = ret.left().unwrap();
    assert_eq!(call.kind, NodeKind::FunctionCall);
    assert_eq!(call.token.lexeme(src), "add");

    let first_arg = call.middle().unwrap();
    assert_eq!(first_arg.left().unwrap().token.lexeme(src), "1");
    let second_arg = first_arg.right().unwrap();
    assert_eq!(second_arg.left().unwrap().token.lexeme(src), "2");
}

#[test]
fn bodiless_declaration_then_definition() {
    let src = "i32 f() :: i32; i32 main() :: i32 { return f(); }";
    let (_, parser) = parse(src);

    // f is declared but never defined: the call is an error
    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E013".to_string()));

    // the definition after a forward declaration uses the bare form
    let src = "i32 f() :: i32; f() :: i32 { return 7; } \
               i32 main() :: i32 { return f(); }";
    let (_, parser) = parse(src);
    assert!(!parser.sink.failed());
    assert_eq!(
        parser.scopes.global().retrieve("f").unwrap().state,
        DeclState::Defined
    );
}

#[test]
fn double_bodiless_declaration_errors() {
    let (_, parser) = parse("i32 f() :: i32; f() :: i32;");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E015".to_string()));
}

#[test]
fn call_of_undeclared_function_errors() {
    let (_, parser) = parse("i32 main() :: i32 { return missing(); }");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E012".to_string()));
}

#[test]
fn duplicate_parameter_name_errors() {
    let (_, parser) = parse("i32 f(i32 a, i32 a) :: i32 { return 0; }");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E016".to_string()));
}

#[test]
fn trailing_comma_in_call_is_tolerated() {
    let (_, parser) = parse(
        "i32 f(i32 a) :: i32 { return a; } i32 main() :: i32 { return f(1,); }",
    );

    assert!(!parser.sink.failed());
}

#[test]
fn nested_calls_as_arguments() {
    let src = "i32 f(i32 a) :: i32 { return a; } \
               i32 main() :: i32 { return f(f(3)); }";
    let (ast, parser) = parse(src);

    assert!(!parser.sink.failed());

    let main_body = nth_stmt(&ast, 1).right().unwrap();
    let call = main_body.left().unwrap().left().unwrap();
    assert_eq!(call.kind, NodeKind::FunctionCall);

    let inner = call.middle().unwrap().left().unwrap();
    assert_eq!(inner.kind, NodeKind::FunctionCall);
    assert_eq!(inner.token.lexeme(src), "f");
}

#[test]
fn parameters_resolve_inside_the_body_only() {
    let (_, parser) = parse("i32 f(i32 a) :: i32 { return a; } i32 x = a;");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E011".to_string()));
}

#[test]
fn globals_resolve_inside_function_bodies() {
    let (_, parser) = parse("i32 g = 7; i32 f() :: i32 { return g; }");

    assert!(!parser.sink.failed());
}

/* ======= Numeric overflow ======= */

#[test]
fn oversized_hex_literal_fails_the_build() {
    let (_, parser) = parse("u64 x = 0xFFFFFFFFFFFFFFFFFFFF;");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E004".to_string()));
}

#[test]
fn max_u64_hex_literal_is_fine() {
    let (_, parser) = parse("u64 x = 0xFFFFFFFFFFFFFFFF;");

    assert!(!parser.sink.failed());
}

#[test]
fn decimal_literal_beyond_i64_overflows() {
    let (_, parser) = parse("i64 x = 9223372036854775808;");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E023".to_string()));
}

#[test]
fn overflowing_literal_folds_to_overflow() {
    let src = "i64 x = 9223372036854775808;";
    let (ast, _) = parse(src);

    let rhs = first_stmt(&ast).right().unwrap();
    assert_eq!(fold(rhs, src), Some(Value::Overflow));
}

/* ======= Scopes ======= */

#[test]
fn inner_scopes_see_outer_names() {
    let (_, parser) = parse("i32 x = 1; if (x == 1) { i32 y = x; }");

    assert!(!parser.sink.failed());
    // the block-local is gone after the block
    assert!(!parser.scopes.global().is_in("y"));
}

#[test]
fn block_locals_do_not_leak() {
    let (_, parser) = parse("i32 x = 1; if (x == 1) { i32 y = 2; } i32 z = y;");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E011".to_string()));
}

/* ======= Recovery ======= */

#[test]
fn parser_recovers_at_statement_boundaries() {
    let (_, parser) = parse("i32 x = ); i32 y = 2;");

    assert!(parser.sink.failed());
    // the statement after the broken one still parsed
    assert!(parser.scopes.global().is_in("y"));
}

#[test]
fn missing_semicolon_is_reported() {
    let (_, parser) = parse("i32 x = 1 i32 y = 2;");

    assert!(parser.sink.failed());
    assert!(parser.sink.codes().contains(&"E009".to_string()));
}
