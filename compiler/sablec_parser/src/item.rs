//! Definitions: enums, structs, function declarations and calls.

use sablec_ast::{Annotation, AstNode, NodeKind, LEFT};
use sablec_diag::IResult;
use sablec_token::{Token, TokenKind};

use crate::diags;
use crate::expr;
use crate::scope::{DeclState, FnParam, Symbol, SymbolTable};
use crate::{chain, Parser};

/// Prefix rule of `enum`:
/// `enum identifier { identifier (= literal)? (, identifier …)* }`
///
/// Members land in the enclosing table as defined enum literals.
pub(crate) fn enum_decl(p: &mut Parser, _can_assign: bool) -> IResult<Box<AstNode>> {
    p.consume(TokenKind::Ident, "after keyword `enum`");
    let name_token = p.current.clone();
    let key = p.lexeme(&name_token);

    let symbol = Symbol::new(
        name_token.clone(),
        Annotation::of_type(TokenKind::KwEnum).on_line(name_token.line),
        DeclState::Declared,
    );
    p.scopes.current_mut().add(&key, symbol);

    let mut name_node = expr::identifier(p, false)?;
    name_node.children[LEFT] = Some(enum_block(p)?);

    Ok(name_node)
}

fn enum_block(p: &mut Parser) -> IResult<Box<AstNode>> {
    p.consume(TokenKind::LCurly, "after enum name");

    let mut members = Vec::new();

    while !p.next_is(TokenKind::RCurly) && !p.next_is(TokenKind::Eof) {
        if !p.next_is(TokenKind::Ident) {
            let diag = diags::ExpectedToken {
                expected: TokenKind::Ident.to_string(),
                found: p.next.kind,
                context: "in enum body",
                loc: p.next.loc.clone(),
            };
            p.sink.emit(diag);
            p.advance();
            continue;
        }

        let key = p.lexeme(&p.next);
        if let Some(existing) = p.scopes.current().retrieve(&key) {
            let diag = diags::DuplicateEnumMember {
                name: key.clone(),
                loc: p.next.loc.clone(),
                first_line: existing.annotation.declared_on_line,
            };
            p.sink.emit(diag);
        }

        p.advance(); // the member identifier
        let member_token = p.current.clone();
        let symbol = Symbol::new(
            member_token,
            Annotation::of_literal(TokenKind::EnumLit)
                .on_line(p.current.line)
                .resolve(),
            DeclState::Defined,
        );
        p.scopes.current_mut().add(&key, symbol);

        members.push(enum_member(p)?);

        p.matches(TokenKind::Comma);
    }

    p.consume(TokenKind::RCurly, "after enum body");

    Ok(chain(members))
}

/// One enum member, optionally with an explicit value.
fn enum_member(p: &mut Parser) -> IResult<Box<AstNode>> {
    let member_token = p.current.clone();
    let key = p.lexeme(&member_token);

    if p.matches(TokenKind::Eq) {
        let Some(mut symbol) = p.scopes.current().retrieve(&key).cloned() else {
            // inserted by the caller right before this rule
            sablec_utils::opt_unreachable!()
        };
        symbol.state = DeclState::Defined;
        let stored = p.scopes.current_mut().add(&key, symbol);

        let rhs = p.expression()?;

        return Ok(AstNode::from_token(
            NodeKind::Assignment,
            None,
            None,
            Some(rhs),
            stored.token,
            stored.annotation,
        ));
    }

    Ok(AstNode::from_token(
        NodeKind::EnumIdentifier,
        None,
        None,
        None,
        member_token,
        Annotation::of_literal(TokenKind::EnumLit),
    ))
}

/// Prefix rule of `struct`: `struct identifier { field declarations }`
///
/// Field declarations go through the shadowed field table, so they never
/// leak into the enclosing scope. An empty body is an error.
pub(crate) fn struct_decl(p: &mut Parser, _can_assign: bool) -> IResult<Box<AstNode>> {
    p.consume(TokenKind::Ident, "after keyword `struct`");
    let name_token = p.current.clone();
    let key = p.lexeme(&name_token);

    if let Some(existing) = p.scopes.current().retrieve(&key) {
        let diag = diags::Redeclaration {
            name: key.clone(),
            loc: name_token.loc.clone(),
            first_line: existing.annotation.declared_on_line,
        };
        p.sink.emit(diag);
    }

    let declared = Symbol::new(
        name_token.clone(),
        Annotation::of_type(TokenKind::KwStruct).on_line(name_token.line),
        DeclState::Declared,
    );
    p.scopes.current_mut().add(&key, declared);

    p.consume(TokenKind::LCurly, "after struct name");

    p.scopes.shadow(SymbolTable::new());
    let stmts = p.block_stmts();
    let fields = p.scopes.unshadow();

    if stmts.is_empty() {
        let diag = diags::EmptyStructBody {
            name: key.clone(),
            loc: name_token.loc.clone(),
        };
        p.sink.emit(diag);
    }

    let mut defined = Symbol::new(
        name_token.clone(),
        Annotation::of_type(TokenKind::KwStruct)
            .on_line(name_token.line)
            .resolve(),
        DeclState::Defined,
    );
    defined.struct_fields = fields;
    let stored = p.scopes.current_mut().add(&key, defined);

    Ok(AstNode::from_token(
        NodeKind::Identifier,
        Some(chain(stmts)),
        None,
        None,
        stored.token,
        stored.annotation,
    ))
}

/// `identifier ( params ) :: return-type [ ; | { body } ]`
///
/// Called from the identifier rule with `(` already consumed and `symbol`
/// the slot reserved for the function. A bodiless form leaves the symbol
/// declared; a body promotes it to defined.
pub(crate) fn function_declaration(p: &mut Parser, symbol: Symbol) -> IResult<Box<AstNode>> {
    let fn_key = p.lexeme(&symbol.token);
    let previously_declared = symbol.state == DeclState::Declared && symbol.annotation.is_function;

    // parameters re-register from scratch on a definition that follows a
    // forward declaration
    if let Some(existing) = p.scopes.current().retrieve(&fn_key) {
        if !existing.param_list.is_empty() {
            let mut cleared = existing.clone();
            cleared.param_list.clear();
            p.scopes.current_mut().add(&fn_key, cleared);
        }
    }

    let mut params_table = SymbolTable::new();
    let params = function_params(p, &mut params_table, &fn_key);
    let return_type = function_return_type(p);
    let (body, params_table) = function_body(p, params_table)?;

    if previously_declared && body.is_none() {
        let diag = diags::DoubleDeclaration {
            name: fn_key.clone(),
            loc: symbol.token.loc.clone(),
            first_line: symbol.annotation.declared_on_line,
        };
        p.sink.emit(diag);
    }

    // retrieve the freshest entry before promoting it
    let mut updated = p
        .scopes
        .current()
        .retrieve(&fn_key)
        .cloned()
        .unwrap_or(symbol);

    if !previously_declared {
        updated.annotation =
            Annotation::function(return_type.token.kind).on_line(updated.token.line);
    }
    updated.state = if body.is_none() {
        DeclState::Declared
    } else {
        DeclState::Defined
    };
    if updated.state == DeclState::Defined {
        updated.annotation = updated.annotation.resolve();
    }
    updated.fn_params = params_table;

    let stored = p.scopes.current_mut().add(&fn_key, updated);

    Ok(AstNode::from_token(
        if body.is_none() {
            NodeKind::Declaration
        } else {
            NodeKind::Function
        },
        Some(return_type),
        Some(params),
        body,
        stored.token,
        stored.annotation,
    ))
}

/// Parse the parameter list into `params_table`, registering each one
/// against the function symbol in the enclosing table.
fn function_params(
    p: &mut Parser,
    params_table: &mut SymbolTable,
    fn_key: &str,
) -> Box<AstNode> {
    let mut entries: Vec<(Token, Annotation)> = Vec::new();

    while !p.next_is(TokenKind::RParen) && !p.next_is(TokenKind::Eof) {
        if !p.next.kind.is_type_keyword() {
            let diag = diags::ExpectedToken {
                expected: "a type".to_string(),
                found: p.next.kind,
                context: "for a function parameter",
                loc: p.next.loc.clone(),
            };
            p.sink.emit(diag);
            p.advance();
            continue;
        }

        p.advance(); // the parameter type
        let type_token = p.current.clone();

        p.consume(TokenKind::Ident, "after parameter type");
        let param_token = p.current.clone();
        let param_key = p.lexeme(&param_token);

        if params_table.is_in(&param_key) {
            let diag = diags::DuplicateParameter {
                name: param_key.clone(),
                loc: param_token.loc.clone(),
            };
            p.sink.emit(diag);
        }

        let annotation = Annotation::of_type(type_token.kind).on_line(param_token.line);
        params_table.add(
            &param_key,
            Symbol::new(param_token.clone(), annotation, DeclState::FnParam),
        );
        p.scopes.current_mut().register_fn_param(
            fn_key,
            FnParam {
                token: param_token.clone(),
                annotation,
            },
        );

        entries.push((param_token, annotation));

        p.matches(TokenKind::Comma);
    }

    // params chain down through LEFT, first parameter outermost
    let mut node: Option<Box<AstNode>> = None;
    for (token, annotation) in entries.into_iter().rev() {
        node = Some(AstNode::from_token(
            NodeKind::FunctionParam,
            node,
            None,
            None,
            token,
            annotation,
        ));
    }

    node.unwrap_or_else(|| {
        AstNode::new(
            NodeKind::FunctionParam,
            None,
            None,
            None,
            Annotation::none(),
        )
    })
}

/// `) :: return-type`
fn function_return_type(p: &mut Parser) -> Box<AstNode> {
    p.consume(TokenKind::RParen, "after function parameters");
    p.consume(TokenKind::ColonColon, "before the return type");
    p.consume_any_type("after `::`");

    let type_token = p.current.clone();
    let annotation = Annotation::of_type(type_token.kind);

    AstNode::from_token(
        NodeKind::FunctionReturnType,
        None,
        None,
        None,
        type_token,
        annotation,
    )
}

/// The function body, or `None` for the bodiless declaration form.
///
/// Statements inside the body resolve through the shadowed parameter
/// table; the table is handed back to the caller afterwards.
fn function_body(
    p: &mut Parser,
    params_table: SymbolTable,
) -> IResult<(Option<Box<AstNode>>, SymbolTable)> {
    if p.next_is(TokenKind::Semi) {
        return Ok((None, params_table));
    }

    p.consume(TokenKind::LCurly, "to open the function body");

    p.scopes.shadow(params_table);
    let stmts = p.block_stmts();
    let params_table = p.scopes.unshadow();

    let mut body = chain(stmts);
    body.kind = NodeKind::FunctionBody;

    Ok((Some(body), params_table))
}

/// The argument list of a call: comma-separated identifiers (possibly
/// nested calls) and literals. A `,` immediately before `)` terminates
/// the list.
pub(crate) fn function_call(p: &mut Parser, name_token: Token) -> IResult<Box<AstNode>> {
    let mut args: Vec<Box<AstNode>> = Vec::new();

    while !p.next_is(TokenKind::RParen) && !p.next_is(TokenKind::Eof) {
        if p.matches(TokenKind::Ident) {
            let arg_token = p.current.clone();
            let key = p.lexeme(&arg_token);
            let annotation = p
                .scopes
                .lookup(&key)
                .map(|s| s.annotation)
                .unwrap_or_else(Annotation::none);

            if p.matches(TokenKind::LParen) {
                args.push(function_call(p, arg_token)?);
            } else {
                args.push(AstNode::from_token(
                    NodeKind::FunctionArgument,
                    None,
                    None,
                    None,
                    arg_token,
                    annotation,
                ));
            }
        } else if p.next.kind.is_literal() {
            p.advance();
            args.push(AstNode::from_token(
                NodeKind::FunctionArgument,
                None,
                None,
                None,
                p.current.clone(),
                Annotation::of_literal(p.current.kind),
            ));
        } else {
            let diag = diags::ExpectedToken {
                expected: sablec_utils::list_fmt(&["an identifier", "a literal"]),
                found: p.next.kind,
                context: "as a call argument",
                loc: p.next.loc.clone(),
            };
            p.sink.emit(diag);
            p.advance();
            continue;
        }

        if p.next_is(TokenKind::Comma) {
            p.advance();
            if p.next_is(TokenKind::RParen) {
                break;
            }
        }
    }

    p.consume(TokenKind::RParen, "after call arguments");

    // arguments chain down through RIGHT, payload at LEFT
    let mut arg_chain: Option<Box<AstNode>> = None;
    for arg in args.into_iter().rev() {
        let link = AstNode::new(
            NodeKind::FunctionArgument,
            Some(arg),
            None,
            arg_chain,
            Annotation::none(),
        );
        arg_chain = Some(link);
    }

    Ok(AstNode::from_token(
        NodeKind::FunctionCall,
        None,
        arg_chain,
        None,
        name_token,
        Annotation::none(),
    ))
}
