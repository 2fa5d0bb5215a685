//! Prefix and infix rules of the Pratt parser.

use sablec_ast::{Annotation, AstNode, NodeKind, LEFT};
use sablec_diag::{IResult, ToDiagnostic};
use sablec_token::TokenKind;
use sablec_utils::{list_fmt, opt_unreachable};

use crate::diags;
use crate::item;
use crate::scope::{DeclState, Symbol};
use crate::value::Value;
use crate::{infix_rule, Parser, Precedence};

/// Prefix rule of the type keywords: a declaration.
///
/// `type [size]? identifier …` inserts the identifier into the current
/// table as declared, then carries on as an identifier usage so that an
/// initialiser can follow.
pub(crate) fn type_decl(p: &mut Parser, _can_assign: bool) -> IResult<Box<AstNode>> {
    let type_token = p.current.clone();
    let mut is_array = false;
    let mut array_size: usize = 0;

    if p.matches(TokenKind::LBracket) {
        if p.matches(TokenKind::IntLit) {
            let lexeme = p.lexeme(&p.current);
            array_size = lexeme.parse().unwrap_or_else(|_| {
                let diag = diags::IntLiteralOverflow {
                    is_signed: false,
                    bit_width: 64,
                    loc: p.current.loc.clone(),
                };
                p.sink.emit(diag);
                0
            });
        } else {
            let diag = diags::ExpectedToken {
                expected: TokenKind::IntLit.to_string(),
                found: p.next.kind,
                context: "as array size",
                loc: p.next.loc.clone(),
            };
            p.sink.emit(diag);
        }

        p.consume(TokenKind::RBracket, "after array size");
        is_array = true;
    }

    if p.next_is(TokenKind::Ident) {
        let key = p.lexeme(&p.next);

        if let Some(existing) = p.scopes.current().retrieve(&key) {
            let diag = diags::Redeclaration {
                name: key.clone(),
                loc: p.next.loc.clone(),
                first_line: existing.annotation.declared_on_line,
            };
            p.sink.emit(diag);
        }

        let annotation = if is_array {
            Annotation::array(type_token.kind, array_size)
        } else {
            Annotation::of_type(type_token.kind)
        }
        .on_line(p.next.line);

        let symbol = Symbol::new(p.next.clone(), annotation, DeclState::Declared);
        p.scopes.current_mut().add(&key, symbol);
    }

    p.consume(TokenKind::Ident, "after type");

    identifier(p, true)
}

/// Prefix rule of identifiers, and the hub of context-sensitive handling:
/// function declaration vs call, subscript, postfix increment/decrement,
/// assignment, compound assignment, or a plain read access.
pub(crate) fn identifier(p: &mut Parser, can_assign: bool) -> IResult<Box<AstNode>> {
    let ident_token = p.current.clone();
    let key = p.lexeme(&ident_token);
    let in_current = p.scopes.current().retrieve(&key).cloned();

    if p.matches(TokenKind::LParen) {
        let looks_declared = p.next.kind.is_type_keyword()
            || (p.next_is(TokenKind::RParen) && p.after_next_is(TokenKind::ColonColon));

        if looks_declared {
            if let Some(symbol) = &in_current {
                if symbol.state != DeclState::Declared && symbol.state != DeclState::Uninitialized {
                    let diag = diags::Redeclaration {
                        name: key.clone(),
                        loc: ident_token.loc.clone(),
                        first_line: symbol.annotation.declared_on_line,
                    };
                    p.sink.emit(diag);
                }
            }

            if in_current.is_none() {
                // reserve the slot while the declaration is being parsed
                let symbol = Symbol::new(
                    ident_token.clone(),
                    Annotation::function(TokenKind::KwVoid).on_line(ident_token.line),
                    DeclState::Uninitialized,
                );
                p.scopes.current_mut().add(&key, symbol);
            }

            let Some(symbol) = p.scopes.current().retrieve(&key).cloned() else {
                // the slot was either present or inserted just above
                opt_unreachable!()
            };

            return item::function_declaration(p, symbol);
        }

        // function call
        match p.scopes.lookup(&key) {
            None => {
                let diag = diags::UndeclaredFunction {
                    name: key.clone(),
                    loc: ident_token.loc.clone(),
                };
                p.sink.emit(diag);
            }
            Some(symbol) if symbol.state != DeclState::Defined => {
                let diag = diags::CallOfUndefined {
                    name: key.clone(),
                    loc: ident_token.loc.clone(),
                };
                p.sink.emit(diag);
            }
            Some(_) => {}
        }

        return item::function_call(p, ident_token);
    }

    let symbol = match in_current {
        Some(symbol) => symbol,
        None => match p.scopes.exists_in_outer(&key) {
            Some(symbol) => symbol.clone(),
            None => {
                let diag = diags::UndeclaredIdentifier {
                    name: key.clone(),
                    loc: ident_token.loc.clone(),
                };
                p.sink.emit(diag);

                Symbol::new(ident_token.clone(), Annotation::none(), DeclState::None)
            }
        },
    };

    let mut array_index = None;
    if p.matches(TokenKind::LBracket) {
        array_index = Some(array_subscript(p)?);
    }

    if p.matches(TokenKind::PlusPlus) {
        if symbol.state != DeclState::Defined {
            let diag = diags::MutationOfUndefined {
                name: key.clone(),
                action: "increment",
                loc: ident_token.loc.clone(),
            };
            p.sink.emit(diag);
        }

        return Ok(AstNode::from_token(
            NodeKind::PostfixIncrement,
            None,
            None,
            None,
            ident_token,
            symbol.annotation,
        ));
    }

    if p.matches(TokenKind::MinusMinus) {
        if symbol.state != DeclState::Defined {
            let diag = diags::MutationOfUndefined {
                name: key.clone(),
                action: "decrement",
                loc: ident_token.loc.clone(),
            };
            p.sink.emit(diag);
        }

        return Ok(AstNode::from_token(
            NodeKind::PostfixDecrement,
            None,
            None,
            None,
            ident_token,
            symbol.annotation,
        ));
    }

    if p.matches(TokenKind::Eq) {
        if !can_assign {
            let diag = diags::CannotAssign {
                name: key.clone(),
                loc: ident_token.loc.clone(),
            };
            p.sink.emit(diag);
        }

        let declared = symbol.annotation;
        let mut defined = symbol;
        defined.token = ident_token.clone();
        defined.annotation = declared.resolve();
        defined.state = DeclState::Defined;
        let stored = p.scopes.current_mut().add(&key, defined);

        let rhs = p.expression()?;
        p.check_initialiser(&declared, &rhs);

        return Ok(AstNode::from_token(
            NodeKind::Assignment,
            None,
            array_index,
            Some(rhs),
            stored.token,
            stored.annotation,
        ));
    }

    if p.next.kind.is_terse_assignment() {
        p.advance();

        if symbol.state != DeclState::Defined {
            let diag = diags::MutationOfUndefined {
                name: key.clone(),
                action: "compound-assign",
                loc: ident_token.loc.clone(),
            };
            p.sink.emit(diag);
        }

        let mut terse = terse_assignment(p)?;
        terse.children[LEFT] = Some(AstNode::from_token(
            NodeKind::Identifier,
            None,
            None,
            None,
            ident_token,
            symbol.annotation,
        ));

        return Ok(terse);
    }

    // Plain access. Use the freshest table state for the node kind and
    // annotation, but keep the use-site token so later diagnostics point at
    // the right line.
    let (state, annotation) = p
        .scopes
        .lookup(&key)
        .map(|s| (s.state, s.annotation))
        .unwrap_or((symbol.state, symbol.annotation));

    Ok(AstNode::from_token(
        if state == DeclState::Declared {
            NodeKind::Declaration
        } else {
            NodeKind::Identifier
        },
        None,
        array_index,
        None,
        ident_token,
        annotation,
    ))
}

/// Prefix rule of every literal token.
///
/// Numeric literals are decoded right away so an out-of-range literal is
/// reported where it appears.
pub(crate) fn literal(p: &mut Parser, _can_assign: bool) -> IResult<Box<AstNode>> {
    let token = p.current.clone();
    let annotation = Annotation::of_literal(token.kind);

    if matches!(
        token.kind,
        TokenKind::IntLit | TokenKind::HexLit | TokenKind::BinLit | TokenKind::FloatLit
    ) {
        let lexeme = p.lexeme(&token);

        if Value::from_literal(&annotation, token.kind, &lexeme) == Value::Overflow {
            if token.kind == TokenKind::FloatLit {
                let diag = diags::FloatLiteralOverflow {
                    bit_width: annotation.bit_width,
                    loc: token.loc.clone(),
                };
                p.sink.emit(diag);
            } else {
                let diag = diags::IntLiteralOverflow {
                    is_signed: annotation.is_signed,
                    bit_width: annotation.bit_width,
                    loc: token.loc.clone(),
                };
                p.sink.emit(diag);
            }
        }
    }

    Ok(AstNode::from_token(
        NodeKind::Literal,
        None,
        None,
        None,
        token,
        annotation,
    ))
}

/// Prefix rule of `(`: a grouping, possibly the condition of a ternary.
pub(crate) fn grouping(p: &mut Parser, _can_assign: bool) -> IResult<Box<AstNode>> {
    let inner = p.expression()?;
    p.consume(TokenKind::RParen, "after parenthesised expression");

    if p.next_is(TokenKind::Question) {
        return ternary(p, inner);
    }

    Ok(inner)
}

/// `(cond) ? then :: else`
///
/// The else branch is introduced by the colon-separator token, since a
/// bare `:` is not a token of the language.
fn ternary(p: &mut Parser, condition: Box<AstNode>) -> IResult<Box<AstNode>> {
    p.advance(); // the `?`

    let if_true = p.expression()?;
    p.consume(TokenKind::ColonColon, "between ternary branches");
    let if_false = p.expression()?;

    Ok(AstNode::new(
        NodeKind::If,
        Some(condition),
        Some(if_true),
        Some(if_false),
        Annotation::none(),
    ))
}

/// Prefix rule of `!`, `-`, `~` and the prefix increment and decrement.
pub(crate) fn unary(p: &mut Parser, _can_assign: bool) -> IResult<Box<AstNode>> {
    let operator = p.current.clone();
    let operand = p.parse_precedence(Precedence::Unary)?;

    let kind = match operator.kind {
        TokenKind::PlusPlus => NodeKind::PrefixIncrement,
        TokenKind::MinusMinus => NodeKind::PrefixDecrement,
        TokenKind::Bang | TokenKind::Minus | TokenKind::Tilde => NodeKind::UnaryOp,
        // the rule table only routes those kinds here
        _ => opt_unreachable!(),
    };

    Ok(AstNode::from_token(
        kind,
        Some(operand),
        None,
        None,
        operator,
        Annotation::none(),
    ))
}

/// Infix rule of every binary operator. The LEFT child is wired in by the
/// Pratt loop.
pub(crate) fn binary(p: &mut Parser) -> IResult<Box<AstNode>> {
    let operator = p.current.clone();

    let Some((_, precedence)) = infix_rule(operator.kind) else {
        // only reachable through the rule table
        opt_unreachable!()
    };
    let rhs = p.parse_precedence(precedence.stronger())?;

    Ok(AstNode::from_token(
        NodeKind::BinaryOp,
        None,
        None,
        Some(rhs),
        operator,
        Annotation::none(),
    ))
}

/// `identifier op= expression`, with `op=` already the current token. The
/// identifier is wired in as the LEFT child by the caller.
pub(crate) fn terse_assignment(p: &mut Parser) -> IResult<Box<AstNode>> {
    let operator = p.current.clone();
    // right-associative, like plain assignment
    let rhs = p.parse_precedence(Precedence::Assignment)?;

    Ok(AstNode::from_token(
        NodeKind::TerseAssignment,
        None,
        None,
        Some(rhs),
        operator,
        Annotation::none(),
    ))
}

/// `[ identifier | int-literal ]`, with `[` already consumed. Doubles as
/// the infix rule for subscripting, where the Pratt loop wires the LEFT
/// child.
pub(crate) fn array_subscript(p: &mut Parser) -> IResult<Box<AstNode>> {
    let mut node = None;

    if p.matches(TokenKind::Ident) {
        let token = p.current.clone();
        let key = p.lexeme(&token);

        let annotation = match p.scopes.lookup(&key) {
            None => {
                let diag = diags::BadSubscript {
                    name: key.clone(),
                    declared: false,
                    loc: token.loc.clone(),
                };
                p.sink.emit(diag);

                Annotation::none()
            }
            Some(symbol) => {
                if symbol.state != DeclState::Defined {
                    let diag = diags::BadSubscript {
                        name: key.clone(),
                        declared: true,
                        loc: token.loc.clone(),
                    };
                    p.sink.emit(diag);
                }

                symbol.annotation
            }
        };

        node = Some(AstNode::from_token(
            NodeKind::ArraySubscript,
            None,
            None,
            None,
            token,
            annotation,
        ));
    } else if p.matches(TokenKind::IntLit) {
        node = Some(AstNode::from_token(
            NodeKind::ArraySubscript,
            None,
            None,
            None,
            p.current.clone(),
            Annotation::of_literal(TokenKind::IntLit),
        ));
    }

    p.consume(TokenKind::RBracket, "after array subscript");

    match node {
        Some(node) => Ok(node),
        None => Err(diags::ExpectedToken {
            expected: list_fmt(&["an identifier", "an integer literal"]),
            found: p.next.kind,
            context: "as array subscript",
            loc: p.next.loc.clone(),
        }
        .into_diag()),
    }
}
