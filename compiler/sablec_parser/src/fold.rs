//! Constant folding of literal expressions.
//!
//! Folding never panics on user input: any shape or kind mix it cannot
//! handle yields `None`, and the closed [`Value`] operations are only
//! invoked once the operand kinds are known to line up.

use sablec_ast::{AstNode, NodeKind};
use sablec_token::TokenKind;

use crate::value::Value;

/// Fold a subtree built purely of literals and operators into a [`Value`].
///
/// Returns `None` for anything that is not compile-time constant. A
/// subtree containing an out-of-range literal folds to
/// [`Value::Overflow`].
pub fn fold(node: &AstNode, src: &str) -> Option<Value> {
    match node.kind {
        NodeKind::Literal => {
            let lexeme = node.token.lexeme(src);

            match Value::from_literal(&node.annotation, node.token.kind, lexeme) {
                Value::None => None,
                v => Some(v),
            }
        }
        NodeKind::UnaryOp => fold_unary(node, src),
        NodeKind::BinaryOp => fold_binary(node, src),
        _ => None,
    }
}

fn fold_unary(node: &AstNode, src: &str) -> Option<Value> {
    let operand = fold(node.left()?, src)?;

    if operand == Value::Overflow {
        return Some(Value::Overflow);
    }

    match node.token.kind {
        TokenKind::Bang => match operand {
            Value::Bool(_) => Some(operand.not()),
            _ => None,
        },
        TokenKind::Minus => match operand {
            Value::Int(v) => Some(Value::Int(v.wrapping_neg())),
            Value::Float(v) => Some(Value::Float(-v)),
            _ => None,
        },
        TokenKind::Tilde => match operand {
            Value::Int(v) => Some(Value::Int(!v)),
            Value::Uint(v) => Some(Value::Uint(!v)),
            _ => None,
        },
        _ => None,
    }
}

fn fold_binary(node: &AstNode, src: &str) -> Option<Value> {
    use TokenKind as Tk;

    let lhs = fold(node.left()?, src)?;
    let rhs = fold(node.right()?, src)?;

    if lhs == Value::Overflow || rhs == Value::Overflow {
        return Some(Value::Overflow);
    }
    if !lhs.same_kind(&rhs) {
        return None;
    }

    let is_bool = matches!(lhs, Value::Bool(_));
    let is_integer = matches!(lhs, Value::Int(_) | Value::Uint(_));
    let is_numeric = is_integer || matches!(lhs, Value::Float(_));
    let is_ordered = is_numeric || matches!(lhs, Value::Char(_));

    match node.token.kind {
        Tk::AndAnd if is_bool => Some(lhs.logical_and(rhs)),
        Tk::OrOr if is_bool => Some(lhs.logical_or(rhs)),
        Tk::EqEq => Some(lhs.equals(&rhs)),
        Tk::BangEq => Some(lhs.equals(&rhs).not()),
        Tk::Lt if is_ordered => Some(lhs.less(&rhs)),
        Tk::Gt if is_ordered => Some(lhs.greater(&rhs)),
        Tk::Plus if is_numeric => Some(lhs.add(rhs)),
        Tk::Minus if is_numeric => Some(lhs.sub(rhs)),
        Tk::Star if is_numeric => Some(lhs.mul(rhs)),
        Tk::Slash if is_numeric => {
            if matches!(rhs, Value::Int(0) | Value::Uint(0)) {
                return None;
            }

            Some(lhs.div(rhs))
        }
        Tk::Percent if is_integer => {
            if matches!(rhs, Value::Int(0) | Value::Uint(0)) {
                return None;
            }

            Some(lhs.rem(rhs))
        }
        // bitwise operators work on the raw bits, outside the closed Value
        // arithmetic surface
        Tk::Caret | Tk::And | Tk::Or | Tk::Shl | Tk::Shr if is_integer => {
            Some(fold_bitwise(node.token.kind, lhs, rhs))
        }
        _ => None,
    }
}

fn fold_bitwise(op: TokenKind, lhs: Value, rhs: Value) -> Value {
    use TokenKind as Tk;

    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Value::Int(match op {
            Tk::Caret => a ^ b,
            Tk::And => a & b,
            Tk::Or => a | b,
            Tk::Shl => a.wrapping_shl(b as u32),
            Tk::Shr => a.wrapping_shr(b as u32),
            _ => unreachable!(),
        }),
        (Value::Uint(a), Value::Uint(b)) => Value::Uint(match op {
            Tk::Caret => a ^ b,
            Tk::And => a & b,
            Tk::Or => a | b,
            Tk::Shl => a.wrapping_shl(b as u32),
            Tk::Shr => a.wrapping_shr(b as u32),
            _ => unreachable!(),
        }),
        _ => unreachable!(),
    }
}
