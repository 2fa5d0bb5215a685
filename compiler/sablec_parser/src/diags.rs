//! Diagnostics that may be emitted by the parser.

use sablec_ast::TypeKind;
use sablec_diag::{Diagnostic, ErrorCode, Label, ToDiagnostic};
use sablec_token::TokenKind;
use sablec_utils::Span;

/// Expected some token, found something else.
#[derive(Debug, Clone)]
pub struct ExpectedToken {
    /// what was expected, e.g. "`;`" or "a type"
    pub expected: String,
    /// what was found instead
    pub found: TokenKind,
    /// where this happened, e.g. "after expression statement"
    pub context: &'static str,
    pub loc: Span,
}

impl ToDiagnostic for ExpectedToken {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::ExpectedToken.to_string())
            .with_message(format!(
                "expected {} {}, found {}",
                self.expected, self.context, self.found
            ))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

/// No expression can start with this token.
#[derive(Debug, Clone)]
pub struct NoParseRule {
    pub found: TokenKind,
    pub loc: Span,
}

impl ToDiagnostic for NoParseRule {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::NoParseRule.to_string())
            .with_message(format!("expected an expression, found {}", self.found))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

#[derive(Debug, Clone)]
pub struct UndeclaredIdentifier {
    pub name: String,
    pub loc: Span,
}

impl ToDiagnostic for UndeclaredIdentifier {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::UndeclaredIdentifier.to_string())
            .with_message(format!("undeclared identifier `{}`", self.name))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

#[derive(Debug, Clone)]
pub struct UndeclaredFunction {
    pub name: String,
    pub loc: Span,
}

impl ToDiagnostic for UndeclaredFunction {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::UndeclaredFunction.to_string())
            .with_message(format!("call of undeclared function `{}`", self.name))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

#[derive(Debug, Clone)]
pub struct CallOfUndefined {
    pub name: String,
    pub loc: Span,
}

impl ToDiagnostic for CallOfUndefined {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::CallOfUndefined.to_string())
            .with_message(format!(
                "`{}` is declared but has no body yet, it cannot be called",
                self.name
            ))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

/// A name declared twice in the same scope.
#[derive(Debug, Clone)]
pub struct Redeclaration {
    pub name: String,
    pub loc: Span,
    /// 1-based line of the first declaration
    pub first_line: u32,
}

impl ToDiagnostic for Redeclaration {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::Redeclaration.to_string())
            .with_message(format!("redeclaration of `{}`", self.name))
            .with_label(Label::primary(self.loc.fid, self.loc))
            .with_note(format!("previously declared on line {}", self.first_line))
    }
}

/// A function forward-declared twice.
#[derive(Debug, Clone)]
pub struct DoubleDeclaration {
    pub name: String,
    pub loc: Span,
    pub first_line: u32,
}

impl ToDiagnostic for DoubleDeclaration {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::DoubleDeclaration.to_string())
            .with_message(format!("double declaration of function `{}`", self.name))
            .with_label(Label::primary(self.loc.fid, self.loc))
            .with_note(format!("first declared on line {}", self.first_line))
    }
}

#[derive(Debug, Clone)]
pub struct DuplicateParameter {
    pub name: String,
    pub loc: Span,
}

impl ToDiagnostic for DuplicateParameter {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::DuplicateParameter.to_string())
            .with_message(format!("duplicate parameter name `{}`", self.name))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

#[derive(Debug, Clone)]
pub struct DuplicateEnumMember {
    pub name: String,
    pub loc: Span,
    pub first_line: u32,
}

impl ToDiagnostic for DuplicateEnumMember {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::DuplicateEnumMember.to_string())
            .with_message(format!("enum member `{}` already exists", self.name))
            .with_label(Label::primary(self.loc.fid, self.loc))
            .with_note(format!("first declared on line {}", self.first_line))
    }
}

#[derive(Debug, Clone)]
pub struct EmptyStructBody {
    pub name: String,
    pub loc: Span,
}

impl ToDiagnostic for EmptyStructBody {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::EmptyStructBody.to_string())
            .with_message(format!("struct `{}` has empty body", self.name))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

/// Assignment in a position where assignment is not allowed.
#[derive(Debug, Clone)]
pub struct CannotAssign {
    pub name: String,
    pub loc: Span,
}

impl ToDiagnostic for CannotAssign {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::CannotAssign.to_string())
            .with_message(format!("cannot assign to `{}` here", self.name))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

/// Increment, decrement or compound assignment of a name with no value.
#[derive(Debug, Clone)]
pub struct MutationOfUndefined {
    pub name: String,
    /// "increment", "decrement" or "compound-assign"
    pub action: &'static str,
    pub loc: Span,
}

impl ToDiagnostic for MutationOfUndefined {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::MutationOfUndefined.to_string())
            .with_message(format!(
                "cannot {} `{}` before it is defined",
                self.action, self.name
            ))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

/// Array subscript through an unusable name.
#[derive(Debug, Clone)]
pub struct BadSubscript {
    pub name: String,
    /// true when the name is declared but has no value yet
    pub declared: bool,
    pub loc: Span,
}

impl ToDiagnostic for BadSubscript {
    fn into_diag(self) -> Diagnostic {
        let message = if self.declared {
            format!("cannot subscript with `{}` before it is defined", self.name)
        } else {
            format!("cannot subscript with undeclared identifier `{}`", self.name)
        };

        Diagnostic::error()
            .with_code(ErrorCode::BadSubscript.to_string())
            .with_message(message)
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

/// A declaration of one kind initialised with a value of another.
#[derive(Debug, Clone)]
pub struct TypeDisagreement {
    pub declared: TypeKind,
    /// kind name of the initialiser value
    pub found: &'static str,
    pub loc: Span,
}

impl ToDiagnostic for TypeDisagreement {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::TypeDisagreement.to_string())
            .with_message(format!(
                "type disagreement: `{}` declaration initialised with a {} value",
                self.declared, self.found
            ))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

#[derive(Debug, Clone)]
pub struct IntLiteralOverflow {
    pub is_signed: bool,
    pub bit_width: u8,
    pub loc: Span,
}

impl ToDiagnostic for IntLiteralOverflow {
    fn into_diag(self) -> Diagnostic {
        let prefix = if self.is_signed { 'i' } else { 'u' };

        Diagnostic::error()
            .with_code(ErrorCode::IntLiteralOverflow.to_string())
            .with_message(format!(
                "integer literal out of range for `{}{}`",
                prefix, self.bit_width
            ))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

#[derive(Debug, Clone)]
pub struct FloatLiteralOverflow {
    pub bit_width: u8,
    pub loc: Span,
}

impl ToDiagnostic for FloatLiteralOverflow {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::FloatLiteralOverflow.to_string())
            .with_message(format!(
                "float literal out of range for `f{}`",
                self.bit_width
            ))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}
