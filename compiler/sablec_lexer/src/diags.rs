//! Diagnostics that may be emitted by the lexer.

use sablec_diag::{Diagnostic, ErrorCode, Label, ToDiagnostic};
use sablec_utils::Span;

#[derive(Debug, Clone)]
pub struct UnknownCharacter {
    pub c: char,
    pub loc: Span,
}

impl ToDiagnostic for UnknownCharacter {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::UnknownCharacter.to_string())
            .with_message(format!("unknown start of token {:?}", self.c))
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

#[derive(Debug, Clone)]
pub struct UnterminatedString {
    pub loc: Span,
}

impl ToDiagnostic for UnterminatedString {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::UnterminatedString.to_string())
            .with_message("unterminated string literal")
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

#[derive(Debug, Clone)]
pub struct MultilineString {
    pub loc: Span,
}

impl ToDiagnostic for MultilineString {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::MultilineString.to_string())
            .with_message("string literals cannot span multiple lines")
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

#[derive(Debug, Clone)]
pub struct TooWideHexLiteral {
    pub loc: Span,
}

impl ToDiagnostic for TooWideHexLiteral {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::TooWideHexLiteral.to_string())
            .with_message("hex literal cannot be more than 64 bits wide")
            .with_label(Label::primary(self.loc.fid, self.loc))
            .with_note("at most 16 hex digits fit in an u64")
    }
}

#[derive(Debug, Clone)]
pub struct TooWideBinaryLiteral {
    pub loc: Span,
}

impl ToDiagnostic for TooWideBinaryLiteral {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::TooWideBinaryLiteral.to_string())
            .with_message("binary literal cannot be more than 64 bits wide")
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

#[derive(Debug, Clone)]
pub struct UnterminatedBinaryLiteral {
    pub loc: Span,
}

impl ToDiagnostic for UnterminatedBinaryLiteral {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::UnterminatedBinaryLiteral.to_string())
            .with_message("expected `'` to close this binary literal")
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}

#[derive(Debug, Clone)]
pub struct UnterminatedCharLiteral {
    pub loc: Span,
}

impl ToDiagnostic for UnterminatedCharLiteral {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::UnterminatedCharLiteral.to_string())
            .with_message("expected `'` to close this char literal")
            .with_label(Label::primary(self.loc.fid, self.loc))
            .with_note("char literals hold exactly one byte and no escapes")
    }
}

#[derive(Debug, Clone)]
pub struct StrayColon {
    pub loc: Span,
}

impl ToDiagnostic for StrayColon {
    fn into_diag(self) -> Diagnostic {
        Diagnostic::error()
            .with_code(ErrorCode::StrayColon.to_string())
            .with_message("`:` is not a token, the separator is `::`")
            .with_label(Label::primary(self.loc.fid, self.loc))
    }
}
