//! Parser of Sable.
//!
//! A Pratt-style precedence parser: it pulls tokens from the lexer one at
//! a time, dispatches on the current token's prefix rule, then folds infix
//! rules in while their precedence allows. Along the way it keeps the
//! scope stack of symbol tables up to date, so name resolution errors are
//! reported during parsing.

use std::mem;

use sablec_ast::{Annotation, Arity, AstNode, NodeKind, TypeKind, LEFT, RIGHT};
use sablec_diag::{DiagnosticSink, FileId, IResult, ToDiagnostic};
use sablec_lexer::Lexer;
use sablec_token::{Token, TokenKind};

use crate::scope::ScopeStack;
use crate::value::Value;

pub mod diags;
pub mod expr;
pub mod fold;
pub mod item;
pub mod scope;
pub mod stmt;
pub mod value;

#[cfg(test)]
mod tests;

/// Binding strength of an operator, low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None = 0,
    Assignment,
    Ternary,
    Logical,
    Bitwise,
    Term,
    Factor,
    Unary,
    Prefix,
    Subscript,
}

impl Precedence {
    /// The next binding strength up, used by left-associative infix rules.
    pub(crate) fn stronger(self) -> Precedence {
        use Precedence::*;

        match self {
            None => Assignment,
            Assignment => Ternary,
            Ternary => Logical,
            Logical => Bitwise,
            Bitwise => Term,
            Term => Factor,
            Factor => Unary,
            Unary => Prefix,
            Prefix => Subscript,
            Subscript => Subscript,
        }
    }
}

type PrefixFn = fn(&mut Parser, bool) -> IResult<Box<AstNode>>;
type InfixFn = fn(&mut Parser) -> IResult<Box<AstNode>>;

/// Prefix rule for a token kind, a pure function of the kind.
pub(crate) fn prefix_rule(kind: TokenKind) -> Option<PrefixFn> {
    use TokenKind as Tk;

    Some(match kind {
        Tk::I8
        | Tk::I16
        | Tk::I32
        | Tk::I64
        | Tk::U8
        | Tk::U16
        | Tk::U32
        | Tk::U64
        | Tk::F32
        | Tk::F64
        | Tk::KwChar
        | Tk::KwString
        | Tk::KwBool
        | Tk::KwVoid => expr::type_decl,
        Tk::KwEnum => item::enum_decl,
        Tk::KwStruct => item::struct_decl,
        Tk::KwBreak => stmt::break_stmt,
        Tk::KwContinue => stmt::continue_stmt,
        Tk::KwReturn => stmt::return_stmt,
        Tk::Ident => expr::identifier,
        Tk::IntLit
        | Tk::HexLit
        | Tk::BinLit
        | Tk::FloatLit
        | Tk::CharLit
        | Tk::BoolLit
        | Tk::StrLit
        | Tk::EnumLit => expr::literal,
        Tk::LParen => expr::grouping,
        Tk::Bang | Tk::Minus | Tk::Tilde | Tk::PlusPlus | Tk::MinusMinus => expr::unary,
        _ => return None,
    })
}

/// Infix rule and precedence for a token kind, a pure function of the kind.
pub(crate) fn infix_rule(kind: TokenKind) -> Option<(InfixFn, Precedence)> {
    use TokenKind as Tk;

    Some(match kind {
        Tk::LBracket => (expr::array_subscript as InfixFn, Precedence::Subscript),
        Tk::EqEq | Tk::BangEq | Tk::AndAnd | Tk::OrOr | Tk::Lt | Tk::Gt => {
            (expr::binary as InfixFn, Precedence::Logical)
        }
        Tk::Caret | Tk::And | Tk::Or | Tk::Shl | Tk::Shr => {
            (expr::binary as InfixFn, Precedence::Bitwise)
        }
        Tk::Plus | Tk::Minus => (expr::binary as InfixFn, Precedence::Term),
        Tk::Star | Tk::Slash | Tk::Percent => (expr::binary as InfixFn, Precedence::Factor),
        _ => return None,
    })
}

/// Parser of Sable, turns source text into an [`AstNode`] tree.
#[derive(Debug, Clone)]
pub struct Parser {
    /// token source, driven one token at a time
    lexer: Lexer,
    /// the token the active rule owns
    pub current: Token,
    /// one token of look-ahead
    pub next: Token,
    /// two tokens of look-ahead, enough to tell a function declaration from
    /// a call
    pub after_next: Token,
    /// sink of diags
    pub sink: DiagnosticSink,
    /// file id of the file we are parsing
    pub fid: FileId,
    /// stack of symbol tables, with the shadow slot
    pub scopes: ScopeStack,
    /// set once the lexer returned an error token; no further scanning
    lexer_failed: bool,
}

impl Parser {
    /// Create a new parser reading from `lexer`.
    pub fn new(lexer: Lexer, sink: DiagnosticSink, fid: FileId) -> Parser {
        let mut parser = Parser {
            lexer,
            current: Token::dummy(),
            next: Token::dummy(),
            after_next: Token::dummy(),
            sink,
            fid,
            scopes: ScopeStack::new(),
            lexer_failed: false,
        };

        // Two advances prime the parser: `current` stays the dummy and
        // `next` holds the first real token.
        parser.advance();
        parser.advance();

        parser
    }

    /// Advance by one token.
    ///
    /// An error token from the lexer aborts the parse: the failure is
    /// already in the sink, scanning stops, and the parse winds down on a
    /// synthesised end of file.
    pub(crate) fn advance(&mut self) {
        let scanned = if self.lexer_failed {
            let mut eof = self.after_next.clone();
            eof.kind = TokenKind::Eof;
            eof
        } else {
            self.lexer.scan_token()
        };

        self.current = mem::replace(&mut self.next, mem::replace(&mut self.after_next, scanned));

        if self.after_next.kind == TokenKind::Error {
            self.lexer_failed = true;
            self.after_next.kind = TokenKind::Eof;
        }
    }

    /// The lexeme of `token`, as an owned string.
    pub(crate) fn lexeme(&self, token: &Token) -> String {
        token.lexeme(self.lexer.source()).to_string()
    }

    /// The source being parsed.
    pub fn source(&self) -> &str {
        self.lexer.source()
    }

    pub(crate) fn next_is(&self, kind: TokenKind) -> bool {
        self.next.kind == kind
    }

    pub(crate) fn after_next_is(&self, kind: TokenKind) -> bool {
        self.after_next.kind == kind
    }

    /// Consume the next token if it has the given kind.
    pub(crate) fn matches(&mut self, kind: TokenKind) -> bool {
        if !self.next_is(kind) {
            return false;
        }

        self.advance();
        true
    }

    /// Expect and consume the next token. When it is something else, emit a
    /// diagnostic and leave the token in place so an enclosing rule can
    /// resynchronise.
    pub(crate) fn consume(&mut self, kind: TokenKind, context: &'static str) {
        if self.matches(kind) {
            return;
        }

        let diag = diags::ExpectedToken {
            expected: kind.to_string(),
            found: self.next.kind,
            context,
            loc: self.next.loc.clone(),
        };
        self.sink.emit(diag);
    }

    /// Expect and consume any type keyword.
    pub(crate) fn consume_any_type(&mut self, context: &'static str) {
        if self.next.kind.is_type_keyword() {
            self.advance();
            return;
        }

        let diag = diags::ExpectedToken {
            expected: "a type".to_string(),
            found: self.next.kind,
            context,
            loc: self.next.loc.clone(),
        };
        self.sink.emit(diag);
    }

    /// Parse one expression at the lowest (assignment) precedence.
    pub fn expression(&mut self) -> IResult<Box<AstNode>> {
        self.parse_precedence(Precedence::Assignment)
    }

    /// The Pratt loop.
    ///
    /// Advances one token, dispatches to its prefix rule, then while the
    /// next token's infix precedence is at least `precedence`, advances and
    /// folds the infix rule in, wiring the accumulated node as its LEFT
    /// child. Right associativity is encoded by an infix rule recursing at
    /// its own precedence instead of one higher.
    pub(crate) fn parse_precedence(&mut self, precedence: Precedence) -> IResult<Box<AstNode>> {
        self.advance();

        let Some(prefix) = prefix_rule(self.current.kind) else {
            return Err(diags::NoParseRule {
                found: self.current.kind,
                loc: self.current.loc.clone(),
            }
            .into_diag());
        };

        let can_assign = precedence <= Precedence::Assignment;
        let mut node = prefix(self, can_assign)?;

        loop {
            let Some((infix, infix_precedence)) = infix_rule(self.next.kind) else {
                break;
            };
            if precedence > infix_precedence {
                break;
            }

            self.advance();

            let mut infix_node = infix(self)?;
            infix_node.children[LEFT] = Some(node);
            node = infix_node;
        }

        Ok(node)
    }

    /// Skip ahead to the next statement boundary after a parse error:
    /// just past the next `;`, or in front of a `}` or the end of file.
    pub(crate) fn recover_statement(&mut self) {
        loop {
            if self.next_is(TokenKind::Semi) {
                self.advance();
                return;
            }
            if self.next_is(TokenKind::RCurly) || self.next_is(TokenKind::Eof) {
                return;
            }

            self.advance();
        }
    }

    /// Parse the whole token stream into a tree rooted at a start node.
    ///
    /// Always returns a tree; whether the build is usable is decided by the
    /// error count in the sink.
    pub fn build_ast(&mut self) -> Box<AstNode> {
        let mut stmts = Vec::new();

        while !self.matches(TokenKind::Eof) {
            match self.statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(diag) => {
                    self.sink.emit(diag);
                    self.recover_statement();
                }
            }
        }

        let mut root = chain(stmts);
        root.kind = NodeKind::Start;
        root
    }

    /// [`Parser::build_ast`], but `None` when any error was emitted.
    pub fn produce(&mut self) -> Option<Box<AstNode>> {
        let ast = self.build_ast();

        if self.sink.failed() {
            return None;
        }

        Some(ast)
    }

    /// Check a constant initialiser against the declared annotation:
    /// reports a type disagreement when the kinds cannot agree, and
    /// re-checks direct literals against a narrower declared bit width.
    pub(crate) fn check_initialiser(&mut self, declared: &Annotation, rhs: &AstNode) {
        if declared.is_function {
            return;
        }
        if !matches!(
            declared.ostensible,
            TypeKind::Int
                | TypeKind::Float
                | TypeKind::Bool
                | TypeKind::Char
                | TypeKind::Str
                | TypeKind::Enum
        ) {
            return;
        }

        let Some(value) = fold::fold(rhs, self.lexer.source()) else {
            return;
        };
        if value == Value::Overflow {
            // already reported at the literal itself
            return;
        }

        if !kind_accepts(declared.ostensible, &value) {
            let diag = diags::TypeDisagreement {
                declared: declared.ostensible,
                found: value.kind_name(),
                loc: rhs.token.loc.clone(),
            };
            self.sink.emit(diag);
            return;
        }

        let narrowable = rhs.kind == NodeKind::Literal
            && matches!(declared.ostensible, TypeKind::Int | TypeKind::Float)
            && declared.bit_width != 0;
        if narrowable {
            let lexeme = self.lexeme(&rhs.token);

            if Value::from_literal(declared, rhs.token.kind, &lexeme) == Value::Overflow {
                if declared.ostensible == TypeKind::Int {
                    let diag = diags::IntLiteralOverflow {
                        is_signed: declared.is_signed,
                        bit_width: declared.bit_width,
                        loc: rhs.token.loc.clone(),
                    };
                    self.sink.emit(diag);
                } else {
                    let diag = diags::FloatLiteralOverflow {
                        bit_width: declared.bit_width,
                        loc: rhs.token.loc.clone(),
                    };
                    self.sink.emit(diag);
                }
            }
        }
    }
}

/// Which value kinds can initialise a declaration of `declared` kind.
fn kind_accepts(declared: TypeKind, value: &Value) -> bool {
    match declared {
        TypeKind::Int | TypeKind::Enum => matches!(value, Value::Int(_) | Value::Uint(_)),
        // integer literals may initialise floats
        TypeKind::Float => matches!(value, Value::Float(_) | Value::Int(_) | Value::Uint(_)),
        TypeKind::Bool => matches!(value, Value::Bool(_)),
        TypeKind::Char => matches!(value, Value::Char(_)),
        TypeKind::Str => matches!(value, Value::Str(_)),
        _ => true,
    }
}

/// Link `stmts` into a chain spine: every link holds a statement at LEFT
/// and the next link at RIGHT, and a single empty link terminates the
/// walk.
pub(crate) fn chain(stmts: Vec<Box<AstNode>>) -> Box<AstNode> {
    let mut link = AstNode::with_arity(NodeKind::Chain, Arity::Binary, Annotation::none());

    for stmt in stmts.into_iter().rev() {
        let mut new_link = AstNode::with_arity(NodeKind::Chain, Arity::Binary, Annotation::none());
        new_link.children[LEFT] = Some(stmt);
        new_link.children[RIGHT] = Some(link);
        link = new_link;
    }

    link
}
