//! Statements: blocks, control flow, break/continue/return.

use sablec_ast::{Annotation, AstNode, NodeKind, TypeKind};
use sablec_diag::IResult;
use sablec_token::TokenKind;

use crate::{chain, diags, Parser};

impl Parser {
    /// Parse one statement: `if`, `while`, `for`, or an expression
    /// followed by `;`.
    ///
    /// The `;` is optional after enum, struct and function definitions,
    /// which delimit themselves with `}`.
    pub fn statement(&mut self) -> IResult<Box<AstNode>> {
        if self.matches(TokenKind::KwIf) {
            return self.if_stmt();
        }
        if self.matches(TokenKind::KwWhile) {
            return self.while_stmt();
        }
        if self.matches(TokenKind::KwFor) {
            return self.for_stmt();
        }

        let expr = self.expression()?;

        let self_delimiting = expr.annotation.ostensible == TypeKind::Enum
            || expr.annotation.ostensible == TypeKind::Struct
            || expr.annotation.is_function;
        if self_delimiting {
            self.matches(TokenKind::Semi);
        } else {
            self.consume(TokenKind::Semi, "after expression statement");
        }

        Ok(expr)
    }

    /// `if ( expr ) { block } [ else ( if … | { block } ) ]`
    fn if_stmt(&mut self) -> IResult<Box<AstNode>> {
        self.consume(TokenKind::LParen, "after keyword `if`");
        let condition = self.expression()?;
        self.consume(TokenKind::RParen, "after `if` condition");
        self.consume(TokenKind::LCurly, "to open the `if` body");

        self.scopes.begin_scope();
        let bodies = self.if_bodies();
        self.scopes.end_scope();
        let (body_true, body_false) = bodies?;

        Ok(AstNode::new(
            NodeKind::If,
            Some(condition),
            Some(body_true),
            body_false,
            Annotation::none(),
        ))
    }

    fn if_bodies(&mut self) -> IResult<(Box<AstNode>, Option<Box<AstNode>>)> {
        let body_true = self.block();

        let mut body_false = None;
        if self.matches(TokenKind::KwElse) {
            if self.matches(TokenKind::KwIf) {
                body_false = Some(self.if_stmt()?);
            } else {
                self.consume(TokenKind::LCurly, "to open the `else` body");
                body_false = Some(self.block());
            }
        }

        Ok((body_true, body_false))
    }

    /// `while expr { block } [;]`
    fn while_stmt(&mut self) -> IResult<Box<AstNode>> {
        let condition = self.expression()?;
        self.consume(TokenKind::LCurly, "to open the `while` body");

        self.scopes.begin_scope();
        let body = self.block();
        self.scopes.end_scope();

        self.matches(TokenKind::Semi);

        Ok(AstNode::new(
            NodeKind::While,
            Some(condition),
            None,
            Some(body),
            Annotation::none(),
        ))
    }

    /// `for ( init-stmt; cond-stmt; post-expr ) { block }`
    ///
    /// Desugars to `statement(init); while (cond) { block; post; }` with
    /// the post expression spliced in as the last statement of the body,
    /// under one scope spanning the whole construct.
    fn for_stmt(&mut self) -> IResult<Box<AstNode>> {
        self.consume(TokenKind::LParen, "after keyword `for`");

        self.scopes.begin_scope();
        let parts = self.for_parts();
        self.scopes.end_scope();

        parts
    }

    fn for_parts(&mut self) -> IResult<Box<AstNode>> {
        let initialization = self.statement()?;
        let condition = self.statement()?;
        let after_loop = self.expression()?;

        self.consume(TokenKind::RParen, "after `for` header");
        self.consume(TokenKind::LCurly, "to open the `for` body");

        let mut stmts = self.block_stmts();
        stmts.push(after_loop);
        let body = chain(stmts);

        let while_node = AstNode::new(
            NodeKind::While,
            Some(condition),
            None,
            Some(body),
            Annotation::none(),
        );

        Ok(AstNode::new(
            NodeKind::Statement,
            Some(initialization),
            None,
            Some(while_node),
            Annotation::none(),
        ))
    }

    /// Parse statements up to the closing `}` of a block and consume it.
    ///
    /// A statement that fails to parse is reported and skipped to the next
    /// statement boundary, so one broken statement does not take the whole
    /// block down.
    pub(crate) fn block_stmts(&mut self) -> Vec<Box<AstNode>> {
        let mut stmts = Vec::new();

        while !self.next_is(TokenKind::RCurly) && !self.next_is(TokenKind::Eof) {
            match self.statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(diag) => {
                    self.sink.emit(diag);
                    self.recover_statement();
                }
            }
        }

        self.consume(TokenKind::RCurly, "to close this block");

        stmts
    }

    /// A block as a chain spine.
    pub(crate) fn block(&mut self) -> Box<AstNode> {
        chain(self.block_stmts())
    }
}

/// Prefix rule of `break`; requires an immediate `;`.
pub(crate) fn break_stmt(p: &mut Parser, _can_assign: bool) -> IResult<Box<AstNode>> {
    if !p.next_is(TokenKind::Semi) {
        let diag = diags::ExpectedToken {
            expected: TokenKind::Semi.to_string(),
            found: p.next.kind,
            context: "after `break`",
            loc: p.next.loc.clone(),
        };
        p.sink.emit(diag);
    }

    Ok(AstNode::from_token(
        NodeKind::Break,
        None,
        None,
        None,
        p.current.clone(),
        Annotation::none(),
    ))
}

/// Prefix rule of `continue`; requires an immediate `;`.
pub(crate) fn continue_stmt(p: &mut Parser, _can_assign: bool) -> IResult<Box<AstNode>> {
    if !p.next_is(TokenKind::Semi) {
        let diag = diags::ExpectedToken {
            expected: TokenKind::Semi.to_string(),
            found: p.next.kind,
            context: "after `continue`",
            loc: p.next.loc.clone(),
        };
        p.sink.emit(diag);
    }

    Ok(AstNode::from_token(
        NodeKind::Continue,
        None,
        None,
        None,
        p.current.clone(),
        Annotation::none(),
    ))
}

/// Prefix rule of `return`, with an optional value expression.
pub(crate) fn return_stmt(p: &mut Parser, _can_assign: bool) -> IResult<Box<AstNode>> {
    let token = p.current.clone();

    let expr = if !p.next_is(TokenKind::Semi) {
        Some(p.expression()?)
    } else {
        None
    };

    let annotation = expr
        .as_ref()
        .map(|e| e.annotation)
        .unwrap_or_else(|| Annotation::of_type(TokenKind::KwVoid));

    Ok(AstNode::from_token(
        NodeKind::Return,
        expr,
        None,
        None,
        token,
        annotation,
    ))
}
