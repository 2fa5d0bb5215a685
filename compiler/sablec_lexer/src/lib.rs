//! Lexer of Sable.
//!
//! The lexer is pull-based: the parser drives it one [`Token`] at a time
//! through [`Lexer::scan_token`]. The stream never ends; once the source is
//! exhausted every further call returns the end-of-file token.

use diags::{
    MultilineString, StrayColon, TooWideBinaryLiteral, TooWideHexLiteral, UnknownCharacter,
    UnterminatedBinaryLiteral, UnterminatedCharLiteral, UnterminatedString,
};
use sablec_diag::{DiagnosticSink, FileId, ToDiagnostic};
use sablec_token::{Token, TokenKind, keyword_kind};
use sablec_utils::{Span, span};

pub mod diags;

/// Lexer, takes Sable source code and turns it into tokens on demand.
///
/// The source is 7-bit ASCII; scanning works on the raw bytes.
#[derive(Debug, Clone)]
pub struct Lexer {
    /// the source code
    src: String,
    /// byte offset where the current lexeme starts
    start: usize,
    /// byte offset of the next unconsumed byte
    cur: usize,
    /// 1-based line of `cur`
    line: u32,
    /// sink of diags
    sink: DiagnosticSink,
    /// file id of the file we are lexing
    fid: FileId,
}

impl Lexer {
    pub fn new(sink: DiagnosticSink, source_code: String, fid: FileId) -> Lexer {
        Lexer {
            src: source_code,
            start: 0,
            cur: 0,
            line: 1,
            sink,
            fid,
        }
    }

    /// The source this lexer scans; tokens borrow their lexemes from it.
    pub fn source(&self) -> &str {
        &self.src
    }

    fn at_eof(&self) -> bool {
        self.cur >= self.src.len()
    }

    fn peek(&self) -> u8 {
        self.src.as_bytes().get(self.cur).copied().unwrap_or(0)
    }

    fn peek_next(&self) -> u8 {
        self.src.as_bytes().get(self.cur + 1).copied().unwrap_or(0)
    }

    fn advance(&mut self) -> u8 {
        let c = self.peek();
        self.cur += 1;
        c
    }

    fn matches(&mut self, expected: u8) -> bool {
        if self.at_eof() || self.peek() != expected {
            return false;
        }

        self.cur += 1;
        true
    }

    fn lexeme_len(&self) -> usize {
        self.cur - self.start
    }

    fn loc(&self) -> Span {
        span(self.start, self.cur, self.fid)
    }

    fn make(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            loc: self.loc(),
            line: self.line,
        }
    }

    /// Emit `diag` into the sink and return an error token covering the
    /// current lexeme. The parser is expected to stop when it sees one.
    fn make_error(&mut self, diag: impl ToDiagnostic) -> Token {
        self.sink.emit(diag);

        Token {
            kind: TokenKind::Error,
            loc: self.loc(),
            line: self.line,
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\r' | b'\t' => {
                    self.advance();
                }
                b'\n' => {
                    self.line += 1;
                    self.advance();
                }
                b'/' if self.peek_next() == b'/' => {
                    while self.peek() != b'\n' && !self.at_eof() {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    /// Scan the next token.
    ///
    /// Calling this after the end of the source keeps returning the EOF
    /// token.
    pub fn scan_token(&mut self) -> Token {
        use TokenKind as Tk;

        self.skip_whitespace();

        self.start = self.cur;

        if self.at_eof() {
            return self.make(Tk::Eof);
        }

        let c = self.advance();

        if c == b'0' && self.peek() == b'x' {
            return self.hex();
        }
        if c.is_ascii_digit() {
            return self.number();
        }

        if c == b'b' && self.peek() == b'\'' {
            return self.binary();
        }
        if is_ident_start(c) {
            return self.identifier();
        }

        match c {
            b'{' => self.make(Tk::LCurly),
            b'}' => self.make(Tk::RCurly),
            b'(' => self.make(Tk::LParen),
            b')' => self.make(Tk::RParen),
            b'[' => self.make(Tk::LBracket),
            b']' => self.make(Tk::RBracket),
            b',' => self.make(Tk::Comma),
            b';' => self.make(Tk::Semi),
            b'?' => self.make(Tk::Question),
            b':' => {
                if self.matches(b':') {
                    self.make(Tk::ColonColon)
                } else {
                    self.make_error(StrayColon { loc: self.loc() })
                }
            }
            b'+' => {
                if self.matches(b'=') {
                    self.make(Tk::PlusEq)
                } else if self.matches(b'+') {
                    self.make(Tk::PlusPlus)
                } else {
                    self.make(Tk::Plus)
                }
            }
            b'-' => {
                if self.matches(b'=') {
                    self.make(Tk::MinusEq)
                } else if self.matches(b'-') {
                    self.make(Tk::MinusMinus)
                } else {
                    self.make(Tk::Minus)
                }
            }
            b'*' => {
                if self.matches(b'=') {
                    self.make(Tk::StarEq)
                } else {
                    self.make(Tk::Star)
                }
            }
            b'/' => {
                if self.matches(b'=') {
                    self.make(Tk::SlashEq)
                } else {
                    self.make(Tk::Slash)
                }
            }
            b'%' => {
                if self.matches(b'=') {
                    self.make(Tk::PercentEq)
                } else {
                    self.make(Tk::Percent)
                }
            }
            b'~' => self.make(Tk::Tilde),
            b'^' => {
                if self.matches(b'=') {
                    self.make(Tk::CaretEq)
                } else {
                    self.make(Tk::Caret)
                }
            }
            b'&' => {
                if self.matches(b'&') {
                    self.make(Tk::AndAnd)
                } else if self.matches(b'=') {
                    self.make(Tk::AndEq)
                } else {
                    self.make(Tk::And)
                }
            }
            b'|' => {
                if self.matches(b'|') {
                    self.make(Tk::OrOr)
                } else if self.matches(b'=') {
                    self.make(Tk::OrEq)
                } else {
                    self.make(Tk::Or)
                }
            }
            b'!' => {
                if self.matches(b'=') {
                    self.make(Tk::BangEq)
                } else {
                    self.make(Tk::Bang)
                }
            }
            b'<' => {
                if self.matches(b'<') {
                    if self.matches(b'=') {
                        self.make(Tk::ShlEq)
                    } else {
                        self.make(Tk::Shl)
                    }
                } else {
                    self.make(Tk::Lt)
                }
            }
            b'>' => {
                if self.matches(b'>') {
                    if self.matches(b'=') {
                        self.make(Tk::ShrEq)
                    } else {
                        self.make(Tk::Shr)
                    }
                } else {
                    self.make(Tk::Gt)
                }
            }
            b'=' => {
                if self.matches(b'=') {
                    self.make(Tk::EqEq)
                } else {
                    self.make(Tk::Eq)
                }
            }
            b'\'' => self.char_lit(),
            b'"' => self.string_lit(),
            _ => self.make_error(UnknownCharacter {
                c: c as char,
                loc: self.loc(),
            }),
        }
    }

    fn hex(&mut self) -> Token {
        self.advance(); // the peek()'d 'x'

        while is_hex_digit(self.peek()) {
            self.advance();
        }

        // "0x" + up to 16 hex digits
        if self.lexeme_len() > 2 + 16 {
            return self.make_error(TooWideHexLiteral { loc: self.loc() });
        }

        self.make(TokenKind::HexLit)
    }

    fn binary(&mut self) -> Token {
        self.advance(); // the peek()'d '\''

        while self.peek() == b'0' || self.peek() == b'1' {
            self.advance();
        }

        if !self.matches(b'\'') {
            return self.make_error(UnterminatedBinaryLiteral { loc: self.loc() });
        }

        // "b'" + up to 64 digits + "'"
        if self.lexeme_len() > 3 + 64 {
            return self.make_error(TooWideBinaryLiteral { loc: self.loc() });
        }

        self.make(TokenKind::BinLit)
    }

    fn number(&mut self) -> Token {
        let mut is_float = false;

        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            is_float = true;
            self.advance();

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        self.make(if is_float {
            TokenKind::FloatLit
        } else {
            TokenKind::IntLit
        })
    }

    fn char_lit(&mut self) -> Token {
        self.advance(); // the single byte of the literal

        if !self.matches(b'\'') {
            return self.make_error(UnterminatedCharLiteral { loc: self.loc() });
        }

        self.make(TokenKind::CharLit)
    }

    fn string_lit(&mut self) -> Token {
        while self.peek() != b'"' && !self.at_eof() {
            if self.peek() == b'\n' {
                return self.make_error(MultilineString { loc: self.loc() });
            }

            self.advance();
        }

        if self.at_eof() {
            return self.make_error(UnterminatedString { loc: self.loc() });
        }

        self.advance(); // closing '"'
        self.make(TokenKind::StrLit)
    }

    fn identifier(&mut self) -> Token {
        while is_ident_continue(self.peek()) {
            self.advance();
        }

        let word = &self.src[self.start..self.cur];
        self.make(keyword_kind(word))
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

fn is_hex_digit(c: u8) -> bool {
    c.is_ascii_digit() || (b'A'..=b'F').contains(&c) || (b'a'..=b'f').contains(&c)
}
