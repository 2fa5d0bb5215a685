//! Tokens shared between sablec_lexer and sablec_parser.

use std::{
    fmt::{self, Display},
    io::{self, Write},
};

use sablec_utils::Span;

/// A Sable token.
///
/// Tokens are value objects: the lexeme itself lives in the source buffer
/// and is reachable through `loc`. The source must outlive every token
/// scanned from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub loc: Span,
    /// 1-based line this token starts on.
    pub line: u32,
}

impl Token {
    /// Create a new dummy token, used to prime the parser before the first
    /// real token arrives.
    pub const fn dummy() -> Token {
        Token {
            kind: TokenKind::Eof,
            loc: Span::ZERO,
            line: 0,
        }
    }

    /// The lexeme of this token inside `src`.
    pub fn lexeme<'src>(&self, src: &'src str) -> &'src str {
        self.loc.slice_str(src)
    }

    /// Write a one-line human readable form of this token, used by
    /// `--dump-tokens`.
    pub fn dump(&self, out: &mut impl Write, src: &str) -> io::Result<()> {
        match self.kind {
            TokenKind::Eof => writeln!(out, "{:>4} | end of file", self.line),
            TokenKind::Error => writeln!(out, "{:>4} | error token", self.line),
            _ => writeln!(
                out,
                "{:>4} | {} `{}`",
                self.line,
                self.kind,
                self.lexeme(src)
            ),
        }
    }
}

impl PartialEq<TokenKind> for Token {
    fn eq(&self, other: &TokenKind) -> bool {
        self.kind == *other
    }
}

// WARN: the token set is closed. When adding a kind, update `keyword_kind`,
// `Display` and the predicate methods below together.
/// Kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // type keywords
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// keyword `char`
    KwChar,
    /// keyword `string`
    KwString,
    /// keyword `bool`
    KwBool,
    /// keyword `void`
    KwVoid,
    /// keyword `enum`
    KwEnum,
    /// keyword `struct`
    KwStruct,
    // keywords
    /// keyword `if`
    KwIf,
    /// keyword `else`
    KwElse,
    /// keyword `while`
    KwWhile,
    /// keyword `for`
    KwFor,
    /// keyword `break`
    KwBreak,
    /// keyword `continue`
    KwContinue,
    /// keyword `return`
    KwReturn,
    /// identifier
    Ident,
    // literals
    /// decimal integer literal, `123`
    IntLit,
    /// hex literal, `0x1A`
    HexLit,
    /// binary literal, `b'1010'`
    BinLit,
    /// float literal, `1.5`
    FloatLit,
    /// char literal, `'x'`
    CharLit,
    /// bool literal, `true` or `false`
    BoolLit,
    /// string literal, `"…"`
    StrLit,
    /// enum member literal, produced by resolution, never by the lexer
    EnumLit,
    // punctuation
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LCurly,
    /// `}`
    RCurly,
    /// `,`
    Comma,
    /// `;`
    Semi,
    /// `?`
    Question,
    /// `::`
    ColonColon,
    // operators
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `!`
    Bang,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    // compound assignments
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `%=`
    PercentEq,
    /// `^=`
    CaretEq,
    /// `&=`
    AndEq,
    /// `|=`
    OrEq,
    /// `<<=`
    ShlEq,
    /// `>>=`
    ShrEq,
    /// end of file
    Eof,
    /// lexing failed at this position; the diagnostic is already in the sink
    Error,
}

impl TokenKind {
    /// Is this one of the type keywords that can declare a variable, a
    /// parameter or a return type?
    pub const fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::F32
                | Self::F64
                | Self::KwBool
                | Self::KwStruct
                | Self::KwChar
                | Self::KwString
                | Self::KwVoid
        )
    }

    /// Is this a literal token kind?
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::IntLit
                | Self::HexLit
                | Self::BinLit
                | Self::FloatLit
                | Self::CharLit
                | Self::BoolLit
                | Self::StrLit
                | Self::EnumLit
        )
    }

    /// Is this one of the compound assignment operators (`+=`, `&=`, `<<=`,
    /// ...)?
    pub const fn is_terse_assignment(&self) -> bool {
        matches!(
            self,
            Self::PlusEq
                | Self::MinusEq
                | Self::StarEq
                | Self::SlashEq
                | Self::PercentEq
                | Self::CaretEq
                | Self::AndEq
                | Self::OrEq
                | Self::ShlEq
                | Self::ShrEq
        )
    }
}

/// The keyword table: classify an identifier-shaped lexeme.
///
/// Returns [`TokenKind::Ident`] when the word is not a keyword. `true` and
/// `false` classify as bool literals.
pub fn keyword_kind(word: &str) -> TokenKind {
    use TokenKind as Tk;

    match word {
        "i8" => Tk::I8,
        "i16" => Tk::I16,
        "i32" => Tk::I32,
        "i64" => Tk::I64,
        "u8" => Tk::U8,
        "u16" => Tk::U16,
        "u32" => Tk::U32,
        "u64" => Tk::U64,
        "f32" => Tk::F32,
        "f64" => Tk::F64,
        "char" => Tk::KwChar,
        "string" => Tk::KwString,
        "bool" => Tk::KwBool,
        "void" => Tk::KwVoid,
        "enum" => Tk::KwEnum,
        "struct" => Tk::KwStruct,
        "if" => Tk::KwIf,
        "else" => Tk::KwElse,
        "while" => Tk::KwWhile,
        "for" => Tk::KwFor,
        "break" => Tk::KwBreak,
        "continue" => Tk::KwContinue,
        "return" => Tk::KwReturn,
        "true" | "false" => Tk::BoolLit,
        _ => Tk::Ident,
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind as Tk;

        match self {
            Tk::I8 => write!(f, "type `i8`"),
            Tk::I16 => write!(f, "type `i16`"),
            Tk::I32 => write!(f, "type `i32`"),
            Tk::I64 => write!(f, "type `i64`"),
            Tk::U8 => write!(f, "type `u8`"),
            Tk::U16 => write!(f, "type `u16`"),
            Tk::U32 => write!(f, "type `u32`"),
            Tk::U64 => write!(f, "type `u64`"),
            Tk::F32 => write!(f, "type `f32`"),
            Tk::F64 => write!(f, "type `f64`"),
            Tk::KwChar => write!(f, "type `char`"),
            Tk::KwString => write!(f, "type `string`"),
            Tk::KwBool => write!(f, "type `bool`"),
            Tk::KwVoid => write!(f, "type `void`"),
            Tk::KwEnum => write!(f, "keyword `enum`"),
            Tk::KwStruct => write!(f, "keyword `struct`"),
            Tk::KwIf => write!(f, "keyword `if`"),
            Tk::KwElse => write!(f, "keyword `else`"),
            Tk::KwWhile => write!(f, "keyword `while`"),
            Tk::KwFor => write!(f, "keyword `for`"),
            Tk::KwBreak => write!(f, "keyword `break`"),
            Tk::KwContinue => write!(f, "keyword `continue`"),
            Tk::KwReturn => write!(f, "keyword `return`"),
            Tk::Ident => write!(f, "identifier"),
            Tk::IntLit => write!(f, "integer literal"),
            Tk::HexLit => write!(f, "hex literal"),
            Tk::BinLit => write!(f, "binary literal"),
            Tk::FloatLit => write!(f, "float literal"),
            Tk::CharLit => write!(f, "char literal"),
            Tk::BoolLit => write!(f, "bool literal"),
            Tk::StrLit => write!(f, "string literal"),
            Tk::EnumLit => write!(f, "enum literal"),
            Tk::LParen => write!(f, "`(`"),
            Tk::RParen => write!(f, "`)`"),
            Tk::LBracket => write!(f, "`[`"),
            Tk::RBracket => write!(f, "`]`"),
            Tk::LCurly => write!(f, "`{{`"),
            Tk::RCurly => write!(f, "`}}`"),
            Tk::Comma => write!(f, "`,`"),
            Tk::Semi => write!(f, "`;`"),
            Tk::Question => write!(f, "`?`"),
            Tk::ColonColon => write!(f, "`::`"),
            Tk::Plus => write!(f, "`+`"),
            Tk::Minus => write!(f, "`-`"),
            Tk::Star => write!(f, "`*`"),
            Tk::Slash => write!(f, "`/`"),
            Tk::Percent => write!(f, "`%`"),
            Tk::PlusPlus => write!(f, "`++`"),
            Tk::MinusMinus => write!(f, "`--`"),
            Tk::Eq => write!(f, "`=`"),
            Tk::EqEq => write!(f, "`==`"),
            Tk::BangEq => write!(f, "`!=`"),
            Tk::Bang => write!(f, "`!`"),
            Tk::Lt => write!(f, "`<`"),
            Tk::Gt => write!(f, "`>`"),
            Tk::AndAnd => write!(f, "`&&`"),
            Tk::OrOr => write!(f, "`||`"),
            Tk::And => write!(f, "`&`"),
            Tk::Or => write!(f, "`|`"),
            Tk::Caret => write!(f, "`^`"),
            Tk::Tilde => write!(f, "`~`"),
            Tk::Shl => write!(f, "`<<`"),
            Tk::Shr => write!(f, "`>>`"),
            Tk::PlusEq => write!(f, "`+=`"),
            Tk::MinusEq => write!(f, "`-=`"),
            Tk::StarEq => write!(f, "`*=`"),
            Tk::SlashEq => write!(f, "`/=`"),
            Tk::PercentEq => write!(f, "`%=`"),
            Tk::CaretEq => write!(f, "`^=`"),
            Tk::AndEq => write!(f, "`&=`"),
            Tk::OrEq => write!(f, "`|=`"),
            Tk::ShlEq => write!(f, "`<<=`"),
            Tk::ShrEq => write!(f, "`>>=`"),
            Tk::Eof => write!(f, "end of file"),
            Tk::Error => write!(f, "invalid token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_classification() {
        assert_eq!(keyword_kind("i8"), TokenKind::I8);
        assert_eq!(keyword_kind("u64"), TokenKind::U64);
        assert_eq!(keyword_kind("string"), TokenKind::KwString);
        assert_eq!(keyword_kind("continue"), TokenKind::KwContinue);
        assert_eq!(keyword_kind("true"), TokenKind::BoolLit);
        assert_eq!(keyword_kind("false"), TokenKind::BoolLit);
        assert_eq!(keyword_kind("truthy"), TokenKind::Ident);
        assert_eq!(keyword_kind("i128"), TokenKind::Ident);
    }

    #[test]
    fn predicates() {
        assert!(TokenKind::KwBool.is_type_keyword());
        assert!(TokenKind::KwVoid.is_type_keyword());
        assert!(!TokenKind::KwEnum.is_type_keyword());
        assert!(TokenKind::BinLit.is_literal());
        assert!(!TokenKind::Ident.is_literal());
        assert!(TokenKind::ShlEq.is_terse_assignment());
        assert!(!TokenKind::BangEq.is_terse_assignment());
        assert!(!TokenKind::EqEq.is_terse_assignment());
    }

    #[test]
    fn token_compares_to_its_kind() {
        assert!(Token::dummy() == TokenKind::Eof);
        assert!(Token::dummy() != TokenKind::Semi);
    }

    #[test]
    fn token_kind_display() {
        assert_eq!(TokenKind::ColonColon.to_string(), "`::`");
        assert_eq!(TokenKind::KwWhile.to_string(), "keyword `while`");
        assert_eq!(TokenKind::HexLit.to_string(), "hex literal");
    }
}
