// src/frontend/token.rs

/// Token types of the fragment language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Literals
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    Identifier,

    // Keywords
    KwNew,
    KwReturn,
    KwBreak,
    KwContinue,
    KwFinal,
    KwTrue,
    KwFalse,
    KwNull,

    // Type keywords
    KwBoolean,
    KwChar,
    KwInt,
    KwLong,
    KwFloat,
    KwDouble,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    BangEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    AmpAmp,
    PipePipe,
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Semicolon,

    // Special
    Eof,
    Error,
}

impl TokenType {
    /// Get string representation for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntLiteral => "integer",
            Self::FloatLiteral => "float",
            Self::StringLiteral => "string",
            Self::Identifier => "identifier",
            Self::KwNew => "new",
            Self::KwReturn => "return",
            Self::KwBreak => "break",
            Self::KwContinue => "continue",
            Self::KwFinal => "final",
            Self::KwTrue => "true",
            Self::KwFalse => "false",
            Self::KwNull => "null",
            Self::KwBoolean => "boolean",
            Self::KwChar => "char",
            Self::KwInt => "int",
            Self::KwLong => "long",
            Self::KwFloat => "float",
            Self::KwDouble => "double",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::EqEq => "==",
            Self::BangEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::AmpAmp => "&&",
            Self::PipePipe => "||",
            Self::Eq => "=",
            Self::PlusEq => "+=",
            Self::MinusEq => "-=",
            Self::StarEq => "*=",
            Self::SlashEq => "/=",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Semicolon => ";",
            Self::Eof => "end of input",
            Self::Error => "error",
        }
    }

    /// Binding power of binary operators (Pratt parsing); 0 for anything else
    pub fn precedence(&self) -> u8 {
        match self {
            Self::PipePipe => 1,
            Self::AmpAmp => 2,
            Self::EqEq | Self::BangEq => 3,
            Self::Lt | Self::Gt | Self::LtEq | Self::GtEq => 4,
            Self::Plus | Self::Minus => 5,
            Self::Star | Self::Slash | Self::Percent => 6,
            _ => 0,
        }
    }

    /// Whether a token can begin an argument written without parentheses.
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::IntLiteral
                | Self::FloatLiteral
                | Self::StringLiteral
                | Self::KwTrue
                | Self::KwFalse
                | Self::KwNull
                | Self::KwNew
        )
    }

    pub fn is_primitive_type(&self) -> bool {
        matches!(
            self,
            Self::KwBoolean | Self::KwChar | Self::KwInt | Self::KwLong | Self::KwFloat | Self::KwDouble
        )
    }
}

/// Source location span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize, // Byte offset
    pub end: usize,   // Byte offset (exclusive)
    pub line: u32,    // 1-indexed
    pub column: u32,  // 1-indexed
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
            line: self.line,
            column: self.column,
        }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end.saturating_sub(span.start)).into()
    }
}

/// A token with its location in source code
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ty: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(ty: TokenType, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            ty,
            lexeme: lexeme.into(),
            span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_merge_keeps_start_of_first() {
        let merged = Span::new(0, 5, 1, 1).merge(Span::new(10, 15, 2, 3));
        assert_eq!(merged.start, 0);
        assert_eq!(merged.end, 15);
        assert_eq!(merged.line, 1);
    }

    #[test]
    fn span_converts_to_source_span() {
        let span: miette::SourceSpan = Span::new(4, 9, 1, 5).into();
        assert_eq!(span.offset(), 4);
        assert_eq!(span.len(), 5);
    }

    #[test]
    fn precedence_orders_operators() {
        assert!(TokenType::Star.precedence() > TokenType::Plus.precedence());
        assert!(TokenType::Plus.precedence() > TokenType::Lt.precedence());
        assert!(TokenType::AmpAmp.precedence() > TokenType::PipePipe.precedence());
        assert_eq!(TokenType::Eq.precedence(), 0);
    }
}
