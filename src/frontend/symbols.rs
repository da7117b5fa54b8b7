use std::fmt::Display;

use serde::Serialize;

/// Terminal symbols of the source grammar, as named by the upstream scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Terminal {
    Amp,
    Becomes,
    Bof,
    Comma,
    Delete,
    Else,
    Eof,
    Eq,
    Ge,
    Gt,
    Id,
    If,
    Int,
    LBrace,
    LBrack,
    Le,
    LParen,
    Lt,
    Minus,
    Ne,
    New,
    Null,
    Num,
    Pct,
    Plus,
    Println,
    RBrace,
    RBrack,
    Return,
    RParen,
    Semi,
    Slash,
    Star,
    Wain,
    While,
}

impl Terminal {
    pub const ALL: [Terminal; 35] = [
        Self::Amp,
        Self::Becomes,
        Self::Bof,
        Self::Comma,
        Self::Delete,
        Self::Else,
        Self::Eof,
        Self::Eq,
        Self::Ge,
        Self::Gt,
        Self::Id,
        Self::If,
        Self::Int,
        Self::LBrace,
        Self::LBrack,
        Self::Le,
        Self::LParen,
        Self::Lt,
        Self::Minus,
        Self::Ne,
        Self::New,
        Self::Null,
        Self::Num,
        Self::Pct,
        Self::Plus,
        Self::Println,
        Self::RBrace,
        Self::RBrack,
        Self::Return,
        Self::RParen,
        Self::Semi,
        Self::Slash,
        Self::Star,
        Self::Wain,
        Self::While,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Amp => "AMP",
            Self::Becomes => "BECOMES",
            Self::Bof => "BOF",
            Self::Comma => "COMMA",
            Self::Delete => "DELETE",
            Self::Else => "ELSE",
            Self::Eof => "EOF",
            Self::Eq => "EQ",
            Self::Ge => "GE",
            Self::Gt => "GT",
            Self::Id => "ID",
            Self::If => "IF",
            Self::Int => "INT",
            Self::LBrace => "LBRACE",
            Self::LBrack => "LBRACK",
            Self::Le => "LE",
            Self::LParen => "LPAREN",
            Self::Lt => "LT",
            Self::Minus => "MINUS",
            Self::Ne => "NE",
            Self::New => "NEW",
            Self::Null => "NULL",
            Self::Num => "NUM",
            Self::Pct => "PCT",
            Self::Plus => "PLUS",
            Self::Println => "PRINTLN",
            Self::RBrace => "RBRACE",
            Self::RBrack => "RBRACK",
            Self::Return => "RETURN",
            Self::RParen => "RPAREN",
            Self::Semi => "SEMI",
            Self::Slash => "SLASH",
            Self::Star => "STAR",
            Self::Wain => "WAIN",
            Self::While => "WHILE",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|terminal| terminal.name() == name)
            .copied()
    }
}

impl Display for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Non-terminal symbols; every production head is one of these.
pub const NON_TERMINALS: [&str; 17] = [
    "start",
    "procedures",
    "procedure",
    "main",
    "params",
    "paramlist",
    "type",
    "dcls",
    "dcl",
    "statements",
    "statement",
    "test",
    "expr",
    "term",
    "factor",
    "arglist",
    "lvalue",
];

pub fn is_non_terminal(name: &str) -> bool {
    NON_TERMINALS.contains(&name)
}
