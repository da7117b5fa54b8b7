use std::fmt::Display;

use name_derive::ReflectVariant;
use serde::Serialize;

/// Relational operator of a `test`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Ge,
    Gt,
}

impl Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq => write!(f, "=="),
            Self::Ne => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::Le => write!(f, "<="),
            Self::Ge => write!(f, ">="),
            Self::Gt => write!(f, ">"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AdditiveOperator {
    Plus,
    Minus,
}

impl Display for AdditiveOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MultiplicativeOperator {
    Star,
    Slash,
    Pct,
}

impl Display for MultiplicativeOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Pct => write!(f, "%"),
        }
    }
}

/// The closed set of grammar rules a reduction record may name.
///
/// Resolved once while the tree is being built; everything downstream matches on this instead
/// of comparing rule text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, ReflectVariant)]
pub enum Production {
    Start,
    ProceduresCons,
    ProceduresMain,
    Procedure,
    Main,
    ParamsEmpty,
    ParamsList,
    ParamlistSingle,
    ParamlistCons,
    TypeInt,
    TypeIntStar,
    DclsEmpty,
    DclsNum,
    DclsNull,
    Dcl,
    StatementsEmpty,
    StatementsCons,
    Assign,
    If,
    While,
    Println,
    Delete,
    Test(Comparison),
    ExprTerm,
    ExprBinary(AdditiveOperator),
    TermFactor,
    TermBinary(MultiplicativeOperator),
    FactorId,
    FactorNum,
    FactorNull,
    FactorParen,
    FactorAddressOf,
    FactorDeref,
    FactorNew,
    FactorCall,
    FactorCallArgs,
    ArglistSingle,
    ArglistCons,
    LvalueId,
    LvalueDeref,
    LvalueParen,
}

impl Production {
    pub const ALL: [Production; 49] = [
        Self::Start,
        Self::ProceduresCons,
        Self::ProceduresMain,
        Self::Procedure,
        Self::Main,
        Self::ParamsEmpty,
        Self::ParamsList,
        Self::ParamlistSingle,
        Self::ParamlistCons,
        Self::TypeInt,
        Self::TypeIntStar,
        Self::DclsEmpty,
        Self::DclsNum,
        Self::DclsNull,
        Self::Dcl,
        Self::StatementsEmpty,
        Self::StatementsCons,
        Self::Assign,
        Self::If,
        Self::While,
        Self::Println,
        Self::Delete,
        Self::Test(Comparison::Eq),
        Self::Test(Comparison::Ne),
        Self::Test(Comparison::Lt),
        Self::Test(Comparison::Le),
        Self::Test(Comparison::Ge),
        Self::Test(Comparison::Gt),
        Self::ExprTerm,
        Self::ExprBinary(AdditiveOperator::Plus),
        Self::ExprBinary(AdditiveOperator::Minus),
        Self::TermFactor,
        Self::TermBinary(MultiplicativeOperator::Star),
        Self::TermBinary(MultiplicativeOperator::Slash),
        Self::TermBinary(MultiplicativeOperator::Pct),
        Self::FactorId,
        Self::FactorNum,
        Self::FactorNull,
        Self::FactorParen,
        Self::FactorAddressOf,
        Self::FactorDeref,
        Self::FactorNew,
        Self::FactorCall,
        Self::FactorCallArgs,
        Self::ArglistSingle,
        Self::ArglistCons,
        Self::LvalueId,
        Self::LvalueDeref,
        Self::LvalueParen,
    ];

    /// The rule exactly as the upstream parser spells it: head first, then the body.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::Start => "start BOF procedures EOF",
            Self::ProceduresCons => "procedures procedure procedures",
            Self::ProceduresMain => "procedures main",
            Self::Procedure => {
                "procedure INT ID LPAREN params RPAREN LBRACE dcls statements RETURN expr SEMI RBRACE"
            }
            Self::Main => {
                "main INT WAIN LPAREN dcl COMMA dcl RPAREN LBRACE dcls statements RETURN expr SEMI RBRACE"
            }
            Self::ParamsEmpty => "params",
            Self::ParamsList => "params paramlist",
            Self::ParamlistSingle => "paramlist dcl",
            Self::ParamlistCons => "paramlist dcl COMMA paramlist",
            Self::TypeInt => "type INT",
            Self::TypeIntStar => "type INT STAR",
            Self::DclsEmpty => "dcls",
            Self::DclsNum => "dcls dcls dcl BECOMES NUM SEMI",
            Self::DclsNull => "dcls dcls dcl BECOMES NULL SEMI",
            Self::Dcl => "dcl type ID",
            Self::StatementsEmpty => "statements",
            Self::StatementsCons => "statements statements statement",
            Self::Assign => "statement lvalue BECOMES expr SEMI",
            Self::If => {
                "statement IF LPAREN test RPAREN LBRACE statements RBRACE ELSE LBRACE statements RBRACE"
            }
            Self::While => "statement WHILE LPAREN test RPAREN LBRACE statements RBRACE",
            Self::Println => "statement PRINTLN LPAREN expr RPAREN SEMI",
            Self::Delete => "statement DELETE LBRACK RBRACK expr SEMI",
            Self::Test(Comparison::Eq) => "test expr EQ expr",
            Self::Test(Comparison::Ne) => "test expr NE expr",
            Self::Test(Comparison::Lt) => "test expr LT expr",
            Self::Test(Comparison::Le) => "test expr LE expr",
            Self::Test(Comparison::Ge) => "test expr GE expr",
            Self::Test(Comparison::Gt) => "test expr GT expr",
            Self::ExprTerm => "expr term",
            Self::ExprBinary(AdditiveOperator::Plus) => "expr expr PLUS term",
            Self::ExprBinary(AdditiveOperator::Minus) => "expr expr MINUS term",
            Self::TermFactor => "term factor",
            Self::TermBinary(MultiplicativeOperator::Star) => "term term STAR factor",
            Self::TermBinary(MultiplicativeOperator::Slash) => "term term SLASH factor",
            Self::TermBinary(MultiplicativeOperator::Pct) => "term term PCT factor",
            Self::FactorId => "factor ID",
            Self::FactorNum => "factor NUM",
            Self::FactorNull => "factor NULL",
            Self::FactorParen => "factor LPAREN expr RPAREN",
            Self::FactorAddressOf => "factor AMP lvalue",
            Self::FactorDeref => "factor STAR factor",
            Self::FactorNew => "factor NEW INT LBRACK expr RBRACK",
            Self::FactorCall => "factor ID LPAREN RPAREN",
            Self::FactorCallArgs => "factor ID LPAREN arglist RPAREN",
            Self::ArglistSingle => "arglist expr",
            Self::ArglistCons => "arglist expr COMMA arglist",
            Self::LvalueId => "lvalue ID",
            Self::LvalueDeref => "lvalue STAR factor",
            Self::LvalueParen => "lvalue LPAREN lvalue RPAREN",
        }
    }

    pub fn head(&self) -> &'static str {
        self.symbols().next().unwrap_or_default()
    }

    /// Body symbols in order; empty for the nullable rules.
    pub fn body(&self) -> impl Iterator<Item = &'static str> {
        self.symbols().skip(1)
    }

    pub fn body_len(&self) -> usize {
        self.body().count()
    }

    fn symbols(&self) -> std::str::SplitWhitespace<'static> {
        self.rule().split_whitespace()
    }

    /// Resolves a head and body (already split into symbols) to its production.
    pub fn from_symbols(head: &str, body: &[&str]) -> Option<Self> {
        Self::ALL.iter().copied().find(|production| {
            production.head() == head && production.body().eq(body.iter().copied())
        })
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rule())
    }
}
