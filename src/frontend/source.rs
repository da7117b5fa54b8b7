//! Test-only front end: scans and parses program source into the syntax tree the upstream
//! parser would have described, so tests can be written against readable programs. The tree's
//! `Display` gives the derivation trace.

use crate::frontend::{
    node::{SyntaxNode, Token},
    production::{AdditiveOperator, Comparison, MultiplicativeOperator, Production},
    symbols::Terminal,
};

fn scan(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut position = 0;

    while position < chars.len() {
        let c = chars[position];
        if c.is_whitespace() {
            position += 1;
            continue;
        }

        if c.is_ascii_alphabetic() {
            let start = position;
            while position < chars.len() && chars[position].is_ascii_alphanumeric() {
                position += 1;
            }
            let word: String = chars[start..position].iter().collect();
            let terminal = match word.as_str() {
                "int" => Terminal::Int,
                "wain" => Terminal::Wain,
                "if" => Terminal::If,
                "else" => Terminal::Else,
                "while" => Terminal::While,
                "println" => Terminal::Println,
                "return" => Terminal::Return,
                "new" => Terminal::New,
                "delete" => Terminal::Delete,
                "NULL" => Terminal::Null,
                _ => Terminal::Id,
            };
            tokens.push(Token::new(terminal, &word));
            continue;
        }

        if c.is_ascii_digit() {
            let start = position;
            while position < chars.len() && chars[position].is_ascii_digit() {
                position += 1;
            }
            let number: String = chars[start..position].iter().collect();
            tokens.push(Token::new(Terminal::Num, &number));
            continue;
        }

        let next = chars.get(position + 1).copied();
        let (terminal, length) = match (c, next) {
            ('=', Some('=')) => (Terminal::Eq, 2),
            ('!', Some('=')) => (Terminal::Ne, 2),
            ('<', Some('=')) => (Terminal::Le, 2),
            ('>', Some('=')) => (Terminal::Ge, 2),
            ('=', _) => (Terminal::Becomes, 1),
            ('<', _) => (Terminal::Lt, 1),
            ('>', _) => (Terminal::Gt, 1),
            ('(', _) => (Terminal::LParen, 1),
            (')', _) => (Terminal::RParen, 1),
            ('{', _) => (Terminal::LBrace, 1),
            ('}', _) => (Terminal::RBrace, 1),
            ('[', _) => (Terminal::LBrack, 1),
            (']', _) => (Terminal::RBrack, 1),
            ('+', _) => (Terminal::Plus, 1),
            ('-', _) => (Terminal::Minus, 1),
            ('*', _) => (Terminal::Star, 1),
            ('/', _) => (Terminal::Slash, 1),
            ('%', _) => (Terminal::Pct, 1),
            (',', _) => (Terminal::Comma, 1),
            (';', _) => (Terminal::Semi, 1),
            ('&', _) => (Terminal::Amp, 1),
            _ => panic!("unexpected character {:?}", c),
        };
        let lexeme: String = chars[position..position + length].iter().collect();
        tokens.push(Token::new(terminal, &lexeme));
        position += length;
    }

    tokens
}

struct SourceParser {
    tokens: Vec<Token>,
    position: usize,
}

impl SourceParser {
    fn peek(&self) -> Option<Terminal> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<Terminal> {
        self.tokens
            .get(self.position + ahead)
            .map(|token| token.terminal)
    }

    fn expect(&mut self, terminal: Terminal) -> SyntaxNode {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .unwrap_or_else(|| panic!("expected {} at end of input", terminal));
        assert_eq!(
            token.terminal, terminal,
            "expected {} at token {}, found {:?}",
            terminal, self.position, token
        );
        self.position += 1;
        SyntaxNode::terminal(token)
    }

    fn start(&mut self) -> SyntaxNode {
        let procedures = self.procedures();
        assert_eq!(self.position, self.tokens.len(), "trailing input");
        SyntaxNode::rule(
            Production::Start,
            vec![
                SyntaxNode::terminal(Token::new(Terminal::Bof, "BOF")),
                procedures,
                SyntaxNode::terminal(Token::new(Terminal::Eof, "EOF")),
            ],
        )
    }

    fn procedures(&mut self) -> SyntaxNode {
        if self.peek_at(1) == Some(Terminal::Wain) {
            let main = self.main();
            return SyntaxNode::rule(Production::ProceduresMain, vec![main]);
        }

        let procedure = self.procedure();
        let rest = self.procedures();
        SyntaxNode::rule(Production::ProceduresCons, vec![procedure, rest])
    }

    fn main(&mut self) -> SyntaxNode {
        let mut children = vec![
            self.expect(Terminal::Int),
            self.expect(Terminal::Wain),
            self.expect(Terminal::LParen),
            self.dcl(),
            self.expect(Terminal::Comma),
            self.dcl(),
            self.expect(Terminal::RParen),
            self.expect(Terminal::LBrace),
        ];
        children.extend(self.procedure_tail());
        SyntaxNode::rule(Production::Main, children)
    }

    fn procedure(&mut self) -> SyntaxNode {
        let mut children = vec![
            self.expect(Terminal::Int),
            self.expect(Terminal::Id),
            self.expect(Terminal::LParen),
            self.params(),
            self.expect(Terminal::RParen),
            self.expect(Terminal::LBrace),
        ];
        children.extend(self.procedure_tail());
        SyntaxNode::rule(Production::Procedure, children)
    }

    /// `dcls statements RETURN expr SEMI RBRACE`
    fn procedure_tail(&mut self) -> Vec<SyntaxNode> {
        vec![
            self.dcls(),
            self.statements(),
            self.expect(Terminal::Return),
            self.expr(),
            self.expect(Terminal::Semi),
            self.expect(Terminal::RBrace),
        ]
    }

    fn params(&mut self) -> SyntaxNode {
        if self.peek() == Some(Terminal::RParen) {
            return SyntaxNode::rule(Production::ParamsEmpty, vec![]);
        }
        let paramlist = self.paramlist();
        SyntaxNode::rule(Production::ParamsList, vec![paramlist])
    }

    fn paramlist(&mut self) -> SyntaxNode {
        let dcl = self.dcl();
        if self.peek() == Some(Terminal::Comma) {
            let comma = self.expect(Terminal::Comma);
            let rest = self.paramlist();
            return SyntaxNode::rule(Production::ParamlistCons, vec![dcl, comma, rest]);
        }
        SyntaxNode::rule(Production::ParamlistSingle, vec![dcl])
    }

    fn type_clause(&mut self) -> SyntaxNode {
        let int = self.expect(Terminal::Int);
        if self.peek() == Some(Terminal::Star) {
            let star = self.expect(Terminal::Star);
            return SyntaxNode::rule(Production::TypeIntStar, vec![int, star]);
        }
        SyntaxNode::rule(Production::TypeInt, vec![int])
    }

    fn dcl(&mut self) -> SyntaxNode {
        let type_clause = self.type_clause();
        let id = self.expect(Terminal::Id);
        SyntaxNode::rule(Production::Dcl, vec![type_clause, id])
    }

    fn dcls(&mut self) -> SyntaxNode {
        let mut dcls = SyntaxNode::rule(Production::DclsEmpty, vec![]);
        while self.peek() == Some(Terminal::Int) {
            let dcl = self.dcl();
            let becomes = self.expect(Terminal::Becomes);
            let (production, initializer) = if self.peek() == Some(Terminal::Null) {
                (Production::DclsNull, self.expect(Terminal::Null))
            } else {
                (Production::DclsNum, self.expect(Terminal::Num))
            };
            let semi = self.expect(Terminal::Semi);
            dcls = SyntaxNode::rule(production, vec![dcls, dcl, becomes, initializer, semi]);
        }
        dcls
    }

    fn statements(&mut self) -> SyntaxNode {
        let mut statements = SyntaxNode::rule(Production::StatementsEmpty, vec![]);
        while !matches!(self.peek(), Some(Terminal::RBrace) | Some(Terminal::Return) | None) {
            let statement = self.statement();
            statements = SyntaxNode::rule(Production::StatementsCons, vec![statements, statement]);
        }
        statements
    }

    fn block(&mut self) -> [SyntaxNode; 3] {
        [
            self.expect(Terminal::LBrace),
            self.statements(),
            self.expect(Terminal::RBrace),
        ]
    }

    fn statement(&mut self) -> SyntaxNode {
        match self.peek() {
            Some(Terminal::If) => {
                let mut children = vec![
                    self.expect(Terminal::If),
                    self.expect(Terminal::LParen),
                    self.test(),
                    self.expect(Terminal::RParen),
                ];
                children.extend(self.block());
                children.push(self.expect(Terminal::Else));
                children.extend(self.block());
                SyntaxNode::rule(Production::If, children)
            }
            Some(Terminal::While) => {
                let mut children = vec![
                    self.expect(Terminal::While),
                    self.expect(Terminal::LParen),
                    self.test(),
                    self.expect(Terminal::RParen),
                ];
                children.extend(self.block());
                SyntaxNode::rule(Production::While, children)
            }
            Some(Terminal::Println) => {
                let children = vec![
                    self.expect(Terminal::Println),
                    self.expect(Terminal::LParen),
                    self.expr(),
                    self.expect(Terminal::RParen),
                    self.expect(Terminal::Semi),
                ];
                SyntaxNode::rule(Production::Println, children)
            }
            Some(Terminal::Delete) => {
                let children = vec![
                    self.expect(Terminal::Delete),
                    self.expect(Terminal::LBrack),
                    self.expect(Terminal::RBrack),
                    self.expr(),
                    self.expect(Terminal::Semi),
                ];
                SyntaxNode::rule(Production::Delete, children)
            }
            _ => {
                let children = vec![
                    self.lvalue(),
                    self.expect(Terminal::Becomes),
                    self.expr(),
                    self.expect(Terminal::Semi),
                ];
                SyntaxNode::rule(Production::Assign, children)
            }
        }
    }

    fn test(&mut self) -> SyntaxNode {
        let left = self.expr();
        let (terminal, comparison) = match self.peek() {
            Some(Terminal::Eq) => (Terminal::Eq, Comparison::Eq),
            Some(Terminal::Ne) => (Terminal::Ne, Comparison::Ne),
            Some(Terminal::Lt) => (Terminal::Lt, Comparison::Lt),
            Some(Terminal::Le) => (Terminal::Le, Comparison::Le),
            Some(Terminal::Ge) => (Terminal::Ge, Comparison::Ge),
            Some(Terminal::Gt) => (Terminal::Gt, Comparison::Gt),
            other => panic!("expected a comparison, found {:?}", other),
        };
        let operator = self.expect(terminal);
        let right = self.expr();
        SyntaxNode::rule(Production::Test(comparison), vec![left, operator, right])
    }

    fn expr(&mut self) -> SyntaxNode {
        let term = self.term();
        let mut expr = SyntaxNode::rule(Production::ExprTerm, vec![term]);
        loop {
            let (terminal, operator) = match self.peek() {
                Some(Terminal::Plus) => (Terminal::Plus, AdditiveOperator::Plus),
                Some(Terminal::Minus) => (Terminal::Minus, AdditiveOperator::Minus),
                _ => return expr,
            };
            let operator_node = self.expect(terminal);
            let term = self.term();
            expr = SyntaxNode::rule(
                Production::ExprBinary(operator),
                vec![expr, operator_node, term],
            );
        }
    }

    fn term(&mut self) -> SyntaxNode {
        let factor = self.factor();
        let mut term = SyntaxNode::rule(Production::TermFactor, vec![factor]);
        loop {
            let (terminal, operator) = match self.peek() {
                Some(Terminal::Star) => (Terminal::Star, MultiplicativeOperator::Star),
                Some(Terminal::Slash) => (Terminal::Slash, MultiplicativeOperator::Slash),
                Some(Terminal::Pct) => (Terminal::Pct, MultiplicativeOperator::Pct),
                _ => return term,
            };
            let operator_node = self.expect(terminal);
            let factor = self.factor();
            term = SyntaxNode::rule(
                Production::TermBinary(operator),
                vec![term, operator_node, factor],
            );
        }
    }

    fn factor(&mut self) -> SyntaxNode {
        match self.peek() {
            Some(Terminal::Id) if self.peek_at(1) == Some(Terminal::LParen) => {
                let id = self.expect(Terminal::Id);
                let lparen = self.expect(Terminal::LParen);
                if self.peek() == Some(Terminal::RParen) {
                    let rparen = self.expect(Terminal::RParen);
                    return SyntaxNode::rule(Production::FactorCall, vec![id, lparen, rparen]);
                }
                let arglist = self.arglist();
                let rparen = self.expect(Terminal::RParen);
                SyntaxNode::rule(
                    Production::FactorCallArgs,
                    vec![id, lparen, arglist, rparen],
                )
            }
            Some(Terminal::Id) => {
                SyntaxNode::rule(Production::FactorId, vec![self.expect(Terminal::Id)])
            }
            Some(Terminal::Num) => {
                SyntaxNode::rule(Production::FactorNum, vec![self.expect(Terminal::Num)])
            }
            Some(Terminal::Null) => {
                SyntaxNode::rule(Production::FactorNull, vec![self.expect(Terminal::Null)])
            }
            Some(Terminal::LParen) => {
                let children = vec![
                    self.expect(Terminal::LParen),
                    self.expr(),
                    self.expect(Terminal::RParen),
                ];
                SyntaxNode::rule(Production::FactorParen, children)
            }
            Some(Terminal::Amp) => {
                let children = vec![self.expect(Terminal::Amp), self.lvalue()];
                SyntaxNode::rule(Production::FactorAddressOf, children)
            }
            Some(Terminal::Star) => {
                let children = vec![self.expect(Terminal::Star), self.factor()];
                SyntaxNode::rule(Production::FactorDeref, children)
            }
            Some(Terminal::New) => {
                let children = vec![
                    self.expect(Terminal::New),
                    self.expect(Terminal::Int),
                    self.expect(Terminal::LBrack),
                    self.expr(),
                    self.expect(Terminal::RBrack),
                ];
                SyntaxNode::rule(Production::FactorNew, children)
            }
            other => panic!("expected a factor, found {:?}", other),
        }
    }

    fn arglist(&mut self) -> SyntaxNode {
        let expr = self.expr();
        if self.peek() == Some(Terminal::Comma) {
            let comma = self.expect(Terminal::Comma);
            let rest = self.arglist();
            return SyntaxNode::rule(Production::ArglistCons, vec![expr, comma, rest]);
        }
        SyntaxNode::rule(Production::ArglistSingle, vec![expr])
    }

    fn lvalue(&mut self) -> SyntaxNode {
        match self.peek() {
            Some(Terminal::Star) => {
                let children = vec![self.expect(Terminal::Star), self.factor()];
                SyntaxNode::rule(Production::LvalueDeref, children)
            }
            Some(Terminal::LParen) => {
                let children = vec![
                    self.expect(Terminal::LParen),
                    self.lvalue(),
                    self.expect(Terminal::RParen),
                ];
                SyntaxNode::rule(Production::LvalueParen, children)
            }
            _ => SyntaxNode::rule(Production::LvalueId, vec![self.expect(Terminal::Id)]),
        }
    }
}

/// Parses a whole program into its `start` tree. Panics on malformed source.
pub fn parse_program(text: &str) -> SyntaxNode {
    let mut parser = SourceParser {
        tokens: scan(text),
        position: 0,
    };
    parser.start()
}

/// The derivation-order trace the upstream parser would print for `text`.
pub fn derivation_trace(text: &str) -> String {
    parse_program(text).to_string()
}

/// The same records in bottom-up reduction order.
pub fn reduction_trace(text: &str) -> String {
    fn write_postorder(node: &SyntaxNode, lines: &mut Vec<String>) {
        for child in node.children() {
            write_postorder(child, lines);
        }
        match node.production() {
            Some(production) => lines.push(production.rule().to_string()),
            None => lines.push(format!("{} {}", node.head(), node.lexeme())),
        }
    }

    let mut lines = Vec::new();
    write_postorder(&parse_program(text), &mut lines);
    lines.join("\n")
}
