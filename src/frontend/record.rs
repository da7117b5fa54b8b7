use crate::frontend::{
    errors::StructuralError,
    node::Token,
    production::Production,
    symbols::{is_non_terminal, Terminal},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// `<TERMINAL> <lexeme>`
    Terminal(Token),
    /// `<head> <body-symbol>...`, possibly with an empty body
    Reduction(Production),
}

/// One line of parser output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReductionRecord {
    pub line: usize,
    pub kind: RecordKind,
}

impl ReductionRecord {
    pub fn terminal(line: usize, terminal: Terminal, lexeme: &str) -> Self {
        Self {
            line,
            kind: RecordKind::Terminal(Token::new(terminal, lexeme)),
        }
    }

    pub fn reduction(line: usize, production: Production) -> Self {
        Self {
            line,
            kind: RecordKind::Reduction(production),
        }
    }

    /// Parses a single record. Blank lines carry no record and yield `Ok(None)`.
    pub fn parse(line: usize, text: &str) -> Result<Option<Self>, StructuralError> {
        let symbols: Vec<&str> = text.split_whitespace().collect();
        let Some((head, body)) = symbols.split_first() else {
            return Ok(None);
        };

        if let Some(terminal) = Terminal::from_name(head) {
            let [lexeme] = body else {
                return Err(StructuralError::malformed_terminal(line, text));
            };
            if terminal == Terminal::Num && !fits_in_word(lexeme) {
                return Err(StructuralError::invalid_number(line, lexeme));
            }
            return Ok(Some(Self::terminal(line, terminal, lexeme)));
        }

        if !is_non_terminal(head) {
            return Err(StructuralError::unknown_symbol(line, head));
        }

        if let Some(unknown) = body
            .iter()
            .find(|symbol| Terminal::from_name(symbol).is_none() && !is_non_terminal(symbol))
        {
            return Err(StructuralError::unknown_symbol(line, unknown));
        }

        match Production::from_symbols(head, body) {
            Some(production) => Ok(Some(Self::reduction(line, production))),
            None => Err(StructuralError::unknown_production(line, &symbols)),
        }
    }

    /// Number of already-built nodes this record consumes from the builder's stack.
    pub fn body_len(&self) -> usize {
        match &self.kind {
            RecordKind::Terminal(_) => 0,
            RecordKind::Reduction(production) => production.body_len(),
        }
    }
}

fn fits_in_word(lexeme: &str) -> bool {
    match lexeme.parse::<i64>() {
        Ok(value) => value >= i64::from(i32::MIN) && value <= i64::from(u32::MAX),
        Err(_) => false,
    }
}

/// Parses a whole trace, one record per non-blank line, keeping input order.
pub fn parse_trace(text: &str) -> Result<Vec<ReductionRecord>, StructuralError> {
    let mut records = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(record) = ReductionRecord::parse(index + 1, line)? {
            records.push(record);
        }
    }

    Ok(records)
}
