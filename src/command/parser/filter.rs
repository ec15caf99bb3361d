use crate::command::parser::error::ParseError;
use crate::command::parser::tokenizer::{Token, tokenize};
use crate::command::types::{CompareOp, Expr, Literal};

/// Deepest run of nested `(` and `!` a filter may use.
pub const MAX_NESTING: usize = 256;

/// Parses a value filter such as `test.go.b > 6 && test.go.c < 9`.
///
/// Grammar, loosest binding first:
///   or      := and ( ('||' | OR) and )*
///   and     := unary ( ('&&' | AND) unary )*
///   unary   := ('!' | NOT) unary | '(' or ')' | compare
///   compare := path op literal | literal op path
pub fn parse_filter(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::EmptyExpression);
    }

    let mut parser = FilterParser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(Token::RightParen) => Err(ParseError::UnbalancedParentheses),
        Some(other) => Err(ParseError::UnexpectedToken(describe(other))),
    }
}

struct FilterParser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl FilterParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat_keyword(&mut self, token: &Token, keyword: &str) -> bool {
        let matched = match self.peek() {
            Some(t) if t == token => true,
            Some(Token::Word(w)) => w.eq_ignore_ascii_case(keyword),
            _ => false,
        };
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat_keyword(&Token::Or, "or") {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while self.eat_keyword(&Token::And, "and") {
            let right = self.parse_unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ParseError::NestingTooDeep(MAX_NESTING));
        }
        Ok(())
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat_keyword(&Token::Not, "not") {
            self.descend()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }

        if self.peek() == Some(&Token::LeftParen) {
            self.pos += 1;
            self.descend()?;
            let inner = self.parse_or()?;
            self.depth -= 1;
            return match self.next() {
                Some(Token::RightParen) => Ok(inner),
                None => Err(ParseError::UnbalancedParentheses),
                Some(other) => Err(ParseError::UnexpectedToken(describe(&other))),
            };
        }

        self.parse_compare()
    }

    fn parse_compare(&mut self) -> Result<Expr, ParseError> {
        let left = self.next().ok_or(ParseError::UnexpectedEnd)?;
        let op = match self.next() {
            Some(Token::Op(op)) => compare_op(op)?,
            Some(other) => return Err(ParseError::UnexpectedToken(describe(&other))),
            None => return Err(ParseError::UnexpectedEnd),
        };
        let right = self.next().ok_or(ParseError::UnexpectedEnd)?;

        match (operand(left)?, operand(right)?) {
            (Operand::Path(path), Operand::Literal(value)) => Ok(Expr::Compare { path, op, value }),
            (Operand::Literal(value), Operand::Path(path)) => Ok(Expr::Compare {
                path,
                op: op.flipped(),
                value,
            }),
            (Operand::Path(_), Operand::Path(p)) => Err(ParseError::UnexpectedToken(p)),
            (Operand::Literal(_), Operand::Literal(_)) => Err(ParseError::MissingPath),
        }
    }
}

enum Operand {
    Path(String),
    Literal(Literal),
}

fn operand(token: Token) -> Result<Operand, ParseError> {
    match token {
        Token::Word(w) if w.eq_ignore_ascii_case("true") => Ok(Operand::Literal(Literal::Boolean(true))),
        Token::Word(w) if w.eq_ignore_ascii_case("false") => {
            Ok(Operand::Literal(Literal::Boolean(false)))
        }
        Token::Word(w) if is_keyword(&w) => Err(ParseError::UnexpectedToken(w)),
        Token::Word(w) => Ok(Operand::Path(w)),
        Token::Number(n) => parse_number_literal(&n).map(Operand::Literal),
        Token::StringLiteral(s) => Ok(Operand::Literal(Literal::String(s))),
        Token::LeftParen | Token::RightParen => Err(ParseError::UnbalancedParentheses),
        other => Err(ParseError::UnexpectedToken(describe(&other))),
    }
}

fn parse_number_literal(raw: &str) -> Result<Literal, ParseError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Literal::Integer(i));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Literal::Float)
        .ok_or_else(|| ParseError::InvalidNumber(raw.to_string()))
}

fn compare_op(op: &str) -> Result<CompareOp, ParseError> {
    match op {
        "==" => Ok(CompareOp::Eq),
        "!=" => Ok(CompareOp::Neq),
        ">" => Ok(CompareOp::Gt),
        ">=" => Ok(CompareOp::Gte),
        "<" => Ok(CompareOp::Lt),
        "<=" => Ok(CompareOp::Lte),
        other => Err(ParseError::UnexpectedToken(other.to_string())),
    }
}

fn is_keyword(word: &str) -> bool {
    ["and", "or", "not"]
        .iter()
        .any(|k| word.eq_ignore_ascii_case(k))
}

fn describe(token: &Token) -> String {
    match token {
        Token::Word(w) => w.clone(),
        Token::Number(n) => n.clone(),
        Token::StringLiteral(s) => format!("\"{}\"", s),
        Token::Op(op) => op.to_string(),
        Token::And => "&&".to_string(),
        Token::Or => "||".to_string(),
        Token::Not => "!".to_string(),
        Token::LeftParen => "(".to_string(),
        Token::RightParen => ")".to_string(),
    }
}
