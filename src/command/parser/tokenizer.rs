use crate::command::parser::error::ParseError;

/// Token represents the items of a value filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Word(String),
    Number(String),
    StringLiteral(String),
    Op(&'static str),
    And,        // &&
    Or,         // ||
    Not,        // !
    LeftParen,  // (
    RightParen, // )
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LeftParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RightParen);
            }
            '"' | '\'' => {
                tokens.push(parse_string_literal(&mut chars)?);
            }
            '0'..='9' => {
                tokens.push(parse_number(&mut chars));
            }
            '-' => {
                chars.next();
                match chars.peek() {
                    Some(d) if d.is_ascii_digit() => {
                        if let Token::Number(n) = parse_number(&mut chars) {
                            tokens.push(Token::Number(format!("-{}", n)));
                        }
                    }
                    _ => return Err(ParseError::InvalidCharacter('-')),
                }
            }
            '&' => {
                chars.next();
                expect_char(&mut chars, '&')?;
                tokens.push(Token::And);
            }
            '|' => {
                chars.next();
                expect_char(&mut chars, '|')?;
                tokens.push(Token::Or);
            }
            '>' | '<' | '=' | '!' => {
                chars.next();
                let followed_by_eq = chars.peek() == Some(&'=');
                if followed_by_eq {
                    chars.next();
                }
                let token = match (c, followed_by_eq) {
                    ('>', false) => Token::Op(">"),
                    ('>', true) => Token::Op(">="),
                    ('<', false) => Token::Op("<"),
                    ('<', true) => Token::Op("<="),
                    ('=', _) => Token::Op("=="),
                    ('!', true) => Token::Op("!="),
                    _ => Token::Not,
                };
                tokens.push(token);
            }
            c if is_word_start(c) => {
                tokens.push(parse_word(&mut chars));
            }
            other => return Err(ParseError::InvalidCharacter(other)),
        }
    }

    Ok(tokens)
}

fn expect_char<I>(chars: &mut std::iter::Peekable<I>, expected: char) -> Result<(), ParseError>
where
    I: Iterator<Item = char>,
{
    match chars.next() {
        Some(c) if c == expected => Ok(()),
        Some(c) => Err(ParseError::InvalidCharacter(c)),
        None => Err(ParseError::UnexpectedEnd),
    }
}

fn parse_string_literal<I>(chars: &mut std::iter::Peekable<I>) -> Result<Token, ParseError>
where
    I: Iterator<Item = char>,
{
    let mut string = String::new();
    let quote = chars.next().unwrap_or('"');

    while let Some(c) = chars.next() {
        match c {
            c if c == quote => return Ok(Token::StringLiteral(string)),
            '\\' => match chars.next() {
                Some('n') => string.push('\n'),
                Some('t') => string.push('\t'),
                Some('r') => string.push('\r'),
                Some(escaped) => string.push(escaped),
                None => break,
            },
            _ => string.push(c),
        }
    }

    Err(ParseError::UnterminatedString)
}

fn parse_number<I>(chars: &mut std::iter::Peekable<I>) -> Token
where
    I: Iterator<Item = char>,
{
    let mut number = String::new();

    while let Some(&c) = chars.peek() {
        let exponent_sign =
            (c == '-' || c == '+') && matches!(number.chars().last(), Some('e') | Some('E'));
        if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || exponent_sign {
            number.push(c);
            chars.next();
        } else {
            break;
        }
    }

    Token::Number(number)
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '*'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '*' || c == '-'
}

fn parse_word<I>(chars: &mut std::iter::Peekable<I>) -> Token
where
    I: Iterator<Item = char>,
{
    let mut word = String::new();

    while let Some(&c) = chars.peek() {
        if is_word_char(c) {
            word.push(c);
            chars.next();
        } else {
            break;
        }
    }

    Token::Word(word)
}
