#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Nothing but whitespace was given
    EmptyExpression,

    /// Input ended while more tokens were required
    UnexpectedEnd,

    /// Unexpected token found while parsing
    UnexpectedToken(String),

    /// A '(' without its ')' or a stray ')'
    UnbalancedParentheses,

    /// A comparison without a path on either side
    MissingPath,

    /// Numeric literal that fits neither i64 nor f64
    InvalidNumber(String),

    /// Quoted literal without a closing quote
    UnterminatedString,

    /// Invalid character
    InvalidCharacter(char),

    /// Parentheses or negations nested past the allowed depth
    NestingTooDeep(usize),

    /// Referenced path is not part of the selected series
    UnknownPath(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyExpression => write!(f, "Filter expression is empty"),
            ParseError::UnexpectedEnd => write!(f, "Unexpected end of expression"),
            ParseError::UnexpectedToken(tok) => write!(f, "Unexpected token: {}", tok),
            ParseError::UnbalancedParentheses => write!(f, "Unbalanced parentheses"),
            ParseError::MissingPath => {
                write!(f, "Comparison needs a series path on one side")
            }
            ParseError::InvalidNumber(n) => write!(f, "Invalid number: '{}'", n),
            ParseError::UnterminatedString => write!(f, "Unterminated string literal"),
            ParseError::InvalidCharacter(c) => write!(f, "Invalid character: '{}'", c),
            ParseError::NestingTooDeep(max) => {
                write!(f, "Expression nests deeper than {} levels", max)
            }
            ParseError::UnknownPath(path) => {
                write!(f, "Path '{}' is not part of the query selection", path)
            }
        }
    }
}

impl std::error::Error for ParseError {}
