//! Threshold expression parsing and evaluation.
//!
//! Expressions are evaluated after metric names have been replaced by their
//! values, so only literals remain. The grammar is closed:
//!
//! ```text
//! or      := and ( "||" and )*
//! and     := not ( "&&" not )*
//! not     := "!" not | cmp
//! cmp     := sum ( ("<" | "<=" | ">" | ">=" | "==" | "!=" | "===" | "!==") sum )?
//! sum     := product ( ("+" | "-") product )*
//! product := unary ( ("*" | "/" | "%") unary )*
//! unary   := "-" unary | atom
//! atom    := number | "true" | "false" | "(" or ")"
//! ```
//!
//! ```
//! use connect_wallboard::data::expr::evaluate;
//!
//! assert_eq!(evaluate("7 < 10 && 7 >= 5"), Ok(true));
//! assert_eq!(evaluate(""), Ok(false));
//! assert!(evaluate("CONTACTS_IN_QUEUE < 5").is_err());
//! ```

use std::fmt;

use crate::error::ExpressionError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Bool(bool),
    LParen,
    RParen,
    Not,
    And,
    Or,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Cmp(CmpOp),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Bool(b) => write!(f, "{}", b),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Not => f.write_str("'!'"),
            Token::And => f.write_str("'&&'"),
            Token::Or => f.write_str("'||'"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Percent => f.write_str("'%'"),
            Token::Cmp(op) => write!(f, "'{}'", op.symbol()),
        }
    }
}

impl CmpOp {
    fn symbol(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        }
    }

    fn apply(self, lhs: Value, rhs: Value) -> Result<bool, ExpressionError> {
        match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(match self {
                CmpOp::Lt => a < b,
                CmpOp::Le => a <= b,
                CmpOp::Gt => a > b,
                CmpOp::Ge => a >= b,
                CmpOp::Eq => a == b,
                CmpOp::Ne => a != b,
            }),
            (Value::Bool(a), Value::Bool(b)) if self == CmpOp::Eq => Ok(a == b),
            (Value::Bool(a), Value::Bool(b)) if self == CmpOp::Ne => Ok(a != b),
            (a, b) => Err(ExpressionError::TypeMismatch(format!(
                "cannot compare {} {} {}",
                a.kind(),
                self.symbol(),
                b.kind()
            ))),
        }
    }
}

/// A value produced while evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value {
    Number(f64),
    Bool(bool),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
        }
    }

    fn number(self) -> Result<f64, ExpressionError> {
        match self {
            Value::Number(n) => Ok(n),
            Value::Bool(_) => Err(ExpressionError::TypeMismatch(
                "expected a number, found a boolean".to_string(),
            )),
        }
    }

    fn boolean(self) -> Result<bool, ExpressionError> {
        match self {
            Value::Bool(b) => Ok(b),
            Value::Number(_) => Err(ExpressionError::TypeMismatch(
                "expected a boolean, found a number".to_string(),
            )),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExpressionError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    // Longest operators first so "<=" never lexes as "<" "=".
    const OPERATORS: &[(&str, Token)] = &[
        ("===", Token::Cmp(CmpOp::Eq)),
        ("!==", Token::Cmp(CmpOp::Ne)),
        ("==", Token::Cmp(CmpOp::Eq)),
        ("!=", Token::Cmp(CmpOp::Ne)),
        ("<=", Token::Cmp(CmpOp::Le)),
        (">=", Token::Cmp(CmpOp::Ge)),
        ("&&", Token::And),
        ("||", Token::Or),
        ("<", Token::Cmp(CmpOp::Lt)),
        (">", Token::Cmp(CmpOp::Gt)),
        ("!", Token::Not),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("+", Token::Plus),
        ("-", Token::Minus),
        ("*", Token::Star),
        ("/", Token::Slash),
        ("%", Token::Percent),
    ];

    'outer: while i < bytes.len() {
        let c = bytes[i];

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == b'.' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                i += 1;
            }
            // Exponent, as produced for very large or small metric values.
            if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                let mut j = i + 1;
                if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                    j += 1;
                }
                if j < bytes.len() && bytes[j].is_ascii_digit() {
                    i = j;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let text = &input[start..i];
            let n: f64 = text
                .parse()
                .map_err(|_| ExpressionError::InvalidNumber(text.to_string()))?;
            tokens.push(Token::Number(n));
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            match &input[start..i] {
                "true" => tokens.push(Token::Bool(true)),
                "false" => tokens.push(Token::Bool(false)),
                // Non-finite values can appear after substitution.
                "NaN" => tokens.push(Token::Number(f64::NAN)),
                "inf" | "Infinity" => tokens.push(Token::Number(f64::INFINITY)),
                other => return Err(ExpressionError::UnknownIdentifier(other.to_string())),
            }
            continue;
        }

        for (symbol, token) in OPERATORS {
            if input[i..].starts_with(symbol) {
                tokens.push(token.clone());
                i += symbol.len();
                continue 'outer;
            }
        }

        let ch = input[i..].chars().next().unwrap_or('?');
        return Err(ExpressionError::UnexpectedChar { ch, offset: i });
    }

    Ok(tokens)
}

/// Deepest nesting of parentheses, `!` and unary `-` the parser accepts.
pub const MAX_DEPTH: usize = 128;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Run `f` one nesting level deeper, failing past [`MAX_DEPTH`].
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ExpressionError>,
    ) -> Result<T, ExpressionError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExpressionError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Value, ExpressionError> {
        let mut lhs = self.and()?;
        while self.eat(&Token::Or) {
            let rhs = self.and()?;
            lhs = Value::Bool(lhs.boolean()? || rhs.boolean()?);
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Value, ExpressionError> {
        let mut lhs = self.not()?;
        while self.eat(&Token::And) {
            let rhs = self.not()?;
            lhs = Value::Bool(lhs.boolean()? && rhs.boolean()?);
        }
        Ok(lhs)
    }

    fn not(&mut self) -> Result<Value, ExpressionError> {
        if self.eat(&Token::Not) {
            let inner = self.nested(Self::not)?;
            return Ok(Value::Bool(!inner.boolean()?));
        }
        self.cmp()
    }

    fn cmp(&mut self) -> Result<Value, ExpressionError> {
        let lhs = self.sum()?;
        if let Some(Token::Cmp(op)) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.sum()?;
            return Ok(Value::Bool(op.apply(lhs, rhs)?));
        }
        Ok(lhs)
    }

    fn sum(&mut self) -> Result<Value, ExpressionError> {
        let mut lhs = self.product()?;
        loop {
            if self.eat(&Token::Plus) {
                lhs = Value::Number(lhs.number()? + self.product()?.number()?);
            } else if self.eat(&Token::Minus) {
                lhs = Value::Number(lhs.number()? - self.product()?.number()?);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn product(&mut self) -> Result<Value, ExpressionError> {
        let mut lhs = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                lhs = Value::Number(lhs.number()? * self.unary()?.number()?);
            } else if self.eat(&Token::Slash) {
                lhs = Value::Number(lhs.number()? / self.unary()?.number()?);
            } else if self.eat(&Token::Percent) {
                lhs = Value::Number(lhs.number()? % self.unary()?.number()?);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn unary(&mut self) -> Result<Value, ExpressionError> {
        if self.eat(&Token::Minus) {
            return Ok(Value::Number(-self.nested(Self::unary)?.number()?));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Value, ExpressionError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Value::Number(n)),
            Some(Token::Bool(b)) => Ok(Value::Bool(b)),
            Some(Token::LParen) => {
                let inner = self.nested(Self::or)?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(other) => Err(ExpressionError::UnexpectedToken {
                        found: other.to_string(),
                        expected: "')'".to_string(),
                    }),
                    None => Err(ExpressionError::UnexpectedEnd),
                }
            }
            Some(other) => Err(ExpressionError::UnexpectedToken {
                found: other.to_string(),
                expected: "a number, boolean or '('".to_string(),
            }),
            None => Err(ExpressionError::UnexpectedEnd),
        }
    }
}

/// Evaluate a substituted threshold expression.
///
/// An empty (or whitespace-only) expression is `false`. The result must be
/// a boolean; an expression that reduces to a bare number is an error.
pub fn evaluate(input: &str) -> Result<bool, ExpressionError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Ok(false);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.or()?;

    if let Some(extra) = parser.next() {
        return Err(ExpressionError::UnexpectedToken {
            found: extra.to_string(),
            expected: "end of expression".to_string(),
        });
    }

    value.boolean()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_false() {
        assert_eq!(evaluate(""), Ok(false));
        assert_eq!(evaluate("   "), Ok(false));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(evaluate("7<5"), Ok(false));
        assert_eq!(evaluate("7<10"), Ok(true));
        assert_eq!(evaluate("7 <= 7"), Ok(true));
        assert_eq!(evaluate("7>=10"), Ok(false));
        assert_eq!(evaluate("7 > 6.5"), Ok(true));
        assert_eq!(evaluate("3 == 3"), Ok(true));
        assert_eq!(evaluate("3 === 3"), Ok(true));
        assert_eq!(evaluate("3 != 3"), Ok(false));
        assert_eq!(evaluate("3 !== 4"), Ok(true));
        assert_eq!(evaluate("(1 < 2) == true"), Ok(true));
    }

    #[test]
    fn test_boolean_operators_and_precedence() {
        assert_eq!(evaluate("1 < 2 && 2 < 3"), Ok(true));
        assert_eq!(evaluate("1 > 2 || 2 < 3"), Ok(true));
        // && binds tighter than ||
        assert_eq!(evaluate("true || false && false"), Ok(true));
        assert_eq!(evaluate("(true || false) && false"), Ok(false));
        assert_eq!(evaluate("!(1 > 2)"), Ok(true));
        assert_eq!(evaluate("!!true"), Ok(true));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(evaluate("2 + 3 * 4 == 14"), Ok(true));
        assert_eq!(evaluate("(2 + 3) * 4 == 20"), Ok(true));
        assert_eq!(evaluate("10 / 4 == 2.5"), Ok(true));
        assert_eq!(evaluate("7 % 4 == 3"), Ok(true));
        assert_eq!(evaluate("-3 < 0"), Ok(true));
        assert_eq!(evaluate("5 - -3 == 8"), Ok(true));
    }

    #[test]
    fn test_exponent_and_fraction_literals() {
        assert_eq!(evaluate("1e3 == 1000"), Ok(true));
        assert_eq!(evaluate("2.5e-1 == 0.25"), Ok(true));
        assert_eq!(evaluate(".5 < 1"), Ok(true));
    }

    #[test]
    fn test_unsubstituted_identifier_is_error() {
        assert_eq!(
            evaluate("CONTACTS_IN_QUEUE < 5"),
            Err(ExpressionError::UnknownIdentifier("CONTACTS_IN_QUEUE".to_string()))
        );
    }

    #[test]
    fn test_malformed_expressions() {
        assert_eq!(evaluate("7 <"), Err(ExpressionError::UnexpectedEnd));
        assert!(matches!(evaluate("(1 < 2"), Err(ExpressionError::UnexpectedEnd)));
        assert!(matches!(
            evaluate("1 < 2)"),
            Err(ExpressionError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            evaluate("1 = 2"),
            Err(ExpressionError::UnexpectedChar { ch: '=', .. })
        ));
        assert!(matches!(evaluate("1..2 > 0"), Err(ExpressionError::InvalidNumber(_))));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let parens = format!("{}1 < 2{}", "(".repeat(3_000), ")".repeat(3_000));
        assert_eq!(evaluate(&parens), Err(ExpressionError::TooDeep(MAX_DEPTH)));

        let nots = format!("{}true", "!".repeat(3_000));
        assert_eq!(evaluate(&nots), Err(ExpressionError::TooDeep(MAX_DEPTH)));

        let negations = format!("{}1 < 0", "-".repeat(3_000));
        assert_eq!(evaluate(&negations), Err(ExpressionError::TooDeep(MAX_DEPTH)));

        // Right at the limit still evaluates.
        let at_limit = format!("{}1 < 2{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(evaluate(&at_limit), Ok(true));
    }

    #[test]
    fn test_non_boolean_result_is_error() {
        assert!(matches!(evaluate("7"), Err(ExpressionError::TypeMismatch(_))));
        assert!(matches!(evaluate("true < 1"), Err(ExpressionError::TypeMismatch(_))));
        assert!(matches!(evaluate("1 && true"), Err(ExpressionError::TypeMismatch(_))));
    }

    #[test]
    fn test_nan_never_satisfies_ordering() {
        assert_eq!(evaluate("NaN < 5"), Ok(false));
        assert_eq!(evaluate("NaN >= 5"), Ok(false));
        assert_eq!(evaluate("inf > 5"), Ok(true));
    }

    #[test]
    fn test_rejects_code_injection() {
        assert!(evaluate("process.exit(1)").is_err());
        assert!(evaluate("1 < 2; alert(1)").is_err());
    }
}
