//! Amount expression evaluator.
//!
//! An amount is either a plain non-negative decimal literal (`20`, `7.50`) or
//! exactly two literals joined by one operator (`30/4`, `12.5+3`). Nothing
//! else is accepted: no signs, no parentheses, no chained operators. The
//! operands and the operator are parsed explicitly and combined with checked
//! decimal arithmetic, user text is never handed to a general evaluator.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            _ => None,
        }
    }

    fn apply(self, lhs: Decimal, rhs: Decimal) -> ResultEngine<Decimal> {
        let result = match self {
            Self::Add => lhs.checked_add(rhs),
            Self::Sub => lhs.checked_sub(rhs),
            Self::Mul => lhs.checked_mul(rhs),
            Self::Div => {
                if rhs.is_zero() {
                    return Err(EngineError::InvalidAmount("division by zero".to_string()));
                }
                lhs.checked_div(rhs)
            }
        };
        result.ok_or_else(|| EngineError::InvalidAmount("amount out of range".to_string()))
    }
}

/// Evaluates an amount expression into a strictly positive decimal.
///
/// ```rust
/// use engine::evaluate;
/// use rust_decimal::Decimal;
///
/// assert_eq!(evaluate("3+4").unwrap(), Decimal::from(7));
/// assert!(evaluate("10/0").is_err());
/// ```
pub fn evaluate(expr: &str) -> ResultEngine<Decimal> {
    let trimmed = expr.trim();

    // Operand literals never contain an operator, so the first operator
    // character past the first byte splits the expression.
    let split = trimmed
        .char_indices()
        .skip(1)
        .find_map(|(idx, c)| Operator::from_char(c).map(|op| (idx, op)));

    let value = match split {
        None => parse_operand(trimmed, expr)?,
        Some((idx, op)) => {
            let lhs = parse_operand(&trimmed[..idx], expr)?;
            let rhs = parse_operand(&trimmed[idx + 1..], expr)?;
            op.apply(lhs, rhs)?
        }
    };

    if value <= Decimal::ZERO {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be positive, got {value}"
        )));
    }

    Ok(value)
}

/// Parses a `\d+(\.\d+)?` literal.
fn parse_operand(raw: &str, expr: &str) -> ResultEngine<Decimal> {
    let malformed = || EngineError::InvalidAmount(format!("malformed amount: {}", expr.trim()));

    let operand = raw.trim();
    let (int_part, frac_part) = match operand.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (operand, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || frac_part.is_some_and(|frac| !all_digits(frac)) {
        return Err(malformed());
    }

    Decimal::from_str(operand)
        .map_err(|_| EngineError::InvalidAmount(format!("amount out of range: {operand}")))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn plain_numbers() {
        assert_eq!(evaluate("5").unwrap(), dec!(5.0));
        assert_eq!(evaluate("20.50").unwrap(), dec!(20.5));
        assert_eq!(evaluate("  12 ").unwrap(), dec!(12));
    }

    #[test]
    fn each_operator() {
        assert_eq!(evaluate("3+4").unwrap(), dec!(7.0));
        assert_eq!(evaluate("10-4.5").unwrap(), dec!(5.5));
        assert_eq!(evaluate("2.5*4").unwrap(), dec!(10));
        assert_eq!(evaluate("30/4").unwrap(), dec!(7.5));
        assert_eq!(evaluate("3 + 4").unwrap(), dec!(7));
    }

    #[test]
    fn division_by_zero_is_invalid() {
        assert_eq!(
            evaluate("10/0").unwrap_err(),
            EngineError::InvalidAmount("division by zero".to_string())
        );
        assert!(evaluate("10/0.0").is_err());
    }

    #[test]
    fn leading_sign_is_invalid() {
        assert_eq!(
            evaluate("-3").unwrap_err(),
            EngineError::InvalidAmount("malformed amount: -3".to_string())
        );
        assert!(evaluate("+3").is_err());
    }

    #[test]
    fn non_positive_results_are_invalid() {
        assert!(matches!(
            evaluate("0"),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(evaluate("4-4").is_err());
        assert!(evaluate("3-5").is_err());
        assert!(evaluate("0*7").is_err());
    }

    #[test]
    fn only_two_operands_are_accepted() {
        assert!(evaluate("1+2+3").is_err());
        assert!(evaluate("2*-3").is_err());
        assert!(evaluate("(1+2)").is_err());
        assert!(evaluate("1+").is_err());
        assert!(evaluate("*5").is_err());
    }

    #[test]
    fn code_like_input_is_rejected() {
        assert!(evaluate("__import__('os')").is_err());
        assert!(evaluate("2**10").is_err());
        assert!(evaluate("1e3").is_err());
        assert!(evaluate("abc").is_err());
        assert!(evaluate("").is_err());
        assert!(evaluate("1.").is_err());
        assert!(evaluate(".5").is_err());
    }

    #[test]
    fn overflow_is_invalid() {
        assert!(evaluate("99999999999999999999999999999").is_err());
        assert!(evaluate("79228162514264337593543950335*2").is_err());
    }
}
