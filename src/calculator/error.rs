//! Errors raised while evaluating an equation.

use thiserror::Error;

/// Everything that can go wrong between pressing "=" and getting a number.
///
/// None of these escape the state machine: `Calculator::evaluate` flattens
/// them into the result display slot and resets the equation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The divisor of a division is exactly zero.
    #[error("cannot divide by zero")]
    DivisionByZero,

    /// An operand buffer is not a valid decimal number.
    #[error("invalid number '{0}'")]
    InvalidOperand(String),

    /// The pending operator is not one of `+ - * / %`.
    #[error("invalid operator")]
    InvalidOperator(String),

    /// The result does not fit in the decimal representation.
    #[error("result out of range")]
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_messages() {
        assert_eq!(CalcError::DivisionByZero.to_string(), "cannot divide by zero");
        assert_eq!(
            CalcError::InvalidOperator("^".to_string()).to_string(),
            "invalid operator"
        );
    }

    #[test]
    fn test_invalid_operand_names_the_input() {
        let err = CalcError::InvalidOperand(".".to_string());
        assert_eq!(err.to_string(), "invalid number '.'");
    }
}
