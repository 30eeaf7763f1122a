//! Turning three text buffers into a finished, displayable result.
//!
//! Wraps the [`ArithmeticEngine`] with operand parsing, operator lookup and
//! quantization to [`RESULT_SCALE`] fractional digits.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use super::engine::{ArithmeticEngine, Operator};
use super::error::CalcError;

/// Fractional digits kept in displayed and recorded results.
pub const RESULT_SCALE: u32 = 2;

/// A successfully evaluated equation.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Human readable equation, e.g. `3 + 4`.
    pub equation: String,
    /// Full precision engine result.
    pub value: Decimal,
    /// `value` quantized to [`RESULT_SCALE`] digits.
    pub result: Decimal,
}

impl Evaluation {
    /// Text for the result display slot and the history record.
    pub fn display(&self) -> String {
        self.result.to_string()
    }
}

/// Evaluate `operand_1 operator operand_2` as typed on the keypad.
pub fn evaluate_equation(
    engine: &ArithmeticEngine,
    operand_1: &str,
    operator: &str,
    operand_2: &str,
) -> Result<Evaluation, CalcError> {
    let a = parse_operand(operand_1)?;
    let b = parse_operand(operand_2)?;
    let op = Operator::from_str(operator)?;

    let value = engine.apply(op, a, b)?;

    Ok(Evaluation {
        equation: format!("{a} {op} {b}"),
        value,
        result: quantize(value)?,
    })
}

/// Parse an operand buffer. Buffers such as `.` fail here.
pub fn parse_operand(buffer: &str) -> Result<Decimal, CalcError> {
    Decimal::from_str(buffer).map_err(|_| CalcError::InvalidOperand(buffer.to_string()))
}

/// Round half-even to [`RESULT_SCALE`] digits and pad to exactly that scale.
///
/// Values whose integer part leaves no room for the fractional digits fail
/// with [`CalcError::Overflow`].
pub fn quantize(value: Decimal) -> Result<Decimal, CalcError> {
    let mut quantized =
        value.round_dp_with_strategy(RESULT_SCALE, RoundingStrategy::MidpointNearestEven);
    if quantized.is_zero() {
        // -0.001 would otherwise render as "-0.00"
        quantized = Decimal::ZERO;
    }
    quantized.rescale(RESULT_SCALE);
    if quantized.scale() != RESULT_SCALE {
        return Err(CalcError::Overflow);
    }
    Ok(quantized)
}

/// Text shown in the result slot when evaluation fails.
pub fn error_display(err: &CalcError) -> String {
    format!("Error: {err}")
}
