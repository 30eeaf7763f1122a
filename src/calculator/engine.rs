//! Exact decimal arithmetic for one binary operation at a time.
//!
//! All five operations are pure: they read only their arguments, so an
//! [`ArithmeticEngine`] can be shared between threads. Results are returned
//! at full working precision; rounding to display digits happens in
//! [`super::evaluation`].

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use super::cache::OperationCache;
use super::error::CalcError;

/// Largest precision that can be requested. At this setting results are not
/// rounded at all, so they keep whatever the backend holds: 28 significant
/// digits at least, 29 for some values near `Decimal::MAX`.
pub const MAX_PRECISION: u32 = 28;

/// Cache size used when nothing else is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// One of the five supported binary operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Percent,
}

impl Operator {
    /// All operators, in keypad order.
    pub const ALL: [Operator; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Percent,
    ];

    /// The symbol shown on the keypad and written into history records.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Percent => '%',
        }
    }

    /// Map a keypad symbol back to its operator.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Self::from_symbol(c).ok_or_else(|| CalcError::InvalidOperator(s.to_string()))
            }
            _ => Err(CalcError::InvalidOperator(s.to_string())),
        }
    }
}

/// Rejected working precision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("precision must be between 1 and {MAX_PRECISION} significant digits, got {0}")]
pub struct PrecisionError(pub u32);

/// Number of significant digits kept in every engine result.
///
/// Below [`MAX_PRECISION`] results are rounded half-even to exactly this many
/// digits; at [`MAX_PRECISION`] it is a lower bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precision(u32);

impl Precision {
    pub fn new(digits: u32) -> Result<Self, PrecisionError> {
        if (1..=MAX_PRECISION).contains(&digits) {
            Ok(Self(digits))
        } else {
            Err(PrecisionError(digits))
        }
    }

    pub fn digits(self) -> u32 {
        self.0
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(MAX_PRECISION)
    }
}

/// Stateless evaluator for `a <op> b`.
///
/// The optional cache only memoizes successful results keyed on the exact
/// operands, so enabling it never changes what a call returns.
#[derive(Debug)]
pub struct ArithmeticEngine {
    precision: Precision,
    cache: Option<Mutex<OperationCache>>,
}

impl ArithmeticEngine {
    /// Engine without a result cache.
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            cache: None,
        }
    }

    /// Engine memoizing up to `capacity` results. Zero disables the cache.
    pub fn with_cache(precision: Precision, capacity: usize) -> Self {
        let cache = (capacity > 0).then(|| Mutex::new(OperationCache::new(capacity)));
        Self { precision, cache }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn add(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
        self.apply(Operator::Add, a, b)
    }

    pub fn subtract(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
        self.apply(Operator::Subtract, a, b)
    }

    pub fn multiply(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
        self.apply(Operator::Multiply, a, b)
    }

    /// `a / b`, failing with [`CalcError::DivisionByZero`] when `b` is zero.
    pub fn divide(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
        self.apply(Operator::Divide, a, b)
    }

    /// `b` percent of `a`, i.e. `(a * b) / 100`.
    pub fn percent(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
        self.apply(Operator::Percent, a, b)
    }

    /// Dispatch to the operation named by `op`.
    pub fn apply(&self, op: Operator, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
        if let Some(hit) = self.cached(op, &a, &b) {
            return Ok(hit);
        }

        let value = self.round(compute(op, a, b)?);
        self.remember(op, &a, &b, value);
        Ok(value)
    }

    fn round(&self, value: Decimal) -> Decimal {
        let digits = self.precision.digits();
        if digits >= MAX_PRECISION {
            return value;
        }
        value
            .round_sf_with_strategy(digits, RoundingStrategy::MidpointNearestEven)
            .unwrap_or(value)
    }

    fn cached(&self, op: Operator, a: &Decimal, b: &Decimal) -> Option<Decimal> {
        // A poisoned lock only means a panic elsewhere; skip the cache.
        let mut cache = self.cache.as_ref()?.lock().ok()?;
        cache.get(op, a, b)
    }

    fn remember(&self, op: Operator, a: &Decimal, b: &Decimal, value: Decimal) {
        if let Some(mut cache) = self.cache.as_ref().and_then(|c| c.lock().ok()) {
            cache.insert(op, a, b, value);
        }
    }
}

impl Default for ArithmeticEngine {
    fn default() -> Self {
        Self::with_cache(Precision::default(), DEFAULT_CACHE_CAPACITY)
    }
}

fn compute(op: Operator, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
    match op {
        Operator::Add => a.checked_add(b).ok_or(CalcError::Overflow),
        Operator::Subtract => a.checked_sub(b).ok_or(CalcError::Overflow),
        Operator::Multiply => a.checked_mul(b).ok_or(CalcError::Overflow),
        Operator::Divide => {
            if b.is_zero() {
                return Err(CalcError::DivisionByZero);
            }
            a.checked_div(b).ok_or(CalcError::Overflow)
        }
        Operator::Percent => a
            .checked_mul(b)
            .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
            .ok_or(CalcError::Overflow),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn engine() -> ArithmeticEngine {
        ArithmeticEngine::new(Precision::default())
    }

    #[test]
    fn test_exact_decimal_results() {
        let engine = engine();
        assert_eq!(engine.add(dec!(2.5), dec!(3.5)).unwrap(), dec!(6));
        assert_eq!(engine.multiply(dec!(3.5), dec!(2.5)).unwrap(), dec!(8.75));
        assert_eq!(engine.divide(dec!(6.5), dec!(2.5)).unwrap(), dec!(2.6));
        assert_eq!(engine.add(dec!(0.1), dec!(0.2)).unwrap(), dec!(0.3));
    }

    #[test]
    fn test_zero_identity() {
        let engine = engine();
        for x in [dec!(0), dec!(-7.25), dec!(123456789.987654321), Decimal::MAX] {
            assert_eq!(engine.add(x, Decimal::ZERO).unwrap(), x);
            assert_eq!(engine.subtract(x, Decimal::ZERO).unwrap(), x);
        }
    }

    #[test]
    fn test_division_by_zero() {
        let engine = engine();
        for x in [dec!(0), dec!(1), dec!(-3.5), dec!(0.0)] {
            assert_eq!(engine.divide(x, dec!(0)), Err(CalcError::DivisionByZero));
            assert_eq!(engine.divide(x, dec!(0.00)), Err(CalcError::DivisionByZero));
        }
    }

    #[test]
    fn test_percent() {
        let engine = engine();
        assert_eq!(engine.percent(dec!(100), dec!(50)).unwrap(), dec!(50));
        assert_eq!(engine.percent(dec!(80), dec!(12.5)).unwrap(), dec!(10));
        assert_eq!(engine.percent(dec!(7), dec!(0)).unwrap(), dec!(0));
    }

    #[test]
    fn test_working_precision_of_28_digits() {
        let engine = engine();
        let third = engine.divide(dec!(1), dec!(3)).unwrap();
        assert_eq!(third, dec!(0.3333333333333333333333333333));
    }

    #[test]
    fn test_full_precision_keeps_backend_digits() {
        let engine = engine();
        let max = dec!(79228162514264337593543950335);
        assert_eq!(engine.subtract(max, Decimal::ZERO).unwrap(), max);
        assert_eq!(
            engine.add(dec!(1234567890123456789012345678), dec!(0)).unwrap(),
            dec!(1234567890123456789012345678)
        );
    }

    #[test]
    fn test_reduced_precision_rounds_half_even() {
        let engine = ArithmeticEngine::new(Precision::new(4).unwrap());
        assert_eq!(engine.divide(dec!(2), dec!(3)).unwrap(), dec!(0.6667));
        assert_eq!(engine.add(dec!(1.2345), dec!(0)).unwrap(), dec!(1.234));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let engine = engine();
        assert_eq!(
            engine.multiply(Decimal::MAX, dec!(2)),
            Err(CalcError::Overflow)
        );
    }

    #[test]
    fn test_cache_does_not_change_results() {
        let cached = ArithmeticEngine::with_cache(Precision::default(), 2);
        let plain = engine();
        for _ in 0..3 {
            for op in Operator::ALL {
                for (a, b) in [(dec!(10), dec!(4)), (dec!(2.50), dec!(1)), (dec!(2.5), dec!(1))] {
                    let got = cached.apply(op, a, b).unwrap();
                    let want = plain.apply(op, a, b).unwrap();
                    assert_eq!(got, want);
                    assert_eq!(got.scale(), want.scale());
                }
            }
        }
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!("+".parse::<Operator>().unwrap(), Operator::Add);
        assert_eq!("%".parse::<Operator>().unwrap(), Operator::Percent);
        assert_eq!(Operator::Divide.to_string(), "/");
        assert_eq!(
            "^".parse::<Operator>(),
            Err(CalcError::InvalidOperator("^".to_string()))
        );
        assert!("++".parse::<Operator>().is_err());
        assert!("".parse::<Operator>().is_err());
    }

    #[test]
    fn test_precision_bounds() {
        assert!(Precision::new(0).is_err());
        assert!(Precision::new(29).is_err());
        assert_eq!(Precision::new(12).unwrap().digits(), 12);
        assert_eq!(Precision::default().digits(), MAX_PRECISION);
    }
}
