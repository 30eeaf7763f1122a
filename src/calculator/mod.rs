//! Calculator core.
//!
//! This module provides functionality to:
//! - Evaluate one binary operation with exact decimal arithmetic
//! - Memoize results for repeated operand pairs
//! - Drive the two-operand equation from keypad input

mod cache;
mod engine;
mod error;
mod evaluation;
mod state;

pub use cache::OperationCache;
pub use engine::{
    ArithmeticEngine, DEFAULT_CACHE_CAPACITY, MAX_PRECISION, Operator, Precision, PrecisionError,
};
pub use error::CalcError;
pub use evaluation::{
    Evaluation, RESULT_SCALE, error_display, evaluate_equation, parse_operand, quantize,
};
pub use state::{Calculator, DisplaySlots, Phase};
