//! The equation state machine behind the keypad.
//!
//! Input arrives one key at a time and fills a two-operand equation:
//!
//! ```text
//! Empty -> EnteringOperand1 -> OperatorSet -> EnteringOperand2 -> Evaluated
//!   ^                              ^                 ^               |
//!   |                              |                 +- digit/delete-+
//!   |                              +------ operator (chain) ---------+
//!   +------------------------ clear / error --------------------------+
//! ```
//!
//! Choosing a second operator while an equation is complete evaluates it
//! (again, if "=" was already pressed) and continues from its result:
//! `3 + 4 *` records `3 + 4 = 7.00` and becomes `7.00 *`.

use tracing::{debug, warn};

use super::engine::ArithmeticEngine;
use super::evaluation::{Evaluation, error_display, evaluate_equation};
use crate::history::HistoryStore;

/// Where the machine currently is in the equation cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Empty,
    EnteringOperand1,
    OperatorSet,
    EnteringOperand2,
    Evaluated,
}

/// Text of the four display slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplaySlots {
    pub operand_1: String,
    pub operator: String,
    pub operand_2: String,
    pub result: String,
}

#[derive(Clone, Debug, Default)]
struct Equation {
    operand_1: String,
    operator: String,
    operand_2: String,
}

impl Equation {
    fn is_complete(&self) -> bool {
        !self.operand_1.is_empty() && !self.operator.is_empty() && !self.operand_2.is_empty()
    }

    /// The buffer that digit entry and deletion currently act on.
    fn active_operand(&mut self) -> &mut String {
        if self.operator.is_empty() {
            &mut self.operand_1
        } else {
            &mut self.operand_2
        }
    }
}

/// Keypad calculator writing every successful evaluation to `S`.
///
/// The machine owns its equation exclusively and expects one call at a time
/// from the surrounding event loop.
#[derive(Debug)]
pub struct Calculator<S> {
    engine: ArithmeticEngine,
    history: S,
    equation: Equation,
    evaluated: Option<Evaluation>,
    result: String,
}

impl<S: HistoryStore> Calculator<S> {
    pub fn new(engine: ArithmeticEngine, history: S) -> Self {
        Self {
            engine,
            history,
            equation: Equation::default(),
            evaluated: None,
            result: String::new(),
        }
    }

    /// Append a digit or decimal point to the active operand.
    ///
    /// A second `.` in the same operand is ignored. After "=" the operator is
    /// still set, so typing keeps extending operand_2 of the shown equation.
    pub fn insert_digit_or_point(&mut self, token: &str) {
        let operand = self.equation.active_operand();
        if token.contains('.') && operand.contains('.') {
            debug!("Ignoring second decimal point in '{operand}'");
            return;
        }
        operand.push_str(token);
        self.evaluated = None;
    }

    /// Set the pending operator, chaining when an equation is already complete.
    pub fn insert_operator(&mut self, op: &str) {
        if self.equation.operand_1.is_empty() {
            debug!("Ignoring operator '{op}' without a first operand");
            return;
        }

        if self.equation.operand_2.is_empty() {
            self.equation.operator = op.to_string();
            return;
        }

        self.evaluate();
        // Evaluation failed and already reset the machine.
        let Some(previous) = self.evaluated.take() else {
            return;
        };

        debug!("Chaining from {} with '{op}'", previous.display());
        self.equation = Equation {
            operand_1: previous.display(),
            operator: op.to_string(),
            operand_2: String::new(),
        };
        self.result.clear();
    }

    /// Remove the last character of the active operand.
    ///
    /// The result slot keeps showing the previous result until the next
    /// evaluation.
    pub fn delete_last_character(&mut self) {
        self.evaluated = None;
        self.equation.active_operand().pop();
    }

    /// Forget the equation and every display slot.
    pub fn clear_all(&mut self) {
        self.reset();
    }

    /// Evaluate the pending equation (the "=" key).
    ///
    /// Does nothing unless both operands and the operator are present. Every
    /// successful press is recorded, repeats included. On failure the error
    /// text goes to the result slot and the machine returns to [`Phase::Empty`].
    pub fn evaluate(&mut self) {
        if !self.equation.is_complete() {
            return;
        }

        let Equation {
            operand_1,
            operator,
            operand_2,
        } = &self.equation;

        match evaluate_equation(&self.engine, operand_1, operator, operand_2) {
            Ok(evaluation) => {
                debug!("{} = {}", evaluation.equation, evaluation.display());
                self.result = evaluation.display();
                self.history
                    .insert_record(&evaluation.equation, evaluation.result);
                self.evaluated = Some(evaluation);
            }
            Err(e) => {
                warn!("Evaluation of '{operand_1} {operator} {operand_2}' failed: {e}");
                self.equation = Equation::default();
                self.evaluated = None;
                self.result = error_display(&e);
            }
        }
    }

    pub fn phase(&self) -> Phase {
        let eq = &self.equation;
        if self.evaluated.is_some() {
            Phase::Evaluated
        } else if eq.operand_1.is_empty() {
            Phase::Empty
        } else if eq.operator.is_empty() {
            Phase::EnteringOperand1
        } else if eq.operand_2.is_empty() {
            Phase::OperatorSet
        } else {
            Phase::EnteringOperand2
        }
    }

    /// Current text of every display slot.
    pub fn display(&self) -> DisplaySlots {
        DisplaySlots {
            operand_1: self.equation.operand_1.clone(),
            operator: self.equation.operator.clone(),
            operand_2: self.equation.operand_2.clone(),
            result: self.result.clone(),
        }
    }

    /// The last successful evaluation, while it is still on display.
    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.evaluated.as_ref()
    }

    pub fn history(&self) -> &S {
        &self.history
    }

    pub fn engine(&self) -> &ArithmeticEngine {
        &self.engine
    }

    fn reset(&mut self) {
        self.equation = Equation::default();
        self.evaluated = None;
        self.result.clear();
    }
}
