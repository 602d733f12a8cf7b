//! Error types for witness computation
//!
//! Every variant is fatal: a witness that failed half-way has no meaning for
//! the proving backend, so errors propagate straight up and abort the run.

use thiserror::Error;

use crate::field::FieldElement;

/// Error types for witness computation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WitnessError {
    /// An asserted equality did not hold
    #[error("Constraint violated in {component} ({locator}): {lhs} != {rhs}")]
    ConstraintViolation {
        component: String,
        locator: &'static str,
        lhs: FieldElement,
        rhs: FieldElement,
    },

    /// Field division with a zero divisor
    #[error("Division by zero")]
    DivisionByZero,

    /// A signal was written twice
    #[error("Signal {signal} assigned more than once")]
    DoubleAssignment { signal: String },

    /// A field element used as a native integer does not fit
    #[error("Field element {value} does not fit in a native integer")]
    IntegerOverflowOnConversion { value: FieldElement },

    /// A signal was read before it was written
    #[error("Signal {signal} read before assignment")]
    UnresolvedSignal { signal: String },

    /// An output of a sub-component was read before the sub-component finished
    #[error("Component {component} has not finished evaluating")]
    UnfinishedComponent { component: String },

    #[error("Component {component} has no signal named {signal}")]
    UnknownSignal { component: String, signal: String },

    #[error("Component {component} has no sub-component named {name}")]
    UnknownComponent { component: String, name: String },

    #[error("Index {index} out of bounds for signal {signal} of length {len}")]
    IndexOutOfBounds {
        signal: String,
        index: usize,
        len: usize,
    },

    /// An array signal was used where a single slot is required
    #[error("Signal {signal} is an array; an index is required")]
    ScalarExpected { signal: String },

    #[error("Signal {signal} expects {expected} values, got {actual}")]
    InputLength {
        signal: String,
        expected: usize,
        actual: usize,
    },

    /// Value does not fit the comparator's bit width
    #[error("{field} value exceeds the {bits}-bit comparator range")]
    ValueOutOfRange { field: String, bits: usize },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid circuit configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Result type for witness operations
pub type WitnessResult<T> = Result<T, WitnessError>;

/// Input validation utilities
pub mod validation {
    use num_bigint::BigUint;

    use super::*;

    /// Largest comparator operand accepted by the credit check.
    ///
    /// `LessThan(64)` reads its result from bit 63 of `a + 2^64 - b`, which is
    /// only the borrow when `|a - b| < 2^63`.
    pub const MAX_64BIT: u64 = (1u64 << 63) - 1;

    /// Validate that a field element is a comparator-safe operand
    pub fn validate_range(value: FieldElement, field: &str) -> WitnessResult<()> {
        match value.to_u64() {
            Ok(v) if v <= MAX_64BIT => Ok(()),
            _ => Err(WitnessError::ValueOutOfRange {
                field: field.to_string(),
                bits: 63,
            }),
        }
    }

    /// Validate that `ops` operands of `n` bits can be summed without wrapping
    pub fn validate_bit_width(n: usize, ops: usize) -> WitnessResult<()> {
        if ops == 0 {
            return Err(WitnessError::InvalidConfiguration {
                message: "BinSum needs at least one operand".to_string(),
            });
        }
        let max_sum = ((BigUint::from(1u8) << n) - 1u8) * ops;
        if max_sum >= FieldElement::modulus() {
            return Err(WitnessError::InvalidConfiguration {
                message: format!("{} operands of {} bits overflow the field", ops, n),
            });
        }
        Ok(())
    }

    /// Validate a comparator bit width
    pub fn validate_comparator_bits(n: usize) -> WitnessResult<()> {
        if n == 0 {
            return Err(WitnessError::InvalidConfiguration {
                message: "comparator width must be at least 1 bit".to_string(),
            });
        }
        validate_bit_width(n, 2)
    }

    /// Validate the number of orders fed into the credit check
    pub fn validate_order_count(actual: usize, max: usize) -> WitnessResult<()> {
        if actual == 0 {
            return Err(WitnessError::InvalidInput {
                message: "at least one order is required".to_string(),
            });
        }
        if actual > max {
            return Err(WitnessError::InputLength {
                signal: "orderAmounts".to_string(),
                expected: max,
                actual,
            });
        }
        Ok(())
    }
}
