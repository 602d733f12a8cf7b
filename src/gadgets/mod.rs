//! Reusable gadgets for the credit check
//!
//! - `range_check`: `Num2Bits` and `Num2BitsNeg` bit decompositions
//! - `binsum`: `BinSum` adder over bit arrays
//! - `comparison`: `IsZero`, `LessThan`, `GreaterEqThan`
//! - `gates`: `AND`
//!
//! Every body has the same shape: read inputs, assign outputs (constrained
//! `<==` through `set_signal`, unconstrained `<--` through `assign_hint`),
//! assert constraints, then mark the component finished.

pub mod binsum;
pub mod comparison;
pub mod gates;
pub mod range_check;

pub use comparison::compute_inverse_hint;

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::calculator::{calculate_witness, Witness};
    use crate::circuit::Template;
    use crate::error::WitnessResult;
    use crate::field::FieldElement;

    pub fn fe(v: u64) -> FieldElement {
        FieldElement::from(v)
    }

    /// Run a single-input gadget
    pub fn run(template: Template, name: &str, values: &[u64]) -> WitnessResult<Witness> {
        let values: Vec<FieldElement> = values.iter().copied().map(fe).collect();
        calculate_witness(template, &[(name, &values)])
    }

    /// Weighted sum `Σ bits[i] * 2^i`
    pub fn recompose(bits: &[FieldElement]) -> FieldElement {
        bits.iter()
            .enumerate()
            .map(|(i, bit)| *bit * FieldElement::two_pow(i))
            .sum()
    }

    pub fn assert_boolean(bits: &[FieldElement]) {
        for bit in bits {
            assert!(
                *bit == FieldElement::zero() || *bit == FieldElement::one(),
                "non-boolean bit {}",
                bit
            );
        }
    }
}
