//! Comparison Gadgets
//!
//! - `IsZero`: `out = 1` iff `in == 0`, via the inverse trick
//! - `LessThan(n)`: `out = 1` iff `in[0] < in[1]`
//! - `GreaterEqThan(n)`: `out = 1 - LessThan(n)`
//!
//! # LessThan
//! `in[0] + (2^n - in[1])` is computed in binary with `BinSum(n, 2)` and the
//! result is read from bit `n-1` of the sum. That bit is the borrow only
//! while `|in[0] - in[1]| < 2^(n-1)`; callers keep operands below `2^(n-1)`
//! (see [`crate::error::validation::MAX_64BIT`]).

use crate::calculator::WitnessCalculator;
use crate::circuit::ComponentId;
use crate::error::WitnessResult;
use crate::field::FieldElement;

pub(crate) const IS_ZERO: &str = "comparators::is_zero:31";

/// Witness hint for `IsZero.inv`: `1/in`, or `0` when `in` is zero
pub fn compute_inverse_hint(input: FieldElement) -> FieldElement {
    match input.inverse() {
        Some(inv) => inv,
        None => FieldElement::zero(),
    }
}

/// `IsZero`
pub(crate) fn is_zero(ctx: &mut WitnessCalculator, component: ComponentId) -> WitnessResult<()> {
    let input = ctx.read(component, component, "in")?;

    let inv_slot = ctx.signal(component, "inv")?.slot()?;
    ctx.assign_hint(component, inv_slot, compute_inverse_hint(input))?;
    let inv = ctx.get_signal(component, inv_slot)?;

    let out = FieldElement::one() - input * inv;
    ctx.write_to(component, component, "out", out)?;

    ctx.check_constraint(component, input * out, FieldElement::zero(), IS_ZERO)?;

    ctx.finished(component);
    Ok(())
}

/// `LessThan(n)`
pub(crate) fn less_than(
    ctx: &mut WitnessCalculator,
    component: ComponentId,
    n: usize,
) -> WitnessResult<()> {
    let input = ctx.signal(component, "in")?;
    let a = ctx.get_signal(component, input.at(0)?)?;
    let b = ctx.get_signal(component, input.at(1)?)?;

    let num2bits0 = ctx.child(component, "num2Bits0")?;
    let num2bits1 = ctx.child(component, "num2Bits1")?;
    let adder = ctx.child(component, "adder")?;

    ctx.write_to(component, num2bits0, "in", a)?;
    ctx.write_to(component, num2bits1, "in", b)?;

    let bits0 = ctx.signal(num2bits0, "out")?;
    let bits1 = ctx.signal(num2bits1, "out")?;
    let adder_in = ctx.signal(adder, "in")?;
    for i in 0..n {
        let bit = ctx.get_signal(component, bits0.at(i)?)?;
        ctx.set_signal(component, adder_in.at2(0, i)?, bit)?;
    }
    for i in 0..n {
        let bit = ctx.get_signal(component, bits1.at(i)?)?;
        ctx.set_signal(component, adder_in.at2(1, i)?, bit)?;
    }

    let sum = ctx.signal(adder, "out")?;
    let borrow = ctx.get_signal(component, sum.at(n - 1)?)?;
    ctx.write_to(component, component, "out", borrow)?;

    ctx.finished(component);
    Ok(())
}

/// `GreaterEqThan(n)`
pub(crate) fn greater_eq_than(
    ctx: &mut WitnessCalculator,
    component: ComponentId,
    _n: usize,
) -> WitnessResult<()> {
    let input = ctx.signal(component, "in")?;
    let a = ctx.get_signal(component, input.at(0)?)?;
    let b = ctx.get_signal(component, input.at(1)?)?;

    let lt = ctx.child(component, "lt")?;
    let lt_in = ctx.signal(lt, "in")?;
    ctx.set_signal(component, lt_in.at(0)?, a)?;
    ctx.set_signal(component, lt_in.at(1)?, b)?;

    let lt_out = ctx.read(component, lt, "out")?;
    ctx.write_to(component, component, "out", FieldElement::one() - lt_out)?;

    ctx.finished(component);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::WitnessCalculator;
    use crate::circuit::{Circuit, Template};
    use crate::error::validation::MAX_64BIT;
    use crate::error::WitnessError;
    use crate::gadgets::test_utils::{fe, run};
    use rand::Rng;
    use std::sync::Arc;

    fn lt_out(a: u64, b: u64) -> FieldElement {
        run(Template::LessThan { n: 64 }, "in", &[a, b])
            .unwrap()
            .get("out")
            .unwrap()
    }

    fn geq_out(a: u64, b: u64) -> FieldElement {
        run(Template::GreaterEqThan { n: 64 }, "in", &[a, b])
            .unwrap()
            .get("out")
            .unwrap()
    }

    #[test]
    fn test_inverse_hint() {
        assert_eq!(compute_inverse_hint(FieldElement::zero()), FieldElement::zero());
        assert_eq!(compute_inverse_hint(fe(4)) * fe(4), FieldElement::one());

        let minus_one = -FieldElement::one();
        assert_eq!(compute_inverse_hint(minus_one), minus_one);
    }

    #[test]
    fn test_is_zero() {
        let cases = [
            (FieldElement::zero(), 1u64),
            (fe(1), 0),
            (fe(12345), 0),
            (-FieldElement::one(), 0),
        ];
        for (input, expected) in cases {
            let witness =
                crate::calculator::calculate_witness(Template::IsZero, &[("in", &[input])])
                    .unwrap();
            assert_eq!(witness.get("out").unwrap(), fe(expected), "Failed for {}", input);
            assert_eq!(witness.get("in").unwrap() * witness.get("out").unwrap(), fe(0));
        }
    }

    #[test]
    fn test_is_zero_tampered_inverse() {
        // With inv = 0 the prover claims 7 is zero; in * out === 0 must reject it
        let circuit = Arc::new(Circuit::new(Template::IsZero).unwrap());
        let mut calculator = WitnessCalculator::new(circuit);
        calculator.set_input("in", &[fe(7)]).unwrap();
        calculator.override_hint("inv", fe(0)).unwrap();

        let err = calculator.calculate().unwrap_err();
        assert!(matches!(
            err,
            WitnessError::ConstraintViolation { locator: IS_ZERO, .. }
        ));
    }

    #[test]
    fn test_less_than_basic() {
        assert_eq!(lt_out(0, 0), fe(0));
        assert_eq!(lt_out(0, 1), fe(1));
        assert_eq!(lt_out(1, 0), fe(0));
        assert_eq!(lt_out(14, 15), fe(1));
        assert_eq!(lt_out(15, 15), fe(0));
        assert_eq!(lt_out(100, 15), fe(0));
    }

    #[test]
    fn test_less_than_boundaries() {
        assert_eq!(lt_out(0, MAX_64BIT), fe(1));
        assert_eq!(lt_out(MAX_64BIT, 0), fe(0));
        assert_eq!(lt_out(MAX_64BIT - 1, MAX_64BIT), fe(1));
        assert_eq!(lt_out(MAX_64BIT, MAX_64BIT), fe(0));
    }

    #[test]
    fn test_less_than_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..25 {
            let a = rng.gen_range(0..=MAX_64BIT);
            let b = rng.gen_range(0..=MAX_64BIT);
            assert_eq!(lt_out(a, b), fe((a < b) as u64), "Failed for {} < {}", a, b);
        }
    }

    #[test]
    fn test_greater_eq_than() {
        assert_eq!(geq_out(50000, 10000), fe(1));
        assert_eq!(geq_out(10000, 10000), fe(1));
        assert_eq!(geq_out(9999, 10000), fe(0));
        assert_eq!(geq_out(0, 0), fe(1));
    }

    #[test]
    fn test_greater_eq_than_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..25 {
            let a = rng.gen_range(0..=MAX_64BIT);
            let b = rng.gen_range(0..=MAX_64BIT);
            assert_eq!(geq_out(a, b), fe((a >= b) as u64), "Failed for {} >= {}", a, b);
        }
    }

    #[test]
    fn test_less_than_reads_bit_n_minus_1() {
        // 3 + (256 - 200) = 59: bit 7 is clear although 3 < 200, since the
        // operands are 197 apart and LessThan(8) only covers distances below 128
        let witness = run(Template::LessThan { n: 8 }, "in", &[3, 200]).unwrap();
        let sum = witness.get_array("adder.out").unwrap();

        assert_eq!(sum.len(), 9);
        assert_eq!(crate::gadgets::test_utils::recompose(&sum), fe(59));
        assert_eq!(witness.get("out").unwrap(), sum[7]);
        assert_eq!(witness.get("out").unwrap(), fe(0));

        let witness = run(Template::LessThan { n: 8 }, "in", &[3, 100]).unwrap();
        assert_eq!(witness.get("out").unwrap(), fe(1));
    }
}
