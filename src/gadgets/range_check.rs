//! Range Check Gadgets using Bit Decomposition
//!
//! Proves a value fits in `n` bits by re-expressing it as `n` boolean
//! signals whose weighted sum recovers it.
//!
//! - `Num2Bits(n)`: `out = bits(in)`, closing constraint `Σ out[i]*2^i === in`
//! - `Num2BitsNeg(n)`: `out = bits(2^n - in)`, the n-bit negation used for
//!   subtraction-via-addition in `LessThan`
//!
//! # Important Constraint
//! Bits are assigned as hints; only the booleanity constraints and the
//! closing sum make them sound. A value of `n` bits or more fails the
//! closing sum.

use crate::calculator::WitnessCalculator;
use crate::circuit::ComponentId;
use crate::error::WitnessResult;
use crate::field::FieldElement;

pub(crate) const NUM2BITS_BOOLEAN: &str = "bitify::num2bits:31";
pub(crate) const NUM2BITS_SUM: &str = "bitify::num2bits:35";
pub(crate) const NUM2BITSNEG_BOOLEAN: &str = "bitify::num2bitsneg:92";
pub(crate) const NUM2BITSNEG_SUM: &str = "bitify::num2bitsneg:100";

/// Decompose `value` into `n` hinted bits of `out`, asserting each is boolean.
/// Returns the weighted sum of the assigned bits.
fn decompose(
    ctx: &mut WitnessCalculator,
    component: ComponentId,
    value: FieldElement,
    n: usize,
    locator: &'static str,
) -> WitnessResult<FieldElement> {
    let out = ctx.signal(component, "out")?;
    let one = FieldElement::one();

    let mut lc1 = FieldElement::zero();
    let mut e2 = FieldElement::one();
    for i in 0..n {
        let slot = out.at(i)?;
        ctx.assign_hint(component, slot, value.bit(i))?;

        let bit = ctx.get_signal(component, slot)?;
        ctx.check_constraint(component, bit * (bit - one), FieldElement::zero(), locator)?;

        lc1 += bit * e2;
        e2 = e2 + e2;
    }
    Ok(lc1)
}

/// `Num2Bits(n)`
pub(crate) fn num2bits(
    ctx: &mut WitnessCalculator,
    component: ComponentId,
    n: usize,
) -> WitnessResult<()> {
    let input = ctx.read(component, component, "in")?;

    let lc1 = decompose(ctx, component, input, n, NUM2BITS_BOOLEAN)?;
    ctx.check_constraint(component, lc1, input, NUM2BITS_SUM)?;

    ctx.finished(component);
    Ok(())
}

/// `Num2BitsNeg(n)`
///
/// For `in == 0` the negation `2^n` does not fit in `n` bits; the low `n`
/// bits are all zero and `isZero.out * 2^n` supplies the missing term.
pub(crate) fn num2bits_neg(
    ctx: &mut WitnessCalculator,
    component: ComponentId,
    n: usize,
) -> WitnessResult<()> {
    let input = ctx.read(component, component, "in")?;
    let two_n = FieldElement::two_pow(n);
    let neg = if n == 0 { FieldElement::zero() } else { two_n - input };

    let lc1 = decompose(ctx, component, neg, n, NUM2BITSNEG_BOOLEAN)?;

    let is_zero = ctx.child(component, "isZero")?;
    ctx.write_to(component, is_zero, "in", input)?;
    let is_zero_out = ctx.read(component, is_zero, "out")?;

    ctx.check_constraint(component, lc1 + is_zero_out * two_n, two_n - input, NUM2BITSNEG_SUM)?;

    ctx.finished(component);
    Ok(())
}
