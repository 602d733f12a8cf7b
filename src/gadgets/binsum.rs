//! Binary adder over `ops` little-endian operands of `n` bits
//!
//! The sum is assigned bit by bit as hints; booleanity plus the equality of
//! the two weighted sums pins every output bit.

use crate::calculator::WitnessCalculator;
use crate::circuit::{binsum_nout, ComponentId};
use crate::error::WitnessResult;
use crate::field::FieldElement;

pub(crate) const BINSUM_BOOLEAN: &str = "binsum::binsum:85";
pub(crate) const BINSUM_SUM: &str = "binsum::binsum:92";

/// `BinSum(n, ops)`
pub(crate) fn binsum(
    ctx: &mut WitnessCalculator,
    component: ComponentId,
    n: usize,
    ops: usize,
) -> WitnessResult<()> {
    let nout = binsum_nout(n, ops);
    let input = ctx.signal(component, "in")?;
    let out = ctx.signal(component, "out")?;

    let mut lin = FieldElement::zero();
    let mut e2 = FieldElement::one();
    for k in 0..n {
        for j in 0..ops {
            lin += ctx.get_signal(component, input.at2(j, k)?)? * e2;
        }
        e2 = e2 + e2;
    }

    let one = FieldElement::one();
    let mut lout = FieldElement::zero();
    let mut e2 = FieldElement::one();
    for k in 0..nout {
        let slot = out.at(k)?;
        ctx.assign_hint(component, slot, lin.bit(k))?;

        let bit = ctx.get_signal(component, slot)?;
        ctx.check_constraint(component, bit * (bit - one), FieldElement::zero(), BINSUM_BOOLEAN)?;

        lout += bit * e2;
        e2 = e2 + e2;
    }

    ctx.check_constraint(component, lin, lout, BINSUM_SUM)?;

    ctx.finished(component);
    Ok(())
}
