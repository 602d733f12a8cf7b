//! Logic gates

use crate::calculator::WitnessCalculator;
use crate::circuit::ComponentId;
use crate::error::WitnessResult;

/// `AND`: `out <== a * b`. Inputs are assumed boolean, not checked.
pub(crate) fn and(ctx: &mut WitnessCalculator, component: ComponentId) -> WitnessResult<()> {
    let a = ctx.read(component, component, "a")?;
    let b = ctx.read(component, component, "b")?;

    ctx.write_to(component, component, "out", a * b)?;

    ctx.finished(component);
    Ok(())
}
