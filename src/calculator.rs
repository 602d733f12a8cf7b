//! Witness calculator
//!
//! Runtime that evaluates component bodies against a [`Circuit`] layout.
//!
//! # Evaluation order
//! 1. The caller writes every root input with [`WitnessCalculator::set_input`]
//! 2. [`WitnessCalculator::calculate`] runs the root body
//! 3. Whenever a body writes the last pending input of one of its
//!    sub-components, that sub-component is evaluated immediately
//! 4. Outputs of a sub-component are readable only once it has finished
//!
//! Evaluation is single-threaded and fail-fast: the first error aborts the
//! run and the calculator is consumed, so no partial witness escapes.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::circuit::{Circuit, ComponentId, Signal, Slot, Template};
use crate::credit_check;
use crate::error::{WitnessError, WitnessResult};
use crate::field::FieldElement;
use crate::gadgets::{binsum, comparison, gates, range_check};

/// Computes a witness for one set of inputs
pub struct WitnessCalculator {
    circuit: Arc<Circuit>,
    values: Vec<Option<FieldElement>>,
    pending_inputs: Vec<usize>,
    finished: Vec<bool>,
    hint_overrides: HashMap<Slot, FieldElement>,
}

impl WitnessCalculator {
    /// Create a calculator with every slot unassigned except the constant one
    pub fn new(circuit: Arc<Circuit>) -> Self {
        let mut values = vec![None; circuit.num_signals()];
        values[Slot::ONE.index()] = Some(FieldElement::one());

        let pending_inputs = circuit
            .components()
            .map(|id| circuit.input_count(id))
            .collect();
        let finished = vec![false; circuit.num_components()];

        Self {
            circuit,
            values,
            pending_inputs,
            finished,
            hint_overrides: HashMap::new(),
        }
    }

    pub fn circuit(&self) -> &Arc<Circuit> {
        &self.circuit
    }

    /// Write a root input signal (all of its elements, row-major)
    pub fn set_input(&mut self, name: &str, values: &[FieldElement]) -> WitnessResult<()> {
        let root = self.circuit.root();
        let signal = self.circuit.signal(root, name)?;
        let is_input = signal
            .slots()
            .next()
            .and_then(|slot| self.circuit.role(slot))
            .is_some_and(|role| role.is_input());
        if !is_input {
            return Err(WitnessError::InvalidInput {
                message: format!("{} is not an input signal", name),
            });
        }
        if values.len() != signal.len() {
            return Err(WitnessError::InputLength {
                signal: name.to_string(),
                expected: signal.len(),
                actual: values.len(),
            });
        }

        for (slot, value) in signal.slots().zip(values) {
            self.write(slot, *value)?;
            self.pending_inputs[root.index()] -= 1;
        }
        Ok(())
    }

    /// Replace the value a body computes for an unconstrained hint signal.
    ///
    /// This plays a dishonest prover: the constraints that follow the hint
    /// must reject any value that breaks the relation.
    pub fn override_hint(&mut self, path: &str, value: FieldElement) -> WitnessResult<()> {
        let slot = self.circuit.resolve(path)?;
        self.hint_overrides.insert(slot, value);
        Ok(())
    }

    /// Run the root body and return the complete witness
    pub fn calculate(mut self) -> WitnessResult<Witness> {
        let root = self.circuit.root();
        if self.pending_inputs[root.index()] != 0 {
            let missing = self.circuit.input_slots(root);
            return Err(self.first_unassigned(missing.into_iter()));
        }

        self.evaluate(root)?;

        let mut values = Vec::with_capacity(self.values.len());
        for (index, value) in self.values.iter().enumerate() {
            match value {
                Some(value) => values.push(*value),
                None => {
                    let slot = Slot::from_index(index);
                    return Err(self.first_unassigned(std::iter::once(slot)));
                }
            }
        }

        tracing::debug!(
            template = self.circuit.template(root).name(),
            signals = values.len(),
            "witness computed"
        );

        Ok(Witness {
            circuit: self.circuit,
            values,
        })
    }

    fn first_unassigned(&self, mut candidates: impl Iterator<Item = Slot>) -> WitnessError {
        let signal = candidates
            .find(|slot| self.values[slot.index()].is_none())
            .map(|slot| self.circuit.describe(slot))
            .unwrap_or_else(|| self.circuit.path(self.circuit.root()).to_string());
        WitnessError::UnresolvedSignal { signal }
    }

    /// Evaluate the body of `component`, dispatching on its template
    pub(crate) fn evaluate(&mut self, component: ComponentId) -> WitnessResult<()> {
        let template = self.circuit.template(component);
        let _span = tracing::trace_span!(
            "component",
            path = self.circuit.path(component),
            template = template.name()
        )
        .entered();

        match template {
            Template::IsZero => comparison::is_zero(self, component)?,
            Template::And => gates::and(self, component)?,
            Template::Num2Bits { n } => range_check::num2bits(self, component, n)?,
            Template::Num2BitsNeg { n } => range_check::num2bits_neg(self, component, n)?,
            Template::BinSum { n, ops } => binsum::binsum(self, component, n, ops)?,
            Template::LessThan { n } => comparison::less_than(self, component, n)?,
            Template::GreaterEqThan { n } => comparison::greater_eq_than(self, component, n)?,
            Template::CreditCheck { orders } => credit_check::evaluate(self, component, orders)?,
        }

        if !self.finished[component.index()] {
            return Err(WitnessError::UnfinishedComponent {
                component: self.circuit.path(component).to_string(),
            });
        }
        Ok(())
    }

    pub fn signal(&self, component: ComponentId, name: &str) -> WitnessResult<Signal> {
        self.circuit.signal(component, name)
    }

    pub fn child(&self, component: ComponentId, name: &str) -> WitnessResult<ComponentId> {
        self.circuit.child(component, name)
    }

    /// Read a slot on behalf of `reader`
    pub fn get_signal(&self, reader: ComponentId, slot: Slot) -> WitnessResult<FieldElement> {
        if let Some(owner) = self.circuit.owner(slot) {
            if owner != reader && !self.finished[owner.index()] {
                return Err(WitnessError::UnfinishedComponent {
                    component: self.circuit.path(owner).to_string(),
                });
            }
        }
        self.values[slot.index()].ok_or_else(|| WitnessError::UnresolvedSignal {
            signal: self.circuit.describe(slot),
        })
    }

    /// Read the scalar signal `name` of `owner` on behalf of `reader`
    pub fn read(
        &self,
        reader: ComponentId,
        owner: ComponentId,
        name: &str,
    ) -> WitnessResult<FieldElement> {
        let slot = self.signal(owner, name)?.slot()?;
        self.get_signal(reader, slot)
    }

    /// Write a slot on behalf of `writer`.
    ///
    /// Writing a sub-component input counts down its pending inputs; the
    /// write that completes them evaluates the sub-component.
    pub fn set_signal(
        &mut self,
        writer: ComponentId,
        slot: Slot,
        value: FieldElement,
    ) -> WitnessResult<()> {
        self.write(slot, value)?;

        let Some(owner) = self.circuit.owner(slot) else {
            return Ok(());
        };
        if owner != writer && self.circuit.role(slot).is_some_and(|role| role.is_input()) {
            let pending = &mut self.pending_inputs[owner.index()];
            *pending -= 1;
            if *pending == 0 {
                self.evaluate(owner)?;
            }
        }
        Ok(())
    }

    /// Write the scalar signal `name` of `owner` on behalf of `writer`
    pub fn write_to(
        &mut self,
        writer: ComponentId,
        owner: ComponentId,
        name: &str,
        value: FieldElement,
    ) -> WitnessResult<()> {
        let slot = self.signal(owner, name)?.slot()?;
        self.set_signal(writer, slot, value)
    }

    /// Assign an unconstrained hint (`<--`).
    ///
    /// The value only has to be consistent with the constraints that follow;
    /// an override registered with [`Self::override_hint`] replaces it.
    pub fn assign_hint(
        &mut self,
        writer: ComponentId,
        slot: Slot,
        hint: FieldElement,
    ) -> WitnessResult<()> {
        let value = self.hint_overrides.get(&slot).copied().unwrap_or(hint);
        self.set_signal(writer, slot, value)
    }

    /// Assert `lhs == rhs` (`===`)
    pub fn check_constraint(
        &self,
        component: ComponentId,
        lhs: FieldElement,
        rhs: FieldElement,
        locator: &'static str,
    ) -> WitnessResult<()> {
        if lhs == rhs {
            return Ok(());
        }
        let path = self.circuit.path(component);
        tracing::warn!(component = path, locator, %lhs, %rhs, "constraint violated");
        Err(WitnessError::ConstraintViolation {
            component: path.to_string(),
            locator,
            lhs,
            rhs,
        })
    }

    /// Mark the body of `component` as complete
    pub fn finished(&mut self, component: ComponentId) {
        self.finished[component.index()] = true;
        tracing::trace!(path = self.circuit.path(component), "component finished");
    }

    fn write(&mut self, slot: Slot, value: FieldElement) -> WitnessResult<()> {
        let entry = &mut self.values[slot.index()];
        if entry.is_some() {
            return Err(WitnessError::DoubleAssignment {
                signal: self.circuit.describe(slot),
            });
        }
        *entry = Some(value);
        Ok(())
    }
}

/// Complete, immutable signal assignment
#[derive(Debug, Clone)]
pub struct Witness {
    circuit: Arc<Circuit>,
    values: Vec<FieldElement>,
}

impl Witness {
    pub fn circuit(&self) -> &Arc<Circuit> {
        &self.circuit
    }

    /// All slot values, starting with the constant one
    pub fn values(&self) -> &[FieldElement] {
        &self.values
    }

    pub fn into_values(self) -> Vec<FieldElement> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of one slot by dotted path, e.g. `revenueGate.out`
    pub fn get(&self, path: &str) -> WitnessResult<FieldElement> {
        let slot = self.circuit.resolve(path)?;
        Ok(self.values[slot.index()])
    }

    /// All elements of an array signal by dotted path, e.g. `adder.out`
    pub fn get_array(&self, path: &str) -> WitnessResult<Vec<FieldElement>> {
        let (signal, indices) = self.circuit.resolve_signal(path)?;
        if !indices.is_empty() {
            return Err(WitnessError::InvalidInput {
                message: format!("'{}' names a single element, not an array", path),
            });
        }
        Ok(signal.slots().map(|slot| self.values[slot.index()]).collect())
    }

    /// Public outputs followed by public inputs
    pub fn public_signals(&self) -> Vec<FieldElement> {
        self.circuit
            .public_slots()
            .into_iter()
            .map(|slot| self.values[slot.index()])
            .collect()
    }
}

impl Serialize for Witness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

/// Build a circuit for `template`, feed `inputs` and compute the witness
pub fn calculate_witness(
    template: Template,
    inputs: &[(&str, &[FieldElement])],
) -> WitnessResult<Witness> {
    let circuit = Arc::new(Circuit::new(template)?);
    let mut calculator = WitnessCalculator::new(circuit);
    for (name, values) in inputs {
        calculator.set_input(name, values)?;
    }
    calculator.calculate()
}
