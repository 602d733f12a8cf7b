//! Component tree and signal layout
//!
//! A [`Circuit`] is built once from a root [`Template`]. Building walks the
//! template tree in pre-order, giving every component a contiguous range of
//! slots and recording which component and signal owns each slot. Slot 0 is
//! the constant `1` every R1CS witness starts with.
//!
//! # Layout of `CreditCheck`
//! ```text
//! slot 0            one
//! slots 1..=107     main: isValid, revenueThreshold, benfordThreshold,
//!                         orderAmounts[100], benfordScore, totalRevenue, ...
//! slots 108..=439   main.revenueGate (GreaterEqThan(64) and its LessThan)
//! slots 440..=768   main.benfordGate (LessThan(64))
//! slots 769..=771   main.andGate
//! ```

use num_bigint::BigUint;

use crate::error::{validation, WitnessError, WitnessResult};

/// Bit width of the comparators in the credit check
pub const COMPARATOR_BITS: usize = 64;

/// Number of order amounts the credit check sums
pub const ORDER_COUNT: usize = 100;

/// Path of the root component, as used in diagnostics
pub const ROOT_PATH: &str = "main";

/// The closed set of circuit templates, each with its own parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    IsZero,
    And,
    Num2Bits { n: usize },
    Num2BitsNeg { n: usize },
    BinSum { n: usize, ops: usize },
    LessThan { n: usize },
    GreaterEqThan { n: usize },
    CreditCheck { orders: usize },
}

/// Role of a signal within its component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalRole {
    /// Input supplied by the parent (public when declared on the root)
    Input,
    /// Input that stays private even on the root
    PrivateInput,
    Output,
    Intermediate,
}

impl SignalRole {
    pub fn is_input(&self) -> bool {
        matches!(self, SignalRole::Input | SignalRole::PrivateInput)
    }
}

/// Declaration of one (possibly multi-dimensional) signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalDecl {
    pub name: &'static str,
    pub role: SignalRole,
    pub dims: Vec<usize>,
}

impl SignalDecl {
    fn new(name: &'static str, role: SignalRole, dims: Vec<usize>) -> Self {
        Self { name, role, dims }
    }

    /// Number of slots the signal occupies
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Output width of `BinSum(n, ops)`: bits needed for `(2^n - 1) * ops`
pub fn binsum_nout(n: usize, ops: usize) -> usize {
    let max_sum = ((BigUint::from(1u8) << n) - 1u8) * ops;
    max_sum.bits() as usize
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::IsZero => "IsZero",
            Template::And => "AND",
            Template::Num2Bits { .. } => "Num2Bits",
            Template::Num2BitsNeg { .. } => "Num2BitsNeg",
            Template::BinSum { .. } => "BinSum",
            Template::LessThan { .. } => "LessThan",
            Template::GreaterEqThan { .. } => "GreaterEqThan",
            Template::CreditCheck { .. } => "CreditCheck",
        }
    }

    /// Signal declarations, in layout order
    pub fn signals(&self) -> Vec<SignalDecl> {
        use SignalRole::*;

        match *self {
            Template::IsZero => vec![
                SignalDecl::new("in", Input, vec![]),
                SignalDecl::new("out", Output, vec![]),
                SignalDecl::new("inv", Intermediate, vec![]),
            ],
            Template::And => vec![
                SignalDecl::new("a", Input, vec![]),
                SignalDecl::new("b", Input, vec![]),
                SignalDecl::new("out", Output, vec![]),
            ],
            Template::Num2Bits { n } | Template::Num2BitsNeg { n } => vec![
                SignalDecl::new("in", Input, vec![]),
                SignalDecl::new("out", Output, vec![n]),
            ],
            Template::BinSum { n, ops } => vec![
                SignalDecl::new("in", Input, vec![ops, n]),
                SignalDecl::new("out", Output, vec![binsum_nout(n, ops)]),
            ],
            Template::LessThan { .. } | Template::GreaterEqThan { .. } => vec![
                SignalDecl::new("in", Input, vec![2]),
                SignalDecl::new("out", Output, vec![]),
            ],
            // Outputs and public inputs first, so they sit right after the
            // constant one like in a snarkjs witness.
            Template::CreditCheck { orders } => vec![
                SignalDecl::new("isValid", Output, vec![]),
                SignalDecl::new("revenueThreshold", Input, vec![]),
                SignalDecl::new("benfordThreshold", Input, vec![]),
                SignalDecl::new("orderAmounts", PrivateInput, vec![orders]),
                SignalDecl::new("benfordScore", PrivateInput, vec![]),
                SignalDecl::new("totalRevenue", Intermediate, vec![]),
                SignalDecl::new("revenueCheck", Intermediate, vec![]),
                SignalDecl::new("benfordCheck", Intermediate, vec![]),
            ],
        }
    }

    /// Named sub-components, in layout order
    pub fn children(&self) -> Vec<(&'static str, Template)> {
        match *self {
            Template::IsZero
            | Template::And
            | Template::Num2Bits { .. }
            | Template::BinSum { .. } => vec![],
            Template::Num2BitsNeg { .. } => vec![("isZero", Template::IsZero)],
            Template::LessThan { n } => vec![
                ("num2Bits0", Template::Num2Bits { n }),
                ("num2Bits1", Template::Num2BitsNeg { n }),
                ("adder", Template::BinSum { n, ops: 2 }),
            ],
            Template::GreaterEqThan { n } => vec![("lt", Template::LessThan { n })],
            Template::CreditCheck { .. } => vec![
                ("revenueGate", Template::GreaterEqThan { n: COMPARATOR_BITS }),
                ("benfordGate", Template::LessThan { n: COMPARATOR_BITS }),
                ("andGate", Template::And),
            ],
        }
    }

    /// Reject parameters the bit tricks cannot support
    pub fn validate(&self) -> WitnessResult<()> {
        match *self {
            Template::IsZero | Template::And => Ok(()),
            Template::Num2Bits { n } | Template::Num2BitsNeg { n } => {
                validation::validate_bit_width(n, 1)
            }
            Template::BinSum { n, ops } => validation::validate_bit_width(n, ops),
            Template::LessThan { n } | Template::GreaterEqThan { n } => {
                validation::validate_comparator_bits(n)
            }
            Template::CreditCheck { orders } => {
                if orders == 0 {
                    return Err(WitnessError::InvalidConfiguration {
                        message: "CreditCheck needs at least one order".to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

/// Index of a component in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(usize);

impl ComponentId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Index of one field element in the witness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(usize);

impl Slot {
    /// The constant-one slot
    pub const ONE: Slot = Slot(0);

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Resolved handle to a signal of one component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    component: ComponentId,
    name: &'static str,
    offset: usize,
    len: usize,
    /// Size of the innermost dimension (equals `len` for scalars and vectors)
    inner: usize,
}

impl Signal {
    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The slot of a scalar signal
    pub fn slot(&self) -> WitnessResult<Slot> {
        if self.len != 1 {
            return Err(WitnessError::ScalarExpected {
                signal: self.name.to_string(),
            });
        }
        Ok(Slot(self.offset))
    }

    /// Element `i` in flattened (row-major) order
    pub fn at(&self, i: usize) -> WitnessResult<Slot> {
        if i >= self.len {
            return Err(WitnessError::IndexOutOfBounds {
                signal: self.name.to_string(),
                index: i,
                len: self.len,
            });
        }
        Ok(Slot(self.offset + i))
    }

    /// Element `[i][j]` of a two-dimensional signal
    pub fn at2(&self, i: usize, j: usize) -> WitnessResult<Slot> {
        if j >= self.inner {
            return Err(WitnessError::IndexOutOfBounds {
                signal: self.name.to_string(),
                index: j,
                len: self.inner,
            });
        }
        self.at(i * self.inner + j)
    }

    pub fn slots(&self) -> impl Iterator<Item = Slot> {
        (self.offset..self.offset + self.len).map(Slot)
    }
}

#[derive(Debug, Clone)]
struct SignalLayout {
    decl: SignalDecl,
    offset: usize,
}

#[derive(Debug, Clone)]
struct ComponentNode {
    template: Template,
    path: String,
    parent: Option<ComponentId>,
    signals: Vec<SignalLayout>,
    children: Vec<(&'static str, ComponentId)>,
    input_count: usize,
}

#[derive(Debug, Clone, Copy)]
struct SlotOwner {
    component: ComponentId,
    signal: usize,
}

/// Immutable component arena with its signal layout
#[derive(Debug, Clone)]
pub struct Circuit {
    components: Vec<ComponentNode>,
    /// Owner of every slot except the constant one
    owners: Vec<Option<SlotOwner>>,
}

impl Circuit {
    /// Build the component tree rooted at `root`
    pub fn new(root: Template) -> WitnessResult<Self> {
        let mut circuit = Self {
            components: Vec::new(),
            owners: vec![None],
        };
        circuit.build(root, ROOT_PATH.to_string(), None)?;
        tracing::debug!(
            template = root.name(),
            signals = circuit.num_signals(),
            components = circuit.num_components(),
            "circuit layout built"
        );
        Ok(circuit)
    }

    fn build(
        &mut self,
        template: Template,
        path: String,
        parent: Option<ComponentId>,
    ) -> WitnessResult<ComponentId> {
        template.validate()?;

        let id = ComponentId(self.components.len());
        let mut signals = Vec::new();
        let mut input_count = 0;
        for (index, decl) in template.signals().into_iter().enumerate() {
            let offset = self.owners.len();
            let len = decl.len();
            self.owners.extend(std::iter::repeat(Some(SlotOwner {
                component: id,
                signal: index,
            })).take(len));
            if decl.role.is_input() {
                input_count += len;
            }
            signals.push(SignalLayout { decl, offset });
        }

        self.components.push(ComponentNode {
            template,
            path: path.clone(),
            parent,
            signals,
            children: Vec::new(),
            input_count,
        });

        for (name, child) in template.children() {
            let child_id = self.build(child, format!("{}.{}", path, name), Some(id))?;
            self.components[id.0].children.push((name, child_id));
        }

        Ok(id)
    }

    pub fn root(&self) -> ComponentId {
        ComponentId(0)
    }

    /// Total number of witness slots, including the constant one
    pub fn num_signals(&self) -> usize {
        self.owners.len()
    }

    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    /// Number of root input slots
    pub fn num_inputs(&self) -> usize {
        self.components[0].input_count
    }

    pub fn num_outputs(&self) -> usize {
        self.root_slots(|role| role == SignalRole::Output).len()
    }

    /// Root outputs plus public root inputs
    pub fn num_public(&self) -> usize {
        self.public_slots().len()
    }

    /// Public signals in verifier order: outputs first, then public inputs
    pub fn public_slots(&self) -> Vec<Slot> {
        let mut slots = self.root_slots(|role| role == SignalRole::Output);
        slots.extend(self.root_slots(|role| role == SignalRole::Input));
        slots
    }

    fn root_slots(&self, keep: impl Fn(SignalRole) -> bool) -> Vec<Slot> {
        self.components[0]
            .signals
            .iter()
            .filter(|layout| keep(layout.decl.role))
            .flat_map(|layout| (layout.offset..layout.offset + layout.decl.len()).map(Slot))
            .collect()
    }

    fn node(&self, id: ComponentId) -> &ComponentNode {
        &self.components[id.0]
    }

    pub fn template(&self, id: ComponentId) -> Template {
        self.node(id).template
    }

    pub fn path(&self, id: ComponentId) -> &str {
        &self.node(id).path
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.node(id).parent
    }

    /// All components in layout (pre-order) order
    pub fn components(&self) -> impl Iterator<Item = ComponentId> {
        (0..self.components.len()).map(ComponentId)
    }

    pub(crate) fn input_count(&self, id: ComponentId) -> usize {
        self.node(id).input_count
    }

    /// Input slots of `id`, in declaration order
    pub(crate) fn input_slots(&self, id: ComponentId) -> Vec<Slot> {
        self.node(id)
            .signals
            .iter()
            .filter(|layout| layout.decl.role.is_input())
            .flat_map(|layout| (layout.offset..layout.offset + layout.decl.len()).map(Slot))
            .collect()
    }

    /// Resolve a signal of `component` by name
    pub fn signal(&self, component: ComponentId, name: &str) -> WitnessResult<Signal> {
        let node = self.node(component);
        node.signals
            .iter()
            .find(|layout| layout.decl.name == name)
            .map(|layout| Signal {
                component,
                name: layout.decl.name,
                offset: layout.offset,
                len: layout.decl.len(),
                inner: layout.decl.dims.last().copied().unwrap_or(1),
            })
            .ok_or_else(|| WitnessError::UnknownSignal {
                component: node.path.clone(),
                signal: name.to_string(),
            })
    }

    /// Resolve a named sub-component of `component`
    pub fn child(&self, component: ComponentId, name: &str) -> WitnessResult<ComponentId> {
        let node = self.node(component);
        node.children
            .iter()
            .find(|(child_name, _)| *child_name == name)
            .map(|(_, id)| *id)
            .ok_or_else(|| WitnessError::UnknownComponent {
                component: node.path.clone(),
                name: name.to_string(),
            })
    }

    /// Component owning `slot`, `None` for the constant one
    pub fn owner(&self, slot: Slot) -> Option<ComponentId> {
        self.owners[slot.0].map(|owner| owner.component)
    }

    /// Role of the signal holding `slot`, `None` for the constant one
    pub fn role(&self, slot: Slot) -> Option<SignalRole> {
        self.owners[slot.0]
            .map(|owner| self.node(owner.component).signals[owner.signal].decl.role)
    }

    /// Human-readable name of a slot, e.g. `main.benfordGate.adder.in[1][5]`
    pub fn describe(&self, slot: Slot) -> String {
        let Some(owner) = self.owners.get(slot.0).copied().flatten() else {
            return "one".to_string();
        };
        let node = self.node(owner.component);
        let layout = &node.signals[owner.signal];
        let index = slot.0 - layout.offset;
        match layout.decl.dims.as_slice() {
            [] => format!("{}.{}", node.path, layout.decl.name),
            [_] => format!("{}.{}[{}]", node.path, layout.decl.name, index),
            [.., inner] => format!(
                "{}.{}[{}][{}]",
                node.path,
                layout.decl.name,
                index / inner,
                index % inner
            ),
        }
    }

    /// Resolve a dotted path such as `revenueGate.lt.out` or `adder.in[1][5]`
    /// (relative to the root; a leading `main.` is accepted) to a signal and
    /// its indices
    pub fn resolve_signal(&self, path: &str) -> WitnessResult<(Signal, Vec<usize>)> {
        let relative = path.strip_prefix("main.").unwrap_or(path);
        let mut segments: Vec<&str> = relative.split('.').collect();
        let last = segments.pop().unwrap_or_default();

        let mut component = self.root();
        for segment in segments {
            component = self.child(component, segment)?;
        }

        let (name, index_part) = match last.find('[') {
            Some(pos) => last.split_at(pos),
            None => (last, ""),
        };
        let signal = self.signal(component, name)?;

        let mut indices = Vec::new();
        for raw in index_part.split('[').skip(1) {
            let index = raw
                .strip_suffix(']')
                .and_then(|digits| digits.parse::<usize>().ok())
                .ok_or_else(|| WitnessError::InvalidInput {
                    message: format!("malformed signal path '{}'", path),
                })?;
            indices.push(index);
        }

        Ok((signal, indices))
    }

    /// Resolve a dotted path to a single slot
    pub fn resolve(&self, path: &str) -> WitnessResult<Slot> {
        let (signal, indices) = self.resolve_signal(path)?;
        match indices.as_slice() {
            [] => signal.slot(),
            [i] => signal.at(*i),
            [i, j] => signal.at2(*i, *j),
            _ => Err(WitnessError::InvalidInput {
                message: format!("too many indices in '{}'", path),
            }),
        }
    }
}
