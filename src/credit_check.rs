//! CreditCheck Circuit
//!
//! Proves "total revenue meets the threshold AND the Benford score is below
//! its threshold" without revealing the order amounts or the score.
//!
//! # Signals
//! | Signal | Visibility |
//! |--------|------------|
//! | `orderAmounts[100]` | private input |
//! | `benfordScore` | private input |
//! | `revenueThreshold` | public input |
//! | `benfordThreshold` | public input |
//! | `isValid` | public output |
//!
//! # Circuit Constraints
//! 1. `totalRevenue === Σ orderAmounts[i]`
//! 2. `revenueCheck <== GreaterEqThan(64)(totalRevenue, revenueThreshold)`
//! 3. `benfordCheck <== LessThan(64)(benfordScore, benfordThreshold)`
//! 4. `isValid <== AND(revenueCheck, benfordCheck)`
//!
//! # Example
//! ```ignore
//! let input = CreditCheckInput::from_orders(&amounts, &Config::from_env()?)?;
//! let witness = CreditCheckCircuit::new()?.calculate(&input)?;
//! assert!(witness.is_valid());
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::benford::benford_score;
use crate::calculator::{Witness, WitnessCalculator};
use crate::circuit::{Circuit, ComponentId, Template, ORDER_COUNT};
use crate::config::Config;
use crate::error::{validation, WitnessError, WitnessResult};
use crate::field::FieldElement;

pub(crate) const TOTAL_REVENUE: &str = "credit_check::total_revenue:18";

/// Write `a` and `b` into the two-element input of comparator `gate` and
/// return its output
fn compare(
    ctx: &mut WitnessCalculator,
    component: ComponentId,
    gate: &str,
    a: FieldElement,
    b: FieldElement,
) -> WitnessResult<FieldElement> {
    let gate = ctx.child(component, gate)?;
    let gate_in = ctx.signal(gate, "in")?;
    ctx.set_signal(component, gate_in.at(0)?, a)?;
    ctx.set_signal(component, gate_in.at(1)?, b)?;
    ctx.read(component, gate, "out")
}

/// `CreditCheck(orders)`
pub(crate) fn evaluate(
    ctx: &mut WitnessCalculator,
    component: ComponentId,
    orders: usize,
) -> WitnessResult<()> {
    // ======== Total revenue ========
    let amounts = ctx.signal(component, "orderAmounts")?;
    let mut sum = FieldElement::zero();
    for i in 0..orders {
        sum += ctx.get_signal(component, amounts.at(i)?)?;
    }

    let total_slot = ctx.signal(component, "totalRevenue")?.slot()?;
    ctx.assign_hint(component, total_slot, sum)?;
    let total_revenue = ctx.get_signal(component, total_slot)?;
    ctx.check_constraint(component, total_revenue, sum, TOTAL_REVENUE)?;

    // ======== Revenue gate: totalRevenue >= revenueThreshold ========
    let revenue_threshold = ctx.read(component, component, "revenueThreshold")?;
    let revenue_check = compare(ctx, component, "revenueGate", total_revenue, revenue_threshold)?;
    ctx.write_to(component, component, "revenueCheck", revenue_check)?;

    // ======== Benford gate: benfordScore < benfordThreshold ========
    let benford_score = ctx.read(component, component, "benfordScore")?;
    let benford_threshold = ctx.read(component, component, "benfordThreshold")?;
    let benford_check = compare(ctx, component, "benfordGate", benford_score, benford_threshold)?;
    ctx.write_to(component, component, "benfordCheck", benford_check)?;

    // ======== isValid = revenueCheck AND benfordCheck ========
    let and_gate = ctx.child(component, "andGate")?;
    ctx.write_to(component, and_gate, "a", revenue_check)?;
    ctx.write_to(component, and_gate, "b", benford_check)?;
    let is_valid = ctx.read(component, and_gate, "out")?;
    ctx.write_to(component, component, "isValid", is_valid)?;

    ctx.finished(component);
    Ok(())
}

/// Inputs of the credit check, keyed like the circuit's signals
/// (`orderAmounts`, `benfordScore`, `revenueThreshold`, `benfordThreshold`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCheckInput {
    /// Private: order amounts, zero-padded to the circuit's order count
    pub order_amounts: Vec<FieldElement>,
    /// Private: Benford score of the real orders
    pub benford_score: FieldElement,
    /// Public: minimum total revenue
    pub revenue_threshold: FieldElement,
    /// Public: exclusive upper bound for the Benford score
    pub benford_threshold: FieldElement,
}

impl CreditCheckInput {
    pub fn new(
        order_amounts: Vec<FieldElement>,
        benford_score: FieldElement,
        revenue_threshold: FieldElement,
        benford_threshold: FieldElement,
    ) -> Self {
        Self {
            order_amounts,
            benford_score,
            revenue_threshold,
            benford_threshold,
        }
    }

    /// Prepare inputs from raw order amounts: score them, pad them to
    /// [`ORDER_COUNT`] and take the thresholds from `config`
    pub fn from_orders(amounts: &[u64], config: &Config) -> WitnessResult<Self> {
        validation::validate_order_count(amounts.len(), ORDER_COUNT)?;
        let score = benford_score(amounts)?;

        let mut order_amounts: Vec<FieldElement> =
            amounts.iter().copied().map(FieldElement::from).collect();
        order_amounts.resize(ORDER_COUNT, FieldElement::zero());

        tracing::debug!(
            orders = amounts.len(),
            benford_score = score,
            "credit check input prepared"
        );

        Ok(Self::new(
            order_amounts,
            FieldElement::from(score),
            FieldElement::from(config.revenue_threshold),
            FieldElement::from(config.benford_threshold),
        ))
    }

    /// Parse an snarkjs-style `input.json` object
    pub fn from_json(json: &str) -> WitnessResult<Self> {
        serde_json::from_str(json).map_err(|e| WitnessError::InvalidInput {
            message: e.to_string(),
        })
    }

    /// Sum of the order amounts
    pub fn total_revenue(&self) -> FieldElement {
        self.order_amounts.iter().copied().sum()
    }

    /// Check every comparator operand fits the comparator range
    pub fn validate(&self) -> WitnessResult<()> {
        for amount in &self.order_amounts {
            validation::validate_range(*amount, "orderAmounts")?;
        }
        validation::validate_range(self.total_revenue(), "totalRevenue")?;
        validation::validate_range(self.revenue_threshold, "revenueThreshold")?;
        validation::validate_range(self.benford_score, "benfordScore")?;
        validation::validate_range(self.benford_threshold, "benfordThreshold")?;
        Ok(())
    }
}

/// CreditCheck circuit: the component layout, built once and shared
#[derive(Debug, Clone)]
pub struct CreditCheckCircuit {
    circuit: Arc<Circuit>,
    orders: usize,
}

impl CreditCheckCircuit {
    /// Circuit over [`ORDER_COUNT`] orders
    pub fn new() -> WitnessResult<Self> {
        Self::with_orders(ORDER_COUNT)
    }

    pub fn with_orders(orders: usize) -> WitnessResult<Self> {
        let circuit = Circuit::new(Template::CreditCheck { orders })?;
        Ok(Self {
            circuit: Arc::new(circuit),
            orders,
        })
    }

    pub fn circuit(&self) -> &Arc<Circuit> {
        &self.circuit
    }

    pub fn orders(&self) -> usize {
        self.orders
    }

    /// A calculator with every input of `input` written, ready to run.
    ///
    /// Useful to tamper with hints before [`WitnessCalculator::calculate`].
    pub fn calculator(&self, input: &CreditCheckInput) -> WitnessResult<WitnessCalculator> {
        input.validate()?;
        if input.order_amounts.len() != self.orders {
            return Err(WitnessError::InputLength {
                signal: "orderAmounts".to_string(),
                expected: self.orders,
                actual: input.order_amounts.len(),
            });
        }

        let mut calculator = WitnessCalculator::new(Arc::clone(&self.circuit));
        calculator.set_input("orderAmounts", &input.order_amounts)?;
        calculator.set_input("benfordScore", &[input.benford_score])?;
        calculator.set_input("revenueThreshold", &[input.revenue_threshold])?;
        calculator.set_input("benfordThreshold", &[input.benford_threshold])?;
        Ok(calculator)
    }

    /// Compute the witness for `input`
    pub fn calculate(&self, input: &CreditCheckInput) -> WitnessResult<CreditCheckWitness> {
        let witness = self.calculator(input)?.calculate()?;
        CreditCheckWitness::new(witness)
    }
}

/// Witness of a credit check with its named results
#[derive(Debug, Clone)]
pub struct CreditCheckWitness {
    witness: Witness,
    is_valid: FieldElement,
    total_revenue: FieldElement,
    revenue_check: FieldElement,
    benford_check: FieldElement,
}

impl CreditCheckWitness {
    fn new(witness: Witness) -> WitnessResult<Self> {
        Ok(Self {
            is_valid: witness.get("isValid")?,
            total_revenue: witness.get("totalRevenue")?,
            revenue_check: witness.get("revenueCheck")?,
            benford_check: witness.get("benfordCheck")?,
            witness,
        })
    }

    /// The public verdict
    pub fn is_valid(&self) -> bool {
        self.is_valid == FieldElement::one()
    }

    pub fn total_revenue(&self) -> FieldElement {
        self.total_revenue
    }

    pub fn revenue_check(&self) -> bool {
        self.revenue_check == FieldElement::one()
    }

    pub fn benford_check(&self) -> bool {
        self.benford_check == FieldElement::one()
    }

    /// `[isValid, revenueThreshold, benfordThreshold]`
    pub fn public_signals(&self) -> Vec<FieldElement> {
        self.witness.public_signals()
    }

    pub fn witness(&self) -> &Witness {
        &self.witness
    }

    pub fn into_witness(self) -> Witness {
        self.witness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(v: u64) -> FieldElement {
        FieldElement::from(v)
    }

    fn input(amount: u64, benford_score: u64, revenue: u64, benford: u64) -> CreditCheckInput {
        CreditCheckInput::new(
            vec![fe(amount); ORDER_COUNT],
            fe(benford_score),
            fe(revenue),
            fe(benford),
        )
    }

    #[test]
    fn test_honest_borrower() {
        let circuit = CreditCheckCircuit::new().unwrap();
        let witness = circuit.calculate(&input(500, 10, 40_000, 20)).unwrap();

        assert!(witness.is_valid());
        assert!(witness.revenue_check());
        assert!(witness.benford_check());
        assert_eq!(witness.total_revenue(), fe(50_000));
        assert_eq!(witness.public_signals(), vec![fe(1), fe(40_000), fe(20)]);
        assert_eq!(witness.witness().len(), 772);
    }

    #[test]
    fn test_revenue_exactly_at_threshold() {
        let circuit = CreditCheckCircuit::new().unwrap();
        let witness = circuit.calculate(&input(500, 10, 50_000, 20)).unwrap();
        assert!(witness.revenue_check());

        let witness = circuit.calculate(&input(500, 20, 50_000, 20)).unwrap();
        assert!(!witness.benford_check());
        assert!(!witness.is_valid());
    }

    #[test]
    fn test_calculator_rejects_wrong_order_count() {
        let circuit = CreditCheckCircuit::with_orders(4).unwrap();
        let err = circuit.calculate(&input(1, 0, 0, 1)).unwrap_err();
        assert_eq!(
            err,
            WitnessError::InputLength {
                signal: "orderAmounts".to_string(),
                expected: 4,
                actual: ORDER_COUNT,
            }
        );
    }

    #[test]
    fn test_small_circuit() {
        let circuit = CreditCheckCircuit::with_orders(3).unwrap();
        let input = CreditCheckInput::new(vec![fe(10), fe(20), fe(30)], fe(1), fe(60), fe(2));
        let witness = circuit.calculate(&input).unwrap();

        assert!(witness.is_valid());
        assert_eq!(witness.total_revenue(), fe(60));
        assert_eq!(circuit.circuit().num_signals(), 772 - 97);
    }

    #[test]
    fn test_from_orders_pads_and_scores() {
        let amounts = [1200u64, 180, 35, 4100];
        let input = CreditCheckInput::from_orders(&amounts, &Config::default()).unwrap();

        assert_eq!(input.order_amounts.len(), ORDER_COUNT);
        assert_eq!(input.order_amounts[3], fe(4100));
        assert!(input.order_amounts[4..].iter().all(|a| a.is_zero()));
        assert_eq!(input.total_revenue(), fe(5515));
        assert_eq!(input.revenue_threshold, fe(10_000));
        assert_eq!(input.benford_threshold, fe(15));
        assert_eq!(input.benford_score, fe(benford_score(&amounts).unwrap()));
    }

    #[test]
    fn test_from_orders_limits() {
        assert!(CreditCheckInput::from_orders(&[], &Config::default()).is_err());
        assert!(CreditCheckInput::from_orders(&[1; ORDER_COUNT + 1], &Config::default()).is_err());
    }

    #[test]
    fn test_validate_rejects_large_amounts() {
        let mut oversized = input(1, 0, 0, 1);
        oversized.order_amounts[0] = fe(validation::MAX_64BIT + 1);
        assert!(matches!(
            oversized.validate(),
            Err(WitnessError::ValueOutOfRange { .. })
        ));

        // Each amount fits but the total does not
        let mut overflow = input(1, 0, 0, 1);
        overflow.order_amounts[0] = fe(validation::MAX_64BIT);
        assert!(overflow.validate().is_err());
    }
}
