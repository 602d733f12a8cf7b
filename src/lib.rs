//! ZK Credit Check Witness Engine
//!
//! Witness computation for the private credit-eligibility circuit over the
//! BN254 scalar field.
//!
//! # Circuits
//! - `CreditCheck`: Prove total revenue >= threshold AND Benford score < threshold
//!   without revealing order amounts or the score
//!
//! # Gadgets
//! - `IsZero`, `AND`
//! - `Num2Bits`, `Num2BitsNeg`: bit decomposition range checks
//! - `BinSum`: binary adder
//! - `LessThan`, `GreaterEqThan`: 64-bit comparators
//!
//! # Example
//! ```ignore
//! use zk_credit_witness::{Config, CreditCheckCircuit, CreditCheckInput};
//!
//! let config = Config::from_env()?;
//! let input = CreditCheckInput::from_orders(&[1200, 180, 35, 4100], &config)?;
//!
//! let circuit = CreditCheckCircuit::new()?;
//! let witness = circuit.calculate(&input)?;
//! println!("isValid = {}", witness.is_valid());
//! ```

pub mod benford;
pub mod calculator;
pub mod circuit;
pub mod config;
pub mod credit_check;
pub mod error;
pub mod field;
pub mod gadgets;


// Circuit exports
pub use circuit::{Circuit, ComponentId, Signal, SignalRole, Slot, Template};
pub use credit_check::{CreditCheckCircuit, CreditCheckInput, CreditCheckWitness};

// Witness computation
pub use calculator::{calculate_witness, Witness, WitnessCalculator};

// Error handling
pub use error::validation;
pub use error::{WitnessError, WitnessResult};

pub use benford::benford_score;
pub use config::Config;
pub use field::FieldElement;
