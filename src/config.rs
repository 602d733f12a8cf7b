//! Configuration Module
//!
//! Public thresholds of the credit check, read from the environment.
//!
//! # Environment Variables
//!
//! - `REVENUE_THRESHOLD`: minimum total revenue (default: 10000)
//! - `BENFORD_THRESHOLD`: Benford scores must stay strictly below this (default: 15)
//!
//! Both become public inputs of the circuit, so they are validated against
//! the comparator range at load time rather than failing inside a witness run.

use std::env;

use anyhow::{ensure, Context, Result};

use crate::error::validation::MAX_64BIT;

pub const DEFAULT_REVENUE_THRESHOLD: u64 = 10_000;
pub const DEFAULT_BENFORD_THRESHOLD: u64 = 15;

/// Credit check thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Minimum total revenue over the submitted orders
    pub revenue_threshold: u64,

    /// Exclusive upper bound for the Benford score (lower score = more natural data)
    pub benford_threshold: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            revenue_threshold: DEFAULT_REVENUE_THRESHOLD,
            benford_threshold: DEFAULT_BENFORD_THRESHOLD,
        }
    }
}

impl Config {
    /// Load thresholds from environment variables, falling back to the defaults
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load thresholds through an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Config {
            revenue_threshold: lookup("REVENUE_THRESHOLD")
                .unwrap_or_else(|| DEFAULT_REVENUE_THRESHOLD.to_string())
                .trim()
                .parse()
                .context("REVENUE_THRESHOLD must be a non-negative integer")?,

            benford_threshold: lookup("BENFORD_THRESHOLD")
                .unwrap_or_else(|| DEFAULT_BENFORD_THRESHOLD.to_string())
                .trim()
                .parse()
                .context("BENFORD_THRESHOLD must be a non-negative integer")?,
        };
        config.validate()?;

        tracing::debug!(
            revenue_threshold = config.revenue_threshold,
            benford_threshold = config.benford_threshold,
            "credit check config loaded"
        );
        Ok(config)
    }

    /// Check both thresholds fit the 64-bit comparators
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.revenue_threshold <= MAX_64BIT,
            "REVENUE_THRESHOLD {} exceeds {}",
            self.revenue_threshold,
            MAX_64BIT
        );
        ensure!(
            self.benford_threshold <= MAX_64BIT,
            "BENFORD_THRESHOLD {} exceeds {}",
            self.benford_threshold,
            MAX_64BIT
        );
        Ok(())
    }
}
