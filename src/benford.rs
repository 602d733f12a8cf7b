//! Benford's-law score for order amounts
//!
//! Prepares the private `benfordScore` input of the credit check. The score
//! is a chi-square divergence between the observed leading-digit
//! distribution and Benford's distribution, scaled to `0..=100` where lower
//! means more natural-looking data.

use crate::error::{WitnessError, WitnessResult};

/// Expected share (in percent) of leading digits 1..=9 under Benford's law
pub const BENFORD_EXPECTED: [f64; 9] = [30.1, 17.6, 12.5, 9.7, 7.9, 6.7, 5.8, 5.1, 4.6];

/// Upper bound of the score
pub const MAX_SCORE: u64 = 100;

/// Leading decimal digit, `None` for zero
pub fn leading_digit(amount: u64) -> Option<usize> {
    if amount == 0 {
        return None;
    }
    let mut value = amount;
    while value >= 10 {
        value /= 10;
    }
    Some(value as usize)
}

/// Count of amounts per leading digit; index 0 holds digit 1
pub fn digit_counts(amounts: &[u64]) -> [u64; 9] {
    let mut counts = [0u64; 9];
    for digit in amounts.iter().filter_map(|amount| leading_digit(*amount)) {
        counts[digit - 1] += 1;
    }
    counts
}

/// Chi-square divergence of the leading-digit percentages from Benford's law.
///
/// Percentages are taken over all amounts, zeros included, so zero amounts
/// lower every observed share.
pub fn chi_square(amounts: &[u64]) -> WitnessResult<f64> {
    if amounts.is_empty() {
        return Err(WitnessError::InvalidInput {
            message: "Benford score needs at least one order".to_string(),
        });
    }

    let total = amounts.len() as f64;
    let chi: f64 = digit_counts(amounts)
        .iter()
        .zip(BENFORD_EXPECTED)
        .map(|(count, expected)| {
            let actual = *count as f64 / total * 100.0;
            (actual - expected).powi(2) / expected
        })
        .sum();
    Ok(chi)
}

/// Benford score `min(100, round(2 * chi))`
pub fn benford_score(amounts: &[u64]) -> WitnessResult<u64> {
    let chi = chi_square(amounts)?;
    let score = ((chi * 2.0).round() as u64).min(MAX_SCORE);

    tracing::debug!(orders = amounts.len(), chi, score, "benford score computed");
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Amounts whose leading digits follow `counts` (index 0 = digit 1)
    fn sample(counts: [usize; 9]) -> Vec<u64> {
        counts
            .iter()
            .enumerate()
            .flat_map(|(i, count)| std::iter::repeat(((i + 1) * 100 + 37) as u64).take(*count))
            .collect()
    }

    #[test]
    fn test_leading_digit() {
        assert_eq!(leading_digit(0), None);
        assert_eq!(leading_digit(7), Some(7));
        assert_eq!(leading_digit(10), Some(1));
        assert_eq!(leading_digit(98765), Some(9));
        assert_eq!(leading_digit(u64::MAX), Some(1));
    }

    #[test]
    fn test_digit_counts_skip_zero() {
        let counts = digit_counts(&[0, 1, 19, 250, 0, 9000]);
        assert_eq!(counts, [2, 1, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_benford_like_sample_scores_low() {
        let amounts = sample([30, 18, 12, 10, 8, 7, 6, 5, 4]);
        assert_eq!(amounts.len(), 100);
        assert_eq!(benford_score(&amounts).unwrap(), 0);
    }

    #[test]
    fn test_single_digit_sample_is_capped() {
        let amounts = vec![500u64; 100];
        assert_eq!(benford_score(&amounts).unwrap(), MAX_SCORE);
    }

    #[test]
    fn test_uniform_digits_score_high() {
        let amounts = sample([11, 11, 11, 11, 11, 11, 11, 11, 12]);
        let score = benford_score(&amounts).unwrap();
        assert!(score > 15, "uniform digits should fail the fraud check, got {}", score);
    }

    #[test]
    fn test_all_zero_amounts() {
        // Every share is 0%, so chi = Σ expected = 100.0
        let chi = chi_square(&[0, 0, 0]).unwrap();
        assert!((chi - 100.0).abs() < 1e-9);
        assert_eq!(benford_score(&[0, 0, 0]).unwrap(), MAX_SCORE);
    }

    #[test]
    fn test_empty_orders_rejected() {
        assert!(matches!(
            benford_score(&[]),
            Err(WitnessError::InvalidInput { .. })
        ));
    }
}
