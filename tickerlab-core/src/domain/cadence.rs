//! Dividend payment cadence and its classification from payment gaps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How many times per year a dividend is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentCadence {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl PaymentCadence {
    /// Longest median gap, in days, still classified as monthly.
    pub const MONTHLY_MAX_GAP_DAYS: f64 = 70.0;
    /// Longest median gap, in days, still classified as quarterly.
    pub const QUARTERLY_MAX_GAP_DAYS: f64 = 135.0;
    /// Longest median gap, in days, still classified as semi-annual.
    pub const SEMI_ANNUAL_MAX_GAP_DAYS: f64 = 240.0;

    /// Classify a median gap between payments.
    ///
    /// Upper bounds are inclusive. Returns `None` only for NaN.
    pub fn from_gap_days(days: f64) -> Option<Self> {
        if days.is_nan() {
            None
        } else if days <= Self::MONTHLY_MAX_GAP_DAYS {
            Some(Self::Monthly)
        } else if days <= Self::QUARTERLY_MAX_GAP_DAYS {
            Some(Self::Quarterly)
        } else if days <= Self::SEMI_ANNUAL_MAX_GAP_DAYS {
            Some(Self::SemiAnnual)
        } else {
            Some(Self::Annual)
        }
    }

    pub const fn payments_per_year(self) -> usize {
        match self {
            Self::Annual => 1,
            Self::SemiAnnual => 2,
            Self::Quarterly => 4,
            Self::Monthly => 12,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::SemiAnnual => "semi-annual",
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PaymentCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x/yr)", self.label(), self.payments_per_year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_inclusive_upper() {
        assert_eq!(PaymentCadence::from_gap_days(70.0), Some(PaymentCadence::Monthly));
        assert_eq!(PaymentCadence::from_gap_days(70.0001), Some(PaymentCadence::Quarterly));
        assert_eq!(PaymentCadence::from_gap_days(135.0), Some(PaymentCadence::Quarterly));
        assert_eq!(PaymentCadence::from_gap_days(135.5), Some(PaymentCadence::SemiAnnual));
        assert_eq!(PaymentCadence::from_gap_days(240.0), Some(PaymentCadence::SemiAnnual));
        assert_eq!(PaymentCadence::from_gap_days(240.0001), Some(PaymentCadence::Annual));
    }

    #[test]
    fn test_typical_gaps() {
        assert_eq!(PaymentCadence::from_gap_days(30.0), Some(PaymentCadence::Monthly));
        assert_eq!(PaymentCadence::from_gap_days(91.0), Some(PaymentCadence::Quarterly));
        assert_eq!(PaymentCadence::from_gap_days(182.0), Some(PaymentCadence::SemiAnnual));
        assert_eq!(PaymentCadence::from_gap_days(365.0), Some(PaymentCadence::Annual));
    }

    #[test]
    fn test_nan_gap_is_unclassified() {
        assert_eq!(PaymentCadence::from_gap_days(f64::NAN), None);
    }

    #[test]
    fn test_payments_per_year() {
        let counts: Vec<usize> = [
            PaymentCadence::Annual,
            PaymentCadence::SemiAnnual,
            PaymentCadence::Quarterly,
            PaymentCadence::Monthly,
        ]
        .iter()
        .map(|c| c.payments_per_year())
        .collect();
        assert_eq!(counts, vec![1, 2, 4, 12]);
    }

    #[test]
    fn test_display() {
        assert_eq!(PaymentCadence::Quarterly.to_string(), "quarterly (4x/yr)");
    }
}
