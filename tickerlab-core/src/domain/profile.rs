//! Instrument profiles: which transformations an instrument gets.

use crate::pipeline::Transform;
use serde::{Deserialize, Serialize};

/// Instrument type axis of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    /// Neither stock nor ETF was requested. Reported as an ETF, matching the
    /// historical default of the base ticker type, but no ETF pruning runs.
    #[default]
    Unclassified,
    Stock,
    Etf,
}

/// The `{pays_dividends, asset_type}` pair that selects an instrument's
/// transformation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InstrumentProfile {
    pub pays_dividends: bool,
    pub asset_type: AssetType,
}

impl InstrumentProfile {
    pub const STOCK: Self = Self::new(false, AssetType::Stock);
    pub const ETF: Self = Self::new(false, AssetType::Etf);
    pub const DIVIDEND: Self = Self::new(true, AssetType::Unclassified);
    pub const DIVIDEND_STOCK: Self = Self::new(true, AssetType::Stock);
    pub const DIVIDEND_ETF: Self = Self::new(true, AssetType::Etf);

    pub const fn new(pays_dividends: bool, asset_type: AssetType) -> Self {
        Self {
            pays_dividends,
            asset_type,
        }
    }

    /// Only an explicit stock profile reports `false`.
    pub const fn is_etf(&self) -> bool {
        !matches!(self.asset_type, AssetType::Stock)
    }

    /// Transformations to apply, in order, to the shared price frame.
    pub fn transforms(&self) -> Vec<Transform> {
        let mut steps = Vec::with_capacity(2);
        if self.asset_type == AssetType::Etf {
            steps.push(Transform::DropCapitalGains);
        }
        if self.pays_dividends {
            steps.push(Transform::DeriveDividends);
        }
        steps
    }
}
