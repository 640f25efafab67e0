//! Tunisian coins and bills with the bundle sizes used to build batches.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Amount;
use crate::errors::{ChallengeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenominationKind {
    Coin,
    Bill,
}

impl fmt::Display for DenominationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DenominationKind::Coin => "coin",
            DenominationKind::Bill => "bill",
        };
        f.write_str(label)
    }
}

/// A physical unit of currency the generator may bundle into batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denomination {
    pub id: &'static str,
    pub value: Amount,
    /// Natural piece counts for one batch, smallest first.
    pub bundle_sizes: &'static [u32],
    pub label: &'static str,
    pub display_value: &'static str,
    pub kind: DenominationKind,
}

const TABLE: [Denomination; 10] = [
    Denomination {
        id: "50m",
        value: Amount::from_millimes(50),
        bundle_sizes: &[10, 20, 40, 50, 100],
        label: "50 مليم",
        display_value: "50",
        kind: DenominationKind::Coin,
    },
    Denomination {
        id: "100m",
        value: Amount::from_millimes(100),
        bundle_sizes: &[10, 20, 50, 100],
        label: "100 مليم",
        display_value: "100",
        kind: DenominationKind::Coin,
    },
    Denomination {
        id: "200m",
        value: Amount::from_millimes(200),
        bundle_sizes: &[5, 10, 25, 50],
        label: "200 مليم",
        display_value: "200",
        kind: DenominationKind::Coin,
    },
    Denomination {
        id: "500m",
        value: Amount::from_millimes(500),
        bundle_sizes: &[2, 4, 10, 20],
        label: "500 مليم",
        display_value: "500",
        kind: DenominationKind::Coin,
    },
    Denomination {
        id: "1dt",
        value: Amount::from_dinars(1),
        bundle_sizes: &[1, 2, 5, 10],
        label: "1 دينار",
        display_value: "1",
        kind: DenominationKind::Coin,
    },
    Denomination {
        id: "2dt",
        value: Amount::from_dinars(2),
        bundle_sizes: &[1, 2, 5],
        label: "2 دينار",
        display_value: "2",
        kind: DenominationKind::Coin,
    },
    Denomination {
        id: "5dt",
        value: Amount::from_dinars(5),
        bundle_sizes: &[1, 2, 4],
        label: "5 دنانير",
        display_value: "5",
        kind: DenominationKind::Bill,
    },
    Denomination {
        id: "10dt",
        value: Amount::from_dinars(10),
        bundle_sizes: &[1, 2, 3],
        label: "10 دنانير",
        display_value: "10",
        kind: DenominationKind::Bill,
    },
    Denomination {
        id: "20dt",
        value: Amount::from_dinars(20),
        bundle_sizes: &[1, 2],
        label: "20 دينار",
        display_value: "20",
        kind: DenominationKind::Bill,
    },
    Denomination {
        id: "50dt",
        value: Amount::from_dinars(50),
        bundle_sizes: &[1],
        label: "50 دينار",
        display_value: "50",
        kind: DenominationKind::Bill,
    },
];

const DEFAULT_SELECTION: [&str; 5] = ["500m", "1dt", "2dt", "5dt", "10dt"];

/// Returns the full table, smallest value first.
pub fn denominations() -> &'static [Denomination] {
    &TABLE
}

pub fn denomination_by_id(id: &str) -> Option<&'static Denomination> {
    let needle = id.trim().to_ascii_lowercase();
    TABLE.iter().find(|denom| denom.id == needle)
}

pub fn denomination_by_value(value: Amount) -> Option<&'static Denomination> {
    TABLE.iter().find(|denom| denom.value == value)
}

/// Ids pre-selected when a new goal is drafted.
pub fn default_selection() -> Vec<String> {
    DEFAULT_SELECTION.iter().map(|id| id.to_string()).collect()
}

/// Resolves ids (`"500m"`) or decimal values (`"0.5"`) into table values,
/// keeping table order and dropping duplicates.
pub fn resolve_denominations<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Amount>> {
    let mut selected = Vec::with_capacity(tokens.len());
    for token in tokens {
        let raw = token.as_ref();
        let denom = denomination_by_id(raw)
            .or_else(|| Amount::parse(raw).ok().and_then(denomination_by_value))
            .ok_or_else(|| ChallengeError::UnknownDenomination(raw.trim().to_string()))?;
        if !selected.contains(&denom.value) {
            selected.push(denom.value);
        }
    }
    selected.sort();
    Ok(selected)
}

impl Denomination {
    /// Bundle sizes for a value, or a single piece when the value is not in the table.
    pub fn bundle_sizes_for(value: Amount) -> &'static [u32] {
        denomination_by_value(value)
            .map(|denom| denom.bundle_sizes)
            .unwrap_or(&[1])
    }
}
