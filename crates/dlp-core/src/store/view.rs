//! Filter and sort settings plus the projection they drive.

use crate::errors::CoreError;
use crate::types::{RiskLevel, Strategy, VaultData};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Apy,
    Tvl,
    Name,
    Performance,
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apy" => Ok(SortKey::Apy),
            "tvl" => Ok(SortKey::Tvl),
            "name" => Ok(SortKey::Name),
            "performance" => Ok(SortKey::Performance),
            _ => Err(CoreError::invalid_argument("sort", s, "one of apy, tvl, name, performance")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(CoreError::invalid_argument("direction", s, "asc or desc")),
        }
    }
}

/// Active view settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultFilters {
    pub strategy: Option<Strategy>,
    pub risk: Option<RiskLevel>,
    pub sort_by: SortKey,
    pub sort_direction: SortDirection,
}

impl Default for VaultFilters {
    fn default() -> Self {
        Self {
            strategy: None,
            risk: None,
            sort_by: SortKey::Apy,
            sort_direction: SortDirection::Desc,
        }
    }
}

impl VaultFilters {
    pub fn matches(&self, vault: &VaultData) -> bool {
        if let Some(strategy) = self.strategy {
            if vault.strategy != strategy {
                return false;
            }
        }
        if let Some(risk) = self.risk {
            if vault.risk_level() != risk {
                return false;
            }
        }
        true
    }
}

fn compare_by(key: SortKey, a: &VaultData, b: &VaultData) -> Ordering {
    match key {
        SortKey::Apy => a.apy.total_cmp(&b.apy),
        SortKey::Tvl => a.tvl.total_cmp(&b.tvl),
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Performance => a.performance.total_return.total_cmp(&b.performance.total_return),
    }
}

/// Filter then stable-sort `vaults` without touching the input.
///
/// Descending order reverses the comparator, not the output, so ties keep
/// their original relative order in both directions.
pub fn filter_and_sort<'a>(vaults: &'a [VaultData], filters: &VaultFilters) -> Vec<&'a VaultData> {
    let mut view: Vec<&VaultData> = vaults.iter().filter(|v| filters.matches(v)).collect();
    view.sort_by(|a, b| {
        let ordering = compare_by(filters.sort_by, a, b);
        match filters.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    view
}
