//! Engine configuration and the amendment rules table.

use hashbrown::HashSet;
use strum_macros::{AsRefStr, Display, EnumIter};

/// Amendment gates the engine consults. The default rules table enables
/// the modern set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
pub enum Feature {
    DeletableAccounts,
    DepositPreauth,
    PermissionedDex,
    Fix1578,
    DeepFreeze,
}

#[derive(Debug, Clone)]
pub struct Rules {
    features: HashSet<Feature>,
}

impl Default for Rules {
    fn default() -> Self {
        let mut features = HashSet::new();
        features.insert(Feature::DeletableAccounts);
        features.insert(Feature::DepositPreauth);
        features.insert(Feature::Fix1578);
        features.insert(Feature::DeepFreeze);
        Rules { features }
    }
}

impl Rules {
    pub fn none() -> Self {
        Rules {
            features: HashSet::new(),
        }
    }

    pub fn enabled(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn with(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    pub fn without(mut self, feature: Feature) -> Self {
        self.features.remove(&feature);
        self
    }

    pub fn deletable_accounts_enabled(&self) -> bool {
        self.enabled(Feature::DeletableAccounts)
    }

    pub fn deposit_preauth_enabled(&self) -> bool {
        self.enabled(Feature::DepositPreauth)
    }

    pub fn permissioned_dex_enabled(&self) -> bool {
        self.enabled(Feature::PermissionedDex)
    }

    pub fn fix1578_enabled(&self) -> bool {
        self.enabled(Feature::Fix1578)
    }

    pub fn deep_freeze_enabled(&self) -> bool {
        self.enabled(Feature::DeepFreeze)
    }
}

/// Per-ledger parameters handed to the engine by its caller.
#[derive(Debug, Clone)]
pub struct Config {
    /// Minimum drops charged per transaction.
    pub base_fee: u64,
    /// Drops required for account existence.
    pub reserve_base: u64,
    /// Drops required per owned object beyond the first two.
    pub reserve_increment: u64,
    /// Sequence of the ledger being built.
    pub ledger_sequence: u32,
    /// Close time of the parent ledger, seconds since the ledger epoch.
    pub parent_close_time: u32,
    /// Relaxes the AccountDelete minimum-age rule.
    pub standalone: bool,
    pub rules: Rules,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_fee: 10,
            reserve_base: 10_000_000,
            reserve_increment: 2_000_000,
            ledger_sequence: 1,
            parent_close_time: 0,
            standalone: false,
            rules: Rules::default(),
        }
    }
}

impl Config {
    /// The floor an existing account's balance must stay above: the first
    /// two owned objects are free.
    pub fn reserve(&self, owner_count: u32) -> u64 {
        self.reserve_base
            + self
                .reserve_increment
                .saturating_mul(owner_count.saturating_sub(2) as u64)
    }

    /// The balance required to take on one more owned object: the floor
    /// at the incremented count, so the first two objects stay free.
    pub fn reserve_to_create(&self, owner_count_before: u32) -> u64 {
        self.reserve(owner_count_before.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_floor_first_two_free() {
        let config = Config::default();
        assert_eq!(config.reserve(0), 10_000_000);
        assert_eq!(config.reserve(2), 10_000_000);
        assert_eq!(config.reserve(3), 12_000_000);
    }

    #[test]
    fn test_reserve_to_create_matches_floor() {
        let config = Config::default();
        // The first two objects are free; the third raises the floor.
        assert_eq!(config.reserve_to_create(0), 10_000_000);
        assert_eq!(config.reserve_to_create(1), 10_000_000);
        assert_eq!(config.reserve_to_create(2), 12_000_000);
        assert_eq!(config.reserve_to_create(2), config.reserve(3));
    }

    #[test]
    fn test_rules_toggle() {
        let rules = Rules::default().without(Feature::Fix1578);
        assert!(!rules.fix1578_enabled());
        assert!(rules.deposit_preauth_enabled());
        assert!(!Rules::none().deletable_accounts_enabled());
    }
}
