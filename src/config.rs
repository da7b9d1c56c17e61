//! Network configuration and its TOML loader.
//!
//! A config file looks like:
//!
//! ```toml
//! inbox_capacity = 100
//!
//! [delivery]
//! policy = "within-range"
//! max_range = 15
//! ```
//!
//! Every field is optional; an empty document yields [`NetworkConfig::default`].

use anyhow::{Context, ensure};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::geometry::within_range;
use super::types::Position;

/// Eligibility predicate deciding which members hear a shout.
///
/// In TOML this is the `[delivery]` table. `max_range` is required by
/// `within-range` and rejected with `broadcast-all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawDeliveryPolicy")]
pub enum DeliveryPolicy {
    /// Every other member hears every shout, whatever the distance.
    #[default]
    BroadcastAll,
    /// Only members at most `max_range` metres from the shouter hear it.
    WithinRange { max_range: u64 },
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
enum PolicyKind {
    BroadcastAll,
    WithinRange,
}

/// On-disk shape of `[delivery]`, checked before becoming a [`DeliveryPolicy`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeliveryPolicy {
    policy: PolicyKind,
    #[serde(default)]
    max_range: Option<u64>,
}

impl TryFrom<RawDeliveryPolicy> for DeliveryPolicy {
    type Error = String;

    fn try_from(raw: RawDeliveryPolicy) -> Result<Self, Self::Error> {
        match (raw.policy, raw.max_range) {
            (PolicyKind::BroadcastAll, None) => Ok(DeliveryPolicy::BroadcastAll),
            (PolicyKind::BroadcastAll, Some(max_range)) => {
                Err(format!("max_range = {max_range} is only valid with policy = \"within-range\""))
            }
            (PolicyKind::WithinRange, Some(max_range)) => Ok(DeliveryPolicy::WithinRange { max_range }),
            (PolicyKind::WithinRange, None) => Err("policy = \"within-range\" requires max_range".to_string()),
        }
    }
}

impl DeliveryPolicy {
    /// Does a member standing at `candidate` hear a shout made at `origin`?
    pub fn admits(&self, origin: Position, candidate: Position) -> bool {
        match self {
            DeliveryPolicy::BroadcastAll => true,
            DeliveryPolicy::WithinRange { max_range } => within_range(origin, candidate, *max_range),
        }
    }
}

/// Settings shared by every member of a network.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// Eligibility predicate applied on every emission.
    #[serde(default)]
    pub delivery: DeliveryPolicy,
    /// Maximum messages kept per inbox. `None` keeps everything; when set,
    /// the oldest message is dropped to make room for a new one.
    #[serde(default)]
    pub inbox_capacity: Option<usize>,
}

impl NetworkConfig {
    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(data: &str) -> anyhow::Result<Self> {
        let config: NetworkConfig = toml::from_str(data).context("Invalid TOML format")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    /// Check settings that the TOML shape alone cannot rule out.
    ///
    /// # Returns
    /// * `Ok(())` if the config can be used to build a network
    /// * `Err` naming the offending field otherwise
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(capacity) = self.inbox_capacity {
            ensure!(capacity > 0, "inbox_capacity must be at least 1, got {capacity}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process;

    #[test]
    fn empty_document_is_broadcast_all_unbounded() {
        let config = NetworkConfig::from_toml_str("").unwrap();
        assert_eq!(config.delivery, DeliveryPolicy::BroadcastAll);
        assert_eq!(config.inbox_capacity, None);
    }

    #[test]
    fn parses_range_policy() {
        let config = NetworkConfig::from_toml_str(
            r#"
            inbox_capacity = 3

            [delivery]
            policy = "within-range"
            max_range = 15
            "#,
        )
        .unwrap();
        assert_eq!(config.delivery, DeliveryPolicy::WithinRange { max_range: 15 });
        assert_eq!(config.inbox_capacity, Some(3));
    }

    #[test]
    fn parses_explicit_broadcast_policy() {
        let config = NetworkConfig::from_toml_str("[delivery]\npolicy = \"broadcast-all\"\n").unwrap();
        assert_eq!(config.delivery, DeliveryPolicy::BroadcastAll);
    }

    #[test]
    fn rejects_zero_inbox_capacity() {
        let err = NetworkConfig::from_toml_str("inbox_capacity = 0").unwrap_err();
        assert!(err.to_string().contains("inbox_capacity"));
    }

    #[test]
    fn rejects_unknown_policy_and_fields() {
        assert!(NetworkConfig::from_toml_str("[delivery]\npolicy = \"telepathy\"\n").is_err());
        assert!(NetworkConfig::from_toml_str("volume = 11").is_err());
        assert!(NetworkConfig::from_toml_str("[delivery]\npolicy = \"within-range\"\nmax_range = -1\n").is_err());
    }

    #[test]
    fn rejects_range_on_broadcast_policy() {
        let err = NetworkConfig::from_toml_str("[delivery]\npolicy = \"broadcast-all\"\nmax_range = 5\n").unwrap_err();
        assert!(format!("{err:#}").contains("max_range"));
    }

    #[test]
    fn rejects_range_policy_without_range() {
        let err = NetworkConfig::from_toml_str("[delivery]\npolicy = \"within-range\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("requires max_range"));
    }

    #[test]
    fn rejects_unknown_delivery_fields() {
        assert!(NetworkConfig::from_toml_str("[delivery]\npolicy = \"within-range\"\nmax_range = 5\nloudness = 3\n").is_err());
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!("shouty-config-{}.toml", process::id()));
        fs::write(&path, "[delivery]\npolicy = \"within-range\"\nmax_range = 40\n").unwrap();
        let config = NetworkConfig::load(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(config.unwrap().delivery, DeliveryPolicy::WithinRange { max_range: 40 });
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/shouty/config.toml");
        let err = NetworkConfig::load(path).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/shouty/config.toml"));
    }

    #[test]
    fn range_policy_admits_both_directions() {
        let policy = DeliveryPolicy::WithinRange { max_range: 10 };
        assert!(policy.admits(0, 10));
        assert!(policy.admits(0, -10));
        assert!(!policy.admits(0, 11));
        assert!(DeliveryPolicy::BroadcastAll.admits(0, i64::MAX));
    }
}
