// Default catalog, tier membership and pricing configuration.
//
// Nothing here is mutable global state: the defaults are built into a
// `PricingConfig` value which callers pass to the calculator explicitly, and
// a TOML file can replace any part of it.
use crate::error::AppError;
use crate::types::{CatalogItem, LegendRow, PricingConfig, TierConfig, TierDefinition, TierInfo};
use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_MARGIN_RATE: f64 = 0.4;
pub const DEFAULT_BREAKPOINTS: [u64; 2] = [30, 60];
pub const MAX_TIER: u8 = 3;

/// Technologies shown to the user, in display order.
pub const TECHNOLOGIES: [&str; 25] = [
    "Application Discovery Services",
    "Application Services",
    "Artificial Intelligence",
    "Artificial Intelligence / Machine Learning",
    "Automated Cloud Management Service",
    "Big Data",
    "Business Productivity",
    "Compute",
    "Database",
    "Developer Tools",
    "Disaster Recovery Services",
    "Game Development",
    "Hybrid Cloud",
    "Internet of Things",
    "Management Tools",
    "Migration Services",
    "Mobile Services",
    "Networking",
    "Robotics Development",
    "Security & Identity, Compliance",
    "Software MarketPlace",
    "Storage",
    "Tomcat",
    "WebLogic",
    "Data Guard",
];

const TIER1_MEMBERS: [&str; 6] = [
    "Storage",
    "Mobile Services",
    "Developer Tools",
    "Application Discovery Services",
    "Software MarketPlace",
    "Internet of Things",
];

const TIER2_MEMBERS: [&str; 6] = [
    "Compute",
    "Networking",
    "Hybrid Cloud",
    "Application Services",
    "Business Productivity",
    "Migration Services",
];

// "Development & Testing" is never displayed; kept so custom catalogs that
// list it still resolve to tier 3.
const TIER3_MEMBERS: [&str; 12] = [
    "Database",
    "WebLogic",
    "Tomcat",
    "Data Guard",
    "Big Data",
    "Artificial Intelligence",
    "Security & Identity, Compliance",
    "Disaster Recovery Services",
    "Management Tools",
    "Automated Cloud Management Service",
    "Development & Testing",
    "Robotics Development",
];

/// Service scope per global tier, lowest first.
const TIER_SCOPES: [&str; 3] = [
    "Monitoreo y respuesta reactiva",
    "Nivel 1 + Tareas operativas, actualizaciones, respaldos",
    "Nivel 1 y 2 + Gestión proactiva, hardening, tuning, DR, etc.",
];

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            technologies: owned(&TECHNOLOGIES),
            tiers: vec![
                TierDefinition {
                    level: 1,
                    base_price: 50.0,
                    label: "🟢 Nivel 1 - Bajo".to_string(),
                    members: owned(&TIER1_MEMBERS),
                },
                TierDefinition {
                    level: 2,
                    base_price: 60.0,
                    label: "🟡 Nivel 2 - Medio".to_string(),
                    members: owned(&TIER2_MEMBERS),
                },
                TierDefinition {
                    level: 3,
                    base_price: 120.0,
                    label: "🔴 Nivel 3 - Alto".to_string(),
                    members: owned(&TIER3_MEMBERS),
                },
            ],
            margin_rate: DEFAULT_MARGIN_RATE,
            breakpoints: DEFAULT_BREAKPOINTS.to_vec(),
        }
    }
}

impl PricingConfig {
    /// Tier for a technology name: the highest tier whose membership list
    /// contains it, or tier 1 when no list does.
    pub fn resolve_tier(&self, name: &str) -> u8 {
        self.tiers
            .iter()
            .filter(|t| t.members.iter().any(|m| m == name))
            .map(|t| t.level)
            .max()
            .unwrap_or(1)
    }

    pub fn catalog(&self) -> Vec<CatalogItem> {
        self.technologies
            .iter()
            .map(|name| CatalogItem::new(name.clone(), self.resolve_tier(name)))
            .collect()
    }

    pub fn tier_config(&self) -> TierConfig {
        self.tiers
            .iter()
            .map(|t| {
                (
                    t.level,
                    TierInfo {
                        base_price: t.base_price,
                        label: t.label.clone(),
                    },
                )
            })
            .collect()
    }

    pub fn label_for(&self, tier: u8) -> Option<&str> {
        self.tiers
            .iter()
            .find(|t| t.level == tier)
            .map(|t| t.label.as_str())
    }

    /// Classification legend derived from the breakpoints: one row per
    /// global tier with its score range and service scope.
    pub fn tier_legend(&self) -> Vec<LegendRow> {
        let mut rows = Vec::with_capacity(self.breakpoints.len() + 1);
        let mut lower = 0u64;
        for idx in 0..=self.breakpoints.len() {
            let tier = (idx + 1) as u8;
            let score_range = match self.breakpoints.get(idx) {
                Some(upper) => format!("{} - {}", lower, upper),
                None => format!("{} or more", lower),
            };
            if let Some(upper) = self.breakpoints.get(idx) {
                lower = upper + 1;
            }
            rows.push(LegendRow {
                score_range,
                tier: self
                    .label_for(tier)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Nivel {}", tier)),
                scope: TIER_SCOPES.get(idx).copied().unwrap_or_default().to_string(),
            });
        }
        rows
    }

    /// Check a configuration before use: tier levels unique and within
    /// 1..=3, base prices positive, margin non-negative, breakpoints strictly
    /// ascending with at most one per tier boundary.
    pub fn validate(&self) -> Result<(), AppError> {
        let invalid = |msg: String| Err(AppError::InvalidConfig(msg));
        if self.technologies.is_empty() {
            return invalid("no technologies listed".to_string());
        }
        let mut seen = Vec::with_capacity(self.tiers.len());
        for t in &self.tiers {
            if !(1..=MAX_TIER).contains(&t.level) {
                return invalid(format!("tier level {} is outside 1..={}", t.level, MAX_TIER));
            }
            if seen.contains(&t.level) {
                return invalid(format!("tier level {} is defined more than once", t.level));
            }
            seen.push(t.level);
            if !t.base_price.is_finite() || t.base_price <= 0.0 {
                return invalid(format!(
                    "tier {} base price must be positive, got {}",
                    t.level, t.base_price
                ));
            }
        }
        if !self.margin_rate.is_finite() || self.margin_rate < 0.0 {
            return invalid(format!(
                "margin rate must be non-negative, got {}",
                self.margin_rate
            ));
        }
        if self.breakpoints.len() >= usize::from(MAX_TIER) {
            return invalid(format!(
                "at most {} breakpoints allowed, got {}",
                MAX_TIER - 1,
                self.breakpoints.len()
            ));
        }
        if self.breakpoints.windows(2).any(|w| w[0] >= w[1]) {
            return invalid(format!(
                "breakpoints must be strictly ascending, got {:?}",
                self.breakpoints
            ));
        }
        Ok(())
    }
}

/// Load a pricing configuration from a TOML file. Keys missing from the file
/// keep their default values.
pub fn load_config(path: &Path) -> Result<PricingConfig, AppError> {
    let text = std::fs::read_to_string(path)?;
    let config: PricingConfig = toml::from_str(&text)?;
    config.validate()?;
    info!(
        path = %path.display(),
        technologies = config.technologies.len(),
        tiers = config.tiers.len(),
        "loaded pricing configuration"
    );
    debug!(margin_rate = config.margin_rate, breakpoints = ?config.breakpoints);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_keeps_display_order() {
        let config = PricingConfig::default();
        let catalog = config.catalog();
        assert_eq!(catalog.len(), 25);
        assert_eq!(catalog[0].name, "Application Discovery Services");
        assert_eq!(catalog[24].name, "Data Guard");
    }

    #[test]
    fn tiers_follow_membership_lists() {
        let config = PricingConfig::default();
        assert_eq!(config.resolve_tier("Storage"), 1);
        assert_eq!(config.resolve_tier("Compute"), 2);
        assert_eq!(config.resolve_tier("Database"), 3);
        assert_eq!(config.resolve_tier("Development & Testing"), 3);
    }

    #[test]
    fn unlisted_technology_defaults_to_tier_one() {
        let config = PricingConfig::default();
        assert_eq!(config.resolve_tier("Game Development"), 1);
        assert_eq!(
            config.resolve_tier("Artificial Intelligence / Machine Learning"),
            1
        );
    }

    #[test]
    fn highest_tier_wins_when_listed_twice() {
        let mut config = PricingConfig::default();
        config.tiers[0].members.push("Database".to_string());
        config.tiers[1].members.push("Database".to_string());
        assert_eq!(config.resolve_tier("Database"), 3);
    }

    #[test]
    fn legend_ranges_match_breakpoints() {
        let legend = PricingConfig::default().tier_legend();
        let ranges: Vec<&str> = legend.iter().map(|r| r.score_range.as_str()).collect();
        assert_eq!(ranges, vec!["0 - 30", "31 - 60", "61 or more"]);
        assert_eq!(legend[2].tier, "🔴 Nivel 3 - Alto");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.toml");
        std::fs::write(
            &path,
            r#"
margin_rate = 0.25
breakpoints = [10, 20]
"#,
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.margin_rate, 0.25);
        assert_eq!(config.breakpoints, vec![10, 20]);
        assert_eq!(config.technologies.len(), 25);
        assert_eq!(config.tiers.len(), 3);
    }

    #[test]
    fn toml_can_replace_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.toml");
        std::fs::write(
            &path,
            r#"
technologies = ["Queue", "Cache"]

[[tiers]]
level = 1
base_price = 10.0
label = "Basic"

[[tiers]]
level = 2
base_price = 25.0
label = "Managed"
members = ["Cache"]
"#,
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        let catalog = config.catalog();
        assert_eq!(catalog, vec![CatalogItem::new("Queue", 1), CatalogItem::new("Cache", 2)]);
        assert_eq!(config.tier_config()[&2].base_price, 25.0);
    }

    #[test]
    fn example_config_parses() {
        let config: PricingConfig =
            toml::from_str(include_str!("../config/pricing.example.toml")).unwrap();
        assert_eq!(config.technologies.len(), 5);
        assert_eq!(config.resolve_tier("Big Data"), 3);
        assert_eq!(config.margin_rate, DEFAULT_MARGIN_RATE);
    }

    fn load_text(text: &str) -> Result<PricingConfig, AppError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.toml");
        std::fs::write(&path, text).unwrap();
        load_config(&path)
    }

    fn assert_rejected(text: &str, needle: &str) {
        match load_text(text) {
            Err(AppError::InvalidConfig(msg)) => {
                assert!(msg.contains(needle), "unexpected message: {}", msg)
            }
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(PricingConfig::default().validate().is_ok());
    }

    #[test]
    fn duplicate_tier_level_is_rejected() {
        assert_rejected(
            r#"
[[tiers]]
level = 1
base_price = 50.0
label = "Basic"

[[tiers]]
level = 1
base_price = 999.0
label = "Dup"
"#,
            "more than once",
        );
    }

    #[test]
    fn tier_level_out_of_range_is_rejected() {
        assert_rejected(
            r#"
[[tiers]]
level = 0
base_price = 50.0
label = "Zero"
"#,
            "outside 1..=3",
        );
        assert_rejected(
            r#"
[[tiers]]
level = 4
base_price = 50.0
label = "Four"
"#,
            "outside 1..=3",
        );
    }

    #[test]
    fn non_positive_base_price_is_rejected() {
        assert_rejected(
            r#"
[[tiers]]
level = 1
base_price = 0.0
label = "Free"
"#,
            "base price must be positive",
        );
    }

    #[test]
    fn unsorted_or_excess_breakpoints_are_rejected() {
        assert_rejected("breakpoints = [60, 30]", "strictly ascending");
        assert_rejected("breakpoints = [30, 30]", "strictly ascending");
        assert_rejected("breakpoints = [10, 20, 30]", "at most 2");
    }

    #[test]
    fn negative_margin_and_empty_catalog_are_rejected() {
        assert_rejected("margin_rate = -0.1", "margin rate");
        assert_rejected("technologies = []", "no technologies");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.toml");
        std::fs::write(&path, "margin_rate = \"lots\"").unwrap();
        assert!(matches!(load_config(&path), Err(AppError::Config(_))));
    }
}
