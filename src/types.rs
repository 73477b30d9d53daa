use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tabled::Tabled;

/// A technology category with its statically assigned tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub name: String,
    pub tier: u8,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, tier: u8) -> Self {
        Self {
            name: name.into(),
            tier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierInfo {
    pub base_price: f64,
    pub label: String,
}

/// Tier level -> price and display label.
pub type TierConfig = BTreeMap<u8, TierInfo>;

/// Item name -> quantity as entered. Signed so that bad input can be
/// reported instead of silently wrapping.
pub type LineInput = HashMap<String, i64>;

/// One tier as written in a pricing config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDefinition {
    pub level: u8,
    pub base_price: f64,
    pub label: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Immutable pricing configuration handed to the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub technologies: Vec<String>,
    pub tiers: Vec<TierDefinition>,
    pub margin_rate: f64,
    pub breakpoints: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineResult {
    pub name: String,
    pub quantity: u64,
    pub tier: u8,
    pub tier_label: String,
    pub base_price: f64,
    pub score: u64,
    pub monthly_cost: f64,
    pub monthly_client_price: f64,
    pub monthly_margin: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportTotals {
    pub total_score: u64,
    pub monthly_cost: f64,
    pub monthly_client_price: f64,
    pub monthly_margin: f64,
    pub annual_cost: f64,
    pub annual_client_price: f64,
    pub annual_margin: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub lines: Vec<LineResult>,
    pub totals: ReportTotals,
    pub global_tier: u8,
    pub global_label: String,
    pub margin_rate: f64,
}

impl Report {
    /// Lines with a non-zero quantity, in catalog order.
    pub fn charted_lines(&self) -> impl Iterator<Item = &LineResult> {
        self.lines.iter().filter(|l| l.quantity > 0)
    }
}

/// Row of the per-item evaluation sheet.
#[derive(Debug, Serialize, Clone)]
pub struct EvaluationRow {
    #[serde(rename = "Technology")]
    pub technology: String,
    #[serde(rename = "Quantity")]
    pub quantity: u64,
    #[serde(rename = "Tier")]
    pub tier: u8,
    #[serde(rename = "Range")]
    pub range: String,
    #[serde(rename = "BasePrice")]
    pub base_price: f64,
    #[serde(rename = "Score")]
    pub score: u64,
    #[serde(rename = "MonthlyCost")]
    pub monthly_cost: f64,
    #[serde(rename = "MonthlyClientPrice")]
    pub monthly_client_price: f64,
    #[serde(rename = "MonthlyMargin")]
    pub monthly_margin: f64,
}

/// Row of the on-screen detail table.
#[derive(Debug, Tabled, Clone)]
pub struct DetailRow {
    #[tabled(rename = "Technology")]
    pub technology: String,
    #[tabled(rename = "Quantity")]
    pub quantity: u64,
    #[tabled(rename = "Range")]
    pub range: String,
    #[tabled(rename = "Score")]
    pub score: u64,
    #[tabled(rename = "MonthlyClientPrice")]
    pub monthly_client_price: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct FinancialRow {
    #[tabled(rename = "")]
    pub period: String,
    #[tabled(rename = "TotalScore")]
    pub total_score: String,
    #[tabled(rename = "Cost")]
    pub cost: String,
    #[tabled(rename = "Margin")]
    pub margin_rate: String,
    #[tabled(rename = "ClientPrice")]
    pub client_price: String,
    #[tabled(rename = "Profit")]
    pub profit: String,
}

/// One line of the tier classification legend.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct LegendRow {
    #[serde(rename = "TotalScore")]
    #[tabled(rename = "TotalScore")]
    pub score_range: String,
    #[serde(rename = "Tier")]
    #[tabled(rename = "Tier")]
    pub tier: String,
    #[serde(rename = "Scope")]
    #[tabled(rename = "Scope")]
    pub scope: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub generated_at: String,
    pub technologies_used: usize,
    pub global_tier: u8,
    pub global_label: String,
    pub margin_rate: f64,
    #[serde(flatten)]
    pub totals: ReportTotals,
}
