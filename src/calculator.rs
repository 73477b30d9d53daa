use crate::catalog::DEFAULT_BREAKPOINTS;
use crate::error::CalcError;
use crate::types::{
    CatalogItem, LineInput, LineResult, PricingConfig, Report, ReportTotals, TierConfig,
};
use tracing::{debug, warn};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Price every catalog item and roll the lines up into a report, using the
/// standard global tier breakpoints.
pub fn compute_report(
    catalog: &[CatalogItem],
    tiers: &TierConfig,
    margin_rate: f64,
    quantities: &LineInput,
) -> Result<Report, CalcError> {
    compute_report_with_breakpoints(catalog, tiers, margin_rate, &DEFAULT_BREAKPOINTS, quantities)
}

/// Same as [`compute_report`] with everything taken from a `PricingConfig`.
pub fn evaluate(config: &PricingConfig, quantities: &LineInput) -> Result<Report, CalcError> {
    compute_report_with_breakpoints(
        &config.catalog(),
        &config.tier_config(),
        config.margin_rate,
        &config.breakpoints,
        quantities,
    )
}

pub fn compute_report_with_breakpoints(
    catalog: &[CatalogItem],
    tiers: &TierConfig,
    margin_rate: f64,
    breakpoints: &[u64],
    quantities: &LineInput,
) -> Result<Report, CalcError> {
    if catalog.is_empty() {
        return Err(CalcError::invalid("catalog", "catalog is empty"));
    }
    if !margin_rate.is_finite() || margin_rate < 0.0 {
        return Err(CalcError::invalid(
            "margin rate",
            format!("must be a non-negative number, got {}", margin_rate),
        ));
    }
    for name in quantities.keys() {
        if !catalog.iter().any(|item| &item.name == name) {
            warn!(item = %name, "quantity given for an item outside the catalog; ignored");
        }
    }

    let mut lines = Vec::with_capacity(catalog.len());
    let mut totals = ReportTotals::default();
    for item in catalog {
        let raw = quantities.get(&item.name).copied().unwrap_or(0);
        let quantity = u64::try_from(raw).map_err(|_| {
            CalcError::invalid(item.name.clone(), format!("quantity {} is negative", raw))
        })?;
        let info = tiers.get(&item.tier).ok_or_else(|| CalcError::UnknownTier {
            item: item.name.clone(),
            tier: item.tier,
        })?;
        if !info.base_price.is_finite() || info.base_price <= 0.0 {
            return Err(CalcError::invalid(
                item.name.clone(),
                format!("base price {} for tier {} is not usable", info.base_price, item.tier),
            ));
        }

        let score = quantity
            .checked_mul(u64::from(item.tier))
            .ok_or_else(|| CalcError::invalid(item.name.clone(), "quantity too large"))?;
        let monthly_cost = quantity as f64 * info.base_price;
        let monthly_client_price = monthly_cost * (1.0 + margin_rate);
        let monthly_margin = monthly_client_price - monthly_cost;

        totals.total_score = totals
            .total_score
            .checked_add(score)
            .ok_or_else(|| CalcError::invalid(item.name.clone(), "quantity too large"))?;
        totals.monthly_cost += monthly_cost;
        totals.monthly_client_price += monthly_client_price;
        totals.monthly_margin += monthly_margin;

        lines.push(LineResult {
            name: item.name.clone(),
            quantity,
            tier: item.tier,
            tier_label: info.label.clone(),
            base_price: info.base_price,
            score,
            monthly_cost,
            monthly_client_price,
            monthly_margin,
        });
    }
    totals.annual_cost = totals.monthly_cost * MONTHS_PER_YEAR;
    totals.annual_client_price = totals.monthly_client_price * MONTHS_PER_YEAR;
    totals.annual_margin = totals.monthly_margin * MONTHS_PER_YEAR;

    let global_tier = classify_global_tier(totals.total_score, breakpoints);
    let global_label = tiers
        .get(&global_tier)
        .map(|t| t.label.clone())
        .ok_or_else(|| CalcError::UnknownTier {
            item: "global tier".to_string(),
            tier: global_tier,
        })?;
    debug!(
        total_score = totals.total_score,
        global_tier,
        monthly_client_price = totals.monthly_client_price,
        "report computed"
    );

    Ok(Report {
        lines,
        totals,
        global_tier,
        global_label,
        margin_rate,
    })
}

/// Global tier for a total score: tier 1 up to and including the first
/// breakpoint, one tier higher past each further breakpoint.
pub fn classify_global_tier(total_score: u64, breakpoints: &[u64]) -> u8 {
    let passed = breakpoints.iter().filter(|b| total_score > **b).count();
    (passed + 1) as u8
}
