// Terminal rendering of a computed report.
use crate::types::{DetailRow, FinancialRow, LegendRow, Report};
use crate::util::{format_currency, format_int, format_percent};
use tabled::{settings::Style, Table, Tabled};

const CHART_WIDTH: usize = 40;

pub fn render_table<T>(rows: &[T]) -> String
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(rows.to_vec()).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T])
where
    T: Tabled + Clone,
{
    println!("\n{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    println!("{}\n", render_table(rows));
}

pub fn detail_rows(report: &Report) -> Vec<DetailRow> {
    report
        .lines
        .iter()
        .map(|l| DetailRow {
            technology: l.name.clone(),
            quantity: l.quantity,
            range: l.tier_label.clone(),
            score: l.score,
            monthly_client_price: format_currency(l.monthly_client_price),
        })
        .collect()
}

pub fn financial_rows(report: &Report) -> Vec<FinancialRow> {
    let t = &report.totals;
    let margin = format_percent(report.margin_rate);
    vec![
        FinancialRow {
            period: "Monthly".to_string(),
            total_score: format_int(t.total_score),
            cost: format_currency(t.monthly_cost),
            margin_rate: margin.clone(),
            client_price: format_currency(t.monthly_client_price),
            profit: format_currency(t.monthly_margin),
        },
        FinancialRow {
            period: "Annual".to_string(),
            total_score: String::new(),
            cost: format_currency(t.annual_cost),
            margin_rate: margin,
            client_price: format_currency(t.annual_client_price),
            profit: format_currency(t.annual_margin),
        },
    ]
}

/// Horizontal bars of monthly client price for every line with a quantity.
pub fn render_chart(report: &Report) -> String {
    let lines: Vec<_> = report.charted_lines().collect();
    if lines.is_empty() {
        return "(nothing to chart: all quantities are 0)".to_string();
    }
    let max_price = lines
        .iter()
        .map(|l| l.monthly_client_price)
        .fold(0.0_f64, f64::max);
    let name_width = lines.iter().map(|l| l.name.chars().count()).max().unwrap_or(0);

    let bar_width = CHART_WIDTH;
    let mut out = String::new();
    for l in lines {
        let len = if max_price > 0.0 {
            ((l.monthly_client_price / max_price) * bar_width as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "{:<name_width$} | {:<bar_width$} {} [T{}]\n",
            l.name,
            "#".repeat(len),
            format_currency(l.monthly_client_price),
            l.tier,
        ));
    }
    out
}

pub fn render_summary(report: &Report) -> String {
    format!(
        "Total score: {}\nGlobal tier: {}\nMonthly client price: {}",
        format_int(report.totals.total_score),
        report.global_label,
        format_currency(report.totals.monthly_client_price)
    )
}

pub fn print_report(report: &Report, legend: &[LegendRow]) {
    println!("Global Summary\n");
    println!("{}", render_summary(report));
    preview_table("Detailed Table", None, &detail_rows(report));
    preview_table("Financial Breakdown", None, &financial_rows(report));
    println!("Client Price by Technology\n");
    println!("{}", render_chart(report));
    preview_table("Tier Classification", Some("by total score"), legend);
}
