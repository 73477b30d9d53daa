// Entry point and high-level CLI flow.
//
// The binary is a small interactive menu around the pricing calculator:
// quantities are entered (or loaded from a CSV), the evaluation is recomputed
// from scratch every time it is shown, and the result can be exported.
// `--batch` skips the menu and prints/exports once.
use clap::Parser;
use cloud_evaluator::error::{AppError, CalcError};
use cloud_evaluator::types::{LineInput, PricingConfig};
use cloud_evaluator::{calculator, catalog, export, loader, output, util};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "cloud-evaluator", version, about = "Cloud complexity and pricing evaluator")]
struct Cli {
    /// Pricing configuration (TOML); built-in catalog and prices when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file with `Technology,Quantity` columns
    #[arg(short, long)]
    quantities: Option<PathBuf>,

    /// Set a quantity, e.g. `--set "Database=3"` (repeatable)
    #[arg(short, long = "set", value_name = "NAME=QTY")]
    set: Vec<String>,

    /// Directory for exported files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Print and export once, without the interactive menu
    #[arg(long)]
    batch: bool,
}

// Session state for the interactive menu. The pricing configuration itself is
// immutable once loaded; only the quantities change between menu actions.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        config: PricingConfig::default(),
        quantities: LineInput::new(),
        out_dir: PathBuf::from("."),
    })
});

struct AppState {
    config: PricingConfig,
    quantities: LineInput,
    out_dir: PathBuf,
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn prompt(text: &str) -> String {
    print!("{}", text);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Apply one `NAME=QTY` or `NUMBER=QTY` assignment, where NUMBER is the
/// 1-based position in the catalog listing.
fn apply_assignment(
    config: &PricingConfig,
    quantities: &mut LineInput,
    text: &str,
) -> Result<String, AppError> {
    let (key, qty) = util::split_assignment(text).ok_or_else(|| {
        CalcError::invalid(text, "expected NAME=QTY or NUMBER=QTY")
    })?;
    let name = match key.parse::<usize>() {
        Ok(idx) if idx >= 1 && idx <= config.technologies.len() => {
            config.technologies[idx - 1].clone()
        }
        _ => config
            .technologies
            .iter()
            .find(|t| t.eq_ignore_ascii_case(key))
            .cloned()
            .ok_or_else(|| CalcError::invalid(key, "not in the catalog"))?,
    };
    let quantity = util::parse_quantity(&name, qty)?;
    quantities.insert(name.clone(), quantity);
    Ok(name)
}

/// Handle option [1]: list the catalog and read assignments until a blank line.
fn handle_enter_quantities() {
    let mut st = state();
    let AppState {
        config, quantities, ..
    } = &mut *st;
    println!();
    for (idx, item) in config.catalog().iter().enumerate() {
        println!(
            "[{:>2}] {} (tier {}) = {}",
            idx + 1,
            item.name,
            item.tier,
            quantities.get(&item.name).copied().unwrap_or(0)
        );
    }
    println!("\nEnter NAME=QTY or NUMBER=QTY, blank line to finish.");
    loop {
        let line = prompt("> ");
        if line.is_empty() {
            break;
        }
        match apply_assignment(config, quantities, &line) {
            Ok(name) => println!("Set {} = {}", name, quantities[&name]),
            Err(e) => println!("{}", e),
        }
    }
    println!();
}

/// Handle option [2]: recompute and print the evaluation.
fn handle_show() {
    let st = state();
    match calculator::evaluate(&st.config, &st.quantities) {
        Ok(report) => {
            println!();
            output::print_report(&report, &st.config.tier_legend());
        }
        Err(e) => println!("Error: {}\n", e),
    }
}

/// Handle option [3]: recompute and export.
fn handle_export() {
    let st = state();
    if let Err(e) = run_export(&st.config, &st.quantities, &st.out_dir) {
        error!(error = %e, "export failed");
        println!("Export failed: {}\n", e);
    }
}

fn run_export(config: &PricingConfig, quantities: &LineInput, dir: &Path) -> Result<(), AppError> {
    let report = calculator::evaluate(config, quantities)?;
    let files = export::export_report(dir, &report, &config.tier_legend())?;
    println!("Results exported:");
    println!("  {}", files.evaluation.display());
    println!("  {}", files.justification.display());
    println!("  {}\n", files.summary.display());
    Ok(())
}

/// Handle option [4]: read quantities from a CSV file.
fn handle_load() {
    let path = prompt("CSV path: ");
    if path.is_empty() {
        return;
    }
    let mut st = state();
    let AppState {
        config, quantities, ..
    } = &mut *st;
    if let Err(e) = load_into(config, quantities, Path::new(&path)) {
        println!("Failed to load file: {}\n", e);
    }
}

fn load_into(config: &PricingConfig, quantities: &mut LineInput, path: &Path) -> Result<(), AppError> {
    let (loaded, report) = loader::load_quantities(path, &config.catalog())?;
    println!(
        "Loaded {} of {} rows.",
        util::format_int(report.loaded_rows),
        util::format_int(report.total_rows)
    );
    if report.parse_errors > 0 {
        println!(
            "Note: {} rows skipped due to parse/validation errors.",
            util::format_int(report.parse_errors)
        );
    }
    if !report.unknown_names.is_empty() {
        println!("Unknown technologies ignored: {}", report.unknown_names.join(", "));
    }
    println!();
    quantities.extend(loaded);
    Ok(())
}

fn interactive() {
    loop {
        println!("Cloud Complexity Evaluator");
        println!("[1] Enter quantities");
        println!("[2] Show evaluation");
        println!("[3] Export results");
        println!("[4] Load quantities CSV");
        println!("[5] Reset quantities");
        println!("[0] Exit\n");
        match prompt("Enter choice: ").as_str() {
            "1" => handle_enter_quantities(),
            "2" => handle_show(),
            "3" => handle_export(),
            "4" => handle_load(),
            "5" => {
                state().quantities.clear();
                println!("All quantities reset to 0.\n");
            }
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-5.\n"),
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = match &cli.config {
        Some(path) => catalog::load_config(path)?,
        None => PricingConfig::default(),
    };
    let mut quantities = LineInput::new();
    if let Some(path) = &cli.quantities {
        load_into(&config, &mut quantities, path)?;
    }
    for assignment in &cli.set {
        apply_assignment(&config, &mut quantities, assignment)?;
    }
    info!(
        technologies = config.technologies.len(),
        preset = quantities.len(),
        "session ready"
    );

    if cli.batch {
        let report = calculator::evaluate(&config, &quantities)?;
        output::print_report(&report, &config.tier_legend());
        let files = export::export_report(&cli.out_dir, &report, &config.tier_legend())?;
        println!("Results exported to {}", files.evaluation.display());
        return Ok(());
    }

    {
        let mut st = state();
        st.config = config;
        st.quantities = quantities;
        st.out_dir = cli.out_dir;
    }
    interactive();
    Ok(())
}

fn main() {
    cloud_evaluator::init_tracing();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_accept_names_and_positions() {
        let config = PricingConfig::default();
        let mut quantities = LineInput::new();
        assert_eq!(
            apply_assignment(&config, &mut quantities, "database = 3").unwrap(),
            "Database"
        );
        assert_eq!(
            apply_assignment(&config, &mut quantities, "22=5").unwrap(),
            "Storage"
        );
        assert_eq!(quantities["Database"], 3);
        assert_eq!(quantities["Storage"], 5);
    }

    #[test]
    fn bad_assignments_leave_quantities_untouched() {
        let config = PricingConfig::default();
        let mut quantities = LineInput::new();
        for bad in ["Database=-2", "Database=1.5", "Mainframe=1", "99=1", "Database"] {
            assert!(apply_assignment(&config, &mut quantities, bad).is_err());
        }
        assert!(quantities.is_empty());
    }
}
