use crate::error::AppError;
use crate::types::{CatalogItem, LineInput};
use crate::util::parse_quantity;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// One row of a quantities file. Extra columns are ignored, so a previously
/// exported evaluation sheet can be loaded back as input.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Technology")]
    technology: Option<String>,
    #[serde(rename = "Quantity")]
    quantity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub unknown_names: Vec<String>,
}

pub fn load_quantities(
    path: &Path,
    catalog: &[CatalogItem],
) -> Result<(LineInput, LoadReport), AppError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut report = LoadReport::default();
    let mut quantities = LineInput::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row = report.total_rows, error = %e, "unreadable row");
                report.parse_errors += 1;
                continue;
            }
        };

        let name = match row.technology.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => {
                report.parse_errors += 1;
                continue;
            }
        };
        if !catalog.iter().any(|item| item.name == name) {
            warn!(item = %name, "technology is not in the catalog");
            report.unknown_names.push(name);
            continue;
        }

        let quantity = match parse_quantity(&name, row.quantity.as_deref().unwrap_or("")) {
            Ok(q) => q,
            Err(e) => {
                warn!(error = %e, "skipping row");
                report.parse_errors += 1;
                continue;
            }
        };
        if quantities.insert(name.clone(), quantity).is_some() {
            debug!(item = %name, "technology listed twice; last row wins");
        }
        report.loaded_rows += 1;
    }

    Ok((quantities, report))
}
