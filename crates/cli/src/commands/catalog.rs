//! Catalog inspection

use anyhow::{Context, Result};
use diagnosis_lib::OutputFormat;

use super::Session;
use crate::output::{print_info, print_table, rule_rows, standard_rows};

/// Show the loaded rule catalog
pub fn run(session: &Session) -> Result<()> {
    let catalog = &session.catalog;
    match session.format {
        OutputFormat::Json => {
            let json = catalog.to_json().context("Failed to serialize rule catalog")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            print_info(&format!(
                "Rule catalog {} (published {}), {} rules",
                catalog.version(),
                catalog.published_on(),
                catalog.rules().len()
            ));
            print_table(&rule_rows(catalog));
            println!();
            print_table(&standard_rows(catalog));
            println!("Default boundary: {}", catalog.default_boundary());
        }
    }
    Ok(())
}
