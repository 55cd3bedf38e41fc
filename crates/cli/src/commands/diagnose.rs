//! Single-profile diagnosis

use anyhow::{Context, Result};
use clap::Args;
use diagnosis_lib::{diagnose_raw, render, ListInput, RawProfile, ValidationError};
use std::path::PathBuf;
use std::time::Instant;

use super::Session;

/// Seat shorthand flags expand to this tool name
const POSTMAN_TOOL: &str = "postman";

/// Workload description given as flags, a JSON profile, or both
#[derive(Args, Debug, Default)]
pub struct DiagnoseArgs {
    /// JSON profile document; flags given alongside override its fields
    #[arg(long, value_name = "FILE")]
    pub profile: Option<PathBuf>,

    /// Monthly cloud/software budget in USD
    #[arg(long, allow_negative_numbers = true)]
    pub monthly_budget_usd: Option<f64>,

    /// solo|startup|smb|midmarket|enterprise
    #[arg(long)]
    pub company_size: Option<String>,

    /// Comma-separated system types (e.g. api-saas,ecommerce)
    #[arg(long)]
    pub system_types: Option<String>,

    /// Comma-separated restrictions (e.g. pci,data-residency)
    #[arg(long)]
    pub restrictions: Option<String>,

    /// ISO-3166 alpha-2 country code; other values add no country modifier
    #[arg(long)]
    pub country: Option<String>,

    /// Comma-separated clouds (informational)
    #[arg(long)]
    pub clouds: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub monthly_requests: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub monthly_compute_hours: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub monthly_storage_gb: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub monthly_egress_gb: Option<f64>,

    /// Fraction of preloaded data actually read (0-1)
    #[arg(long, allow_negative_numbers = true)]
    pub preload_ratio: Option<f64>,

    /// Paid seats for a tool, as TOOL=COUNT (repeatable)
    #[arg(long = "seats", value_name = "TOOL=COUNT")]
    pub seats: Vec<String>,

    /// Shorthand for --seats postman=N
    #[arg(long, allow_negative_numbers = true)]
    pub postman_seats: Option<i64>,
}

impl DiagnoseArgs {
    /// Build the raw profile: file first, then flag overrides
    pub fn to_raw_profile(&self) -> Result<RawProfile> {
        let mut raw = match &self.profile {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read profile {}", path.display()))?;
                RawProfile::from_json(&content)?
            }
            None => RawProfile::default(),
        };

        override_with(&mut raw.monthly_budget_usd, self.monthly_budget_usd);
        override_with(&mut raw.company_size, self.company_size.clone());
        override_with(&mut raw.system_types, list(&self.system_types));
        override_with(&mut raw.restrictions, list(&self.restrictions));
        override_with(&mut raw.clouds, list(&self.clouds));
        override_with(&mut raw.country, self.country.clone());
        override_with(&mut raw.monthly_requests, self.monthly_requests);
        override_with(&mut raw.monthly_compute_hours, self.monthly_compute_hours);
        override_with(&mut raw.monthly_storage_gb, self.monthly_storage_gb);
        override_with(&mut raw.monthly_egress_gb, self.monthly_egress_gb);
        override_with(&mut raw.preload_ratio, self.preload_ratio);

        for pair in &self.seats {
            let (tool, count) = parse_seat_pair(pair)?;
            raw.seats.insert(tool, count);
        }
        if let Some(count) = self.postman_seats {
            raw.seats.insert(POSTMAN_TOOL.to_string(), count);
        }

        Ok(raw)
    }
}

fn override_with<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn list(value: &Option<String>) -> Option<ListInput> {
    value.as_deref().map(ListInput::from)
}

/// Split `TOOL=COUNT`
pub fn parse_seat_pair(pair: &str) -> Result<(String, i64), ValidationError> {
    let malformed = |reason: String| ValidationError::Malformed {
        field: "seats".to_string(),
        reason,
    };
    let (tool, count) = pair
        .split_once('=')
        .ok_or_else(|| malformed(format!("'{}' is not in TOOL=COUNT form", pair)))?;
    let count = count
        .trim()
        .parse::<i64>()
        .map_err(|_| malformed(format!("'{}' is not a whole seat count", count.trim())))?;
    Ok((tool.trim().to_string(), count))
}

/// Diagnose one profile and print the rendered plan
pub fn run(session: &Session, args: &DiagnoseArgs) -> Result<()> {
    let raw = args.to_raw_profile()?;

    let started = Instant::now();
    let plan = diagnose_raw(&raw, &session.catalog).map_err(|err| {
        session.metrics.inc_validation_failure(err.field());
        session.logger.log_validation_failure(&err, None);
        err
    })?;
    let elapsed = started.elapsed().as_secs_f64();

    session.metrics.record_plan(&plan, elapsed);
    session.logger.log_diagnosis(&plan, elapsed);

    let rendered = render(&plan, session.format)?;
    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}
