//! Concurrent diagnosis of many profiles
//!
//! The catalog is shared read-only across blocking workers; results are
//! reported in input order regardless of completion order.

use anyhow::{Context, Result};
use diagnosis_lib::render::render_text;
use diagnosis_lib::{diagnose_raw, DiagnosisPlan, OutputFormat, RawProfile, ValidationError};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::debug;

use super::Session;
use crate::output::{print_success, print_warning};

/// Outcome for one input profile
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<DiagnosisPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BatchFailure>,
}

#[derive(Debug, Serialize)]
pub struct BatchFailure {
    pub field: String,
    pub message: String,
}

/// Diagnose every profile with at most `concurrency` running at once
pub async fn diagnose_all(
    session: &Session,
    profiles: Vec<RawProfile>,
    concurrency: usize,
) -> Result<Vec<Result<DiagnosisPlan, ValidationError>>> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::with_capacity(profiles.len());

    for (index, raw) in profiles.into_iter().enumerate() {
        let catalog = Arc::clone(&session.catalog);
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .context("Batch worker pool closed")?;
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let started = Instant::now();
            let result = diagnose_raw(&raw, &catalog);
            debug!(index, ok = result.is_ok(), "Profile diagnosed");
            (result, started.elapsed().as_secs_f64())
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (index, handle) in handles.into_iter().enumerate() {
        let (result, elapsed) = handle.await.context("Diagnosis worker panicked")?;
        match &result {
            Ok(plan) => {
                session.metrics.record_plan(plan, elapsed);
                session.logger.log_diagnosis(plan, elapsed);
            }
            Err(err) => {
                session.metrics.inc_validation_failure(err.field());
                session.logger.log_validation_failure(err, Some(index));
            }
        }
        results.push(result);
    }
    Ok(results)
}

/// Run the batch command against a JSON array of profiles
pub async fn run(session: &Session, input: &Path) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read batch input {}", input.display()))?;
    let profiles = RawProfile::batch_from_json(&content)?;
    let total = profiles.len();

    let started = Instant::now();
    let results = diagnose_all(session, profiles, session.batch_concurrency).await?;

    let entries: Vec<BatchEntry> = results
        .into_iter()
        .enumerate()
        .map(|(index, result)| match result {
            Ok(plan) => BatchEntry {
                index,
                plan: Some(plan),
                error: None,
            },
            Err(err) => BatchEntry {
                index,
                plan: None,
                error: Some(BatchFailure {
                    field: err.field().to_string(),
                    message: err.to_string(),
                }),
            },
        })
        .collect();

    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    session
        .logger
        .log_batch_completed(total, failed, started.elapsed().as_secs_f64());

    match session.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => print_text(&entries)?,
    }

    let first_failure = entries
        .iter()
        .find_map(|e| e.error.as_ref().map(|f| (e.index, f)));
    if let Some((index, failure)) = first_failure {
        return Err(ValidationError::Malformed {
            field: format!("profiles[{}].{}", index, failure.field),
            reason: format!("{} of {} profiles failed validation", failed, total),
        }
        .into());
    }

    print_success(&format!("Diagnosed {} profile(s)", total));
    Ok(())
}

fn print_text(entries: &[BatchEntry]) -> Result<()> {
    for entry in entries {
        println!("=== Profile {} ===", entry.index + 1);
        if let Some(plan) = &entry.plan {
            print!("{}", render_text(plan)?);
        }
        if let Some(failure) = &entry.error {
            print_warning(&failure.message);
        }
        println!();
    }
    Ok(())
}
