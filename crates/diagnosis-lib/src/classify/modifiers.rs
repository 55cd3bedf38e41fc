//! Modifier resolution
//!
//! Residency posture, not the literal country code, drives recommendations,
//! so countries are bucketed into a small fixed set of classes.

use std::collections::BTreeSet;

use crate::models::{CountryClass, ModifierKey, WorkloadProfile};

/// EEA members plus the UK and Switzerland
pub const STRICT_RESIDENCY_COUNTRIES: &[&str] = &[
    "AT", "BE", "BG", "CH", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GB", "GR", "HR",
    "HU", "IE", "IS", "IT", "LI", "LT", "LU", "LV", "MT", "NL", "NO", "PL", "PT", "RO", "SE",
    "SI", "SK", "UK",
];

/// Recognized countries without a strict residency regime
pub const STANDARD_COUNTRIES: &[&str] = &[
    "AE", "AR", "AU", "BR", "CA", "CL", "CO", "HK", "ID", "IL", "IN", "JP", "KR", "MX", "MY",
    "NZ", "PH", "SA", "SG", "TH", "TW", "US", "VN", "ZA",
];

/// Residency class of an upper-cased ISO alpha-2 code; `None` when unrecognized
pub fn country_class(code: &str) -> Option<CountryClass> {
    if STRICT_RESIDENCY_COUNTRIES.contains(&code) {
        Some(CountryClass::StrictResidency)
    } else if STANDARD_COUNTRIES.contains(&code) {
        Some(CountryClass::Standard)
    } else {
        None
    }
}

/// Every modifier that applies to the profile
pub fn resolve_modifiers(profile: &WorkloadProfile) -> BTreeSet<ModifierKey> {
    let systems = profile
        .system_types
        .iter()
        .map(|system| ModifierKey::SystemType(*system));
    let restrictions = profile
        .restrictions
        .iter()
        .map(|restriction| ModifierKey::Restriction(*restriction));
    let country = profile
        .country
        .as_deref()
        .and_then(country_class)
        .map(ModifierKey::CountryClass);

    systems.chain(restrictions).chain(country).collect()
}
