// src/services/us_states.rs
// DOCUMENTATION: Static table of US states (plus DC) keyed by USPS code
// PURPOSE: Validate and normalize the state fields of tours and profiles

use crate::errors::MarketplaceError;
use serde::Serialize;

/// A US state or district
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsState {
    pub code: &'static str,
    pub name: &'static str,
}

const fn st(code: &'static str, name: &'static str) -> UsState {
    UsState { code, name }
}

static STATES: [UsState; 51] = [
    st("AL", "Alabama"),
    st("AK", "Alaska"),
    st("AZ", "Arizona"),
    st("AR", "Arkansas"),
    st("CA", "California"),
    st("CO", "Colorado"),
    st("CT", "Connecticut"),
    st("DE", "Delaware"),
    st("DC", "District of Columbia"),
    st("FL", "Florida"),
    st("GA", "Georgia"),
    st("HI", "Hawaii"),
    st("ID", "Idaho"),
    st("IL", "Illinois"),
    st("IN", "Indiana"),
    st("IA", "Iowa"),
    st("KS", "Kansas"),
    st("KY", "Kentucky"),
    st("LA", "Louisiana"),
    st("ME", "Maine"),
    st("MD", "Maryland"),
    st("MA", "Massachusetts"),
    st("MI", "Michigan"),
    st("MN", "Minnesota"),
    st("MS", "Mississippi"),
    st("MO", "Missouri"),
    st("MT", "Montana"),
    st("NE", "Nebraska"),
    st("NV", "Nevada"),
    st("NH", "New Hampshire"),
    st("NJ", "New Jersey"),
    st("NM", "New Mexico"),
    st("NY", "New York"),
    st("NC", "North Carolina"),
    st("ND", "North Dakota"),
    st("OH", "Ohio"),
    st("OK", "Oklahoma"),
    st("OR", "Oregon"),
    st("PA", "Pennsylvania"),
    st("RI", "Rhode Island"),
    st("SC", "South Carolina"),
    st("SD", "South Dakota"),
    st("TN", "Tennessee"),
    st("TX", "Texas"),
    st("UT", "Utah"),
    st("VT", "Vermont"),
    st("VA", "Virginia"),
    st("WA", "Washington"),
    st("WV", "West Virginia"),
    st("WI", "Wisconsin"),
    st("WY", "Wyoming"),
];

/// All states in table order
pub fn all() -> &'static [UsState] {
    &STATES
}

/// Case-insensitive lookup by USPS code
pub fn lookup(code: &str) -> Option<&'static UsState> {
    let code = code.trim();
    STATES.iter().find(|s| s.code.eq_ignore_ascii_case(code))
}

/// Return the upper-case USPS code or a validation error
pub fn normalize(code: &str) -> Result<String, MarketplaceError> {
    lookup(code)
        .map(|s| s.code.to_string())
        .ok_or_else(|| MarketplaceError::ValidationError(format!("Unknown US state: '{}'", code.trim())))
}

/// Same as `normalize` for optional fields; blank strings become None
pub fn normalize_optional(code: Option<&str>) -> Result<Option<String>, MarketplaceError> {
    match code.map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => normalize(code).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_unique_codes() {
        let mut codes: Vec<&str> = all().iter().map(|s| s.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 51);
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(lookup("tx").map(|s| s.name), Some("Texas"));
        assert_eq!(lookup(" Nm ").map(|s| s.code), Some("NM"));
        assert!(lookup("XX").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("or").unwrap(), "OR");
        assert!(matches!(
            normalize("Oregon"),
            Err(MarketplaceError::ValidationError(_))
        ));
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(None).unwrap(), None);
        assert_eq!(normalize_optional(Some("  ")).unwrap(), None);
        assert_eq!(normalize_optional(Some("dc")).unwrap(), Some("DC".to_string()));
        assert!(normalize_optional(Some("PR")).is_err());
    }
}
