use crate::error::{Result, WellError};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};

/// Prefix of a fixed-width observation well code, e.g. "OW309".
pub const WELL_PREFIX: &str = "OW";

/// Total width of a prefixed well code.
pub const WELL_CODE_WIDTH: usize = 5;

/// Largest well number expressible in the fixed-width code.
pub const MAX_WELL_NUMBER: u32 = 999;

/// A provincial observation well.
///
/// Wells are identified either by their bare number (`309`) or by the
/// fixed-width code used in the data catalogue (`OW309`). Both map onto
/// the same `WellId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WellId(u32);

/// The two accepted spellings of a well identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Convention {
    Numeric,
    Prefixed,
}

impl WellId {
    /// Create a well id from its number (1 to 999).
    pub fn new(number: u32) -> Result<WellId> {
        if number == 0 || number > MAX_WELL_NUMBER {
            return Err(WellError::InvalidWells(format!(
                "well number {} is outside 1..={}",
                number, MAX_WELL_NUMBER
            )));
        }
        Ok(WellId(number))
    }

    pub fn number(&self) -> u32 {
        self.0
    }

    /// The fixed-width catalogue code, e.g. "OW009".
    pub fn code(&self) -> String {
        format!("{}{:03}", WELL_PREFIX, self.0)
    }

    fn convention_of(raw: &str) -> Convention {
        if raw.starts_with(WELL_PREFIX) {
            Convention::Prefixed
        } else {
            Convention::Numeric
        }
    }

    fn parse_prefixed(raw: &str) -> Result<WellId> {
        let digits = &raw[WELL_PREFIX.len()..];
        if raw.len() != WELL_CODE_WIDTH || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(WellError::InvalidWells(format!(
                "'{}' is not a {}-character code of the form {}000",
                raw, WELL_CODE_WIDTH, WELL_PREFIX
            )));
        }
        let number = digits
            .parse::<u32>()
            .map_err(|e| WellError::InvalidWells(format!("'{}': {}", raw, e)))?;
        WellId::new(number)
    }

    fn parse_numeric(raw: &str) -> Result<WellId> {
        let number = raw
            .parse::<u32>()
            .map_err(|_| WellError::InvalidWells(format!("'{}' is not a well number", raw)))?;
        WellId::new(number)
    }
}

impl fmt::Display for WellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for WellId {
    type Err = WellError;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim();
        match WellId::convention_of(raw) {
            Convention::Prefixed => WellId::parse_prefixed(raw),
            Convention::Numeric => WellId::parse_numeric(raw),
        }
    }
}

/// Validate a set of well identifiers.
///
/// All identifiers must use the same convention: either bare numbers or
/// prefixed fixed-width codes. Duplicates are dropped, first occurrence wins.
pub fn parse_wells<S: AsRef<str>>(wells: &[S]) -> Result<Vec<WellId>> {
    if wells.is_empty() {
        return Err(WellError::InvalidWells(String::from("no wells supplied")));
    }
    let conventions: HashSet<_> = wells
        .iter()
        .map(|w| WellId::convention_of(w.as_ref().trim()))
        .collect();
    if conventions.len() > 1 {
        return Err(WellError::InvalidWells(format!(
            "mix of numeric and {} prefixed identifiers; use one convention",
            WELL_PREFIX
        )));
    }
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(wells.len());
    for raw in wells {
        let well: WellId = raw.as_ref().parse()?;
        if seen.insert(well) {
            result.push(well);
        }
    }
    Ok(result)
}
