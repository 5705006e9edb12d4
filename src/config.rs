//! Run configuration for label generation.
//!
//! Everything tunable about a run lives in [`GenerateConfig`]. The list is
//! deliberately short: page geometry, fonts, table layout, and QR styling are
//! presentation constants in [`crate::pipeline::label`], not knobs. Labels
//! from two machines must come out identical.

use crate::error::EtiquetaError;
use serde::{Deserialize, Serialize};

/// Configuration for one generation run.
///
/// # Example
/// ```rust
/// use etiqueta::{GenerateConfig, SheetSelection};
///
/// let config = GenerateConfig::new().with_sheet(SheetSelection::parse("Plan1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GenerateConfig {
    /// Which worksheet to read when the manifest is a workbook. Default: the
    /// first sheet, which is where every export we have seen puts the data.
    ///
    /// Ignored for CSV inputs, which have no sheet structure.
    pub sheet: SheetSelection,
}

impl GenerateConfig {
    /// Configuration with all defaults (first worksheet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a worksheet other than the first.
    pub fn with_sheet(mut self, sheet: SheetSelection) -> Self {
        self.sheet = sheet;
        self
    }
}

/// Specifies which worksheet of a workbook holds the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetSelection {
    /// The workbook's first sheet (default).
    #[default]
    First,
    /// A sheet position, 1-based — operators count tabs from one.
    Index(usize),
    /// An exact, case-sensitive sheet name.
    Name(String),
}

impl SheetSelection {
    /// Parse a CLI argument: a positive integer means a 1-based position,
    /// anything else is an exact sheet name. An empty string means the first
    /// sheet.
    ///
    /// `"0"` is treated as a name rather than a position, so a sheet actually
    /// called `0` stays reachable.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        if t.is_empty() {
            return SheetSelection::First;
        }
        match t.parse::<usize>() {
            Ok(n) if n >= 1 => SheetSelection::Index(n),
            _ => SheetSelection::Name(t.to_string()),
        }
    }

    /// Resolve the selection against a workbook's sheet list, yielding the
    /// concrete sheet name to read.
    pub fn resolve(&self, names: &[String]) -> Result<String, EtiquetaError> {
        match self {
            SheetSelection::First => {
                names.first().cloned().ok_or(EtiquetaError::SheetNotFound {
                    requested: "1".to_string(),
                    available: Vec::new(),
                })
            }
            SheetSelection::Index(n) => {
                if *n >= 1 && *n <= names.len() {
                    Ok(names[n - 1].clone())
                } else {
                    Err(EtiquetaError::SheetNotFound {
                        requested: n.to_string(),
                        available: names.to_vec(),
                    })
                }
            }
            SheetSelection::Name(wanted) => {
                if names.iter().any(|n| n == wanted) {
                    Ok(wanted.clone())
                } else {
                    Err(EtiquetaError::SheetNotFound {
                        requested: wanted.clone(),
                        available: names.to_vec(),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_positive_integer_is_index() {
        assert_eq!(SheetSelection::parse("2"), SheetSelection::Index(2));
        assert_eq!(SheetSelection::parse(" 10 "), SheetSelection::Index(10));
    }

    #[test]
    fn parse_text_is_name() {
        assert_eq!(
            SheetSelection::parse("Plan1"),
            SheetSelection::Name("Plan1".into())
        );
    }

    #[test]
    fn parse_zero_is_a_name() {
        assert_eq!(SheetSelection::parse("0"), SheetSelection::Name("0".into()));
    }

    #[test]
    fn parse_empty_is_first() {
        assert_eq!(SheetSelection::parse(""), SheetSelection::First);
        assert_eq!(SheetSelection::parse("   "), SheetSelection::First);
    }

    #[test]
    fn resolve_first_picks_leading_sheet() {
        let sel = SheetSelection::First;
        let got = sel.resolve(&names(&["Plan1", "Resumo"])).unwrap();
        assert_eq!(got, "Plan1");
    }

    #[test]
    fn resolve_index_is_one_based() {
        let sel = SheetSelection::Index(2);
        let got = sel.resolve(&names(&["Plan1", "Resumo"])).unwrap();
        assert_eq!(got, "Resumo");
    }

    #[test]
    fn resolve_index_out_of_range_lists_sheets() {
        let sel = SheetSelection::Index(5);
        let err = sel.resolve(&names(&["Plan1"])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains('5'), "got: {msg}");
        assert!(msg.contains("Plan1"), "got: {msg}");
    }

    #[test]
    fn resolve_name_requires_exact_match() {
        let sel = SheetSelection::Name("plan1".into());
        assert!(sel.resolve(&names(&["Plan1"])).is_err());
    }

    #[test]
    fn resolve_on_empty_workbook_fails() {
        assert!(SheetSelection::First.resolve(&[]).is_err());
    }
}
