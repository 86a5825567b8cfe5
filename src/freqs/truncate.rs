//! Top-N truncation with exclusion annotation.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::format::{format_count, format_pct, round_to};

use super::frequency::FrequencyTable;
use super::rank::SortMode;

/// How many groups to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Top {
    /// Keep the first `n` groups in rank order.
    N(usize),
    /// Keep every group.
    All,
}

impl Default for Top {
    fn default() -> Self {
        Top::N(20)
    }
}

impl Top {
    /// The cap, or `None` for [`Top::All`].
    #[must_use]
    pub fn limit(self) -> Option<usize> {
        match self {
            Top::N(n) => Some(n),
            Top::All => None,
        }
    }
}

impl From<usize> for Top {
    /// `0` means no cap.
    fn from(n: usize) -> Self {
        if n == 0 {
            Top::All
        } else {
            Top::N(n)
        }
    }
}

impl FromStr for Top {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("na") {
            return Ok(Top::All);
        }
        s.parse::<usize>()
            .map(Top::from)
            .map_err(|_| {
                Error::InvalidOption(format!("top must be a positive integer or 'all', got '{s}'"))
            })
    }
}

impl fmt::Display for Top {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Top::N(n) => write!(f, "{n}"),
            Top::All => f.write_str("all"),
        }
    }
}

#[cfg(feature = "config")]
impl serde::Serialize for Top {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Top::N(n) => serializer.serialize_u64(*n as u64),
            Top::All => serializer.serialize_str("all"),
        }
    }
}

#[cfg(feature = "config")]
impl<'de> serde::Deserialize<'de> for Top {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u64),
            Word(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(Top::from(n as usize)),
            Raw::Word(w) => w.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Result of truncating a ranked table.
#[derive(Debug, Clone, PartialEq)]
pub struct Truncation {
    /// Retained rows (a new table).
    pub table: FrequencyTable,
    /// Number of groups before truncation.
    pub candidates: usize,
    /// Number of groups dropped.
    pub excluded_groups: usize,
    /// Sum of `n` over the dropped groups.
    pub excluded_n: f64,
    /// Human-readable description of what was dropped; empty when nothing was.
    pub annotation: String,
}

impl Truncation {
    /// Whether any group was dropped.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.excluded_groups > 0
    }

    /// Sum of `n` over retained rows.
    #[must_use]
    pub fn kept_n(&self) -> f64 {
        self.table.observed_total()
    }

    /// Sum of `n` over kept and excluded rows.
    #[must_use]
    pub fn grand_total(&self) -> f64 {
        self.kept_n() + self.excluded_n
    }

    /// Observed-subset caption, e.g. `Observed: 5 of 6 (83.3%)`.
    #[must_use]
    pub fn caption(&self) -> String {
        observed_caption(self.kept_n(), self.grand_total())
    }
}

/// `Observed: kept of total (share)`; the share is omitted for an empty total.
#[must_use]
pub fn observed_caption(kept: f64, total: f64) -> String {
    if total > 0.0 {
        format!(
            "Observed: {} of {} ({})",
            format_count(kept),
            format_count(total),
            format_pct(round_to(100.0 * kept / total, 1))
        )
    } else {
        format!("Observed: {} of {}", format_count(kept), format_count(total))
    }
}

/// Keep the first `top` rows of `table` in rank order.
#[must_use]
pub fn truncate(table: &FrequencyTable, top: Top) -> Truncation {
    let candidates = table.len();
    let keep = match top.limit() {
        Some(n) if n < candidates => n,
        _ => {
            return Truncation {
                table: table.clone(),
                candidates,
                excluded_groups: 0,
                excluded_n: 0.0,
                annotation: String::new(),
            }
        }
    };

    let kept = table.rows()[..keep].to_vec();
    let excluded_n: f64 = table.rows()[keep..].iter().map(|r| r.n).sum();
    let noun = if table.key_names().len() > 1 { "combinations" } else { "values" };
    let annotation = match table.sort_mode() {
        SortMode::ByCountDesc => format!(
            "Most frequent {keep} out of {candidates} {noun} (excluded n = {})",
            format_count(excluded_n)
        ),
        SortMode::Alphabetical => format!(
            "First {keep} out of {candidates} {noun}, sorted alphabetically (excluded n = {})",
            format_count(excluded_n)
        ),
    };

    Truncation {
        table: table.with_rows(kept),
        candidates,
        excluded_groups: candidates - keep,
        excluded_n,
        annotation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freqs::group::Group;
    use crate::freqs::rank::rank;

    fn letters(mode: SortMode) -> FrequencyTable {
        let groups = vec![
            Group { keys: vec!["a".into()], n: 2.0 },
            Group { keys: vec!["b".into()], n: 1.0 },
            Group { keys: vec!["c".into()], n: 3.0 },
        ];
        FrequencyTable::new(vec!["x".into()], rank(groups, mode), 6.0, mode)
    }

    #[test]
    fn test_no_truncation_when_under_cap() {
        let t = truncate(&letters(SortMode::ByCountDesc), Top::N(3));
        assert!(!t.is_truncated());
        assert!(t.annotation.is_empty());
        assert_eq!(t.table.len(), 3);
        assert!((t.kept_n() - t.grand_total()).abs() < 1e-12);
    }

    #[test]
    fn test_all_sentinel() {
        let t = truncate(&letters(SortMode::ByCountDesc), Top::All);
        assert!(!t.is_truncated());
    }

    #[test]
    fn test_truncates_and_annotates() {
        let t = truncate(&letters(SortMode::ByCountDesc), Top::N(2));
        assert!(t.is_truncated());
        assert_eq!(t.table.len(), 2);
        assert_eq!(t.excluded_groups, 1);
        assert!((t.excluded_n - 1.0).abs() < 1e-12);
        assert!(t.annotation.contains("2 out of 3"));
        assert!(t.annotation.starts_with("Most frequent"));
        assert_eq!(t.caption(), "Observed: 5 of 6 (83.3%)");
    }

    #[test]
    fn test_alphabetical_annotation() {
        let t = truncate(&letters(SortMode::Alphabetical), Top::N(1));
        assert!(t.annotation.contains("alphabetically"));
        assert!(t.annotation.contains("1 out of 3"));
        assert!((t.excluded_n - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_top_parse() {
        assert_eq!("all".parse::<Top>().unwrap(), Top::All);
        assert_eq!("0".parse::<Top>().unwrap(), Top::All);
        assert_eq!(" 15 ".parse::<Top>().unwrap(), Top::N(15));
        assert!("-1".parse::<Top>().is_err());
        assert_eq!(Top::default(), Top::N(20));
        assert_eq!(Top::All.to_string(), "all");
    }
}
