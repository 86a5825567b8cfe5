//! Ranking groups and computing percentages.

use crate::format::round_to;

use super::frequency::FrequencyRow;
use super::group::Group;

/// Sort policy for frequency rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum SortMode {
    /// Count descending; ties keep discovery order.
    #[default]
    ByCountDesc,
    /// Key tuple ascending, then count descending.
    Alphabetical,
}

impl SortMode {
    /// Mode for an `alphabetical_sort` flag.
    #[must_use]
    pub fn from_alphabetical(alphabetical: bool) -> Self {
        if alphabetical {
            SortMode::Alphabetical
        } else {
            SortMode::ByCountDesc
        }
    }
}

/// Rank groups, computing `p`, `pcum` and the dense `order`.
///
/// Percentages are relative to the sum of all counts in `groups`.
#[must_use]
pub fn rank(groups: Vec<Group>, mode: SortMode) -> Vec<FrequencyRow> {
    let total: f64 = groups.iter().map(|g| g.n).sum();
    let mut rows: Vec<FrequencyRow> = groups
        .into_iter()
        .map(|g| FrequencyRow { p: percent(g.n, total), keys: g.keys, n: g.n, pcum: 0.0, order: 0 })
        .collect();
    sort_rows(&mut rows, mode);
    renumber(&mut rows, total);
    rows
}

/// Stable sort in place according to `mode`.
pub(crate) fn sort_rows(rows: &mut [FrequencyRow], mode: SortMode) {
    match mode {
        SortMode::ByCountDesc => rows.sort_by(|a, b| b.n.total_cmp(&a.n)),
        SortMode::Alphabetical => {
            rows.sort_by(|a, b| a.keys.cmp(&b.keys).then_with(|| b.n.total_cmp(&a.n)));
        }
    }
}

/// Recompute `pcum` and `order` from the current row order.
///
/// `pcum` is taken from the running count, so the last row of a complete
/// table lands on exactly 100 however many rows there are.
pub(crate) fn renumber(rows: &mut [FrequencyRow], total: f64) {
    let mut cumulative = 0.0;
    for (i, row) in rows.iter_mut().enumerate() {
        cumulative += row.n;
        row.pcum = percent(cumulative, total);
        row.order = i + 1;
    }
}

/// `100 * n / total`, rounded to two decimals; zero when `total` is zero.
#[must_use]
pub fn percent(n: f64, total: f64) -> f64 {
    if total > 0.0 {
        round_to(100.0 * n / total, 2)
    } else {
        0.0
    }
}
