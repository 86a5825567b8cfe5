//! Grouping rows by key columns.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::table::{Table, Value};

/// Count (or weighted sum) for one unique key combination.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Key values, one per grouping column, in key order.
    pub keys: Vec<Value>,
    /// Row count, or sum of weights.
    pub n: f64,
}

/// Group `table` by `keys`, counting rows or summing `weight`.
///
/// Groups come back in first-discovery order, which is the tie-break used by
/// [`rank`](super::rank::rank). Missing key values form their own group.
///
/// # Errors
///
/// Returns an error if no key is given, a column is unknown, a key column holds
/// nested lists, or the weight column is not numeric.
pub fn group(table: &Table, keys: &[&str], weight: Option<&str>) -> Result<Vec<Group>> {
    table.ensure_tabular()?;
    if keys.is_empty() {
        return Err(Error::NoGroupingKeys);
    }

    let key_columns = keys
        .iter()
        .map(|name| {
            let column = table.require(name)?;
            if column.is_list() {
                return Err(Error::UnsupportedKey((*name).to_string()));
            }
            Ok(column.values())
        })
        .collect::<Result<Vec<_>>>()?;

    let weights = match weight {
        Some(name) => Some(weight_values(table, name)?),
        None => None,
    };

    let mut index: HashMap<Vec<Value>, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for row in 0..table.nrow() {
        let key: Vec<Value> = key_columns.iter().map(|col| col[row].clone()).collect();
        let w = weights.as_ref().map_or(1.0, |ws| ws[row]);
        match index.get(&key) {
            Some(&pos) => groups[pos].n += w,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group { keys: key, n: w });
            }
        }
    }

    Ok(groups)
}

fn weight_values(table: &Table, name: &str) -> Result<Vec<f64>> {
    table
        .require(name)?
        .values()
        .iter()
        .map(|v| match v {
            Value::Missing => Ok(0.0),
            other => other.as_f64().ok_or_else(|| Error::NonNumericWeight(name.to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn letters() -> Table {
        Table::from_series("x", ["a", "a", "b", "c", "c", "c"])
    }

    #[test]
    fn test_group_counts_in_discovery_order() {
        let groups = group(&letters(), &["x"], None).unwrap();
        let summary: Vec<(String, f64)> =
            groups.iter().map(|g| (g.keys[0].to_string(), g.n)).collect();
        assert_eq!(
            summary,
            vec![("a".to_string(), 2.0), ("b".to_string(), 1.0), ("c".to_string(), 3.0)]
        );
    }

    #[test]
    fn test_group_weighted() {
        let t = letters().with_column("w", [1.0, 0.5, 2.0, 1.0, 1.0, 1.0]).unwrap();
        let groups = group(&t, &["x"], Some("w")).unwrap();
        assert!((groups[0].n - 1.5).abs() < 1e-12);
        assert!((groups[1].n - 2.0).abs() < 1e-12);
        assert!((groups[2].n - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_weight_counts_zero() {
        let t = letters()
            .with_column("w", [Some(1.0), None, Some(1.0), Some(1.0), Some(1.0), Some(1.0)])
            .unwrap();
        let groups = group(&t, &["x"], Some("w")).unwrap();
        assert!((groups[0].n - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_text_weight_rejected() {
        let t = letters().with_column("w", ["1", "2", "3", "4", "5", "6"]).unwrap();
        assert!(matches!(group(&t, &["x"], Some("w")), Err(Error::NonNumericWeight(_))));
    }

    #[test]
    fn test_missing_is_a_group() {
        let t = Table::from_series("x", [Some("a"), None, None]);
        let groups = group(&t, &["x"], None).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups[1].keys[0].is_missing());
        assert!((groups[1].n - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_multi_key() {
        let t = Table::from_columns(vec![
            Column::new("x", ["a", "a", "b", "a"]),
            Column::new("y", [1.0, 2.0, 1.0, 1.0]),
        ])
        .unwrap();
        let groups = group(&t, &["x", "y"], None).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].keys, vec![Value::from("a"), Value::from(1.0)]);
        assert!((groups[0].n - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_keys_rejected() {
        assert!(matches!(group(&letters(), &[], None), Err(Error::NoGroupingKeys)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(group(&letters(), &["nope"], None), Err(Error::UnknownColumn(_))));
    }

    #[test]
    fn test_list_key_rejected() {
        let t = Table::from_series("l", [Value::List(vec![1.0.into()])]);
        assert!(matches!(group(&t, &["l"], None), Err(Error::UnsupportedKey(_))));
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(group(&Table::new(), &["x"], None), Err(Error::InvalidShape(_))));
    }
}
