//! Columnar table abstraction.
//!
//! Provides an ordered, column-oriented data structure with typed cells,
//! used as the input to every frequency operation.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// A single cell value.
#[derive(Debug, Clone)]
pub enum Value {
    /// A missing value.
    Missing,
    /// A boolean value.
    Bool(bool),
    /// A numeric value. `NaN` is normalized to [`Value::Missing`] on construction.
    Number(f64),
    /// A text value.
    Text(String),
    /// A categorical value with an explicit level position.
    Factor {
        /// Zero-based level index; drives alphabetical ordering.
        level: u32,
        /// Level label.
        label: String,
    },
    /// A nested list value. Never a valid grouping key.
    List(Vec<Value>),
}

impl Value {
    /// Create a numeric value, mapping `NaN` to missing.
    #[must_use]
    pub fn number(v: f64) -> Self {
        if v.is_nan() {
            Value::Missing
        } else {
            Value::Number(v)
        }
    }

    /// Whether this value is missing.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Whether this value is a nested list.
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Numeric view used for weights. Booleans count as 0/1.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text view for text and factor values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            Value::Factor { label, .. } => Some(label.as_str()),
            _ => None,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Number(_) => 1,
            Value::Factor { .. } => 2,
            Value::Text(_) => 3,
            Value::List(_) => 4,
            Value::Missing => 5,
        }
    }
}

// -0.0 and 0.0 group together
fn canonical(n: f64) -> f64 {
    if n == 0.0 {
        0.0
    } else {
        n
    }
}

fn number_bits(n: f64) -> u64 {
    canonical(n).to_bits()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Missing, Value::Missing) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => number_bits(*a) == number_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Factor { level: la, label: a }, Value::Factor { level: lb, label: b }) => {
                la == lb && a == b
            }
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind_rank().hash(state);
        match self {
            Value::Missing => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => number_bits(*n).hash(state),
            Value::Text(s) => s.hash(state),
            Value::Factor { level, label } => {
                level.hash(state);
                label.hash(state);
            }
            Value::List(items) => items.hash(state),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => canonical(*a).total_cmp(&canonical(*b)),
            (Value::Factor { level: la, label: a }, Value::Factor { level: lb, label: b }) => {
                la.cmp(lb).then_with(|| a.cmp(b))
            }
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => f.write_str("NA"),
            Value::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Factor { label, .. } => f.write_str(label),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Missing, Into::into)
    }
}

/// A named column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Create a column from any convertible values.
    pub fn new<V: Into<Value>>(name: &str, values: impl IntoIterator<Item = V>) -> Self {
        Self { name: name.to_string(), values: values.into_iter().map(Into::into).collect() }
    }

    /// Create a categorical column with explicit level order.
    ///
    /// Labels not present in `levels` are appended as new levels in order of
    /// first appearance; `None` becomes missing.
    #[must_use]
    pub fn factor(name: &str, levels: &[&str], values: &[Option<&str>]) -> Self {
        let mut levels: Vec<String> = levels.iter().map(|s| (*s).to_string()).collect();
        let values = values
            .iter()
            .map(|v| match v {
                None => Value::Missing,
                Some(label) => {
                    let level = match levels.iter().position(|l| l.as_str() == *label) {
                        Some(pos) => pos,
                        None => {
                            levels.push((*label).to_string());
                            levels.len() - 1
                        }
                    };
                    Value::Factor { level: level as u32, label: (*label).to_string() }
                }
            })
            .collect();
        Self { name: name.to_string(), values }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether any cell holds a nested list.
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.values.iter().any(Value::is_list)
    }

    /// Number of distinct values, counting missing as one value.
    #[must_use]
    pub fn n_distinct(&self) -> usize {
        self.values.iter().collect::<HashSet<_>>().len()
    }
}

/// An ordered collection of equally long named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Create a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns.
    ///
    /// # Errors
    ///
    /// Returns an error if column lengths differ or names repeat.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Wrap a single sequence as a one-column table.
    pub fn from_series<V: Into<Value>>(name: &str, values: impl IntoIterator<Item = V>) -> Self {
        let column = Column::new(name, values);
        Self { n_rows: column.len(), columns: vec![column] }
    }

    /// Append a column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column length differs from the table's row count,
    /// or the name is already taken.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.has_column(column.name()) {
            return Err(Error::DuplicateColumn(column.name().to_string()));
        }
        if self.columns.is_empty() {
            self.n_rows = column.len();
        } else if column.len() != self.n_rows {
            return Err(Error::ColumnLengthMismatch {
                column: column.name().to_string(),
                len: column.len(),
                expected: self.n_rows,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Builder-style column append.
    ///
    /// # Errors
    ///
    /// See [`Table::push_column`].
    pub fn with_column<V: Into<Value>>(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        self.push_column(Column::new(name, values))?;
        Ok(self)
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Look up a column, failing with [`Error::UnknownColumn`].
    ///
    /// # Errors
    ///
    /// Returns an error if no column has that name.
    pub fn require(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    /// All columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Number of rows.
    #[must_use]
    pub fn nrow(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[must_use]
    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Fail with [`Error::InvalidShape`] unless the table has at least one column.
    ///
    /// # Errors
    ///
    /// Returns an error for a table without columns.
    pub fn ensure_tabular(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::InvalidShape(
                "expected a table with at least one named column".into(),
            ));
        }
        Ok(())
    }
}
