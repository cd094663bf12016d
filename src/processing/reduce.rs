//! Reduction operations for [`crate::types::DataSet`]: single-column numeric reductions and
//! group counts (the building block for modes).

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::types::{DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Sum numeric values, ignoring nulls.
    Sum,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
    /// Arithmetic mean of numeric values, ignoring nulls. Always `Float64`.
    Mean,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`/`Min`/`Max`/`Mean`, returns `Some(Value::Null)` if there are no non-null values.
/// - For `Count`, always returns `Some(Value::Int64(row_count))`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;

    match op {
        ReduceOp::Count => Some(Value::Int64(dataset.row_count() as i64)),
        ReduceOp::Sum | ReduceOp::Min | ReduceOp::Max | ReduceOp::Mean => {
            match dataset.schema.fields.get(idx) {
                Some(field) => reduce_numeric_typed(dataset, idx, field.data_type, op),
                None => None,
            }
        }
    }
}

fn reduce_numeric_typed(
    dataset: &DataSet,
    idx: usize,
    data_type: DataType,
    op: ReduceOp,
) -> Option<Value> {
    if op == ReduceOp::Mean {
        return Some(mean_of(dataset, idx));
    }

    match data_type {
        DataType::Int64 => {
            let mut acc: Option<i64> = None;
            for row in &dataset.rows {
                if let Some(Value::Int64(v)) = row.get(idx) {
                    acc = Some(match (op, acc) {
                        (ReduceOp::Sum, Some(a)) => a + v,
                        (ReduceOp::Min, Some(a)) => a.min(*v),
                        (ReduceOp::Max, Some(a)) => a.max(*v),
                        (_, _) => *v,
                    });
                }
            }
            Some(acc.map(Value::Int64).unwrap_or(Value::Null))
        }
        DataType::Float64 => {
            let mut acc: Option<f64> = None;
            for row in &dataset.rows {
                if let Some(Value::Float64(v)) = row.get(idx) {
                    acc = Some(match (op, acc) {
                        (ReduceOp::Sum, Some(a)) => a + v,
                        (ReduceOp::Min, Some(a)) => a.min(*v),
                        (ReduceOp::Max, Some(a)) => a.max(*v),
                        (_, _) => *v,
                    });
                }
            }
            Some(acc.map(Value::Float64).unwrap_or(Value::Null))
        }
        _ => Some(Value::Null),
    }
}

fn mean_of(dataset: &DataSet, idx: usize) -> Value {
    let (sum, n) = dataset.reduce_rows((0.0f64, 0usize), |(sum, n), row| {
        match row.get(idx).and_then(Value::as_f64) {
            Some(v) => (sum + v, n + 1),
            None => (sum, n),
        }
    });
    if n == 0 {
        Value::Null
    } else {
        Value::Float64(sum / n as f64)
    }
}

/// An orderable grouping key built from a non-null [`Value`].
///
/// Whole-number floats (such as a birth year stored as `1989.0`) group as integers. Numeric keys
/// order by value across `Int` and `Float` and sort before every `Text` key.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Int(i64),
    /// A float with a fractional part. Never NaN or infinite once loaded.
    Float(f64),
    Text(String),
}

impl GroupKey {
    /// Build a key from a value; `None` for nulls.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Int64(v) => Some(GroupKey::Int(*v)),
            Value::Float64(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                Some(GroupKey::Int(*v as i64))
            }
            Value::Float64(v) => Some(GroupKey::Float(*v)),
            Value::Utf8(s) => Some(GroupKey::Text(s.clone())),
            Value::Timestamp(ts) => Some(GroupKey::Text(ts.to_string())),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            GroupKey::Int(v) => Some(*v),
            GroupKey::Float(_) | GroupKey::Text(_) => None,
        }
    }

    /// Numeric value of `Int` and `Float` keys.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GroupKey::Int(v) => Some(*v as f64),
            GroupKey::Float(v) => Some(*v),
            GroupKey::Text(_) => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            GroupKey::Int(_) => 0,
            GroupKey::Float(_) => 1,
            GroupKey::Text(_) => 2,
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Int(a), GroupKey::Int(b)) => a.cmp(b),
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
            (GroupKey::Text(_), _) | (_, GroupKey::Text(_)) => self.rank().cmp(&other.rank()),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a
                    .total_cmp(&b)
                    .then_with(|| self.rank().cmp(&other.rank())),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            GroupKey::Int(v) => v.hash(state),
            GroupKey::Float(v) => v.to_bits().hash(state),
            GroupKey::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Int(v) => write!(f, "{v}"),
            GroupKey::Float(v) => write!(f, "{v}"),
            GroupKey::Text(s) => f.write_str(s),
        }
    }
}

/// Number of rows sharing one combination of key values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub key: Vec<GroupKey>,
    pub count: usize,
}

/// Count rows per distinct combination of values in `columns`.
///
/// - Returns `None` if any column does not exist in the schema.
/// - Rows with a null in any of the key columns are not counted.
/// - Groups are ordered by descending count; equal counts are ordered by ascending key, so the
///   first group is the mode with the smallest-key tie-break.
pub fn group_counts(dataset: &DataSet, columns: &[&str]) -> Option<Vec<GroupCount>> {
    let idxs = columns
        .iter()
        .map(|c| dataset.schema.index_of(c))
        .collect::<Option<Vec<_>>>()?;

    let mut counts: HashMap<Vec<GroupKey>, usize> = HashMap::new();
    for row in &dataset.rows {
        let key = idxs
            .iter()
            .map(|&i| row.get(i).and_then(GroupKey::from_value))
            .collect::<Option<Vec<_>>>();
        if let Some(key) = key {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    let mut out: Vec<GroupCount> = counts
        .into_iter()
        .map(|(key, count)| GroupCount { key, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    Some(out)
}

/// Most frequent combination of values in `columns`; see [`group_counts`] for the tie-break.
///
/// Returns `Some(None)` when no row has non-null values in every key column.
pub fn mode(dataset: &DataSet, columns: &[&str]) -> Option<Option<GroupCount>> {
    group_counts(dataset, columns).map(|groups| groups.into_iter().next())
}
