// Copyright 2026 Quarry Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Row type for Quarry - a collection of column values

use std::fmt;
use std::ops::Index;

use super::value::Value;

/// A row of column values
///
/// Rows are positional; column-name resolution happens once at plan time
/// and operators address values by index afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a new empty row
    #[inline]
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Create a row with pre-allocated capacity
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Create a row from a vector of values
    #[inline]
    pub fn from_values(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Create a row by combining two rows (for JOINs) - clones values
    ///
    /// Use `from_combined_owned` when you can consume the input rows.
    #[inline]
    pub fn from_combined(left: &Row, right: &Row) -> Self {
        let mut values = Vec::with_capacity(left.len() + right.len());
        values.extend(left.iter().cloned());
        values.extend(right.iter().cloned());
        Self { values }
    }

    /// Create a row by combining two owned rows (for JOINs) - moves values
    #[inline]
    pub fn from_combined_owned(left: Row, right: Row) -> Self {
        let mut values = left.values;
        values.reserve(right.values.len());
        values.extend(right.values);
        Self { values }
    }

    /// Create a row of NULL values
    #[inline]
    pub fn nulls(len: usize) -> Self {
        Self {
            values: vec![Value::null_unknown(); len],
        }
    }

    /// Get a value by index
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Number of columns in this row
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the values
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Append a value to the row
    #[inline]
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Consume the row and return its values
    #[inline]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// View the row as a value slice
    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}

impl Index<usize> for Row {
    type Output = Value;

    fn index(&self, idx: usize) -> &Value {
        &self.values[idx]
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values() {
        let row = Row::from_values(vec![Value::integer(1), Value::text("a")]);
        assert_eq!(row.len(), 2);
        assert_eq!(row.get(0), Some(&Value::integer(1)));
        assert_eq!(row.get(1), Some(&Value::text("a")));
        assert_eq!(row.get(2), None);
    }

    #[test]
    fn test_from_combined() {
        let left = Row::from_values(vec![Value::integer(1)]);
        let right = Row::from_values(vec![Value::integer(2), Value::integer(3)]);

        let combined = Row::from_combined(&left, &right);
        assert_eq!(combined.len(), 3);
        assert_eq!(combined[0], Value::integer(1));
        assert_eq!(combined[2], Value::integer(3));

        let owned = Row::from_combined_owned(left, right);
        assert_eq!(owned, combined);
    }

    #[test]
    fn test_nulls() {
        let row = Row::nulls(3);
        assert_eq!(row.len(), 3);
        assert!(row.iter().all(|v| v.is_null()));
    }

    #[test]
    fn test_display() {
        let row = Row::from_values(vec![Value::integer(1), Value::null_unknown()]);
        assert_eq!(row.to_string(), "(1, NULL)");
    }
}
