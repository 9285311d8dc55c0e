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

//! Volcano-style operator interface for streaming query execution.
//!
//! Operators pull rows on demand through the open-next-close lifecycle.
//! Joined rows are surfaced through [`RowRef`] so combining two sides does
//! not clone values until a caller actually materializes the result.

use std::fmt;

use crate::core::{ColumnType, Result, Row, Value};

/// Column information for operator schema.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Original table alias (if from a table)
    pub table_alias: Option<String>,
    /// Declared type of the column
    pub column_type: ColumnType,
}

impl ColumnInfo {
    /// Create a new column info with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_alias: None,
            column_type: ColumnType::default(),
        }
    }

    /// Create a column info with table alias.
    pub fn with_table(name: impl Into<String>, table_alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_alias: Some(table_alias.into()),
            column_type: ColumnType::default(),
        }
    }

    /// Attach the declared column type.
    pub fn typed(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }
}

/// Volcano-style iterator interface for query operators.
///
/// 1. `open()` - Initialize the operator (called once)
/// 2. `next()` - Get the next row (called repeatedly until None)
/// 3. `close()` - Release resources (called once at end)
///
/// Operators are `Send` to allow execution on different threads, but
/// individual operators are not `Sync` - they maintain mutable state.
pub trait Operator: Send {
    /// Initialize the operator.
    ///
    /// Called once before the first `next()` call. Child operators should
    /// be opened here along with any one-time initialization.
    fn open(&mut self) -> Result<()>;

    /// Get the next row from this operator.
    ///
    /// Returns:
    /// - `Ok(Some(row))` - A row is available
    /// - `Ok(None)` - No more rows (exhausted)
    /// - `Err(e)` - An error occurred
    ///
    /// After returning `None`, subsequent calls should continue to return `None`.
    fn next(&mut self) -> Result<Option<RowRef>>;

    /// Close the operator and release resources.
    fn close(&mut self) -> Result<()>;

    /// Get the schema (column information) for this operator's output.
    fn schema(&self) -> &[ColumnInfo];

    /// Get an estimate of the number of rows this operator will produce.
    ///
    /// Returns `None` if the estimate is not available.
    fn estimated_rows(&self) -> Option<usize> {
        None
    }

    /// Get a descriptive name for this operator (for EXPLAIN-style output).
    fn name(&self) -> &str;
}

/// A row reference that is either owned or a composite of two rows.
///
/// `Composite` allows joins to return combined rows without copying values
/// from both sides; values are only copied when the final result is
/// materialized.
#[derive(Debug)]
pub enum RowRef {
    /// Owned row - the row data is owned by this RowRef.
    Owned(Row),

    /// Composite row - combines two rows without copying.
    Composite(CompositeRow),
}

impl RowRef {
    /// Create an owned RowRef from a Row.
    #[inline]
    pub fn owned(row: Row) -> Self {
        RowRef::Owned(row)
    }

    /// Create a composite RowRef from first and second parts.
    #[inline]
    pub fn composite(first: Row, second: Row) -> Self {
        RowRef::Composite(CompositeRow::new(first, second))
    }

    /// Get the number of columns in this row.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            RowRef::Owned(row) => row.len(),
            RowRef::Composite(comp) => comp.len(),
        }
    }

    /// Check if this row is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a value by index without cloning.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Value> {
        match self {
            RowRef::Owned(row) => row.get(idx),
            RowRef::Composite(comp) => comp.get(idx),
        }
    }

    /// Convert to an owned Row.
    ///
    /// For `Owned`, this is a no-op move. For `Composite`, this
    /// materializes the combined row.
    #[inline]
    pub fn into_owned(self) -> Row {
        match self {
            RowRef::Owned(row) => row,
            RowRef::Composite(comp) => comp.materialize(),
        }
    }
}

/// A composite row that references values from two source rows.
///
/// Logical columns: first row's columns, then the second row's columns.
#[derive(Debug, Clone)]
pub struct CompositeRow {
    first: Row,
    second: Row,
    first_cols: usize,
}

impl CompositeRow {
    /// Create a new composite row from two parts.
    #[inline]
    pub fn new(first: Row, second: Row) -> Self {
        let first_cols = first.len();
        Self {
            first,
            second,
            first_cols,
        }
    }

    /// Get the total number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.first_cols + self.second.len()
    }

    /// Check if this composite row is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty()
    }

    /// Get a value by index without cloning.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Value> {
        if idx < self.first_cols {
            self.first.get(idx)
        } else {
            self.second.get(idx - self.first_cols)
        }
    }

    /// Materialize into an owned Row by copying values from both sides.
    pub fn materialize(self) -> Row {
        Row::from_combined_owned(self.first, self.second)
    }
}

impl fmt::Display for CompositeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for i in 0..self.len() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get(i) {
                Some(v) => write!(f, "{}", v)?,
                None => write!(f, "NULL")?,
            }
        }
        write!(f, ")")
    }
}

// ============================================================================
// Helper Operators
// ============================================================================

/// An empty operator that produces no rows.
pub struct EmptyOperator {
    schema: Vec<ColumnInfo>,
}

impl EmptyOperator {
    /// Create an empty operator with no schema.
    pub fn new() -> Self {
        Self { schema: Vec::new() }
    }

    /// Create an empty operator with a specific schema.
    pub fn with_schema(schema: Vec<ColumnInfo>) -> Self {
        Self { schema }
    }
}

impl Default for EmptyOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl Operator for EmptyOperator {
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn next(&mut self) -> Result<Option<RowRef>> {
        Ok(None)
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn schema(&self) -> &[ColumnInfo] {
        &self.schema
    }

    fn estimated_rows(&self) -> Option<usize> {
        Some(0)
    }

    fn name(&self) -> &str {
        "Empty"
    }
}

/// An operator that yields rows from a pre-materialized vector.
///
/// This is the adapter row-source providers use to participate in the
/// operator pipeline: CTE results, subquery results, test fixtures.
pub struct MaterializedOperator {
    rows: Vec<Row>,
    schema: Vec<ColumnInfo>,
    current_idx: usize,
}

impl MaterializedOperator {
    /// Create an operator from a vector of rows.
    pub fn new(rows: Vec<Row>, schema: Vec<ColumnInfo>) -> Self {
        Self {
            rows,
            schema,
            current_idx: 0,
        }
    }

    /// Create from rows with column names as strings.
    pub fn from_rows(rows: Vec<Row>, columns: Vec<String>) -> Self {
        let schema = columns.into_iter().map(ColumnInfo::new).collect();
        Self::new(rows, schema)
    }
}

impl Operator for MaterializedOperator {
    fn open(&mut self) -> Result<()> {
        self.current_idx = 0;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<RowRef>> {
        if self.current_idx >= self.rows.len() {
            return Ok(None);
        }

        // Take ownership of the row, leaving an empty Row in its place.
        // Safe because we only iterate forward and never revisit rows.
        let row = std::mem::take(&mut self.rows[self.current_idx]);
        self.current_idx += 1;
        Ok(Some(RowRef::Owned(row)))
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn schema(&self) -> &[ColumnInfo] {
        &self.schema
    }

    fn estimated_rows(&self) -> Option<usize> {
        Some(self.rows.len())
    }

    fn name(&self) -> &str {
        "Materialized"
    }
}
