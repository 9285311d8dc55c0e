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

//! Grouping key construction.
//!
//! A query's grouping plan evaluates N grouping expressions against each
//! row and buckets the row at every grouping granularity the query uses.
//! [`GroupKeyBuilder`] produces, per row, N composite keys of widths 1..N
//! (each width-i key is the evaluated expressions 0..i in original order)
//! plus the full-width value tuple. Aggregates that only need a coarser
//! granularity address their bucket by a prefix key without re-deriving
//! it.

use std::hash::{Hash, Hasher};

use ahash::AHasher;
use smallvec::SmallVec;

use crate::core::{Error, Result, Row, Value};
use crate::plan::ast::Expression;

use super::expression::RowFilter;
use super::operator::ColumnInfo;

/// A composite grouping key: an ordered tuple of evaluated values.
///
/// Equality is structural and value-wise across the full tuple; two keys
/// built from different rows compare equal when their values do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    values: SmallVec<[Value; 4]>,
}

impl GroupKey {
    /// Build a key from a value slice.
    pub fn from_values(values: &[Value]) -> Self {
        Self {
            values: values.iter().cloned().collect::<SmallVec<[Value; 4]>>(),
        }
    }

    /// The key's values, widest-first order preserved.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of grouping expressions this key covers.
    pub fn width(&self) -> usize {
        self.values.len()
    }
}

/// Compute a hash for a group key tuple without allocating a `GroupKey`.
#[inline]
pub fn hash_group_key(values: &[Value]) -> u64 {
    let mut hasher = AHasher::default();
    for v in values {
        v.hash(&mut hasher);
    }
    hasher.finish()
}

/// Per-row output of the grouping key builder.
#[derive(Debug, Clone)]
pub struct GroupKeySet {
    keys: Vec<GroupKey>,
    values: Vec<Value>,
}

impl GroupKeySet {
    /// The prefix key covering grouping expressions `0..=index`.
    pub fn key(&self, index: usize) -> Option<&GroupKey> {
        self.keys.get(index)
    }

    /// All prefix keys, width 1 first.
    pub fn keys(&self) -> &[GroupKey] {
        &self.keys
    }

    /// The full-width key.
    pub fn full_key(&self) -> &GroupKey {
        self.keys.last().expect("builder rejects empty expressions")
    }

    /// The full-width evaluated value tuple.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Builds progressively-widening composite keys for a list of grouping
/// expressions.
///
/// Expressions are bound against the input schema once at construction;
/// building a key set per row is evaluation only.
#[derive(Debug)]
pub struct GroupKeyBuilder {
    exprs: Vec<RowFilter>,
}

impl GroupKeyBuilder {
    /// Bind grouping expressions against a schema.
    ///
    /// Fails fast with `InvalidArgument` on an empty expression list and
    /// with a lookup error on unresolvable column references.
    pub fn new(exprs: &[Expression], columns: &[ColumnInfo]) -> Result<Self> {
        if exprs.is_empty() {
            return Err(Error::invalid_argument(
                "grouping expression list is empty",
            ));
        }
        let exprs = exprs
            .iter()
            .map(|expr| RowFilter::new(expr, columns))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { exprs })
    }

    /// Number of grouping expressions.
    pub fn arity(&self) -> usize {
        self.exprs.len()
    }

    /// Evaluate all grouping expressions against a row and build the
    /// prefix keys.
    pub fn build(&self, row: &Row) -> Result<GroupKeySet> {
        let mut values = Vec::with_capacity(self.exprs.len());
        for expr in &self.exprs {
            values.push(expr.evaluate(row)?);
        }

        let keys = (1..=values.len())
            .map(|width| GroupKey::from_values(&values[..width]))
            .collect();

        Ok(GroupKeySet { keys, values })
    }
}
