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

//! Streaming hash join operator.
//!
//! The join proceeds in two phases:
//!
//! 1. **Build Phase** (in `open()`): materialize the build side and index
//!    it by join key. Build rows with a NULL key component are skipped
//!    entirely; under SQL semantics they can never match.
//! 2. **Probe Phase** (in `next()`): stream the probe side one row at a
//!    time, look up candidates, re-evaluate the full join predicate for
//!    each candidate, and emit combined rows lazily.
//!
//! The preserved side of an outer join (left for LEFT, right for RIGHT) is
//! always the probe side, so unmatched preserved rows are emitted inline
//! as the probe streams; no second sweep over the build side is needed.
//! Output columns are always `[probe | build]`, which puts the preserved
//! side first for both outer kinds.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::core::{ColumnType, Error, Result, Row, Value};
use crate::executor::context::ExecutionContext;
use crate::executor::expression::{sql_values_equal, JoinFilter};
use crate::executor::operator::{ColumnInfo, Operator, RowRef};
use crate::plan::ast::JoinKind;

/// Sentinel value indicating end of chain or empty bucket.
const EMPTY: u32 = u32::MAX;

/// Minimum number of buckets (must be power of 2).
const MIN_BUCKETS: usize = 16;

/// A hash entry in the join hash table.
#[derive(Debug, Clone, Copy)]
struct HashEntry {
    /// Full 64-bit hash for quick rejection during probe.
    hash: u64,
    /// Index into the build rows vector.
    row_idx: u32,
    /// Index of next entry in the chain (EMPTY = end of chain).
    next: u32,
}

/// Hash table for the build phase of a hash join.
///
/// Chained entries stored in a flat vector; bucket count is a power of two
/// so the bucket index is a mask operation. Rows whose key contains a NULL
/// are never inserted.
pub struct JoinHashTable {
    /// First entry index for each bucket (-1 if empty).
    bucket_heads: Vec<i32>,
    /// Flat storage of all entries, one per indexed build row.
    entries: Vec<HashEntry>,
    /// Mask for computing bucket index: bucket = hash & mask
    bucket_mask: u64,
}

impl JoinHashTable {
    /// Create a table pre-sized for the given number of rows (~75% load).
    pub fn with_capacity(row_count: usize) -> Self {
        let bucket_count = (row_count * 4 / 3).max(MIN_BUCKETS).next_power_of_two();
        Self {
            bucket_heads: vec![-1; bucket_count],
            entries: Vec::with_capacity(row_count),
            bucket_mask: (bucket_count - 1) as u64,
        }
    }

    /// Build a table from rows using the specified key indices.
    ///
    /// Rows with a NULL value in any key column are excluded from the
    /// table entirely.
    pub fn build(rows: &[Row], key_indices: &[usize]) -> Self {
        let mut table = Self::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            if key_indices
                .iter()
                .any(|&k| row.get(k).map(Value::is_null).unwrap_or(true))
            {
                continue;
            }
            let hash = hash_row_keys(row, key_indices);
            table.insert(hash, idx as u32);
        }
        table
    }

    /// Insert a row index with its pre-computed hash.
    #[inline]
    pub fn insert(&mut self, hash: u64, row_idx: u32) {
        let bucket = (hash & self.bucket_mask) as usize;
        let old_head = self.bucket_heads[bucket];
        let entry_idx = self.entries.len() as u32;
        let next = if old_head >= 0 { old_head as u32 } else { EMPTY };
        self.entries.push(HashEntry {
            hash,
            row_idx,
            next,
        });
        self.bucket_heads[bucket] = entry_idx as i32;
    }

    /// Collect candidate row indices for a probe hash, in build-side
    /// encounter order.
    ///
    /// The chain yields newest-first; reversing restores insertion order.
    /// Callers must verify actual key equality for each candidate.
    pub fn probe_into(&self, hash: u64, out: &mut Vec<usize>) {
        out.clear();
        let bucket = (hash & self.bucket_mask) as usize;
        let mut current = self.bucket_heads[bucket];
        while current >= 0 {
            let entry = &self.entries[current as usize];
            if entry.hash == hash {
                out.push(entry.row_idx as usize);
            }
            current = if entry.next == EMPTY {
                -1
            } else {
                entry.next as i32
            };
        }
        out.reverse();
    }

    /// Number of indexed entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table indexes no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hash a slice of key values into a single u64.
///
/// Numeric values hash through their f64 bits so INTEGER and FLOAT keys
/// that compare equal land in the same bucket.
pub fn hash_key_values<'a>(values: impl Iterator<Item = Option<&'a Value>>) -> u64 {
    let mut hasher = FxHasher::default();
    for value in values {
        match value {
            Some(Value::Integer(i)) => {
                1_u8.hash(&mut hasher);
                (*i as f64).to_bits().hash(&mut hasher);
            }
            Some(Value::Float(f)) => {
                1_u8.hash(&mut hasher);
                f.to_bits().hash(&mut hasher);
            }
            Some(Value::Text(s)) => {
                2_u8.hash(&mut hasher);
                s.hash(&mut hasher);
            }
            Some(Value::Boolean(b)) => {
                3_u8.hash(&mut hasher);
                b.hash(&mut hasher);
            }
            Some(Value::Timestamp(ts)) => {
                4_u8.hash(&mut hasher);
                ts.timestamp_micros().hash(&mut hasher);
            }
            Some(Value::Null(_)) | None => {
                5_u8.hash(&mut hasher);
            }
        }
    }
    hasher.finish()
}

/// Hash row key columns into a single u64.
#[inline]
pub fn hash_row_keys(row: &Row, key_indices: &[usize]) -> u64 {
    hash_key_values(key_indices.iter().map(|&idx| row.get(idx)))
}

/// Verify that two rows have equal key values (handles hash collisions).
fn verify_key_equality(
    probe: &Row,
    build: &Row,
    probe_indices: &[usize],
    build_indices: &[usize],
) -> bool {
    debug_assert_eq!(probe_indices.len(), build_indices.len());
    probe_indices
        .iter()
        .zip(build_indices.iter())
        .all(|(&p, &b)| match (probe.get(p), build.get(b)) {
            (Some(pv), Some(bv)) => sql_values_equal(pv, bv),
            _ => false,
        })
}

/// Streaming hash join operator.
///
/// Supports INNER, LEFT OUTER and RIGHT OUTER joins; the planner never
/// selects hash execution for apply kinds (their right side is recomputed
/// per left row) or CROSS joins (no key).
pub struct HashJoinOperator {
    left: Box<dyn Operator>,
    right: Box<dyn Operator>,

    join_kind: JoinKind,
    /// Key column positions in probe-side rows.
    probe_key_indices: Vec<usize>,
    /// Key column positions in build-side rows.
    build_key_indices: Vec<usize>,
    /// Nullable-unified composite key type (diagnostic; see planner).
    key_types: Vec<ColumnType>,
    /// Full original join predicate, re-evaluated per candidate pair.
    filter: JoinFilter,
    ctx: ExecutionContext,

    /// True when the left input is the build side (RIGHT OUTER joins).
    build_is_left: bool,

    // Build phase state (populated in open())
    build_rows: Vec<Row>,
    hash_table: Option<JoinHashTable>,

    // Output schema: [probe | build]
    schema: Vec<ColumnInfo>,
    build_col_count: usize,

    // Probe phase state
    current_probe_row: Option<Row>,
    current_matches: Vec<usize>,
    current_match_idx: usize,
    probe_had_match: bool,

    opened: bool,
}

impl HashJoinOperator {
    /// Create a new hash join operator.
    ///
    /// `left_key_indices[i]` and `right_key_indices[i]` are the two ends
    /// of the i-th equality conjunct; `key_types[i]` is their unified
    /// type. `filter` is the complete original predicate.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        left: Box<dyn Operator>,
        right: Box<dyn Operator>,
        join_kind: JoinKind,
        left_key_indices: Vec<usize>,
        right_key_indices: Vec<usize>,
        key_types: Vec<ColumnType>,
        filter: JoinFilter,
        ctx: ExecutionContext,
    ) -> Self {
        debug_assert!(matches!(
            join_kind,
            JoinKind::Inner | JoinKind::LeftOuter | JoinKind::RightOuter
        ));

        // The preserved side is always probed; inner joins build on the
        // right by convention.
        let build_is_left = join_kind == JoinKind::RightOuter;

        let (probe_schema, build_schema) = if build_is_left {
            (right.schema(), left.schema())
        } else {
            (left.schema(), right.schema())
        };
        let mut schema = Vec::with_capacity(probe_schema.len() + build_schema.len());
        schema.extend(probe_schema.iter().cloned());
        schema.extend(build_schema.iter().cloned());
        let build_col_count = build_schema.len();

        let (probe_key_indices, build_key_indices) = if build_is_left {
            (right_key_indices, left_key_indices)
        } else {
            (left_key_indices, right_key_indices)
        };

        Self {
            left,
            right,
            join_kind,
            probe_key_indices,
            build_key_indices,
            key_types,
            filter,
            ctx,
            build_is_left,
            build_rows: Vec::new(),
            hash_table: None,
            schema,
            build_col_count,
            current_probe_row: None,
            current_matches: Vec::new(),
            current_match_idx: 0,
            probe_had_match: false,
            opened: false,
        }
    }

    /// The unified composite key type.
    pub fn key_types(&self) -> &[ColumnType] {
        &self.key_types
    }

    fn probe_op(&mut self) -> &mut Box<dyn Operator> {
        if self.build_is_left {
            &mut self.right
        } else {
            &mut self.left
        }
    }

    /// Whether unmatched probe rows must be emitted NULL-padded.
    fn preserves_probe(&self) -> bool {
        self.join_kind.is_outer()
    }

    /// Evaluate the full predicate with rows in their original
    /// left/right orientation.
    fn predicate_accepts(&self, probe_row: &Row, build_row: &Row) -> Result<bool> {
        if self.build_is_left {
            self.filter.matches(build_row, probe_row)
        } else {
            self.filter.matches(probe_row, build_row)
        }
    }

    fn advance_probe(&mut self) -> Result<bool> {
        self.ctx.check_cancelled()?;

        let next = self.probe_op().next()?;
        match next {
            Some(row_ref) => {
                let probe_row = row_ref.into_owned();

                // A NULL probe key finds no bucket and thus no matches
                let has_null_key = self
                    .probe_key_indices
                    .iter()
                    .any(|&k| probe_row.get(k).map(Value::is_null).unwrap_or(true));
                if has_null_key {
                    self.current_matches.clear();
                } else {
                    let hash = hash_row_keys(&probe_row, &self.probe_key_indices);
                    let table = self
                        .hash_table
                        .as_ref()
                        .expect("hash table built in open()");
                    let mut matches = std::mem::take(&mut self.current_matches);
                    table.probe_into(hash, &mut matches);
                    self.current_matches = matches;
                }

                self.current_probe_row = Some(probe_row);
                self.current_match_idx = 0;
                self.probe_had_match = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Operator for HashJoinOperator {
    fn open(&mut self) -> Result<()> {
        self.left.open()?;
        self.right.open()?;

        // Materialize the build side and index it
        let build_op = if self.build_is_left {
            &mut self.left
        } else {
            &mut self.right
        };
        let mut build_rows = Vec::new();
        loop {
            self.ctx.check_cancelled()?;
            match build_op.next()? {
                Some(row_ref) => build_rows.push(row_ref.into_owned()),
                None => break,
            }
        }

        self.hash_table = Some(JoinHashTable::build(&build_rows, &self.build_key_indices));
        self.build_rows = build_rows;
        self.opened = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<RowRef>> {
        if !self.opened {
            return Err(Error::internal("HashJoinOperator::next called before open"));
        }

        loop {
            // Emit remaining candidates for the current probe row
            while self.current_match_idx < self.current_matches.len() {
                let build_idx = self.current_matches[self.current_match_idx];
                self.current_match_idx += 1;

                let probe_row = self
                    .current_probe_row
                    .as_ref()
                    .expect("probe row present while matches remain");
                let build_row = &self.build_rows[build_idx];

                // Quick key check handles hash collisions; the full
                // original predicate then re-validates the pair.
                if !verify_key_equality(
                    probe_row,
                    build_row,
                    &self.probe_key_indices,
                    &self.build_key_indices,
                ) {
                    continue;
                }
                if !self.predicate_accepts(probe_row, build_row)? {
                    continue;
                }

                self.probe_had_match = true;
                let build_row = build_row.clone();
                // Last candidate: take probe ownership instead of cloning
                let probe_row = if self.current_match_idx >= self.current_matches.len() {
                    self.current_probe_row.take().expect("probe row present")
                } else {
                    probe_row.clone()
                };
                return Ok(Some(RowRef::composite(probe_row, build_row)));
            }

            // Unmatched preserved (probe) row: emit exactly one NULL-padded row
            if self.preserves_probe() && !self.probe_had_match {
                if let Some(probe_row) = self.current_probe_row.take() {
                    let null_build = Row::nulls(self.build_col_count);
                    return Ok(Some(RowRef::composite(probe_row, null_build)));
                }
            }
            self.current_probe_row = None;

            if !self.advance_probe()? {
                return Ok(None);
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.left.close()?;
        self.right.close()?;
        Ok(())
    }

    fn schema(&self) -> &[ColumnInfo] {
        &self.schema
    }

    fn estimated_rows(&self) -> Option<usize> {
        let left_est = self.left.estimated_rows()?;
        let right_est = self.right.estimated_rows()?;
        Some(match self.join_kind {
            JoinKind::Inner => left_est.min(right_est),
            JoinKind::LeftOuter => left_est,
            JoinKind::RightOuter => right_est,
            _ => left_est.max(right_est),
        })
    }

    fn name(&self) -> &str {
        match self.join_kind {
            JoinKind::Inner => "HashJoin (INNER)",
            JoinKind::LeftOuter => "HashJoin (LEFT OUTER)",
            JoinKind::RightOuter => "HashJoin (RIGHT OUTER)",
            _ => "HashJoin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::operator::MaterializedOperator;
    use crate::plan::ast::Expression;

    fn make_rows(data: Vec<Vec<i64>>) -> Vec<Row> {
        data.into_iter()
            .map(|vals| Row::from_values(vals.into_iter().map(Value::integer).collect()))
            .collect()
    }

    fn make_operator(data: Vec<Vec<i64>>, cols: Vec<&str>) -> Box<dyn Operator> {
        let rows = make_rows(data);
        let schema = cols.into_iter().map(ColumnInfo::new).collect();
        Box::new(MaterializedOperator::new(rows, schema))
    }

    fn eq_filter(
        left: &dyn Operator,
        right: &dyn Operator,
        left_col: &str,
        right_col: &str,
    ) -> JoinFilter {
        let expr = Expression::equals(Expression::column(left_col), Expression::column(right_col));
        JoinFilter::new(&expr, left.schema(), right.schema()).unwrap()
    }

    fn collect_results(op: &mut dyn Operator) -> Result<Vec<Row>> {
        let mut results = Vec::new();
        op.open()?;
        while let Some(row_ref) = op.next()? {
            results.push(row_ref.into_owned());
        }
        op.close()?;
        Ok(results)
    }

    fn int_key() -> Vec<ColumnType> {
        vec![ColumnType::new(crate::core::DataType::Integer)]
    }

    #[test]
    fn test_inner_join() {
        let left = make_operator(
            vec![vec![1, 10], vec![2, 20], vec![3, 30]],
            vec!["id", "value"],
        );
        let right = make_operator(vec![vec![1, 100], vec![3, 300]], vec!["rid", "data"]);
        let filter = eq_filter(left.as_ref(), right.as_ref(), "id", "rid");

        let mut join = HashJoinOperator::new(
            left,
            right,
            JoinKind::Inner,
            vec![0],
            vec![0],
            int_key(),
            filter,
            ExecutionContext::new(),
        );

        let results = collect_results(&mut join).unwrap();
        assert_eq!(results.len(), 2);

        let row1 = &results[0];
        assert_eq!(row1.get(0), Some(&Value::integer(1)));
        assert_eq!(row1.get(1), Some(&Value::integer(10)));
        assert_eq!(row1.get(2), Some(&Value::integer(1)));
        assert_eq!(row1.get(3), Some(&Value::integer(100)));
    }

    #[test]
    fn test_left_outer_join_null_padding() {
        let left = make_operator(
            vec![vec![1, 10], vec![2, 20], vec![3, 30]],
            vec!["id", "value"],
        );
        let right = make_operator(vec![vec![1, 100]], vec!["rid", "data"]);
        let filter = eq_filter(left.as_ref(), right.as_ref(), "id", "rid");

        let mut join = HashJoinOperator::new(
            left,
            right,
            JoinKind::LeftOuter,
            vec![0],
            vec![0],
            int_key(),
            filter,
            ExecutionContext::new(),
        );

        let results = collect_results(&mut join).unwrap();
        assert_eq!(results.len(), 3);

        let row2 = results
            .iter()
            .find(|r| r.get(0) == Some(&Value::integer(2)))
            .unwrap();
        assert!(row2.get(2).unwrap().is_null());
        assert!(row2.get(3).unwrap().is_null());
    }

    #[test]
    fn test_right_outer_join_preserved_side_first() {
        let left = make_operator(vec![vec![1, 10]], vec!["id", "value"]);
        let right = make_operator(
            vec![vec![1, 100], vec![2, 200]],
            vec!["rid", "data"],
        );
        let filter = eq_filter(left.as_ref(), right.as_ref(), "id", "rid");

        let mut join = HashJoinOperator::new(
            left,
            right,
            JoinKind::RightOuter,
            vec![0],
            vec![0],
            int_key(),
            filter,
            ExecutionContext::new(),
        );

        // Output layout is [right | left] for RIGHT OUTER
        assert_eq!(join.schema()[0].name, "rid");
        assert_eq!(join.schema()[2].name, "id");

        let results = collect_results(&mut join).unwrap();
        assert_eq!(results.len(), 2);

        let unmatched = results
            .iter()
            .find(|r| r.get(0) == Some(&Value::integer(2)))
            .unwrap();
        assert!(unmatched.get(2).unwrap().is_null());
        assert!(unmatched.get(3).unwrap().is_null());
    }

    #[test]
    fn test_null_build_keys_are_skipped() {
        let left = make_operator(vec![vec![1, 10]], vec!["id", "value"]);
        let right_rows = vec![
            Row::from_values(vec![Value::null_unknown(), Value::integer(100)]),
            Row::from_values(vec![Value::integer(1), Value::integer(200)]),
        ];
        let right: Box<dyn Operator> = Box::new(MaterializedOperator::new(
            right_rows,
            vec![ColumnInfo::new("rid"), ColumnInfo::new("data")],
        ));
        let filter = eq_filter(left.as_ref(), right.as_ref(), "id", "rid");

        let mut join = HashJoinOperator::new(
            left,
            right,
            JoinKind::Inner,
            vec![0],
            vec![0],
            int_key(),
            filter,
            ExecutionContext::new(),
        );

        let results = collect_results(&mut join).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].get(3), Some(&Value::integer(200)));
    }

    #[test]
    fn test_null_probe_key_yields_no_match() {
        let left_rows = vec![
            Row::from_values(vec![Value::null_unknown(), Value::integer(10)]),
            Row::from_values(vec![Value::integer(1), Value::integer(20)]),
        ];
        let left: Box<dyn Operator> = Box::new(MaterializedOperator::new(
            left_rows,
            vec![ColumnInfo::new("id"), ColumnInfo::new("value")],
        ));
        let right = make_operator(vec![vec![1, 100]], vec!["rid", "data"]);
        let filter = eq_filter(left.as_ref(), right.as_ref(), "id", "rid");

        let mut join = HashJoinOperator::new(
            left,
            right,
            JoinKind::LeftOuter,
            vec![0],
            vec![0],
            int_key(),
            filter,
            ExecutionContext::new(),
        );

        let results = collect_results(&mut join).unwrap();
        // NULL-keyed left row is preserved with NULL right side
        assert_eq!(results.len(), 2);
        let null_row = results.iter().find(|r| r.get(0).unwrap().is_null()).unwrap();
        assert!(null_row.get(2).unwrap().is_null());
    }

    #[test]
    fn test_bucket_preserves_encounter_order() {
        let left = make_operator(vec![vec![1]], vec!["id"]);
        let right = make_operator(
            vec![vec![1, 100], vec![1, 200], vec![1, 300]],
            vec!["rid", "seq"],
        );
        let filter = eq_filter(left.as_ref(), right.as_ref(), "id", "rid");

        let mut join = HashJoinOperator::new(
            left,
            right,
            JoinKind::Inner,
            vec![0],
            vec![0],
            int_key(),
            filter,
            ExecutionContext::new(),
        );

        let results = collect_results(&mut join).unwrap();
        let seqs: Vec<i64> = results
            .iter()
            .map(|r| r.get(2).unwrap().as_int64().unwrap())
            .collect();
        assert_eq!(seqs, vec![100, 200, 300]);
    }

    #[test]
    fn test_empty_build() {
        let left = make_operator(vec![vec![1, 10], vec![2, 20]], vec!["id", "value"]);
        let right = make_operator(vec![], vec!["rid", "data"]);
        let filter = eq_filter(left.as_ref(), right.as_ref(), "id", "rid");

        let mut join = HashJoinOperator::new(
            left,
            right,
            JoinKind::Inner,
            vec![0],
            vec![0],
            int_key(),
            filter,
            ExecutionContext::new(),
        );

        let results = collect_results(&mut join).unwrap();
        assert_eq!(results.len(), 0);
    }

    #[test]
    fn test_multi_key_join() {
        let left = make_operator(
            vec![vec![1, 10, 100], vec![1, 20, 200], vec![2, 10, 300]],
            vec!["a", "b", "val"],
        );
        let right = make_operator(
            vec![vec![1, 10, 1000], vec![1, 20, 2000]],
            vec!["c", "d", "data"],
        );
        let expr = Expression::and(
            Expression::equals(Expression::column("a"), Expression::column("c")),
            Expression::equals(Expression::column("b"), Expression::column("d")),
        );
        let filter = JoinFilter::new(&expr, left.schema(), right.schema()).unwrap();

        let mut join = HashJoinOperator::new(
            left,
            right,
            JoinKind::Inner,
            vec![0, 1],
            vec![0, 1],
            vec![
                ColumnType::new(crate::core::DataType::Integer),
                ColumnType::new(crate::core::DataType::Integer),
            ],
            filter,
            ExecutionContext::new(),
        );

        let results = collect_results(&mut join).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_cancellation_aborts_probe() {
        let left = make_operator(vec![vec![1], vec![2]], vec!["id"]);
        let right = make_operator(vec![vec![1]], vec!["rid"]);
        let filter = eq_filter(left.as_ref(), right.as_ref(), "id", "rid");

        let ctx = ExecutionContext::new();
        let mut join = HashJoinOperator::new(
            left,
            right,
            JoinKind::Inner,
            vec![0],
            vec![0],
            int_key(),
            filter,
            ctx.clone(),
        );

        join.open().unwrap();
        ctx.cancel();
        let err = loop {
            match join.next() {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("expected cancellation error"),
                Err(e) => break e,
            }
        };
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_hash_table_build_and_probe() {
        let rows = make_rows(vec![vec![1, 10], vec![2, 20], vec![1, 30]]);
        let table = JoinHashTable::build(&rows, &[0]);
        assert_eq!(table.len(), 3);

        let hash = hash_row_keys(&rows[0], &[0]);
        let mut matches = Vec::new();
        table.probe_into(hash, &mut matches);
        assert_eq!(matches, vec![0, 2]);
    }

    #[test]
    fn test_hash_consistent_across_numeric_types() {
        let int_row = Row::from_values(vec![Value::integer(3)]);
        let float_row = Row::from_values(vec![Value::float(3.0)]);
        assert_eq!(hash_row_keys(&int_row, &[0]), hash_row_keys(&float_row, &[0]));
    }
}
