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

//! Nested Loop Join Operator.
//!
//! The classic O(N*M) fallback. It runs every join the hash operator
//! cannot: non-equality predicates, OR trees, function calls, CROSS joins,
//! and the apply kinds, whose right side is a table-valued source
//! recomputed freshly for every left row.
//!
//! Unmatched-row semantics mirror the hash operator: the preserved side
//! emits exactly one NULL-padded row when nothing on the other side
//! accepts it, tracked with a per-left-row matched flag (plus a matched
//! bitmap over the right side for RIGHT OUTER). Output columns put the
//! preserved side first, so RIGHT OUTER emits `[right | left]` and every
//! other kind emits `[left | right]` - identical to hash execution.

use crate::core::{Error, Result, Row};
use crate::executor::context::ExecutionContext;
use crate::executor::expression::JoinFilter;
use crate::executor::operator::{ColumnInfo, Operator, RowRef};
use crate::plan::ast::JoinKind;

/// A right-hand source computed per left row (table-valued apply).
///
/// `bind` is called once for every left row and returns a fresh operator
/// producing that row's right side.
pub trait LateralSource: Send {
    /// Output schema of the bound source (stable across rows).
    fn schema(&self) -> &[ColumnInfo];

    /// Produce the right side for one left row.
    fn bind(&mut self, left_row: &Row) -> Result<Box<dyn Operator>>;
}

/// The right-hand input of a join: a static source or a per-row one.
pub enum RightInput {
    /// Static row source, materialized once.
    Source(Box<dyn Operator>),
    /// Per-left-row source (CROSS/OUTER APPLY).
    Lateral(Box<dyn LateralSource>),
}

impl RightInput {
    fn schema(&self) -> &[ColumnInfo] {
        match self {
            RightInput::Source(op) => op.schema(),
            RightInput::Lateral(lateral) => lateral.schema(),
        }
    }
}

/// Nested loop join operator.
///
/// For each row in the outer (left) input, scans all rows of the right
/// input and emits pairs accepted by the join predicate.
pub struct NestedLoopJoinOperator {
    left: Box<dyn Operator>,
    right: RightInput,

    join_kind: JoinKind,
    filter: Option<JoinFilter>,
    ctx: ExecutionContext,

    // Output schema; preserved side first
    schema: Vec<ColumnInfo>,
    left_col_count: usize,
    right_col_count: usize,
    /// True when output layout is [right | left] (RIGHT OUTER).
    right_first: bool,

    // Materialized right side; refilled per left row for apply kinds
    right_rows: Vec<Row>,

    current_left_row: Option<Row>,
    current_right_idx: usize,
    left_had_match: bool,

    // RIGHT OUTER: which right rows matched at least once
    right_matched: Vec<bool>,
    returning_unmatched_right: bool,
    unmatched_right_idx: usize,

    opened: bool,
    left_exhausted: bool,
}

impl NestedLoopJoinOperator {
    /// Create a nested loop join over two static sources.
    pub fn new(
        left: Box<dyn Operator>,
        right: Box<dyn Operator>,
        join_kind: JoinKind,
        filter: Option<JoinFilter>,
        ctx: ExecutionContext,
    ) -> Self {
        debug_assert!(!join_kind.is_apply());
        Self::build(left, RightInput::Source(right), join_kind, filter, ctx)
    }

    /// Create an apply operator: the right side is recomputed per left row.
    pub fn apply(
        left: Box<dyn Operator>,
        lateral: Box<dyn LateralSource>,
        join_kind: JoinKind,
        filter: Option<JoinFilter>,
        ctx: ExecutionContext,
    ) -> Self {
        debug_assert!(join_kind.is_apply());
        Self::build(left, RightInput::Lateral(lateral), join_kind, filter, ctx)
    }

    fn build(
        left: Box<dyn Operator>,
        right: RightInput,
        join_kind: JoinKind,
        filter: Option<JoinFilter>,
        ctx: ExecutionContext,
    ) -> Self {
        let right_first = join_kind == JoinKind::RightOuter;
        let left_schema = left.schema();
        let right_schema = right.schema();

        let mut schema = Vec::with_capacity(left_schema.len() + right_schema.len());
        if right_first {
            schema.extend(right_schema.iter().cloned());
            schema.extend(left_schema.iter().cloned());
        } else {
            schema.extend(left_schema.iter().cloned());
            schema.extend(right_schema.iter().cloned());
        }

        let left_col_count = left_schema.len();
        let right_col_count = right_schema.len();

        Self {
            left,
            right,
            join_kind,
            filter,
            ctx,
            schema,
            left_col_count,
            right_col_count,
            right_first,
            right_rows: Vec::new(),
            current_left_row: None,
            current_right_idx: 0,
            left_had_match: false,
            right_matched: Vec::new(),
            returning_unmatched_right: false,
            unmatched_right_idx: 0,
            opened: false,
            left_exhausted: false,
        }
    }

    /// Whether unmatched left rows must be emitted NULL-padded.
    fn preserves_left(&self) -> bool {
        matches!(self.join_kind, JoinKind::LeftOuter | JoinKind::OuterApply)
    }

    /// Combine a pair into the declared output layout.
    #[inline]
    fn combine(&self, left: &Row, right: &Row) -> Row {
        if self.right_first {
            Row::from_combined(right, left)
        } else {
            Row::from_combined(left, right)
        }
    }

    /// Advance to the next left row; for apply kinds this also recomputes
    /// the right side.
    fn advance_left(&mut self) -> Result<bool> {
        self.ctx.check_cancelled()?;

        match self.left.next()? {
            Some(row_ref) => {
                let left_row = row_ref.into_owned();
                if let RightInput::Lateral(lateral) = &mut self.right {
                    let mut op = lateral.bind(&left_row)?;
                    op.open()?;
                    self.right_rows.clear();
                    while let Some(right_ref) = op.next()? {
                        self.right_rows.push(right_ref.into_owned());
                    }
                    op.close()?;
                }
                self.current_left_row = Some(left_row);
                self.current_right_idx = 0;
                self.left_had_match = false;
                Ok(true)
            }
            None => {
                self.left_exhausted = true;
                Ok(false)
            }
        }
    }

    /// Sweep unmatched right rows (RIGHT OUTER, after the left side is
    /// exhausted).
    fn next_unmatched_right(&mut self) -> Result<Option<RowRef>> {
        self.ctx.check_cancelled()?;
        while self.unmatched_right_idx < self.right_rows.len() {
            let idx = self.unmatched_right_idx;
            self.unmatched_right_idx += 1;

            if !self.right_matched[idx] {
                // [right | left-nulls] per the preserved-side-first layout
                let combined = Row::from_combined_owned(
                    self.right_rows[idx].clone(),
                    Row::nulls(self.left_col_count),
                );
                return Ok(Some(RowRef::Owned(combined)));
            }
        }
        Ok(None)
    }
}

impl Operator for NestedLoopJoinOperator {
    fn open(&mut self) -> Result<()> {
        self.left.open()?;

        if let RightInput::Source(right_op) = &mut self.right {
            // Static right side: materialize once, the inner loop restarts
            // over it for every left row
            right_op.open()?;
            while let Some(row_ref) = right_op.next()? {
                self.right_rows.push(row_ref.into_owned());
            }
            if self.join_kind == JoinKind::RightOuter {
                self.right_matched = vec![false; self.right_rows.len()];
            }
        }

        self.advance_left()?;
        self.opened = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<RowRef>> {
        if !self.opened {
            return Err(Error::internal(
                "NestedLoopJoinOperator::next called before open",
            ));
        }

        if self.returning_unmatched_right {
            return self.next_unmatched_right();
        }

        loop {
            if self.left_exhausted {
                if self.join_kind == JoinKind::RightOuter {
                    self.returning_unmatched_right = true;
                    self.unmatched_right_idx = 0;
                    return self.next_unmatched_right();
                }
                return Ok(None);
            }

            let left_row = match &self.current_left_row {
                Some(row) => row,
                None => {
                    if !self.advance_left()? {
                        continue;
                    }
                    self.current_left_row.as_ref().expect("row just set")
                }
            };

            while self.current_right_idx < self.right_rows.len() {
                let right_idx = self.current_right_idx;
                self.current_right_idx += 1;

                let right_row = &self.right_rows[right_idx];
                let matches = match &self.filter {
                    Some(filter) => filter.matches(left_row, right_row)?,
                    // CROSS join / apply without a predicate
                    None => true,
                };

                if matches {
                    self.left_had_match = true;
                    if !self.right_matched.is_empty() {
                        self.right_matched[right_idx] = true;
                    }
                    return Ok(Some(RowRef::Owned(self.combine(left_row, right_row))));
                }
            }

            // Right side exhausted for this left row
            if self.preserves_left() && !self.left_had_match {
                let left_row = self.current_left_row.take().expect("current row present");
                self.advance_left()?;
                let combined =
                    Row::from_combined_owned(left_row, Row::nulls(self.right_col_count));
                return Ok(Some(RowRef::Owned(combined)));
            }

            self.current_left_row = None;
            self.advance_left()?;
        }
    }

    fn close(&mut self) -> Result<()> {
        self.left.close()?;
        if let RightInput::Source(right_op) = &mut self.right {
            right_op.close()?;
        }
        Ok(())
    }

    fn schema(&self) -> &[ColumnInfo] {
        &self.schema
    }

    fn estimated_rows(&self) -> Option<usize> {
        let left_est = self.left.estimated_rows()?;
        match self.join_kind {
            JoinKind::LeftOuter | JoinKind::OuterApply => Some(left_est),
            JoinKind::RightOuter => match &self.right {
                RightInput::Source(op) => op.estimated_rows(),
                RightInput::Lateral(_) => None,
            },
            JoinKind::Cross => match &self.right {
                RightInput::Source(op) => Some(left_est * op.estimated_rows()?),
                RightInput::Lateral(_) => None,
            },
            JoinKind::Inner | JoinKind::CrossApply => None,
        }
    }

    fn name(&self) -> &str {
        match self.join_kind {
            JoinKind::Inner => "NestedLoop (INNER)",
            JoinKind::LeftOuter => "NestedLoop (LEFT OUTER)",
            JoinKind::RightOuter => "NestedLoop (RIGHT OUTER)",
            JoinKind::Cross => "NestedLoop (CROSS)",
            JoinKind::CrossApply => "NestedLoop (CROSS APPLY)",
            JoinKind::OuterApply => "NestedLoop (OUTER APPLY)",
        }
    }
}
