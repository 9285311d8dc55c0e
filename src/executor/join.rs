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

//! Join/apply planning.
//!
//! Given two row sources, a join kind and a predicate, the planner selects
//! the physical strategy and builds the executor:
//!
//! - **Hash execution** requires the predicate's top-level AND tree to
//!   decompose into equality conjuncts between one left column and one
//!   right column each (either orientation). A single conjunct that is
//!   anything else - a comparison, an OR, a function call - downgrades
//!   the whole join to nested-loop. Apply kinds are never hash-eligible:
//!   their right side depends on the current left row.
//! - **Nested-loop execution** is the fallback and the only strategy for
//!   CROSS joins and the apply kinds.
//!
//! An ineligible predicate is a planning signal, not an error.

use log::debug;

use crate::core::{ColumnType, Error, Result};
use crate::executor::context::ExecutionContext;
use crate::executor::expression::{ColumnIndex, JoinFilter};
use crate::executor::operator::{ColumnInfo, Operator};
use crate::executor::operators::hash_join::HashJoinOperator;
use crate::executor::operators::nested_loop_join::{NestedLoopJoinOperator, RightInput};
use crate::executor::PlannerConfig;
use crate::plan::ast::{ColumnRef, Expression, InfixOperator, JoinKind};

/// The composite equality key extracted from a hash-eligible predicate.
///
/// `left[i]` and `right[i]` are the two ends of the i-th conjunct;
/// `key_types[i]` is the nullable unification of their declared types.
#[derive(Debug, Clone, Default)]
pub struct EquiKeyColumns {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
    pub key_types: Vec<ColumnType>,
}

impl EquiKeyColumns {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Decompose a join predicate into equality key columns.
///
/// Returns `None` when any top-level conjunct is not a plain
/// left-column = right-column equality (order-independent), or when the
/// column types of a pair cannot be unified. `Some` holds one entry per
/// conjunct, in predicate order.
pub fn extract_equi_key_columns(
    condition: &Expression,
    left_columns: &[ColumnInfo],
    right_columns: &[ColumnInfo],
) -> Option<EquiKeyColumns> {
    let left_index = ColumnIndex::build(left_columns);
    let right_index = ColumnIndex::build(right_columns);

    let mut keys = EquiKeyColumns::default();
    if collect_equi_keys(
        condition,
        left_columns,
        right_columns,
        &left_index,
        &right_index,
        &mut keys,
    ) {
        Some(keys)
    } else {
        None
    }
}

fn collect_equi_keys(
    condition: &Expression,
    left_columns: &[ColumnInfo],
    right_columns: &[ColumnInfo],
    left_index: &ColumnIndex,
    right_index: &ColumnIndex,
    keys: &mut EquiKeyColumns,
) -> bool {
    match condition {
        Expression::Infix(infix) if infix.op_type == InfixOperator::And => {
            collect_equi_keys(
                &infix.left,
                left_columns,
                right_columns,
                left_index,
                right_index,
                keys,
            ) && collect_equi_keys(
                &infix.right,
                left_columns,
                right_columns,
                left_index,
                right_index,
                keys,
            )
        }
        Expression::Infix(infix) if infix.op_type == InfixOperator::Equal => {
            let (a, b) = match (infix.left.as_ref(), infix.right.as_ref()) {
                (Expression::Column(a), Expression::Column(b)) => (a, b),
                _ => return false,
            };
            resolve_pair(a, b, left_index, right_index)
                .or_else(|| resolve_pair(b, a, left_index, right_index))
                .and_then(|(left_idx, right_idx)| {
                    let key_type = left_columns[left_idx]
                        .column_type
                        .unify_nullability(right_columns[right_idx].column_type)?;
                    keys.left.push(left_idx);
                    keys.right.push(right_idx);
                    keys.key_types.push(key_type);
                    Some(())
                })
                .is_some()
        }
        _ => false,
    }
}

fn resolve_pair(
    left_col: &ColumnRef,
    right_col: &ColumnRef,
    left_index: &ColumnIndex,
    right_index: &ColumnIndex,
) -> Option<(usize, usize)> {
    match (left_index.resolve(left_col), right_index.resolve(right_col)) {
        (Some(l), Some(r)) => Some((l, r)),
        _ => None,
    }
}

/// Physical join/apply strategy selection.
pub struct JoinPlanner {
    config: PlannerConfig,
}

impl JoinPlanner {
    /// Create a planner with the given configuration.
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Create a planner with the default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlannerConfig::default())
    }

    /// Build the physical executor for a join or apply.
    ///
    /// `right` must be `Lateral` exactly when `kind` is an apply kind.
    /// CROSS joins take no predicate; every other kind takes one.
    pub fn plan(
        &self,
        left: Box<dyn Operator>,
        right: RightInput,
        kind: JoinKind,
        condition: Option<&Expression>,
        ctx: &ExecutionContext,
    ) -> Result<Box<dyn Operator>> {
        match right {
            RightInput::Lateral(lateral) => {
                if !kind.is_apply() {
                    return Err(Error::invalid_argument(format!(
                        "{} cannot take a per-row right side",
                        kind
                    )));
                }
                let filter = condition
                    .map(|cond| JoinFilter::new(cond, left.schema(), lateral.schema()))
                    .transpose()?;
                debug!("planned {}: nested-loop (apply)", kind);
                Ok(Box::new(NestedLoopJoinOperator::apply(
                    left,
                    lateral,
                    kind,
                    filter,
                    ctx.clone(),
                )))
            }
            RightInput::Source(right_op) => {
                if kind.is_apply() {
                    return Err(Error::invalid_argument(format!(
                        "{} requires a per-row right side",
                        kind
                    )));
                }

                if self.config.hash_join_enabled && kind != JoinKind::Cross {
                    if let Some(cond) = condition {
                        if let Some(keys) =
                            extract_equi_key_columns(cond, left.schema(), right_op.schema())
                        {
                            if !keys.is_empty() {
                                debug!(
                                    "planned {}: hash join on {} key column(s), key type {:?}",
                                    kind,
                                    keys.left.len(),
                                    keys.key_types
                                );
                                let filter =
                                    JoinFilter::new(cond, left.schema(), right_op.schema())?;
                                return Ok(Box::new(HashJoinOperator::new(
                                    left,
                                    right_op,
                                    kind,
                                    keys.left,
                                    keys.right,
                                    keys.key_types,
                                    filter,
                                    ctx.clone(),
                                )));
                            }
                        }
                        debug!("planned {}: predicate not hash-eligible, nested-loop", kind);
                    }
                }

                let filter = condition
                    .map(|cond| JoinFilter::new(cond, left.schema(), right_op.schema()))
                    .transpose()?;
                Ok(Box::new(NestedLoopJoinOperator::new(
                    left,
                    right_op,
                    kind,
                    filter,
                    ctx.clone(),
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;

    fn typed_col(name: &str, data_type: DataType, nullable: bool) -> ColumnInfo {
        ColumnInfo::new(name).typed(ColumnType {
            data_type,
            nullable,
        })
    }

    fn schemas() -> (Vec<ColumnInfo>, Vec<ColumnInfo>) {
        (
            vec![
                typed_col("id", DataType::Integer, false),
                typed_col("region", DataType::Text, true),
            ],
            vec![
                typed_col("user_id", DataType::Integer, true),
                typed_col("amount", DataType::Float, false),
            ],
        )
    }

    #[test]
    fn test_single_equality_extracts() {
        let (left, right) = schemas();
        let cond = Expression::equals(Expression::column("id"), Expression::column("user_id"));
        let keys = extract_equi_key_columns(&cond, &left, &right).unwrap();
        assert_eq!(keys.left, vec![0]);
        assert_eq!(keys.right, vec![0]);
        // Nullable unification: non-nullable left, nullable right
        assert_eq!(keys.key_types[0].data_type, DataType::Integer);
        assert!(keys.key_types[0].nullable);
    }

    #[test]
    fn test_swapped_orientation_extracts() {
        let (left, right) = schemas();
        let cond = Expression::equals(Expression::column("user_id"), Expression::column("id"));
        let keys = extract_equi_key_columns(&cond, &left, &right).unwrap();
        assert_eq!(keys.left, vec![0]);
        assert_eq!(keys.right, vec![0]);
    }

    #[test]
    fn test_and_tree_extracts_all_conjuncts() {
        let (left, right) = schemas();
        let cond = Expression::and(
            Expression::equals(Expression::column("id"), Expression::column("user_id")),
            Expression::equals(Expression::column("id"), Expression::column("user_id")),
        );
        let keys = extract_equi_key_columns(&cond, &left, &right).unwrap();
        assert_eq!(keys.left.len(), 2);
    }

    #[test]
    fn test_single_ineligible_conjunct_rejects_all() {
        let (left, right) = schemas();
        let cond = Expression::and(
            Expression::equals(Expression::column("id"), Expression::column("user_id")),
            Expression::Infix(crate::plan::ast::InfixExpression::new(
                Expression::column("amount"),
                ">",
                Expression::FloatLiteral(10.0),
            )),
        );
        assert!(extract_equi_key_columns(&cond, &left, &right).is_none());
    }

    #[test]
    fn test_constant_equality_rejects() {
        let (left, right) = schemas();
        let cond = Expression::equals(Expression::column("id"), Expression::IntegerLiteral(5));
        assert!(extract_equi_key_columns(&cond, &left, &right).is_none());
    }

    #[test]
    fn test_incompatible_types_reject() {
        let (left, right) = schemas();
        // region (TEXT) = user_id (INTEGER) cannot form a key
        let cond = Expression::equals(Expression::column("region"), Expression::column("user_id"));
        assert!(extract_equi_key_columns(&cond, &left, &right).is_none());
    }

    #[test]
    fn test_same_side_columns_reject() {
        let (left, right) = schemas();
        let cond = Expression::equals(Expression::column("id"), Expression::column("region"));
        assert!(extract_equi_key_columns(&cond, &left, &right).is_none());
    }
}
