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

//! Join Planner Tests
//!
//! Tests for physical strategy selection:
//! - Pure equality AND-trees select hash execution
//! - Any ineligible conjunct silently downgrades to nested-loop
//! - The configuration switch disables hash execution entirely
//! - Apply kinds always run nested-loop with a per-row right side

use quarry::executor::{
    ColumnInfo, ExecutionContext, JoinPlanner, LateralSource, MaterializedOperator, Operator,
    PlannerConfig, RightInput,
};
use quarry::plan::ast::{Expression, FunctionCall, InfixExpression, JoinKind};
use quarry::{Result, Row, Value};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn left_op() -> Box<dyn Operator> {
    Box::new(MaterializedOperator::new(
        vec![
            Row::from_values(vec![Value::integer(1), Value::integer(-7)]),
            Row::from_values(vec![Value::integer(2), Value::integer(7)]),
        ],
        vec![ColumnInfo::new("lid"), ColumnInfo::new("lval")],
    ))
}

fn right_op() -> Box<dyn Operator> {
    Box::new(MaterializedOperator::new(
        vec![
            Row::from_values(vec![Value::integer(1), Value::integer(7)]),
            Row::from_values(vec![Value::integer(3), Value::integer(8)]),
        ],
        vec![ColumnInfo::new("rid"), ColumnInfo::new("rval")],
    ))
}

fn plan_with(
    condition: &Expression,
    kind: JoinKind,
    config: PlannerConfig,
) -> Box<dyn Operator> {
    JoinPlanner::new(config)
        .plan(
            left_op(),
            RightInput::Source(right_op()),
            kind,
            Some(condition),
            &ExecutionContext::new(),
        )
        .unwrap()
}

fn collect(op: &mut dyn Operator) -> Vec<Row> {
    let mut rows = Vec::new();
    op.open().unwrap();
    while let Some(row_ref) = op.next().unwrap() {
        rows.push(row_ref.into_owned());
    }
    op.close().unwrap();
    rows
}

#[test]
fn test_equality_predicate_selects_hash() {
    init_logging();
    let cond = Expression::equals(Expression::column("lid"), Expression::column("rid"));
    let op = plan_with(&cond, JoinKind::Inner, PlannerConfig::default());
    assert_eq!(op.name(), "HashJoin (INNER)");
}

#[test]
fn test_multi_conjunct_equality_selects_hash() {
    let cond = Expression::and(
        Expression::equals(Expression::column("lid"), Expression::column("rid")),
        Expression::equals(Expression::column("lval"), Expression::column("rval")),
    );
    let op = plan_with(&cond, JoinKind::LeftOuter, PlannerConfig::default());
    assert_eq!(op.name(), "HashJoin (LEFT OUTER)");
}

#[test]
fn test_comparison_conjunct_downgrades_to_nested_loop() {
    let cond = Expression::and(
        Expression::equals(Expression::column("lid"), Expression::column("rid")),
        Expression::Infix(InfixExpression::new(
            Expression::column("lval"),
            "<",
            Expression::column("rval"),
        )),
    );
    let op = plan_with(&cond, JoinKind::Inner, PlannerConfig::default());
    assert_eq!(op.name(), "NestedLoop (INNER)");
}

#[test]
fn test_or_predicate_downgrades_to_nested_loop() {
    let cond = Expression::Infix(InfixExpression::new(
        Expression::equals(Expression::column("lid"), Expression::column("rid")),
        "OR",
        Expression::equals(Expression::column("lval"), Expression::column("rval")),
    ));
    let op = plan_with(&cond, JoinKind::Inner, PlannerConfig::default());
    assert!(op.name().starts_with("NestedLoop"));
}

#[test]
fn test_function_call_downgrades_to_nested_loop() {
    // ABS(lval) = rval is not a plain column equality
    let cond = Expression::equals(
        Expression::FunctionCall(FunctionCall {
            function: "ABS".to_string(),
            arguments: vec![Expression::column("lval")],
        }),
        Expression::column("rval"),
    );
    let mut op = plan_with(&cond, JoinKind::Inner, PlannerConfig::default());
    assert!(op.name().starts_with("NestedLoop"));

    // The nested-loop fallback still evaluates the predicate correctly
    let rows = collect(op.as_mut());
    assert_eq!(rows.len(), 2); // |-7| = 7 and |7| = 7 both match rval=7
}

#[test]
fn test_config_switch_forces_nested_loop() {
    let cond = Expression::equals(Expression::column("lid"), Expression::column("rid"));
    let op = plan_with(
        &cond,
        JoinKind::Inner,
        PlannerConfig {
            hash_join_enabled: false,
        },
    );
    assert_eq!(op.name(), "NestedLoop (INNER)");
}

#[test]
fn test_cross_join_never_hashes() {
    let planner = JoinPlanner::with_defaults();
    let op = planner
        .plan(
            left_op(),
            RightInput::Source(right_op()),
            JoinKind::Cross,
            None,
            &ExecutionContext::new(),
        )
        .unwrap();
    assert_eq!(op.name(), "NestedLoop (CROSS)");
}

struct SingleRowLateral {
    schema: Vec<ColumnInfo>,
}

impl LateralSource for SingleRowLateral {
    fn schema(&self) -> &[ColumnInfo] {
        &self.schema
    }

    fn bind(&mut self, left_row: &Row) -> Result<Box<dyn Operator>> {
        let doubled = left_row.get(0).and_then(Value::as_int64).unwrap_or(0) * 2;
        Ok(Box::new(MaterializedOperator::new(
            vec![Row::from_values(vec![Value::integer(doubled)])],
            self.schema.clone(),
        )))
    }
}

#[test]
fn test_apply_kinds_use_nested_loop_with_lateral_source() {
    let planner = JoinPlanner::with_defaults();
    let lateral = Box::new(SingleRowLateral {
        schema: vec![ColumnInfo::new("doubled")],
    });
    let mut op = planner
        .plan(
            left_op(),
            RightInput::Lateral(lateral),
            JoinKind::CrossApply,
            None,
            &ExecutionContext::new(),
        )
        .unwrap();
    assert_eq!(op.name(), "NestedLoop (CROSS APPLY)");

    let rows = collect(op.as_mut());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get(2), Some(&Value::integer(2)));
    assert_eq!(rows[1].get(2), Some(&Value::integer(4)));
}

#[test]
fn test_apply_kind_with_static_source_is_invalid() {
    let planner = JoinPlanner::with_defaults();
    let err = planner
        .plan(
            left_op(),
            RightInput::Source(right_op()),
            JoinKind::OuterApply,
            None,
            &ExecutionContext::new(),
        )
        .err()
        .unwrap();
    assert!(matches!(err, quarry::Error::InvalidArgument(_)));
}

#[test]
fn test_lateral_with_join_kind_is_invalid() {
    let planner = JoinPlanner::with_defaults();
    let lateral = Box::new(SingleRowLateral {
        schema: vec![ColumnInfo::new("doubled")],
    });
    let err = planner
        .plan(
            left_op(),
            RightInput::Lateral(lateral),
            JoinKind::Inner,
            None,
            &ExecutionContext::new(),
        )
        .err()
        .unwrap();
    assert!(matches!(err, quarry::Error::InvalidArgument(_)));
}
