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

//! Predicate and scalar expression evaluation.
//!
//! Expressions are bound once against an operator schema (column names
//! resolve to positional indices, operators to their precomputed kinds) and
//! evaluated per row afterwards. Binding fails fast on unresolvable columns
//! so execution never discovers a bad reference mid-scan.
//!
//! Comparison follows SQL three-valued logic: any comparison with NULL
//! yields NULL, and a predicate only accepts a row when it evaluates to
//! TRUE.

use rustc_hash::FxHashMap;

use crate::core::{Error, Result, Row, Value};
use crate::plan::ast::{ColumnRef, Expression, InfixOperator};

use super::operator::ColumnInfo;

/// Which input row a bound column reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// An expression with every column reference resolved to a side + index.
#[derive(Debug, Clone)]
enum BoundExpr {
    Column { side: Side, index: usize },
    Literal(Value),
    Infix {
        op: InfixOperator,
        left: Box<BoundExpr>,
        right: Box<BoundExpr>,
    },
    Function {
        name: String,
        args: Vec<BoundExpr>,
    },
}

/// Case-insensitive column name index over an operator schema.
///
/// Maps both bare names and `alias.name` qualified forms to positions.
/// First declaration wins for ambiguous bare names, matching positional
/// resolution order.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnIndex {
    map: FxHashMap<String, usize>,
}

impl ColumnIndex {
    pub(crate) fn build(columns: &[ColumnInfo]) -> Self {
        let mut map = FxHashMap::default();
        for (idx, col) in columns.iter().enumerate() {
            let bare = col.name.to_lowercase();
            map.entry(bare.clone()).or_insert(idx);
            if let Some(alias) = &col.table_alias {
                map.entry(format!("{}.{}", alias.to_lowercase(), bare))
                    .or_insert(idx);
            }
        }
        Self { map }
    }

    pub(crate) fn resolve(&self, col: &ColumnRef) -> Option<usize> {
        match &col.qualifier_lower {
            Some(q) => self
                .map
                .get(&format!("{}.{}", q, col.name_lower))
                .copied(),
            None => self.map.get(&col.name_lower).copied(),
        }
    }
}

/// Bind an expression against one or two schemas.
///
/// Unqualified names resolve left-first; qualified names only match the
/// side whose alias they carry.
fn bind(
    expr: &Expression,
    left: &ColumnIndex,
    right: Option<&ColumnIndex>,
) -> Result<BoundExpr> {
    match expr {
        Expression::Column(col) => {
            if let Some(index) = left.resolve(col) {
                return Ok(BoundExpr::Column {
                    side: Side::Left,
                    index,
                });
            }
            if let Some(right) = right {
                if let Some(index) = right.resolve(col) {
                    return Ok(BoundExpr::Column {
                        side: Side::Right,
                        index,
                    });
                }
            }
            Err(Error::ColumnNotFound(col.to_string()))
        }
        Expression::IntegerLiteral(v) => Ok(BoundExpr::Literal(Value::integer(*v))),
        Expression::FloatLiteral(v) => Ok(BoundExpr::Literal(Value::float(*v))),
        Expression::StringLiteral(v) => Ok(BoundExpr::Literal(Value::text(v.clone()))),
        Expression::BooleanLiteral(v) => Ok(BoundExpr::Literal(Value::boolean(*v))),
        Expression::NullLiteral => Ok(BoundExpr::Literal(Value::null_unknown())),
        Expression::Infix(infix) => {
            if infix.op_type == InfixOperator::Unknown {
                return Err(Error::expression_evaluation(format!(
                    "unknown operator '{}'",
                    infix.operator
                )));
            }
            Ok(BoundExpr::Infix {
                op: infix.op_type,
                left: Box::new(bind(&infix.left, left, right)?),
                right: Box::new(bind(&infix.right, left, right)?),
            })
        }
        Expression::FunctionCall(call) => {
            let name = call.function.to_uppercase();
            if !matches!(name.as_str(), "ABS" | "UPPER" | "LOWER" | "LENGTH" | "COALESCE") {
                return Err(Error::expression_evaluation(format!(
                    "unknown function '{}'",
                    call.function
                )));
            }
            let args = call
                .arguments
                .iter()
                .map(|a| bind(a, left, right))
                .collect::<Result<Vec<_>>>()?;
            Ok(BoundExpr::Function { name, args })
        }
    }
}

fn eval(expr: &BoundExpr, left: &Row, right: Option<&Row>) -> Result<Value> {
    match expr {
        BoundExpr::Column { side, index } => {
            let row = match side {
                Side::Left => left,
                Side::Right => right.ok_or_else(|| {
                    Error::internal("right-side column evaluated without a right row")
                })?,
            };
            row.get(*index)
                .cloned()
                .ok_or_else(|| Error::internal(format!("column index {} out of bounds", index)))
        }
        BoundExpr::Literal(v) => Ok(v.clone()),
        BoundExpr::Infix { op, left: l, right: r } => {
            eval_infix(*op, l, r, left, right)
        }
        BoundExpr::Function { name, args } => eval_function(name, args, left, right),
    }
}

fn eval_infix(
    op: InfixOperator,
    lhs: &BoundExpr,
    rhs: &BoundExpr,
    left: &Row,
    right: Option<&Row>,
) -> Result<Value> {
    // Logical operators use Kleene three-valued logic with short-circuit
    if op == InfixOperator::And {
        let lv = eval(lhs, left, right)?;
        if lv == Value::Boolean(false) {
            return Ok(Value::boolean(false));
        }
        let rv = eval(rhs, left, right)?;
        if rv == Value::Boolean(false) {
            return Ok(Value::boolean(false));
        }
        if lv.is_null() || rv.is_null() {
            return Ok(Value::null_unknown());
        }
        return logical_pair(&lv, &rv, |a, b| a && b);
    }
    if op == InfixOperator::Or {
        let lv = eval(lhs, left, right)?;
        if lv == Value::Boolean(true) {
            return Ok(Value::boolean(true));
        }
        let rv = eval(rhs, left, right)?;
        if rv == Value::Boolean(true) {
            return Ok(Value::boolean(true));
        }
        if lv.is_null() || rv.is_null() {
            return Ok(Value::null_unknown());
        }
        return logical_pair(&lv, &rv, |a, b| a || b);
    }

    let lv = eval(lhs, left, right)?;
    let rv = eval(rhs, left, right)?;

    // Any NULL operand makes a comparison or arithmetic result NULL
    if lv.is_null() || rv.is_null() {
        return Ok(Value::null_unknown());
    }

    match op {
        InfixOperator::Equal => Ok(Value::boolean(sql_values_equal(&lv, &rv))),
        InfixOperator::NotEqual => Ok(Value::boolean(!sql_values_equal(&lv, &rv))),
        InfixOperator::LessThan
        | InfixOperator::LessEqual
        | InfixOperator::GreaterThan
        | InfixOperator::GreaterEqual => {
            let ord = compare_values(&lv, &rv)?;
            let result = match op {
                InfixOperator::LessThan => ord.is_lt(),
                InfixOperator::LessEqual => ord.is_le(),
                InfixOperator::GreaterThan => ord.is_gt(),
                InfixOperator::GreaterEqual => ord.is_ge(),
                _ => unreachable!(),
            };
            Ok(Value::boolean(result))
        }
        InfixOperator::Add | InfixOperator::Subtract | InfixOperator::Multiply => {
            arithmetic(op, &lv, &rv)
        }
        InfixOperator::Divide => match (&lv, &rv) {
            (Value::Integer(_), Value::Integer(0)) => Err(Error::DivisionByZero),
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::integer(a / b)),
            _ => {
                let (a, b) = float_pair(&lv, &rv)?;
                if b == 0.0 {
                    return Err(Error::DivisionByZero);
                }
                Ok(Value::float(a / b))
            }
        },
        InfixOperator::And | InfixOperator::Or | InfixOperator::Unknown => unreachable!(),
    }
}

fn logical_pair(lv: &Value, rv: &Value, f: impl Fn(bool, bool) -> bool) -> Result<Value> {
    match (lv.as_bool(), rv.as_bool()) {
        (Some(a), Some(b)) => Ok(Value::boolean(f(a, b))),
        _ => Err(Error::Type(format!(
            "logical operator requires boolean operands, got {} and {}",
            lv.data_type(),
            rv.data_type()
        ))),
    }
}

fn arithmetic(op: InfixOperator, lv: &Value, rv: &Value) -> Result<Value> {
    if let (Value::Integer(a), Value::Integer(b)) = (lv, rv) {
        let result = match op {
            InfixOperator::Add => a.wrapping_add(*b),
            InfixOperator::Subtract => a.wrapping_sub(*b),
            InfixOperator::Multiply => a.wrapping_mul(*b),
            _ => unreachable!(),
        };
        return Ok(Value::integer(result));
    }
    let (a, b) = float_pair(lv, rv)?;
    let result = match op {
        InfixOperator::Add => a + b,
        InfixOperator::Subtract => a - b,
        InfixOperator::Multiply => a * b,
        _ => unreachable!(),
    };
    Ok(Value::float(result))
}

fn float_pair(lv: &Value, rv: &Value) -> Result<(f64, f64)> {
    match (lv.as_float(), rv.as_float()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(Error::Type(format!(
            "arithmetic requires numeric operands, got {} and {}",
            lv.data_type(),
            rv.data_type()
        ))),
    }
}

fn eval_function(
    name: &str,
    args: &[BoundExpr],
    left: &Row,
    right: Option<&Row>,
) -> Result<Value> {
    match name {
        "COALESCE" => {
            for arg in args {
                let v = eval(arg, left, right)?;
                if !v.is_null() {
                    return Ok(v);
                }
            }
            Ok(Value::null_unknown())
        }
        _ => {
            let v = eval(
                args.first()
                    .ok_or_else(|| Error::invalid_argument(format!("{} requires an argument", name)))?,
                left,
                right,
            )?;
            if v.is_null() {
                return Ok(Value::null_unknown());
            }
            match name {
                "ABS" => match &v {
                    Value::Integer(i) => Ok(Value::integer(i.wrapping_abs())),
                    Value::Float(f) => Ok(Value::float(f.abs())),
                    _ => Err(Error::Type(format!("ABS requires a numeric argument, got {}", v.data_type()))),
                },
                "UPPER" => match v.as_str() {
                    Some(s) => Ok(Value::text(s.to_uppercase())),
                    None => Err(Error::Type(format!("UPPER requires a text argument, got {}", v.data_type()))),
                },
                "LOWER" => match v.as_str() {
                    Some(s) => Ok(Value::text(s.to_lowercase())),
                    None => Err(Error::Type(format!("LOWER requires a text argument, got {}", v.data_type()))),
                },
                "LENGTH" => match v.as_str() {
                    Some(s) => Ok(Value::integer(s.chars().count() as i64)),
                    None => Err(Error::Type(format!("LENGTH requires a text argument, got {}", v.data_type()))),
                },
                _ => Err(Error::expression_evaluation(format!("unknown function '{}'", name))),
            }
        }
    }
}

/// SQL equality for non-NULL values: numeric comparison crosses the
/// INTEGER/FLOAT representations, everything else compares within its type.
pub(crate) fn sql_values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null(_), _) | (_, Value::Null(_)) => false,
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Integer(x), Value::Float(y)) => (*x as f64) == *y,
        (Value::Float(x), Value::Integer(y)) => *x == (*y as f64),
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Timestamp(x), Value::Timestamp(y)) => x == y,
        _ => false,
    }
}

fn compare_values(a: &Value, b: &Value) -> Result<std::cmp::Ordering> {
    use std::cmp::Ordering;
    let incomparable = || {
        Error::Type(format!(
            "cannot compare {} with {}",
            a.data_type(),
            b.data_type()
        ))
    };
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(x.cmp(y)),
        (Value::Text(x), Value::Text(y)) => Ok(x.cmp(y)),
        (Value::Boolean(x), Value::Boolean(y)) => Ok(x.cmp(y)),
        (Value::Timestamp(x), Value::Timestamp(y)) => Ok(x.cmp(y)),
        _ => match (a.as_float(), b.as_float()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).ok_or_else(incomparable),
            _ => Err(incomparable()),
        },
    }
}

fn is_truthy(value: &Value) -> bool {
    matches!(value, Value::Boolean(true))
}

// ============================================================================
// Filters
// ============================================================================

/// A predicate evaluated against a single row.
#[derive(Debug, Clone)]
pub struct RowFilter {
    bound: BoundExpr,
}

impl RowFilter {
    /// Bind a predicate against a schema, failing fast on unresolvable
    /// column references.
    pub fn new(expr: &Expression, columns: &[ColumnInfo]) -> Result<Self> {
        let index = ColumnIndex::build(columns);
        Ok(Self {
            bound: bind(expr, &index, None)?,
        })
    }

    /// Evaluate the expression for a row.
    pub fn evaluate(&self, row: &Row) -> Result<Value> {
        eval(&self.bound, row, None)
    }

    /// Check whether a row satisfies the predicate (NULL is not a match).
    pub fn matches(&self, row: &Row) -> Result<bool> {
        Ok(is_truthy(&self.evaluate(row)?))
    }
}

/// A predicate evaluated against a pair of rows (join condition).
#[derive(Debug, Clone)]
pub struct JoinFilter {
    bound: BoundExpr,
}

impl JoinFilter {
    /// Bind a join condition against the left and right schemas.
    pub fn new(
        expr: &Expression,
        left_columns: &[ColumnInfo],
        right_columns: &[ColumnInfo],
    ) -> Result<Self> {
        let left = ColumnIndex::build(left_columns);
        let right = ColumnIndex::build(right_columns);
        Ok(Self {
            bound: bind(expr, &left, Some(&right))?,
        })
    }

    /// Check whether a pair of rows satisfies the join condition.
    pub fn matches(&self, left_row: &Row, right_row: &Row) -> Result<bool> {
        let v = eval(&self.bound, left_row, Some(right_row))?;
        Ok(is_truthy(&v))
    }
}
