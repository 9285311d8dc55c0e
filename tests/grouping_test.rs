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

//! Grouping Key Builder Tests
//!
//! Tests for prefix-widening composite keys:
//! - One key per grouping arity, widths 1..N
//! - Structural, value-wise equality across rows
//! - Prefix keys address coarser granularities without re-derivation

use std::collections::HashMap;

use quarry::executor::{ColumnInfo, GroupKey, GroupKeyBuilder};
use quarry::plan::ast::Expression;
use quarry::{Row, Value};

fn sales_schema() -> Vec<ColumnInfo> {
    vec![
        ColumnInfo::new("region"),
        ColumnInfo::new("year"),
        ColumnInfo::new("amount"),
    ]
}

fn sales_row(region: &str, year: i64, amount: f64) -> Row {
    Row::from_values(vec![
        Value::text(region),
        Value::integer(year),
        Value::float(amount),
    ])
}

#[test]
fn test_region_year_scenario() {
    // Grouping expressions [Region, Year] produce key0=(Region),
    // key1=(Region, Year) and the value tuple (Region, Year)
    let builder = GroupKeyBuilder::new(
        &[Expression::column("region"), Expression::column("year")],
        &sales_schema(),
    )
    .unwrap();

    let set = builder.build(&sales_row("west", 2026, 12.5)).unwrap();

    assert_eq!(builder.arity(), 2);
    assert_eq!(set.keys().len(), 2);
    assert_eq!(set.key(0).unwrap().values(), &[Value::text("west")]);
    assert_eq!(
        set.key(1).unwrap().values(),
        &[Value::text("west"), Value::integer(2026)]
    );
    assert_eq!(set.values(), &[Value::text("west"), Value::integer(2026)]);
}

#[test]
fn test_keys_bucket_rows_at_each_granularity() {
    let builder = GroupKeyBuilder::new(
        &[Expression::column("region"), Expression::column("year")],
        &sales_schema(),
    )
    .unwrap();

    let rows = vec![
        sales_row("west", 2025, 1.0),
        sales_row("west", 2026, 2.0),
        sales_row("east", 2025, 3.0),
        sales_row("west", 2026, 4.0),
    ];

    let mut by_region: HashMap<GroupKey, usize> = HashMap::new();
    let mut by_region_year: HashMap<GroupKey, usize> = HashMap::new();
    for row in &rows {
        let set = builder.build(row).unwrap();
        *by_region.entry(set.key(0).unwrap().clone()).or_insert(0) += 1;
        *by_region_year.entry(set.key(1).unwrap().clone()).or_insert(0) += 1;
    }

    // Coarse granularity: west=3, east=1
    assert_eq!(by_region.len(), 2);
    assert_eq!(
        by_region[&GroupKey::from_values(&[Value::text("west")])],
        3
    );
    // Fine granularity: (west,2025)=1, (west,2026)=2, (east,2025)=1
    assert_eq!(by_region_year.len(), 3);
    assert_eq!(
        by_region_year[&GroupKey::from_values(&[
            Value::text("west"),
            Value::integer(2026)
        ])],
        2
    );
}

#[test]
fn test_structural_equality_not_identity() {
    let builder =
        GroupKeyBuilder::new(&[Expression::column("region")], &sales_schema()).unwrap();

    let a = builder.build(&sales_row("north", 2020, 1.0)).unwrap();
    let b = builder.build(&sales_row("north", 2030, 99.0)).unwrap();
    assert_eq!(a.full_key(), b.full_key());

    let c = builder.build(&sales_row("south", 2020, 1.0)).unwrap();
    assert_ne!(a.full_key(), c.full_key());
}

#[test]
fn test_expression_valued_grouping() {
    // GROUP BY year * 10 + 1
    let expr = Expression::Infix(quarry::plan::ast::InfixExpression::new(
        Expression::Infix(quarry::plan::ast::InfixExpression::new(
            Expression::column("year"),
            "*",
            Expression::IntegerLiteral(10),
        )),
        "+",
        Expression::IntegerLiteral(1),
    ));
    let builder = GroupKeyBuilder::new(&[expr], &sales_schema()).unwrap();

    let set = builder.build(&sales_row("west", 202, 0.0)).unwrap();
    assert_eq!(set.values(), &[Value::integer(2021)]);
}

#[test]
fn test_empty_grouping_list_fails_fast() {
    let err = GroupKeyBuilder::new(&[], &sales_schema()).unwrap_err();
    assert!(matches!(err, quarry::Error::InvalidArgument(_)));
}

#[test]
fn test_unknown_column_fails_fast() {
    let err = GroupKeyBuilder::new(&[Expression::column("nope")], &sales_schema()).unwrap_err();
    assert!(err.is_not_found());
}
