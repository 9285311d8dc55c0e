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

//! # Quarry - SQL query planning and execution core
//!
//! Quarry compiles an already-parsed SQL-like query plan (Common Table
//! Expressions, joins, table-valued applies, grouping) into executable
//! pull-based operators over heterogeneous row sources. It is the middle
//! of a query engine: parsers, schema providers and storage are external
//! collaborators that feed it plan trees and row producers.
//!
//! ## Subsystems
//!
//! - **CTE dependency graph & scheduler**
//!   ([`executor::cte`]) - which declared CTEs are actually needed, in
//!   what order they must materialize, and which can run concurrently.
//! - **Join/apply planner & executors**
//!   ([`executor::join`], [`executor::operators`]) - hash vs nested-loop
//!   strategy selection for inner, left-outer, right-outer, cross and
//!   apply operators, with SQL NULL and unmatched-row semantics.
//! - **Grouping key builder** ([`executor::grouping`]) - prefix-widening
//!   composite keys for aggregation at multiple granularities.
//!
//! ## Quick Start
//!
//! ```rust
//! use quarry::executor::{DeadCteEliminator, CteExecutionPlan};
//! use quarry::plan::ast::{CommonTableExpression, SelectStatement};
//!
//! // WITH a AS (SELECT * FROM base), unused AS (SELECT * FROM other)
//! // SELECT * FROM a
//! let stmt = SelectStatement::from_table("a").with_ctes(vec![
//!     CommonTableExpression::new("a", SelectStatement::from_table("base")),
//!     CommonTableExpression::new("unused", SelectStatement::from_table("other")),
//! ]);
//!
//! let result = DeadCteEliminator::eliminate(&stmt).unwrap();
//! assert_eq!(result.eliminated_count(), 1);
//!
//! let plan = CteExecutionPlan::from_graph(result.graph().clone());
//! assert_eq!(plan.level_count(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Core types ([`DataType`], [`Value`], [`Row`], [`Error`])
//! - [`plan`] - Plan-node AST consumed by the planner
//! - [`executor`] - CTE scheduling, join planning, physical operators

pub mod core;
pub mod executor;
pub mod plan;

// Re-export main types for convenience
pub use crate::core::{ColumnType, DataType, Error, Result, Row, Value};

// Re-export executor types
pub use executor::{
    CancellationHandle, ColumnInfo, CteDependencyGraph, CteEliminationResult, CteExecutionLevel,
    CteExecutionPlan, CteGraphNode, DeadCteEliminator, ExecutionContext, GroupKey,
    GroupKeyBuilder, GroupKeySet, HashJoinOperator, JoinFilter, JoinPlanner, LateralSource,
    MaterializedOperator, NestedLoopJoinOperator, Operator, PlannerConfig, RightInput, RowFilter,
    RowRef,
};

// Re-export plan types
pub use plan::ast::{
    CommonTableExpression, Expression, JoinKind, SelectStatement, TableExpression, WithClause,
};
