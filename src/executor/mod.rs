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

//! Query planning and execution.
//!
//! The compile pipeline: a parsed [`crate::plan::ast::SelectStatement`]
//! goes through the CTE dependency graph (reachability, dead-CTE
//! elimination, level scheduling), then each query node's joins and
//! grouping expressions are planned into executable [`Operator`]
//! pipelines.

pub mod context;
pub mod cte;
pub mod expression;
pub mod grouping;
pub mod join;
pub mod operator;
pub mod operators;

pub use context::{CancellationHandle, ExecutionContext};
pub use cte::{
    can_benefit_from_parallelization, collect_cte_references, CteDependencyGraph,
    CteEliminationResult, CteExecutionLevel, CteExecutionPlan, CteGraphNode, DeadCteEliminator,
    OUTER_QUERY_NAME,
};
pub use expression::{JoinFilter, RowFilter};
pub use grouping::{hash_group_key, GroupKey, GroupKeyBuilder, GroupKeySet};
pub use join::{extract_equi_key_columns, EquiKeyColumns, JoinPlanner};
pub use operator::{ColumnInfo, CompositeRow, EmptyOperator, MaterializedOperator, Operator, RowRef};
pub use operators::{HashJoinOperator, LateralSource, NestedLoopJoinOperator, RightInput};

/// Planner configuration.
///
/// `hash_join_enabled` selects whether hash-join eligibility is attempted
/// at all; when false, eligible joins still run nested-loop. Useful for
/// debugging planner decisions and for the strategy-equivalence tests.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub hash_join_enabled: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            hash_join_enabled: true,
        }
    }
}
