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

//! Physical join operators.
//!
//! Each operator implements the `Operator` trait with the
//! `open()`/`next()`/`close()` lifecycle.
//!
//! # Algorithm Selection
//!
//! | Condition                               | Operator                 |
//! |-----------------------------------------|--------------------------|
//! | Pure equality predicate (AND of `l=r`)  | `HashJoinOperator`       |
//! | Anything else, CROSS                    | `NestedLoopJoinOperator` |
//! | CROSS/OUTER APPLY (per-left-row right)  | `NestedLoopJoinOperator` |
//!
//! The planner in `executor::join` makes the selection; a single ineligible
//! conjunct downgrades the whole join to nested-loop.

pub mod hash_join;
pub mod nested_loop_join;

pub use hash_join::{hash_key_values, HashJoinOperator, JoinHashTable};
pub use nested_loop_join::{LateralSource, NestedLoopJoinOperator, RightInput};
