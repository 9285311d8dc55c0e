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

//! Plan-node model consumed by the planner and executor
//!
//! Quarry does not parse SQL; a front-end parser (an external collaborator)
//! produces this tree. The node set is deliberately closed: traversal code
//! matches exhaustively, so adding a node kind forces a compile-time review
//! of every traversal site.

pub mod ast;

pub use ast::{
    ApplySource, ColumnRef, CommonTableExpression, Expression, FunctionCall, InfixExpression,
    InfixOperator, JoinKind, JoinSource, SelectStatement, TableExpression, TableSource, WithClause,
};
