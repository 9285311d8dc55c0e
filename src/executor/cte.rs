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

//! Common Table Expression (CTE) planning
//!
//! This module decides what a query's WITH clause actually costs to run:
//!
//! - [`CteDependencyGraph`] wires reference edges between declared CTEs and
//!   the outer query, computes reachability and per-CTE execution levels.
//! - [`DeadCteEliminator`] strips declared-but-unreferenced CTEs from a
//!   statement while preserving the declaration order of survivors.
//! - [`CteExecutionPlan`] groups reachable CTEs into levels; CTEs in the
//!   same level have no ordering constraint between them and may be
//!   materialized concurrently, levels run in ascending order.
//!
//! The graph is built once per compile pass from an immutable statement and
//! is read-only afterwards. Cyclic references are invalid for non-recursive
//! CTEs and should be rejected by the front-end grammar; the builder still
//! terminates on such input and produces a consistent graph, but the level
//! numbers it assigns are unspecified.

use ahash::AHashSet;
use log::debug;
use rustc_hash::FxHashMap;

use crate::core::{Error, Result};
use crate::plan::ast::{SelectStatement, TableExpression, WithClause};

/// Reserved name of the synthetic outer-query node.
///
/// Contains a character no SQL identifier may carry, so it can never
/// collide with a declared CTE name.
pub const OUTER_QUERY_NAME: &str = "<outer>";

// ============================================================================
// Reference Extraction
// ============================================================================

/// Collect the CTE names a sub-plan reads from.
///
/// Walks every composable node reachable from the root: plain table
/// references, both sides of joins and applies, subquery sources, and the
/// bodies of nested WITH clauses. Names not in `known` are ignored; they
/// may refer to external schema objects. The walk never follows a name
/// into another CTE's body, so it terminates even when bodies reference
/// each other cyclically.
pub fn collect_cte_references(
    stmt: &SelectStatement,
    known: &AHashSet<String>,
) -> AHashSet<String> {
    let mut found = AHashSet::new();
    walk_statement(stmt, known, &mut found, true);
    found
}

fn walk_statement(
    stmt: &SelectStatement,
    known: &AHashSet<String>,
    found: &mut AHashSet<String>,
    include_with: bool,
) {
    if include_with {
        if let Some(with) = &stmt.with {
            for cte in &with.ctes {
                walk_statement(&cte.query, known, found, true);
            }
        }
    }
    if let Some(table_expr) = &stmt.table_expr {
        walk_table_expression(table_expr, known, found);
    }
}

fn walk_table_expression(
    expr: &TableExpression,
    known: &AHashSet<String>,
    found: &mut AHashSet<String>,
) {
    // Exhaustive match: adding a plan-node kind must be reviewed here.
    match expr {
        TableExpression::Table(source) => {
            if known.contains(&source.name_lower) {
                found.insert(source.name_lower.clone());
            }
        }
        TableExpression::Join(join) => {
            walk_table_expression(&join.left, known, found);
            walk_table_expression(&join.right, known, found);
        }
        TableExpression::Apply(apply) => {
            walk_table_expression(&apply.left, known, found);
            walk_table_expression(&apply.right, known, found);
        }
        TableExpression::Subquery(select) => {
            walk_statement(select, known, found, true);
        }
    }
}

// ============================================================================
// Dependency Graph
// ============================================================================

/// Per-CTE node in the dependency graph.
///
/// One synthetic node with [`OUTER_QUERY_NAME`] represents the outer query;
/// it owns no defining sub-plan and is never a dependency of anything.
#[derive(Debug, Clone)]
pub struct CteGraphNode {
    name: String,
    query: Option<SelectStatement>,
    dependencies: AHashSet<String>,
    dependents: AHashSet<String>,
    is_reachable: bool,
    execution_level: i32,
}

impl CteGraphNode {
    fn new(name: impl Into<String>, query: Option<SelectStatement>) -> Self {
        Self {
            name: name.into(),
            query,
            dependencies: AHashSet::new(),
            dependents: AHashSet::new(),
            is_reachable: false,
            execution_level: -1,
        }
    }

    /// The CTE's (lowercased) name, or [`OUTER_QUERY_NAME`].
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The defining sub-plan; `None` for the synthetic outer-query node.
    pub fn query(&self) -> Option<&SelectStatement> {
        self.query.as_ref()
    }

    /// Names this node reads from.
    pub fn dependencies(&self) -> &AHashSet<String> {
        &self.dependencies
    }

    /// Names that read from this node.
    pub fn dependents(&self) -> &AHashSet<String> {
        &self.dependents
    }

    /// Whether the outer query transitively references this node.
    pub fn is_reachable(&self) -> bool {
        self.is_reachable
    }

    /// Longest-dependency-chain distance from a dependency-free CTE.
    ///
    /// −1 until computed; unreachable nodes keep −1.
    pub fn execution_level(&self) -> i32 {
        self.execution_level
    }

    /// Whether this is the synthetic outer-query node.
    pub fn is_outer_query(&self) -> bool {
        self.name == OUTER_QUERY_NAME
    }
}

/// Dependency graph over a statement's declared CTEs plus the outer query.
#[derive(Debug, Clone)]
pub struct CteDependencyGraph {
    /// All nodes, including the outer-query node, keyed by lowercase name.
    nodes: FxHashMap<String, CteGraphNode>,
    /// Declared CTE names (lowercase) in declaration order; excludes outer.
    declaration_order: Vec<String>,
}

impl CteDependencyGraph {
    /// Build the graph for a statement.
    ///
    /// Fails with `InvalidArgument` when two CTEs share a name; every other
    /// input shape, including cyclic references, produces a graph.
    pub fn build(stmt: &SelectStatement) -> Result<Self> {
        let empty = WithClause { ctes: Vec::new() };
        let with = stmt.with.as_ref().unwrap_or(&empty);

        let mut known = AHashSet::with_capacity(with.ctes.len());
        let mut declaration_order = Vec::with_capacity(with.ctes.len());
        for cte in &with.ctes {
            if !known.insert(cte.name_lower.clone()) {
                return Err(Error::invalid_argument(format!(
                    "duplicate CTE name '{}'",
                    cte.name
                )));
            }
            declaration_order.push(cte.name_lower.clone());
        }

        let mut nodes = FxHashMap::default();
        for cte in &with.ctes {
            nodes.insert(
                cte.name_lower.clone(),
                CteGraphNode::new(cte.name_lower.clone(), Some(cte.query.clone())),
            );
        }
        nodes.insert(
            OUTER_QUERY_NAME.to_string(),
            CteGraphNode::new(OUTER_QUERY_NAME, None),
        );

        let mut graph = Self {
            nodes,
            declaration_order,
        };
        graph.wire_edges(stmt, &known);
        graph.compute_reachability();
        graph.compute_execution_levels();

        debug!(
            "CTE graph built: {} declared, {} reachable, {} dead",
            graph.cte_count(),
            graph.reachable_ctes().len(),
            graph.dead_ctes().len()
        );

        Ok(graph)
    }

    fn wire_edges(&mut self, stmt: &SelectStatement, known: &AHashSet<String>) {
        let mut edges: Vec<(String, AHashSet<String>)> = Vec::new();

        for name in &self.declaration_order {
            let node = &self.nodes[name];
            let refs = match node.query() {
                Some(query) => collect_cte_references(query, known),
                None => AHashSet::new(),
            };
            edges.push((name.clone(), refs));
        }

        // The outer query's references come from the statement body only;
        // its top-level WITH clause holds the definitions themselves.
        let mut outer_refs = AHashSet::new();
        walk_statement(stmt, known, &mut outer_refs, false);
        edges.push((OUTER_QUERY_NAME.to_string(), outer_refs));

        for (from, refs) in edges {
            for to in refs {
                self.nodes
                    .get_mut(&from)
                    .expect("edge source exists")
                    .dependencies
                    .insert(to.clone());
                self.nodes
                    .get_mut(&to)
                    .expect("edge target exists")
                    .dependents
                    .insert(from.clone());
            }
        }
    }

    /// Mark every CTE transitively referenced from the outer query.
    ///
    /// Iterative DFS with a visited set so cyclic edges cannot loop.
    fn compute_reachability(&mut self) {
        let mut visited: AHashSet<String> = AHashSet::new();
        let mut stack: Vec<String> = self.nodes[OUTER_QUERY_NAME]
            .dependencies
            .iter()
            .cloned()
            .collect();

        while let Some(name) = stack.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            let node = self.nodes.get_mut(&name).expect("dependency exists");
            node.is_reachable = true;
            stack.extend(node.dependencies.iter().cloned());
        }

        self.nodes
            .get_mut(OUTER_QUERY_NAME)
            .expect("outer node exists")
            .is_reachable = true;
    }

    /// Assign execution levels to reachable CTEs.
    ///
    /// level = 0 for a node with no reachable dependencies, otherwise
    /// 1 + max(level of reachable dependencies). An explicit in-progress
    /// marker breaks cycles: a dependency currently being computed
    /// contributes level 0 instead of recursing further.
    fn compute_execution_levels(&mut self) {
        #[derive(Clone, Copy)]
        enum LevelState {
            InProgress,
            Done(i32),
        }

        fn resolve(
            name: &str,
            nodes: &FxHashMap<String, CteGraphNode>,
            states: &mut FxHashMap<String, LevelState>,
        ) -> i32 {
            match states.get(name) {
                Some(LevelState::Done(level)) => return *level,
                Some(LevelState::InProgress) => return 0,
                None => {}
            }
            states.insert(name.to_string(), LevelState::InProgress);

            let node = &nodes[name];
            let mut level = 0;
            for dep in &node.dependencies {
                if nodes[dep].is_reachable {
                    level = level.max(resolve(dep, nodes, states) + 1);
                }
            }
            states.insert(name.to_string(), LevelState::Done(level));
            level
        }

        let mut states: FxHashMap<String, LevelState> = FxHashMap::default();
        for name in &self.declaration_order {
            if self.nodes[name].is_reachable {
                resolve(name, &self.nodes, &mut states);
            }
        }

        for (name, state) in states {
            if let LevelState::Done(level) = state {
                if let Some(node) = self.nodes.get_mut(&name) {
                    node.execution_level = level;
                }
            }
        }
    }

    // =========================================================================
    // Query surface
    // =========================================================================

    /// Check if a CTE with the given name was declared.
    pub fn contains_cte(&self, name: &str) -> bool {
        self.nodes.contains_key(&name.to_lowercase())
    }

    /// Get a CTE node by name, failing when it does not exist.
    pub fn get_cte(&self, name: &str) -> Result<&CteGraphNode> {
        self.try_get_cte(name)
            .ok_or_else(|| Error::CteNotFound(name.to_string()))
    }

    /// Get a CTE node by name; `None` when it does not exist.
    pub fn try_get_cte(&self, name: &str) -> Option<&CteGraphNode> {
        self.nodes.get(&name.to_lowercase())
    }

    /// The synthetic outer-query node.
    pub fn outer_query(&self) -> &CteGraphNode {
        &self.nodes[OUTER_QUERY_NAME]
    }

    /// Number of declared CTEs (the outer-query node is not counted).
    pub fn cte_count(&self) -> usize {
        self.declaration_order.len()
    }

    /// Declared CTEs never reached from the outer query, in declaration order.
    pub fn dead_ctes(&self) -> Vec<&CteGraphNode> {
        self.declaration_order
            .iter()
            .map(|name| &self.nodes[name])
            .filter(|node| !node.is_reachable)
            .collect()
    }

    /// Declared CTEs reachable from the outer query, in declaration order.
    pub fn reachable_ctes(&self) -> Vec<&CteGraphNode> {
        self.declaration_order
            .iter()
            .map(|name| &self.nodes[name])
            .filter(|node| node.is_reachable)
            .collect()
    }

    /// Reachable CTEs grouped by execution level, ascending.
    ///
    /// Within a level, nodes keep declaration order. Dead CTEs never
    /// appear.
    pub fn execution_levels(&self) -> Vec<Vec<&CteGraphNode>> {
        let reachable = self.reachable_ctes();
        let max_level = reachable
            .iter()
            .map(|node| node.execution_level)
            .max()
            .unwrap_or(-1);
        if max_level < 0 {
            return Vec::new();
        }

        let mut levels: Vec<Vec<&CteGraphNode>> = vec![Vec::new(); (max_level + 1) as usize];
        for node in reachable {
            levels[node.execution_level as usize].push(node);
        }
        levels
    }

    /// True iff some execution level holds more than one reachable CTE.
    ///
    /// This is the cheap check for call sites that only need a yes/no
    /// answer before paying for [`CteExecutionPlan`] construction.
    pub fn can_parallelize(&self) -> bool {
        let mut counts: FxHashMap<i32, usize> = FxHashMap::default();
        for name in &self.declaration_order {
            let node = &self.nodes[name];
            if node.is_reachable {
                let count = counts.entry(node.execution_level).or_insert(0);
                *count += 1;
                if *count > 1 {
                    return true;
                }
            }
        }
        false
    }
}

/// Cheap check whether level-parallel CTE materialization could help.
///
/// Equivalent to building the execution plan and asking it, without
/// materializing the level structure.
pub fn can_benefit_from_parallelization(graph: &CteDependencyGraph) -> bool {
    graph.can_parallelize()
}

// ============================================================================
// Dead-CTE Elimination
// ============================================================================

/// Result of a dead-CTE elimination pass.
#[derive(Debug, Clone)]
pub struct CteEliminationResult {
    statement: SelectStatement,
    graph: CteDependencyGraph,
    eliminated_count: usize,
}

impl CteEliminationResult {
    /// The pruned statement (the input statement when nothing was dead).
    pub fn statement(&self) -> &SelectStatement {
        &self.statement
    }

    /// Consume the result, returning the pruned statement.
    pub fn into_statement(self) -> SelectStatement {
        self.statement
    }

    /// The dependency graph the pass was computed from.
    pub fn graph(&self) -> &CteDependencyGraph {
        &self.graph
    }

    /// Number of CTE definitions removed.
    pub fn eliminated_count(&self) -> usize {
        self.eliminated_count
    }

    /// Whether any CTE definitions were removed.
    pub fn were_ctes_eliminated(&self) -> bool {
        self.eliminated_count > 0
    }

    /// Whether every declared CTE was removed.
    ///
    /// When true, the result statement is the outer query alone with no
    /// WITH wrapper.
    pub fn all_ctes_eliminated(&self) -> bool {
        self.graph.cte_count() > 0 && self.eliminated_count == self.graph.cte_count()
    }
}

/// Strips unreachable CTE definitions from a statement.
///
/// Idempotent: eliminating an already-pruned statement is a no-op.
pub struct DeadCteEliminator;

impl DeadCteEliminator {
    /// Run elimination over a statement.
    pub fn eliminate(stmt: &SelectStatement) -> Result<CteEliminationResult> {
        let graph = CteDependencyGraph::build(stmt)?;
        let dead: AHashSet<String> = graph
            .dead_ctes()
            .iter()
            .map(|node| node.name().to_string())
            .collect();

        if dead.is_empty() {
            return Ok(CteEliminationResult {
                statement: stmt.clone(),
                graph,
                eliminated_count: 0,
            });
        }

        debug!(
            "eliminating {} dead CTE(s): {:?}",
            dead.len(),
            graph.dead_ctes().iter().map(|n| n.name()).collect::<Vec<_>>()
        );

        let mut pruned = stmt.clone();
        let survivors: Vec<_> = match pruned.with.take() {
            Some(with) => with
                .ctes
                .into_iter()
                .filter(|cte| !dead.contains(&cte.name_lower))
                .collect(),
            None => Vec::new(),
        };
        // Survivors keep their original declaration order; zero survivors
        // collapse the statement to the bare outer query.
        if !survivors.is_empty() {
            pruned.with = Some(WithClause { ctes: survivors });
        }

        Ok(CteEliminationResult {
            statement: pruned,
            graph,
            eliminated_count: dead.len(),
        })
    }
}

// ============================================================================
// Execution Plan
// ============================================================================

/// One level of the CTE execution plan.
///
/// CTEs in the same level have no dependency ordering between them and may
/// be materialized on separate workers.
#[derive(Debug, Clone)]
pub struct CteExecutionLevel {
    level: usize,
    ctes: Vec<String>,
}

impl CteExecutionLevel {
    /// Level index (0 = no unresolved dependencies).
    pub fn level(&self) -> usize {
        self.level
    }

    /// CTE names at this level, in declaration order.
    pub fn ctes(&self) -> &[String] {
        &self.ctes
    }

    /// Number of CTEs at this level.
    pub fn len(&self) -> usize {
        self.ctes.len()
    }

    /// Whether this level is empty (never true for built plans).
    pub fn is_empty(&self) -> bool {
        self.ctes.is_empty()
    }

    /// Whether this level permits concurrent materialization.
    pub fn can_parallelize(&self) -> bool {
        self.ctes.len() > 1
    }
}

/// Ordered levels of reachable CTEs plus the graph they came from.
///
/// The plan is a recommendation: every CTE in level *k* must be fully
/// materialized before any CTE in level *k+1* begins; within a level the
/// order is free.
#[derive(Debug, Clone)]
pub struct CteExecutionPlan {
    levels: Vec<CteExecutionLevel>,
    graph: CteDependencyGraph,
}

impl CteExecutionPlan {
    /// Build the plan from a graph.
    pub fn from_graph(graph: CteDependencyGraph) -> Self {
        let levels = graph
            .execution_levels()
            .into_iter()
            .enumerate()
            .map(|(level, nodes)| CteExecutionLevel {
                level,
                ctes: nodes.iter().map(|n| n.name().to_string()).collect(),
            })
            .collect();
        Self { levels, graph }
    }

    /// Build the plan for a statement.
    pub fn for_statement(stmt: &SelectStatement) -> Result<Self> {
        Ok(Self::from_graph(CteDependencyGraph::build(stmt)?))
    }

    /// The ordered levels.
    pub fn levels(&self) -> &[CteExecutionLevel] {
        &self.levels
    }

    /// Number of levels.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Total number of CTEs across all levels.
    pub fn total_cte_count(&self) -> usize {
        self.levels.iter().map(|l| l.len()).sum()
    }

    /// Size of the widest level.
    pub fn max_parallelism(&self) -> usize {
        self.levels.iter().map(|l| l.len()).max().unwrap_or(0)
    }

    /// Whether any level permits concurrent materialization.
    pub fn can_parallelize(&self) -> bool {
        self.max_parallelism() > 1
    }

    /// Whether the plan schedules no CTEs at all.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The graph this plan was derived from.
    pub fn graph(&self) -> &CteDependencyGraph {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ast::{CommonTableExpression, Expression, JoinKind};

    fn cte(name: &str, body: SelectStatement) -> CommonTableExpression {
        CommonTableExpression::new(name, body)
    }

    /// WITH a AS (SELECT * FROM base), b AS (SELECT * FROM a) SELECT * FROM b
    fn chain_statement() -> SelectStatement {
        SelectStatement::from_table("b").with_ctes(vec![
            cte("a", SelectStatement::from_table("base")),
            cte("b", SelectStatement::from_table("a")),
        ])
    }

    #[test]
    fn test_reference_extraction_ignores_unknown_names() {
        let known: AHashSet<String> = ["a".to_string()].into_iter().collect();
        let stmt = SelectStatement::from_expr(TableExpression::join(
            TableExpression::table("a"),
            TableExpression::table("external_table"),
            JoinKind::Inner,
            Some(Expression::equals(
                Expression::column("x"),
                Expression::column("y"),
            )),
        ));
        let refs = collect_cte_references(&stmt, &known);
        assert_eq!(refs.len(), 1);
        assert!(refs.contains("a"));
    }

    #[test]
    fn test_reference_extraction_descends_into_subqueries() {
        let known: AHashSet<String> = ["inner_cte".to_string()].into_iter().collect();
        let stmt = SelectStatement::from_expr(TableExpression::Subquery(Box::new(
            SelectStatement::from_table("inner_cte"),
        )));
        let refs = collect_cte_references(&stmt, &known);
        assert!(refs.contains("inner_cte"));
    }

    #[test]
    fn test_chain_levels() {
        let graph = CteDependencyGraph::build(&chain_statement()).unwrap();

        let a = graph.get_cte("a").unwrap();
        let b = graph.get_cte("b").unwrap();
        assert!(a.is_reachable());
        assert!(b.is_reachable());
        assert_eq!(a.execution_level(), 0);
        assert_eq!(b.execution_level(), 1);
        assert!(b.dependencies().contains("a"));
        assert!(a.dependents().contains("b"));
        assert!(!graph.can_parallelize());
    }

    #[test]
    fn test_outer_node_invariants() {
        let graph = CteDependencyGraph::build(&chain_statement()).unwrap();
        let outer = graph.outer_query();
        assert!(outer.is_outer_query());
        assert!(outer.query().is_none());
        assert!(outer.dependents().is_empty());
        assert!(outer.dependencies().contains("b"));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let graph = CteDependencyGraph::build(&chain_statement()).unwrap();
        assert!(graph.contains_cte("A"));
        assert!(graph.try_get_cte("B").is_some());
        assert!(graph.get_cte("missing").is_err());
    }

    #[test]
    fn test_duplicate_cte_name_rejected() {
        let stmt = SelectStatement::from_table("a").with_ctes(vec![
            cte("a", SelectStatement::from_table("t1")),
            cte("A", SelectStatement::from_table("t2")),
        ]);
        let err = CteDependencyGraph::build(&stmt).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_self_cycle_terminates() {
        let stmt = SelectStatement::from_table("loopy").with_ctes(vec![cte(
            "loopy",
            SelectStatement::from_table("loopy"),
        )]);
        // Levels on cyclic input are unspecified; building must terminate
        // and produce a consistent graph.
        let graph = CteDependencyGraph::build(&stmt).unwrap();
        assert!(graph.get_cte("loopy").unwrap().is_reachable());
    }

    #[test]
    fn test_mutual_cycle_terminates() {
        let stmt = SelectStatement::from_table("p").with_ctes(vec![
            cte("p", SelectStatement::from_table("q")),
            cte("q", SelectStatement::from_table("p")),
        ]);
        let graph = CteDependencyGraph::build(&stmt).unwrap();
        assert!(graph.get_cte("p").unwrap().is_reachable());
        assert!(graph.get_cte("q").unwrap().is_reachable());
    }

    #[test]
    fn test_elimination_no_dead_is_noop() {
        let stmt = chain_statement();
        let result = DeadCteEliminator::eliminate(&stmt).unwrap();
        assert!(!result.were_ctes_eliminated());
        assert_eq!(result.eliminated_count(), 0);
        assert_eq!(result.statement(), &stmt);
    }

    #[test]
    fn test_elimination_preserves_survivor_order() {
        // c is dead; a and b must survive in declaration order
        let stmt = SelectStatement::from_expr(TableExpression::join(
            TableExpression::table("a"),
            TableExpression::table("b"),
            JoinKind::Inner,
            Some(Expression::equals(
                Expression::column("x"),
                Expression::column("y"),
            )),
        ))
        .with_ctes(vec![
            cte("a", SelectStatement::from_table("t1")),
            cte("c", SelectStatement::from_table("t2")),
            cte("b", SelectStatement::from_table("t3")),
        ]);

        let result = DeadCteEliminator::eliminate(&stmt).unwrap();
        assert_eq!(result.eliminated_count(), 1);
        let names: Vec<_> = result
            .statement()
            .with
            .as_ref()
            .unwrap()
            .ctes
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_execution_plan_parallel_level() {
        // a and b independent, outer joins both: both at level 0
        let stmt = SelectStatement::from_expr(TableExpression::join(
            TableExpression::table("a"),
            TableExpression::table("b"),
            JoinKind::Inner,
            Some(Expression::equals(
                Expression::column("x"),
                Expression::column("y"),
            )),
        ))
        .with_ctes(vec![
            cte("a", SelectStatement::from_table("t1")),
            cte("b", SelectStatement::from_table("t2")),
        ]);

        let graph = CteDependencyGraph::build(&stmt).unwrap();
        assert!(can_benefit_from_parallelization(&graph));

        let plan = CteExecutionPlan::from_graph(graph);
        assert_eq!(plan.level_count(), 1);
        assert_eq!(plan.max_parallelism(), 2);
        assert!(plan.can_parallelize());
        assert_eq!(plan.levels()[0].ctes(), &["a", "b"]);
    }

    #[test]
    fn test_execution_plan_empty_when_no_ctes() {
        let plan = CteExecutionPlan::for_statement(&SelectStatement::from_table("t")).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.total_cte_count(), 0);
        assert_eq!(plan.max_parallelism(), 0);
        assert!(!plan.can_parallelize());
    }
}
