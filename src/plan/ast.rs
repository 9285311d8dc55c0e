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

//! Plan-node AST
//!
//! Scalar expressions, table expressions (sources, joins, applies,
//! subqueries) and statements (SELECT with an optional WITH clause).
//! Identifier-carrying nodes precompute a lowercase form so lookups are
//! case-insensitive without repeated allocation.

use std::fmt;

use crate::core::ColumnType;

// ============================================================================
// Scalar Expressions
// ============================================================================

/// Infix operator kinds, precomputed from the operator string so evaluation
/// never does string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    // Comparison operators
    Equal,        // =
    NotEqual,     // <> or !=
    LessThan,     // <
    LessEqual,    // <=
    GreaterThan,  // >
    GreaterEqual, // >=

    // Logical operators
    And,
    Or,

    // Arithmetic operators
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /

    /// Operator string not recognized by the core
    Unknown,
}

impl InfixOperator {
    /// Parse an operator string into its kind
    pub fn parse(op: &str) -> Self {
        match op {
            "=" | "==" => InfixOperator::Equal,
            "<>" | "!=" => InfixOperator::NotEqual,
            "<" => InfixOperator::LessThan,
            "<=" => InfixOperator::LessEqual,
            ">" => InfixOperator::GreaterThan,
            ">=" => InfixOperator::GreaterEqual,
            "+" => InfixOperator::Add,
            "-" => InfixOperator::Subtract,
            "*" => InfixOperator::Multiply,
            "/" => InfixOperator::Divide,
            _ => match op.to_ascii_uppercase().as_str() {
                "AND" => InfixOperator::And,
                "OR" => InfixOperator::Or,
                _ => InfixOperator::Unknown,
            },
        }
    }

    /// True for the ordering comparisons (not equality)
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            InfixOperator::LessThan
                | InfixOperator::LessEqual
                | InfixOperator::GreaterThan
                | InfixOperator::GreaterEqual
        )
    }
}

/// Column reference with optional source alias and declared type
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    /// Table alias qualifying the column, if any
    pub qualifier: Option<String>,
    /// Pre-computed lowercase qualifier for fast case-insensitive lookups
    pub qualifier_lower: Option<String>,
    /// Column name
    pub name: String,
    /// Pre-computed lowercase name
    pub name_lower: String,
    /// Declared type of the referenced column
    pub column_type: ColumnType,
}

impl ColumnRef {
    /// Create an unqualified column reference with an unknown type
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name_lower = name.to_lowercase();
        Self {
            qualifier: None,
            qualifier_lower: None,
            name,
            name_lower,
            column_type: ColumnType::default(),
        }
    }

    /// Attach a qualifying table alias
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        let qualifier = qualifier.into();
        self.qualifier_lower = Some(qualifier.to_lowercase());
        self.qualifier = Some(qualifier);
        self
    }

    /// Attach the declared column type
    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}", q, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Infix expression (a = b, x AND y, n + 1)
#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub operator: String,
    /// Pre-computed operator type for fast evaluation
    pub op_type: InfixOperator,
    pub right: Box<Expression>,
}

impl InfixExpression {
    /// Create a new infix expression with auto-computed op_type
    #[inline]
    pub fn new(left: Expression, operator: impl Into<String>, right: Expression) -> Self {
        let operator = operator.into();
        let op_type = InfixOperator::parse(&operator);
        Self {
            left: Box::new(left),
            operator,
            op_type,
            right: Box::new(right),
        }
    }
}

impl fmt::Display for InfixExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

/// Scalar function call
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub function: String,
    pub arguments: Vec<Expression>,
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.arguments.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.function, args.join(", "))
    }
}

/// Scalar expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Column reference (alias + name + declared type)
    Column(ColumnRef),
    /// Integer literal
    IntegerLiteral(i64),
    /// Float literal
    FloatLiteral(f64),
    /// String literal
    StringLiteral(String),
    /// Boolean literal
    BooleanLiteral(bool),
    /// NULL literal
    NullLiteral,
    /// Infix expression (comparison, logical, arithmetic)
    Infix(InfixExpression),
    /// Scalar function call
    FunctionCall(FunctionCall),
}

impl Expression {
    /// Shorthand: unqualified column reference
    pub fn column(name: impl Into<String>) -> Self {
        Expression::Column(ColumnRef::new(name))
    }

    /// Shorthand: qualified column reference
    pub fn qualified_column(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Expression::Column(ColumnRef::new(name).with_qualifier(qualifier))
    }

    /// Shorthand: equality between two expressions
    pub fn equals(left: Expression, right: Expression) -> Self {
        Expression::Infix(InfixExpression::new(left, "=", right))
    }

    /// Shorthand: conjunction of two expressions
    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::Infix(InfixExpression::new(left, "AND", right))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Column(c) => write!(f, "{}", c),
            Expression::IntegerLiteral(v) => write!(f, "{}", v),
            Expression::FloatLiteral(v) => write!(f, "{}", v),
            Expression::StringLiteral(v) => write!(f, "'{}'", v),
            Expression::BooleanLiteral(v) => write!(f, "{}", v),
            Expression::NullLiteral => write!(f, "NULL"),
            Expression::Infix(e) => write!(f, "{}", e),
            Expression::FunctionCall(e) => write!(f, "{}", e),
        }
    }
}

// ============================================================================
// Table Expressions
// ============================================================================

/// Join and apply kinds
///
/// Apply kinds differ from joins in that the right-hand source is computed
/// freshly per left row (a table-valued function call) rather than being a
/// static source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// INNER JOIN - only matching rows
    Inner,
    /// LEFT OUTER JOIN - all left rows, right side NULL-padded when unmatched
    LeftOuter,
    /// RIGHT OUTER JOIN - all right rows, left side NULL-padded when unmatched
    RightOuter,
    /// CROSS JOIN - cartesian product, no predicate
    Cross,
    /// CROSS APPLY - per-left-row right side, matching rows only
    CrossApply,
    /// OUTER APPLY - per-left-row right side, left preserved when unmatched
    OuterApply,
}

impl JoinKind {
    /// Check if the right side is computed per left row
    pub fn is_apply(&self) -> bool {
        matches!(self, JoinKind::CrossApply | JoinKind::OuterApply)
    }

    /// Check if one side must be preserved when unmatched
    pub fn is_outer(&self) -> bool {
        matches!(
            self,
            JoinKind::LeftOuter | JoinKind::RightOuter | JoinKind::OuterApply
        )
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::LeftOuter => "LEFT OUTER JOIN",
            JoinKind::RightOuter => "RIGHT OUTER JOIN",
            JoinKind::Cross => "CROSS JOIN",
            JoinKind::CrossApply => "CROSS APPLY",
            JoinKind::OuterApply => "OUTER APPLY",
        };
        write!(f, "{}", name)
    }
}

/// Plain table reference by name, optionally aliased
///
/// The name may resolve to a declared CTE or to an external schema object;
/// the graph builder only reacts to names it knows about.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSource {
    pub name: String,
    /// Pre-computed lowercase name for case-insensitive CTE matching
    pub name_lower: String,
    pub alias: Option<String>,
}

impl TableSource {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name_lower = name.to_lowercase();
        Self {
            name,
            name_lower,
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(a) => write!(f, "{} AS {}", self.name, a),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Join between two table expressions
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSource {
    pub left: TableExpression,
    pub right: TableExpression,
    pub kind: JoinKind,
    /// ON predicate; None only for CROSS joins
    pub condition: Option<Expression>,
}

impl fmt::Display for JoinSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.kind, self.right)?;
        if let Some(cond) = &self.condition {
            write!(f, " ON {}", cond)?;
        }
        Ok(())
    }
}

/// Apply operator: the right side is re-evaluated for every left row
#[derive(Debug, Clone, PartialEq)]
pub struct ApplySource {
    pub left: TableExpression,
    pub right: TableExpression,
    /// Restricted to `CrossApply` / `OuterApply`
    pub kind: JoinKind,
}

impl fmt::Display for ApplySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.kind, self.right)
    }
}

/// Table expression node
#[derive(Debug, Clone, PartialEq)]
pub enum TableExpression {
    /// Plain table reference
    Table(TableSource),
    /// Join of two table expressions
    Join(Box<JoinSource>),
    /// Apply of a per-row source to a table expression
    Apply(Box<ApplySource>),
    /// Nested SELECT used as a source
    Subquery(Box<SelectStatement>),
}

impl TableExpression {
    /// Shorthand: plain table reference
    pub fn table(name: impl Into<String>) -> Self {
        TableExpression::Table(TableSource::new(name))
    }

    /// Shorthand: join of two table expressions
    pub fn join(
        left: TableExpression,
        right: TableExpression,
        kind: JoinKind,
        condition: Option<Expression>,
    ) -> Self {
        TableExpression::Join(Box::new(JoinSource {
            left,
            right,
            kind,
            condition,
        }))
    }

    /// Shorthand: apply of two table expressions
    pub fn apply(left: TableExpression, right: TableExpression, kind: JoinKind) -> Self {
        TableExpression::Apply(Box::new(ApplySource { left, right, kind }))
    }
}

impl fmt::Display for TableExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableExpression::Table(t) => write!(f, "{}", t),
            TableExpression::Join(j) => write!(f, "{}", j),
            TableExpression::Apply(a) => write!(f, "{}", a),
            TableExpression::Subquery(s) => write!(f, "({})", s),
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// A named, query-scoped intermediate result (WITH member)
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTableExpression {
    pub name: String,
    /// Pre-computed lowercase name; CTE names match case-insensitively
    pub name_lower: String,
    pub query: SelectStatement,
}

impl CommonTableExpression {
    pub fn new(name: impl Into<String>, query: SelectStatement) -> Self {
        let name = name.into();
        let name_lower = name.to_lowercase();
        Self {
            name,
            name_lower,
            query,
        }
    }
}

impl fmt::Display for CommonTableExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AS ({})", self.name, self.query)
    }
}

/// WITH clause wrapping an outer query
#[derive(Debug, Clone, PartialEq)]
pub struct WithClause {
    pub ctes: Vec<CommonTableExpression>,
}

impl fmt::Display for WithClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctes: Vec<String> = self.ctes.iter().map(|c| c.to_string()).collect();
        write!(f, "WITH {}", ctes.join(", "))
    }
}

/// SELECT statement: the composable query unit
///
/// The projection list and WHERE clause are opaque to the CTE graph (table
/// references live in table expressions only); they participate in grouping
/// and join predicates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectStatement {
    pub with: Option<WithClause>,
    pub columns: Vec<Expression>,
    pub table_expr: Option<TableExpression>,
    pub where_clause: Option<Expression>,
    pub group_by: Vec<Expression>,
}

impl SelectStatement {
    /// Shorthand: `SELECT * FROM <table>`
    pub fn from_table(name: impl Into<String>) -> Self {
        Self {
            table_expr: Some(TableExpression::table(name)),
            ..Default::default()
        }
    }

    /// Shorthand: a SELECT over an arbitrary table expression
    pub fn from_expr(table_expr: TableExpression) -> Self {
        Self {
            table_expr: Some(table_expr),
            ..Default::default()
        }
    }

    /// Wrap this statement's outer query in a WITH clause
    pub fn with_ctes(mut self, ctes: Vec<CommonTableExpression>) -> Self {
        self.with = Some(WithClause { ctes });
        self
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with {
            write!(f, "{} ", with)?;
        }
        write!(f, "SELECT ")?;
        if self.columns.is_empty() {
            write!(f, "*")?;
        } else {
            let cols: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
            write!(f, "{}", cols.join(", "))?;
        }
        if let Some(te) = &self.table_expr {
            write!(f, " FROM {}", te)?;
        }
        if let Some(wc) = &self.where_clause {
            write!(f, " WHERE {}", wc)?;
        }
        if !self.group_by.is_empty() {
            let keys: Vec<String> = self.group_by.iter().map(|g| g.to_string()).collect();
            write!(f, " GROUP BY {}", keys.join(", "))?;
        }
        Ok(())
    }
}
