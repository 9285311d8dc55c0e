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

//! Data types for Quarry
//!
//! `DataType` names the runtime type of a value; `ColumnType` pairs it with
//! nullability, which is what join-key planning needs to unify key types.

use std::fmt;

/// SQL data types supported by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// NULL data type, used for unknown/unspecified types
    #[default]
    Null,

    /// 64-bit signed integer
    Integer,

    /// 64-bit floating point number
    Float,

    /// UTF-8 text string
    Text,

    /// Boolean true/false
    Boolean,

    /// Timestamp with timezone (stored as UTC)
    Timestamp,
}

impl DataType {
    /// Returns true if this type is numeric (INTEGER or FLOAT)
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Null => "NULL",
            DataType::Integer => "INTEGER",
            DataType::Float => "FLOAT",
            DataType::Text => "TEXT",
            DataType::Boolean => "BOOLEAN",
            DataType::Timestamp => "TIMESTAMP",
        };
        write!(f, "{}", name)
    }
}

/// A declared column type: data type plus nullability
///
/// Join-key planning unifies the two sides of an equality into a single key
/// type; when the sides differ only in nullability, the key is nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnType {
    pub data_type: DataType,
    pub nullable: bool,
}

impl ColumnType {
    /// Create a non-nullable column type
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            nullable: false,
        }
    }

    /// Create a nullable column type
    pub fn nullable(data_type: DataType) -> Self {
        Self {
            data_type,
            nullable: true,
        }
    }

    /// Unify two column types that differ only in nullability.
    ///
    /// Returns `None` when the underlying data types are incompatible.
    /// Mixed INTEGER/FLOAT unifies to FLOAT so numeric equality keys keep
    /// working across the two representations.
    pub fn unify_nullability(self, other: ColumnType) -> Option<ColumnType> {
        let data_type = if self.data_type == other.data_type {
            self.data_type
        } else if self.data_type.is_numeric() && other.data_type.is_numeric() {
            DataType::Float
        } else {
            return None;
        };
        Some(ColumnType {
            data_type,
            nullable: self.nullable || other.nullable,
        })
    }
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType {
            data_type: DataType::Null,
            nullable: true,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{} NULL", self.data_type)
        } else {
            write!(f, "{}", self.data_type)
        }
    }
}
