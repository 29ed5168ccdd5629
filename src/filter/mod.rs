//! Typed-attribute filters over band properties.
//!
//! A filter is built from:
//!
//! - [`Attribute`](attribute::Attribute)s: typed property keys, each with a fixed set of operators
//! - [`FilterClause`](clause::FilterClause)s: one attribute, one operator, one or more values
//! - [`AggregateClause`](query::AggregateClause)s: AND/OR/XOR over named clauses
//!
//! Clauses that no aggregate refers to are ANDed with every aggregate at the
//! top level of a [`FilterQuery`](query::FilterQuery).
//!
//! ## Operators
//!
//! | Attribute type | Operators |
//! |----------------|-----------|
//! | String  | Equals, NotEquals, Like, ILike |
//! | Integer | Equals, NotEquals, Greater, GreaterEq, Less, LessEq |
//! | Float   | Equals, NotEquals, Greater, GreaterEq, Less, LessEq |
//! | Boolean | Equals, NotEquals |
//! | Set     | In |

use thiserror::Error;

pub mod attribute;
pub mod clause;
pub mod document;
pub mod query;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown attribute or clause: {0}")]
    UnknownAttribute(String),

    #[error("Operator '{operator}' is not supported by attribute '{attribute}'")]
    UnsupportedOperator { attribute: String, operator: String },

    #[error("Illegal aggregate operator: {0}")]
    IllegalAggregateOperator(String),

    #[error("Illegal value '{value}' for attribute '{attribute}'")]
    IllegalAttributeValue { attribute: String, value: String },

    #[error("Duplicate clause id: {0}")]
    DuplicateClause(String),

    #[error("Invalid filter document: {0}")]
    InvalidDocument(String),
}
