use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use crate::filter::clause::FilterClause;
use crate::filter::FilterError;
use crate::utils::validation::is_valid_identifier;

/// Comparison operators a clause can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Equals,
    NotEquals,
    Like,
    ILike,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    In,
}

const STRING_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::Like,
    Operator::ILike,
];

const NUMERIC_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::Greater,
    Operator::GreaterEq,
    Operator::Less,
    Operator::LessEq,
];

const BOOLEAN_OPERATORS: &[Operator] = &[Operator::Equals, Operator::NotEquals];

const SET_OPERATORS: &[Operator] = &[Operator::In];

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equals" | "eq" | "=" | "==" => Ok(Self::Equals),
            "notequals" | "not_equals" | "ne" | "!=" => Ok(Self::NotEquals),
            "like" => Ok(Self::Like),
            "ilike" => Ok(Self::ILike),
            "greater" | "gt" | ">" => Ok(Self::Greater),
            "greatereq" | "greater_eq" | "ge" | ">=" => Ok(Self::GreaterEq),
            "less" | "lt" | "<" => Ok(Self::Less),
            "lesseq" | "less_eq" | "le" | "<=" => Ok(Self::LessEq),
            "in" => Ok(Self::In),
            _ => Err(FilterError::UnsupportedOperator {
                attribute: String::new(),
                operator: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Equals => "Equals",
            Self::NotEquals => "NotEquals",
            Self::Like => "Like",
            Self::ILike => "ILike",
            Self::Greater => "Greater",
            Self::GreaterEq => "GreaterEq",
            Self::Less => "Less",
            Self::LessEq => "LessEq",
            Self::In => "In",
        };
        write!(f, "{name}")
    }
}

/// Value type of an attribute; a set carries its enumerated domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    String,
    Integer,
    Float,
    Boolean,
    Set(Vec<String>),
}

impl AttributeType {
    /// Operators allowed for values of this type
    pub fn operators(&self) -> &'static [Operator] {
        match self {
            Self::String => STRING_OPERATORS,
            Self::Integer | Self::Float => NUMERIC_OPERATORS,
            Self::Boolean => BOOLEAN_OPERATORS,
            Self::Set(_) => SET_OPERATORS,
        }
    }
}

/// A property value parsed as its attribute's type
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl TypedValue {
    /// Ordering between two values of the same type; `None` across types or
    /// for NaN
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// A typed property key bands can be filtered on. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Property key looked up in a band's property map
    pub id: String,
    pub name: String,
    pub kind: AttributeType,
    pub description: String,
}

impl Attribute {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: AttributeType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            description: description.into(),
        }
    }

    pub fn operators(&self) -> &'static [Operator] {
        self.kind.operators()
    }

    /// Enumerated values of a set attribute
    pub fn domain(&self) -> Option<&[String]> {
        match &self.kind {
            AttributeType::Set(domain) => Some(domain),
            _ => None,
        }
    }

    pub fn supports(&self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }

    fn illegal(&self, value: &str) -> FilterError {
        FilterError::IllegalAttributeValue {
            attribute: self.id.clone(),
            value: value.to_string(),
        }
    }

    /// Parse a stored or configured value as this attribute's type.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::IllegalAttributeValue` if `raw` is not a value of
    /// the attribute's type.
    pub fn parse(&self, raw: &str) -> Result<TypedValue, FilterError> {
        let trimmed = raw.trim();
        match &self.kind {
            AttributeType::String | AttributeType::Set(_) => {
                Ok(TypedValue::String(raw.to_string()))
            }
            AttributeType::Integer => trimmed
                .parse()
                .map(TypedValue::Integer)
                .map_err(|_| self.illegal(raw)),
            AttributeType::Float => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| !v.is_nan())
                .map(TypedValue::Float)
                .ok_or_else(|| self.illegal(raw)),
            AttributeType::Boolean => match trimmed.to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(TypedValue::Boolean(true)),
                "false" | "0" | "no" => Ok(TypedValue::Boolean(false)),
                _ => Err(self.illegal(raw)),
            },
        }
    }
}

/// Attributes known to a query surface, by id
#[derive(Debug, Clone, Default)]
pub struct AttributeRegistry {
    attributes: HashMap<String, Arc<Attribute>>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an attribute.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidDocument` if the id is unusable or already
    /// taken, since attributes never change once created.
    pub fn register(&mut self, attribute: Attribute) -> Result<Arc<Attribute>, FilterError> {
        if !is_valid_identifier(&attribute.id) {
            return Err(FilterError::InvalidDocument(format!(
                "Invalid attribute id: '{}'",
                attribute.id
            )));
        }
        if self.attributes.contains_key(&attribute.id) {
            return Err(FilterError::InvalidDocument(format!(
                "Duplicate attribute id: {}",
                attribute.id
            )));
        }
        let attribute = Arc::new(attribute);
        self.attributes
            .insert(attribute.id.clone(), Arc::clone(&attribute));
        Ok(attribute)
    }

    /// Look an attribute up by id.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownAttribute` if no attribute has that id.
    pub fn get(&self, id: &str) -> Result<Arc<Attribute>, FilterError> {
        self.attributes
            .get(id)
            .cloned()
            .ok_or_else(|| FilterError::UnknownAttribute(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Build a clause from textual parts.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownAttribute` for an unknown attribute id,
    /// `FilterError::UnsupportedOperator` for an unknown operator or one the
    /// attribute does not allow, or `FilterError::IllegalAttributeValue` for a
    /// value of the wrong type.
    pub fn clause(
        &self,
        id: &str,
        attribute_id: &str,
        operator: &str,
        values: Vec<String>,
        include_nulls: bool,
    ) -> Result<FilterClause, FilterError> {
        let attribute = self.get(attribute_id)?;
        let operator = operator.parse::<Operator>().map_err(|_| {
            FilterError::UnsupportedOperator {
                attribute: attribute_id.to_string(),
                operator: operator.to_string(),
            }
        })?;
        FilterClause::new(id, attribute, operator, values, include_nulls)
    }
}
