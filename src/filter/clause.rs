use std::cmp::Ordering;
use std::sync::Arc;

use crate::core::band::Band;
use crate::filter::attribute::{Attribute, Operator, TypedValue};
use crate::filter::FilterError;

/// One attribute test: `attribute <operator> values`
#[derive(Debug, Clone)]
pub struct FilterClause {
    id: String,
    attribute: Arc<Attribute>,
    operator: Operator,
    values: Vec<String>,
    typed: Vec<TypedValue>,
    include_nulls: bool,
}

impl FilterClause {
    /// Create a clause.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnsupportedOperator` if the attribute's type does
    /// not allow `operator`, and `FilterError::IllegalAttributeValue` if
    /// `values` is empty, a value does not parse as the attribute's type, or a
    /// set value lies outside the attribute's domain.
    pub fn new(
        id: impl Into<String>,
        attribute: Arc<Attribute>,
        operator: Operator,
        values: Vec<String>,
        include_nulls: bool,
    ) -> Result<Self, FilterError> {
        if !attribute.supports(operator) {
            return Err(FilterError::UnsupportedOperator {
                attribute: attribute.id.clone(),
                operator: operator.to_string(),
            });
        }
        if values.is_empty() {
            return Err(FilterError::IllegalAttributeValue {
                attribute: attribute.id.clone(),
                value: String::new(),
            });
        }
        if let Some(domain) = attribute.domain() {
            if let Some(outside) = values.iter().find(|v| !domain.contains(v)) {
                return Err(FilterError::IllegalAttributeValue {
                    attribute: attribute.id.clone(),
                    value: outside.clone(),
                });
            }
        }
        let typed = values
            .iter()
            .map(|v| attribute.parse(v))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: id.into(),
            attribute,
            operator,
            values,
            typed,
            include_nulls,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attribute
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn include_nulls(&self) -> bool {
        self.include_nulls
    }

    /// Test one band.
    ///
    /// A band without the property (or with an empty multi-value) yields
    /// `include_nulls`. `In` is true when any band value is one of the clause
    /// values; every other operator must hold for every pairing of band value
    /// and clause value.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::IllegalAttributeValue` if a stored band value does
    /// not parse as the attribute's type.
    pub fn evaluate(&self, band: &Band) -> Result<bool, FilterError> {
        let stored = match band.property(&self.attribute.id) {
            Some(value) if !value.values().is_empty() => value.values(),
            _ => return Ok(self.include_nulls),
        };

        if self.operator == Operator::In {
            return Ok(stored.iter().any(|v| self.values.contains(v)));
        }

        for raw in stored {
            let value = self.attribute.parse(raw)?;
            for expected in &self.typed {
                if !self.holds(&value, expected) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn holds(&self, value: &TypedValue, expected: &TypedValue) -> bool {
        match self.operator {
            Operator::Like | Operator::ILike => {
                let (TypedValue::String(text), TypedValue::String(pattern)) = (value, expected)
                else {
                    return false;
                };
                if self.operator == Operator::ILike {
                    like(&text.to_lowercase(), &pattern.to_lowercase())
                } else {
                    like(text, pattern)
                }
            }
            Operator::In => false,
            op => match value.compare(expected) {
                Some(ordering) => match op {
                    Operator::Equals => ordering == Ordering::Equal,
                    Operator::NotEquals => ordering != Ordering::Equal,
                    Operator::Greater => ordering == Ordering::Greater,
                    Operator::GreaterEq => ordering != Ordering::Less,
                    Operator::Less => ordering == Ordering::Less,
                    Operator::LessEq => ordering != Ordering::Greater,
                    _ => false,
                },
                None => false,
            },
        }
    }
}

/// SQL-style pattern match: `%` matches any run of characters, `_` exactly one
pub fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut t, mut p) = (0, 0);
    // Position of the last `%` seen and the text position it was tried at
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, mark)) = backtrack {
            p = star + 1;
            t = mark + 1;
            backtrack = Some((star, mark + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&c| c == '%')
}
