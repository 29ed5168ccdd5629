use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use tracing::trace;

use crate::core::band::Band;
use crate::filter::clause::FilterClause;
use crate::filter::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateOperator {
    And,
    Or,
    Xor,
}

impl FromStr for AggregateOperator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            "XOR" => Ok(Self::Xor),
            _ => Err(FilterError::IllegalAggregateOperator(s.to_string())),
        }
    }
}

impl AggregateOperator {
    /// Combine member results. XOR is a pairwise left fold.
    ///
    /// With no members AND is true while OR and XOR are false.
    pub fn apply(self, results: impl IntoIterator<Item = bool>) -> bool {
        let mut results = results.into_iter();
        match self {
            Self::And => results.all(|r| r),
            Self::Or => results.any(|r| r),
            Self::Xor => results.reduce(|acc, r| acc ^ r).unwrap_or(false),
        }
    }
}

/// Named combination of clauses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateClause {
    pub id: String,
    pub operator: AggregateOperator,
    /// Clause ids combined by this aggregate
    pub members: Vec<String>,
}

impl AggregateClause {
    pub fn new(id: impl Into<String>, operator: AggregateOperator, members: Vec<String>) -> Self {
        Self {
            id: id.into(),
            operator,
            members,
        }
    }

    /// Build from a textual operator name.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::IllegalAggregateOperator` unless `operator` is
    /// AND, OR or XOR (any case).
    pub fn parse(
        id: impl Into<String>,
        operator: &str,
        members: Vec<String>,
    ) -> Result<Self, FilterError> {
        Ok(Self::new(id, operator.parse()?, members))
    }
}

/// Predicate over bands built from clauses and aggregates.
///
/// The top level is the AND of every clause no aggregate refers to and every
/// aggregate. The default query has neither and matches every band.
#[derive(Debug, Clone, Default)]
pub struct FilterQuery {
    clauses: Vec<FilterClause>,
    aggregates: Vec<AggregateClause>,
    /// Clause positions per aggregate
    members: Vec<Vec<usize>>,
    /// Positions of clauses no aggregate refers to
    standalone: Vec<usize>,
}

impl FilterQuery {
    /// Assemble a query.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::DuplicateClause` if two clauses share an id and
    /// `FilterError::UnknownAttribute` if an aggregate names a clause that
    /// does not exist.
    pub fn new(
        clauses: Vec<FilterClause>,
        aggregates: Vec<AggregateClause>,
    ) -> Result<Self, FilterError> {
        let mut positions = HashMap::with_capacity(clauses.len());
        for (i, clause) in clauses.iter().enumerate() {
            if positions.insert(clause.id().to_string(), i).is_some() {
                return Err(FilterError::DuplicateClause(clause.id().to_string()));
            }
        }

        let mut referenced = HashSet::new();
        let members = aggregates
            .iter()
            .map(|aggregate| {
                aggregate
                    .members
                    .iter()
                    .map(|member| {
                        let position = positions
                            .get(member)
                            .copied()
                            .ok_or_else(|| FilterError::UnknownAttribute(member.clone()))?;
                        referenced.insert(position);
                        Ok(position)
                    })
                    .collect::<Result<Vec<_>, FilterError>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let standalone = (0..clauses.len())
            .filter(|i| !referenced.contains(i))
            .collect();

        Ok(Self {
            clauses,
            aggregates,
            members,
            standalone,
        })
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn aggregates(&self) -> &[AggregateClause] {
        &self.aggregates
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty() && self.aggregates.is_empty()
    }

    /// Evaluate the query for one band. Every clause is evaluated once.
    ///
    /// # Errors
    ///
    /// Propagates clause evaluation failures.
    pub fn matches(&self, band: &Band) -> Result<bool, FilterError> {
        let results = self
            .clauses
            .iter()
            .map(|clause| clause.evaluate(band))
            .collect::<Result<Vec<_>, _>>()?;

        let matched = self.standalone.iter().all(|&i| results[i])
            && self
                .aggregates
                .iter()
                .zip(&self.members)
                .all(|(aggregate, members)| {
                    aggregate
                        .operator
                        .apply(members.iter().map(|&i| results[i]))
                });

        trace!("Band {} matched={}", band.name, matched);
        Ok(matched)
    }
}
