use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::filter::attribute::{Attribute, AttributeRegistry, AttributeType};
use crate::filter::query::{AggregateClause, FilterQuery};
use crate::filter::FilterError;

/// On-disk form of a filter.
///
/// ```json
/// {
///   "attributes": [
///     { "id": "score", "type": "integer" },
///     { "id": "strand", "type": "set", "domain": ["+", "-", "."] }
///   ],
///   "clauses": [
///     { "id": "high", "attribute": "score", "operator": "ge", "values": ["500"] },
///     { "id": "plus", "attribute": "strand", "operator": "in", "values": ["+"] }
///   ],
///   "aggregates": [
///     { "id": "either", "operator": "OR", "members": ["high", "plus"] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterDocument {
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    #[serde(default)]
    pub clauses: Vec<ClauseDefinition>,
    #[serde(default)]
    pub aggregates: Vec<AggregateDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// One of `string`, `integer`, `float`, `boolean`, `set`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Enumerated values; required for `set`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseDefinition {
    pub id: String,
    pub attribute: String,
    pub operator: String,
    pub values: Vec<String>,
    #[serde(default)]
    pub include_nulls: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateDefinition {
    pub id: String,
    pub operator: String,
    pub members: Vec<String>,
}

impl AttributeDefinition {
    fn to_attribute(&self) -> Result<Attribute, FilterError> {
        let kind = match self.kind.to_lowercase().as_str() {
            "string" => AttributeType::String,
            "integer" | "int" => AttributeType::Integer,
            "float" | "double" => AttributeType::Float,
            "boolean" | "bool" => AttributeType::Boolean,
            "set" => match &self.domain {
                Some(domain) if !domain.is_empty() => AttributeType::Set(domain.clone()),
                _ => {
                    return Err(FilterError::InvalidDocument(format!(
                        "Set attribute '{}' needs a non-empty domain",
                        self.id
                    )))
                }
            },
            other => {
                return Err(FilterError::InvalidDocument(format!(
                    "Unknown type '{}' for attribute '{}'",
                    other, self.id
                )))
            }
        };
        Ok(Attribute::new(
            self.id.clone(),
            self.name.clone().unwrap_or_else(|| self.id.clone()),
            kind,
            self.description.clone().unwrap_or_default(),
        ))
    }
}

impl FilterDocument {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidDocument` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        serde_json::from_str(json).map_err(|e| FilterError::InvalidDocument(e.to_string()))
    }

    /// Load a document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidDocument` if the file cannot be read or
    /// parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, FilterError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            FilterError::InvalidDocument(format!("{}: {}", path.display(), e))
        })?;
        let document = Self::from_json(&json)?;
        info!(
            "Loaded filter from {} ({} clauses, {} aggregates)",
            path.display(),
            document.clauses.len(),
            document.aggregates.len()
        );
        Ok(document)
    }

    /// Register the attributes with a fresh registry
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidDocument` for an unknown type, a set
    /// without a domain, or a duplicate attribute id.
    pub fn registry(&self) -> Result<AttributeRegistry, FilterError> {
        let mut registry = AttributeRegistry::new();
        for definition in &self.attributes {
            registry.register(definition.to_attribute()?)?;
        }
        Ok(registry)
    }

    /// Validate the document into a query.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure among attributes, clauses and
    /// aggregates.
    pub fn build(&self) -> Result<FilterQuery, FilterError> {
        let registry = self.registry()?;

        let clauses = self
            .clauses
            .iter()
            .map(|c| {
                registry.clause(
                    &c.id,
                    &c.attribute,
                    &c.operator,
                    c.values.clone(),
                    c.include_nulls,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let aggregates = self
            .aggregates
            .iter()
            .map(|a| AggregateClause::parse(a.id.clone(), &a.operator, a.members.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Built filter with {} attributes, {} clauses, {} aggregates",
            registry.len(),
            clauses.len(),
            aggregates.len()
        );
        FilterQuery::new(clauses, aggregates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::band::Band;
    use crate::core::contig::Contig;
    use crate::core::coordinate::GenomicCoordinate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOCUMENT: &str = r#"{
        "attributes": [
            { "id": "score", "type": "integer" },
            { "id": "strand", "type": "set", "domain": ["+", "-", "."] }
        ],
        "clauses": [
            { "id": "high", "attribute": "score", "operator": "ge", "values": ["500"] },
            { "id": "plus", "attribute": "strand", "operator": "in", "values": ["+"] }
        ],
        "aggregates": [
            { "id": "either", "operator": "OR", "members": ["high", "plus"] }
        ]
    }"#;

    fn band(score: &str, strand: &str) -> Band {
        let contig = Contig::new("g", "A");
        Band::new(
            "t",
            GenomicCoordinate::new(contig.clone(), 0),
            GenomicCoordinate::new(contig, 1),
            "b",
        )
        .unwrap()
        .with_property("score", score)
        .with_property("strand", strand)
    }

    #[test]
    fn test_build_document() {
        let query = FilterDocument::from_json(DOCUMENT).unwrap().build().unwrap();
        assert_eq!(query.clauses().len(), 2);
        assert!(query.matches(&band("900", "-")).unwrap());
        assert!(query.matches(&band("10", "+")).unwrap());
        assert!(!query.matches(&band("10", "-")).unwrap());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DOCUMENT.as_bytes()).unwrap();
        let document = FilterDocument::load_from_file(file.path()).unwrap();
        assert_eq!(document.attributes.len(), 2);
        assert_eq!(document.aggregates[0].members, vec!["high", "plus"]);
    }

    #[test]
    fn test_empty_document_matches_everything() {
        let query = FilterDocument::from_json("{}").unwrap().build().unwrap();
        assert!(query.is_empty());
    }

    #[test]
    fn test_invalid_documents() {
        let unknown_type = r#"{ "attributes": [ { "id": "x", "type": "date" } ] }"#;
        assert!(matches!(
            FilterDocument::from_json(unknown_type).unwrap().build(),
            Err(FilterError::InvalidDocument(_))
        ));

        let set_without_domain = r#"{ "attributes": [ { "id": "x", "type": "set" } ] }"#;
        assert!(FilterDocument::from_json(set_without_domain)
            .unwrap()
            .build()
            .is_err());

        let bad_aggregate = r#"{
            "attributes": [ { "id": "score", "type": "integer" } ],
            "clauses": [ { "id": "c", "attribute": "score", "operator": "gt", "values": ["1"] } ],
            "aggregates": [ { "id": "a", "operator": "NOR", "members": ["c"] } ]
        }"#;
        assert!(matches!(
            FilterDocument::from_json(bad_aggregate).unwrap().build(),
            Err(FilterError::IllegalAggregateOperator(op)) if op == "NOR"
        ));

        let unknown_attribute = r#"{
            "clauses": [ { "id": "c", "attribute": "depth", "operator": "gt", "values": ["1"] } ]
        }"#;
        assert!(matches!(
            FilterDocument::from_json(unknown_attribute).unwrap().build(),
            Err(FilterError::UnknownAttribute(id)) if id == "depth"
        ));

        assert!(FilterDocument::from_json("not json").is_err());
    }
}
