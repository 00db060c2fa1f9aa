//! Namespace exposing attribute handles to the scripting evaluator.

use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;

use tracing::debug;

use crate::query::attribute::{Attribute, AttributeHandle, ColumnAttribute, TopologyAttribute};
use crate::query::builder::ComparisonBuilder;
use crate::query::domain::DomainRegistry;
use crate::query::engine::{DegreeKind, FilterEngine};
use crate::query::errors::FilterError;
use crate::types::{AttributeScope, ValueType};
use crate::Result;

/// Attribute handles and domain bounds visible to one console session.
///
/// Populated once through [`NamespaceBuilder`] and read-only afterwards.
#[derive(Debug)]
pub struct Namespace {
    name: String,
    attributes: BTreeMap<String, AttributeHandle>,
    domains: DomainRegistry,
}

impl Namespace {
    /// Starts populating a namespace.
    pub fn builder(name: impl Into<String>) -> NamespaceBuilder {
        NamespaceBuilder::new(name)
    }

    /// Namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Domain bounds used for ordering comparisons.
    pub fn domains(&self) -> &DomainRegistry {
        &self.domains
    }

    /// Resolves an attribute handle by name.
    pub fn attribute(&self, name: &str) -> Result<&AttributeHandle> {
        self.attributes
            .get(name)
            .ok_or_else(|| FilterError::UnknownAttribute {
                name: name.to_owned(),
            })
    }

    /// All attribute handles, ordered by name.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeHandle> {
        self.attributes.values()
    }
}

/// Shared reference to a populated [`Namespace`].
///
/// Every filter produced in the namespace carries a clone of this handle.
#[derive(Clone, Debug)]
pub struct NamespaceRef(Arc<Namespace>);

impl NamespaceRef {
    /// Returns true when both references point at the same namespace.
    pub fn same_as(&self, other: &NamespaceRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Comparison builder for the named attribute, using `engine` to create
    /// queries.
    pub fn compare<'a, E>(
        &'a self,
        name: &str,
        engine: &'a E,
    ) -> Result<ComparisonBuilder<'a, AttributeHandle, E>>
    where
        E: FilterEngine + ?Sized,
    {
        let attribute = self.0.attribute(name)?;
        Ok(ComparisonBuilder::new(
            attribute,
            engine,
            &self.0.domains,
            self.clone(),
        ))
    }
}

impl Deref for NamespaceRef {
    type Target = Namespace;

    fn deref(&self) -> &Namespace {
        &self.0
    }
}

/// Populates a namespace; the first error is reported by [`build`](Self::build).
pub struct NamespaceBuilder {
    name: String,
    attributes: BTreeMap<String, AttributeHandle>,
    domains: DomainRegistry,
    error: Option<FilterError>,
}

impl NamespaceBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            domains: DomainRegistry::native(),
            error: None,
        }
    }

    /// Registers a node data column.
    pub fn node_column(self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.attribute(ColumnAttribute::new(name, AttributeScope::Node, value_type))
    }

    /// Registers an edge data column.
    pub fn edge_column(self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.attribute(ColumnAttribute::new(name, AttributeScope::Edge, value_type))
    }

    /// Registers a degree measure under its canonical name.
    pub fn topology(self, degree: DegreeKind) -> Self {
        self.attribute(TopologyAttribute::new(degree))
    }

    /// Registers any attribute handle.
    pub fn attribute(mut self, attribute: impl Into<AttributeHandle>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let attribute = attribute.into();
        let name = attribute.name().to_owned();
        if self.attributes.contains_key(&name) {
            self.error = Some(FilterError::DuplicateAttribute { name });
            return self;
        }
        self.attributes.insert(name, attribute);
        self
    }

    /// Replaces the domain registry (native limits by default).
    pub fn domains(mut self, domains: DomainRegistry) -> Self {
        self.domains = domains;
        self
    }

    /// Finishes population.
    pub fn build(self) -> Result<NamespaceRef> {
        if let Some(err) = self.error {
            return Err(err);
        }
        debug!(
            namespace = %self.name,
            attributes = self.attributes.len(),
            "namespace populated"
        );
        Ok(NamespaceRef(Arc::new(Namespace {
            name: self.name,
            attributes: self.attributes,
            domains: self.domains,
        })))
    }
}
