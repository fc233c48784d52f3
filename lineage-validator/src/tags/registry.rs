//! Custom tag definitions and registries.
//!
//! A registry is a plain name -> definition map owned by its instance. Merging
//! builds a new registry; neither input is touched, and no registry ever
//! shares mutable storage with another.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use regex::Regex;

use crate::error::TagRegistryError;
use crate::tags::vendors::Vendor;

/// Rules for one custom tag.
#[derive(Debug, Clone)]
pub struct TagDefinition {
    name: String,
    /// Empty means the tag may appear anywhere.
    allowed_parents: BTreeSet<String>,
    value_pattern: Option<Regex>,
    description: String,
}

/// How a registered tag was misused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagViolation {
    InvalidParent {
        tag: String,
        parent: String,
        allowed: Vec<String>,
    },
    InvalidValue {
        tag: String,
        value: String,
        pattern: String,
    },
}

impl fmt::Display for TagViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParent {
                tag,
                parent,
                allowed,
            } => write!(
                f,
                "{tag} is not allowed under {parent} (allowed: {})",
                allowed.join(", ")
            ),
            Self::InvalidValue {
                tag,
                value,
                pattern,
            } => write!(f, "{tag} value {value:?} does not match {pattern}"),
        }
    }
}

impl TagDefinition {
    #[must_use]
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_owned(),
            allowed_parents: BTreeSet::new(),
            value_pattern: None,
            description: description.to_owned(),
        }
    }

    #[must_use]
    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_parents
            .extend(parents.into_iter().map(Into::into));
        self
    }

    /// Restrict non-empty values to a pattern. The pattern must match the
    /// whole value.
    ///
    /// # Errors
    /// Returns [`TagRegistryError::InvalidPattern`] if the pattern does not
    /// compile.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, TagRegistryError> {
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|source| TagRegistryError::InvalidPattern {
            tag: self.name.clone(),
            source,
        })?;
        self.value_pattern = Some(regex);
        Ok(self)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn allowed_parents(&self) -> &BTreeSet<String> {
        &self.allowed_parents
    }

    #[must_use]
    pub fn value_pattern(&self) -> Option<&str> {
        self.value_pattern.as_ref().map(Regex::as_str)
    }

    /// Parent first, then value: a tag in the wrong place reports only that.
    #[must_use]
    pub fn check(&self, parent: &str, value: &str) -> Option<TagViolation> {
        if !self.allowed_parents.is_empty() && !self.allowed_parents.contains(parent) {
            return Some(TagViolation::InvalidParent {
                tag: self.name.clone(),
                parent: parent.to_owned(),
                allowed: self.allowed_parents.iter().cloned().collect(),
            });
        }
        if let Some(pattern) = &self.value_pattern
            && !value.is_empty()
            && !pattern.is_match(value)
        {
            return Some(TagViolation::InvalidValue {
                tag: self.name.clone(),
                value: value.to_owned(),
                pattern: pattern.as_str().to_owned(),
            });
        }
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    tags: BTreeMap<String, TagDefinition>,
}

fn check_name(name: &str) -> Result<(), TagRegistryError> {
    if name.len() > 1 && name.starts_with('_') {
        Ok(())
    } else {
        Err(TagRegistryError::InvalidName(name.to_owned()))
    }
}

impl TagRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh registry holding one vendor's tags.
    #[must_use]
    pub fn for_vendor(vendor: Vendor) -> Self {
        let mut tags = BTreeMap::new();
        for definition in vendor.definitions() {
            tags.entry(definition.name.clone()).or_insert(definition);
        }
        Self { tags }
    }

    /// Several vendors merged; earlier vendors win on conflicting names.
    #[must_use]
    pub fn with_vendors(vendors: &[Vendor]) -> Self {
        vendors
            .iter()
            .map(|v| Self::for_vendor(*v))
            .fold(Self::new(), |acc, next| acc.merge(&next))
    }

    /// # Errors
    /// Returns [`TagRegistryError::DuplicateTag`] if the name is taken, or
    /// [`TagRegistryError::InvalidName`] if it is not an underscore tag.
    pub fn register(&mut self, definition: TagDefinition) -> Result<(), TagRegistryError> {
        check_name(&definition.name)?;
        if self.tags.contains_key(&definition.name) {
            return Err(TagRegistryError::DuplicateTag(definition.name));
        }
        self.tags.insert(definition.name.clone(), definition);
        Ok(())
    }

    /// Register a batch of definitions, all or nothing.
    ///
    /// # Errors
    /// Returns the first problem found (a taken name, a name repeated within
    /// the batch, or a non-underscore name); the registry is left unchanged.
    pub fn register_all<I>(&mut self, definitions: I) -> Result<(), TagRegistryError>
    where
        I: IntoIterator<Item = TagDefinition>,
    {
        let batch: Vec<TagDefinition> = definitions.into_iter().collect();
        let mut names = BTreeSet::new();
        for definition in &batch {
            check_name(&definition.name)?;
            if self.tags.contains_key(&definition.name) || !names.insert(definition.name.as_str()) {
                return Err(TagRegistryError::DuplicateTag(definition.name.clone()));
            }
        }
        for definition in batch {
            self.tags.insert(definition.name.clone(), definition);
        }
        Ok(())
    }

    /// A new registry with every tag of `self`, plus the tags of `other`
    /// whose names `self` does not already define.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut tags = self.tags.clone();
        for (name, definition) in &other.tags {
            tags.entry(name.clone())
                .or_insert_with(|| definition.clone());
        }
        Self { tags }
    }

    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&TagDefinition> {
        self.tags.get(tag)
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// `None` if the tag is unregistered or used correctly.
    #[must_use]
    pub fn validate(&self, tag: &str, parent: &str, value: &str) -> Option<TagViolation> {
        self.tags.get(tag)?.check(parent, value)
    }
}
