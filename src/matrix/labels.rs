//! Ordered, unique label sequences used as row and column keys.
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Labels {
    names: Vec<String>,
    // Rebuilt from `names`; never serialized.
    index: HashMap<String, usize>,
}

impl Labels {
    pub fn new(names: Vec<String>) -> Result<Self, EngineError> {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(EngineError::DuplicateLabel { label: name.clone() });
            }
        }
        Ok(Self { names, index })
    }

    /// Positional labels "0", "1", ... for data supplied without labels.
    pub fn indexed(len: usize) -> Self {
        Self::prefixed("", len)
    }

    /// Labels "{prefix}0", "{prefix}1", ...
    pub fn prefixed(prefix: &str, len: usize) -> Self {
        let names: Vec<String> = (0..len).map(|i| format!("{}{}", prefix, i)).collect();
        let index = names.iter().enumerate().map(|(i, n)| (n.clone(), i)).collect();
        Self { names, index }
    }

    pub fn len(&self) -> usize { self.names.len() }
    pub fn is_empty(&self) -> bool { self.names.is_empty() }

    #[inline]
    pub fn position(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool { self.index.contains_key(label) }
    pub fn get(&self, i: usize) -> Option<&str> { self.names.get(i).map(String::as_str) }
    pub fn as_slice(&self) -> &[String] { &self.names }
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ { self.names.iter().map(String::as_str) }

    /// Equal as sets, regardless of order.
    pub fn same_set(&self, other: &Labels) -> bool {
        self.len() == other.len() && self.names.iter().all(|n| other.contains(n))
    }

    /// Labels of `self` absent from `other`, in `self`'s order.
    pub fn difference(&self, other: &Labels) -> Vec<String> {
        self.names.iter().filter(|n| !other.contains(n)).cloned().collect()
    }

    /// The labels at `positions`, in that order. Positions must be distinct.
    pub(crate) fn subset(&self, positions: &[usize]) -> Labels {
        let names: Vec<String> = positions.iter().map(|&i| self.names[i].clone()).collect();
        let index = names.iter().enumerate().map(|(i, n)| (n.clone(), i)).collect();
        Labels { names, index }
    }

    /// `self` followed by `other`; fails if the two share a label.
    pub fn concat(&self, other: &Labels) -> Result<Labels, EngineError> {
        let mut names = self.names.clone();
        names.extend(other.names.iter().cloned());
        Labels::new(names)
    }
}

impl PartialEq for Labels {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

impl TryFrom<Vec<String>> for Labels {
    type Error = EngineError;
    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Labels::new(names)
    }
}

impl From<Labels> for Vec<String> {
    fn from(labels: Labels) -> Self {
        labels.names
    }
}
