// Copyright 2025 Cowboy AI, LLC.

//! Labels, parameter vectors and DNA sequences
//!
//! A DNA sequence is the caller's description of a workload: an ordered
//! list of template references, each with the parameter vector that sets
//! its intensity.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::{WorkloadError, WorkloadResult};

/// Stable identifier of a template
///
/// Persisted configuration refers to templates by label, so labels must not
/// change between releases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Create a label
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Label as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl From<String> for Label {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Ordered parameter vector of a template invocation
///
/// The meaning of each position is defined by the owning template
/// (for example loop count first, then payload size).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Parameters(Vec<u64>);

impl Parameters {
    /// Create a parameter vector from values
    pub fn new(values: Vec<u64>) -> Self {
        Self(values)
    }

    /// Zero-filled vector of the given cardinality
    pub fn zeroed(cardinality: usize) -> Self {
        Self(vec![0; cardinality])
    }

    /// Bounds-checked access to a single parameter
    pub fn get_param(&self, index: usize) -> WorkloadResult<u64> {
        self.0
            .get(index)
            .copied()
            .ok_or(WorkloadError::ParameterOutOfRange {
                index,
                len: self.0.len(),
            })
    }

    /// Consume into the underlying vector
    pub fn into_inner(self) -> Vec<u64> {
        self.0
    }
}

impl Deref for Parameters {
    type Target = [u64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u64>> for Parameters {
    fn from(values: Vec<u64>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[u64; N]> for Parameters {
    fn from(values: [u64; N]) -> Self {
        Self(values.to_vec())
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// One template reference in a DNA sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnaElement {
    /// Template to invoke
    pub label: Label,
    /// Parameters of this occurrence
    pub parameters: Parameters,
}

impl DnaElement {
    /// Create a DNA element
    pub fn new(label: impl Into<Label>, parameters: impl Into<Parameters>) -> Self {
        Self {
            label: label.into(),
            parameters: parameters.into(),
        }
    }
}

impl fmt::Display for DnaElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.label, self.parameters)
    }
}

/// Ordered sequence of template references describing one transaction
///
/// Labels may repeat; every occurrence is generated with its own parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dna(Vec<DnaElement>);

impl Dna {
    /// Create a DNA sequence from elements
    pub fn new(elements: Vec<DnaElement>) -> Self {
        Self(elements)
    }

    /// Append an element
    pub fn push(&mut self, element: DnaElement) {
        self.0.push(element);
    }

    /// Iterate over the elements in order
    pub fn iter(&self) -> std::slice::Iter<'_, DnaElement> {
        self.0.iter()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<DnaElement> for Dna {
    fn from_iter<I: IntoIterator<Item = DnaElement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dna {
    type Item = &'a DnaElement;
    type IntoIter = std::slice::Iter<'a, DnaElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Dna {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{element}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_param_is_bounds_checked() {
        let params = Parameters::from([7, 9]);
        assert_eq!(params.get_param(1).unwrap(), 9);

        match params.get_param(2) {
            Err(WorkloadError::ParameterOutOfRange { index, len }) => {
                assert_eq!(index, 2);
                assert_eq!(len, 2);
            }
            other => panic!("Expected ParameterOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_zeroed_parameters() {
        assert_eq!(Parameters::zeroed(3).into_inner(), vec![0, 0, 0]);
        assert!(Parameters::zeroed(0).is_empty());
    }

    #[test]
    fn test_dna_display() {
        let dna: Dna = vec![
            DnaElement::new("EL", [10]),
            DnaElement::new("STLD", [1, 2]),
        ]
        .into_iter()
        .collect();

        assert_eq!(dna.to_string(), "[EL(10) STLD(1, 2)]");
        assert_eq!(Dna::default().to_string(), "[]");
    }

    #[test]
    fn test_dna_serializes_as_plain_list() {
        let dna = Dna::new(vec![DnaElement::new("EL", [5])]);
        let json = serde_json::to_string(&dna).unwrap();
        assert_eq!(json, r#"[{"label":"EL","parameters":[5]}]"#);

        let back: Dna = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dna);
    }
}
