// Copyright 2025 Cowboy AI, LLC.

//! Generated fragments and assembled transaction bodies

use std::collections::BTreeMap;
use std::fmt;

use crate::chain::Address;

/// Output of one template invocation
///
/// Every block is opaque script text. An empty block contributes nothing
/// to the assembled transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionEdit {
    /// Contracts the fragment imports, by name
    pub imports: BTreeMap<String, Address>,
    /// Top-level field declarations
    pub field_declarations: String,
    /// Body run in the prepare phase
    pub prepare_block: String,
    /// Body run in the execute phase
    pub execute_block: String,
}

impl TransactionEdit {
    /// Fragment with only a prepare block
    pub fn prepare(block: impl Into<String>) -> Self {
        Self {
            prepare_block: block.into(),
            ..Self::default()
        }
    }

    /// Fragment with only an execute block
    pub fn execute(block: impl Into<String>) -> Self {
        Self {
            execute_block: block.into(),
            ..Self::default()
        }
    }

    /// Add a contract import
    pub fn with_import(mut self, name: impl Into<String>, address: Address) -> Self {
        self.imports.insert(name.into(), address);
        self
    }

    /// Set the field declarations
    pub fn with_field_declarations(mut self, declarations: impl Into<String>) -> Self {
        self.field_declarations = declarations.into();
        self
    }

    /// Check if the fragment contributes nothing
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.field_declarations.is_empty()
            && self.prepare_block.is_empty()
            && self.execute_block.is_empty()
    }
}

/// Assembled transaction script
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TransactionBody(String);

impl TransactionBody {
    /// Wrap assembled script text
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    /// Script text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the script text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TransactionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TransactionBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
