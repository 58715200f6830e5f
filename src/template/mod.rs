// Copyright 2025 Cowboy AI, LLC.

//! Templates: parameterized generators of transaction fragments
//!
//! A template turns a parameter vector into a [`TransactionEdit`]. It may
//! also carry two lifecycle hooks:
//! - a global setup that runs at most once per template instance (for
//!   example deploying a support contract), and
//! - an account setup that prepares one account's state before the template
//!   is used with it. Account setups must be idempotent.

mod saved;
pub mod script;
mod simple;

pub use saved::SavedInitialParameters;
pub use simple::{EditContext, SimpleTemplate};

use std::sync::Arc;

use async_trait::async_trait;

use crate::chain::{Account, BuildEnvironment};
use crate::dna::{Label, Parameters};
use crate::errors::WorkloadResult;
use crate::transaction_edit::TransactionEdit;

/// Capability shared by every template variant
#[async_trait]
pub trait Template: Send + Sync {
    /// Human readable name
    fn name(&self) -> &str;

    /// Stable registry key
    fn label(&self) -> &Label;

    /// Number of parameters the template requires
    fn cardinality(&self) -> usize;

    /// Default parameters; a fresh copy on every call
    fn initial_parameters(&self) -> Parameters;

    /// Generate the fragment for one invocation
    ///
    /// Fails if `parameters` does not match the template's cardinality.
    fn transaction_edit(
        &self,
        env: &BuildEnvironment,
        parameters: &Parameters,
    ) -> WorkloadResult<TransactionEdit>;

    /// Run the one-time global setup unless it already completed
    async fn ensure_global_setup(&self, _env: &BuildEnvironment) -> WorkloadResult<()> {
        Ok(())
    }

    /// Whether [`Template::account_setup`] does anything
    fn has_account_setup(&self) -> bool {
        false
    }

    /// Prepare the account's state for this template
    async fn account_setup(
        &self,
        _env: &BuildEnvironment,
        _account: &dyn Account,
        _parameters: &Parameters,
    ) -> WorkloadResult<()> {
        Ok(())
    }

    /// Template this one decorates, if it is a wrapper
    fn base_template(&self) -> Option<Arc<dyn Template>> {
        None
    }
}
