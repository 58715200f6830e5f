// Copyright 2025 Cowboy AI, LLC.

//! # CIM Workload
//!
//! Transaction workload generation from template DNA.
//!
//! A workload transaction is described by its DNA: an ordered list of
//! template labels, each with a parameter vector. This crate turns DNA into
//! one executable transaction body:
//! - **Templates**: parameterized generators of transaction fragments, with
//!   optional one-time global setup and per-account setup hooks
//! - **Registry**: the label to template mapping, with DNA validation and
//!   initial-parameter overrides loaded from configuration
//! - **Composition**: splicing fragments into the declaration, prepare and
//!   execute regions of a transaction skeleton with normalized indentation
//! - **Catalog**: the default set of templates
//!
//! ## Design Principles
//!
//! 1. **Explicit state**: the registry is a value built at startup and
//!    shared by reference, never a global
//! 2. **Injected chain access**: setup hooks reach the ledger only through
//!    the [`ChainInteraction`] carried by the [`BuildEnvironment`]
//! 3. **Ordered execution**: fragment `i` completes before fragment `i + 1`
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cim_workload::{BuildEnvironment, Dna, DnaElement, Registry, TransactionBuilder};
//!
//! # async fn run() -> cim_workload::WorkloadResult<()> {
//! let registry = Arc::new(Registry::with_default_catalog()?);
//! let builder = TransactionBuilder::new(registry);
//!
//! let dna = Dna::new(vec![DnaElement::new("EL", [10]), DnaElement::new("Assert", [5])]);
//! let body = builder
//!     .build_transaction(&dna, &BuildEnvironment::new("emulator"), None)
//!     .await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
mod chain;
mod compose;
mod config;
mod dna;
mod errors;
mod registry;
mod transaction_edit;
pub mod catalog;
pub mod template;

#[cfg(test)]
mod testing;

// Re-export core types
pub use builder::TransactionBuilder;
pub use chain::{
    deploy_contract, run_transaction_body_as_account, Account, Address, BlockId,
    BuildEnvironment, ChainInteraction, NetworkId, TransactionOutcome, TransactionRequest,
};
pub use compose::{trim_and_replace_indentation, TransactionComposer};
pub use config::{BuilderConfig, DEFAULT_SIGNER_AUTHORIZATION};
pub use dna::{Dna, DnaElement, Label, Parameters};
pub use errors::{BoxError, WorkloadError, WorkloadResult};
pub use registry::{
    save_initial_parameters_to_file, InitialParametersData, Registry, TemplateInitialParameters,
};
pub use template::{EditContext, SavedInitialParameters, SimpleTemplate, Template};
pub use transaction_edit::{TransactionBody, TransactionEdit};
