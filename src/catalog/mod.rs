// Copyright 2025 Cowboy AI, LLC.

//! Default template catalog
//!
//! The catalog is plain data: a list of templates that
//! [`Registry::with_default_catalog`](crate::Registry::with_default_catalog)
//! registers at startup. Templates reference well-known system contracts
//! whose addresses depend on the target network, see [`SystemContracts`].

mod collections;
mod contract;
mod scheduled;
mod simple;
mod storage;

use std::sync::Arc;

use crate::chain::{Address, NetworkId};
use crate::errors::{WorkloadError, WorkloadResult};
use crate::template::Template;
use crate::transaction_edit::TransactionEdit;

use contract::SharedDeployment;

pub use contract::{TEST_CONTRACT, TEST_CONTRACT_NAME};

/// Every template of the default catalog, in registration order
///
/// Contract and scheduled templates of one call share a single
/// `TestContract` deployment.
pub fn default_templates() -> Vec<Arc<dyn Template>> {
    let deployment = SharedDeployment::default();

    let mut templates = simple::templates();
    templates.extend(storage::templates());
    templates.extend(collections::templates());
    templates.extend(contract::templates(&deployment));
    templates.extend(scheduled::templates(&deployment));
    templates
}

/// Addresses of the system contracts catalog templates import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemContracts {
    /// `FungibleToken` interface contract
    pub fungible_token: Address,
    /// `FlowToken` contract
    pub flow_token: Address,
    /// `FlowTransactionScheduler` contract
    pub transaction_scheduler: Address,
}

impl SystemContracts {
    /// System contracts of a known network
    pub fn for_network(network: &NetworkId) -> WorkloadResult<Self> {
        let contracts = match network.0.as_str() {
            "emulator" => Self {
                fungible_token: Address::from_u64(0xee82856bf20e2aa6),
                flow_token: Address::from_u64(0x0ae53cb6e3f42a79),
                transaction_scheduler: Address::from_u64(0xf8d6e0586b0a20c7),
            },
            "testnet" => Self {
                fungible_token: Address::from_u64(0x9a0766d93b6608b7),
                flow_token: Address::from_u64(0x7e60df042a9c0868),
                transaction_scheduler: Address::from_u64(0x8c5303eaa26202d6),
            },
            "mainnet" => Self {
                fungible_token: Address::from_u64(0xf233dcee88fe0abe),
                flow_token: Address::from_u64(0x1654653399040a61),
                transaction_scheduler: Address::from_u64(0xe467b9dd11fa00df),
            },
            other => {
                return Err(WorkloadError::NotImplemented(format!(
                    "system contracts for network {other}"
                )))
            }
        };
        Ok(contracts)
    }

    /// Add the token contract imports to an edit
    pub fn with_token_imports(&self, edit: TransactionEdit) -> TransactionEdit {
        edit.with_import("FlowToken", self.flow_token)
            .with_import("FungibleToken", self.fungible_token)
    }
}
