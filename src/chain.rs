// Copyright 2025 Cowboy AI, LLC.

//! Chain interaction capability consumed by template setup hooks
//!
//! Nothing in this crate talks to a network. Callers inject an
//! implementation of [`ChainInteraction`] through the [`BuildEnvironment`]
//! and setup hooks use it to borrow accounts and submit transactions.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::debug;

use crate::compose::trim_and_replace_indentation;
use crate::config::DEFAULT_SIGNER_AUTHORIZATION;
use crate::errors::{BoxError, WorkloadError, WorkloadResult};
use crate::transaction_edit::TransactionBody;

/// Account address on the target ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 8]);

impl Address {
    /// All-zero address; an import from it names a built-in contract
    pub const EMPTY: Address = Address([0; 8]);

    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Create an address from its integer form
    pub const fn from_u64(value: u64) -> Self {
        Self(value.to_be_bytes())
    }

    /// Whether this is [`Address::EMPTY`]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Raw address bytes
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Hex rendering with a `0x` prefix
    pub fn hex_with_prefix(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex_with_prefix())
    }
}

/// Identifier of a block used as transaction reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockId(pub String);

/// Identifier of the target network (emulator, testnet, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkId(pub String);

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Usable, escrow-exclusive account handle
pub trait Account: Send + Sync + fmt::Debug {
    /// Address of the account
    fn address(&self) -> Address;

    /// Record that a transaction proposed by this account was sent
    fn increment_sequence_number(&self);
}

/// Transaction submitted through a [`ChainInteraction`]
#[derive(Debug, Clone)]
pub struct TransactionRequest {
    /// Script body
    pub body: TransactionBody,
    /// Reference block the transaction is valid against
    pub reference_block: BlockId,
    /// Account that proposes, pays for and authorizes the transaction
    pub authorizer: Address,
}

/// Final result of a submitted transaction
pub type TransactionOutcome = Result<(), String>;

/// Capability to interact with the ledger, injected by the caller
#[async_trait]
pub trait ChainInteraction: Send + Sync {
    /// Acquire an account for exclusive use
    async fn borrow(&self) -> Result<Arc<dyn Account>, BoxError>;

    /// Latest block to use as transaction reference
    async fn reference_block(&self) -> Result<BlockId, BoxError>;

    /// Submit a transaction; the receiver resolves once it is sealed
    async fn send(
        &self,
        request: TransactionRequest,
    ) -> Result<oneshot::Receiver<TransactionOutcome>, BoxError>;
}

/// Build-time environment passed through to setup hooks
#[derive(Clone)]
pub struct BuildEnvironment {
    network: NetworkId,
    interaction: Option<Arc<dyn ChainInteraction>>,
}

impl BuildEnvironment {
    /// Environment without chain access
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: NetworkId(network.into()),
            interaction: None,
        }
    }

    /// Attach a chain interaction capability
    pub fn with_interaction(mut self, interaction: Arc<dyn ChainInteraction>) -> Self {
        self.interaction = Some(interaction);
        self
    }

    /// Target network
    pub fn network(&self) -> &NetworkId {
        &self.network
    }

    /// Chain interaction capability, required by hooks that touch the ledger
    pub fn interaction(&self) -> WorkloadResult<&Arc<dyn ChainInteraction>> {
        self.interaction
            .as_ref()
            .ok_or(WorkloadError::MissingChainInteraction)
    }
}

impl fmt::Debug for BuildEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildEnvironment")
            .field("network", &self.network)
            .field("interaction", &self.interaction.is_some())
            .finish()
    }
}

fn chain_error(err: BoxError) -> WorkloadError {
    WorkloadError::ChainInteraction(err.to_string())
}

/// Run a prepare body as the given account and wait for the outcome
pub async fn run_transaction_body_as_account(
    env: &BuildEnvironment,
    prepare_body: &str,
    account: &dyn Account,
) -> WorkloadResult<()> {
    let body = TransactionBody::new(format!(
        "transaction {{\n    prepare(signer: {DEFAULT_SIGNER_AUTHORIZATION}) {{\n{}    }}\n}}",
        trim_and_replace_indentation(prepare_body, 8, 4)
    ));
    submit(env, body, account).await
}

/// Deploy a contract from a borrowed account and return that account's address
///
/// The borrowed account is not returned to the caller.
pub async fn deploy_contract(
    env: &BuildEnvironment,
    name: &str,
    code: &str,
) -> WorkloadResult<Address> {
    let interaction = env.interaction()?;
    let account = interaction.borrow().await.map_err(chain_error)?;

    let body = TransactionBody::new(format!(
        "transaction {{\n    prepare(signer: {DEFAULT_SIGNER_AUTHORIZATION}) {{\n        signer.contracts.add(name: \"{name}\", code: \"{}\".decodeHex())\n    }}\n}}",
        hex::encode(code)
    ));
    submit(env, body, account.as_ref()).await?;

    debug!(
        contract = %name,
        address = %account.address(),
        network = %env.network(),
        "Deployed contract"
    );
    Ok(account.address())
}

async fn submit(
    env: &BuildEnvironment,
    body: TransactionBody,
    account: &dyn Account,
) -> WorkloadResult<()> {
    let interaction = env.interaction()?;
    let reference_block = interaction.reference_block().await.map_err(chain_error)?;

    let receiver = interaction
        .send(TransactionRequest {
            body,
            reference_block,
            authorizer: account.address(),
        })
        .await
        .map_err(chain_error)?;

    let outcome = receiver.await.map_err(|_| {
        WorkloadError::ChainInteraction("transaction result channel closed".to_string())
    })?;
    account.increment_sequence_number();

    outcome.map_err(WorkloadError::ChainInteraction)
}
