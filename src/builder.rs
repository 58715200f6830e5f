// Copyright 2025 Cowboy AI, LLC.

//! DNA to transaction body pipeline

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::chain::{Account, Address, BuildEnvironment};
use crate::compose::TransactionComposer;
use crate::config::BuilderConfig;
use crate::dna::{Dna, Label};
use crate::errors::{WorkloadError, WorkloadResult};
use crate::registry::Registry;
use crate::transaction_edit::{TransactionBody, TransactionEdit};

/// Builds transaction bodies from DNA against a shared registry
///
/// The builder remembers which accounts it already prepared for which
/// template, so an account setup runs once per (template, account) for the
/// lifetime of the builder. Builds racing on the same pair wait for the
/// setup in flight instead of generating before it completes.
#[derive(Debug)]
pub struct TransactionBuilder {
    registry: Arc<Registry>,
    composer: TransactionComposer,
    prepared_accounts: Mutex<HashMap<(Label, Address), Arc<OnceCell<()>>>>,
}

impl TransactionBuilder {
    /// Create a builder with default composition settings
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, &BuilderConfig::default())
    }

    /// Create a builder with the given composition settings
    pub fn with_config(registry: Arc<Registry>, config: &BuilderConfig) -> Self {
        Self {
            registry,
            composer: TransactionComposer::new(config),
            prepared_accounts: Mutex::new(HashMap::new()),
        }
    }

    /// Registry the builder resolves labels against
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Generate the transaction body for a DNA sequence
    ///
    /// The DNA is validated up front. Then, per element in order, the
    /// template's global setup is ensured, the account is prepared if an
    /// account is given and the template has an account setup, and the
    /// fragment is generated. Any failure aborts the build.
    pub async fn build_transaction(
        &self,
        dna: &Dna,
        env: &BuildEnvironment,
        account: Option<&dyn Account>,
    ) -> WorkloadResult<TransactionBody> {
        self.build(dna, env, account)
            .await
            .map_err(|source| WorkloadError::PrepareTransactionFromDna {
                dna: dna.clone(),
                source: Box::new(source),
            })
    }

    async fn build(
        &self,
        dna: &Dna,
        env: &BuildEnvironment,
        account: Option<&dyn Account>,
    ) -> WorkloadResult<TransactionBody> {
        self.registry.validate_dna(dna)?;

        let mut edits: Vec<TransactionEdit> = Vec::with_capacity(dna.len());
        for element in dna {
            let template = self.registry.get(element.label.as_str())?;
            debug!(
                label = %element.label,
                parameters = %element.parameters,
                "Generating fragment"
            );

            template.ensure_global_setup(env).await?;

            if let Some(account) = account {
                if template.has_account_setup() {
                    // a failed setup leaves the latch unset, so the next build retries
                    let latch = self.account_latch(&element.label, account);
                    latch
                        .get_or_try_init(|| {
                            template.account_setup(env, account, &element.parameters)
                        })
                        .await?;
                }
            }

            edits.push(template.transaction_edit(env, &element.parameters)?);
        }

        self.composer.compose(&edits)
    }

    /// Latch guarding the account setup of one (template, account) pair
    fn account_latch(&self, label: &Label, account: &dyn Account) -> Arc<OnceCell<()>> {
        let mut prepared = self
            .prepared_accounts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        prepared
            .entry((label.clone(), account.address()))
            .or_default()
            .clone()
    }
}
