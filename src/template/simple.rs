// Copyright 2025 Cowboy AI, LLC.

//! Closure-configured template variant

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::OnceCell;
use tracing::info;

use super::Template;
use crate::chain::{Account, BuildEnvironment};
use crate::dna::{Label, Parameters};
use crate::errors::{BoxError, WorkloadError, WorkloadResult};
use crate::transaction_edit::TransactionEdit;

type EditFn<S> = dyn Fn(&EditContext<'_, S>) -> Result<TransactionEdit, BoxError> + Send + Sync;

type GlobalSetupFn<S> =
    dyn for<'a> Fn(&'a BuildEnvironment) -> BoxFuture<'a, Result<S, BoxError>> + Send + Sync;

type AccountSetupFn = dyn for<'a> Fn(
        &'a BuildEnvironment,
        &'a dyn Account,
        &'a Parameters,
    ) -> BoxFuture<'a, Result<(), BoxError>>
    + Send
    + Sync;

/// Inputs available to a generation function
pub struct EditContext<'a, S> {
    label: &'a Label,
    parameters: &'a Parameters,
    environment: &'a BuildEnvironment,
    setup: &'a OnceCell<S>,
}

impl<'a, S> EditContext<'a, S> {
    /// Parameters of this invocation
    pub fn parameters(&self) -> &'a Parameters {
        self.parameters
    }

    /// Bounds-checked access to one parameter
    pub fn param(&self, index: usize) -> WorkloadResult<u64> {
        self.parameters.get_param(index)
    }

    /// Build environment of the current request
    pub fn environment(&self) -> &'a BuildEnvironment {
        self.environment
    }

    /// Value produced by the template's global setup
    ///
    /// Fails until the global setup has completed successfully.
    pub fn setup(&self) -> WorkloadResult<&'a S> {
        self.setup.get().ok_or_else(|| WorkloadError::SetupNotCompleted {
            label: self.label.clone(),
        })
    }
}

/// Template configured with closures
///
/// `S` is the value materialized by the global setup (for example the
/// address of a deployed contract). It is stored once, shared by every
/// later invocation, and read through [`EditContext::setup`].
///
/// # Example
///
/// ```
/// use cim_workload::{Parameters, SimpleTemplate, Template, TransactionEdit};
/// use cim_workload::template::script::loop_template;
///
/// let template: SimpleTemplate = SimpleTemplate::new("empty loop", "EL", 1)
///     .with_initial_parameters([5397])
///     .with_transaction_edit(|ctx| {
///         Ok(TransactionEdit::prepare(loop_template(ctx.param(0)?, "")))
///     });
///
/// assert_eq!(template.initial_parameters(), Parameters::from([5397]));
/// ```
pub struct SimpleTemplate<S = ()> {
    name: String,
    label: Label,
    cardinality: usize,
    initial_parameters: Option<Parameters>,
    transaction_edit: Option<Box<EditFn<S>>>,
    global_setup: Option<Box<GlobalSetupFn<S>>>,
    account_setup: Option<Box<AccountSetupFn>>,
    setup_state: OnceCell<S>,
}

impl<S: Send + Sync + 'static> SimpleTemplate<S> {
    /// Create a template without generation function or hooks
    pub fn new(name: impl Into<String>, label: impl Into<Label>, cardinality: usize) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            cardinality,
            initial_parameters: None,
            transaction_edit: None,
            global_setup: None,
            account_setup: None,
            setup_state: OnceCell::new(),
        }
    }

    /// Set the generation function
    pub fn with_transaction_edit<F>(mut self, transaction_edit: F) -> Self
    where
        F: Fn(&EditContext<'_, S>) -> Result<TransactionEdit, BoxError> + Send + Sync + 'static,
    {
        self.transaction_edit = Some(Box::new(transaction_edit));
        self
    }

    /// Set the default parameters
    pub fn with_initial_parameters(mut self, initial_parameters: impl Into<Parameters>) -> Self {
        self.initial_parameters = Some(initial_parameters.into());
        self
    }

    /// Set the one-time global setup
    pub fn with_global_setup<F>(mut self, global_setup: F) -> Self
    where
        F: for<'a> Fn(&'a BuildEnvironment) -> BoxFuture<'a, Result<S, BoxError>>
            + Send
            + Sync
            + 'static,
    {
        self.global_setup = Some(Box::new(global_setup));
        self
    }

    /// Set the per-account setup; it must be safe to run more than once
    pub fn with_account_setup<F>(mut self, account_setup: F) -> Self
    where
        F: for<'a> Fn(
                &'a BuildEnvironment,
                &'a dyn Account,
                &'a Parameters,
            ) -> BoxFuture<'a, Result<(), BoxError>>
            + Send
            + Sync
            + 'static,
    {
        self.account_setup = Some(Box::new(account_setup));
        self
    }

    /// Value produced by the global setup, if it has completed
    pub fn setup_state(&self) -> Option<&S> {
        self.setup_state.get()
    }
}

#[async_trait]
impl<S: Send + Sync + 'static> Template for SimpleTemplate<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &Label {
        &self.label
    }

    fn cardinality(&self) -> usize {
        self.cardinality
    }

    fn initial_parameters(&self) -> Parameters {
        match &self.initial_parameters {
            Some(parameters) => parameters.clone(),
            None => Parameters::zeroed(self.cardinality),
        }
    }

    fn transaction_edit(
        &self,
        env: &BuildEnvironment,
        parameters: &Parameters,
    ) -> WorkloadResult<TransactionEdit> {
        if parameters.len() != self.cardinality {
            return Err(WorkloadError::CardinalityMismatch {
                label: self.label.clone(),
                expected: self.cardinality,
                actual: parameters.len(),
            });
        }

        let Some(transaction_edit) = &self.transaction_edit else {
            return Ok(TransactionEdit::default());
        };

        let context = EditContext {
            label: &self.label,
            parameters,
            environment: env,
            setup: &self.setup_state,
        };
        transaction_edit(&context).map_err(|err| WorkloadError::generation_failed(&self.label, err))
    }

    async fn ensure_global_setup(&self, env: &BuildEnvironment) -> WorkloadResult<()> {
        let Some(global_setup) = &self.global_setup else {
            return Ok(());
        };

        // A failed initialization leaves the cell empty, so the next
        // caller retries. Concurrent first callers wait on the same run.
        self.setup_state
            .get_or_try_init(|| async {
                info!(
                    label = %self.label,
                    network = %env.network(),
                    "Running global template setup"
                );
                global_setup(env).await
            })
            .await
            .map_err(|err| WorkloadError::generation_failed(&self.label, err))?;

        Ok(())
    }

    fn has_account_setup(&self) -> bool {
        self.account_setup.is_some()
    }

    async fn account_setup(
        &self,
        env: &BuildEnvironment,
        account: &dyn Account,
        parameters: &Parameters,
    ) -> WorkloadResult<()> {
        let Some(account_setup) = &self.account_setup else {
            return Ok(());
        };

        info!(
            label = %self.label,
            account = %account.address(),
            "Running account template setup"
        );
        account_setup(env, account, parameters)
            .await
            .map_err(|err| WorkloadError::generation_failed(&self.label, err))
    }
}
