// Copyright 2025 Cowboy AI, LLC.

//! Initial-parameter override wrapper

use std::sync::Arc;

use async_trait::async_trait;

use super::Template;
use crate::chain::{Account, BuildEnvironment};
use crate::dna::{Label, Parameters};
use crate::errors::WorkloadResult;
use crate::transaction_edit::TransactionEdit;

/// Template whose initial parameters were loaded from configuration
///
/// Everything except [`Template::initial_parameters`] is delegated to the
/// wrapped template, including its global-setup latch. Wrapping an already
/// wrapped template replaces the previous override instead of stacking.
pub struct SavedInitialParameters {
    template: Arc<dyn Template>,
    initial_parameters: Parameters,
}

impl SavedInitialParameters {
    /// Override the initial parameters of `template`
    pub fn new(template: Arc<dyn Template>, initial_parameters: Parameters) -> Self {
        let template = template.base_template().unwrap_or(template);
        Self {
            template,
            initial_parameters,
        }
    }

    /// The template without the override
    pub fn inner(&self) -> &Arc<dyn Template> {
        &self.template
    }
}

#[async_trait]
impl Template for SavedInitialParameters {
    fn name(&self) -> &str {
        self.template.name()
    }

    fn label(&self) -> &Label {
        self.template.label()
    }

    fn cardinality(&self) -> usize {
        self.template.cardinality()
    }

    fn initial_parameters(&self) -> Parameters {
        self.initial_parameters.clone()
    }

    fn transaction_edit(
        &self,
        env: &BuildEnvironment,
        parameters: &Parameters,
    ) -> WorkloadResult<TransactionEdit> {
        self.template.transaction_edit(env, parameters)
    }

    async fn ensure_global_setup(&self, env: &BuildEnvironment) -> WorkloadResult<()> {
        self.template.ensure_global_setup(env).await
    }

    fn has_account_setup(&self) -> bool {
        self.template.has_account_setup()
    }

    async fn account_setup(
        &self,
        env: &BuildEnvironment,
        account: &dyn Account,
        parameters: &Parameters,
    ) -> WorkloadResult<()> {
        self.template.account_setup(env, account, parameters).await
    }

    fn base_template(&self) -> Option<Arc<dyn Template>> {
        Some(self.template.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::SimpleTemplate;

    fn base() -> Arc<dyn Template> {
        let template: SimpleTemplate = SimpleTemplate::new("empty loop", "EL", 1)
            .with_initial_parameters([5397])
            .with_transaction_edit(|ctx| Ok(TransactionEdit::prepare(format!("loop {}", ctx.param(0)?))));
        Arc::new(template)
    }

    #[test]
    fn test_override_is_transparent() {
        let base = base();
        let saved = SavedInitialParameters::new(base.clone(), Parameters::from([10]));

        assert_eq!(saved.name(), base.name());
        assert_eq!(saved.label(), base.label());
        assert_eq!(saved.cardinality(), base.cardinality());
        assert_eq!(saved.initial_parameters(), Parameters::from([10]));

        let env = BuildEnvironment::new("emulator");
        let params = Parameters::from([3]);
        assert_eq!(
            saved.transaction_edit(&env, &params).unwrap(),
            base.transaction_edit(&env, &params).unwrap()
        );
    }

    #[test]
    fn test_overrides_do_not_stack() {
        let base = base();
        let first: Arc<dyn Template> =
            Arc::new(SavedInitialParameters::new(base.clone(), Parameters::from([10])));
        let second = SavedInitialParameters::new(first, Parameters::from([20]));

        assert_eq!(second.initial_parameters(), Parameters::from([20]));
        assert!(Arc::ptr_eq(second.inner(), &base));
    }
}
