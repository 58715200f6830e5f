// Copyright 2025 Cowboy AI, LLC.

//! Template registry
//!
//! The registry owns the label to template mapping. It is built once at
//! startup and then shared read-only (for example behind an `Arc`);
//! [`Registry::clone`] gives a caller an independent mapping to adjust,
//! typically to apply initial-parameter overrides.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog;
use crate::config::BuilderConfig;
use crate::dna::{Dna, Label, Parameters};
use crate::errors::{WorkloadError, WorkloadResult};
use crate::template::{SavedInitialParameters, Template};

/// Label to template mapping
///
/// Cloning copies the mapping; templates themselves are shared, including
/// their global-setup state.
#[derive(Clone, Default)]
pub struct Registry {
    templates: IndexMap<Label, Arc<dyn Template>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the default template catalog
    pub fn with_default_catalog() -> WorkloadResult<Self> {
        let mut registry = Self::new();
        registry.register_all(catalog::default_templates())?;
        Ok(registry)
    }

    /// Default catalog with the configured initial-parameter overrides applied
    pub fn from_config(config: &BuilderConfig) -> WorkloadResult<Self> {
        let mut registry = Self::with_default_catalog()?;
        if let Some(path) = &config.initial_parameters_path {
            registry.load_initial_parameters_from_file(path)?;
        }
        Ok(registry)
    }

    /// Register a template under its label
    ///
    /// # Errors
    ///
    /// Returns `TemplateAlreadyRegistered` if the label is taken; the
    /// registry is left unchanged.
    pub fn register(&mut self, template: Arc<dyn Template>) -> WorkloadResult<()> {
        let label = template.label().clone();
        if self.templates.contains_key(&label) {
            return Err(WorkloadError::TemplateAlreadyRegistered { label });
        }

        self.templates.insert(label, template);
        Ok(())
    }

    /// Register templates in order, stopping at the first failure
    ///
    /// Templates registered before the failure stay registered.
    pub fn register_all<I>(&mut self, templates: I) -> WorkloadResult<()>
    where
        I: IntoIterator<Item = Arc<dyn Template>>,
    {
        for template in templates {
            self.register(template)?;
        }
        Ok(())
    }

    /// Remove templates; absent labels are ignored
    pub fn unregister<'a, I>(&mut self, labels: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for label in labels {
            self.templates.shift_remove(label);
        }
        self
    }

    /// Look up a template
    pub fn get(&self, label: &str) -> WorkloadResult<Arc<dyn Template>> {
        self.templates
            .get(label)
            .cloned()
            .ok_or_else(|| WorkloadError::TemplateNotFound {
                label: Label::from(label),
            })
    }

    /// Check if a label is registered
    pub fn contains(&self, label: &str) -> bool {
        self.templates.contains_key(label)
    }

    /// Labels currently registered, in registration order
    pub fn all_labels(&self) -> Vec<Label> {
        self.templates.keys().cloned().collect()
    }

    /// Number of registered templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Check every DNA element against the registered templates
    ///
    /// Elements are checked in DNA order and the first violation is
    /// returned: an unknown label or a parameter count that differs from the
    /// template's cardinality.
    pub fn validate_dna(&self, dna: &Dna) -> WorkloadResult<()> {
        for element in dna {
            let template = self.get(element.label.as_str())?;
            if template.cardinality() != element.parameters.len() {
                return Err(WorkloadError::CardinalityMismatch {
                    label: element.label.clone(),
                    expected: template.cardinality(),
                    actual: element.parameters.len(),
                });
            }
        }
        Ok(())
    }

    /// Replace the initial parameters of registered templates
    ///
    /// Labels that are not registered are skipped. Every override must match
    /// its template's cardinality; if one does not, nothing is applied.
    /// Returns the number of templates that were overridden.
    pub fn load_initial_parameters_override(
        &mut self,
        data: &InitialParametersData,
    ) -> WorkloadResult<usize> {
        let mut overrides = Vec::with_capacity(data.templates.len());
        for (label, entry) in &data.templates {
            let Some(template) = self.templates.get(label) else {
                warn!(label = %label, "Skipping initial parameters for unregistered template");
                continue;
            };

            if entry.initial_parameters.len() != template.cardinality() {
                return Err(WorkloadError::CardinalityMismatch {
                    label: label.clone(),
                    expected: template.cardinality(),
                    actual: entry.initial_parameters.len(),
                });
            }
            overrides.push((label.clone(), entry.initial_parameters.clone()));
        }

        let applied = overrides.len();
        for (label, parameters) in overrides {
            if let Some(slot) = self.templates.get_mut(&label) {
                let saved = SavedInitialParameters::new(slot.clone(), parameters);
                *slot = Arc::new(saved);
            }
        }

        debug!(applied, "Loaded initial parameter overrides");
        Ok(applied)
    }

    /// Read an override file and apply it
    pub fn load_initial_parameters_from_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> WorkloadResult<usize> {
        let contents = std::fs::read_to_string(path)?;
        let data: InitialParametersData = serde_json::from_str(&contents)?;
        self.load_initial_parameters_override(&data)
    }

    /// Current initial parameters of every template, in override-file form
    pub fn initial_parameters_snapshot(&self) -> InitialParametersData {
        InitialParametersData {
            templates: self
                .templates
                .iter()
                .map(|(label, template)| {
                    (
                        label.clone(),
                        TemplateInitialParameters {
                            initial_parameters: template.initial_parameters(),
                        },
                    )
                })
                .collect(),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("labels", &self.templates.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Persisted initial-parameter overrides, keyed by template label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InitialParametersData {
    /// Overrides per template
    pub templates: BTreeMap<Label, TemplateInitialParameters>,
}

/// Override entry for one template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateInitialParameters {
    /// Initial parameters to use instead of the template's defaults
    #[serde(rename = "parameters")]
    pub initial_parameters: Parameters,
}

impl InitialParametersData {
    /// JSON Schema of the override file
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(InitialParametersData))
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Write overrides to a file as pretty-printed JSON
pub fn save_initial_parameters_to_file(
    path: impl AsRef<Path>,
    data: &InitialParametersData,
) -> WorkloadResult<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}
