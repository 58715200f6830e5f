// Copyright 2025 Cowboy AI, LLC.

//! Scheduled transaction templates
//!
//! `p[0]` is the number of transactions scheduled per invocation. For the
//! large payload variants `p[1]` sizes the data attached to each one.

use std::sync::Arc;

use super::contract::{contract_edit, deploying_once, SharedDeployment};
use super::SystemContracts;
use crate::chain::Address;
use crate::errors::{BoxError, WorkloadError};
use crate::template::script::{loop_template, repeated};
use crate::template::{SimpleTemplate, Template};

const ENSURE_HANDLER: &str = "if !signer.storage.check<@TestContract.Handler>(from: TestContract.HandlerStoragePath) {
    let handler <- TestContract.createHandler()

    signer.storage.save(<-handler, to: TestContract.HandlerStoragePath)
    signer.capabilities.storage.issue<auth(FlowTransactionScheduler.Execute) &{FlowTransactionScheduler.TransactionHandler}>(TestContract.HandlerStoragePath)
}

let handlerCap = signer.capabilities.storage
    .getControllers(forPath: TestContract.HandlerStoragePath)[0]
    .capability as! Capability<auth(FlowTransactionScheduler.Execute) &{FlowTransactionScheduler.TransactionHandler}>

let vault = signer.storage.borrow<auth(FungibleToken.Withdraw) &FlowToken.Vault>(from: /storage/flowTokenVault)
    ?? panic(\"Could not borrow FlowToken vault\")
";

const SCHEDULE: &str = "let scheduledTransaction <- FlowTransactionScheduler.schedule(
    handlerCap: handlerCap,
    data: data,
    timestamp: timestamp,
    priority: priority,
    executionEffort: effort,
    fees: <-fees
)
destroy scheduledTransaction
";

/// Body scheduling one transaction paying `fee`; `data` binds the payload
fn schedule_body(fee: &str, data: &str) -> String {
    format!(
        "{ENSURE_HANDLER}\n\
         let fees <- vault.withdraw(amount: {fee}) as! @FlowToken.Vault\n\
         let timestamp = getCurrentBlock().timestamp + 120.0\n\
         let effort: UInt64 = 100\n\
         let priority = FlowTransactionScheduler.Priority.High\n\
         {data}\n\n{SCHEDULE}"
    )
}

fn scheduled_template<F>(
    name: &str,
    label: &str,
    initial: impl Into<crate::dna::Parameters>,
    cardinality: usize,
    deployment: &SharedDeployment,
    body: F,
) -> SimpleTemplate<Address>
where
    F: Fn(&[u64]) -> Result<String, BoxError> + Send + Sync + 'static,
{
    let template = SimpleTemplate::new(name, label, cardinality)
        .with_initial_parameters(initial)
        .with_transaction_edit(move |ctx| {
            let contracts = SystemContracts::for_network(ctx.environment().network())?;
            let mut edit = contract_edit(ctx)?
                .with_import("FlowTransactionScheduler", contracts.transaction_scheduler);
            edit.prepare_block = loop_template(ctx.param(0)?, &body(ctx.parameters())?);
            Ok(edit)
        });
    deploying_once(template, deployment)
}

pub(super) fn templates(deployment: &SharedDeployment) -> Vec<Arc<dyn Template>> {
    vec![
        Arc::new(scheduled_template(
            "scheduled transaction and execute",
            "ST",
            [1],
            1,
            deployment,
            |_| Ok(schedule_body("0.003", "let data: UInt64 = 0")),
        )),
        Arc::new(scheduled_template(
            "scheduled transaction and execute with large data",
            "STLD",
            [1, 1],
            2,
            deployment,
            |p| {
                // p[1] * 100 bytes of payload
                let payload_len = p[1]
                    .checked_mul(100)
                    .ok_or(WorkloadError::LiteralTooLarge { length: u64::MAX })?;
                let payload = repeated("A", payload_len)?;
                Ok(schedule_body("0.11", &format!("let data = \"{payload}\"")))
            },
        )),
        Arc::new(scheduled_template(
            "scheduled transaction and execute with large array",
            "STLA",
            [1, 1],
            2,
            deployment,
            |p| {
                Ok(schedule_body(
                    "0.01",
                    &format!(
                        "let largeArray: [Int] = []\nwhile largeArray.length < {} {{\n    largeArray.append(1)\n}}\nlet data = largeArray",
                        p[1]
                    ),
                ))
            },
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::BuildEnvironment;
    use crate::dna::Parameters;
    use crate::testing::RecordingChain;

    async fn deployed(label: &str) -> (Arc<dyn Template>, BuildEnvironment) {
        let chain = Arc::new(RecordingChain::new(Address::from_u64(0x179b6b1cb6755e31)));
        let env = BuildEnvironment::new("emulator").with_interaction(chain);
        let template = templates(&SharedDeployment::default())
            .into_iter()
            .find(|t| t.label().as_str() == label)
            .unwrap();
        template.ensure_global_setup(&env).await.unwrap();
        (template, env)
    }

    #[tokio::test]
    async fn test_large_data_payload_is_sized_by_second_parameter() {
        let (template, env) = deployed("STLD").await;
        assert_eq!(template.cardinality(), 2);
        assert_eq!(template.initial_parameters(), Parameters::from([1, 1]));

        let edit = template.transaction_edit(&env, &Parameters::from([2, 3])).unwrap();
        assert!(edit.prepare_block.starts_with("var i = 0\nwhile i < 2 {"));
        assert!(edit.prepare_block.contains(&format!("let data = \"{}\"", "A".repeat(300))));
        assert_eq!(
            edit.imports.get("FlowTransactionScheduler"),
            Some(&Address::from_u64(0xf8d6e0586b0a20c7))
        );
        assert_eq!(
            edit.imports.get("TestContract"),
            Some(&Address::from_u64(0x179b6b1cb6755e31))
        );
    }

    #[tokio::test]
    async fn test_scheduled_template_rejects_single_parameter() {
        let (template, env) = deployed("STLA").await;
        let err = template.transaction_edit(&env, &Parameters::from([2])).unwrap_err();
        assert!(err.is_validation_error());
    }

    #[tokio::test]
    async fn test_oversized_payload_fails_generation() {
        let (template, env) = deployed("STLD").await;

        let err = template
            .transaction_edit(&env, &Parameters::from([1, u64::MAX]))
            .unwrap_err();
        match err {
            WorkloadError::GenerationFailed { label, source } => {
                assert_eq!(label.as_str(), "STLD");
                assert!(source.to_string().contains("too large"));
            }
            other => panic!("Expected GenerationFailed, got {other:?}"),
        }
    }
}
