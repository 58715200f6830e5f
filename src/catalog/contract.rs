// Copyright 2025 Cowboy AI, LLC.

//! Contract templates
//!
//! These templates call into `TestContract`. Every contract and scheduled
//! template of one catalog shares a single deployment: the first global
//! setup deploys the contract and the others reuse its address, which
//! becomes the import of every generated fragment.

use std::sync::Arc;

use anyhow::Context as _;
use futures::FutureExt;
use tokio::sync::OnceCell;

use super::SystemContracts;
use crate::chain::{deploy_contract, Address, BuildEnvironment};
use crate::errors::BoxError;
use crate::template::script::{loop_template, string_dict_of_len};
use crate::template::{EditContext, SimpleTemplate, Template};
use crate::transaction_edit::TransactionEdit;

/// Name the test contract is deployed under
pub const TEST_CONTRACT_NAME: &str = "TestContract";

const SCHEDULER_IMPORT: &str = r#"import "FlowTransactionScheduler""#;

/// Source of the contract exercised by contract and scheduled templates
///
/// The scheduler import is resolved to the network's address at deployment.
pub const TEST_CONTRACT: &str = r#"import "FlowTransactionScheduler"

access(all) contract TestContract {

    access(all) let HandlerStoragePath: StoragePath

    access(all) event SomeEvent()
    access(all) event DictEvent(dict: {String: String})
    access(all) event HandlerExecuted(id: UInt64)

    access(all) var totalSupply: UInt64

    access(all) resource NFT {
        access(all) let id: UInt64

        init(id: UInt64) {
            self.id = id
        }
    }

    access(all) resource Handler: FlowTransactionScheduler.TransactionHandler {
        access(FlowTransactionScheduler.Execute)
        fun executeTransaction(id: UInt64, data: AnyStruct?) {
            emit HandlerExecuted(id: id)
        }
    }

    access(all) fun createHandler(): @Handler {
        return <- create Handler()
    }

    access(all) fun empty() {}

    access(all) fun emitEvent() {
        emit SomeEvent()
    }

    access(all) fun emitDictEvent(_ dict: {String: String}) {
        emit DictEvent(dict: dict)
    }

    access(all) fun mintNFT() {
        self.totalSupply = self.totalSupply + 1
        let nft <- create NFT(id: self.totalSupply)
        destroy nft
    }

    init() {
        self.HandlerStoragePath = /storage/TestContractHandler
        self.totalSupply = 0
    }
}
"#;

/// Address of the one [`TEST_CONTRACT`] deployment shared across templates
pub(super) type SharedDeployment = Arc<OnceCell<Address>>;

/// Deploy [`TEST_CONTRACT`] with its imports resolved for the environment's network
pub(super) async fn deploy_test_contract(env: &BuildEnvironment) -> anyhow::Result<Address> {
    let contracts = SystemContracts::for_network(env.network())?;
    let code = TEST_CONTRACT.replace(
        SCHEDULER_IMPORT,
        &format!(
            "import FlowTransactionScheduler from {}",
            contracts.transaction_scheduler
        ),
    );

    deploy_contract(env, TEST_CONTRACT_NAME, &code)
        .await
        .with_context(|| format!("deploying {TEST_CONTRACT_NAME} on {}", env.network()))
}

/// Fragment importing the token contracts and the deployed test contract
pub(super) fn contract_edit(ctx: &EditContext<'_, Address>) -> Result<TransactionEdit, BoxError> {
    let contract_address = *ctx.setup()?;
    let contracts = SystemContracts::for_network(ctx.environment().network())?;
    Ok(contracts
        .with_token_imports(TransactionEdit::default())
        .with_import(TEST_CONTRACT_NAME, contract_address))
}

/// Give the template a global setup that joins the shared deployment
pub(super) fn deploying_once(
    template: SimpleTemplate<Address>,
    deployment: &SharedDeployment,
) -> SimpleTemplate<Address> {
    let deployment = deployment.clone();
    template.with_global_setup(move |env| {
        let deployment = deployment.clone();
        async move {
            let address = deployment
                .get_or_try_init(|| deploy_test_contract(env))
                .await?;
            Ok::<_, BoxError>(*address)
        }
        .boxed()
    })
}

fn contract_template<F>(
    name: &str,
    label: &str,
    initial: u64,
    deployment: &SharedDeployment,
    prepare_block: F,
) -> SimpleTemplate<Address>
where
    F: Fn(u64) -> Result<String, BoxError> + Send + Sync + 'static,
{
    let template = SimpleTemplate::new(name, label, 1)
        .with_initial_parameters([initial])
        .with_transaction_edit(move |ctx| {
            let mut edit = contract_edit(ctx)?;
            edit.prepare_block = prepare_block(ctx.param(0)?)?;
            Ok(edit)
        });
    deploying_once(template, deployment)
}

pub(super) fn templates(deployment: &SharedDeployment) -> Vec<Arc<dyn Template>> {
    vec![
        Arc::new(contract_template(
            "call empty contract function",
            "CEC",
            1144,
            deployment,
            |n| Ok(loop_template(n, "TestContract.empty()")),
        )),
        Arc::new(contract_template("emit event", "CEE", 799, deployment, |n| {
            Ok(loop_template(n, "TestContract.emitEvent()"))
        })),
        Arc::new(contract_template("mint NFT", "CMNFT", 157, deployment, |n| {
            Ok(loop_template(n, "TestContract.mintNFT()"))
        })),
        Arc::new(contract_template(
            "emit event with string",
            "CEES",
            960,
            deployment,
            |n| {
                Ok(format!(
                    "let dict: {{String: String}} = {}\nTestContract.emitDictEvent(dict)\n",
                    string_dict_of_len(n, 50)?
                ))
            },
        )),
    ]
}
