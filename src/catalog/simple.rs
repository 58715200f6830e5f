// Copyright 2025 Cowboy AI, LLC.

//! Loop templates: one statement repeated `p[0]` times inside the prepare block

use std::sync::Arc;

use futures::FutureExt;

use super::SystemContracts;
use crate::chain::{run_transaction_body_as_account, Address};
use crate::errors::BoxError;
use crate::template::script::{loop_template, string_of_len};
use crate::template::{SimpleTemplate, Template};
use crate::transaction_edit::TransactionEdit;

const CREATE_ACCOUNT_WITH_CONTRACT: &str = r#"
    let acct = Account(payer: signer)
    acct.contracts.add(name: "EmptyContract", code: "61636365737328616c6c2920636f6e747261637420456d707479436f6e7472616374207b7d".decodeHex())
"#;

const TRANSFER_TO_SELF: &str = r#"
    let vaultRef = signer.storage.borrow<auth(FungibleToken.Withdraw) &FlowToken.Vault>(from: /storage/flowTokenVault)!
    let receiverRef = getAccount(signer.address)
        .capabilities.borrow<&{FungibleToken.Receiver}>(/public/flowTokenReceiver)!
    receiverRef.deposit(from: <-vaultRef.withdraw(amount: 0.00001))
"#;

const BORROW_RECEIVER: &str = r#"
    let receiverRef = getAccount(signer.address)
        .capabilities.borrow<&{FungibleToken.Receiver}>(/public/flowTokenReceiver)!
"#;

const ADD_KEY: &str = r#"
    let key = PublicKey(
        publicKey: "f7901e9161b9b53f2e1f27b0f1e4711fcc8f234a90f55fd2068a67b152948389c0ee1e40f74a0e194ef7c2b59666270b16d52cf585fd8e65fc00958f78af77b0".decodeHex(),
        signatureAlgorithm: SignatureAlgorithm.ECDSA_secp256k1
    )

    signer.keys.add(
        publicKey: key,
        hashAlgorithm: HashAlgorithm.SHA3_256,
        weight: 0.0
    )
"#;

const ADD_AND_REVOKE_KEY: &str = r#"
    let key = PublicKey(
        publicKey: "f7901e9161b9b53f2e1f27b0f1e4711fcc8f234a90f55fd2068a67b152948389c0ee1e40f74a0e194ef7c2b59666270b16d52cf585fd8e65fc00958f78af77b0".decodeHex(),
        signatureAlgorithm: SignatureAlgorithm.ECDSA_secp256k1
    )

    let ac = signer.keys.add(
        publicKey: key,
        hashAlgorithm: HashAlgorithm.SHA3_256,
        weight: 0.0
    )
    signer.keys.revoke(keyIndex: ac.keyIndex)
"#;

// tops the signer up to 20 contracts
const DEPLOY_CONTRACTS: &str = r#"
var c = signer.contracts.names.length
while c < 20 {
    let contractName = "TestContract".concat(c.toString())
    let contractCode = "access(all) contract ".concat(contractName).concat(" {}")
    signer.contracts.add(name: contractName, code: contractCode.utf8)
    c = c + 1
}
"#;

const DECODE_HEX: &str = r#""f847b84000fb479cb398ab7e31d6f048c12ec5b5b679052589280cacde421af823f93fe927dfc3d1e371b172f97ceeac1bc235f60654184c83f4ea70dd3b7785ffb3c73802038203e8".decodeHex()"#;

/// (name, label, initial loop length, loop body)
const LOOPS: &[(&str, &str, u64, &str)] = &[
    ("empty loop", "EL", 5397, ""),
    ("assert true", "Assert", 2657, "assert(true)"),
    ("get signer address", "GSA", 3590, "signer.address"),
    ("get signer public account", "GSAcc", 2627, "getAccount(signer.address)"),
    ("get signer account balance", "GSAccBal", 27, "signer.balance"),
    (
        "get signer account available balance",
        "GSAccAwBal",
        24,
        "signer.availableBalance",
    ),
    ("get signer account storage used", "GSAccSU", 670, "signer.storage.used"),
    ("get signer account storage capacity", "GSAccSC", 26, "signer.storage.capacity"),
    (
        "borrow signer account FlowToken.Vault",
        "BFTV",
        719,
        "let vaultRef = signer.storage.borrow<auth(FungibleToken.Withdraw) &FlowToken.Vault>(from: /storage/flowTokenVault)!",
    ),
    ("borrow signer account FungibleToken.Receiver", "BFR", 393, BORROW_RECEIVER),
    ("transfer tokens to self", "TTS", 26, TRANSFER_TO_SELF),
    ("create new account", "CA", 7, "let acct = Account(payer: signer)"),
    ("create new account with contract", "CAWC", 5, CREATE_ACCOUNT_WITH_CONTRACT),
    ("decode hex", "HEX", 811, DECODE_HEX),
    ("revertible random", "RR", 1958, "revertibleRandom<UInt64>(modulo: UInt64(100))"),
    ("number to string conversion", "TS", 2627, "i.toString()"),
    ("concatenate string", "CS", 2092, "\"x\".concat(i.toString())"),
    ("add key to account", "KA", 49, ADD_KEY),
    ("add and revoke key to account", "KAR", 38, ADD_AND_REVOKE_KEY),
    ("get account key", "KGet", 177, "let key = signer.keys.get(keyIndex: 0)"),
    ("Get Current Block", "GCB", 1107, "getCurrentBlock()"),
    (
        "Get Block At",
        "GBA",
        548,
        "let at = getCurrentBlock().height\ngetBlock(at: at)",
    ),
    (
        "Destroy Resource Dictionary",
        "DRD",
        1058,
        "let r: @{String: AnyResource} <- {}\ndestroy r",
    ),
    ("Parse UFix64", "PUFix", 2032, r#"let smol: UFix64? = UFix64.fromString("0.123456")"#),
    ("Parse Fix64", "PFix", 2047, r#"let smol: Fix64? = Fix64.fromString("-0.123456")"#),
    ("Parse UInt64", "PUInt64", 2578, r#"let smol: UInt64? = UInt64.fromString("123456")"#),
    ("Parse Int64", "PInt64", 2417, r#"let smol: Int64? = Int64.fromString("-123456")"#),
    ("Parse Int", "PInt", 2460, r#"let smol: Int? = Int.fromString("-12345")"#),
    (
        "Issue storage capability",
        "ISCap",
        182,
        "let cap = signer.capabilities.storage.issue<&Int>(/storage/foo)",
    ),
    ("Get key count", "GKC", 677, "let count = signer.keys.count"),
];

/// Template repeating `body` with the token contracts imported
pub(super) fn loop_with_token_imports(
    name: &str,
    label: &str,
    initial_loop_length: u64,
    body: &'static str,
) -> SimpleTemplate {
    SimpleTemplate::new(name, label, 1)
        .with_initial_parameters([initial_loop_length])
        .with_transaction_edit(move |ctx| {
            let contracts = SystemContracts::for_network(ctx.environment().network())?;
            let edit = TransactionEdit::prepare(loop_template(ctx.param(0)?, body));
            Ok(contracts.with_token_imports(edit))
        })
}

/// Read the contract names `p[0]` times; the setup deploys the contracts
fn get_contracts() -> SimpleTemplate {
    SimpleTemplate::new("Get contracts", "GetCon", 1)
        .with_initial_parameters([65])
        .with_transaction_edit(|ctx| {
            Ok(TransactionEdit::prepare(loop_template(
                ctx.param(0)?,
                "signer.contracts.names",
            )))
        })
        .with_account_setup(|env, account, _| {
            async move {
                run_transaction_body_as_account(env, DEPLOY_CONTRACTS, account).await?;
                Ok::<(), BoxError>(())
            }
            .boxed()
        })
}

fn hash() -> SimpleTemplate {
    SimpleTemplate::new("hash", "H", 1)
        .with_initial_parameters([328])
        .with_transaction_edit(|ctx| {
            let body = format!(
                "Crypto.hash(\"{}\".utf8, algorithm: HashAlgorithm.SHA2_256)",
                string_of_len(20)?
            );
            Ok(TransactionEdit::prepare(loop_template(ctx.param(0)?, &body))
                .with_import("Crypto", Address::EMPTY))
        })
}

/// Lower-case a `p[0]` character string 500 times
fn string_to_lower() -> SimpleTemplate {
    SimpleTemplate::new("String toLower", "STL", 1)
        .with_initial_parameters([5221])
        .with_transaction_edit(|ctx| {
            let body = format!(
                "var s = \"{}\"\ns = s.toLower()",
                string_of_len(ctx.param(0)?)?
            );
            Ok(TransactionEdit::prepare(loop_template(500, &body)))
        })
}

pub(super) fn templates() -> Vec<Arc<dyn Template>> {
    let mut templates: Vec<Arc<dyn Template>> = LOOPS
        .iter()
        .map(|&(name, label, initial, body)| {
            Arc::new(loop_with_token_imports(name, label, initial, body)) as Arc<dyn Template>
        })
        .collect();
    templates.push(Arc::new(get_contracts()));
    templates.push(Arc::new(hash()));
    templates.push(Arc::new(string_to_lower()));
    templates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::BuildEnvironment;
    use crate::dna::Parameters;

    #[test]
    fn test_loop_template_edit() {
        let template = loop_with_token_imports("assert true", "Assert", 2657, "assert(true)");
        let edit = template
            .transaction_edit(&BuildEnvironment::new("emulator"), &Parameters::from([2]))
            .unwrap();

        assert_eq!(
            edit.prepare_block,
            "var i = 0\nwhile i < 2 {\n    i = i + 1\n    assert(true)\n}\n"
        );
        assert_eq!(edit.imports.len(), 2);
        assert!(edit.imports.contains_key("FlowToken"));
    }

    #[test]
    fn test_unknown_network_fails_generation() {
        let template = loop_with_token_imports("empty loop", "EL", 1, "");
        let err = template
            .transaction_edit(&BuildEnvironment::new("localnet"), &Parameters::from([1]))
            .unwrap_err();
        assert_eq!(err.label().map(|l| l.as_str()), Some("EL"));
    }

    #[test]
    fn test_initial_loop_lengths() {
        let templates = templates();
        let empty_loop = templates.iter().find(|t| t.label().as_str() == "EL").unwrap();
        assert_eq!(empty_loop.initial_parameters(), Parameters::from([5397]));
        assert_eq!(templates.len(), 33);
    }

    #[test]
    fn test_hash_imports_builtin_crypto() {
        let edit = hash()
            .transaction_edit(&BuildEnvironment::new("emulator"), &Parameters::from([1]))
            .unwrap();
        assert_eq!(edit.imports.get("Crypto"), Some(&Address::EMPTY));
        assert!(edit
            .prepare_block
            .contains(r#"Crypto.hash("xxxxxxxxxxxxxxxxxxxx".utf8, algorithm: HashAlgorithm.SHA2_256)"#));
    }

    #[test]
    fn test_string_to_lower_sizes_string_by_parameter() {
        let edit = string_to_lower()
            .transaction_edit(&BuildEnvironment::new("emulator"), &Parameters::from([3]))
            .unwrap();
        assert_eq!(
            edit.prepare_block,
            "var i = 0\nwhile i < 500 {\n    i = i + 1\n    var s = \"xxx\"\n    s = s.toLower()\n}\n"
        );

        let err = string_to_lower()
            .transaction_edit(&BuildEnvironment::new("emulator"), &Parameters::from([u64::MAX]))
            .unwrap_err();
        assert_eq!(err.label().map(|l| l.as_str()), Some("STL"));
    }

    #[tokio::test]
    async fn test_get_contracts_setup_deploys_as_account() {
        let chain = Arc::new(crate::testing::RecordingChain::new(Address::from_u64(1)));
        let env = BuildEnvironment::new("emulator").with_interaction(chain.clone());
        let account = crate::testing::TestAccount::new(Address::from_u64(5));

        get_contracts()
            .account_setup(&env, &account, &Parameters::from([65]))
            .await
            .unwrap();

        let sent = chain.sent();
        assert_eq!(sent[0].authorizer, Address::from_u64(5));
        assert!(sent[0].body.as_str().contains("while c < 20 {"));
    }
}
