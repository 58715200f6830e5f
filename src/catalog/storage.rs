// Copyright 2025 Cowboy AI, LLC.

//! Storage templates
//!
//! Each template reads a collection from the signer's storage. The account
//! setup writes that collection first, sized by `p[0]`, replacing whatever a
//! previous run left behind so it can be repeated safely.

use std::sync::Arc;

use futures::FutureExt;

use crate::chain::run_transaction_body_as_account;
use crate::errors::{BoxError, WorkloadResult};
use crate::template::script::{string_array_of_len, string_dict_of_len};
use crate::template::{SimpleTemplate, Template};
use crate::transaction_edit::TransactionEdit;

const SUM_ARRAY_LENGTHS: &str = "var i = 0
var lenSum = 0
while (i < strings.length) {
    lenSum = lenSum + strings[i].length
    i = i + 1
}
";

const SUM_DICT_LENGTHS: &str = "var lenSum = 0
strings.forEachKey(fun (key: String): Bool {
    lenSum = lenSum + strings[key]!.length
    return true
})
";

/// Template whose prepare block is fixed and whose setup is sized by `p[0]`
fn with_storage_setup(
    name: &str,
    label: &str,
    initial: u64,
    prepare_block: String,
    setup_body: fn(u64) -> WorkloadResult<String>,
) -> SimpleTemplate {
    SimpleTemplate::new(name, label, 1)
        .with_initial_parameters([initial])
        .with_transaction_edit(move |_| Ok(TransactionEdit::prepare(prepare_block.clone())))
        .with_account_setup(move |env, account, parameters| {
            async move {
                let body = setup_body(parameters.get_param(0)?)?;
                run_transaction_body_as_account(env, &body, account).await?;
                Ok::<(), BoxError>(())
            }
            .boxed()
        })
}

fn save_string_array(path: &str, clear: &[&str], literal: String) -> String {
    let mut body = String::new();
    for cleared in clear {
        body.push_str(&format!("signer.storage.load<[String]>(from: /storage/{cleared})\n"));
    }
    body.push_str(&format!("let strings: [String] = {literal}\n"));
    body.push_str(&format!("signer.storage.save<[String]>(strings, to: /storage/{path})\n"));
    body
}

fn save_string_dict(path: &str, clear: &[&str], literal: String) -> String {
    let mut body = String::new();
    for cleared in clear {
        body.push_str(&format!(
            "signer.storage.load<{{String: String}}>(from: /storage/{cleared})\n"
        ));
    }
    body.push_str(&format!("let strings: {{String: String}} = {literal}\n"));
    body.push_str(&format!(
        "signer.storage.save<{{String: String}}>(strings, to: /storage/{path})\n"
    ));
    body
}

fn borrow_string() -> SimpleTemplate {
    with_storage_setup(
        "borrow string",
        "ABrSt",
        1326,
        format!(
            "let strings = signer.storage.borrow<&[String]>(from: /storage/ABrSt)!\n{SUM_ARRAY_LENGTHS}"
        ),
        |len| Ok(save_string_array("ABrSt", &["ABrSt"], string_array_of_len(20, len)?)),
    )
}

fn copy_string() -> SimpleTemplate {
    with_storage_setup(
        "copy string",
        "ACpSt",
        1352,
        format!(
            "let strings = signer.storage.copy<[String]>(from: /storage/ACpSt)!\n{SUM_ARRAY_LENGTHS}"
        ),
        |len| Ok(save_string_array("ACpSt", &["ACpSt"], string_array_of_len(20, len)?)),
    )
}

fn copy_string_and_save() -> SimpleTemplate {
    with_storage_setup(
        "copy string and save a duplicate",
        "ACpStSv",
        1223,
        format!(
            "let strings = signer.storage.copy<[String]>(from: /storage/ACpStSv)!\n{SUM_ARRAY_LENGTHS}signer.storage.save(strings, to: /storage/ACpStSv2)\n"
        ),
        |len| {
            Ok(save_string_array(
                "ACpStSv",
                &["ACpStSv", "ACpStSv2"],
                string_array_of_len(20, len)?,
            ))
        },
    )
}

fn load_and_destroy_dict_string() -> SimpleTemplate {
    with_storage_setup(
        "store load and destroy dict string",
        "ALdDStD",
        3324,
        r#"
            let strings = signer.storage.load<{String: String}>(from: /storage/ALdDStD)!
            for key in strings.keys {
                strings.remove(key: key)
            }
        "#
        .to_string(),
        |len| Ok(save_string_dict("ALdDStD", &["ALdDStD"], string_dict_of_len(100, len)?)),
    )
}

fn borrow_dict_string() -> SimpleTemplate {
    with_storage_setup(
        "borrow dict string",
        "ABrDSt",
        206,
        format!(
            "let strings = signer.storage.borrow<&{{String: String}}>(from: /storage/ABrDSt)!\n{SUM_DICT_LENGTHS}"
        ),
        |len| Ok(save_string_dict("ABrDSt", &["ABrDSt"], string_dict_of_len(len, 100)?)),
    )
}

fn copy_dict_string() -> SimpleTemplate {
    with_storage_setup(
        "copy dict string",
        "ACpDSt",
        813,
        format!(
            "let strings = signer.storage.copy<{{String: String}}>(from: /storage/ACpDSt)!\n{SUM_DICT_LENGTHS}"
        ),
        |len| Ok(save_string_dict("ACpDSt", &["ACpDSt"], string_dict_of_len(30, len)?)),
    )
}

fn copy_dict_string_and_save() -> SimpleTemplate {
    with_storage_setup(
        "copy string dict and save a duplicate",
        "ACpDStSv",
        1179,
        format!(
            "let strings = signer.storage.copy<{{String: String}}>(from: /storage/ACpDStSv)!\n{SUM_DICT_LENGTHS}signer.storage.save(strings, to: /storage/ACpDStSv2)\n"
        ),
        |len| {
            Ok(save_string_dict(
                "ACpDStSv",
                &["ACpDStSv", "ACpDStSv2"],
                string_dict_of_len(20, len)?,
            ))
        },
    )
}

/// The setup stores a dictionary of `p[0]` empty resource dictionaries
fn destroy_dict() -> SimpleTemplate {
    with_storage_setup(
        "load dict and destroy it",
        "DestDict",
        967,
        "let r <- signer.storage.load<@{String: AnyResource}>(from: /storage/DestDict)!\ndestroy r\n"
            .to_string(),
        |len| {
            Ok(format!(
                "let r <- signer.storage.load<@{{String: AnyResource}}>(from: /storage/DestDict)\n\
                 destroy r\n\
                 let r2: @{{String: AnyResource}} <- {{}}\n\
                 var i = 0\n\
                 while (i < {len}) {{\n\
                 \x20   i = i + 1\n\
                 \x20   let d: @{{String: AnyResource}} <- {{}}\n\
                 \x20   r2[i.toString()] <-! d\n\
                 }}\n\
                 signer.storage.save<@{{String: AnyResource}}>(<-r2, to: /storage/DestDict)\n"
            ))
        },
    )
}

/// Store then load a dictionary; the setup only clears leftovers
fn store_and_load_dict_string() -> SimpleTemplate {
    SimpleTemplate::new("store and load dict string", "AStDSt", 1)
        .with_initial_parameters([786])
        .with_transaction_edit(|ctx| {
            let dict = string_dict_of_len(ctx.param(0)?, 75)?;
            Ok(TransactionEdit::prepare(format!(
                "signer.storage.save<{{String: String}}>({dict}, to: /storage/AStDSt)\n\
                 signer.storage.load<{{String: String}}>(from: /storage/AStDSt)\n"
            )))
        })
        .with_account_setup(|env, account, _| {
            async move {
                run_transaction_body_as_account(
                    env,
                    "signer.storage.load<{String: String}>(from: /storage/AStDSt)",
                    account,
                )
                .await?;
                Ok::<(), BoxError>(())
            }
            .boxed()
        })
}

pub(super) fn templates() -> Vec<Arc<dyn Template>> {
    vec![
        Arc::new(borrow_string()),
        Arc::new(copy_string()),
        Arc::new(copy_string_and_save()),
        Arc::new(store_and_load_dict_string()),
        Arc::new(load_and_destroy_dict_string()),
        Arc::new(borrow_dict_string()),
        Arc::new(copy_dict_string()),
        Arc::new(copy_dict_string_and_save()),
        Arc::new(destroy_dict()),
    ]
}
