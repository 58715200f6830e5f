// Copyright 2025 Cowboy AI, LLC.

//! Array and dictionary templates
//!
//! Each template builds a collection in a local variable, grows it `p[0]`
//! times in a loop and optionally post-processes it.

use std::sync::Arc;

use crate::template::script::{checked_size, loop_template};
use crate::template::{SimpleTemplate, Template};
use crate::transaction_edit::TransactionEdit;

const MAP_ADD_ONE: &str = "let addOne =
    fun (_ v: Int): Int {
        return v+1
    }
let y = x.map(addOne)
";

const FILTER_EVEN: &str = "let isEven =
    view fun (element: Int): Bool {
        return element % 2 == 0
    }
let y = x.filter(isEven)
";

const COPY_BY_KEY: &str = "x.forEachKey(fun (key: String): Bool {
    y[key] = x[key]
    return true
})
";

struct CollectionLoop {
    name: &'static str,
    label: &'static str,
    initial: u64,
    before: &'static str,
    body: &'static str,
    after: &'static str,
}

const COLLECTION_LOOPS: &[CollectionLoop] = &[
    CollectionLoop {
        name: "Array Insert",
        label: "ArrIns",
        initial: 1577,
        before: "let x = [0]\n",
        body: "x.insert(at: i, 1)",
        after: "",
    },
    CollectionLoop {
        name: "Array Insert Remove",
        label: "ArrInsDel",
        initial: 1232,
        before: "let x = [0]\n",
        body: "x.insert(at: 0, 1)\nx.remove(at: 1)",
        after: "",
    },
    CollectionLoop {
        name: "Array Insert Set Remove",
        label: "ArrInsSetDel",
        initial: 994,
        before: "let x = [0]\n",
        body: "x.insert(at: 0, 1)\nx[0] = i\nx.remove(at: 1)",
        after: "",
    },
    CollectionLoop {
        name: "Array Insert Map",
        label: "ArrInsMap",
        initial: 1345,
        before: "let x = [0]\n",
        body: "x.insert(at: 0, i)",
        after: MAP_ADD_ONE,
    },
    CollectionLoop {
        name: "Array Insert Filter",
        label: "ArrInsFilt",
        initial: 1356,
        before: "let x = [0]\n",
        body: "x.insert(at: 0, i)",
        after: FILTER_EVEN,
    },
    CollectionLoop {
        name: "Array Append",
        label: "ArrApp",
        initial: 1905,
        before: "let x = [0]\n",
        body: "x.append(i)",
        after: "",
    },
    CollectionLoop {
        name: "Dict Insert",
        label: "DictIns",
        initial: 1598,
        before: "let x = {\"0\": 0}\n",
        body: "x.insert(key: i.toString(), i)",
        after: "",
    },
    CollectionLoop {
        name: "Dict Insert Remove",
        label: "DictInsDel",
        initial: 713,
        before: "let x = {\"0\": 0}\n",
        body: "x.insert(key: i.toString(), i)\nx.remove(key: (i-1).toString())",
        after: "",
    },
    CollectionLoop {
        name: "Dict Insert Set Remove",
        label: "DictInsSetDel",
        initial: 565,
        before: "let x = {\"0\": 0}\n",
        body: "x.insert(key: i.toString(), i)\nx[(i-1).toString()] = i\nx.remove(key: (i-1).toString())",
        after: "",
    },
    CollectionLoop {
        name: "Dict Iter Copy",
        label: "DictItrCpy",
        initial: 667,
        before: "let x = {\"0\": 0}\nlet y = {\"0\": 0}\n",
        body: "x.insert(key: i.toString(), i)",
        after: COPY_BY_KEY,
    },
];

impl CollectionLoop {
    fn template(&self) -> SimpleTemplate {
        let (before, body, after) = (self.before, self.body, self.after);
        SimpleTemplate::new(self.name, self.label, 1)
            .with_initial_parameters([self.initial])
            .with_transaction_edit(move |ctx| {
                Ok(TransactionEdit::prepare(format!(
                    "{before}{}{after}",
                    loop_template(ctx.param(0)?, body)
                )))
            })
    }
}

/// Array literal of `p[0] + 1` integers created 200 times
fn array_create_batch() -> SimpleTemplate {
    SimpleTemplate::new("Array Create Batch", "ArrCB", 1)
        .with_initial_parameters([226])
        .with_transaction_edit(|ctx| {
            let len = ctx.param(0)?;
            // a comma and at most 20 digits per element
            checked_size(len, 21)?;

            let mut elements = String::from("0");
            for i in 0..len {
                elements.push_str(&format!(",{i}"));
            }
            Ok(TransactionEdit::prepare(loop_template(
                200,
                &format!("let a = [{elements}]"),
            )))
        })
}

pub(super) fn templates() -> Vec<Arc<dyn Template>> {
    let mut templates: Vec<Arc<dyn Template>> = COLLECTION_LOOPS
        .iter()
        .map(|entry| Arc::new(entry.template()) as Arc<dyn Template>)
        .collect();
    templates.push(Arc::new(array_create_batch()));
    templates
}
