// Copyright 2025 Cowboy AI, LLC.

//! Composition of generated fragments into one transaction body
//!
//! Fragments are spliced in DNA order into three regions: top-level
//! declarations, the prepare phase and the execute phase. The target
//! runtime only accepts declarations at the slots the fragments land in, so
//! every prepare/execute block is hosted in a function value assigned to a
//! single slot `f` and invoked right after the assignment:
//!
//! ```text
//! f = fun() {
//!     <fragment>
//! }
//! f()
//! ```
//!
//! The explicit call is what forces fragment `i` to finish before fragment
//! `i + 1` starts.

use std::collections::BTreeMap;

use tracing::debug;

use crate::chain::Address;
use crate::config::BuilderConfig;
use crate::errors::{WorkloadError, WorkloadResult};
use crate::transaction_edit::{TransactionBody, TransactionEdit};

const INDENT_STEP: usize = 4;

/// Re-indent a block of script text
///
/// Tabs become `tab_width` spaces, leading and trailing blank lines are
/// dropped, the common leading indentation of the remaining lines is
/// replaced by `indentation` spaces and a single trailing newline is
/// appended. Whitespace-only lines inside the block are emitted empty and
/// do not count towards the common indentation. A block with no content
/// yields an empty string.
pub fn trim_and_replace_indentation(text: &str, indentation: usize, tab_width: usize) -> String {
    let expanded = text.replace('\t', &" ".repeat(tab_width));
    let lines: Vec<&str> = expanded
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .collect();

    let is_blank = |line: &&str| line.trim().is_empty();
    let Some(first) = lines.iter().position(|line| !is_blank(line)) else {
        return String::new();
    };
    let last = lines
        .iter()
        .rposition(|line| !is_blank(line))
        .unwrap_or(first);
    let lines = &lines[first..=last];

    let min_spaces = lines
        .iter()
        .filter(|line| !is_blank(*line))
        .map(|line| leading_spaces(line))
        .min()
        .unwrap_or(0);

    let prefix = " ".repeat(indentation);
    let mut out = String::with_capacity(expanded.len() + lines.len() * indentation);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !is_blank(line) {
            out.push_str(&prefix);
            out.push_str(&line[min_spaces..]);
        }
    }
    out.push('\n');
    out
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Assembles ordered fragments into a transaction body
#[derive(Debug, Clone)]
pub struct TransactionComposer {
    tab_width: usize,
    block_indentation: usize,
    signer_authorization: String,
}

impl Default for TransactionComposer {
    fn default() -> Self {
        Self::new(&BuilderConfig::default())
    }
}

impl TransactionComposer {
    /// Create a composer from builder configuration
    pub fn new(config: &BuilderConfig) -> Self {
        Self {
            tab_width: config.tab_width,
            block_indentation: config.block_indentation,
            signer_authorization: config.signer_authorization.clone(),
        }
    }

    /// Assemble the fragments, in order, into one transaction body
    ///
    /// Imports of all fragments are merged into a sorted header. Importing
    /// the same name from two different addresses fails.
    pub fn compose<'a, I>(&self, edits: I) -> WorkloadResult<TransactionBody>
    where
        I: IntoIterator<Item = &'a TransactionEdit>,
    {
        let mut imports: BTreeMap<&str, Address> = BTreeMap::new();
        let mut declare = String::new();
        let mut prepare = String::new();
        let mut execute = String::new();
        let mut fragments = 0usize;

        for edit in edits {
            fragments += 1;

            for (name, address) in &edit.imports {
                match imports.get(name.as_str()) {
                    Some(first) if first != address => {
                        return Err(WorkloadError::ImportConflict {
                            name: name.clone(),
                            first: *first,
                            second: *address,
                        });
                    }
                    Some(_) => {}
                    None => {
                        imports.insert(name.as_str(), *address);
                    }
                }
            }

            if !edit.field_declarations.trim().is_empty() {
                declare.push_str(&trim_and_replace_indentation(
                    &edit.field_declarations,
                    INDENT_STEP,
                    self.tab_width,
                ));
            }

            self.push_invocation(&mut prepare, &edit.prepare_block);
            self.push_invocation(&mut execute, &edit.execute_block);
        }

        debug!(
            fragments,
            imports = imports.len(),
            "Composed transaction body"
        );

        let mut body = String::new();
        for (name, address) in &imports {
            if address.is_empty() {
                body.push_str(&format!("import {name}\n"));
            } else {
                body.push_str(&format!("import {name} from {}\n", address.hex_with_prefix()));
            }
        }
        body.push('\n');
        body.push_str("transaction(){\n");
        if !declare.is_empty() {
            body.push_str(&declare);
            body.push('\n');
        }
        body.push_str(&format!(
            "    prepare(signer: {}) {{\n        var f: fun(): Void = fun(){{}}\n{prepare}    }}\n\n",
            self.signer_authorization
        ));
        body.push_str(&format!(
            "    execute {{\n        var f: fun(): Void = fun(){{}}\n{execute}    }}\n}}\n"
        ));

        Ok(TransactionBody::new(body))
    }

    fn push_invocation(&self, region: &mut String, block: &str) {
        if block.trim().is_empty() {
            return;
        }

        let slot = " ".repeat(self.block_indentation.saturating_sub(INDENT_STEP));
        region.push_str(&slot);
        region.push_str("f = fun() {\n");
        region.push_str(&trim_and_replace_indentation(
            block,
            self.block_indentation,
            self.tab_width,
        ));
        region.push_str(&slot);
        region.push_str("}\n");
        region.push_str(&slot);
        region.push_str("f()\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_indentation_keeps_relative_offsets() {
        let out = trim_and_replace_indentation("\n   x = 1\n  y = 2\n\n", 4, 4);
        assert_eq!(out, "     x = 1\n    y = 2\n");

        let out = trim_and_replace_indentation("\n   x = 1\n  y = 2\n\n", 0, 4);
        assert_eq!(out, " x = 1\ny = 2\n");
    }

    #[test]
    fn test_tabs_are_expanded() {
        let out = trim_and_replace_indentation("\t\tif true {\n\t\t\tx()\n\t\t}", 2, 4);
        assert_eq!(out, "  if true {\n      x()\n  }\n");
    }

    #[test]
    fn test_interior_blank_lines_are_emptied() {
        let out = trim_and_replace_indentation("    a\n  \n    b", 8, 4);
        assert_eq!(out, "        a\n\n        b\n");
    }

    #[test]
    fn test_blank_block_yields_nothing() {
        assert_eq!(trim_and_replace_indentation("", 8, 4), "");
        assert_eq!(trim_and_replace_indentation(" \n\t\n", 8, 4), "");
    }

    #[test]
    fn test_crlf_input() {
        let out = trim_and_replace_indentation("\r\n  a\r\n  b\r\n", 1, 4);
        assert_eq!(out, " a\n b\n");
    }

    #[test]
    fn test_blocks_are_wrapped_and_invoked() {
        let composer = TransactionComposer::default();
        let body = composer
            .compose(&[TransactionEdit::prepare("x = 1")])
            .unwrap();

        assert!(body
            .as_str()
            .contains("        f = fun() {\n            x = 1\n        }\n        f()\n"));
    }

    #[test]
    fn test_empty_blocks_add_no_boilerplate() {
        let composer = TransactionComposer::default();
        let empty = composer.compose(std::iter::empty()).unwrap();
        let with_blank = composer
            .compose(&[TransactionEdit::default(), TransactionEdit::execute("  \n ")])
            .unwrap();

        assert_eq!(empty, with_blank);
        assert!(!empty.as_str().contains("f = fun() {"));
    }

    #[test]
    fn test_region_order_follows_fragment_order() {
        let composer = TransactionComposer::default();
        let body = composer
            .compose(&[
                TransactionEdit::prepare("first()"),
                TransactionEdit::execute("in_execute()"),
                TransactionEdit::prepare("second()"),
            ])
            .unwrap();
        let text = body.as_str();

        let first = text.find("first()").unwrap();
        let second = text.find("second()").unwrap();
        let execute = text.find("execute {").unwrap();
        let in_execute = text.find("in_execute()").unwrap();
        assert!(first < second);
        assert!(second < execute);
        assert!(execute < in_execute);
    }

    #[test]
    fn test_imports_are_merged_and_sorted() {
        let composer = TransactionComposer::default();
        let body = composer
            .compose(&[
                TransactionEdit::prepare("a()").with_import("Zeta", Address::from_u64(2)),
                TransactionEdit::prepare("b()")
                    .with_import("Alpha", Address::from_u64(1))
                    .with_import("Zeta", Address::from_u64(2)),
            ])
            .unwrap();

        assert!(body.as_str().starts_with(
            "import Alpha from 0x0000000000000001\nimport Zeta from 0x0000000000000002\n\ntransaction(){\n"
        ));
    }

    #[test]
    fn test_builtin_import_has_no_address() {
        let composer = TransactionComposer::default();
        let body = composer
            .compose(&[TransactionEdit::prepare("a()")
                .with_import("Crypto", Address::EMPTY)
                .with_import("FlowToken", Address::from_u64(0x0ae53cb6e3f42a79))])
            .unwrap();

        assert!(body
            .as_str()
            .starts_with("import Crypto\nimport FlowToken from 0x0ae53cb6e3f42a79\n\n"));
    }

    #[test]
    fn test_conflicting_imports_fail() {
        let composer = TransactionComposer::default();
        let err = composer
            .compose(&[
                TransactionEdit::default().with_import("TestContract", Address::from_u64(1)),
                TransactionEdit::default().with_import("TestContract", Address::from_u64(2)),
            ])
            .unwrap_err();

        match err {
            WorkloadError::ImportConflict { name, first, second } => {
                assert_eq!(name, "TestContract");
                assert_eq!(first, Address::from_u64(1));
                assert_eq!(second, Address::from_u64(2));
            }
            other => panic!("Expected ImportConflict, got {other:?}"),
        }
    }

    #[test]
    fn test_declarations_are_not_wrapped() {
        let composer = TransactionComposer::default();
        let body = composer
            .compose(&[TransactionEdit::default().with_field_declarations("\n\tlet value: UInt64\n")])
            .unwrap();

        assert!(body
            .as_str()
            .contains("transaction(){\n    let value: UInt64\n\n    prepare("));
        assert!(!body.as_str().contains("f = fun()"));
    }
}
