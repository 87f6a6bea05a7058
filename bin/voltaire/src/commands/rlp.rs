//! `voltaire rlp` command

use crate::commands::parse_hex;
use clap::Parser;
use std::fmt::Write;
use voltaire_primitives::hex;
use voltaire_rlp::RlpItem;

/// `voltaire rlp` command
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Any RLP encoded value as hex.
    #[arg(value_name = "HEX")]
    raw: String,
}

impl Command {
    /// Execute `rlp` command
    pub(crate) fn execute(self) -> eyre::Result<()> {
        let bytes = parse_hex(&self.raw)?;
        let item = RlpItem::decode_exact(&bytes)?;
        print!("{}", render(&item));
        Ok(())
    }
}

/// Renders `item` as an indented tree, one item per line.
fn render(item: &RlpItem) -> String {
    let mut out = String::new();
    render_into(item, 0, &mut out);
    out
}

fn render_into(item: &RlpItem, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match item {
        RlpItem::Bytes(bytes) => {
            let _ = writeln!(out, "{indent}0x{} ({} bytes)", hex::encode(bytes), bytes.len());
        }
        RlpItem::List(items) => {
            let _ = writeln!(out, "{indent}list ({} items)", items.len());
            for item in items {
                render_into(item, depth + 1, out);
            }
        }
    }
}
