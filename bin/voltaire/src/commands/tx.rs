//! Commands operating on raw transactions.

use crate::commands::parse_hex;
use clap::{Args, Parser};
use eyre::{bail, WrapErr};
use tracing::{debug, info};
use voltaire_config::CodecConfig;
use voltaire_primitives::{Address, TransactionSigned};

/// A raw transaction given on the command line.
#[derive(Debug, Args)]
pub(crate) struct RawTransaction {
    /// The transaction as hex, in its enveloped form (`eth_sendRawTransaction`).
    #[arg(value_name = "HEX")]
    raw: String,
}

impl RawTransaction {
    /// Decodes the transaction, applying the configured size and chain id limits and the
    /// stateless validity rules.
    pub(crate) fn decode(&self, codec: &CodecConfig) -> eyre::Result<TransactionSigned> {
        let bytes = parse_hex(&self.raw)?;
        codec.check_size(bytes.len())?;

        let tx = match codec.chain_id {
            Some(chain_id) => TransactionSigned::decode_enveloped_for_chain(&bytes, chain_id),
            None => TransactionSigned::decode_enveloped(&bytes),
        }
        .wrap_err("Could not decode transaction")?;
        tx.validate().wrap_err_with(|| format!("Invalid transaction {}", tx.hash()))?;

        debug!(target: "voltaire::cli", hash = %tx.hash(), tx_type = %tx.tx_type(), len = bytes.len(), "Decoded transaction");
        Ok(tx)
    }
}

/// `voltaire decode` command
#[derive(Debug, Parser)]
pub(crate) struct DecodeCommand {
    #[command(flatten)]
    tx: RawTransaction,
}

impl DecodeCommand {
    /// Execute `decode` command
    pub(crate) fn execute(self, codec: &CodecConfig) -> eyre::Result<()> {
        let tx = self.tx.decode(codec)?;
        println!("{}", serde_json::to_string_pretty(&tx)?);
        Ok(())
    }
}

/// `voltaire signing-hash` command
#[derive(Debug, Parser)]
pub(crate) struct SigningHashCommand {
    #[command(flatten)]
    tx: RawTransaction,
}

impl SigningHashCommand {
    /// Execute `signing-hash` command
    pub(crate) fn execute(self, codec: &CodecConfig) -> eyre::Result<()> {
        let tx = self.tx.decode(codec)?;
        println!("{}", tx.signature_hash());
        Ok(())
    }
}

/// `voltaire recover` command
#[derive(Debug, Parser)]
pub(crate) struct RecoverCommand {
    #[command(flatten)]
    tx: RawTransaction,

    /// Accept signatures with a high `s` value (pre EIP-2).
    #[arg(long)]
    unchecked: bool,
}

impl RecoverCommand {
    /// Execute `recover` command
    pub(crate) fn execute(self, codec: &CodecConfig) -> eyre::Result<()> {
        let tx = self.tx.decode(codec)?;
        let signer =
            if self.unchecked { tx.recover_signer_unchecked() } else { tx.recover_signer() };
        match signer {
            Some(signer) => println!("{signer}"),
            None => bail!("Could not recover a signer for transaction {}", tx.hash()),
        }
        Ok(())
    }
}

/// `voltaire verify` command
#[derive(Debug, Parser)]
pub(crate) struct VerifyCommand {
    #[command(flatten)]
    tx: RawTransaction,

    /// The address the transaction claims to be signed by.
    #[arg(long, value_name = "ADDRESS")]
    sender: Address,
}

impl VerifyCommand {
    /// Execute `verify` command
    pub(crate) fn execute(self, codec: &CodecConfig) -> eyre::Result<()> {
        let tx = self.tx.decode(codec)?;
        let valid = tx.verify_signature(self.sender);
        info!(target: "voltaire::cli", hash = %tx.hash(), sender = %self.sender, valid, "Verified signature");

        if !valid && codec.require_sender_match {
            bail!("Transaction {} was not signed by {}", tx.hash(), self.sender)
        }
        println!("{valid}");
        Ok(())
    }
}
