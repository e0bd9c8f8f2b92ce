//! `safe-withdraw` command line.
//!
//! Plays both sides of the protocol locally: the payload is chunked into an
//! in-memory host with Merkle proofs, and the handler signs against it.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use zeroize::Zeroizing;

use safe_withdraw::chunks::{ChunkReader, MerkleChunkSource, PayloadHost};
use safe_withdraw::config::{Network, NetworkConfig, WithdrawConfig};
use safe_withdraw::eip712::{Eip712PreImage, SafeTxHasher};
use safe_withdraw::fields::BitcoinScriptDecoder;
use safe_withdraw::handler::{encode_request, WithdrawHandler};
use safe_withdraw::message_signer::{hash_message_digest, WithdrawSignature, SIGNATURE_LEN};
use safe_withdraw::types::WithdrawalRequest;
use safe_withdraw::ui::{ScriptedUi, TerminalUi};
use safe_withdraw::utils::logging::enable_debug;
use safe_withdraw::utils::sanitize::{sanitize_payload, sanitize_seed};
use safe_withdraw::wallet::{parse_bip32_path, BitcoinAddressEncoder, SeedKeyring};

#[derive(Parser)]
#[command(name = "safe-withdraw", version, about = "Sign Safe multisig withdrawals")]
struct Cli {
    /// Deployment whose chain id and type hashes are used
    #[arg(long, global = true, conflicts_with = "config")]
    network: Option<Network>,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Confirm and sign a withdrawal
    Sign(SignArgs),
    /// Print the SafeTx hash pre-image without signing
    Hash(HashArgs),
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct PayloadArgs {
    /// Calldata as hex
    #[arg(long)]
    payload: Option<String>,

    /// File holding the calldata as hex
    #[arg(long, value_name = "FILE")]
    payload_file: Option<PathBuf>,
}

#[derive(Args)]
struct SignArgs {
    #[command(flatten)]
    payload: PayloadArgs,

    /// BIP-32 seed as hex
    #[arg(long, env = "SAFE_WITHDRAW_SEED", hide_env_values = true)]
    seed_hex: String,

    /// Derivation path of the signing key
    #[arg(long, default_value = "m")]
    path: String,

    /// Approve without prompting
    #[arg(long, short)]
    yes: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Hex)]
    format: OutputFormat,
}

#[derive(Args)]
struct HashArgs {
    #[command(flatten)]
    payload: PayloadArgs,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Hex,
    Base64,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashReport {
    data_root: String,
    n_chunks: u64,
    #[serde(flatten)]
    preimage: Eip712PreImage,
    message_digest: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignReport {
    path: String,
    signature: String,
    base64: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        enable_debug();
    }

    let config = load_config(&cli)?;
    match &cli.command {
        Command::Sign(args) => sign(&config, args),
        Command::Hash(args) => hash(&config, args),
    }
}

fn load_config(cli: &Cli) -> Result<WithdrawConfig> {
    match (&cli.config, cli.network) {
        (Some(path), _) => WithdrawConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        (None, network) => Ok(WithdrawConfig::new(NetworkConfig::for_network(
            network.unwrap_or(Network::Mainnet),
        ))),
    }
}

fn read_payload(args: &PayloadArgs) -> Result<Vec<u8>> {
    let text = match (&args.payload, &args.payload_file) {
        (Some(hex), _) => hex.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading payload from {}", path.display()))?,
        (None, None) => bail!("a payload is required"),
    };
    Ok(sanitize_payload(&text)?)
}

fn sign(config: &WithdrawConfig, args: &SignArgs) -> Result<()> {
    let payload = read_payload(&args.payload)?;
    let seed = Zeroizing::new(sanitize_seed(&args.seed_hex)?);
    let path = parse_bip32_path(&args.path).map_err(anyhow::Error::msg)?;

    let bitcoin_network = config.network.bitcoin_network;
    let keys = SeedKeyring::from_seed(&seed, bitcoin_network)?;
    let encoder = BitcoinAddressEncoder::new(bitcoin_network);
    let decoder = BitcoinScriptDecoder::new(bitcoin_network);

    let host = PayloadHost::from_payload(&payload);
    let request = WithdrawalRequest::new(path, host.n_chunks(), host.root());
    let raw = encode_request(&request);
    let mut source = MerkleChunkSource::new(host);

    let handler = WithdrawHandler::new(config, &keys, &encoder, &decoder);
    let response = if args.yes {
        handler.handle(&raw, &mut source, &mut ScriptedUi::approving())
    } else {
        handler.handle(&raw, &mut source, &mut TerminalUi::stdio())
    };

    if !response.is_ok() {
        bail!("withdrawal not signed: {}", response.status);
    }
    let bytes = <[u8; SIGNATURE_LEN]>::try_from(response.data.as_slice())
        .context("signature has unexpected length")?;
    let signature = WithdrawSignature::from_bytes(bytes);

    match args.format {
        OutputFormat::Hex => println!("{}", signature.to_hex()),
        OutputFormat::Base64 => println!("{}", signature.to_base64()),
        OutputFormat::Json => {
            let report = SignReport {
                path: request.path_display(),
                signature: signature.to_hex(),
                base64: signature.to_base64(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn hash(config: &WithdrawConfig, args: &HashArgs) -> Result<()> {
    let payload = read_payload(&args.payload)?;
    let host = PayloadHost::from_payload(&payload);
    let (root, n_chunks) = (host.root(), host.n_chunks());

    let mut source = MerkleChunkSource::new(host);
    let mut reader = ChunkReader::new(&mut source, root, n_chunks);
    let preimage = SafeTxHasher::new(&config.network)
        .compute_preimage(&mut reader)
        .context("hashing payload")?;

    let report = HashReport {
        data_root: hex::encode(root),
        n_chunks,
        message_digest: hex::encode(hash_message_digest(&preimage.final_hash)),
        preimage,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
