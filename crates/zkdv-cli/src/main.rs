//! # zkdv CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// zkDataVault toolchain.
///
/// Converts snarkjs proofs, public inputs and verification keys into the
/// byte layouts the settlement ledger verifies, and previews settlements.
#[derive(Parser, Debug)]
#[command(name = "zkdv", version, about)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Convert snarkjs proof.json to proof bytes.
    Proof(zkdv_cli::artifact::ProofArgs),
    /// Convert snarkjs public.json to public-input bytes.
    Inputs(zkdv_cli::artifact::InputsArgs),
    /// Prepare a verification key from verification_key.json.
    Vk(zkdv_cli::artifact::VkArgs),
    /// Decode wire bytes back to snarkjs JSON.
    Decode(zkdv_cli::artifact::DecodeArgs),
    /// Preview how a purchase settles.
    Settle(zkdv_cli::settle::SettleArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so hex and JSON on stdout stay pipeable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    match cli.command {
        Commands::Proof(args) => args.run(),
        Commands::Inputs(args) => args.run(),
        Commands::Vk(args) => args.run(),
        Commands::Decode(args) => args.run(),
        Commands::Settle(args) => args.run(),
    }
}
