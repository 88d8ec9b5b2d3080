//! # zkdv-cli — zkDataVault Command-Line Interface
//!
//! Turns prover output into the bytes the settlement ledger consumes, and
//! previews how a purchase would settle under a configuration.
//!
//! ## Subcommands
//!
//! - `proof`: snarkjs `proof.json` to the 256-byte wire format, or the
//!   128-byte compressed form
//! - `inputs`: snarkjs `public.json` to little-endian scalar bytes
//! - `vk`: snarkjs `verification_key.json` to prepared key bytes
//! - `decode`: wire bytes back to snarkjs JSON
//! - `settle`: fee split, royalty and refund for a price and payment
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; conversions and arithmetic are delegated
//!   to `zkdv-zkp` and `zkdv-ledger`.
//! - Binary output is hex on stdout unless `--out` names a file.

pub mod artifact;
pub mod output;
pub mod settle;
