//! Shared utilities and error types for the pool staking contracts.
//!
//! This crate provides:
//! - [`CommonError`]: error codes shared by the engine and off-chain tooling.
//! - [`amount`]: fixed-point parsing of human-entered decimal amounts
//!   (formatting requires the `std` feature).
//! - [`guard`]: the exclusive accounting lock held around state mutations.
//!
//! Contract-specific errors map these codes into their own enums via `From`.

#![cfg_attr(not(feature = "std"), no_std)]

use soroban_sdk::contracterror;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod amount;
pub mod guard;

pub use amount::*;
pub use guard::*;

// ── TTL constants ────────────────────────────────────────────────────────────

/// Remaining-ledger threshold below which persistent entries are extended.
pub const TTL_THRESHOLD: u32 = 5_184_000;
/// Ledger count persistent entries are extended to.
pub const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Error codes shared by every pool staking crate.
///
/// # Code ranges
/// | Range   | Purpose                        |
/// |---------|--------------------------------|
/// | 1 – 9   | Lifecycle / initialisation     |
/// | 10 – 19 | Authentication & authorisation |
/// | 30 – 39 | Validation / input             |
/// | 40 – 49 | Contract state                 |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    // ── Lifecycle (1–9) ──────────────────────────────────────
    /// The contract has not been initialised yet.
    NotInitialized = 1,

    /// The contract has already been initialised.
    AlreadyInitialized = 2,

    // ── Auth (10–19) ─────────────────────────────────────────
    /// The caller lacks the required role or permission.
    AccessDenied = 10,

    // ── Validation (30–39) ───────────────────────────────────
    /// An amount is malformed, negative, zero, or has more fractional
    /// digits than the configured scale.
    InvalidAmount = 30,

    /// An amount does not fit in the 128-bit base-unit representation.
    AmountOverflow = 31,

    // ── Contract state (40–49) ───────────────────────────────
    /// The accounting lock is already held by an in-flight mutation.
    Locked = 41,
}
