//! Reward pool and pro-rata distribution.
//!
//! The pool is a single counter of reward units funded into the engine and
//! not yet paid out. Per-account rewards are never stored: they are projected
//! from the counter and the stake table on every read.
//!
//! ```text
//! expected_reward(a) = floor(total_reward_units × principal(a) / total_staked)
//! ```
//!
//! The product is computed in 256 bits, and integer division truncates, so
//! the sum of all projections never exceeds `total_reward_units`.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, I256};
use stake_common::{TTL_EXTEND_TO, TTL_THRESHOLD};

use crate::ContractError;

const REWARD_UNITS: Symbol = symbol_short!("RWD_UNIT");
const FUNDER_POLICY: Symbol = symbol_short!("FND_POL");
const FUNDER: Symbol = symbol_short!("FUNDER");

/// Basis-point denominator for [`share_bps`].
pub const BPS: i128 = 10_000;

/// Who may call `add_pool_reward`.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FunderPolicy {
    /// Any account may fund the pool.
    Open,
    /// Only the admin may fund the pool.
    AdminOnly,
    /// The admin and explicitly allowed funders.
    Allowlist,
}

// ── Pool balance ─────────────────────────────────────────────────────────────

pub fn total_units(env: &Env) -> i128 {
    env.storage().instance().get(&REWARD_UNITS).unwrap_or(0)
}

pub fn set_total_units(env: &Env, units: i128) {
    env.storage().instance().set(&REWARD_UNITS, &units);
}

/// Fail with `Overflow` if funding `amount` would not fit, without writing.
pub fn check_fund(env: &Env, amount: i128) -> Result<(), ContractError> {
    total_units(env)
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;
    Ok(())
}

/// Add `amount` to the pool. Returns the new pool size.
pub fn fund(env: &Env, amount: i128) -> Result<i128, ContractError> {
    let units = total_units(env)
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;
    set_total_units(env, units);
    Ok(units)
}

/// Empty the pool. Returns what it held.
pub fn drain(env: &Env) -> i128 {
    let units = total_units(env);
    set_total_units(env, 0);
    units
}

// ── Distribution ─────────────────────────────────────────────────────────────

/// `floor(a × b / c)` without intermediate overflow. Zero when `c <= 0`.
fn mul_div(env: &Env, a: i128, b: i128, c: i128) -> i128 {
    if a <= 0 || b <= 0 || c <= 0 {
        return 0;
    }
    I256::from_i128(env, a)
        .mul(&I256::from_i128(env, b))
        .div(&I256::from_i128(env, c))
        .to_i128()
        .unwrap_or(0)
}

/// Pro-rata share of `pool_units` for an account holding `principal` out of
/// `total_staked`.
pub fn expected_reward(env: &Env, pool_units: i128, principal: i128, total_staked: i128) -> i128 {
    mul_div(env, pool_units, principal, total_staked)
}

/// The account's share of total stake in basis points, truncated.
pub fn share_bps(env: &Env, principal: i128, total_staked: i128) -> u32 {
    // principal <= total_staked keeps this within 0..=10_000
    mul_div(env, principal, BPS, total_staked) as u32
}

// ── Funder policy ────────────────────────────────────────────────────────────

pub fn policy(env: &Env) -> FunderPolicy {
    env.storage()
        .instance()
        .get(&FUNDER_POLICY)
        .unwrap_or(FunderPolicy::Open)
}

pub fn set_policy(env: &Env, policy: &FunderPolicy) {
    env.storage().instance().set(&FUNDER_POLICY, policy);
}

fn funder_key(funder: &Address) -> (Symbol, Address) {
    (FUNDER, funder.clone())
}

pub fn allow_funder(env: &Env, funder: &Address) {
    let key = funder_key(funder);
    env.storage().persistent().set(&key, &true);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn revoke_funder(env: &Env, funder: &Address) {
    env.storage().persistent().remove(&funder_key(funder));
}

pub fn is_allowed(env: &Env, funder: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&funder_key(funder))
        .unwrap_or(false)
}

/// Whether `funder` may add to the pool under the current policy.
pub fn may_fund(env: &Env, funder: &Address, admin: &Address) -> bool {
    match policy(env) {
        FunderPolicy::Open => true,
        FunderPolicy::AdminOnly => funder == admin,
        FunderPolicy::Allowlist => funder == admin || is_allowed(env, funder),
    }
}
