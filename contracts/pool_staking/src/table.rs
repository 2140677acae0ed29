//! Stake accounting table.
//!
//! One persistent row per account with non-zero principal, keyed by
//! `(STK, account)`. An absent row reads as zero and rows are removed when
//! they return to zero. The instance-level total and participant count are
//! kept in step with every row change.

use soroban_sdk::{symbol_short, Address, Env, Symbol};
use stake_common::{TTL_EXTEND_TO, TTL_THRESHOLD};

use crate::ContractError;

const USER_STAKE: Symbol = symbol_short!("STK");
const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");
const USERS: Symbol = symbol_short!("USERS");

fn row_key(account: &Address) -> (Symbol, Address) {
    (USER_STAKE, account.clone())
}

pub fn principal(env: &Env, account: &Address) -> i128 {
    let key = row_key(account);
    let principal: Option<i128> = env.storage().persistent().get(&key);
    match principal {
        Some(principal) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
            principal
        }
        None => 0,
    }
}

pub fn total_staked(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
}

/// Number of accounts currently holding principal.
pub fn users(env: &Env) -> u32 {
    env.storage().instance().get(&USERS).unwrap_or(0)
}

/// Fail with `Overflow` if crediting `amount` would not fit, without writing.
pub fn check_credit(env: &Env, account: &Address, amount: i128) -> Result<(), ContractError> {
    principal(env, account)
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;
    total_staked(env)
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;
    Ok(())
}

/// Increase `account`'s principal. Returns the new principal.
pub fn credit(env: &Env, account: &Address, amount: i128) -> Result<i128, ContractError> {
    let prev = principal(env, account);
    let next = prev.checked_add(amount).ok_or(ContractError::Overflow)?;
    let total = total_staked(env)
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;

    write_row(env, account, next);
    env.storage().instance().set(&TOTAL_STAKED, &total);
    if prev == 0 && next > 0 {
        env.storage().instance().set(&USERS, &users(env).saturating_add(1));
    }
    Ok(next)
}

/// Decrease `account`'s principal. Returns the remaining principal.
///
/// Fails with `InsufficientStake` and leaves the row untouched when
/// `amount` exceeds the current principal.
pub fn debit(env: &Env, account: &Address, amount: i128) -> Result<i128, ContractError> {
    let prev = principal(env, account);
    if amount > prev {
        return Err(ContractError::InsufficientStake);
    }
    let next = prev - amount;
    let total = total_staked(env)
        .checked_sub(amount)
        .ok_or(ContractError::Overflow)?;

    write_row(env, account, next);
    env.storage().instance().set(&TOTAL_STAKED, &total);
    if prev > 0 && next == 0 {
        env.storage().instance().set(&USERS, &users(env).saturating_sub(1));
    }
    Ok(next)
}

fn write_row(env: &Env, account: &Address, principal: i128) {
    let key = row_key(account);
    if principal == 0 {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, &principal);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
