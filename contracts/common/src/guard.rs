//! # Accounting lock
//!
//! A single exclusive flag in instance storage. Mutating entry points take it
//! for the duration of an accounting update and release it before calling out
//! to a token contract; rollback paths take it again. Any call that finds the
//! flag set fails with [`CommonError::Locked`] before touching state.
//!
//! ```ignore
//! guard::acquire(&env)?;
//! table::debit(&env, &staker, amount)?;
//! guard::release(&env);
//! ledger.transfer_out(&staker, amount)?;
//! ```

use soroban_sdk::{symbol_short, Env, Symbol};

use crate::CommonError;

const LOCK: Symbol = symbol_short!("LOCK");

/// Take the lock, or fail if another mutation holds it.
pub fn acquire(env: &Env) -> Result<(), CommonError> {
    if is_locked(env) {
        return Err(CommonError::Locked);
    }
    env.storage().instance().set(&LOCK, &true);
    Ok(())
}

/// Drop the lock. Releasing an unheld lock is a no-op.
pub fn release(env: &Env) {
    env.storage().instance().remove(&LOCK);
}

pub fn is_locked(env: &Env) -> bool {
    env.storage().instance().get(&LOCK).unwrap_or(false)
}

/// Run `f` while holding the lock, releasing it whatever `f` returns.
pub fn with_lock<T, E, F>(env: &Env, f: F) -> Result<T, E>
where
    E: From<CommonError>,
    F: FnOnce() -> Result<T, E>,
{
    acquire(env)?;
    let result = f();
    release(env);
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────
