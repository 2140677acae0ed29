#![no_std]

pub mod events;
pub mod ledger;
pub mod pool;
pub mod table;

use soroban_sdk::{contract, contractimpl, contracttype, log, symbol_short, Address, Env, String, Symbol};
use stake_common::{guard, CommonError, MAX_DECIMALS};

pub use ledger::Asset;
pub use pool::FunderPolicy;

use ledger::Ledger;

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");
const INITIALIZED: Symbol = symbol_short!("INIT");
const STAKE_TOKEN: Symbol = symbol_short!("STK_TOK");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const DECIMALS: Symbol = symbol_short!("DECIMALS");

/// Longest decimal string `parse_amount` will read.
const MAX_AMOUNT_LEN: usize = 80;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientAuthorization = 5,
    TransferFailed = 6,
    InsufficientStake = 7,
    TokensIdentical = 8,
    Locked = 9,
    StakersRemain = 10,
    EmptyPool = 11,
    Overflow = 12,
}

impl From<CommonError> for ContractError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::NotInitialized => ContractError::NotInitialized,
            CommonError::AlreadyInitialized => ContractError::AlreadyInitialized,
            CommonError::AccessDenied => ContractError::Unauthorized,
            CommonError::InvalidAmount => ContractError::InvalidAmount,
            CommonError::AmountOverflow => ContractError::Overflow,
            CommonError::Locked => ContractError::Locked,
        }
    }
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Snapshot of an account's position returned by `staker_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerInfo {
    pub principal: i128,
    pub expected_reward: i128,
    /// Share of total stake in basis points.
    pub share_bps: u32,
}

/// Configuration captured at `initialize`, plus the live funder policy.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakingConfig {
    pub stake_token: Address,
    pub reward_token: Address,
    pub decimals: u32,
    pub funder_policy: FunderPolicy,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingContract;

#[contractimpl]
impl StakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the engine.
    ///
    /// * `stake_token`   – token contract users deposit as principal.
    /// * `reward_token`  – token contract funded into the reward pool.
    /// * `decimals`      – fixed-point scale of human-entered amounts.
    /// * `funder_policy` – who may call `add_pool_reward`.
    pub fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        reward_token: Address,
        decimals: u32,
        funder_policy: FunderPolicy,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if stake_token == reward_token {
            return Err(ContractError::TokensIdentical);
        }
        if decimals > MAX_DECIMALS {
            return Err(ContractError::InvalidAmount);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&STAKE_TOKEN, &stake_token);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&DECIMALS, &decimals);
        pool::set_policy(&env, &funder_policy);
        // Stake table, pool units and the lock start empty; absent keys read
        // as zero / unlocked.

        events::publish_initialized(
            &env,
            admin,
            stake_token,
            reward_token,
            decimals,
            funder_policy,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake units from `staker`.
    ///
    /// The staker must first `approve` the engine for at least `amount` on
    /// the stake token. Funds are pulled before the table is touched, so a
    /// rejected transfer leaves no accounting trace. Returns the new principal.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::require_positive(amount)?;
        Self::require_unlocked(&env)?;

        // 1. Refuse up front anything the table could not absorb.
        table::check_credit(&env, &staker, amount)?;

        // 2. Pull the tokens (allowance is consumed by the token contract).
        Self::ledger(&env, Asset::Stake)?.transfer_in(&staker, amount)?;

        // 3. Record the deposit.
        let principal = guard::with_lock(&env, || table::credit(&env, &staker, amount))?;

        events::publish_staked(&env, staker, amount, principal, table::total_staked(&env));

        Ok(principal)
    }

    /// Return `amount` stake units to `staker`.
    ///
    /// Principal is decremented before the outward transfer, so nothing can
    /// observe the pre-withdraw balance while funds are in flight. If the
    /// transfer fails the decrement is reversed and the error is returned.
    /// Never touches the reward pool. Returns the remaining principal.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::require_positive(amount)?;

        let ledger = Self::ledger(&env, Asset::Stake)?;

        // 1. Effects: debit under the lock.
        let principal = guard::with_lock(&env, || table::debit(&env, &staker, amount))?;

        // 2. Interaction: lock released, push the tokens out.
        if let Err(err) = ledger.transfer_out(&staker, amount) {
            // 3. Compensate: restore the exact pre-call principal.
            guard::with_lock(&env, || table::credit(&env, &staker, amount))?;
            log!(&env, "withdraw rolled back: staker={}, amount={}", staker, amount);
            return Err(err);
        }

        events::publish_withdrawn(&env, staker, amount, principal, table::total_staked(&env));

        Ok(principal)
    }

    // ── Reward pool ─────────────────────────────────────────────────────────

    /// Fund the reward pool with `amount` reward units from `funder`.
    ///
    /// The funder must first `approve` the engine on the reward token, and
    /// must be permitted by the configured [`FunderPolicy`]. Returns the new
    /// pool size.
    pub fn add_pool_reward(env: Env, funder: Address, amount: i128) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        funder.require_auth();
        Self::require_positive(amount)?;
        Self::require_unlocked(&env)?;

        let admin = Self::load_admin(&env)?;
        if !pool::may_fund(&env, &funder, &admin) {
            return Err(ContractError::Unauthorized);
        }
        pool::check_fund(&env, amount)?;

        Self::ledger(&env, Asset::Reward)?.transfer_in(&funder, amount)?;

        let units = guard::with_lock(&env, || pool::fund(&env, amount))?;

        events::publish_pool_reward_added(&env, funder, amount, units);

        Ok(units)
    }

    /// Reclaim every undistributed reward unit once nobody is staked.
    ///
    /// Fails with `StakersRemain` while any principal is deposited and with
    /// `EmptyPool` when there is nothing to reclaim. Returns the amount sent
    /// to the admin.
    pub fn dissolve_pool_reward(env: Env, admin: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        admin.require_auth();
        Self::require_admin(&env, &admin)?;

        if table::total_staked(&env) > 0 {
            return Err(ContractError::StakersRemain);
        }

        let ledger = Self::ledger(&env, Asset::Reward)?;
        let units = guard::with_lock(&env, || Ok::<_, ContractError>(pool::drain(&env)))?;
        if units == 0 {
            return Err(ContractError::EmptyPool);
        }

        if let Err(err) = ledger.transfer_out(&admin, units) {
            guard::with_lock(&env, || pool::fund(&env, units))?;
            log!(&env, "dissolve rolled back: admin={}, units={}", admin, units);
            return Err(err);
        }

        events::publish_pool_dissolved(&env, admin, units);

        Ok(units)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Principal currently deposited by `account` (0 if none).
    pub fn check_balance(env: Env, account: Address) -> i128 {
        table::principal(&env, &account)
    }

    /// Pro-rata share of the pool for `account`, recomputed on every call.
    ///
    /// `floor(total_reward_units × principal / total_staked)`, or 0 when
    /// nothing is staked. Reading never claims or mutates anything.
    pub fn expected_reward(env: Env, account: Address) -> i128 {
        pool::expected_reward(
            &env,
            pool::total_units(&env),
            table::principal(&env, &account),
            table::total_staked(&env),
        )
    }

    /// Return the combined position for an account in one call.
    pub fn staker_info(env: Env, account: Address) -> StakerInfo {
        let principal = table::principal(&env, &account);
        let total_staked = table::total_staked(&env);

        StakerInfo {
            principal,
            expected_reward: pool::expected_reward(
                &env,
                pool::total_units(&env),
                principal,
                total_staked,
            ),
            share_bps: pool::share_bps(&env, principal, total_staked),
        }
    }

    /// Sum of all principal.
    pub fn total_staked(env: Env) -> i128 {
        table::total_staked(&env)
    }

    /// Reward units funded and not yet paid out.
    pub fn total_reward_units(env: Env) -> i128 {
        pool::total_units(&env)
    }

    /// Number of accounts with non-zero principal.
    pub fn users(env: Env) -> u32 {
        table::users(&env)
    }

    /// Allowance `owner` has granted the engine on `asset`.
    pub fn authorized_amount(env: Env, owner: Address, asset: Asset) -> i128 {
        match Self::ledger(&env, asset) {
            Ok(ledger) => ledger.authorized(&owner),
            Err(_) => 0,
        }
    }

    /// Whether the engine's token balances cover its accounting tables.
    pub fn is_solvent(env: Env) -> Result<bool, ContractError> {
        let stake_held = Self::ledger(&env, Asset::Stake)?.engine_balance();
        let reward_held = Self::ledger(&env, Asset::Reward)?.engine_balance();

        Ok(stake_held >= table::total_staked(&env) && reward_held >= pool::total_units(&env))
    }

    /// Convert a human decimal string ("12.5") into base units using the
    /// configured scale.
    pub fn parse_amount(env: Env, text: String) -> Result<i128, ContractError> {
        let decimals = Self::decimals(&env)?;

        let len = text.len() as usize;
        if len == 0 || len > MAX_AMOUNT_LEN {
            return Err(ContractError::InvalidAmount);
        }
        let mut buf = [0u8; MAX_AMOUNT_LEN];
        let bytes = &mut buf[..len];
        text.copy_into_slice(bytes);
        let text = core::str::from_utf8(bytes).map_err(|_| ContractError::InvalidAmount)?;

        Ok(stake_common::parse_units(text, decimals)?)
    }

    pub fn config(env: Env) -> Result<StakingConfig, ContractError> {
        Ok(StakingConfig {
            stake_token: Self::token_address(&env, Asset::Stake)?,
            reward_token: Self::token_address(&env, Asset::Reward)?,
            decimals: Self::decimals(&env)?,
            funder_policy: pool::policy(&env),
        })
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn is_locked(env: Env) -> bool {
        guard::is_locked(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        Self::load_admin(&env)
    }

    // ── Funder policy ───────────────────────────────────────────────────────

    pub fn set_funder_policy(
        env: Env,
        admin: Address,
        policy: FunderPolicy,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        admin.require_auth();
        Self::require_admin(&env, &admin)?;

        pool::set_policy(&env, &policy);

        events::publish_funder_policy_set(&env, policy);

        Ok(())
    }

    /// Permit `funder` under [`FunderPolicy::Allowlist`].
    pub fn allow_funder(env: Env, admin: Address, funder: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        admin.require_auth();
        Self::require_admin(&env, &admin)?;

        pool::allow_funder(&env, &funder);

        events::publish_funder_updated(&env, funder, true);

        Ok(())
    }

    pub fn revoke_funder(env: Env, admin: Address, funder: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        admin.require_auth();
        Self::require_admin(&env, &admin)?;

        pool::revoke_funder(&env, &funder);

        events::publish_funder_updated(&env, funder, false);

        Ok(())
    }

    pub fn is_funder_allowed(env: Env, funder: Address) -> bool {
        pool::is_allowed(&env, &funder)
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Propose a new admin address. Only the current admin can call this.
    /// The new admin must call `accept_admin` to complete the transfer.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        env.storage().instance().set(&PENDING_ADMIN, &new_admin);

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    /// Accept the pending admin transfer. Only the proposed admin can call this.
    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_admin.require_auth();

        Self::require_pending_admin(&env, &new_admin)?;

        let old_admin = Self::load_admin(&env)?;
        env.storage().instance().set(&ADMIN, &new_admin);
        env.storage().instance().remove(&PENDING_ADMIN);

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    /// Cancel a pending admin transfer. Only the current admin can call this.
    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        let pending = Self::pending_admin(&env).ok_or(ContractError::Unauthorized)?;
        env.storage().instance().remove(&PENDING_ADMIN);

        events::publish_admin_transfer_cancelled(&env, current_admin, pending);

        Ok(())
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        Self::pending_admin(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_positive(amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        Ok(())
    }

    /// Fail fast when another mutation holds the accounting lock.
    fn require_unlocked(env: &Env) -> Result<(), ContractError> {
        if guard::is_locked(env) {
            return Err(ContractError::Locked);
        }
        Ok(())
    }

    fn load_admin(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        if *caller != Self::load_admin(env)? {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn pending_admin(env: &Env) -> Option<Address> {
        env.storage().instance().get(&PENDING_ADMIN)
    }

    /// `caller` must be the address named by the last `propose_admin`.
    fn require_pending_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        match Self::pending_admin(env) {
            Some(pending) if pending == *caller => Ok(()),
            _ => Err(ContractError::Unauthorized),
        }
    }

    fn decimals(env: &Env) -> Result<u32, ContractError> {
        env.storage()
            .instance()
            .get(&DECIMALS)
            .ok_or(ContractError::NotInitialized)
    }

    fn token_address(env: &Env, asset: Asset) -> Result<Address, ContractError> {
        let key = match asset {
            Asset::Stake => STAKE_TOKEN,
            Asset::Reward => REWARD_TOKEN,
        };
        env.storage()
            .instance()
            .get(&key)
            .ok_or(ContractError::NotInitialized)
    }

    fn ledger(env: &Env, asset: Asset) -> Result<Ledger<'_>, ContractError> {
        Ok(Ledger::new(env, &Self::token_address(env, asset)?))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
