#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::pool::FunderPolicy;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the engine is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub decimals: u32,
    pub funder_policy: FunderPolicy,
    pub timestamp: u64,
}

/// Fired when principal is deposited.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub principal: i128,
    pub total_staked: i128,
    pub timestamp: u64,
}

/// Fired when principal is returned to its owner.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub amount: i128,
    pub principal: i128,
    pub total_staked: i128,
    pub timestamp: u64,
}

/// Fired when reward units are funded into the pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolRewardAddedEvent {
    pub funder: Address,
    pub amount: i128,
    pub total_reward_units: i128,
    pub timestamp: u64,
}

/// Fired when the admin reclaims an undistributed pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolDissolvedEvent {
    pub admin: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunderPolicySetEvent {
    pub policy: FunderPolicy,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunderUpdatedEvent {
    pub funder: Address,
    pub allowed: bool,
    pub timestamp: u64,
}

/// Fired when an admin transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferProposedEvent {
    pub current_admin: Address,
    pub proposed_admin: Address,
    pub timestamp: u64,
}

/// Fired when the proposed admin accepts.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferAcceptedEvent {
    pub old_admin: Address,
    pub new_admin: Address,
    pub timestamp: u64,
}

/// Fired when a pending admin transfer is withdrawn.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferCancelledEvent {
    pub current_admin: Address,
    pub cancelled_admin: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    stake_token: Address,
    reward_token: Address,
    decimals: u32,
    funder_policy: FunderPolicy,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            stake_token,
            reward_token,
            decimals,
            funder_policy,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, amount: i128, principal: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            principal,
            total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    staker: Address,
    amount: i128,
    principal: i128,
    total_staked: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            amount,
            principal,
            total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_reward_added(env: &Env, funder: Address, amount: i128, total_reward_units: i128) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), funder.clone()),
        PoolRewardAddedEvent {
            funder,
            amount,
            total_reward_units,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_pool_dissolved(env: &Env, admin: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("POOL_DSLV"), admin.clone()),
        PoolDissolvedEvent {
            admin,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_funder_policy_set(env: &Env, policy: FunderPolicy) {
    env.events().publish(
        (symbol_short!("FND_POL"),),
        FunderPolicySetEvent {
            policy,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_funder_updated(env: &Env, funder: Address, allowed: bool) {
    let topic = if allowed {
        symbol_short!("FND_ALW")
    } else {
        symbol_short!("FND_RVK")
    };
    env.events().publish(
        (topic, funder.clone()),
        FunderUpdatedEvent {
            funder,
            allowed,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transfer_proposed(env: &Env, current_admin: Address, proposed_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"), current_admin.clone()),
        AdminTransferProposedEvent {
            current_admin,
            proposed_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transfer_accepted(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_ACPT"), new_admin.clone()),
        AdminTransferAcceptedEvent {
            old_admin,
            new_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transfer_cancelled(
    env: &Env,
    current_admin: Address,
    cancelled_admin: Address,
) {
    env.events().publish(
        (symbol_short!("ADM_CNCL"), current_admin.clone()),
        AdminTransferCancelledEvent {
            current_admin,
            cancelled_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}
