#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! State-machine properties over random stake / withdraw / fund sequences.
//!
//! Invariants tested:
//! - Sum of principal equals stake units moved in minus units moved out,
//!   equals `total_staked`, equals the engine's stake-token balance
//! - Sum of `expected_reward` never exceeds `total_reward_units`
//! - A withdraw above principal fails with `InsufficientStake` and changes nothing
//! - `users` equals the number of accounts with non-zero principal

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::Address;
use pool_staking::{ContractError, FunderPolicy};

use crate::common::{approve, balance, mint, setup_test_env, TestContext};

const ACCOUNTS: usize = 3;

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Stake {
        who: u8,
        #[proptest(strategy = "1i128..=10_000")]
        amount: i128,
    },
    Withdraw {
        who: u8,
        #[proptest(strategy = "1i128..=12_000")]
        amount: i128,
    },
    Fund {
        #[proptest(strategy = "1i128..=5_000")]
        amount: i128,
    },
}

struct Model {
    principal: [i128; ACCOUNTS],
    moved_in: i128,
    moved_out: i128,
    pool: i128,
}

fn apply(ctx: &TestContext, accounts: &[Address], model: &mut Model, op: &Op) -> Result<(), TestCaseError> {
    match *op {
        Op::Stake { who, amount } => {
            let i = who as usize % ACCOUNTS;
            mint(ctx, &ctx.stake_token, &accounts[i], amount);
            approve(ctx, &ctx.stake_token, &accounts[i], amount);
            let principal = ctx.client.stake(&accounts[i], &amount);
            model.principal[i] += amount;
            model.moved_in += amount;
            prop_assert_eq!(principal, model.principal[i]);
        }
        Op::Withdraw { who, amount } => {
            let i = who as usize % ACCOUNTS;
            let result = ctx.client.try_withdraw(&accounts[i], &amount);
            if amount > model.principal[i] {
                match result {
                    Err(Ok(e)) => prop_assert_eq!(e, ContractError::InsufficientStake),
                    _ => prop_assert!(false, "withdraw above principal must fail"),
                }
            } else {
                prop_assert!(result.is_ok());
                model.principal[i] -= amount;
                model.moved_out += amount;
            }
        }
        Op::Fund { amount } => {
            mint(ctx, &ctx.reward_token, &ctx.admin, amount);
            approve(ctx, &ctx.reward_token, &ctx.admin, amount);
            ctx.client.add_pool_reward(&ctx.admin, &amount);
            model.pool += amount;
        }
    }
    Ok(())
}

fn check_invariants(ctx: &TestContext, accounts: &[Address], model: &Model) -> Result<(), TestCaseError> {
    let mut sum_principal = 0i128;
    let mut sum_rewards = 0i128;
    let mut holders = 0u32;
    for (i, account) in accounts.iter().enumerate() {
        let principal = ctx.client.check_balance(account);
        prop_assert_eq!(principal, model.principal[i]);
        sum_principal += principal;
        sum_rewards += ctx.client.expected_reward(account);
        if principal > 0 {
            holders += 1;
        }
    }

    let total = ctx.client.total_staked();
    prop_assert_eq!(sum_principal, total);
    prop_assert_eq!(total, model.moved_in - model.moved_out);
    prop_assert_eq!(balance(ctx, &ctx.stake_token, &ctx.client.address), total);

    prop_assert_eq!(ctx.client.total_reward_units(), model.pool);
    prop_assert!(sum_rewards <= model.pool, "over-distribution: {} > {}", sum_rewards, model.pool);

    prop_assert_eq!(ctx.client.users(), holders);
    prop_assert!(ctx.client.is_solvent());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_accounting_is_conserved(ops in prop::collection::vec(any::<Op>(), 1..24)) {
        let ctx = setup_test_env(FunderPolicy::Open);
        let accounts: Vec<Address> = (0..ACCOUNTS).map(|_| Address::generate(&ctx.env)).collect();
        let mut model = Model {
            principal: [0; ACCOUNTS],
            moved_in: 0,
            moved_out: 0,
            pool: 0,
        };

        for op in &ops {
            apply(&ctx, &accounts, &mut model, op)?;
            check_invariants(&ctx, &accounts, &model)?;
        }
    }

    /// A failed over-withdraw never partially decrements.
    #[test]
    fn prop_over_withdraw_is_rejected_whole(staked in 1i128..=1_000_000, excess in 1i128..=1_000) {
        let ctx = setup_test_env(FunderPolicy::Open);
        let staker = Address::generate(&ctx.env);
        mint(&ctx, &ctx.stake_token, &staker, staked);
        approve(&ctx, &ctx.stake_token, &staker, staked);
        ctx.client.stake(&staker, &staked);

        let result = ctx.client.try_withdraw(&staker, &(staked + excess));

        match result {
            Err(Ok(e)) => prop_assert_eq!(e, ContractError::InsufficientStake),
            _ => prop_assert!(false, "Expected InsufficientStake error"),
        }
        prop_assert_eq!(ctx.client.check_balance(&staker), staked);
        prop_assert_eq!(balance(&ctx, &ctx.stake_token, &staker), 0);
    }
}
