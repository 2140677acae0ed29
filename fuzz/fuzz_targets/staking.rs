#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::Address as _,
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};
use pool_staking::{FunderPolicy, StakingContract, StakingContractClient};
use stake_common::DEFAULT_DECIMALS;

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Approve { who: u8, amount: u64 },
    Stake { who: u8, amount: u64 },
    Withdraw { who: u8, amount: u64 },
    AddPoolReward { who: u8, amount: u64 },
    Dissolve,
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &stake_token, &reward_token, &DEFAULT_DECIMALS, &FunderPolicy::Open);

    let mut users = vec![admin.clone()];
    for _ in 0..4 {
        users.push(Address::generate(&env));
    }
    // Everyone holds plenty of both assets; allowances are what the fuzzer drives.
    for user in &users {
        StellarAssetClient::new(&env, &stake_token).mint(user, &(u64::MAX as i128));
        StellarAssetClient::new(&env, &reward_token).mint(user, &(u64::MAX as i128));
    }

    let expiration = env.ledger().sequence() + 10_000;
    for action in actions.into_iter() {
        match action {
            FuzzAction::Approve { who, amount } => {
                let owner = &users[who as usize % users.len()];
                TokenClient::new(&env, &stake_token).approve(owner, &contract_id, &(amount as i128), &expiration);
                TokenClient::new(&env, &reward_token).approve(owner, &contract_id, &(amount as i128), &expiration);
            }
            FuzzAction::Stake { who, amount } => {
                let _ = client.try_stake(&users[who as usize % users.len()], &(amount as i128));
            }
            FuzzAction::Withdraw { who, amount } => {
                let _ = client.try_withdraw(&users[who as usize % users.len()], &(amount as i128));
            }
            FuzzAction::AddPoolReward { who, amount } => {
                let _ = client.try_add_pool_reward(&users[who as usize % users.len()], &(amount as i128));
            }
            FuzzAction::Dissolve => {
                let _ = client.try_dissolve_pool_reward(&admin);
            }
        }

        // Conservation: the table matches the funds actually held.
        let total: i128 = users.iter().map(|u| client.check_balance(u)).sum();
        assert_eq!(total, client.total_staked());
        assert_eq!(TokenClient::new(&env, &stake_token).balance(&contract_id), total);
        assert_eq!(
            TokenClient::new(&env, &reward_token).balance(&contract_id),
            client.total_reward_units()
        );

        // No over-distribution.
        let projected: i128 = users.iter().map(|u| client.expected_reward(u)).sum();
        assert!(projected <= client.total_reward_units());
        assert!(!client.is_locked());
    }
});
