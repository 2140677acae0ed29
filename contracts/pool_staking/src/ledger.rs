//! Ledger adapter over the Soroban token interface.
//!
//! The engine never stores raw asset balances itself. Each asset kind is a
//! separate token contract and every fund movement goes through a [`Ledger`]
//! bound to one of them. Transfers use the client's `try_*` variants so a
//! rejected transfer comes back as an error the engine can roll back from,
//! instead of aborting the whole invocation.

use soroban_sdk::{contracttype, token, Address, Env};

use crate::ContractError;

/// The two independent assets the engine accounts for.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Asset {
    /// Deposited by stakers as principal.
    Stake,
    /// Funded into the reward pool.
    Reward,
}

pub struct Ledger<'a> {
    client: token::Client<'a>,
    engine: Address,
}

impl<'a> Ledger<'a> {
    pub fn new(env: &'a Env, token: &Address) -> Self {
        Self {
            client: token::Client::new(env, token),
            engine: env.current_contract_address(),
        }
    }

    /// Units of this asset held by `account`.
    pub fn balance_of(&self, account: &Address) -> i128 {
        self.client.balance(account)
    }

    /// Units of this asset held by the engine itself.
    pub fn engine_balance(&self) -> i128 {
        self.balance_of(&self.engine)
    }

    /// Outstanding allowance `owner` has granted the engine.
    pub fn authorized(&self, owner: &Address) -> i128 {
        self.client.allowance(owner, &self.engine)
    }

    /// Pull exactly `amount` from `owner` into the engine.
    ///
    /// Requires a prior `approve(owner, engine, >= amount)` on the token.
    /// The token decrements the allowance atomically with the transfer.
    pub fn transfer_in(&self, owner: &Address, amount: i128) -> Result<(), ContractError> {
        if self.authorized(owner) < amount {
            return Err(ContractError::InsufficientAuthorization);
        }
        match self
            .client
            .try_transfer_from(&self.engine, owner, &self.engine, &amount)
        {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }

    /// Push `amount` from the engine to `recipient`.
    pub fn transfer_out(&self, recipient: &Address, amount: i128) -> Result<(), ContractError> {
        match self.client.try_transfer(&self.engine, recipient, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }
}
