#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, contracttype, token, Address, Env, Vec};

pub mod price_feed;

use price_feed::PriceFeedClient;


// ── Data Types ──────────────────────────────────────────────────────────────

/// Minimum accepted payment, denominated in USD scaled to 7 decimal places
/// (Stellar token precision): 50 USD.
pub const MINIMUM_USD: i128 = 50_0000000;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 1,
    /// The USD value of the payment is below [`MINIMUM_USD`].
    InsufficientPayment = 2,
    /// The caller is not the owner.
    NotAuthorized = 3,
    /// Moving the held balance to the owner did not complete.
    TransferFailed = 4,
    /// Funder index at or past the end of the funder list.
    IndexOutOfRange = 5,
}

#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// The address allowed to withdraw the held balance.
    Owner,
    /// The payment token (the native asset's Stellar Asset Contract).
    Token,
    /// The USD price oracle consulted by `fund`.
    PriceFeed,
    /// Running total funded by an address in the current cycle.
    AmountFunded(Address),
    /// Insertion-ordered list of addresses with a positive recorded balance.
    Funders,
}

// ── Contract ────────────────────────────────────────────────────────────────

#[contract]
pub struct FundMeContract;

/// USD value of `amount` units of the payment token, at the price feed's
/// latest answer. The answer prices one whole token and carries the feed's
/// own decimal scale, so the token's 7-decimal scale passes through.
fn usd_value(env: &Env, amount: i128) -> i128 {
    let feed_address: Address = env.storage().instance().get(&DataKey::PriceFeed).unwrap();
    let feed = PriceFeedClient::new(env, &feed_address);
    let round = feed.latest_round_data();
    amount * round.answer / 10i128.pow(feed.decimals())
}

fn read_funders(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::Funders)
        .unwrap_or_else(|| Vec::new(env))
}

#[contractimpl]
impl FundMeContract {
    /// Initializes the funding ledger.
    ///
    /// # Arguments
    /// * `owner`      – The only address allowed to withdraw; fixed for the
    ///                  life of the contract.
    /// * `token`      – The payment token contract address.
    /// * `price_feed` – The USD price oracle contract address.
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        price_feed: Address,
    ) -> Result<(), ContractError> {
        // Prevent re-initialization.
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(ContractError::AlreadyInitialized);
        }

        owner.require_auth();

        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::PriceFeed, &price_feed);

        let empty_funders: Vec<Address> = Vec::new(&env);
        env.storage().instance().set(&DataKey::Funders, &empty_funders);

        Ok(())
    }

    /// Pay `amount` of the token into the ledger.
    ///
    /// The funder must authorize the call. The payment's USD value, computed
    /// from the price feed's latest answer, must meet [`MINIMUM_USD`];
    /// otherwise the call fails with `InsufficientPayment` and nothing is
    /// recorded or transferred.
    pub fn fund(env: Env, funder: Address, amount: i128) -> Result<(), ContractError> {
        funder.require_auth();

        if usd_value(&env, amount) < MINIMUM_USD {
            return Err(ContractError::InsufficientPayment);
        }

        let token_address: Address = env.storage().instance().get(&DataKey::Token).unwrap();
        let token_client = token::Client::new(&env, &token_address);

        // Move the payment from the funder to this contract.
        token_client.transfer(&funder, &env.current_contract_address(), &amount);

        // Update the funder's running total.
        let prev: i128 = env
            .storage()
            .instance()
            .get(&DataKey::AmountFunded(funder.clone()))
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::AmountFunded(funder.clone()), &(prev + amount));

        // Track the funder address if new.
        let mut funders = read_funders(&env);
        if !funders.contains(&funder) {
            funders.push_back(funder.clone());
            env.storage().instance().set(&DataKey::Funders, &funders);
        }

        env.events().publish(("fund_me", "funded"), (funder, amount));

        Ok(())
    }

    /// Withdraw the entire held balance to the owner and reset the ledger.
    ///
    /// Only the owner may call this; anyone else fails with `NotAuthorized`
    /// before any funds move. On an empty ledger this transfers zero and
    /// leaves the (already empty) funder list as is.
    pub fn withdraw(env: Env, caller: Address) -> Result<(), ContractError> {
        caller.require_auth();

        let owner: Address = env.storage().instance().get(&DataKey::Owner).unwrap();
        if caller != owner {
            return Err(ContractError::NotAuthorized);
        }

        let token_address: Address = env.storage().instance().get(&DataKey::Token).unwrap();
        let token_client = token::Client::new(&env, &token_address);
        let held = token_client.balance(&env.current_contract_address());

        // Move the funds first; the ledger is only reset once the transfer
        // has succeeded. A contract error here also rolls the invocation
        // back, so the call is all-or-nothing either way.
        if token_client
            .try_transfer(&env.current_contract_address(), &owner, &held)
            .is_err()
        {
            return Err(ContractError::TransferFailed);
        }

        // Zero every recorded balance and clear the funder list.
        let funders = read_funders(&env);
        for funder in funders.iter() {
            env.storage()
                .instance()
                .remove(&DataKey::AmountFunded(funder));
        }
        let empty_funders: Vec<Address> = Vec::new(&env);
        env.storage().instance().set(&DataKey::Funders, &empty_funders);

        env.events().publish(("fund_me", "withdrawn"), (owner, held));

        Ok(())
    }

    // ── View helpers ────────────────────────────────────────────────────

    /// Returns the price feed contract address.
    pub fn get_price_feed(env: Env) -> Address {
        env.storage().instance().get(&DataKey::PriceFeed).unwrap()
    }

    /// Returns the owner address.
    pub fn get_owner(env: Env) -> Address {
        env.storage().instance().get(&DataKey::Owner).unwrap()
    }

    /// Returns the payment token contract address.
    pub fn get_token(env: Env) -> Address {
        env.storage().instance().get(&DataKey::Token).unwrap()
    }

    /// Returns the amount funded by `funder` in the current cycle, or 0 if
    /// the address has never funded (or has been reset by a withdrawal).
    pub fn get_address_to_amount_funded(env: Env, funder: Address) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::AmountFunded(funder))
            .unwrap_or(0)
    }

    /// Returns the funder at `index` in funding order.
    pub fn get_funder(env: Env, index: u32) -> Result<Address, ContractError> {
        read_funders(&env)
            .get(index)
            .ok_or(ContractError::IndexOutOfRange)
    }

    /// Returns the number of distinct funders in the current cycle.
    pub fn get_funder_count(env: Env) -> u32 {
        read_funders(&env).len()
    }

    /// Returns the minimum accepted payment in USD (7 decimal places).
    pub fn get_minimum_usd() -> i128 {
        MINIMUM_USD
    }

    /// Returns the price feed's interface version.
    pub fn get_version(env: Env) -> u32 {
        let feed_address: Address = env.storage().instance().get(&DataKey::PriceFeed).unwrap();
        PriceFeedClient::new(&env, &feed_address).version()
    }
}
