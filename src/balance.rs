use soroban_sdk::{Address, Env};

use crate::storage_types::DataKey;
use crate::Error;

/// A missing record is reported as `None`, distinct from a zero balance.
pub fn read_balance(e: &Env, owner: &Address, asset: &Address) -> Option<i128> {
    e.storage()
        .persistent()
        .get(&DataKey::Balance(owner.clone(), asset.clone()))
}

fn write_balance(e: &Env, owner: &Address, asset: &Address, amount: i128) {
    e.storage()
        .persistent()
        .set(&DataKey::Balance(owner.clone(), asset.clone()), &amount);
}

/// Credits create the account record on first use.
pub fn credit(e: &Env, owner: &Address, asset: &Address, amount: i128) {
    let current = read_balance(e, owner, asset).unwrap_or(0);
    write_balance(e, owner, asset, current + amount);
}

/// The balance check and the write happen in the same invocation, so a
/// debit can never drive the balance negative.
pub fn debit(e: &Env, owner: &Address, asset: &Address, amount: i128) -> Result<(), Error> {
    let current = match read_balance(e, owner, asset) {
        Some(balance) => balance,
        None => return Err(Error::InsufficientBalance),
    };
    if current < amount {
        return Err(Error::InsufficientBalance);
    }
    write_balance(e, owner, asset, current - amount);
    Ok(())
}
