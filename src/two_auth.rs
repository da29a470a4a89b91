use soroban_sdk::{Address, Env};

use crate::storage_types::{DataKey, TwoAuthGrant};

/// Outcome of evaluating the dual-authorization policy for a transfer.
///
/// `Required` covers both an absent and a mismatched co-signer, so the
/// caller has to handle the "required but not provided" case explicitly.
/// `Satisfied` carries the co-authorizer whose authorization must still
/// be demanded from the host before any mutation.
pub enum TwoAuthCheck {
    NotRequired,
    Required,
    Satisfied(Address),
}

pub fn read_grant(e: &Env, owner: &Address) -> Option<TwoAuthGrant> {
    e.storage().persistent().get(&DataKey::TwoAuth(owner.clone()))
}

pub fn write_grant(e: &Env, owner: &Address, grant: &TwoAuthGrant) {
    e.storage()
        .persistent()
        .set(&DataKey::TwoAuth(owner.clone()), grant);
}

pub fn evaluate(e: &Env, owner: &Address, co_signer: &Option<Address>) -> TwoAuthCheck {
    let grant = match read_grant(e, owner) {
        Some(grant) if grant.active => grant,
        _ => return TwoAuthCheck::NotRequired,
    };
    match co_signer {
        Some(signer) if *signer == grant.co_authorizer => {
            TwoAuthCheck::Satisfied(signer.clone())
        }
        _ => TwoAuthCheck::Required,
    }
}
