use soroban_sdk::{Address, Env};

use crate::storage_types::{DataKey, Identity, IssuerApproval};

pub fn read_approval(e: &Env, issuer: &Address) -> Option<IssuerApproval> {
    e.storage()
        .persistent()
        .get(&DataKey::IssuerApproval(issuer.clone()))
}

pub fn write_approval(e: &Env, issuer: &Address, approval: &IssuerApproval) {
    e.storage()
        .persistent()
        .set(&DataKey::IssuerApproval(issuer.clone()), approval);
}

pub fn read_identity(e: &Env, owner: &Address) -> Option<Identity> {
    e.storage().persistent().get(&DataKey::Identity(owner.clone()))
}

pub fn write_identity(e: &Env, owner: &Address, identity: &Identity) {
    e.storage()
        .persistent()
        .set(&DataKey::Identity(owner.clone()), identity);
}

/// Validity window is `[issued_at, issued_at + valid_for)`. The end of
/// the window saturates so an over-sized duration cannot wrap around.
pub fn is_valid_at(identity: &Identity, at_time: u64) -> bool {
    !identity.revoked && at_time < identity.issued_at.saturating_add(identity.valid_for)
}

pub fn is_valid(e: &Env, owner: &Address) -> bool {
    match read_identity(e, owner) {
        Some(identity) => is_valid_at(&identity, e.ledger().timestamp()),
        None => false,
    }
}
