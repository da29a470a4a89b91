use soroban_sdk::{contracttype, Address};

/// Standing granted to an issuer by the admin approver. Revocation is a
/// soft delete; the record itself is never removed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IssuerApproval {
    pub approved_by: Address,
    pub approved_at: u64,
    pub revoked: bool,
}

/// Time-bounded credential vouching for an owner. Valid in the window
/// `[issued_at, issued_at + valid_for)` unless revoked.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    pub issuer: Address,
    pub issued_at: u64,
    pub valid_for: u64,
    pub revoked: bool,
}

/// Active dual-authorization requirement on an owner's transfers.
/// At most one grant per owner; replacing it drops the prior
/// co-authorizer's standing.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TwoAuthGrant {
    pub co_authorizer: Address,
    pub granted_by: Address,
    pub active: bool,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    IdentityPolicy,
    AssetHolder(Address),
    IssuerApproval(Address),
    Identity(Address),
    TwoAuth(Address),
    Balance(Address, Address),
}
