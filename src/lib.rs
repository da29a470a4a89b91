#![no_std]
use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, token, Address, Env,
};

mod balance;
mod identity;
pub mod storage_types;
mod two_auth;

use storage_types::{DataKey, Identity, IssuerApproval, TwoAuthGrant};
use two_auth::TwoAuthCheck;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    AlreadyApproved = 4,
    IssuerNotApproved = 5,
    IdentityAlreadyExists = 6,
    IdentityInvalid = 7,
    InvalidDuration = 8,
    HolderAlreadyExists = 9,
    HolderNotFound = 10,
    InvalidAmount = 11,
    InsufficientBalance = 12,
    NeedTwoAuthApproval = 13,
    TwoAuthNotFound = 14,
    CustodyDepositFailed = 15,
    CustodyWithdrawFailed = 16,
}

#[contract]
pub struct CustodialWrapContract;

fn read_admin(e: &Env) -> Result<Address, Error> {
    e.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

fn read_holder(e: &Env, asset: &Address) -> Option<Address> {
    e.storage()
        .persistent()
        .get(&DataKey::AssetHolder(asset.clone()))
}

fn identity_required(e: &Env) -> bool {
    e.storage()
        .instance()
        .get(&DataKey::IdentityPolicy)
        .unwrap_or(true)
}

#[contractimpl]
impl CustodialWrapContract {
    /// Initialize the engine with its admin approver. Only can be called
    /// once; the admin is immutable afterwards. Transfers require valid
    /// identities until `set_identity_policy` says otherwise.
    pub fn initialize(e: Env, admin: Address) -> Result<(), Error> {
        let key = DataKey::Admin;
        if e.storage().instance().has(&key) {
            return Err(Error::AlreadyInitialized);
        }
        e.storage().instance().set(&key, &admin);
        e.storage().instance().set(&DataKey::IdentityPolicy, &true);
        Ok(())
    }

    /// Register the custodial holding account for an asset. One holder
    /// per asset; all wrapped balances of that asset are backed by it.
    pub fn init_asset_holder(e: Env, asset: Address) -> Result<(), Error> {
        let admin = read_admin(&e)?;
        admin.require_auth();

        let key = DataKey::AssetHolder(asset.clone());
        if e.storage().persistent().has(&key) {
            return Err(Error::HolderAlreadyExists);
        }

        // The contract itself holds custody for the asset.
        let holder = e.current_contract_address();
        e.storage().persistent().set(&key, &holder);

        e.events()
            .publish((symbol_short!("holder"), asset), holder);
        Ok(())
    }

    /// Toggle whether transfers require valid identities on both sides.
    pub fn set_identity_policy(e: Env, required: bool) -> Result<(), Error> {
        let admin = read_admin(&e)?;
        admin.require_auth();

        e.storage().instance().set(&DataKey::IdentityPolicy, &required);
        Ok(())
    }

    /// Approve an issuer to vouch for owners. Only callable by the admin
    /// approver. Approval is not renewable: once a record exists, even a
    /// revoked one, this call fails.
    pub fn approve_issuer(e: Env, issuer: Address) -> Result<(), Error> {
        let admin = read_admin(&e)?;
        admin.require_auth();

        if identity::read_approval(&e, &issuer).is_some() {
            return Err(Error::AlreadyApproved);
        }

        let approval = IssuerApproval {
            approved_by: admin.clone(),
            approved_at: e.ledger().timestamp(),
            revoked: false,
        };
        identity::write_approval(&e, &issuer, &approval);

        e.events()
            .publish((symbol_short!("approve"), issuer), admin);
        Ok(())
    }

    /// Withdraw an issuer's standing. Identities it already issued keep
    /// their own validity window.
    pub fn revoke_issuer(e: Env, issuer: Address) -> Result<(), Error> {
        let admin = read_admin(&e)?;
        admin.require_auth();

        let mut approval =
            identity::read_approval(&e, &issuer).ok_or(Error::IssuerNotApproved)?;
        approval.revoked = true;
        identity::write_approval(&e, &issuer, &approval);

        e.events()
            .publish((symbol_short!("unapprove"), issuer), admin);
        Ok(())
    }

    /// Issue a time-bounded identity for `owner`, vouched by `issuer`.
    /// Both the issuer and the owner must authorize the call.
    ///
    /// # Arguments
    /// * `issuer` - An approved, non-revoked issuer
    /// * `owner` - The principal the identity is issued to
    /// * `validity_duration` - Window length in seconds, must be positive
    pub fn issue_identity(
        e: Env,
        issuer: Address,
        owner: Address,
        validity_duration: u64,
    ) -> Result<(), Error> {
        issuer.require_auth();
        owner.require_auth();

        let approval =
            identity::read_approval(&e, &issuer).ok_or(Error::IssuerNotApproved)?;
        if approval.revoked {
            return Err(Error::IssuerNotApproved);
        }

        // One identity per owner, revoked and expired records included.
        if identity::read_identity(&e, &owner).is_some() {
            return Err(Error::IdentityAlreadyExists);
        }

        if validity_duration == 0 {
            return Err(Error::InvalidDuration);
        }

        let record = Identity {
            issuer: issuer.clone(),
            issued_at: e.ledger().timestamp(),
            valid_for: validity_duration,
            revoked: false,
        };
        identity::write_identity(&e, &owner, &record);

        e.events()
            .publish((symbol_short!("identity"), owner), issuer);
        Ok(())
    }

    /// Permanently revoke an owner's identity. There is no un-revoke.
    pub fn revoke_identity(e: Env, owner: Address) -> Result<(), Error> {
        let admin = read_admin(&e)?;
        admin.require_auth();

        let mut record =
            identity::read_identity(&e, &owner).ok_or(Error::IdentityInvalid)?;
        record.revoked = true;
        identity::write_identity(&e, &owner, &record);

        e.events()
            .publish((symbol_short!("id_revoke"), owner), admin);
        Ok(())
    }

    /// Require a second signer on all of `owner`'s transfers. Replaces
    /// any existing grant, dropping the prior co-authorizer's standing.
    pub fn grant_two_auth(e: Env, owner: Address, co_authorizer: Address) -> Result<(), Error> {
        let admin = read_admin(&e)?;
        admin.require_auth();

        if !identity::is_valid(&e, &owner) {
            return Err(Error::IdentityInvalid);
        }

        let grant = TwoAuthGrant {
            co_authorizer: co_authorizer.clone(),
            granted_by: admin,
            active: true,
        };
        two_auth::write_grant(&e, &owner, &grant);

        e.events()
            .publish((symbol_short!("two_auth"), owner), co_authorizer);
        Ok(())
    }

    /// Lift the dual-authorization requirement for an owner.
    pub fn revoke_two_auth(e: Env, owner: Address) -> Result<(), Error> {
        let admin = read_admin(&e)?;
        admin.require_auth();

        let mut grant = two_auth::read_grant(&e, &owner).ok_or(Error::TwoAuthNotFound)?;
        grant.active = false;
        two_auth::write_grant(&e, &owner, &grant);

        e.events()
            .publish((symbol_short!("ta_revoke"), owner), admin);
        Ok(())
    }

    /// Deposit `amount` of `asset` into custody and credit the owner's
    /// wrapped balance 1:1. The ledger is only written after custody
    /// confirmed the deposit.
    pub fn wrap(e: Env, owner: Address, asset: Address, amount: i128) -> Result<(), Error> {
        owner.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let holder = read_holder(&e, &asset).ok_or(Error::HolderNotFound)?;

        let custody = token::Client::new(&e, &asset);
        if custody.try_transfer(&owner, &holder, &amount).is_err() {
            return Err(Error::CustodyDepositFailed);
        }
        balance::credit(&e, &owner, &asset, amount);

        e.events()
            .publish((symbol_short!("wrap"), owner, asset), amount);
        Ok(())
    }

    /// Debit the owner's wrapped balance and release the backing tokens
    /// from custody. The withdraw runs before the debit, so a custody
    /// failure leaves the ledger untouched and the two never diverge.
    pub fn unwrap(e: Env, owner: Address, asset: Address, amount: i128) -> Result<(), Error> {
        owner.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let holder = read_holder(&e, &asset).ok_or(Error::HolderNotFound)?;

        match balance::read_balance(&e, &owner, &asset) {
            Some(current) if current >= amount => {}
            _ => return Err(Error::InsufficientBalance),
        }

        let custody = token::Client::new(&e, &asset);
        if custody.try_transfer(&holder, &owner, &amount).is_err() {
            return Err(Error::CustodyWithdrawFailed);
        }
        balance::debit(&e, &owner, &asset, amount)?;

        e.events()
            .publish((symbol_short!("unwrap"), owner, asset), amount);
        Ok(())
    }

    /// Move wrapped balance between owners. Subject to the identity
    /// policy and the source owner's dual-authorization grant, if any.
    /// A self-transfer runs every check the same way; only the net
    /// balance effect is nil.
    ///
    /// # Arguments
    /// * `co_signer` - The co-authorizer satisfying the source's grant,
    ///   if one is active; ignored when no grant is in force
    pub fn transfer(
        e: Env,
        source_owner: Address,
        destination_owner: Address,
        asset: Address,
        amount: i128,
        co_signer: Option<Address>,
    ) -> Result<(), Error> {
        source_owner.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        if identity_required(&e)
            && (!identity::is_valid(&e, &source_owner)
                || !identity::is_valid(&e, &destination_owner))
        {
            return Err(Error::IdentityInvalid);
        }

        match two_auth::evaluate(&e, &source_owner, &co_signer) {
            TwoAuthCheck::NotRequired => {}
            TwoAuthCheck::Required => return Err(Error::NeedTwoAuthApproval),
            TwoAuthCheck::Satisfied(co_authorizer) => co_authorizer.require_auth(),
        }

        balance::debit(&e, &source_owner, &asset, amount)?;
        balance::credit(&e, &destination_owner, &asset, amount);

        e.events().publish(
            (symbol_short!("transfer"), source_owner, destination_owner, asset),
            amount,
        );
        Ok(())
    }

    /// Retrieve an issuer's approval record, if any
    pub fn get_issuer_approval(e: Env, issuer: Address) -> Option<IssuerApproval> {
        identity::read_approval(&e, &issuer)
    }

    /// Retrieve an owner's identity record, if any
    pub fn get_identity(e: Env, owner: Address) -> Option<Identity> {
        identity::read_identity(&e, &owner)
    }

    /// True iff the owner's identity exists, is not revoked, and the
    /// current ledger time falls inside its validity window
    pub fn is_identity_valid(e: Env, owner: Address) -> bool {
        identity::is_valid(&e, &owner)
    }

    /// Retrieve an owner's dual-authorization grant, active or not
    pub fn get_two_auth(e: Env, owner: Address) -> Option<TwoAuthGrant> {
        two_auth::read_grant(&e, &owner)
    }

    /// Wrapped balance for (owner, asset); `None` when the account was
    /// never credited, as opposed to a zero balance
    pub fn get_balance(e: Env, owner: Address, asset: Address) -> Option<i128> {
        balance::read_balance(&e, &owner, &asset)
    }

    /// Custodial holding account registered for an asset, if any
    pub fn get_asset_holder(e: Env, asset: Address) -> Option<Address> {
        read_holder(&e, &asset)
    }

    /// Whether transfers currently require valid identities on both sides
    pub fn get_identity_policy(e: Env) -> bool {
        identity_required(&e)
    }
}
