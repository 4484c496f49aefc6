//! 2-of-3 multisig accounts
//!
//! An account is controlled by three holders. Moving funds out of it needs
//! one party to submit the call and a second, different holder to co-sign it
//! off-chain. Which holders may fill which role is set by [`CosignPolicy`].

use crate::core::Address;
use crate::crypto::keccak256_concat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to multisig account setup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Duplicate holder: {0}")]
    DuplicateHolder(Address),
    #[error("Holder cannot be the zero address")]
    ZeroHolder,
}

/// Who may submit and who may co-sign a transfer
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CosignPolicy {
    /// First holder (or the account) submits, second holder co-signs
    #[default]
    DesignatedRoles,
    /// Any holder (or the account) submits, any other holder co-signs
    AnyTwoHolders,
}

/// The three key-holders of a multisig account, in role order
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Holders {
    /// Submits transfers under [`CosignPolicy::DesignatedRoles`]
    pub first: Address,
    /// Co-signs transfers under [`CosignPolicy::DesignatedRoles`]
    pub second: Address,
    /// Only takes part under [`CosignPolicy::AnyTwoHolders`]
    pub third: Address,
}

impl Holders {
    /// Validate and build a holder triple
    pub fn new(first: Address, second: Address, third: Address) -> Result<Self, AccountError> {
        for holder in [first, second, third] {
            if holder == Address::ZERO {
                return Err(AccountError::ZeroHolder);
            }
        }
        if first == second || first == third {
            return Err(AccountError::DuplicateHolder(first));
        }
        if second == third {
            return Err(AccountError::DuplicateHolder(second));
        }

        Ok(Self {
            first,
            second,
            third,
        })
    }

    /// Iterate holders in role order
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        [&self.first, &self.second, &self.third].into_iter()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.iter().any(|holder| holder == address)
    }
}

/// A registered multisig account
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MultisigAccount {
    /// Derived account address
    pub address: Address,
    /// Holders, fixed for the account's lifetime
    pub holders: Holders,
}

impl MultisigAccount {
    /// Create an account for a validated holder triple
    pub fn new(holders: Holders) -> Self {
        Self {
            address: Self::derive_address(&holders),
            holders,
        }
    }

    /// Address = keccak256(first || second || third)[12..]
    ///
    /// Role order matters: the same three keys in a different order make a
    /// different account.
    pub fn derive_address(holders: &Holders) -> Address {
        Address::from_digest(&keccak256_concat(holders.iter()))
    }

    /// Get the account address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Whether `caller` may submit a transfer out of this account
    pub fn may_submit(&self, policy: CosignPolicy, caller: &Address) -> bool {
        if *caller == self.address {
            return true;
        }
        match policy {
            CosignPolicy::DesignatedRoles => *caller == self.holders.first,
            CosignPolicy::AnyTwoHolders => self.holders.contains(caller),
        }
    }

    /// Whether `signer` may co-sign a transfer submitted by `caller`
    pub fn may_cosign(&self, policy: CosignPolicy, caller: &Address, signer: &Address) -> bool {
        match policy {
            CosignPolicy::DesignatedRoles => *signer == self.holders.second,
            CosignPolicy::AnyTwoHolders => signer != caller && self.holders.contains(signer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_holders() -> Holders {
        Holders::new(
            Address::new([1; 20]),
            Address::new([2; 20]),
            Address::new([3; 20]),
        )
        .unwrap()
    }

    #[test]
    fn test_holder_validation() {
        let a = Address::new([1; 20]);
        let b = Address::new([2; 20]);

        assert_eq!(
            Holders::new(a, a, b),
            Err(AccountError::DuplicateHolder(a))
        );
        assert_eq!(
            Holders::new(a, b, b),
            Err(AccountError::DuplicateHolder(b))
        );
        assert_eq!(
            Holders::new(a, b, Address::ZERO),
            Err(AccountError::ZeroHolder)
        );
    }

    #[test]
    fn test_address_determinism() {
        let first = MultisigAccount::new(sample_holders());
        let second = MultisigAccount::new(sample_holders());
        assert_eq!(first.address(), second.address());
    }

    #[test]
    fn test_role_order_changes_address() {
        let holders = sample_holders();
        let swapped = Holders::new(holders.second, holders.first, holders.third).unwrap();
        assert_ne!(
            MultisigAccount::derive_address(&holders),
            MultisigAccount::derive_address(&swapped)
        );
    }

    #[test]
    fn test_designated_roles() {
        let policy = CosignPolicy::DesignatedRoles;
        let account = MultisigAccount::new(sample_holders());
        let Holders {
            first,
            second,
            third,
        } = account.holders;

        assert!(account.may_submit(policy, &first));
        assert!(account.may_submit(policy, &account.address()));
        assert!(!account.may_submit(policy, &second));
        assert!(!account.may_submit(policy, &third));

        assert!(account.may_cosign(policy, &first, &second));
        assert!(!account.may_cosign(policy, &first, &first));
        assert!(!account.may_cosign(policy, &first, &third));
    }

    #[test]
    fn test_any_two_holders() {
        let policy = CosignPolicy::AnyTwoHolders;
        let account = MultisigAccount::new(sample_holders());
        let Holders {
            first,
            second,
            third,
        } = account.holders;
        let outsider = Address::new([9; 20]);

        assert!(account.may_submit(policy, &third));
        assert!(!account.may_submit(policy, &outsider));

        assert!(account.may_cosign(policy, &first, &third));
        assert!(account.may_cosign(policy, &second, &first));
        assert!(!account.may_cosign(policy, &third, &third));
        assert!(!account.may_cosign(policy, &first, &outsider));
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&CosignPolicy::AnyTwoHolders).unwrap();
        assert_eq!(json, "\"any_two_holders\"");
        assert_eq!(CosignPolicy::default(), CosignPolicy::DesignatedRoles);
    }
}
