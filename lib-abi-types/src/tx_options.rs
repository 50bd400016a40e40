//! Transaction options
//!
//! The strictly-typed form of the transaction-options record. All fields
//! are optional; coercion fills in whichever keys the caller supplied.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// Coerced transaction options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TxOptions {
    /// Gas limit
    pub gas: Option<BigInt>,
    /// Gas price in wei
    pub gas_price: Option<BigInt>,
    /// Amount sent with the call, in wei
    pub value: Option<BigInt>,
    /// Sender nonce
    pub nonce: Option<BigInt>,
    /// Sender address (canonical checksummed form)
    pub from: Option<String>,
    /// Recipient address (canonical checksummed form)
    pub to: Option<String>,
    /// Call data
    pub data: Option<Vec<u8>>,
    /// Whether deployment may overwrite existing code
    pub overwrite: Option<bool>,
    /// Private-transaction recipients: 32-byte public keys
    pub private_for: Option<Vec<[u8; 32]>>,
}

impl TxOptions {
    /// Whether no field has been set
    pub fn is_empty(&self) -> bool {
        self.gas.is_none()
            && self.gas_price.is_none()
            && self.value.is_none()
            && self.nonce.is_none()
            && self.from.is_none()
            && self.to.is_none()
            && self.data.is_none()
            && self.overwrite.is_none()
            && self.private_for.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(TxOptions::default().is_empty());
        let options = TxOptions {
            gas: Some(BigInt::from(21000)),
            ..TxOptions::default()
        };
        assert!(!options.is_empty());
    }
}
