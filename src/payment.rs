//! "Buy lives" hook. The transfer is fire-and-forget: nothing here touches
//! the lives counter.

use log::{error, info};
use thiserror::Error;

pub const USDC_ADDRESS: &str = "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913";
pub const RECIPIENT_ADDRESS: &str = "0x6B512f25976a164c922Cb4f3EcDBB02E223eA445";
/// Base mainnet.
pub const CHAIN_ID: u64 = 8453;
/// One USDC, six decimals.
pub const LIVES_PRICE: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub chain_id: u64,
    pub token: &'static str,
    pub recipient: &'static str,
    pub amount: u64,
}

impl TransferRequest {
    pub fn buy_lives() -> Self {
        TransferRequest {
            chain_id: CHAIN_ID,
            token: USDC_ADDRESS,
            recipient: RECIPIENT_ADDRESS,
            amount: LIVES_PRICE,
        }
    }
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("no wallet connected")]
    NoWallet,

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

pub trait TokenTransfer {
    /// Submits the transfer and returns its transaction hash.
    fn transfer(&mut self, request: &TransferRequest) -> Result<String, PaymentError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoWallet;

impl TokenTransfer for NoWallet {
    fn transfer(&mut self, _request: &TransferRequest) -> Result<String, PaymentError> {
        Err(PaymentError::NoWallet)
    }
}

/// Sends the fixed lives payment. Errors are logged and swallowed.
pub fn buy_lives<T: TokenTransfer + ?Sized>(wallet: &mut T) -> Option<String> {
    let request = TransferRequest::buy_lives();

    match wallet.transfer(&request) {
        Ok(tx) => {
            info!("Lives payment sent: {}", tx);
            Some(tx)
        }
        Err(err) => {
            error!("Lives payment failed: {}", err);
            None
        }
    }
}
