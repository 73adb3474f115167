use crate::domain::amount::Balance;
use crate::domain::identity::Identity;
use crate::domain::ports::FundsTransfer;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// A settled withdrawal, as seen by the transfer adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub to: Identity,
    pub amount: Balance,
}

/// Transfer adapter that settles by recording a receipt.
///
/// Used by the CLI, where there is no real value-transfer network. Clones
/// share the receipt list.
#[derive(Default, Clone)]
pub struct RecordingTransfer {
    receipts: Arc<RwLock<Vec<TransferReceipt>>>,
}

impl RecordingTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn receipts(&self) -> Vec<TransferReceipt> {
        self.receipts.read().await.clone()
    }
}

#[async_trait]
impl FundsTransfer for RecordingTransfer {
    async fn transfer(&self, to: &Identity, amount: Balance) -> Result<()> {
        info!(passenger = %to, %amount, "transfer settled");
        self.receipts.write().await.push(TransferReceipt {
            to: to.clone(),
            amount,
        });
        Ok(())
    }
}
