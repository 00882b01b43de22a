//! Fee gate: moves a parameterised fee from the initiator to the module
//! account through the [`Ledger`] capability.

use zkr_core::{Address, Coin};
use zkr_store::StoreError;

use super::Keeper;
use crate::capabilities::{IdentityValidator, Ledger};
use crate::error::RegistryError;

impl<I: IdentityValidator, L: Ledger> Keeper<I, L> {
    /// Charge `fee` to `payer`. Zero fees skip the ledger entirely.
    pub(super) fn charge_fee(
        &mut self,
        payer: &Address,
        fee: &Coin,
        purpose: &'static str,
    ) -> Result<(), RegistryError> {
        if fee.is_zero() {
            return Ok(());
        }
        self.ledger
            .transfer(payer, &self.module_account, fee)
            .map_err(|e| RegistryError::InsufficientFees(format!("{purpose} of {fee}: {e}")))?;
        tracing::debug!(payer = %payer, fee = %fee, purpose, "fee charged");
        Ok(())
    }

    /// Run `write` after charging `fee`. If the write fails the fee is
    /// returned to `payer` before the error propagates.
    pub(super) fn charged<T>(
        &mut self,
        payer: &Address,
        fee: &Coin,
        purpose: &'static str,
        write: impl FnOnce(&mut Self) -> Result<T, StoreError>,
    ) -> Result<T, RegistryError> {
        self.charge_fee(payer, fee, purpose)?;
        match write(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::error!(error = %err, purpose, "write failed after fee charge");
                if !fee.is_zero() {
                    if let Err(refund) = self.ledger.transfer(&self.module_account, payer, fee) {
                        tracing::error!(
                            error = %refund,
                            payer = %payer,
                            fee = %fee,
                            "fee refund failed"
                        );
                    }
                }
                Err(err.into())
            }
        }
    }
}
