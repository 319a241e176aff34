//! `I2C_MST_STATUS` snapshots

use super::{ContinuousLane, Lane};
use crate::registers::field_sets::I2CMstStatus as I2cMstStatus;

/// Snapshot of the auxiliary master status word
///
/// The hardware clears the flags when the register is read, so a snapshot
/// should be acted on immediately and not re-read to "check again".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransactionStatus(I2cMstStatus);

impl TransactionStatus {
    /// Decode a raw status byte
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        Self(I2cMstStatus::from([bits]))
    }

    /// Raw status byte
    #[must_use]
    pub fn bits(self) -> u8 {
        let [bits] = <[u8; 1]>::from(self.0);
        bits
    }

    /// The one-shot lane finished its transfer
    #[must_use]
    pub fn one_shot_done(self) -> bool {
        self.0.i_2_c_slv_4_done()
    }

    /// The master lost arbitration on the auxiliary bus
    #[must_use]
    pub fn arbitration_lost(self) -> bool {
        self.0.i_2_c_lost_arb()
    }

    /// The target of `lane` did not acknowledge
    #[must_use]
    pub fn nack(self, lane: Lane) -> bool {
        match lane {
            Lane::Continuous(ContinuousLane::Lane0) => self.0.i_2_c_slv_0_nack(),
            Lane::Continuous(ContinuousLane::Lane1) => self.0.i_2_c_slv_1_nack(),
            Lane::Continuous(ContinuousLane::Lane2) => self.0.i_2_c_slv_2_nack(),
            Lane::Continuous(ContinuousLane::Lane3) => self.0.i_2_c_slv_3_nack(),
            Lane::OneShot => self.0.i_2_c_slv_4_nack(),
        }
    }

    /// Any lane saw a NACK
    #[must_use]
    pub fn any_nack(self) -> bool {
        ContinuousLane::ALL
            .iter()
            .map(|&lane| Lane::Continuous(lane))
            .chain([Lane::OneShot])
            .any(|lane| self.nack(lane))
    }

    /// State of the FSYNC pass-through flag
    #[must_use]
    pub fn pass_through(self) -> bool {
        self.0.pass_through()
    }
}

impl From<I2cMstStatus> for TransactionStatus {
    fn from(status: I2cMstStatus) -> Self {
        Self(status)
    }
}

impl Default for TransactionStatus {
    fn default() -> Self {
        Self(I2cMstStatus::new_zero())
    }
}
