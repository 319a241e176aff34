//! Passthrough (bypass) mode
//!
//! With `INT_PIN_CFG.BYPASS_EN` set, the auxiliary bus pins are joined to the
//! host bus and downstream devices answer at their own addresses. The
//! auxiliary master must not drive the bus at the same time; keeping the two
//! exclusive is the caller's job.

use crate::bridge::AuxBridge;
use crate::interface::DirectInterface;
use crate::{Bank, Error};
use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;

impl<I, D> AuxBridge<I, D>
where
    I: RegisterInterface<AddressType = u8>,
    D: DelayNs,
{
    /// Expose or hide the downstream bus on the host bus
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_passthrough(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.regs.select_bank(Bank::Bank0)?;
        self.regs.device().int_pin_cfg().modify(|w| {
            w.set_bypass_en(enabled);
        })?;
        self.passthrough = enabled;

        #[cfg(feature = "defmt")]
        if enabled && self.enabled_at.is_some() {
            defmt::warn!("passthrough enabled while the aux master is on");
        }

        Ok(())
    }

    /// Whether passthrough was last switched on
    #[must_use]
    pub const fn passthrough_enabled(&self) -> bool {
        self.passthrough
    }
}

impl<I, D> AuxBridge<I, D>
where
    I: DirectInterface,
    D: DelayNs,
{
    /// Write one register of a device exposed by passthrough
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails (an absent or hidden device NACKs).
    pub fn direct_write(
        &mut self,
        address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        self.regs
            .interface()
            .write_direct(address, register, &[value])?;
        Ok(())
    }

    /// Read consecutive registers of a device exposed by passthrough
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails (an absent or hidden device NACKs).
    pub fn direct_read(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Error<I::Error>> {
        self.regs
            .interface()
            .read_direct(address, register, buffer)?;
        Ok(())
    }
}
