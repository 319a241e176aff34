//! The auxiliary bus bridge
//!
//! [`AuxBridge`] owns the register space of the primary device and the delay
//! provider. Its operations are split across modules by concern:
//! - [`crate::aux_bus`]: master configuration, one-shot and continuous lanes
//! - [`crate::passthrough`]: bypass mode and direct downstream access
//! - [`crate::power`]: reset, wake and sensor power
//! - [`crate::sensors`]: the AK09916 magnetometer on top of the proxy
//!
//! All operations take `&mut self`: the bridge is not reentrant, and a
//! transaction in flight owns the bus until it completes or times out.

use crate::aux_bus::lane::MirrorLayout;
use crate::aux_bus::AuxMasterConfig;
use crate::banked::BankedRegisters;
use crate::clock::Clock;
use crate::registers::address::{INT_PIN_CFG, PWR_MGMT_1, REG_BANK_SEL, USER_CTRL};
use crate::registers::field_sets::{IntPinCfg, PwrMgmt1, UserCtrl};
use crate::{Bank, Error, WHO_AM_I_VALUE};
use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;

/// Timing configuration of the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeConfig {
    /// Wait between two reads of the master status word
    pub poll_interval_ms: u32,
    /// Poll ceiling used by the convenience one-shot operations
    pub poll_timeout_ms: u32,
    /// Time the master needs after enabling before it accepts transactions
    pub settle_ms: u32,
    /// Wait after a device reset before the device is accessed again
    pub reset_ms: u32,
    /// Wait after waking the device
    pub wake_ms: u32,
}

impl BridgeConfig {
    /// Defaults measured on real boards: 10 ms polls, 500 ms ceiling, 100 ms settle
    #[must_use]
    pub const fn new() -> Self {
        Self {
            poll_interval_ms: 10,
            poll_timeout_ms: 500,
            settle_ms: 100,
            reset_ms: 100,
            wake_ms: 10,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Bridge from the host to the ICM-20948 auxiliary bus
pub struct AuxBridge<I, D> {
    pub(crate) regs: BankedRegisters<I>,
    pub(crate) clock: Clock<D>,
    pub(crate) config: BridgeConfig,
    pub(crate) aux_config: AuxMasterConfig,
    /// Clock reading at which the master was enabled, `None` while disabled
    pub(crate) enabled_at: Option<u32>,
    pub(crate) layout: MirrorLayout,
    pub(crate) passthrough: bool,
}

impl<I, D> AuxBridge<I, D>
where
    I: RegisterInterface<AddressType = u8>,
    D: DelayNs,
{
    /// Create a bridge with the default [`BridgeConfig`]
    ///
    /// This verifies the `WHO_AM_I` register but does not reset or configure
    /// the device.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `WHO_AM_I` register contains an unexpected value
    pub fn new(interface: I, delay: D) -> Result<Self, Error<I::Error>> {
        Self::with_config(interface, delay, BridgeConfig::default())
    }

    /// Create a bridge with custom timing
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_config(
        interface: I,
        delay: D,
        config: BridgeConfig,
    ) -> Result<Self, Error<I::Error>> {
        let mut bridge = Self {
            regs: BankedRegisters::new(interface),
            clock: Clock::new(delay),
            config,
            aux_config: AuxMasterConfig::default(),
            enabled_at: None,
            layout: MirrorLayout::default(),
            passthrough: false,
        };

        bridge.verify_primary()?;

        Ok(bridge)
    }

    /// Read the `WHO_AM_I` register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_who_am_i(&mut self) -> Result<u8, Error<I::Error>> {
        self.regs.select_bank(Bank::Bank0)?;
        let reg = self.regs.device().who_am_i().read()?;
        Ok(reg.who_am_i())
    }

    /// Check that the primary device is an ICM-20948
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDevice`] with the value read if it is not 0xEA.
    pub fn verify_primary(&mut self) -> Result<(), Error<I::Error>> {
        let who_am_i = self.read_who_am_i()?;
        if who_am_i != WHO_AM_I_VALUE {
            #[cfg(feature = "defmt")]
            defmt::error!("WHO_AM_I mismatch: 0x{:02X}", who_am_i);
            return Err(Error::InvalidDevice(who_am_i));
        }
        Ok(())
    }

    /// Timing configuration
    #[must_use]
    pub const fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Replace the timing configuration
    pub fn set_config(&mut self, config: BridgeConfig) {
        self.config = config;
    }

    /// Banked register space, for accesses the bridge does not model
    ///
    /// Writes made here bypass state tracking; prefer
    /// [`write_register`](Self::write_register).
    pub fn registers(&mut self) -> &mut BankedRegisters<I> {
        &mut self.regs
    }

    /// Read a register of `bank`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_register(&mut self, bank: Bank, register: u8) -> Result<u8, Error<I::Error>> {
        self.regs.read_in(bank, register)
    }

    /// Write a register of `bank`
    ///
    /// Writes that touch the master enable, master reset, bypass, device
    /// reset or bank select bits are reflected in the bridge state.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn write_register(
        &mut self,
        bank: Bank,
        register: u8,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        self.regs.write_in(bank, register, value)?;
        self.track_write(bank, register, value);
        Ok(())
    }

    /// Read-modify-write a register of `bank`, tracked like [`write_register`](Self::write_register)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn modify_register(
        &mut self,
        bank: Bank,
        register: u8,
        set: u8,
        clear: u8,
    ) -> Result<(), Error<I::Error>> {
        self.regs.select_bank(bank)?;
        let value = self.regs.modify_register(register, set, clear)?;
        self.track_write(bank, register, value);
        Ok(())
    }

    /// Block for `ms` milliseconds on the bridge clock
    pub fn delay_ms(&mut self, ms: u32) {
        self.clock.delay_ms(ms);
    }

    /// Milliseconds waited by the bridge since creation
    #[must_use]
    pub const fn elapsed_ms(&self) -> u32 {
        self.clock.elapsed_ms()
    }

    /// Consume the bridge and return the interface and delay provider
    pub fn release(self) -> (I, D) {
        (self.regs.release(), self.clock.release())
    }

    /// Forget everything a device reset wipes
    pub(crate) fn forget_device_state(&mut self) {
        self.regs.invalidate_bank();
        self.enabled_at = None;
        self.layout.clear();
        self.passthrough = false;
    }

    fn track_write(&mut self, bank: Bank, register: u8, value: u8) {
        if register == REG_BANK_SEL {
            self.regs.invalidate_bank();
            return;
        }
        if bank != Bank::Bank0 {
            return;
        }
        match register {
            USER_CTRL => {
                let user_ctrl = UserCtrl::from([value]);
                if user_ctrl.i_2_c_mst_rst() {
                    self.layout.clear();
                }
                if !user_ctrl.i_2_c_mst_en() {
                    self.enabled_at = None;
                } else if self.enabled_at.is_none() || user_ctrl.i_2_c_mst_rst() {
                    self.enabled_at = Some(self.clock.elapsed_ms());
                }
            }
            INT_PIN_CFG => self.passthrough = IntPinCfg::from([value]).bypass_en(),
            PWR_MGMT_1 if PwrMgmt1::from([value]).device_reset() => self.forget_device_state(),
            _ => {}
        }
    }
}
