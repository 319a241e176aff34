//! Banked register access
//!
//! The ICM-20948 maps four register banks onto one address space; the active
//! bank is chosen by writing `REG_BANK_SEL`. [`BankedRegisters`] caches the
//! selected bank so repeated accesses to the same bank cost a single bank
//! write. The cache starts out invalid and must be invalidated after a device
//! reset, which silently returns the hardware to bank 0.

use crate::registers::RegisterDevice;
use crate::{Bank, Error};
use device_driver::RegisterInterface;

/// Register space of the primary device with bank caching
pub struct BankedRegisters<I> {
    device: RegisterDevice<I>,
    current_bank: Option<Bank>,
}

impl<I> BankedRegisters<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Wrap an interface; the bank cache starts invalid
    pub fn new(interface: I) -> Self {
        Self {
            device: RegisterDevice::new(interface),
            current_bank: None,
        }
    }

    /// Bank the cache believes is active, `None` when unknown
    #[must_use]
    pub const fn current_bank(&self) -> Option<Bank> {
        self.current_bank
    }

    /// Forget the cached bank so the next selection always writes `REG_BANK_SEL`
    pub fn invalidate_bank(&mut self) {
        self.current_bank = None;
    }

    /// Select a register bank
    ///
    /// Writes `REG_BANK_SEL` only when the bank differs from the cached one
    /// or the cache is invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails. The cache is
    /// left untouched in that case.
    pub fn select_bank(&mut self, bank: Bank) -> Result<(), Error<I::Error>> {
        if self.current_bank != Some(bank) {
            self.device.reg_bank_sel().write(|w| {
                w.set_user_bank(bank as u8);
            })?;

            #[cfg(feature = "defmt")]
            defmt::trace!("bank {:?} -> {:?}", self.current_bank, bank);

            self.current_bank = Some(bank);
        }
        Ok(())
    }

    /// Read one register of the current bank
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_register(&mut self, address: u8) -> Result<u8, Error<I::Error>> {
        let mut value = [0u8; 1];
        self.device.interface.read_register(address, 8, &mut value)?;
        Ok(value[0])
    }

    /// Burst read consecutive registers of the current bank
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_registers(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Error<I::Error>> {
        let size_bits = u32::try_from(buffer.len() * 8).map_err(|_| Error::InvalidConfig)?;
        self.device
            .interface
            .read_register(address, size_bits, buffer)?;
        Ok(())
    }

    /// Write one register of the current bank
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn write_register(&mut self, address: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.device.interface.write_register(address, 8, &[value])?;
        Ok(())
    }

    /// Read-modify-write one register of the current bank
    ///
    /// Bits in `set` are set, then bits in `clear` are cleared. Returns the
    /// value written.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn modify_register(
        &mut self,
        address: u8,
        set: u8,
        clear: u8,
    ) -> Result<u8, Error<I::Error>> {
        let value = (self.read_register(address)? | set) & !clear;
        self.write_register(address, value)?;
        Ok(value)
    }

    /// Select `bank` then read one register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_in(&mut self, bank: Bank, address: u8) -> Result<u8, Error<I::Error>> {
        self.select_bank(bank)?;
        self.read_register(address)
    }

    /// Select `bank` then write one register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn write_in(&mut self, bank: Bank, address: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.select_bank(bank)?;
        self.write_register(address, value)
    }

    /// Typed access to the generated register block
    ///
    /// The caller is responsible for selecting the right bank first.
    pub fn device(&mut self) -> &mut RegisterDevice<I> {
        &mut self.device
    }

    /// Exclusive access to the underlying interface, for transfers outside the register map
    pub fn interface(&mut self) -> &mut I {
        &mut self.device.interface
    }

    /// Consume the register space and return the interface
    pub fn release(self) -> I {
        self.device.interface
    }
}
