//! Bus interface implementations for the ICM-20948
//!
//! [`I2cInterface`] implements the `device-driver` [`RegisterInterface`] for
//! the primary device, and [`DirectInterface`] for reaching other devices on
//! the same host bus (a downstream device exposed through passthrough).

use crate::I2C_ADDRESS_AD0_LOW;

use device_driver::RegisterInterface;

/// Register access to devices other than the primary one on the host bus
///
/// Only meaningful while passthrough is enabled: the downstream device then
/// answers on the host bus at its own address.
pub trait DirectInterface: RegisterInterface<AddressType = u8> {
    /// Write `data` starting at `register` of the device at `address`
    ///
    /// # Errors
    ///
    /// Returns the transport error, including a NACK from an absent device.
    fn write_direct(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), <Self as RegisterInterface>::Error>;

    /// Read `buffer.len()` bytes starting at `register` of the device at `address`
    ///
    /// # Errors
    ///
    /// Returns the transport error, including a NACK from an absent device.
    fn read_direct(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), <Self as RegisterInterface>::Error>;
}

/// I2C interface for the ICM-20948
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface with the default address (0x68, AD0 pin LOW)
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let mut bridge = AuxBridge::new(interface, delay)?;
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS_AD0_LOW,
        }
    }

    /// Create a new I2C interface with the alternative address (0x69, AD0 pin HIGH)
    pub const fn alternative(i2c: I2C) -> Self {
        Self {
            i2c,
            address: crate::I2C_ADDRESS_AD0_HIGH,
        }
    }

    /// Create a new I2C interface with a custom device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Address of the primary device
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Write `register` followed by `data` to `address` in a single transfer
fn write_prefixed<I2C>(i2c: &mut I2C, address: u8, register: u8, data: &[u8]) -> Result<(), I2C::Error>
where
    I2C: embedded_hal::i2c::I2c,
{
    let mut buffer = [0u8; 33]; // Max: 1 address + 32 data bytes
    buffer[0] = register;
    let len = data.len().min(32);
    buffer[1..=len].copy_from_slice(&data[..len]);

    i2c.write(address, &buffer[..=len])
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len() for I2C
        write_prefixed(&mut self.i2c, self.address, address, write_data)
    }
}

impl<I2C, E> DirectInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    fn write_direct(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), E> {
        write_prefixed(&mut self.i2c, address, register, data)
    }

    fn read_direct(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<(), E> {
        self.i2c.write_read(address, &[register], buffer)
    }
}
