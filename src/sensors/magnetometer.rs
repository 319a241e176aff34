//! AK09916 magnetometer behind the auxiliary bus
//!
//! The AK09916 sits on the ICM-20948's private bus at 0x0C. Identity, soft
//! reset and mode changes go through the one-shot lane; streaming uses one
//! continuous lane mirroring the 9 bytes from `ST1` to `ST2`:
//!
//! | offset | register | content |
//! |---|---|---|
//! | 0 | ST1 | bit 0 DRDY, bit 1 DOR |
//! | 1-6 | HXL..HZH | X, Y, Z little endian |
//! | 7 | TMPS | dummy |
//! | 8 | ST2 | bit 3 HOFL |
//!
//! The chip latches a new sample when `ST2` is read, so every mirror cycle
//! releases the next one.

use crate::aux_bus::{ContinuousLane, MirrorRegion};
use crate::bridge::AuxBridge;
use crate::Error;
use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;

/// AK09916 magnetometer I2C address
pub const AK09916_I2C_ADDRESS: u8 = 0x0C;

/// AK09916 company ID register
pub const AK09916_REG_WIA1: u8 = 0x00;

/// Expected company ID (AKM)
pub const AK09916_WIA1_VALUE: u8 = 0x48;

/// AK09916 device ID register
pub const AK09916_REG_WIA2: u8 = 0x01;

/// Expected device ID for AK09916
pub const AK09916_WIA2_VALUE: u8 = 0x09;

/// AK09916 Status 1 register address
pub const AK09916_REG_ST1: u8 = 0x10;

/// AK09916 measurement data start register (HXL)
pub const AK09916_REG_HXL: u8 = 0x11;

/// AK09916 Status 2 register address
pub const AK09916_REG_ST2: u8 = 0x18;

/// AK09916 Control 2 register address (mode control)
pub const AK09916_REG_CNTL2: u8 = 0x31;

/// AK09916 Control 3 register address (reset)
pub const AK09916_REG_CNTL3: u8 = 0x32;

/// Soft reset bit of CNTL3
pub const AK09916_CNTL3_SRST: u8 = 0x01;

/// Bytes mirrored per sample, `ST1` through `ST2`
pub const MAG_SNAPSHOT_LEN: u8 = 9;

/// Wait after a soft reset
const SOFT_RESET_MS: u32 = 100;

/// Wait after a mode change before reading it back
const MODE_CHANGE_MS: u32 = 10;

const ST1_DRDY: u8 = 1 << 0;
const ST1_DOR: u8 = 1 << 1;
const ST2_HOFL: u8 = 1 << 3;

/// Magnetometer operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MagMode {
    /// Power-down mode
    PowerDown = 0x00,
    /// Single measurement mode
    Single = 0x01,
    /// Continuous measurement mode 1 (10 Hz)
    Continuous10Hz = 0x02,
    /// Continuous measurement mode 2 (20 Hz)
    Continuous20Hz = 0x04,
    /// Continuous measurement mode 3 (50 Hz)
    Continuous50Hz = 0x06,
    /// Continuous measurement mode 4 (100 Hz)
    Continuous100Hz = 0x08,
    /// Self-test mode
    SelfTest = 0x10,
}

impl MagMode {
    /// Continuous mode fast enough for a host sample rate
    ///
    /// 100 Hz and above map to 100 Hz, 50 to 50 Hz, 20 to 20 Hz, anything
    /// slower to 10 Hz.
    #[must_use]
    pub const fn for_sample_rate(rate_hz: u32) -> Self {
        match rate_hz {
            100.. => Self::Continuous100Hz,
            50.. => Self::Continuous50Hz,
            20.. => Self::Continuous20Hz,
            _ => Self::Continuous10Hz,
        }
    }

    /// Get the sample rate in Hz for continuous modes
    #[must_use]
    pub const fn sample_rate_hz(self) -> Option<u8> {
        match self {
            Self::Continuous10Hz => Some(10),
            Self::Continuous20Hz => Some(20),
            Self::Continuous50Hz => Some(50),
            Self::Continuous100Hz => Some(100),
            _ => None,
        }
    }

    /// Check if this is a continuous measurement mode
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        matches!(
            self,
            Self::Continuous10Hz
                | Self::Continuous20Hz
                | Self::Continuous50Hz
                | Self::Continuous100Hz
        )
    }
}

/// Magnetometer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagConfig {
    /// Operating mode
    pub mode: MagMode,
    /// Continuous lane used for streaming
    pub lane: ContinuousLane,
}

impl MagConfig {
    /// Configuration for a host sample rate, streaming on lane 0
    #[must_use]
    pub const fn for_sample_rate(rate_hz: u32) -> Self {
        Self {
            mode: MagMode::for_sample_rate(rate_hz),
            lane: ContinuousLane::Lane0,
        }
    }
}

impl Default for MagConfig {
    fn default() -> Self {
        Self {
            mode: MagMode::Continuous100Hz,
            lane: ContinuousLane::Lane0,
        }
    }
}

/// One mirrored magnetometer sample, undecoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagSnapshot {
    /// Raw X-axis field
    pub x: i16,
    /// Raw Y-axis field
    pub y: i16,
    /// Raw Z-axis field
    pub z: i16,
    /// `ST1` status byte
    pub st1: u8,
    /// `ST2` status byte
    pub st2: u8,
}

impl MagSnapshot {
    /// Decode the 9 mirrored bytes `ST1..=ST2`
    #[must_use]
    pub const fn from_bytes(bytes: &[u8; MAG_SNAPSHOT_LEN as usize]) -> Self {
        Self {
            st1: bytes[0],
            x: i16::from_le_bytes([bytes[1], bytes[2]]),
            y: i16::from_le_bytes([bytes[3], bytes[4]]),
            z: i16::from_le_bytes([bytes[5], bytes[6]]),
            st2: bytes[8],
        }
    }

    /// A new measurement was available when the lane read it
    #[must_use]
    pub const fn data_ready(&self) -> bool {
        self.st1 & ST1_DRDY != 0
    }

    /// At least one measurement was skipped since the previous read
    #[must_use]
    pub const fn overrun(&self) -> bool {
        self.st1 & ST1_DOR != 0
    }

    /// The field exceeded the measurement range; axis values are invalid
    #[must_use]
    pub const fn overflow(&self) -> bool {
        self.st2 & ST2_HOFL != 0
    }

    /// New and in range
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        self.data_ready() && !self.overflow()
    }
}

impl<I, D> AuxBridge<I, D>
where
    I: RegisterInterface<AddressType = u8>,
    D: DelayNs,
{
    /// Read `WIA1` and `WIA2` through the one-shot lane
    ///
    /// # Errors
    ///
    /// Returns the one-shot error of whichever read failed.
    pub fn read_magnetometer_identity(&mut self) -> Result<[u8; 2], Error<I::Error>> {
        let company = self.one_shot_read(AK09916_I2C_ADDRESS, AK09916_REG_WIA1)?;
        let device = self.one_shot_read(AK09916_I2C_ADDRESS, AK09916_REG_WIA2)?;
        Ok([company, device])
    }

    /// Check that the downstream device is an AK09916
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdentityMismatch`] for the first byte that differs,
    /// or the one-shot error of a failed read.
    pub fn verify_magnetometer(&mut self) -> Result<(), Error<I::Error>> {
        let identity = self.read_magnetometer_identity()?;
        for (expected, actual) in [AK09916_WIA1_VALUE, AK09916_WIA2_VALUE]
            .into_iter()
            .zip(identity)
        {
            if expected != actual {
                #[cfg(feature = "defmt")]
                defmt::error!(
                    "AK09916 identity mismatch: expected 0x{:02X}, read 0x{:02X}",
                    expected,
                    actual
                );
                return Err(Error::IdentityMismatch { expected, actual });
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("AK09916 identity verified");

        Ok(())
    }

    /// Soft reset the magnetometer and wait for it to come back
    ///
    /// # Errors
    ///
    /// Returns the one-shot error if the write fails.
    pub fn magnetometer_soft_reset(&mut self) -> Result<(), Error<I::Error>> {
        self.one_shot_write(AK09916_I2C_ADDRESS, AK09916_REG_CNTL3, AK09916_CNTL3_SRST)?;
        self.clock.delay_ms(SOFT_RESET_MS);
        Ok(())
    }

    /// Set the measurement mode and read it back
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModeMismatch`] with the value read back if the mode
    /// did not stick, or the one-shot error of a failed transfer.
    pub fn set_magnetometer_mode(&mut self, mode: MagMode) -> Result<(), Error<I::Error>> {
        self.one_shot_write(AK09916_I2C_ADDRESS, AK09916_REG_CNTL2, mode as u8)?;
        self.clock.delay_ms(MODE_CHANGE_MS);

        let readback = self.one_shot_read(AK09916_I2C_ADDRESS, AK09916_REG_CNTL2)?;
        if readback != mode as u8 {
            return Err(Error::ModeMismatch(readback));
        }
        Ok(())
    }

    /// Mirror `ST1..=ST2` on a continuous lane
    ///
    /// # Errors
    ///
    /// See [`configure_continuous_mirror`](Self::configure_continuous_mirror).
    pub fn start_magnetometer_mirror(
        &mut self,
        lane: ContinuousLane,
    ) -> Result<MirrorRegion, Error<I::Error>> {
        self.configure_continuous_mirror(lane, AK09916_I2C_ADDRESS, AK09916_REG_ST1, MAG_SNAPSHOT_LEN)
    }

    /// Full streaming setup: reset, identity check, mode, mirror
    ///
    /// The auxiliary master must already be [`Ready`](crate::AuxState::Ready).
    ///
    /// # Errors
    ///
    /// Returns the first error of the individual steps.
    pub fn init_magnetometer(&mut self, config: MagConfig) -> Result<MirrorRegion, Error<I::Error>> {
        self.magnetometer_soft_reset()?;
        self.verify_magnetometer()?;
        self.set_magnetometer_mode(config.mode)?;
        self.start_magnetometer_mirror(config.lane)
    }

    /// Read the latest mirrored sample
    ///
    /// Check [`MagSnapshot::is_fresh`] before using the axis values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the lane does not mirror a full
    /// sample, or an error if communication with the device fails.
    pub fn read_magnetometer_snapshot(
        &mut self,
        lane: ContinuousLane,
    ) -> Result<MagSnapshot, Error<I::Error>> {
        let mut bytes = [0u8; MAG_SNAPSHOT_LEN as usize];
        if self.read_mirror(lane, &mut bytes)? != bytes.len() {
            return Err(Error::InvalidConfig);
        }
        Ok(MagSnapshot::from_bytes(&bytes))
    }
}
