//! Device reset, wake-up and sensor power
//!
//! The auxiliary master is clocked from the primary device, so the device
//! must be awake with a running clock before the master can move bytes. The
//! master also derives its cycle from the gyro/accel output rate, which is
//! why most bring-up recipes switch every sensor on through `PWR_MGMT_2`.
//!
//! A reset returns the hardware to bank 0 with every auxiliary setting
//! cleared; the bridge forgets its cached bank, master state, lane layout and
//! passthrough flag along with it.

use crate::bridge::AuxBridge;
use crate::{Bank, Error};
use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;

/// Attempts at 1 ms spacing to see `DEVICE_RESET` clear after the reset wait
const RESET_POLL_ATTEMPTS: u32 = 10;

/// Clock source selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Internal 20 MHz oscillator
    Internal20MHz = 0,
    /// Auto-select best available clock
    AutoSelect = 1,
    /// Stop clock (lowest power)
    Stop = 7,
}

/// Individual sensor power control
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct SensorPowerConfig {
    /// Disable accelerometer X-axis
    pub disable_accel_x: bool,
    /// Disable accelerometer Y-axis
    pub disable_accel_y: bool,
    /// Disable accelerometer Z-axis
    pub disable_accel_z: bool,
    /// Disable gyroscope X-axis
    pub disable_gyro_x: bool,
    /// Disable gyroscope Y-axis
    pub disable_gyro_y: bool,
    /// Disable gyroscope Z-axis
    pub disable_gyro_z: bool,
}

impl SensorPowerConfig {
    /// Enable all sensors (`PWR_MGMT_2 = 0x00`)
    #[must_use]
    pub const fn all_enabled() -> Self {
        Self {
            disable_accel_x: false,
            disable_accel_y: false,
            disable_accel_z: false,
            disable_gyro_x: false,
            disable_gyro_y: false,
            disable_gyro_z: false,
        }
    }

    /// Enable or disable all axes of each sensor
    #[must_use]
    pub const fn sensors(accel: bool, gyro: bool) -> Self {
        Self {
            disable_accel_x: !accel,
            disable_accel_y: !accel,
            disable_accel_z: !accel,
            disable_gyro_x: !gyro,
            disable_gyro_y: !gyro,
            disable_gyro_z: !gyro,
        }
    }

    /// Check if all accelerometer axes are enabled
    #[must_use]
    pub const fn is_accel_enabled(&self) -> bool {
        !self.disable_accel_x && !self.disable_accel_y && !self.disable_accel_z
    }

    /// Check if all gyroscope axes are enabled
    #[must_use]
    pub const fn is_gyro_enabled(&self) -> bool {
        !self.disable_gyro_x && !self.disable_gyro_y && !self.disable_gyro_z
    }
}

impl<I, D> AuxBridge<I, D>
where
    I: RegisterInterface<AddressType = u8>,
    D: DelayNs,
{
    /// Reset the whole device and wake it with the auto-selected clock
    ///
    /// Waits the configured reset time, checks that `DEVICE_RESET` has
    /// cleared, then wakes the device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InitializationTimeout`] if the reset bit is still set
    /// after every attempt, or [`Error::Bus`] with the last transport error
    /// if the device never answered after the reset.
    pub fn reset_device(&mut self) -> Result<(), Error<I::Error>> {
        self.regs.select_bank(Bank::Bank0)?;
        self.regs.device().pwr_mgmt_1().write(|w| {
            w.set_device_reset(true);
        })?;
        self.forget_device_state();

        #[cfg(feature = "defmt")]
        defmt::debug!("device reset issued");

        self.clock.delay_ms(self.config.reset_ms);
        self.regs.select_bank(Bank::Bank0)?;

        let mut bus_error = None;
        let mut still_resetting = false;
        for _ in 0..RESET_POLL_ATTEMPTS {
            let read = self.regs.device().pwr_mgmt_1().read();
            match read {
                Ok(pwr_mgmt) if !pwr_mgmt.device_reset() => {
                    return self.wake(ClockSource::AutoSelect);
                }
                Ok(_) => still_resetting = true,
                Err(e) => bus_error = Some(e),
            }
            self.clock.delay_ms(1);
        }

        match bus_error {
            Some(e) if !still_resetting => Err(Error::Bus(e)),
            _ => Err(Error::InitializationTimeout),
        }
    }

    /// Leave sleep mode and select a clock source
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn wake(&mut self, source: ClockSource) -> Result<(), Error<I::Error>> {
        self.regs.select_bank(Bank::Bank0)?;
        self.regs.device().pwr_mgmt_1().write(|w| {
            w.set_sleep(false);
            w.set_clksel(source as u8);
        })?;
        self.clock.delay_ms(self.config.wake_ms);
        Ok(())
    }

    /// Put the device to sleep; the auxiliary master stops with it
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn sleep(&mut self) -> Result<(), Error<I::Error>> {
        self.regs.select_bank(Bank::Bank0)?;
        self.regs.device().pwr_mgmt_1().modify(|w| {
            w.set_sleep(true);
        })?;
        Ok(())
    }

    /// Power individual accelerometer and gyroscope axes
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_sensor_power(&mut self, config: SensorPowerConfig) -> Result<(), Error<I::Error>> {
        self.regs.select_bank(Bank::Bank0)?;
        self.regs.device().pwr_mgmt_2().write(|w| {
            w.set_disable_accel_x(config.disable_accel_x);
            w.set_disable_accel_y(config.disable_accel_y);
            w.set_disable_accel_z(config.disable_accel_z);
            w.set_disable_gyro_x(config.disable_gyro_x);
            w.set_disable_gyro_y(config.disable_gyro_y);
            w.set_disable_gyro_z(config.disable_gyro_z);
        })?;
        Ok(())
    }

    /// Switch all accelerometer and gyroscope axes on or off
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_sensors_enabled(&mut self, accel: bool, gyro: bool) -> Result<(), Error<I::Error>> {
        self.set_sensor_power(SensorPowerConfig::sensors(accel, gyro))
    }
}
