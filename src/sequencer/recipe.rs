//! Bring-up recipes as data

use crate::aux_bus::AuxMasterConfig;
use crate::power::{ClockSource, SensorPowerConfig};
use crate::Bank;

/// One action of a bring-up recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Reset the device and wake it with the auto-selected clock
    ResetDevice,
    /// Wake with a specific clock source
    Wake(ClockSource),
    /// Power accelerometer and gyroscope axes (`PWR_MGMT_2`)
    SensorPower(SensorPowerConfig),
    /// Select a register bank
    SelectBank(Bank),
    /// Write a register
    Write {
        /// Bank of the register
        bank: Bank,
        /// Register address
        register: u8,
        /// Value written
        value: u8,
    },
    /// Read-modify-write a register
    Modify {
        /// Bank of the register
        bank: Bank,
        /// Register address
        register: u8,
        /// Bits to set
        set: u8,
        /// Bits to clear
        clear: u8,
    },
    /// Wait on the bridge clock
    Delay(u32),
    /// Switch passthrough on or off
    Passthrough(bool),
    /// Configure the auxiliary master
    AuxConfigure(AuxMasterConfig),
    /// Enable or disable the auxiliary master
    AuxEnable(bool),
    /// Reset the auxiliary master
    AuxReset,
    /// Duty-cycle the auxiliary master
    AuxDutyCycle(bool),
    /// Wait out the rest of the settle window
    WaitReady,
    /// Write a downstream register through the one-shot lane
    OneShotWrite {
        /// Downstream device address
        address: u8,
        /// Downstream register
        register: u8,
        /// Value written
        value: u8,
    },
    /// Write a downstream register directly while passthrough is on
    DirectWrite {
        /// Downstream device address
        address: u8,
        /// Downstream register
        register: u8,
        /// Value written
        value: u8,
    },
}

/// A step with a human readable name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecipeStep<'a> {
    /// Name reported when the step fails
    pub name: &'a str,
    /// The action
    pub step: Step,
}

impl<'a> RecipeStep<'a> {
    /// Name a step
    #[must_use]
    pub const fn new(name: &'a str, step: Step) -> Self {
        Self { name, step }
    }
}

/// Identity registers of the downstream device that prove the bridge works
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity<'a> {
    /// Downstream device address
    pub address: u8,
    /// First identity register; further bytes are read from consecutive registers
    pub register: u8,
    /// Expected identity bytes
    pub expected: &'a [u8],
}

/// A named, ordered bring-up sequence and the identity it must produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BringUpRecipe<'a> {
    /// Recipe name
    pub name: &'a str,
    /// Steps, run in order
    pub steps: &'a [RecipeStep<'a>],
    /// Identity read after the last step
    pub identity: Identity<'a>,
}

impl<'a> BringUpRecipe<'a> {
    /// Assemble a recipe
    #[must_use]
    pub const fn new(name: &'a str, steps: &'a [RecipeStep<'a>], identity: Identity<'a>) -> Self {
        Self {
            name,
            steps,
            identity,
        }
    }
}
