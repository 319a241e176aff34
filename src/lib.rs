#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod aux_bus;
pub mod banked;
pub mod bridge;
pub mod clock;
pub mod interface;
pub mod passthrough;
pub mod power;
pub mod registers;
pub mod sensors;
pub mod sequencer;

// Re-export main types
pub use aux_bus::{
    AuxMasterConfig, AuxState, ContinuousLane, Direction, Lane, MirrorRegion, OneShotHandle,
    OneShotResult, TransactionStatus,
};
pub use banked::BankedRegisters;
pub use bridge::{AuxBridge, BridgeConfig};
pub use clock::Clock;
pub use interface::{DirectInterface, I2cInterface};
pub use power::ClockSource;
pub use sensors::{MagConfig, MagMode, MagSnapshot};
pub use sequencer::{
    BringUpRecipe, BringUpSequencer, FailureReason, Identity, RecipeStep, SequenceOutcome, Step,
};

/// ICM-20948 I2C address when AD0 pin is low (default: 0x68)
///
/// This is the most common configuration. The AD0 pin is typically pulled low
/// or left floating (has internal pull-down). Use [`I2cInterface::default()`]
/// for this configuration.
pub const I2C_ADDRESS_AD0_LOW: u8 = 0x68;

/// ICM-20948 I2C address when AD0 pin is high (alternative: 0x69)
///
/// Use this address when the AD0 pin is explicitly pulled high to VDD.
/// Use [`I2cInterface::alternative()`] for this configuration.
pub const I2C_ADDRESS_AD0_HIGH: u8 = 0x69;

/// Expected value of `WHO_AM_I` register
pub const WHO_AM_I_VALUE: u8 = 0xEA;

/// Register bank identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bank {
    /// Bank 0 - user control, power, bypass, master status and mirror buffer
    Bank0 = 0,
    /// Bank 1 - Self-test and offsets
    Bank1 = 1,
    /// Bank 2 - Gyro and accelerometer configuration
    Bank2 = 2,
    /// Bank 3 - I2C master configuration and proxy lanes
    Bank3 = 3,
}

impl Bank {
    /// Bank for a raw index (0-3)
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Bank0),
            1 => Some(Self::Bank1),
            2 => Some(Self::Bank2),
            3 => Some(Self::Bank3),
            _ => None,
        }
    }

    /// Value written to `REG_BANK_SEL` to select this bank
    #[must_use]
    pub const fn select_value(self) -> u8 {
        (self as u8) << 4
    }
}

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Invalid `WHO_AM_I` register value (contains the actual value read)
    InvalidDevice(u8),
    /// Invalid configuration parameter (lane, length, address or field out of range)
    InvalidConfig,
    /// The auxiliary master is not enabled, or still inside its settle window
    NotReady,
    /// A one-shot transaction did not complete before the poll ceiling
    Timeout,
    /// The auxiliary master lost bus arbitration
    ArbitrationLost,
    /// The downstream device did not acknowledge
    NotAcknowledged,
    /// Downstream identity bytes differ from the expected ones
    IdentityMismatch {
        /// Expected identity byte
        expected: u8,
        /// Identity byte actually read
        actual: u8,
    },
    /// A downstream mode register did not read back the written mode
    ModeMismatch(u8),
    /// Initialization timed out (device did not reset or wake as expected)
    InitializationTimeout,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus error: {e:?}"),
            Self::InvalidDevice(id) => write!(f, "unexpected WHO_AM_I 0x{id:02X}"),
            Self::InvalidConfig => f.write_str("invalid configuration"),
            Self::NotReady => f.write_str("auxiliary master not ready"),
            Self::Timeout => f.write_str("auxiliary transaction timed out"),
            Self::ArbitrationLost => f.write_str("auxiliary bus arbitration lost"),
            Self::NotAcknowledged => f.write_str("downstream device did not acknowledge"),
            Self::IdentityMismatch { expected, actual } => write!(
                f,
                "identity mismatch: expected 0x{expected:02X}, read 0x{actual:02X}"
            ),
            Self::ModeMismatch(mode) => write!(f, "mode read back as 0x{mode:02X}"),
            Self::InitializationTimeout => f.write_str("device did not come out of reset"),
        }
    }
}
