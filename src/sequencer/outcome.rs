//! Results of running a recipe

use crate::Error;

/// Why a recipe failed, without the transport error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailureReason {
    /// Transport failure
    Bus,
    /// Primary device identity was wrong
    InvalidDevice(u8),
    /// A step carried an out-of-range parameter
    InvalidConfig,
    /// The auxiliary master was not ready for a transaction
    NotReady,
    /// A one-shot transaction never completed
    Timeout,
    /// The auxiliary master lost arbitration
    ArbitrationLost,
    /// The downstream device did not acknowledge
    NotAcknowledged,
    /// The downstream identity did not match
    IdentityMismatch {
        /// Expected identity byte
        expected: u8,
        /// Identity byte read
        actual: u8,
    },
    /// A mode register read back a different value
    ModeMismatch(u8),
    /// The device did not come out of reset
    InitializationTimeout,
}

impl<E> From<&Error<E>> for FailureReason {
    fn from(error: &Error<E>) -> Self {
        match *error {
            Error::Bus(_) => Self::Bus,
            Error::InvalidDevice(id) => Self::InvalidDevice(id),
            Error::InvalidConfig => Self::InvalidConfig,
            Error::NotReady => Self::NotReady,
            Error::Timeout => Self::Timeout,
            Error::ArbitrationLost => Self::ArbitrationLost,
            Error::NotAcknowledged => Self::NotAcknowledged,
            Error::IdentityMismatch { expected, actual } => {
                Self::IdentityMismatch { expected, actual }
            }
            Error::ModeMismatch(mode) => Self::ModeMismatch(mode),
            Error::InitializationTimeout => Self::InitializationTimeout,
        }
    }
}

/// The step that aborted a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FailedStep<'a> {
    /// Position in the recipe
    pub index: usize,
    /// Step name
    pub name: &'a str,
}

/// Result of running one recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceOutcome<'a> {
    /// Recipe name
    pub recipe: &'a str,
    /// The identity verified
    pub passed: bool,
    /// Step that failed; `None` when all steps ran (or the recipe passed)
    pub failed_step: Option<FailedStep<'a>>,
    /// Failure cause; `None` when the recipe passed
    pub reason: Option<FailureReason>,
    /// Bridge clock time spent on the recipe
    pub elapsed_ms: u32,
}

impl<'a> SequenceOutcome<'a> {
    pub(crate) const fn success(recipe: &'a str, elapsed_ms: u32) -> Self {
        Self {
            recipe,
            passed: true,
            failed_step: None,
            reason: None,
            elapsed_ms,
        }
    }

    pub(crate) const fn failure(
        recipe: &'a str,
        failed_step: Option<FailedStep<'a>>,
        reason: FailureReason,
        elapsed_ms: u32,
    ) -> Self {
        Self {
            recipe,
            passed: false,
            failed_step,
            reason: Some(reason),
            elapsed_ms,
        }
    }

    /// The recipe failed while verifying the identity, after all steps ran
    #[must_use]
    pub const fn failed_verification(&self) -> bool {
        !self.passed && self.failed_step.is_none()
    }
}
