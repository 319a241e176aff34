//! Bring-up sequencing
//!
//! Getting the auxiliary master to talk to its downstream device depends on
//! the order of resets, enables and waits, and the working order differs
//! between boards. [`BringUpSequencer`] runs candidate [`BringUpRecipe`]s
//! and checks each by reading the downstream identity through the one-shot
//! lane. A failing recipe does not stop the next one from running: every
//! recipe starts with its own device reset.
//!
//! The sequencer drives the host bus as I2C, so a step that would set
//! `USER_CTRL.I2C_IF_DIS` is refused with [`Error::InvalidConfig`] before
//! anything is written. Once set, the primary device stops answering on I2C
//! until it is power cycled and no later recipe could run.
//!
//! # Example
//!
//! ```ignore
//! let mut sequencer = BringUpSequencer::new(&mut bridge);
//! match sequencer.run_all(&recipes::CANDIDATES) {
//!     Ok(outcome) => defmt::info!("{} works", outcome.recipe),
//!     Err(failures) => {
//!         for outcome in &failures {
//!             defmt::warn!("{}: {:?}", outcome.recipe, outcome.reason);
//!         }
//!     }
//! }
//! ```

mod outcome;
mod recipe;
pub mod recipes;

pub use outcome::{FailedStep, FailureReason, SequenceOutcome};
pub use recipe::{BringUpRecipe, Identity, RecipeStep, Step};

use crate::bridge::AuxBridge;
use crate::interface::DirectInterface;
use crate::registers::address::USER_CTRL;
use crate::registers::field_sets::UserCtrl;
use crate::{Bank, Error};
use embedded_hal::delay::DelayNs;

/// Runs bring-up recipes against a bridge
pub struct BringUpSequencer<'b, I, D> {
    bridge: &'b mut AuxBridge<I, D>,
}

impl<'b, I, D> BringUpSequencer<'b, I, D>
where
    I: DirectInterface,
    D: DelayNs,
{
    /// Borrow a bridge for the duration of the bring-up
    pub fn new(bridge: &'b mut AuxBridge<I, D>) -> Self {
        Self { bridge }
    }

    /// Run one recipe and verify the identity it should produce
    ///
    /// Steps run in order; the first error aborts the recipe and is reported
    /// with the failing step. When all steps succeed, the identity bytes are
    /// read through the one-shot lane and compared.
    pub fn run<'a>(&mut self, recipe: &BringUpRecipe<'a>) -> SequenceOutcome<'a> {
        let start = self.bridge.elapsed_ms();

        #[cfg(feature = "defmt")]
        defmt::info!("bring-up recipe '{}'", recipe.name);

        for (index, recipe_step) in recipe.steps.iter().enumerate() {
            if let Err(error) = self.execute(&recipe_step.step) {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "'{}' failed at step {} '{}'",
                    recipe.name,
                    index,
                    recipe_step.name
                );
                let failed = FailedStep {
                    index,
                    name: recipe_step.name,
                };
                return SequenceOutcome::failure(
                    recipe.name,
                    Some(failed),
                    FailureReason::from(&error),
                    self.bridge.clock.since(start),
                );
            }
        }

        match self.verify(&recipe.identity) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("'{}' verified", recipe.name);
                SequenceOutcome::success(recipe.name, self.bridge.clock.since(start))
            }
            Err(error) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("'{}' did not verify", recipe.name);
                SequenceOutcome::failure(
                    recipe.name,
                    None,
                    FailureReason::from(&error),
                    self.bridge.clock.since(start),
                )
            }
        }
    }

    /// Try recipes in order until one passes
    ///
    /// # Errors
    ///
    /// Returns every outcome, in recipe order, if no recipe passes.
    pub fn run_all<'a, const N: usize>(
        &mut self,
        recipes: &[BringUpRecipe<'a>; N],
    ) -> Result<SequenceOutcome<'a>, [SequenceOutcome<'a>; N]> {
        let mut failures = [SequenceOutcome::default(); N];
        for (slot, recipe) in failures.iter_mut().zip(recipes) {
            let outcome = self.run(recipe);
            if outcome.passed {
                return Ok(outcome);
            }
            *slot = outcome;
        }
        Err(failures)
    }

    fn execute(&mut self, step: &Step) -> Result<(), Error<I::Error>> {
        if disables_host_interface(step) {
            return Err(Error::InvalidConfig);
        }
        let bridge = &mut *self.bridge;
        match *step {
            Step::ResetDevice => bridge.reset_device(),
            Step::Wake(source) => bridge.wake(source),
            Step::SensorPower(config) => bridge.set_sensor_power(config),
            Step::SelectBank(bank) => bridge.registers().select_bank(bank),
            Step::Write {
                bank,
                register,
                value,
            } => bridge.write_register(bank, register, value),
            Step::Modify {
                bank,
                register,
                set,
                clear,
            } => bridge.modify_register(bank, register, set, clear),
            Step::Delay(ms) => {
                bridge.delay_ms(ms);
                Ok(())
            }
            Step::Passthrough(enabled) => bridge.set_passthrough(enabled),
            Step::AuxConfigure(config) => bridge.aux_configure(config),
            Step::AuxEnable(enabled) => bridge.aux_enable(enabled),
            Step::AuxReset => bridge.aux_reset(),
            Step::AuxDutyCycle(enabled) => bridge.set_aux_duty_cycled(enabled),
            Step::WaitReady => bridge.aux_wait_ready(),
            Step::OneShotWrite {
                address,
                register,
                value,
            } => bridge.one_shot_write(address, register, value),
            Step::DirectWrite {
                address,
                register,
                value,
            } => bridge.direct_write(address, register, value),
        }
    }

    fn verify(&mut self, identity: &Identity<'_>) -> Result<(), Error<I::Error>> {
        let mut register = identity.register;
        for &expected in identity.expected {
            let actual = self.bridge.one_shot_read(identity.address, register)?;
            if actual != expected {
                return Err(Error::IdentityMismatch { expected, actual });
            }
            register = register.wrapping_add(1);
        }
        Ok(())
    }
}

/// The step would switch off the I2C slave interface of the primary device
fn disables_host_interface(step: &Step) -> bool {
    match *step {
        Step::Write {
            bank: Bank::Bank0,
            register: USER_CTRL,
            value,
        }
        | Step::Modify {
            bank: Bank::Bank0,
            register: USER_CTRL,
            set: value,
            ..
        } => UserCtrl::from([value]).i_2_c_if_dis(),
        _ => false,
    }
}
