//! Auxiliary I2C master
//!
//! The ICM-20948's internal I2C master proxies transfers to devices wired
//! only to its private bus. The master goes through three states:
//!
//! ```text
//! Disabled --enable--> Enabling --settle window--> Ready --disable--> Disabled
//! ```
//!
//! Transactions are accepted only in `Ready`. Two kinds are available:
//! - **one-shot**: a single byte read or write on lane 4, completed by
//!   polling `I2C_MST_STATUS`
//! - **continuous**: lanes 0-3 repeat a read every master cycle and mirror
//!   the bytes into `EXT_SLV_SENS_DATA_xx`, where the host reads them at will
//!
//! # Example
//!
//! ```ignore
//! bridge.aux_configure(AuxMasterConfig::default())?;
//! bridge.aux_enable(true)?;
//! bridge.aux_wait_ready()?;
//!
//! let handle = bridge.request_one_shot(0x0C, 0x01, Direction::Read, None)?;
//! let result = bridge.poll_completion(handle, 500)?;
//! assert_eq!(result.data, Some(0x09));
//! ```

pub mod lane;
pub mod status;

pub use lane::{ContinuousLane, Direction, Lane, LaneControl, MirrorRegion};
pub use status::TransactionStatus;

use crate::bridge::AuxBridge;
use crate::{Bank, Error};
use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;
use lane::{MAX_ADDRESS, MAX_LANE_LENGTH, MIRROR_LEN};

/// Largest value of the clock and rate divider fields
const MAX_FIELD: u8 = 0x0F;

/// Auxiliary master state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AuxState {
    /// Master off
    Disabled,
    /// Master on, still inside the settle window
    Enabling,
    /// Master on and settled; transactions accepted
    Ready,
}

/// Auxiliary master configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AuxMasterConfig {
    /// `I2C_MST_CLK` divider (0-15); 7 gives 345.6 kHz
    pub clock: u8,
    /// Issue a stop between reads instead of a restart (`I2C_MST_P_NSR`)
    pub stop_between_reads: bool,
    /// `I2C_MST_ODR_CONFIG` rate divider (0-15), used while duty-cycled
    pub rate_divider: u8,
}

impl AuxMasterConfig {
    /// 345.6 kHz, stop between reads, rate divider 4
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clock: 7,
            stop_between_reads: true,
            rate_divider: 4,
        }
    }

    const fn is_valid(&self) -> bool {
        self.clock <= MAX_FIELD && self.rate_divider <= MAX_FIELD
    }
}

impl Default for AuxMasterConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// An issued one-shot transaction, redeemed with [`AuxBridge::poll_completion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use = "a one-shot transaction must be polled to completion"]
pub struct OneShotHandle {
    address: u8,
    register: u8,
    direction: Direction,
    issued_at_ms: u32,
}

impl OneShotHandle {
    /// Target device address
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Target register
    #[must_use]
    pub const fn register(&self) -> u8 {
        self.register
    }

    /// Transfer direction
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Bridge clock reading when the transaction was triggered
    #[must_use]
    pub const fn issued_at_ms(&self) -> u32 {
        self.issued_at_ms
    }
}

/// A completed one-shot transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OneShotResult {
    /// Byte read, `None` for writes
    pub data: Option<u8>,
    /// Number of status reads until completion
    pub polls: u32,
    /// Time spent polling
    pub elapsed_ms: u32,
}

impl<I, D> AuxBridge<I, D>
where
    I: RegisterInterface<AddressType = u8>,
    D: DelayNs,
{
    /// Current master state
    #[must_use]
    pub fn aux_state(&self) -> AuxState {
        match self.enabled_at {
            None => AuxState::Disabled,
            Some(at) if self.clock.since(at) >= self.config.settle_ms => AuxState::Ready,
            Some(_) => AuxState::Enabling,
        }
    }

    /// Last configuration written with [`aux_configure`](Self::aux_configure)
    #[must_use]
    pub const fn aux_config(&self) -> &AuxMasterConfig {
        &self.aux_config
    }

    /// Configure the master clock and rate divider
    ///
    /// Valid in any state; takes effect on the next enable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a field exceeds 15, or an error if
    /// communication with the device fails.
    pub fn aux_configure(&mut self, config: AuxMasterConfig) -> Result<(), Error<I::Error>> {
        if !config.is_valid() {
            return Err(Error::InvalidConfig);
        }

        self.regs.select_bank(Bank::Bank3)?;
        self.regs.device().bank_3_i_2_c_mst_odr_config().write(|w| {
            w.set_i_2_c_mst_odr_config(config.rate_divider);
        })?;
        self.regs.device().bank_3_i_2_c_mst_ctrl().write(|w| {
            w.set_i_2_c_mst_clk(config.clock);
            w.set_i_2_c_mst_p_nsr(config.stop_between_reads);
            w.set_mult_mst_en(false);
        })?;

        self.aux_config = config;
        Ok(())
    }

    /// Enable or disable the master
    ///
    /// Enabling starts the settle window; disabling takes effect at once.
    /// Enabling an already enabled master keeps the running window.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn aux_enable(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        self.regs.select_bank(Bank::Bank0)?;
        self.regs.device().user_ctrl().modify(|w| {
            w.set_i_2_c_mst_en(enable);
        })?;

        if !enable {
            self.enabled_at = None;
        } else if self.enabled_at.is_none() {
            self.enabled_at = Some(self.clock.elapsed_ms());
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("aux master {}", if enable { "enabling" } else { "disabled" });

        Ok(())
    }

    /// Block until the settle window has elapsed
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] if the master is disabled.
    pub fn aux_wait_ready(&mut self) -> Result<(), Error<I::Error>> {
        let at = self.enabled_at.ok_or(Error::NotReady)?;
        let remaining = self
            .config
            .settle_ms
            .saturating_sub(self.clock.since(at));
        self.clock.delay_ms(remaining);
        Ok(())
    }

    /// Reset the master (`I2C_MST_RST`) and leave it disabled
    ///
    /// Continuous lane placements are forgotten.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn aux_reset(&mut self) -> Result<(), Error<I::Error>> {
        self.regs.select_bank(Bank::Bank0)?;
        self.regs.device().user_ctrl().modify(|w| {
            w.set_i_2_c_mst_en(false);
            w.set_i_2_c_mst_rst(true);
        })?;

        self.enabled_at = None;
        self.layout.clear();
        Ok(())
    }

    /// Run the master duty-cycled at the configured rate instead of continuously
    ///
    /// Some boards only complete one-shot transfers with duty cycling off.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_aux_duty_cycled(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.regs.select_bank(Bank::Bank0)?;
        self.regs.device().lp_config().modify(|w| {
            w.set_i_2_c_mst_cycle(enabled);
        })?;
        Ok(())
    }

    /// Read and consume the master status word
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_status(&mut self) -> Result<TransactionStatus, Error<I::Error>> {
        self.regs.select_bank(Bank::Bank0)?;
        let status = self.regs.device().i_2_c_mst_status().read()?;
        Ok(TransactionStatus::from(status))
    }

    fn ensure_ready(&self) -> Result<(), Error<I::Error>> {
        match self.aux_state() {
            AuxState::Ready => Ok(()),
            _ => Err(Error::NotReady),
        }
    }

    /// Program and trigger a one-shot transaction on lane 4
    ///
    /// `data` is the byte to write and is required for [`Direction::Write`].
    /// The status word is read once first so stale flags from an earlier
    /// transaction cannot complete this one.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The master is not [`AuxState::Ready`] ([`Error::NotReady`])
    /// - `address` is not a 7-bit address, or a write has no data ([`Error::InvalidConfig`])
    /// - Communication with the device fails
    pub fn request_one_shot(
        &mut self,
        address: u8,
        register: u8,
        direction: Direction,
        data: Option<u8>,
    ) -> Result<OneShotHandle, Error<I::Error>> {
        self.ensure_ready()?;
        if address > MAX_ADDRESS {
            return Err(Error::InvalidConfig);
        }
        let out = match (direction, data) {
            (Direction::Write, None) => return Err(Error::InvalidConfig),
            (Direction::Write, Some(value)) => Some(value),
            (Direction::Read, _) => None,
        };

        let _ = self.read_status()?;

        self.regs.select_bank(Bank::Bank3)?;
        self.regs.device().bank_3_i_2_c_slv_4_addr().write(|w| {
            w.set_i_2_c_id_4(address);
            w.set_i_2_c_slv_4_rnw(direction == Direction::Read);
        })?;
        self.regs
            .device()
            .bank_3_i_2_c_slv_4_reg()
            .write(|w| w.set_i_2_c_slv_4_reg(register))?;
        if let Some(value) = out {
            self.regs
                .device()
                .bank_3_i_2_c_slv_4_do()
                .write(|w| w.set_i_2_c_slv_4_do(value))?;
        }
        self.regs.device().bank_3_i_2_c_slv_4_ctrl().write(|w| {
            w.set_i_2_c_slv_4_en(true);
            w.set_i_2_c_slv_4_int_en(false);
            w.set_i_2_c_slv_4_reg_dis(false);
            w.set_i_2_c_mst_dly(0);
        })?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "one-shot {:?} 0x{:02X}:0x{:02X} issued",
            direction,
            address,
            register
        );

        Ok(OneShotHandle {
            address,
            register,
            direction,
            issued_at_ms: self.clock.elapsed_ms(),
        })
    }

    /// Poll the status word until the one-shot transaction finishes
    ///
    /// Each poll waits one poll interval, then reads the status word. The
    /// waits are clipped so the total never exceeds `timeout_ms`; a
    /// transaction that has not finished by then fails with
    /// [`Error::Timeout`]. A timeout of 0 reads the status exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The master lost arbitration ([`Error::ArbitrationLost`])
    /// - The target did not acknowledge ([`Error::NotAcknowledged`])
    /// - The ceiling was reached ([`Error::Timeout`])
    /// - Communication with the device fails
    pub fn poll_completion(
        &mut self,
        handle: OneShotHandle,
        timeout_ms: u32,
    ) -> Result<OneShotResult, Error<I::Error>> {
        let start = self.clock.elapsed_ms();
        let polls = self.wait_one_shot(timeout_ms)?;

        let data = match handle.direction {
            Direction::Read => {
                self.regs.select_bank(Bank::Bank3)?;
                Some(self.regs.device().bank_3_i_2_c_slv_4_di().read()?.i_2_c_slv_4_di())
            }
            Direction::Write => None,
        };

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "one-shot 0x{:02X}:0x{:02X} done after {} polls",
            handle.address,
            handle.register,
            polls
        );

        Ok(OneShotResult {
            data,
            polls,
            elapsed_ms: self.clock.since(start),
        })
    }

    fn wait_one_shot(&mut self, timeout_ms: u32) -> Result<u32, Error<I::Error>> {
        let interval = self.config.poll_interval_ms.max(1);
        let mut waited = 0u32;
        let mut polls = 0u32;

        loop {
            let step = interval.min(timeout_ms - waited);
            self.clock.delay_ms(step);
            waited += step;
            polls += 1;

            let status = self.read_status()?;
            if status.arbitration_lost() {
                #[cfg(feature = "defmt")]
                defmt::debug!("one-shot lost arbitration (status 0x{:02X})", status.bits());
                return Err(Error::ArbitrationLost);
            }
            if status.nack(Lane::OneShot) {
                #[cfg(feature = "defmt")]
                defmt::debug!("one-shot NACK (status 0x{:02X})", status.bits());
                return Err(Error::NotAcknowledged);
            }
            if status.one_shot_done() {
                return Ok(polls);
            }
            if waited >= timeout_ms {
                #[cfg(feature = "defmt")]
                defmt::debug!("one-shot timed out after {} ms", waited);
                return Err(Error::Timeout);
            }
        }
    }

    /// Read one downstream register through the one-shot lane
    ///
    /// Uses the configured poll ceiling.
    ///
    /// # Errors
    ///
    /// See [`request_one_shot`](Self::request_one_shot) and
    /// [`poll_completion`](Self::poll_completion).
    pub fn one_shot_read(&mut self, address: u8, register: u8) -> Result<u8, Error<I::Error>> {
        let _handle = self.request_one_shot(address, register, Direction::Read, None)?;
        self.wait_one_shot(self.config.poll_timeout_ms)?;
        self.regs.select_bank(Bank::Bank3)?;
        Ok(self.regs.device().bank_3_i_2_c_slv_4_di().read()?.i_2_c_slv_4_di())
    }

    /// Write one downstream register through the one-shot lane
    ///
    /// Uses the configured poll ceiling.
    ///
    /// # Errors
    ///
    /// See [`request_one_shot`](Self::request_one_shot) and
    /// [`poll_completion`](Self::poll_completion).
    pub fn one_shot_write(
        &mut self,
        address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        let _handle = self.request_one_shot(address, register, Direction::Write, Some(value))?;
        self.wait_one_shot(self.config.poll_timeout_ms)?;
        Ok(())
    }

    /// Set up a continuous lane to mirror `count` downstream registers
    ///
    /// The lane repeats the read every master cycle and deposits the bytes in
    /// the mirrored buffer at the returned region. A `count` of 0 disables
    /// the lane.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The master is not [`AuxState::Ready`] ([`Error::NotReady`])
    /// - `address` is not 7-bit, `count` exceeds 15, or the enabled lanes no
    ///   longer fit in the 24-byte buffer ([`Error::InvalidConfig`])
    /// - Communication with the device fails
    pub fn configure_continuous_mirror(
        &mut self,
        lane: ContinuousLane,
        address: u8,
        start_register: u8,
        count: u8,
    ) -> Result<MirrorRegion, Error<I::Error>> {
        self.ensure_ready()?;
        if address > MAX_ADDRESS || count > MAX_LANE_LENGTH {
            return Err(Error::InvalidConfig);
        }
        let region = self
            .layout
            .with_length(lane, count)
            .ok_or(Error::InvalidConfig)?;

        self.program_lane(
            lane,
            address,
            Direction::Read,
            start_register,
            None,
            LaneControl::transfer(count),
        )?;
        self.layout.set(lane, count);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "lane {} mirrors 0x{:02X}:0x{:02X} x{} at offset {}",
            lane.index(),
            address,
            start_register,
            count,
            region.offset
        );

        Ok(region)
    }

    /// Set up a continuous lane to write `value` to a downstream register every cycle
    ///
    /// Write lanes occupy no space in the mirrored buffer.
    ///
    /// # Errors
    ///
    /// Same conditions as [`configure_continuous_mirror`](Self::configure_continuous_mirror).
    pub fn configure_continuous_write(
        &mut self,
        lane: ContinuousLane,
        address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        self.ensure_ready()?;
        if address > MAX_ADDRESS {
            return Err(Error::InvalidConfig);
        }

        self.program_lane(
            lane,
            address,
            Direction::Write,
            register,
            Some(value),
            LaneControl::transfer(1),
        )?;
        self.layout.set(lane, 0);
        Ok(())
    }

    /// Stop a continuous lane
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn disable_continuous_lane(&mut self, lane: ContinuousLane) -> Result<(), Error<I::Error>> {
        self.regs.select_bank(Bank::Bank3)?;
        self.regs
            .device()
            .bank_3_i_2_c_slv_ctrl(lane.slot())
            .write(|w| w.set_i_2_c_slv_en(false))?;
        self.layout.set(lane, 0);
        Ok(())
    }

    fn program_lane(
        &mut self,
        lane: ContinuousLane,
        address: u8,
        direction: Direction,
        register: u8,
        out: Option<u8>,
        control: LaneControl,
    ) -> Result<(), Error<I::Error>> {
        let slot = lane.slot();
        self.regs.select_bank(Bank::Bank3)?;
        let device = self.regs.device();
        device.bank_3_i_2_c_slv_addr(slot).write(|w| {
            w.set_i_2_c_id(address);
            w.set_i_2_c_slv_rnw(direction == Direction::Read);
        })?;
        device
            .bank_3_i_2_c_slv_reg(slot)
            .write(|w| w.set_i_2_c_slv_reg(register))?;
        if let Some(value) = out {
            device
                .bank_3_i_2_c_slv_do(slot)
                .write(|w| w.set_i_2_c_slv_do(value))?;
        }
        device
            .bank_3_i_2_c_slv_ctrl(slot)
            .write(|w| control.apply(w))?;
        Ok(())
    }

    /// Where a continuous lane's bytes land in the mirrored buffer
    #[must_use]
    pub fn mirror_region(&self, lane: ContinuousLane) -> MirrorRegion {
        self.layout.region(lane)
    }

    /// Read the latest bytes mirrored by a continuous lane
    ///
    /// Reads at most the lane's length and returns the number of bytes
    /// copied. Bytes can come from different hardware cycles; freshness is
    /// judged by the downstream device's own status bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_mirror(
        &mut self,
        lane: ContinuousLane,
        buffer: &mut [u8],
    ) -> Result<usize, Error<I::Error>> {
        let region = self.layout.region(lane);
        let len = buffer.len().min(usize::from(region.len));
        if len == 0 {
            return Ok(0);
        }
        let mirror = self.read_mirror_block()?;
        let start = usize::from(region.offset);
        buffer[..len].copy_from_slice(&mirror[start..start + len]);
        Ok(len)
    }

    /// Read raw bytes of the mirrored buffer
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the range leaves the 24-byte
    /// buffer, or an error if communication with the device fails.
    pub fn read_mirror_raw(&mut self, offset: u8, buffer: &mut [u8]) -> Result<(), Error<I::Error>> {
        let start = usize::from(offset);
        if start + buffer.len() > MIRROR_LEN {
            return Err(Error::InvalidConfig);
        }
        if buffer.is_empty() {
            return Ok(());
        }
        let mirror = self.read_mirror_block()?;
        buffer.copy_from_slice(&mirror[start..start + buffer.len()]);
        Ok(())
    }

    /// All 24 mirrored bytes in one burst
    fn read_mirror_block(&mut self) -> Result<[u8; MIRROR_LEN], Error<I::Error>> {
        self.regs.select_bank(Bank::Bank0)?;
        Ok(self.regs.device().ext_slv_sens_data().read()?.into())
    }
}
