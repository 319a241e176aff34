//! Candidate bring-up recipes for the AK09916
//!
//! Boards differ in which order of resets and enables gets the auxiliary
//! master talking to the magnetometer. These are the orders seen to work on
//! at least one board; [`CANDIDATES`] tries them in turn.

use super::recipe::{BringUpRecipe, Identity, RecipeStep, Step};
use crate::aux_bus::AuxMasterConfig;
use crate::power::SensorPowerConfig;
use crate::registers::address::{INT_PIN_CFG, LP_CONFIG, USER_CTRL};
use crate::sensors::magnetometer::{
    AK09916_CNTL3_SRST, AK09916_I2C_ADDRESS, AK09916_REG_CNTL3, AK09916_REG_WIA1,
    AK09916_WIA1_VALUE, AK09916_WIA2_VALUE,
};
use crate::Bank;

/// `USER_CTRL`: `I2C_MST_RST` and `SRAM_RST`, master off
const USER_CTRL_RESET_MASTER: u8 = 0x06;
/// `USER_CTRL`: `I2C_MST_EN`
const USER_CTRL_MASTER_ON: u8 = 0x20;

/// 345.6 kHz with a restart between reads
const MASTER_RESTART: AuxMasterConfig = AuxMasterConfig {
    clock: 7,
    stop_between_reads: false,
    rate_divider: 4,
};

/// `WIA1` = 0x48, `WIA2` = 0x09 at 0x0C
pub const AK09916_IDENTITY: Identity<'static> = Identity {
    address: AK09916_I2C_ADDRESS,
    register: AK09916_REG_WIA1,
    expected: &[AK09916_WIA1_VALUE, AK09916_WIA2_VALUE],
};

const fn write(bank: Bank, register: u8, value: u8) -> Step {
    Step::Write {
        bank,
        register,
        value,
    }
}

const RESET_MASTER_FIRST_STEPS: &[RecipeStep<'static>] = &[
    RecipeStep::new("reset device", Step::ResetDevice),
    RecipeStep::new("disable bypass", write(Bank::Bank0, INT_PIN_CFG, 0x00)),
    RecipeStep::new(
        "reset I2C master",
        write(Bank::Bank0, USER_CTRL, USER_CTRL_RESET_MASTER),
    ),
    RecipeStep::new("wait for master reset", Step::Delay(100)),
    RecipeStep::new("disable duty cycling", write(Bank::Bank0, LP_CONFIG, 0x00)),
    RecipeStep::new(
        "configure I2C master",
        Step::AuxConfigure(AuxMasterConfig::new()),
    ),
    RecipeStep::new(
        "enable I2C master",
        write(Bank::Bank0, USER_CTRL, USER_CTRL_MASTER_ON),
    ),
    RecipeStep::new("wait for master", Step::Delay(100)),
];

/// Reset the master before touching its configuration
pub const RESET_MASTER_FIRST: BringUpRecipe<'static> = BringUpRecipe::new(
    "reset-master-first",
    RESET_MASTER_FIRST_STEPS,
    AK09916_IDENTITY,
);

const SENSORS_ON_FIRST_STEPS: &[RecipeStep<'static>] = &[
    RecipeStep::new("reset device", Step::ResetDevice),
    RecipeStep::new(
        "enable accel and gyro",
        Step::SensorPower(SensorPowerConfig::all_enabled()),
    ),
    RecipeStep::new("wait for sensors", Step::Delay(50)),
    RecipeStep::new("disable bypass", write(Bank::Bank0, INT_PIN_CFG, 0x00)),
    RecipeStep::new(
        "configure I2C master",
        Step::AuxConfigure(AuxMasterConfig::new()),
    ),
    RecipeStep::new("enable I2C master", Step::AuxEnable(true)),
    RecipeStep::new("wait for master", Step::Delay(100)),
];

/// Power every sensor before enabling the master, so it has a clock to follow
pub const SENSORS_ON_FIRST: BringUpRecipe<'static> = BringUpRecipe::new(
    "sensors-on-first",
    SENSORS_ON_FIRST_STEPS,
    AK09916_IDENTITY,
);

const BYPASS_RESET_MAGNETOMETER_STEPS: &[RecipeStep<'static>] = &[
    RecipeStep::new("reset device", Step::ResetDevice),
    RecipeStep::new("enable bypass", Step::Passthrough(true)),
    RecipeStep::new("wait for bypass", Step::Delay(50)),
    RecipeStep::new(
        "soft reset magnetometer",
        Step::DirectWrite {
            address: AK09916_I2C_ADDRESS,
            register: AK09916_REG_CNTL3,
            value: AK09916_CNTL3_SRST,
        },
    ),
    RecipeStep::new("wait for magnetometer", Step::Delay(100)),
    RecipeStep::new("disable bypass", Step::Passthrough(false)),
    RecipeStep::new("wait for bypass", Step::Delay(50)),
    RecipeStep::new(
        "configure I2C master",
        Step::AuxConfigure(AuxMasterConfig::new()),
    ),
    RecipeStep::new("enable I2C master", Step::AuxEnable(true)),
    RecipeStep::new("wait for master", Step::Delay(100)),
];

/// Soft reset the magnetometer over bypass before handing it to the master
pub const BYPASS_RESET_MAGNETOMETER: BringUpRecipe<'static> = BringUpRecipe::new(
    "bypass-reset-magnetometer",
    BYPASS_RESET_MAGNETOMETER_STEPS,
    AK09916_IDENTITY,
);

const RESTART_BETWEEN_READS_STEPS: &[RecipeStep<'static>] = &[
    RecipeStep::new("reset device", Step::ResetDevice),
    RecipeStep::new("disable bypass", write(Bank::Bank0, INT_PIN_CFG, 0x00)),
    RecipeStep::new("configure I2C master", Step::AuxConfigure(MASTER_RESTART)),
    RecipeStep::new("enable I2C master", Step::AuxEnable(true)),
    RecipeStep::new("wait for master", Step::Delay(100)),
];

/// Use a restart instead of a stop between reads
pub const RESTART_BETWEEN_READS: BringUpRecipe<'static> = BringUpRecipe::new(
    "restart-between-reads",
    RESTART_BETWEEN_READS_STEPS,
    AK09916_IDENTITY,
);

/// All candidate recipes in the order they are tried
pub const CANDIDATES: [BringUpRecipe<'static>; 4] = [
    RESET_MASTER_FIRST,
    SENSORS_ON_FIRST,
    BYPASS_RESET_MAGNETOMETER,
    RESTART_BETWEEN_READS,
];
