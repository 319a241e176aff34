//! Register definitions for the ICM-20948 auxiliary bus
//!
//! Only the registers that the bridge touches are described here. Addresses
//! 0x00-0x7E mean different things in each bank, so every register uses
//! `ALLOW_ADDRESS_OVERLAP = true`; `REG_BANK_SEL` (0x7F) is present in all banks.
//!
//! ## Bank usage
//! - **Bank 0**: identity, user control, power, bypass, master status, mirror
//! - **Bank 3**: I2C master configuration and the five proxy lanes
//!
//! The four continuous lanes share one layout, so their registers are
//! declared once with `REPEAT` and addressed by lane index. The 24 mirrored
//! bytes are a single register read in one burst.

device_driver::create_device!(
    device_name: Icm20948,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
            type DefmtFeature = "defmt";
        }

        // ==================== BANK 0 REGISTERS ====================

        /// WHO_AM_I - Device ID Register (Bank 0, 0x00)
        /// Expected value: 0xEA
        register WhoAmI {
            const ADDRESS = 0x00;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// Device ID (should read 0xEA)
            who_am_i: uint = 0..8,
        },

        /// USER_CTRL - User Control (Bank 0, 0x03)
        register UserCtrl {
            const ADDRESS = 0x03;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            reserved_0: uint = 0..1,
            /// I2C master reset (self clearing)
            i2c_mst_rst: bool = 1,
            /// SRAM reset
            sram_rst: bool = 2,
            /// DMP reset
            dmp_rst: bool = 3,
            /// Host I2C interface disable (SPI only)
            i2c_if_dis: bool = 4,
            /// I2C master enable
            i2c_mst_en: bool = 5,
            /// FIFO enable
            fifo_en: bool = 6,
            /// DMP enable
            dmp_en: bool = 7,
        },

        /// LP_CONFIG - Low Power Configuration (Bank 0, 0x05)
        register LpConfig {
            const ADDRESS = 0x05;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            reserved_3_0: uint = 0..4,
            /// Gyroscope cycle mode
            gyro_cycle: bool = 4,
            /// Accelerometer cycle mode
            accel_cycle: bool = 5,
            /// I2C master duty-cycled at the ODR of `I2C_MST_ODR_CONFIG`
            i2c_mst_cycle: bool = 6,
            reserved_7: uint = 7..8,
        },

        /// PWR_MGMT_1 - Power Management 1 (Bank 0, 0x06)
        register PwrMgmt1 {
            const ADDRESS = 0x06;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// Clock source select (0=internal 20MHz, 1=auto select best, 7=stop clock)
            clksel: uint = 0..3,
            /// Temperature sensor disable
            temp_dis: bool = 3,
            reserved_4: uint = 4..5,
            /// Low power mode enable
            lp_en: bool = 5,
            /// Sleep mode enable
            sleep: bool = 6,
            /// Device reset (self clearing)
            device_reset: bool = 7,
        },

        /// PWR_MGMT_2 - Power Management 2 (Bank 0, 0x07)
        register PwrMgmt2 {
            const ADDRESS = 0x07;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// Disable gyroscope Z-axis
            disable_gyro_z: bool = 0,
            /// Disable gyroscope Y-axis
            disable_gyro_y: bool = 1,
            /// Disable gyroscope X-axis
            disable_gyro_x: bool = 2,
            /// Disable accelerometer Z-axis
            disable_accel_z: bool = 3,
            /// Disable accelerometer Y-axis
            disable_accel_y: bool = 4,
            /// Disable accelerometer X-axis
            disable_accel_x: bool = 5,
            reserved_7_6: uint = 6..8,
        },

        /// INT_PIN_CFG - Interrupt Pin Configuration (Bank 0, 0x0F)
        register IntPinCfg {
            const ADDRESS = 0x0F;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            reserved_0: uint = 0..1,
            /// Bypass enable: auxiliary bus pins joined to the host bus
            bypass_en: bool = 1,
            /// FSYNC interrupt mode select
            fsync_int_mode_en: bool = 2,
            /// ACTL - Active low FSYNC
            actl_fsync: bool = 3,
            /// INT_ANYRD_2CLEAR - Interrupt status clear on any read
            int_anyrd_2clear: bool = 4,
            /// Latch interrupt
            int1_latch_int_en: bool = 5,
            /// INT1 open drain
            int1_open: bool = 6,
            /// INT1 active low
            int1_actl: bool = 7,
        },

        /// I2C_MST_STATUS - I2C Master Status (Bank 0, 0x17)
        /// Flags clear when the register is read
        register I2cMstStatus {
            const ADDRESS = 0x17;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// Lane 0 NACK
            i2c_slv0_nack: bool = 0,
            /// Lane 1 NACK
            i2c_slv1_nack: bool = 1,
            /// Lane 2 NACK
            i2c_slv2_nack: bool = 2,
            /// Lane 3 NACK
            i2c_slv3_nack: bool = 3,
            /// One-shot lane NACK
            i2c_slv4_nack: bool = 4,
            /// Arbitration lost on the auxiliary bus
            i2c_lost_arb: bool = 5,
            /// One-shot lane transfer finished
            i2c_slv4_done: bool = 6,
            /// FSYNC pass-through state
            pass_through: bool = 7,
        },

        /// EXT_SLV_SENS_DATA_00..23 - Mirrored lane data (Bank 0, 0x3B-0x52)
        /// Read lanes deposit their bytes here back to back in lane order
        register ExtSlvSensData {
            const ADDRESS = 0x3B;
            const SIZE_BITS = 192;
            const ALLOW_ADDRESS_OVERLAP = true;
        },

        /// REG_BANK_SEL - Register Bank Selection (All Banks, 0x7F)
        register RegBankSel {
            const ADDRESS = 0x7F;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            reserved_3_0: uint = 0..4,
            /// User bank selection (0-3, shifted left by 4 bits: 0x00, 0x10, 0x20, 0x30)
            user_bank: uint = 4..6,
            reserved_7_6: uint = 6..8,
        },

        // ==================== BANK 3 REGISTERS ====================

        /// I2C_MST_ODR_CONFIG (Bank 3, 0x00)
        register Bank3I2cMstOdrConfig {
            const ADDRESS = 0x00;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// Duty-cycled master rate: 1.1 kHz / 2^value
            i2c_mst_odr_config: uint = 0..4,
            reserved_7_4: uint = 4..8,
        },

        /// I2C_MST_CTRL (Bank 3, 0x01)
        register Bank3I2cMstCtrl {
            const ADDRESS = 0x01;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// I2C master clock divider (7 = 345.6 kHz)
            i2c_mst_clk: uint = 0..4,
            /// Stop between reads instead of a restart
            i2c_mst_p_nsr: bool = 4,
            reserved_6_5: uint = 5..7,
            /// Multi-master enable
            mult_mst_en: bool = 7,
        },

        /// I2C_SLV0..3_ADDR (Bank 3, 0x03 + 4 * lane)
        register Bank3I2cSlvAddr {
            const ADDRESS = 0x03;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;
            const REPEAT = {
                count: 4,
                stride: 4,
            };

            /// Lane target address
            i2c_id: uint = 0..7,
            /// Lane direction (1=read, 0=write)
            i2c_slv_rnw: bool = 7,
        },

        /// I2C_SLV0..3_REG (Bank 3, 0x04 + 4 * lane)
        register Bank3I2cSlvReg {
            const ADDRESS = 0x04;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;
            const REPEAT = {
                count: 4,
                stride: 4,
            };

            /// First downstream register of the transfer
            i2c_slv_reg: uint = 0..8,
        },

        /// I2C_SLV0..3_CTRL (Bank 3, 0x05 + 4 * lane)
        register Bank3I2cSlvCtrl {
            const ADDRESS = 0x05;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;
            const REPEAT = {
                count: 4,
                stride: 4,
            };

            /// Number of bytes transferred every cycle
            i2c_slv_leng: uint = 0..4,
            /// Byte swap grouping (1 = pairs start at odd offsets)
            i2c_slv_grp: bool = 4,
            /// Transfer data only, without a register offset
            i2c_slv_reg_dis: bool = 5,
            /// Swap bytes of each word
            i2c_slv_byte_sw: bool = 6,
            /// Lane runs on every master cycle
            i2c_slv_en: bool = 7,
        },

        /// I2C_SLV0..3_DO (Bank 3, 0x06 + 4 * lane)
        register Bank3I2cSlvDo {
            const ADDRESS = 0x06;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;
            const REPEAT = {
                count: 4,
                stride: 4,
            };

            /// Byte written by a write lane
            i2c_slv_do: uint = 0..8,
        },

        /// I2C_SLV4_ADDR (Bank 3, 0x13)
        register Bank3I2cSlv4Addr {
            const ADDRESS = 0x13;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// One-shot lane target address
            i2c_id_4: uint = 0..7,
            /// One-shot lane direction (1=read, 0=write)
            i2c_slv4_rnw: bool = 7,
        },

        /// I2C_SLV4_REG (Bank 3, 0x14)
        register Bank3I2cSlv4Reg {
            const ADDRESS = 0x14;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// One-shot lane register offset
            i2c_slv4_reg: uint = 0..8,
        },

        /// I2C_SLV4_CTRL (Bank 3, 0x15)
        register Bank3I2cSlv4Ctrl {
            const ADDRESS = 0x15;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// Sample decimation delay
            i2c_mst_dly: uint = 0..5,
            /// Register disable (data only transfer)
            i2c_slv4_reg_dis: bool = 5,
            /// Interrupt on completion
            i2c_slv4_int_en: bool = 6,
            /// Start the transfer
            i2c_slv4_en: bool = 7,
        },

        /// I2C_SLV4_DO (Bank 3, 0x16)
        register Bank3I2cSlv4Do {
            const ADDRESS = 0x16;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// One-shot lane data out
            i2c_slv4_do: uint = 0..8,
        },

        /// I2C_SLV4_DI (Bank 3, 0x17)
        register Bank3I2cSlv4Di {
            const ADDRESS = 0x17;
            const SIZE_BITS = 8;
            const ALLOW_ADDRESS_OVERLAP = true;

            /// One-shot lane data in
            i2c_slv4_di: uint = 0..8,
        }
    }
);

pub use Icm20948 as RegisterDevice;


/// Bank 0 addresses of the registers whose raw writes the bridge tracks
///
/// Raw writes carry a bare address, so these restate the map above. The tests
/// below pin them to the generated accessors.
pub mod address {
    /// `USER_CTRL`
    pub const USER_CTRL: u8 = 0x03;
    /// `LP_CONFIG`
    pub const LP_CONFIG: u8 = 0x05;
    /// `PWR_MGMT_1`
    pub const PWR_MGMT_1: u8 = 0x06;
    /// `INT_PIN_CFG`
    pub const INT_PIN_CFG: u8 = 0x0F;
    /// `REG_BANK_SEL`, present in every bank
    pub const REG_BANK_SEL: u8 = 0x7F;
}
