//! Proxy lanes and the layout of the mirrored buffer
//!
//! The master owns five lanes. Lanes 0-3 run continuously on every master
//! cycle and deposit read bytes into the mirrored buffer; lane 4 is the
//! one-shot lane used for polled single-byte transfers.

use crate::registers::field_sets::Bank3I2CSlvCtrl as Bank3I2cSlvCtrl;

/// Highest 7-bit bus address
pub const MAX_ADDRESS: u8 = 0x7F;

/// Longest transfer a continuous lane can perform
pub const MAX_LANE_LENGTH: u8 = 15;

/// Size of the mirrored buffer (`EXT_SLV_SENS_DATA_00..=23`)
pub const MIRROR_LEN: usize = 24;

/// Transfer direction of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Downstream register to host
    Read,
    /// Host byte to downstream register
    Write,
}

/// One of the four continuously running lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContinuousLane {
    /// `I2C_SLV0`
    Lane0 = 0,
    /// `I2C_SLV1`
    Lane1 = 1,
    /// `I2C_SLV2`
    Lane2 = 2,
    /// `I2C_SLV3`
    Lane3 = 3,
}

impl ContinuousLane {
    /// All continuous lanes in mirror order
    pub const ALL: [Self; 4] = [Self::Lane0, Self::Lane1, Self::Lane2, Self::Lane3];

    /// Lane for an index (0-3)
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Lane0),
            1 => Some(Self::Lane1),
            2 => Some(Self::Lane2),
            3 => Some(Self::Lane3),
            _ => None,
        }
    }

    /// Lane index (0-3)
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Index into the repeated `I2C_SLVn_*` registers
    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

/// Any of the five proxy lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lane {
    /// A continuous mirroring lane
    Continuous(ContinuousLane),
    /// The one-shot lane (`I2C_SLV4`)
    OneShot,
}

impl Lane {
    /// Hardware lane number (0-4)
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Continuous(lane) => lane.index(),
            Self::OneShot => 4,
        }
    }
}

/// Fields of an `I2C_SLVn_CTRL` register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LaneControl {
    /// Lane runs on every master cycle
    pub enable: bool,
    /// Swap bytes of each word
    pub byte_swap: bool,
    /// Transfer data only, without a register offset
    pub register_disable: bool,
    /// Word grouping for byte swapping (0 = pairs start at even offsets)
    pub group_odd: bool,
    /// Number of bytes transferred (0-15)
    pub length: u8,
}

impl LaneControl {
    /// Enabled control word for a plain transfer of `length` bytes
    #[must_use]
    pub const fn transfer(length: u8) -> Self {
        Self {
            enable: length > 0,
            byte_swap: false,
            register_disable: false,
            group_odd: false,
            length,
        }
    }

    /// Copy the fields into a control register value
    pub(crate) fn apply(self, ctrl: &mut Bank3I2cSlvCtrl) {
        ctrl.set_i_2_c_slv_en(self.enable);
        ctrl.set_i_2_c_slv_byte_sw(self.byte_swap);
        ctrl.set_i_2_c_slv_reg_dis(self.register_disable);
        ctrl.set_i_2_c_slv_grp(self.group_odd);
        ctrl.set_i_2_c_slv_leng(self.length);
    }
}

impl From<Bank3I2cSlvCtrl> for LaneControl {
    fn from(ctrl: Bank3I2cSlvCtrl) -> Self {
        Self {
            enable: ctrl.i_2_c_slv_en(),
            byte_swap: ctrl.i_2_c_slv_byte_sw(),
            register_disable: ctrl.i_2_c_slv_reg_dis(),
            group_odd: ctrl.i_2_c_slv_grp(),
            length: ctrl.i_2_c_slv_leng(),
        }
    }
}

/// Where a lane's bytes land inside the mirrored buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MirrorRegion {
    /// Offset from `EXT_SLV_SENS_DATA_00`
    pub offset: u8,
    /// Number of mirrored bytes
    pub len: u8,
}

impl MirrorRegion {
    /// Byte range inside the mirrored buffer
    #[must_use]
    pub const fn range(self) -> core::ops::Range<usize> {
        self.offset as usize..self.offset as usize + self.len as usize
    }
}

/// Read lengths of the continuous lanes, used to place them in the mirror
///
/// The hardware packs enabled read lanes back to back in lane order, so a
/// lane's offset is the total length of the lower-numbered read lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct MirrorLayout {
    lengths: [u8; 4],
}

impl MirrorLayout {
    /// Region a lane would occupy with `length` bytes, if it still fits
    pub(crate) fn with_length(&self, lane: ContinuousLane, length: u8) -> Option<MirrorRegion> {
        let mut next = self.lengths;
        next[lane.index() as usize] = length;
        let total: usize = next.iter().map(|&len| usize::from(len)).sum();
        if total > MIRROR_LEN {
            return None;
        }
        Some(Self { lengths: next }.region(lane))
    }

    pub(crate) fn set(&mut self, lane: ContinuousLane, length: u8) {
        self.lengths[lane.index() as usize] = length;
    }

    pub(crate) fn region(&self, lane: ContinuousLane) -> MirrorRegion {
        let index = lane.index() as usize;
        let offset: u8 = self.lengths[..index].iter().sum();
        MirrorRegion {
            offset,
            len: self.lengths[index],
        }
    }

    pub(crate) fn clear(&mut self) {
        self.lengths = [0; 4];
    }
}
