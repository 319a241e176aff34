//! Downstream sensors reached through the auxiliary bus
//!
//! - Magnetometer (3-axis, AK09916)
//!
//! All sensor operations are performed through methods on `AuxBridge`.

pub mod magnetometer;

// Re-export main types
pub use magnetometer::{MagConfig, MagMode, MagSnapshot};
