//! Build-time device configuration
//!
//! `DEVICE_CONFIG` is generated by build.rs from device.toml.

use nasmon_core::DeviceConfig;

include!(concat!(env!("OUT_DIR"), "/device_config.rs"));
