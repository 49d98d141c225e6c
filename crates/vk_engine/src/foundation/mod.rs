//! Foundation utilities shared by every engine subsystem

pub mod logging;
pub mod math;
pub mod time;
