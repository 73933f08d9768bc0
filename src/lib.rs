//! A CHIP-8 virtual machine: 4 KiB of memory, sixteen 8-bit registers, a
//! sixteen-deep call stack, two 60 Hz timers, a sixteen-key pad and a 64x32
//! monochrome display drawn with XOR sprites.
//!
//! The core never looks at a clock. A host calls [`Host::step`] (or
//! [`Processor::cycle`] directly) as fast as it likes and [`Processor::tick`] at
//! the timer rate, and feeds key events in between.
pub mod config;
pub mod consts;
pub mod core;
#[cfg(feature = "sdl")]
pub mod external;
pub mod host;
pub mod utils;

pub use crate::config::{BlockTransfer, Config, Quirks, UnknownOpcodePolicy};
pub use crate::core::error::{RomError, VmError};
pub use crate::core::instruction::{classify, InstructionKind};
pub use crate::core::processor::{CycleStatus, Processor};
pub use crate::core::ram::DisplayBuffer;
pub use crate::core::rom::Rom;
pub use crate::host::{FrameReport, Host, KeyEvent, StepOutcome};
