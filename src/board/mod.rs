//! Board-side collaborators of the hierarchy builder.
//!
//! The builder only consumes these interfaces; boards own the cores, memory
//! channels, and I/O plumbing and are free to implement them however the
//! host simulator likes.

pub mod simple;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::base::port::PortHandle;

pub use simple::{BoardConfig, InterruptBinding, SimpleBoard, SimpleCore};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Isa {
    #[default]
    X86,
    Arm,
    Riscv,
}

impl FromStr for Isa {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "x86" => Ok(Self::X86),
            "arm" => Ok(Self::Arm),
            "riscv" => Ok(Self::Riscv),
            _ => Err(format!(
                "unsupported isa '{}', expected one of: x86, arm, riscv",
                value
            )),
        }
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Isa::X86 => "x86",
            Isa::Arm => "arm",
            Isa::Riscv => "riscv",
        };
        write!(f, "{}", s)
    }
}

/// Physical address range claimed by a memory device, `[start, start + size)`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct AddrRange {
    pub start: u64,
    pub size: u64,
}

impl AddrRange {
    pub fn new(start: u64, size: u64) -> Self {
        Self { start, size }
    }

    pub fn end(&self) -> u64 {
        self.start + self.size
    }
}

/// One compute core as seen by the hierarchy. The board hands each core the
/// hierarchy-side port it should bind its native ports to; what the core
/// does with the handle is the board's business.
pub trait Core {
    fn connect_icache(&mut self, port: PortHandle);
    fn connect_dcache(&mut self, port: PortHandle);
    fn connect_walker_ports(&mut self, iwalker: PortHandle, dwalker: PortHandle);
    /// Explicit interrupt routing. `None`/`None` leaves the core to its own
    /// default interrupt handling (every ISA except x86-class).
    fn connect_interrupt(&mut self, requestor: Option<PortHandle>, responder: Option<PortHandle>);
}

/// The parent simulation board a hierarchy incorporates into.
pub trait Board {
    fn num_cores(&self) -> usize;
    fn isa(&self) -> Isa;
    fn core_mut(&mut self, index: usize) -> &mut dyn Core;
    /// One pin per memory channel, all of which fan into the membus.
    fn mem_ports(&self) -> Vec<PortHandle>;
    fn mem_ranges(&self) -> &[AddrRange];
    fn has_coherent_io(&self) -> bool;
    fn coherent_io_port(&self) -> Option<PortHandle>;
    /// Register the hierarchy port that serves system-level functional
    /// accesses from the simulator.
    fn connect_system_port(&mut self, port: PortHandle);
}
