use log::debug;
use serde::Deserialize;

use crate::base::port::PortHandle;
use crate::board::{AddrRange, Board, Core, Isa};
use crate::sim::config::Config;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BoardConfig {
    pub num_cores: usize,
    pub isa: Isa,
    pub mem_channels: usize,
    pub mem_ranges: Vec<AddrRange>,
    pub coherent_io: bool,
}

impl Config for BoardConfig {}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            num_cores: 1,
            isa: Isa::X86,
            mem_channels: 1,
            mem_ranges: vec![AddrRange::new(0, 0x8000_0000)], // 2 GiB
            coherent_io: false,
        }
    }
}

/// Interrupt wiring a core received, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterruptBinding {
    pub requestor: Option<PortHandle>,
    pub responder: Option<PortHandle>,
}

/// A core that just records the hierarchy ports handed to it. The recorded
/// handles double as the board's half of the connection intent, which lets
/// tests check that the builder touched every core exactly once.
#[derive(Debug, Default)]
pub struct SimpleCore {
    id: usize,
    icache: Option<PortHandle>,
    dcache: Option<PortHandle>,
    walkers: Option<(PortHandle, PortHandle)>,
    interrupt: Option<InterruptBinding>,
}

impl SimpleCore {
    fn new(id: usize) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn icache_port(&self) -> Option<PortHandle> {
        self.icache
    }

    pub fn dcache_port(&self) -> Option<PortHandle> {
        self.dcache
    }

    pub fn walker_ports(&self) -> Option<(PortHandle, PortHandle)> {
        self.walkers
    }

    pub fn interrupt_binding(&self) -> Option<InterruptBinding> {
        self.interrupt
    }
}

impl Core for SimpleCore {
    fn connect_icache(&mut self, port: PortHandle) {
        assert!(
            self.icache.is_none(),
            "icache already connected on core {}",
            self.id
        );
        self.icache = Some(port);
    }

    fn connect_dcache(&mut self, port: PortHandle) {
        assert!(
            self.dcache.is_none(),
            "dcache already connected on core {}",
            self.id
        );
        self.dcache = Some(port);
    }

    fn connect_walker_ports(&mut self, iwalker: PortHandle, dwalker: PortHandle) {
        assert!(
            self.walkers.is_none(),
            "walker ports already connected on core {}",
            self.id
        );
        self.walkers = Some((iwalker, dwalker));
    }

    fn connect_interrupt(&mut self, requestor: Option<PortHandle>, responder: Option<PortHandle>) {
        assert!(
            self.interrupt.is_none(),
            "interrupt already connected on core {}",
            self.id
        );
        self.interrupt = Some(InterruptBinding {
            requestor,
            responder,
        });
    }
}

/// Config-driven board: n cores of one ISA, numbered memory channels, and
/// optionally a coherent-I/O pin.
pub struct SimpleBoard {
    config: BoardConfig,
    cores: Vec<SimpleCore>,
    system_port: Option<PortHandle>,
}

impl SimpleBoard {
    pub fn new(config: BoardConfig) -> Self {
        let cores = (0..config.num_cores).map(SimpleCore::new).collect();
        debug!(
            "board: {} {} cores, {} memory channels, coherent_io={}",
            config.num_cores, config.isa, config.mem_channels, config.coherent_io
        );
        Self {
            config,
            cores,
            system_port: None,
        }
    }

    pub fn cores(&self) -> &[SimpleCore] {
        &self.cores
    }

    pub fn system_port(&self) -> Option<PortHandle> {
        self.system_port
    }
}

impl Board for SimpleBoard {
    fn num_cores(&self) -> usize {
        self.config.num_cores
    }

    fn isa(&self) -> Isa {
        self.config.isa
    }

    fn core_mut(&mut self, index: usize) -> &mut dyn Core {
        &mut self.cores[index]
    }

    fn mem_ports(&self) -> Vec<PortHandle> {
        (0..self.config.mem_channels)
            .map(PortHandle::mem_channel)
            .collect()
    }

    fn mem_ranges(&self) -> &[AddrRange] {
        &self.config.mem_ranges
    }

    fn has_coherent_io(&self) -> bool {
        self.config.coherent_io
    }

    fn coherent_io_port(&self) -> Option<PortHandle> {
        self.config.coherent_io.then(PortHandle::coherent_io)
    }

    fn connect_system_port(&mut self, port: PortHandle) {
        assert!(
            self.system_port.is_none(),
            "system port already connected on board"
        );
        self.system_port = Some(port);
    }
}
