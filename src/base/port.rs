/// `PortHandle` names one attachment point in the simulation object graph.
///
/// Handles are opaque connection intent: the builder records which ports get
/// wired together, and the downstream simulation substrate owns the actual
/// port objects. Exclusive roles accept a single binding; list roles are
/// appendable fan-in/fan-out.
use std::fmt;

pub type NodeId = usize;
pub type LinkId = usize;

/// Ports a board-owned core exposes to the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorePort {
    ICache,
    DCache,
    IWalker,
    DWalker,
    IntRequestor,
    IntResponder,
}

impl fmt::Display for CorePort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CorePort::ICache => "icache",
            CorePort::DCache => "dcache",
            CorePort::IWalker => "iwalker",
            CorePort::DWalker => "dwalker",
            CorePort::IntRequestor => "int_requestor",
            CorePort::IntResponder => "int_responder",
        };
        write!(f, "{}", s)
    }
}

/// Owner of a port: either a node built by the hierarchy itself, or an
/// endpoint the board exposes (cores, memory channels, the system port,
/// the coherent-I/O port).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Node(NodeId),
    Core { core: usize, port: CorePort },
    MemChannel(usize),
    SystemPort,
    CoherentIo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortRole {
    /// Single core-facing port of a cache.
    CpuSide,
    /// Single memory-facing port of a cache.
    MemSide,
    /// Appendable core-facing port list of a crossbar.
    CpuSidePorts,
    /// Appendable memory-facing port list of a crossbar.
    MemSidePorts,
    /// Default route of a crossbar for addresses no other port claims.
    DefaultPort,
    /// Programmed-IO port of a responder.
    Pio,
    /// The single external pin of a board endpoint.
    Pin,
}

impl PortRole {
    /// List roles accumulate bindings; everything else binds exactly once.
    pub fn is_exclusive(&self) -> bool {
        !matches!(self, PortRole::CpuSidePorts | PortRole::MemSidePorts)
    }
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PortRole::CpuSide => "cpu_side",
            PortRole::MemSide => "mem_side",
            PortRole::CpuSidePorts => "cpu_side_ports",
            PortRole::MemSidePorts => "mem_side_ports",
            PortRole::DefaultPort => "default",
            PortRole::Pio => "pio",
            PortRole::Pin => "pin",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortHandle {
    pub endpoint: Endpoint,
    pub role: PortRole,
}

impl PortHandle {
    pub fn new(endpoint: Endpoint, role: PortRole) -> Self {
        Self { endpoint, role }
    }

    pub fn cpu_side(node: NodeId) -> Self {
        Self::new(Endpoint::Node(node), PortRole::CpuSide)
    }

    pub fn mem_side(node: NodeId) -> Self {
        Self::new(Endpoint::Node(node), PortRole::MemSide)
    }

    pub fn cpu_side_ports(node: NodeId) -> Self {
        Self::new(Endpoint::Node(node), PortRole::CpuSidePorts)
    }

    pub fn mem_side_ports(node: NodeId) -> Self {
        Self::new(Endpoint::Node(node), PortRole::MemSidePorts)
    }

    pub fn default_port(node: NodeId) -> Self {
        Self::new(Endpoint::Node(node), PortRole::DefaultPort)
    }

    pub fn pio(node: NodeId) -> Self {
        Self::new(Endpoint::Node(node), PortRole::Pio)
    }

    pub fn core(core: usize, port: CorePort) -> Self {
        Self::new(Endpoint::Core { core, port }, PortRole::Pin)
    }

    pub fn mem_channel(index: usize) -> Self {
        Self::new(Endpoint::MemChannel(index), PortRole::Pin)
    }

    pub fn system_port() -> Self {
        Self::new(Endpoint::SystemPort, PortRole::Pin)
    }

    pub fn coherent_io() -> Self {
        Self::new(Endpoint::CoherentIo, PortRole::Pin)
    }
}
