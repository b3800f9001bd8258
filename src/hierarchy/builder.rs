use anyhow::{bail, Context, Result};
use log::{debug, info};

use crate::base::port::{CorePort, NodeId, PortHandle};
use crate::board::{Board, Isa};
use crate::hierarchy::caches::CacheParams;
use crate::hierarchy::config::HierarchyConfig;
use crate::hierarchy::graph::{CoreTopology, HierarchyGraph, Topology};
use crate::hierarchy::xbar::XbarParams;

/// Capability contract a board depends on. The port accessors expose the
/// hierarchy's memory-facing and core-facing attachment points; `incorporate`
/// consumes the builder, so a hierarchy is built into exactly one board.
pub trait CacheHierarchy {
    fn mem_side_port(&self) -> PortHandle;
    fn cpu_side_port(&self) -> PortHandle;
    fn incorporate(self, board: &mut dyn Board) -> Result<HierarchyGraph>
    where
        Self: Sized;
}

/// Classic three-level hierarchy: private L1I/L1D and L2 per core, one
/// shared L3 behind a shared crossbar, everything draining into a membus.
pub struct ClassicHierarchy {
    config: HierarchyConfig,
    topo: Topology,
    membus: NodeId,
}

impl ClassicHierarchy {
    /// The membus and its bad-address responder exist from the start, so the
    /// port accessors are valid before `incorporate` runs.
    pub fn new(config: HierarchyConfig) -> Self {
        let mut topo = Topology::new();
        let membus = topo.add_crossbar("membus", config.membus);
        let responder = topo.add_bad_addr_responder("badaddr_responder");
        topo.connect(PortHandle::default_port(membus), PortHandle::pio(responder))
            .expect("fresh membus default port");
        Self {
            config,
            topo,
            membus,
        }
    }

    fn build_core(&mut self, index: usize) -> CoreTopology {
        let l1i = self.topo.add_cache(
            format!("l1i{}", index),
            CacheParams::l1i(&self.config.l1i),
        );
        let l1d = self.topo.add_cache(
            format!("l1d{}", index),
            CacheParams::l1d(&self.config.l1d),
        );
        let l2_bus = self
            .topo
            .add_crossbar(format!("l2bus{}", index), XbarParams::l2());
        let l2 = self
            .topo
            .add_cache(format!("l2cache{}", index), CacheParams::l2(self.config.l2.size));
        let iptw = self
            .topo
            .add_cache(format!("iptw{}", index), CacheParams::walk());
        let dptw = self
            .topo
            .add_cache(format!("dptw{}", index), CacheParams::walk());
        CoreTopology {
            l1i,
            l1d,
            l2_bus,
            l2,
            iptw,
            dptw,
        }
    }

    /// Wire one core's private slice: L1s and walk caches fan into the
    /// private L2 crossbar, which feeds the private L2; the L2's memory side
    /// takes one slot in the shared L3 crossbar's core-facing list.
    fn wire_core(
        &mut self,
        index: usize,
        ct: &CoreTopology,
        l3_bus: NodeId,
        isa: Isa,
        board: &mut dyn Board,
    ) -> Result<()> {
        let core = board.core_mut(index);
        core.connect_icache(PortHandle::cpu_side(ct.l1i));
        core.connect_dcache(PortHandle::cpu_side(ct.l1d));
        core.connect_walker_ports(PortHandle::cpu_side(ct.iptw), PortHandle::cpu_side(ct.dptw));

        self.topo.connect(
            PortHandle::core(index, CorePort::ICache),
            PortHandle::cpu_side(ct.l1i),
        )?;
        self.topo.connect(
            PortHandle::core(index, CorePort::DCache),
            PortHandle::cpu_side(ct.l1d),
        )?;
        self.topo.connect(
            PortHandle::core(index, CorePort::IWalker),
            PortHandle::cpu_side(ct.iptw),
        )?;
        self.topo.connect(
            PortHandle::core(index, CorePort::DWalker),
            PortHandle::cpu_side(ct.dptw),
        )?;

        for cache in [ct.l1i, ct.l1d, ct.iptw, ct.dptw] {
            self.topo.connect(
                PortHandle::mem_side(cache),
                PortHandle::cpu_side_ports(ct.l2_bus),
            )?;
        }
        self.topo.connect(
            PortHandle::mem_side_ports(ct.l2_bus),
            PortHandle::cpu_side(ct.l2),
        )?;
        self.topo.connect(
            PortHandle::mem_side(ct.l2),
            PortHandle::cpu_side_ports(l3_bus),
        )?;

        // x86-class cores route interrupt messages over the memory system;
        // everything else handles interrupts internally.
        if isa == Isa::X86 {
            let requestor = self.mem_side_port();
            let responder = self.cpu_side_port();
            board
                .core_mut(index)
                .connect_interrupt(Some(requestor), Some(responder));
            self.topo
                .connect(PortHandle::core(index, CorePort::IntRequestor), requestor)?;
            self.topo
                .connect(PortHandle::core(index, CorePort::IntResponder), responder)?;
        } else {
            board.core_mut(index).connect_interrupt(None, None);
        }

        debug!("hierarchy: wired private caches for core {}", index);
        Ok(())
    }

    /// Fixed-function cache keeping coherent-I/O traffic coherent with the
    /// hierarchy. Sits directly on the membus, bypassing the shared L3.
    fn setup_io_cache(&mut self, board: &mut dyn Board) -> Result<NodeId> {
        let ranges = board.mem_ranges().to_vec();
        let io_cache = self.topo.add_cache("iocache", CacheParams::io(ranges));
        self.topo.connect(
            PortHandle::mem_side(io_cache),
            PortHandle::cpu_side_ports(self.membus),
        )?;
        let io_port = match board.coherent_io_port() {
            Some(port) => port,
            None => bail!("board reports coherent i/o but exposes no i/o port"),
        };
        self.topo
            .connect(PortHandle::cpu_side(io_cache), io_port)?;
        Ok(io_cache)
    }
}

impl CacheHierarchy for ClassicHierarchy {
    fn mem_side_port(&self) -> PortHandle {
        PortHandle::mem_side_ports(self.membus)
    }

    fn cpu_side_port(&self) -> PortHandle {
        PortHandle::cpu_side_ports(self.membus)
    }

    fn incorporate(mut self, board: &mut dyn Board) -> Result<HierarchyGraph> {
        let num_cores = board.num_cores();
        if num_cores == 0 {
            bail!("cannot incorporate a cache hierarchy into a board with zero cores");
        }
        let isa = board.isa();

        // System-level functional accesses enter through the membus.
        board.connect_system_port(self.cpu_side_port());
        self.topo
            .connect(PortHandle::system_port(), self.cpu_side_port())
            .context("binding system port")?;

        // Every memory channel fans into the membus memory side.
        for port in board.mem_ports() {
            self.topo
                .connect(self.mem_side_port(), port)
                .context("binding memory port")?;
        }

        let cores: Vec<CoreTopology> = (0..num_cores).map(|i| self.build_core(i)).collect();
        let l3_bus = self.topo.add_crossbar("l3bus", XbarParams::l3());
        let l3_cache = self
            .topo
            .add_cache("l3cache", CacheParams::l3(&self.config.l3));

        let io_cache = if board.has_coherent_io() {
            Some(self.setup_io_cache(board)?)
        } else {
            None
        };

        for (i, ct) in cores.iter().enumerate() {
            self.wire_core(i, ct, l3_bus, isa, board)?;
        }

        self.topo.connect(
            PortHandle::mem_side_ports(l3_bus),
            PortHandle::cpu_side(l3_cache),
        )?;
        self.topo.connect(
            PortHandle::mem_side(l3_cache),
            PortHandle::cpu_side_ports(self.membus),
        )?;

        info!(
            "hierarchy: incorporated {} cores, {} nodes, {} links{}",
            num_cores,
            self.topo.num_nodes(),
            self.topo.links().len(),
            if io_cache.is_some() {
                ", coherent i/o cache"
            } else {
                ""
            }
        );

        Ok(HierarchyGraph {
            topo: self.topo,
            cores,
            l3_bus,
            l3_cache,
            membus: self.membus,
            io_cache,
        })
    }
}
