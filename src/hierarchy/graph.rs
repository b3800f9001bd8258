use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::Serialize;
use smallvec::SmallVec;

use crate::base::port::{Endpoint, LinkId, NodeId, PortHandle, PortRole};
use crate::hierarchy::caches::CacheParams;
use crate::hierarchy::xbar::XbarParams;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Cache(CacheParams),
    Crossbar(XbarParams),
    /// Terminates a crossbar's default route and answers out-of-range
    /// addresses with an error response.
    BadAddrResponder,
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn cache(&self) -> Option<&CacheParams> {
        match &self.kind {
            NodeKind::Cache(params) => Some(params),
            _ => None,
        }
    }

    pub fn crossbar(&self) -> Option<&XbarParams> {
        match &self.kind {
            NodeKind::Crossbar(params) => Some(params),
            _ => None,
        }
    }
}

/// One recorded connection between two ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnLink {
    pub a: PortHandle,
    pub b: PortHandle,
}

/// Arena of simulation objects plus the connection intent between their
/// ports. Exclusive ports reject a second binding, the same way a port
/// framework would reject rewiring an already-bound single-consumer port.
#[derive(Debug, Default)]
pub struct Topology {
    nodes: Vec<Node>,
    links: Vec<ConnLink>,
    links_at: HashMap<PortHandle, SmallVec<[LinkId; 4]>>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cache(&mut self, name: impl Into<String>, params: CacheParams) -> NodeId {
        self.add_node(name.into(), NodeKind::Cache(params))
    }

    pub fn add_crossbar(&mut self, name: impl Into<String>, params: XbarParams) -> NodeId {
        self.add_node(name.into(), NodeKind::Crossbar(params))
    }

    pub fn add_bad_addr_responder(&mut self, name: impl Into<String>) -> NodeId {
        self.add_node(name.into(), NodeKind::BadAddrResponder)
    }

    fn add_node(&mut self, name: String, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node { name, kind });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn links(&self) -> &[ConnLink] {
        &self.links
    }

    /// Record the intent to wire `a` to `b`. Order of the two handles does
    /// not matter; direction is implied by the roles.
    pub fn connect(&mut self, a: PortHandle, b: PortHandle) -> Result<LinkId> {
        self.check_role(a)?;
        self.check_role(b)?;
        for h in [a, b] {
            if h.role.is_exclusive() && self.is_bound(h) {
                bail!("port already bound: {}", self.format_port(h));
            }
        }
        let id = self.links.len();
        self.links.push(ConnLink { a, b });
        self.links_at.entry(a).or_default().push(id);
        self.links_at.entry(b).or_default().push(id);
        Ok(id)
    }

    pub fn is_bound(&self, h: PortHandle) -> bool {
        self.links_at.get(&h).is_some_and(|l| !l.is_empty())
    }

    /// Number of links terminating at a port. For list ports this is the
    /// fan-in (or fan-out) count.
    pub fn fan_in(&self, h: PortHandle) -> usize {
        self.links_at.get(&h).map_or(0, |l| l.len())
    }

    /// Handles on the far side of every link touching `h`.
    pub fn peers(&self, h: PortHandle) -> Vec<PortHandle> {
        self.links_at
            .get(&h)
            .map(|ids| {
                ids.iter()
                    .map(|&id| {
                        let link = self.links[id];
                        if link.a == h {
                            link.b
                        } else {
                            link.a
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn count_caches(&self, pred: impl Fn(&CacheParams) -> bool) -> usize {
        self.nodes
            .iter()
            .filter_map(Node::cache)
            .filter(|p| pred(p))
            .count()
    }

    pub fn count_crossbars(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Crossbar(_)))
            .count()
    }

    /// A port only makes sense on the kind of object that has it.
    fn check_role(&self, h: PortHandle) -> Result<()> {
        let ok = match h.endpoint {
            Endpoint::Node(id) => {
                if id >= self.nodes.len() {
                    bail!("unknown node id {}", id);
                }
                match self.nodes[id].kind {
                    NodeKind::Cache(_) => {
                        matches!(h.role, PortRole::CpuSide | PortRole::MemSide)
                    }
                    NodeKind::Crossbar(_) => matches!(
                        h.role,
                        PortRole::CpuSidePorts | PortRole::MemSidePorts | PortRole::DefaultPort
                    ),
                    NodeKind::BadAddrResponder => matches!(h.role, PortRole::Pio),
                }
            }
            _ => matches!(h.role, PortRole::Pin),
        };
        if !ok {
            bail!("port role mismatch: {}", self.format_port(h));
        }
        Ok(())
    }

    pub fn format_port(&self, h: PortHandle) -> String {
        match h.endpoint {
            Endpoint::Node(id) => format!("{}.{}", self.nodes[id].name, h.role),
            Endpoint::Core { core, port } => format!("core{}.{}", core, port),
            Endpoint::MemChannel(index) => format!("mem_channel{}", index),
            Endpoint::SystemPort => "system_port".to_string(),
            Endpoint::CoherentIo => "coherent_io_port".to_string(),
        }
    }
}

/// Node ids of one core's private slice of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreTopology {
    pub l1i: NodeId,
    pub l1d: NodeId,
    pub l2_bus: NodeId,
    pub l2: NodeId,
    pub iptw: NodeId,
    pub dptw: NodeId,
}

/// The fully constructed hierarchy. Built once by `incorporate` and handed
/// off wholesale; connections are never rewired afterwards.
#[derive(Debug)]
pub struct HierarchyGraph {
    pub topo: Topology,
    pub cores: Vec<CoreTopology>,
    pub l3_bus: NodeId,
    pub l3_cache: NodeId,
    pub membus: NodeId,
    pub io_cache: Option<NodeId>,
}

#[derive(Debug, Serialize)]
pub struct GraphSummary {
    pub num_cores: usize,
    pub nodes: Vec<Node>,
    pub links: Vec<(String, String)>,
}

impl HierarchyGraph {
    pub fn num_cores(&self) -> usize {
        self.cores.len()
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            num_cores: self.cores.len(),
            nodes: self.topo.nodes().cloned().collect(),
            links: self
                .topo
                .links()
                .iter()
                .map(|l| (self.topo.format_port(l.a), self.topo.format_port(l.b)))
                .collect(),
        }
    }
}
