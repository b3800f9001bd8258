use crate::base::port::{CorePort, PortHandle, PortRole};
use crate::board::{AddrRange, Board, BoardConfig, Isa, SimpleBoard};
use crate::hierarchy::builder::{CacheHierarchy, ClassicHierarchy};
use crate::hierarchy::caches::{CacheParams, IO_CACHE_SIZE, WALK_CACHE_SIZE};
use crate::hierarchy::config::{HierarchyConfig, HierarchyParams};
use crate::hierarchy::graph::HierarchyGraph;

fn board(num_cores: usize, isa: Isa, coherent_io: bool) -> SimpleBoard {
    SimpleBoard::new(BoardConfig {
        num_cores,
        isa,
        coherent_io,
        ..BoardConfig::default()
    })
}

fn build(num_cores: usize, isa: Isa, coherent_io: bool) -> (HierarchyGraph, SimpleBoard) {
    let config =
        HierarchyConfig::configure(&HierarchyParams::default()).expect("defaults should validate");
    let mut board = board(num_cores, isa, coherent_io);
    let graph = ClassicHierarchy::new(config)
        .incorporate(&mut board)
        .expect("incorporate should succeed");
    (graph, board)
}

#[test]
fn per_core_object_counts_scale_with_core_count() {
    for n in [1, 2, 4, 8] {
        let (graph, _) = build(n, Isa::Riscv, false);
        assert_eq!(n, graph.cores.len());
        // 5 private caches per core (l1i, l1d, l2, iptw, dptw) plus one l3
        assert_eq!(5 * n + 1, graph.topo.count_caches(|_| true));
        // one l2 crossbar per core, one l3 crossbar, one membus
        assert_eq!(n + 2, graph.topo.count_crossbars());
        for ct in &graph.cores {
            for id in [ct.l1i, ct.l1d, ct.l2, ct.iptw, ct.dptw] {
                assert!(graph.topo.node(id).cache().is_some());
            }
            assert_eq!(
                WALK_CACHE_SIZE,
                graph.topo.node(ct.iptw).cache().expect("cache").size
            );
            assert_eq!(
                WALK_CACHE_SIZE,
                graph.topo.node(ct.dptw).cache().expect("cache").size
            );
        }
    }
}

#[test]
fn l3_bus_fans_in_one_l2_per_core() {
    let (graph, _) = build(4, Isa::Riscv, false);
    assert_eq!(4, graph.topo.fan_in(PortHandle::cpu_side_ports(graph.l3_bus)));
    let peers = graph.topo.peers(PortHandle::cpu_side_ports(graph.l3_bus));
    for ct in &graph.cores {
        assert!(peers.contains(&PortHandle::mem_side(ct.l2)));
    }
}

#[test]
fn l3_drains_into_the_membus() {
    let (graph, _) = build(2, Isa::Riscv, false);
    let l3_peers = graph.topo.peers(PortHandle::mem_side_ports(graph.l3_bus));
    assert_eq!(vec![PortHandle::cpu_side(graph.l3_cache)], l3_peers);
    let membus_peers = graph.topo.peers(PortHandle::cpu_side_ports(graph.membus));
    assert!(membus_peers.contains(&PortHandle::mem_side(graph.l3_cache)));
}

#[test]
fn l1_and_walk_caches_never_write_back_clean_lines() {
    let (graph, _) = build(2, Isa::Riscv, false);
    for ct in &graph.cores {
        for id in [ct.l1i, ct.l1d, ct.iptw, ct.dptw] {
            let params = graph.topo.node(id).cache().expect("node should be a cache");
            assert!(!params.writeback_clean);
        }
    }
}

#[test]
fn private_slices_fan_into_the_private_l2_bus() {
    let (graph, _) = build(1, Isa::Riscv, false);
    let ct = &graph.cores[0];
    // l1i, l1d and both walk caches share the core's l2 crossbar
    assert_eq!(4, graph.topo.fan_in(PortHandle::cpu_side_ports(ct.l2_bus)));
    let l2_peers = graph.topo.peers(PortHandle::mem_side_ports(ct.l2_bus));
    assert_eq!(vec![PortHandle::cpu_side(ct.l2)], l2_peers);
}

#[test]
fn x86_interrupts_route_through_the_membus() {
    let (graph, board) = build(2, Isa::X86, false);
    for (i, core) in board.cores().iter().enumerate() {
        let binding = core.interrupt_binding().expect("interrupt must be connected");
        assert_eq!(
            Some(PortHandle::mem_side_ports(graph.membus)),
            binding.requestor
        );
        assert_eq!(
            Some(PortHandle::cpu_side_ports(graph.membus)),
            binding.responder
        );
        assert_eq!(1, graph.topo.fan_in(PortHandle::core(i, CorePort::IntRequestor)));
        assert_eq!(1, graph.topo.fan_in(PortHandle::core(i, CorePort::IntResponder)));
    }
}

#[test]
fn non_x86_cores_keep_default_interrupt_handling() {
    for isa in [Isa::Arm, Isa::Riscv] {
        let (graph, board) = build(2, isa, false);
        for (i, core) in board.cores().iter().enumerate() {
            let binding = core.interrupt_binding().expect("interrupt must be connected");
            assert_eq!(None, binding.requestor);
            assert_eq!(None, binding.responder);
            assert_eq!(0, graph.topo.fan_in(PortHandle::core(i, CorePort::IntRequestor)));
            assert_eq!(0, graph.topo.fan_in(PortHandle::core(i, CorePort::IntResponder)));
        }
    }
}

#[test]
fn coherent_io_builds_one_fixed_function_cache() {
    let (graph, board) = build(2, Isa::Riscv, true);
    let io_cache = graph.io_cache.expect("io cache must exist");
    let params = graph
        .topo
        .node(io_cache)
        .cache()
        .expect("io cache node should be a cache");
    assert_eq!(8, params.assoc);
    assert_eq!(IO_CACHE_SIZE, params.size);
    assert_eq!(50, params.tag_latency);
    assert_eq!(50, params.data_latency);
    assert_eq!(50, params.response_latency);
    assert_eq!(32, params.mshrs);
    assert_eq!(12, params.tgts_per_mshr);
    assert_eq!(32, params.write_buffers);
    assert_eq!(board.mem_ranges(), params.addr_ranges.as_slice());

    let io_peers = graph.topo.peers(PortHandle::cpu_side(io_cache));
    assert_eq!(vec![PortHandle::coherent_io()], io_peers);
    assert!(graph
        .topo
        .peers(PortHandle::cpu_side_ports(graph.membus))
        .contains(&PortHandle::mem_side(io_cache)));
}

#[test]
fn no_io_cache_without_coherent_io() {
    let (graph, _) = build(2, Isa::Riscv, false);
    assert!(graph.io_cache.is_none());
    assert_eq!(0, graph.topo.count_caches(|p| !p.addr_ranges.is_empty()));
}

#[test]
fn zero_core_boards_are_rejected() {
    let config =
        HierarchyConfig::configure(&HierarchyParams::default()).expect("defaults should validate");
    let mut board = board(0, Isa::Riscv, false);
    let err = ClassicHierarchy::new(config)
        .incorporate(&mut board)
        .expect_err("zero cores must fail");
    assert!(err.to_string().contains("zero cores"));
}

#[test]
fn memory_channels_fan_into_the_membus() {
    let config =
        HierarchyConfig::configure(&HierarchyParams::default()).expect("defaults should validate");
    let mut board = SimpleBoard::new(BoardConfig {
        num_cores: 1,
        isa: Isa::Riscv,
        mem_channels: 2,
        mem_ranges: vec![
            AddrRange::new(0, 0x4000_0000),
            AddrRange::new(0x4000_0000, 0x4000_0000),
        ],
        coherent_io: false,
    });
    let graph = ClassicHierarchy::new(config)
        .incorporate(&mut board)
        .expect("incorporate should succeed");
    // non-x86, so the membus mem side holds exactly the two memory channels
    assert_eq!(2, graph.topo.fan_in(PortHandle::mem_side_ports(graph.membus)));
    let peers = graph.topo.peers(PortHandle::mem_side_ports(graph.membus));
    assert!(peers.contains(&PortHandle::mem_channel(0)));
    assert!(peers.contains(&PortHandle::mem_channel(1)));
}

#[test]
fn hierarchy_exposes_membus_ports_before_incorporation() {
    let config =
        HierarchyConfig::configure(&HierarchyParams::default()).expect("defaults should validate");
    let hierarchy = ClassicHierarchy::new(config);
    assert_eq!(PortRole::MemSidePorts, hierarchy.mem_side_port().role);
    assert_eq!(PortRole::CpuSidePorts, hierarchy.cpu_side_port().role);
}

#[test]
fn four_core_x86_board_with_coherent_io() {
    let (graph, board) = build(4, Isa::X86, true);
    assert_eq!(4, graph.cores.len());
    let io_cache = graph.io_cache.expect("io cache must exist");
    let membus = graph
        .topo
        .node(graph.membus)
        .crossbar()
        .expect("membus node should be a crossbar");
    assert_eq!(64, membus.width);

    // membus core side serves the l3 cache, the io cache, and the system port
    let membus_peers = graph.topo.peers(PortHandle::cpu_side_ports(graph.membus));
    assert!(membus_peers.contains(&PortHandle::mem_side(graph.l3_cache)));
    assert!(membus_peers.contains(&PortHandle::mem_side(io_cache)));
    assert!(membus_peers.contains(&PortHandle::system_port()));

    assert_eq!(
        Some(PortHandle::cpu_side_ports(graph.membus)),
        board.system_port()
    );
    for (i, core) in board.cores().iter().enumerate() {
        let ct = &graph.cores[i];
        assert_eq!(Some(PortHandle::cpu_side(ct.l1i)), core.icache_port());
        assert_eq!(Some(PortHandle::cpu_side(ct.l1d)), core.dcache_port());
        assert_eq!(
            Some((PortHandle::cpu_side(ct.iptw), PortHandle::cpu_side(ct.dptw))),
            core.walker_ports()
        );
    }
}

#[test]
fn l2_caches_use_the_model_default_associativity() {
    let params = HierarchyParams {
        l2_assoc: 4, // validated, but the model keeps its own default
        ..HierarchyParams::default()
    };
    let config = HierarchyConfig::configure(&params).expect("params should validate");
    let mut board = board(1, Isa::Riscv, false);
    let graph = ClassicHierarchy::new(config)
        .incorporate(&mut board)
        .expect("incorporate should succeed");
    let l2 = graph
        .topo
        .node(graph.cores[0].l2)
        .cache()
        .expect("l2 node should be a cache");
    assert_eq!(256 * 1024, l2.size);
    assert_eq!(CacheParams::l2(l2.size).assoc, l2.assoc);
}
