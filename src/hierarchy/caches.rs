//! Per-level cache parameterizations.
//!
//! The hierarchy never implements cache behavior; these are the knobs it
//! hands to the host simulator's cache engine. Latency and MSHR defaults
//! follow the stock classic-cache models.

use serde::Serialize;

use crate::board::AddrRange;
use crate::hierarchy::config::CacheSpec;

/// Fixed size of the instruction- and data-side page-walk caches.
pub const WALK_CACHE_SIZE: u64 = 256 << 10; // 256 KiB

/// Fixed size of the coherent-I/O cache.
pub const IO_CACHE_SIZE: u64 = 256 << 10; // 256 kB

/// Model-default L2 associativity, used when the builder passes size only.
pub const DEFAULT_L2_ASSOC: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheParams {
    pub size: u64,
    pub assoc: u32,
    pub tag_latency: u32,
    pub data_latency: u32,
    pub response_latency: u32,
    pub mshrs: u32,
    pub tgts_per_mshr: u32,
    pub write_buffers: u32,
    pub writeback_clean: bool,
    /// Explicit address ranges; empty means the cache covers whatever its
    /// memory-side interconnect covers.
    pub addr_ranges: Vec<AddrRange>,
}

impl CacheParams {
    /// L1 instruction cache. Never writes back clean lines, so evictions
    /// out of the L1I stay invisible to the shared levels.
    pub fn l1i(spec: &CacheSpec) -> Self {
        Self {
            size: spec.size,
            assoc: spec.assoc,
            tag_latency: 1,
            data_latency: 1,
            response_latency: 1,
            mshrs: 16,
            tgts_per_mshr: 20,
            write_buffers: 8,
            writeback_clean: false,
            addr_ranges: Vec::new(),
        }
    }

    /// L1 data cache.
    pub fn l1d(spec: &CacheSpec) -> Self {
        Self {
            size: spec.size,
            assoc: spec.assoc,
            tag_latency: 1,
            data_latency: 1,
            response_latency: 1,
            mshrs: 16,
            tgts_per_mshr: 20,
            write_buffers: 8,
            writeback_clean: false,
            addr_ranges: Vec::new(),
        }
    }

    /// Private L2. Size-only parameterization; associativity stays at the
    /// model default.
    pub fn l2(size: u64) -> Self {
        Self {
            size,
            assoc: DEFAULT_L2_ASSOC,
            tag_latency: 10,
            data_latency: 10,
            response_latency: 1,
            mshrs: 20,
            tgts_per_mshr: 12,
            write_buffers: 8,
            writeback_clean: false,
            addr_ranges: Vec::new(),
        }
    }

    /// Shared L3, mostly inclusive of the L2 and page-walk caches.
    pub fn l3(spec: &CacheSpec) -> Self {
        Self {
            size: spec.size,
            assoc: spec.assoc,
            tag_latency: 20,
            data_latency: 20,
            response_latency: 1,
            mshrs: 32,
            tgts_per_mshr: 12,
            write_buffers: 16,
            writeback_clean: false,
            addr_ranges: Vec::new(),
        }
    }

    /// Page-walk cache for the instruction or data TLB walker.
    pub fn walk() -> Self {
        Self {
            size: WALK_CACHE_SIZE,
            assoc: 4,
            tag_latency: 1,
            data_latency: 1,
            response_latency: 1,
            mshrs: 20,
            tgts_per_mshr: 12,
            write_buffers: 8,
            writeback_clean: false,
            addr_ranges: Vec::new(),
        }
    }

    /// Fixed-function cache for coherent I/O traffic. Intentionally exposes
    /// no knobs; the only variable input is the board's memory ranges.
    pub fn io(addr_ranges: Vec<AddrRange>) -> Self {
        Self {
            size: IO_CACHE_SIZE,
            assoc: 8,
            tag_latency: 50,
            data_latency: 50,
            response_latency: 50,
            mshrs: 32,
            tgts_per_mshr: 12,
            write_buffers: 32,
            writeback_clean: false,
            addr_ranges,
        }
    }
}
