use serde::Serialize;

/// Crossbar parameterization: datapath width in bytes plus the three
/// pipeline latencies of the classic coherent crossbar model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XbarParams {
    pub width: u32,
    pub frontend_latency: u32,
    pub forward_latency: u32,
    pub response_latency: u32,
}

impl XbarParams {
    /// Private per-core L2 crossbar.
    pub fn l2() -> Self {
        Self {
            width: 32,
            frontend_latency: 1,
            forward_latency: 0,
            response_latency: 1,
        }
    }

    /// Shared L3 crossbar, sized for the fan-in of every core's L2.
    pub fn l3() -> Self {
        Self {
            width: 64,
            frontend_latency: 1,
            forward_latency: 0,
            response_latency: 2,
        }
    }

    /// Default membus: a 64-byte system crossbar. Factory function rather
    /// than a shared default instance, so every hierarchy gets its own.
    pub fn system() -> Self {
        Self {
            width: 64,
            frontend_latency: 3,
            forward_latency: 4,
            response_latency: 2,
        }
    }
}
