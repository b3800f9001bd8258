use std::error::Error;
use std::fmt;

use serde::Deserialize;

use crate::hierarchy::xbar::XbarParams;
use crate::sim::config::Config;

/// Spec validation failure. Raised at configure time, before any node is
/// built, so a bad spec never leaves a partial graph behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    InvalidSize { field: &'static str, value: String },
    InvalidAssoc { field: &'static str, assoc: u32 },
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::InvalidSize { field, value } => {
                write!(f, "invalid size '{}' for {}", value, field)
            }
            SpecError::InvalidAssoc { field, assoc } => {
                write!(f, "invalid associativity {} for {}, must be >= 1", assoc, field)
            }
        }
    }
}

impl Error for SpecError {}

/// Parse a memory size string of the form `<integer><unit>` into bytes.
/// Units are binary throughout: `kB` and `KiB` are both 2^10.
pub fn parse_mem_size(value: &str) -> Option<u64> {
    let s = value.trim();
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, unit) = s.split_at(digits_end);
    let count: u64 = digits.parse().ok()?;
    let scale: u64 = match unit {
        "B" => 1,
        "kB" | "KiB" => 1 << 10,
        "MB" | "MiB" => 1 << 20,
        "GB" | "GiB" => 1 << 30,
        _ => return None,
    };
    let bytes = count.checked_mul(scale)?;
    (bytes > 0).then_some(bytes)
}

/// Size and associativity of one cache level, validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSpec {
    pub size: u64,
    pub assoc: u32,
}

impl CacheSpec {
    pub fn parse(size: &str, assoc: u32, field: &'static str) -> Result<Self, SpecError> {
        let size = parse_mem_size(size).ok_or_else(|| SpecError::InvalidSize {
            field,
            value: size.to_string(),
        })?;
        if assoc < 1 {
            return Err(SpecError::InvalidAssoc { field, assoc });
        }
        Ok(Self { size, assoc })
    }
}

/// Raw `[hierarchy]` config section, before validation. Sizes stay as the
/// strings the user wrote so error messages can echo them back.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HierarchyParams {
    pub l1d_size: String,
    pub l1i_size: String,
    pub l2_size: String,
    pub l3_size: String,
    pub l1d_assoc: u32,
    pub l1i_assoc: u32,
    pub l2_assoc: u32,
    pub l3_assoc: u32,
    /// Membus override. `None` gets a fresh default system crossbar per
    /// hierarchy; instances never share a membus.
    #[serde(skip)]
    pub membus: Option<XbarParams>,
}

impl Config for HierarchyParams {}

impl Default for HierarchyParams {
    fn default() -> Self {
        Self {
            l1d_size: "32kB".to_string(),
            l1i_size: "32kB".to_string(),
            l2_size: "256kB".to_string(),
            l3_size: "1024kB".to_string(),
            l1d_assoc: 8,
            l1i_assoc: 8,
            l2_assoc: 16,
            l3_assoc: 16,
            membus: None,
        }
    }
}

/// Validated three-level sizing plus the membus choice. Immutable once
/// configured; the builder composes one of these rather than inheriting
/// sizing behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyConfig {
    pub l1i: CacheSpec,
    pub l1d: CacheSpec,
    pub l2: CacheSpec,
    pub l3: CacheSpec,
    pub membus: XbarParams,
}

impl HierarchyConfig {
    /// Validate every spec up front. Fails fast with the first offending
    /// field; nothing is constructed on error.
    pub fn configure(params: &HierarchyParams) -> Result<Self, SpecError> {
        Ok(Self {
            l1i: CacheSpec::parse(&params.l1i_size, params.l1i_assoc, "l1i")?,
            l1d: CacheSpec::parse(&params.l1d_size, params.l1d_assoc, "l1d")?,
            l2: CacheSpec::parse(&params.l2_size, params.l2_assoc, "l2")?,
            l3: CacheSpec::parse(&params.l3_size, params.l3_assoc, "l3")?,
            membus: params.membus.unwrap_or_else(XbarParams::system),
        })
    }
}
