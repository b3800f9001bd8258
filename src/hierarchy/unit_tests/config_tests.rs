use crate::hierarchy::config::{parse_mem_size, CacheSpec, HierarchyConfig, HierarchyParams, SpecError};
use crate::hierarchy::xbar::XbarParams;

#[test]
fn mem_sizes_parse_with_binary_units() {
    assert_eq!(Some(32 * 1024), parse_mem_size("32kB"));
    assert_eq!(Some(32 * 1024), parse_mem_size("32KiB"));
    assert_eq!(Some(1024 * 1024), parse_mem_size("1024kB"));
    assert_eq!(Some(1024 * 1024), parse_mem_size("1MiB"));
    assert_eq!(Some(8), parse_mem_size("8B"));
    assert_eq!(Some(2 << 30), parse_mem_size("2GB"));
    assert_eq!(Some(256 * 1024), parse_mem_size(" 256kB "));
}

#[test]
fn malformed_mem_sizes_are_rejected() {
    assert_eq!(None, parse_mem_size("abc"));
    assert_eq!(None, parse_mem_size(""));
    assert_eq!(None, parse_mem_size("32"));
    assert_eq!(None, parse_mem_size("kB"));
    assert_eq!(None, parse_mem_size("0kB"));
    assert_eq!(None, parse_mem_size("-1kB"));
    assert_eq!(None, parse_mem_size("32xB"));
    assert_eq!(None, parse_mem_size("3.5kB"));
}

#[test]
fn default_params_configure_cleanly() {
    let config =
        HierarchyConfig::configure(&HierarchyParams::default()).expect("defaults should validate");
    assert_eq!(32 * 1024, config.l1i.size);
    assert_eq!(32 * 1024, config.l1d.size);
    assert_eq!(256 * 1024, config.l2.size);
    assert_eq!(1024 * 1024, config.l3.size);
    assert_eq!(8, config.l1i.assoc);
    assert_eq!(8, config.l1d.assoc);
    assert_eq!(16, config.l2.assoc);
    assert_eq!(16, config.l3.assoc);
    // default membus is a fresh 64-byte system crossbar
    assert_eq!(XbarParams::system(), config.membus);
    assert_eq!(64, config.membus.width);
}

#[test]
fn zero_associativity_is_an_invalid_spec() {
    let err = CacheSpec::parse("32kB", 0, "l1d").expect_err("assoc 0 must fail");
    assert_eq!(
        SpecError::InvalidAssoc {
            field: "l1d",
            assoc: 0
        },
        err
    );

    let params = HierarchyParams {
        l2_assoc: 0,
        ..HierarchyParams::default()
    };
    let err = HierarchyConfig::configure(&params).expect_err("assoc 0 must fail");
    assert!(matches!(err, SpecError::InvalidAssoc { field: "l2", .. }));
}

#[test]
fn unparsable_size_is_an_invalid_spec() {
    let params = HierarchyParams {
        l3_size: "lots".to_string(),
        ..HierarchyParams::default()
    };
    let err = HierarchyConfig::configure(&params).expect_err("bad size must fail");
    assert_eq!(
        SpecError::InvalidSize {
            field: "l3",
            value: "lots".to_string()
        },
        err
    );
}

#[test]
fn membus_override_is_respected() {
    let membus = XbarParams {
        width: 32,
        ..XbarParams::system()
    };
    let params = HierarchyParams {
        membus: Some(membus),
        ..HierarchyParams::default()
    };
    let config = HierarchyConfig::configure(&params).expect("override should validate");
    assert_eq!(membus, config.membus);
}
