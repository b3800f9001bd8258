use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use toml::Table;

use cachetron::board::{BoardConfig, Isa, SimpleBoard};
use cachetron::hierarchy::{CacheHierarchy, ClassicHierarchy, HierarchyConfig, HierarchyParams};
use cachetron::sim::config::{Config, SimConfig};

#[derive(Parser)]
#[command(version, about)]
struct CachetronArgs {
    #[arg(help = "Path to config.toml")]
    config_path: PathBuf,
    #[arg(long, help = "Override number of cores")]
    num_cores: Option<usize>,
    #[arg(long, help = "Override board ISA (x86, arm, riscv)")]
    isa: Option<Isa>,
    #[arg(long, help = "Override coherent i/o support")]
    coherent_io: Option<bool>,
    #[arg(long, help = "Enable log at level (0:none, 1:info, 2:debug)")]
    log: Option<u64>,
    #[arg(long, help = "Print a JSON summary of the built graph")]
    dump_json: bool,
}

pub fn main() -> anyhow::Result<()> {
    let argv = CachetronArgs::parse();
    let config = fs::read_to_string(&argv.config_path).unwrap_or_else(|err| {
        eprintln!("failed to read config file: {}", err);
        std::process::exit(1);
    });

    let config_table: Table = toml::from_str(&config).expect("cannot parse config toml");
    let mut sim_config = SimConfig::from_section(config_table.get("sim"));
    let mut board_config = BoardConfig::from_section(config_table.get("board"));
    let hierarchy_params = HierarchyParams::from_section(config_table.get("hierarchy"));

    // override toml configs with argv
    sim_config.log_level = argv.log.unwrap_or(sim_config.log_level);
    sim_config.dump_json = argv.dump_json || sim_config.dump_json;
    board_config.num_cores = argv.num_cores.unwrap_or(board_config.num_cores);
    board_config.isa = argv.isa.unwrap_or(board_config.isa);
    board_config.coherent_io = argv.coherent_io.unwrap_or(board_config.coherent_io);

    let mut logger = env_logger::Builder::from_default_env();
    match sim_config.log_level {
        0 => {}
        1 => {
            logger.filter_level(log::LevelFilter::Info);
        }
        _ => {
            logger.filter_level(log::LevelFilter::Debug);
        }
    }
    logger.init();

    let hierarchy_config = HierarchyConfig::configure(&hierarchy_params).unwrap_or_else(|err| {
        eprintln!("invalid cache spec: {}", err);
        std::process::exit(1);
    });

    let mut board = SimpleBoard::new(board_config);
    let hierarchy = ClassicHierarchy::new(hierarchy_config);
    let graph = hierarchy.incorporate(&mut board)?;

    info!(
        "built hierarchy graph: {} cores, {} nodes, {} links",
        graph.num_cores(),
        graph.topo.num_nodes(),
        graph.topo.links().len()
    );

    if sim_config.dump_json {
        println!("{}", serde_json::to_string_pretty(&graph.summary())?);
    }
    Ok(())
}
