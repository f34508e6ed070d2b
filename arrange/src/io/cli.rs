use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE")]
    pub input_file: PathBuf,
    #[arg(short, long, value_name = "FOLDER")]
    pub solution_folder: PathBuf,
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    pub log_level: LevelFilter,
    /// Keep this dimension of the project's container fixed
    #[arg(long, value_enum)]
    pub lock: Option<LockArg>,
    /// Physics ticks to run on the arranged scene before saving it
    #[arg(long, value_name = "N")]
    pub settle_ticks: Option<usize>,
    /// Folder holding the conduit, cable and tray tables, the built-in tables are used otherwise
    #[arg(long, value_name = "FOLDER")]
    pub catalog_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockArg {
    Width,
    Height,
}
