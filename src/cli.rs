use std::path::PathBuf;

use clap::Parser;

use ovn_rebuilder::domain::value_objects::DEFAULT_REMOTE_BASE;

/// Rebuild OVN locally and push changed binaries to remote MicroOVN hosts
#[derive(Parser, Debug)]
#[command(name = "ovn-rebuilder")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Press Enter to rebuild and deploy, Ctrl+C to exit.")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Comma-separated list of remote hosts to which changes are synced
    /// ('<connection_type>:<remote_host>', e.g. lxd:vm1,lxd:vm2 or ssh:root@10.0.0.5)
    #[arg(short = 'H', long)]
    pub hosts: String,

    /// Path to local OVN source directory
    #[arg(short, long, default_value = "./")]
    pub ovn_src: PathBuf,

    /// Path to the unsquashed snap on remote hosts
    #[arg(short, long, default_value = DEFAULT_REMOTE_BASE)]
    pub remote_path: PathBuf,

    /// Number of parallel jobs passed to 'make' (defaults to CPU count)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Output loop events as NDJSON
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
