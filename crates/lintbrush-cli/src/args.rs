use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "lintbrush",
    version,
    about = "A linter which focuses on low-level file hygiene",
    long_about = "A linter which focuses on the low-level things that are common across many \
repositories, such as making sure executable files have shebangs. Results are \
reported as SARIF."
)]
pub struct Args {
    /// Files to lint
    pub files: Vec<String>,

    /// Write results to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Return results in SARIF format (the only format currently emitted)
    #[arg(short, long)]
    pub sarif: bool,

    /// Print verbose output, including the source location of log lines
    #[arg(short, long)]
    pub verbose: bool,

    /// Report every violation instead of stopping at the first one
    #[arg(long)]
    pub keep_going: bool,
}
