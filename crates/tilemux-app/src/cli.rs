use clap::Parser;

/// tilemux: tiling terminal sessions driven over stdin.
#[derive(Parser, Debug)]
#[command(name = "tilemux", version, about)]
pub struct Args {
    /// Working directory new shells start in.
    #[arg(short = 'd', long)]
    pub directory: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Start with a fresh terminal instead of the saved session.
    #[arg(long)]
    pub no_restore: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
