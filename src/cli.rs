use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "jhw", version, about = "Jenkins Build History TUI")]
pub struct Cli {
    /// Repository in org/repo format
    pub repo: String,

    /// Base URL of the CI server, e.g. https://ci.example.com
    #[arg(short, long)]
    pub server: String,

    /// Request timeout in seconds (no timeout when omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Write debug logs to $XDG_STATE_HOME/jhw/debug.log
    #[arg(short, long)]
    pub verbose: bool,
}
