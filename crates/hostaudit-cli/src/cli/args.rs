//! Command-line argument definitions using clap.

use clap::Parser;
use hostaudit_engine::Mode;

/// Audit this host against its security baseline.
///
/// Without arguments the run is unattended: output goes to the log file and
/// a host that stays non-compliant is warned and eventually shut down.
/// Policy is read from $HOSTAUDIT_CONFIG or /etc/hostaudit/config.toml.
#[derive(Parser, Debug)]
#[command(name = "hostaudit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print results to the terminal and never escalate
    #[arg(short, long)]
    pub interactive: bool,
}

impl Cli {
    pub const fn mode(&self) -> Mode {
        if self.interactive {
            Mode::Interactive
        } else {
            Mode::Normal
        }
    }
}
