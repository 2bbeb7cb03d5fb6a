use clap::Parser;

use dirtally::{Cli, Result};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
