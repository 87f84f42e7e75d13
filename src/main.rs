use anyhow::Result;
use clap::Parser;
use macroflow::{CLIArguments, analyse_main, extract_main};

fn main() -> Result<()> {
    let args = CLIArguments::parse();

    match args {
        CLIArguments::Extract(args) => extract_main(args),
        CLIArguments::Analyse(args) => analyse_main(args),
    }
}
