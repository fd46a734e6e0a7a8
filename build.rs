//! Generates the man page and shell completions from the clap definition.
//!
//! Output lands in `$OUT_DIR`; packaging copies it from there.

use clap::CommandFactory;
use clap_complete::{generate_to, Shell};
use std::env;
use std::fs;
use std::io::Result;
use std::path::PathBuf;

#[allow(dead_code)]
mod cli {
    include!("src/cli.rs");
}

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let out_dir = match env::var_os("OUT_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => return Ok(()),
    };

    let mut cmd = cli::Cli::command();

    let mut man = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut man)?;
    fs::write(out_dir.join("foreman-setup.1"), man)?;

    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        generate_to(shell, &mut cmd, "foreman-setup", &out_dir)?;
    }

    Ok(())
}
