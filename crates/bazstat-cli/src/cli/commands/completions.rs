//! `bazstat completions <shell>` and `bazstat manpage`.

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;

use crate::cli::Cli;

pub fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "bazstat", &mut io::stdout());
}

pub fn run_manpage() -> Result<()> {
    clap_mangen::Man::new(Cli::command())
        .render(&mut io::stdout())
        .context("render man page")
}
