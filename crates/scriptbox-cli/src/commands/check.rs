//! `scriptbox check` command.
//!
//! Compiles a script and reports syntax errors without running anything.

use clap::Args;

use crate::{input, output};

/// Compile a script without running it.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path to the script file, or `-` for stdin.
    pub script: String,
}

/// Executes the check command.
pub fn execute(args: &CheckArgs) -> anyhow::Result<()> {
    let source = input::read_script(&args.script)?;
    match scriptbox_lang::compile(&source) {
        Ok(_) => {
            output::print_success(&format!("{} compiles", args.script));
            Ok(())
        }
        Err(e) => {
            output::print_error(&e.to_string());
            output::print_diagnostics(&e);
            anyhow::bail!("{} does not compile", args.script)
        }
    }
}
