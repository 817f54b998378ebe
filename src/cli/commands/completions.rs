//! `dxb completions` command - shell completion scripts
//!
//! ```bash
//! source <(dxb completions bash)
//! dxb completions fish > ~/.config/fish/completions/dxb.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io::{self, Write};

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell`, named after the `dxb` binary
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin, out);
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_scripts_cover_query_commands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
            let text = script(shell);
            for sub in ["tx", "property", "stats", "resolve"] {
                assert!(text.contains(sub), "{:?} script lacks {}", shell, sub);
            }
        }
    }

    #[test]
    fn test_script_names_binary() {
        assert!(script(Shell::Bash).contains("dxb"));
    }
}
