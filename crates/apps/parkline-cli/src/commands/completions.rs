//! Shell completions command.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::{Cli, CompletionShell};
use crate::error::CliResult;

/// Generate shell completions for the specified shell.
pub fn completions(shell: CompletionShell) -> CliResult<String> {
    let mut cmd = Cli::command();
    let shell = match shell {
        CompletionShell::Bash => Shell::Bash,
        CompletionShell::Zsh => Shell::Zsh,
        CompletionShell::Fish => Shell::Fish,
        CompletionShell::PowerShell => Shell::PowerShell,
    };

    generate(shell, &mut cmd, "parkline", &mut io::stdout());

    // Output already written to stdout
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_all_shells() {
        for shell in [
            CompletionShell::Bash,
            CompletionShell::Zsh,
            CompletionShell::Fish,
            CompletionShell::PowerShell,
        ] {
            assert_eq!(completions(shell).unwrap(), "");
        }
    }
}
