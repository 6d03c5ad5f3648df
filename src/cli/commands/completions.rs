use crate::cli::{Cli, Shell};
use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};
use std::io;

const BIN_NAME: &str = "fleetwatch";

pub fn execute(shell: Shell) {
    let mut cmd = Cli::command();

    generate(to_clap_shell(&shell), &mut cmd, BIN_NAME, &mut io::stdout());

    // stderr keeps the generated script clean when redirected
    eprintln!("\n{}", install_hint(&shell));
}

fn to_clap_shell(shell: &Shell) -> ClapShell {
    match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::PowerShell => ClapShell::PowerShell,
        Shell::Elvish => ClapShell::Elvish,
    }
}

fn install_hint(shell: &Shell) -> &'static str {
    match shell {
        Shell::Bash => "# Add to ~/.bashrc:\n#   eval \"$(fleetwatch completions bash)\"",
        Shell::Zsh => "# Add to ~/.zshrc:\n#   eval \"$(fleetwatch completions zsh)\"",
        Shell::Fish => {
            "# Save to:\n#   fleetwatch completions fish > ~/.config/fish/completions/fleetwatch.fish"
        }
        Shell::PowerShell => {
            "# Add to PowerShell profile:\n#   fleetwatch completions powershell | Out-String | Invoke-Expression"
        }
        Shell::Elvish => "# Add to Elvish config:\n#   eval (fleetwatch completions elvish | slurp)",
    }
}
