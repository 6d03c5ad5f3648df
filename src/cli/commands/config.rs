use crate::cli::ConfigCommand;
use crate::config::Config;
use crate::error::Result;

pub fn execute(command: &ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init => {
            let config_path = Config::create_sample()?;
            println!("Created sample config file at: {}", config_path.display());
            println!("\nPlease edit the file and set the fleet API location:");
            println!("  base_url = \"https://filo.example.gov.tr\"");
        }
        ConfigCommand::Path => {
            let config_path = Config::config_file_path()?;
            println!("Config file path: {}", config_path.display());

            if !config_path.exists() {
                println!("Status: File does not exist");
                println!("\nTo create a sample config file, run:");
                println!("  fleetwatch config init");
                return Ok(());
            }

            println!("Status: File exists");
            match Config::load() {
                Ok(config) => {
                    println!("Valid: Yes");
                    match config.api_base_url() {
                        Ok(url) => println!("API: {}", url),
                        Err(_) => println!("API: not configured"),
                    }
                    println!("Window: {} days", config.thresholds.window_days);
                    println!("Format: {}", config.display.format);
                }
                Err(e) => {
                    println!("Valid: No");
                    println!("Error: {}", e);
                }
            }
        }
    }

    Ok(())
}
