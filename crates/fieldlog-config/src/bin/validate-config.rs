//! Config validation CLI tool
//!
//! Validates a fieldlog configuration file and reports any errors.

use fieldlog_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a fieldlog configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            eprintln!();
            eprintln!("Example:");
            eprintln!("  validate-config {}", default_path.display());
            eprintln!("  validate-config config.example.toml");
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match fieldlog_config::load_config(&config_path) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", fieldlog_config::CURRENT_CONFIG_VERSION);
            println!(
                "  Trainer: {} <{}>",
                config.trainer.name, config.trainer.identity
            );
            println!("  Storage: {:?} in {}", config.storage.backend, config.storage.data_dir.display());
            println!("  Schools: {}", config.schools.len());

            println!();
            println!("Schools:");
            for (index, profile) in config.schools.iter().enumerate() {
                let default_marker = if index == 0 { " (default)" } else { "" };
                println!(
                    "  - {}: {}{}",
                    profile.school.identity, profile.school.name, default_marker
                );
                if let Some(location) = &profile.location {
                    println!("      location: {}", location);
                }
                if let Some(grades) = &profile.grades {
                    println!("      grades: {}", grades);
                }
                if let Some(students) = profile.total_students {
                    println!("      students: {}", students);
                }
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                fieldlog_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                fieldlog_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                fieldlog_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                fieldlog_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        fieldlog_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
