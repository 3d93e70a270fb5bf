//! Build script for conveyor-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates conveyor.toml at compile time and embeds it as a constant

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use conveyor_core::config::ConveyorConfig;

fn main() {
    setup_linker();
    let config = load_config();
    write_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse and validate conveyor.toml
fn load_config() -> ConveyorConfig {
    // Re-run if conveyor.toml changes
    println!("cargo:rerun-if-changed=conveyor.toml");

    let config_path = Path::new("conveyor.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: conveyor.toml not found!                                 ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a conveyor.toml configuration file.       ║\n\
            ║  Please create one in the conveyor-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read conveyor.toml                             ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: ConveyorConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid conveyor.toml                                    ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid value in conveyor.toml                           ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&e.to_string())
        );
    }

    println!("cargo:warning=conveyor.toml validated successfully");
    config
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Emit the validated config as Rust source for `include!`
fn write_config(config: &ConveyorConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let drive = &config.drivetrain;

    let source = format!(
        "/// Configuration compiled from conveyor.toml\n\
         pub const CONFIG: conveyor_core::config::ConveyorConfig = conveyor_core::config::ConveyorConfig {{\n    \
             drivetrain: conveyor_core::units::Drivetrain {{\n        \
                 belt_mm_per_rev: {:?}_f32,\n        \
                 belt_reduction: {:?}_f32,\n        \
                 pulses_per_rev: {}_u32,\n    \
             }},\n    \
             initial_speed: {}_i32,\n    \
             direction: conveyor_core::traits::Direction::{:?},\n    \
             contrast: {}_u8,\n\
         }};\n",
        drive.belt_mm_per_rev,
        drive.belt_reduction,
        drive.pulses_per_rev,
        config.initial_speed,
        config.direction,
        config.contrast,
    );

    fs::write(out_dir.join("conveyor_config.rs"), source).unwrap();
}
