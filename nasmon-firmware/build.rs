//! Build script for nasmon-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml and turns it into a `DeviceConfig` constant

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Largest HT16K33 dimming level
const MAX_BRIGHTNESS: i64 = 15;

fn main() {
    setup_linker();
    let settings = validate_config();
    generate_config(&settings);
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

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Values read from device.toml
struct Settings {
    display_on_ms: i64,
    brightness: i64,
    debounce_ms: i64,
    progress_step_ms: i64,
    baudrate: i64,
    frame_stale_ms: i64,
}

/// One integer setting: table, key, allowed range
struct Field {
    table: &'static str,
    key: &'static str,
    min: i64,
    max: i64,
}

const FIELDS: &[Field] = &[
    Field {
        table: "display",
        key: "timeout_ms",
        min: 1_000,
        max: 255_000,
    },
    Field {
        table: "bargraph",
        key: "brightness",
        min: 0,
        max: MAX_BRIGHTNESS,
    },
    Field {
        table: "trigger",
        key: "debounce_ms",
        min: 1,
        max: 1_000,
    },
    Field {
        table: "trigger",
        key: "progress_step_ms",
        min: 1,
        max: 1_000,
    },
    Field {
        table: "link",
        key: "baudrate",
        min: 1_200,
        max: 4_000_000,
    },
    Field {
        table: "link",
        key: "frame_stale_ms",
        min: 10,
        max: 10_000,
    },
];

/// Validate device.toml configuration at compile time
fn validate_config() -> Settings {
    // Re-run if device.toml changes
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a device.toml configuration file.         ║\n\
            ║  Please create one in the nasmon-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let values: Vec<i64> = FIELDS
        .iter()
        .map(|field| read_field(&config, field, &mut errors))
        .collect();

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid device configuration                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=device.toml validated successfully");

    Settings {
        display_on_ms: values[0],
        brightness: values[1],
        debounce_ms: values[2],
        progress_step_ms: values[3],
        baudrate: values[4],
        frame_stale_ms: values[5],
    }
}

/// Read one integer, recording an error if it is missing or out of range
fn read_field(config: &toml::Value, field: &Field, errors: &mut Vec<String>) -> i64 {
    let table = match config.get(field.table) {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push(format!("[{}] must be a table", field.table));
            return 0;
        }
        None => {
            errors.push(format!("Missing [{}] section", field.table));
            return 0;
        }
    };

    match table.get(field.key) {
        Some(toml::Value::Integer(v)) if (field.min..=field.max).contains(v) => *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                field.table, field.key, field.min, field.max
            ));
            0
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", field.table, field.key));
            0
        }
        None => {
            errors.push(format!("[{}] missing '{}'", field.table, field.key));
            0
        }
    }
}

/// Write the validated values as a `DeviceConfig` constant
fn generate_config(settings: &Settings) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("device_config.rs")).unwrap();

    writeln!(
        f,
        "/// Device configuration from device.toml\n\
         pub const DEVICE_CONFIG: DeviceConfig = DeviceConfig {{\n    \
             display_on_ms: {},\n    \
             brightness: {},\n    \
             progress_step_ms: {},\n    \
             debounce_ms: {},\n    \
             frame_stale_ms: {},\n    \
             baudrate: {},\n\
         }};",
        settings.display_on_ms,
        settings.brightness,
        settings.progress_step_ms,
        settings.debounce_ms,
        settings.frame_stale_ms,
        settings.baudrate,
    )
    .unwrap();
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
