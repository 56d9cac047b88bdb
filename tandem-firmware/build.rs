//! Build script for tandem-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates tandem.toml and generates the timing constants from it

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tandem_core::config::{ConfigError, LockTimeouts, TimingConfig};

#[path = "build_support.rs"]
mod build_support;

use build_support::format_error_lines;

/// Shape of tandem.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    timing: TimingConfig,
    locks: LockTimeouts,
}

fn main() {
    setup_linker();
    let config = load_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and validate tandem.toml
fn load_config() -> FileConfig {
    println!("cargo:rerun-if-changed=tandem.toml");

    let config_path = Path::new("tandem.toml");

    if !config_path.exists() {
        println!("cargo:warning=tandem.toml not found, using built-in timing");
        return FileConfig::default();
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read tandem.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: FileConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid tandem.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    if let Err(e) = config.timing.validate() {
        let detail = match e {
            ConfigError::ZeroPeriod(name) => format!("[timing] {} must be greater than zero", name),
            ConfigError::DebounceShorterThanPoll => {
                "[timing] debounce_ms must be at least input_poll_ms".to_string()
            }
        };
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid timing in tandem.toml                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&detail)
        );
    }

    println!("cargo:warning=tandem.toml validated successfully");
    config
}

/// Write `TIMING` and `LOCKS` into OUT_DIR/tandem_config.rs
fn generate_config(config: &FileConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let t = &config.timing;
    let l = &config.locks;

    let source = format!(
        "// Generated from tandem.toml\n\
         \n\
         pub const TIMING: TimingConfig = TimingConfig {{\n    \
             input_poll_ms: {},\n    \
             debounce_ms: {},\n    \
             pixel_refresh_ms: {},\n    \
             text_refresh_ms: {},\n    \
             ready_timeout_ms: {},\n    \
             clock_refresh_ms: {},\n    \
             status_interval_ms: {},\n\
         }};\n\
         \n\
         pub const LOCKS: LockTimeouts = LockTimeouts {{\n    \
             state_read: {},\n    \
             state_write: {},\n    \
             change_check: {},\n    \
             display: {},\n    \
             output: {},\n    \
             time_write: {},\n\
         }};\n",
        t.input_poll_ms,
        t.debounce_ms,
        t.pixel_refresh_ms,
        t.text_refresh_ms,
        t.ready_timeout_ms,
        t.clock_refresh_ms,
        t.status_interval_ms,
        l.state_read,
        l.state_write,
        l.change_check,
        l.display,
        l.output,
        l.time_write,
    );

    fs::write(out_dir.join("tandem_config.rs"), source).unwrap();
}
