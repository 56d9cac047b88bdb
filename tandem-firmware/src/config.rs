//! Board timing, generated at build time from tandem.toml

use tandem_core::config::{LockTimeouts, TimingConfig};

include!(concat!(env!("OUT_DIR"), "/tandem_config.rs"));
