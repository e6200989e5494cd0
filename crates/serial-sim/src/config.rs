//! Simulator configuration

use config::{Config, ConfigError, Environment, File};
use debug_serial::SerialConfig;
use serde::{Deserialize, Serialize};

/// Default configuration file stem (`serial-sim.toml`, `.yaml`, ...)
pub const CONFIG_FILE: &str = "serial-sim";

/// Simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Simulated transmitter settings
    pub serial: SerialConfig,

    /// Max tracing level (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,

    /// Time compression for the transmit-ready event source (1 = real time)
    pub speedup: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            log_level: "info".to_string(),
            speedup: 1,
        }
    }
}

/// Load configuration from `serial-sim.*` and `SERIAL_SIM__*` environment variables
pub fn load_config() -> Result<SimConfig, ConfigError> {
    load_config_from(CONFIG_FILE)
}

/// Load configuration from the file stem `name`, then the environment
///
/// Missing files and keys fall back to [`SimConfig::default`].
pub fn load_config_from(name: &str) -> Result<SimConfig, ConfigError> {
    Config::builder()
        .add_source(File::with_name(name).required(false))
        .add_source(
            Environment::with_prefix("SERIAL_SIM")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config_from("does-not-exist/serial-sim").unwrap();
        assert_eq!(config.serial, SerialConfig::default());
        assert_eq!(config.speedup, 1);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_file_overrides() {
        let stem = std::env::temp_dir().join(format!("serial-sim-test-{}", std::process::id()));
        let path = stem.with_extension("toml");
        std::fs::write(
            &path,
            "speedup = 50\n\n[serial]\nbaud = 38400\ndouble_speed = false\n",
        )
        .unwrap();

        let config = load_config_from(stem.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.speedup, 50);
        assert_eq!(config.serial.baud, 38_400);
        assert!(!config.serial.double_speed);
        assert_eq!(config.serial.clock_hz, 16_000_000);
    }
}
