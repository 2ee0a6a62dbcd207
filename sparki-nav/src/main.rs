//! sparki-nav - explore a room with a Sparki robot over Bluetooth serial
//!
//! Usage: `sparki-nav [config.toml] [--port <device>]`
//!
//! Without a config path, `sparki.toml` in the working directory is used if
//! present, otherwise the built-in calibration. Ctrl-C finishes the current
//! cycle, stops the motors and closes the port.

use sparki_link::SparkiLink;
use sparki_map::NullSink;
use sparki_nav::{ExploreController, NavError, Result, SparkiConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const DEFAULT_CONFIG: &str = "sparki.toml";

const USAGE: &str = "Usage: sparki-nav [config.toml] [--port <device>]";

#[derive(Debug, Default)]
struct Args {
    config_path: Option<PathBuf>,
    port: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Args>> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--port" => {
                let port = args
                    .next()
                    .ok_or_else(|| NavError::Config("--port needs a device path".to_string()))?;
                parsed.port = Some(port);
            }
            flag if flag.starts_with("--") => {
                return Err(NavError::Config(format!("unknown option {}", flag)));
            }
            path if parsed.config_path.is_none() => parsed.config_path = Some(PathBuf::from(path)),
            extra => {
                return Err(NavError::Config(format!("unexpected argument {}", extra)));
            }
        }
    }
    Ok(Some(parsed))
}

/// Load the configuration; the second value names where it came from.
fn load_config(args: &Args) -> Result<(SparkiConfig, String)> {
    let (mut config, source) = match &args.config_path {
        Some(path) => (SparkiConfig::load(path)?, path.display().to_string()),
        None if Path::new(DEFAULT_CONFIG).exists() => (
            SparkiConfig::load(Path::new(DEFAULT_CONFIG))?,
            DEFAULT_CONFIG.to_string(),
        ),
        None => (SparkiConfig::default(), "built-in defaults".to_string()),
    };

    if let Some(port) = &args.port {
        config.link.port = port.clone();
    }
    config.validate()?;
    Ok((config, source))
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn main() -> Result<()> {
    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let (config, source) = load_config(&args)?;
    init_logging(&config.logging.level);

    log::info!("sparki-nav starting");
    log::info!("  Config: {}", source);
    log::info!("  Port: {} @ {} baud", config.link.port, config.link.baud_rate);
    log::info!(
        "  Grid: {}x{}, cone ±{}° to {}cm, {} passes",
        config.grid.width,
        config.grid.height,
        config.cone.half_angle_deg,
        config.cone.max_range_cm,
        config.cone.passes
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut link = match SparkiLink::open(&config.link) {
        Ok(link) => link,
        Err(e) => {
            log::error!("Could not connect to {}: {}", config.link.port, e);
            return Err(e.into());
        }
    };
    link.log_travel();

    let mut controller = ExploreController::from_config(&config);
    controller.sync_baseline(&mut link);
    controller.run(&mut link, &mut NullSink, &running);

    link.disconnect();
    log::info!("sparki-nav shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Option<Args>> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_config_and_port() {
        let parsed = args(&["robot.toml", "--port", "/dev/rfcomm0"]).unwrap().unwrap();
        assert_eq!(parsed.config_path, Some(PathBuf::from("robot.toml")));
        assert_eq!(parsed.port.as_deref(), Some("/dev/rfcomm0"));

        let parsed = args(&["--port", "/dev/rfcomm0"]).unwrap().unwrap();
        assert!(parsed.config_path.is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(args(&["--port"]).is_err());
        assert!(args(&["--speed", "3"]).is_err());
        assert!(args(&["a.toml", "b.toml"]).is_err());
        assert!(args(&["--help"]).unwrap().is_none());
    }

    #[test]
    fn test_port_override() {
        let parsed = Args {
            config_path: None,
            port: Some("/dev/ttyUSB0".to_string()),
        };
        let (config, _) = load_config(&parsed).unwrap();
        assert_eq!(config.link.port, "/dev/ttyUSB0");
    }
}
