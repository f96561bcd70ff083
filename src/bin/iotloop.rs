//! Runs the request loop against the configured server over `std::net`.
//!
//! The built-in configuration is used unless `IOTLOOP_CONFIG` names a JSON
//! file (see `iotloop::config`). Logging is controlled with `RUST_LOG` and
//! defaults to `info`. Both variables may also come from a `.env` file.

use iotloop::config::Config;
use iotloop::network::application::http::LogObserver;
use iotloop::network::std_net::StdSocketProvider;
use iotloop::request_loop::RequestLoop;
use iotloop::system::StdClock;
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let raw = match std::env::var("IOTLOOP_CONFIG") {
        Ok(path) => match std::fs::read(&path) {
            Ok(raw) => Some(raw),
            Err(e) => {
                error!("Cannot read {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        Err(_) => None,
    };
    let config = match raw.as_deref().map(Config::from_json) {
        None => Config::DEFAULT,
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Using {:?}", config);

    let mut request_loop = RequestLoop::new(config, StdSocketProvider, StdClock::new(), LogObserver);
    match request_loop.run() {
        Ok(never) => match never {},
        Err(err) => {
            error!("Request loop stopped after {} cycles: {}", request_loop.cycles(), err);
            ExitCode::FAILURE
        }
    }
}
