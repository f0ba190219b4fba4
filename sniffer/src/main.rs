use crate::capture::live::LiveCapture;
use crate::config::Config;
use crate::context::Context;
use crate::presentation::StdoutSink;
use crate::session::CaptureSession;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn main() {
    let config = match Config::from_file() {
        Ok(value) => value,
        Err(err) => exit_with_error("Config initialization", &err, err.additional_info()),
    };

    if let Err(err) = logging::setup(&config) {
        exit_with_error("Logger initialization", &err, err.additional_info());
    }

    let context = match Context::new(&config) {
        Ok(value) => value,
        Err(err) => exit_with_error("Context initialization", &err, err.additional_info()),
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&shutdown);
    let handler = ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::Release);
    });
    if let Err(err) = handler {
        exit_with_error("Interrupt handler setup", &err, None);
    }

    let presenter = context.presenter();
    let session = CaptureSession::new(
        LiveCapture::new(context.capture_settings),
        StdoutSink,
        context.filter,
        presenter,
        context.session_options,
        shutdown,
    );

    match session.run() {
        Ok(summary) => log::info!(
            "Capture stopped: {}. Packets accepted: {}.",
            summary.stop_reason,
            summary.stats.total()
        ),
        Err(err) => exit_with_error("Capture", &err, err.additional_info()),
    }
}

fn exit_with_error(what: &str, err: &dyn std::fmt::Display, additional_info: Option<String>) -> ! {
    let mut message = format!("{what} failed. Error: {err}");
    if let Some(additional_info) = additional_info {
        message.push_str(&format!(" Additional_info: {additional_info}"));
    }
    eprintln!("{}", message);
    std::process::exit(1);
}

mod capture;
mod config;
mod context;
mod filter;
mod logging;
mod net;
mod presentation;
mod session;
mod stats;
