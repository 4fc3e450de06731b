//! Headless replay entry point (native).
//!
//! Usage: `airform <script.json> [--config <config.json>]`

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting Airform");

    let mut script_path = None;
    let mut config_path = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = args.next(),
            _ => script_path = Some(arg),
        }
    }

    let Some(script_path) = script_path else {
        log::error!("Usage: airform <script.json> [--config <config.json>]");
        std::process::exit(2);
    };

    let config = match config_path {
        Some(path) => match airform_core::InteractionConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{path}: {e}");
                std::process::exit(1);
            }
        },
        None => airform_core::InteractionConfig::default(),
    };

    let script = match airform_app::Script::load(&script_path) {
        Ok(script) => script,
        Err(e) => {
            log::error!("{script_path}: {e}");
            std::process::exit(1);
        }
    };

    let report = airform_app::replay(&script, config);
    for feedback in &report.feedback {
        if feedback.is_error() {
            log::warn!("{}", feedback.message());
        } else {
            log::info!("{}", feedback.message());
        }
    }
    log::info!(
        "Finished: {} objects, {} strokes awaiting solidification, stroke in progress: {}",
        report.objects,
        report.pending_strokes,
        report.stroke_in_progress
    );
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
