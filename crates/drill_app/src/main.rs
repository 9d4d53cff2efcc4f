use std::io;

use decision_drill::config::EnvConfig;
use decision_drill::{install_signal_handlers, logging, Drill, ProcessTerminal};
use drill_app::load_catalog;
use drill_app::runtime::DrillRuntime;
use drill_app::view::ViewOptions;

fn main() -> io::Result<()> {
    let config = EnvConfig::from_env();
    if let Err(error) = logging::init(&config) {
        eprintln!("decision-drill: {error}");
    }

    let catalog = load_catalog(&config).map_err(|error| {
        tracing::error!(error = %error, "scenario catalog rejected");
        io::Error::other(error)
    })?;
    tracing::info!(
        origin = catalog.origin(),
        scenarios = catalog.len(),
        "scenario catalog loaded"
    );

    let drill = Drill::new(catalog, config.timing());
    let mut runtime = DrillRuntime::new(
        ProcessTerminal::new(),
        drill,
        ViewOptions::from_no_color(config.no_color),
    );

    let handle = runtime.runtime_handle();
    let _signals = install_signal_handlers(move || handle.request_stop())?;

    runtime.start()?;
    while !runtime.should_exit() {
        runtime.run_blocking_once();
    }
    runtime.stop()?;
    println!();
    Ok(())
}
