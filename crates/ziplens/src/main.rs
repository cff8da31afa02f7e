mod bootstrap;

use std::io;

use anyhow::Result;
use clap::Parser;
use lens_core::event_log::EventLog;
use lens_core::settings::Settings;
use lens_data::loader::load_dataset;
use lens_engine::data_manager::DataManager;
use lens_ui::menu::Menu;

fn main() -> Result<()> {
    let settings = Settings::parse();
    settings.validate()?;

    bootstrap::setup_logging(settings.effective_log_level())?;

    tracing::info!("ziplens v{} starting", env!("CARGO_PKG_VERSION"));

    let mut events = match settings.log.as_deref() {
        Some(path) => EventLog::to_file(path)?,
        None => EventLog::to_stderr(),
    };
    let args: Vec<String> = std::env::args().skip(1).collect();
    events.log(&format!("Program started with arguments: {}", args.join(" ")));

    let dataset = load_dataset(
        settings.covid.as_deref(),
        settings.properties.as_deref(),
        settings.population.as_deref(),
        &mut events,
    );
    let manager = DataManager::new(dataset);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(manager, &mut events, stdin.lock(), stdout.lock());
    menu.run()?;

    Ok(())
}
