#[macro_use]
extern crate log;

#[macro_use]
extern crate derive_builder;

mod app;
mod configuration;
mod render;
mod reporter;
mod time;

use log::LevelFilter;
use signal_hook::{iterator::Signals, SIGINT};
use std::{path::PathBuf, process::exit, thread};
use structopt::StructOpt;
use terminal_size::{terminal_size, Width};

use self::app::App;
use self::configuration::command_line::{LogLevel, Opt};
use self::configuration::constants::common::DEFAULT_TERMINAL_WIDTH;
use self::configuration::manifest::Manifest;
use self::configuration::settings::Settings;
use self::render::Renderer;
use self::reporter::Printer;

fn main() {
    let options = Opt::from_args();
    let signals = Signals::new(&[SIGINT]).unwrap();

    thread::spawn(move || {
        for sig in signals.forever() {
            info!("Received signal {:?}, stopping", sig);
            exit(0);
        }
    });

    init_logging(
        options.logging.unwrap_or(LogLevel::Info).into(),
        &options.log_output_file,
    );

    let settings = match load_settings(&options.settings) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load printer settings: {}", e);
            exit(1);
        }
    };

    let width = options.width.or_else(detected_width).unwrap_or(DEFAULT_TERMINAL_WIDTH);
    debug!("Rendering at {} columns", width);

    let printer = match Printer::new(settings, width, Renderer::stdout()) {
        Ok(printer) => printer,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    match Manifest::from(options.file) {
        Ok(manifest) => {
            debug!("Loaded manifest {:#?}", manifest);
            let mut app = App::new(manifest, printer);
            if let Err(e) = app.run() {
                error!("Report rendering failed: {}", e);
                exit(1);
            }
        }
        Err(e) => {
            error!("Failed to load manifest file configuration {}", e);
            exit(1);
        }
    }
}

fn load_settings(
    path: &Option<PathBuf>,
) -> Result<Settings, configuration::error::ConfigurationError> {
    match path {
        Some(path) => Settings::from_file(path.clone()),
        None => Settings::new(),
    }
}

fn detected_width() -> Option<usize> {
    terminal_size().map(|(Width(width), _)| width as usize)
}

fn init_logging(level: LevelFilter, output: &Option<PathBuf>) {
    let mut dispatcher = fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}:{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record
                    .line()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "".to_owned()),
                record.level(),
                message
            ))
        })
        .level(level)
        // The report itself owns stdout; diagnostics go to stderr.
        .chain(std::io::stderr());

    if let Some(log_file) = output {
        dispatcher = dispatcher.chain(fern::log_file(log_file).unwrap())
    }
    dispatcher.apply().unwrap();
    info!("Logging level {} enabled", level);
}
