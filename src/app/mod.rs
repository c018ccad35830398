use crate::configuration::manifest::{Manifest, SuiteEntry};
use crate::reporter::error::PrinterError;
use crate::reporter::single::Failure;
use crate::reporter::Printer;

/// Drives the printer with the lifecycle of a recorded run: suite by
/// suite, test by test, then the run summary.
pub struct App {
    name: String,
    suites: Vec<SuiteEntry>,
    printer: Printer,
}

impl App {
    pub fn new(manifest: Manifest, printer: Printer) -> Self {
        App {
            name: manifest.name,
            suites: manifest.suites,
            printer,
        }
    }

    pub fn run(&mut self) -> Result<(), PrinterError> {
        info!("Starting report for '{}'", self.name);
        info!("Registered {} suites", self.suites.len());

        let mut total_time = 0.0;
        let mut total_count = 0;

        for suite in &self.suites {
            debug!("Entering suite '{}'", suite.name);
            self.printer.suite_started(&suite.name, suite.tests.len())?;

            for test in &suite.tests {
                self.printer.test_started(&test.name)?;

                total_count += 1;
                if let Some(time) = test.time {
                    total_time += time;
                }

                let failure = test.failure.clone().map(Failure::from);
                self.printer.test_ended(
                    &test.name,
                    test.status,
                    test.time,
                    test.message.as_deref(),
                    failure,
                )?;
            }

            self.printer.suite_ended()?;
        }

        self.printer.run_completed(total_time, total_count)
    }
}
