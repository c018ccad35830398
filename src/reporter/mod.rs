pub(crate) mod error;
pub(crate) mod group;
pub(crate) mod layout;
pub(crate) mod name;
pub(crate) mod preview;
pub(crate) mod single;
pub(crate) mod status;

use crate::configuration::settings::Settings;
use crate::render::{Line, Renderer, Span};
use crate::reporter::error::PrinterError;
use crate::reporter::group::Group;
use crate::reporter::layout::{pad_right, repeat_to_width, LayoutSpec};
use crate::reporter::single::{Failure, Single};
use crate::reporter::status::Status;
use crate::time::{format_seconds, Time};
use std::collections::HashMap;

/// Capability for producing the record types the printer accumulates.
/// Installing a custom factory is how embedders customise the records; the
/// trait bound does the validation that the original performed with runtime
/// registration checks.
pub trait RecordFactory {
    fn make_group(&self, suite_name: &str, test_count: usize) -> Group {
        Group::make(suite_name, test_count)
    }

    fn make_single(&self, test_id: &str) -> Single {
        Single::make(test_id)
    }
}

/// The built-in records, unmodified.
pub struct DefaultFactory;

impl RecordFactory for DefaultFactory {}

/// The report engine. Driven synchronously by the host's lifecycle
/// callbacks, in order, never re-entered; all run state lives here.
pub struct Printer {
    settings: Settings,
    spec: LayoutSpec,
    renderer: Renderer,
    groups: Vec<Group>,
    open: bool,
    issue_numbers: HashMap<Status, usize>,
    factory: Box<dyn RecordFactory>,
}

impl Printer {
    /// Resolve the layout against the settings and terminal width up
    /// front, so an impossible configuration fails before any test runs.
    pub fn new(
        settings: Settings,
        terminal_width: usize,
        renderer: Renderer,
    ) -> Result<Self, PrinterError> {
        let spec = LayoutSpec::from_settings(&settings, terminal_width)?;
        Ok(Self {
            settings,
            spec,
            renderer,
            groups: Vec::new(),
            open: false,
            issue_numbers: HashMap::new(),
            factory: Box::new(DefaultFactory),
        })
    }

    pub fn with_factory(mut self, factory: Box<dyn RecordFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// A suite with an empty name is not reported on.
    pub fn suite_started(
        &mut self,
        suite_name: &str,
        test_count: usize,
    ) -> Result<(), PrinterError> {
        if suite_name.is_empty() {
            debug!("Ignoring suite with an empty name");
            return Ok(());
        }

        let mut group = self.factory.make_group(suite_name, test_count);
        group.start(&self.settings, &mut self.renderer)?;
        self.groups.push(group);
        self.open = true;
        Ok(())
    }

    pub fn test_started(&mut self, test_id: &str) -> Result<(), PrinterError> {
        if !self.open {
            warn!("Test '{}' started outside of any suite, ignoring", test_id);
            return Ok(());
        }

        let single = self.factory.make_single(test_id);
        single.start();
        if let Some(group) = self.groups.last_mut() {
            group.add_test(single);
        }
        Ok(())
    }

    /// Apply the terminal status and render the test's rows. The elapsed
    /// time may be absent; the failure is host data stored for the
    /// breakdown.
    pub fn test_ended(
        &mut self,
        test_id: &str,
        status: Status,
        elapsed: Option<f64>,
        message: Option<&str>,
        failure: Option<Failure>,
    ) -> Result<(), PrinterError> {
        let thresholds = self.settings.grade_thresholds()?;

        if !self.open {
            warn!("Test '{}' ended outside of any suite, ignoring", test_id);
            return Ok(());
        }
        let group = match self.groups.last_mut() {
            Some(group) => group,
            None => return Ok(()),
        };

        {
            let single = match group.current_test_mut() {
                Some(single) => single,
                None => {
                    warn!("Test '{}' ended without having started, ignoring", test_id);
                    return Ok(());
                }
            };
            single.set_time(Time::parse(elapsed, &thresholds));
            if let Some(message) = message {
                single.set_status_message(message);
            }
            if let Some(failure) = failure {
                single.set_error(failure);
            }
            single.set_status(status);
            single.set_passed_if_pending();
        }

        let previous = group.last_name().map(str::to_owned);
        let name = {
            let single = match group.current_test() {
                Some(single) => single,
                None => return Ok(()),
            };
            single.end(&self.settings, &self.spec, &mut self.renderer, previous.as_deref())?;
            single.name().to_owned()
        };
        group.set_last_name(name);

        Ok(())
    }

    pub fn suite_ended(&mut self) -> Result<(), PrinterError> {
        if !self.open {
            debug!("Suite ended with no suite open");
            return Ok(());
        }
        self.open = false;

        if let Some(group) = self.groups.last_mut() {
            group.end(&self.settings, &mut self.renderer)?;
        }
        Ok(())
    }

    /// The final phase: breakdown for a non-success run, then the summary.
    pub fn run_completed(
        &mut self,
        total_seconds: f64,
        total_count: usize,
    ) -> Result<(), PrinterError> {
        let mut counts: HashMap<Status, usize> = HashMap::new();
        for group in &self.groups {
            for test in group.tests() {
                *counts.entry(test.status()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(Status, usize)> = counts.into_iter().collect();
        ranked.sort_by(|left, right| {
            right
                .1
                .cmp(&left.1)
                .then_with(|| left.0.as_str().cmp(right.0.as_str()))
        });

        let overall = Status::lowest_denominator(ranked.iter().map(|(status, _)| *status));

        if !ranked.is_empty() && overall != Status::Success {
            self.issue_numbers.clear();
            for group in &self.groups {
                group.print_additional_information(
                    &mut self.issue_numbers,
                    &self.settings,
                    &self.spec,
                    &mut self.renderer,
                )?;
            }
            delimiter(&self.settings, &mut self.renderer, self.spec.terminal_width)?;
        }

        let thresholds = self.settings.grade_thresholds()?;
        let average = if total_count == 0 {
            Time::none()
        } else {
            Time::parse(Some(total_seconds / total_count as f64), &thresholds)
        };
        let time_class = self.settings.time_grade_class(average.grading())?;

        self.renderer.blank()?;

        let mut tests_line = Line::new();
        tests_line.push(Span::plain("    "));
        tests_line.push(Span::plain(pad_right("Tests:", 7)));
        tests_line.push(Span::plain(" "));
        if ranked.is_empty() {
            tests_line.push(Span::plain("No tests matched"));
        } else {
            for (position, (status, count)) in ranked.iter().enumerate() {
                if position > 0 {
                    tests_line.push(Span::plain(", "));
                }
                let class = self.settings.status_primary_css(*status)?;
                let past = self.settings.status_text_past_tense(*status)?;
                tests_line.push(Span::new(format!("{} {}", count, past), class));
            }
        }
        self.renderer.render(&tests_line)?;

        let term = if total_count == 1 { "test" } else { "tests" };
        let mut total_line = Line::new();
        total_line.push(Span::plain("    "));
        total_line.push(Span::plain(pad_right("Total:", 7)));
        total_line.push(Span::plain(format!(" {} {}", total_count, term)));
        self.renderer.render(&total_line)?;

        let mut time_line = Line::new();
        time_line.push(Span::plain("    "));
        time_line.push(Span::plain(pad_right("Time:", 7)));
        time_line.push(Span::plain(" "));
        time_line.push(Span::new(format!("{}s", format_seconds(total_seconds)), time_class));
        self.renderer.render(&time_line)?;

        self.renderer.blank()?;
        Ok(())
    }
}

/// Full-width separator line around failure breakdowns.
pub fn delimiter(
    settings: &Settings,
    renderer: &mut Renderer,
    width: usize,
) -> Result<(), PrinterError> {
    renderer.blank()?;
    let mut line = Line::new();
    line.push(Span::new(
        repeat_to_width(&settings.delimiter_text()?, width),
        settings.delimiter_class()?,
    ));
    renderer.render(&line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::SharedBuffer;

    fn printer(buffer: &SharedBuffer) -> Printer {
        let settings = Settings::new().unwrap();
        let renderer = Renderer::new(Box::new(buffer.clone()), false);
        Printer::new(settings, 80, renderer).unwrap()
    }

    fn failure() -> Failure {
        Failure {
            exception: "ExpectationFailedException".to_owned(),
            message: "Failed asserting that false is true.".to_owned(),
            file: None,
            line: None,
        }
    }

    #[test]
    fn test_full_lifecycle_renders_rows_breakdown_and_summary() {
        let buffer = SharedBuffer::default();
        let mut printer = printer(&buffer);

        printer.suite_started("Unit\\ExampleTest", 2).unwrap();
        printer.test_started("it works").unwrap();
        printer
            .test_ended("it works", Status::Success, Some(0.1), None, None)
            .unwrap();
        printer.test_started("it fails").unwrap();
        printer
            .test_ended(
                "it fails",
                Status::Failed,
                Some(0.2),
                Some("Failed asserting that false is true."),
                Some(failure()),
            )
            .unwrap();
        printer.suite_ended().unwrap();
        printer.run_completed(0.3, 2).unwrap();

        let output = buffer.contents();
        assert!(output.contains(" Unit\\ExampleTest "), "{}", output);
        assert!(output.contains("[1/2]"), "{}", output);
        assert!(output.contains("[2/2]"), "{}", output);
        assert!(output.contains("It works"), "{}", output);
        assert!(output.contains('✓'), "{}", output);
        assert!(output.contains('✗'), "{}", output);
        assert!(output.contains("Failure #1"), "{}", output);
        assert!(output.contains("• Unit\\ExampleTest » It fails"), "{}", output);
        assert!(output.contains("  Failed asserting that false is true."), "{}", output);
        assert!(output.contains("1 Failed, 1 Passed"), "{}", output);
        assert!(output.contains("Total:  2 tests"), "{}", output);
        assert!(output.contains("Time:   0.300s"), "{}", output);
    }

    #[test]
    fn test_successful_run_skips_the_breakdown() {
        let buffer = SharedBuffer::default();
        let mut printer = printer(&buffer);

        printer.suite_started("Unit\\GreenTest", 1).unwrap();
        printer.test_started("it passes").unwrap();
        printer
            .test_ended("it passes", Status::Success, Some(0.05), None, None)
            .unwrap();
        printer.suite_ended().unwrap();
        printer.run_completed(0.05, 1).unwrap();

        let output = buffer.contents();
        assert!(!output.contains('#'), "{}", output);
        assert!(output.contains("1 Passed"), "{}", output);
        assert!(output.contains("Total:  1 test\n"), "{}", output);
    }

    #[test]
    fn test_pending_tests_are_promoted_to_success() {
        let buffer = SharedBuffer::default();
        let mut printer = printer(&buffer);

        printer.suite_started("Unit\\PendingTest", 1).unwrap();
        printer.test_started("it never reports").unwrap();
        printer
            .test_ended("it never reports", Status::Pending, None, None, None)
            .unwrap();
        printer.suite_ended().unwrap();
        printer.run_completed(0.0, 1).unwrap();

        let output = buffer.contents();
        assert!(output.contains("1 Passed"), "{}", output);
        assert!(output.contains("unknown"), "{}", output);
    }

    #[test]
    fn test_dataset_siblings_render_the_name_once() {
        let buffer = SharedBuffer::default();
        let mut printer = printer(&buffer);

        printer.suite_started("Unit\\DatasetTest", 2).unwrap();
        printer.test_started("it can do something with ('as an admin')").unwrap();
        printer
            .test_ended(
                "it can do something with ('as an admin')",
                Status::Success,
                Some(0.1),
                None,
                None,
            )
            .unwrap();
        printer.test_started("it can do something with ('as a customer')").unwrap();
        printer
            .test_ended(
                "it can do something with ('as a customer')",
                Status::Success,
                Some(0.1),
                None,
                None,
            )
            .unwrap();
        printer.suite_ended().unwrap();
        printer.run_completed(0.2, 2).unwrap();

        let output = buffer.contents();
        let appearances = output.matches("It can do something").count();
        assert_eq!(appearances, 1, "{}", output);
        assert!(output.contains(">>>> as an admin"), "{}", output);
        assert!(output.contains(">>>> as a customer"), "{}", output);
    }

    #[test]
    fn test_issue_numbers_are_per_status_and_shared_across_groups() {
        let buffer = SharedBuffer::default();
        let mut printer = printer(&buffer);

        printer.suite_started("Unit\\FirstTest", 2).unwrap();
        printer.test_started("it breaks").unwrap();
        printer
            .test_ended("it breaks", Status::Failed, Some(0.1), None, Some(failure()))
            .unwrap();
        printer.test_started("it warns").unwrap();
        printer
            .test_ended("it warns", Status::Warning, Some(0.1), Some("beware"), None)
            .unwrap();
        printer.suite_ended().unwrap();

        printer.suite_started("Unit\\SecondTest", 1).unwrap();
        printer.test_started("it also breaks").unwrap();
        printer
            .test_ended("it also breaks", Status::Failed, Some(0.1), None, Some(failure()))
            .unwrap();
        printer.suite_ended().unwrap();

        printer.run_completed(0.3, 3).unwrap();

        let output = buffer.contents();
        assert!(output.contains("Failure #1"), "{}", output);
        assert!(output.contains("Failure #2"), "{}", output);
        assert!(output.contains("Warning #1"), "{}", output);
        assert!(!output.contains("Failure #3"), "{}", output);
    }

    #[test]
    fn test_empty_run_reports_no_tests_matched() {
        let buffer = SharedBuffer::default();
        let mut printer = printer(&buffer);

        printer.run_completed(0.0, 0).unwrap();

        let output = buffer.contents();
        assert!(output.contains("No tests matched"), "{}", output);
        assert!(output.contains("Total:  0 tests"), "{}", output);
        assert!(!output.contains('-'), "no delimiter expected: {}", output);
    }

    #[test]
    fn test_empty_suite_names_and_orphan_tests_are_ignored() {
        let buffer = SharedBuffer::default();
        let mut printer = printer(&buffer);

        printer.suite_started("", 1).unwrap();
        printer.test_started("it floats").unwrap();
        printer
            .test_ended("it floats", Status::Success, Some(0.1), None, None)
            .unwrap();
        printer.suite_ended().unwrap();
        printer.run_completed(0.1, 1).unwrap();

        let output = buffer.contents();
        assert!(!output.contains("It floats"), "{}", output);
        assert!(output.contains("No tests matched"), "{}", output);
    }

    #[test]
    fn test_counts_sort_by_count_descending_then_name() {
        let buffer = SharedBuffer::default();
        let mut printer = printer(&buffer);

        printer.suite_started("Unit\\MixedTest", 3).unwrap();
        for name in &["one", "two"] {
            printer.test_started(name).unwrap();
            printer
                .test_ended(name, Status::Success, Some(0.01), None, None)
                .unwrap();
        }
        printer.test_started("three").unwrap();
        printer
            .test_ended("three", Status::Failed, Some(0.01), None, Some(failure()))
            .unwrap();
        printer.suite_ended().unwrap();
        printer.run_completed(0.03, 3).unwrap();

        let output = buffer.contents();
        assert!(output.contains("2 Passed, 1 Failed"), "{}", output);
    }

    #[test]
    fn test_inline_message_appears_for_skipped_tests() {
        let buffer = SharedBuffer::default();
        let mut printer = printer(&buffer);

        printer.suite_started("Unit\\SkipTest", 1).unwrap();
        printer.test_started("it is not ready").unwrap();
        printer
            .test_ended(
                "it is not ready",
                Status::Skipped,
                None,
                Some("Requires the payment sandbox."),
                None,
            )
            .unwrap();
        printer.suite_ended().unwrap();
        printer.run_completed(0.0, 1).unwrap();

        let output = buffer.contents();
        // Trailing dot is stripped in the inline row.
        assert!(output.contains("⟶   Requires the payment sandbox"), "{}", output);
        assert!(output.contains("Skip #1"), "{}", output);
    }

    #[test]
    fn test_custom_factory_produces_the_records() {
        struct PrefixedFactory;

        impl RecordFactory for PrefixedFactory {
            fn make_group(&self, suite_name: &str, test_count: usize) -> Group {
                Group::make(&format!("custom::{}", suite_name), test_count)
            }
        }

        let buffer = SharedBuffer::default();
        let settings = Settings::new().unwrap();
        let renderer = Renderer::new(Box::new(buffer.clone()), false);
        let mut printer = Printer::new(settings, 80, renderer)
            .unwrap()
            .with_factory(Box::new(PrefixedFactory));

        printer.suite_started("Unit\\FactoryTest", 0).unwrap();
        printer.suite_ended().unwrap();
        printer.run_completed(0.0, 0).unwrap();

        let output = buffer.contents();
        assert!(output.contains("custom::Unit\\FactoryTest"), "{}", output);
    }

    #[test]
    fn test_narrow_terminal_fails_at_construction() {
        let settings = Settings::new().unwrap();
        let renderer = Renderer::new(Box::new(SharedBuffer::default()), false);
        let result = Printer::new(settings, 10, renderer);

        match result {
            Err(PrinterError::NameColumnExhausted { terminal_width, .. }) => {
                assert_eq!(terminal_width, 10)
            }
            _ => panic!("expected a NameColumnExhausted error"),
        }
    }
}
