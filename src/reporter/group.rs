use crate::configuration::settings::Settings;
use crate::render::{Line, Renderer, Span};
use crate::reporter::error::PrinterError;
use crate::reporter::layout::LayoutSpec;
use crate::reporter::single::Single;
use crate::reporter::status::Status;
use std::collections::HashMap;

const FOOTER_BADGE_WIDTH: usize = 12;

/// One suite's worth of test records, with the bookkeeping the row engine
/// needs for dataset-header suppression.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    expected: usize,
    tests: Vec<Single>,
    last_name: Option<String>,
    running: bool,
}

impl Group {
    pub fn make(suite_name: &str, expected: usize) -> Self {
        Self {
            name: suite_name.to_owned(),
            expected,
            tests: Vec::new(),
            last_name: None,
            running: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn count(&self) -> usize {
        self.tests.len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tests(&self) -> &[Single] {
        &self.tests
    }

    pub fn add_test(&mut self, mut test: Single) -> &mut Self {
        test.set_index(self.tests.len() + 1, self.expected);
        self.tests.push(test);
        self
    }

    pub fn current_test(&self) -> Option<&Single> {
        self.tests.last()
    }

    pub fn current_test_mut(&mut self) -> Option<&mut Single> {
        self.tests.last_mut()
    }

    /// The base name most recently rendered in this suite.
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn set_last_name(&mut self, name: String) -> &mut Self {
        self.last_name = Some(name);
        self
    }

    /// Worst status across the contained tests.
    pub fn status(&self) -> Status {
        Status::lowest_denominator(self.tests.iter().map(Single::status))
    }

    /// Opening banner: the suite title on its own padded line.
    pub fn start(
        &mut self,
        settings: &Settings,
        renderer: &mut Renderer,
    ) -> Result<(), PrinterError> {
        self.running = true;

        renderer.blank()?;
        let class = format!("{} italic", settings.test_name_class()?);
        let mut line = Line::new();
        line.push(Span::plain("  "));
        line.push(Span::new(format!(" {} ", self.name), class));
        renderer.render(&line)?;
        renderer.blank()?;
        Ok(())
    }

    /// Closing banner: the aggregated status badge and the suite title.
    pub fn end(
        &mut self,
        settings: &Settings,
        renderer: &mut Renderer,
    ) -> Result<(), PrinterError> {
        self.running = false;

        let status = self.status();
        let badge = format!(" {} ", settings.status_text_present_tense(status)?);
        let badge_width = badge.chars().count();

        renderer.blank()?;
        let mut line = Line::new();
        line.push(Span::plain("  "));
        if badge_width < FOOTER_BADGE_WIDTH {
            line.push(Span::plain(" ".repeat(FOOTER_BADGE_WIDTH - badge_width)));
        }
        line.push(Span::new(badge, settings.status_inverse_css(status)?));
        line.push(Span::plain(" "));
        line.push(Span::new(self.name.clone(), "italic"));
        renderer.render(&line)?;
        renderer.blank()?;
        Ok(())
    }

    /// Render the breakdown block for every flagged test, numbering issues
    /// per status kind with counters shared across the whole run.
    pub fn print_additional_information(
        &self,
        issue_numbers: &mut HashMap<Status, usize>,
        settings: &Settings,
        spec: &LayoutSpec,
        renderer: &mut Renderer,
    ) -> Result<(), PrinterError> {
        for test in &self.tests {
            if test.show_additional_information(settings)? {
                let counter = issue_numbers.entry(test.status()).or_insert(0);
                *counter += 1;
                let number = *counter;
                test.render_additional_information(&self.name, number, settings, spec, renderer)?;
            }
        }
        Ok(())
    }
}
