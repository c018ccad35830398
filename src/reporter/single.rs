use crate::configuration::settings::Settings;
use crate::render::{Line, Renderer, Span};
use crate::reporter::error::PrinterError;
use crate::reporter::layout::{lay_out, LayoutSpec, RowEntry};
use crate::reporter::name::Name;
use crate::reporter::preview::FailurePreview;
use crate::reporter::status::Status;
use crate::time::Time;

/// Host-supplied failure details for one test. This is data carried on the
/// record and rendered in the breakdown, never an engine error.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub exception: String,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<usize>,
}

/// One test accumulating state between its start and end callbacks.
#[derive(Debug, Clone)]
pub struct Single {
    name: Name,
    status: Status,
    time: Time,
    status_message: String,
    error: Option<Failure>,
    suite_index: usize,
    suite_total: usize,
}

impl Single {
    pub fn make(test_id: &str) -> Self {
        Self {
            name: Name::make(test_id),
            status: Status::Pending,
            time: Time::none(),
            status_message: String::new(),
            error: None,
            suite_index: 0,
            suite_total: 0,
        }
    }

    pub fn name(&self) -> &str {
        self.name.name()
    }

    pub fn dataset(&self) -> Option<&str> {
        self.name.dataset()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn set_index(&mut self, suite_index: usize, suite_total: usize) -> &mut Self {
        self.suite_index = suite_index;
        self.suite_total = suite_total;
        self
    }

    pub fn set_status(&mut self, status: Status) -> &mut Self {
        self.status = status;
        self
    }

    pub fn set_time(&mut self, time: Time) -> &mut Self {
        self.time = time;
        self
    }

    pub fn set_status_message(&mut self, message: &str) -> &mut Self {
        self.status_message = message.to_owned();
        self
    }

    pub fn set_error(&mut self, failure: Failure) -> &mut Self {
        self.error = Some(failure);
        self
    }

    /// The host's status message; a stored failure's message stands in
    /// when the host supplied none.
    pub fn status_message(&self) -> &str {
        if !self.status_message.is_empty() {
            return &self.status_message;
        }
        self.error
            .as_ref()
            .map(|failure| failure.message.as_str())
            .unwrap_or("")
    }

    /// A test that reached its end without any terminal status passed.
    pub fn set_passed_if_pending(&mut self) -> &mut Self {
        if self.status == Status::Pending {
            self.status = Status::Success;
        }
        self
    }

    pub fn start(&self) {
        debug!(
            "Test started: {} (dataset: {})",
            self.name(),
            self.dataset().unwrap_or("none")
        );
    }

    /// Lay out and print this test's rows.
    pub fn end(
        &self,
        settings: &Settings,
        spec: &LayoutSpec,
        renderer: &mut Renderer,
        previous_name: Option<&str>,
    ) -> Result<(), PrinterError> {
        let status_class = settings.status_primary_css(self.status)?;
        let icon = settings.status_icon(self.status)?;
        let time_text = self.time.format();
        let time_class = settings.time_grade_class(self.time.grading())?;
        let index_text = format!("[{}/{}]", self.suite_index, self.suite_total);

        let normalized = normalize_message(self.status_message());
        let inline_message = if !normalized.is_empty()
            && settings.status_show_message_inline(self.status)?
        {
            Some(normalized.as_str())
        } else {
            None
        };

        let entry = RowEntry {
            name: self.name.name(),
            dataset: self.name.dataset(),
            previous_name,
            inline_message,
            icon: &icon,
            status_class: &status_class,
            index_text: &index_text,
            time_text: &time_text,
            time_class: &time_class,
        };

        for row in lay_out(spec, &entry)? {
            renderer.render(&row)?;
        }

        Ok(())
    }

    /// Whether this test appears in the end-of-run breakdown.
    pub fn show_additional_information(
        &self,
        settings: &Settings,
    ) -> Result<bool, PrinterError> {
        Ok(settings.status_show_additional_information(self.status)?)
    }

    /// One breakdown block: delimiter, issue badge, test identification,
    /// exception preview and the raw status message.
    pub fn render_additional_information(
        &self,
        suite_name: &str,
        issue_number: usize,
        settings: &Settings,
        spec: &LayoutSpec,
        renderer: &mut Renderer,
    ) -> Result<(), PrinterError> {
        let status_class = settings.status_primary_css(self.status)?;
        let inverse_class = settings.status_inverse_css(self.status)?;

        crate::reporter::delimiter(settings, renderer, spec.terminal_width)?;

        renderer.blank()?;
        let label = settings.status_text_present_tense(self.status)?;
        let mut badge = Line::new();
        badge.push(Span::plain("  "));
        badge.push(Span::new(format!(" {} #{} ", label, issue_number), inverse_class));
        renderer.render(&badge)?;

        renderer.blank()?;
        let delimiter_class = settings.failed_test_delimiter_class()?;
        let mut identification = Line::new();
        identification.push(Span::plain("  "));
        identification.push(Span::new(
            settings.failed_test_delimiter_1_text()?,
            delimiter_class.clone(),
        ));
        identification.push(Span::plain(" "));
        identification.push(Span::new(suite_name.to_owned(), status_class.clone()));
        identification.push(Span::plain(" "));
        identification.push(Span::new(
            settings.failed_test_delimiter_2_text()?,
            delimiter_class.clone(),
        ));
        identification.push(Span::plain(" "));
        identification.push(Span::new(self.name().to_owned(), status_class.clone()));
        if let Some(dataset) = self.dataset() {
            identification.push(Span::plain(" "));
            identification.push(Span::new(
                settings.failed_test_delimiter_3_text()?,
                delimiter_class,
            ));
            identification.push(Span::plain(" "));
            identification.push(Span::new(dataset.to_owned(), status_class));
        }
        renderer.render(&identification)?;

        let preview = if self.should_show_exception_preview() {
            self.error.as_ref().map(FailurePreview::make)
        } else {
            None
        };

        if let Some(preview) = &preview {
            preview.render_type(settings, renderer, self.status, 2)?;
        }

        let message = self.status_message().trim();
        if !message.is_empty() {
            renderer.blank()?;
            renderer.raw(&format!("  {}", message))?;
        }

        if let Some(preview) = &preview {
            preview.render(settings, renderer, 2, false)?;
        }

        Ok(())
    }

    pub fn has_exception(&self) -> bool {
        self.error.is_some()
    }

    /// Skipped and incomplete tests carry bookkeeping exceptions that are
    /// not worth a code frame.
    pub fn should_show_exception_preview(&self) -> bool {
        if self.error.is_none() {
            return false;
        }
        !matches!(self.status, Status::Skipped | Status::Incomplete)
    }
}

/// Inline message normalization: whitespace first, then the surrounding
/// dots a sentence-shaped assertion message usually ends with.
pub(crate) fn normalize_message(message: &str) -> String {
    message.trim().trim_matches('.').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a_new_single_is_pending_with_no_time() {
        let single = Single::make("it does something");
        assert_eq!(single.status(), Status::Pending);
        assert_eq!(single.name(), "It does something");
        assert!(!single.has_exception());
    }

    #[test]
    fn test_pending_is_promoted_to_success_at_end() {
        let mut single = Single::make("it does something");
        single.set_passed_if_pending();
        assert_eq!(single.status(), Status::Success);
    }

    #[test]
    fn test_a_terminal_status_survives_the_promotion() {
        let mut single = Single::make("it does something");
        single.set_status(Status::Failed);
        single.set_passed_if_pending();
        assert_eq!(single.status(), Status::Failed);
    }

    #[test]
    fn test_preview_is_suppressed_for_skipped_and_incomplete() {
        let failure = Failure {
            exception: "SkippedTestError".to_owned(),
            message: "skipped".to_owned(),
            file: None,
            line: None,
        };

        {
            let mut single = Single::make("it is skipped");
            single.set_status(Status::Skipped).set_error(failure.clone());
            assert!(!single.should_show_exception_preview());
        }
        {
            let mut single = Single::make("it is broken");
            single.set_status(Status::Failed).set_error(failure);
            assert!(single.should_show_exception_preview());
        }
    }

    #[test]
    fn test_failure_message_stands_in_for_a_missing_status_message() {
        let mut single = Single::make("it breaks");
        single.set_status(Status::Failed).set_error(Failure {
            exception: "AssertionError".to_owned(),
            message: "Failed asserting that true is false.".to_owned(),
            file: None,
            line: None,
        });
        assert_eq!(single.status_message(), "Failed asserting that true is false.");

        single.set_status_message("host message wins");
        assert_eq!(single.status_message(), "host message wins");
    }

    #[test]
    fn test_message_normalization_strips_whitespace_then_dots() {
        assert_eq!(normalize_message("  Failed to assert blah.  "), "Failed to assert blah");
        assert_eq!(normalize_message("...gone..."), "gone");
        assert_eq!(normalize_message("a. b."), "a. b");
        assert_eq!(normalize_message("   "), "");
    }
}
