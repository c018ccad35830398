use crate::configuration::error::ConfigurationError;
use crate::render::color;
use crate::reporter::status::Status;
use crate::time::grading::{GradeThresholds, TimeGrading};
use config::{Config, File, Value, ValueKind};
use std::path::PathBuf;

/// Read-through settings tree for the printer. Every key carries a default;
/// a user file merged on top may override any of them. Values are cached by
/// the underlying store for the lifetime of the run and refreshed only by an
/// explicit `reload`.
pub struct Settings {
    config: Config,
    source: Option<PathBuf>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::build(None)
    }

    pub fn from_file(path: PathBuf) -> Result<Self, ConfigurationError> {
        Self::build(Some(path))
    }

    fn build(source: Option<PathBuf>) -> Result<Self, ConfigurationError> {
        let mut config = Config::new();
        register_defaults(&mut config)?;
        if let Some(path) = &source {
            config.merge(File::from(path.clone()))?;
        }
        Ok(Self { config, source })
    }

    /// Drop every cached value and re-read the sources. Independent runs
    /// sharing one process call this between runs.
    pub fn reload(&mut self) -> Result<(), ConfigurationError> {
        *self = Self::build(self.source.clone())?;
        Ok(())
    }

    /// Override a single key at runtime (test fixtures).
    pub fn set<T>(&mut self, key: &str, value: T) -> Result<(), ConfigurationError>
    where
        T: Into<Value>,
    {
        self.config.set(key, value)?;
        Ok(())
    }

    // --- display.* -------------------------------------------------------

    /// The delimiter line printed around each failure breakdown.
    pub fn delimiter_text(&self) -> Result<String, ConfigurationError> {
        self.get_string("display.delimiter.text")
    }

    pub fn delimiter_class(&self) -> Result<String, ConfigurationError> {
        self.get_class_string("display.delimiter.class")
    }

    /// Marker printed in front of each dataset label row.
    pub fn dataset_indent_text(&self) -> Result<String, ConfigurationError> {
        self.get_string("display.datasetIndentation.text")
    }

    pub fn dataset_indent_spacing(&self) -> Result<usize, ConfigurationError> {
        self.get_width("display.datasetIndentation.spacing")
    }

    pub fn dataset_indent_class(&self) -> Result<String, ConfigurationError> {
        self.get_class_string("display.datasetIndentation.class")
    }

    pub fn dataset_name_class(&self) -> Result<String, ConfigurationError> {
        self.get_class_string("display.datasetName.class")
    }

    /// Marker printed in front of an inline status message row.
    pub fn status_message_text(&self) -> Result<String, ConfigurationError> {
        self.get_string("display.statusMessage.text")
    }

    pub fn status_message_spacing(&self) -> Result<usize, ConfigurationError> {
        self.get_width("display.statusMessage.spacing")
    }

    /// Continuation glyph in the status column for wrapped rows.
    pub fn row_prefix_text(&self) -> Result<String, ConfigurationError> {
        self.get_string("display.rowPrefix.text")
    }

    /// Continuation glyph in the time column for wrapped rows.
    pub fn row_suffix_text(&self) -> Result<String, ConfigurationError> {
        self.get_string("display.rowSuffix.text")
    }

    pub fn row_suffix_class(&self) -> Result<String, ConfigurationError> {
        self.get_class_string("display.rowSuffix.class")
    }

    pub fn test_index_class(&self) -> Result<String, ConfigurationError> {
        self.get_class_string("display.testIndex.class")
    }

    /// Class applied to the suite banner titles.
    pub fn test_name_class(&self) -> Result<String, ConfigurationError> {
        self.get_class_string("display.testName.class")
    }

    /// Filler repeated between the end of a name row and the time column.
    pub fn test_name_ellipsis_text(&self) -> Result<String, ConfigurationError> {
        self.get_string("display.testNameElipsis.text")
    }

    pub fn test_name_ellipsis_class(&self) -> Result<String, ConfigurationError> {
        self.get_class_string("display.testNameElipsis.class")
    }

    pub fn failed_test_delimiter_class(&self) -> Result<String, ConfigurationError> {
        self.get_class_string("display.failedTestDelimiter.class")
    }

    pub fn failed_test_delimiter_1_text(&self) -> Result<String, ConfigurationError> {
        self.get_string("display.failedTestDelimiter1.text")
    }

    pub fn failed_test_delimiter_2_text(&self) -> Result<String, ConfigurationError> {
        self.get_string("display.failedTestDelimiter2.text")
    }

    pub fn failed_test_delimiter_3_text(&self) -> Result<String, ConfigurationError> {
        self.get_string("display.failedTestDelimiter3.text")
    }

    pub fn exception_preview_label_class(&self) -> Result<String, ConfigurationError> {
        self.get_class_string("display.exceptionPreview.labels.class")
    }

    pub fn width_left(&self) -> Result<usize, ConfigurationError> {
        self.get_width("display.widths.left")
    }

    pub fn width_index(&self) -> Result<usize, ConfigurationError> {
        self.get_width("display.widths.index")
    }

    pub fn width_right(&self) -> Result<usize, ConfigurationError> {
        self.get_width("display.widths.right")
    }

    pub fn width_padding(&self) -> Result<usize, ConfigurationError> {
        self.get_width("display.widths.padding")
    }

    pub fn width_status(&self) -> Result<usize, ConfigurationError> {
        self.get_width("display.widths.status")
    }

    pub fn width_time(&self) -> Result<usize, ConfigurationError> {
        self.get_width("display.widths.time")
    }

    /// Downgrade extended palette names to the conservative set when
    /// writing to terminals without rich color support.
    pub fn safe_color_mode(&self) -> Result<bool, ConfigurationError> {
        self.get_boolean("display.color.safeMode")
    }

    // --- timing.* --------------------------------------------------------

    pub fn grade_thresholds(&self) -> Result<GradeThresholds, ConfigurationError> {
        Ok(GradeThresholds {
            fast: self.get_float("timing.grades.fast.time")?,
            okay: self.get_float("timing.grades.okay.time")?,
            slow: self.get_float("timing.grades.slow.time")?,
        })
    }

    pub fn time_grade_class(&self, grading: TimeGrading) -> Result<String, ConfigurationError> {
        let key = format!("timing.grades.{}.class", grading.as_str());
        self.get_class_string(&key)
    }

    // --- statuses.* ------------------------------------------------------

    pub fn status_icon(&self, status: Status) -> Result<String, ConfigurationError> {
        self.get_string(&status_key(status, "icon"))
    }

    pub fn status_text_present_tense(&self, status: Status) -> Result<String, ConfigurationError> {
        self.get_string(&status_key(status, "present"))
    }

    pub fn status_text_past_tense(&self, status: Status) -> Result<String, ConfigurationError> {
        self.get_string(&status_key(status, "past"))
    }

    pub fn status_text_plural_term(&self, status: Status) -> Result<String, ConfigurationError> {
        self.get_string(&status_key(status, "plural"))
    }

    pub fn status_show_message_inline(&self, status: Status) -> Result<bool, ConfigurationError> {
        self.get_boolean(&status_key(status, "showMessageInline"))
    }

    pub fn status_color(&self, status: Status) -> Result<String, ConfigurationError> {
        self.get_string(&status_key(status, "color"))
    }

    /// Class list for the status icon and labels, with the `:color`
    /// placeholder substituted at read time.
    pub fn status_primary_css(&self, status: Status) -> Result<String, ConfigurationError> {
        let template = self.get_string(&status_key(status, "primaryCss"))?;
        Ok(template.replace(":color", &self.status_color(status)?))
    }

    /// Inverted (badge) class list for the status.
    pub fn status_inverse_css(&self, status: Status) -> Result<String, ConfigurationError> {
        let template = self.get_string(&status_key(status, "inverseCss"))?;
        Ok(template.replace(":color", &self.status_color(status)?))
    }

    pub fn status_show_additional_information(
        &self,
        status: Status,
    ) -> Result<bool, ConfigurationError> {
        self.get_boolean(&status_key(status, "showAdditionalInformation"))
    }

    // --- typed access ----------------------------------------------------

    fn get_value(&self, key: &str) -> Result<Value, ConfigurationError> {
        self.config.get::<Value>(key).map_err(ConfigurationError::from)
    }

    fn get_string(&self, key: &str) -> Result<String, ConfigurationError> {
        let value = self.get_value(key)?;
        match value.kind {
            ValueKind::String(text) => Ok(text),
            ref other => Err(ConfigurationError::invalid_type(key, "string", kind_name(other))),
        }
    }

    fn get_class_string(&self, key: &str) -> Result<String, ConfigurationError> {
        let class = self.get_string(key)?;
        if self.safe_color_mode()? {
            Ok(color::safe(&class))
        } else {
            Ok(class)
        }
    }

    fn get_boolean(&self, key: &str) -> Result<bool, ConfigurationError> {
        let value = self.get_value(key)?;
        match value.kind {
            ValueKind::Boolean(flag) => Ok(flag),
            ref other => Err(ConfigurationError::invalid_type(key, "boolean", kind_name(other))),
        }
    }

    fn get_integer(&self, key: &str) -> Result<i64, ConfigurationError> {
        let value = self.get_value(key)?;
        match value.kind {
            ValueKind::Integer(number) => Ok(number),
            ref other => Err(ConfigurationError::invalid_type(key, "integer", kind_name(other))),
        }
    }

    // An integer is acceptable where a float is expected; nothing else is.
    fn get_float(&self, key: &str) -> Result<f64, ConfigurationError> {
        let value = self.get_value(key)?;
        match value.kind {
            ValueKind::Float(number) => Ok(number),
            ValueKind::Integer(number) => Ok(number as f64),
            ref other => Err(ConfigurationError::invalid_type(key, "float", kind_name(other))),
        }
    }

    fn get_width(&self, key: &str) -> Result<usize, ConfigurationError> {
        let number = self.get_integer(key)?;
        if number < 0 {
            return Err(ConfigurationError::invalid_type(
                key,
                "non-negative integer",
                "integer",
            ));
        }
        Ok(number as usize)
    }
}

fn status_key(status: Status, attribute: &str) -> String {
    format!("statuses.{}.{}", status, attribute)
}

fn kind_name(kind: &ValueKind) -> &'static str {
    match kind {
        ValueKind::Nil => "nil",
        ValueKind::Boolean(_) => "boolean",
        ValueKind::Integer(_) => "integer",
        ValueKind::Float(_) => "float",
        ValueKind::String(_) => "string",
        ValueKind::Table(_) => "table",
        ValueKind::Array(_) => "array",
    }
}

fn register_defaults(config: &mut Config) -> Result<(), ConfigurationError> {
    config.set_default("display.delimiter.text", "-")?;
    config.set_default("display.delimiter.class", "text-zinc-700")?;

    config.set_default("display.datasetIndentation.text", ">>>>")?;
    config.set_default("display.datasetIndentation.spacing", 1i64)?;
    config.set_default("display.datasetIndentation.class", "text-cyan-600")?;
    config.set_default("display.datasetName.class", "text-cyan-600")?;

    config.set_default("display.statusMessage.spacing", 1i64)?;
    config.set_default("display.statusMessage.text", "⟶  ")?;

    config.set_default("display.rowPrefix.text", "↳")?;
    config.set_default("display.rowSuffix.text", "↲")?;
    config.set_default("display.rowSuffix.class", "text-gray-600")?;

    config.set_default("display.testNameElipsis.text", ".")?;
    config.set_default("display.testNameElipsis.class", "text-gray-600")?;

    config.set_default("display.failedTestDelimiter.class", "text-gray")?;
    config.set_default("display.failedTestDelimiter1.text", "•")?;
    config.set_default("display.failedTestDelimiter2.text", "»")?;
    config.set_default("display.failedTestDelimiter3.text", "›")?;

    config.set_default("display.testName.class", "bg-gray-800 text-white")?;
    config.set_default("display.exceptionPreview.labels.class", "text-gray-700")?;
    config.set_default("display.testIndex.class", "text-zinc-600")?;

    config.set_default("display.widths.left", 2i64)?;
    config.set_default("display.widths.index", 9i64)?;
    config.set_default("display.widths.right", 2i64)?;
    config.set_default("display.widths.padding", 1i64)?;
    config.set_default("display.widths.status", 2i64)?;
    config.set_default("display.widths.time", 7i64)?;

    config.set_default("display.color.safeMode", false)?;

    config.set_default("timing.grades.fast.time", 0.2)?;
    config.set_default("timing.grades.fast.class", "text-green-500")?;
    config.set_default("timing.grades.okay.time", 0.5)?;
    config.set_default("timing.grades.okay.class", "text-amber-500")?;
    config.set_default("timing.grades.slow.time", 31_536_000.0)?;
    config.set_default("timing.grades.slow.class", "text-red-500")?;
    config.set_default("timing.grades.null.class", "text-gray-500")?;

    for status in Status::all().iter() {
        let defaults = status_defaults(*status);
        config.set_default(&status_key(*status, "present"), defaults.present)?;
        config.set_default(&status_key(*status, "past"), defaults.past)?;
        config.set_default(&status_key(*status, "plural"), defaults.plural)?;
        config.set_default(&status_key(*status, "icon"), defaults.icon)?;
        config.set_default(&status_key(*status, "showMessageInline"), defaults.message_inline)?;
        config.set_default(&status_key(*status, "color"), defaults.color)?;
        config.set_default(&status_key(*status, "primaryCss"), "text-:color")?;
        config.set_default(&status_key(*status, "inverseCss"), "bg-:color-700 text-white")?;
        config.set_default(
            &status_key(*status, "showAdditionalInformation"),
            defaults.additional,
        )?;
    }

    Ok(())
}

struct StatusDefaults {
    present: &'static str,
    past: &'static str,
    plural: &'static str,
    icon: &'static str,
    message_inline: bool,
    color: &'static str,
    additional: bool,
}

fn status_defaults(status: Status) -> StatusDefaults {
    let (present, past, plural, icon, message_inline, color, additional) = match status {
        Status::Pending => ("Pending", "Pending", "Pendings", "P", false, "gray", false),
        Status::Success => ("Pass", "Passed", "Passes", "✓", false, "green", false),
        Status::Failed => ("Failure", "Failed", "Failures", "✗", false, "red", true),
        Status::Error => ("Error", "Errored", "Errors", "E", false, "red", true),
        Status::Warning => ("Warning", "Warned", "Warnings", "!", true, "yellow", true),
        Status::Skipped => ("Skip", "Skipped", "Skips", "S", true, "yellow", true),
        Status::Incomplete => {
            ("Incomplete", "Incompleted", "Incompleted", "I", true, "yellow", true)
        }
        Status::Risky => ("Risky", "Risky", "Risky", "R", true, "yellow", true),
        Status::Unknown => ("Unknown", "Unknown", "Unknown", "?", true, "gray", true),
    };

    StatusDefaults {
        present,
        past,
        plural,
        icon,
        message_inline,
        color,
        additional,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_registered_for_every_status() {
        let settings = Settings::new().unwrap();
        for status in Status::all().iter() {
            assert!(!settings.status_icon(*status).unwrap().is_empty());
            assert!(!settings.status_text_past_tense(*status).unwrap().is_empty());
        }
        assert_eq!(settings.status_icon(Status::Success).unwrap(), "✓");
        assert_eq!(settings.status_icon(Status::Failed).unwrap(), "✗");
        assert_eq!(
            settings.status_text_plural_term(Status::Failed).unwrap(),
            "Failures"
        );
    }

    #[test]
    fn test_default_column_widths() {
        let settings = Settings::new().unwrap();
        assert_eq!(settings.width_left().unwrap(), 2);
        assert_eq!(settings.width_index().unwrap(), 9);
        assert_eq!(settings.width_right().unwrap(), 2);
        assert_eq!(settings.width_padding().unwrap(), 1);
        assert_eq!(settings.width_status().unwrap(), 2);
        assert_eq!(settings.width_time().unwrap(), 7);
    }

    #[test]
    fn test_set_overrides_a_default() {
        let mut settings = Settings::new().unwrap();
        settings.set("statuses.pending.present", "something custom").unwrap();
        let value = settings.status_text_present_tense(Status::Pending).unwrap();
        assert_eq!(value, "something custom");
    }

    #[test]
    fn test_reload_restores_the_defaults() {
        let mut settings = Settings::new().unwrap();
        settings.set("display.rowPrefix.text", "~").unwrap();
        assert_eq!(settings.row_prefix_text().unwrap(), "~");

        settings.reload().unwrap();
        assert_eq!(settings.row_prefix_text().unwrap(), "↳");
    }

    #[test]
    fn test_string_read_of_an_integer_fails_with_both_types_named() {
        let mut settings = Settings::new().unwrap();
        settings.set("display.statusMessage.text", 5i64).unwrap();

        let error = settings.status_message_text().unwrap_err();
        let message = error.to_string();
        assert!(message.contains("display.statusMessage.text"), "{}", message);
        assert!(message.contains("must be string"), "{}", message);
        assert!(message.contains("found integer"), "{}", message);
    }

    #[test]
    fn test_integer_read_of_a_string_fails() {
        let mut settings = Settings::new().unwrap();
        settings.set("display.datasetIndentation.spacing", "5").unwrap();

        let error = settings.dataset_indent_spacing().unwrap_err();
        let message = error.to_string();
        assert!(message.contains("must be integer"), "{}", message);
        assert!(message.contains("found string"), "{}", message);
    }

    #[test]
    fn test_boolean_read_of_a_string_fails() {
        let mut settings = Settings::new().unwrap();
        settings.set("display.color.safeMode", "yes").unwrap();

        let error = settings.safe_color_mode().unwrap_err();
        assert!(error.to_string().contains("must be boolean"));
    }

    #[test]
    fn test_float_read_accepts_an_integer() {
        let mut settings = Settings::new().unwrap();
        settings.set("timing.grades.fast.time", 2i64).unwrap();

        let thresholds = settings.grade_thresholds().unwrap();
        assert_eq!(thresholds.fast, 2.0);
    }

    #[test]
    fn test_missing_key_is_reported_as_not_found() {
        let settings = Settings::new().unwrap();
        let error = settings.get_string("display.noSuchSection.text").unwrap_err();
        assert!(error.to_string().contains("key not found"));
    }

    #[test]
    fn test_grade_thresholds_defaults() {
        let settings = Settings::new().unwrap();
        let thresholds = settings.grade_thresholds().unwrap();
        assert_eq!(thresholds.fast, 0.2);
        assert_eq!(thresholds.okay, 0.5);
        assert_eq!(thresholds.slow, 31_536_000.0);
    }

    #[test]
    fn test_primary_css_substitutes_the_status_color() {
        let settings = Settings::new().unwrap();
        assert_eq!(settings.status_primary_css(Status::Failed).unwrap(), "text-red");
        assert_eq!(
            settings.status_inverse_css(Status::Success).unwrap(),
            "bg-green-700 text-white"
        );
    }

    #[test]
    fn test_safe_color_mode_downgrades_class_reads() {
        let mut settings = Settings::new().unwrap();
        {
            let class = settings.time_grade_class(TimeGrading::Okay).unwrap();
            assert_eq!(class, "text-amber-500");
        }

        settings.set("display.color.safeMode", true).unwrap();
        {
            let class = settings.time_grade_class(TimeGrading::Okay).unwrap();
            assert_eq!(class, "text-yellow");
        }
    }
}
