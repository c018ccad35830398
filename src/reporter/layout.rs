use crate::configuration::settings::Settings;
use crate::render::{Line, Span};
use crate::reporter::error::PrinterError;

/// Inline status messages are capped to this many wrapped rows.
pub const MAX_MESSAGE_LINES: usize = 4;

/// Spliced over the tail of the last kept message row when the cap bites.
pub const TRUNCATION_SUFFIX: &str = " (truncated)";

/// Resolved geometry and glyphs for the report table. Everything the row
/// engine needs is captured up front so `lay_out` stays a pure function.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct LayoutSpec {
    #[builder(default = "80")]
    pub terminal_width: usize,
    #[builder(default = "2")]
    pub left: usize,
    #[builder(default = "9")]
    pub index: usize,
    #[builder(default = "2")]
    pub right: usize,
    #[builder(default = "1")]
    pub padding: usize,
    #[builder(default = "2")]
    pub status: usize,
    #[builder(default = "7")]
    pub time: usize,
    #[builder(default = r#"">>>>".to_owned()"#)]
    pub dataset_indent_text: String,
    #[builder(default = "1")]
    pub dataset_indent_spacing: usize,
    #[builder(default = r#""text-cyan-600".to_owned()"#)]
    pub dataset_indent_class: String,
    #[builder(default = r#""text-cyan-600".to_owned()"#)]
    pub dataset_name_class: String,
    #[builder(default = r#""⟶  ".to_owned()"#)]
    pub status_message_text: String,
    #[builder(default = "1")]
    pub status_message_spacing: usize,
    #[builder(default = r#""↳".to_owned()"#)]
    pub row_prefix_text: String,
    #[builder(default = r#""↲".to_owned()"#)]
    pub row_suffix_text: String,
    #[builder(default = r#""text-gray-600".to_owned()"#)]
    pub row_suffix_class: String,
    #[builder(default = r#""text-zinc-600".to_owned()"#)]
    pub test_index_class: String,
    #[builder(default = r#"".".to_owned()"#)]
    pub test_name_ellipsis_text: String,
    #[builder(default = r#""text-gray-600".to_owned()"#)]
    pub test_name_ellipsis_class: String,
}

impl LayoutSpec {
    /// Capture the configured widths and glyphs, validating up front that
    /// the terminal leaves room for a name column.
    pub fn from_settings(
        settings: &Settings,
        terminal_width: usize,
    ) -> Result<Self, PrinterError> {
        let spec = LayoutSpec {
            terminal_width,
            left: settings.width_left()?,
            index: settings.width_index()?,
            right: settings.width_right()?,
            padding: settings.width_padding()?,
            status: settings.width_status()?,
            time: settings.width_time()?,
            dataset_indent_text: settings.dataset_indent_text()?,
            dataset_indent_spacing: settings.dataset_indent_spacing()?,
            dataset_indent_class: settings.dataset_indent_class()?,
            dataset_name_class: settings.dataset_name_class()?,
            status_message_text: settings.status_message_text()?,
            status_message_spacing: settings.status_message_spacing()?,
            row_prefix_text: settings.row_prefix_text()?,
            row_suffix_text: settings.row_suffix_text()?,
            row_suffix_class: settings.row_suffix_class()?,
            test_index_class: settings.test_index_class()?,
            test_name_ellipsis_text: settings.test_name_ellipsis_text()?,
            test_name_ellipsis_class: settings.test_name_ellipsis_class()?,
        };
        spec.name_width()?;
        Ok(spec)
    }

    fn fixed_width(&self) -> usize {
        self.left + self.index + self.right + self.padding * 3 + self.status + self.time
    }

    /// Width left over for the name column. Zero or negative space is a
    /// configuration/environment error, never silently wrapped around.
    pub fn name_width(&self) -> Result<usize, PrinterError> {
        let fixed = self.fixed_width();
        if self.terminal_width <= fixed {
            return Err(PrinterError::NameColumnExhausted {
                terminal_width: self.terminal_width,
                required: fixed,
            });
        }
        Ok(self.terminal_width - fixed)
    }

    fn restricted_width(&self, name_width: usize, reserved: usize) -> Result<usize, PrinterError> {
        if name_width <= reserved {
            return Err(PrinterError::NameColumnExhausted {
                terminal_width: self.terminal_width,
                required: self.fixed_width() + reserved,
            });
        }
        Ok(name_width - reserved)
    }
}

/// One test, resolved to the strings the row engine works with.
#[derive(Debug, Clone)]
pub struct RowEntry<'a> {
    pub name: &'a str,
    pub dataset: Option<&'a str>,
    /// Base name of the last entry rendered in the same suite, for the
    /// dataset-header suppression rule.
    pub previous_name: Option<&'a str>,
    /// Already normalized, and present only when the status shows messages
    /// inline.
    pub inline_message: Option<&'a str>,
    pub icon: &'a str,
    pub status_class: &'a str,
    pub index_text: &'a str,
    pub time_text: &'a str,
    pub time_class: &'a str,
}

/// Produce the fixed-width rows for one test. The first row carries the
/// status icon, the time and the suite index; wrapped rows carry the
/// continuation glyphs instead. Width accounting is character-based on the
/// span text alone, so styling never shifts a column.
pub fn lay_out(spec: &LayoutSpec, entry: &RowEntry<'_>) -> Result<Vec<Line>, PrinterError> {
    let name_width = spec.name_width()?;

    let mut text_rows: Vec<Vec<Span>> = Vec::new();

    // A dataset entry only repeats the name rows when it opens a new block
    // of siblings; an entry whose name matched the previous row keeps the
    // dataset rows alone.
    let is_dataset_header =
        entry.dataset.is_some() && entry.previous_name != Some(entry.name);

    if entry.dataset.is_none() || is_dataset_header {
        for chunk in chunk_chars(entry.name, name_width) {
            text_rows.push(vec![Span::plain(chunk)]);
        }
    }

    if let Some(dataset) = entry.dataset {
        let reserved = char_count(&spec.dataset_indent_text) + spec.dataset_indent_spacing;
        let width = spec.restricted_width(name_width, reserved)?;
        for chunk in chunk_chars(dataset, width) {
            text_rows.push(vec![
                Span::new(spec.dataset_indent_text.clone(), spec.dataset_indent_class.clone()),
                Span::plain(" ".repeat(spec.dataset_indent_spacing)),
                Span::new(chunk, spec.dataset_name_class.clone()),
            ]);
        }
    }

    if let Some(message) = entry.inline_message {
        let reserved = char_count(&spec.status_message_text) + spec.status_message_spacing;
        let width = spec.restricted_width(name_width, reserved)?;
        let mut chunks = chunk_chars(message, width);
        if chunks.len() > MAX_MESSAGE_LINES {
            chunks.truncate(MAX_MESSAGE_LINES);
            if let Some(last) = chunks.last_mut() {
                *last = truncate_with_suffix(last, TRUNCATION_SUFFIX);
            }
        }
        for chunk in chunks {
            text_rows.push(vec![
                Span::new(spec.status_message_text.clone(), entry.status_class.to_owned()),
                Span::plain(" ".repeat(spec.status_message_spacing)),
                Span::new(chunk, format!("{} italic", entry.status_class)),
            ]);
        }
    }

    // Every test renders at least one row, even with nothing to say.
    if text_rows.is_empty() {
        text_rows.push(vec![Span::plain("")]);
    }

    let mut rows = Vec::with_capacity(text_rows.len());
    for (row, name_spans) in text_rows.into_iter().enumerate() {
        let mut line = Line::new();
        line.push(Span::plain(" ".repeat(spec.left)));

        if row == 0 {
            line.push(Span::new(
                pad_left(entry.index_text, spec.index),
                spec.test_index_class.clone(),
            ));
        } else {
            line.push(Span::plain(" ".repeat(spec.index)));
        }
        line.push(Span::plain(" ".repeat(spec.padding)));

        if row == 0 {
            line.push(Span::new(
                pad_right(entry.icon, spec.status),
                entry.status_class.to_owned(),
            ));
        } else {
            line.push(Span::new(
                pad_right(&spec.row_prefix_text, spec.status),
                entry.status_class.to_owned(),
            ));
        }
        line.push(Span::plain(" ".repeat(spec.padding)));

        let content_width: usize = name_spans.iter().map(Span::width).sum();
        for span in name_spans {
            line.push(span);
        }
        let filler = name_width.saturating_sub(content_width);
        if filler > 0 {
            line.push(Span::plain(" "));
            if filler > 1 {
                line.push(Span::new(
                    repeat_to_width(&spec.test_name_ellipsis_text, filler - 1),
                    spec.test_name_ellipsis_class.clone(),
                ));
            }
        }
        line.push(Span::plain(" ".repeat(spec.padding)));

        if row == 0 {
            line.push(Span::new(
                pad_right(entry.time_text, spec.time),
                entry.time_class.to_owned(),
            ));
        } else {
            line.push(Span::new(
                pad_right(&spec.row_suffix_text, spec.time),
                spec.row_suffix_class.clone(),
            ));
        }

        rows.push(line);
    }

    Ok(rows)
}

fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Character-aware splitting into fixed-size pieces. An empty input yields
/// no chunks at all.
fn chunk_chars(text: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for character in text.chars() {
        if count == width {
            chunks.push(current);
            current = String::new();
            count = 0;
        }
        current.push(character);
        count += 1;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Replace the tail of the line so the suffix fits within the line's own
/// length (no re-wrapping).
fn truncate_with_suffix(line: &str, suffix: &str) -> String {
    let keep = char_count(line).saturating_sub(char_count(suffix));
    let kept: String = line.chars().take(keep).collect();
    format!("{}{}", kept, suffix)
}

pub(crate) fn pad_left(text: &str, width: usize) -> String {
    let length = char_count(text);
    if length >= width {
        return text.to_owned();
    }
    format!("{}{}", " ".repeat(width - length), text)
}

pub(crate) fn pad_right(text: &str, width: usize) -> String {
    let length = char_count(text);
    if length >= width {
        return text.to_owned();
    }
    format!("{}{}", text, " ".repeat(width - length))
}

pub(crate) fn repeat_to_width(text: &str, width: usize) -> String {
    if text.is_empty() {
        return " ".repeat(width);
    }
    text.chars().cycle().take(width).collect()
}
