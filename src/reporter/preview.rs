use crate::configuration::settings::Settings;
use crate::render::{Line, Renderer, Span};
use crate::reporter::error::PrinterError;
use crate::reporter::single::Failure;
use crate::reporter::status::Status;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

const CONTEXT_LINES: usize = 5;

/// Renders the detail block for a failed test: the exception type badge,
/// File/Line labels and a code frame lifted from the failing source file.
pub struct FailurePreview<'a> {
    failure: &'a Failure,
}

impl<'a> FailurePreview<'a> {
    pub fn make(failure: &'a Failure) -> Self {
        Self { failure }
    }

    /// The inverse-styled exception class badge.
    pub fn render_type(
        &self,
        settings: &Settings,
        renderer: &mut Renderer,
        status: Status,
        indent: usize,
    ) -> Result<(), PrinterError> {
        let badge_class = settings.status_inverse_css(status)?;

        let mut line = Line::new();
        line.push(Span::plain(" ".repeat(indent)));
        line.push(Span::new(format!(" {} ", self.failure.exception), badge_class));
        renderer.render(&line)?;
        Ok(())
    }

    pub fn render(
        &self,
        settings: &Settings,
        renderer: &mut Renderer,
        indent: usize,
        with_type: bool,
    ) -> Result<(), PrinterError> {
        let label_class = settings.exception_preview_label_class()?;
        let pad = " ".repeat(indent);

        if with_type {
            let mut line = Line::new();
            line.push(Span::plain(pad.clone()));
            line.push(Span::new(" Type: ", label_class.clone()));
            line.push(Span::plain(format!(" {}", self.failure.exception)));
            renderer.render(&line)?;
        }

        if let Some(file) = &self.failure.file {
            let mut line = Line::new();
            line.push(Span::plain(pad.clone()));
            line.push(Span::new(" File: ", label_class.clone()));
            line.push(Span::plain(format!(" {}", file)));
            renderer.render(&line)?;
        }

        if let Some(number) = self.failure.line {
            let mut line = Line::new();
            line.push(Span::plain(pad.clone()));
            line.push(Span::new(" Line: ", label_class.clone()));
            line.push(Span::plain(format!(" {}", number)));
            renderer.render(&line)?;
        }
        renderer.blank()?;

        if let (Some(file), Some(number)) = (&self.failure.file, self.failure.line) {
            match extract_around_line(Path::new(file), number) {
                Ok(rows) => {
                    for (row_number, text) in rows {
                        let gutter = if row_number == number { '>' } else { ' ' };
                        let mut line = Line::new();
                        line.push(Span::plain(pad.clone()));
                        line.push(Span::new(
                            format!("{} {:>4} | ", gutter, row_number),
                            label_class.clone(),
                        ));
                        line.push(Span::plain(text.replace('\t', "    ")));
                        renderer.render(&line)?;
                    }
                }
                Err(err) => debug!("Cannot read source preview from {}: {}", file, err),
            }
        }

        Ok(())
    }
}

/// Pull the 1-based line range out of the file. A missing file yields an
/// empty frame rather than an error.
fn extract_lines(path: &Path, from: usize, to: usize) -> io::Result<Vec<(usize, String)>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let handle = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();

    for (index, line) in handle.lines().enumerate() {
        let number = index + 1;
        if number > to {
            break;
        }
        let text = line?;
        if number >= from {
            rows.push((number, text));
        }
    }

    Ok(rows)
}

fn extract_around_line(path: &Path, line: usize) -> io::Result<Vec<(usize, String)>> {
    let from = line.saturating_sub(CONTEXT_LINES).max(1);
    extract_lines(path, from, line + CONTEXT_LINES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn fixture(name: &str, lines: usize) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let contents: Vec<String> = (1..=lines).map(|n| format!("line {}", n)).collect();
        fs::write(&path, contents.join("\n")).unwrap();
        path
    }

    #[test]
    fn test_extracting_a_window_around_a_line() {
        let path = fixture("plume_preview_window.txt", 20);
        let rows = extract_around_line(&path, 10).unwrap();

        assert_eq!(rows.first().unwrap().0, 5);
        assert_eq!(rows.last().unwrap().0, 15);
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[5], (10, "line 10".to_owned()));
    }

    #[test]
    fn test_extraction_is_clamped_at_the_start_of_the_file() {
        let path = fixture("plume_preview_start.txt", 20);
        let rows = extract_around_line(&path, 2).unwrap();

        assert_eq!(rows.first().unwrap().0, 1);
        assert_eq!(rows.last().unwrap().0, 7);
    }

    #[test]
    fn test_extraction_past_the_end_stops_at_the_last_line() {
        let path = fixture("plume_preview_end.txt", 8);
        let rows = extract_around_line(&path, 8).unwrap();

        assert_eq!(rows.last().unwrap().0, 8);
    }

    #[test]
    fn test_missing_file_yields_an_empty_frame() {
        let rows =
            extract_around_line(Path::new("/definitely/not/here.rs"), 10).unwrap();
        assert!(rows.is_empty());
    }
}
