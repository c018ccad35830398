pub(crate) mod color;

use owo_colors::OwoColorize;
use std::io::{self, Write};

/// A run of text carrying the class list that styles it. The class list is
/// data until the moment of writing, so layout logic can be asserted on
/// without parsing escape sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub class: String,
}

impl Span {
    pub fn new<T: Into<String>, C: Into<String>>(text: T, class: C) -> Self {
        Self {
            text: text.into(),
            class: class.into(),
        }
    }

    pub fn plain<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            class: String::new(),
        }
    }

    /// Width of the span in characters. Styling never contributes.
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// One physical line of output, assembled as spans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }

    pub fn push(&mut self, span: Span) -> &mut Self {
        self.spans.push(span);
        self
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// The line without any styling applied.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Terminal backend: resolves span classes to ANSI styles and writes lines
/// to the configured output.
pub struct Renderer {
    output: Box<dyn Write>,
    colors: bool,
}

impl Renderer {
    pub fn new(output: Box<dyn Write>, colors: bool) -> Self {
        Self { output, colors }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()), true)
    }

    pub fn render(&mut self, line: &Line) -> io::Result<()> {
        for span in &line.spans {
            if self.colors && !span.class.is_empty() {
                let style = color::style_for(&span.class);
                write!(self.output, "{}", span.text.as_str().style(style))?;
            } else {
                write!(self.output, "{}", span.text)?;
            }
        }
        writeln!(self.output)
    }

    pub fn raw(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::SharedBuffer;
    use super::*;

    #[test]
    fn test_plain_text_concatenates_spans() {
        let mut line = Line::new();
        line.push(Span::plain("  "));
        line.push(Span::new("✓", "text-green"));
        line.push(Span::plain(" it works"));

        assert_eq!(line.plain_text(), "  ✓ it works");
        assert_eq!(line.width(), 12);
    }

    #[test]
    fn test_width_counts_characters_not_bytes() {
        let span = Span::new("⟶  ", "text-red");
        assert_eq!(span.width(), 3);
    }

    #[test]
    fn test_renderer_without_colors_writes_plain_lines() {
        let buffer = SharedBuffer::default();
        let mut renderer = Renderer::new(Box::new(buffer.clone()), false);

        let mut line = Line::new();
        line.push(Span::new("✗", "text-red-500"));
        line.push(Span::plain(" nope"));
        renderer.render(&line).unwrap();

        assert_eq!(buffer.contents(), "✗ nope\n");
    }

    #[test]
    fn test_renderer_with_colors_styles_classed_spans() {
        let buffer = SharedBuffer::default();
        let mut renderer = Renderer::new(Box::new(buffer.clone()), true);

        let mut line = Line::new();
        line.push(Span::new("ok", "text-green-500"));
        renderer.render(&line).unwrap();

        let contents = buffer.contents();
        assert!(contents.contains("ok"));
        assert!(contents.contains('\u{1b}'));
    }

    #[test]
    fn test_renderer_with_colors_leaves_unclassed_spans_alone() {
        let buffer = SharedBuffer::default();
        let mut renderer = Renderer::new(Box::new(buffer.clone()), true);

        let mut line = Line::new();
        line.push(Span::plain("plain"));
        renderer.render(&line).unwrap();

        assert_eq!(buffer.contents(), "plain\n");
    }
}
