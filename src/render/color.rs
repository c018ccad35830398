use lazy_static::*;
use owo_colors::{AnsiColors, Style};
use regex::Regex;

lazy_static! {
    static ref CLASS_REGEX: Regex =
        Regex::new(r"^(bg|text)-([^-]+)-?(\d+)?$").expect("Regex compilation error");
}

/// Convert the given class list to a terminal-safe class list, mapping
/// extended palette names down to the conservative eight-color set.
pub fn safe(unsafe_classes: &str) -> String {
    let parts: Vec<String> = unsafe_classes
        .split(' ')
        .map(|part| match CLASS_REGEX.captures(part) {
            Some(captures) => {
                let kind = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
                let color = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
                format!("{}-{}", kind, safe_color_name(color))
            }
            None => part.to_owned(),
        })
        .collect();

    parts.join(" ")
}

fn safe_color_name(color: &str) -> &str {
    match color {
        "amber" | "orange" => "yellow",
        "lime" => "green",
        "grey" | "darkgray" | "lightgray" | "zinc" | "slate" => "gray",
        other => other,
    }
}

/// Resolve a class list into a terminal style. Tokens the terminal cannot
/// express (layout utilities, unknown colors) are ignored.
pub fn style_for(classes: &str) -> Style {
    let mut style = Style::new();

    for token in classes.split_whitespace() {
        if token == "italic" {
            style = style.italic();
            continue;
        }

        if let Some(captures) = CLASS_REGEX.captures(token) {
            let kind = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            let color = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
            if let Some(ansi) = ansi_color(color) {
                style = match kind {
                    "bg" => style.on_color(ansi),
                    _ => style.color(ansi),
                };
            }
        }
    }

    style
}

fn ansi_color(name: &str) -> Option<AnsiColors> {
    let color = match safe_color_name(name) {
        "black" => AnsiColors::Black,
        "red" => AnsiColors::Red,
        "green" => AnsiColors::Green,
        "yellow" => AnsiColors::Yellow,
        "blue" => AnsiColors::Blue,
        "magenta" | "purple" | "fuchsia" => AnsiColors::Magenta,
        "cyan" => AnsiColors::Cyan,
        "white" => AnsiColors::White,
        "gray" => AnsiColors::BrightBlack,
        _ => return None,
    };

    Some(color)
}
