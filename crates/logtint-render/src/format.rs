//! Fixed-column line rendering

use regex::{Captures, Regex};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use logtint_types::Record;

use crate::palette;

/// Width of the process-id column
pub const MAX_PID_WIDTH: usize = 5;

/// Width of the tag column (shrinks when a `:tid` suffix is present)
pub const MAX_TAG_WIDTH: usize = 25;

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

/// Renders records into `{time} {proc} {tag} {priority} {text}` lines
pub struct Formatter {
    color: bool,
}

impl Formatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Render one record into an output line.
    ///
    /// Returns the finished line and whether the highlight matcher hit
    /// anywhere in the message text. Tracked records get a reverse-video
    /// pid column and a non-dim tag color; others render dim.
    pub fn render(
        &self,
        rec: &Record,
        tracked: bool,
        highlight: Option<&Regex>,
    ) -> (String, bool) {
        let threaded = rec.tid != rec.pid;
        let proc_style: &[&str] = if tracked {
            if threaded {
                &[palette::REVERSE, palette::DIM]
            } else {
                &[palette::REVERSE]
            }
        } else {
            &[palette::DIM]
        };

        let mut proc = self.cell(
            &rec.pid.to_string(),
            proc_style,
            MAX_PID_WIDTH,
            Align::Right,
            false,
        );
        let mut tag_width = MAX_TAG_WIDTH;
        if threaded {
            // The :tid suffix borrows its width from the tag column.
            proc.push_str(&self.cell(
                &format!(":{}", rec.tid),
                proc_style,
                MAX_PID_WIDTH + 1,
                Align::Left,
                false,
            ));
            tag_width -= MAX_PID_WIDTH + 1;
        }

        let tag_style = [palette::tag_color(&rec.tag, tracked)];
        let tag = self.cell(&rec.tag, &tag_style, tag_width, Align::Right, true);

        let priority_style = [palette::priority_style(rec.priority)];
        let priority = self.cell(
            &format!(" {} ", rec.priority.as_letter()),
            &priority_style,
            3,
            Align::Left,
            false,
        );

        let (text, matched) = self.highlight(&rec.text, highlight);
        let line = format!("{} {} {} {} {}", rec.time, proc, tag, priority, text);
        (line, matched)
    }

    /// Wrap highlight matches in bold, reporting whether anything matched
    fn highlight(&self, text: &str, highlight: Option<&Regex>) -> (String, bool) {
        let Some(rx) = highlight else {
            return (text.to_string(), false);
        };
        if !self.color {
            return (text.to_string(), rx.is_match(text));
        }
        let mut matched = false;
        let replaced = rx.replace_all(text, |caps: &Captures| {
            matched = true;
            format!("{}{}{}", palette::BOLD, &caps[0], palette::RESET)
        });
        (replaced.into_owned(), matched)
    }

    /// Clip to the column width, style the content, pad outside the styling
    fn cell(
        &self,
        text: &str,
        styles: &[&str],
        width: usize,
        align: Align,
        ellipsis: bool,
    ) -> String {
        let (mut content, content_width) = clip(text, width, ellipsis);
        if self.color && styles.iter().any(|s| !s.is_empty()) {
            let mut styled = String::with_capacity(content.len() + 16);
            for style in styles {
                styled.push_str(style);
            }
            styled.push_str(&content);
            styled.push_str(palette::RESET);
            content = styled;
        }
        let pad = " ".repeat(width.saturating_sub(content_width));
        match align {
            Align::Right => format!("{pad}{content}"),
            Align::Left => format!("{content}{pad}"),
        }
    }
}

/// Truncate to a display width, marking truncation with an ellipsis
fn clip(text: &str, width: usize, ellipsis: bool) -> (String, usize) {
    let full = UnicodeWidthStr::width(text);
    if full <= width {
        return (text.to_string(), full);
    }
    let keep = if ellipsis {
        width.saturating_sub(1)
    } else {
        width
    };
    let mut out = String::new();
    let mut taken = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if taken + ch_width > keep {
            break;
        }
        out.push(ch);
        taken += ch_width;
    }
    if ellipsis {
        out.push('…');
        taken += 1;
    }
    (out, taken)
}
