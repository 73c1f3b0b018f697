//! Plain-text run report written to the user's terminal.

use std::io::Write;

use serde::Serialize;

const UNDERLINE: &str = "==============================";

/// Writes report lines to an injected sink. Write failures are ignored so a
/// closed stdout never interrupts provisioning or teardown.
#[derive(Debug)]
pub(crate) struct Report<W> {
    out: W,
}

impl<W: Write> Report<W> {
    pub(crate) const fn new(out: W) -> Self {
        Self { out }
    }

    pub(crate) fn line(&mut self, text: &str) {
        writeln!(self.out, "{text}").ok();
    }

    pub(crate) fn blank(&mut self) {
        writeln!(self.out).ok();
    }

    /// `"{label}: {id}"` followed by the full resource and a blank line.
    pub(crate) fn resource<T: Serialize>(&mut self, label: &str, id: &str, value: &T) {
        self.line(&format!("{label}: {id}"));
        self.dump(value);
        self.blank();
    }

    /// A titled, underlined block holding `value`.
    pub(crate) fn section<T: Serialize>(&mut self, title: &str, value: &T) {
        self.line(title);
        self.line(UNDERLINE);
        self.dump(value);
        self.blank();
    }

    /// Writes `text` and flushes so it is visible before a long pause.
    pub(crate) fn notice(&mut self, text: &str) {
        self.line(text);
        self.out.flush().ok();
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn dump<T: Serialize>(&mut self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => self.line(&json),
            Err(err) => self.line(&format!("<unrenderable: {err}>")),
        }
    }
}
