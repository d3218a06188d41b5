//! The processing loop
//!
//! Single-threaded, pull-based dispatch: each input line is parsed, run
//! through lifecycle and watched-tag detection, then either buffered in
//! the backlog (no identity known yet) or grouped and printed. Backlog
//! replay is an explicit drained queue fed through the same dispatch
//! function as live records.

use std::collections::HashSet;
use std::io::{BufRead, Write};

use logtint_render::Formatter;
use logtint_types::{Record, Result};

use crate::backlog::Backlog;
use crate::grouper::Grouper;
use crate::parser::LineParser;
use crate::tracker::{Lifecycle, ProcessTracker};

/// Drives the full normalize-track-group-render pipeline over a stream
pub struct Pipeline<W: Write> {
    parser: LineParser,
    tracker: ProcessTracker,
    backlog: Backlog,
    grouper: Grouper,
    formatter: Formatter,
    out: W,
}

impl<W: Write> Pipeline<W> {
    pub fn new(
        packages: HashSet<String>,
        tags: HashSet<String>,
        formatter: Formatter,
        out: W,
    ) -> Self {
        Self {
            parser: LineParser::new(),
            tracker: ProcessTracker::new(packages, tags),
            backlog: Backlog::new(),
            grouper: Grouper::new(),
            formatter,
            out,
        }
    }

    /// Consume the input to end of stream.
    ///
    /// Stops with an error on the first unrecognized line. A trailing
    /// hidden group and any remaining backlog are discarded at EOF.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        for line in input.lines() {
            self.push_line(&line?)?;
        }
        tracing::debug!("input stream ended");
        Ok(())
    }

    /// Process a single raw line
    pub fn push_line(&mut self, line: &str) -> Result<()> {
        match self.parser.parse(line)? {
            Some(rec) => self.ingest(rec),
            None => Ok(()),
        }
    }

    fn ingest(&mut self, rec: Record) -> Result<()> {
        if self.tracker.observe_lifecycle(&rec) == Some(Lifecycle::Started) {
            // A fresh start makes anything buffered before it stale.
            self.backlog.clear();
        }
        if self.tracker.observe_tag(&rec) {
            // Identity just got bootstrapped: replay everything buffered
            // before it, re-checking lifecycle messages along the way.
            for buffered in self.backlog.drain() {
                if self.tracker.observe_lifecycle(&buffered) == Some(Lifecycle::Started) {
                    self.backlog.clear();
                }
                self.dispatch(&buffered)?;
            }
        }
        if self.tracker.has_tracked_pids() {
            self.dispatch(&rec)
        } else {
            self.backlog.push(rec);
            Ok(())
        }
    }

    /// Render one record, feed it to the grouper, and print whatever the
    /// grouper releases. Output is flushed per batch so every shown line
    /// is visible as soon as it is produced.
    fn dispatch(&mut self, rec: &Record) -> Result<()> {
        let tracked = self.tracker.is_tracked(rec.pid);
        let (line, matched) = self.formatter.render(rec, tracked, self.tracker.highlight());
        let released = self.grouper.push(rec.group_key(), line, tracked || matched);
        if !released.is_empty() {
            for line in &released {
                writeln!(self.out, "{line}")?;
            }
            self.out.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logtint_types::Error;

    fn run_lines(packages: &[&str], tags: &[&str], lines: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        let mut pipeline = Pipeline::new(
            packages.iter().map(|s| s.to_string()).collect(),
            tags.iter().map(|s| s.to_string()).collect(),
            Formatter::new(false),
            &mut out,
        );
        for line in lines {
            pipeline.push_line(line).unwrap();
        }
        drop(pipeline);
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_everything_backlogged_until_identity_known() {
        let out = run_lines(
            &["org.example.app"],
            &[],
            &[
                "08-19 23:41:39.100 300 300 D Noise: one",
                "08-19 23:41:39.200 300 300 D Noise: two",
                "08-19 23:41:39.300 300 300 D Noise: three",
            ],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_watched_tag_triggers_backlog_replay_in_order() {
        let out = run_lines(
            &[],
            &["KOReader"],
            &[
                "08-19 23:41:39.100 500 500 D Init: first",
                "08-19 23:41:39.200 500 500 D Init: second",
                "08-19 23:41:39.300 500 500 V KOReader: ready",
            ],
        );
        assert_eq!(out.len(), 3);
        assert!(out[0].ends_with("first"));
        assert!(out[1].ends_with("second"));
        assert!(out[2].ends_with("ready"));
    }

    #[test]
    fn test_replayed_noise_from_other_processes_stays_hidden() {
        let out = run_lines(
            &[],
            &["KOReader"],
            &[
                "08-19 23:41:39.100 300 300 D Noise: unrelated",
                "08-19 23:41:39.300 500 500 V KOReader: ready",
            ],
        );
        assert_eq!(out.len(), 1);
        assert!(out[0].ends_with("ready"));
    }

    #[test]
    fn test_start_proc_for_configured_package_reveals_stream() {
        // The end-to-end discovery scenario: the start message itself is
        // shown (package match in text) and the new pid is tracked.
        let out = run_lines(
            &["org.example.app"],
            &[],
            &[
                "08-19 23:41:39.347 100 100 I ActivityManager: Start proc 100:org.example.app/u0a1 for activity org.example.app/.MainActivity",
                "08-19 23:41:39.400 100 100 D Foo: hello",
            ],
        );
        assert_eq!(out.len(), 2);
        assert!(out[0].contains("Start proc 100:org.example.app/u0a1"));
        assert!(out[1].ends_with("hello"));
    }

    #[test]
    fn test_start_discards_backlog() {
        let out = run_lines(
            &["org.example.app"],
            &[],
            &[
                "08-19 23:41:39.100 300 300 D Noise: stale",
                "08-19 23:41:39.347 1000 1000 I ActivityManager: Start proc 100:org.example.app/u0a1 for activity org.example.app/.MainActivity",
                "08-19 23:41:39.400 100 100 D Foo: hello",
            ],
        );
        assert_eq!(out.len(), 2);
        assert!(!out.iter().any(|l| l.contains("stale")));
    }

    #[test]
    fn test_death_message_shown_and_pid_stays_tracked() {
        let out = run_lines(
            &["org.example.app"],
            &[],
            &[
                "08-19 23:41:39.347 1000 1000 I ActivityManager: Process org.example.app (pid 2785) has died",
                "08-19 23:41:39.400 2785 2785 D Foo: still talking",
            ],
        );
        assert_eq!(out.len(), 2);
        assert!(out[0].contains("has died"));
        assert!(out[1].ends_with("still talking"));
    }

    #[test]
    fn test_highlight_match_reveals_whole_burst() {
        let out = run_lines(
            &["org.example.app"],
            &["Boot"],
            &[
                "08-19 23:41:39.100 1 1 I Boot: up",
                "08-19 23:41:39.200 300 300 W Bar: quiet noise",
                "08-19 23:41:39.300 300 300 W Bar: mentions org.example.app here",
            ],
        );
        assert_eq!(out.len(), 3);
        assert!(out[0].ends_with("up"));
        assert!(out[1].ends_with("quiet noise"));
        assert!(out[2].ends_with("mentions org.example.app here"));
    }

    #[test]
    fn test_trailing_hidden_group_is_discarded() {
        let out = run_lines(
            &[],
            &["Boot"],
            &[
                "08-19 23:41:39.100 1 1 I Boot: up",
                "08-19 23:41:39.200 300 300 W Bar: never shown",
            ],
        );
        assert_eq!(out.len(), 1);
        assert!(out[0].ends_with("up"));
    }

    #[test]
    fn test_unrecognized_line_stops_the_run() {
        let mut out = Vec::new();
        let mut pipeline = Pipeline::new(
            HashSet::new(),
            ["Boot".to_string()].into_iter().collect(),
            Formatter::new(false),
            &mut out,
        );
        let input = "08-19 23:41:39.100 1 1 I Boot: up\ngarbage in the stream\n";
        let err = pipeline.run(input.as_bytes()).unwrap_err();
        match err {
            Error::UnrecognizedLine { line } => assert_eq!(line, "garbage in the stream"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rendered_output_parses_back() {
        // The pipeline's own output is one of the accepted layouts.
        let out = run_lines(
            &[],
            &["KOReader"],
            &["08-19 23:41:39.347 10000 10023 V KOReader: HttpInspector: onCloseWidget"],
        );
        assert_eq!(out.len(), 1);
        let rec = LineParser::new().parse(&out[0]).unwrap().unwrap();
        assert_eq!(rec.pid, 10000);
        assert_eq!(rec.tid, 10023);
        assert_eq!(rec.tag, "KOReader");
        assert_eq!(rec.text, "HttpInspector: onCloseWidget");
    }
}
