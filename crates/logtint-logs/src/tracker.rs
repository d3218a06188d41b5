//! Process identity tracking
//!
//! Watches the stream for process lifecycle messages and watched tags,
//! growing the set of tracked pids and packages, and keeps the compiled
//! highlight matcher in sync with those sets.

use std::collections::HashSet;

use regex::Regex;

use logtint_types::Record;

/// Package names: parts of letters/digits/underscores, each part starting
/// with a letter, at least two parts long.
const PACKAGE: &str = r"[A-Za-z][_0-9A-Za-z]*(?:\.[A-Za-z][_0-9A-Za-z]*)+";

/// Tag under which the system reports process lifecycle events
const LIFECYCLE_TAG: &str = "ActivityManager";

/// What a lifecycle message reported, if it was acted on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    Started,
    Died,
}

/// Tracks which processes belong to the applications of interest
pub struct ProcessTracker {
    /// Currently tracked process ids; once added, never removed
    pids: HashSet<u32>,

    /// Tracked package names (seeded from configuration, grown by starts)
    packages: HashSet<String>,

    /// Watched tags: seeing one bootstraps tracking from nothing
    tags: HashSet<String>,

    /// Compiled matcher over packages and pids, rebuilt on every addition
    highlight: Option<Regex>,

    death_rx: Regex,
    start_fused_rx: Regex,
    start_spread_rx: Regex,
}

impl ProcessTracker {
    pub fn new(packages: HashSet<String>, tags: HashSet<String>) -> Self {
        // Process org.koreader.launcher.debug (pid 2785) has died
        let death = format!(r"^Process (?P<package>{PACKAGE}) \(pid (?P<pid>\d+)\) has died");
        // Start proc 2525:org.koreader.launcher/u0a56 for activity ...
        let start_fused = format!(r"^Start proc (?P<pid>\d+):(?P<package>{PACKAGE})/");
        // Start proc org.koreader.launcher for activity ...: pid=2686 uid=10047 ...
        let start_spread = format!(r"^Start proc (?P<package>{PACKAGE}) .*\bpid=(?P<pid>\d+)\b");
        let mut tracker = Self {
            pids: HashSet::new(),
            packages,
            tags,
            highlight: None,
            death_rx: Regex::new(&death).expect("valid death pattern"),
            start_fused_rx: Regex::new(&start_fused).expect("valid start pattern"),
            start_spread_rx: Regex::new(&start_spread).expect("valid start pattern"),
        };
        tracker.rebuild_highlight();
        tracker
    }

    /// Whether any process is being tracked yet
    pub fn has_tracked_pids(&self) -> bool {
        !self.pids.is_empty()
    }

    pub fn is_tracked(&self, pid: u32) -> bool {
        self.pids.contains(&pid)
    }

    /// The matcher recognizing tracked packages and pids in arbitrary text
    pub fn highlight(&self) -> Option<&Regex> {
        self.highlight.as_ref()
    }

    /// Check a record for a process start or death message.
    ///
    /// Only messages naming an already-tracked pid or package are acted on;
    /// the tracker extends identity for relevant processes, it does not
    /// bootstrap tracking from arbitrary lifecycle chatter. A death never
    /// untracks the pid.
    pub(crate) fn observe_lifecycle(&mut self, rec: &Record) -> Option<Lifecycle> {
        if rec.tag != LIFECYCLE_TAG {
            return None;
        }
        let (caps, event) = if let Some(caps) = self.death_rx.captures(&rec.text) {
            (caps, Lifecycle::Died)
        } else if let Some(caps) = self.start_fused_rx.captures(&rec.text) {
            (caps, Lifecycle::Started)
        } else if let Some(caps) = self.start_spread_rx.captures(&rec.text) {
            (caps, Lifecycle::Started)
        } else {
            return None;
        };
        let package = &caps["package"];
        let pid: u32 = caps["pid"].parse().ok()?;
        if !self.pids.contains(&pid) && !self.packages.contains(package) {
            return None;
        }
        self.track(Some(package), Some(pid));
        Some(event)
    }

    /// Check a record for a watched tag; this is how tracking starts from
    /// nothing. Returns true when the tag is watched.
    pub(crate) fn observe_tag(&mut self, rec: &Record) -> bool {
        if !self.tags.contains(&rec.tag) {
            return false;
        }
        self.track(None, Some(rec.pid));
        true
    }

    fn track(&mut self, package: Option<&str>, pid: Option<u32>) {
        let mut grown = false;
        if let Some(pid) = pid {
            if self.pids.insert(pid) {
                tracing::debug!(pid, "tracking process");
                grown = true;
            }
        }
        if let Some(package) = package {
            if !self.packages.contains(package) {
                tracing::debug!(package, "tracking package");
                self.packages.insert(package.to_string());
                grown = true;
            }
        }
        if grown {
            self.rebuild_highlight();
        }
    }

    /// Rebuild the highlight matcher as a pure function of the current
    /// sets: a word-boundary alternation over package names, plus one over
    /// pids allowing a `pid=`/`pid:`/`pid ` prefix. Members sort
    /// longest-first so overlapping names don't shadow each other.
    fn rebuild_highlight(&mut self) {
        let mut alternations = Vec::new();
        if !self.packages.is_empty() {
            let mut names: Vec<String> =
                self.packages.iter().map(|p| regex::escape(p)).collect();
            sort_longest_first(&mut names);
            alternations.push(format!(r"\b(?:{})\b", names.join("|")));
        }
        if !self.pids.is_empty() {
            let mut pids: Vec<String> = self.pids.iter().map(u32::to_string).collect();
            sort_longest_first(&mut pids);
            alternations.push(format!(r"\b(?:pid[=: ])?(?:{})\b", pids.join("|")));
        }
        self.highlight = if alternations.is_empty() {
            None
        } else {
            Some(Regex::new(&alternations.join("|")).expect("valid highlight pattern"))
        };
    }
}

fn sort_longest_first(members: &mut [String]) {
    members.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
}
