//! Log line parsing
//!
//! Recognizes the logcat line layouts logtint accepts and extracts a
//! normalized [`Record`] from them. A line matching no layout is a fatal
//! error by policy: silently dropping or misparsing log data is worse than
//! failing loudly.

use regex::Regex;

use logtint_types::{Error, Priority, Record, Result};

/// Sentinel line logcat emits at the head of each buffer
const BEGINNING_OF_LOG: &str = "--------- beginning of ";

const TIME: &str = r"\d+:\d+:\d+\.\d+";
const PRIORITY: &str = r"[VDIWEF]";

/// A tag may contain single internal spaces or `:` characters but stops at
/// a `": "` separator or a double space, and never starts or ends with one.
const TAG: &str = r"(?:[^ :\t]+(?:[: ][^ :\t]+)*)?";

/// Parser over the supported logcat line layouts
pub struct LineParser {
    /// Layouts tried in priority order: threadtime, brief, time, and the
    /// layout logtint itself renders.
    layouts: [Regex; 4],
}

impl LineParser {
    pub fn new() -> Self {
        // 08-19 23:41:39.347 10000 10023 V KOReader: HttpInspector: onCloseWidget
        let threadtime = format!(
            r"^\d+-\d+\s+(?P<time>{TIME})\s+(?P<pid>\d+)\s+(?P<tid>\d+)\s+(?P<priority>{PRIORITY})\s+(?P<tag>{TAG})\s*:[ ]?(?P<text>.*)$"
        );
        // V/KOReader(32615): HttpInspector: onCloseWidget
        let brief = format!(
            r"^(?P<priority>{PRIORITY})/(?P<tag>{TAG})\s*\(\s*(?P<pid>\d+)\):[ ]?(?P<text>.*)$"
        );
        // 08-18 02:24:43.331 D/KOReader( 2686): ffi.load rt.so.1
        let time = format!(
            r"^\d+-\d+\s+(?P<time>{TIME})\s+(?P<priority>{PRIORITY})/(?P<tag>{TAG})\s*\(\s*(?P<pid>\d+)\):[ ]?(?P<text>.*)$"
        );
        // 23:41:39.347 10000:10023            KOReader  V  HttpInspector: onCloseWidget
        let rendered = format!(
            r"^(?P<time>{TIME})\s+(?P<pid>\d+)(?::(?P<tid>\d+))?\s+(?P<tag>{TAG})\s{{2}}(?P<priority>{PRIORITY})\s{{2}}(?P<text>.*)$"
        );
        let layouts = [threadtime, brief, time, rendered]
            .map(|pattern| Regex::new(&pattern).expect("valid layout pattern"));
        Self { layouts }
    }

    /// Parse one line of input.
    ///
    /// Returns `Ok(None)` for blank lines and the "beginning of log"
    /// marker, `Ok(Some(record))` for the first layout that fully matches,
    /// and [`Error::UnrecognizedLine`] when none does.
    pub fn parse(&self, line: &str) -> Result<Option<Record>> {
        if line.is_empty() || line.starts_with(BEGINNING_OF_LOG) {
            return Ok(None);
        }
        for layout in &self.layouts {
            if let Some(caps) = layout.captures(line) {
                let pid: u32 = caps["pid"]
                    .parse()
                    .map_err(|_| Error::unrecognized_line(line))?;
                let tid = match caps.name("tid") {
                    Some(m) => m
                        .as_str()
                        .parse()
                        .map_err(|_| Error::unrecognized_line(line))?,
                    None => pid,
                };
                let priority = caps["priority"]
                    .chars()
                    .next()
                    .and_then(Priority::from_letter)
                    .ok_or_else(|| Error::unrecognized_line(line))?;
                return Ok(Some(Record {
                    time: caps
                        .name("time")
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default(),
                    pid,
                    tid,
                    priority,
                    tag: caps["tag"].to_string(),
                    text: caps["text"].to_string(),
                }));
            }
        }
        Err(Error::unrecognized_line(line))
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}
