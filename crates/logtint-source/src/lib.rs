//! Log stream acquisition for logtint
//!
//! The core only consumes an ordered sequence of text lines; this crate
//! produces that sequence, either by tailing the device log through
//! `adb logcat` or by reading an already-captured log from a file or
//! stdin.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use logtint_types::{Error, Result};

/// Where the raw log lines come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Tail the device log via `adb logcat -v threadtime`
    Logcat {
        /// Clear the device log before tailing
        clear: bool,
        /// Dump the current log and exit instead of following
        dump: bool,
    },
    /// Read an already-captured log file
    File(PathBuf),
    /// Read from standard input
    Stdin,
}

impl Source {
    /// Open the source, yielding a buffered line stream
    pub fn open(&self) -> Result<LogStream> {
        match self {
            Self::Logcat { clear, dump } => spawn_logcat(*clear, *dump),
            Self::File(path) => {
                let file = File::open(path)?;
                Ok(LogStream {
                    reader: Box::new(BufReader::new(file)),
                    child: None,
                })
            }
            Self::Stdin => Ok(LogStream {
                reader: Box::new(BufReader::new(io::stdin())),
                child: None,
            }),
        }
    }
}

fn spawn_logcat(clear: bool, dump: bool) -> Result<LogStream> {
    if clear {
        let status = Command::new("adb")
            .args(["logcat", "-c"])
            .status()
            .map_err(|e| Error::spawn("adb logcat -c", e.to_string()))?;
        if !status.success() {
            return Err(Error::spawn("adb logcat -c", format!("exited with {status}")));
        }
    }
    let mut command = Command::new("adb");
    command.args(["logcat", "-v", "threadtime"]);
    if dump {
        command.arg("-d");
    }
    let mut child = command
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| Error::spawn("adb logcat", e.to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::spawn("adb logcat", "no stdout pipe"))?;
    tracing::debug!(dump, "spawned adb logcat");
    Ok(LogStream {
        reader: Box::new(BufReader::new(stdout)),
        child: Some(child),
    })
}

/// An open line stream, holding the child process alive when tailing
pub struct LogStream {
    reader: Box<dyn BufRead>,
    child: Option<Child>,
}

impl std::fmt::Debug for LogStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStream")
            .field("child", &self.child)
            .finish_non_exhaustive()
    }
}

impl Read for LogStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for LogStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        if let Some(child) = &mut self.child {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
