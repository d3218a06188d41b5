use std::collections::HashSet;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use logtint_logs::Pipeline;
use logtint_render::Formatter;
use logtint_source::Source;

/// Logtint - a colorizing filter for Android logcat streams
#[derive(Parser, Debug)]
#[command(name = "logtint")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Force color output even when stdout is not a terminal
    #[arg(long)]
    color: bool,

    /// Clear the entire device log before running (logcat mode)
    #[arg(short, long)]
    clear: bool,

    /// Dump the device log and exit instead of following it (logcat mode)
    #[arg(short, long)]
    dump: bool,

    /// Act as a filter: process FILE ("-" or no value means stdin)
    #[arg(
        short,
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = "-"
    )]
    filter: Option<String>,

    /// Comma separated list of application packages to highlight
    #[arg(value_name = "PACKAGES")]
    packages: Option<String>,

    /// Comma separated list of application tags to watch for
    #[arg(value_name = "TAGS")]
    tags: Option<String>,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing for debugging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    // Usage errors are rejected before any input is read.
    let (packages, tags) = validate(&args)?;
    let color = args.color || color_from_environment();

    let stream = select_source(&args)
        .open()
        .context("failed to open log source")?;

    let stdout = io::stdout().lock();
    let mut pipeline = Pipeline::new(packages, tags, Formatter::new(color), stdout);
    pipeline.run(stream).context("log processing failed")
}

/// Reject invalid usage, returning the package and watched-tag sets
fn validate(args: &Args) -> Result<(HashSet<String>, HashSet<String>)> {
    if (args.clear || args.dump) && args.filter.is_some() {
        bail!("logcat and filter options are mutually exclusive");
    }
    let packages = split_set(args.packages.as_deref());
    let tags = split_set(args.tags.as_deref());
    if packages.is_empty() && tags.is_empty() {
        bail!("no packages and no tags, means there's nothing to filter");
    }
    Ok((packages, tags))
}

fn select_source(args: &Args) -> Source {
    match &args.filter {
        Some(file) if file == "-" => Source::Stdin,
        Some(file) => Source::File(PathBuf::from(file)),
        None => Source::Logcat {
            clear: args.clear,
            dump: args.dump,
        },
    }
}

/// Color defaults on for interactive terminals, or when forced by the
/// CLICOLOR_FORCE environment variable.
fn color_from_environment() -> bool {
    io::stdout().is_terminal()
        || std::env::var_os("CLICOLOR_FORCE").is_some_and(|v| !v.is_empty())
}

fn split_set(arg: Option<&str>) -> HashSet<String> {
    arg.map(|s| {
        s.split(',')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_set_handles_commas_and_empties() {
        let set = split_set(Some("org.example.app,org.example.app.debug,"));
        assert_eq!(set.len(), 2);
        assert!(set.contains("org.example.app"));
        assert!(set.contains("org.example.app.debug"));
        assert!(split_set(None).is_empty());
        assert!(split_set(Some("")).is_empty());
    }

    #[test]
    fn test_filter_flag_without_value_means_stdin() {
        let args = Args::try_parse_from(["logtint", "-f", "--", "org.example.app"]).unwrap();
        assert_eq!(args.filter.as_deref(), Some("-"));
        assert_eq!(args.packages.as_deref(), Some("org.example.app"));
    }

    #[test]
    fn test_filter_flag_with_file() {
        let args =
            Args::try_parse_from(["logtint", "-f", "device.log", "org.example.app"]).unwrap();
        assert_eq!(args.filter.as_deref(), Some("device.log"));
    }

    #[test]
    fn test_positional_packages_and_tags() {
        let args = Args::try_parse_from(["logtint", "org.example.app", "KOReader,dlopen"]).unwrap();
        assert_eq!(args.packages.as_deref(), Some("org.example.app"));
        assert_eq!(args.tags.as_deref(), Some("KOReader,dlopen"));
    }

    #[test]
    fn test_logcat_mode_flags() {
        let args = Args::try_parse_from(["logtint", "-c", "-d", "org.example.app"]).unwrap();
        assert!(args.clear);
        assert!(args.dump);
        assert!(args.filter.is_none());
    }

    #[test]
    fn test_logcat_and_filter_modes_are_mutually_exclusive() {
        let args =
            Args::try_parse_from(["logtint", "-c", "-f", "device.log", "org.example.app"]).unwrap();
        let err = validate(&args).unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));

        let args =
            Args::try_parse_from(["logtint", "-d", "-f", "device.log", "org.example.app"]).unwrap();
        assert!(validate(&args).is_err());
    }

    #[test]
    fn test_empty_packages_and_tags_rejected_before_reading_input() {
        let args = Args::try_parse_from(["logtint", "-f", "device.log"]).unwrap();
        let err = run(args).unwrap_err();
        assert!(err.to_string().contains("nothing to filter"));

        // Same rejection when the positionals are present but empty.
        let args = Args::try_parse_from(["logtint", "", ""]).unwrap();
        assert!(validate(&args).is_err());
    }

    #[test]
    fn test_valid_config_passes_validation() {
        let args = Args::try_parse_from(["logtint", "", "KOReader"]).unwrap();
        let (packages, tags) = validate(&args).unwrap();
        assert!(packages.is_empty());
        assert!(tags.contains("KOReader"));
    }

    #[test]
    fn test_source_selection_per_mode() {
        let args = Args::try_parse_from(["logtint", "-f", "--", "org.example.app"]).unwrap();
        assert_eq!(select_source(&args), Source::Stdin);

        let args =
            Args::try_parse_from(["logtint", "-f", "device.log", "org.example.app"]).unwrap();
        assert_eq!(
            select_source(&args),
            Source::File(PathBuf::from("device.log"))
        );

        let args = Args::try_parse_from(["logtint", "org.example.app"]).unwrap();
        assert_eq!(
            select_source(&args),
            Source::Logcat {
                clear: false,
                dump: false,
            }
        );

        let args = Args::try_parse_from(["logtint", "-c", "-d", "org.example.app"]).unwrap();
        assert_eq!(
            select_source(&args),
            Source::Logcat {
                clear: true,
                dump: true,
            }
        );
    }
}
