use std::ffi::OsString;

use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};

const FLAG_NAMES: [&str; 3] = ["time", "mem", "help"];

/// Load the machine's cpus and/or memory for a bounded amount of work.
#[derive(Parser, Debug)]
#[command(name = "workload-gen", disable_help_flag = true)]
pub struct Args {
    /// Amount of memory to allocate. Ex 300, 1K, 5G, 20M
    #[arg(long = "mem", value_name = "SIZE", allow_hyphen_values = true)]
    pub mem: Option<String>,

    /// Duration of CPU workload in seconds
    #[arg(
        long = "time",
        value_name = "SECONDS",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub time: i64,

    /// Show usage
    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    pub help: bool,
}

/// What to run, built once from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadRequest {
    /// Seconds of cpu load, 0 to skip the cpu phase.
    pub cpu_seconds: u64,
    /// Size literal as typed, e.g. `20M`. `None` skips the memory phase.
    pub memory: Option<String>,
}

impl From<Args> for WorkloadRequest {
    fn from(args: Args) -> Self {
        Self {
            // zero or negative skips the cpu phase
            cpu_seconds: u64::try_from(args.time).unwrap_or(0),
            memory: args.mem.filter(|literal| !literal.is_empty()),
        }
    }
}

#[derive(Debug)]
pub enum Invocation {
    Usage(String),
    Run(WorkloadRequest),
}

pub fn usage() -> String {
    Args::command().render_help().to_string()
}

/// Parse a full argv (program name first).
///
/// Asking for help, or passing no flag at all, yields [`Invocation::Usage`].
pub fn parse_args<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let matches = Args::command().try_get_matches_from(normalize_args(args))?;
    let explicit = explicit_flags(&matches);
    let args = Args::from_arg_matches(&matches)?;

    if args.help || explicit == 0 {
        return Ok(Invocation::Usage(usage()));
    }
    Ok(Invocation::Run(args.into()))
}

fn explicit_flags(matches: &ArgMatches) -> usize {
    FLAG_NAMES
        .iter()
        .filter(|id| matches.value_source(id) == Some(ValueSource::CommandLine))
        .count()
}

/// Rewrite single-dash long flags (`-time=5`, `-mem 1G`) into the
/// double-dash form.
fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for (position, arg) in args.into_iter().map(Into::into).enumerate() {
        if position == 0 || passthrough {
            out.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some("--") => {
                passthrough = true;
                None
            }
            Some(text) if is_single_dash_flag(text) => {
                Some(OsString::from(format!("-{}", text)))
            }
            _ => None,
        };
        out.push(rewritten.unwrap_or(arg));
    }

    out
}

fn is_single_dash_flag(arg: &str) -> bool {
    match arg.strip_prefix('-') {
        Some(rest) if !rest.starts_with('-') => {
            let name = rest.split('=').next().unwrap_or(rest);
            FLAG_NAMES.contains(&name)
        }
        _ => false,
    }
}
