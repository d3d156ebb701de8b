#![forbid(unsafe_code)]

//! Command-line argument parsing for the tutorial runner.
//!
//! Arguments are parsed by hand. Every option also reads a
//! `VDOCS_TUTORIAL_*` environment variable; explicit flags win.

use std::env;
use std::process;

use crate::runner::ExampleKind;
use crate::strings::DEFAULT_LOCALE;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
vdocs-tutorial: run the guide's reactive examples

USAGE:
    vdocs-tutorial [OPTIONS]

OPTIONS:
    --example=NAME   Example to run (default: all)
    --locale=TAG     Locale for tutorial strings (default: pt-BR)
    --json           Print one JSON transcript per example
    --log=FILTER     tracing filter, e.g. debug or vdocs_reactive=trace
    --help, -h       Show this help message
    --version, -V    Show version

EXAMPLES:
    hello-world      Declarative rendering of one greeting
    handling-input   Message reversal and a prevented navigation
    todo-setup       Todo list, setup-function style
    todo-options     Todo list, options style
    all              Every example, in the order above

ENVIRONMENT VARIABLES:
    VDOCS_TUTORIAL_EXAMPLE   Same as --example
    VDOCS_TUTORIAL_LOCALE    Same as --locale
    VDOCS_TUTORIAL_JSON      Set to 1 or true for --json
    VDOCS_TUTORIAL_LOG       Same as --log (falls back to RUST_LOG)";

/// Parsed options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Examples to run, in order.
    pub examples: Vec<ExampleKind>,
    /// Locale tag for tutorial strings.
    pub locale: String,
    /// Emit JSON transcripts instead of text.
    pub json: bool,
    /// Explicit log filter (None = RUST_LOG or the default).
    pub log: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    UnknownArg(String),
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            examples: ExampleKind::ALL.to_vec(),
            locale: DEFAULT_LOCALE.into(),
            json: false,
            log: None,
        }
    }
}

fn is_truthy(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("vdocs-tutorial {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidValue { flag, value }) => {
                eprintln!("Invalid {flag} value: {value}");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = get_env("VDOCS_TUTORIAL_EXAMPLE")
            && let Some(examples) = ExampleKind::select(&val)
        {
            opts.examples = examples;
        }
        if let Some(val) = get_env("VDOCS_TUTORIAL_LOCALE")
            && !val.trim().is_empty()
        {
            opts.locale = val;
        }
        if let Some(val) = get_env("VDOCS_TUTORIAL_JSON") {
            opts.json = is_truthy(&val);
        }
        if let Some(val) = get_env("VDOCS_TUTORIAL_LOG")
            && !val.trim().is_empty()
        {
            opts.log = Some(val);
        }

        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Err(ParseError::Help),
                "--version" | "-V" => return Err(ParseError::Version),
                "--json" => opts.json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--example=") {
                        opts.examples =
                            ExampleKind::select(val).ok_or_else(|| ParseError::InvalidValue {
                                flag: "--example",
                                value: val.to_string(),
                            })?;
                    } else if let Some(val) = other.strip_prefix("--locale=") {
                        if val.trim().is_empty() {
                            return Err(ParseError::InvalidValue {
                                flag: "--locale",
                                value: val.to_string(),
                            });
                        }
                        opts.locale = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        if !val.trim().is_empty() {
                            opts.log = Some(val.to_string());
                        }
                    } else {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    }
                }
            }
        }

        Ok(opts)
    }
}
