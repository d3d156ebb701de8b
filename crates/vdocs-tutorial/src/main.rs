#![forbid(unsafe_code)]

//! Tutorial runner binary entry point.

use std::io;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::process;

use tracing::error;
use tracing_subscriber::EnvFilter;
use vdocs_reactive::panic_message;
use vdocs_tutorial::{TutorialContext, cli, run_all};

const DEFAULT_LOG_FILTER: &str = "warn";

fn init_logging(explicit: Option<&str>) {
    let filter = match explicit {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|err| {
            eprintln!("Invalid --log filter {directives:?}: {err}");
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let opts = cli::Opts::parse();
    init_logging(opts.log.as_deref());

    let ctx = match TutorialContext::builtin(opts.locale.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Failed to load tutorial strings: {e}");
            process::exit(1);
        }
    };

    let result = catch_unwind(AssertUnwindSafe(|| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        run_all(&opts.examples, &ctx, opts.json, &mut out)
    }));
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            eprintln!("Output error: {e}");
            process::exit(1);
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            error!(panic = %msg, "example panicked");
            eprintln!("Example panicked: {msg}");
            process::exit(101);
        }
    }
}
