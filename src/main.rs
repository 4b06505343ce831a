use anyhow::{Context, Result};
use argh::FromArgs;
use quiz_shell::{Catalog, EditorSource, LineSource, ScriptSource, Session, Shell};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(FromArgs)]
/// Arithmetic quiz shell. Reads commands from the terminal, or from a script file when one is given.
struct Cli {
    #[argh(option)]
    /// file with message templates replacing the built-in ones
    messages: Option<PathBuf>,

    #[argh(positional, greedy)]
    /// script file to run instead of reading the terminal
    scripts: Vec<String>,
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so they never mix with the shell transcript (respects RUST_LOG)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (program, rest) = match args.split_first() {
        Some((program, rest)) => (program.as_str(), rest),
        None => ("quiz_shell", &[][..]),
    };
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    let cli = match Cli::from_args(&[program], &rest) {
        Ok(cli) => cli,
        Err(early) if early.status.is_ok() => {
            println!("{}", early.output);
            return Ok(ExitCode::SUCCESS);
        }
        Err(early) => {
            tracing::debug!(output = %early.output, "bad command line");
            println!("{}", Catalog::default().format("usage-start", &[]));
            return Ok(ExitCode::FAILURE);
        }
    };

    let catalog = match &cli.messages {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("can't read messages from {}", path.display()))?,
        None => Catalog::default(),
    };

    let input: Box<dyn LineSource> = match cli.scripts.as_slice() {
        [] => Box::new(
            EditorSource::new().map_err(|e| anyhow::anyhow!("can't open the terminal: {}", e))?,
        ),
        [script] => {
            let path = std::path::absolute(script)
                .with_context(|| format!("can't resolve {}", script))?;
            if !path.exists() {
                println!("{}", catalog.format("file-not-exist", &[&path.display()]));
                return Ok(ExitCode::FAILURE);
            }
            Box::new(
                ScriptSource::open(&path)
                    .with_context(|| format!("can't open {}", path.display()))?,
            )
        }
        _ => {
            println!("{}", catalog.format("usage-start", &[]));
            return Ok(ExitCode::FAILURE);
        }
    };

    let session = Session::new(input, Box::new(std::io::stdout()), catalog);
    Shell::with_defaults(session).run();
    Ok(ExitCode::SUCCESS)
}
