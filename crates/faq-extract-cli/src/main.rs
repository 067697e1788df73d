use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use faq_extract::{
    load_document, render_json, write_json, DocumentSource, FaqParser, HeadingPolicy,
    OverrideTable, ParsedFaq, STRICT_TITLE_PATTERN,
};
use faq_extract_config::{Config, LoadOptions};
use std::{
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FAQ_EXTRACT_LOG";

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Markdown file to parse instead of the embedded FAQ ('-' reads stdin)
    #[arg(short, long, value_name = "FILE", allow_hyphen_values = true)]
    input: Option<PathBuf>,

    /// Where to write the JSON ('-' writes to stdout)
    #[arg(short, long, value_name = "PATH", allow_hyphen_values = true)]
    output: Option<PathBuf>,

    /// Configuration file applied over .faq-extract.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Reject section titles containing periods
    #[arg(long)]
    strict_headings: bool,

    /// Do not replace any answers
    #[arg(long)]
    no_overrides: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut options = LoadOptions::default();
    if let Some(path) = &cli.config {
        options = options.with_override_path(path);
    }
    let config = Config::load(options).context("Unable to load configuration")?;

    let source = cli
        .input
        .clone()
        .map(DocumentSource::from_arg)
        .unwrap_or_default();
    let contents = load_document(&source)
        .with_context(|| format!("Unable to read document: {}", source.describe()))?;

    let parsed = build_parser(&cli, &config)?.parse(&contents);
    report(&parsed, &source);

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| config.output.path.clone());
    emit(&output, &parsed)
}

/// `--strict-headings` swaps the title class but keeps the configured level.
fn build_parser(cli: &Cli, config: &Config) -> Result<FaqParser> {
    let policy = if cli.strict_headings {
        HeadingPolicy::new(config.headings.level(), STRICT_TITLE_PATTERN)
            .context("Unable to build strict heading policy")?
    } else {
        config.headings.policy().clone()
    };

    let overrides = if cli.no_overrides {
        OverrideTable::new()
    } else {
        config.overrides.table()
    };

    Ok(FaqParser::new(policy, overrides))
}

fn report(parsed: &ParsedFaq, source: &DocumentSource) {
    for skipped in &parsed.skipped {
        info!(
            line = skipped.line,
            title = %skipped.title,
            "section dropped: heading title not accepted"
        );
    }

    let questions: usize = parsed.sections.iter().map(|s| s.questions.len()).sum();
    debug!(
        source = %source.describe(),
        sections = parsed.sections.len(),
        questions,
        overridden = parsed.overridden,
        "parsed document"
    );
}

fn emit(output: &Path, parsed: &ParsedFaq) -> Result<()> {
    if output == Path::new("-") {
        let rendered = render_json(&parsed.sections)?;
        return print_json(&rendered);
    }

    write_json(output, &parsed.sections)
        .with_context(|| format!("Unable to write output: {}", output.display()))?;
    info!(
        path = %output.display(),
        sections = parsed.sections.len(),
        "wrote FAQ JSON"
    );
    Ok(())
}

fn print_json(rendered: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match writeln!(handle, "{rendered}") {
        Ok(_) => {}
        Err(err) if should_ignore_pipe_error(&err) => return Ok(()),
        Err(err) => return Err(err).context("Failed to print JSON"),
    }

    match handle.flush() {
        Ok(_) => Ok(()),
        Err(err) if should_ignore_pipe_error(&err) => Ok(()),
        Err(err) => Err(err).context("Failed to flush stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}

fn verbosity_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// `FAQ_EXTRACT_LOG` takes precedence over the verbosity flags.
fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init();
}
