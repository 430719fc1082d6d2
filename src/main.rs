use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sqlish::{DisplayFragment, DisplayKind, FormatterOutput, OutputKind, SqlishFormatter};

/// sqlish - tidy up and highlight SQL captured from traces.
#[derive(Parser, Debug)]
#[command(name = "sqlish", version, about)]
struct Cli {
    /// Files to format. Use "-" to read from stdin.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format.
    #[arg(short = 'f', long, value_enum, default_value_t = Format::String)]
    format: Format,

    /// SQL dialect: polyglot, postgres, mysql, sqlserver.
    #[arg(short = 'd', long)]
    dialect: Option<String>,

    /// Maximum parenthesis nesting before falling back to the raw input.
    #[arg(long)]
    max_nesting_depth: Option<usize>,

    /// Maximum token count before falling back to the raw input.
    #[arg(long)]
    max_token_count: Option<usize>,

    /// Path to config file (sqlish.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// When to color markup output.
    #[arg(long, value_enum, default_value_t = ColorArg::Auto)]
    color: ColorArg,

    /// Number of threads for parallel processing (0 = all cores).
    #[arg(short = 't', long, default_value_t = 0)]
    threads: usize,

    /// Quiet output (errors only).
    #[arg(short, long)]
    quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// Normalized SQL string.
    String,
    /// Syntax-highlighted SQL.
    Markup,
    /// One `Kind<TAB>text` line per display fragment.
    Fragments,
}

impl Format {
    fn output_kind(self) -> OutputKind {
        match self {
            Format::String => OutputKind::String,
            Format::Markup | Format::Fragments => OutputKind::Markup,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ColorArg {
    Auto,
    Always,
    Never,
}

impl ColorArg {
    fn choice(self) -> ColorChoice {
        match self {
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
            ColorArg::Auto if io::stdout().is_terminal() => ColorChoice::Auto,
            ColorArg::Auto => ColorChoice::Never,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sqlish=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = sqlish::load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dialect) = cli.dialect {
        config.dialect = dialect;
    }
    if let Some(depth) = cli.max_nesting_depth {
        config.max_nesting_depth = depth;
    }
    if let Some(count) = cli.max_token_count {
        config.max_token_count = count;
    }
    let formatter = SqlishFormatter::from_config(&config)?;

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("configuring thread pool")?;
    }

    let mut stdout = StandardStream::stdout(cli.color.choice());
    let is_stdin = cli.files.len() == 1 && cli.files[0].to_string_lossy() == "-";

    if is_stdin {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("reading stdin")?;
        let output = formatter.to_format(&source, cli.format.output_kind());
        emit(&mut stdout, &output, cli.format)?;
        return Ok(ExitCode::SUCCESS);
    }

    let report = sqlish::format_files(&cli.files, cli.format.output_kind(), &formatter);
    let with_headers = report.total() > 1;
    for result in &report.results {
        if let Some(output) = &result.output {
            if with_headers {
                writeln!(stdout, "-- {}", result.path.display())?;
            }
            emit(&mut stdout, output, cli.format)?;
        }
    }
    stdout.flush()?;

    if !cli.quiet {
        eprintln!("{}", report.summary());
    }
    report.print_errors();

    Ok(if report.has_errors() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

fn emit(out: &mut StandardStream, output: &FormatterOutput, format: Format) -> io::Result<()> {
    match output {
        FormatterOutput::String(s) => writeln!(out, "{}", s),
        FormatterOutput::Markup(fragments) if format == Format::Fragments => {
            for fragment in fragments {
                writeln!(out, "{}\t{:?}", fragment.kind, fragment.text.as_str())?;
            }
            Ok(())
        }
        FormatterOutput::Markup(fragments) => {
            render_markup(out, fragments)?;
            writeln!(out)
        }
    }
}

fn render_markup(out: &mut StandardStream, fragments: &[DisplayFragment]) -> io::Result<()> {
    for fragment in fragments {
        match style(fragment.kind) {
            Some(spec) => {
                out.set_color(&spec)?;
                write!(out, "{}", fragment.text)?;
                out.reset()?;
            }
            None => write!(out, "{}", fragment.text)?,
        }
    }
    Ok(())
}

fn style(kind: DisplayKind) -> Option<ColorSpec> {
    let mut spec = ColorSpec::new();
    match kind {
        DisplayKind::Keyword => spec.set_fg(Some(Color::Blue)).set_bold(true),
        DisplayKind::String => spec.set_fg(Some(Color::Green)),
        DisplayKind::Number => spec.set_fg(Some(Color::Cyan)),
        DisplayKind::Operator => spec.set_fg(Some(Color::Yellow)),
        DisplayKind::Identifier | DisplayKind::Generic => return None,
    };
    Some(spec)
}
