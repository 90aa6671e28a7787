use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use sqlsplit::mode::Mode;
use sqlsplit::report::{FileStatus, Report};

/// sqlsplit - split multi-statement SQL scripts into individual statements.
/// Dialect-aware: PL/SQL blocks, T-SQL GO batches, PostgreSQL dollar quoting.
#[derive(Parser, Debug)]
#[command(name = "sqlsplit", version, about)]
struct Cli {
    /// Files or directories to split. Use "-" to read from stdin.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// SQL dialect: oracle, tsql, postgres. Defaults to the config file's
    /// dialect, or postgres.
    #[arg(short = 'd', long)]
    dialect: Option<String>,

    /// Strip the trailing semicolon from each statement.
    #[arg(long)]
    strip_semicolon: bool,

    /// Print per-file statement counts instead of the statements.
    #[arg(short = 'c', long)]
    count: bool,

    /// Only report whether every file splits cleanly.
    #[arg(long)]
    check: bool,

    /// Glob patterns to exclude.
    #[arg(long)]
    exclude: Vec<String>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long)]
    quiet: bool,

    /// Force color output.
    #[arg(long)]
    force_color: bool,

    /// Disable color output.
    #[arg(long)]
    no_color: bool,

    /// Path to config file (sqlsplit.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let is_stdin = cli.files.len() == 1 && cli.files[0].to_string_lossy() == "-";

    let base_mode = match sqlsplit::load_config(&cli.files, cli.config.as_deref()) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    let mode = Mode {
        dialect_name: cli.dialect.unwrap_or(base_mode.dialect_name),
        strip_trailing_semicolon: cli.strip_semicolon || base_mode.strip_trailing_semicolon,
        count: cli.count,
        check: cli.check,
        exclude: if cli.exclude.is_empty() {
            base_mode.exclude
        } else {
            cli.exclude
        },
        verbose: cli.verbose,
        quiet: cli.quiet,
        no_color: cli.no_color,
        force_color: cli.force_color,
    };

    if is_stdin {
        if let Err(e) = run_stdin(&mode) {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
        return;
    }

    let report = sqlsplit::run(&cli.files, &mode);

    if !mode.check {
        print_statements(&report, &mode);
    }

    if !mode.quiet {
        eprintln!("{}", report.summary());
    }

    report.print_errors(mode.color());

    if report.has_errors() {
        std::process::exit(2);
    }
}

fn run_stdin(mode: &Mode) -> anyhow::Result<()> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("failed to read stdin")?;

    let statements =
        sqlsplit::split_sql_script(&source, &mode.dialect_name, mode.strip_trailing_semicolon)?;

    if mode.count {
        println!("{}", statements.len());
    } else if !mode.check {
        for (i, statement) in statements.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("-- statement {}", i + 1);
            println!("{}", statement);
        }
    }
    Ok(())
}

fn print_statements(report: &Report, mode: &Mode) {
    for result in &report.results {
        if result.status != FileStatus::Split {
            continue;
        }
        if mode.count {
            println!(
                "{}: {} statement(s)",
                result.path.display(),
                result.statements.len()
            );
            continue;
        }
        if mode.verbose {
            eprintln!("splitting {}", result.path.display());
        }
        for (i, statement) in result.statements.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("-- statement {}", i + 1);
            println!("{}", statement);
        }
    }
}
