//! Command-line front end.
//!
//! Formatted text goes to stdout (or the `-o` path); diagnostics and logs go
//! to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use indentphp::{
    decode, dump_ast, dump_tokens, encode, format_source, write_formatted, FormatError,
    FormatOptions,
};
use miette::{NamedSource, Report};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "indentphp", version)]
#[command(about = "Reformat PHP embedded in HTML into one canonical indentation style")]
struct Args {
    /// PHP file to format
    path: PathBuf,

    /// Print the raw token stream instead of formatting
    #[arg(long, conflicts_with = "ast")]
    tokens: bool,

    /// Print the parsed tree as JSON instead of formatting
    #[arg(long)]
    ast: bool,

    /// Spaces per indentation level
    #[arg(long, value_name = "N", default_value_t = 4, conflicts_with = "tabs")]
    indent_width: usize,

    /// Indent with one tab per level
    #[arg(long)]
    tabs: bool,

    /// Write the formatted file here instead of to stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> FormatOptions {
        if self.tabs {
            FormatOptions::tabs()
        } else {
            FormatOptions::spaces(self.indent_width)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let bytes = match std::fs::read(&args.path) {
        Ok(bytes) => bytes,
        Err(source) => {
            return fail(FormatError::Io {
                path: args.path.clone(),
                source,
            })
        }
    };
    if bytes.is_empty() {
        return fail(FormatError::EmptyInput);
    }
    let (source, encoding) = decode(&bytes);

    if args.tokens {
        return emit(dump_tokens(&source).as_bytes());
    }

    let result = if args.ast {
        dump_ast(&source).map(String::into_bytes)
    } else if let Some(output) = &args.output {
        // Nothing goes to stdout when writing to a file.
        write_formatted(&bytes, output, &args.options()).map(|()| Vec::new())
    } else {
        format_source(&source, &args.options()).map(|out| encode(&out, encoding))
    };

    match result {
        Ok(out) => emit(&out),
        Err(FormatError::Syntax(err)) => {
            let report = Report::new(err).with_source_code(named_source(&args.path, source));
            eprintln!("{report:?}");
            ExitCode::from(2)
        }
        Err(err) => fail(err),
    }
}

fn named_source(path: &Path, source: String) -> NamedSource<String> {
    NamedSource::new(path.display().to_string(), source)
}

fn emit(out: &[u8]) -> ExitCode {
    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(out).and_then(|()| stdout.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("cannot write to stdout: {err}");
            ExitCode::FAILURE
        }
    }
}

fn fail(err: FormatError) -> ExitCode {
    eprintln!("{:?}", Report::new(err));
    ExitCode::FAILURE
}
