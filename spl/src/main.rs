use clap::{Args, Parser, Subcommand};
use miette::{Diagnostic, IntoDiagnostic, MietteHandlerOpts, NamedSource, Report, Result};
use spl_interpreter::{TraceOptions, compile_to_source, compile_to_trace_with};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod repl;
mod sexpr;

#[derive(Parser)]
#[command(
    name = "spl",
    version,
    about = "Trace and translate SPL pseudocode",
    long_about = "SPL is a plain-English pseudocode for teaching algorithms. \
                  Programs run into a JSON trace of action frames that a visualiser can replay step by step."
)]
struct Cli {
    /// Log pipeline stages to stderr (SPL_LOG overrides the level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an SPL program and print its action frames as JSON
    Trace {
        /// SPL source file (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        trace: TraceArgs,

        /// Indent the JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Translate an SPL program to JavaScript
    Emit {
        /// SPL source file (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the token stream of an SPL program (debug only)
    Tokens {
        /// SPL source file (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse an SPL program and print its AST as an s-expression (debug only)
    Ast {
        /// SPL source file (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the full Rust debug structure instead
        #[arg(short, long)]
        debug: bool,
    },

    /// Start an interactive session
    Repl {
        #[command(flatten)]
        trace: TraceArgs,

        /// Print frames as JSON instead of descriptions
        #[arg(long)]
        json: bool,

        /// Don't read or write the history file
        #[arg(long)]
        no_history: bool,
    },
}

#[derive(Args, Debug, Clone)]
struct TraceArgs {
    /// Write 0 instead of the current time into every frame
    #[arg(long)]
    no_timestamps: bool,

    /// Stop with an error after recording this many frames
    #[arg(long, value_name = "N")]
    max_frames: Option<usize>,

    /// Deepest allowed nesting of function calls [default: 100]
    #[arg(long, value_name = "N")]
    max_call_depth: Option<usize>,
}

impl TraceArgs {
    fn options(&self) -> TraceOptions {
        let mut options = TraceOptions {
            max_frames: self.max_frames,
            timestamps: !self.no_timestamps,
            ..TraceOptions::default()
        };
        if let Some(depth) = self.max_call_depth {
            options.max_call_depth = depth;
        }
        options
    }
}

fn main() {
    setup_miette_handler();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Some(Commands::Trace {
            file,
            trace,
            pretty,
        }) => handle_trace_command(&file, &trace, pretty),
        Some(Commands::Emit { file }) => handle_emit_command(&file),
        Some(Commands::Tokens { file }) => handle_tokens_command(&file),
        Some(Commands::Ast { file, debug }) => handle_ast_command(&file, debug),
        Some(Commands::Repl {
            trace,
            json,
            no_history,
        }) => handle_repl_command(&trace, json, no_history),
        None => {
            // No subcommand provided, show help
            Cli::parse_from(["spl", "--help"]);
            Ok(())
        }
    };

    if let Err(report) = result {
        eprintln!("{report:?}");
        process::exit(1);
    }
}

fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .color(true)
                .tab_width(4)
                .with_cause_chain()
                .build(),
        )
    }))
    .ok();
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SPL_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read a source file, or stdin for `-`, returning the text and a display name
fn read_source(file_path: &Path) -> Result<(String, String)> {
    let (source, name) = if file_path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).into_diagnostic()?;
        (buffer, "<stdin>".to_string())
    } else {
        if !file_path.exists() {
            return Err(miette::miette!("File not found: {}", file_path.display()));
        }
        let source = fs::read_to_string(file_path).into_diagnostic()?;
        (source, file_path.display().to_string())
    };

    debug!(file = %name, bytes = source.len(), "read SPL source");
    Ok((source, name))
}

/// Attach the program text so labelled spans render against it
fn with_source<E>(error: E, name: &str, source: &str) -> Report
where
    E: Diagnostic + Send + Sync + 'static,
{
    Report::new(error).with_source_code(NamedSource::new(name, source.to_string()))
}

fn handle_trace_command(file_path: &Path, trace: &TraceArgs, pretty: bool) -> Result<()> {
    let (source, name) = read_source(file_path)?;
    let frames = compile_to_trace_with(&source, &trace.options())
        .map_err(|error| with_source(error, &name, &source))?;

    let json = if pretty {
        serde_json::to_string_pretty(&frames)
    } else {
        serde_json::to_string(&frames)
    }
    .into_diagnostic()?;

    println!("{json}");
    Ok(())
}

fn handle_emit_command(file_path: &Path) -> Result<()> {
    let (source, name) = read_source(file_path)?;
    let code = compile_to_source(&source).map_err(|error| with_source(error, &name, &source))?;
    print!("{code}");
    Ok(())
}

fn handle_tokens_command(file_path: &Path) -> Result<()> {
    let (source, name) = read_source(file_path)?;
    let tokens =
        spl_parser::tokenize(&source).map_err(|error| with_source(error, &name, &source))?;

    for token in &tokens {
        println!("{token}");
    }
    Ok(())
}

fn handle_ast_command(file_path: &Path, debug: bool) -> Result<()> {
    let (source, name) = read_source(file_path)?;
    let ast =
        spl_parser::parse_program(&source).map_err(|error| with_source(error, &name, &source))?;

    if debug {
        println!("{ast:#?}");
    } else {
        println!("{}", sexpr::format_program_as_sexpr(&ast));
    }
    Ok(())
}

fn handle_repl_command(trace: &TraceArgs, json: bool, no_history: bool) -> Result<()> {
    let config = repl::ReplConfig {
        json,
        trace_options: trace.options(),
        persist_history: !no_history,
        ..Default::default()
    };

    let mut session = repl::ReplSession::with_config(config)?;
    session.run()?;
    Ok(())
}
