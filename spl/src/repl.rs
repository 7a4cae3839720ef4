//! Interactive SPL session
//!
//! SPL programs are block-structured, so the REPL collects lines into a
//! program buffer instead of evaluating each one. `/run` traces the whole
//! buffer from a fresh environment and prints one line per action frame;
//! `/emit` shows the JavaScript translation. Line editing and history come
//! from rustyline.

use miette::Diagnostic;
use rustyline::{DefaultEditor, error::ReadlineError};
use spl_interpreter::{
    ActionFrame, CompileError, TraceOptions, compile_to_source, compile_to_trace_with,
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ReplError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Compile(#[from] CompileError),

    #[error("Readline error: {source}")]
    Readline {
        #[from]
        source: ReadlineError,
    },

    #[error("REPL command error: {message}")]
    Command { message: String },
}

pub struct ReplSession {
    editor: DefaultEditor,

    /// Program lines entered so far, in order
    buffer: Vec<String>,

    config: ReplConfig,

    stats: ReplStats,
}

#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Print frames as JSON instead of one description per line
    pub json: bool,

    /// Limits and timestamp setting for every `/run`
    pub trace_options: TraceOptions,

    pub prompt: String,

    pub persist_history: bool,

    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            json: false,
            trace_options: TraceOptions::default(),
            prompt: "spl> ".to_string(),
            persist_history: true,
            history_file: Some(".spl_history".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReplStats {
    pub lines_entered: usize,
    pub programs_run: usize,
    pub errors_encountered: usize,
    pub commands_executed: usize,
}

/// Result of handling one line of input
#[derive(Debug)]
pub enum ReplResult {
    /// The line was added to the program buffer
    Buffered { line: usize },

    Trace { frames: Vec<ActionFrame> },

    Source { code: String },

    Command { message: String },

    Empty,

    Exit,
}

impl ReplSession {
    pub fn new() -> Result<Self, ReplError> {
        Self::with_config(ReplConfig::default())
    }

    pub fn with_config(config: ReplConfig) -> Result<Self, ReplError> {
        let mut editor = DefaultEditor::new()?;

        if config.persist_history {
            if let Some(ref history_file) = config.history_file {
                // Missing on first use
                let _ = editor.load_history(history_file);
            }
        }

        Ok(Self {
            editor,
            buffer: Vec::new(),
            config,
            stats: ReplStats::default(),
        })
    }

    pub fn run(&mut self) -> Result<(), ReplError> {
        self.print_welcome();

        while let Some(line) = self.read_line()? {
            match self.evaluate_line(&line) {
                Ok(ReplResult::Exit) => break,
                Ok(result) => self.display_result(result),
                Err(error) => {
                    self.stats.errors_encountered += 1;
                    self.display_error(error);
                }
            }
        }

        self.save_history()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>, ReplError> {
        let prompt = if self.buffer.is_empty() {
            self.config.prompt.clone()
        } else {
            format!("{:>3}> ", self.buffer.len() + 1)
        };

        match self.editor.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                Ok(Some(String::new()))
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(ReplError::Readline { source: err }),
        }
    }

    pub fn evaluate_line(&mut self, line: &str) -> Result<ReplResult, ReplError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(ReplResult::Empty);
        }
        if trimmed.starts_with('/') {
            return self.execute_command(trimmed);
        }

        self.stats.lines_entered += 1;
        self.buffer.push(line.trim_end().to_string());
        Ok(ReplResult::Buffered {
            line: self.buffer.len(),
        })
    }

    /// The buffered program as one source text
    pub fn source(&self) -> String {
        self.buffer.join("\n")
    }

    fn execute_command(&mut self, command: &str) -> Result<ReplResult, ReplError> {
        self.stats.commands_executed += 1;

        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(ReplResult::Empty);
        }

        match parts[0] {
            "/help" | "/h" => Ok(ReplResult::Command {
                message: self.help_message(),
            }),

            "/run" | "/r" => {
                if self.buffer.is_empty() {
                    return Ok(ReplResult::Command {
                        message: "Nothing to run yet".to_string(),
                    });
                }
                let frames = compile_to_trace_with(&self.source(), &self.config.trace_options)?;
                self.stats.programs_run += 1;
                Ok(ReplResult::Trace { frames })
            }

            "/emit" => Ok(ReplResult::Source {
                code: compile_to_source(&self.source())?,
            }),

            "/show" | "/list" => Ok(ReplResult::Command {
                message: self.format_buffer(),
            }),

            "/undo" => match self.buffer.pop() {
                Some(line) => Ok(ReplResult::Command {
                    message: format!("Removed line {}: {line}", self.buffer.len() + 1),
                }),
                None => Ok(ReplResult::Command {
                    message: "Program is empty".to_string(),
                }),
            },

            "/clear" => {
                self.buffer.clear();
                Ok(ReplResult::Command {
                    message: "Program cleared".to_string(),
                })
            }

            "/json" => match parts.get(1) {
                Some(&"on") => {
                    self.config.json = true;
                    Ok(ReplResult::Command {
                        message: "JSON output enabled".to_string(),
                    })
                }
                Some(&"off") => {
                    self.config.json = false;
                    Ok(ReplResult::Command {
                        message: "JSON output disabled".to_string(),
                    })
                }
                _ => Ok(ReplResult::Command {
                    message: format!(
                        "JSON output is {}",
                        if self.config.json { "on" } else { "off" }
                    ),
                }),
            },

            "/stats" => Ok(ReplResult::Command {
                message: self.format_stats(),
            }),

            "/config" => Ok(ReplResult::Command {
                message: self.format_config(),
            }),

            "/quit" | "/q" | "/exit" => Ok(ReplResult::Exit),

            unknown => Err(ReplError::Command {
                message: format!("Unknown command: {unknown}. Type /help for available commands."),
            }),
        }
    }

    fn display_result(&self, result: ReplResult) {
        match result {
            ReplResult::Trace { frames } => {
                if self.config.json {
                    match serde_json::to_string_pretty(&frames) {
                        Ok(json) => println!("{json}"),
                        Err(error) => eprintln!("Error: {error}"),
                    }
                } else {
                    for frame in &frames {
                        println!("{}", format_frame(frame));
                    }
                }
            }
            ReplResult::Source { code } => print!("{code}"),
            ReplResult::Command { message } => println!("{message}"),
            ReplResult::Buffered { .. } | ReplResult::Empty | ReplResult::Exit => {}
        }
    }

    fn display_error(&self, error: ReplError) {
        match error {
            ReplError::Compile(source) => {
                let named_source = miette::NamedSource::new("<repl>", self.source());
                let report = miette::Report::new(source).with_source_code(named_source);
                eprintln!("{report:?}");
            }
            error => eprintln!("{:?}", miette::Report::new(error)),
        }
    }

    fn print_welcome(&self) {
        println!("SPL REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Enter a program line by line, then /run it. /help lists commands.");
        println!();
    }

    fn save_history(&mut self) -> Result<(), ReplError> {
        if self.config.persist_history {
            if let Some(ref history_file) = self.config.history_file {
                self.editor.save_history(history_file)?;
            }
        }
        Ok(())
    }

    fn help_message(&self) -> String {
        r#"SPL REPL Commands:
  /run, /r            Trace the program and print its action frames
  /emit               Show the program translated to JavaScript
  /show, /list        List the program with line numbers
  /undo               Remove the last line
  /clear              Start a new program
  /json [on|off]      Print frames as JSON
  /stats              Show session statistics
  /config             Show current configuration
  /quit, /q, /exit    Exit the REPL

Any other input is appended to the program:
  set x to 10
  if x > 5 then
    print "big"
  end if
  /run

Use Ctrl+C to discard the current line, Ctrl+D to exit."#
            .to_string()
    }

    fn format_buffer(&self) -> String {
        if self.buffer.is_empty() {
            return "Program is empty".to_string();
        }
        self.buffer
            .iter()
            .enumerate()
            .map(|(index, line)| format!("{:>4} | {line}", index + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_stats(&self) -> String {
        format!(
            r#"Session Statistics:
  Lines entered: {}
  Programs run: {}
  Errors encountered: {}
  Commands executed: {}"#,
            self.stats.lines_entered,
            self.stats.programs_run,
            self.stats.errors_encountered,
            self.stats.commands_executed
        )
    }

    fn format_config(&self) -> String {
        let options = &self.config.trace_options;
        format!(
            r#"REPL Configuration:
  JSON output: {}
  Max call depth: {}
  Max frames: {}
  Timestamps: {}
  Prompt: "{}"
  Persist history: {}
  History file: {}"#,
            self.config.json,
            options.max_call_depth,
            options
                .max_frames
                .map_or_else(|| "unlimited".to_string(), |limit| limit.to_string()),
            options.timestamps,
            self.config.prompt,
            self.config.persist_history,
            self.config.history_file.as_deref().unwrap_or("<none>")
        )
    }
}

/// One frame as `line | description`; closing frames leave the line blank
fn format_frame(frame: &ActionFrame) -> String {
    let line = frame.line.map(|line| line.to_string()).unwrap_or_default();
    format!("{line:>4} | {}", frame.description)
}
