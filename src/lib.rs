use std::env;
use std::error::Error;
use std::io;

pub mod args;
pub mod config;
pub mod error;
pub mod escape;
pub mod formatting;
pub mod markup;
pub mod notes;
pub mod runner;
pub mod script;
pub mod server;
pub mod storage;

pub use config::Config;
pub use error::{ErrorKind, ToolOutcome};
pub use notes::{NoteCreator, NoteRequest};
pub use server::Server;
pub use storage::{MarkdownStore, SaveRequest};

use formatting::FormatContext;

pub fn entry() -> Result<(), Box<dyn Error>> {
    init_logging();
    let mut args: Vec<String> = env::args().skip(1).collect();
    let cmd = if args.is_empty() { "serve".to_string() } else { args.remove(0) };
    let config = Config::from_env();
    log::debug!("config: {config:?}");

    match cmd.as_str() {
        "serve" => serve(config)?,
        "save" => save(args, config)?,
        "note" => note(args, config)?,
        "render" => render(args)?,
        "path" => println!("{}", config.records_dir.display()),
        "help" | "--help" | "-h" => print_help(),
        other => {
            eprintln!("Unknown command: {other}");
            print_help();
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries protocol traffic in `serve`.
fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .target(env_logger::Target::Stderr)
    .try_init();
}

fn print_help() {
    println!(
        "\
Notes Saver
Usage:
  notes_saver [serve]                       Run the MCP server on stdin/stdout (default)
  notes_saver save <content...> [-f|--filename <name>]
                                            Save content as a markdown file
  notes_saver note <title> [body...] [--raw]
                                            Create an Apple Notes note (markdown converted unless --raw)
  notes_saver render <markdown...>          Print the HTML a note body would get
  notes_saver path                          Show the markdown directory
  notes_saver help                          Show this message

Environment:
  NOTES_SAVER_DIR                           Markdown directory (default: markdown-notes)
  NOTES_SAVER_ACCOUNT                       Notes account (default: iCloud)
  NOTES_SAVER_OSASCRIPT                     AppleScript interpreter (default: osascript)
  RUST_LOG                                  Log level for stderr logging (default: warn)
"
    );
}

fn serve(config: Config) -> Result<(), Box<dyn Error>> {
    let server = Server::new(config);
    let stdin = io::stdin();
    server.serve(stdin.lock(), io::stdout().lock())?;
    Ok(())
}

fn save(args: Vec<String>, config: Config) -> Result<(), Box<dyn Error>> {
    let parsed = args::parse_save_args(args)?;
    let server = Server::new(config);
    let outcome = server.save_to_markdown(&SaveRequest {
        content: parsed.content,
        filename: parsed.filename,
    });
    report(outcome)
}

fn note(args: Vec<String>, config: Config) -> Result<(), Box<dyn Error>> {
    let parsed = args::parse_note_args(args)?;
    let mut request = NoteRequest::new(parsed.title, parsed.body);
    if parsed.raw {
        request = request.raw();
    }
    let server = Server::new(config);
    report(server.create_note(&request))
}

fn render(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    if args.is_empty() {
        return Err("Provide markdown to render, e.g. `notes_saver render \"# Title\"`".into());
    }
    let html = markup::markdown_to_html(&args.join(" "))?;
    let ctx = FormatContext::from_env();
    println!("{}", ctx.format_muted(html.trim_end()));
    Ok(())
}

fn report(outcome: ToolOutcome) -> Result<(), Box<dyn Error>> {
    let ctx = FormatContext::from_env();
    if outcome.success {
        println!("{}", ctx.format_outcome(&outcome));
        Ok(())
    } else {
        Err(ctx.format_outcome(&outcome).into())
    }
}
