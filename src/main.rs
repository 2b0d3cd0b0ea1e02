//! `notes_saver` binary. Runs the MCP server by default; see `help` for the
//! one-shot commands.

fn main() {
    if let Err(err) = notes_saver::entry() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
