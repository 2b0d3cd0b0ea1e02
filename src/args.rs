use std::error::Error;

pub struct ArgParser {
    iter: std::vec::IntoIter<String>,
    command_name: String,
}

impl ArgParser {
    pub fn new(args: Vec<String>, command_name: &str) -> Self {
        Self { iter: args.into_iter(), command_name: command_name.to_string() }
    }

    /// Extract a string value for a flag
    pub fn extract_value(
        &mut self,
        flag: &str,
    ) -> Result<String, Box<dyn Error>> {
        self.iter.next().ok_or_else(|| {
            format!("Provide a value after {} for {}", flag, self.command_name)
                .into()
        })
    }

    /// Get next positional argument
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.iter.next()
    }
}

/// Arguments for `save`
#[derive(Debug, Default, PartialEq)]
pub struct SaveArgs {
    pub filename: Option<String>,
    pub content: String,
}

/// Arguments for `note`
#[derive(Debug, Default, PartialEq)]
pub struct NoteArgs {
    pub title: String,
    pub body: String,
    pub raw: bool,
}

pub fn parse_save_args(args: Vec<String>) -> Result<SaveArgs, Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "save");
    let mut parsed = SaveArgs::default();
    let mut words = Vec::new();
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "-f" | "--filename" => {
                parsed.filename = Some(parser.extract_value(&arg)?);
            }
            _ => words.push(arg),
        }
    }
    if words.is_empty() {
        return Err("Provide the content to save, e.g. `notes_saver save \"text\"`".into());
    }
    parsed.content = words.join(" ");
    Ok(parsed)
}

pub fn parse_note_args(args: Vec<String>) -> Result<NoteArgs, Box<dyn Error>> {
    let mut parser = ArgParser::new(args, "note");
    let mut parsed = NoteArgs::default();
    let mut words = Vec::new();
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "--raw" => parsed.raw = true,
            _ => words.push(arg),
        }
    }
    let mut words = words.into_iter();
    parsed.title = words
        .next()
        .ok_or("Usage: notes_saver note <title> [body...] [--raw]")?;
    parsed.body = words.collect::<Vec<_>>().join(" ");
    Ok(parsed)
}
