use log::{debug, info, warn};
use serde::Deserialize;

use crate::config::Config;
use crate::error::Error;
use crate::markup::markdown_to_html;
use crate::runner::{CommandRunner, ProcessRunner};
use crate::script::NoteScript;

fn default_convert() -> bool {
    true
}

/// Arguments of the `create_note` tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NoteRequest {
    pub title: String,
    #[serde(rename = "content")]
    pub body: String,
    #[serde(rename = "convert_markdown", default = "default_convert")]
    pub convert_markdown: bool,
}

impl NoteRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), body: body.into(), convert_markdown: true }
    }

    pub fn raw(mut self) -> Self {
        self.convert_markdown = false;
        self
    }
}

/// Body as it will be stored: optionally converted to HTML, then the tag
/// on its own after a blank line. The tag is appended either way.
pub fn render_body(request: &NoteRequest, tag: &str) -> Result<String, Error> {
    let body = if request.convert_markdown {
        markdown_to_html(&request.body)?
    } else {
        request.body.clone()
    };
    Ok(format!("{body}\n\n{tag}"))
}

/// Creates notes through the configured AppleScript interpreter.
pub struct NoteCreator<R: CommandRunner = ProcessRunner> {
    config: Config,
    runner: R,
}

impl NoteCreator<ProcessRunner> {
    pub fn new(config: Config) -> Self {
        Self { config, runner: ProcessRunner }
    }
}

impl<R: CommandRunner> NoteCreator<R> {
    pub fn with_runner(config: Config, runner: R) -> Self {
        Self { config, runner }
    }

    /// The script that [`NoteCreator::create`] would run for `request`.
    pub fn script(&self, request: &NoteRequest) -> Result<String, Error> {
        let body = render_body(request, &self.config.tag)?;
        Ok(NoteScript::new(&self.config.account, &request.title, &body)
            .render())
    }

    /// Build and run the script once. A non-zero exit is reported with the
    /// interpreter's stderr; nothing is retried.
    pub fn create(&self, request: &NoteRequest) -> Result<(), Error> {
        let script = self.script(request)?;
        let program = self.config.interpreter.as_str();
        debug!("running {program} for note {:?}", request.title);

        let output =
            self.runner.run(program, &["-e", &script]).map_err(|source| {
                Error::Launch { program: program.to_string(), source }
            })?;

        if !output.success() {
            warn!(
                "{program} exited with {:?}: {}",
                output.code,
                output.stderr.trim_end()
            );
            return Err(Error::Automation {
                code: output.code,
                stderr: output.stderr,
            });
        }
        info!("created note {:?} in account {}", request.title, self.config.account);
        Ok(())
    }
}
