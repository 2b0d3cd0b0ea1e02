//! Minimal MCP server over stdio.
//!
//! One JSON-RPC 2.0 message per line on stdin, one response per line on
//! stdout. Requests are handled strictly in order, each one running to
//! completion before the next line is read. Notifications (messages without
//! an `id`) never get a reply.

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::error::ToolOutcome;
use crate::notes::{NoteCreator, NoteRequest};
use crate::runner::{CommandRunner, ProcessRunner};
use crate::storage::{MarkdownStore, SaveRequest};

pub const SERVER_NAME: &str = "notes-saver";
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Response {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self { jsonrpc: "2.0", id, result: Some(result), error: None }
    }

    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError { code, message: message.into() }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// The two tools plus everything they need.
pub struct Server<R: CommandRunner = ProcessRunner> {
    store: MarkdownStore,
    notes: NoteCreator<R>,
}

impl Server<ProcessRunner> {
    pub fn new(config: Config) -> Self {
        Self {
            store: MarkdownStore::new(config.records_dir.clone()),
            notes: NoteCreator::new(config),
        }
    }
}

impl<R: CommandRunner> Server<R> {
    pub fn with_runner(config: Config, runner: R) -> Self {
        Self {
            store: MarkdownStore::new(config.records_dir.clone()),
            notes: NoteCreator::with_runner(config, runner),
        }
    }

    /// Serve until `input` reaches end of file. A line that is not valid
    /// UTF-8 gets a parse error reply; only I/O failures end the loop.
    pub fn serve(
        &self,
        mut input: impl BufRead,
        mut output: impl Write,
    ) -> io::Result<()> {
        info!("{SERVER_NAME} listening on stdio");
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if let Some(response) = self.handle_bytes(&buf) {
                let text = serde_json::to_string(&response)
                    .map_err(io::Error::other)?;
                writeln!(output, "{text}")?;
                output.flush()?;
            }
        }
        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw frame, blank lines included.
    pub fn handle_bytes(&self, raw: &[u8]) -> Option<Response> {
        match std::str::from_utf8(raw) {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => self.handle_line(line),
            Err(err) => {
                warn!("message is not valid UTF-8: {err}");
                Some(Response::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {err}"),
                ))
            }
        }
    }

    /// Handle one message. `None` means nothing should be written back.
    pub fn handle_line(&self, line: &str) -> Option<Response> {
        let value = match serde_json::from_str::<Value>(line) {
            Ok(value) => value,
            Err(err) => {
                warn!("unparseable message: {err}");
                return Some(Response::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {err}"),
                ));
            }
        };
        let raw_id = value.get("id").cloned().unwrap_or(Value::Null);
        let request = match serde_json::from_value::<Request>(value) {
            Ok(request) => request,
            Err(err) => {
                warn!("malformed request: {err}");
                return Some(Response::error(
                    raw_id,
                    INVALID_REQUEST,
                    format!("Invalid Request: {err}"),
                ));
            }
        };
        let Some(id) = request.id.clone() else {
            debug!("notification {}", request.method);
            return None;
        };
        if request.jsonrpc != "2.0" {
            return Some(Response::error(id, INVALID_REQUEST, "Invalid Request"));
        }
        Some(self.dispatch(id, request))
    }

    fn dispatch(&self, id: Value, request: Request) -> Response {
        debug!("request {} ({id})", request.method);
        match request.method.as_str() {
            "initialize" => Response::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            ),
            "ping" => Response::success(id, json!({})),
            "tools/list" => {
                Response::success(id, json!({ "tools": tool_definitions() }))
            }
            "tools/call" => self.handle_tool_call(id, request.params),
            other => Response::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        }
    }

    fn handle_tool_call(&self, id: Value, params: Value) -> Response {
        let call: ToolCall = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(err) => {
                return Response::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid params: {err}"),
                );
            }
        };
        let outcome = match call.name.as_str() {
            "save_to_markdown" => {
                match serde_json::from_value::<SaveRequest>(call.arguments) {
                    Ok(req) => self.save_to_markdown(&req),
                    Err(err) => return invalid_arguments(id, &call.name, err),
                }
            }
            "create_note" => {
                match serde_json::from_value::<NoteRequest>(call.arguments) {
                    Ok(req) => self.create_note(&req),
                    Err(err) => return invalid_arguments(id, &call.name, err),
                }
            }
            other => {
                return Response::error(
                    id,
                    INVALID_PARAMS,
                    format!("Unknown tool: {other}"),
                );
            }
        };
        Response::success(
            id,
            json!({
                "content": [{ "type": "text", "text": outcome.message }],
                "isError": !outcome.success,
            }),
        )
    }

    pub fn save_to_markdown(&self, request: &SaveRequest) -> ToolOutcome {
        let result =
            self.store.save(&request.content, request.filename.as_deref());
        if let Err(err) = &result {
            error!("save_to_markdown failed ({:?}): {err}", err.kind());
        }
        ToolOutcome::from_save(result)
    }

    pub fn create_note(&self, request: &NoteRequest) -> ToolOutcome {
        let result = self.notes.create(request);
        if let Err(err) = &result {
            error!("create_note failed ({:?}): {err}", err.kind());
        }
        ToolOutcome::from_note(result)
    }
}

fn invalid_arguments(id: Value, tool: &str, err: serde_json::Error) -> Response {
    Response::error(
        id,
        INVALID_PARAMS,
        format!("Invalid arguments for {tool}: {err}"),
    )
}

/// Tool descriptions advertised by `tools/list`.
pub fn tool_definitions() -> Value {
    json!([
        {
            "name": "save_to_markdown",
            "description": "Save content to a markdown file.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "content": {
                        "type": "string",
                        "description": "The text content to save",
                    },
                    "filename": {
                        "type": ["string", "null"],
                        "description": "Optional filename (if not provided, uses timestamp)",
                    },
                },
                "required": ["content"],
            },
        },
        {
            "name": "create_note",
            "description": "Create a new note in Apple Notes.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "The title of the note",
                    },
                    "content": {
                        "type": "string",
                        "description": "The content/body of the note (can be markdown)",
                    },
                    "convert_markdown": {
                        "type": "boolean",
                        "default": true,
                        "description": "Whether to convert content from markdown to HTML",
                    },
                },
                "required": ["title", "content"],
            },
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CommandOutput;
    use tempfile::tempdir;

    struct Denied;

    impl CommandRunner for Denied {
        fn run(&self, _: &str, _: &[&str]) -> io::Result<CommandOutput> {
            Ok(CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "not authorized".to_string(),
            })
        }
    }

    fn server(dir: &std::path::Path) -> Server<Denied> {
        let config = Config { records_dir: dir.to_path_buf(), ..Config::default() };
        Server::with_runner(config, Denied)
    }

    fn result_of(response: Response) -> Value {
        assert!(response.error.is_none(), "{:?}", response.error);
        response.result.unwrap()
    }

    #[test]
    fn initialize_and_list_tools() {
        let tmp = tempdir().unwrap();
        let s = server(tmp.path());
        let init = result_of(
            s.handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
                .unwrap(),
        );
        assert_eq!(init["serverInfo"]["name"], "notes-saver");

        let list = result_of(
            s.handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
                .unwrap(),
        );
        let names: Vec<&str> = list["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["save_to_markdown", "create_note"]);
    }

    #[test]
    fn notifications_get_no_reply() {
        let tmp = tempdir().unwrap();
        let s = server(tmp.path());
        assert!(
            s.handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .is_none()
        );
    }

    #[test]
    fn protocol_errors() {
        let tmp = tempdir().unwrap();
        let s = server(tmp.path());
        let parse = s.handle_line("{not json").unwrap();
        assert_eq!(parse.error.unwrap().code, PARSE_ERROR);

        let unknown = s
            .handle_line(r#"{"jsonrpc":"2.0","id":3,"method":"nope"}"#)
            .unwrap();
        assert_eq!(unknown.error.unwrap().code, METHOD_NOT_FOUND);

        let bad_args = s
            .handle_line(
                r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"create_note","arguments":{"title":1}}}"#,
            )
            .unwrap();
        assert_eq!(bad_args.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn json_without_method_is_invalid_request() {
        let tmp = tempdir().unwrap();
        let s = server(tmp.path());
        let response = s.handle_line(r#"{"jsonrpc":"2.0","id":9}"#).unwrap();
        assert_eq!(response.id, 9);
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);

        let not_object = s.handle_line("[1, 2]").unwrap();
        assert_eq!(not_object.id, Value::Null);
        assert_eq!(not_object.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn save_tool_writes_file() {
        let tmp = tempdir().unwrap();
        let s = server(tmp.path());
        let result = result_of(
            s.handle_line(
                r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"save_to_markdown","arguments":{"content":"hello","filename":"notes"}}}"#,
            )
            .unwrap(),
        );
        assert_eq!(result["isError"], false);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Successfully saved to "), "{text}");
        assert!(text.ends_with("notes.md"), "{text}");
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("notes.md")).unwrap(),
            "hello"
        );
    }

    #[test]
    fn note_tool_failure_is_a_tool_error() {
        let tmp = tempdir().unwrap();
        let s = server(tmp.path());
        let result = result_of(
            s.handle_line(
                r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"create_note","arguments":{"title":"Hi","content":"x"}}}"#,
            )
            .unwrap(),
        );
        assert_eq!(result["isError"], true);
        assert_eq!(
            result["content"][0]["text"],
            "Error creating note: not authorized"
        );
    }

    #[test]
    fn serve_answers_each_request_on_its_own_line() {
        let tmp = tempdir().unwrap();
        let s = server(tmp.path());
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":"b","method":"ping"}"#,
            "\n",
        );
        let mut out = Vec::new();
        s.serve(input.as_bytes(), &mut out).unwrap();
        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["id"], "b");
    }

    #[test]
    fn serve_survives_a_non_utf8_line() {
        let tmp = tempdir().unwrap();
        let s = server(tmp.path());
        let mut input = Vec::new();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#);

        let mut out = Vec::new();
        s.serve(input.as_slice(), &mut out).unwrap();
        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["error"]["code"], PARSE_ERROR);
        assert_eq!(lines[2]["id"], 2);
        assert_eq!(lines[2]["result"], json!({}));
    }
}
