use crate::escape::escape_for_applescript;

/// A `make new note` script for one account. Fields hold raw text; quoting
/// happens in [`NoteScript::render`] so no caller can skip it.
#[derive(Debug, Clone)]
pub struct NoteScript<'a> {
    pub account: &'a str,
    pub title: &'a str,
    pub body: &'a str,
}

impl<'a> NoteScript<'a> {
    pub fn new(account: &'a str, title: &'a str, body: &'a str) -> Self {
        Self { account, title, body }
    }

    pub fn render(&self) -> String {
        let account = escape_for_applescript(self.account);
        let title = escape_for_applescript(self.title);
        let body = escape_for_applescript(self.body);
        format!(
            r#"
    tell application "Notes"
        tell account "{account}"
            make new note with properties {{name:"{title}", body:"{body}"}}
        end tell
    end tell
    "#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_block_script() {
        let script = NoteScript::new("iCloud", "Hi", "<p>x</p>").render();
        let lines: Vec<&str> =
            script.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec![
                "tell application \"Notes\"",
                "tell account \"iCloud\"",
                "make new note with properties {name:\"Hi\", body:\"<p>x</p>\"}",
                "end tell",
                "end tell",
            ]
        );
    }

    #[test]
    fn title_and_body_are_escaped() {
        let script =
            NoteScript::new("iCloud", "say \"hi\"", "a\\b\r\n\"c\"").render();
        assert!(script.contains(r#"name:"say \"hi\"""#), "{script}");
        assert!(script.contains("body:\"a\\\\b\n\\\"c\\\"\""), "{script}");
        assert!(!script.contains('\r'));
    }

    #[test]
    fn empty_fields_still_render() {
        let script = NoteScript::new("iCloud", "", "").render();
        assert!(script.contains(r#"{name:"", body:""}"#), "{script}");
    }
}
