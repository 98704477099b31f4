pub struct Keybinds;

impl Default for Keybinds {
    fn default() -> Self {
        Self
    }
}

impl Keybinds {
    pub fn help_text(&self) -> String {
        r#"Keyboard Shortcuts:

Upload:
  Ctrl + O      Pick a file to upload
  Enter         Upload the typed path (in picker)
  Esc           Cancel the picker

Prompt:
  Enter         Analyze the prompt
  ← / →         Move cursor
  Home / End    Jump to start / end

Response:
  Tab           Switch focus between prompt and response
  ↑ / ↓         Scroll response
  PgUp / PgDn   Scroll response by a page

Service:
  Ctrl + L      List stored code chunks
  Ctrl + R      Re-check service status

General:
  F1            Toggle this help
  Ctrl + E      Show latest error details
  Esc           Dismiss notice or popup
  Ctrl + Q      Quit
"#
        .to_string()
    }
}
