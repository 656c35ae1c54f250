//! `seq-ticket render` command.

use std::path::Path;

use crate::event::Event;
use crate::template::render_body;

/// Renders the ticket body for the event stored in `event_path`.
///
/// # Errors
///
/// Returns an error string if the event file cannot be read or parsed.
pub fn run(event_path: &Path, template: Option<&str>) -> Result<(), String> {
    let event = load_event(event_path)?;
    println!("{}", render_body(template, &event));
    Ok(())
}

fn load_event(path: &Path) -> Result<Event, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read event file {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse event file {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_event_file_is_an_error() {
        let err = run(Path::new("/nonexistent/event.json"), None).unwrap_err();
        assert!(err.contains("Failed to read event file"));
    }

    #[test]
    fn loads_event_from_file() {
        let dir = std::env::temp_dir().join("seq_ticket_render_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("event.json");
        std::fs::write(
            &path,
            r#"{"Id":"e","Timestamp":"2024-06-15T10:30:00Z","Level":"Fatal","RenderedMessage":"down"}"#,
        )
        .unwrap();

        let event = load_event(&path).unwrap();
        assert_eq!(event.rendered_message, "down");
        assert!(run(&path, Some("{{@Level}}")).is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
