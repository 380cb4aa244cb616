//! Line protocol on stdin/stdout: one JSON command in, one JSON reply out.

use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use tilemux_session::{Command, Reply, SessionHandle, StoreError};

pub fn parse_line(line: &str) -> Result<Command, String> {
    serde_json::from_str(line).map_err(|e| format!("bad command: {e}"))
}

/// Reply line for a dispatch result. Errors become `{"error": "..."}`.
pub fn render(result: Result<Reply, StoreError>) -> String {
    match result {
        Ok(reply) => serde_json::to_string(&reply)
            .unwrap_or_else(|e| json!({ "error": format!("failed to encode reply: {e}") }).to_string()),
        Err(e) => error_line(&e.to_string()),
    }
}

fn error_line(message: &str) -> String {
    json!({ "error": message }).to_string()
}

/// Serve commands until end of input or a `shutdown` command.
pub async fn serve<R, W>(handle: &SessionHandle, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (reply, stop) = match parse_line(line) {
            Ok(command) => {
                let stop = matches!(command, Command::Shutdown);
                (render(handle.dispatch(command).await), stop)
            }
            Err(message) => (error_line(&message), false),
        };
        output.write_all(reply.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
        if stop {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_command() {
        let command = parse_line(r#"{"cmd": "zoom_in"}"#).unwrap();
        assert_eq!(command, Command::ZoomIn);
    }

    #[test]
    fn bad_json_is_reported() {
        let err = parse_line("zoom please").unwrap_err();
        assert!(err.starts_with("bad command:"));
    }

    #[test]
    fn replies_and_errors_render_as_json() {
        assert_eq!(render(Ok(Reply::FontSize(16))), r#"{"reply":"font_size","value":16}"#);
        let line = render(Err(StoreError::ActorClosed));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["error"], "session actor is not running");
    }
}
