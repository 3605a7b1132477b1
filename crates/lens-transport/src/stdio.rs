//! Line-delimited stdio server loop

use crate::McpDispatcher;
use lens_foundation::protocol::mcp::{McpError, McpMessage, McpResponse};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use uuid::Uuid;

/// Line-oriented transport over any async reader/writer pair, which
/// keeps the loop testable without real standard streams.
pub struct StdioTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R: tokio::io::AsyncRead + Unpin, W: tokio::io::AsyncWrite + Unpin> StdioTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Read one line; `None` at EOF.
    pub async fn read_message(&mut self) -> Result<Option<String>, std::io::Error> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Write one message terminated by a newline.
    pub async fn write_message(&mut self, message: &str) -> Result<(), std::io::Error> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Run the stdio server until EOF. One request at a time.
pub async fn start_stdio_server(
    dispatcher: Arc<dyn McpDispatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let mut transport = StdioTransport::new(stdin, stdout);

    tracing::info!("Lens server running on stdio");

    loop {
        let message = match transport.read_message().await {
            Ok(Some(message)) => message,
            Ok(None) => {
                tracing::info!("EOF reached, shutting down stdio server");
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "Error reading from stdin");
                break;
            }
        };
        if message.trim().is_empty() {
            continue;
        }

        let request_id = Uuid::new_v4();
        let span = lens_config::logging::request_span(&request_id.to_string(), "stdio");
        let _enter = span.enter();
        tracing::debug!(message_length = message.len(), "Received message");

        let mcp_message: McpMessage = match serde_json::from_str(&message) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    message_preview = &message[..message.len().min(100)],
                    "Failed to parse message"
                );
                let error_response = McpMessage::error_response(
                    None,
                    McpError::parse_error(format!("Parse error: {e}")),
                );
                transport
                    .write_message(&serde_json::to_string(&error_response)?)
                    .await?;
                continue;
            }
        };

        // Notifications produce no response
        let is_notification = match &mcp_message {
            McpMessage::Notification(_) => true,
            McpMessage::Request(request) => request.id.is_none(),
            McpMessage::Response(_) => true,
            _ => false,
        };
        if is_notification {
            continue;
        }
        let message_id = match &mcp_message {
            McpMessage::Request(request) => request.id.clone(),
            _ => None,
        };

        let response = match dispatcher.dispatch(mcp_message).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Failed to handle message");
                McpMessage::Response(McpResponse {
                    jsonrpc: "2.0".to_string(),
                    id: message_id,
                    result: None,
                    error: Some(McpError {
                        code: e.jsonrpc_code(),
                        message: e.to_string(),
                        data: None,
                    }),
                })
            }
        };
        transport
            .write_message(&serde_json::to_string(&response)?)
            .await?;
    }

    tracing::info!("Stdio server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_lines_until_eof() {
        let input: &[u8] = b"{\"a\":1}\r\n{\"b\":2}\n";
        let mut transport = StdioTransport::new(input, Vec::new());
        assert_eq!(
            transport.read_message().await.unwrap(),
            Some("{\"a\":1}".to_string())
        );
        assert_eq!(
            transport.read_message().await.unwrap(),
            Some("{\"b\":2}".to_string())
        );
        assert_eq!(transport.read_message().await.unwrap(), None);
    }

    #[tokio::test]
    async fn writes_newline_terminated_messages() {
        let input: &[u8] = b"";
        let mut transport = StdioTransport::new(input, Vec::new());
        transport.write_message("{\"ok\":true}").await.unwrap();
        transport.write_message("{}").await.unwrap();
        assert_eq!(transport.writer, b"{\"ok\":true}\n{}\n");
    }
}
