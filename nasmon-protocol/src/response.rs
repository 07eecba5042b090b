//! Device → host tokens
//!
//! The host matches these strings literally, including the misspelled
//! `err_unrecongnised_command` and the missing `_ok` on `msg_ping`.

use crate::command::Command;

/// Every token the device can send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    BitmapOk,
    ClearOk,
    DebugOk,
    GraphOk,
    Ping,
    SettingsOk,
    TextOk,
    UnrecognisedCommand,
    /// Sent once after power-on
    Booted,
    /// Sent when the trigger hold completes
    DataRequest,
}

impl Response {
    /// The acknowledgement for a command
    pub fn for_command(command: &Command<'_>) -> Self {
        match command {
            Command::Bitmap { .. } => Response::BitmapOk,
            Command::Clear => Response::ClearOk,
            Command::Debug => Response::DebugOk,
            Command::Graph { .. } => Response::GraphOk,
            Command::Ping => Response::Ping,
            Command::Settings { .. } => Response::SettingsOk,
            Command::Text { .. } => Response::TextOk,
            Command::Unrecognized(_) => Response::UnrecognisedCommand,
        }
    }

    /// Wire text, without line ending
    pub const fn token(self) -> &'static str {
        match self {
            Response::BitmapOk => "msg_bmp_ok",
            Response::ClearOk => "msg_clear_ok",
            Response::DebugOk => "msg_debug_ok",
            Response::GraphOk => "msg_graph_ok",
            Response::Ping => "msg_ping",
            Response::SettingsOk => "msg_settings_ok",
            Response::TextOk => "msg_text_ok",
            Response::UnrecognisedCommand => "err_unrecongnised_command",
            Response::Booted => "msg_booted_ok",
            Response::DataRequest => "msg_data_req",
        }
    }

    /// Whether the token is followed by `\r\n`
    ///
    /// Command acknowledgements are lines; the two unsolicited tokens are
    /// sent bare.
    pub const fn is_line(self) -> bool {
        !matches!(self, Response::Booted | Response::DataRequest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_verbatim() {
        assert_eq!(Response::Ping.token(), "msg_ping");
        assert_eq!(
            Response::UnrecognisedCommand.token(),
            "err_unrecongnised_command"
        );
        assert_eq!(Response::Booted.token(), "msg_booted_ok");
        assert_eq!(Response::DataRequest.token(), "msg_data_req");
    }

    #[test]
    fn test_every_command_has_one_ack() {
        let codes = [b'o'; 24];
        let text = [0u8; 128];
        let bitmap = [0u8; 512];
        let cases = [
            (Command::Bitmap { x: 0, y: 0, width: 0, height: 0, data: &bitmap }, "msg_bmp_ok"),
            (Command::Clear, "msg_clear_ok"),
            (Command::Debug, "msg_debug_ok"),
            (Command::Graph { codes: &codes }, "msg_graph_ok"),
            (Command::Ping, "msg_ping"),
            (Command::Settings { display_on_secs: 5, brightness: 10 }, "msg_settings_ok"),
            (Command::Text { x: 0, y: 0, size: 1, text: &text }, "msg_text_ok"),
            (Command::Unrecognized(b'?'), "err_unrecongnised_command"),
        ];

        for (command, token) in cases {
            let response = Response::for_command(&command);
            assert_eq!(response.token(), token);
            assert!(response.is_line());
        }
    }

    #[test]
    fn test_unsolicited_tokens_are_bare() {
        assert!(!Response::Booted.is_line());
        assert!(!Response::DataRequest.is_line());
    }
}
