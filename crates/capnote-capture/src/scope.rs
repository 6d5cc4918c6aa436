//! Which messages are captured.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use capnote_core::IncomingMessage;

use crate::config::ConfigError;

/// Display names the file transfer pseudo-contact appears under.
///
/// Matched as case-insensitive substrings of the sender name.
pub const FILE_TRANSFER_NAMES: &[&str] = &["file", "文件传输助手", "filehelper", "文件"];

/// Admission rule for capture. Every message is logged either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureScope {
    /// Messages the host flags as coming from the bot administrator.
    #[default]
    Admin,
    /// Messages from the file transfer assistant.
    FileTransfer,
    All,
}

impl CaptureScope {
    pub fn admits(&self, message: &IncomingMessage) -> bool {
        match self {
            Self::Admin => message.is_admin,
            Self::FileTransfer => is_file_transfer_assistant(&message.sender_name),
            Self::All => true,
        }
    }
}

pub fn is_file_transfer_assistant(sender_name: &str) -> bool {
    let name = sender_name.to_lowercase();
    FILE_TRANSFER_NAMES.iter().any(|candidate| name.contains(candidate))
}

impl FromStr for CaptureScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "file_transfer" | "file-transfer" => Ok(Self::FileTransfer),
            "all" => Ok(Self::All),
            _ => Err(ConfigError::InvalidValue {
                key: "scope",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CaptureScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::FileTransfer => write!(f, "file_transfer"),
            Self::All => write!(f, "all"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from(name: &str, is_admin: bool) -> IncomingMessage {
        IncomingMessage {
            sender_name: name.to_string(),
            is_admin,
            ..Default::default()
        }
    }

    #[test]
    fn test_admin_scope() {
        assert!(CaptureScope::Admin.admits(&from("Alice", true)));
        assert!(!CaptureScope::Admin.admits(&from("Alice", false)));
    }

    #[test]
    fn test_file_transfer_names() {
        assert!(is_file_transfer_assistant("File Transfer"));
        assert!(is_file_transfer_assistant("filehelper"));
        assert!(is_file_transfer_assistant("文件传输助手"));
        assert!(!is_file_transfer_assistant("Alice"));
        assert!(CaptureScope::FileTransfer.admits(&from("FILEHELPER", false)));
    }

    #[test]
    fn test_all_scope() {
        assert!(CaptureScope::All.admits(&from("anyone", false)));
    }

    #[test]
    fn test_parse_and_display() {
        for scope in [CaptureScope::Admin, CaptureScope::FileTransfer, CaptureScope::All] {
            assert_eq!(scope.to_string().parse::<CaptureScope>().unwrap(), scope);
        }
        assert_eq!("File-Transfer".parse::<CaptureScope>().unwrap(), CaptureScope::FileTransfer);
        assert!("everyone".parse::<CaptureScope>().is_err());
    }
}
