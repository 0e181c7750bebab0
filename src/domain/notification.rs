use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotificationKind::Info => "info",
            NotificationKind::Warning => "aviso",
            NotificationKind::Success => "sucesso",
        };
        f.write_str(label)
    }
}

/// Entry of the header notification feed. `time` is already relative text
/// ("Há 2 horas").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub time: String,
    pub read: bool,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}
