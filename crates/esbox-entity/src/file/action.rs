//! The action envelope accepted by the file update endpoint.

use serde::{Deserialize, Serialize};

use esbox_core::types::FolderId;

/// `{ "action": ..., "payload": ... }` body of `PATCH files/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "lowercase")]
pub enum FileAction {
    /// Rename the file.
    Rename {
        /// Trimmed new file name.
        new_name: String,
    },
    /// Mark as starred.
    Star,
    /// Clear the starred mark.
    Unstar,
    /// Move into another folder.
    Move {
        /// Destination folder.
        parent_id: Option<FolderId>,
    },
    /// Move to trash.
    Delete,
}

impl FileAction {
    /// Star or unstar depending on the target state.
    pub fn set_starred(starred: bool) -> Self {
        if starred { Self::Star } else { Self::Unstar }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rename_envelope() {
        let body = serde_json::to_value(FileAction::Rename {
            new_name: "x".to_string(),
        })
        .unwrap();
        assert_eq!(body, json!({ "action": "rename", "payload": { "new_name": "x" } }));
    }

    #[test]
    fn test_unit_actions_have_no_payload() {
        let body = serde_json::to_value(FileAction::set_starred(false)).unwrap();
        assert_eq!(body, json!({ "action": "unstar" }));
        let body = serde_json::to_value(FileAction::Delete).unwrap();
        assert_eq!(body, json!({ "action": "delete" }));
    }
}
