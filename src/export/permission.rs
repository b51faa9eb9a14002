use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

/// Texts shown when asking for permission to write to storage
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct PermissionPrompt {
    pub title: String,
    pub message: String,
    pub button_neutral: String,
    pub button_negative: String,
    pub button_positive: String,
}

impl Default for PermissionPrompt {
    fn default() -> Self {
        Self {
            title: "Storage Permission".to_owned(),
            message: "This app needs access to your storage to save images.".to_owned(),
            button_neutral: "Ask Me Later".to_owned(),
            button_negative: "Cancel".to_owned(),
            button_positive: "OK".to_owned(),
        }
    }
}

/// Grants (or refuses) the right to write the exported file
pub trait StoragePermission: Send + Sync {
    /// Returns true when writing is allowed
    fn request(&self, prompt: &PermissionPrompt) -> bool;
}

/// For platforms that do not gate storage writes
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysGranted;

impl StoragePermission for AlwaysGranted {
    fn request(&self, _prompt: &PermissionPrompt) -> bool {
        true
    }
}

/// Asks the user with a native message box
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogPermission;

impl StoragePermission for DialogPermission {
    fn request(&self, prompt: &PermissionPrompt) -> bool {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(&prompt.title)
            .set_description(&prompt.message)
            // Native message boxes offer two custom buttons; "ask later" counts as a refusal
            .set_buttons(MessageButtons::OkCancelCustom(
                prompt.button_positive.clone(),
                prompt.button_negative.clone(),
            ))
            .show();

        let granted = match &result {
            MessageDialogResult::Yes | MessageDialogResult::Ok => true,
            MessageDialogResult::Custom(label) => *label == prompt.button_positive,
            _ => false,
        };
        log::debug!("Storage permission prompt answered with {:?} (granted: {})", result, granted);
        granted
    }
}

/// Permission capability for the platform we are running on
pub fn platform_permission(ask: bool) -> Box<dyn StoragePermission> {
    if ask || cfg!(target_os = "android") {
        Box::new(DialogPermission)
    } else {
        Box::new(AlwaysGranted)
    }
}
