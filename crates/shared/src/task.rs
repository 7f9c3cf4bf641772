//! Task categories for message routing.

use serde::{Deserialize, Serialize};

/// What kind of work a user message is asking for. Determines which model
/// handles the message and which badge the UI shows on the reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskCategory {
    Chat,
    Reasoning,
    Code,
    AppBuild,
    GameBuild,
    ImageGen,
    Vision,
    Creative,
    Research,
}

impl TaskCategory {
    pub fn all() -> &'static [TaskCategory] {
        &[
            TaskCategory::Chat,
            TaskCategory::Reasoning,
            TaskCategory::Code,
            TaskCategory::AppBuild,
            TaskCategory::GameBuild,
            TaskCategory::ImageGen,
            TaskCategory::Vision,
            TaskCategory::Creative,
            TaskCategory::Research,
        ]
    }

    /// Stable identifier used for storage paths and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Chat => "chat",
            TaskCategory::Reasoning => "reasoning",
            TaskCategory::Code => "code",
            TaskCategory::AppBuild => "app_build",
            TaskCategory::GameBuild => "game_build",
            TaskCategory::ImageGen => "image_gen",
            TaskCategory::Vision => "vision",
            TaskCategory::Creative => "creative",
            TaskCategory::Research => "research",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TaskCategory::Chat => "Chat",
            TaskCategory::Reasoning => "Reasoning",
            TaskCategory::Code => "Code",
            TaskCategory::AppBuild => "App Build",
            TaskCategory::GameBuild => "Game Build",
            TaskCategory::ImageGen => "Image Gen",
            TaskCategory::Vision => "Vision",
            TaskCategory::Creative => "Creative",
            TaskCategory::Research => "Research",
        }
    }
}
