use anyhow::{anyhow, Result};

use crate::domain::{ChatTranscript, Role};

/// Builds a transcript from `role:text` entries and prints its rendering.
/// Never talks to a provider.
pub struct RenderController;

impl RenderController {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, turns: Vec<String>) -> Result<String> {
        let mut transcript = ChatTranscript::new();

        for entry in &turns {
            let (role, text) = entry
                .split_once(':')
                .ok_or_else(|| anyhow!("Turn must look like role:text, got {entry:?}"))?;
            let role: Role = role.parse()?;
            transcript.append(role, text)?;
        }

        Ok(transcript.render())
    }
}

impl Default for RenderController {
    fn default() -> Self {
        Self::new()
    }
}
