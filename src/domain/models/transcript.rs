use std::io::Cursor;

use serde::Serialize;
use tracing::debug;
use xmltree::{Element, XMLNode};

use super::{Role, Turn};
use crate::domain::DomainError;

/// Outer container tag of a rendered transcript.
pub const CHAT_HISTORY_TAG: &str = "chat_history";
const MESSAGE_TAG: &str = "message";
const ROLE_ATTR: &str = "role";

/// Ordered, append-only record of a single chat session.
///
/// Turns are stored in the order they were appended and never modified or
/// removed afterwards. [`ChatTranscript::render`] serializes them into an XML
/// block that can be embedded in the next prompt:
///
/// ```text
/// <chat_history><message role="system">You are a helpful chatbot.</message><message role="user">Hi</message></chat_history>
/// ```
///
/// Appending empty or whitespace-only text is rejected. Repeated roles
/// (including more than one system turn) are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatTranscript {
    turns: Vec<Turn>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Start a transcript whose first turn is the given system directive.
    pub fn with_system(text: impl Into<String>) -> Result<Self, DomainError> {
        let mut transcript = Self::new();
        transcript.append_system(text)?;
        Ok(transcript)
    }

    pub fn append_system(&mut self, text: impl Into<String>) -> Result<(), DomainError> {
        self.append(Role::System, text)
    }

    pub fn append_user(&mut self, text: impl Into<String>) -> Result<(), DomainError> {
        self.append(Role::User, text)
    }

    pub fn append_assistant(&mut self, text: impl Into<String>) -> Result<(), DomainError> {
        self.append(Role::Assistant, text)
    }

    pub fn append(&mut self, role: Role, text: impl Into<String>) -> Result<(), DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::invalid_input(format!(
                "{role} turn text must not be empty"
            )));
        }
        if let Some(ch) = text.chars().find(|&ch| !is_xml_char(ch)) {
            return Err(DomainError::invalid_input(format!(
                "{role} turn text contains U+{:04X}, which XML cannot represent",
                ch as u32
            )));
        }

        debug!("Appending {} turn ({} bytes)", role, text.len());
        self.turns.push(Turn::new(role, text));
        Ok(())
    }

    /// Iterate over the turns in insertion order. Every call starts over
    /// from the first turn.
    pub fn turns(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Serialize the transcript into a `<chat_history>` block.
    ///
    /// The output depends only on the appended turns, so repeated calls
    /// without an append in between return identical strings.
    pub fn render(&self) -> String {
        let mut out = format!("<{CHAT_HISTORY_TAG}>");
        for turn in &self.turns {
            out.push_str(&format!(
                "<{MESSAGE_TAG} {ROLE_ATTR}=\"{}\">{}</{MESSAGE_TAG}>",
                turn.role(),
                escape_xml(turn.text())
            ));
        }
        out.push_str(&format!("</{CHAT_HISTORY_TAG}>"));
        out
    }

    /// Rebuild a transcript from the output of [`ChatTranscript::render`].
    pub fn parse(xml: &str) -> Result<Self, DomainError> {
        let root = Element::parse(Cursor::new(xml.trim().as_bytes()))
            .map_err(|e| DomainError::parse(format!("Malformed chat history: {e}")))?;

        if root.name != CHAT_HISTORY_TAG {
            return Err(DomainError::parse(format!(
                "Expected <{CHAT_HISTORY_TAG}> root element, found <{}>",
                root.name
            )));
        }

        let mut transcript = Self::new();
        for child in &root.children {
            let XMLNode::Element(el) = child else {
                continue;
            };

            if el.name != MESSAGE_TAG {
                return Err(DomainError::parse(format!(
                    "Unexpected <{}> element in chat history",
                    el.name
                )));
            }

            let role: Role = el
                .attributes
                .get(ROLE_ATTR)
                .ok_or_else(|| DomainError::parse("Message element is missing a role"))?
                .parse()?;
            let text = el.get_text().map(|t| t.into_owned()).unwrap_or_default();

            transcript.append(role, text)?;
        }

        Ok(transcript)
    }
}

impl<'a> IntoIterator for &'a ChatTranscript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns()
    }
}

impl std::fmt::Display for ChatTranscript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Characters allowed in XML 1.0 documents.
fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\u{9}'
            | '\u{A}'
            | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // Parsers normalize a raw CR to LF; a reference survives.
            '\r' => escaped.push_str("&#13;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
