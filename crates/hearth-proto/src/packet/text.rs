use bytes::{BufMut, Bytes, BytesMut};

use super::{id, PacketBody};
use crate::encode::{ReadExt, WriteExt};
use crate::error::Result;

/// Sub-kind of a [`Text`] packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextType {
    /// Shown as-is in the chat window.
    Raw,
    /// Player chat; the only kind a client may send.
    Chat,
    /// Translated on the client.
    Translation,
    /// Shown above the hotbar.
    Popup,
    /// Jukebox "now playing" popup.
    JukeboxPopup,
    /// Shown above the hotbar, below popups.
    Tip,
    /// System message.
    System,
    /// Whisper from another player.
    Whisper,
    /// Announcement with a source name.
    Announcement,
    /// JSON whisper.
    ObjectWhisper,
    /// JSON text.
    Object,
    /// A text type this server does not know about.
    Unknown(u8),
}

impl TextType {
    /// Wire value of the text type.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Raw => 0,
            Self::Chat => 1,
            Self::Translation => 2,
            Self::Popup => 3,
            Self::JukeboxPopup => 4,
            Self::Tip => 5,
            Self::System => 6,
            Self::Whisper => 7,
            Self::Announcement => 8,
            Self::ObjectWhisper => 9,
            Self::Object => 10,
            Self::Unknown(v) => v,
        }
    }

    /// Text type for a wire value.
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Raw,
            1 => Self::Chat,
            2 => Self::Translation,
            3 => Self::Popup,
            4 => Self::JukeboxPopup,
            5 => Self::Tip,
            6 => Self::System,
            7 => Self::Whisper,
            8 => Self::Announcement,
            9 => Self::ObjectWhisper,
            10 => Self::Object,
            other => Self::Unknown(other),
        }
    }

    fn has_source(self) -> bool {
        matches!(self, Self::Chat | Self::Whisper | Self::Announcement)
    }

    fn has_parameters(self) -> bool {
        matches!(self, Self::Translation | Self::Popup | Self::JukeboxPopup)
    }
}

/// A chat, popup, tip or other text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    /// Sub-kind of the message.
    pub text_type: TextType,
    /// Whether the client should translate `message`.
    pub needs_translation: bool,
    /// Sender name; only encoded for chat, whisper and announcement.
    pub source_name: String,
    /// The text itself.
    pub message: String,
    /// Translation parameters; only encoded for translation and popups.
    pub parameters: Vec<String>,
    /// Xbox user id of the sender, if any.
    pub xuid: String,
    /// Platform chat id of the sender, if any.
    pub platform_chat_id: String,
}

impl Text {
    /// A text packet of the given type with every other field empty.
    pub fn new(text_type: TextType, message: impl Into<String>) -> Self {
        Self {
            text_type,
            needs_translation: false,
            source_name: String::new(),
            message: message.into(),
            parameters: Vec::new(),
            xuid: String::new(),
            platform_chat_id: String::new(),
        }
    }

    /// A chat message from `source`.
    pub fn chat(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_name: source.into(),
            ..Self::new(TextType::Chat, message)
        }
    }
}

impl PacketBody for Text {
    const ID: u32 = id::TEXT;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.text_type.as_u8());
        buf.put_bool(self.needs_translation);
        if self.text_type.has_source() {
            buf.put_string(&self.source_name);
        }
        buf.put_string(&self.message);
        if self.text_type.has_parameters() {
            buf.put_string_slice(&self.parameters);
        }
        buf.put_string(&self.xuid);
        buf.put_string(&self.platform_chat_id);
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        let text_type = TextType::from_u8(buf.read_u8()?);
        let needs_translation = buf.read_bool()?;
        let source_name = if text_type.has_source() {
            buf.read_string()?
        } else {
            String::new()
        };
        let message = buf.read_string()?;
        let parameters = if text_type.has_parameters() {
            buf.read_string_vec("text parameters")?
        } else {
            Vec::new()
        };
        Ok(Self {
            text_type,
            needs_translation,
            source_name,
            message,
            parameters,
            xuid: buf.read_string()?,
            platform_chat_id: buf.read_string()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_text_omits_source() {
        let mut pk = Text::new(TextType::Raw, "hi");
        pk.source_name = "ignored".into();
        let mut buf = BytesMut::new();
        pk.encode(&mut buf);
        // type, translation flag, "hi", empty xuid, empty chat id
        assert_eq!(&buf[..], &[0, 0, 2, b'h', b'i', 0, 0]);

        let decoded = Text::decode(&mut buf.freeze()).unwrap();
        assert_eq!(decoded.source_name, "");
        assert_eq!(decoded.message, "hi");
    }

    #[test]
    fn test_chat_keeps_source() {
        let pk = Text::chat("Alice", "hello");
        let mut buf = BytesMut::new();
        pk.encode(&mut buf);
        assert_eq!(Text::decode(&mut buf.freeze()).unwrap(), pk);
    }

    #[test]
    fn test_unknown_text_type_survives() {
        assert_eq!(TextType::from_u8(42), TextType::Unknown(42));
        assert_eq!(TextType::Unknown(42).as_u8(), 42);
        assert_eq!(TextType::from_u8(5), TextType::Tip);
    }
}
