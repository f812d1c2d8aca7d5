use bytes::{Bytes, BytesMut};

use super::{id, PacketBody};
use crate::encode::{ReadExt, WriteExt};
use crate::error::Result;

/// What a [`SetTitle`] packet changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleAction {
    /// Remove the current title.
    Clear,
    /// Reset title and durations.
    Reset,
    /// Set the large title text.
    SetTitle,
    /// Set the subtitle text.
    SetSubtitle,
    /// Set the action bar text.
    SetActionBar,
    /// Change the fade and remain durations only.
    SetDurations,
    /// An action this server does not know about.
    Unknown(i32),
}

impl TitleAction {
    /// Wire value of the action.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Clear => 0,
            Self::Reset => 1,
            Self::SetTitle => 2,
            Self::SetSubtitle => 3,
            Self::SetActionBar => 4,
            Self::SetDurations => 5,
            Self::Unknown(v) => v,
        }
    }

    /// Action for a wire value.
    pub fn from_i32(v: i32) -> Self {
        match v {
            0 => Self::Clear,
            1 => Self::Reset,
            2 => Self::SetTitle,
            3 => Self::SetSubtitle,
            4 => Self::SetActionBar,
            5 => Self::SetDurations,
            other => Self::Unknown(other),
        }
    }
}

/// Title, subtitle and action bar control. Durations are in ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetTitle {
    /// What to change.
    pub action_type: TitleAction,
    /// Text to show.
    pub text: String,
    /// Fade-in duration.
    pub fade_in_duration: i32,
    /// Time the text stays fully visible.
    pub remain_duration: i32,
    /// Fade-out duration.
    pub fade_out_duration: i32,
}

impl PacketBody for SetTitle {
    const ID: u32 = id::SET_TITLE;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_varint32(self.action_type.as_i32());
        buf.put_string(&self.text);
        buf.put_varint32(self.fade_in_duration);
        buf.put_varint32(self.remain_duration);
        buf.put_varint32(self.fade_out_duration);
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        Ok(Self {
            action_type: TitleAction::from_i32(buf.read_varint32()?),
            text: buf.read_string()?,
            fade_in_duration: buf.read_varint32()?,
            remain_duration: buf.read_varint32()?,
            fade_out_duration: buf.read_varint32()?,
        })
    }
}
