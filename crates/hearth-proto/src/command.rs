//! Command schema sent to clients in the AvailableCommands packet.
//!
//! These types describe what a client needs for auto-completion and the
//! `/help` list: names, aliases, overloads and the type of every parameter.

/// Argument type: integer.
pub const ARG_TYPE_INT: u32 = 1;
/// Argument type: float.
pub const ARG_TYPE_FLOAT: u32 = 2;
/// Argument type: any single token.
pub const ARG_TYPE_VALUE: u32 = 3;
/// Argument type: integer or `*`.
pub const ARG_TYPE_WILDCARD_INT: u32 = 4;
/// Argument type: comparison operator.
pub const ARG_TYPE_OPERATOR: u32 = 5;
/// Argument type: player name or target selector.
pub const ARG_TYPE_TARGET: u32 = 6;
/// Argument type: target or `*`.
pub const ARG_TYPE_WILDCARD_TARGET: u32 = 7;
/// Argument type: file path.
pub const ARG_TYPE_FILEPATH: u32 = 14;
/// Argument type: string.
pub const ARG_TYPE_STRING: u32 = 29;
/// Argument type: block position.
pub const ARG_TYPE_POSITION: u32 = 37;
/// Argument type: rest of the line as a message.
pub const ARG_TYPE_MESSAGE: u32 = 41;
/// Argument type: rest of the line as raw text.
pub const ARG_TYPE_RAW_TEXT: u32 = 43;
/// Argument type: JSON.
pub const ARG_TYPE_JSON: u32 = 46;
/// Argument type: a nested command.
pub const ARG_TYPE_COMMAND: u32 = 53;

/// Flag: the type code is valid. Must be set on every parameter.
pub const ARG_VALID: u32 = 0x10_0000;
/// Flag: the low bits are an index into the enum table.
pub const ARG_ENUM: u32 = 0x20_0000;
/// Flag: the low bits are an index into the suffix table.
pub const ARG_SUFFIXED: u32 = 0x100_0000;
/// Flag: the low bits are an index into the soft enum table.
pub const ARG_SOFT_ENUM: u32 = 0x400_0000;

/// Mask selecting the type or index bits of a parameter type.
pub const ARG_INDEX_MASK: u32 = 0xffff;

/// Parameter option: render enum values as a toggle rather than a list.
pub const PARAM_OPTION_COLLAPSE_ENUM: u8 = 1;

/// An inline closed set of options a parameter may take.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CommandEnum {
    /// Enum name, such as `bool` or `GameMode`.
    pub enum_type: String,
    /// Accepted values, in display order.
    pub options: Vec<String>,
}

impl CommandEnum {
    /// Construct an enum from a name and its options.
    pub fn new<I, S>(enum_type: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enum_type: enum_type.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// One parameter of an overload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandParameter {
    /// Parameter name shown in the usage hint.
    pub name: String,
    /// Argument type code combined with [`ARG_VALID`].
    pub param_type: u32,
    /// Whether the parameter may be left out.
    pub optional: bool,
    /// Render the enum as a toggle.
    pub collapse_enum_options: bool,
    /// Inline enum, if the parameter takes a closed set of values.
    pub command_enum: Option<CommandEnum>,
    /// Literal suffix expected directly after the value, such as `L`.
    pub suffix: String,
}

/// One accepted parameter list of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOverload {
    /// Parameters in order.
    pub parameters: Vec<CommandParameter>,
}

/// A command as advertised to the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    /// Canonical name, without the leading slash.
    pub name: String,
    /// Description shown in `/help`.
    pub description: String,
    /// Command flags.
    pub flags: u8,
    /// Permission level required to run the command.
    pub permission_level: u8,
    /// Alternative names.
    pub aliases: Vec<String>,
    /// Accepted parameter lists.
    pub overloads: Vec<CommandOverload>,
}
