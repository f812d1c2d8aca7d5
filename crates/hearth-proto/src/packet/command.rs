use std::collections::HashMap;

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

use super::{id, PacketBody};
use crate::command::{
    Command, CommandEnum, CommandOverload, CommandParameter, ARG_ENUM, ARG_INDEX_MASK,
    ARG_SUFFIXED, ARG_TYPE_VALUE, ARG_VALID, PARAM_OPTION_COLLAPSE_ENUM,
};
use crate::encode::{ReadExt, WriteExt};
use crate::error::{ProtocolError, Result};

/// Output type carrying every message of a command result.
pub const OUTPUT_TYPE_ALL_OUTPUT: u8 = 3;
/// Output type carrying an additional JSON data set.
pub const OUTPUT_TYPE_DATA_SET: u8 = 4;

/// Who issued a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OriginType {
    /// A player typing in chat.
    #[default]
    Player,
    /// A command block.
    Block,
    /// A command block minecart.
    MinecartBlock,
    /// The developer console.
    DevConsole,
    /// A test harness.
    Test,
    /// An automation (websocket) connection acting as a player.
    AutomationPlayer,
    /// Client-side automation.
    ClientAutomation,
    /// The dedicated server console.
    DedicatedServer,
    /// An entity.
    Entity,
    /// A virtual origin.
    Virtual,
    /// A game argument.
    GameArgument,
    /// An entity on the server.
    EntityServer,
    /// An origin this server does not know about.
    Unknown(u32),
}

impl OriginType {
    /// Wire value of the origin.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Player => 0,
            Self::Block => 1,
            Self::MinecartBlock => 2,
            Self::DevConsole => 3,
            Self::Test => 4,
            Self::AutomationPlayer => 5,
            Self::ClientAutomation => 6,
            Self::DedicatedServer => 7,
            Self::Entity => 8,
            Self::Virtual => 9,
            Self::GameArgument => 10,
            Self::EntityServer => 11,
            Self::Unknown(v) => v,
        }
    }

    /// Origin for a wire value.
    pub fn from_u32(v: u32) -> Self {
        match v {
            0 => Self::Player,
            1 => Self::Block,
            2 => Self::MinecartBlock,
            3 => Self::DevConsole,
            4 => Self::Test,
            5 => Self::AutomationPlayer,
            6 => Self::ClientAutomation,
            7 => Self::DedicatedServer,
            8 => Self::Entity,
            9 => Self::Virtual,
            10 => Self::GameArgument,
            11 => Self::EntityServer,
            other => Self::Unknown(other),
        }
    }

    fn has_player_id(self) -> bool {
        matches!(self, Self::DevConsole | Self::Test)
    }
}

/// Identifies which request a command output answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CommandOrigin {
    /// Kind of issuer.
    pub origin: OriginType,
    /// Request UUID chosen by the client.
    pub uuid: Uuid,
    /// Free-form request id.
    pub request_id: String,
    /// Issuing player; only encoded for dev-console and test origins.
    pub player_unique_id: i64,
}

impl CommandOrigin {
    fn encode(&self, buf: &mut BytesMut) {
        buf.put_varuint32(self.origin.as_u32());
        buf.put_uuid(&self.uuid);
        buf.put_string(&self.request_id);
        if self.origin.has_player_id() {
            buf.put_varint64(self.player_unique_id);
        }
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        let origin = OriginType::from_u32(buf.read_varuint32()?);
        let uuid = buf.read_uuid()?;
        let request_id = buf.read_string()?;
        let player_unique_id = if origin.has_player_id() {
            buf.read_varint64()?
        } else {
            0
        };
        Ok(Self {
            origin,
            uuid,
            request_id,
            player_unique_id,
        })
    }
}

/// A command line typed by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Full command line, including the leading slash.
    pub command_line: String,
    /// Correlation token echoed in the output.
    pub command_origin: CommandOrigin,
    /// Reserved for server-issued commands; clients must never set it.
    pub internal: bool,
}

impl PacketBody for CommandRequest {
    const ID: u32 = id::COMMAND_REQUEST;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_string(&self.command_line);
        self.command_origin.encode(buf);
        buf.put_bool(self.internal);
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        Ok(Self {
            command_line: buf.read_string()?,
            command_origin: CommandOrigin::decode(buf)?,
            internal: buf.read_bool()?,
        })
    }
}

/// One line of command output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutputMessage {
    /// Whether this line reports success.
    pub success: bool,
    /// The text, or a translation key.
    pub message: String,
    /// Translation parameters.
    pub parameters: Vec<String>,
}

/// The result of a command, addressed to its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Origin copied from the request.
    pub command_origin: CommandOrigin,
    /// Output type discriminator.
    pub output_type: u8,
    /// Number of successful messages.
    pub success_count: u32,
    /// Every message, successes first.
    pub output_messages: Vec<CommandOutputMessage>,
    /// JSON data set; only encoded for [`OUTPUT_TYPE_DATA_SET`].
    pub data_set: String,
}

impl PacketBody for CommandOutput {
    const ID: u32 = id::COMMAND_OUTPUT;

    fn encode(&self, buf: &mut BytesMut) {
        self.command_origin.encode(buf);
        buf.put_u8(self.output_type);
        buf.put_varuint32(self.success_count);
        buf.put_varuint32(self.output_messages.len() as u32);
        for msg in &self.output_messages {
            buf.put_bool(msg.success);
            buf.put_string(&msg.message);
            buf.put_string_slice(&msg.parameters);
        }
        if self.output_type == OUTPUT_TYPE_DATA_SET {
            buf.put_string(&self.data_set);
        }
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        let command_origin = CommandOrigin::decode(buf)?;
        let output_type = buf.read_u8()?;
        let success_count = buf.read_varuint32()?;
        let count = buf.read_len("output messages")?;
        let mut output_messages = Vec::with_capacity(count);
        for _ in 0..count {
            output_messages.push(CommandOutputMessage {
                success: buf.read_bool()?,
                message: buf.read_string()?,
                parameters: buf.read_string_vec("output parameters")?,
            });
        }
        let data_set = if output_type == OUTPUT_TYPE_DATA_SET {
            buf.read_string()?
        } else {
            String::new()
        };
        Ok(Self {
            command_origin,
            output_type,
            success_count,
            output_messages,
            data_set,
        })
    }
}

/// The full command catalog.
///
/// On the wire every enum option and alias string lives in one shared value
/// table, suffixes in a second table, and enums reference values by index.
/// Parameters that carry an enum or suffix are written with the matching
/// flag and table index instead of their own type code, so after decoding such
/// a parameter reports only [`ARG_VALID`] as its type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableCommands {
    /// Every advertised command.
    pub commands: Vec<Command>,
    /// Enums whose values may change at runtime.
    pub soft_enums: Vec<CommandEnum>,
}

#[derive(Default)]
struct Interner {
    values: Vec<String>,
    index: HashMap<String, usize>,
}

impl Interner {
    fn intern(&mut self, value: &str) -> usize {
        if let Some(&i) = self.index.get(value) {
            return i;
        }
        let i = self.values.len();
        self.values.push(value.to_string());
        self.index.insert(value.to_string(), i);
        i
    }
}

struct EnumTable {
    entries: Vec<(String, Vec<usize>)>,
    index: HashMap<CommandEnum, usize>,
}

impl EnumTable {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, e: &CommandEnum, values: &mut Interner) -> usize {
        if let Some(&i) = self.index.get(e) {
            return i;
        }
        let indices = e.options.iter().map(|o| values.intern(o)).collect();
        let i = self.entries.len();
        self.entries.push((e.enum_type.clone(), indices));
        self.index.insert(e.clone(), i);
        i
    }
}

/// Type word of a parameter that refers to a table entry. An index that does
/// not fit the index bits would alias another entry, so such a parameter is
/// sent as a plain value instead.
fn indexed_type(flag: u32, index: usize, _param: &str) -> u32 {
    match u32::try_from(index) {
        Ok(i) if i <= ARG_INDEX_MASK => ARG_VALID | flag | i,
        _ => {
            #[cfg(feature = "tracing")]
            tracing::warn!(param = _param, index, "Parameter table index out of range");
            ARG_VALID | ARG_TYPE_VALUE
        }
    }
}

fn put_index(buf: &mut BytesMut, index: usize, table_len: usize) {
    if table_len <= 0xff {
        buf.put_u8(index as u8);
    } else if table_len <= 0xffff {
        buf.put_u16_le(index as u16);
    } else {
        buf.put_u32_le(index as u32);
    }
}

fn read_index(buf: &mut Bytes, table_len: usize) -> Result<usize> {
    let index = if table_len <= 0xff {
        usize::from(buf.read_u8()?)
    } else if table_len <= 0xffff {
        usize::from(buf.read_u16_le()?)
    } else {
        buf.read_u32_le()? as usize
    };
    if index >= table_len {
        return Err(ProtocolError::InvalidIndex {
            table: "enum value",
            index,
            len: table_len,
        });
    }
    Ok(index)
}

fn lookup<'a, T>(table: &'a [T], index: usize, name: &'static str) -> Result<&'a T> {
    table.get(index).ok_or(ProtocolError::InvalidIndex {
        table: name,
        index,
        len: table.len(),
    })
}

impl PacketBody for AvailableCommands {
    const ID: u32 = id::AVAILABLE_COMMANDS;

    fn encode(&self, buf: &mut BytesMut) {
        let mut values = Interner::default();
        let mut suffixes = Interner::default();
        let mut enums = EnumTable::new();

        // Resolve every table index before writing anything, since the tables
        // precede the commands on the wire.
        let mut alias_enums = Vec::with_capacity(self.commands.len());
        let mut param_types = Vec::with_capacity(self.commands.len());
        for cmd in &self.commands {
            let alias_enum = if cmd.aliases.is_empty() {
                -1
            } else {
                let aliases =
                    CommandEnum::new(format!("{}Aliases", cmd.name), cmd.aliases.iter().cloned());
                enums.add(&aliases, &mut values) as i32
            };
            alias_enums.push(alias_enum);

            let overloads: Vec<Vec<u32>> = cmd
                .overloads
                .iter()
                .map(|overload| {
                    overload
                        .parameters
                        .iter()
                        .map(|param| {
                            if let Some(e) = &param.command_enum {
                                indexed_type(ARG_ENUM, enums.add(e, &mut values), &param.name)
                            } else if !param.suffix.is_empty() {
                                let index = suffixes.intern(&param.suffix);
                                indexed_type(ARG_SUFFIXED, index, &param.name)
                            } else {
                                param.param_type
                            }
                        })
                        .collect()
                })
                .collect();
            param_types.push(overloads);
        }

        buf.put_string_slice(&values.values);
        buf.put_string_slice(&suffixes.values);

        buf.put_varuint32(enums.entries.len() as u32);
        for (name, indices) in &enums.entries {
            buf.put_string(name);
            buf.put_varuint32(indices.len() as u32);
            for &i in indices {
                put_index(buf, i, values.values.len());
            }
        }

        buf.put_varuint32(self.commands.len() as u32);
        for ((cmd, alias_enum), overloads) in self.commands.iter().zip(alias_enums).zip(param_types)
        {
            buf.put_string(&cmd.name);
            buf.put_string(&cmd.description);
            buf.put_u8(cmd.flags);
            buf.put_u8(cmd.permission_level);
            buf.put_i32_le(alias_enum);
            buf.put_varuint32(cmd.overloads.len() as u32);
            for (overload, types) in cmd.overloads.iter().zip(overloads) {
                buf.put_varuint32(overload.parameters.len() as u32);
                for (param, param_type) in overload.parameters.iter().zip(types) {
                    buf.put_string(&param.name);
                    buf.put_u32_le(param_type);
                    buf.put_bool(param.optional);
                    let options = if param.collapse_enum_options {
                        PARAM_OPTION_COLLAPSE_ENUM
                    } else {
                        0
                    };
                    buf.put_u8(options);
                }
            }
        }

        buf.put_varuint32(self.soft_enums.len() as u32);
        for e in &self.soft_enums {
            buf.put_string(&e.enum_type);
            buf.put_string_slice(&e.options);
        }
        // Enum constraints are never sent.
        buf.put_varuint32(0);
    }

    fn decode(buf: &mut Bytes) -> Result<Self> {
        let values = buf.read_string_vec("enum values")?;
        let suffixes = buf.read_string_vec("suffixes")?;

        let enum_count = buf.read_len("enums")?;
        let mut enums = Vec::with_capacity(enum_count);
        for _ in 0..enum_count {
            let enum_type = buf.read_string()?;
            let len = buf.read_len("enum options")?;
            let mut options = Vec::with_capacity(len);
            for _ in 0..len {
                options.push(values[read_index(buf, values.len())?].clone());
            }
            enums.push(CommandEnum { enum_type, options });
        }

        let command_count = buf.read_len("commands")?;
        let mut commands = Vec::with_capacity(command_count);
        for _ in 0..command_count {
            let name = buf.read_string()?;
            let description = buf.read_string()?;
            let flags = buf.read_u8()?;
            let permission_level = buf.read_u8()?;
            let alias_enum = buf.read_i32_le()?;
            let aliases = if alias_enum < 0 {
                Vec::new()
            } else {
                lookup(&enums, alias_enum as usize, "enum")?.options.clone()
            };

            let overload_count = buf.read_len("overloads")?;
            let mut overloads = Vec::with_capacity(overload_count);
            for _ in 0..overload_count {
                let param_count = buf.read_len("parameters")?;
                let mut parameters = Vec::with_capacity(param_count);
                for _ in 0..param_count {
                    let name = buf.read_string()?;
                    let raw_type = buf.read_u32_le()?;
                    let optional = buf.read_bool()?;
                    let options = buf.read_u8()?;

                    let index = (raw_type & ARG_INDEX_MASK) as usize;
                    let mut param = CommandParameter {
                        name,
                        param_type: raw_type,
                        optional,
                        collapse_enum_options: options & PARAM_OPTION_COLLAPSE_ENUM != 0,
                        command_enum: None,
                        suffix: String::new(),
                    };
                    if raw_type & ARG_ENUM != 0 {
                        param.command_enum = Some(lookup(&enums, index, "enum")?.clone());
                        param.param_type = ARG_VALID;
                    } else if raw_type & ARG_SUFFIXED != 0 {
                        param.suffix = lookup(&suffixes, index, "suffix")?.clone();
                        param.param_type = ARG_VALID;
                    }
                    parameters.push(param);
                }
                overloads.push(CommandOverload { parameters });
            }

            commands.push(Command {
                name,
                description,
                flags,
                permission_level,
                aliases,
                overloads,
            });
        }

        let soft_count = buf.read_len("soft enums")?;
        let mut soft_enums = Vec::with_capacity(soft_count);
        for _ in 0..soft_count {
            soft_enums.push(CommandEnum {
                enum_type: buf.read_string()?,
                options: buf.read_string_vec("soft enum options")?,
            });
        }

        let constraint_count = buf.read_len("enum constraints")?;
        for _ in 0..constraint_count {
            buf.read_u32_le()?;
            buf.read_u32_le()?;
            let len = buf.read_len("constraint flags")?;
            buf.ensure(len)?;
            bytes::Buf::advance(buf, len);
        }

        Ok(Self {
            commands,
            soft_enums,
        })
    }
}
