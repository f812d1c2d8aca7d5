//! Mapping from command parameter values to wire argument types.

use std::any::Any;

use hearth_proto::Vec3;
use hearth_proto::command::{
    ARG_TYPE_FLOAT, ARG_TYPE_INT, ARG_TYPE_POSITION, ARG_TYPE_STRING, ARG_TYPE_TARGET,
    ARG_TYPE_VALUE,
};
use hearth_proto::CommandEnum;

use crate::cmd::ParamValue;

/// How a parameter is advertised to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Integer,
    Float,
    String,
    Position,
    /// A player name or selector.
    Target,
    /// One of a closed set of options, sent inline with the parameter.
    Enum(CommandEnum),
    /// Anything else; accepts any single token.
    Value,
}

impl ParamType {
    /// Classify a parameter value. Never fails: values that match nothing
    /// more specific are [`ParamType::Value`].
    ///
    /// Checks run in a fixed order. A value that is both a [`Parameter`] and
    /// an [`Enum`] is a target if its parameter type says so.
    ///
    /// [`Parameter`]: crate::cmd::Parameter
    /// [`Enum`]: crate::cmd::Enum
    pub fn classify(value: &dyn ParamValue) -> Self {
        let any = value.as_any();
        if is_integer(any) {
            return Self::Integer;
        }
        if any.is::<f32>() || any.is::<f64>() {
            return Self::Float;
        }
        if any.is::<String>() || any.is::<&'static str>() {
            return Self::String;
        }
        if any.is::<bool>() {
            return Self::Enum(CommandEnum::new("bool", ["true", "1", "false", "0"]));
        }
        if any.is::<Vec3>() {
            return Self::Position;
        }
        if value
            .as_parameter()
            .is_some_and(|p| matches!(p.param_type(), "player" | "target"))
        {
            return Self::Target;
        }
        if let Some(e) = value.as_enum() {
            return Self::Enum(CommandEnum::new(e.enum_type(), e.options()));
        }
        Self::Value
    }

    /// Base argument type code. Enums have none; the enum itself is sent.
    pub fn arg_type(&self) -> u32 {
        match self {
            Self::Integer => ARG_TYPE_INT,
            Self::Float => ARG_TYPE_FLOAT,
            Self::String => ARG_TYPE_STRING,
            Self::Position => ARG_TYPE_POSITION,
            Self::Target => ARG_TYPE_TARGET,
            Self::Enum(_) => 0,
            Self::Value => ARG_TYPE_VALUE,
        }
    }

    /// Split into the argument type code and the inline enum, if any.
    pub fn into_wire(self) -> (u32, Option<CommandEnum>) {
        let t = self.arg_type();
        match self {
            Self::Enum(e) => (t, Some(e)),
            _ => (t, None),
        }
    }
}

fn is_integer(any: &dyn Any) -> bool {
    any.is::<i8>()
        || any.is::<i16>()
        || any.is::<i32>()
        || any.is::<i64>()
        || any.is::<i128>()
        || any.is::<isize>()
        || any.is::<u8>()
        || any.is::<u16>()
        || any.is::<u32>()
        || any.is::<u64>()
        || any.is::<u128>()
        || any.is::<usize>()
}

/// Resolve a parameter value straight to its wire form.
pub fn value_to_param_type(value: &dyn ParamValue) -> (u32, Option<CommandEnum>) {
    ParamType::classify(value).into_wire()
}
