//! Parameter values used to describe command overloads.
//!
//! A parameter's value is only a type witness: the session inspects it to
//! decide which argument type to advertise. Primitive values are recognised by
//! their concrete type; richer values opt into the [`Parameter`] or [`Enum`]
//! capability.

use std::any::Any;
use std::fmt;

use hearth_proto::Vec3;

/// Access to the concrete type behind a trait object.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A value that can stand in for a command parameter.
pub trait ParamValue: AsAny + fmt::Debug + Send + Sync {
    /// The parameter capability, if this value names its own argument kind.
    fn as_parameter(&self) -> Option<&dyn Parameter> {
        None
    }

    /// The enum capability, if this value accepts a closed set of options.
    fn as_enum(&self) -> Option<&dyn Enum> {
        None
    }
}

/// A parameter that declares its argument kind by name, such as `target`.
pub trait Parameter {
    fn param_type(&self) -> &str;
}

/// A parameter taking one of a closed set of options.
pub trait Enum {
    fn enum_type(&self) -> &str;
    fn options(&self) -> Vec<String>;
}

macro_rules! plain_param_value {
    ($($t:ty),* $(,)?) => {
        $(impl ParamValue for $t {})*
    };
}

plain_param_value!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, String,
    &'static str, Vec3,
);

/// A player name or target selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target;

impl Parameter for Target {
    fn param_type(&self) -> &str {
        "target"
    }
}

impl ParamValue for Target {
    fn as_parameter(&self) -> Option<&dyn Parameter> {
        Some(self)
    }
}

/// The rest of the command line, taken verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Varargs;

impl Parameter for Varargs {
    fn param_type(&self) -> &str {
        "text"
    }
}

impl ParamValue for Varargs {
    fn as_parameter(&self) -> Option<&dyn Parameter> {
        Some(self)
    }
}

/// A fixed enum, such as game modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    kind: String,
    options: Vec<String>,
}

impl Choice {
    pub fn new<I, S>(kind: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: kind.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

impl Enum for Choice {
    fn enum_type(&self) -> &str {
        &self.kind
    }

    fn options(&self) -> Vec<String> {
        self.options.clone()
    }
}

impl ParamValue for Choice {
    fn as_enum(&self) -> Option<&dyn Enum> {
        Some(self)
    }
}
