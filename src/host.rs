//! Contracts of the host runtime this crate calls into.
//!
//! The host interpreter owns its variable stack, its registry of live Java objects and the
//! bridge functions that perform the actual Java calls. The gateways only see them through the
//! traits below. All of them take `&self`: the host state is global to the single interpreter
//! thread.

use crate::exception::JniException;
use std::fmt;
use thiserror::Error;

/// A handle into the host's registry of live Java objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub i32);

impl fmt::Display for ObjectId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Type of a host variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Matrix,
    Polynomial,
    Boolean,
    Integer,
    Strings,
    List,
    TypedList,
    MatrixList,
    /// Any other host type code.
    Other(i32),
}

impl VarType {
    /// Map a host type code.
    pub fn from_raw(code: i32) -> VarType {
        match code {
            1 => VarType::Matrix,
            2 => VarType::Polynomial,
            4 => VarType::Boolean,
            8 => VarType::Integer,
            10 => VarType::Strings,
            15 => VarType::List,
            16 => VarType::TypedList,
            17 => VarType::MatrixList,
            code => VarType::Other(code),
        }
    }
}

/// An error reported by the host stack API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HostError {
    pub code: i32,
    pub message: String,
}

impl HostError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        HostError {
            code,
            message: message.into(),
        }
    }
}

/// A host value that cannot be converted into a Java object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Wrong type for input argument {position} : {reason}")]
pub struct ConversionError {
    pub position: usize,
    pub reason: String,
}

/// An error reported by a bridge function: the Java exception message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BridgeError(pub String);

impl From<JniException> for BridgeError {
    fn from(exception: JniException) -> Self {
        BridgeError(exception.message().to_owned())
    }
}

/// How a host value was resolved into a Java object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedArg {
    /// The value already wraps a live Java object.
    Existing(ObjectId),
    /// The value was converted into a new Java object that only lives for the current call.
    Transient(ObjectId),
}

impl ResolvedArg {
    pub fn id(&self) -> ObjectId {
        match *self {
            ResolvedArg::Existing(id) | ResolvedArg::Transient(id) => id,
        }
    }
}

/// The host's `_JObj` return value wrapping a Java object handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JObj {
    pub id: ObjectId,
}

/// Read access to the arguments of the current gateway call.
///
/// Positions and list indices are 1-based, as on the host stack.
pub trait HostStack {
    /// Address of a variable on the stack or inside a list.
    type Address: Copy + fmt::Debug;

    /// Number of input arguments.
    fn input_count(&self) -> usize;

    fn var_address(&self, position: usize) -> Result<Self::Address, HostError>;

    fn var_type(&self, address: Self::Address) -> Result<VarType, HostError>;

    /// Number of items of a list.
    fn list_len(&self, list: Self::Address) -> Result<usize, HostError>;

    fn list_item(&self, list: Self::Address, index: usize) -> Result<Self::Address, HostError>;

    /// Read an input argument that must be a single integer.
    fn single_int(&self, position: usize) -> Result<i32, HostError>;

    /// Read an input argument that must be a single string.
    fn single_string(&self, position: usize) -> Result<String, HostError>;
}

/// The host's registry of live Java objects.
pub trait JavaObjectRegistry {
    type Address;

    /// Resolve a host value into a Java object, converting plain values into transient objects.
    fn resolve_arg(
        &self,
        address: Self::Address,
        position: usize,
    ) -> Result<ResolvedArg, ConversionError>;

    /// Wrap a Java object handle as a host return value.
    fn create_jobj(&self, id: ObjectId) -> Result<JObj, HostError>;

    /// Unregister an object from the registry.
    fn remove_object(&self, id: ObjectId);
}

/// The functions that perform the Java calls.
#[cfg_attr(test, mockall::automock)]
pub trait JavaBridge {
    /// Invoke `method` on `object` with `arguments`; returns the handle of the result.
    fn invoke(
        &self,
        object: ObjectId,
        method: &str,
        arguments: &[ObjectId],
    ) -> Result<ObjectId, BridgeError>;

    /// View `object` as an instance of `class_name`.
    fn javacast(&self, object: ObjectId, class_name: &str) -> Result<ObjectId, BridgeError>;
}
