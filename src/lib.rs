//! Java exception translation and Java object gateways for the Scilab Java interaction
//! mechanism.
//!
//! The JNI layer ([`JniEnv`], [`Object`], [`Class`]) turns every pending Java exception into a
//! [`JniException`] carrying the Java message, stack trace and exception class name. The gateway
//! layer ([`invoke_l`], [`java_cast`]) implements host-callable functions on top of
//! [`HostStack`] and the other host traits.
extern crate cesu8;
extern crate jni_sys;

mod env;
mod error;
mod exception;
mod gateway;
mod host;
mod java_string;
mod object;
mod transient;

pub use env::JniEnv;
pub use error::JniError;
pub use exception::{ExceptionKind, JniException};
pub use gateway::{invoke_l, java_cast, CallContext, GatewayError, SCI_ERROR_CODE};
pub use host::{
    BridgeError, ConversionError, HostError, HostStack, JObj, JavaBridge, JavaObjectRegistry,
    ObjectId, ResolvedArg, VarType,
};
pub use java_string::{from_java_string, to_java_string};
pub use object::{Class, MethodId, Monitor, Object};
pub use transient::TransientIds;
