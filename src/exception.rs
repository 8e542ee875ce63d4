//! Translation of pending Java exceptions into Rust errors.
//!
//! JNI leaves a thrown exception pending in the environment and forbids most JNI calls until it
//! is cleared. [`JniException::retrieve`](struct.JniException.html#method.retrieve) captures the
//! throwable, clears it, and only then inspects the captured reference, so none of the reflective
//! calls ever run with a pending exception.

use crate::env::JniEnv;
use crate::object::Object;
use thiserror::Error;

const STRING_RETURNING: &str = "()Ljava/lang/String;";
const STACK_TRACE_RETURNING: &str = "()[Ljava/lang/StackTraceElement;";

/// What the caller was doing when Java threw.
///
/// Every kind shares the same retrieval of the Java-side details and differs only in the
/// context it adds to the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExceptionKind {
    /// A Java exception without additional context.
    Thrown,
    /// Allocation of a Java resource, such as `NewStringUTF`, failed.
    BadAlloc,
    /// A Java method called through JNI threw.
    CallMethod,
    /// A class could not be found.
    ClassNotFound { class_name: String },
    /// A method could not be found.
    MethodNotFound { method_name: String },
    /// A constructor threw or returned `null`.
    ObjectCreation { class_name: String },
    /// Entering or exiting a monitor failed.
    Monitor { class_name: String },
}

impl ExceptionKind {
    fn message(&self, description: &str, stack_trace: &str) -> String {
        match self {
            ExceptionKind::Thrown => format!("{}\n{}", description, stack_trace),
            ExceptionKind::BadAlloc => "Error no more memory.".to_owned(),
            ExceptionKind::CallMethod => format!(
                "Exception when calling Java method : {}\n{}",
                description, stack_trace
            ),
            ExceptionKind::ClassNotFound { class_name } => {
                format!("Could not get the Class {}.", class_name)
            }
            ExceptionKind::MethodNotFound { method_name } => {
                format!("Could not access to the method {}.", method_name)
            }
            ExceptionKind::ObjectCreation { class_name } => {
                format!("Could not instantiate the object {}.", class_name)
            }
            ExceptionKind::Monitor { class_name } => format!(
                "Error in the access (Enter or exit) or a Java env monitor of class {}.",
                class_name
            ),
        }
    }
}

/// An exception that occurred in JNI code, with the details of the Java throwable.
///
/// Constructing one clears the pending exception from the environment. The throwable
/// reference is released before the value is returned, so a `JniException` holds plain
/// Rust strings only and can outlive the JNI call it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct JniException {
    kind: ExceptionKind,
    message: String,
    java_description: String,
    java_stack_trace: String,
    java_exception_name: String,
}

impl JniException {
    /// Capture, clear and describe the exception pending in `env`.
    ///
    /// Never fails: details that cannot be retrieved are left empty. Without a pending exception
    /// all Java-side details are empty.
    pub fn retrieve(env: &JniEnv, kind: ExceptionKind) -> JniException {
        let (java_description, java_stack_trace, java_exception_name) =
            match env.take_pending_exception() {
                None => (String::new(), String::new(), String::new()),
                Some(throwable) => (
                    retrieve_description(&throwable),
                    retrieve_stack_trace(&throwable),
                    retrieve_exception_name(&throwable),
                ),
            };
        JniException {
            message: kind.message(&java_description, &java_stack_trace),
            kind,
            java_description,
            java_stack_trace,
            java_exception_name,
        }
    }

    /// Allocation of a Java resource failed.
    pub fn bad_alloc(env: &JniEnv) -> JniException {
        Self::retrieve(env, ExceptionKind::BadAlloc)
    }

    /// A Java method called through JNI threw.
    pub fn call_method(env: &JniEnv) -> JniException {
        Self::retrieve(env, ExceptionKind::CallMethod)
    }

    /// The class `class_name` could not be found.
    pub fn class_not_found(env: &JniEnv, class_name: &str) -> JniException {
        Self::retrieve(
            env,
            ExceptionKind::ClassNotFound {
                class_name: class_name.to_owned(),
            },
        )
    }

    /// The method `method_name` could not be found.
    pub fn method_not_found(env: &JniEnv, method_name: &str) -> JniException {
        Self::retrieve(
            env,
            ExceptionKind::MethodNotFound {
                method_name: method_name.to_owned(),
            },
        )
    }

    /// An object of class `class_name` could not be created.
    pub fn object_creation(env: &JniEnv, class_name: &str) -> JniException {
        Self::retrieve(
            env,
            ExceptionKind::ObjectCreation {
                class_name: class_name.to_owned(),
            },
        )
    }

    /// The monitor of an object of class `class_name` could not be entered or exited.
    pub fn monitor(env: &JniEnv, class_name: &str) -> JniException {
        Self::retrieve(
            env,
            ExceptionKind::Monitor {
                class_name: class_name.to_owned(),
            },
        )
    }

    pub fn kind(&self) -> &ExceptionKind {
        &self.kind
    }

    /// The message describing the failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// `getLocalizedMessage()` of the throwable.
    pub fn java_description(&self) -> &str {
        &self.java_description
    }

    /// The throwable's stack trace, one `\tat <frame>` line per frame.
    pub fn java_stack_trace(&self) -> &str {
        &self.java_stack_trace
    }

    /// The throwable's class name, like `java.lang.NullPointerException`.
    pub fn java_exception_name(&self) -> &str {
        &self.java_exception_name
    }
}

/// Call a no-argument method returning an object.
///
/// Failures are swallowed: a missing method or an exception thrown by the call clears the
/// secondary exception and yields `None`.
fn call_reflective<'env>(
    object: &Object<'env>,
    name: &str,
    signature: &str,
) -> Option<Object<'env>> {
    let env = object.env();
    let class = object.class()?;
    let method = match class.method_id_unchecked(name, signature) {
        Some(method) => method,
        None => {
            env.discard_secondary_exception(name);
            return None;
        }
    };
    // Safe because all the methods called here take no arguments and return an object.
    let result = unsafe { object.call_object_method_unchecked(method, &[]) };
    if env.discard_secondary_exception(name) {
        return None;
    }
    result
}

/// Call a no-argument method returning a `String`, converting the result.
fn call_string_method(object: &Object, name: &str) -> Option<String> {
    let string = call_reflective(object, name, STRING_RETURNING)?;
    // Safe because the method returns a `java.lang.String`.
    Some(unsafe { string.to_rust_string() })
}

fn retrieve_description(throwable: &Object) -> String {
    call_string_method(throwable, "getLocalizedMessage").unwrap_or_default()
}

fn retrieve_exception_name(throwable: &Object) -> String {
    throwable
        .class()
        .and_then(|class| call_string_method(&class, "getName"))
        .unwrap_or_default()
}

fn retrieve_stack_trace(throwable: &Object) -> String {
    let stack_trace = match call_reflective(throwable, "getStackTrace", STACK_TRACE_RETURNING) {
        Some(stack_trace) => stack_trace,
        None => return String::new(),
    };
    let env = throwable.env();
    let mut result = String::new();
    // Safe because `getStackTrace` returns a `StackTraceElement[]`.
    let length = unsafe { stack_trace.array_length() };
    for index in 0..length {
        // Safe because `index` is within the array bounds.
        let element = unsafe { stack_trace.array_element_unchecked(index) };
        if env.discard_secondary_exception("getStackTrace") {
            break;
        }
        let frame = match element.and_then(|element| call_string_method(&element, "toString")) {
            Some(frame) => frame,
            None => break,
        };
        result.push_str("\tat ");
        result.push_str(&frame);
        result.push('\n');
    }
    result
}
