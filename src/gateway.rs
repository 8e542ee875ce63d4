//! Host-callable gateway functions.
//!
//! Each gateway validates its inputs, resolves them into Java object ids, calls the bridge,
//! releases the transient objects it created, and either wraps the bridge result as the single
//! return value or reports an error. No return value is produced on error.

use crate::host::{
    BridgeError, ConversionError, HostError, HostStack, JObj, JavaBridge, JavaObjectRegistry,
    ObjectId, VarType,
};
use crate::transient::TransientIds;
use log::debug;
use thiserror::Error;

/// Error code the host reports gateway failures with.
pub const SCI_ERROR_CODE: i32 = 999;

/// A failed gateway call. The message names the gateway function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{fname}: Wrong number of input argument(s): {expected} expected.")]
    WrongInputCount {
        fname: String,
        expected: usize,
        found: usize,
    },
    #[error("{fname}: Wrong type for input argument {position} : {expected} expected")]
    WrongInputType {
        fname: String,
        position: usize,
        expected: &'static str,
    },
    #[error("{fname}: {source}")]
    Host { fname: String, source: HostError },
    #[error("{fname}: No more memory.")]
    NoMemory { fname: String },
    #[error("{fname}: {source}")]
    ArgumentConversion {
        fname: String,
        source: ConversionError,
    },
    #[error("{fname}: An exception has been thrown by Java :\n{message}")]
    JavaException { fname: String, message: String },
}

impl GatewayError {
    /// The text the host prints for this error.
    pub fn diagnostic(&self) -> String {
        format!("{}\n", self)
    }

    /// The host error code.
    pub fn code(&self) -> i32 {
        SCI_ERROR_CODE
    }
}

/// The inputs of one gateway call: the name the host called it by and the host stack.
pub struct CallContext<'a, S: HostStack + ?Sized> {
    fname: &'a str,
    stack: &'a S,
}

impl<'a, S: HostStack + ?Sized> CallContext<'a, S> {
    pub fn new(fname: &'a str, stack: &'a S) -> Self {
        CallContext { fname, stack }
    }

    pub fn fname(&self) -> &'a str {
        self.fname
    }

    pub fn stack(&self) -> &'a S {
        self.stack
    }

    fn check_input_count(&self, expected: usize) -> Result<(), GatewayError> {
        let found = self.stack.input_count();
        if found == expected {
            Ok(())
        } else {
            Err(GatewayError::WrongInputCount {
                fname: self.fname.to_owned(),
                expected,
                found,
            })
        }
    }

    fn host_error(&self, source: HostError) -> GatewayError {
        GatewayError::Host {
            fname: self.fname.to_owned(),
            source,
        }
    }

    fn conversion_error(&self, source: ConversionError) -> GatewayError {
        GatewayError::ArgumentConversion {
            fname: self.fname.to_owned(),
            source,
        }
    }

    fn no_memory(&self) -> GatewayError {
        GatewayError::NoMemory {
            fname: self.fname.to_owned(),
        }
    }

    fn wrap_result<R>(
        &self,
        registry: &R,
        result: Result<ObjectId, BridgeError>,
    ) -> Result<JObj, GatewayError>
    where
        R: JavaObjectRegistry + ?Sized,
    {
        match result {
            Ok(id) => {
                debug!("{}: Java returned object {}", self.fname, id);
                registry.create_jobj(id).map_err(|error| self.host_error(error))
            }
            Err(BridgeError(message)) => {
                debug!("{}: Java threw: {}", self.fname, message);
                Err(GatewayError::JavaException {
                    fname: self.fname.to_owned(),
                    message,
                })
            }
        }
    }
}

/// `invoke_l(id, method, args)`: call `method` on the Java object `id` with the items of the
/// list `args` as arguments.
///
/// List items that are not Java objects are converted into transient Java objects, which are
/// removed from the registry before returning. An item that cannot be converted aborts the call
/// before Java is reached.
pub fn invoke_l<S, R, B>(
    context: &CallContext<'_, S>,
    registry: &R,
    bridge: &B,
) -> Result<JObj, GatewayError>
where
    S: HostStack + ?Sized,
    R: JavaObjectRegistry<Address = S::Address> + ?Sized,
    B: JavaBridge + ?Sized,
{
    context.check_input_count(3)?;
    let stack = context.stack();
    let host_error = |error| context.host_error(error);

    let list = stack.var_address(3).map_err(host_error)?;
    if stack.var_type(list).map_err(host_error)? != VarType::List {
        return Err(GatewayError::WrongInputType {
            fname: context.fname().to_owned(),
            position: 3,
            expected: "List",
        });
    }
    let length = stack.list_len(list).map_err(host_error)?;
    let object = ObjectId(stack.single_int(1).map_err(host_error)?);
    let method = stack.single_string(2).map_err(host_error)?;
    debug!(
        "{}: invoking {} on object {} with {} argument(s)",
        context.fname(),
        method,
        object,
        length
    );

    let mut transient =
        TransientIds::with_capacity(registry, length).map_err(|_| context.no_memory())?;
    let mut arguments = Vec::new();
    arguments
        .try_reserve_exact(length)
        .map_err(|_| context.no_memory())?;
    for index in 1..=length {
        let item = stack.list_item(list, index).map_err(host_error)?;
        let argument = registry
            .resolve_arg(item, index)
            .map_err(|error| context.conversion_error(error))?;
        arguments.push(transient.track(argument));
    }

    let result = bridge.invoke(object, &method, &arguments);
    transient.release();
    context.wrap_result(registry, result)
}

/// `javaCast(value, className)`: view the Java object `value` as an instance of `className`.
///
/// A `value` that is not a Java object is converted into a transient Java object first.
pub fn java_cast<S, R, B>(
    context: &CallContext<'_, S>,
    registry: &R,
    bridge: &B,
) -> Result<JObj, GatewayError>
where
    S: HostStack + ?Sized,
    R: JavaObjectRegistry<Address = S::Address> + ?Sized,
    B: JavaBridge + ?Sized,
{
    context.check_input_count(2)?;
    let stack = context.stack();

    let value = stack
        .var_address(1)
        .map_err(|error| context.host_error(error))?;
    let mut transient = TransientIds::new(registry);
    let object = transient.track(
        registry
            .resolve_arg(value, 1)
            .map_err(|error| context.conversion_error(error))?,
    );
    let class_name = stack
        .single_string(2)
        .map_err(|error| context.host_error(error))?;
    debug!("{}: casting object {} to {}", context.fname(), object, class_name);

    let result = bridge.javacast(object, &class_name);
    transient.release();
    context.wrap_result(registry, result)
}
