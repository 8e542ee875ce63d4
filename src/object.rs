use crate::env::JniEnv;
use crate::error::JniError;
use crate::exception::JniException;
use crate::java_string::{from_java_string, to_java_string};
use core::ptr::NonNull;
use jni_sys;
use log::warn;
use std::fmt;
use std::ops::Deref;
use std::os::raw::c_char;
use std::ptr;

include!("call_jni_method.rs");

/// A local reference to a Java object.
///
/// The reference is deleted when the value is dropped, so every object handed out by this crate
/// is released as soon as it goes out of scope.
pub struct Object<'env> {
    env: &'env JniEnv<'env>,
    raw_object: NonNull<jni_sys::_jobject>,
}

impl<'env> Object<'env> {
    /// Unsafe because the argument must be a valid local reference.
    #[inline(always)]
    pub(crate) unsafe fn from_raw(
        env: &'env JniEnv<'env>,
        raw_object: NonNull<jni_sys::_jobject>,
    ) -> Object<'env> {
        Object { env, raw_object }
    }

    /// Get the raw object pointer.
    ///
    /// This function provides low-level access to the Java object and thus is unsafe.
    #[inline(always)]
    pub unsafe fn raw_object(&self) -> NonNull<jni_sys::_jobject> {
        self.raw_object
    }

    /// Get the [`JniEnv`](struct.JniEnv.html) this object is bound to.
    #[inline(always)]
    pub fn env(&self) -> &'env JniEnv<'env> {
        self.env
    }

    /// Get the object's class.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#getobjectclass)
    pub fn class(&self) -> Option<Class<'env>> {
        // Safe because the argument is ensured to be a correct reference by construction.
        let raw_class = unsafe { call_jni_object_method!(self, GetObjectClass) };
        // Safe because `GetObjectClass` returned a valid class reference.
        NonNull::new(raw_class).map(|raw_class| unsafe { Class::from_raw(self.env, raw_class, None) })
    }

    /// Call a method returning an object without checking for an exception afterwards.
    ///
    /// Unsafe because the arguments must match the method signature and the method must return
    /// an object.
    pub(crate) unsafe fn call_object_method_unchecked(
        &self,
        method: MethodId,
        arguments: &[jni_sys::jvalue],
    ) -> Option<Object<'env>> {
        let raw_result = call_jni_object_method!(
            self,
            CallObjectMethodA,
            method.raw().as_ptr(),
            arguments_ptr(arguments)
        );
        NonNull::new(raw_result).map(|raw_result| Object::from_raw(self.env, raw_result))
    }

    /// Call a method returning an object. A `null` result is returned as `None`.
    ///
    /// An exception thrown by the method is reported as a
    /// [`CallMethod`](enum.ExceptionKind.html#variant.CallMethod) exception.
    ///
    /// Unsafe because the arguments must match the method signature and the method must return
    /// an object.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#calltypemethoda)
    pub unsafe fn call_object_method(
        &self,
        method: MethodId,
        arguments: &[jni_sys::jvalue],
    ) -> Result<Option<Object<'env>>, JniException> {
        let result = self.call_object_method_unchecked(method, arguments);
        if self.env.has_pending_exception() {
            return Err(JniException::call_method(self.env));
        }
        Ok(result)
    }

    /// Convert a Java `String` into a Rust `String`.
    ///
    /// Unsafe because the object must be a `java.lang.String`.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#getstringutfregion)
    pub unsafe fn to_rust_string(&self) -> String {
        let length = call_jni_object_method!(self, GetStringLength);
        if length == 0 {
            return String::new();
        }

        let size = call_jni_object_method!(self, GetStringUTFLength) as usize + 1; // +1 for the '\0' byte.
        let mut buffer: Vec<u8> = vec![0; size];
        call_jni_object_method!(
            self,
            GetStringUTFRegion,
            0 as jni_sys::jsize,
            length,
            buffer.as_mut_ptr() as *mut c_char
        );
        match from_java_string(&buffer) {
            Ok(string) => string.into_owned(),
            Err(_) => String::from_utf8_lossy(&buffer[..size - 1]).into_owned(),
        }
    }

    /// Length of a Java array.
    ///
    /// Unsafe because the object must be an array.
    pub(crate) unsafe fn array_length(&self) -> usize {
        call_jni_object_method!(self, GetArrayLength) as usize
    }

    /// Element of an object array without checking for an exception afterwards.
    ///
    /// Unsafe because the object must be an object array.
    pub(crate) unsafe fn array_element_unchecked(&self, index: usize) -> Option<Object<'env>> {
        let raw_element =
            call_jni_object_method!(self, GetObjectArrayElement, index as jni_sys::jsize);
        NonNull::new(raw_element).map(|raw_element| Object::from_raw(self.env, raw_element))
    }

    /// Enter the object's monitor. The monitor is exited when the returned
    /// [`Monitor`](struct.Monitor.html) is dropped or [`exit`](struct.Monitor.html#method.exit)-ed.
    ///
    /// `class_name` only names the object's class in the error message.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#monitorenter)
    pub fn enter_monitor(&self, class_name: &str) -> Result<Monitor<'_, 'env>, JniException> {
        // Safe because the argument is ensured to be a correct reference by construction.
        let status = unsafe { call_jni_object_method!(self, MonitorEnter) };
        match JniError::from_raw(status) {
            None => Ok(Monitor {
                object: self,
                class_name: class_name.to_owned(),
                entered: true,
            }),
            Some(error) => {
                warn!("MonitorEnter on a {} failed: {}", class_name, error);
                Err(JniException::monitor(self.env, class_name))
            }
        }
    }
}

impl<'env> fmt::Debug for Object<'env> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter
            .debug_struct("Object")
            .field("raw_object", &self.raw_object)
            .finish()
    }
}

impl<'env> Drop for Object<'env> {
    fn drop(&mut self) {
        // Safe because the argument is ensured to be correct references by construction.
        unsafe {
            call_jni_object_method!(self, DeleteLocalRef);
        }
    }
}

/// A Java method id.
///
/// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#getmethodid)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodId(NonNull<jni_sys::_jmethodID>);

impl MethodId {
    /// Get the raw method id.
    #[inline(always)]
    pub fn raw(&self) -> NonNull<jni_sys::_jmethodID> {
        self.0
    }
}

/// A local reference to a Java class.
#[derive(Debug)]
pub struct Class<'env> {
    object: Object<'env>,
    name: Option<String>,
}

impl<'env> Class<'env> {
    /// Unsafe because the argument must be a valid local class reference.
    #[inline(always)]
    pub(crate) unsafe fn from_raw(
        env: &'env JniEnv<'env>,
        raw_class: NonNull<jni_sys::_jobject>,
        name: Option<&str>,
    ) -> Class<'env> {
        Class {
            object: Object::from_raw(env, raw_class),
            name: name.map(str::to_owned),
        }
    }

    /// The JNI name the class was looked up by, if it was looked up by name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Look up a method id without checking for an exception afterwards.
    pub(crate) fn method_id_unchecked(&self, name: &str, signature: &str) -> Option<MethodId> {
        let name = to_java_string(name);
        let signature = to_java_string(signature);
        // Safe because the arguments are null-terminated modified UTF-8 strings.
        let raw_method_id = unsafe {
            call_jni_object_method!(
                self,
                GetMethodID,
                name.as_ptr() as *const c_char,
                signature.as_ptr() as *const c_char
            )
        };
        NonNull::new(raw_method_id).map(MethodId)
    }

    /// Look up an instance method by name and JNI signature.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#getmethodid)
    pub fn method_id(&self, name: &str, signature: &str) -> Result<MethodId, JniException> {
        match self.method_id_unchecked(name, signature) {
            Some(method_id) => Ok(method_id),
            None => Err(JniException::method_not_found(self.env(), name)),
        }
    }

    /// Create a new instance of the class.
    ///
    /// Unsafe because the arguments must match the constructor signature.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#newobjecta)
    pub unsafe fn new_object(
        &self,
        constructor: MethodId,
        arguments: &[jni_sys::jvalue],
    ) -> Result<Object<'env>, JniException> {
        let raw_object = call_jni_object_method!(
            self,
            NewObjectA,
            constructor.raw().as_ptr(),
            arguments_ptr(arguments)
        );
        let object = NonNull::new(raw_object).map(|raw_object| Object::from_raw(self.env(), raw_object));
        let class_name = self.name().unwrap_or("<unknown>");
        if self.env().has_pending_exception() {
            return Err(JniException::object_creation(self.env(), class_name));
        }
        object.ok_or_else(|| JniException::object_creation(self.env(), class_name))
    }
}

/// Allow [`Class`](struct.Class.html) to be used in place of an [`Object`](struct.Object.html).
impl<'env> Deref for Class<'env> {
    type Target = Object<'env>;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.object
    }
}

/// An entered Java object monitor.
///
/// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#monitorexit)
#[derive(Debug)]
pub struct Monitor<'a, 'env> {
    object: &'a Object<'env>,
    class_name: String,
    entered: bool,
}

impl<'a, 'env> Monitor<'a, 'env> {
    /// Exit the monitor, reporting a failure.
    pub fn exit(mut self) -> Result<(), JniException> {
        self.entered = false;
        // Safe because the argument is ensured to be a correct reference by construction.
        let status = unsafe { call_jni_object_method!(self.object, MonitorExit) };
        match JniError::from_raw(status) {
            None => Ok(()),
            Some(error) => {
                warn!("MonitorExit on a {} failed: {}", self.class_name, error);
                Err(JniException::monitor(self.object.env(), &self.class_name))
            }
        }
    }
}

impl<'a, 'env> Drop for Monitor<'a, 'env> {
    fn drop(&mut self) {
        if !self.entered {
            return;
        }
        // Safe because the argument is ensured to be a correct reference by construction.
        let status = unsafe { call_jni_object_method!(self.object, MonitorExit) };
        if let Some(error) = JniError::from_raw(status) {
            // No meaningful way to handle the error except for logging it.
            warn!("MonitorExit on a {} failed: {}", self.class_name, error);
        }
    }
}

fn arguments_ptr(arguments: &[jni_sys::jvalue]) -> *const jni_sys::jvalue {
    if arguments.is_empty() {
        ptr::null()
    } else {
        arguments.as_ptr()
    }
}
