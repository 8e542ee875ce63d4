use crate::exception::{ExceptionKind, JniException};
use crate::java_string::to_java_string;
use crate::object::{Class, Object};
use core::ptr::NonNull;
use jni_sys;
use log::warn;
use std::marker::PhantomData;
use std::os::raw::c_char;

include!("call_jni_method.rs");

/// The JNI interface of the thread the host runtime called into.
/// All calls to Java are performed through this interface.
///
/// The host runtime owns the Java VM and attaches its interpreter thread to it, so
/// [`JniEnv`](struct.JniEnv.html) only borrows the raw `JNIEnv` pointer. A `JNIEnv` is only valid on
/// the thread it was obtained on, hence [`JniEnv`](struct.JniEnv.html) is neither `Send` nor `Sync`.
///
/// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#interface-function-table)
#[derive(Debug)]
pub struct JniEnv<'a> {
    jni_env: NonNull<jni_sys::JNIEnv>,
    _thread: PhantomData<&'a jni_sys::JNIEnv>,
}

impl<'a> JniEnv<'a> {
    /// Wrap a raw `JNIEnv` pointer handed over by the host runtime.
    ///
    /// Returns `None` for a null pointer.
    ///
    /// Unsafe because the pointer must be a valid `JNIEnv` of the current thread for the
    /// whole lifetime `'a`.
    pub unsafe fn from_raw(jni_env: *mut jni_sys::JNIEnv) -> Option<JniEnv<'a>> {
        NonNull::new(jni_env).map(|jni_env| JniEnv {
            jni_env,
            _thread: PhantomData,
        })
    }

    /// Get the raw JNI environment pointer.
    ///
    /// This function provides low-level access to all of JNI and thus is unsafe.
    #[inline(always)]
    pub unsafe fn raw_env(&self) -> NonNull<jni_sys::JNIEnv> {
        self.jni_env
    }

    /// Check whether the current thread has a pending Java exception.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#exceptioncheck)
    pub fn has_pending_exception(&self) -> bool {
        // Safe because the argument is ensured to be the correct by construction.
        let pending = unsafe { call_jni_method!(self, ExceptionCheck) };
        pending != jni_sys::JNI_FALSE
    }

    /// Turn a pending Java exception, if any, into a [`JniException`](struct.JniException.html)
    /// of the given kind.
    ///
    /// This is the check to run after every JNI call that may throw.
    pub fn check_exception(&self, kind: ExceptionKind) -> Result<(), JniException> {
        if self.has_pending_exception() {
            Err(JniException::retrieve(self, kind))
        } else {
            Ok(())
        }
    }

    /// Find a Java class by its JNI name, like `java/lang/String`.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#findclass)
    pub fn find_class(&self, name: &str) -> Result<Class<'_>, JniException> {
        let buffer = to_java_string(name);
        // Safe because the argument is a null-terminated modified UTF-8 string.
        let raw_class = unsafe { call_jni_method!(self, FindClass, buffer.as_ptr() as *const c_char) };
        match NonNull::new(raw_class) {
            // Safe because `FindClass` returned a valid class reference.
            Some(raw_class) => Ok(unsafe { Class::from_raw(self, raw_class, Some(name)) }),
            None => Err(JniException::class_not_found(self, name)),
        }
    }

    /// Create a new Java string from a Rust string.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#newstringutf)
    pub fn new_string(&self, string: &str) -> Result<Object<'_>, JniException> {
        let buffer = to_java_string(string);
        // Safe because the argument is a null-terminated modified UTF-8 string.
        let raw_string =
            unsafe { call_jni_method!(self, NewStringUTF, buffer.as_ptr() as *const c_char) };
        match NonNull::new(raw_string) {
            // Safe because `NewStringUTF` returned a valid string reference.
            Some(raw_string) => Ok(unsafe { Object::from_raw(self, raw_string) }),
            None => Err(JniException::bad_alloc(self)),
        }
    }

    /// Take the pending exception out of the environment.
    ///
    /// The exception is cleared right after it is captured so that the following JNI calls,
    /// which are all made against the returned throwable, never run with a pending exception.
    ///
    /// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#exceptionoccurred)
    pub(crate) fn take_pending_exception(&self) -> Option<Object<'_>> {
        // Safe because the argument is ensured to be the correct by construction.
        let raw_throwable = unsafe { call_jni_method!(self, ExceptionOccurred) };
        let raw_throwable = NonNull::new(raw_throwable)?;
        // Safe because the argument is ensured to be the correct by construction.
        unsafe { call_jni_method!(self, ExceptionClear) };
        // Safe because `ExceptionOccurred` returned a valid local reference.
        Some(unsafe { Object::from_raw(self, raw_throwable) })
    }

    /// Clear an exception raised while inspecting another one.
    ///
    /// Returns `true` if there was such an exception.
    pub(crate) fn discard_secondary_exception(&self, operation: &str) -> bool {
        if !self.has_pending_exception() {
            return false;
        }
        // Safe because the argument is ensured to be the correct by construction.
        unsafe { call_jni_method!(self, ExceptionClear) };
        warn!(
            "Java threw while retrieving exception details ({}); the detail is left empty",
            operation
        );
        true
    }
}
