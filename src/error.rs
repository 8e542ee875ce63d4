use thiserror::Error;

/// A failed JNI status code, as returned by `MonitorEnter` and `MonitorExit`.
///
/// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/functions.html#return-codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JniError {
    #[error("the current thread is not attached to the Java VM")]
    ThreadDetached,
    #[error("JNI version error")]
    UnsupportedVersion,
    #[error("not enough memory")]
    NotEnoughMemory,
    #[error("the Java VM already exists")]
    VmExists,
    #[error("invalid arguments")]
    InvalidArguments,
    /// Any other negative status, including the generic `JNI_ERR`.
    #[error("JNI error {0}")]
    Unknown(i32),
}

impl JniError {
    /// `None` for `JNI_OK`.
    pub(crate) fn from_raw(status: jni_sys::jint) -> Option<JniError> {
        Some(match status {
            jni_sys::JNI_OK => return None,
            jni_sys::JNI_EDETACHED => JniError::ThreadDetached,
            jni_sys::JNI_EVERSION => JniError::UnsupportedVersion,
            jni_sys::JNI_ENOMEM => JniError::NotEnoughMemory,
            jni_sys::JNI_EEXIST => JniError::VmExists,
            jni_sys::JNI_EINVAL => JniError::InvalidArguments,
            status => JniError::Unknown(status),
        })
    }
}
