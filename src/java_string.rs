/// Java uses
/// [modified UTF-8 strings](https://docs.oracle.com/javase/10/docs/specs/jni/types.html#modified-utf-8-strings).
/// JNI in addition uses null-terminated modified UTF-8 strings.
/// The `cesu8` crate provides tools for regular CESU-8 strings, not null-terminated. This module
/// maps between Rust UTF-8 strings and JNI null-terminated CESU-8 strings.
use cesu8::{self, Cesu8DecodingError};
use std::borrow::Cow;

/// Convert a Rust UTF-8 string into a buffer with a null-terminated Java modified UTF-8 string.
///
/// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/types.html#modified-utf-8-strings)
pub fn to_java_string(string: &str) -> Vec<u8> {
    let mut buffer = cesu8::to_java_cesu8(string).into_owned();
    buffer.push(0);
    buffer
}

/// Convert a buffer with a null-terminated Java modified UTF-8 string into a Rust UTF-8 string.
///
/// [JNI documentation](https://docs.oracle.com/javase/10/docs/specs/jni/types.html#modified-utf-8-strings)
pub fn from_java_string(buffer: &[u8]) -> Result<Cow<str>, Cesu8DecodingError> {
    match buffer.split_last() {
        Some((0, string)) => cesu8::from_java_cesu8(string),
        _ => cesu8::from_java_cesu8(buffer),
    }
}
