// Included with `include!` by every module that calls into the JNI function table, so each
// of them gets its own copy of the macros.

#[allow(unused_macros)]
macro_rules! call_jni_method {
    ($env:expr, $method:ident) => {
        {
            let raw_env = $env.raw_env().as_ptr();
            let jni_fn = ((**raw_env).$method).unwrap();
            jni_fn(raw_env)
        }
    };
    ($env:expr, $method:ident, $($argument:expr),*) => {
        {
            let raw_env = $env.raw_env().as_ptr();
            let jni_fn = ((**raw_env).$method).unwrap();
            jni_fn(raw_env, $($argument),*)
        }
    };
}

#[allow(unused_macros)]
macro_rules! call_jni_object_method {
    ($object:expr, $method:ident) => {
        call_jni_method!($object.env(), $method, $object.raw_object().as_ptr())
    };
    ($object:expr, $method:ident, $($argument:expr),*) => {
        call_jni_method!($object.env(), $method, $object.raw_object().as_ptr(), $($argument),*)
    };
}
