// Logging is compiled out unless the 'logging' feature is enabled.

#[allow(unused_macros)]
macro_rules! log {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $($tt)*
        }
    }
}

#[allow(unused_macros)]
macro_rules! debug {
    ($($tt:tt)*) => { log!(log::debug!($($tt)*)) }
}

#[allow(unused_macros)]
macro_rules! trace {
    ($($tt:tt)*) => { log!(log::trace!($($tt)*)) }
}
