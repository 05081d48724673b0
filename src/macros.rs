//===========================================================================//

// Returns early from the enclosing function with an `io::Error` of the given
// kind, built from a message or a format string.
macro_rules! bail_io {
    ($kind:ident, $e:expr) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::$kind, $e))
    };
    ($kind:ident, $fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(
            ::std::io::ErrorKind::$kind,
            format!($fmt, $($arg)+),
        ))
    };
}

// Malformed ICO or PNG bytes.
macro_rules! invalid_data {
    ($($arg:tt)+) => {
        bail_io!(InvalidData, $($arg)+)
    };
}

// Images that the PNG encoder refuses.
macro_rules! invalid_input {
    ($($arg:tt)+) => {
        bail_io!(InvalidInput, $($arg)+)
    };
}

//===========================================================================//
