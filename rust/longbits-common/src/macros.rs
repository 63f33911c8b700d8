/// Returns an `InvalidArgument` error from the enclosing function when `expr` is false.
#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_arg(result, stringify!($name), stringify!($expr))?;
    }};
}

/// Returns an `InvalidFormat` error from the enclosing function when `expr` is false.
#[macro_export]
macro_rules! verify_data {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_data(result, stringify!($name), stringify!($expr))?;
    }};
}

#[cfg(test)]
mod tests {
    use crate::Result;

    fn check_batch(batch: usize) -> Result<usize> {
        verify_arg!(batch, batch > 0);
        Ok(batch)
    }

    fn check_marker(marker: u32) -> Result<u32> {
        verify_data!(marker, marker == 1);
        Ok(marker)
    }

    #[test]
    fn test_verify_macros() {
        assert_eq!(check_batch(4).unwrap(), 4);
        let err = check_batch(0).unwrap_err();
        assert_eq!(err.to_string(), "invalid argument batch: batch > 0");

        assert_eq!(check_marker(1).unwrap(), 1);
        assert!(check_marker(2).unwrap_err().is_invalid_format());
    }
}
