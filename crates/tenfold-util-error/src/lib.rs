use std::{error, fmt, result};

pub type BoxedError = Box<dyn error::Error + Send + Sync + 'static>;
pub type BoxedErrorResult<T> = result::Result<T, BoxedError>;
pub type WhateverResult<T> = result::Result<T, snafu::Whatever>;

/// Render an error and its whole source chain on one line.
///
/// Multi-line `Debug`/`Report` output is too noisy for structured log
/// fields; this prints `outer: middle: root` instead.
pub struct FmtCompactError<'e>(&'e (dyn error::Error + 'static));

impl fmt::Display for FmtCompactError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain = std::iter::successors(Some(self.0), |err| err.source());
        for (i, err) in chain.enumerate() {
            if i != 0 {
                f.write_str(": ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

pub trait FmtCompact {
    fn fmt_compact(&self) -> FmtCompactError<'_>;
}

impl<E> FmtCompact for E
where
    E: error::Error + 'static,
{
    fn fmt_compact(&self) -> FmtCompactError<'_> {
        FmtCompactError(self)
    }
}

/// Erase a concrete error type into [`BoxedError`].
///
/// Handy in front of `snafu::ResultExt::context` when the target variant
/// stores a `BoxedError` source.
pub trait ResultBoxedExt<T> {
    fn boxed(self) -> BoxedErrorResult<T>;
}

impl<T, E> ResultBoxedExt<T> for result::Result<T, E>
where
    E: error::Error + Send + Sync + 'static,
{
    fn boxed(self) -> BoxedErrorResult<T> {
        self.map_err(|e| Box::new(e) as BoxedError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Outer(Inner);
    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("outer failed")
        }
    }
    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("inner cause")
        }
    }
    impl error::Error for Outer {
        fn source(&self) -> Option<&(dyn error::Error + 'static)> {
            Some(&self.0)
        }
    }
    impl error::Error for Inner {}

    #[test]
    fn compact_format_walks_sources() {
        let err = Outer(Inner);
        assert_eq!(err.fmt_compact().to_string(), "outer failed: inner cause");
    }
}
