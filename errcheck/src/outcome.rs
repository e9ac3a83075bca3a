//! Raw outcomes of fallible operations.
//!
//! A checked call only needs to know whether an operation succeeded. The
//! classic convention is boolean-like: zero means failure, anything else
//! means success. [`Outcome`] captures that, plus the `Option` / `Result`
//! shapes so Rust APIs can be checked without an adapter.

/// Something a checked call can classify as success or failure.
///
/// Only an exact zero / `false` / `None` / `Err` is a failure. Any nonzero
/// integer, however obtained, is a success and is handed back unchanged.
pub trait Outcome {
    /// Value produced on success.
    type Value;

    /// `Some(value)` on success, `None` on failure.
    fn into_value(self) -> Option<Self::Value>;
}

impl Outcome for bool {
    type Value = ();

    #[inline]
    fn into_value(self) -> Option<()> {
        self.then_some(())
    }
}

macro_rules! impl_outcome_for_int {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Outcome for $ty {
                type Value = $ty;

                #[inline]
                fn into_value(self) -> Option<$ty> {
                    (self != 0).then_some(self)
                }
            }
        )+
    };
}

impl_outcome_for_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl<T> Outcome for Option<T> {
    type Value = T;

    #[inline]
    fn into_value(self) -> Option<T> {
        self
    }
}

/// The error payload is discarded: the diagnostic slot carries the cause.
impl<T, E> Outcome for Result<T, E> {
    type Value = T;

    #[inline]
    fn into_value(self) -> Option<T> {
        self.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_outcome() {
        assert_eq!(true.into_value(), Some(()));
        assert_eq!(false.into_value(), None);
    }

    #[test]
    fn only_exact_zero_fails() {
        assert_eq!(0u8.into_value(), None);
        assert_eq!(0i32.into_value(), None);
        assert_eq!(1u8.into_value(), Some(1));
        assert_eq!(0xFFu8.into_value(), Some(0xFF));
        assert_eq!((-1i32).into_value(), Some(-1));
        assert_eq!(i64::MIN.into_value(), Some(i64::MIN));
        assert_eq!(256u16.into_value(), Some(256));
    }

    #[test]
    fn option_and_result_outcomes() {
        assert_eq!(Some(42u16).into_value(), Some(42));
        assert_eq!(None::<u16>.into_value(), None);
        assert_eq!(Ok::<_, &str>("ready").into_value(), Some("ready"));
        assert_eq!(Err::<u8, _>("bus fault").into_value(), None);
    }

    #[test]
    fn zero_payload_inside_ok_is_success() {
        // Wrapped values are not re-inspected.
        assert_eq!(Some(0u8).into_value(), Some(0));
        assert_eq!(Ok::<i32, ()>(0).into_value(), Some(0));
    }
}
