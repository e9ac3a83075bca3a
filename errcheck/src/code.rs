//! Consumer-defined error code sets.
//!
//! The protocol never interprets a code beyond "is it `NONE`". Consumers
//! declare their own set with [`error_codes!`](crate::error_codes), which
//! produces a byte-sized newtype with one associated constant per cause,
//! the mandatory `NONE = 0`, and an [`ErrorCode`] implementation.

use std::fmt;

/// A consumer-defined set of failure causes.
///
/// # Contract
///
/// - `NONE.to_raw() == 0`; every other code is nonzero.
/// - `from_raw(code.to_raw()) == Some(code)` for every code in the set.
/// - `name` / `from_name` round-trip, case-insensitively.
///
/// The raw byte is what the diagnostic slot and the injection trigger
/// store, so a code must fit in a `u8`.
pub trait ErrorCode: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// The "no error" value.
    const NONE: Self;

    /// Raw byte stored in diagnostic slots.
    fn to_raw(self) -> u8;

    /// Decode a raw byte. Returns `None` for values outside the set.
    fn from_raw(raw: u8) -> Option<Self>;

    /// Symbolic name, used in logs and configuration.
    fn name(self) -> &'static str;

    /// Look a code up by symbolic name (ASCII case-insensitive).
    fn from_name(name: &str) -> Option<Self>;

    /// Returns true for the "no error" value.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// Declare an [`ErrorCode`] set.
///
/// ```rust
/// use errcheck::{error_codes, ErrorCode};
///
/// error_codes! {
///     /// Bus-level failure causes.
///     pub struct BusError {
///         /// Any I2C failure.
///         const I2C = 1;
///         /// SPI peripheral failure.
///         const SPI = 2;
///     }
/// }
///
/// assert_eq!(BusError::from_name("spi"), Some(BusError::SPI));
/// assert_eq!(BusError::SPI.to_raw(), 2);
/// assert!(BusError::NONE.is_none());
/// ```
///
/// Zero and duplicate values are rejected at compile time.
#[macro_export]
macro_rules! error_codes {
    (
        $(#[$outer:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$inner:meta])*
                const $code:ident = $value:expr;
            )+
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        $vis struct $name(u8);

        impl $name {
            /// No error recorded.
            pub const NONE: Self = Self($crate::__NO_ERROR_RAW);
            $(
                $(#[$inner])*
                pub const $code: Self = Self($value);
            )+
            /// Every failure code of this set, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$code),+];
        }

        const _: () = {
            let values: &[u8] = &[$($value),+];
            let mut i = 0;
            while i < values.len() {
                assert!(
                    values[i] != $crate::__NO_ERROR_RAW,
                    concat!(stringify!($name), ": failure codes must be nonzero")
                );
                let mut j = i + 1;
                while j < values.len() {
                    assert!(
                        values[i] != values[j],
                        concat!(stringify!($name), ": duplicate failure code value")
                    );
                    j += 1;
                }
                i += 1;
            }
        };

        impl $crate::ErrorCode for $name {
            const NONE: Self = Self($crate::__NO_ERROR_RAW);

            #[inline]
            fn to_raw(self) -> u8 {
                self.0
            }

            fn from_raw(raw: u8) -> ::core::option::Option<Self> {
                if raw == $crate::__NO_ERROR_RAW {
                    return ::core::option::Option::Some(Self(raw));
                }
                Self::ALL.iter().copied().find(|code| code.0 == raw)
            }

            fn name(self) -> &'static str {
                $(
                    if self == Self::$code {
                        return stringify!($code);
                    }
                )+
                "NONE"
            }

            fn from_name(name: &str) -> ::core::option::Option<Self> {
                if name.eq_ignore_ascii_case("NONE") {
                    return ::core::option::Option::Some(Self($crate::__NO_ERROR_RAW));
                }
                $(
                    if name.eq_ignore_ascii_case(stringify!($code)) {
                        return ::core::option::Option::Some(Self::$code);
                    }
                )+
                ::core::option::Option::None
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str($crate::ErrorCode::name(*self))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str($crate::ErrorCode::name(*self))
            }
        }
    };
}
