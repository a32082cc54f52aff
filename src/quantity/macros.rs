/// Decimal-backed quantity with a unit suffix.
///
/// Formatting honours the precision flag: `format!("{:.2}", x)` renders two fractional digits.
macro_rules! quantity {
    ($name:ident, $unit:literal) => {
        #[repr(transparent)]
        #[derive(
            ::derive_more::Add,
            ::derive_more::AddAssign,
            ::derive_more::From,
            ::derive_more::FromStr,
            ::derive_more::Neg,
            ::derive_more::Sub,
            ::derive_more::SubAssign,
            ::derive_more::Sum,
            ::serde::Deserialize,
            ::serde::Serialize,
            ::std::clone::Clone,
            ::std::marker::Copy,
            ::std::default::Default,
            ::std::cmp::PartialEq,
            ::std::cmp::Eq,
            ::std::cmp::PartialOrd,
            ::std::cmp::Ord,
        )]
        pub struct $name(pub ::rust_decimal::Decimal);

        impl ::std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, formatter)?;
                write!(formatter, " {}", $unit)
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, formatter)?;
                write!(formatter, "{}", $unit)
            }
        }

        impl $name {
            pub const ZERO: Self = Self(::rust_decimal::Decimal::ZERO);

            /// Round half away from zero and pin the scale, so that `17.5` becomes `17.50`.
            #[must_use]
            pub fn round_to(self, decimal_places: u32) -> Self {
                let mut value = self.0.round_dp_with_strategy(
                    decimal_places,
                    ::rust_decimal::RoundingStrategy::MidpointAwayFromZero,
                );
                value.rescale(decimal_places);
                Self(value)
            }

            pub const fn is_sign_negative(self) -> bool {
                self.0.is_sign_negative() && !self.0.is_zero()
            }
        }
    };
}
