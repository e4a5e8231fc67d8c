//! Helper macro generating port error enums with `impl Into` constructors.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( {
                    $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),* $(,)?
                } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $( $(#[$field_meta])* $field : $ty ),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( $( $field : $ty ),* )?);
            )*
        }
    };

    // Every field is accepted as `impl Into<T>` so call sites can pass `&str`.
    (@constructor $variant:ident $( $field:ident : $ty:ty ),*) => {
        ::paste::paste! {
            #[doc = concat!("Builds [`Self::", stringify!($variant), "`].")]
            #[must_use]
            pub fn [<$variant:snake>]($( $field: impl Into<$ty> ),*) -> Self {
                define_port_error!(@value $variant $( $field ),*)
            }
        }
    };

    (@value $variant:ident) => {
        Self::$variant
    };

    (@value $variant:ident $( $field:ident ),+) => {
        Self::$variant { $( $field: $field.into() ),+ }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        /// Errors used only to exercise the macro.
        pub enum SamplePortError {
            /// Message-only failure.
            Denied {
                /// Detail.
                message: String,
            } => "denied: {message}",
            /// Mixed payload.
            Retry {
                /// Path involved.
                path: String,
                /// Attempt number.
                attempt: u32,
            } => "retry {path} ({attempt})",
            /// Unit variant.
            Closed => "closed",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePortError::denied("read-only");
        assert_eq!(err.to_string(), "denied: read-only");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = SamplePortError::retry("РЕЕСТРЫ", 2_u32);
        assert_eq!(err.to_string(), "retry РЕЕСТРЫ (2)");
    }

    #[test]
    fn unit_variants_get_a_constructor() {
        assert_eq!(SamplePortError::closed(), SamplePortError::Closed);
    }
}
