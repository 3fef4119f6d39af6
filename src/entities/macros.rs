//! Macros for reducing boilerplate when defining listing entities

/// Implement [`Listing`](crate::core::entity::Listing) for a row struct
///
/// Every column listed under `fields` becomes addressable by predicates and
/// sort keys through `Listing::field`. Each field type must implement
/// [`IntoFieldValue`](crate::core::field::IntoFieldValue).
///
/// # Example
///
/// ```rust,ignore
/// impl_listing!(
///     Organization,
///     plural: "organizations",
///     singular: "organization",
///     display: "Organization",
///     key: id as FieldFormat::Uuid,
///     order: [SortKey::asc("name"), SortKey::asc("id")],
///     fields: [id, name, description, city],
/// );
/// ```
#[macro_export]
macro_rules! impl_listing {
    (
        $type:ident,
        plural: $plural:expr,
        singular: $singular:expr,
        display: $display:expr,
        key: $key:ident as $format:expr,
        order: [ $( $sort:expr ),* $(,)? ],
        fields: [ $( $field:ident ),* $(,)? ] $(,)?
    ) => {
        impl $crate::core::entity::Listing for $type {
            const PLURAL: &'static str = $plural;
            const SINGULAR: &'static str = $singular;
            const DISPLAY_NAME: &'static str = $display;
            const KEY_FIELD: &'static str = stringify!($key);
            const COLUMNS: &'static [&'static str] = &[ $( stringify!($field) ),* ];

            fn key_format() -> $crate::core::field::FieldFormat {
                $format
            }

            fn default_order() -> &'static [$crate::core::query::SortKey] {
                const ORDER: &[$crate::core::query::SortKey] = &[ $( $sort ),* ];
                ORDER
            }

            fn field(&self, name: &str) -> $crate::core::field::FieldValue {
                use $crate::core::field::IntoFieldValue;
                match name {
                    $( stringify!($field) => self.$field.to_field_value(), )*
                    _ => $crate::core::field::FieldValue::Null,
                }
            }
        }
    };
}
