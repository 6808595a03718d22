//! Macro for reducing boilerplate when defining records
//!
//! Every record type shares the same identity and timestamp fields and the
//! same `Entity`/`Data` plumbing. `impl_record!` generates the struct, both
//! trait implementations and the serde mapping between Rust field names and
//! the camelCase JSON keys clients use.

/// Define a record type
///
/// Each field lists its JSON key after `=>`. Field attributes (validation
/// rules, serde defaults) pass through unchanged. The generated struct also
/// carries `_id`, `createdAt` and `updatedAt`.
///
/// # Example
///
/// ```rust,ignore
/// impl_record!(
///     Area, "area", "areas",
///     display: name,
///     indexed: ["name"],
///     {
///         #[validate(length(min = 1))]
///         name: String => "name",
///     }
/// );
/// ```
macro_rules! impl_record {
    (
        $(#[$struct_meta:meta])*
        $type:ident, $singular:literal, $plural:literal,
        display: $display:ident,
        indexed: [ $( $indexed:literal ),* $(,)? ],
        {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $field_ty:ty => $key:literal
            ),* $(,)?
        }
    ) => {
        $(#[$struct_meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::validator::Validate
        )]
        pub struct $type {
            #[serde(rename = "_id")]
            pub id: ::uuid::Uuid,

            $(
                $(#[$field_meta])*
                #[serde(rename = $key)]
                pub $field: $field_ty,
            )*

            #[serde(rename = "createdAt", with = "crate::core::timestamp")]
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            #[serde(rename = "updatedAt", with = "crate::core::timestamp")]
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,
        }

        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn touch(&mut self) {
                self.updated_at = $crate::core::timestamp::now();
            }
        }

        impl $crate::core::entity::Data for $type {
            fn display_name(&self) -> &str {
                &self.$display
            }

            fn indexed_fields() -> &'static [&'static str] {
                &[ $( $indexed ),* ]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                use $crate::core::field::ToFieldValue;

                match field {
                    "_id" => Some(self.id.to_field_value()),
                    "createdAt" => Some(self.created_at.to_field_value()),
                    "updatedAt" => Some(self.updated_at.to_field_value()),
                    $( $key => Some(self.$field.to_field_value()), )*
                    _ => None,
                }
            }

            fn validate(&self) -> Result<(), $crate::core::error::ValidationError> {
                ::validator::Validate::validate(self).map_err(Into::into)
            }
        }

        impl $type {
            /// Fresh identity and timestamps for a record built in code
            fn identity() -> (
                ::uuid::Uuid,
                ::chrono::DateTime<::chrono::Utc>,
                ::chrono::DateTime<::chrono::Utc>,
            ) {
                let now = $crate::core::timestamp::now();
                (::uuid::Uuid::new_v4(), now, now)
            }
        }
    };
}
