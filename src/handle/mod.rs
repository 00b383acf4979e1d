//! Typed handles over single keys.
//!
//! A [`KeyHandle`] names one key and carries the generic key operations.
//! [`StringHandle`], [`HashHandle`], [`ListHandle`] and [`SetHandle`] add the
//! commands of their data type and dereference to the base handle, so
//! `list.expire(60)` works on every variant.
//!
//! Every handle is bound through an async constructor that probes the
//! client once. Converting an already bound [`KeyHandle`] into a variant with
//! `From` skips the probe.

/// Declares a variant handle wrapping a [`KeyHandle`].
macro_rules! key_variant {
    ($(#[$attr:meta])* $variant:ident) => {
        $(#[$attr])*
        pub struct $variant<C> {
            key: $crate::handle::KeyHandle<C>,
        }

        impl<C: $crate::core::CommandClient> $variant<C> {
            /// Binds `name` on `client` after probing the client with PING.
            ///
            /// # Errors
            ///
            /// Returns [`Error::InvalidClient`](crate::Error::InvalidClient)
            /// if the probe fails.
            pub async fn new(
                client: ::std::sync::Arc<C>,
                name: impl Into<String>,
            ) -> $crate::Result<Self> {
                $crate::handle::KeyHandle::new(client, name)
                    .await
                    .map(Self::from)
            }

            /// Binds `name` with caller metadata attached.
            ///
            /// # Errors
            ///
            /// Returns [`Error::InvalidClient`](crate::Error::InvalidClient)
            /// for reserved metadata names or a failed probe.
            pub async fn with_metadata(
                client: ::std::sync::Arc<C>,
                name: impl Into<String>,
                metadata: $crate::handle::Metadata,
            ) -> $crate::Result<Self> {
                $crate::handle::KeyHandle::with_metadata(client, name, metadata)
                    .await
                    .map(Self::from)
            }
        }

        impl<C> $variant<C> {
            /// Unwraps the base handle.
            pub fn into_inner(self) -> $crate::handle::KeyHandle<C> {
                self.key
            }
        }

        impl<C> From<$crate::handle::KeyHandle<C>> for $variant<C> {
            fn from(key: $crate::handle::KeyHandle<C>) -> Self {
                Self { key }
            }
        }

        impl<C> ::std::ops::Deref for $variant<C> {
            type Target = $crate::handle::KeyHandle<C>;

            fn deref(&self) -> &Self::Target {
                &self.key
            }
        }

        impl<C> Clone for $variant<C> {
            fn clone(&self) -> Self {
                Self {
                    key: self.key.clone(),
                }
            }
        }

        impl<C> ::std::fmt::Debug for $variant<C> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($variant))
                    .field("name", &self.key.name())
                    .field("metadata", self.key.metadata())
                    .finish_non_exhaustive()
            }
        }
    };
}

mod hash;
mod key;
mod list;
mod set;
mod string;

#[cfg(test)]
pub(crate) mod mock;

pub use hash::HashHandle;
pub use key::{KeyHandle, Metadata, Ttl, RESERVED_ATTRIBUTES};
pub use list::ListHandle;
pub use set::SetHandle;
pub use string::StringHandle;
