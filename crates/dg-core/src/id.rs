use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner shared by node and edge ids.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Prefix used for generated ids (`<prefix>_<n>`).
            pub const PREFIX: &'static str = $prefix;

            /// Intern a string as an id, or return the existing one.
            pub fn intern(s: &str) -> Self {
                Self(INTERNER.get_or_intern(s))
            }

            /// The id generated for counter value `n`.
            pub fn numbered(n: u64) -> Self {
                Self::intern(&format!("{}_{n}", Self::PREFIX))
            }

            /// Resolve back to a string slice.
            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }

            /// Numeric suffix if the id has the generated `<prefix>_<n>` form.
            pub fn sequence(&self) -> Option<u64> {
                self.as_str()
                    .strip_prefix(Self::PREFIX)?
                    .strip_prefix('_')?
                    .parse()
                    .ok()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::intern(&s))
            }
        }
    };
}

interned_id!(
    /// Stable identifier of a node (`node_<n>`). 4 bytes, `Copy`, O(1) compare.
    NodeId,
    "node"
);

interned_id!(
    /// Stable identifier of an edge (`connection_<n>`).
    EdgeId,
    "connection"
);
