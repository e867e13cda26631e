//! Hash collaborator for the binary Merkle tree.
//!
//! Every digest is the lower-case hex rendering of a Blake3 hash. Internal
//! nodes hash the *hex text* of their children concatenated left to right:
//!
//! `H(left || right) = blake3(left_hex || right_hex)`
//!
//! The empty string is reserved for padding leaves and is never produced by
//! [`hash_bytes`].

use std::{borrow::Cow, fmt};

/// Length in characters of every non-padding digest (32 bytes, hex encoded).
pub const DIGEST_HEX_LEN: usize = 64;

/// Digest carried by padding leaves and by internal nodes whose two children
/// are both padding.
pub const PADDING_DIGEST: &str = "";

/// A hex digest as produced by [`hash_bytes`], or the padding sentinel.
///
/// Digests are opaque: they are only ever compared for exact equality.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(String);

impl Digest {
    /// The padding sentinel.
    pub fn padding() -> Self {
        Digest(String::new())
    }

    /// Wrap an existing hex string without rehashing it.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Digest(hex.into())
    }

    /// Whether this is the padding sentinel.
    pub fn is_padding(&self) -> bool {
        self.0 == PADDING_DIGEST
    }

    /// The digest text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw bytes of the digest text, as fed into [`combine`].
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

/// Hash arbitrary bytes into a hex digest.
pub fn hash_bytes(bytes: &[u8]) -> Digest {
    let digest = Digest(hex::encode(blake3::hash(bytes).as_bytes()));
    debug_assert_eq!(digest.0.len(), DIGEST_HEX_LEN);
    debug_assert!(!digest.is_padding(), "hash output collides with padding");
    digest
}

/// Combine two child digests into their parent's digest.
///
/// Two padding children yield padding, so subtrees holding no real data keep
/// the sentinel all the way up. Any other pair is hashed as
/// `blake3(left_hex || right_hex)`.
pub fn combine(left: &Digest, right: &Digest) -> Digest {
    if left.is_padding() && right.is_padding() {
        return Digest::padding();
    }
    let mut buf = Vec::with_capacity(left.0.len() + right.0.len());
    buf.extend_from_slice(left.as_bytes());
    buf.extend_from_slice(right.as_bytes());
    hash_bytes(&buf)
}

/// Digest of a single data item.
pub fn digest_of<T: Hashable + ?Sized>(item: &T) -> Digest {
    hash_bytes(&item.hash_bytes())
}

/// Byte encoding an item contributes to its own digest.
pub trait Hashable {
    /// Bytes fed to the hash function for this item.
    fn hash_bytes(&self) -> Cow<'_, [u8]>;
}

impl Hashable for [u8] {
    fn hash_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl<const N: usize> Hashable for [u8; N] {
    fn hash_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl Hashable for Vec<u8> {
    fn hash_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl Hashable for str {
    fn hash_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Hashable for String {
    fn hash_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl<T: Hashable + ?Sized> Hashable for &T {
    fn hash_bytes(&self) -> Cow<'_, [u8]> {
        (**self).hash_bytes()
    }
}

// Integers hash their decimal text, so `7u32` and `"7"` share a digest.
macro_rules! hashable_as_decimal {
    ($($ty:ty),*) => {
        $(
            impl Hashable for $ty {
                fn hash_bytes(&self) -> Cow<'_, [u8]> {
                    Cow::Owned(self.to_string().into_bytes())
                }
            }
        )*
    };
}

hashable_as_decimal!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
