//! Passphrase to cipher key
//!
//! The key is a bare SHA-256 of the passphrase: no salt, no work factor. Every
//! existing container was written this way, so it stays.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, Zeroizing};

/// Key length for AES-256
pub const KEY_LEN: usize = 32;

/// A derived repository key, wiped on drop
pub type RepositoryKey = Zeroizing<[u8; KEY_LEN]>;

/// Derive the repository key for a passphrase.
///
/// Empty passphrases are accepted here; callers decide whether to allow them.
pub fn derive_key(passphrase: &str) -> RepositoryKey {
    let mut digest = Sha256::digest(passphrase.as_bytes());

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(&digest);
    digest.as_mut_slice().zeroize();

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let key1 = derive_key("correct horse battery staple");
        let key2 = derive_key("correct horse battery staple");
        assert_eq!(*key1, *key2);
    }

    #[test]
    fn test_different_passphrases() {
        assert_ne!(*derive_key("one"), *derive_key("two"));
    }

    #[test]
    fn test_known_digest() {
        // sha256("abc")
        let key = derive_key("abc");
        assert_eq!(key[..4], [0xba, 0x78, 0x16, 0xbf]);
        assert_eq!(key[28..], [0xf2, 0x00, 0x15, 0xad]);
    }

    #[test]
    fn test_empty_passphrase() {
        // sha256("")
        let key = derive_key("");
        assert_eq!(key[..4], [0xe3, 0xb0, 0xc4, 0x42]);
    }
}
