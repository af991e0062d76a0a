//! Container codec
//!
//! On disk a container is `base64url(IV || AES-256-CFB(plaintext))`. The IV is
//! fresh per encryption and travels in the clear. There is no MAC: a wrong key
//! decrypts to garbage without complaint, and the layers above notice.

use aes::Aes256;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Result, StoreError};
use crate::kdf::KEY_LEN;

/// AES block size, and so the IV length
pub const BLOCK_SIZE: usize = 16;

type Aes256CfbEnc = cfb_mode::Encryptor<Aes256>;
type Aes256CfbDec = cfb_mode::Decryptor<Aes256>;

/// Encrypt and encode a payload into a container
pub fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Vec<u8> {
    let mut iv = [0u8; BLOCK_SIZE];
    OsRng.fill_bytes(&mut iv);

    encrypt_with_iv(key, &iv, plaintext)
}

fn encrypt_with_iv(key: &[u8; KEY_LEN], iv: &[u8; BLOCK_SIZE], plaintext: &[u8]) -> Vec<u8> {
    let mut body = plaintext.to_vec();
    Aes256CfbEnc::new(&(*key).into(), &(*iv).into()).encrypt(&mut body);

    let mut raw = Vec::with_capacity(BLOCK_SIZE + body.len());
    raw.extend_from_slice(iv);
    raw.extend_from_slice(&body);

    URL_SAFE.encode(&raw).into_bytes()
}

/// Decode and decrypt a container back into its payload
pub fn decrypt(key: &[u8; KEY_LEN], container: &[u8]) -> Result<Vec<u8>> {
    let mut raw = URL_SAFE.decode(trim_newline(container))?;
    if raw.len() < BLOCK_SIZE {
        return Err(StoreError::ContainerTooShort);
    }

    let mut iv = [0u8; BLOCK_SIZE];
    iv.copy_from_slice(&raw[..BLOCK_SIZE]);

    let mut body = raw.split_off(BLOCK_SIZE);
    Aes256CfbDec::new(&(*key).into(), &iv.into()).decrypt(&mut body);

    Ok(body)
}

// Hand-edited files tend to pick up a trailing newline
fn trim_newline(data: &[u8]) -> &[u8] {
    let mut end = data.len();
    while end > 0 && matches!(data[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &data[..end]
}
