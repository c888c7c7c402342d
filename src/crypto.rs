//! # 加密器
//!
//! 使用口令派生密钥的 AES-256-GCM 加密输出内容。
//!
//! ## 容器格式
//! ```text
//! "STENC1" | iterations (u32 LE) | salt (16) | nonce (12) | ciphertext + tag
//! ```
//!
//! 加密后的文件名统一追加 `.enc` 后缀，下游据此判断需要解密。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs`, `commands/decrypt.rs` 使用
//! - 使用 `aes-gcm`, `pbkdf2`, `sha2`, `rand`

use crate::error::{Result, SecureTransError};

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

/// 加密文件名后缀
pub const ENCRYPTED_SUFFIX: &str = ".enc";

const MAGIC: &[u8; 6] = b"STENC1";
const KEY_BYTES: usize = 32;
const SALT_BYTES: usize = 16;
const NONCE_BYTES: usize = 12;
const HEADER_BYTES: usize = MAGIC.len() + 4 + SALT_BYTES + NONCE_BYTES;

/// 默认 PBKDF2 迭代次数
pub const DEFAULT_ITERATIONS: u32 = 600_000;

/// 解密时接受的最大迭代次数
pub const MAX_ITERATIONS: u32 = 16 * DEFAULT_ITERATIONS;

/// 口令加密器
#[derive(Debug, Clone)]
pub struct Encryptor {
    iterations: u32,
}

impl Default for Encryptor {
    fn default() -> Self {
        Encryptor::new(DEFAULT_ITERATIONS)
    }
}

impl Encryptor {
    pub fn new(iterations: u32) -> Self {
        Encryptor {
            iterations: iterations.clamp(1, MAX_ITERATIONS),
        }
    }

    /// 加密内容
    pub fn encrypt(&self, content: &[u8], passphrase: &str) -> Result<Vec<u8>> {
        let mut salt = [0u8; SALT_BYTES];
        let mut nonce = [0u8; NONCE_BYTES];
        let mut rng = rand::thread_rng();
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut nonce);

        let key = derive_key(passphrase, &salt, self.iterations);
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| SecureTransError::EncryptionError(format!("invalid key: {}", e)))?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), content)
            .map_err(|_| SecureTransError::EncryptionError("cipher failure".to_string()))?;

        let mut out = Vec::with_capacity(HEADER_BYTES + ciphertext.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.iterations.to_le_bytes());
        out.extend_from_slice(&salt);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// 解密由 [`Encryptor::encrypt`] 生成的内容
    pub fn decrypt(&self, payload: &[u8], passphrase: &str) -> Result<Vec<u8>> {
        if payload.len() < HEADER_BYTES || &payload[..MAGIC.len()] != MAGIC {
            return Err(SecureTransError::DecryptionError(
                "not a SecureTrans encrypted payload".to_string(),
            ));
        }

        let mut offset = MAGIC.len();
        let mut iter_bytes = [0u8; 4];
        iter_bytes.copy_from_slice(&payload[offset..offset + 4]);
        let iterations = u32::from_le_bytes(iter_bytes);
        offset += 4;
        let salt = &payload[offset..offset + SALT_BYTES];
        offset += SALT_BYTES;
        let nonce = &payload[offset..offset + NONCE_BYTES];
        offset += NONCE_BYTES;

        if iterations == 0 {
            return Err(SecureTransError::DecryptionError(
                "corrupt header: zero iterations".to_string(),
            ));
        }
        if iterations > MAX_ITERATIONS {
            return Err(SecureTransError::DecryptionError(format!(
                "corrupt header: {} iterations exceeds limit of {}",
                iterations, MAX_ITERATIONS
            )));
        }

        let key = derive_key(passphrase, salt, iterations);
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| SecureTransError::DecryptionError(format!("invalid key: {}", e)))?;
        cipher
            .decrypt(Nonce::from_slice(nonce), &payload[offset..])
            .map_err(|_| {
                SecureTransError::DecryptionError("wrong passphrase or corrupted data".to_string())
            })
    }
}

fn derive_key(passphrase: &str, salt: &[u8], iterations: u32) -> [u8; KEY_BYTES] {
    let mut key = [0u8; KEY_BYTES];
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, iterations, &mut key);
    key
}

/// 去掉 `.enc` 后缀，没有后缀时返回 `None`
pub fn strip_encrypted_suffix(name: &str) -> Option<&str> {
    name.strip_suffix(ENCRYPTED_SUFFIX)
        .filter(|stem| !stem.is_empty())
}
