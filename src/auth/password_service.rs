//! 密码服务模块 - 生成与哈希

use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::gen_password::NicePassGenerator;
use crate::types::HashScheme;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher as _, SaltString};
use argon2::Argon2;
use md5::{Digest, Md5};

/// 密码哈希器
pub trait PasswordHasher: Send + Sync {
    /// 计算明文密码的哈希
    fn hash(&self, plaintext: &str) -> Result<String>;

    /// 哈希方案
    fn scheme(&self) -> HashScheme;
}

/// 旧版MD5哈希器
///
/// 输出UTF-8字节的MD5摘要，32位小写十六进制，与已有 `clients.password` 列兼容。
/// 该方案强度很弱，仅为兼容保留。
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyMd5Hasher;

impl LegacyMd5Hasher {
    pub fn digest(plaintext: &str) -> String {
        hex::encode(Md5::digest(plaintext.as_bytes()))
    }
}

impl PasswordHasher for LegacyMd5Hasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(Self::digest(plaintext))
    }

    fn scheme(&self) -> HashScheme {
        HashScheme::LegacyMd5
    }
}

/// Argon2哈希器，输出PHC字符串
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AppError::password_hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn scheme(&self) -> HashScheme {
        HashScheme::Argon2
    }
}

/// 密码服务
pub struct PasswordService {
    generator: NicePassGenerator,
    hasher: Box<dyn PasswordHasher>,
}

impl PasswordService {
    /// 创建新的密码服务实例
    pub fn new(generator: NicePassGenerator, hasher: Box<dyn PasswordHasher>) -> Self {
        Self { generator, hasher }
    }

    /// 按配置创建
    pub fn from_settings(settings: &Settings) -> Self {
        let hasher: Box<dyn PasswordHasher> = match settings.hash_scheme {
            HashScheme::LegacyMd5 => Box::new(LegacyMd5Hasher),
            HashScheme::Argon2 => Box::new(Argon2Hasher),
        };
        Self::new(
            NicePassGenerator::new(settings.alpha_length, settings.numeric_length),
            hasher,
        )
    }

    /// 生成新密码
    pub fn generate_password(&self) -> String {
        self.generator.generate()
    }

    /// 计算密码哈希，拒绝空密码
    pub fn hash_password(&self, plaintext: &str) -> Result<String> {
        if plaintext.is_empty() {
            return Err(AppError::validation("密码不能为空"));
        }
        self.hasher.hash(plaintext)
    }

    pub fn scheme(&self) -> HashScheme {
        self.hasher.scheme()
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(NicePassGenerator::default(), Box::new(LegacyMd5Hasher))
    }
}
