//! 凭据校验
//!
//! 密码以bcrypt散列保存，输出 `$2a$` 前缀的散列，校验同样接受 `$2b$`/`$2y$`

use bcrypt::Version;
use rand::{thread_rng, Rng};

use crate::error::EntityDbResult;

/// 默认bcrypt代价
pub const DEFAULT_COST: u32 = 10;
const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// 会话令牌长度
pub const TOKEN_LENGTH: usize = 32;
/// 会话令牌字符表
pub const TOKEN_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyz;-)(*&^%$#@!~";
/// 随机密码长度
pub const PASSWORD_LENGTH: usize = 10;
const PASSWORD_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// 凭据校验能力
///
/// 账户和登录流程只通过这个接口接触密码散列
pub trait CredentialVerifier: Send + Sync {
    /// 生成密码散列
    fn hash(&self, secret: &str) -> EntityDbResult<String>;

    /// 校验密码与散列是否匹配，散列格式不正确时视为不匹配
    fn verify(&self, hash: &str, secret: &str) -> bool;

    /// 生成会话令牌
    fn random_token(&self) -> String;

    /// 生成随机明文密码
    fn random_password(&self) -> String;
}

/// 基于bcrypt的凭据实现
#[derive(Debug, Clone)]
pub struct Crypt {
    cost: u32,
}

impl Crypt {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// 指定bcrypt代价
    pub fn with_cost(cost: u32) -> EntityDbResult<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(crate::entity_error!(
                config,
                format!("bcrypt代价必须在 {} 到 {} 之间", MIN_COST, MAX_COST)
            ));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// 生成会话令牌
    pub fn session_token(&self) -> String {
        random_from(TOKEN_ALPHABET, TOKEN_LENGTH)
    }
}

impl Default for Crypt {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialVerifier for Crypt {
    fn hash(&self, secret: &str) -> EntityDbResult<String> {
        let parts = bcrypt::hash_with_result(secret, self.cost)
            .map_err(|e| crate::entity_error!(validation, "password", e))?;
        Ok(parts.format_for_version(Version::TwoA))
    }

    fn verify(&self, hash: &str, secret: &str) -> bool {
        bcrypt::verify(secret, hash).unwrap_or(false)
    }

    fn random_token(&self) -> String {
        self.session_token()
    }

    fn random_password(&self) -> String {
        random_from(PASSWORD_ALPHABET, PASSWORD_LENGTH)
    }
}

fn random_from(alphabet: &str, length: usize) -> String {
    let chars: Vec<char> = alphabet.chars().collect();
    let mut rng = thread_rng();
    (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let crypt = Crypt::with_cost(4).unwrap();
        let hash = crypt.hash("testpass").unwrap();
        assert!(hash.starts_with("$2a$04$"));
        assert_eq!(hash.len(), 60);
        assert!(crypt.verify(&hash, "testpass"));
        assert!(!crypt.verify(&hash, "wrongpass"));
    }

    #[test]
    fn test_verifies_other_bcrypt_prefixes() {
        let crypt = Crypt::new();
        let hash = bcrypt::hash("testpass", 4).unwrap();
        assert!(hash.starts_with("$2b$04$"));
        assert!(crypt.verify(&hash, "testpass"));

        let legacy = hash.replacen("$2b$", "$2y$", 1);
        assert!(crypt.verify(&legacy, "testpass"));
    }

    #[test]
    fn test_salt_differs() {
        let crypt = Crypt::with_cost(4).unwrap();
        assert_ne!(crypt.hash("same").unwrap(), crypt.hash("same").unwrap());
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let crypt = Crypt::new();
        assert!(!crypt.verify("", "x"));
        assert!(!crypt.verify("plaintext", "plaintext"));
        assert!(!crypt.verify("$2a$99$AAAA", "x"));
        assert!(!crypt.verify("$s256$4$AAAA$AAAA", "x"));
    }

    #[test]
    fn test_random_values() {
        let crypt = Crypt::new();
        let token = crypt.session_token();
        assert_eq!(token.chars().count(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| TOKEN_ALPHABET.contains(c)));

        let password = crypt.random_password();
        assert_eq!(password.len(), PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_cost_bounds() {
        assert_eq!(Crypt::new().cost(), DEFAULT_COST);
        assert!(Crypt::with_cost(3).is_err());
        assert!(Crypt::with_cost(32).is_err());
        assert_eq!(Crypt::with_cost(12).unwrap().cost(), 12);
    }
}
