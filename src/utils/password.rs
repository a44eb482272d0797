use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;

use crate::config::{AppConfig, Argon2Config};
use crate::errors::SchoolHubError;

const GENERATED_PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

fn argon2_with(params: &Argon2Config) -> Result<Argon2<'static>, SchoolHubError> {
    let params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        None,
    )
    .map_err(|e| SchoolHubError::validation(format!("Invalid argon2 parameters: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// 使用指定参数哈希密码
pub fn hash_password_with(password: &str, params: &Argon2Config) -> Result<String, SchoolHubError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2_with(params)?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SchoolHubError::validation(format!("Password hashing failed: {e}")))
}

/// 使用全局配置哈希密码
pub fn hash_password(password: &str) -> Result<String, SchoolHubError> {
    hash_password_with(password, &AppConfig::get().argon2)
}

/// 校验密码，参数取自哈希串本身
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// 随机生成满足密码策略的初始密码
pub fn generate_password(len: usize) -> String {
    let len = len.max(8);
    let mut rng = rand::rng();
    loop {
        let candidate: String = (0..len)
            .map(|_| {
                let idx = rng.random_range(0..GENERATED_PASSWORD_CHARSET.len());
                GENERATED_PASSWORD_CHARSET[idx] as char
            })
            .collect();
        if crate::utils::validate::validate_password(&candidate).is_valid {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_params() -> Argon2Config {
        Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_with("Cartable2024", &light_params()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Cartable2024", &hash));
        assert!(!verify_password("cartable2024", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("whatever", "not-a-hash"));
    }

    #[test]
    fn test_invalid_params_are_reported() {
        let params = Argon2Config {
            memory_cost: 1,
            time_cost: 0,
            parallelism: 0,
        };
        assert!(hash_password_with("Cartable2024", &params).is_err());
    }

    #[test]
    fn test_generated_password_passes_policy() {
        for _ in 0..10 {
            let password = generate_password(12);
            assert_eq!(password.len(), 12);
            assert!(crate::utils::validate::validate_password(&password).is_valid);
        }
    }
}
