use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 允许带重音的字母、空格、连字符与撇号
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}][\p{L}\s'\-]*$").expect("Invalid name regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 .\-]{6,20}$").expect("Invalid phone regex"));

const MAX_NAME_LEN: usize = 64;

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 姓 / 名
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name must not be empty");
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err("Name must be at most 64 characters");
    }
    if !NAME_RE.is_match(name) {
        return Err("Name must contain only letters, spaces, hyphens or apostrophes");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone.trim()) {
        return Err("Phone number format is invalid");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 密码策略：至少 8 位，同时包含大写、小写字母和数字，且不在常见弱密码表中
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    const WEAK: [&str; 8] = [
        "password1",
        "azerty123",
        "qwerty123",
        "admin1234",
        "ecole2024",
        "bonjour1",
        "abcd1234",
        "motdepasse1",
    ];
    if WEAK.iter().any(|weak| password.eq_ignore_ascii_case(weak)) {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("famille.haddad@example.com").is_ok());
        assert!(validate_email("prof+arabe@ecole.fr").is_ok());
        assert!(validate_email("no-at-sign.example.com").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_names() {
        assert!(validate_name("Yasmine").is_ok());
        assert!(validate_name("Aït-Ben Hadj").is_ok());
        assert!(validate_name("N'Diaye").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("R2D2").is_err());
        assert!(validate_name(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("+33 6 12 34 56 78").is_ok());
        assert!(validate_phone("06.12.34.56.78").is_ok());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("Cartable2024").is_valid);
        assert!(validate_password("Tableau9Noir").is_valid);
    }

    #[test]
    fn test_password_rules_reported_together() {
        let result = validate_password("abc");
        assert!(!result.is_valid);
        assert!(result.errors.contains(&"Password must be at least 8 characters long"));
        assert!(result.errors.contains(&"Password must contain at least one uppercase letter"));
        assert!(result.errors.contains(&"Password must contain at least one digit"));
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Azerty123");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
        assert!(validate_password_simple("Azerty123").is_err());
    }
}
