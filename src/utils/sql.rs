/// 转义 LIKE 模式中的通配符，配合 `ESCAPE '\'` 使用
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("ben"), "ben");
        assert_eq!(escape_like_pattern("50%_a\\b"), "50\\%\\_a\\\\b");
    }
}
