//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_schoolhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolHubError {
            $($variant(String),)*
        }

        impl SchoolHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_schoolhub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E006", "Validation Error"),
    NotFound("E007", "Resource Not Found"),
    Conflict("E008", "Resource Conflict"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    Io("E013", "IO Error"),
}

impl SchoolHubError {
    /// 是否为冲突类错误（唯一约束、重复记录）
    pub fn is_conflict(&self) -> bool {
        match self {
            SchoolHubError::Conflict(_) => true,
            SchoolHubError::DatabaseOperation(msg) => {
                msg.contains("UNIQUE constraint failed")
                    || msg.contains("duplicate key")
                    || msg.contains("Duplicate entry")
            }
            _ => false,
        }
    }
}

impl SchoolHubError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SchoolHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolHubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SchoolHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        SchoolHubError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SchoolHubError {
    fn from(err: std::io::Error) -> Self {
        SchoolHubError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolHubError {
    fn from(err: serde_json::Error) -> Self {
        SchoolHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SchoolHubError {
    fn from(err: chrono::ParseError) -> Self {
        SchoolHubError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolHubError::cache_connection("test").code(), "E001");
        assert_eq!(SchoolHubError::database_config("test").code(), "E003");
        assert_eq!(SchoolHubError::validation("test").code(), "E006");
        assert_eq!(SchoolHubError::conflict("test").code(), "E008");
        assert_eq!(SchoolHubError::authentication("test").code(), "E011");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolHubError::not_found("test").error_type(),
            "Resource Not Found"
        );
        assert_eq!(
            SchoolHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = SchoolHubError::validation("Invalid date");
        assert_eq!(err.message(), "Invalid date");
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolHubError::conflict("Attendance already taken");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Conflict"));
        assert!(formatted.contains("Attendance already taken"));
    }

    #[test]
    fn test_conflict_detection() {
        assert!(SchoolHubError::conflict("dup").is_conflict());
        assert!(
            SchoolHubError::database_operation("UNIQUE constraint failed: users.email")
                .is_conflict()
        );
        assert!(!SchoolHubError::database_operation("connection reset").is_conflict());
        assert!(!SchoolHubError::validation("UNIQUE constraint failed").is_conflict());
    }

    #[test]
    fn test_from_chrono_parse_error() {
        let parse_err = chrono::NaiveDate::parse_from_str("2024-13-01", "%Y-%m-%d").unwrap_err();
        let err: SchoolHubError = parse_err.into();
        assert_eq!(err.code(), "E010");
    }
}
