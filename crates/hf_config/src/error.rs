// crates/hf_config/src/error.rs

//! 配置错误类型

use thiserror::Error;

/// 配置层错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO 错误（读取配置文件失败）
    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 解析错误
    #[error("配置解析错误: {0}")]
    Parse(String),

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidValue {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },

    /// 缺少必需的配置段
    #[error("缺少必需的配置段: {section}")]
    MissingSection {
        /// 配置段名
        section: String,
    },
}

impl ConfigError {
    /// 配置值无效
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// 缺少配置段
    pub fn missing_section(section: impl Into<String>) -> Self {
        Self::MissingSection {
            section: section.into(),
        }
    }
}
