use std::fmt;

/// 运行级错误：出现即中止本次同步
///
/// 行级与季度级的问题见 [`ReconcileError`]，它们只进入报告。
#[derive(Debug)]
pub enum AppError {
    /// 追番服务或投票表的远程调用
    Api(ApiError),
    /// 配置文件与报告文件
    File(FileError),
    Config(ConfigError),
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Api(e) => write!(f, "远程服务: {}", e),
            AppError::File(e) => write!(f, "本地文件: {}", e),
            AppError::Config(e) => write!(f, "配置无效: {}", e),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Api(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 追番服务与投票表的调用错误，`endpoint` 是请求的地址或接口名
#[derive(Debug)]
pub enum ApiError {
    /// 请求没有发出去或连接中断
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务返回了非 2xx 状态码
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 搜索或列表接口没有给出任何条目
    EmptyResponse { endpoint: String },
    /// 响应体不是预期的结构
    JsonParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RequestFailed { endpoint, source } => {
                write!(f, "{} 无法访问: {}", endpoint, source)
            }
            ApiError::BadResponse {
                endpoint,
                status,
                message,
            } => {
                write!(f, "{} 返回 HTTP {}", endpoint, status)?;
                if let Some(message) = message {
                    write!(f, ": {}", message)?;
                }
                Ok(())
            }
            ApiError::EmptyResponse { endpoint } => {
                write!(f, "{} 没有返回任何条目", endpoint)
            }
            ApiError::JsonParseFailed { source } => {
                write!(f, "响应结构无法识别: {}", source)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::RequestFailed { source, .. } | ApiError::JsonParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 本地文件错误：读取配置或写出报告
#[derive(Debug)]
pub enum FileError {
    /// 配置文件无法读取
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 报告或 logs 目录无法写入
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 配置文件不是合法的 TOML
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::ReadFailed { path, source } => {
                write!(f, "无法读取配置 {}: {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "无法写出报告 {}: {}", path, source)
            }
            FileError::TomlParseFailed { path, source } => {
                write!(f, "配置 {} 格式有误: {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. }
            | FileError::WriteFailed { source, .. }
            | FileError::TomlParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 季度名称无法识别
    InvalidSeasonName { name: String },
    /// 既没有配置季度，投票表里也没有季度工作表
    NoSeasons,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
            ConfigError::InvalidSeasonName { name } => {
                write!(f, "无法识别的季度名称: '{}' (应为 'WINTER 2014' 的形式)", name)
            }
            ConfigError::NoSeasons => write!(f, "没有配置季度，投票表中也找不到季度工作表"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// 对账过程中的行级 / 季度级错误
///
/// 这些错误不会中断整个运行，只会记录到 errors 报告中。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("追番服务中找不到标题: {title}")]
    UnresolvedTitle { title: String },

    #[error("该行没有任何投票格")]
    MissingVoteCell,

    #[error("第 {index} 列的投票格无法解析: '{cell}'")]
    MalformedVoteCell { index: usize, cell: String },

    #[error("载荷与记录的 id 不一致 (载荷: {payload_id}, 记录: {record_id})")]
    IdMismatch { payload_id: u32, record_id: u32 },

    #[error("季度开始日期无法解析: '{raw}'")]
    MalformedStartDate { raw: String },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.path().to_string())
            .unwrap_or_default();
        AppError::Api(ApiError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 请求未能送达追番服务或投票表
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 远程服务返回非 2xx，`message` 为响应正文（可能为空）
    pub fn api_bad_response(
        endpoint: impl Into<String>,
        status: u16,
        message: Option<String>,
    ) -> Self {
        AppError::Api(ApiError::BadResponse {
            endpoint: endpoint.into(),
            status,
            message,
        })
    }

    /// 配置文件读取失败
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 报告写出失败
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 配置文件解析失败
    pub fn toml_parse_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

pub type AppResult<T> = Result<T, AppError>;
