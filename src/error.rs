use std::fmt;
use std::path::PathBuf;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 文件名解析错误
    Parse(ParseError),
    /// 目录更新错误
    Apply(ApplyError),
    /// JSON 目录文件错误
    Catalog(CatalogError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Parse(e) => write!(f, "解析错误: {}", e),
            AppError::Apply(e) => write!(f, "更新错误: {}", e),
            AppError::Catalog(e) => write!(f, "目录文件错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Parse(e) => Some(e),
            AppError::Apply(e) => Some(e),
            AppError::Catalog(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 文件名解析错误
///
/// 每个错误只影响当前这一个文件名，批量处理会继续处理下一个
#[derive(Debug)]
pub enum ParseError {
    /// 格式不合法（至少需要 ID_类型 两段）
    InvalidFormat { name: String },
    /// 题目 ID 段不合法
    InvalidIdentifier { token: String },
    /// 未知的图片类型码
    UnknownTypeCode { code: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidFormat { name } => {
                write!(f, "文件名格式不合法（至少需要 ID_类型）: {}", name)
            }
            ParseError::InvalidIdentifier { token } => {
                write!(f, "题目 ID 格式不合法: {}", token)
            }
            ParseError::UnknownTypeCode { code } => {
                write!(f, "未知的图片类型码: {}", code)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// 目录更新错误
#[derive(Debug)]
pub enum ApplyError {
    /// 题目 ID 在目录中不存在（不会自动创建记录）
    RecordNotFound { question_id: i64 },
    /// 图片名已存在于目标列表
    DuplicateEntry { name: String, question_id: i64 },
    /// 要移除的图片名不在目标列表中
    EntryNotPresent { name: String, question_id: i64 },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyError::RecordNotFound { question_id } => {
                write!(f, "题目 ID {} 在 JSON 目录中不存在", question_id)
            }
            ApplyError::DuplicateEntry { name, question_id } => {
                write!(f, "重复: {} 已存在于题目 ID {}", name, question_id)
            }
            ApplyError::EntryNotPresent { name, question_id } => {
                write!(f, "{} 不在题目 ID {} 的列表中", name, question_id)
            }
        }
    }
}

impl std::error::Error for ApplyError {}

/// JSON 目录文件错误
#[derive(Debug)]
pub enum CatalogError {
    /// 读取文件失败
    ReadFailed {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// JSON 解析失败（批量处理必须中止，内存状态不可信）
    DecodeFailed {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::ReadFailed { path, source } => {
                write!(f, "读取 JSON 文件失败 ({}): {}", path.display(), source)
            }
            CatalogError::DecodeFailed { path, source } => {
                write!(f, "JSON 解析失败 ({}): {}", path.display(), source)
            }
            CatalogError::WriteFailed { path, source } => {
                write!(f, "写入 JSON 文件失败 ({}): {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::ReadFailed { source, .. }
            | CatalogError::DecodeFailed { source, .. }
            | CatalogError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

// ========== 从子错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::Parse(err)
    }
}

impl From<ApplyError> for AppError {
    fn from(err: ApplyError) -> Self {
        AppError::Apply(err)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::Catalog(err)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建读取失败错误
    pub fn read_failed(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Catalog(CatalogError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建解析失败错误
    pub fn decode_failed(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Catalog(CatalogError::DecodeFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建写入失败错误
    pub fn write_failed(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Catalog(CatalogError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
