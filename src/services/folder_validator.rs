//! 图片目录校验服务 - 业务能力层
//!
//! 只负责"某个图片文件是否真实存在于指定目录"能力。
//! 未配置目录时视为不校验（添加模式下的兜底由调用方决定）。

use std::path::PathBuf;

/// 图片目录校验服务
#[derive(Debug, Clone, Default)]
pub struct FolderValidator {
    folder: Option<PathBuf>,
}

impl FolderValidator {
    /// 创建新的校验服务，空字符串表示未配置目录
    pub fn new(folder: &str) -> Self {
        let folder = folder.trim();
        Self {
            folder: if folder.is_empty() {
                None
            } else {
                Some(PathBuf::from(folder))
            },
        }
    }

    /// 是否配置了图片目录
    pub fn is_enabled(&self) -> bool {
        self.folder.is_some()
    }

    /// 配置的图片目录
    pub fn folder(&self) -> Option<&PathBuf> {
        self.folder.as_ref()
    }

    /// 校验文件是否存在
    ///
    /// 未配置目录时返回 true（无法校验则放行）
    pub fn validate(&self, file_name: &str) -> bool {
        match &self.folder {
            Some(folder) => folder.join(file_name).exists(),
            None => true,
        }
    }
}
