//! 文件名解析服务 - 业务能力层
//!
//! 只负责"把原始文件名解析成 ImageDescriptor"能力，不持有任何状态
//!
//! 命名约定：`[q]ID_类型[_序号].扩展名`
//! - `q34_qu_1.png` → ID=34, 类型=qu, 序号=1
//! - `34_qu_1.png`  → ID=34, 类型=qu, 序号=1
//! - `38_soD.png`   → ID=38, 类型=soD, 序号=0

use crate::error::{AppResult, ParseError};
use crate::models::{ImageCategory, ImageDescriptor};
use std::path::Path;

/// 文件名解析服务
#[derive(Debug, Default)]
pub struct NameParser;

impl NameParser {
    /// 创建新的解析服务
    pub fn new() -> Self {
        Self
    }

    /// 解析单个图片文件名
    ///
    /// # 参数
    /// - `full_name`: 原始文件名（含扩展名）
    ///
    /// # 返回
    /// 解析成功返回 ImageDescriptor；失败只影响当前文件名
    pub fn parse(&self, full_name: &str) -> AppResult<ImageDescriptor> {
        // 去掉扩展名后按下划线切分
        let base_name = Path::new(full_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(full_name);
        let parts: Vec<&str> = base_name.split('_').collect();

        if parts.len() < 2 {
            return Err(ParseError::InvalidFormat {
                name: full_name.to_string(),
            }
            .into());
        }

        // 1. 解析题目 ID（可带单个 q/Q 前缀）
        let id_token = parts[0];
        let question_id = match id_token.strip_prefix('q').or_else(|| id_token.strip_prefix('Q')) {
            Some(rest) => parse_digits(rest),
            None => parse_digits(id_token),
        }
        .ok_or_else(|| ParseError::InvalidIdentifier {
            token: id_token.to_string(),
        })?;

        // 2. 类型码保持原样
        let type_code = parts[1].to_string();

        // 3. 第三段若为纯数字则作为序号，否则默认 0（后续段一律忽略）
        let sequence = parts
            .get(2)
            .and_then(|p| parse_digits(p))
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0);

        // 4. 由类型码确定分类
        let category = ImageCategory::from_type_code(&type_code).ok_or_else(|| {
            ParseError::UnknownTypeCode {
                code: type_code.clone(),
            }
        })?;

        Ok(ImageDescriptor {
            full_name: full_name.to_string(),
            question_id,
            type_code,
            category,
            sequence,
        })
    }
}

/// 纯数字字符串解析，空串或含非数字字符返回 None
fn parse_digits(s: &str) -> Option<i64> {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}
