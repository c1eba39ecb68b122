//! 图片名解析结果
//!
//! 封装"这张图片属于哪道题的哪个分类"这一信息

use crate::models::category::ImageCategory;
use std::fmt::Display;

/// 图片描述符
///
/// 由 NameParser 从原始文件名解析得到，解析后不再修改
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ImageDescriptor {
    /// 原始文件名（含扩展名，写入 JSON 时使用）
    pub full_name: String,

    /// 题目 ID
    pub question_id: i64,

    /// 原始类型码（qu / so / soD / op2 等，保持原样）
    pub type_code: String,

    /// 图片分类
    pub category: ImageCategory,

    /// 尾部序号（缺失时为 0）
    pub sequence: u32,
}

impl Display for ImageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[图片 {} → 题目 ID#{} 分类#{} 序号#{}]",
            self.full_name, self.question_id, self.category, self.sequence
        )
    }
}
