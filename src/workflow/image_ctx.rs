//! 图片处理上下文
//!
//! 封装"我正在处理本批第几张图片、以什么模式处理"这一信息

use std::fmt::Display;

/// 图片处理上下文
#[derive(Debug, Clone)]
pub struct ImageCtx {
    /// 图片在本批中的索引（从1开始，仅用于日志显示）
    pub image_index: usize,

    /// 本批图片总数
    pub total: usize,

    /// 试演模式
    pub dry_run: bool,

    /// 移除模式
    pub remove_mode: bool,
}

impl ImageCtx {
    /// 创建新的图片上下文
    pub fn new(image_index: usize, total: usize, dry_run: bool, remove_mode: bool) -> Self {
        Self {
            image_index,
            total,
            dry_run,
            remove_mode,
        }
    }
}

impl Display for ImageCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[图片 {}/{}]", self.image_index, self.total)
    }
}
