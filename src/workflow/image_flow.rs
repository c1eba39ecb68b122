//! 图片处理流程 - 流程层
//!
//! 核心职责：定义"一张图片"的完整处理流程
//!
//! 流程顺序：
//! 1. 存在性校验（仅添加模式，且配置了图片目录时）
//! 2. 文件名解析 → ImageDescriptor
//! 3. 套用到 JSON 目录（添加/移除，支持试演）
//! 4. 结果写入报告
//!
//! 任何单张图片的失败都不会中止批次，流程只返回 Applied / Skipped

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::services::{ApplyMode, CatalogService, FolderValidator, NameParser, ReportWriter};
use crate::workflow::image_ctx::ImageCtx;

/// 图片处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowResult {
    /// 目录已更新（试演模式下表示"将会更新"）
    Applied,
    /// 跳过（校验失败、解析失败或套用失败）
    Skipped,
}

/// 图片处理流程
///
/// - 编排单张图片的完整处理流程
/// - 不持有目录内存态（CatalogService 由编排层传入）
/// - 只依赖业务能力（services）
pub struct ImageFlow {
    parser: NameParser,
    validator: FolderValidator,
    report_writer: ReportWriter,
    verbose_logging: bool,
}

impl ImageFlow {
    /// 创建新的图片处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            parser: NameParser::new(),
            validator: FolderValidator::new(&config.image_folder),
            report_writer: ReportWriter::with_path(config.output_log_file.clone()),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 处理单张图片
    ///
    /// # 参数
    /// - `catalog`: 目录服务（由编排层统一持有）
    /// - `image_name`: 原始图片文件名
    /// - `ctx`: 处理上下文
    ///
    /// # 返回
    /// 返回 Err 仅代表报告文件写入失败；图片本身的失败一律 Skipped
    pub async fn run(
        &self,
        catalog: &mut CatalogService,
        image_name: &str,
        ctx: &ImageCtx,
    ) -> Result<FlowResult> {
        // ========== 流程 1: 存在性校验（仅添加模式） ==========
        if !ctx.remove_mode && self.validator.is_enabled() && !self.validator.validate(image_name) {
            warn!("{} ⚠️ 未在图片目录中找到: {}", ctx, image_name);
            self.report_writer
                .write_line(&format!("SKIP: {} 文件不存在", image_name))
                .await?;
            return Ok(FlowResult::Skipped);
        }

        // ========== 流程 2: 解析文件名 ==========
        let descriptor = match self.parser.parse(image_name) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!("{} ⚠️ 解析失败: {} - {}", ctx, image_name, e);
                self.report_writer
                    .write_line(&format!("SKIP: {} - {}", image_name, e))
                    .await?;
                return Ok(FlowResult::Skipped);
            }
        };

        if self.verbose_logging {
            info!("{} 解析结果: {}", ctx, descriptor);
        }

        // ========== 流程 3: 套用到目录 ==========
        let mode = if ctx.remove_mode {
            ApplyMode::Remove
        } else {
            ApplyMode::Add
        };

        match catalog.apply(&descriptor, mode, ctx.dry_run) {
            Ok(summary) => {
                info!("{} ✓ {}", ctx, summary);
                self.report_writer
                    .write_line(&format!("OK: {}", summary))
                    .await?;
                Ok(FlowResult::Applied)
            }
            Err(e) => {
                warn!("{} ⚠️ {}", ctx, e);
                self.report_writer
                    .write_line(&format!("FAIL: {} - {}", image_name, e))
                    .await?;
                Ok(FlowResult::Skipped)
            }
        }
    }

    /// 报告写入服务（编排层写报告头时使用）
    pub fn report_writer(&self) -> &ReportWriter {
        &self.report_writer
    }
}
