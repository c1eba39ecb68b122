//! 批量图片处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量图片名的处理和目录生命周期管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写报告头、输出启动信息
//! 2. **批量收集**：命令行传入的图片名，或扫描图片目录（批量模式）
//! 3. **批次语义**：每批开始前重新加载 JSON 目录，逐个处理，最后按需保存
//! 4. **资源所有者**：唯一持有 CatalogService 的模块
//! 5. **全局统计**：汇总所有图片名的处理结果
//!
//! ## 设计特点
//!
//! - **一批最多一次读写**：load 在批次开头执行一次，save 在批次末尾最多执行一次
//! - **试演保护**：dry_run 时绝不调用 save
//! - **失败隔离**：单张图片的失败只计入统计，不中止批次
//! - **向下委托**：委托 workflow::ImageFlow 处理单张图片

use crate::config::Config;
use crate::services::{CatalogService, LoadOutcome};
use crate::workflow::{FlowResult, ImageCtx, ImageFlow};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, warn};

/// 批量模式可识别的图片扩展名
const VALID_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// 应用主结构
pub struct App {
    config: Config,
    catalog: CatalogService,
    flow: ImageFlow,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let catalog = CatalogService::new(&config.json_file_path);
        let flow = ImageFlow::new(&config);

        // 初始化报告文件
        flow.report_writer()
            .init()
            .await
            .with_context(|| format!("无法初始化报告文件: {}", config.output_log_file))?;

        log_startup(&config);

        // 启动时先检查目录文件，缺失只警告不中止
        if !catalog.json_path().exists() {
            warn!(
                "⚠️ JSON 目录文件不存在: {}，请先创建或检查路径",
                catalog.json_path().display()
            );
        }

        Ok(Self {
            config,
            catalog,
            flow,
        })
    }

    /// 运行应用主逻辑
    ///
    /// # 参数
    /// - `image_names`: 命令行传入的图片名；为空时进入批量模式扫描图片目录
    ///
    /// # 返回
    /// 返回本批次的处理统计
    pub async fn run(&mut self, image_names: Vec<String>) -> Result<ProcessingStats> {
        let names = if image_names.is_empty() {
            self.scan_image_folder().await?
        } else {
            image_names
        };

        if names.is_empty() {
            warn!("⚠️ 没有待处理的图片，程序结束");
            return Ok(ProcessingStats::default());
        }

        // 处理整个批次
        let stats = self.process_batch(&names).await?;

        // 输出最终统计
        print_final_stats(&stats, &self.config);

        Ok(stats)
    }

    /// 扫描图片目录（批量模式）
    async fn scan_image_folder(&self) -> Result<Vec<String>> {
        if self.config.image_folder.trim().is_empty() {
            warn!("⚠️ 未配置图片目录（IMAGE_FOLDER），批量模式不可用");
            return Ok(Vec::new());
        }

        let folder = PathBuf::from(&self.config.image_folder);
        if !folder.exists() {
            anyhow::bail!("图片目录不存在: {}", self.config.image_folder);
        }

        info!("\n📁 正在扫描图片目录: {}", folder.display());

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&folder)
            .await
            .with_context(|| format!("无法读取图片目录: {}", self.config.image_folder))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|s| s.to_str())
                .map(|ext| VALID_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false);

            if is_image {
                if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                    names.push(name.to_string());
                }
            }
        }

        // 扫描顺序与平台相关，排序保证批次处理顺序稳定
        names.sort();

        info!("✓ 找到 {} 张待处理的图片", names.len());
        Ok(names)
    }

    /// 处理整个批次
    ///
    /// 批次语义：load 一次 → 逐个 parse+apply → 按需 save 最多一次
    async fn process_batch(&mut self, names: &[String]) -> Result<ProcessingStats> {
        // 0. 重新加载目录，避免使用过期的内存状态
        match self.catalog.load().await {
            Ok(LoadOutcome::Loaded { records }) => {
                info!("✓ JSON 目录加载成功，共 {} 条记录", records);
            }
            Ok(LoadOutcome::FileMissing) => {
                warn!(
                    "⚠️ JSON 目录文件不存在: {}，以空目录继续",
                    self.catalog.json_path().display()
                );
            }
            Err(e) => {
                // 目录内容不可信，整个批次中止
                return Err(e).context("JSON 目录加载失败，批次中止");
            }
        }

        let total = names.len();
        log_batch_start(total, &self.config);

        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        // 逐个处理，单张失败不中止
        for (idx, name) in names.iter().enumerate() {
            let ctx = ImageCtx::new(idx + 1, total, self.config.dry_run, self.config.remove_mode);

            match self.flow.run(&mut self.catalog, name, &ctx).await? {
                FlowResult::Applied => stats.success += 1,
                FlowResult::Skipped => stats.failed += 1,
            }
        }

        // 有改动且非试演时才写回
        if stats.success > 0 && !self.config.dry_run {
            self.catalog
                .save()
                .await
                .context("JSON 目录保存失败（内存改动未丢失，可重试保存）")?;
            info!("✅ JSON 已保存，共 {} 处改动", stats.success);
        } else if self.config.dry_run {
            info!("💡 试演完成，未写入任何文件");
        } else {
            info!("没有任何改动");
        }

        Ok(stats)
    }
}

/// 处理统计
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 图片映射模式");
    info!("📄 JSON 目录: {}", config.json_file_path);
    if config.dry_run {
        info!("💡 试演模式已开启（只报告，不写入）");
    }
    if config.remove_mode {
        info!("🗑️ 移除模式已开启（删除而不是添加）");
    }
    info!("{}", "=".repeat(60));
}

fn log_batch_start(total: usize, config: &Config) {
    let action = if config.remove_mode { "移除" } else { "添加" };
    let action = if config.dry_run {
        format!("试演{}", action)
    } else {
        action.to_string()
    };

    info!("\n{}", "=".repeat(60));
    info!("📦 开始{} {} 张图片", action, total);
    info!("{}", "=".repeat(60));
}

fn print_final_stats(stats: &ProcessingStats, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("❌ 失败/跳过: {}", stats.failed);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", config.output_log_file);
}
