//! # Auto Image Mapper
//!
//! 一个把图片文件名自动映射进题目 JSON 目录的 Rust 工具
//!
//! 文件名约定 `[q]ID_类型[_序号].扩展名`（如 `q34_qu_1.png`、`38_soD.png`），
//! 解析后按分类写入对应题目记录的 `question_images` / `solution_images` /
//! `option_images` 列表，保持按尾部序号升序，拒绝重复，支持试演和移除模式。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 纯数据类型
//! - `ImageCategory` - 图片分类（题干/解析/选项），由类型码前缀确定
//! - `ImageDescriptor` - 文件名解析结果，解析后不可变
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单张图片
//! - `NameParser` - 文件名解析能力
//! - `CatalogService` - JSON 目录的 load / apply / save 能力
//! - `FolderValidator` - 图片文件存在性校验能力
//! - `ReportWriter` - 写结果报告能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张图片"的完整处理流程
//! - `ImageCtx` - 上下文封装（批次索引 + 模式开关）
//! - `ImageFlow` - 流程编排（校验 → 解析 → 套用 → 报告）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理器，管理目录生命周期和统计
//!
//! ## 批次语义
//!
//! 每个批次：load 一次（总是重新读取磁盘）→ 逐个图片名 parse+apply →
//! 有改动且非试演时 save 最多一次。单张图片的失败只计入统计，不中止批次。

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ApplyError, CatalogError, ParseError};
pub use models::{ImageCategory, ImageDescriptor};
pub use orchestrator::{App, ProcessingStats};
pub use services::{ApplyMode, CatalogService, FolderValidator, LoadOutcome, NameParser};
pub use workflow::{FlowResult, ImageCtx, ImageFlow};
