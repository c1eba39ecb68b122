//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量图片处理器
//! - 管理应用生命周期（初始化、运行）
//! - 收集待处理图片名（命令行参数或目录扫描）
//! - 管理 JSON 目录资源（load 一次 → 逐个套用 → save 最多一次）
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<图片名>)
//!     ↓
//! workflow::ImageFlow (处理单张图片)
//!     ↓
//! services (能力层：parse / catalog / validate / report)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有 CatalogService
//! 2. **向下依赖**：编排层 → workflow → services
//! 3. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_processor;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
