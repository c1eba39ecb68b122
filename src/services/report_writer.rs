//! 报告写入服务 - 业务能力层
//!
//! 只负责"把每个图片名的处理结果写进报告文件"能力，不关心流程

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 报告写入服务
///
/// 职责：
/// - 批次开始时写入带时间戳的报告头
/// - 逐行追加 OK / FAIL / SKIP 结果
/// - 不关心流程顺序
pub struct ReportWriter {
    report_file_path: String,
}

impl ReportWriter {
    /// 创建新的报告写入服务
    pub fn new() -> Self {
        Self {
            report_file_path: "output.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    /// 写入报告头（覆盖旧报告）
    pub async fn init(&self) -> Result<()> {
        let header = format!(
            "{}\n图片映射报告 - {}\n{}\n\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        tokio::fs::write(&self.report_file_path, header).await?;
        Ok(())
    }

    /// 追加一行处理结果
    ///
    /// # 参数
    /// - `line`: 结果行（如 `OK: 已将 34_qu_1.png 添加到题目 ID 34`）
    pub async fn write_line(&self, line: &str) -> Result<()> {
        debug!("写入报告: {}", line);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)?;

        let entry = format!(
            "[{}] {}\n",
            chrono::Local::now().format("%H:%M:%S"),
            line
        );
        file.write_all(entry.as_bytes())?;

        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
