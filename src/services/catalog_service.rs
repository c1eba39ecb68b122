//! JSON 目录服务 - 业务能力层
//!
//! 唯一持有 JSON 目录内存态的模块，提供三种能力：
//! - `load`: 从磁盘读取目录（每个批次开始前都重新读取，避免使用过期状态）
//! - `apply`: 把一个 ImageDescriptor 以添加/移除方式套用到目录上
//! - `save`: 把完整目录写回磁盘（先写临时文件再改名）
//!
//! 记录以 serde_json::Value 形式保存，未知字段和字段顺序
//! 在读写往返中原样保留（serde_json 开启 preserve_order）

use crate::error::{AppError, AppResult, ApplyError};
use crate::models::{ImageCategory, ImageDescriptor};
use regex::Regex;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::fs;

/// 套用方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// 添加（重复则拒绝）
    Add,
    /// 移除（不存在则拒绝）
    Remove,
}

/// 目录加载结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 加载成功，附带记录条数
    Loaded { records: usize },
    /// 文件不存在，以空目录继续（软性警告，不中止批次）
    FileMissing,
}

/// JSON 目录服务
pub struct CatalogService {
    json_path: PathBuf,
    records: Vec<Value>,
}

impl CatalogService {
    /// 创建新的目录服务
    ///
    /// 目录文件路径由配置显式传入，不使用全局常量
    pub fn new(json_path: impl Into<PathBuf>) -> Self {
        Self {
            json_path: json_path.into(),
            records: Vec::new(),
        }
    }

    /// 目录文件路径
    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    /// 当前内存中的全部记录
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// 查看某道题某个分类的图片列表（主要用于测试和详细日志）
    pub fn image_list(&self, question_id: i64, category: ImageCategory) -> Option<&Vec<Value>> {
        self.records
            .iter()
            .filter_map(Value::as_object)
            .find(|obj| obj.get("id").and_then(Value::as_i64) == Some(question_id))?
            .get(category.field_name())?
            .as_array()
    }

    /// 从磁盘加载目录
    ///
    /// # 返回
    /// - 文件不存在 → `LoadOutcome::FileMissing`，目录为空（调用方可警告后继续）
    /// - JSON 不合法 → `CatalogError::DecodeFailed`，目录为空（批次必须中止）
    pub async fn load(&mut self) -> AppResult<LoadOutcome> {
        self.records.clear();

        if !self.json_path.exists() {
            return Ok(LoadOutcome::FileMissing);
        }

        let content = fs::read_to_string(&self.json_path)
            .await
            .map_err(|e| AppError::read_failed(&self.json_path, e))?;

        // 顶层必须是记录数组
        let records: Vec<Value> = serde_json::from_str(&content)
            .map_err(|e| AppError::decode_failed(&self.json_path, e))?;

        let count = records.len();
        self.records = records;
        Ok(LoadOutcome::Loaded { records: count })
    }

    /// 把一个图片描述符套用到目录上
    ///
    /// # 参数
    /// - `descriptor`: 解析后的图片描述符
    /// - `mode`: 添加或移除
    /// - `dry_run`: 试演模式，只检查不改动列表
    ///
    /// # 返回
    /// 成功返回可读的结果描述；失败只影响当前这一个图片名
    pub fn apply(
        &mut self,
        descriptor: &ImageDescriptor,
        mode: ApplyMode,
        dry_run: bool,
    ) -> AppResult<String> {
        let question_id = descriptor.question_id;
        let name = descriptor.full_name.as_str();
        let field = descriptor.category.field_name();

        // 线性查找目标记录（首个 id 匹配的记录生效，绝不自动创建）
        let record = self
            .records
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|obj| obj.get("id").and_then(Value::as_i64) == Some(question_id))
            .ok_or(ApplyError::RecordNotFound { question_id })?;

        // 分类列表缺失时先补一个空数组
        let list = record
            .entry(field)
            .or_insert_with(|| Value::Array(Vec::new()));
        let list = list
            .as_array_mut()
            .ok_or_else(|| AppError::Other(format!("题目 ID {} 的字段 {} 不是数组", question_id, field)))?;

        let position = list.iter().position(|v| v.as_str() == Some(name));

        match mode {
            ApplyMode::Remove => {
                let pos = position.ok_or(ApplyError::EntryNotPresent {
                    name: name.to_string(),
                    question_id,
                })?;
                if !dry_run {
                    list.remove(pos);
                }
                Ok(format!(
                    "已从题目 ID {} ({}) 移除 {}",
                    question_id, descriptor.category, name
                ))
            }
            ApplyMode::Add => {
                if position.is_some() {
                    return Err(ApplyError::DuplicateEntry {
                        name: name.to_string(),
                        question_id,
                    }
                    .into());
                }
                if !dry_run {
                    list.push(Value::String(name.to_string()));
                    sort_by_sequence(list);
                }
                Ok(format!(
                    "已将 {} 添加到题目 ID {} ({})",
                    name, question_id, descriptor.category
                ))
            }
        }
    }

    /// 把完整目录写回磁盘
    ///
    /// 使用 4 空格缩进，保持字段顺序，非 ASCII 字符不转义。
    /// 先写临时文件再改名，写失败不会截断原文件。
    pub async fn save(&self) -> AppResult<()> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = Serializer::with_formatter(&mut buf, formatter);
        self.records
            .serialize(&mut ser)
            .map_err(|e| AppError::write_failed(&self.json_path, e))?;
        buf.push(b'\n');

        let tmp_path = self.json_path.with_extension("json.tmp");
        fs::write(&tmp_path, &buf)
            .await
            .map_err(|e| AppError::write_failed(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.json_path)
            .await
            .map_err(|e| AppError::write_failed(&self.json_path, e))?;

        Ok(())
    }
}

/// 按尾部序号升序稳定排序
///
/// 序号取自去扩展名后的 `_数字` 结尾（如 `34_qu_2.png` → 2），
/// 没有尾部数字的元素按 0 处理，相同序号保持原有相对顺序
fn sort_by_sequence(list: &mut Vec<Value>) {
    list.sort_by_key(|v| sequence_key(v.as_str().unwrap_or("")));
}

fn sequence_key(name: &str) -> u64 {
    // 固定模式只编译一次
    static SEQUENCE_RE: OnceLock<Regex> = OnceLock::new();
    let re = SEQUENCE_RE.get_or_init(|| Regex::new(r"_(\d+)$").expect("固定正则必定合法"));

    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    re.captures(stem)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
