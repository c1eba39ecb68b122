/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// JSON 目录文件路径
    pub json_file_path: String,
    /// 图片所在目录（为空则跳过存在性校验，批量模式不可用）
    pub image_folder: String,
    /// 试演模式（只报告，不写入任何文件）
    pub dry_run: bool,
    /// 移除模式（删除而不是添加）
    pub remove_mode: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出报告文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            json_file_path: "data/Error_Analysis.json".to_string(),
            image_folder: String::new(),
            dry_run: false,
            remove_mode: false,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            json_file_path: std::env::var("JSON_FILE_PATH").unwrap_or(default.json_file_path),
            image_folder: std::env::var("IMAGE_FOLDER").unwrap_or(default.image_folder),
            dry_run: std::env::var("DRY_RUN").ok().and_then(|v| v.parse().ok()).unwrap_or(default.dry_run),
            remove_mode: std::env::var("REMOVE_MODE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.remove_mode),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
