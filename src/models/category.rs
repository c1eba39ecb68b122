/// 图片分类枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ImageCategory {
    /// 题干图片
    Question,
    /// 解析图片
    Solution,
    /// 选项图片
    Option,
}

impl ImageCategory {
    /// 获取 JSON 记录中对应的字段名
    pub fn field_name(self) -> &'static str {
        match self {
            ImageCategory::Question => "question_images",
            ImageCategory::Solution => "solution_images",
            ImageCategory::Option => "option_images",
        }
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            ImageCategory::Question => "题干图片",
            ImageCategory::Solution => "解析图片",
            ImageCategory::Option => "选项图片",
        }
    }

    /// 从类型码解析分类
    ///
    /// 规则：
    /// - `qu` 精确匹配 → 题干图片
    /// - `so` 开头（so、so1、soD 等）→ 解析图片
    /// - `op` 开头（op、op2 等）→ 选项图片
    ///
    /// 单独的 `s` 或 `o` 不做猜测，返回 None
    pub fn from_type_code(code: &str) -> Option<Self> {
        if code == "qu" {
            Some(ImageCategory::Question)
        } else if code.starts_with("so") {
            Some(ImageCategory::Solution)
        } else if code.starts_with("op") {
            Some(ImageCategory::Option)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
