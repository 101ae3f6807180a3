use crate::quadtree::{PRQuadTree, QuadTreeError, Region};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// prquad 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrquadConfig {
    /// 四叉树参数
    #[serde(default)]
    pub tree: TreeConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 四叉树参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// 索引空间边长指数 k
    #[serde(default = "default_resolution")]
    pub resolution: u32,

    /// 分桶参数 b
    #[serde(default = "default_bucket_size")]
    pub bucket_size: usize,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 日志输出：stdout, file
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志文件路径（当 output = file 时）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// 默认值函数
// ============================================================================

fn default_resolution() -> u32 {
    10
}

fn default_bucket_size() -> usize {
    PRQuadTree::DEFAULT_BUCKET_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stdout".to_string()
}

// ============================================================================
// 实现
// ============================================================================

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            bucket_size: default_bucket_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: default_log_output(),
            log_file: None,
        }
    }
}

impl Default for PrquadConfig {
    fn default() -> Self {
        Self {
            tree: TreeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PrquadConfig {
    /// 从文件加载配置
    ///
    /// 配置加载顺序（优先级从低到高）：
    /// 1. 默认配置（内嵌的 default.toml）
    /// 2. 用户配置文件（可选）
    /// 3. 环境变量（PRQUAD__ 前缀，使用双下划线分隔嵌套）
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use prquad::config::PrquadConfig;
    ///
    /// // 加载配置（如果文件不存在，使用默认配置）
    /// let config = PrquadConfig::from_file("prquad.toml").unwrap();
    /// ```
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            // 1. 加载默认配置（内嵌）
            .add_source(config::File::from_str(
                include_str!("default.toml"),
                config::FileFormat::Toml,
            ))
            // 2. 加载用户配置（可选，不存在不报错）
            .add_source(config::File::with_name(path).required(false))
            // 3. 加载环境变量（PRQUAD__ 前缀，双下划线分隔嵌套）
            .add_source(config::Environment::with_prefix("PRQUAD").separator("__"))
            .build()
            .map_err(|e| format!("Failed to load config: {}", e))?;

        Ok(settings
            .try_deserialize()
            .map_err(|e| format!("Failed to parse config: {}", e))?)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, toml_string)
            .map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// 验证配置
    ///
    /// 检查分桶参数、边长指数、日志级别和日志文件配置
    pub fn validate(&self) -> Result<(), String> {
        if self.tree.bucket_size == 0 {
            return Err(QuadTreeError::InvalidBucketSize.to_string());
        }

        if self.tree.resolution > Region::MAX_K {
            return Err(QuadTreeError::InvalidResolution {
                k: self.tree.resolution,
                max: Region::MAX_K,
            }
            .to_string());
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ))
            }
        }

        match self.logging.output.as_str() {
            "stdout" => {}
            "file" => {
                if self.logging.log_file.is_none() {
                    return Err(
                        "Log output is 'file' but log_file path is not specified".to_string()
                    );
                }
            }
            _ => {
                return Err(format!(
                    "Invalid log output: '{}'. Must be one of: stdout, file",
                    self.logging.output
                ))
            }
        }

        Ok(())
    }

    /// 按配置创建一棵空树
    pub fn build_tree(&self) -> Result<PRQuadTree, QuadTreeError> {
        PRQuadTree::new(self.tree.resolution, self.tree.bucket_size)
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        let side = 1u64 << self.tree.resolution.min(Region::MAX_K);
        println!("📋 prquad Configuration:");
        println!(
            "   Resolution:  k = {} ({} x {})",
            self.tree.resolution, side, side
        );
        println!("   Bucket Size: {}", self.tree.bucket_size);
        println!();
        println!("   Log Level:   {}", self.logging.level);
        println!("   Log Output:  {}", self.logging.output);
        if let Some(ref log_file) = self.logging.log_file {
            println!("   Log File:    {}", log_file.display());
        }
        println!();
    }
}
