use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 全部配置项，缺省的字段取默认值
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub rewrite: RewriteConfig,
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "relrewrite".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

/// 重写驱动配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RewriteConfig {
    /// 最多遍历计划的轮数，达到后即使没有到达不动点也停止
    pub max_iterations: usize,
    /// 规则触发出错时立即返回错误；关闭后记录日志并跳过该次触发
    pub fail_fast: bool,
    /// 不注册的规则名
    pub disabled_rules: Vec<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            fail_fast: true,
            disabled_rules: Vec::new(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config = toml::from_str(content)?;
        if config.rewrite.max_iterations == 0 {
            return Err("rewrite.max_iterations 必须大于 0".into());
        }
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.rewrite.max_iterations, 100);
        assert!(config.rewrite.fail_fast);
        assert!(config.rewrite.disabled_rules.is_empty());
    }

    #[test]
    fn test_config_load_save() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");

        let mut config = Config::default();
        config.rewrite.disabled_rules = vec!["CalcRemoveRule".to_string()];
        let toml_content =
            toml::to_string_pretty(&config).expect("Failed to serialize config to TOML");
        temp_file
            .write_all(toml_content.as_bytes())
            .expect("Failed to write TOML content to temporary file");

        let loaded_config =
            Config::load(temp_file.path()).expect("Failed to load config from temporary file");
        assert_eq!(config, loaded_config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [rewrite]
            fail_fast = false
            "#,
        )
        .expect("Failed to parse partial config");
        assert!(!config.rewrite.fail_fast);
        assert_eq!(config.rewrite.max_iterations, 100);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = Config::from_toml_str("[rewrite]\nmax_iterations = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().expect("Failed to create temporary dir");
        let path = dir.path().join("relrewrite.toml");
        let config = Config::default();
        config.save(&path).expect("Failed to save config");
        assert_eq!(Config::load(&path).expect("Failed to load config"), config);
    }
}
