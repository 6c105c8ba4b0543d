use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Well-known files inside the data directory.
pub mod files {
    pub const SOURCES: &str = "urls-daily.txt";
    pub const BLACKLIST_AUTO: &str = "blacklist/blacklist_auto.txt";
    pub const BLACKLIST_MANUAL: &str = "blacklist/blacklist_manual.txt";
    pub const WHITELIST_AUTO: &str = "blacklist/whitelist_auto.txt";
    pub const CORRECTIONS: &str = "corrections_name.txt";
    pub const LOGOS: &str = "logo.txt";
    pub const DAILY_PICKS: &str = "今日推荐.txt";
    pub const DAILY_PUSH: &str = "今日推台.txt";
    pub const MANUAL_GAT_PREAMBLE: &str = "手工区/♪港澳台.txt";
    pub const MANUAL_QUALITY_CCTV: &str = "手工区/♪优质央视.txt";
    pub const MANUAL_QUALITY_WS: &str = "手工区/♪优质卫视.txt";
    pub const MANUAL_ABOUT: &str = "手工区/about.txt";
    pub const FALLBACK_LOCAL: &str = "手工区/AKTV.txt";
}

/// Curated per-bucket line files appended after remote classification.
pub const MANUAL_BUCKET_FILES: &[(&str, &str)] = &[
    ("zj", "手工区/浙江频道.txt"),
    ("hb", "手工区/湖北频道.txt"),
    ("gd", "手工区/广东频道.txt"),
    ("sh", "手工区/上海频道.txt"),
    ("jsu", "手工区/江苏频道.txt"),
];

fn default_timeout_secs() -> u64 {
    8
}

fn default_retries() -> u32 {
    2
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_concurrency() -> usize {
    5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

/// HTTP behavior for source fetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            backoff_ms: default_backoff_ms(),
            concurrency: default_concurrency(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_whitelist_threshold_ms() -> f64 {
    2000.0
}

fn default_epg_url() -> String {
    "https://live.fanmingming.cn/e.xml".to_string()
}

fn default_removal_list() -> Vec<String> {
    [
        "_电信", "电信", "高清", "频道", "（HD）", "-HD", "英陆", "_ITV", "(北美)", "(HK)",
        "AKtv", "「IPV4」", "「IPV6」", "频陆", "备陆", "壹陆", "贰陆", "叁陆", "肆陆", "伍陆",
        "陆陆", "柒陆", "频晴", "频粤", "[超清]", "超清", "标清", "斯特", "粤陆", "国陆",
        "肆柒", "频英", "频特", "频国", "频壹", "频贰", "肆贰", "频测", "咪咕", "闽特",
        "高特", "频高", "频标", "汝阳",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Run configuration, loaded from an optional JSON file.
/// Missing fields fall back to defaults matching the conventional layout
/// (`data/` dictionaries, `output/` artifacts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Premium source fetched with retries; its lines are appended verbatim
    /// to the 港澳台 and 澳门 output sections.
    #[serde(default)]
    pub fallback_url: Option<String>,
    #[serde(default = "default_whitelist_threshold_ms")]
    pub whitelist_threshold_ms: f64,
    #[serde(default = "default_epg_url")]
    pub epg_url: String,
    /// Also strip a leading "BD"/"HD" from channel names. Off by default.
    #[serde(default)]
    pub strip_leading_quality: bool,
    /// Noise substrings removed from channel names, in order.
    #[serde(default = "default_removal_list")]
    pub removal_list: Vec<String>,
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            fallback_url: None,
            whitelist_threshold_ms: default_whitelist_threshold_ms(),
            epg_url: default_epg_url(),
            strip_leading_quality: false,
            removal_list: default_removal_list(),
            fetch: FetchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file; a missing path yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                let config: AppConfig = serde_json::from_str(&content)
                    .with_context(|| format!("parsing config file {}", path.display()))?;
                Ok(config)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Resolve a data file path relative to the data directory.
    pub fn data_path(&self, rel: &str) -> PathBuf {
        self.data_dir.join(rel)
    }

    /// Resolve an output file path relative to the output directory.
    pub fn output_path(&self, rel: &str) -> PathBuf {
        self.output_dir.join(rel)
    }
}
