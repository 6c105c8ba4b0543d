//! Playlist assembly and file writing.
//!
//! Three text variants are built from the finalized buckets: the full list
//! with one section per category, a lite list that collapses the provinces
//! and drops the themed sections, and a custom list in between. Each text
//! variant also gets an M3U rendering.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use tracing::info;

use crate::classify::category;

const LABEL_QUALITY_CCTV: &str = "✨优质央视";
const LABEL_QUALITY_WS: &str = "🛰️优质卫视";
const LABEL_UPDATED: &str = "🕒更新时间";

/// Province section order in the full variant. Display order is editorial
/// and intentionally different from classification priority.
const FULL_PROVINCE_ORDER: &[&str] = &[
    "hb", "hn", "zj", "gd", "jsu", "jx", "bj", "sh", "tj", "cq", "ah", "hain", "nm", "ln", "sx",
    "shandong", "shanxi", "yunnan", "fj", "gs", "gx", "gz", "heb", "hen", "jl", "nx", "qh", "sc",
    "xj", "hlj",
];

/// Provinces that keep dictionary order inside the collapsed 地方频道
/// section of the lite/custom variants.
const COLLAPSED_DICTIONARY_ORDER: &[&str] = &["hb", "hn", "zj", "gd", "shandong"];

/// Provinces appended lexicographically after them. 上海 is deliberately
/// absent from the collapsed section.
const COLLAPSED_LEXICOGRAPHIC_ORDER: &[&str] = &[
    "jsu", "ah", "hain", "nm", "ln", "sx", "shanxi", "yunnan", "bj", "cq", "fj", "gs", "gx", "gz",
    "heb", "hen", "jl", "jx", "nx", "qh", "sc", "tj", "xj", "hlj",
];

/// Themed section order after the provinces in the full/custom variants.
const THEME_ORDER: &[&str] = &[
    "sz", "gj", "ty", "tyss", "douyu", "huya", "js", "dy", "dsj", "jlp", "dhp", "radio", "gat",
    "xg", "aomen", "tw", "xq", "yy", "zy", "game",
];

/// Everything the variant builders need besides the finalized buckets.
pub struct OutputSources {
    /// Finalized (corrected, deduped, ordered) lines per category id
    pub finalized: HashMap<&'static str, Vec<String>>,
    /// Premium-source lines appended to the 港澳台 and 澳门 sections
    pub fallback_lines: Vec<String>,
    /// Curated lines ahead of the 港澳台 bucket
    pub gat_preamble: Vec<String>,
    pub quality_cctv: Vec<String>,
    pub quality_ws: Vec<String>,
    /// Update-time section body (timestamp, daily picks, about lines)
    pub epilogue: Vec<String>,
}

impl OutputSources {
    fn lines(&self, id: &str) -> &[String] {
        self.finalized.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn collapsed_provinces(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for id in COLLAPSED_DICTIONARY_ORDER {
            lines.extend(self.lines(id).iter().cloned());
        }
        for id in COLLAPSED_LEXICOGRAPHIC_ORDER {
            let mut bucket: Vec<String> = self.lines(id).to_vec();
            bucket.sort();
            lines.extend(bucket);
        }
        lines
    }
}

fn push_section(out: &mut Vec<String>, label: &str, lines: &[String]) {
    out.push(format!("{},#genre#", label));
    out.extend(lines.iter().cloned());
    out.push(String::new());
}

fn label_of(id: &str) -> &'static str {
    category(id).map(|c| c.label).unwrap_or("")
}

fn push_theme_sections(out: &mut Vec<String>, sources: &OutputSources) {
    for id in THEME_ORDER {
        match *id {
            "gat" => {
                let mut lines = sources.gat_preamble.clone();
                lines.extend(sources.lines("gat").iter().cloned());
                lines.extend(sources.fallback_lines.iter().cloned());
                push_section(out, label_of("gat"), &lines);
            }
            "aomen" => {
                let mut lines = sources.lines("aomen").to_vec();
                lines.extend(sources.fallback_lines.iter().cloned());
                push_section(out, label_of("aomen"), &lines);
            }
            _ => push_section(out, label_of(id), sources.lines(id)),
        }
    }
    push_section(out, LABEL_QUALITY_CCTV, &sources.quality_cctv);
    push_section(out, LABEL_QUALITY_WS, &sources.quality_ws);
    push_section(out, label_of("zb"), sources.lines("zb"));
    push_section(out, label_of("cw"), sources.lines("cw"));
    push_section(out, LABEL_UPDATED, &sources.epilogue);
}

/// Full variant: every category as its own section.
pub fn build_full(sources: &OutputSources) -> Vec<String> {
    let mut out = Vec::new();
    push_section(&mut out, label_of("ys"), sources.lines("ys"));
    push_section(&mut out, label_of("ws"), sources.lines("ws"));
    for id in FULL_PROVINCE_ORDER {
        push_section(&mut out, label_of(id), sources.lines(id));
    }
    push_theme_sections(&mut out, sources);
    out
}

/// Lite variant: plain labels, provinces collapsed, themed sections and
/// daily picks dropped.
pub fn build_lite(sources: &OutputSources) -> Vec<String> {
    let mut out = Vec::new();
    push_section(&mut out, "央视频道", sources.lines("ys"));
    push_section(&mut out, "卫视频道", sources.lines("ws"));
    push_section(&mut out, "地方频道", &sources.collapsed_provinces());
    push_section(&mut out, "数字频道", sources.lines("sz"));
    let version: &[String] = match sources.epilogue.first() {
        Some(version) => std::slice::from_ref(version),
        None => &[],
    };
    push_section(&mut out, "更新时间", version);
    out
}

/// Custom variant: full themed sections with the provinces collapsed.
pub fn build_custom(sources: &OutputSources) -> Vec<String> {
    let mut out = Vec::new();
    push_section(&mut out, label_of("ys"), sources.lines("ys"));
    push_section(&mut out, label_of("ws"), sources.lines("ws"));
    push_section(&mut out, "🏠地方频道", &sources.collapsed_provinces());
    push_theme_sections(&mut out, sources);
    out
}

/// Update-time section: a Beijing-time version stamp, randomly chosen
/// daily-pick lines and the about lines.
pub fn build_epilogue(
    push_pool: &[String],
    picks_pool: &[String],
    about_lines: &[String],
) -> Vec<String> {
    let mut rng = rand::thread_rng();
    let beijing_now = Utc::now() + Duration::hours(8);
    let stamp = beijing_now.format("%Y%m%d %H:%M:%S").to_string();

    let mut lines = Vec::new();
    match push_pool.choose(&mut rng) {
        Some(url) => lines.push(format!("{},{}", stamp, url)),
        None => lines.push(stamp),
    }
    for label in ["今日推荐", "🔥低调", "🔥使用", "🔥禁止", "🔥贩卖"] {
        if let Some(url) = picks_pool.choose(&mut rng) {
            lines.push(format!("{},{}", label, url));
        }
    }
    lines.extend(about_lines.iter().cloned());
    lines
}

/// Render a text playlist as M3U. Section headers become the running
/// `group-title`; entries with a known logo also get `tvg-name`/`tvg-logo`.
/// Lines that are not exactly "name,url" shaped are skipped.
pub fn render_m3u(lines: &[String], logos: &HashMap<String, String>, epg_url: &str) -> String {
    let mut out = format!("#EXTM3U x-tvg-url=\"{}\"\n", epg_url);
    let mut group = String::new();
    for line in lines {
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() != 2 {
            continue;
        }
        if line.contains("#genre#") {
            group = parts[0].to_string();
            continue;
        }
        let (name, url) = (parts[0], parts[1]);
        match logos.get(name) {
            Some(logo) => out.push_str(&format!(
                "#EXTINF:-1 tvg-name=\"{}\" tvg-logo=\"{}\" group-title=\"{}\",{}\n{}\n",
                name, logo, group, name, url
            )),
            None => out.push_str(&format!(
                "#EXTINF:-1 group-title=\"{}\",{}\n{}\n",
                group, name, url
            )),
        }
    }
    out
}

/// Write lines with a trailing newline each, creating parent directories.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    write_text(path, &content)
}

pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "output written");
    Ok(())
}
