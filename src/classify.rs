//! Channel classification.
//!
//! One ordered rule table drives routing: a cleaned entry lands in the
//! first category whose predicate matches and whose bucket has not already
//! seen the address. A name that matches a rule but duplicates an address
//! keeps scanning, so mirrors of the same channel can still land in a
//! later category. Unmatched entries fall into the "other" pool with its
//! own global address dedup.

use std::collections::{HashMap, HashSet};

use crate::dictionary::DictionarySet;
use crate::normalize;

/// How a rule's dictionary is matched against a cleaned channel name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Name equals a dictionary entry
    Exact,
    /// Any dictionary entry occurs inside the name
    Substring,
    /// Fixed keyword occurs inside the name; the dictionary is ordering-only
    Keyword(&'static str),
}

/// How a finalized bucket is ordered in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderMode {
    /// Stable sort by position of the name in the category dictionary,
    /// names absent from the dictionary last
    Dictionary,
    /// Plain lexicographic sort of the whole line
    Lexicographic,
}

/// One row of the classification table.
#[derive(Debug)]
pub struct CategorySpec {
    pub id: &'static str,
    /// Section label in the full/custom playlists
    pub label: &'static str,
    /// Dictionary file, relative to the data directory
    pub dict_path: &'static str,
    pub match_mode: MatchMode,
    pub order_mode: OrderMode,
    /// Provincial category, collapsed into one section in lite/custom output
    pub regional: bool,
}

const fn exact(
    id: &'static str,
    label: &'static str,
    dict_path: &'static str,
) -> CategorySpec {
    CategorySpec {
        id,
        label,
        dict_path,
        match_mode: MatchMode::Exact,
        order_mode: OrderMode::Dictionary,
        regional: false,
    }
}

const fn province(
    id: &'static str,
    label: &'static str,
    dict_path: &'static str,
) -> CategorySpec {
    CategorySpec {
        id,
        label,
        dict_path,
        match_mode: MatchMode::Exact,
        order_mode: OrderMode::Dictionary,
        regional: true,
    }
}

/// The classification table, in priority order. Earlier rows win.
pub static CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        id: "ys",
        label: "🌐央视频道",
        dict_path: "主频道/CCTV.txt",
        match_mode: MatchMode::Keyword("CCTV"),
        order_mode: OrderMode::Dictionary,
        regional: false,
    },
    exact("ws", "📡卫视频道", "主频道/卫视频道.txt"),
    province("zj", "☘️浙江频道", "地方台/浙江频道.txt"),
    province("jsu", "☘️江苏频道", "地方台/江苏频道.txt"),
    province("gd", "☘️广东频道", "地方台/广东频道.txt"),
    province("hn", "☘️湖南频道", "地方台/湖南频道.txt"),
    province("hb", "☘️湖北频道", "地方台/湖北频道.txt"),
    province("ah", "☘️安徽频道", "地方台/安徽频道.txt"),
    province("hain", "☘️海南频道", "地方台/海南频道.txt"),
    province("nm", "☘️内蒙频道", "地方台/内蒙频道.txt"),
    province("ln", "☘️辽宁频道", "地方台/辽宁频道.txt"),
    province("sx", "☘️陕西频道", "地方台/陕西频道.txt"),
    province("shanxi", "☘️山西频道", "地方台/山西频道.txt"),
    province("shandong", "☘️山东频道", "地方台/山东频道.txt"),
    province("yunnan", "☘️云南频道", "地方台/云南频道.txt"),
    province("bj", "☘️北京频道", "地方台/北京频道.txt"),
    province("cq", "☘️重庆频道", "地方台/重庆频道.txt"),
    province("fj", "☘️福建频道", "地方台/福建频道.txt"),
    province("gs", "☘️甘肃频道", "地方台/甘肃频道.txt"),
    province("gx", "☘️广西频道", "地方台/广西频道.txt"),
    province("gz", "☘️贵州频道", "地方台/贵州频道.txt"),
    province("heb", "☘️河北频道", "地方台/河北频道.txt"),
    province("hen", "☘️河南频道", "地方台/河南频道.txt"),
    CategorySpec {
        id: "hlj",
        label: "☘️黑龙江台",
        dict_path: "地方台/黑龙江频道.txt",
        match_mode: MatchMode::Exact,
        order_mode: OrderMode::Lexicographic,
        regional: true,
    },
    province("jl", "☘️吉林频道", "地方台/吉林频道.txt"),
    province("nx", "☘️宁夏频道", "地方台/宁夏频道.txt"),
    province("jx", "☘️江西频道", "地方台/江西频道.txt"),
    province("qh", "☘️青海频道", "地方台/青海频道.txt"),
    province("sc", "☘️四川频道", "地方台/四川频道.txt"),
    province("sh", "☘️上海频道", "地方台/上海频道.txt"),
    province("tj", "☘️天津频道", "地方台/天津频道.txt"),
    province("xj", "☘️新疆频道", "地方台/新疆频道.txt"),
    exact("sz", "🎞️数字频道", "主频道/数字频道.txt"),
    exact("gj", "🌎国际频道", "主频道/国际频道.txt"),
    exact("ty", "⚽体育频道", "主频道/体育频道.txt"),
    CategorySpec {
        id: "tyss",
        label: "🏆体育赛事",
        dict_path: "主频道/体育赛事.txt",
        match_mode: MatchMode::Substring,
        order_mode: OrderMode::Lexicographic,
        regional: false,
    },
    exact("dy", "🎬电影频道", "主频道/电影.txt"),
    exact("dsj", "📺电·视·剧", "主频道/电视剧.txt"),
    exact("gat", "🇨🇳港·澳·台", "主频道/港澳台.txt"),
    exact("xg", "🇭🇰香港频道", "主频道/香港.txt"),
    exact("aomen", "🇲🇴澳门频道", "主频道/澳门.txt"),
    exact("tw", "🇹🇼台湾频道", "主频道/台湾.txt"),
    exact("jlp", "📽️记·录·片", "主频道/纪录片.txt"),
    exact("dhp", "🏕动·画·片", "主频道/动画片.txt"),
    exact("xq", "🎭戏曲频道", "主频道/戏曲频道.txt"),
    exact("js", "🎙️解说频道", "主频道/解说频道.txt"),
    exact("cw", "🧨历届春晚", "主频道/春晚.txt"),
    exact("douyu", "🐬斗鱼直播", "主频道/斗鱼直播.txt"),
    exact("huya", "🐯虎牙直播", "主频道/虎牙直播.txt"),
    CategorySpec {
        id: "zy",
        label: "🎤综艺频道",
        dict_path: "主频道/综艺频道.txt",
        match_mode: MatchMode::Exact,
        order_mode: OrderMode::Lexicographic,
        regional: false,
    },
    exact("yy", "🎵音乐频道", "主频道/音乐频道.txt"),
    CategorySpec {
        id: "game",
        label: "🎮游戏频道",
        dict_path: "主频道/游戏频道.txt",
        match_mode: MatchMode::Exact,
        order_mode: OrderMode::Lexicographic,
        regional: false,
    },
    exact("radio", "📻收·音·机", "主频道/收音机.txt"),
    exact("zb", "📹直播中国", "主频道/直播中国.txt"),
];

/// Look up a table row by category id.
pub fn category(id: &str) -> Option<&'static CategorySpec> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Where an ingested line ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Category(&'static str),
    Other,
    Duplicate,
    Blacklisted,
    Skipped,
}

#[derive(Debug, Default)]
struct Bucket {
    lines: Vec<String>,
    seen: HashSet<String>,
}

/// Classification result: raw per-category lines plus the unmatched pool.
#[derive(Debug, Default)]
pub struct ClassifiedChannels {
    pub buckets: HashMap<&'static str, Vec<String>>,
    pub other_lines: Vec<String>,
}

/// Normalization knobs for ingestion.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub removal_list: Vec<String>,
    pub strip_leading_quality: bool,
}

/// Routes cleaned entries into category buckets. Single-threaded by
/// design: fetches resolve concurrently, classification does not.
pub struct Classifier<'a> {
    dicts: &'a DictionarySet,
    blacklist: &'a HashSet<String>,
    options: NormalizeOptions,
    buckets: HashMap<&'static str, Bucket>,
    other_lines: Vec<String>,
    other_seen: HashSet<String>,
}

impl<'a> Classifier<'a> {
    pub fn new(
        dicts: &'a DictionarySet,
        blacklist: &'a HashSet<String>,
        options: NormalizeOptions,
    ) -> Self {
        let buckets = CATEGORIES
            .iter()
            .map(|c| (c.id, Bucket::default()))
            .collect();
        Self {
            dicts,
            blacklist,
            options,
            buckets,
            other_lines: Vec::new(),
            other_seen: HashSet::new(),
        }
    }

    /// Record a source marker in the unmatched pool, so the others file
    /// shows which source contributed the entries that follow.
    pub fn note_source(&mut self, url: &str) {
        self.other_lines.push(format!("◆◆◆　{}", url));
    }

    /// Record a blank separator in the unmatched pool.
    pub fn note_source_end(&mut self) {
        self.other_lines.push(String::new());
    }

    /// Clean and route one "name,url" line.
    pub fn ingest_line(&mut self, line: &str) -> Routed {
        if line.contains("#genre#")
            || line.contains("#EXTINF:")
            || !line.contains(',')
            || !line.contains("://")
        {
            return Routed::Skipped;
        }
        let Some((raw_name, raw_address)) = line.split_once(',') else {
            return Routed::Skipped;
        };

        let name = normalize::clean_channel_name(
            raw_name.trim(),
            &self.options.removal_list,
            self.options.strip_leading_quality,
        );
        let name = normalize::traditional_to_simplified(&name);
        let address = normalize::clean_url(raw_address.trim()).to_string();

        if self.blacklist.contains(&address) {
            return Routed::Blacklisted;
        }

        let entry_line = format!("{},{}", name, address);
        for spec in CATEGORIES {
            let matched = match spec.match_mode {
                MatchMode::Exact => self.dicts.get(spec.id).iter().any(|d| d == &name),
                MatchMode::Substring => self
                    .dicts
                    .get(spec.id)
                    .iter()
                    .any(|d| name.contains(d.as_str())),
                MatchMode::Keyword(keyword) => name.contains(keyword),
            };
            if !matched {
                continue;
            }
            let Some(bucket) = self.buckets.get_mut(spec.id) else {
                continue;
            };
            // address already present in this bucket: keep scanning later rules
            if bucket.seen.contains(&address) {
                continue;
            }
            bucket.seen.insert(address.clone());
            bucket.lines.push(normalize::rewrite_line(&entry_line));
            return Routed::Category(spec.id);
        }

        if self.other_seen.insert(address) {
            self.other_lines.push(entry_line);
            Routed::Other
        } else {
            Routed::Duplicate
        }
    }

    /// Append curated lines to a bucket verbatim, bypassing cleaning and
    /// address dedup. Used for the manual per-category files.
    pub fn append_manual(&mut self, id: &str, lines: Vec<String>) {
        if let Some(bucket) = self.buckets.get_mut(id) {
            bucket.lines.extend(lines);
        }
    }

    pub fn finish(self) -> ClassifiedChannels {
        ClassifiedChannels {
            buckets: self
                .buckets
                .into_iter()
                .map(|(id, bucket)| (id, bucket.lines))
                .collect(),
            other_lines: self.other_lines,
        }
    }
}
