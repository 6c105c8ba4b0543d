//! Channel name and address normalization.
//!
//! Everything here is pure string rewriting: noise-token removal, script
//! conversion, the CCTV numeric-token rewrite and the satellite qualifier
//! collapse. The classifier calls these before any routing decision.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::Mutex;
use zhconv::{zhconv, Variant};

static RES_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"4K|8K").unwrap());
static RES_TRUNCATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(4K|8K).*").unwrap());
static RES_WRAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(4K|8K)").unwrap());
static SATELLITE_QUALIFIER: Lazy<Regex> = Lazy::new(|| Regex::new("卫视「.*」").unwrap());

static DATE_SLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0?(\d{1,2})/0?(\d{1,2})(.*)").unwrap());
static DATE_ISO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-0?(\d{1,2})-0?(\d{1,2})(.*)").unwrap());
static DATE_CJK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0?(\d{1,2})月0?(\d{1,2})日(.*)").unwrap());

static T2S_CACHE: Lazy<Mutex<HashMap<String, String>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Convert traditional Chinese to simplified, memoized per distinct input.
/// Channel names repeat heavily across sources, so the cache hit rate is high.
pub fn traditional_to_simplified(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    if let Ok(cache) = T2S_CACHE.lock() {
        if let Some(hit) = cache.get(text) {
            return hit.clone();
        }
    }
    let converted = zhconv(text, Variant::ZhHans);
    if let Ok(mut cache) = T2S_CACHE.lock() {
        cache.insert(text.to_string(), converted.clone());
    }
    converted
}

/// Drop a `$`-suffixed annotation from a stream address.
/// Everything from the last `$` on is carrier junk, not part of the URL.
pub fn clean_url(url: &str) -> &str {
    match url.rfind('$') {
        Some(idx) => &url[..idx],
        None => url,
    }
}

/// Scrub a raw channel name: remove noise substrings in order, then strip a
/// trailing "HD", then a trailing "台" when the name is longer than three
/// characters. A leading "BD"/"HD" strip is available behind a flag.
pub fn clean_channel_name(name: &str, removal_list: &[String], strip_leading_quality: bool) -> String {
    let mut name = name.to_string();
    for token in removal_list {
        if !token.is_empty() {
            name = name.replace(token.as_str(), "");
        }
    }
    if let Some(stripped) = name.strip_suffix("HD") {
        name = stripped.to_string();
    }
    if name.ends_with('台') && name.chars().count() > 3 {
        name.truncate(name.len() - '台'.len_utf8());
    }
    if strip_leading_quality {
        if let Some(stripped) = name.strip_prefix("BD").or_else(|| name.strip_prefix("HD")) {
            name = stripped.to_string();
        }
    }
    name
}

/// Rewrite every comma-separated token of a stored line.
/// URL tokens contain "://" and pass through untouched.
pub fn rewrite_line(line: &str) -> String {
    line.split(',')
        .map(rewrite_token)
        .collect::<Vec<_>>()
        .join(",")
}

/// Canonicalize a single token.
///
/// CCTV names collapse to "CCTV" plus their numeric core: IPV6 and 1080
/// markers are dropped, PLUS becomes '+', then only digits, 'K' and '+'
/// survive. A 4K/8K marker with a channel number ahead of it gets the
/// trailing junk cut and the marker parenthesised. When the filter leaves
/// nothing (named channels like CCTV风云足球), the name minus its "CCTV"
/// prefix is used instead.
///
/// Satellite names lose a 「…」 qualifier after 卫视.
pub fn rewrite_token(token: &str) -> String {
    if token.contains("CCTV") && !token.contains("://") {
        let cleaned = token.replace("IPV6", "").replace("PLUS", "+").replace("1080", "");
        let mut core: String = cleaned
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == 'K' || *c == '+')
            .collect();
        if core.trim().is_empty() {
            core = cleaned.replace("CCTV", "");
        }
        if core.chars().count() > 2 && RES_MARKER.is_match(&core) {
            core = RES_TRUNCATE.replace(&core, "$1").into_owned();
            if core.chars().count() > 2 {
                core = RES_WRAP.replace_all(&core, "($1)").into_owned();
            }
        }
        format!("CCTV{}", core)
    } else if token.contains("卫视") {
        SATELLITE_QUALIFIER.replace_all(token, "卫视").into_owned()
    } else {
        token.to_string()
    }
}

fn format_month_day(caps: &Captures) -> String {
    let month: u32 = caps[1].parse().unwrap_or(0);
    let day: u32 = caps[2].parse().unwrap_or(0);
    let after = caps.get(3).map(|m| m.as_str()).unwrap_or("");
    if after.starts_with(' ') {
        format!("{}-{}{}", month, day, after)
    } else {
        format!("{}-{} {}", month, day, after)
    }
}

/// Normalize a leading `MM/DD`, `YYYY-MM-DD` or `M月D日` date to `M-D `,
/// with zero padding removed. Sports-event names carry their air date in
/// any of these shapes depending on the source.
pub fn normalize_date_to_md(text: &str) -> String {
    let mut text = text.trim().to_string();
    for re in [&*DATE_SLASH, &*DATE_ISO, &*DATE_CJK] {
        text = re.replace(&text, format_month_day).into_owned();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn removal_list() -> Vec<String> {
        crate::config::AppConfig::default().removal_list
    }

    #[test]
    fn test_clean_url_strips_dollar_suffix() {
        assert_eq!(clean_url("http://a/b$LR•IPV6"), "http://a/b");
        assert_eq!(clean_url("http://a/b"), "http://a/b");
        assert_eq!(clean_url("http://a/$x$y"), "http://a/$x");
    }

    #[test]
    fn test_clean_channel_name_removes_noise() {
        let list = removal_list();
        assert_eq!(clean_channel_name("CCTV1高清", &list, false), "CCTV1");
        assert_eq!(clean_channel_name("湖南卫视「超清」", &list, false), "湖南卫视「」");
        assert_eq!(clean_channel_name("凤凰中文HD", &list, false), "凤凰中文");
    }

    #[test]
    fn test_clean_channel_name_trailing_tai() {
        let list = removal_list();
        // longer than three chars: trailing 台 goes
        assert_eq!(clean_channel_name("黑龙江电视台", &list, false), "黑龙江电视");
        // exactly three chars: kept
        assert_eq!(clean_channel_name("凤凰台", &list, false), "凤凰台");
    }

    #[test]
    fn test_leading_quality_strip_is_opt_in() {
        let list = removal_list();
        assert_eq!(clean_channel_name("HD翡翠", &list, false), "HD翡翠");
        assert_eq!(clean_channel_name("HD翡翠", &list, true), "翡翠");
        assert_eq!(clean_channel_name("BD翡翠", &list, true), "翡翠");
    }

    #[test]
    fn test_cctv_numeric_rewrite() {
        assert_eq!(rewrite_token("CCTV1"), "CCTV1");
        assert_eq!(rewrite_token("CCTV-13"), "CCTV13");
        assert_eq!(rewrite_token("CCTV1080"), "CCTV");
        assert_eq!(rewrite_token("CCTVPLUS"), "CCTV+");
        assert_eq!(rewrite_token("CCTV5+IPV6"), "CCTV5+");
    }

    #[test]
    fn test_cctv_named_channel_fallback() {
        // no digits survive the filter, so the original suffix is kept
        assert_eq!(rewrite_token("CCTV风云足球"), "CCTV风云足球");
    }

    #[test]
    fn test_cctv_resolution_markers() {
        // short numeric core keeps the marker bare
        assert_eq!(rewrite_token("CCTV-4K超清"), "CCTV4K");
        // a channel number ahead of the marker gets it parenthesised
        assert_eq!(rewrite_token("CCTV16-4K"), "CCTV16(4K)");
        // truncation at the first marker drops everything behind it
        assert_eq!(rewrite_token("CCTV4K测试8K"), "CCTV4K");
    }

    #[test]
    fn test_satellite_qualifier_collapse() {
        assert_eq!(rewrite_token("湖南卫视「1080」"), "湖南卫视");
        assert_eq!(rewrite_token("浙江卫视"), "浙江卫视");
    }

    #[test]
    fn test_rewrite_line_skips_url_token() {
        assert_eq!(
            rewrite_line("CCTV1高清台,http://cctv.example/1"),
            "CCTV1,http://cctv.example/1"
        );
    }

    #[test]
    fn test_traditional_to_simplified() {
        assert_eq!(traditional_to_simplified("鳳凰衛視"), "凤凰卫视");
        assert_eq!(traditional_to_simplified("CCTV1"), "CCTV1");
        // memoized path returns the same answer
        assert_eq!(traditional_to_simplified("鳳凰衛視"), "凤凰卫视");
    }

    #[test]
    fn test_normalize_date_formats() {
        assert_eq!(normalize_date_to_md("06/09 英超 曼城vs利物浦"), "6-9 英超 曼城vs利物浦");
        assert_eq!(normalize_date_to_md("2025-06-09足总杯"), "6-9 足总杯");
        assert_eq!(normalize_date_to_md("6月9日 德甲"), "6-9 德甲");
        // already normalized input is untouched
        assert_eq!(normalize_date_to_md("6-9 德甲"), "6-9 德甲");
        assert_eq!(normalize_date_to_md("无日期标题"), "无日期标题");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let list = removal_list();
        for name in ["CCTV1高清", "湖南卫视HD", "黑龙江电视台", "凤凰中文"] {
            let once = clean_channel_name(name, &list, false);
            let twice = clean_channel_name(&once, &list, false);
            assert_eq!(once, twice);
        }
    }
}
