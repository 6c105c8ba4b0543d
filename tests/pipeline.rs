//! End-to-end pipeline tests: raw source bodies in, playlist variants out.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use livesource_lib::adapter;
use livesource_lib::aggregate;
use livesource_lib::classify::{category, Classifier, NormalizeOptions, CATEGORIES};
use livesource_lib::config::AppConfig;
use livesource_lib::dictionary::{self, DictionarySet};
use livesource_lib::html;
use livesource_lib::normalize;
use livesource_lib::output::{self, OutputSources};

fn options() -> NormalizeOptions {
    let config = AppConfig::default();
    NormalizeOptions {
        removal_list: config.removal_list,
        strip_leading_quality: config.strip_leading_quality,
    }
}

fn dicts() -> DictionarySet {
    DictionarySet::from_entries(&[
        ("ys", &["CCTV1", "CCTV2", "CCTV5+"]),
        ("ws", &["湖南卫视", "浙江卫视", "湖北卫视"]),
        ("hb", &["武汉综合", "湖北经视"]),
        ("tyss", &["英超", "德甲", "欧冠"]),
    ])
}

fn ingest(classifier: &mut Classifier, url: &str, body: &str) {
    classifier.note_source(url);
    for line in adapter::source_to_lines(url, body) {
        classifier.ingest_line(&line);
    }
    classifier.note_source_end();
}

#[test]
fn test_mixed_sources_to_full_playlist() {
    let dicts = dicts();
    let blacklist = Default::default();
    let mut classifier = Classifier::new(&dicts, &blacklist, options());

    ingest(
        &mut classifier,
        "http://sources.example/daily.txt",
        "\
央视,#genre#
CCTV1高清,http://cdn.example/cctv1$LR•IPV6
湖南卫视,http://cdn.example/hntv
湖南卫视,http://cdn.example/hntv
武汉综合,http://cdn.example/whtv#http://mirror.example/whtv
神秘频道,http://cdn.example/unknown
",
    );
    ingest(
        &mut classifier,
        "http://sources.example/live.m3u",
        "#EXTM3U\n#EXTINF:-1 tvg-id=\"hb\",湖北卫视\nhttp://cdn.example/hbtv\n",
    );

    let classified = classifier.finish();
    assert_eq!(classified.buckets["ys"], vec!["CCTV1,http://cdn.example/cctv1"]);
    assert_eq!(classified.buckets["ws"].len(), 2);
    // the # multi-URL address became two entries in the same bucket
    assert_eq!(classified.buckets["hb"].len(), 2);
    // unmatched entry went to the others pool, after the source marker,
    // with its 频道 noise token already stripped
    assert!(classified
        .other_lines
        .contains(&"◆◆◆　http://sources.example/daily.txt".to_string()));
    assert!(classified
        .other_lines
        .contains(&"神秘,http://cdn.example/unknown".to_string()));

    let corrections = HashMap::new();
    let mut finalized: HashMap<&'static str, Vec<String>> = HashMap::new();
    for spec in CATEGORIES {
        let lines = classified.buckets.get(spec.id).cloned().unwrap_or_default();
        finalized.insert(
            spec.id,
            aggregate::finalize(&lines, dicts.get(spec.id), spec.order_mode, &corrections),
        );
    }

    let sources = OutputSources {
        finalized,
        fallback_lines: vec![],
        gat_preamble: vec![],
        quality_cctv: vec![],
        quality_ws: vec![],
        epilogue: vec!["20250101 08:00:00,http://v/1".to_string()],
    };
    let full = output::build_full(&sources);
    assert_eq!(full[0], "🌐央视频道,#genre#");
    assert_eq!(full[1], "CCTV1,http://cdn.example/cctv1");
    // dictionary order puts 湖南卫视 ahead of 湖北卫视 despite arrival order
    let hn_pos = full
        .iter()
        .position(|l| l == "湖南卫视,http://cdn.example/hntv")
        .expect("hunan entry");
    let hb_pos = full
        .iter()
        .position(|l| l == "湖北卫视,http://cdn.example/hbtv")
        .expect("hubei entry");
    assert!(hn_pos < hb_pos);
}

#[test]
fn test_cctv_resolution_scenario() {
    let dicts = dicts();
    let blacklist = Default::default();
    let mut classifier = Classifier::new(&dicts, &blacklist, options());
    classifier.ingest_line("CCTV-4K超清,http://b/2");
    let classified = classifier.finish();
    assert_eq!(classified.buckets["ys"], vec!["CCTV4K,http://b/2"]);
}

#[test]
fn test_duplicate_address_admitted_once() {
    let dicts = dicts();
    let blacklist = Default::default();
    let mut classifier = Classifier::new(&dicts, &blacklist, options());
    classifier.ingest_line("湖南卫视,http://s/1");
    classifier.ingest_line("湖南卫视高清,http://s/1");
    let classified = classifier.finish();
    assert_eq!(classified.buckets["ws"], vec!["湖南卫视,http://s/1"]);
}

#[test]
fn test_whitelist_threshold_scenario() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("whitelist_auto.txt");
    fs::write(
        &path,
        "1500ms,快频道,http://fast/1\n5000ms,慢频道,http://slow/1\n",
    )
    .expect("write whitelist");
    let admitted = dictionary::load_whitelist(&path, 2000.0);
    assert_eq!(admitted, vec!["快频道,http://fast/1".to_string()]);
}

#[test]
fn test_m3u_blob_scenario() {
    let body = "#EXTM3U\n#EXTINF:-1 tvg-id=\"a\",Channel A\nhttp://s/1\n";
    let lines = adapter::source_to_lines("http://x/playlist", body);
    assert_eq!(lines, vec!["Channel A,http://s/1".to_string()]);
}

#[test]
fn test_sports_bucket_to_html_page() {
    let dicts = dicts();
    let blacklist = Default::default();
    let mut classifier = Classifier::new(&dicts, &blacklist, options());
    classifier.ingest_line("06/09 英超 曼城vs利物浦,http://sports/1");
    classifier.ingest_line("2025-06-10 德甲 拜仁vs多特,http://sports/2");
    let classified = classifier.finish();

    let mut events: Vec<String> = classified.buckets["tyss"]
        .iter()
        .map(|line| normalize::normalize_date_to_md(line))
        .collect();
    events = aggregate::dedup_lines(events);
    events.sort();
    assert_eq!(events[0], "6-10 德甲 拜仁vs多特,http://sports/2");
    assert_eq!(events[1], "6-9 英超 曼城vs利物浦,http://sports/1");

    let page = html::render_sports_page(&events);
    assert!(page.contains("6-9 英超 曼城vs利物浦"));
    assert!(page.contains("http://sports/2"));
}

#[test]
fn test_dictionaries_load_from_data_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ws_dir = dir.path().join("主频道");
    fs::create_dir_all(&ws_dir).expect("mkdir");
    fs::write(ws_dir.join("卫视频道.txt"), "湖南卫视\n浙江卫视\n").expect("write dict");

    let dicts = DictionarySet::load(dir.path());
    assert_eq!(
        dicts.get("ws"),
        &["湖南卫视".to_string(), "浙江卫视".to_string()][..]
    );
    // unlisted dictionaries load as empty, not as errors
    assert!(dicts.get("zj").is_empty());
}

#[test]
fn test_category_labels_resolve() {
    assert_eq!(category("ys").map(|c| c.label), Some("🌐央视频道"));
    assert_eq!(category("tyss").map(|c| c.label), Some("🏆体育赛事"));
    assert!(category("nope").is_none());
}

#[test]
fn test_variant_round_trip_to_m3u() {
    let mut finalized: HashMap<&'static str, Vec<String>> = HashMap::new();
    finalized.insert("ys", vec!["CCTV1,http://a/1".to_string()]);
    let sources = OutputSources {
        finalized,
        fallback_lines: vec![],
        gat_preamble: vec![],
        quality_cctv: vec![],
        quality_ws: vec![],
        epilogue: vec![],
    };
    let full = output::build_full(&sources);
    let m3u = output::render_m3u(&full, &HashMap::new(), "http://epg/e.xml");
    assert!(m3u.contains("group-title=\"🌐央视频道\",CCTV1\nhttp://a/1\n"));
}

#[test]
fn test_write_lines_creates_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("full.txt");
    output::write_lines(&path, &["a,1".to_string(), String::new()]).expect("write");
    assert_eq!(fs::read_to_string(&path).expect("read"), "a,1\n\n");
    assert!(Path::new(&path).exists());
}
