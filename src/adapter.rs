//! Source format adaptation.
//!
//! Remote sources arrive either as M3U playlists or as plain "name,url"
//! text. Everything is funneled into the plain shape before classification.

use once_cell::sync::Lazy;
use regex::Regex;

/// A "name,url" line embedded inside an M3U body: one name without commas,
/// then a whitespace-free URL. Some aggregated playlists interleave both
/// formats in a single file.
static PLAIN_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^,]+,[^\s]+://[^\s]+$").unwrap());

/// File extension of the URL path, query string and fragment excluded.
pub fn url_extension(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let path = rest.split_once('/').map(|(_, p)| p).unwrap_or("");
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rfind('.').map(|idx| &file[idx..])
}

/// Whether a body looks like an M3U playlist.
pub fn is_m3u_content(text: &str) -> bool {
    text.starts_with("#EXTM3U") || text.starts_with("#EXTINF")
}

/// Convert an M3U body to "name,url" lines.
///
/// An `#EXTINF` directive carries the display name after its last comma;
/// it pairs with the next http/rtmp/p3p line. Lines already in plain
/// "name,url" shape pass through unchanged.
pub fn convert_m3u_to_txt(content: &str) -> String {
    let mut channel_name = String::new();
    let mut out: Vec<String> = Vec::new();
    for raw in content.split('\n') {
        let line = raw.trim_end_matches('\r');
        if line.starts_with("#EXTM3U") {
            continue;
        }
        if line.starts_with("#EXTINF") {
            channel_name = line
                .rsplit(',')
                .next()
                .unwrap_or("")
                .trim()
                .to_string();
        } else if line.starts_with("http") || line.starts_with("rtmp") || line.starts_with("p3p") {
            out.push(format!("{},{}", channel_name, line.trim()));
        }
        if !line.contains("#genre#") && PLAIN_LINE.is_match(line) {
            out.push(line.to_string());
        }
    }
    out.join("\n")
}

/// Turn a fetched body into classifiable "name,url" lines.
///
/// M3U bodies are converted first (detected by URL extension or content).
/// Lines without a comma and a "://" are dropped, as are unsupported
/// transports. A `#`-joined multi-URL address becomes one line per URL.
pub fn source_to_lines(url: &str, body: &str) -> Vec<String> {
    let text = body.trim();
    let is_m3u = matches!(url_extension(url), Some(".m3u") | Some(".m3u8")) || is_m3u_content(text);
    let text = if is_m3u {
        convert_m3u_to_txt(text)
    } else {
        text.to_string()
    };

    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let line = raw.trim();
        if line.contains("#genre#") || !line.contains(',') || !line.contains("://") {
            continue;
        }
        if line.contains("tvbus://") || line.contains("/udp/") {
            continue;
        }
        if let Some((name, address)) = line.split_once(',') {
            if address.contains('#') {
                for fragment in address.split('#') {
                    lines.push(format!("{},{}", name, fragment));
                }
            } else {
                lines.push(line.to_string());
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_extension() {
        assert_eq!(url_extension("http://example.com/live.m3u"), Some(".m3u"));
        assert_eq!(url_extension("http://example.com/a/b/list.m3u8?token=1"), Some(".m3u8"));
        assert_eq!(url_extension("http://example.com/plain.txt"), Some(".txt"));
        assert_eq!(url_extension("http://example.com/live"), None);
    }

    #[test]
    fn test_convert_m3u_basic() {
        let m3u = "#EXTM3U\n#EXTINF:-1 tvg-id=\"1\",Channel A\nhttp://s/1\n";
        assert_eq!(convert_m3u_to_txt(m3u), "Channel A,http://s/1");
    }

    #[test]
    fn test_convert_m3u_name_after_last_comma() {
        let m3u = "#EXTINF:-1 tvg-name=\"x\", group=\"a,b\",频道甲\nrtmp://s/2\n";
        assert_eq!(convert_m3u_to_txt(m3u), "频道甲,rtmp://s/2");
    }

    #[test]
    fn test_convert_m3u_passes_plain_lines_through() {
        let m3u = "#EXTM3U\n频道乙,http://s/3\n#EXTINF:-1,频道丙\nhttp://s/4\n";
        assert_eq!(
            convert_m3u_to_txt(m3u),
            "频道乙,http://s/3\n频道丙,http://s/4"
        );
    }

    #[test]
    fn test_source_to_lines_filters_and_splits() {
        let body = "\
分组,#genre#
频道甲,http://s/1
无地址行
频道乙,tvbus://x/2
频道丙,http://s/udp/3
频道丁,http://s/4#http://t/4
";
        let lines = source_to_lines("http://example.com/list.txt", body);
        assert_eq!(
            lines,
            vec![
                "频道甲,http://s/1".to_string(),
                "频道丁,http://s/4".to_string(),
                "频道丁,http://t/4".to_string(),
            ]
        );
    }

    #[test]
    fn test_source_to_lines_detects_m3u_by_content() {
        let body = "#EXTM3U\n#EXTINF:-1,Channel A\nhttp://s/1\n";
        let lines = source_to_lines("http://example.com/live", body);
        assert_eq!(lines, vec!["Channel A,http://s/1".to_string()]);
    }
}
