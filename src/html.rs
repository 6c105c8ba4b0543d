//! Static HTML page listing the current sports events with copyable URLs.

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="zh">
<head>
    <meta charset="UTF-8">
    <title>最新体育赛事</title>
    <style>
        body { font-family: sans-serif; padding: 20px; background: #f9f9f9; }
        .item { margin-bottom: 20px; padding: 12px; background: #fff; border-radius: 8px;
                box-shadow: 0 2px 4px rgba(0,0,0,0.06); }
        .title { font-weight: bold; font-size: 1.1em; color: #333; margin-bottom: 5px; }
        .url-wrapper { display: flex; align-items: center; gap: 10px; }
        .url {
            max-width: 80%;
            white-space: nowrap;
            overflow: hidden;
            text-overflow: ellipsis;
            font-size: 0.9em;
            color: #555;
            background: #f0f0f0;
            padding: 6px;
            border-radius: 4px;
            flex-grow: 1;
        }
        .copy-btn {
            background-color: #007BFF;
            border: none;
            color: white;
            padding: 6px 10px;
            border-radius: 4px;
            cursor: pointer;
            font-size: 0.8em;
        }
        .copy-btn:hover {
            background-color: #0056b3;
        }
    </style>
</head>
<body>
<h2>📋 最新体育赛事列表</h2>
"#;

const PAGE_TAIL: &str = r#"<script>
    function copyToClipboard(id) {
        const el = document.getElementById(id);
        const text = el.textContent;
        navigator.clipboard.writeText(text).then(() => {
            alert("已复制链接！");
        }).catch(err => {
            alert("复制失败: " + err);
        });
    }
</script>
</body>
</html>
"#;

/// Render the sports page from "title,url" entries. Entries without a
/// comma are skipped.
pub fn render_sports_page(entries: &[String]) -> String {
    let mut body = String::new();
    for (idx, entry) in entries.iter().enumerate() {
        let Some((title, url)) = entry.split_once(',') else {
            continue;
        };
        let url_id = format!("url_{}", idx);
        body.push_str(&format!(
            r#"<div class="item">
    <div class="title">🕒 {title}</div>
    <div class="url-wrapper">
        <div class="url" id="{url_id}">{url}</div>
        <button class="copy-btn" onclick="copyToClipboard('{url_id}')">复制</button>
    </div>
</div>
"#
        ));
    }
    format!("{}{}{}", PAGE_HEAD, body, PAGE_TAIL)
}
