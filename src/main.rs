use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use livesource_lib::adapter;
use livesource_lib::aggregate;
use livesource_lib::classify::{Classifier, NormalizeOptions, CATEGORIES};
use livesource_lib::config::{files, AppConfig, MANUAL_BUCKET_FILES};
use livesource_lib::dictionary::{self, DictionarySet};
use livesource_lib::fetch::{expand_date_placeholders, SourceFetcher};
use livesource_lib::html;
use livesource_lib::normalize;
use livesource_lib::output::{self, OutputSources};
use livesource_lib::stats::RunStats;

#[derive(Parser, Debug)]
#[command(name = "livesource", version, about = "Aggregates public IPTV sources into curated playlists")]
struct Args {
    /// Config file (JSON); defaults apply when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the data directory from the config
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the output directory from the config
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }

    run(config).await
}

async fn run(config: AppConfig) -> Result<()> {
    let mut stats = RunStats::new();

    // Data-directory tables
    let dicts = DictionarySet::load(&config.data_dir);
    let corrections = dictionary::load_corrections(&config.data_path(files::CORRECTIONS));
    let blacklist = dictionary::load_blacklist(&[
        config.data_path(files::BLACKLIST_AUTO),
        config.data_path(files::BLACKLIST_MANUAL),
    ]);
    let logos = dictionary::load_logos(&config.data_path(files::LOGOS));
    stats.blacklist_size = blacklist.len();

    let options = NormalizeOptions {
        removal_list: config.removal_list.clone(),
        strip_leading_quality: config.strip_leading_quality,
    };
    let mut classifier = Classifier::new(&dicts, &blacklist, options);

    // Remote sources
    let sources: Vec<String> = dictionary::read_lines(&config.data_path(files::SOURCES))
        .into_iter()
        .filter(|url| url.starts_with("http"))
        .map(|url| expand_date_placeholders(&url))
        .collect();
    stats.sources_total = sources.len();
    info!(sources = sources.len(), "fetching playlist sources");

    let fetcher = SourceFetcher::new(&config.fetch)?;
    for (url, result) in fetcher.fetch_all(&sources).await {
        classifier.note_source(&url);
        match result {
            Ok(body) => {
                let lines = adapter::source_to_lines(&url, &body);
                info!(url = %url, lines = lines.len(), "source processed");
                stats.lines_ingested += lines.len();
                for line in &lines {
                    classifier.ingest_line(line);
                }
            }
            Err(err) => {
                stats.sources_failed += 1;
                warn!(url = %url, error = %err, "source skipped");
            }
        }
        classifier.note_source_end();
    }

    // Premium fallback source, appended verbatim to output sections
    let fallback_lines = match &config.fallback_url {
        Some(url) => match fetcher.fetch_text(url).await {
            Ok(body) => adapter::convert_m3u_to_txt(body.trim())
                .split('\n')
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
            Err(err) => {
                warn!(url = %url, error = %err, "fallback source unreachable, using local copy");
                dictionary::read_lines(&config.data_path(files::FALLBACK_LOCAL))
            }
        },
        None => dictionary::read_lines(&config.data_path(files::FALLBACK_LOCAL)),
    };

    // Low-latency whitelist entries re-enter the normal path
    let admitted = dictionary::load_whitelist(
        &config.data_path(files::WHITELIST_AUTO),
        config.whitelist_threshold_ms,
    );
    stats.whitelist_admitted = admitted.len();
    for line in &admitted {
        classifier.ingest_line(line);
    }

    // Curated per-bucket files
    for (id, rel) in MANUAL_BUCKET_FILES {
        let lines = dictionary::read_lines(&config.data_path(rel));
        if !lines.is_empty() {
            info!(bucket = id, lines = lines.len(), "manual lines merged");
        }
        classifier.append_manual(id, lines);
    }

    let classified = classifier.finish();

    // Finalize every bucket; sports events get their dates normalized first
    let mut finalized: HashMap<&'static str, Vec<String>> = HashMap::new();
    for category in CATEGORIES {
        let lines = classified
            .buckets
            .get(category.id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let lines = if category.id == "tyss" {
            let normalized: Vec<String> = lines
                .iter()
                .map(|line| normalize::normalize_date_to_md(line))
                .collect();
            let mut lines = aggregate::dedup_lines(normalized);
            lines.sort();
            lines
        } else {
            aggregate::finalize(
                lines,
                dicts.get(category.id),
                category.order_mode,
                &corrections,
            )
        };
        finalized.insert(category.id, lines);
    }

    // Sports page from the finalized events
    let sports_page = html::render_sports_page(
        finalized.get("tyss").map(Vec::as_slice).unwrap_or(&[]),
    );

    let epilogue = output::build_epilogue(
        &dictionary::load_url_pool(&config.data_path(files::DAILY_PUSH)),
        &dictionary::load_url_pool(&config.data_path(files::DAILY_PICKS)),
        &dictionary::read_lines(&config.data_path(files::MANUAL_ABOUT)),
    );

    let sources_for_output = OutputSources {
        finalized,
        fallback_lines,
        gat_preamble: dictionary::read_lines(&config.data_path(files::MANUAL_GAT_PREAMBLE)),
        quality_cctv: dictionary::read_lines(&config.data_path(files::MANUAL_QUALITY_CCTV)),
        quality_ws: dictionary::read_lines(&config.data_path(files::MANUAL_QUALITY_WS)),
        epilogue,
    };

    let full = output::build_full(&sources_for_output);
    let lite = output::build_lite(&sources_for_output);
    let custom = output::build_custom(&sources_for_output);

    // A failed write is logged and the run carries on with the next artifact
    let log_write = |result: Result<()>| {
        if let Err(err) = result {
            error!(error = %err, "write failed");
        }
    };
    log_write(output::write_lines(&config.output_path("full.txt"), &full));
    log_write(output::write_lines(&config.output_path("lite.txt"), &lite));
    log_write(output::write_lines(&config.output_path("custom.txt"), &custom));
    log_write(output::write_lines(
        &config.output_path("others.txt"),
        &classified.other_lines,
    ));
    log_write(output::write_text(
        &config.output_path("full.m3u"),
        &output::render_m3u(&full, &logos, &config.epg_url),
    ));
    log_write(output::write_text(
        &config.output_path("lite.m3u"),
        &output::render_m3u(&lite, &logos, &config.epg_url),
    ));
    log_write(output::write_text(
        &config.output_path("custom.m3u"),
        &output::render_m3u(&custom, &logos, &config.epg_url),
    ));
    log_write(output::write_text(
        &config.output_path("others.m3u"),
        &output::render_m3u(&classified.other_lines, &logos, &config.epg_url),
    ));
    log_write(output::write_text(
        &config.output_path("sports.html"),
        &sports_page,
    ));

    stats.log_summary(
        full.len(),
        lite.len(),
        custom.len(),
        classified.other_lines.len(),
    );
    Ok(())
}
