//! The report generation workflow.
//!
//! Sites are processed strictly sequentially; within a site the pipeline
//! is: windowed fetch, dedup, concurrent last-access enrichment, row
//! projection. Rows accumulate in one table that is written as a single
//! CSV file at the end.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use recreport_core::{EnrichedRecording, ReportTable, ReportWindows, Site};
use recreport_webex::{
    TokenRefresher, TokenSet, TokenStore, WebexClient, attach_last_access,
    collect_site_recordings,
};

use crate::config::ReportConfig;
use crate::error::{CliError, CliResult};
use crate::sink;

/// Runs the full report workflow against the configured account.
pub async fn run(config: &ReportConfig) -> CliResult<()> {
    if config.days <= 0 {
        return Err(CliError::Usage(format!(
            "time period ({}) must be > 0 days",
            config.days
        )));
    }

    let timeout = Duration::from_secs(config.webex.timeout_secs);
    let tokens = ensure_tokens(config, timeout).await?;

    let client = match &config.webex.api_base {
        Some(base) => WebexClient::with_base_url(base, &tokens.access_token, timeout),
        None => WebexClient::new(&tokens.access_token, timeout),
    };
    let client = Arc::new(client);

    let sites = client.list_sites().await?;
    if sites.is_empty() {
        return Err(CliError::Usage("no sites found for this user".into()));
    }

    let site_urls = resolve_site_urls(config, &sites)?;
    info!("reporting on {} site(s) over {} days", site_urls.len(), config.days);

    let table = build_report(
        Arc::clone(&client),
        &site_urls,
        config.days,
        config.concurrency,
    )
    .await;

    let output_dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("reports"));
    fs::create_dir_all(&output_dir)?;

    let path = sink::report_path(&output_dir);
    sink::write_csv(&table, &path)?;
    println!("New report created: {}", path.display());

    Ok(())
}

/// Loads tokens from disk, refreshing the access token when possible.
///
/// Token states, in the order they are checked:
/// 1. no token file - the OAuth flow has never been run
/// 2. access token valid - used as is
/// 3. access expired, refresh valid - refreshed and persisted
/// 4. both expired - the OAuth flow must be re-run
async fn ensure_tokens(config: &ReportConfig, timeout: Duration) -> CliResult<TokenSet> {
    let store = TokenStore::new(config.tokens_path());

    let Some(tokens) = store.load()? else {
        return Err(CliError::AuthRequired(format!(
            "no tokens at {:?}; run the OAuth authorization flow first",
            store.path()
        )));
    };

    if !tokens.is_expired() {
        debug!("existing access token is valid");
        return Ok(tokens);
    }

    if tokens.is_refresh_expired() {
        return Err(CliError::AuthRequired(
            "both tokens are expired; re-run the OAuth authorization flow".into(),
        ));
    }

    let (Some(client_id), Some(client_secret)) =
        (&config.webex.client_id, &config.webex.client_secret)
    else {
        return Err(CliError::Config(
            "webex.client_id and webex.client_secret are required to refresh an expired access token"
                .into(),
        ));
    };

    info!("access token expired, using refresh token");
    let refresher = TokenRefresher::new(client_id.clone(), client_secret.clone(), timeout);
    let refreshed = refresher.refresh(&tokens).await?;
    store.save(&refreshed)?;

    Ok(refreshed)
}

/// Resolves which site URLs the report covers.
///
/// Explicit lists are sanity-checked against the sites the user can
/// actually access; with no explicit selection the default site is used.
fn resolve_site_urls(config: &ReportConfig, sites: &[Site]) -> CliResult<Vec<String>> {
    if config.all_sites {
        return Ok(sites.iter().map(|s| s.site_url.clone()).collect());
    }

    if !config.sites.is_empty() {
        let inaccessible: Vec<&str> = config
            .sites
            .iter()
            .filter(|requested| !sites.iter().any(|s| &s.site_url == *requested))
            .map(String::as_str)
            .collect();
        if !inaccessible.is_empty() {
            return Err(CliError::Usage(format!(
                "the authorized user does not have access to these sites: {}",
                inaccessible.join(", ")
            )));
        }
        return Ok(config.sites.clone());
    }

    sites
        .iter()
        .find(|s| s.is_default)
        .map(|s| vec![s.site_url.clone()])
        .ok_or_else(|| CliError::Usage("no default site; select sites explicitly".into()))
}

/// Builds the report table for the selected sites.
///
/// A site yielding no recordings is skipped with a warning rather than
/// failing the run.
pub async fn build_report(
    client: Arc<WebexClient>,
    site_urls: &[String],
    days: i64,
    concurrency: usize,
) -> ReportTable {
    let mut table = ReportTable::new();
    let progress = MultiProgress::new();

    let overall = progress.add(ProgressBar::new(site_urls.len() as u64));
    overall.set_style(bar_style());
    overall.set_message("sites");

    for site_url in site_urls {
        let window_count = ReportWindows::new(days, Utc::now()).count_windows();
        let windows_bar = progress.add(ProgressBar::new(window_count));
        windows_bar.set_style(bar_style());
        windows_bar.set_message(format!("gathering {}", site_url));

        let raw = {
            let windows_bar = windows_bar.clone();
            collect_site_recordings(&client, site_url, days, Utc::now(), move || {
                windows_bar.inc(1)
            })
            .await
        };
        windows_bar.finish_and_clear();

        if raw.is_empty() {
            warn!(
                "no recording data for site {} during the time interval",
                site_url
            );
            overall.inc(1);
            continue;
        }

        let mut records: Vec<EnrichedRecording> = raw
            .iter()
            .map(|r| EnrichedRecording::from_raw(r, site_url))
            .collect();

        let enrich_bar = progress.add(ProgressBar::new(records.len() as u64));
        enrich_bar.set_style(bar_style());
        enrich_bar.set_message(format!("processing {}", site_url));

        let on_progress = {
            let enrich_bar = enrich_bar.clone();
            Arc::new(move || enrich_bar.inc(1)) as recreport_webex::ProgressFn
        };
        attach_last_access(Arc::clone(&client), &mut records, concurrency, Some(on_progress))
            .await;
        enrich_bar.finish_and_clear();

        info!(
            "found and processed {} recordings for {}",
            records.len(),
            site_url
        );
        table.append_site(&records);
        overall.inc(1);
    }

    overall.finish_and_clear();
    table
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:32} [{bar:40}] {pos}/{len}")
        .expect("valid progress template")
        .progress_chars("=> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(url: &str, is_default: bool) -> Site {
        Site {
            site_url: url.into(),
            is_default,
        }
    }

    fn sites() -> Vec<Site> {
        vec![site("a.webex.com", false), site("b.webex.com", true)]
    }

    #[test]
    fn all_sites_selects_everything() {
        let config = ReportConfig {
            all_sites: true,
            ..ReportConfig::default()
        };
        let urls = resolve_site_urls(&config, &sites()).unwrap();
        assert_eq!(urls, ["a.webex.com", "b.webex.com"]);
    }

    #[test]
    fn explicit_list_is_validated() {
        let config = ReportConfig {
            sites: vec!["a.webex.com".into()],
            ..ReportConfig::default()
        };
        let urls = resolve_site_urls(&config, &sites()).unwrap();
        assert_eq!(urls, ["a.webex.com"]);

        let config = ReportConfig {
            sites: vec!["a.webex.com".into(), "nope.webex.com".into()],
            ..ReportConfig::default()
        };
        let err = resolve_site_urls(&config, &sites()).unwrap_err();
        assert!(err.to_string().contains("nope.webex.com"));
    }

    #[test]
    fn fallback_is_the_default_site() {
        let config = ReportConfig::default();
        let urls = resolve_site_urls(&config, &sites()).unwrap();
        assert_eq!(urls, ["b.webex.com"]);
    }

    #[test]
    fn missing_default_site_is_an_error() {
        let config = ReportConfig::default();
        let only_non_default = vec![site("a.webex.com", false)];
        assert!(resolve_site_urls(&config, &only_non_default).is_err());
    }

    #[tokio::test]
    async fn non_positive_days_abort_before_any_network_call() {
        let config = ReportConfig {
            days: 0,
            ..ReportConfig::default()
        };
        let err = run(&config).await.unwrap_err();
        assert!(err.to_string().contains("must be > 0"));
    }
}
