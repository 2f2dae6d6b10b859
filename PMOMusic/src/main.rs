mod cli;
mod logging;

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Command};
use pmobrowser::{BrowserConfigExt, MediaItemBrowser, PAGE_ALL};
use pmoconfig::Config;
use pmolibrary::{
    DeviceLibrary, LibraryConfigExt, LibrarySnapshot, MusicRepository, NameSearchEngine,
    UserLibrary,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ========== Configuration et logging ==========
    let config_dir = cli
        .config_dir
        .as_ref()
        .map(|dir| dir.to_string_lossy().to_string())
        .unwrap_or_default();
    let config = Config::load_config(&config_dir).context("Failed to load configuration")?;
    logging::init_logging(&config);
    let settings = config.browser_settings();

    // ========== Bibliothèque et navigateur ==========
    let repository = Arc::new(MusicRepository::new());
    let browser = MediaItemBrowser::with_settings(
        repository.clone(),
        Arc::new(NameSearchEngine::new()),
        &settings,
    );
    browser.attach(|media_ids: Vec<String>| {
        debug!(count = media_ids.len(), "Stale media ids: {:?}", media_ids);
    });

    match cli.library.clone().or_else(|| config.library_snapshot_path()) {
        Some(path) if path.exists() => load_snapshot(&repository, &path)?,
        Some(path) => {
            warn!(path = %path.display(), "Library snapshot not found, library is empty");
            repository.set_libraries(DeviceLibrary::default(), UserLibrary::default());
        }
        None => {
            info!("No library snapshot configured, library is empty");
            repository.set_libraries(DeviceLibrary::default(), UserLibrary::default());
        }
    }

    // ========== Requête ==========
    let output = match cli.command {
        Command::Root => serde_json::to_value(browser.root())?,
        Command::Item { media_id } => match browser.get_item(&media_id) {
            Some(item) => serde_json::to_value(item)?,
            None => bail!("No such item: {}", media_id),
        },
        Command::Browse {
            media_id,
            page,
            page_size,
            all,
        } => {
            let page = if all { PAGE_ALL } else { page };
            let page_size = page_size.unwrap_or(settings.default_page_size);
            match browser.get_children(&media_id, page, page_size) {
                Some(items) => serde_json::to_value(items)?,
                None => bail!("No children for {} (page {}, size {})", media_id, page, page_size),
            }
        }
        Command::Search {
            query,
            page,
            page_size,
            count,
        } => {
            let matches = browser.prepare_search(&query).await;
            if count {
                json!({ "query": query, "matches": matches })
            } else {
                let page_size = page_size.unwrap_or(settings.default_page_size);
                match browser.get_search_result(&query, page, page_size).await {
                    Some(items) => json!({ "query": query, "matches": matches, "items": items }),
                    None => bail!("No results page {} for '{}'", page, query),
                }
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    browser.release();
    Ok(())
}

fn load_snapshot(repository: &MusicRepository, path: &Path) -> anyhow::Result<()> {
    let (device, user) = LibrarySnapshot::load(path)
        .and_then(LibrarySnapshot::build)
        .with_context(|| format!("Failed to load library snapshot {}", path.display()))?;
    info!(
        path = %path.display(),
        songs = device.songs().len(),
        playlists = user.playlists().len(),
        "Library snapshot loaded"
    );
    repository.set_libraries(device, user);
    Ok(())
}
