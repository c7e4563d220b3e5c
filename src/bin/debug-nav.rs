/// Diagnostic tool: build both panes for a location and dump every row
use std::path::PathBuf;

use edgelist::classify::TypeTable;
use edgelist::config::AppConfig;
use edgelist::prefs::TomlPreferences;
use edgelist::{Location, NavigationState, Services};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("edgelist=debug".parse()?),
        )
        .init();

    let target = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("::drives"));

    let config_dir = AppConfig::default_dir();
    let prefs = TomlPreferences::load(&AppConfig::prefs_path(&config_dir))?;
    let config = AppConfig::from_prefs(&config_dir, &prefs);
    println!("=== DIAGNOSTIC: Navigation panes ===");
    println!("Config: {}", config_dir.display());
    println!(
        "Limits: {} bookmarks, {} history, size timeout {:?}, slow probe {:?}, mount cache {:?}",
        config.max_bookmarks, config.max_history, config.size_timeout, config.slow_probe, config.mount_cache
    );

    let services = Services {
        classifier: Box::new(TypeTable::from_prefs(&prefs)),
        ..Services::system(config.mount_cache)
    };
    let mut state = NavigationState::load(&config, &prefs, services)?;
    println!("Options: {:?}", state.options());

    state.set_current_directory(Location::from_path(&target));
    println!("\nRequested: {}", target.display());
    println!("Showing:   {} ({:?})", state.current(), state.context());

    println!("\n[1] Navigation pane: {} rows", state.nav_pane().len());
    for (i, item) in state.nav_pane().iter().enumerate() {
        println!("    [{:>2}] {:?} '{}' path={}", i, item.role, item.display_name, item.path.display());
    }

    println!("\n[2] File pane: {} rows", state.file_pane().len());
    for (i, item) in state.file_pane().iter().enumerate() {
        println!(
            "    [{:>2}] '{}' attrs={:?} size={} color={} src={} lower={}",
            i,
            item.display_name,
            item.attrs,
            item.size,
            item.color_tag,
            item.source_index,
            state.movable_to_lower(edgelist::PaneKind::File, i)?
        );
    }

    println!("\n[3] Sources");
    println!("    Bookmarks: {}", state.bookmarks().len());
    println!("    History:   {}", state.history().len());
    for drive in state.drives().entries() {
        println!(
            "    Drive {} '{}' removable={} slow={} ready={}",
            drive.root.display(),
            drive.label,
            drive.removable,
            drive.slow,
            drive.ready
        );
    }

    Ok(())
}
