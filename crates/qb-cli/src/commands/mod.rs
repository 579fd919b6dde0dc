pub mod account;
pub mod create;
pub mod list;
pub mod select;
pub mod show;
pub mod status;
pub mod train;

use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;
use qb_client::store::SESSION_FILE;
use qb_client::{ApiClient, ClientConfig, SessionStore, StatusScreen};
use qb_core::{AllocationSession, Attribute, Character};
use tracing::debug;

/// Everything a command needs: where the API is and the stored session.
pub struct Context {
    pub config: ClientConfig,
    pub store: SessionStore,
}

impl Context {
    pub fn new(
        api_url: Option<String>,
        timeout: Option<u64>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self, String> {
        let mut config = ClientConfig::from_env().map_err(|e| e.to_string())?;
        if let Some(url) = api_url {
            config = config.with_base_url(url);
        }
        if let Some(secs) = timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        let dir = data_dir
            .or_else(SessionStore::default_dir)
            .ok_or("cannot determine a data directory; pass --data-dir")?;
        let path = dir.join(SESSION_FILE);
        debug!(api = %config.base_url, session = %path.display(), "starting");
        let store = SessionStore::open(path).map_err(|e| e.to_string())?;

        Ok(Self { config, store })
    }

    /// Client without credentials, for register and login.
    pub fn anonymous_api(&self) -> Result<ApiClient, String> {
        ApiClient::new(&self.config).map_err(|e| e.to_string())
    }

    /// Client carrying the stored token.
    pub fn api(&self) -> Result<ApiClient, String> {
        let token = self.store.require_token().map_err(|e| e.to_string())?;
        Ok(self.anonymous_api()?.with_token(token))
    }

    /// A status screen for the selected character, already loaded.
    pub async fn status_screen(&self) -> Result<StatusScreen<ApiClient>, String> {
        let id = self.store.require_selected().map_err(|e| e.to_string())?;
        let mut screen = StatusScreen::new(self.api()?, id);
        screen
            .load()
            .await
            .map_err(|e| format!("cannot load character {id}: {e}"))?;
        Ok(screen)
    }
}

/// Render the allocation view: one row per attribute with its controls.
pub fn render_allocation(character: &Character, session: &AllocationSession) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  {} {}\n",
        character.name.bold(),
        format!("(level {})", character.level).dimmed()
    ));
    out.push_str(&format!(
        "  Available points: {}/{}\n\n",
        session.budget(),
        session.initial_budget()
    ));

    for attr in Attribute::ALL {
        let minus = if session.can_decrease(attr) {
            "[-]".normal()
        } else {
            "[-]".dimmed()
        };
        let plus = if session.can_increase() {
            "[+]".normal()
        } else {
            "[+]".dimmed()
        };
        let allocated = session.allocated(attr);
        let delta = if allocated > 0 {
            format!(" (+{allocated})").green().to_string()
        } else {
            String::new()
        };
        out.push_str(&format!(
            "  {:<11} {minus} {:>3} {plus}{delta}\n",
            attr.label(),
            attr.get(session.working()),
        ));
    }
    out
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}
