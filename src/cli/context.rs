use std::{path::Path, sync::Arc};

use ansi_term::{Colour, Style};
use anyhow::Result;

use crate::{
    daemon::store_dir,
    habits::repository::HabitRepository,
    reminder::scheduler::ReminderScheduler,
    settings::{Settings, Theme},
    store::file_store::FileStore,
    utils::clock::DefaultClock,
};

/// Everything a command needs, created once at startup. Settings live here instead of in global
/// state, a command that changes them replaces the value with what the setter returned.
pub struct AppContext {
    pub store: Arc<FileStore>,
    pub repository: HabitRepository<Arc<FileStore>>,
    pub scheduler: ReminderScheduler<Arc<FileStore>>,
    pub settings: Settings,
}

impl AppContext {
    pub async fn open(app_dir: &Path) -> Result<Self> {
        let store = Arc::new(FileStore::new(store_dir(app_dir))?);
        let settings = Settings::load(&store).await;
        Ok(Self {
            repository: HabitRepository::new(store.clone(), Box::new(DefaultClock)),
            scheduler: ReminderScheduler::new(store.clone(), Box::new(DefaultClock)),
            store,
            settings,
        })
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.settings.theme)
    }
}

/// Terminal styles derived from the theme.
pub struct Palette {
    pub heading: Style,
    pub done: Style,
    pub pending: Style,
    pub muted: Style,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                heading: Colour::Blue.bold(),
                done: Colour::Green.normal(),
                pending: Colour::Blue.normal(),
                muted: Colour::Fixed(244).normal(),
            },
            Theme::Dark => Palette {
                heading: Colour::White.bold(),
                done: Colour::Fixed(120).bold(),
                pending: Colour::Fixed(117).normal(),
                muted: Colour::Fixed(248).normal(),
            },
        }
    }
}
