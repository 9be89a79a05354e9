use std::io::BufRead;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use sales_model::{
    import_csv, load_dataset, CsvOptions, Dataset, GeoTable, ImportError, LoadError, LoadReport,
    RawTable,
};
use thiserror::Error;

use crate::config::{ConfigError, DashboardConfig};
use crate::dashboard::{render, DashboardView, RenderRequest};

/// Identifies one background render. Only the most recently issued ticket may publish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

type Published = Option<(RefreshTicket, Arc<DashboardView>)>;

/// Immutable data snapshots plus the last published view for one dashboard session.
///
/// Renders may run on any thread; publication is last-write-wins by ticket, so a slow render
/// that was superseded while it ran is dropped instead of overwriting a newer view.
#[derive(Debug)]
pub struct DashboardSession {
    dataset: Arc<Dataset>,
    geo: Arc<GeoTable>,
    config: DashboardConfig,
    report: LoadReport,
    generation: AtomicU64,
    published: Mutex<Published>,
}

impl DashboardSession {
    /// Fails when `config` does not pass [`DashboardConfig::validate`].
    pub fn new(
        dataset: Arc<Dataset>,
        geo: Arc<GeoTable>,
        config: DashboardConfig,
        report: LoadReport,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            dataset,
            geo,
            config,
            report,
            generation: AtomicU64::new(0),
            published: Mutex::new(None),
        })
    }

    /// Validate `table` with the config's column mapping and date settings.
    pub fn load(
        table: &RawTable,
        geo: Arc<GeoTable>,
        config: DashboardConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let (dataset, report) = load_dataset(table, &config.load_options())?;
        Ok(Self::new(Arc::new(dataset), geo, config, report)?)
    }

    pub fn from_csv<R: BufRead>(
        reader: R,
        csv: &CsvOptions,
        geo: Arc<GeoTable>,
        config: DashboardConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let table = import_csv(reader, csv)?;
        Self::load(&table, geo, config)
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn geo(&self) -> &Arc<GeoTable> {
        &self.geo
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn render(&self, request: &RenderRequest) -> DashboardView {
        render(&self.dataset, &self.geo, request, &self.config)
    }

    /// Issue a ticket newer than every ticket issued before it.
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Store `view` if `ticket` is still the newest issued ticket.
    ///
    /// Returns `false` (and drops `view`) when a newer refresh has begun or already published.
    pub fn publish(&self, ticket: RefreshTicket, view: DashboardView) -> bool {
        let mut slot = self.lock_published();
        // `begin_refresh` does not take this lock, so a newer ticket may still be issued after
        // this check; its own publish then replaces the view.
        if ticket.0 != self.generation.load(Ordering::Acquire) {
            log::debug!("discarding superseded render {}", ticket.0);
            return false;
        }
        if matches!(&*slot, Some((current, _)) if *current >= ticket) {
            return false;
        }
        *slot = Some((ticket, Arc::new(view)));
        true
    }

    /// Begin a refresh, render `request`, and publish the result.
    pub fn refresh(&self, request: &RenderRequest) -> bool {
        let ticket = self.begin_refresh();
        let view = self.render(request);
        self.publish(ticket, view)
    }

    pub fn latest(&self) -> Option<Arc<DashboardView>> {
        self.lock_published()
            .as_ref()
            .map(|(_, view)| Arc::clone(view))
    }

    fn lock_published(&self) -> MutexGuard<'_, Published> {
        self.published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
