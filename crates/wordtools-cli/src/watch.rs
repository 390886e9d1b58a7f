//! `wordtools watch`: record vault changes as they happen.
//!
//! File events are applied to the counting service immediately. The status
//! line, the history file, and the vault-wide recount each trail behind
//! their own debouncer so a burst of saves costs one refresh of each.
//! Ctrl-C ends the loop and writes any history still waiting on its delay.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use wordtools_core::CountingService;
use wordtools_vault::{
    read_document, CountCache, Debouncer, VaultEvent, VaultTotals, VaultWatcher,
};

use crate::Session;

/// Longest wait for an event when nothing is pending. Bounds how late a
/// new day is noticed.
const IDLE_POLL: Duration = Duration::from_secs(1);

pub(crate) fn run(session: Session) -> Result<()> {
    let shutdown = shutdown_flag()?;
    let mut state = WatchState::new(session)?;
    let watcher = VaultWatcher::start(state.session.vault()).context("failed to watch vault")?;
    info!(
        root = %state.session.vault().root().display(),
        history = %state.session.history_file().path().display(),
        "watching vault"
    );
    println!("{}", state.status_line());

    while !shutdown.load(Ordering::SeqCst) {
        let timeout = state.next_timeout(Instant::now());
        if let Some(event) = watcher.recv_timeout(timeout) {
            state.handle(event, Instant::now());
            while let Some(event) = watcher.try_recv() {
                state.handle(event, Instant::now());
            }
        }
        if let Some(line) = state.tick(Instant::now())? {
            println!("{line}");
        }
    }

    info!("shutting down");
    state.shutdown()
}

/// A flag raised on Ctrl-C. The signal is awaited on a small runtime in
/// its own thread so the watch loop itself stays synchronous.
fn shutdown_flag() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start signal listener")?;

    let raised = Arc::clone(&flag);
    std::thread::spawn(move || {
        runtime.block_on(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => raised.store(true, Ordering::SeqCst),
                Err(e) => warn!(error = %e, "failed to listen for ctrl-c"),
            }
        });
    });
    Ok(flag)
}

pub(crate) struct WatchState {
    session: Session,
    service: CountingService,
    cache: CountCache,
    totals: VaultTotals,
    display: Debouncer<()>,
    save: Debouncer<()>,
    rescan: Debouncer<()>,
}

impl WatchState {
    /// Load the history and take an initial count of the vault.
    pub(crate) fn new(session: Session) -> Result<Self> {
        let service = session.load_service()?;
        let config = session.config();
        let mut cache = CountCache::new(*service.settings());
        let totals = session
            .vault()
            .scan(&mut cache)
            .context("failed to scan vault")?;

        Ok(Self {
            display: Debouncer::new(config.display_update_delay()),
            save: Debouncer::new(config.save_delay()),
            rescan: Debouncer::new(config.global_update_delay()),
            session,
            service,
            cache,
            totals,
        })
    }

    pub(crate) fn handle(&mut self, event: VaultEvent, now: Instant) {
        debug!(?event, "vault event");
        match event {
            VaultEvent::Changed(path) => {
                if !self.document_changed(&path) {
                    return;
                }
                self.save.push((), now);
            }
            VaultEvent::Removed(path) => {
                self.cache.invalidate(&path);
            }
            VaultEvent::Renamed { from, to } => {
                let day = self.session.day();
                let from_key = self.session.vault().relative_key(&from);
                let to_key = self.session.vault().relative_key(&to);
                if self.service.document_renamed(&day, &from_key, &to_key) {
                    self.save.push((), now);
                }
                self.cache.invalidate(&from);
            }
        }
        self.rescan.push((), now);
        self.display.push((), now);
    }

    /// Record a changed document. A file first seen today starts from the
    /// count it had at the last scan, so only words written since count.
    fn document_changed(&mut self, path: &Path) -> bool {
        let raw = match read_document(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "skipping unreadable document");
                return false;
            }
        };
        let day = self.session.day();
        let key = self.session.vault().relative_key(path);

        if !self.service.store().is_tracked(&day, &key) {
            let previous = self.cache.get(path).map_or(0, |cached| cached.counts.words);
            self.service
                .store_mut()
                .record_file_count(&day, &key, previous);
        }
        let update = self.service.document_changed(&day, &key, &raw);
        debug!(
            path = %key,
            words = update.counts.words,
            daily = update.daily_total,
            "recorded change"
        );
        true
    }

    /// Fire whichever debouncers are due. Returns a fresh status line when
    /// the display refresh fired.
    pub(crate) fn tick(&mut self, now: Instant) -> Result<Option<String>> {
        if self.rescan.poll(now).is_some() {
            self.totals = self
                .session
                .vault()
                .scan(&mut self.cache)
                .context("failed to scan vault")?;
        }
        if self.save.poll(now).is_some() {
            self.session.save(&self.service)?;
        }
        Ok(self.display.poll(now).map(|()| self.status_line()))
    }

    /// Time to block waiting for events before the next debouncer is due.
    pub(crate) fn next_timeout(&self, now: Instant) -> Duration {
        [&self.display, &self.save, &self.rescan]
            .iter()
            .filter_map(|d| d.time_until_due(now))
            .min()
            .map_or(IDLE_POLL, |due| due.min(IDLE_POLL))
    }

    /// Write history that is still waiting on the save delay.
    pub(crate) fn shutdown(&mut self) -> Result<()> {
        if self.save.flush().is_some() {
            self.session.save(&self.service)?;
        }
        Ok(())
    }

    pub(crate) fn status_line(&self) -> String {
        format!(
            "{} | {} words in vault ({} files)",
            self.session.today_line(&self.service),
            self.totals.counts.words,
            self.totals.files
        )
    }
}
