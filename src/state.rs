// src/state.rs

use crate::core::{
    catalog::Catalog,
    resolver::{self, ResolvedStep},
    search::{self, SearchHit},
    session::{self, Event},
    store::SessionStore,
    ticket,
};
use crate::models::{OsEntry, SessionState, Task};

/// The running application: an immutable catalog, the one mutable session,
/// and the store the session is written to after every change.
#[derive(Debug)]
pub struct AppState {
    catalog: Catalog,
    session: SessionState,
    store: Box<dyn SessionStore>,
}

impl AppState {
    /// Restores the stored session (or defaults), repairs it against the
    /// catalog, and writes the repaired version back.
    pub fn open(catalog: Catalog, store: Box<dyn SessionStore>) -> Self {
        let stored = store.load().unwrap_or_default();
        let session = session::reconcile(&session::from_stored(&stored), &catalog);

        let state = Self {
            catalog,
            session,
            store,
        };
        state.persist();
        state
    }

    /// Applies a user event: transition, reconcile, persist.
    pub fn apply(&mut self, event: Event) -> &SessionState {
        log::debug!("Applying {:?}", event);
        let next = session::transition(&self.session, event, &self.catalog);
        self.session = session::reconcile(&next, &self.catalog);
        self.persist();
        &self.session
    }

    /// A failed save is logged and otherwise ignored.
    fn persist(&self) {
        if let Err(e) = self.store.save(&session::to_stored(&self.session)) {
            log::warn!("Could not save session: {}", e);
        }
    }

    /// The loaded catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The current, reconciled session.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The catalog section for the selected OS.
    pub fn current_os(&self) -> Option<&OsEntry> {
        self.catalog.os(self.session.os)
    }

    /// The selected task, if the selection resolves in the catalog.
    pub fn current_task(&self) -> Option<&Task> {
        self.catalog
            .find_task(self.session.os, &self.session.category, &self.session.task)
    }

    /// Search results for the current OS and search text (every task when the text is blank).
    pub fn results(&self) -> Vec<SearchHit<'_>> {
        search::search(&self.catalog, self.session.os, &self.session.search)
    }

    /// The visible, resolved steps of the current task.
    pub fn visible_steps(&self) -> Vec<ResolvedStep<'_>> {
        self.current_task()
            .map(|task| {
                resolver::visible_steps(
                    task,
                    self.session.os,
                    self.session.shell,
                    self.session.admin,
                )
            })
            .unwrap_or_default()
    }

    /// The "copy all" text for the current task.
    pub fn copy_all(&self) -> Option<String> {
        self.current_task().map(|task| {
            resolver::copy_all(
                task,
                self.session.os,
                self.session.shell,
                self.session.admin,
            )
        })
    }

    /// The ticket note for the current task.
    pub fn ticket(&self) -> Option<String> {
        let task = self.current_task()?;
        let os = self.current_os()?;
        Some(ticket::compose_ticket(
            task,
            os,
            self.session.shell,
            self.session.admin,
            self.session.redact,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paths::PathError;
    use crate::core::store::{FileSessionStore, MemorySessionStore, StoreError, store_or_memory};
    use crate::models::{OsId, StoredSession};
    use std::rc::Rc;

    /// Shares a memory store between the app and the test.
    #[derive(Debug, Clone, Default)]
    struct SharedStore(Rc<MemorySessionStore>);

    impl SessionStore for SharedStore {
        fn load(&self) -> Option<StoredSession> {
            self.0.load()
        }
        fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
            self.0.save(session)
        }
    }

    #[derive(Debug)]
    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn load(&self) -> Option<StoredSession> {
            None
        }
        fn save(&self, _: &StoredSession) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
    }

    fn open_with(store: SharedStore) -> AppState {
        AppState::open(Catalog::builtin().unwrap(), Box::new(store))
    }

    #[test]
    fn test_open_without_stored_state_uses_defaults() {
        let store = SharedStore::default();
        let app = open_with(store.clone());
        assert_eq!(app.session(), &SessionState::default());
        assert_eq!(store.0.writes(), 1);
    }

    #[test]
    fn test_open_repairs_stale_stored_selection() {
        let stored = StoredSession {
            os: Some("linux".to_string()),
            category: Some("disk".to_string()),
            task: Some("check_disk".to_string()),
            ..StoredSession::default()
        };
        let store = SharedStore(Rc::new(MemorySessionStore::with(stored)));
        let app = open_with(store.clone());

        assert_eq!(app.session().task, "disk_space");
        assert_eq!(store.0.load().unwrap().task.as_deref(), Some("disk_space"));
    }

    #[test]
    fn test_every_event_is_persisted() {
        let store = SharedStore::default();
        let mut app = open_with(store.clone());

        app.apply(Event::ChangeOs(OsId::Linux));
        app.apply(Event::ChangeSearch("disk".to_string()));
        assert_eq!(store.0.writes(), 3);

        let saved = store.0.load().unwrap();
        assert_eq!(saved.os.as_deref(), Some("linux"));
        assert_eq!(saved.category.as_deref(), Some("disk"));
        assert_eq!(saved.task.as_deref(), Some("disk_space"));
        assert_eq!(saved.search.as_deref(), Some("disk"));
    }

    #[test]
    fn test_session_survives_reopen() {
        let store = SharedStore::default();
        let mut app = open_with(store.clone());
        app.apply(Event::ChangeCategory("services".to_string()));
        app.apply(Event::SetAdmin(true));
        let before = app.session().clone();

        let reopened = open_with(store);
        assert_eq!(reopened.session(), &before);
    }

    #[test]
    fn test_failed_save_does_not_block() {
        let mut app = AppState::open(Catalog::builtin().unwrap(), Box::new(BrokenStore));
        let s = app.apply(Event::ChangeOs(OsId::Linux));
        assert_eq!(s.os, OsId::Linux);
    }

    #[test]
    fn test_unusable_session_location_does_not_block() {
        let located: Result<FileSessionStore, StoreError> =
            Err(StoreError::Path(PathError::ConfigDirNotFound));
        let mut app = AppState::open(Catalog::builtin().unwrap(), store_or_memory(located));

        app.apply(Event::ChangeOs(OsId::Linux));
        assert_eq!(app.session().os, OsId::Linux);
        assert!(app.ticket().unwrap().contains("OS: Linux"));
    }

    #[test]
    fn test_admin_toggle_reveals_gated_step_without_moving_selection() {
        let mut app = open_with(SharedStore::default());
        let labels = |app: &AppState| -> Vec<String> {
            app.visible_steps()
                .iter()
                .map(|r| r.step.label.clone())
                .collect()
        };

        assert!(!labels(&app).contains(&"Flush DNS cache".to_string()));
        assert!(!app.ticket().unwrap().contains("Flush DNS cache"));

        app.apply(Event::SetAdmin(true));
        assert_eq!(app.session().task, "dns_check");
        assert!(labels(&app).contains(&"Flush DNS cache".to_string()));
        assert!(app.ticket().unwrap().contains("3. Flush DNS cache"));
        assert!(app.copy_all().unwrap().ends_with("Clear-DnsClientCache"));
    }

    #[test]
    fn test_results_follow_search_text() {
        let mut app = open_with(SharedStore::default());
        assert_eq!(app.results().len(), app.catalog().task_count(OsId::Windows));
        app.apply(Event::ChangeSearch("disk".to_string()));
        let hits = app.results();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].is("disk", "disk_space"));
        assert_eq!(app.session().task, "disk_space");
    }
}
