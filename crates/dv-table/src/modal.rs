//! Fullscreen table controller.
//!
//! The modal re-parses the table markup in rich mode and keeps its own search,
//! filter, sort and visibility state, independent of the inline table. While
//! open it holds key and pointer listeners on the host; they are released when
//! the modal closes, re-opens or is dropped.

use std::rc::Rc;

use crate::model::ParseMode;
use crate::view::{TableView, ViewOptions};

/// Global events the modal listens to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    KeyDown,
    PointerDown,
}

/// Handle for an attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The host UI the modal registers listeners with.
pub trait EventHost {
    /// Start delivering `event` to the modal.
    fn attach(&self, event: HostEvent) -> ListenerId;

    /// Stop delivering events for `id`.
    fn detach(&self, id: ListenerId);
}

/// Listeners attached for as long as the guard lives.
pub struct ListenerGuard {
    host: Rc<dyn EventHost>,
    ids: Vec<ListenerId>,
}

impl ListenerGuard {
    /// Attach one listener per event.
    pub fn acquire(host: &Rc<dyn EventHost>, events: &[HostEvent]) -> Self {
        let ids = events.iter().map(|&event| host.attach(event)).collect();
        tracing::debug!(count = events.len(), "Attached modal listeners");
        Self {
            host: Rc::clone(host),
            ids,
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            self.host.detach(id);
        }
        tracing::debug!("Detached modal listeners");
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

struct Session {
    view: TableView<String>,
    _listeners: ListenerGuard,
}

/// Fullscreen view of one table.
pub struct TableModal {
    host: Rc<dyn EventHost>,
    options: ViewOptions,
    session: Option<Session>,
}

impl TableModal {
    #[must_use]
    pub fn new(host: Rc<dyn EventHost>, options: ViewOptions) -> Self {
        Self {
            host,
            options,
            session: None,
        }
    }

    /// Open on `markup` with fresh state.
    ///
    /// Re-opening releases the previous session's listeners first.
    pub fn open(&mut self, markup: &str) {
        self.session = None;
        let view = TableView::new(markup, ParseMode::Rich, self.options);
        let listeners =
            ListenerGuard::acquire(&self.host, &[HostEvent::KeyDown, HostEvent::PointerDown]);
        tracing::info!(
            columns = view.table().headers.len(),
            rows = view.table().rows.len(),
            "Opened fullscreen table"
        );
        self.session = Some(Session {
            view,
            _listeners: listeners,
        });
    }

    /// Close and release listeners. Returns whether the modal was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.session.take().is_some();
        if was_open {
            tracing::info!("Closed fullscreen table");
        }
        was_open
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn view(&self) -> Option<&TableView<String>> {
        self.session.as_ref().map(|s| &s.view)
    }

    pub fn view_mut(&mut self) -> Option<&mut TableView<String>> {
        self.session.as_mut().map(|s| &mut s.view)
    }

    /// Feed new markup to an open modal; state resets if it changed.
    pub fn update_markup(&mut self, markup: &str) {
        if let Some(session) = &mut self.session {
            session.view.set_markup(markup);
        }
    }

    /// Key press delivered by the host. Escape closes the modal.
    pub fn handle_key(&mut self, key: &str) -> bool {
        key == "Escape" && self.close()
    }

    /// Pointer press on the backdrop outside the table panel.
    pub fn handle_backdrop_pointer(&mut self) -> bool {
        self.close()
    }
}

impl std::fmt::Debug for TableModal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableModal")
            .field("options", &self.options)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::engine;
    use crate::model::ParsedTable;
    use crate::parser::parse_table;
    use crate::state::{FilterState, SortDirection, SortState, VisibleColumns};
    use crate::view::TableControls;

    #[derive(Default)]
    struct RecordingHost {
        next: Cell<u64>,
        attached: RefCell<BTreeMap<u64, HostEvent>>,
    }

    impl EventHost for RecordingHost {
        fn attach(&self, event: HostEvent) -> ListenerId {
            let id = self.next.get();
            self.next.set(id + 1);
            self.attached.borrow_mut().insert(id, event);
            ListenerId(id)
        }

        fn detach(&self, id: ListenerId) {
            self.attached.borrow_mut().remove(&id.0);
        }
    }

    const TEAM: &str = "<table><thead><tr><th>Name</th><th>Role</th></tr></thead><tbody>\
        <tr><td><b>Ann</b></td><td>Eng</td></tr>\
        <tr><td>Bo</td><td><i>PM</i></td></tr>\
        <tr><td>Cy</td><td>Eng</td></tr>\
        </tbody></table>";

    fn modal() -> (Rc<RecordingHost>, TableModal) {
        let host = Rc::new(RecordingHost::default());
        let dyn_host: Rc<dyn EventHost> = Rc::clone(&host) as Rc<dyn EventHost>;
        (host, TableModal::new(dyn_host, ViewOptions::default()))
    }

    #[test]
    fn test_listeners_attached_while_open() {
        let (host, mut modal) = modal();
        assert!(host.attached.borrow().is_empty());

        modal.open(TEAM);
        assert_eq!(host.attached.borrow().len(), 2);

        assert!(modal.close());
        assert!(host.attached.borrow().is_empty());
        assert!(!modal.close());
    }

    #[test]
    fn test_reopen_does_not_leak() {
        let (host, mut modal) = modal();
        modal.open(TEAM);
        modal.open(TEAM);
        assert_eq!(host.attached.borrow().len(), 2);
        drop(modal);
        assert!(host.attached.borrow().is_empty());
    }

    #[test]
    fn test_escape_and_backdrop_close() {
        let (_host, mut modal) = modal();
        modal.open(TEAM);
        assert!(!modal.handle_key("Enter"));
        assert!(modal.is_open());
        assert!(modal.handle_key("Escape"));
        assert!(!modal.is_open());

        modal.open(TEAM);
        assert!(modal.handle_backdrop_pointer());
        assert!(!modal.handle_backdrop_pointer());
    }

    #[test]
    fn test_state_independent_of_inline_view() {
        let (_host, mut modal) = modal();
        let mut inline = TableControls::new(TEAM, ParseMode::Plain, ViewOptions::default());
        inline.toggle_filter(1, "Eng");

        modal.open(TEAM);
        let view = modal.view_mut().unwrap();
        assert!(view.filters().is_empty());
        assert_eq!(view.rows().len(), 3);
        assert_eq!(view.table().value(0, "Name"), Some("<b>Ann</b>"));
    }

    #[test]
    fn test_same_results_as_inline() {
        let (_host, mut modal) = modal();
        let mut inline = TableControls::new(TEAM, ParseMode::Plain, ViewOptions::default());
        modal.open(TEAM);
        let view = modal.view_mut().unwrap();

        inline.toggle_filter(1, "Eng");
        inline.toggle_filter(1, "PM");
        inline.set_search("n");
        inline.set_sort(0, SortDirection::Desc);

        view.toggle_filter("Role".to_owned(), "Eng");
        view.toggle_filter("Role".to_owned(), "PM");
        view.set_search("n");
        view.set_sort("Name".to_owned(), SortDirection::Desc);

        assert_eq!(*inline.rows(), *view.rows());
        assert_eq!(*view.rows(), [2, 0]);
    }

    #[test]
    fn test_engine_agrees_across_modes() {
        let plain = parse_table(TEAM, ParseMode::Plain);
        let rich: ParsedTable = parse_table(TEAM, ParseMode::Rich);
        for query in ["", "a", "ENG", "pm", "zzz"] {
            let by_index = engine::run_pipeline(
                &plain,
                &FilterState::<usize>::new(),
                query,
                &SortState::by(1, SortDirection::Asc),
                &VisibleColumns::all(&plain),
            );
            let by_name = engine::run_pipeline(
                &rich,
                &FilterState::<String>::new(),
                query,
                &SortState::by("Role".to_owned(), SortDirection::Asc),
                &VisibleColumns::all(&rich),
            );
            assert_eq!(by_index, by_name, "query {query:?}");
        }
    }

    #[test]
    fn test_update_markup_resets_visibility() {
        let (_host, mut modal) = modal();
        modal.open(TEAM);
        modal.view_mut().unwrap().toggle_column("Role".to_owned());
        assert_eq!(modal.view().unwrap().visible().len(), 1);

        modal.update_markup(&TEAM.replace("Role", "Team"));
        let view = modal.view().unwrap();
        assert_eq!(view.visible().len(), 2);
        assert!(view.visible().contains(&"Team".to_owned()));
    }
}
