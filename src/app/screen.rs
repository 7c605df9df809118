//! Recordings screen controller.
//!
//! [`ScreenController`] receives the host's lifecycle callbacks and drives the
//! model, the renderer and the two background walks. It moves through three
//! states:
//!
//! ```text
//! Uninitialized --on_init--> Ready --go back--> Closed
//! ```
//!
//! Every callback runs inside [`interactive_guard`], so a failing handler is
//! logged (and data source failures shown to the user) without tearing the
//! window down. Callbacks arriving after the screen closed are ignored.

use super::cursor::CyclingBidiIterator;
use super::middleware::{interactive_guard, ClosedFlag, Timing, UiLock};
use super::model::ProgramListModel;
use super::render::IncrementalRenderer;
use super::sort::SortKey;
use crate::artwork::{FanartSource, ThumbnailCache};
use crate::domain::{Program, RecListError, Result};
use crate::storage::settings::{
    KEY_LAST_SELECTED, KEY_RECORDING_GROUP, KEY_SORT_ASCENDING, KEY_SORT_BY,
};
use crate::storage::{RecordingSource, SettingsStore};
use crate::ui::UiHandle;
use crate::worker::{ArtworkPrecacher, PosterFiller, TaskSpawner};
use std::collections::HashMap;
use std::sync::Arc;

/// Lifecycle state of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Constructed, widget not yet attached.
    Uninitialized,
    /// Attached and accepting input.
    Ready,
    /// Settings persisted and window released. Terminal.
    Closed,
}

/// Controls the host can click or focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// The recordings list itself.
    ProgramsList,
    Refresh,
    SortBy,
    SortAscending,
    /// Recording group selector. Reserved.
    RecordingGroup,
}

impl ControlId {
    pub const ALL: [Self; 5] = [
        Self::ProgramsList,
        Self::Refresh,
        Self::SortBy,
        Self::SortAscending,
        Self::RecordingGroup,
    ];

    /// Numeric id the host uses for this control.
    #[must_use]
    pub const fn raw(self) -> u32 {
        match self {
            Self::ProgramsList => 600,
            Self::Refresh => 250,
            Self::SortBy => 251,
            Self::SortAscending => 252,
            Self::RecordingGroup => 253,
        }
    }

    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|control| control.raw() == raw)
    }
}

/// Host actions the screen reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionId {
    ParentDir,
    PreviousMenu,
}

impl ActionId {
    #[must_use]
    pub const fn raw(self) -> u32 {
        match self {
            Self::ParentDir => 9,
            Self::PreviousMenu => 10,
        }
    }

    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        [Self::ParentDir, Self::PreviousMenu]
            .into_iter()
            .find(|action| action.raw() == raw)
    }
}

/// Shared collaborators handed to the details view.
#[derive(Clone)]
pub struct DetailsContext {
    pub thumbnails: Arc<dyn ThumbnailCache>,
    pub source: Arc<dyn RecordingSource>,
}

impl std::fmt::Debug for DetailsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailsContext").finish_non_exhaustive()
    }
}

/// Result of a details session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailsOutcome {
    /// The program under the cursor was deleted from the data source.
    pub deleted: bool,
}

/// Modal details window.
///
/// The view may move `programs` to page through recordings. When the user
/// deletes a recording the view removes it through `context.source`, leaves
/// the cursor on the deleted program and reports `deleted`.
pub trait DetailsView: Send {
    /// Runs the view until the user dismisses it.
    ///
    /// # Errors
    ///
    /// Returns an error if the view fails; the list is left as it was.
    fn show(
        &mut self,
        programs: &mut CyclingBidiIterator<Arc<Program>>,
        context: &DetailsContext,
    ) -> Result<DetailsOutcome>;
}

/// Everything the controller needs from its host.
pub struct ScreenServices {
    pub ui: Arc<dyn UiHandle>,
    pub source: Arc<dyn RecordingSource>,
    pub settings: Box<dyn SettingsStore>,
    pub thumbnails: Arc<dyn ThumbnailCache>,
    pub fanart: Arc<dyn FanartSource>,
    pub details: Box<dyn DetailsView>,
    pub spawner: Arc<dyn TaskSpawner>,
    pub timing: Timing,
}

type ClickHandler = fn(&mut ScreenController) -> Result<()>;

/// State machine behind the recordings screen.
pub struct ScreenController {
    state: ScreenState,
    ui: Arc<dyn UiHandle>,
    source: Arc<dyn RecordingSource>,
    settings: Box<dyn SettingsStore>,
    details: Box<dyn DetailsView>,
    details_context: DetailsContext,
    model: ProgramListModel,
    renderer: IncrementalRenderer,
    precacher: ArtworkPrecacher,
    posters: PosterFiller,
    closed: ClosedFlag,
    click_handlers: HashMap<ControlId, ClickHandler>,
    focused: Option<ControlId>,
}

impl std::fmt::Debug for ScreenController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenController")
            .field("state", &self.state)
            .field("model", &self.model)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl ScreenController {
    /// Builds the controller and restores the persisted screen settings.
    #[must_use]
    pub fn new(services: ScreenServices) -> Self {
        let ScreenServices {
            ui,
            source,
            settings,
            thumbnails,
            fanart,
            details,
            spawner,
            timing,
        } = services;

        let model = restore_model(settings.as_ref());
        let ui_lock = UiLock::new();
        let closed = ClosedFlag::new();

        Self {
            state: ScreenState::Uninitialized,
            renderer: IncrementalRenderer::new(Arc::clone(&ui), ui_lock.clone(), timing),
            precacher: ArtworkPrecacher::new(Arc::clone(&thumbnails), Arc::clone(&spawner), closed.clone()),
            posters: PosterFiller::new(
                Arc::clone(&ui),
                ui_lock,
                fanart,
                Arc::clone(&thumbnails),
                spawner,
                closed.clone(),
            ),
            details_context: DetailsContext {
                thumbnails,
                source: Arc::clone(&source),
            },
            ui,
            source,
            settings,
            details,
            model,
            closed,
            click_handlers: click_handlers(),
            focused: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ScreenState {
        self.state
    }

    #[must_use]
    pub const fn model(&self) -> &ProgramListModel {
        &self.model
    }

    /// Last control reported through [`on_focus`](Self::on_focus).
    #[must_use]
    pub const fn focused_control(&self) -> Option<ControlId> {
        self.focused
    }

    /// First activation: attaches the widget and loads the recordings.
    ///
    /// Later calls do nothing.
    pub fn on_init(&mut self) {
        if self.state != ScreenState::Uninitialized {
            tracing::debug!(state = ?self.state, "on_init ignored");
            return;
        }
        let ui = Arc::clone(&self.ui);
        interactive_guard("on_init", ui.as_ref(), || {
            self.ui.attach();
            self.state = ScreenState::Ready;
            tracing::info!("recordings screen ready");
            self.refresh()
        });
    }

    /// Remembers which control has focus.
    pub fn on_focus(&mut self, control_id: u32) {
        if self.state == ScreenState::Closed {
            return;
        }
        self.focused = ControlId::from_raw(control_id);
        tracing::trace!(control_id, focused = ?self.focused, "focus changed");
    }

    /// Dispatches a click through the control table.
    pub fn on_click(&mut self, control_id: u32) {
        if self.state != ScreenState::Ready {
            tracing::debug!(control_id, state = ?self.state, "click ignored");
            return;
        }
        let Some(control) = ControlId::from_raw(control_id) else {
            tracing::debug!(control_id, "click on unknown control");
            return;
        };
        let Some(handler) = self.click_handlers.get(&control).copied() else {
            return;
        };

        let _span = tracing::debug_span!("on_click", control = ?control).entered();
        let ui = Arc::clone(&self.ui);
        interactive_guard("on_click", ui.as_ref(), || handler(self));
    }

    /// Handles host actions. Only the "go back" actions do anything.
    pub fn on_action(&mut self, action_id: u32) {
        if self.state != ScreenState::Ready {
            tracing::debug!(action_id, state = ?self.state, "action ignored");
            return;
        }
        let Some(action) = ActionId::from_raw(action_id) else {
            tracing::trace!(action_id, "unhandled action");
            return;
        };

        let ui = Arc::clone(&self.ui);
        interactive_guard("on_action", ui.as_ref(), || match action {
            ActionId::ParentDir | ActionId::PreviousMenu => self.go_back(),
        });
    }

    /// Reloads the recordings, rebuilds the list and restarts both walks.
    ///
    /// # Errors
    ///
    /// Returns the data source error; the list keeps its previous rows.
    fn refresh(&mut self) -> Result<()> {
        self.sync_selection();
        self.model.refresh(self.source.as_ref())?;
        self.renderer.render(&mut self.model);
        self.precacher.start(self.model.all_programs());
        self.posters.start(self.model.row_entries());
        Ok(())
    }

    fn cycle_sort(&mut self) -> Result<()> {
        self.sync_selection();
        let next = self.model.sort_by.cycle_next();
        tracing::debug!(sort_by = next.name(), "sort key cycled");
        self.model.apply_sort(next, self.model.sort_ascending);
        self.rerender();
        Ok(())
    }

    fn toggle_sort_direction(&mut self) -> Result<()> {
        self.sync_selection();
        let ascending = !self.model.sort_ascending;
        tracing::debug!(ascending, "sort direction toggled");
        self.model.apply_sort(self.model.sort_by, ascending);
        self.rerender();
        Ok(())
    }

    /// Rebuilds the rows in the current order and refills their posters. The
    /// thumbnail cache is already warm, so the precacher is not restarted.
    fn rerender(&mut self) {
        self.renderer.render(&mut self.model);
        self.posters.start(self.model.row_entries());
    }

    fn select_recording_group(&mut self) -> Result<()> {
        tracing::info!(group = %self.model.group, "recording group selection is not supported");
        Ok(())
    }

    fn open_details(&mut self) -> Result<()> {
        let Some(index) = self.ui.selected_position() else {
            tracing::debug!("details requested on empty list");
            return Ok(());
        };
        let program = self
            .ui
            .selected_row()
            .and_then(|row| self.model.program_for_row(row))
            .cloned()
            .ok_or_else(|| RecListError::Details(format!("no program bound to row {index}")))?;
        self.model.selected_index = index;

        let _span = tracing::debug_span!("details", recording_id = %program.recording_id).entered();
        let mut cursor = CyclingBidiIterator::new(self.model.programs().to_vec(), index);
        let outcome = self.details.show(&mut cursor, &self.details_context)?;

        if outcome.deleted {
            let Some(deleted) = cursor.current().cloned() else {
                return Ok(());
            };
            if !self
                .renderer
                .render_program_deleted(&mut self.model, &deleted, cursor.index())
            {
                tracing::warn!(
                    recording_id = %deleted.recording_id,
                    "deleted program not found in list, rebuilding"
                );
                return self.refresh();
            }
        } else if cursor.index() != index {
            self.ui.select(cursor.index());
            self.model.selected_index = cursor.index();
        }
        Ok(())
    }

    /// Persists the screen settings, cancels background walks and releases
    /// the window.
    fn go_back(&mut self) -> Result<()> {
        self.sync_selection();
        let persisted = self.persist_settings();

        self.closed.close();
        self.ui.close();
        self.state = ScreenState::Closed;
        tracing::info!("recordings screen closed");
        persisted
    }

    fn persist_settings(&mut self) -> Result<()> {
        let selected = self.model.selected_index.to_string();
        let ascending = if self.model.sort_ascending { "true" } else { "false" };

        self.settings.put(KEY_LAST_SELECTED, &selected)?;
        self.settings.put(KEY_SORT_BY, self.model.sort_by.name())?;
        self.settings.put(KEY_SORT_ASCENDING, ascending)?;
        self.settings.put(KEY_RECORDING_GROUP, &self.model.group)?;
        Ok(())
    }

    fn sync_selection(&mut self) {
        if let Some(position) = self.ui.selected_position() {
            self.model.selected_index = position;
        }
    }
}

fn click_handlers() -> HashMap<ControlId, ClickHandler> {
    let mut handlers: HashMap<ControlId, ClickHandler> = HashMap::new();
    handlers.insert(ControlId::ProgramsList, ScreenController::open_details);
    handlers.insert(ControlId::Refresh, ScreenController::refresh);
    handlers.insert(ControlId::SortBy, ScreenController::cycle_sort);
    handlers.insert(ControlId::SortAscending, ScreenController::toggle_sort_direction);
    handlers.insert(ControlId::RecordingGroup, ScreenController::select_recording_group);
    handlers
}

fn restore_model(settings: &dyn SettingsStore) -> ProgramListModel {
    let raw_sort = settings.get(KEY_SORT_BY);
    let sort_by = SortKey::from_name(&raw_sort).unwrap_or_else(|| {
        tracing::warn!(sort_by = %raw_sort, "unknown persisted sort key, using Date");
        SortKey::Date
    });

    let mut model = ProgramListModel::new(sort_by, settings.get_bool(KEY_SORT_ASCENDING));

    let raw_selected = settings.get(KEY_LAST_SELECTED);
    model.selected_index = raw_selected.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(selected = %raw_selected, "invalid persisted selection, using 0");
        0
    });
    model.group = settings.get(KEY_RECORDING_GROUP);

    tracing::debug!(
        sort_by = model.sort_by.name(),
        ascending = model.sort_ascending,
        selected = model.selected_index,
        "screen settings restored"
    );
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySettings;

    #[test]
    fn control_ids_round_trip_through_raw() {
        for control in ControlId::ALL {
            assert_eq!(ControlId::from_raw(control.raw()), Some(control));
        }
        assert_eq!(ControlId::from_raw(600), Some(ControlId::ProgramsList));
        assert_eq!(ControlId::from_raw(1), None);
        assert_eq!(ActionId::from_raw(10), Some(ActionId::PreviousMenu));
        assert_eq!(ActionId::from_raw(9), Some(ActionId::ParentDir));
        assert_eq!(ActionId::from_raw(7), None);
    }

    #[test]
    fn every_control_has_a_click_handler() {
        let handlers = click_handlers();
        assert!(ControlId::ALL.iter().all(|control| handlers.contains_key(control)));
    }

    #[test]
    fn restores_persisted_settings() {
        let settings = MemorySettings::with_values([
            (KEY_SORT_BY, "Title"),
            (KEY_SORT_ASCENDING, "FALSE"),
            (KEY_LAST_SELECTED, "3"),
            (KEY_RECORDING_GROUP, "Kids"),
        ]);
        let model = restore_model(&settings);
        assert_eq!(model.sort_by, SortKey::Title);
        assert!(!model.sort_ascending);
        assert_eq!(model.selected_index, 3);
        assert_eq!(model.group, "Kids");
    }

    #[test]
    fn invalid_settings_fall_back() {
        let settings = MemorySettings::with_values([
            (KEY_SORT_BY, "Channel"),
            (KEY_LAST_SELECTED, "-2"),
        ]);
        let model = restore_model(&settings);
        assert_eq!(model.sort_by, SortKey::Date);
        assert!(model.sort_ascending);
        assert_eq!(model.selected_index, 0);
        assert_eq!(model.group, "Default");
    }
}
