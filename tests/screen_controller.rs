//! Drives the recordings screen through its public callbacks with in-memory
//! collaborators, a synchronous spawner and timing disabled.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use reclist::app::{
    ActionId, ControlId, CyclingBidiIterator, DetailsContext, DetailsOutcome, DetailsView, Timing,
};
use reclist::artwork::{NoFanart, ThumbnailCache};
use reclist::storage::settings::{
    KEY_LAST_SELECTED, KEY_RECORDING_GROUP, KEY_SORT_ASCENDING, KEY_SORT_BY,
};
use reclist::storage::{MemorySettings, RecordingSource, SettingsStore};
use reclist::ui::{
    MemoryList, UiHandle, POSTER_PLACEHOLDER, PROP_POSTER, PROP_SORT_ASCENDING, PROP_SORT_BY,
    PROP_TITLE,
};
use reclist::worker::InlineSpawner;
use reclist::{Program, RecListError, Result, ScreenController, ScreenServices, ScreenState};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeSource {
    programs: Mutex<Vec<Program>>,
    offline: AtomicBool,
    fetches: AtomicUsize,
    deleted: Mutex<Vec<String>>,
}

impl FakeSource {
    fn with(programs: Vec<Program>) -> Arc<Self> {
        Arc::new(Self {
            programs: Mutex::new(programs),
            ..Self::default()
        })
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl RecordingSource for FakeSource {
    fn get_all_recordings(&self) -> Result<Vec<Program>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(RecListError::Source("backend unreachable".into()));
        }
        Ok(self.programs.lock().unwrap().clone())
    }

    fn delete_recording(&self, program: &Program) -> Result<()> {
        self.programs
            .lock()
            .unwrap()
            .retain(|p| p.recording_id != program.recording_id);
        self.deleted.lock().unwrap().push(program.recording_id.clone());
        Ok(())
    }
}

#[derive(Default)]
struct CountingThumbnails {
    calls: AtomicUsize,
}

impl ThumbnailCache for CountingThumbnails {
    fn get(&self, program: &Program) -> Result<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PathBuf::from(format!("/cache/{}.png", program.recording_id)))
    }
}

/// Settings the test can still read after handing them to the controller.
#[derive(Clone, Default)]
struct SharedSettings(Arc<Mutex<MemorySettings>>);

impl SharedSettings {
    fn with(values: &[(&str, &str)]) -> Self {
        Self(Arc::new(Mutex::new(MemorySettings::with_values(values.iter().copied()))))
    }

    fn value(&self, key: &str) -> String {
        self.0.lock().unwrap().get(key)
    }
}

impl SettingsStore for SharedSettings {
    fn get(&self, key: &str) -> String {
        self.0.lock().unwrap().get(key)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.0.lock().unwrap().put(key, value)
    }
}

type Script = Box<
    dyn FnMut(&mut CyclingBidiIterator<Arc<Program>>, &DetailsContext) -> Result<DetailsOutcome>
        + Send,
>;

/// Details view that runs a scripted interaction and records what it saw.
struct ScriptedDetails {
    script: Script,
    opened_on: Arc<Mutex<Vec<String>>>,
}

impl DetailsView for ScriptedDetails {
    fn show(
        &mut self,
        programs: &mut CyclingBidiIterator<Arc<Program>>,
        context: &DetailsContext,
    ) -> Result<DetailsOutcome> {
        if let Some(current) = programs.current() {
            self.opened_on.lock().unwrap().push(current.recording_id.clone());
        }
        (self.script)(programs, context)
    }
}

struct Harness {
    screen: ScreenController,
    list: Arc<MemoryList>,
    source: Arc<FakeSource>,
    thumbnails: Arc<CountingThumbnails>,
    settings: SharedSettings,
    opened_on: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    fn new(programs: Vec<Program>, settings: SharedSettings, script: Script) -> Self {
        let list = Arc::new(MemoryList::new());
        let source = FakeSource::with(programs);
        let thumbnails = Arc::new(CountingThumbnails::default());
        let opened_on = Arc::new(Mutex::new(Vec::new()));

        let screen = ScreenController::new(ScreenServices {
            ui: list.clone(),
            source: source.clone(),
            settings: Box::new(settings.clone()),
            thumbnails: thumbnails.clone(),
            fanart: Arc::new(NoFanart),
            details: Box::new(ScriptedDetails {
                script,
                opened_on: opened_on.clone(),
            }),
            spawner: Arc::new(InlineSpawner),
            timing: Timing::Disabled,
        });

        Self {
            screen,
            list,
            source,
            thumbnails,
            settings,
            opened_on,
        }
    }

    fn titles(&self) -> Vec<String> {
        self.list.snapshot().column(PROP_TITLE)
    }

    fn click(&mut self, control: ControlId) {
        self.screen.on_click(control.raw());
    }
}

fn dismiss() -> Script {
    Box::new(|_, _| Ok(DetailsOutcome::default()))
}

fn program(id: &str, title: &str, hours: i64, aired: (i32, u32, u32)) -> Program {
    let base = Utc.with_ymd_and_hms(2021, 3, 1, 20, 0, 0).unwrap();
    Program::new(id, title, base + Duration::hours(hours))
        .with_original_air_date(NaiveDate::from_ymd_opt(aired.0, aired.1, aired.2).unwrap())
}

fn catalogue() -> Vec<Program> {
    vec![
        program("a", "Nova", 2, (2019, 5, 1)),
        program("b", "Frontline", 0, (2020, 1, 1)),
        program("c", "Masterpiece", 1, (2018, 9, 9)),
    ]
}

#[test]
fn init_renders_restored_sort_and_fills_posters() {
    let settings = SharedSettings::with(&[(KEY_SORT_BY, "Title"), (KEY_SORT_ASCENDING, "true")]);
    let mut h = Harness::new(catalogue(), settings, dismiss());

    assert_eq!(h.screen.state(), ScreenState::Uninitialized);
    h.screen.on_init();

    assert_eq!(h.screen.state(), ScreenState::Ready);
    assert!(h.list.is_attached());
    assert_eq!(h.titles(), vec!["Frontline", "Masterpiece", "Nova"]);

    let snapshot = h.list.snapshot();
    assert_eq!(snapshot.window_property(PROP_SORT_BY), Some("Title"));
    assert_eq!(snapshot.window_property(PROP_SORT_ASCENDING), Some("true"));
    assert_eq!(
        snapshot.column(PROP_POSTER),
        vec!["/cache/b.png", "/cache/c.png", "/cache/a.png"]
    );
    // Precacher plus poster filler, one lookup each per program.
    assert_eq!(h.thumbnails.calls.load(Ordering::SeqCst), 6);
}

#[test]
fn second_init_is_ignored() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.screen.on_init();
    h.screen.on_init();
    assert_eq!(h.source.fetches(), 1);
}

#[test]
fn clicks_before_init_are_ignored() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.click(ControlId::Refresh);
    assert_eq!(h.source.fetches(), 0);
    assert!(h.list.is_empty());
}

#[test]
fn default_sort_is_by_recording_date() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.screen.on_init();
    assert_eq!(h.titles(), vec!["Frontline", "Masterpiece", "Nova"]);
    assert_eq!(h.list.snapshot().window_property(PROP_SORT_BY), Some("Date"));
}

#[test]
fn unknown_persisted_sort_falls_back_to_date() {
    let settings = SharedSettings::with(&[(KEY_SORT_BY, "Channel"), (KEY_SORT_ASCENDING, "false")]);
    let mut h = Harness::new(catalogue(), settings, dismiss());
    h.screen.on_init();

    assert_eq!(h.list.snapshot().window_property(PROP_SORT_BY), Some("Date"));
    assert_eq!(h.titles(), vec!["Nova", "Masterpiece", "Frontline"]);
}

#[test]
fn restored_selection_is_applied_and_clamped() {
    let settings = SharedSettings::with(&[(KEY_LAST_SELECTED, "1")]);
    let mut h = Harness::new(catalogue(), settings, dismiss());
    h.screen.on_init();
    assert_eq!(h.list.selected_position(), Some(1));

    let settings = SharedSettings::with(&[(KEY_LAST_SELECTED, "42")]);
    let mut h = Harness::new(catalogue(), settings, dismiss());
    h.screen.on_init();
    assert_eq!(h.list.selected_position(), Some(2));
}

#[test]
fn offline_source_keeps_the_window_alive() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.source.offline.store(true, Ordering::SeqCst);
    h.screen.on_init();

    assert_eq!(h.screen.state(), ScreenState::Ready);
    assert!(h.list.is_empty());
    let errors = h.list.take_errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("backend unreachable"));

    h.source.offline.store(false, Ordering::SeqCst);
    h.click(ControlId::Refresh);
    assert_eq!(h.list.len(), 3);
    assert!(h.list.take_errors().is_empty());
}

#[test]
fn failed_refresh_keeps_previous_rows() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.screen.on_init();
    let before = h.titles();

    h.source.offline.store(true, Ordering::SeqCst);
    h.click(ControlId::Refresh);

    assert_eq!(h.titles(), before);
    assert_eq!(h.list.take_errors().len(), 1);
}

#[test]
fn title_sort_and_direction_toggle() {
    let programs = vec![
        program("A", "Zoo", 0, (2020, 1, 1)),
        program("B", "Ant", 1, (2020, 1, 1)),
    ];
    let settings = SharedSettings::with(&[(KEY_SORT_BY, "Title")]);
    let mut h = Harness::new(programs, settings, dismiss());
    h.screen.on_init();
    assert_eq!(h.titles(), vec!["Ant", "Zoo"]);

    h.click(ControlId::SortAscending);
    assert_eq!(h.titles(), vec!["Zoo", "Ant"]);
    assert_eq!(h.list.snapshot().window_property(PROP_SORT_ASCENDING), Some("false"));
    assert!(!h.screen.model().sort_ascending);
}

#[test]
fn sort_button_cycles_through_every_key() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.screen.on_init();

    h.click(ControlId::SortBy);
    assert_eq!(h.list.snapshot().window_property(PROP_SORT_BY), Some("Title"));
    assert_eq!(h.titles(), vec!["Frontline", "Masterpiece", "Nova"]);

    h.click(ControlId::SortBy);
    assert_eq!(h.list.snapshot().window_property(PROP_SORT_BY), Some("Orig. Air Date"));
    assert_eq!(h.titles(), vec!["Masterpiece", "Nova", "Frontline"]);

    h.click(ControlId::SortBy);
    assert_eq!(h.list.snapshot().window_property(PROP_SORT_BY), Some("Date"));
    // Sorting re-renders without going back to the source.
    assert_eq!(h.source.fetches(), 1);
}

#[test]
fn re_sort_refills_posters() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.screen.on_init();
    let lookups_after_init = h.thumbnails.calls.load(Ordering::SeqCst);

    h.click(ControlId::SortBy);
    h.click(ControlId::SortBy);
    let posters = h.list.snapshot().column(PROP_POSTER);
    assert_eq!(posters, vec!["/cache/c.png", "/cache/a.png", "/cache/b.png"]);
    assert!(!posters.iter().any(|p| p == POSTER_PLACEHOLDER));

    h.click(ControlId::SortAscending);
    assert_eq!(
        h.list.snapshot().column(PROP_POSTER),
        vec!["/cache/b.png", "/cache/a.png", "/cache/c.png"]
    );
    // Only the poster filler runs again: one lookup per row per re-sort.
    assert_eq!(h.thumbnails.calls.load(Ordering::SeqCst), lookups_after_init + 9);
}

#[test]
fn recording_group_button_is_a_no_op() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.screen.on_init();
    let before = h.list.snapshot();
    h.click(ControlId::RecordingGroup);
    assert_eq!(h.list.snapshot(), before);
}

#[test]
fn details_opens_on_the_selected_program() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.screen.on_init();
    h.list.select(2);
    let rows_before = h.screen.model().rows().to_vec();

    h.click(ControlId::ProgramsList);

    assert_eq!(*h.opened_on.lock().unwrap(), vec!["a"]);
    assert_eq!(h.list.selected_position(), Some(2));
    assert_eq!(h.screen.model().rows(), rows_before.as_slice());
}

#[test]
fn paging_in_details_moves_the_selection_without_rebuilding() {
    let script: Script = Box::new(|programs, _| {
        programs.next();
        programs.next();
        Ok(DetailsOutcome::default())
    });
    let mut h = Harness::new(catalogue(), SharedSettings::default(), script);
    h.screen.on_init();
    h.list.select(0);
    let rows_before = h.screen.model().rows().to_vec();

    h.click(ControlId::ProgramsList);

    assert_eq!(h.list.selected_position(), Some(2));
    assert_eq!(h.screen.model().selected_index, 2);
    assert_eq!(h.screen.model().rows(), rows_before.as_slice());
}

#[test]
fn deleting_in_details_removes_the_row() {
    let script: Script = Box::new(|programs, context| {
        let current = Arc::clone(programs.current().unwrap());
        context.source.delete_recording(&current)?;
        Ok(DetailsOutcome { deleted: true })
    });
    let programs = vec![
        program("A", "Zoo", 0, (2020, 1, 1)),
        program("B", "Ant", 1, (2020, 1, 1)),
    ];
    let settings = SharedSettings::with(&[(KEY_SORT_BY, "Title")]);
    let mut h = Harness::new(programs, settings, script);
    h.screen.on_init();
    h.list.select(0);

    h.click(ControlId::ProgramsList);

    assert_eq!(*h.source.deleted.lock().unwrap(), vec!["B"]);
    assert_eq!(h.titles(), vec!["Zoo"]);
    assert_eq!(h.list.selected_position(), Some(0));
    assert_eq!(h.screen.model().row_entries().len(), 1);
    assert_eq!(h.screen.model().row_entries()[0].1.recording_id, "A");

    // A later re-sort works from the updated snapshot.
    h.click(ControlId::SortAscending);
    assert_eq!(h.titles(), vec!["Zoo"]);
}

#[test]
fn deleting_after_paging_removes_the_program_under_the_cursor() {
    let script: Script = Box::new(|programs, context| {
        programs.previous();
        let current = Arc::clone(programs.current().unwrap());
        context.source.delete_recording(&current)?;
        Ok(DetailsOutcome { deleted: true })
    });
    let mut h = Harness::new(catalogue(), SharedSettings::default(), script);
    h.screen.on_init();
    h.list.select(0);

    h.click(ControlId::ProgramsList);

    // Cursor wrapped from Frontline back to Nova, the last row.
    assert_eq!(*h.source.deleted.lock().unwrap(), vec!["a"]);
    assert_eq!(h.titles(), vec!["Frontline", "Masterpiece"]);
    assert_eq!(h.list.selected_position(), Some(1));
}

#[test]
fn details_failure_is_contained() {
    let script: Script = Box::new(|_, _| Err(RecListError::Details("window failed".into())));
    let mut h = Harness::new(catalogue(), SharedSettings::default(), script);
    h.screen.on_init();
    let before = h.list.snapshot();

    h.click(ControlId::ProgramsList);

    assert_eq!(h.screen.state(), ScreenState::Ready);
    assert_eq!(h.list.snapshot(), before);
    assert!(h.list.take_errors().is_empty());
}

#[test]
fn going_back_persists_settings_and_closes() {
    let settings = SharedSettings::with(&[(KEY_RECORDING_GROUP, "Kids")]);
    let mut h = Harness::new(catalogue(), settings, dismiss());
    h.screen.on_init();
    h.click(ControlId::SortBy);
    h.click(ControlId::SortAscending);
    h.list.select(1);

    h.screen.on_action(ActionId::PreviousMenu.raw());

    assert_eq!(h.screen.state(), ScreenState::Closed);
    assert!(h.list.is_closed());
    assert_eq!(h.settings.value(KEY_SORT_BY), "Title");
    assert_eq!(h.settings.value(KEY_SORT_ASCENDING), "false");
    assert_eq!(h.settings.value(KEY_LAST_SELECTED), "1");
    assert_eq!(h.settings.value(KEY_RECORDING_GROUP), "Kids");
}

#[test]
fn parent_dir_also_goes_back() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.screen.on_init();
    h.screen.on_action(ActionId::ParentDir.raw());
    assert_eq!(h.screen.state(), ScreenState::Closed);
}

#[test]
fn events_after_close_are_ignored() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.screen.on_init();
    h.screen.on_action(ActionId::PreviousMenu.raw());
    let fetches = h.source.fetches();

    h.click(ControlId::Refresh);
    h.screen.on_init();
    h.screen.on_focus(ControlId::SortBy.raw());

    assert_eq!(h.source.fetches(), fetches);
    assert_eq!(h.screen.focused_control(), None);
}

#[test]
fn unknown_ids_are_ignored() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.screen.on_init();
    let before = h.list.snapshot();

    h.screen.on_click(9999);
    h.screen.on_action(7);

    assert_eq!(h.screen.state(), ScreenState::Ready);
    assert_eq!(h.list.snapshot(), before);
}

#[test]
fn focus_is_tracked() {
    let mut h = Harness::new(catalogue(), SharedSettings::default(), dismiss());
    h.screen.on_init();
    h.screen.on_focus(ControlId::SortAscending.raw());
    assert_eq!(h.screen.focused_control(), Some(ControlId::SortAscending));
}
