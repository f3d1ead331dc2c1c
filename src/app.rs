use crate::jenkins::resolver;
use crate::table::{HistoryTable, Selection, HEADER_ROW};
use std::time::Instant;

// UI constants
pub const TICK_RATE_MS: u64 = 100;
pub const ERROR_TTL_SECS: u64 = 10;
pub const SPINNER_FRAME_COUNT: usize = 10;
pub const NARROW_WIDTH_THRESHOLD: u16 = 80;
pub const PAGE_SIZE: usize = 10;

/// Outcome of a build as reported in the `result` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildResult {
    Success,
    Failure,
    Unstable,
    Aborted,
    NotBuilt,
    Unknown,
}

impl BuildResult {
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Self::Unknown;
        };
        match label.to_ascii_uppercase().as_str() {
            "SUCCESS" => Self::Success,
            "FAILURE" => Self::Failure,
            "UNSTABLE" => Self::Unstable,
            "ABORTED" => Self::Aborted,
            "NOT_BUILT" => Self::NotBuilt,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Commit {
    #[serde(deserialize_with = "lenient")]
    pub committer_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub short_sha: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub branch: Option<String>,
}

/// One CI run as returned under `appData.info.builds`.
///
/// Fields decode independently: a value of the wrong type only blanks its own
/// cell, never the rest of the record.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Build {
    #[serde(deserialize_with = "lenient")]
    pub number: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub display_time: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub result: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub commit: Option<Commit>,
    /// Matrix axes, passed to the detail screen untouched.
    #[serde(deserialize_with = "opaque_list")]
    pub axis_list: Option<Vec<serde_json::Value>>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value)
        .map_err(|e| tracing::warn!("ignoring build field: {e}"))
        .ok())
}

/// An array is kept as is; any other non-null value becomes a one-element list.
fn opaque_list<'de, D>(deserializer: D) -> Result<Option<Vec<serde_json::Value>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::Array(items) => Some(items),
        other => Some(vec![other]),
    })
}

impl Build {
    pub fn result(&self) -> BuildResult {
        BuildResult::from_label(self.result.as_deref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    /// `None` until a fetch for this view has succeeded.
    pub table: Option<HistoryTable>,
    /// Rendered-table row index; never `HEADER_ROW` while the table has data.
    pub cursor: usize,
}

impl HistoryView {
    fn install(&mut self, table: HistoryTable) {
        self.cursor = match table.last_row() {
            Some(last) => self.cursor.clamp(1, last),
            None => HEADER_ROW,
        };
        self.table = Some(table);
    }

    fn last_row(&self) -> Option<usize> {
        self.table.as_ref().and_then(HistoryTable::last_row)
    }

    fn move_by(&mut self, delta: isize) {
        if let Some(last) = self.last_row() {
            let target = self.cursor.saturating_add_signed(delta);
            self.cursor = target.clamp(1, last);
        }
    }

    fn jump_to(&mut self, row: usize) {
        if let Some(last) = self.last_row() {
            self.cursor = row.clamp(1, last);
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        self.table.as_ref()?.selection_at(self.cursor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub number: u64,
    pub build_url: String,
    pub axis_list: Vec<serde_json::Value>,
    pub scroll: usize,
}

impl DetailView {
    pub fn new(job_url: &str, selection: Selection) -> Self {
        Self {
            number: selection.number,
            build_url: resolver::build_url(job_url, selection.number),
            axis_list: selection.axis_list,
            scroll: 0,
        }
    }

    /// Key/value lines shown on the detail screen.
    pub fn lines(&self) -> Vec<(String, String)> {
        let mut lines = vec![
            ("Build".to_string(), format!("#{}", self.number)),
            ("URL".to_string(), self.build_url.clone()),
        ];
        if self.axis_list.is_empty() {
            lines.push(("Axes".to_string(), "(none)".to_string()));
        }
        for axis in &self.axis_list {
            lines.push(("Axis".to_string(), describe_axis(axis)));
        }
        lines
    }
}

/// `name = value` for `{name, value|values}` objects, compact JSON otherwise.
pub fn describe_axis(axis: &serde_json::Value) -> String {
    use serde_json::Value;
    let name = axis.get("name").and_then(Value::as_str);
    let value = axis.get("value").or_else(|| axis.get("values"));
    match (name, value) {
        (Some(name), Some(Value::String(v))) => format!("{name} = {v}"),
        (Some(name), Some(Value::Array(vs))) => {
            let joined: Vec<String> = vs
                .iter()
                .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                .collect();
            format!("{name} = {}", joined.join(", "))
        }
        (Some(name), Some(other)) => format!("{name} = {other}"),
        _ => axis.to_string(),
    }
}

/// Navigation stack: history at the bottom, at most one detail on top.
#[derive(Debug, Clone)]
pub enum Screen {
    History(HistoryView),
    Detail(DetailView),
}

/// Immutable configuration set at startup.
pub struct AppConfig {
    pub server_url: String,
    pub repo: String,
    pub job_url: String,
}

pub struct AppState {
    pub config: AppConfig,
    pub screen: Screen,

    // Fetch bookkeeping
    pub generation: u64,
    pub is_loading: bool,
    pub last_fetch: Option<chrono::DateTime<chrono::Local>>,

    // Transient UI
    pub error: Option<(String, Instant)>,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(server_url: String, repo: String, job_url: String) -> Self {
        Self {
            config: AppConfig {
                server_url,
                repo,
                job_url,
            },
            screen: Screen::History(HistoryView::default()),
            generation: 0,
            is_loading: false,
            last_fetch: None,
            error: None,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    /// Marks a new fetch as current and returns its generation.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.is_loading = true;
        self.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && matches!(self.screen, Screen::History(_))
    }

    /// Installs a fresh table. Returns `false` when the result is stale.
    pub fn apply_history(&mut self, generation: u64, builds: &[Build]) -> bool {
        if !self.is_current(generation) {
            tracing::debug!(
                "discarding history #{generation} (current #{})",
                self.generation
            );
            return false;
        }
        self.is_loading = false;
        self.last_fetch = Some(chrono::Local::now());
        self.clear_error();
        if let Screen::History(ref mut view) = self.screen {
            view.install(HistoryTable::from_builds(builds));
        }
        true
    }

    /// Records a failed fetch. The table, if any, is left untouched.
    pub fn fetch_failed(&mut self, generation: u64, error: String) -> bool {
        if !self.is_current(generation) {
            tracing::debug!("discarding failure of history #{generation}: {error}");
            return false;
        }
        self.is_loading = false;
        self.set_error(error);
        true
    }

    pub fn history(&self) -> Option<&HistoryView> {
        match &self.screen {
            Screen::History(view) => Some(view),
            Screen::Detail(_) => None,
        }
    }

    pub fn detail(&self) -> Option<&DetailView> {
        match &self.screen {
            Screen::Detail(view) => Some(view),
            Screen::History(_) => None,
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self.screen, Screen::Detail(_))
    }

    // --- History navigation ---

    pub fn move_cursor_up(&mut self) {
        self.move_cursor(-1);
    }

    pub fn move_cursor_down(&mut self) {
        self.move_cursor(1);
    }

    pub fn page_up(&mut self) {
        self.move_cursor(-(PAGE_SIZE as isize));
    }

    pub fn page_down(&mut self) {
        self.move_cursor(PAGE_SIZE as isize);
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.screen {
            Screen::History(ref mut view) => view.move_by(delta),
            Screen::Detail(ref mut view) => {
                view.scroll = view.scroll.saturating_add_signed(delta);
                let max = view.lines().len().saturating_sub(1);
                view.scroll = view.scroll.min(max);
            }
        }
    }

    pub fn cursor_to_top(&mut self) {
        match self.screen {
            Screen::History(ref mut view) => view.jump_to(1),
            Screen::Detail(ref mut view) => view.scroll = 0,
        }
    }

    pub fn cursor_to_bottom(&mut self) {
        match self.screen {
            Screen::History(ref mut view) => view.jump_to(usize::MAX),
            Screen::Detail(ref mut view) => view.scroll = view.lines().len().saturating_sub(1),
        }
    }

    /// Opens the detail screen for the row under the cursor.
    pub fn select_current(&mut self) -> bool {
        let Screen::History(ref view) = self.screen else {
            return false;
        };
        let Some(selection) = view.selection() else {
            return false;
        };
        tracing::info!("opening build #{}", selection.number);
        // Any fetch still in flight belongs to the history view being torn down.
        self.is_loading = false;
        self.screen = Screen::Detail(DetailView::new(&self.config.job_url, selection));
        true
    }

    /// Pointer click on a rendered-table row: first click moves the cursor,
    /// clicking the row under the cursor activates it.
    pub fn click_row(&mut self, table_row: usize) -> bool {
        let Screen::History(ref mut view) = self.screen else {
            return false;
        };
        let Some(last) = view.last_row() else {
            return false;
        };
        if table_row == HEADER_ROW || table_row > last {
            return false;
        }
        if view.cursor == table_row {
            return self.select_current();
        }
        view.cursor = table_row;
        false
    }

    /// Leaves the detail screen for a fresh history view and returns the new
    /// fetch generation. On the history screen this quits instead.
    pub fn back(&mut self) -> Option<u64> {
        match self.screen {
            Screen::Detail(_) => {
                self.screen = Screen::History(HistoryView::default());
                Some(self.begin_fetch())
            }
            Screen::History(_) => {
                self.should_quit = true;
                None
            }
        }
    }

    /// URL of the build under the cursor or shown in detail.
    pub fn current_build_url(&self) -> Option<String> {
        match &self.screen {
            Screen::History(view) => view
                .selection()
                .map(|s| resolver::build_url(&self.config.job_url, s.number)),
            Screen::Detail(view) => Some(view.build_url.clone()),
        }
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAME_COUNT;
    }

    pub fn set_error(&mut self, msg: String) {
        self.error = Some((msg, Instant::now()));
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn prune_error(&mut self) {
        if let Some((_, ts)) = &self.error {
            if ts.elapsed().as_secs() >= ERROR_TTL_SECS {
                self.error = None;
            }
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|(msg, _)| msg.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JOB_URL: &str = "http://ci/job/org/job/repo/";

    fn make_build(number: u64) -> Build {
        Build {
            number: Some(number),
            display_time: Some("1 min ago".to_string()),
            result: Some("SUCCESS".to_string()),
            commit: Some(Commit::default()),
            axis_list: Some(vec![json!({"name": "n", "value": number.to_string()})]),
        }
    }

    fn state() -> AppState {
        AppState::new(
            "http://ci".to_string(),
            "org/repo".to_string(),
            JOB_URL.to_string(),
        )
    }

    fn state_with_builds(n: u64) -> AppState {
        let mut state = state();
        let gen = state.begin_fetch();
        let builds: Vec<_> = (1..=n).map(make_build).collect();
        assert!(state.apply_history(gen, &builds));
        state
    }

    fn cursor(state: &AppState) -> usize {
        state.history().unwrap().cursor
    }

    // --- BuildResult ---

    #[test]
    fn result_labels() {
        let cases = [
            (Some("SUCCESS"), BuildResult::Success),
            (Some("FAILURE"), BuildResult::Failure),
            (Some("UNSTABLE"), BuildResult::Unstable),
            (Some("ABORTED"), BuildResult::Aborted),
            (Some("NOT_BUILT"), BuildResult::NotBuilt),
            (Some("aborted"), BuildResult::Aborted),
            (Some("weird"), BuildResult::Unknown),
            (None, BuildResult::Unknown),
        ];
        for (label, expected) in cases {
            assert_eq!(BuildResult::from_label(label), expected, "label {label:?}");
        }
    }

    #[test]
    fn wrong_typed_field_blanks_only_itself() {
        let build: Build = serde_json::from_value(json!({
            "number": "forty-two",
            "displayTime": 17,
            "result": "FAILURE",
            "commit": {"committerName": "Jo", "message": ["not", "text"], "branch": "main"},
            "axisList": [],
        }))
        .unwrap();
        assert_eq!(build.number, None);
        assert_eq!(build.display_time, None);
        assert_eq!(build.result(), BuildResult::Failure);
        let commit = build.commit.unwrap();
        assert_eq!(commit.committer_name.as_deref(), Some("Jo"));
        assert_eq!(commit.message, None);
        assert_eq!(commit.branch.as_deref(), Some("main"));
    }

    #[test]
    fn non_object_commit_is_dropped() {
        let build: Build =
            serde_json::from_value(json!({"number": 3, "commit": "abc123"})).unwrap();
        assert_eq!(build.number, Some(3));
        assert!(build.commit.is_none());
    }

    #[test]
    fn non_array_axis_list_kept_as_single_value() {
        let build: Build =
            serde_json::from_value(json!({"number": 4, "axisList": {"script": "main"}})).unwrap();
        assert_eq!(build.number, Some(4));
        assert_eq!(build.axis_list, Some(vec![json!({"script": "main"})]));
    }

    // --- Fetch lifecycle ---

    #[test]
    fn begin_fetch_increments_generation() {
        let mut state = state();
        assert_eq!(state.begin_fetch(), 1);
        assert_eq!(state.begin_fetch(), 2);
        assert!(state.is_loading);
    }

    #[test]
    fn apply_history_installs_table_and_cursor() {
        let state = state_with_builds(3);
        let view = state.history().unwrap();
        assert_eq!(view.table.as_ref().unwrap().row_count(), 4);
        assert_eq!(view.cursor, 1);
        assert!(!state.is_loading);
        assert!(state.last_fetch.is_some());
    }

    #[test]
    fn stale_generation_discarded() {
        let mut state = state();
        let old = state.begin_fetch();
        let _new = state.begin_fetch();
        assert!(!state.apply_history(old, &[make_build(1)]));
        assert!(state.history().unwrap().table.is_none());
        assert!(state.is_loading);
    }

    #[test]
    fn result_arriving_on_detail_screen_discarded() {
        let mut state = state_with_builds(2);
        let gen = state.begin_fetch();
        assert!(state.select_current());
        assert!(!state.is_loading);
        assert!(!state.apply_history(gen, &[make_build(9)]));
        assert!(state.is_detail());
    }

    #[test]
    fn failed_fetch_builds_no_table() {
        let mut state = state();
        let gen = state.begin_fetch();
        assert!(state.fetch_failed(gen, "CI server returned HTTP 500".to_string()));
        assert!(state.history().unwrap().table.is_none());
        assert_eq!(state.error_message(), Some("CI server returned HTTP 500"));
        assert!(!state.is_loading);
    }

    #[test]
    fn stale_failure_ignored() {
        let mut state = state();
        let old = state.begin_fetch();
        state.begin_fetch();
        assert!(!state.fetch_failed(old, "boom".to_string()));
        assert!(state.error.is_none());
    }

    #[test]
    fn failed_refresh_keeps_previous_table() {
        let mut state = state_with_builds(2);
        let gen = state.begin_fetch();
        state.fetch_failed(gen, "timeout".to_string());
        assert_eq!(
            state.history().unwrap().table.as_ref().unwrap().row_count(),
            3
        );
    }

    #[test]
    fn refresh_clamps_cursor_to_new_table() {
        let mut state = state_with_builds(5);
        state.cursor_to_bottom();
        assert_eq!(cursor(&state), 5);
        let gen = state.begin_fetch();
        state.apply_history(gen, &[make_build(1), make_build(2)]);
        assert_eq!(cursor(&state), 2);
    }

    #[test]
    fn empty_result_leaves_cursor_on_header() {
        let mut state = state();
        let gen = state.begin_fetch();
        state.apply_history(gen, &[]);
        assert_eq!(cursor(&state), HEADER_ROW);
        assert!(!state.select_current());
    }

    #[test]
    fn successful_fetch_clears_error() {
        let mut state = state();
        state.set_error("old".to_string());
        let gen = state.begin_fetch();
        state.apply_history(gen, &[make_build(1)]);
        assert!(state.error.is_none());
    }

    // --- Cursor movement ---

    #[test]
    fn cursor_never_reaches_header() {
        let mut state = state_with_builds(3);
        state.move_cursor_up();
        assert_eq!(cursor(&state), 1);
        state.page_up();
        assert_eq!(cursor(&state), 1);
    }

    #[test]
    fn cursor_down_stops_at_last_row() {
        let mut state = state_with_builds(2);
        state.move_cursor_down();
        state.move_cursor_down();
        state.move_cursor_down();
        assert_eq!(cursor(&state), 2);
    }

    #[test]
    fn page_and_jump() {
        let mut state = state_with_builds(30);
        state.page_down();
        assert_eq!(cursor(&state), 1 + PAGE_SIZE);
        state.cursor_to_bottom();
        assert_eq!(cursor(&state), 30);
        state.cursor_to_top();
        assert_eq!(cursor(&state), 1);
    }

    #[test]
    fn movement_without_table_is_noop() {
        let mut state = state();
        state.move_cursor_down();
        state.cursor_to_bottom();
        assert_eq!(cursor(&state), 0);
    }

    // --- Selection and navigation ---

    #[test]
    fn select_opens_detail_for_cursor_row() {
        let mut state = state_with_builds(3);
        state.move_cursor_down();
        assert!(state.select_current());
        let detail = state.detail().unwrap();
        assert_eq!(detail.number, 2);
        assert_eq!(detail.axis_list, vec![json!({"name": "n", "value": "2"})]);
        assert_eq!(detail.build_url, "http://ci/job/org/job/repo/2/");
    }

    #[test]
    fn select_on_detail_is_noop() {
        let mut state = state_with_builds(1);
        state.select_current();
        assert!(!state.select_current());
    }

    #[test]
    fn click_header_is_noop() {
        let mut state = state_with_builds(3);
        assert!(!state.click_row(HEADER_ROW));
        assert_eq!(cursor(&state), 1);
        assert!(!state.is_detail());
    }

    #[test]
    fn click_moves_then_activates() {
        let mut state = state_with_builds(3);
        assert!(!state.click_row(3));
        assert_eq!(cursor(&state), 3);
        assert!(state.click_row(3));
        assert_eq!(state.detail().unwrap().number, 3);
    }

    #[test]
    fn click_past_last_row_is_noop() {
        let mut state = state_with_builds(2);
        assert!(!state.click_row(3));
        assert_eq!(cursor(&state), 1);
    }

    #[test]
    fn back_from_detail_starts_fresh_history() {
        let mut state = state_with_builds(2);
        let before = state.generation;
        state.select_current();
        let gen = state.back().unwrap();
        assert_eq!(gen, before + 1);
        assert!(state.is_loading);
        let view = state.history().unwrap();
        assert!(view.table.is_none());
        assert!(state.apply_history(gen, &[make_build(7)]));
    }

    #[test]
    fn back_from_history_quits() {
        let mut state = state_with_builds(1);
        assert_eq!(state.back(), None);
        assert!(state.should_quit);
    }

    #[test]
    fn current_build_url_follows_screen() {
        let mut state = state_with_builds(2);
        state.move_cursor_down();
        assert_eq!(
            state.current_build_url().as_deref(),
            Some("http://ci/job/org/job/repo/2/")
        );
        state.select_current();
        assert_eq!(
            state.current_build_url().as_deref(),
            Some("http://ci/job/org/job/repo/2/")
        );
    }

    #[test]
    fn current_build_url_none_without_table() {
        assert_eq!(state().current_build_url(), None);
    }

    // --- Detail ---

    #[test]
    fn detail_scroll_bounds() {
        let mut state = state_with_builds(1);
        state.select_current();
        state.move_cursor_up();
        assert_eq!(state.detail().unwrap().scroll, 0);
        state.page_down();
        let lines = state.detail().unwrap().lines().len();
        assert_eq!(state.detail().unwrap().scroll, lines - 1);
    }

    #[test]
    fn detail_lines_without_axes() {
        let view = DetailView::new(
            JOB_URL,
            Selection {
                number: 5,
                axis_list: vec![],
            },
        );
        let lines = view.lines();
        assert_eq!(lines[0], ("Build".to_string(), "#5".to_string()));
        assert_eq!(lines[2], ("Axes".to_string(), "(none)".to_string()));
    }

    #[test]
    fn describe_axis_shapes() {
        assert_eq!(
            describe_axis(&json!({"name": "script", "value": "main"})),
            "script = main"
        );
        assert_eq!(
            describe_axis(&json!({"name": "jdk", "values": ["8", "11"]})),
            "jdk = 8, 11"
        );
        assert_eq!(describe_axis(&json!({"name": "n", "value": 3})), "n = 3");
        assert_eq!(describe_axis(&json!("plain")), "\"plain\"");
        assert_eq!(describe_axis(&json!({"x": 1})), r#"{"x":1}"#);
    }

    // --- Transient UI ---

    #[test]
    fn error_lifecycle() {
        let mut state = state();
        state.set_error("oops".to_string());
        assert_eq!(state.error_message(), Some("oops"));
        state.prune_error();
        assert!(state.error.is_some());
        state.clear_error();
        assert!(state.error_message().is_none());
    }

    #[test]
    fn spinner_wraps() {
        let mut state = state();
        for _ in 0..SPINNER_FRAME_COUNT {
            state.advance_spinner();
        }
        assert_eq!(state.spinner_frame, 0);
    }
}
