use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    widgets::TableState as WidgetTableState,
    Terminal,
};
use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::data::datatable::{Field, Todo};
use crate::state::dispatcher::{OutsideClickSubscriber, PointerDispatcher, Subscription};
use crate::state::events::StateEvent;
use crate::state::table_state::TableState;
use crate::ui::table_renderer::{render, Hit, RenderContext, ScreenLayout};

/// Which part of the screen receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Search,
    Dropdown,
    EditTitle,
}

pub struct TableApp {
    state: TableState,
    focus: Focus,
    search_input: Input,
    title_input: Input,
    table_widget_state: WidgetTableState,
    selected_column: usize,
    dropdown_highlight: usize,
    dragging: Option<usize>,
    show_logs: bool,
    use_glyphs: bool,
    should_quit: bool,
    records_rx: Option<oneshot::Receiver<Vec<Todo>>>,
    layout: ScreenLayout,
    dropdown_region: Rc<Cell<Option<Rect>>>,
    dispatcher: PointerDispatcher,
    // unregisters the outside-click detector when the app goes away
    _outside_click: Subscription,
}

impl TableApp {
    pub fn new(state: TableState, use_glyphs: bool) -> Self {
        let dispatcher = PointerDispatcher::new();
        let dropdown_region = Rc::new(Cell::new(None));
        let outside_click =
            dispatcher.subscribe(Box::new(OutsideClickSubscriber::new(dropdown_region.clone())));

        let mut app = Self {
            search_input: Input::new(state.search().text.clone()),
            state,
            focus: Focus::Table,
            title_input: Input::default(),
            table_widget_state: WidgetTableState::default(),
            selected_column: 0,
            dropdown_highlight: 0,
            dragging: None,
            show_logs: false,
            use_glyphs,
            should_quit: false,
            records_rx: None,
            layout: ScreenLayout::default(),
            dropdown_region,
            dispatcher,
            _outside_click: outside_click,
        };
        app.sync_after_change();
        app
    }

    /// Records will arrive on `rx` once the initial fetch completes
    pub fn with_pending_records(mut self, rx: oneshot::Receiver<Vec<Todo>>) -> Self {
        self.records_rx = Some(rx);
        self
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_loading(&self) -> bool {
        self.records_rx.is_some()
    }

    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.table_widget_state.selected()
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.poll_records();
            self.draw(terminal)?;

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let ctx = RenderContext {
            state: &self.state,
            focus: self.focus,
            search_input: &self.search_input,
            title_input: &self.title_input,
            selected_column: self.selected_column,
            dropdown_highlight: self.dropdown_highlight,
            dragging: self.dragging,
            use_glyphs: self.use_glyphs,
            loading: self.records_rx.is_some(),
            show_logs: self.show_logs,
        };
        let table_state = &mut self.table_widget_state;
        let mut layout = ScreenLayout::default();
        terminal.draw(|f| layout = render(f, &ctx, table_state))?;

        self.dropdown_region.set(Some(layout.dropdown_region()));
        self.layout = layout;
        Ok(())
    }

    /// Pick up the result of the initial fetch without blocking
    pub fn poll_records(&mut self) {
        let result = match self.records_rx.as_mut() {
            Some(rx) => rx.try_recv(),
            None => return,
        };
        match result {
            Ok(todos) => {
                self.records_rx = None;
                self.apply(StateEvent::RecordsLoaded(todos));
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                // the fetch failed and has already been logged; the table stays empty
                debug!(target: "ui", "Initial fetch finished without records");
                self.records_rx = None;
            }
        }
    }

    fn apply(&mut self, event: StateEvent) {
        self.state.apply(event);
        self.sync_after_change();
    }

    /// Bring the widgets back in line with the state after an event
    fn sync_after_change(&mut self) {
        if self.state.search().text != self.search_input.value() {
            self.search_input = Input::new(self.state.search().text.clone());
        }
        if self.focus == Focus::EditTitle && self.state.edit().active_id().is_none() {
            self.focus = Focus::Table;
        }
        if self.focus == Focus::Dropdown && !self.state.dropdown_visible() {
            self.focus = Focus::Table;
        }

        let rows = self.state.view().page_rows().len();
        let selected = match (rows, self.table_widget_state.selected()) {
            (0, _) => None,
            (rows, Some(current)) => Some(current.min(rows - 1)),
            (_, None) => Some(0),
        };
        self.table_widget_state.select(selected);

        let columns = self.state.columns().len();
        self.selected_column = self.selected_column.min(columns.saturating_sub(1));
    }

    fn selected_record_id(&self) -> Option<i64> {
        let index = self.table_widget_state.selected()?;
        self.state.view().page_rows().get(index).map(|record| record.id)
    }

    fn begin_edit(&mut self, id: i64) {
        self.apply(StateEvent::EditStarted(id));
        if let Some(scratch) = self.state.edit().scratch() {
            if scratch.id == id {
                self.title_input = Input::new(scratch.title.clone());
                self.focus = Focus::EditTitle;
            }
        }
    }

    fn open_dropdown(&mut self) {
        self.apply(StateEvent::DropdownToggled);
        if self.state.dropdown_visible() {
            let current = self.state.search().field;
            self.dropdown_highlight = Field::ALL.iter().position(|f| *f == current).unwrap_or(0);
            self.focus = Focus::Dropdown;
        }
    }

    /// Keyboard equivalent of dragging the selected header one place over
    fn move_selected_column(&mut self, left: bool) {
        let len = self.state.columns().len();
        if len < 2 {
            return;
        }
        let from = self.selected_column;
        let to = match (left, from) {
            (true, 0) => len - 1,
            (true, from) => from - 1,
            (false, from) if from == len - 1 => 0,
            (false, from) => from + 1,
        };
        self.apply(StateEvent::ColumnDragStarted(from));
        self.apply(StateEvent::ColumnDropped(to));
        self.selected_column = to;
    }

    fn move_row_selection(&mut self, down: bool) {
        let rows = self.state.view().page_rows().len();
        if rows == 0 {
            return;
        }
        let current = self.table_widget_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(rows - 1)
        } else {
            current.saturating_sub(1)
        };
        self.table_widget_state.select(Some(next));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::F(5) {
            self.show_logs = !self.show_logs;
            return;
        }

        match self.focus {
            Focus::Table => self.handle_table_key(key),
            Focus::Search => self.handle_search_key(key),
            Focus::Dropdown => self.handle_dropdown_key(key),
            Focus::EditTitle => self.handle_edit_key(key),
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc if self.show_logs => self.show_logs = false,
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_row_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_row_selection(true),
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let last = self.state.columns().len().saturating_sub(1);
                self.selected_column = (self.selected_column + 1).min(last);
            }
            KeyCode::Enter | KeyCode::Char('s') => {
                if let Some(column) = self.state.columns().get(self.selected_column) {
                    let field = column.id;
                    self.apply(StateEvent::SortRequested(field));
                }
            }
            KeyCode::Char('<') => self.move_selected_column(true),
            KeyCode::Char('>') => self.move_selected_column(false),
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_record_id() {
                    self.begin_edit(id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_record_id() {
                    self.apply(StateEvent::RecordDeleted(id));
                }
            }
            KeyCode::Char('n') | KeyCode::PageDown => self.apply(StateEvent::NextPage),
            KeyCode::Char('p') | KeyCode::PageUp => self.apply(StateEvent::PreviousPage),
            KeyCode::Home => self.apply(StateEvent::PageRequested(1)),
            KeyCode::End => {
                let last = self.state.total_pages();
                self.apply(StateEvent::PageRequested(last));
            }
            KeyCode::Char(c @ '1'..='9') => {
                let page = c.to_digit(10).unwrap_or(1) as usize;
                self.apply(StateEvent::PageRequested(page));
            }
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('c') => self.open_dropdown(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                self.focus = Focus::Table;
            }
            _ => {
                if self.search_input.handle_event(&Event::Key(key)).is_some() {
                    let text = self.search_input.value().to_string();
                    self.apply(StateEvent::SearchChanged(text));
                }
            }
        }
    }

    fn handle_dropdown_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.dropdown_highlight = self.dropdown_highlight.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.dropdown_highlight = (self.dropdown_highlight + 1).min(Field::ALL.len() - 1);
            }
            KeyCode::Enter => {
                let field = Field::ALL[self.dropdown_highlight];
                self.apply(StateEvent::CategorySelected(field));
            }
            KeyCode::Esc | KeyCode::Char('c') => self.apply(StateEvent::DropdownToggled),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.apply(StateEvent::EditSaved),
            KeyCode::Esc => self.apply(StateEvent::EditCancelled),
            _ => {
                if self.title_input.handle_event(&Event::Key(key)).is_some() {
                    let title = self.title_input.value().to_string();
                    self.apply(StateEvent::EditTitleChanged(title));
                }
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                for event in self.dispatcher.pointer_down(column, row) {
                    self.apply(event);
                }
                let hit = self.layout.hit_test(column, row);
                self.handle_click(hit);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(source) = self.dragging.take() else {
                    return;
                };
                match self.layout.hit_test(column, row) {
                    Hit::Header(target) if target == source => {
                        // a press and release on the same header is a click: sort
                        self.apply(StateEvent::ColumnDragCancelled);
                        if let Some(header) = self.state.columns().get(target) {
                            let field = header.id;
                            self.apply(StateEvent::SortRequested(field));
                        }
                    }
                    Hit::Header(target) => {
                        self.apply(StateEvent::ColumnDropped(target));
                        self.selected_column = target;
                    }
                    _ => self.apply(StateEvent::ColumnDragCancelled),
                }
            }
            MouseEventKind::ScrollDown => self.apply(StateEvent::NextPage),
            MouseEventKind::ScrollUp => self.apply(StateEvent::PreviousPage),
            _ => {}
        }
    }

    fn handle_click(&mut self, hit: Hit) {
        match hit {
            Hit::CategoryButton => self.open_dropdown(),
            Hit::DropdownOption(field) => self.apply(StateEvent::CategorySelected(field)),
            Hit::SearchBox => self.focus = Focus::Search,
            Hit::Header(index) => {
                self.dragging = Some(index);
                self.apply(StateEvent::ColumnDragStarted(index));
            }
            Hit::Row(index) => {
                self.table_widget_state.select(Some(index));
                if self.focus != Focus::EditTitle {
                    self.focus = Focus::Table;
                }
            }
            Hit::Primary(id) => {
                if self.state.edit().is_editing(id) {
                    self.apply(StateEvent::EditSaved);
                } else {
                    self.begin_edit(id);
                }
            }
            Hit::Secondary(id) => {
                if self.state.edit().is_editing(id) {
                    self.apply(StateEvent::EditCancelled);
                } else {
                    self.apply(StateEvent::RecordDeleted(id));
                }
            }
            Hit::PreviousPage => self.apply(StateEvent::PreviousPage),
            Hit::NextPage => self.apply(StateEvent::NextPage),
            Hit::Page(page) => self.apply(StateEvent::PageRequested(page)),
            Hit::Nothing => {}
        }
    }
}

/// Take over the terminal, run the table until the user quits, and restore it
pub fn run_table_app(mut app: TableApp) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(target: "ui", "Table UI started");
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    info!(target: "ui", "Table UI stopped");

    res
}
