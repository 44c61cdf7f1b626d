use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Margin, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, HighlightSpacing, Paragraph, Row, Table,
        TableState as WidgetTableState,
    },
    Frame,
};
use tui_input::Input;

use crate::data::data_view::SortDirection;
use crate::data::datatable::Field;
use crate::state::table_state::TableState;
use crate::ui::table_app::Focus;
use crate::utils::logging::get_log_buffer;

const CATEGORY_WIDTH: u16 = 18;
const ACTIONS_WIDTH: u16 = 17;
const PRIMARY_WIDTH: u16 = 6; // "[Edit]" / "[Save]"
const SECONDARY_WIDTH: u16 = 8; // "[Delete]" / "[Cancel]"

/// Everything the renderer needs besides the frame
pub struct RenderContext<'a> {
    pub state: &'a TableState,
    pub focus: Focus,
    pub search_input: &'a Input,
    pub title_input: &'a Input,
    pub selected_column: usize,
    pub dropdown_highlight: usize,
    pub dragging: Option<usize>,
    pub use_glyphs: bool,
    pub loading: bool,
    pub show_logs: bool,
}

/// Screen position of one rendered record and its action buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHit {
    pub area: Rect,
    pub index: usize,
    pub id: i64,
    pub primary: Rect,
    pub secondary: Rect,
}

/// What sits under a pointer position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    CategoryButton,
    DropdownOption(Field),
    SearchBox,
    Header(usize),
    Row(usize),
    /// Edit, or Save on the row under edit
    Primary(i64),
    /// Delete, or Cancel on the row under edit
    Secondary(i64),
    PreviousPage,
    NextPage,
    Page(usize),
    Nothing,
}

/// Clickable areas of the last rendered frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub category_button: Rect,
    pub dropdown_options: Vec<(Rect, Field)>,
    pub search_box: Rect,
    pub headers: Vec<(Rect, usize)>,
    pub rows: Vec<RowHit>,
    pub previous: Rect,
    pub next: Rect,
    pub pages: Vec<(Rect, usize)>,
}

impl ScreenLayout {
    /// Area the outside-click detector treats as "inside" the dropdown
    pub fn dropdown_region(&self) -> Rect {
        self.dropdown_options
            .iter()
            .fold(self.category_button, |region, (rect, _)| region.union(*rect))
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Hit {
        let pos = Position::new(column, row);

        // the open dropdown is drawn over everything else
        if let Some((_, field)) = self.dropdown_options.iter().find(|(r, _)| r.contains(pos)) {
            return Hit::DropdownOption(*field);
        }
        if self.category_button.contains(pos) {
            return Hit::CategoryButton;
        }
        if self.search_box.contains(pos) {
            return Hit::SearchBox;
        }
        if let Some((_, index)) = self.headers.iter().find(|(r, _)| r.contains(pos)) {
            return Hit::Header(*index);
        }
        for row_hit in &self.rows {
            if row_hit.primary.contains(pos) {
                return Hit::Primary(row_hit.id);
            }
            if row_hit.secondary.contains(pos) {
                return Hit::Secondary(row_hit.id);
            }
            if row_hit.area.contains(pos) {
                return Hit::Row(row_hit.index);
            }
        }
        if self.previous.contains(pos) {
            return Hit::PreviousPage;
        }
        if self.next.contains(pos) {
            return Hit::NextPage;
        }
        if let Some((_, page)) = self.pages.iter().find(|(r, _)| r.contains(pos)) {
            return Hit::Page(*page);
        }
        Hit::Nothing
    }
}

fn column_constraint(field: Field) -> Constraint {
    match field {
        Field::UserId | Field::Id => Constraint::Length(9),
        Field::Title => Constraint::Min(20),
    }
}

fn sort_indicator(active: Option<SortDirection>, use_glyphs: bool) -> &'static str {
    match (active, use_glyphs) {
        (Some(SortDirection::Ascending), true) => "▲",
        (Some(SortDirection::Descending), true) => "▼",
        (None, true) => "⇵",
        (Some(SortDirection::Ascending), false) => "^",
        (Some(SortDirection::Descending), false) => "v",
        (None, false) => "-",
    }
}

fn button_style(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(Color::White).bg(Color::Blue)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Draw the whole screen and return where everything ended up
pub fn render(
    f: &mut Frame,
    ctx: &RenderContext,
    table_state: &mut WidgetTableState,
) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Category + search
            Constraint::Min(5),    // Table
            Constraint::Length(3), // Pagination
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let mut layout = ScreenLayout::default();
    render_search_bar(f, ctx, chunks[0], &mut layout);
    render_table(f, ctx, chunks[1], table_state, &mut layout);
    render_pagination(f, ctx, chunks[2], &mut layout);
    render_status(f, ctx, chunks[3]);

    // overlays last so they sit on top
    if ctx.state.dropdown_visible() {
        render_dropdown(f, ctx, &mut layout);
    }
    if ctx.show_logs {
        render_logs(f);
    }
    layout
}

fn render_search_bar(f: &mut Frame, ctx: &RenderContext, area: Rect, layout: &mut ScreenLayout) {
    let [category_area, search_area] =
        Layout::horizontal([Constraint::Length(CATEGORY_WIDTH), Constraint::Min(10)]).areas(area);

    let arrow = if ctx.use_glyphs { "▾" } else { "v" };
    let category = Paragraph::new(format!("{} {}", ctx.state.search().field, arrow)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Category")
            .border_style(focus_style(ctx.focus == Focus::Dropdown)),
    );
    f.render_widget(category, category_area);

    let search_focused = ctx.focus == Focus::Search;
    let scroll = ctx
        .search_input
        .visual_scroll(search_area.width.saturating_sub(2) as usize);
    let search = Paragraph::new(ctx.search_input.value())
        .scroll((0, scroll as u16))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search (/)")
                .border_style(focus_style(search_focused)),
        );
    f.render_widget(search, search_area);

    if search_focused {
        let cursor = ctx.search_input.visual_cursor().saturating_sub(scroll) as u16;
        f.set_cursor_position((search_area.x + 1 + cursor, search_area.y + 1));
    }

    layout.category_button = category_area;
    layout.search_box = search_area;
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn render_table(
    f: &mut Frame,
    ctx: &RenderContext,
    area: Rect,
    table_state: &mut WidgetTableState,
    layout: &mut ScreenLayout,
) {
    let state = ctx.state;
    let view = state.view();
    let columns = state.columns().columns();
    let sort = state.sort();
    let editing = state.edit();

    let mut widths: Vec<Constraint> = columns.iter().map(|c| column_constraint(c.id)).collect();
    widths.push(Constraint::Length(ACTIONS_WIDTH));

    let header_cells: Vec<Cell> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let active = (sort.field == column.id).then_some(sort.direction);
            let mut style = Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD);
            if ctx.focus == Focus::Table && ctx.selected_column == index {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if ctx.dragging == Some(index) {
                style = style.add_modifier(Modifier::ITALIC | Modifier::UNDERLINED);
            }
            Cell::from(format!(
                "{} {}",
                column.label,
                sort_indicator(active, ctx.use_glyphs)
            ))
            .style(style)
        })
        .chain(std::iter::once(
            Cell::from("Actions").style(Style::default().fg(Color::Yellow)),
        ))
        .collect();
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let page_rows = view.page_rows();
    let rows: Vec<Row> = page_rows
        .iter()
        .map(|record| {
            let under_edit = editing.is_editing(record.id);
            let mut cells: Vec<Cell> = columns
                .iter()
                .map(|column| {
                    if under_edit && column.id.is_editable() {
                        Cell::from(ctx.title_input.value().to_string()).style(
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::UNDERLINED),
                        )
                    } else {
                        Cell::from(record.display(column.id))
                    }
                })
                .collect();
            let actions = if under_edit {
                Line::from(vec![
                    Span::styled("[Save]", Style::default().fg(Color::Green)),
                    Span::raw(" "),
                    Span::styled("[Cancel]", Style::default().fg(Color::Red)),
                ])
            } else {
                Line::from(vec![
                    Span::styled("[Edit]", Style::default().fg(Color::Yellow)),
                    Span::raw(" "),
                    Span::styled("[Delete]", Style::default().fg(Color::Red)),
                ])
            };
            cells.push(Cell::from(actions));
            Row::new(cells).height(1)
        })
        .collect();

    let title = if ctx.loading {
        "Todos (loading...)".to_string()
    } else {
        format!("Todos ({} of {})", view.filtered_count(), state.records().len())
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);

    let table = Table::new(rows, widths.clone())
        .header(header)
        .block(block)
        .column_spacing(1)
        .flex(Flex::Start)
        .highlight_spacing(HighlightSpacing::Never)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, table_state);

    // Same column split the table widget uses, for hit testing
    let column_rects = Layout::horizontal(widths)
        .flex(Flex::Start)
        .spacing(1)
        .split(inner);

    layout.headers = column_rects
        .iter()
        .take(columns.len())
        .enumerate()
        .map(|(index, rect)| (Rect::new(rect.x, inner.y, rect.width, 1), index))
        .collect();

    let actions_rect = column_rects.last().copied().unwrap_or_default();
    let first_row_y = inner.y + 2; // header plus its bottom margin
    let visible = inner.height.saturating_sub(2) as usize;
    let offset = table_state.offset();

    layout.rows = page_rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(index, record)| {
            let y = first_row_y + (index - offset) as u16;
            RowHit {
                area: Rect::new(inner.x, y, inner.width, 1),
                index,
                id: record.id,
                primary: Rect::new(actions_rect.x, y, PRIMARY_WIDTH, 1).intersection(inner),
                secondary: Rect::new(actions_rect.x + PRIMARY_WIDTH + 1, y, SECONDARY_WIDTH, 1)
                    .intersection(inner),
            }
        })
        .collect();

    if ctx.focus == Focus::EditTitle {
        let title_pos = columns.iter().position(|c| c.id.is_editable());
        let edit_row = layout
            .rows
            .iter()
            .find(|row| editing.is_editing(row.id));
        if let (Some(col), Some(row)) = (title_pos, edit_row) {
            let rect = column_rects[col];
            let cursor = (ctx.title_input.visual_cursor() as u16).min(rect.width.saturating_sub(1));
            f.set_cursor_position((rect.x + cursor, row.area.y));
        }
    }
}

/// Lays buttons out left to right on a single line
struct ButtonRow {
    spans: Vec<Span<'static>>,
    x: u16,
    y: u16,
    right: u16,
}

impl ButtonRow {
    fn new(area: Rect) -> Self {
        Self {
            spans: Vec::new(),
            x: area.x,
            y: area.y,
            right: area.x + area.width,
        }
    }

    fn fits(&self, width: u16) -> bool {
        self.x + width <= self.right
    }

    /// Append a button; `None` when it does not fit
    fn place(&mut self, label: String, style: Style) -> Option<Rect> {
        let width = label.chars().count() as u16;
        if !self.fits(width) {
            return None;
        }
        let rect = Rect::new(self.x, self.y, width, 1);
        self.spans.push(Span::styled(label, style));
        self.spans.push(Span::raw(" "));
        self.x += width + 1;
        Some(rect)
    }
}

fn render_pagination(f: &mut Frame, ctx: &RenderContext, area: Rect, layout: &mut ScreenLayout) {
    let view = ctx.state.view();
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut buttons = ButtonRow::new(inner);

    layout.previous = buttons
        .place("[Previous]".to_string(), button_style(view.has_previous()))
        .filter(|_| view.has_previous())
        .unwrap_or_default();

    const NEXT_LABEL: &str = "[Next]";
    for page in view.page_numbers() {
        let label = format!("[{}]", page);
        // leave room for Next
        if !buttons.fits(label.len() as u16 + 1 + NEXT_LABEL.len() as u16) {
            break;
        }
        let style = if page == view.page() {
            Style::default()
                .fg(Color::White)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            button_style(true)
        };
        if let Some(rect) = buttons.place(label, style) {
            layout.pages.push((rect, page));
        }
    }

    layout.next = buttons
        .place(NEXT_LABEL.to_string(), button_style(view.has_next()))
        .filter(|_| view.has_next())
        .unwrap_or_default();

    f.render_widget(Paragraph::new(Line::from(buttons.spans)), inner);
}

fn render_status(f: &mut Frame, ctx: &RenderContext, area: Rect) {
    let state = ctx.state;
    let sort = state.sort();
    let view = state.view();

    let mode = match ctx.focus {
        Focus::Table => "TABLE",
        Focus::Search => "SEARCH",
        Focus::Dropdown => "CATEGORY",
        Focus::EditTitle => "EDIT",
    };
    let direction = match sort.direction {
        SortDirection::Ascending => "asc",
        SortDirection::Descending => "desc",
    };

    let status_line = Line::from(vec![
        Span::styled(
            mode,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " | sort: {} {} | page {}/{} | ",
            sort.field,
            direction,
            view.page(),
            view.total_pages()
        )),
        Span::raw("e=Edit d=Delete </>=Move column n/p=Page c=Category F5=Logs q=Quit"),
    ]);

    f.render_widget(
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray)),
        area,
    );
}

fn render_dropdown(f: &mut Frame, ctx: &RenderContext, layout: &mut ScreenLayout) {
    let button = layout.category_button;
    let height = Field::ALL.len() as u16 + 2;
    let area = Rect::new(button.x, button.y + button.height, button.width, height)
        .intersection(f.area());
    if area.is_empty() {
        return;
    }

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    for (index, field) in Field::ALL.iter().enumerate() {
        let rect = Rect::new(inner.x, inner.y + index as u16, inner.width, 1).intersection(inner);
        if rect.is_empty() {
            continue;
        }
        let style = if index == ctx.dropdown_highlight {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        f.render_widget(Paragraph::new(field.name()).style(style), rect);
        layout.dropdown_options.push((rect, *field));
    }
}

fn render_logs(f: &mut Frame) {
    let area = f.area().inner(Margin::new(4, 3));
    let height = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = get_log_buffer()
        .map(|buffer| buffer.get_recent(height))
        .unwrap_or_default()
        .iter()
        .map(|entry| Line::from(entry.format_for_display()))
        .collect();

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Diagnostics (F5 to close)"),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_indicator_ascii_fallback() {
        assert_eq!(sort_indicator(Some(SortDirection::Descending), true), "▼");
        assert_eq!(sort_indicator(None, false), "-");
    }

    #[test]
    fn test_hit_test_prefers_dropdown_over_table() {
        let layout = ScreenLayout {
            category_button: Rect::new(0, 0, 18, 3),
            dropdown_options: vec![(Rect::new(1, 4, 16, 1), Field::UserId)],
            headers: vec![(Rect::new(1, 4, 9, 1), 0)],
            ..Default::default()
        };
        assert_eq!(layout.hit_test(3, 4), Hit::DropdownOption(Field::UserId));
        assert_eq!(layout.hit_test(3, 1), Hit::CategoryButton);
        assert_eq!(layout.hit_test(40, 40), Hit::Nothing);
    }

    #[test]
    fn test_dropdown_region_covers_button_and_menu() {
        let layout = ScreenLayout {
            category_button: Rect::new(0, 0, 18, 3),
            dropdown_options: vec![
                (Rect::new(1, 4, 16, 1), Field::Id),
                (Rect::new(1, 6, 16, 1), Field::Title),
            ],
            ..Default::default()
        };
        assert_eq!(layout.dropdown_region(), Rect::new(0, 0, 18, 7));
    }
}
