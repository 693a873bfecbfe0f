use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, LineGauge, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::time::{Duration, Instant};

use crate::filter::FilterCriteria;
use crate::models::{CompanyType, MentorRecord, RatingSort, Role, Slot};
use crate::profile::{services_for_tab, stars, ServiceTab};
use crate::screen::{Intent, MentorsScreen};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Search,
    Facets,
    Tags,
}

#[derive(Debug, Clone, Copy)]
enum FacetOption {
    Role(Role),
    Company(CompanyType),
    Slot(Slot),
    Rating(RatingSort),
}

impl FacetOption {
    fn all() -> Vec<FacetOption> {
        let roles = Role::ALL.iter().map(|r| FacetOption::Role(*r));
        let companies = CompanyType::ALL.iter().map(|c| FacetOption::Company(*c));
        let slots = Slot::ALL.iter().map(|s| FacetOption::Slot(*s));
        let ratings = RatingSort::ALL.iter().map(|r| FacetOption::Rating(*r));
        roles.chain(companies).chain(slots).chain(ratings).collect()
    }

    fn heading(&self) -> &'static str {
        match self {
            FacetOption::Role(_) => "Role",
            FacetOption::Company(_) => "Company",
            FacetOption::Slot(_) => "Slot",
            FacetOption::Rating(_) => "Rating",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FacetOption::Role(r) => r.label(),
            FacetOption::Company(c) => c.label(),
            FacetOption::Slot(s) => s.label(),
            FacetOption::Rating(r) => r.label(),
        }
    }

    fn intent(&self) -> Intent {
        match self {
            FacetOption::Role(r) => Intent::ToggleRole(*r),
            FacetOption::Company(c) => Intent::ToggleCompanyType(*c),
            FacetOption::Slot(s) => Intent::ToggleSlot(*s),
            FacetOption::Rating(r) => Intent::ToggleRatingSort(*r),
        }
    }

    fn is_selected(&self, criteria: &FilterCriteria) -> bool {
        match self {
            FacetOption::Role(r) => criteria.selected_roles().contains(r),
            FacetOption::Company(c) => criteria.selected_company_types().contains(c),
            FacetOption::Slot(s) => criteria.selected_slot() == Some(*s),
            FacetOption::Rating(r) => criteria.selected_rating_sort() == Some(*r),
        }
    }
}

struct AppState {
    screen: MentorsScreen,
    selected: usize,
    scroll_offset: u16,
    focus: Focus,
    facets: Vec<FacetOption>,
    facet_cursor: usize,
    tag_cursor: usize,
    tab: ServiceTab,
}

impl AppState {
    fn new(screen: MentorsScreen) -> Self {
        Self {
            screen,
            selected: 0,
            scroll_offset: 0,
            focus: Focus::List,
            facets: FacetOption::all(),
            facet_cursor: 0,
            tag_cursor: 0,
            tab: ServiceTab::All,
        }
    }

    fn current_mentor(&self) -> Option<&MentorRecord> {
        self.screen.visible().get(self.selected).copied()
    }

    fn dispatch(&mut self, intent: Intent) {
        self.screen.dispatch(intent, Instant::now());
        self.clamp_after_change();
    }

    fn clamp_after_change(&mut self) {
        let visible = self.screen.visible().len();
        if self.selected >= visible {
            self.selected = visible.saturating_sub(1);
        }
        self.scroll_offset = 0;

        let tags = self.screen.tags().len();
        if self.tag_cursor >= tags {
            self.tag_cursor = tags.saturating_sub(1);
        }
        if tags == 0 && self.focus == Focus::Tags {
            self.focus = Focus::List;
        }
    }

    /// List, then filters, then the tag row when any tag is shown.
    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::List => Focus::Facets,
            Focus::Facets if !self.screen.tags().is_empty() => Focus::Tags,
            _ => Focus::List,
        };
    }

    fn move_tag_cursor(&mut self, forward: bool) {
        let tags = self.screen.tags().len();
        if forward {
            if self.tag_cursor + 1 < tags {
                self.tag_cursor += 1;
            }
        } else {
            self.tag_cursor = self.tag_cursor.saturating_sub(1);
        }
    }

    fn dismiss_focused_tag(&mut self) {
        if let Some(tag) = self.screen.tags().get(self.tag_cursor).cloned() {
            self.screen.dismiss_tag(&tag, Instant::now());
            self.clamp_after_change();
        }
    }

    fn remove_last_tag(&mut self) {
        if let Some(tag) = self.screen.tags().pop() {
            self.screen.dismiss_tag(&tag, Instant::now());
            self.clamp_after_change();
        }
    }

    fn next(&mut self) {
        let len = self.screen.visible().len();
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }
}

pub fn run_browse(screen: MentorsScreen) -> Result<()> {
    let mut state = AppState::new(screen);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        state.screen.tick(Instant::now());
        list_state.select(if state.screen.is_empty() { None } else { Some(state.selected) });
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match state.focus {
            Focus::Search => match key.code {
                KeyCode::Enter | KeyCode::Esc => state.focus = Focus::List,
                KeyCode::Backspace => {
                    let mut term = state.screen.criteria().search_term().to_string();
                    term.pop();
                    state.dispatch(Intent::SetSearchTerm(term));
                }
                KeyCode::Char(c) => {
                    let mut term = state.screen.criteria().search_term().to_string();
                    term.push(c);
                    state.dispatch(Intent::SetSearchTerm(term));
                }
                _ => {}
            },
            Focus::Tags => match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Esc => state.focus = Focus::List,
                KeyCode::Tab => state.cycle_focus(),
                KeyCode::Left | KeyCode::Char('h') => state.move_tag_cursor(false),
                KeyCode::Right | KeyCode::Char('l') => state.move_tag_cursor(true),
                KeyCode::Enter
                | KeyCode::Char(' ')
                | KeyCode::Char('x')
                | KeyCode::Delete
                | KeyCode::Backspace => state.dismiss_focused_tag(),
                KeyCode::Char('c') => state.dispatch(Intent::ResetAll),
                _ => {}
            },
            Focus::List | Focus::Facets => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('/') => state.focus = Focus::Search,
                KeyCode::Tab => state.cycle_focus(),
                KeyCode::Char('x') | KeyCode::Backspace => state.remove_last_tag(),
                KeyCode::Char('c') => state.dispatch(Intent::ResetAll),
                KeyCode::Char('t') => {
                    state.tab = state.tab.next();
                    state.scroll_offset = 0;
                }
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Down | KeyCode::Char('j') => {
                    if state.focus == Focus::Facets {
                        state.facet_cursor = (state.facet_cursor + 1).min(state.facets.len() - 1);
                    } else {
                        state.next();
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    if state.focus == Focus::Facets {
                        state.facet_cursor = state.facet_cursor.saturating_sub(1);
                    } else {
                        state.prev();
                    }
                }
                KeyCode::Enter | KeyCode::Char(' ') if state.focus == Focus::Facets => {
                    let intent = state.facets[state.facet_cursor].intent();
                    state.dispatch(intent);
                }
                _ => {}
            },
        }
    }
    Ok(())
}

fn focused_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default().borders(Borders::ALL).border_style(style).title(title)
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    // Search bar
    let term = state.screen.criteria().search_term();
    let search_text = if term.is_empty() && state.focus != Focus::Search {
        Span::styled("Search by name", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(term.to_string())
    };
    let search = Paragraph::new(Line::from(search_text))
        .block(focused_block(" Search ".to_string(), state.focus == Focus::Search));
    frame.render_widget(search, rows[0]);

    // Active filter tags; nothing at all when no filter is selected
    let tags = state.screen.tags();
    if !tags.is_empty() {
        let mut spans = Vec::new();
        for (i, tag) in tags.iter().enumerate() {
            let style = if state.focus == Focus::Tags && i == state.tag_cursor {
                Style::default().bg(Color::Cyan).fg(Color::Black)
            } else {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            };
            spans.push(Span::styled(format!(" {} x ", tag.label), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rows[1]);
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(26),
            Constraint::Percentage(30),
            Constraint::Min(0),
        ])
        .split(rows[2]);

    draw_facets(frame, state, columns[0]);

    // Mentor list
    let visible = state.screen.visible();
    if visible.is_empty() {
        let empty = Paragraph::new("No mentors found matching your search criteria.")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(focused_block(" Mentors (0) ".to_string(), state.focus == Focus::List));
        frame.render_widget(empty, columns[1]);
    } else {
        let items: Vec<ListItem> = visible
            .iter()
            .map(|m| {
                let verified = if m.is_verified { "v" } else { " " };
                ListItem::new(format!("{} {} | {} | {:.1}", verified, m.name, m.company, m.rating))
            })
            .collect();
        let list = List::new(items)
            .block(focused_block(
                format!(" Mentors ({}/{}) ", visible.len(), state.screen.catalog().len()),
                state.focus == Focus::List,
            ))
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, columns[1], list_state);
    }

    // Profile detail
    let detail = Paragraph::new(build_detail(state))
        .block(Block::default().borders(Borders::ALL).title(" Profile "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));
    frame.render_widget(detail, columns[2]);

    let help = Paragraph::new(
        " /:search  Tab:filters/tags  space:toggle  h/l:pick tag  x:remove tag  c:clear  t:tab  j/k:navigate  J/K:scroll  q:quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[3]);

    draw_toast(frame, state);
}

fn draw_facets(frame: &mut Frame, state: &AppState, area: Rect) {
    let criteria = state.screen.criteria();
    let mut lines: Vec<Line> = Vec::new();
    let mut heading = "";

    for (i, option) in state.facets.iter().enumerate() {
        if option.heading() != heading {
            heading = option.heading();
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                heading,
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }
        let mark = if option.is_selected(criteria) { "[x]" } else { "[ ]" };
        let style = if state.focus == Focus::Facets && i == state.facet_cursor {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(format!(" {} {}", mark, option.label()), style)));
    }

    let panel = Paragraph::new(lines)
        .block(focused_block(" Filters ".to_string(), state.focus == Focus::Facets));
    frame.render_widget(panel, area);
}

fn draw_toast(frame: &mut Frame, state: &AppState) {
    let Some(toast) = state.screen.toast() else { return };
    let area = frame.area();
    let width = area.width.min(50);
    let rect = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + 1,
        width,
        height: 4,
    }
    .intersection(area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);
    frame.render_widget(
        Paragraph::new(format!("! {}", toast.message)).style(Style::default().fg(Color::Red)),
        parts[0],
    );
    let gauge = LineGauge::default()
        .filled_style(Style::default().fg(Color::Red))
        .label("")
        .ratio(toast.progress(Instant::now()));
    frame.render_widget(gauge, parts[1]);
}

fn build_detail(state: &AppState) -> Text<'static> {
    let Some(mentor) = state.current_mentor() else {
        return Text::raw("No mentor selected");
    };

    let mut lines: Vec<Line> = Vec::new();

    let mut header = vec![Span::styled(
        mentor.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if mentor.is_verified {
        header.push(Span::styled(" (verified)", Style::default().fg(Color::Green)));
    }
    lines.push(Line::from(header));
    lines.push(Line::from(format!("{} at {}", mentor.title, mentor.company)));
    lines.push(Line::from(format!(
        "{} {:.1}  {} Reviews  {} Sessions",
        stars(mentor.rating),
        mentor.rating,
        mentor.reviews,
        mentor.sessions
    )));
    lines.push(Line::from(""));

    for line in textwrap::fill(&mentor.bio, 70).lines() {
        lines.push(Line::from(line.to_string()));
    }
    lines.push(Line::from(""));

    // Service tabs
    let tab_spans: Vec<Span> = ServiceTab::ALL
        .iter()
        .map(|t| {
            if *t == state.tab {
                Span::styled(format!("[{}] ", t.label()), Style::default().fg(Color::Cyan))
            } else {
                Span::styled(format!(" {}  ", t.label()), Style::default().fg(Color::DarkGray))
            }
        })
        .collect();
    lines.push(Line::from(Span::styled(
        "Services",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(tab_spans));

    let services = services_for_tab(&mentor.services, state.tab);
    if services.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (nothing offered here yet)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for service in services {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  #{} {}", service.id, service.title),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!(
                "  {} | {} | Rs {}",
                service.kind.type_label(),
                service.kind.detail_label(),
                service.amount
            ),
            Style::default().fg(Color::Cyan),
        )));
        for line in textwrap::fill(&service.description, 66).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }

    if !mentor.testimonials.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Reviews",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for review in &mentor.testimonials {
            let author = review.author.as_deref().unwrap_or("Anonymous");
            lines.push(Line::from(format!("  {} {:.1} - {}", stars(review.rating), review.rating, author)));
            for line in textwrap::fill(&review.content, 66).lines() {
                lines.push(Line::from(format!("    {}", line)));
            }
        }
    }

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn state() -> AppState {
        AppState::new(MentorsScreen::new(Catalog::sample().unwrap(), Duration::from_secs(5)))
    }

    #[test]
    fn test_facet_options_cover_every_vocabulary() {
        let options = FacetOption::all();
        assert_eq!(
            options.len(),
            Role::ALL.len() + CompanyType::ALL.len() + Slot::ALL.len() + RatingSort::ALL.len()
        );
        assert_eq!(options[0].heading(), "Role");
        assert_eq!(options.last().unwrap().heading(), "Rating");
    }

    #[test]
    fn test_selection_is_clamped_when_results_shrink() {
        let mut state = state();
        state.selected = 3;
        state.dispatch(Intent::SetSearchTerm("google".to_string()));
        assert_eq!(state.selected, 0);
        assert_eq!(state.current_mentor().unwrap().name, "Jonny Rose");
    }

    #[test]
    fn test_remove_last_tag() {
        let mut state = state();
        state.dispatch(Intent::ToggleRole(Role::SeSde));
        state.dispatch(Intent::ToggleSlot(Slot::Anytime));
        state.remove_last_tag();

        assert_eq!(state.screen.criteria().selected_slot(), None);
        assert_eq!(state.screen.criteria().selected_roles(), [Role::SeSde]);
    }

    #[test]
    fn test_focused_tag_is_dismissed() {
        let mut state = state();
        state.dispatch(Intent::ToggleRole(Role::SeSde));
        state.dispatch(Intent::ToggleCompanyType(CompanyType::Faang));
        state.dispatch(Intent::ToggleSlot(Slot::NextWeek));

        state.cycle_focus();
        state.cycle_focus();
        assert_eq!(state.focus, Focus::Tags);

        state.move_tag_cursor(true);
        state.dismiss_focused_tag();
        let criteria = state.screen.criteria();
        assert_eq!(criteria.selected_roles(), [Role::SeSde]);
        assert!(criteria.selected_company_types().is_empty());
        assert_eq!(criteria.selected_slot(), Some(Slot::NextWeek));
        assert_eq!(state.tag_cursor, 1);

        state.move_tag_cursor(true);
        state.move_tag_cursor(true);
        assert_eq!(state.tag_cursor, 1);
        state.dismiss_focused_tag();
        assert_eq!(state.tag_cursor, 0);

        state.dismiss_focused_tag();
        assert!(state.screen.tags().is_empty());
        assert_eq!(state.focus, Focus::List);
        assert_eq!(state.screen.visible().len(), 4);
    }

    #[test]
    fn test_tags_are_skipped_by_focus_cycle_when_empty() {
        let mut state = state();
        state.cycle_focus();
        assert_eq!(state.focus, Focus::Facets);
        state.cycle_focus();
        assert_eq!(state.focus, Focus::List);
    }

    #[test]
    fn test_detail_shows_services_for_tab() {
        let mut state = state();
        state.tab = ServiceTab::Webinar;
        let text: String = build_detail(&state)
            .lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Interview tips and tricks advice"));
        assert!(!text.contains("Career Guidance"));
    }
}
