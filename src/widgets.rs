//! Clickable UI components.
//!
//! Each component renders itself and registers its own click targets, so the
//! rows a player sees and the rows that respond to taps cannot drift apart.
//!
//! - [`TabBar`]: horizontal tab navigation.
//! - [`ClickableList`]: vertical list with per-row click targets.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── TabBar ─────────────────────────────────────────────────────

/// A single row of tab labels separated by `separator`.
///
/// ```ignore
/// TabBar::new(" │ ")
///     .tab("Generators", style, TAB_GENERATORS)
///     .tab("Upgrades", style, TAB_UPGRADES)
///     .block(Block::default().borders(Borders::ALL))
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<(String, Style, u16)>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.tabs.push((label.into(), style, action_id));
        self
    }

    /// Wrap the bar in a block; targets are placed inside its borders.
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Padded label widths paired with their action IDs.
    fn tab_widths(&self) -> Vec<(u16, u16)> {
        self.tabs
            .iter()
            .map(|(label, _, id)| (Line::from(format!(" {} ", label)).width() as u16, *id))
            .collect()
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let tab_widths = self.tab_widths();
        let sep_width = Line::from(self.separator).width() as u16;

        let mut spans: Vec<Span> = Vec::new();
        for (i, (label, style, _)) in self.tabs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.separator, Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(format!(" {} ", label), style));
        }

        let inner = match &self.block {
            Some(block) => block.inner(area),
            None => area,
        };
        let paragraph = match self.block {
            Some(block) => Paragraph::new(Line::from(spans)).block(block),
            None => Paragraph::new(Line::from(spans)),
        };
        f.render_widget(paragraph, area);

        // Inner x/width for accuracy, full height for tap tolerance
        cs.register_tab_targets(&tab_widths, sep_width, inner.x, area.y, inner.width, area.height.max(1));
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// Pairs rendered [`Line`]s with click actions, so targets follow the lines
/// they belong to when lines are added or removed above them.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Basic"));
/// cl.push_clickable(Line::from("[a] Auto Clicker I"), BUY_GENERATOR_BASE);
/// cl.register_targets(area, &mut cs, 1, 1);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)` pairs.
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        let idx = self.lines.len() as u16;
        self.actions.push((idx, action_id));
        self.lines.push(line);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register a row target for every clickable line that is visible.
    ///
    /// `top_offset` / `bottom_offset` are the rows taken by borders (or other
    /// chrome) above and below the content. Lines are assumed not to wrap.
    pub fn register_targets(&self, area: Rect, cs: &mut ClickState, top_offset: u16, bottom_offset: u16) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);
        for &(line_idx, action_id) in &self.actions {
            let row = content_y + line_idx;
            if row >= content_end {
                break;
            }
            cs.add_row_target(area, row, action_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::actions::{BUY_SKILL_BASE, BUY_UPGRADE_BASE, TAB_GENERATORS, TAB_STATS};

    #[test]
    fn tab_widths_include_padding() {
        let bar = TabBar::new(" │ ")
            .tab("Generators", Style::default(), TAB_GENERATORS)
            .tab("Stats", Style::default(), TAB_STATS);
        assert_eq!(bar.tab_widths(), vec![(12, TAB_GENERATORS), (7, TAB_STATS)]);
    }

    #[test]
    fn clickable_list_skips_headers() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("Pixel Generation"));
        cl.push_clickable(Line::from("[a] Basic Upgrade"), BUY_UPGRADE_BASE);
        cl.push_clickable(Line::from("[b] Advanced Upgrade"), BUY_UPGRADE_BASE + 1);
        cl.push(Line::from("AI Revolution"));
        assert_eq!(cl.len(), 4);

        // Bordered area: content starts one row below area.y
        let area = Rect::new(0, 5, 80, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1);

        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(10, 6), None);
        assert_eq!(cs.hit_test(10, 7), Some(BUY_UPGRADE_BASE));
        assert_eq!(cs.hit_test(10, 8), Some(BUY_UPGRADE_BASE + 1));
        assert_eq!(cs.hit_test(10, 9), None);
    }

    #[test]
    fn clickable_list_clipped_by_area() {
        let mut cl = ClickableList::new();
        for i in 0..8 {
            cl.push_clickable(Line::from(format!("skill {}", i)), BUY_SKILL_BASE + i);
        }
        // Height 5 with borders leaves three content rows
        let area = Rect::new(0, 0, 80, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1);

        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(10, 3), Some(BUY_SKILL_BASE + 2));
        assert_eq!(cs.hit_test(10, 4), None);
    }

    #[test]
    fn clickable_list_empty() {
        let cl: ClickableList = ClickableList::new();
        assert!(cl.is_empty());
        let mut cs = ClickState::new();
        cl.register_targets(Rect::new(0, 0, 80, 10), &mut cs, 1, 1);
        assert!(cs.targets.is_empty());
    }

    #[test]
    fn inserted_line_shifts_targets() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("Rebirth points: 3"));
        cl.push(Line::from(""));
        cl.push_clickable(Line::from("[a] Enhanced Clicking"), BUY_SKILL_BASE);

        let mut cs = ClickState::new();
        cl.register_targets(Rect::new(0, 0, 80, 10), &mut cs, 1, 1);
        assert_eq!(cs.hit_test(10, 3), Some(BUY_SKILL_BASE));
        assert_eq!(cs.hit_test(10, 2), None);
        assert_eq!(cl.into_lines().len(), 3);
    }
}
