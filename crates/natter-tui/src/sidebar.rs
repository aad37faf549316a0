//! Sidebar panel state and mouse hit-testing.

use ratatui::layout::Rect;

/// Width of the open sidebar panel, clamped to a third of the terminal.
pub const SIDEBAR_WIDTH: u16 = 32;

/// Collapsible conversation list panel.
#[derive(Debug)]
pub struct Sidebar {
    pub open: bool,
}

impl Sidebar {
    pub fn new() -> Self {
        Self { open: true }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new()
    }
}

/// What a click inside the open panel landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarHit {
    /// The title zone of an entry.
    Item(usize),
    /// The rename button of an entry.
    Rename(usize),
    /// The delete button of an entry.
    Delete(usize),
    /// Panel chrome with no entry under it.
    Panel,
}

/// Maps a click position inside the panel to an entry and zone.
///
/// Entries are laid out one per row under the panel border; the last
/// columns of each row hold the rename and delete buttons.
pub fn hit_test(panel: Rect, entries: usize, column: u16, row: u16) -> SidebarHit {
    let inner_top = panel.y.saturating_add(1);
    if row < inner_top || panel.width < 8 {
        return SidebarHit::Panel;
    }
    let index = (row - inner_top) as usize;
    if index >= entries {
        return SidebarHit::Panel;
    }
    let right = panel.x + panel.width;
    // "[e] [x]" button cells at the end of the row
    if column >= right.saturating_sub(4) && column < right.saturating_sub(1) {
        return SidebarHit::Delete(index);
    }
    if column >= right.saturating_sub(8) && column < right.saturating_sub(4) {
        return SidebarHit::Rename(index);
    }
    SidebarHit::Item(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> Rect {
        Rect::new(0, 1, 32, 20)
    }

    #[test]
    fn toggle_flips_state() {
        let mut sidebar = Sidebar::new();
        assert!(sidebar.open);
        sidebar.toggle();
        assert!(!sidebar.open);
        sidebar.toggle();
        assert!(sidebar.open);
    }

    #[test]
    fn click_on_title_zone_selects_the_entry() {
        assert_eq!(hit_test(panel(), 3, 2, 2), SidebarHit::Item(0));
        assert_eq!(hit_test(panel(), 3, 5, 4), SidebarHit::Item(2));
    }

    #[test]
    fn click_on_button_cells_maps_to_actions() {
        // panel right edge is column 32
        assert_eq!(hit_test(panel(), 3, 29, 2), SidebarHit::Delete(0));
        assert_eq!(hit_test(panel(), 3, 25, 3), SidebarHit::Rename(1));
    }

    #[test]
    fn click_below_the_entries_hits_chrome() {
        assert_eq!(hit_test(panel(), 2, 4, 10), SidebarHit::Panel);
    }

    #[test]
    fn click_on_border_row_hits_chrome() {
        assert_eq!(hit_test(panel(), 2, 4, 1), SidebarHit::Panel);
    }
}
