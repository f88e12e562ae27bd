use smoothscroll_core::engine::{Surface, SurfaceHost, SurfaceId};

use crate::surface::TextView;

/// Open panes and which of them receive scroll input
pub struct Workspace {
    panes: Vec<TextView>,
    focused: usize,
    /// Fan every scroll request out to all panes
    linked: bool,
}

impl Workspace {
    pub fn new(panes: Vec<TextView>) -> Self {
        Self {
            panes,
            focused: 0,
            linked: false,
        }
    }

    pub fn panes(&self) -> &[TextView] {
        &self.panes
    }

    pub fn panes_mut(&mut self) -> &mut [TextView] {
        &mut self.panes
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn focused(&self) -> Option<&TextView> {
        self.panes.get(self.focused)
    }

    pub fn focused_mut(&mut self) -> Option<&mut TextView> {
        self.panes.get_mut(self.focused)
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn toggle_linked(&mut self) -> bool {
        self.linked = !self.linked && self.panes.len() > 1;
        self.linked
    }

    pub fn focus_next(&mut self) {
        if !self.panes.is_empty() {
            self.focused = (self.focused + 1) % self.panes.len();
        }
    }

    /// Focus the pane at a screen position, returning its id
    pub fn focus_at(&mut self, column: u16, row: u16) -> Option<SurfaceId> {
        let index = self.pane_index_at(column, row)?;
        self.focused = index;
        Some(self.panes[index].id())
    }

    fn pane_index_at(&self, column: u16, row: u16) -> Option<usize> {
        self.panes.iter().position(|p| {
            let area = p.area();
            column >= area.x
                && column < area.x + area.width
                && row >= area.y
                && row < area.y + area.height
        })
    }

    /// Pane under a screen position
    pub fn pane_at(&self, column: u16, row: u16) -> Option<SurfaceId> {
        self.pane_index_at(column, row).map(|i| self.panes[i].id())
    }

    /// Surfaces a scroll request aimed at `origin` should reach
    pub fn targets(&self, origin: Option<SurfaceId>) -> Vec<SurfaceId> {
        if self.linked {
            return self.panes.iter().map(TextView::id).collect();
        }
        origin
            .or_else(|| self.focused().map(TextView::id))
            .into_iter()
            .collect()
    }

    /// Remove the focused pane; the caller must tear down its animation
    pub fn close_focused(&mut self) -> Option<SurfaceId> {
        if self.panes.len() <= 1 {
            return None;
        }
        let pane = self.panes.remove(self.focused);
        self.focused = self.focused.min(self.panes.len() - 1);
        if self.panes.len() == 1 {
            self.linked = false;
        }
        Some(pane.id())
    }

    /// Whether any pane needs to be redrawn; clears the flags
    pub fn take_dirty(&mut self) -> bool {
        self.panes
            .iter_mut()
            .fold(false, |dirty, pane| pane.take_dirty() || dirty)
    }
}

impl SurfaceHost for Workspace {
    fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut dyn Surface> {
        self.panes
            .iter_mut()
            .find(|p| p.id() == id)
            .map(|p| p as &mut dyn Surface)
    }
}
