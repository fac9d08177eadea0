//! The menu store: the single source of truth for outline navigation.
//!
//! Three independently-changing signals (scroll position, navigation
//! history, per-node disclosure) all funnel into one active-item index over
//! the flattened menu sequence. The store is the sole writer of that index
//! and of the sidebar flag; everything runs synchronously on the host event
//! thread, so a handler always completes before the next event lands.
//!
//! Impossible interactive states degrade to silent no-ops rather than
//! errors: this runs inside a live view where failing would break rendering.

use crate::channels::{ElementHandle, HistoryChannel, RenderSurface};
use crate::config::Config;
use crate::document::DocumentTree;
use crate::flatten::{self, MENU_KINDS, MENU_RELATIONS};
use crate::node::{MenuKind, MenuNode, NodePayload};
use tracing::{debug, trace};

/// Reserved id prefix for security-scheme sections; hashes under it resolve
/// to the authentication section even when no exact menu item matches.
pub const SECURITY_SCHEMES_SECTION_PREFIX: &str = "section/authentication/";

/// Stores all side-menu related information for one loaded document.
pub struct MenuStore {
    tree: DocumentTree,
    /// Arena handles of the menu items, in flattened pre-order.
    flat: Vec<usize>,
    /// Position of the active item in `flat`; `None` means nothing active.
    active_idx: Option<usize>,
    sidebar_open: bool,
    /// Subscription state: cleared by [`MenuStore::dispose`], after which the
    /// scroll and history handlers mutate nothing.
    attached: bool,
    group_depth: usize,
    surface: Box<dyn RenderSurface>,
    history: Box<dyn HistoryChannel>,
}

impl MenuStore {
    /// Build the store over a constructed document tree: flattens the menu
    /// sequence, assigns absolute indices and attaches to the channels.
    #[must_use]
    pub fn new(
        mut tree: DocumentTree,
        config: &Config,
        surface: Box<dyn RenderSurface>,
        history: Box<dyn HistoryChannel>,
    ) -> Self {
        let flat = flatten::flatten(&tree, &MENU_RELATIONS, &MENU_KINDS);
        flatten::assign_absolute_indices(&mut tree, &flat);
        debug!(items = flat.len(), "menu flattened");
        Self {
            tree,
            flat,
            active_idx: None,
            sidebar_open: false,
            attached: true,
            group_depth: config.group_depth,
            surface,
            history,
        }
    }

    /// Statically scroll to a hash target before any store exists. Used
    /// ahead of hydration so the page lands in roughly the right place
    /// without waiting for construction.
    pub fn scroll_to_hash(surface: &mut dyn RenderSurface, id: &str) {
        if id.is_empty() {
            return;
        }
        surface.scroll_to_id(id);
    }

    #[must_use]
    /// The underlying document tree.
    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// Mutable access to the tree for direct user interaction with a node
    /// (disclosure toggles, tab selection). Same thread as the store, so no
    /// interleaving hazard exists.
    pub fn tree_mut(&mut self) -> &mut DocumentTree {
        &mut self.tree
    }

    #[must_use]
    /// Arena handles of the flattened menu sequence.
    pub fn flat_items(&self) -> &[usize] {
        &self.flat
    }

    #[must_use]
    /// Position of the active item in the flattened sequence.
    pub fn active_idx(&self) -> Option<usize> {
        self.active_idx
    }

    #[must_use]
    /// The currently active menu item.
    pub fn active_item(&self) -> Option<&MenuNode> {
        self.active_handle().map(|idx| self.tree.node(idx))
    }

    #[must_use]
    /// Whether the sidebar is open.
    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    #[must_use]
    /// Whether the store is still attached to its channels.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Flip the sidebar.
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Close the sidebar.
    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    /// Detach from the scroll and history channels. Idempotent; direct API
    /// calls keep working, channel events no longer mutate anything.
    pub fn dispose(&mut self) {
        self.attached = false;
    }

    #[must_use]
    /// Find a menu item by exact id.
    pub fn get_item_by_id(&self, id: &str) -> Option<usize> {
        self.flat
            .iter()
            .copied()
            .find(|&idx| self.tree.node(idx).id == id)
    }

    /// Update the active item on a scroll event.
    ///
    /// Scans the flattened sequence from the current index, one step per
    /// iteration in the scroll direction, until the neighbouring element
    /// crosses the viewport edge while the candidate is presentable. The
    /// geometry predicates are assumed monotonic along the sequence; even
    /// when layout violates that, the hard index bounds below keep the scan
    /// finite. The resulting activation rewrites history rather than
    /// appending: scrolling is a passive consequence, not a navigation.
    pub fn update_on_scroll(&mut self, is_scrolled_down: bool) {
        if !self.attached {
            return;
        }
        let step: i64 = if is_scrolled_down { 1 } else { -1 };
        let len = i64::try_from(self.flat.len()).unwrap_or(i64::MAX);
        let mut idx: i64 = self
            .active_idx
            .map_or(-1, |i| i64::try_from(i).unwrap_or(i64::MAX));
        loop {
            if idx == -1 && !is_scrolled_down {
                break;
            }
            if idx >= len - 1 && is_scrolled_down {
                break;
            }
            if is_scrolled_down {
                let next = usize::try_from(idx + 1).unwrap_or(usize::MAX);
                let el = self.element_at_or_first_child(next);
                if el.is_some_and(|e| self.surface.is_below(e)) && self.visible_at(idx) {
                    break;
                }
            } else {
                let el = usize::try_from(idx)
                    .ok()
                    .and_then(|i| self.element_at(i));
                if el.is_some_and(|e| self.surface.is_above(e)) && self.visible_at(idx - 1) {
                    break;
                }
            }
            idx += step;
        }
        let target = usize::try_from(idx)
            .ok()
            .and_then(|i| self.flat.get(i).copied());
        debug!(idx, "activate by scroll");
        self.activate(target, true, true);
    }

    /// Update the active item on a history event. `None` reads the current
    /// id from the history channel.
    ///
    /// An exact id match activates (without echoing the id back to history)
    /// and scrolls to the item. Otherwise, ids under the security-schemes
    /// prefix fall back to the first item whose id prefixes the hash, and in
    /// every non-exact case the raw id is scrolled to regardless.
    pub fn update_on_history(&mut self, id: Option<&str>) {
        if !self.attached {
            return;
        }
        let id = match id {
            Some(s) => s.to_owned(),
            None => self.history.current_id(),
        };
        if id.is_empty() {
            return;
        }
        if let Some(item) = self.get_item_by_id(&id) {
            debug!(%id, "activate by history");
            self.activate_and_scroll(Some(item), false, false);
        } else {
            if id.starts_with(SECURITY_SCHEMES_SECTION_PREFIX) {
                let fallback = self
                    .flat
                    .iter()
                    .copied()
                    .find(|&idx| id.starts_with(self.tree.node(idx).id.as_str()));
                if fallback.is_some() {
                    self.activate(fallback, false, false);
                }
            }
            self.surface.scroll_to_id(&id);
        }
    }

    /// Whether the menu item at a flattened position is currently
    /// presentable, given tab and variant selection on its ancestors.
    ///
    /// Walks the parent chain carrying the recorded variant/content
    /// discriminators upward until the selector that owns them is reached: a
    /// node nested under a non-selected media type tab or `oneOf` branch is
    /// hidden, as is anything under a collapsed field or response.
    #[must_use]
    pub fn is_visible(&self, idx: usize) -> bool {
        let Some(&arena) = self.flat.get(idx) else {
            return true;
        };
        let Some(mut cur) = self.tree.node(arena).parent else {
            return true;
        };
        let mut target_content: Option<usize> = None;
        let mut target_variant: Option<usize> = None;
        loop {
            let ancestor = self.tree.node(cur);
            match &ancestor.payload {
                NodePayload::Content {
                    active_mime_idx, ..
                } => {
                    if target_content.is_some_and(|t| t != *active_mime_idx) {
                        trace!(idx, ancestor = %ancestor.id, "hidden by media selection");
                        return false;
                    }
                }
                NodePayload::Schema { active_variant, .. } => {
                    if target_variant.is_some_and(|t| t != *active_variant) {
                        trace!(idx, ancestor = %ancestor.id, "hidden by variant selection");
                        return false;
                    }
                }
                _ => {}
            }
            if ancestor.menu_kind() == Some(MenuKind::Field) && ancestor.expanded != Some(true) {
                return false;
            }
            if let Some(t) = ancestor.target_variant {
                target_variant = Some(t);
            }
            if let Some(t) = ancestor.target_content {
                target_content = Some(t);
            }
            if matches!(ancestor.payload, NodePayload::Response { .. })
                && ancestor.expanded != Some(true)
            {
                return false;
            }
            match ancestor.parent {
                Some(parent) => cur = parent,
                None => return true,
            }
        }
    }

    /// Activate a menu item.
    ///
    /// No-op when the item is already active or is a group. Activation
    /// always first deactivates the previous item's whole ancestor chain;
    /// an absent item then just clears the location, and a structural depth
    /// (at or above the configured group depth) refuses with no state
    /// change. Otherwise the index moves, the id is published to history
    /// when `update_location` is set, and the item plus its ancestors are
    /// marked active and expanded.
    pub fn activate(&mut self, item: Option<usize>, update_location: bool, rewrite_history: bool) {
        let current = self.active_handle();
        let current_id = current.map(|idx| self.tree.node(idx).id.clone());
        let next_id = item.map(|idx| self.tree.node(idx).id.clone());
        if current_id == next_id {
            return;
        }
        if let Some(idx) = item {
            if self.tree.node(idx).menu_kind() == Some(MenuKind::Group) {
                return;
            }
        }

        self.deactivate(current);
        let Some(idx) = item else {
            self.history.replace("", rewrite_history);
            self.active_idx = None;
            return;
        };

        let node = self.tree.node(idx);
        if node.depth <= self.group_depth {
            return;
        }
        let Some(absolute) = node.absolute_idx else {
            return;
        };
        self.active_idx = Some(absolute);
        if update_location {
            let id = self.tree.node(idx).id.clone();
            self.history.replace(&id, rewrite_history);
        }
        self.tree.node_mut(idx).activate();
        self.expand_chain(idx);
    }

    /// Make an item and its whole ancestor chain inactive, collapsing every
    /// group, section, tag and operation found anywhere in the chain (the
    /// walk never stops early; fields and bare content holders stay open).
    pub fn deactivate(&mut self, item: Option<usize>) {
        let Some(idx) = item else {
            return;
        };
        if self.tree.node(idx).menu_kind().is_some() {
            self.tree.node_mut(idx).deactivate();
        }
        let mut cur = Some(idx);
        while let Some(i) = cur {
            let node = self.tree.node_mut(i);
            if node.is_legit_menu_item() {
                node.collapse();
            }
            cur = node.parent;
        }
    }

    /// Activate an item and scroll the view to it.
    ///
    /// The handle may come from a detached copy (search results), so it is
    /// re-resolved by id against the live sequence first. When the resolved
    /// item has no menu children the sidebar closes, since there is nothing
    /// further to pick.
    pub fn activate_and_scroll(
        &mut self,
        item: Option<usize>,
        update_location: bool,
        rewrite_history: bool,
    ) {
        let resolved = item.map(|idx| {
            let id = self.tree.node(idx).id.clone();
            self.get_item_by_id(&id).unwrap_or(idx)
        });
        self.activate(resolved, update_location, rewrite_history);
        self.scroll_to_active();
        if resolved.is_none_or(|idx| self.tree.node(idx).items.is_empty()) {
            self.close_sidebar();
        }
    }

    /// Scroll the render surface to the active item, if any is rendered.
    pub fn scroll_to_active(&mut self) {
        if let Some(idx) = self.active_idx {
            if let Some(el) = self.element_at(idx) {
                self.surface.scroll_into_view(el);
            }
        }
    }

    fn active_handle(&self) -> Option<usize> {
        self.active_idx.and_then(|idx| self.flat.get(idx).copied())
    }

    fn expand_chain(&mut self, idx: usize) {
        let mut cur = Some(idx);
        while let Some(i) = cur {
            let node = self.tree.node_mut(i);
            node.expand();
            cur = node.parent;
        }
    }

    /// Visibility for signed scan positions: out-of-range is trivially
    /// visible, matching the absent-item rule.
    fn visible_at(&self, idx: i64) -> bool {
        match usize::try_from(idx) {
            Ok(i) => self.is_visible(i),
            Err(_) => true,
        }
    }

    /// The rendered element of the item at a flattened position.
    fn element_at(&self, idx: usize) -> Option<ElementHandle> {
        let &arena = self.flat.get(idx)?;
        self.surface.lookup(&self.tree.node(arena).id)
    }

    /// Like [`Self::element_at`], but a group stands in for its first child:
    /// groups have no rendered section of their own.
    fn element_at_or_first_child(&self, idx: usize) -> Option<ElementHandle> {
        let &arena = self.flat.get(idx)?;
        let mut node = self.tree.node(arena);
        if node.menu_kind() == Some(MenuKind::Group) {
            node = self.tree.node(*node.items.first()?);
        }
        self.surface.lookup(&node.id)
    }
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
