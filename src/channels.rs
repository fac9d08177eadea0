//! Collaborator traits for the render surface and the navigation history.
//!
//! The store never touches layout or the address bar directly; it talks to
//! these two seams. Geometry is an opaque above/below test on an opaque
//! element handle, history is a replaceable current-id slot. Event delivery
//! runs the other way: the embedder calls the store's `update_on_*` handlers
//! synchronously as its scroll and hash events arrive.

/// Opaque handle to a rendered element, issued by the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHandle(pub u64);

/// Lookup and viewport geometry over the rendered document.
pub trait RenderSurface {
    /// Resolve a section id to its rendered element, if present.
    fn lookup(&self, id: &str) -> Option<ElementHandle>;
    /// Whether the element sits above the viewport.
    fn is_above(&self, el: ElementHandle) -> bool;
    /// Whether the element sits below the viewport.
    fn is_below(&self, el: ElementHandle) -> bool;
    /// Scroll the element into view.
    fn scroll_into_view(&mut self, el: ElementHandle);
    /// Scroll to a raw section id without resolving a handle first; used
    /// when the id has no corresponding menu item.
    fn scroll_to_id(&mut self, id: &str);
}

/// The persisted navigation location (the URL hash, in a browser host).
pub trait HistoryChannel {
    /// The current location id; empty when none is set.
    fn current_id(&self) -> String;
    /// Publish an id, either as a new history entry or rewriting the
    /// current one.
    fn replace(&mut self, id: &str, rewrite: bool);
}
