//! Canvas interaction engine.
//!
//! An [`EditorSession`] owns the live editing state for one open
//! presentation: the current slide, the ordered selection, a single-element
//! clipboard, the viewport and undo history. Every command that names a
//! missing element or slide is a silent no-op, because UI-driven selection can
//! race ahead of deletions. Every mutation reconciles the selection so it is
//! always a subset of the current slide's elements.

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId};
use crate::geometry::Rect;
use crate::history::{History, DEFAULT_DEPTH};
use crate::presentation::{Comment, Presentation, Transition};
use crate::slide::{Slide, SlideId, SlideLayout};
use crate::viewport::{PanModifier, Viewport, DEFAULT_FIT_MARGIN};

/// Offset applied to pasted and duplicated elements.
pub const PASTE_OFFSET: f32 = 20.0;

/// Editing session configuration.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Offset (logical units, both axes) for pasted and duplicated elements.
    pub paste_offset: f32,
    /// Number of undo steps kept.
    pub history_depth: usize,
    /// Fraction of the container "fit to screen" fills, in `0..=1`.
    pub fit_margin: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            paste_offset: PASTE_OFFSET,
            history_depth: DEFAULT_DEPTH,
            fit_margin: DEFAULT_FIT_MARGIN,
        }
    }
}

/// Clipboard contents: one element snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardEntry {
    /// Where the snapshot was copied from. `None` once the clipboard holds an
    /// independent snapshot (after a cut).
    pub source: Option<(SlideId, ElementId)>,
    /// The copied element.
    pub element: Element,
}

/// Alignment targets for the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    /// Align left edges.
    Left,
    /// Align horizontal centers.
    Center,
    /// Align right edges.
    Right,
    /// Align top edges.
    Top,
    /// Align vertical centers.
    Middle,
    /// Align bottom edges.
    Bottom,
}

/// Live editing state for one open presentation.
#[derive(Debug, Clone)]
pub struct EditorSession {
    presentation: Presentation,
    current: usize,
    selected: Vec<ElementId>,
    clipboard: Option<ClipboardEntry>,
    viewport: Viewport,
    history: History,
    config: EditorConfig,
    dirty: bool,
    gesture: Option<bool>,
}

impl EditorSession {
    /// Open an editing session over a presentation.
    #[must_use]
    pub fn new(presentation: Presentation) -> Self {
        Self::with_config(presentation, EditorConfig::default())
    }

    /// Open an editing session with explicit configuration.
    #[must_use]
    pub fn with_config(presentation: Presentation, config: EditorConfig) -> Self {
        Self {
            presentation,
            current: 0,
            selected: Vec::new(),
            clipboard: None,
            viewport: Viewport::default(),
            history: History::new(config.history_depth),
            config,
            dirty: false,
            gesture: None,
        }
    }

    // ------------------------------------------------------------------
    // Document access
    // ------------------------------------------------------------------

    /// The presentation being edited.
    #[must_use]
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    /// An immutable snapshot for export or playback.
    #[must_use]
    pub fn snapshot(&self) -> Presentation {
        self.presentation.clone()
    }

    /// Explicit save: returns the snapshot to hand to storage and clears
    /// the dirty flag.
    pub fn save(&mut self) -> Presentation {
        self.dirty = false;
        self.snapshot()
    }

    /// Whether there are unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Index of the slide being edited.
    #[must_use]
    pub fn current_slide_index(&self) -> usize {
        self.current
    }

    /// The slide being edited.
    #[must_use]
    pub fn current_slide(&self) -> Option<&Slide> {
        self.presentation.slides.get(self.current)
    }

    fn current_slide_mut(&mut self) -> Option<&mut Slide> {
        self.presentation.slides.get_mut(self.current)
    }

    /// Viewport state.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable viewport state (zoom and pan never touch the document).
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Set the zoom percentage (clamped to 25..=200).
    pub fn set_zoom(&mut self, level: i32) {
        self.viewport.set_zoom(level);
    }

    /// Zoom by mouse-wheel ticks.
    pub fn wheel_zoom(&mut self, ticks: i32) {
        self.viewport.wheel(ticks);
    }

    /// Toolbar zoom in.
    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    /// Toolbar zoom out.
    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Fit the canvas into a container of the given pixel size.
    pub fn fit_to_screen(&mut self, container_width: f32, container_height: f32) {
        self.viewport
            .fit_to_screen(container_width, container_height, self.config.fit_margin);
    }

    /// Viewport-to-logical scale.
    #[must_use]
    pub fn viewport_scale(&self) -> f32 {
        self.viewport.scale()
    }

    /// Start panning.
    pub fn begin_pan(&mut self, modifier: PanModifier) {
        self.viewport.begin_pan(modifier);
    }

    /// Pan by a pixel delta; ignored unless panning.
    pub fn pan_by(&mut self, dx: f32, dy: f32) -> bool {
        self.viewport.pan_by(dx, dy)
    }

    /// Stop panning.
    pub fn end_pan(&mut self) {
        self.viewport.end_pan();
    }

    /// Clipboard contents.
    #[must_use]
    pub fn clipboard(&self) -> Option<&ClipboardEntry> {
        self.clipboard.as_ref()
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selected element ids; the first is the primary.
    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        &self.selected
    }

    /// The primary selected element id.
    #[must_use]
    pub fn primary(&self) -> Option<&ElementId> {
        self.selected.first()
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected.contains(id)
    }

    /// Replace the selection. Unknown and duplicate ids are dropped.
    pub fn select<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ElementId>,
    {
        self.selected.clear();
        for id in ids {
            self.push_selected(id);
        }
    }

    /// Add an element to the selection.
    pub fn select_add(&mut self, id: ElementId) {
        self.push_selected(id);
    }

    /// Toggle an element's membership in the selection.
    pub fn select_toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.selected.iter().position(|s| s == &id) {
            self.selected.remove(pos);
        } else {
            self.push_selected(id);
        }
    }

    /// Select every visible element on the current slide.
    pub fn select_all(&mut self) {
        let ids: Vec<_> = self
            .current_slide()
            .map(|s| {
                s.elements
                    .iter()
                    .filter(|e| e.visible)
                    .map(|e| e.id.clone())
                    .collect()
            })
            .unwrap_or_default();
        self.selected = ids;
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn push_selected(&mut self, id: ElementId) {
        let exists = self.current_slide().is_some_and(|s| s.contains(&id));
        if !exists {
            tracing::debug!(element_id = %id, "Ignoring selection of unknown element");
            return;
        }
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
    }

    /// Topmost visible element containing the logical point.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        let slide = self.current_slide()?;
        slide
            .render_order()
            .into_iter()
            .rev()
            .find(|e| e.visible && e.contains_point(x, y))
            .map(|e| e.id.clone())
    }

    /// Click in viewport pixels: selects the topmost element under the
    /// pointer, or clears the selection when clicking empty canvas.
    /// With `additive`, toggles membership instead.
    pub fn click(&mut self, screen_x: f32, screen_y: f32, additive: bool) {
        let (x, y) = self.viewport.screen_to_logical(screen_x, screen_y);
        match (self.element_at(x, y), additive) {
            (Some(id), true) => self.select_toggle(id),
            (Some(id), false) => {
                if !self.is_selected(&id) {
                    self.select([id]);
                }
            }
            (None, true) => {}
            (None, false) => self.clear_selection(),
        }
    }

    /// Select every visible element whose bounds overlap `rect`.
    /// No overlap clears the selection.
    pub fn marquee_select(&mut self, rect: Rect) {
        let hits: Vec<ElementId> = self
            .current_slide()
            .map(|slide| {
                slide
                    .elements
                    .iter()
                    .filter(|e| e.visible && e.bounds().intersects(&rect))
                    .map(|e| e.id.clone())
                    .collect()
            })
            .unwrap_or_default();
        self.selected = hits;
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Open a gesture (e.g. a drag) so that all mutations until
    /// [`end_gesture`](Self::end_gesture) form one undo step.
    pub fn begin_gesture(&mut self) {
        self.gesture = Some(false);
    }

    /// Close the current gesture.
    pub fn end_gesture(&mut self) {
        self.gesture = None;
    }

    /// Move an element by a delta.
    ///
    /// When `id` is part of a multi-selection, the same delta is applied to
    /// every selected element. A single selection, or an unselected element,
    /// moves alone. Locked elements never move. Returns the number of
    /// elements moved.
    pub fn drag_move(&mut self, id: &ElementId, dx: f32, dy: f32) -> usize {
        if !self.current_slide().is_some_and(|s| s.contains(id)) {
            return 0;
        }
        let targets: Vec<ElementId> = if self.selected.len() > 1 && self.selected.contains(id) {
            self.selected.clone()
        } else {
            vec![id.clone()]
        };
        self.translate(&targets, dx, dy)
    }

    /// Move the whole selection by a delta (keyboard nudge).
    pub fn nudge(&mut self, dx: f32, dy: f32) -> usize {
        let targets = self.selected.clone();
        self.translate(&targets, dx, dy)
    }

    fn translate(&mut self, targets: &[ElementId], dx: f32, dy: f32) -> usize {
        let movable = self.current_slide().map_or(0, |slide| {
            slide
                .elements
                .iter()
                .filter(|e| !e.locked && targets.contains(&e.id))
                .count()
        });
        if movable == 0 || (dx == 0.0 && dy == 0.0) {
            return 0;
        }
        self.checkpoint();
        if let Some(slide) = self.current_slide_mut() {
            for element in slide
                .elements
                .iter_mut()
                .filter(|e| !e.locked && targets.contains(&e.id))
            {
                element.transform.x += dx;
                element.transform.y += dy;
            }
        }
        movable
    }

    /// Align the selection's edges or centers to the selection bounds.
    pub fn align_selected(&mut self, alignment: Alignment) {
        let Some(slide) = self.current_slide() else {
            return;
        };
        let picked: Vec<&Element> = slide
            .elements
            .iter()
            .filter(|e| self.selected.contains(&e.id) && !e.locked)
            .collect();
        if picked.len() < 2 {
            return;
        }
        let bounds = picked
            .iter()
            .map(|e| e.bounds())
            .reduce(|a, b| a.union(&b))
            .unwrap_or_else(Rect::canvas);
        let targets = self.selected.clone();
        self.checkpoint();
        if let Some(slide) = self.current_slide_mut() {
            for element in slide
                .elements
                .iter_mut()
                .filter(|e| !e.locked && targets.contains(&e.id))
            {
                let t = &mut element.transform;
                match alignment {
                    Alignment::Left => t.x = bounds.min_x,
                    Alignment::Center => t.x = bounds.center().0 - t.width / 2.0,
                    Alignment::Right => t.x = bounds.max_x - t.width,
                    Alignment::Top => t.y = bounds.min_y,
                    Alignment::Middle => t.y = bounds.center().1 - t.height / 2.0,
                    Alignment::Bottom => t.y = bounds.max_y - t.height,
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Element lifecycle
    // ------------------------------------------------------------------

    /// Add an element to the current slide and select it. An id that
    /// already exists on the slide is replaced with a fresh one.
    pub fn add_element(&mut self, mut element: Element) -> Option<ElementId> {
        let slide = self.current_slide()?;
        if slide.contains(&element.id) {
            element.id = ElementId::generate();
        }
        element.transform = element.transform.normalized();
        let id = element.id.clone();
        self.checkpoint();
        self.current_slide_mut()?.elements.push(element);
        self.selected = vec![id.clone()];
        Some(id)
    }

    /// Apply an edit to an element on the current slide. The id cannot be
    /// changed and geometry is renormalized afterwards.
    pub fn update_element<F>(&mut self, id: &ElementId, edit: F) -> bool
    where
        F: FnOnce(&mut Element),
    {
        if !self.current_slide().is_some_and(|s| s.contains(id)) {
            return false;
        }
        self.checkpoint();
        let Some(element) = self.current_slide_mut().and_then(|s| s.element_mut(id)) else {
            return false;
        };
        edit(element);
        element.id = id.clone();
        element.transform = element.transform.normalized();
        if !element.visible {
            self.selected.retain(|s| s != id);
        }
        true
    }

    /// Lock or unlock an element.
    pub fn set_locked(&mut self, id: &ElementId, locked: bool) -> bool {
        self.update_element(id, |e| e.locked = locked)
    }

    /// Show or hide an element. Hidden elements leave the selection.
    pub fn set_visible(&mut self, id: &ElementId, visible: bool) -> bool {
        self.update_element(id, |e| e.visible = visible)
    }

    /// Delete elements from the current slide, clearing them from the
    /// selection and invalidating a clipboard copied from any of them.
    /// Returns the number of elements removed.
    pub fn delete(&mut self, ids: &[ElementId]) -> usize {
        let Some(slide) = self.current_slide() else {
            return 0;
        };
        let slide_id = slide.id.clone();
        let doomed = slide.elements.iter().filter(|e| ids.contains(&e.id)).count();
        if doomed == 0 {
            return 0;
        }
        self.checkpoint();
        if let Some(slide) = self.current_slide_mut() {
            slide.elements.retain(|e| !ids.contains(&e.id));
        }
        self.selected.retain(|s| !ids.contains(s));
        let invalidated = self
            .clipboard
            .as_ref()
            .and_then(|c| c.source.as_ref())
            .is_some_and(|(sid, eid)| sid == &slide_id && ids.contains(eid));
        if invalidated {
            tracing::debug!("Clipboard source deleted, clearing clipboard");
            self.clipboard = None;
        }
        doomed
    }

    /// Delete every selected element.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selected.clone();
        self.delete(&ids)
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    /// Snapshot the primary selected element into the clipboard.
    pub fn copy(&mut self) -> bool {
        let Some(slide) = self.current_slide() else {
            return false;
        };
        let Some(element) = self.primary().and_then(|id| slide.element(id)) else {
            return false;
        };
        self.clipboard = Some(ClipboardEntry {
            source: Some((slide.id.clone(), element.id.clone())),
            element: element.clone(),
        });
        true
    }

    /// Copy the primary element, then delete it. The clipboard keeps an
    /// independent snapshot, so the deletion does not invalidate it.
    pub fn cut(&mut self) -> bool {
        if !self.copy() {
            return false;
        }
        let Some(entry) = self.clipboard.take() else {
            return false;
        };
        let Some((_, id)) = entry.source.clone() else {
            return false;
        };
        self.delete(&[id]);
        self.clipboard = Some(ClipboardEntry {
            source: None,
            element: entry.element,
        });
        true
    }

    /// Paste the clipboard onto the current slide as a new element offset by
    /// the paste offset, and select it.
    pub fn paste(&mut self) -> Option<ElementId> {
        let element = self.clipboard.as_ref()?.element.clone();
        self.insert_clone(element)
    }

    /// Clone the primary selected element (bypassing the clipboard) and
    /// select the clone.
    pub fn duplicate(&mut self) -> Option<ElementId> {
        let slide = self.current_slide()?;
        let element = slide.element(self.primary()?)?.clone();
        self.insert_clone(element)
    }

    fn insert_clone(&mut self, mut element: Element) -> Option<ElementId> {
        let top = self.current_slide()?.max_z().unwrap_or(0);
        element.id = ElementId::generate();
        element.transform.x += self.config.paste_offset;
        element.transform.y += self.config.paste_offset;
        element.transform.z_index = top.saturating_add(1);
        element.locked = false;
        self.add_element(element)
    }

    // ------------------------------------------------------------------
    // Z-order
    // ------------------------------------------------------------------

    /// Raise an element above every other (`max(z) + 1`). Always strictly
    /// increases the element's z-index because the maximum is recomputed.
    pub fn bring_to_front(&mut self, id: &ElementId) -> Option<i32> {
        let z = self.current_slide()?.max_z()?.saturating_add(1);
        self.set_z(id, z)
    }

    /// Lower an element beneath every other (`min(z) - 1`).
    pub fn send_to_back(&mut self, id: &ElementId) -> Option<i32> {
        let z = self.current_slide()?.min_z()?.saturating_sub(1);
        self.set_z(id, z)
    }

    /// Raise an element by one z step.
    pub fn bring_forward(&mut self, id: &ElementId) -> Option<i32> {
        let z = self.current_slide()?.element(id)?.transform.z_index;
        self.set_z(id, z.saturating_add(1))
    }

    /// Lower an element by one z step.
    pub fn send_backward(&mut self, id: &ElementId) -> Option<i32> {
        let z = self.current_slide()?.element(id)?.transform.z_index;
        self.set_z(id, z.saturating_sub(1))
    }

    fn set_z(&mut self, id: &ElementId, z: i32) -> Option<i32> {
        if !self.current_slide()?.contains(id) {
            return None;
        }
        self.checkpoint();
        let element = self.current_slide_mut()?.element_mut(id)?;
        element.transform.z_index = z;
        Some(z)
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Put every selected element into one new group.
    pub fn group_selected(&mut self) -> Option<String> {
        if self.selected.len() < 2 {
            return None;
        }
        let group = format!("group-{}", uuid::Uuid::new_v4().simple());
        let targets = self.selected.clone();
        self.checkpoint();
        let slide = self.current_slide_mut()?;
        for element in slide.elements.iter_mut().filter(|e| targets.contains(&e.id)) {
            element.group_id = Some(group.clone());
        }
        Some(group)
    }

    /// Remove group membership from every selected element.
    pub fn ungroup(&mut self) -> usize {
        let targets = self.selected.clone();
        let grouped = self.current_slide().map_or(0, |s| {
            s.elements
                .iter()
                .filter(|e| targets.contains(&e.id) && e.group_id.is_some())
                .count()
        });
        if grouped == 0 {
            return 0;
        }
        self.checkpoint();
        if let Some(slide) = self.current_slide_mut() {
            for element in slide.elements.iter_mut().filter(|e| targets.contains(&e.id)) {
                element.group_id = None;
            }
        }
        grouped
    }

    /// Select every member of the groups touched by the current selection.
    pub fn expand_selection_to_groups(&mut self) {
        let Some(slide) = self.current_slide() else {
            return;
        };
        let groups: Vec<&String> = slide
            .elements
            .iter()
            .filter(|e| self.selected.contains(&e.id))
            .filter_map(|e| e.group_id.as_ref())
            .collect();
        let extra: Vec<ElementId> = slide
            .elements
            .iter()
            .filter(|e| e.group_id.as_ref().is_some_and(|g| groups.contains(&g)))
            .map(|e| e.id.clone())
            .collect();
        for id in extra {
            self.push_selected(id);
        }
    }

    // ------------------------------------------------------------------
    // Slides
    // ------------------------------------------------------------------

    /// Switch the slide being edited. Clears the selection.
    pub fn go_to_slide(&mut self, index: usize) -> bool {
        if index >= self.presentation.slides.len() {
            return false;
        }
        if index != self.current {
            self.current = index;
            self.selected.clear();
        }
        true
    }

    /// Insert a new slide after the current one and switch to it.
    pub fn add_slide(&mut self, layout: SlideLayout) -> SlideId {
        let slide = Slide::new(layout);
        let id = slide.id.clone();
        self.checkpoint();
        let at = if self.presentation.slides.is_empty() {
            0
        } else {
            self.current + 1
        };
        self.presentation.slides.insert(at, slide);
        self.current = at;
        self.selected.clear();
        id
    }

    /// Duplicate the slide at `index` (with fresh element ids), inserting
    /// the copy right after it.
    pub fn duplicate_slide(&mut self, index: usize) -> Option<SlideId> {
        let source = self.presentation.slides.get(index)?;
        let mut copy = source.clone();
        copy.id = SlideId::generate();
        for element in &mut copy.elements {
            element.id = ElementId::generate();
        }
        let new_id = copy.id.clone();
        let transition = self.presentation.transitions.get(&source.id).cloned();
        let notes = self.presentation.notes.get(&source.id).cloned();
        self.checkpoint();
        self.presentation.slides.insert(index + 1, copy);
        if let Some(transition) = transition {
            self.presentation
                .transitions
                .insert(new_id.clone(), transition);
        }
        if let Some(notes) = notes {
            self.presentation.notes.insert(new_id.clone(), notes);
        }
        Some(new_id)
    }

    /// Delete the slide at `index`. The last remaining slide is never
    /// deleted. Side tables and the clipboard are reconciled.
    pub fn delete_slide(&mut self, index: usize) -> bool {
        if index >= self.presentation.slides.len() || self.presentation.slides.len() <= 1 {
            return false;
        }
        self.checkpoint();
        let removed = self.presentation.slides.remove(index);
        self.presentation.prune_side_tables();
        if self
            .clipboard
            .as_ref()
            .and_then(|c| c.source.as_ref())
            .is_some_and(|(sid, _)| sid == &removed.id)
        {
            self.clipboard = None;
        }
        if self.current >= self.presentation.slides.len() || self.current > index {
            self.current = self.current.saturating_sub(1);
        }
        self.selected.clear();
        true
    }

    /// Move a slide to a new position. The moved slide stays current if it
    /// was current.
    pub fn move_slide(&mut self, from: usize, to: usize) -> bool {
        let len = self.presentation.slides.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let current_id = self.current_slide().map(|s| s.id.clone());
        self.checkpoint();
        let slide = self.presentation.slides.remove(from);
        self.presentation.slides.insert(to, slide);
        if let Some(id) = current_id {
            self.current = self.presentation.slide_index(&id).unwrap_or(0);
        }
        true
    }

    /// Set speaker notes for the current slide.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        let Some(id) = self.current_slide().map(|s| s.id.clone()) else {
            return;
        };
        self.checkpoint();
        self.presentation.notes.insert(id, notes.into());
    }

    /// Set the entry transition of the current slide.
    pub fn set_transition(&mut self, transition: Transition) {
        let Some(id) = self.current_slide().map(|s| s.id.clone()) else {
            return;
        };
        self.checkpoint();
        self.presentation.transitions.insert(id, transition);
    }

    /// Append a comment to the current slide's thread.
    pub fn add_comment(&mut self, comment: Comment) {
        let Some(id) = self.current_slide().map(|s| s.id.clone()) else {
            return;
        };
        self.checkpoint();
        self.presentation.comments.entry(id).or_default().push(comment);
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    /// Undo the last mutation.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(&self.presentation) else {
            return false;
        };
        self.restore(previous);
        true
    }

    /// Redo the last undone mutation.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(&self.presentation) else {
            return false;
        };
        self.restore(next);
        true
    }

    fn restore(&mut self, presentation: Presentation) {
        self.presentation = presentation;
        if self.current >= self.presentation.slides.len() {
            self.current = self.presentation.slides.len().saturating_sub(1);
        }
        self.dirty = true;
        self.reconcile_selection();
    }

    fn reconcile_selection(&mut self) {
        let Some(slide) = self.presentation.slides.get(self.current) else {
            self.selected.clear();
            return;
        };
        self.selected
            .retain(|id| slide.element(id).is_some_and(|e| e.visible));
    }

    fn checkpoint(&mut self) {
        match self.gesture {
            Some(true) => {}
            Some(false) => {
                self.history.record(&self.presentation);
                self.gesture = Some(true);
            }
            None => self.history.record(&self.presentation),
        }
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, ShapeContent, ShapeType, Transform};

    fn shape(id: &str, x: f32, y: f32, w: f32, h: f32) -> Element {
        Element::new(ElementKind::Shape(ShapeContent::filled(
            ShapeType::Rectangle,
            "#3366ff",
        )))
        .with_id(id)
        .with_transform(Transform::at(x, y, w, h))
    }

    fn session(elements: Vec<Element>) -> EditorSession {
        let mut slide = Slide::new(SlideLayout::Blank).with_id("s1");
        slide.elements = elements;
        EditorSession::new(Presentation::new("p", "Deck").with_slide(slide))
    }

    fn pos(s: &EditorSession, id: &str) -> (f32, f32) {
        let t = s
            .current_slide()
            .and_then(|sl| sl.element(&ElementId::from(id)))
            .map(|e| e.transform)
            .expect("element");
        (t.x, t.y)
    }

    #[test]
    fn test_select_drops_unknown_ids() {
        let mut s = session(vec![shape("a", 0.0, 0.0, 10.0, 10.0)]);
        s.select([ElementId::from("a"), ElementId::from("ghost"), ElementId::from("a")]);
        assert_eq!(s.selection(), &[ElementId::from("a")]);
    }

    #[test]
    fn test_marquee_selects_overlapping() {
        let mut s = session(vec![
            shape("inside", 50.0, 50.0, 20.0, 20.0),
            shape("outside", 150.0, 150.0, 20.0, 20.0),
        ]);
        s.marquee_select(Rect::from_corners(100.0, 100.0, 0.0, 0.0));
        assert_eq!(s.selection(), &[ElementId::from("inside")]);

        s.marquee_select(Rect::from_corners(400.0, 400.0, 500.0, 500.0));
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_single_drag_does_not_broadcast() {
        let mut s = session(vec![
            shape("a", 0.0, 0.0, 10.0, 10.0),
            shape("b", 100.0, 0.0, 10.0, 10.0),
        ]);
        s.select([ElementId::from("a")]);
        assert_eq!(s.drag_move(&ElementId::from("a"), 5.0, 7.0), 1);
        assert_eq!(pos(&s, "a"), (5.0, 7.0));
        assert_eq!(pos(&s, "b"), (100.0, 0.0));
    }

    #[test]
    fn test_multi_drag_broadcasts() {
        let mut s = session(vec![
            shape("a", 0.0, 0.0, 10.0, 10.0),
            shape("b", 100.0, 0.0, 10.0, 10.0),
            shape("c", 200.0, 0.0, 10.0, 10.0),
        ]);
        s.select([ElementId::from("a"), ElementId::from("b")]);
        assert_eq!(s.drag_move(&ElementId::from("b"), -3.0, 4.0), 2);
        assert_eq!(pos(&s, "a"), (-3.0, 4.0));
        assert_eq!(pos(&s, "b"), (97.0, 4.0));
        assert_eq!(pos(&s, "c"), (200.0, 0.0));
    }

    #[test]
    fn test_drag_unselected_element_moves_alone() {
        let mut s = session(vec![
            shape("a", 0.0, 0.0, 10.0, 10.0),
            shape("b", 100.0, 0.0, 10.0, 10.0),
            shape("c", 200.0, 0.0, 10.0, 10.0),
        ]);
        s.select([ElementId::from("a"), ElementId::from("b")]);
        s.drag_move(&ElementId::from("c"), 1.0, 1.0);
        assert_eq!(pos(&s, "a"), (0.0, 0.0));
        assert_eq!(pos(&s, "c"), (201.0, 1.0));
    }

    #[test]
    fn test_locked_elements_stay_put() {
        let mut s = session(vec![
            shape("a", 0.0, 0.0, 10.0, 10.0),
            shape("b", 100.0, 0.0, 10.0, 10.0),
        ]);
        s.set_locked(&ElementId::from("b"), true);
        s.select([ElementId::from("a"), ElementId::from("b")]);
        assert_eq!(s.drag_move(&ElementId::from("a"), 10.0, 0.0), 1);
        assert_eq!(pos(&s, "b"), (100.0, 0.0));
    }

    #[test]
    fn test_missing_ids_are_noops() {
        let mut s = session(vec![shape("a", 0.0, 0.0, 10.0, 10.0)]);
        let ghost = ElementId::from("ghost");
        assert_eq!(s.drag_move(&ghost, 1.0, 1.0), 0);
        assert_eq!(s.bring_to_front(&ghost), None);
        assert_eq!(s.delete(&[ghost.clone()]), 0);
        assert!(!s.update_element(&ghost, |_| {}));
        assert!(!s.is_dirty());
        assert!(!s.undo());
    }

    #[test]
    fn test_bring_to_front_twice_strictly_increases() {
        let mut s = session(vec![
            shape("a", 0.0, 0.0, 10.0, 10.0),
            shape("b", 0.0, 0.0, 10.0, 10.0),
        ]);
        let a = ElementId::from("a");
        let first = s.bring_to_front(&a).expect("z");
        let second = s.bring_to_front(&a).expect("z");
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert!(second > first);
    }

    #[test]
    fn test_send_to_back() {
        let mut s = session(vec![
            shape("a", 0.0, 0.0, 10.0, 10.0),
            shape("b", 0.0, 0.0, 10.0, 10.0),
        ]);
        assert_eq!(s.send_to_back(&ElementId::from("b")), Some(-1));
        let order: Vec<_> = s
            .current_slide()
            .expect("slide")
            .render_order()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_copy_paste_offsets_and_selects() {
        let mut s = session(vec![shape("a", 10.0, 10.0, 10.0, 10.0)]);
        s.select([ElementId::from("a")]);
        assert!(s.copy());
        let pasted = s.paste().expect("pasted");
        assert_ne!(pasted, ElementId::from("a"));
        assert_eq!(s.selection(), &[pasted.clone()]);
        assert_eq!(pos(&s, pasted.as_str()), (30.0, 30.0));
    }

    #[test]
    fn test_delete_clipboard_source_invalidates_paste() {
        let mut s = session(vec![shape("a", 10.0, 10.0, 10.0, 10.0)]);
        s.select([ElementId::from("a")]);
        s.copy();
        s.delete(&[ElementId::from("a")]);
        assert!(s.clipboard().is_none());
        assert!(s.paste().is_none());
        assert!(s.current_slide().expect("slide").elements.is_empty());
    }

    #[test]
    fn test_cut_keeps_independent_snapshot() {
        let mut s = session(vec![shape("a", 10.0, 10.0, 10.0, 10.0)]);
        s.select([ElementId::from("a")]);
        assert!(s.cut());
        assert!(s.current_slide().expect("slide").elements.is_empty());
        assert!(s.selection().is_empty());
        let pasted = s.paste().expect("paste after cut");
        assert_eq!(pos(&s, pasted.as_str()), (30.0, 30.0));
    }

    #[test]
    fn test_duplicate_bypasses_clipboard() {
        let mut s = session(vec![shape("a", 0.0, 0.0, 10.0, 10.0)]);
        s.select([ElementId::from("a")]);
        let dup = s.duplicate().expect("dup");
        assert!(s.clipboard().is_none());
        assert_eq!(pos(&s, dup.as_str()), (20.0, 20.0));
    }

    #[test]
    fn test_delete_prunes_selection() {
        let mut s = session(vec![
            shape("a", 0.0, 0.0, 10.0, 10.0),
            shape("b", 0.0, 0.0, 10.0, 10.0),
        ]);
        s.select([ElementId::from("a"), ElementId::from("b")]);
        s.delete(&[ElementId::from("a")]);
        assert_eq!(s.selection(), &[ElementId::from("b")]);
    }

    #[test]
    fn test_undo_restores_and_reconciles() {
        let mut s = session(vec![shape("a", 0.0, 0.0, 10.0, 10.0)]);
        let id = s.add_element(shape("b", 5.0, 5.0, 5.0, 5.0)).expect("added");
        assert_eq!(s.selection(), &[id]);
        assert!(s.undo());
        assert!(s.selection().is_empty());
        assert_eq!(s.current_slide().expect("slide").elements.len(), 1);
        assert!(s.redo());
        assert_eq!(s.current_slide().expect("slide").elements.len(), 2);
    }

    #[test]
    fn test_gesture_is_one_undo_step() {
        let mut s = session(vec![shape("a", 0.0, 0.0, 10.0, 10.0)]);
        let a = ElementId::from("a");
        s.begin_gesture();
        for _ in 0..10 {
            s.drag_move(&a, 1.0, 0.0);
        }
        s.end_gesture();
        assert_eq!(pos(&s, "a"), (10.0, 0.0));
        assert!(s.undo());
        assert_eq!(pos(&s, "a"), (0.0, 0.0));
        assert!(!s.undo());
    }

    #[test]
    fn test_click_uses_viewport_and_topmost() {
        let mut bottom = shape("bottom", 0.0, 0.0, 100.0, 100.0);
        bottom.transform.z_index = 0;
        let mut top = shape("top", 0.0, 0.0, 100.0, 100.0);
        top.transform.z_index = 1;
        let mut s = session(vec![top, bottom]);
        s.set_zoom(50);
        s.click(25.0, 25.0, false);
        assert_eq!(s.selection(), &[ElementId::from("top")]);
        s.click(200.0, 200.0, false);
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_slide_commands() {
        let mut s = session(vec![shape("a", 0.0, 0.0, 10.0, 10.0)]);
        s.select([ElementId::from("a")]);
        let added = s.add_slide(SlideLayout::Content);
        assert_eq!(s.current_slide_index(), 1);
        assert!(s.selection().is_empty());
        assert!(s.move_slide(1, 0));
        assert_eq!(s.current_slide().map(|sl| sl.id.clone()), Some(added));
        assert!(s.delete_slide(0));
        assert!(!s.delete_slide(0), "last slide is kept");
        assert_eq!(s.presentation().slide_count(), 1);
    }

    #[test]
    fn test_align_left() {
        let mut s = session(vec![
            shape("a", 40.0, 0.0, 10.0, 10.0),
            shape("b", 100.0, 50.0, 30.0, 10.0),
        ]);
        s.select([ElementId::from("a"), ElementId::from("b")]);
        s.align_selected(Alignment::Right);
        assert_eq!(pos(&s, "a"), (120.0, 0.0));
        assert_eq!(pos(&s, "b"), (100.0, 50.0));
    }

    #[test]
    fn test_save_clears_dirty() {
        let mut s = session(vec![shape("a", 0.0, 0.0, 10.0, 10.0)]);
        s.nudge(1.0, 0.0);
        assert!(!s.is_dirty(), "empty selection nudges nothing");
        s.select([ElementId::from("a")]);
        s.nudge(1.0, 0.0);
        assert!(s.is_dirty());
        let saved = s.save();
        assert!(!s.is_dirty());
        assert_eq!(saved.slides[0].elements[0].transform.x, 1.0);
    }
}
