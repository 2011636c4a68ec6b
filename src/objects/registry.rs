use std::time::Instant;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::error::{OverlayError, OverlayResult};
use crate::interaction::{DragTarget, InteractionMode, InteractionState, NudgeDirection};
use crate::objects::{AlertSink, AxisLabel, ChartCoordinates, ChartObject, MarketSnapshot};
use crate::render::RenderFrame;
use crate::theme::Theme;

/// Ordered set of overlay objects sharing one pointer state.
///
/// Insertion order is draw order; later objects sit on top and win hit-test
/// ties.
#[derive(Default)]
pub struct ObjectRegistry {
    objects: IndexMap<String, Box<dyn ChartObject>>,
    interaction: InteractionState,
}

impl std::fmt::Debug for ObjectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectRegistry")
            .field("objects", &self.objects.keys().collect::<Vec<_>>())
            .field("interaction", &self.interaction)
            .finish()
    }
}

impl ObjectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object under its own id.
    pub fn insert(&mut self, object: Box<dyn ChartObject>) -> OverlayResult<()> {
        let id = object.id().to_owned();
        if id.is_empty() {
            return Err(OverlayError::InvalidData(
                "object id must not be empty".to_owned(),
            ));
        }
        if self.objects.contains_key(&id) {
            return Err(OverlayError::InvalidData(format!(
                "object with id `{id}` is already registered"
            )));
        }
        self.objects.insert(id, object);
        Ok(())
    }

    /// Removes an object, keeping the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<Box<dyn ChartObject>> {
        let removed = self.objects.shift_remove(id);
        if removed.is_some() {
            if self.interaction.hovered() == Some(id) {
                self.interaction.set_hovered(None);
            }
            if self.dragged_id() == Some(id) {
                self.interaction.end_drag();
            }
        }
        removed
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn ChartObject> {
        self.objects.get(id).map(|object| object.as_ref())
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Box<dyn ChartObject>> {
        self.objects.get_mut(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn prepare_all(&mut self, chart: &dyn ChartCoordinates) {
        for object in self.objects.values_mut() {
            object.prepare(chart);
        }
    }

    /// Draws every object in order and collects their price-axis labels.
    ///
    /// Handles are drawn only for the hovered or dragged object.
    pub fn draw_all(&self, frame: &mut RenderFrame) -> Vec<AxisLabel> {
        let mut labels = Vec::new();
        let active = self.dragged_id().or(self.interaction.hovered());
        for (id, object) in &self.objects {
            if !object.is_object_on_chart() {
                continue;
            }
            object.draw(frame, &mut labels);
            if active == Some(id.as_str()) {
                object.draw_control_points(frame);
            }
        }
        labels
    }

    pub fn draw_debug(&self, frame: &mut RenderFrame) {
        for object in self.objects.values() {
            object.draw_debug(frame);
        }
    }

    /// Id of the object whose hit region is nearest to the pointer.
    #[must_use]
    pub fn closest_at(&self, x: f64, y: f64) -> Option<&str> {
        self.objects
            .iter()
            .rev()
            .filter_map(|(id, object)| {
                object
                    .min_dist(x, y)
                    .map(|distance| (OrderedFloat(distance), id.as_str()))
            })
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, id)| id)
    }

    /// Starts a drag when the pointer lands on a handle. Control points of
    /// any object take precedence over extra points.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.interaction.on_pointer_move(x, y);
        let target = self
            .objects
            .iter()
            .rev()
            .find_map(|(id, object)| {
                object.control_point(x, y).map(|index| DragTarget::ControlPoint {
                    object_id: id.clone(),
                    index,
                })
            })
            .or_else(|| {
                self.objects.iter().rev().find_map(|(id, object)| {
                    object.extra_point(x, y).map(|index| DragTarget::ExtraPoint {
                        object_id: id.clone(),
                        index,
                    })
                })
            });

        match target {
            Some(target) => {
                debug!(?target, "drag started");
                self.interaction.start_drag(target);
                true
            }
            None => false,
        }
    }

    /// Moves the dragged handle, or updates the hovered object.
    pub fn pointer_move(&mut self, x: f64, y: f64, chart: &dyn ChartCoordinates) {
        self.interaction.on_pointer_move(x, y);
        let dragging = match self.interaction.mode() {
            InteractionMode::Dragging(target) => Some(target.clone()),
            InteractionMode::Idle => None,
        };
        let Some(target) = dragging else {
            let hovered = self.closest_at(x, y).map(str::to_owned);
            self.interaction.set_hovered(hovered);
            return;
        };

        match target {
            DragTarget::ControlPoint { object_id, index } => {
                if let Some(object) = self.objects.get_mut(&object_id) {
                    object.move_control_point(index, x, y, chart);
                    object.prepare(chart);
                }
            }
            DragTarget::ExtraPoint { object_id, index } => {
                if let Some(object) = self.objects.get_mut(&object_id) {
                    object.move_extra_point(index, x, y, chart);
                    object.prepare(chart);
                }
            }
        }
    }

    pub fn pointer_up(&mut self) -> Option<DragTarget> {
        let target = self.interaction.end_drag();
        if let Some(target) = &target {
            debug!(?target, "drag finished");
        }
        target
    }

    /// Keyboard nudge of one control point; re-prepares on success.
    pub fn nudge(
        &mut self,
        id: &str,
        index: usize,
        direction: NudgeDirection,
        now: Instant,
        chart: &dyn ChartCoordinates,
    ) -> bool {
        let Some(object) = self.objects.get_mut(id) else {
            return false;
        };
        let applied = object.nudge_control_point(index, direction, now);
        if applied {
            object.prepare(chart);
        } else {
            trace!(id, index, "nudge rejected");
        }
        applied
    }

    /// Runs alert checks on every object; returns how many fired.
    pub fn check_alerts(&mut self, market: &MarketSnapshot, sink: &mut dyn AlertSink) -> usize {
        self.objects
            .values_mut()
            .map(|object| object.check_alert(market, sink))
            .filter(|fired| *fired)
            .count()
    }

    pub fn apply_theme(&mut self, theme: &Theme) {
        for object in self.objects.values_mut() {
            object.apply_theme(theme);
        }
    }

    fn dragged_id(&self) -> Option<&str> {
        match self.interaction.mode() {
            InteractionMode::Dragging(
                DragTarget::ControlPoint { object_id, .. } | DragTarget::ExtraPoint { object_id, .. },
            ) => Some(object_id.as_str()),
            InteractionMode::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectRegistry;
    use crate::core::{Rect, Viewport};
    use crate::interaction::DragTarget;
    use crate::objects::{Alert, ChartObject, ChartPoint, ChartView, PriceNote};
    use crate::render::RenderFrame;

    fn view() -> ChartView {
        ChartView::new(Rect::new(0.0, 0.0, 800.0, 400.0), (0.0, 100.0), (90.0, 110.0), 0.25)
            .expect("view")
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut registry = ObjectRegistry::new();
        registry.insert(Box::new(Alert::new("a", 100.0))).expect("first insert");
        assert!(registry.insert(Box::new(Alert::new("a", 101.0))).is_err());
        assert!(registry.insert(Box::new(Alert::new("", 101.0))).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn closest_object_wins() {
        let chart = view();
        let mut registry = ObjectRegistry::new();
        registry.insert(Box::new(Alert::new("near", 100.0))).expect("insert");
        registry.insert(Box::new(Alert::new("far", 100.5))).expect("insert");
        registry.prepare_all(&chart);

        // 100.0 -> y 200, 100.5 -> y 190; both hitboxes miss at y 197
        assert_eq!(registry.closest_at(100.0, 201.0), Some("near"));
        assert_eq!(registry.closest_at(100.0, 191.0), Some("far"));
        assert_eq!(registry.closest_at(100.0, 300.0), None);
    }

    #[test]
    fn dragging_control_point_moves_object() {
        let chart = view();
        let mut registry = ObjectRegistry::new();
        registry.insert(Box::new(Alert::new("a", 100.0))).expect("insert");
        registry.prepare_all(&chart);

        assert!(registry.pointer_down(400.0, 200.0));
        registry.pointer_move(400.0, 100.0, &chart);
        let target = registry.pointer_up();
        assert_eq!(
            target,
            Some(DragTarget::ControlPoint {
                object_id: "a".to_owned(),
                index: 0
            })
        );

        let points = registry.get("a").expect("alert").control_points();
        assert_eq!(points[0].y, 100.0);
    }

    #[test]
    fn handles_drawn_only_for_hovered_object() {
        let chart = view();
        let mut registry = ObjectRegistry::new();
        registry
            .insert(Box::new(PriceNote::new("n", ChartPoint::new(50.0, 100.0), "note")))
            .expect("insert");
        registry.prepare_all(&chart);

        let mut idle = RenderFrame::new(Viewport::new(800, 400));
        registry.draw_all(&mut idle);
        registry.pointer_move(400.0, 200.0, &chart);
        assert_eq!(registry.interaction().hovered(), Some("n"));
        let mut hovered = RenderFrame::new(Viewport::new(800, 400));
        registry.draw_all(&mut hovered);
        assert_eq!(hovered.rects.len(), idle.rects.len() + 2);
    }
}
