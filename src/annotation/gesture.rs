//! Pointer gestures for the drawing tools.
//!
//! Input points are already in image space; the caller converts through
//! the [`Viewport`](super::Viewport) first.

use super::shape::{DrawnShape, Point};
use serde::{Deserialize, Serialize};

/// Active drawing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawTool {
    #[default]
    Rectangle,
    Polygon,
    Circle,
    Marker,
}

impl DrawTool {
    pub const ALL: [DrawTool; 4] = [
        DrawTool::Rectangle,
        DrawTool::Polygon,
        DrawTool::Circle,
        DrawTool::Marker,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DrawTool::Rectangle => "Rectangle",
            DrawTool::Polygon => "Polygon",
            DrawTool::Circle => "Circle",
            DrawTool::Marker => "Marker",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum GestureState {
    Idle,
    Dragging { start: Point, current: Point },
    Tracing { vertices: Vec<Point>, cursor: Option<Point> },
}

/// In-progress shape for one tool
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    tool: DrawTool,
    state: GestureState,
}

impl Default for Gesture {
    fn default() -> Self {
        Self::new(DrawTool::default())
    }
}

impl Gesture {
    pub fn new(tool: DrawTool) -> Self {
        Self {
            tool,
            state: GestureState::Idle,
        }
    }

    pub fn tool(&self) -> DrawTool {
        self.tool
    }

    /// Switch tools, dropping anything half drawn
    pub fn set_tool(&mut self, tool: DrawTool) {
        self.tool = tool;
        self.cancel();
    }

    /// True while a shape is being drawn
    pub fn is_active(&self) -> bool {
        self.state != GestureState::Idle
    }

    /// Pointer down.
    ///
    /// Markers complete immediately. A polygon click within
    /// `close_tolerance` of its first vertex closes the polygon once it
    /// has at least three vertices.
    pub fn press(&mut self, p: Point, close_tolerance: f64) -> Option<DrawnShape> {
        match self.tool {
            DrawTool::Marker => {
                self.state = GestureState::Idle;
                Some(DrawnShape::marker(p))
            }
            DrawTool::Rectangle | DrawTool::Circle => {
                self.state = GestureState::Dragging {
                    start: p,
                    current: p,
                };
                None
            }
            DrawTool::Polygon => match &mut self.state {
                GestureState::Tracing { vertices, cursor } => {
                    let closes = vertices.len() >= 3
                        && vertices
                            .first()
                            .map_or(false, |first| first.distance_to(&p) <= close_tolerance);
                    if closes {
                        return self.finish();
                    }
                    vertices.push(p);
                    *cursor = Some(p);
                    None
                }
                _ => {
                    self.state = GestureState::Tracing {
                        vertices: vec![p],
                        cursor: Some(p),
                    };
                    None
                }
            },
        }
    }

    /// Pointer move
    pub fn move_to(&mut self, p: Point) {
        match &mut self.state {
            GestureState::Dragging { current, .. } => *current = p,
            GestureState::Tracing { cursor, .. } => *cursor = Some(p),
            GestureState::Idle => {}
        }
    }

    /// Pointer up. Finishes rectangles and circles; zero-size drags yield nothing.
    pub fn release(&mut self, p: Point) -> Option<DrawnShape> {
        let GestureState::Dragging { start, .. } = self.state else {
            return None;
        };
        self.state = GestureState::Idle;

        match self.tool {
            DrawTool::Rectangle if start.x != p.x && start.y != p.y => {
                Some(DrawnShape::rectangle(start, p))
            }
            DrawTool::Circle => {
                let radius = start.distance_to(&p);
                (radius > 0.0).then(|| DrawnShape::circle(start, radius))
            }
            _ => None,
        }
    }

    /// Close the polygon being traced. Fewer than three vertices are discarded.
    pub fn finish(&mut self) -> Option<DrawnShape> {
        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Tracing { vertices, .. } if vertices.len() >= 3 => {
                Some(DrawnShape::polygon(vertices))
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Pointer left the surface. A drag is abandoned since its release will
    /// never arrive; placed polygon vertices are kept.
    pub fn pointer_left(&mut self) {
        if matches!(self.state, GestureState::Dragging { .. }) {
            self.state = GestureState::Idle;
        } else if let GestureState::Tracing { cursor, .. } = &mut self.state {
            *cursor = None;
        }
    }

    /// Shape to draw as rubber band while the gesture is in progress
    pub fn preview(&self) -> Option<DrawnShape> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Dragging { start, current } => Some(match self.tool {
                DrawTool::Circle => DrawnShape::circle(*start, start.distance_to(current)),
                _ => DrawnShape::rectangle(*start, *current),
            }),
            GestureState::Tracing { vertices, cursor } => {
                let mut points = vertices.clone();
                if let Some(c) = cursor {
                    if points.last() != Some(c) {
                        points.push(*c);
                    }
                }
                Some(DrawnShape::polygon(points))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_marker_is_single_click() {
        let mut g = Gesture::new(DrawTool::Marker);
        assert_eq!(g.press(p(3.0, 4.0), 5.0), Some(DrawnShape::marker(p(3.0, 4.0))));
        assert!(!g.is_active());
    }

    #[test]
    fn test_rectangle_drag() {
        let mut g = Gesture::new(DrawTool::Rectangle);
        assert_eq!(g.press(p(10.0, 10.0), 5.0), None);
        g.move_to(p(5.0, 20.0));
        assert_eq!(
            g.preview(),
            Some(DrawnShape::rectangle(p(10.0, 10.0), p(5.0, 20.0)))
        );
        let shape = g.release(p(0.0, 0.0)).unwrap();
        assert_eq!(shape, DrawnShape::rectangle(p(0.0, 0.0), p(10.0, 10.0)));
        assert!(g.preview().is_none());
    }

    #[test]
    fn test_degenerate_drags_are_dropped() {
        let mut g = Gesture::new(DrawTool::Rectangle);
        g.press(p(1.0, 1.0), 5.0);
        assert_eq!(g.release(p(1.0, 9.0)), None);

        g.set_tool(DrawTool::Circle);
        g.press(p(1.0, 1.0), 5.0);
        assert_eq!(g.release(p(1.0, 1.0)), None);
        assert!(!g.is_active());
    }

    #[test]
    fn test_circle_radius() {
        let mut g = Gesture::new(DrawTool::Circle);
        g.press(p(0.0, 0.0), 5.0);
        let shape = g.release(p(3.0, 4.0)).unwrap();
        assert_eq!(shape, DrawnShape::circle(p(0.0, 0.0), 5.0));
    }

    #[test]
    fn test_polygon_closes_near_first_vertex() {
        let mut g = Gesture::new(DrawTool::Polygon);
        assert_eq!(g.press(p(0.0, 0.0), 2.0), None);
        assert_eq!(g.press(p(10.0, 0.0), 2.0), None);
        // Too few vertices to close; becomes a vertex
        assert_eq!(g.press(p(1.0, 1.0), 2.0), None);
        assert_eq!(g.press(p(10.0, 10.0), 2.0), None);

        let shape = g.press(p(0.5, -0.5), 2.0).unwrap();
        assert_eq!(shape.vertices().len(), 4);
        assert_eq!(shape.vertices()[0], p(0.0, 0.0));
        assert!(!g.is_active());
    }

    #[test]
    fn test_polygon_explicit_finish() {
        let mut g = Gesture::new(DrawTool::Polygon);
        g.press(p(0.0, 0.0), 1.0);
        g.press(p(10.0, 0.0), 1.0);
        assert_eq!(g.finish(), None);
        assert!(!g.is_active());

        g.press(p(0.0, 0.0), 1.0);
        g.press(p(10.0, 0.0), 1.0);
        g.press(p(5.0, 8.0), 1.0);
        g.move_to(p(2.0, 2.0));
        assert_eq!(g.preview().unwrap().vertices().len(), 4);

        let shape = g.finish().unwrap();
        assert_eq!(shape.vertices().len(), 3);
    }

    #[test]
    fn test_switching_tool_cancels() {
        let mut g = Gesture::new(DrawTool::Polygon);
        g.press(p(0.0, 0.0), 1.0);
        g.set_tool(DrawTool::Rectangle);
        assert!(!g.is_active());
        assert_eq!(g.release(p(4.0, 4.0)), None);
    }

    #[test]
    fn test_leaving_surface_drops_drag_but_keeps_polygon() {
        let mut g = Gesture::new(DrawTool::Circle);
        g.press(p(0.0, 0.0), 5.0);
        g.move_to(p(3.0, 4.0));
        g.pointer_left();
        assert!(!g.is_active());
        assert_eq!(g.preview(), None);
        assert_eq!(g.release(p(6.0, 8.0)), None);

        let mut g = Gesture::new(DrawTool::Polygon);
        g.press(p(0.0, 0.0), 1.0);
        g.press(p(10.0, 0.0), 1.0);
        g.pointer_left();
        assert!(g.is_active());
        g.press(p(10.0, 10.0), 1.0);
        assert_eq!(
            g.finish(),
            Some(DrawnShape::polygon(vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)]))
        );
    }
}
