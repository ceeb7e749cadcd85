//! Drawn shapes and their human-readable descriptions.

use serde::{Deserialize, Serialize};

/// A point in image space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn describe(&self) -> String {
        format!("({:.2}, {:.2})", self.x, self.y)
    }
}

/// A region of interest drawn on the image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DrawnShape {
    /// Corners in order south-west, north-west, north-east, south-east
    Rectangle { corners: [Point; 4] },
    Polygon { vertices: Vec<Point> },
    Circle { center: Point, radius: f64 },
    Marker { position: Point },
}

impl DrawnShape {
    /// Axis-aligned rectangle spanned by two opposite corners
    pub fn rectangle(a: Point, b: Point) -> Self {
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        DrawnShape::Rectangle {
            corners: [
                Point::new(min_x, min_y),
                Point::new(min_x, max_y),
                Point::new(max_x, max_y),
                Point::new(max_x, min_y),
            ],
        }
    }

    pub fn polygon(vertices: Vec<Point>) -> Self {
        DrawnShape::Polygon { vertices }
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        DrawnShape::Circle { center, radius }
    }

    pub fn marker(position: Point) -> Self {
        DrawnShape::Marker { position }
    }

    /// Layer type tag
    pub fn kind(&self) -> &'static str {
        match self {
            DrawnShape::Rectangle { .. } => "rectangle",
            DrawnShape::Polygon { .. } => "polygon",
            DrawnShape::Circle { .. } => "circle",
            DrawnShape::Marker { .. } => "marker",
        }
    }

    /// Vertex ring for rectangles and polygons
    pub fn vertices(&self) -> &[Point] {
        match self {
            DrawnShape::Rectangle { corners } => corners,
            DrawnShape::Polygon { vertices } => vertices,
            _ => &[],
        }
    }

    /// Description with every coordinate rounded to two decimals
    pub fn describe(&self) -> String {
        match self {
            DrawnShape::Rectangle { .. } | DrawnShape::Polygon { .. } => format!(
                "{} with coords: {}",
                self.kind(),
                self.vertices()
                    .iter()
                    .map(Point::describe)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            DrawnShape::Circle { center, radius } => format!(
                "circle center={}, radius={:.2}px",
                center.describe(),
                radius
            ),
            DrawnShape::Marker { position } => format!("marker at {}", position.describe()),
        }
    }
}

/// Synthetic user message announcing a new selection
pub fn selection_message(shape: &DrawnShape) -> String {
    format!("Selected {}", shape.describe())
}

/// Synthetic prompt sent to the chat backend for a new selection
pub fn selection_prompt(shape: &DrawnShape) -> String {
    format!(
        "I see you drew a {}. This might highlight important tissue features.",
        shape.describe()
    )
}

/// Identifier of a shape in a [`ShapeCollection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(u64);

/// Shapes kept on the overlay after drawing
#[derive(Debug, Clone, Default)]
pub struct ShapeCollection {
    shapes: Vec<(ShapeId, DrawnShape)>,
    next_id: u64,
}

impl ShapeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, shape: DrawnShape) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.shapes.push((id, shape));
        id
    }

    pub fn remove(&mut self, id: ShapeId) -> Option<DrawnShape> {
        let idx = self.shapes.iter().position(|(sid, _)| *sid == id)?;
        Some(self.shapes.remove(idx).1)
    }

    pub fn get(&self, id: ShapeId) -> Option<&DrawnShape> {
        self.shapes.iter().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &DrawnShape)> {
        self.shapes.iter().map(|(id, s)| (*id, s))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_description_has_all_corners() {
        let rect = DrawnShape::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert_eq!(
            rect.describe(),
            "rectangle with coords: (0.00, 0.00), (0.00, 10.00), (10.00, 10.00), (10.00, 0.00)"
        );
    }

    #[test]
    fn test_rectangle_corner_order_ignores_drag_direction() {
        let a = DrawnShape::rectangle(Point::new(10.0, 10.0), Point::new(0.0, 0.0));
        let b = DrawnShape::rectangle(Point::new(0.0, 10.0), Point::new(10.0, 0.0));
        let expected = DrawnShape::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert_eq!(a, expected);
        assert_eq!(b, expected);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        let marker = DrawnShape::marker(Point::new(12.3456, 7.0));
        assert_eq!(marker.describe(), "marker at (12.35, 7.00)");

        let circle = DrawnShape::circle(Point::new(100.0, 250.5), 33.333);
        assert_eq!(
            circle.describe(),
            "circle center=(100.00, 250.50), radius=33.33px"
        );
    }

    #[test]
    fn test_polygon_description() {
        let poly = DrawnShape::polygon(vec![
            Point::new(1.0, 1.0),
            Point::new(5.5, 1.0),
            Point::new(3.0, 4.25),
        ]);
        assert_eq!(
            poly.describe(),
            "polygon with coords: (1.00, 1.00), (5.50, 1.00), (3.00, 4.25)"
        );
    }

    #[test]
    fn test_synthetic_messages() {
        let marker = DrawnShape::marker(Point::new(1.0, 2.0));
        assert_eq!(selection_message(&marker), "Selected marker at (1.00, 2.00)");
        assert_eq!(
            selection_prompt(&marker),
            "I see you drew a marker at (1.00, 2.00). This might highlight important tissue features."
        );
    }

    #[test]
    fn test_collection_add_remove() {
        let mut shapes = ShapeCollection::new();
        let a = shapes.add(DrawnShape::marker(Point::new(0.0, 0.0)));
        let b = shapes.add(DrawnShape::marker(Point::new(1.0, 1.0)));
        assert_ne!(a, b);
        assert_eq!(shapes.len(), 2);

        assert!(shapes.remove(a).is_some());
        assert!(shapes.remove(a).is_none());
        assert!(shapes.get(b).is_some());

        // Ids are never reused
        let c = shapes.add(DrawnShape::marker(Point::new(2.0, 2.0)));
        assert_ne!(c, a);

        shapes.clear();
        assert!(shapes.is_empty());
    }
}
