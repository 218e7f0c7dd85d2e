use crate::heading::{Heading, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}
impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i64, y: i64) -> Self {
        Point { x, y }
    }
    pub fn manhattan_distance(&self, other: &Point) -> u64 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Cursor state of the traversal: where the pen is and which way it faces.
#[derive(Debug, Clone)]
pub struct Turtle {
    position: Point,
    heading: Heading,
    step: i64,
}
impl Turtle {
    pub fn new(position: Point, heading: Heading, step: i64) -> Self {
        Turtle { position, heading, step }
    }
    pub fn position(&self) -> Point {
        self.position
    }
    pub fn heading(&self) -> Heading {
        self.heading
    }
    pub fn turn(&mut self, rotation: Rotation) {
        self.heading = self.heading.turned(rotation);
    }
    /// Moves one step along the current heading and returns the new position.
    pub fn forward(&mut self) -> Point {
        let (dx, dy) = self.heading.unit();
        self.position = Point::new(
            self.position.x + dx * self.step,
            self.position.y + dy * self.step,
        );
        self.position
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn forward_follows_heading() {
        let mut turtle = Turtle::new(Point::new(3, 0), Heading::Right, 1);
        assert_eq!(turtle.forward(), Point::new(4, 0));
        turtle.turn(Rotation::Clockwise);
        assert_eq!(turtle.heading(), Heading::Down);
        assert_eq!(turtle.forward(), Point::new(4, -1));
        turtle.turn(Rotation::Clockwise);
        assert_eq!(turtle.forward(), Point::new(3, -1));
        turtle.turn(Rotation::Clockwise);
        assert_eq!(turtle.forward(), Point::new(3, 0));
    }
    #[test]
    fn step_scales_motion() {
        let mut turtle = Turtle::new(Point::ORIGIN, Heading::Up, 5);
        assert_eq!(turtle.forward(), Point::new(0, 5));
        assert_eq!(turtle.position().manhattan_distance(&Point::ORIGIN), 5);
    }
}
