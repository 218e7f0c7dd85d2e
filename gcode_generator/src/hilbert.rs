use crate::{heading::{Rotation, Sign}, turtle::{Point, Turtle}};

/// Number of forward steps in a curve of the given order.
pub fn step_count(depth: u32) -> u64 {
    4u64.pow(depth) - 1
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Turn { Right, Left }
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Action {
    Turn(Turn),
    /// Descend one level; `true` flips the sign of the angle.
    Descend(bool),
    Forward,
}

// One level of the construction: four sub-curves joined by three steps.
const LEVEL_PLAN: [Action; 11] = [
    Action::Turn(Turn::Right),
    Action::Descend(true),
    Action::Forward,
    Action::Turn(Turn::Left),
    Action::Descend(false),
    Action::Forward,
    Action::Descend(false),
    Action::Turn(Turn::Left),
    Action::Forward,
    Action::Descend(true),
    Action::Turn(Turn::Right),
];

impl Turn {
    // A right turn is clockwise for a positive angle; a negative angle mirrors both.
    fn rotation(self, sign: Sign) -> Rotation {
        match self {
            Turn::Right => sign.apply(Rotation::Clockwise),
            Turn::Left => sign.apply(Rotation::Counterclockwise),
        }
    }
}

#[derive(Debug, Clone)]
struct Frame {
    level: u32,
    sign: Sign,
    stage: usize,
}

/// Lazily walks a Hilbert curve, yielding the turtle position after every
/// forward step. The start position itself is not yielded.
#[derive(Debug, Clone)]
pub struct HilbertSteps {
    turtle: Turtle,
    stack: Vec<Frame>,
    remaining: u64,
}
impl HilbertSteps {
    pub fn new(depth: u32, sign: Sign, turtle: Turtle) -> Self {
        let mut stack = Vec::with_capacity(depth as usize);
        if depth > 0 {
            stack.push(Frame { level: depth, sign, stage: 0 });
        }
        HilbertSteps {
            turtle,
            stack,
            remaining: step_count(depth),
        }
    }
    pub fn turtle(&self) -> &Turtle {
        &self.turtle
    }
}
impl Iterator for HilbertSteps {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(action) = LEVEL_PLAN.get(frame.stage).copied() else {
                self.stack.pop();
                continue;
            };
            frame.stage += 1;
            let (level, sign) = (frame.level, frame.sign);
            match action {
                Action::Turn(turn) => self.turtle.turn(turn.rotation(sign)),
                Action::Descend(flip) => {
                    if level > 1 {
                        self.stack.push(Frame {
                            level: level - 1,
                            sign: if flip { -sign } else { sign },
                            stage: 0,
                        });
                    }
                }
                Action::Forward => {
                    self.remaining -= 1;
                    return Some(self.turtle.forward());
                }
            }
        }
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use itertools::Itertools;

    use crate::heading::Heading;

    use super::*;

    fn reference_turtle() -> Turtle {
        Turtle::new(Point::new(3, 0), Heading::Right, 1)
    }

    // Straightforward recursive form, used to cross-check the iterator.
    fn recursive(level: u32, sign: Sign, turtle: &mut Turtle, out: &mut Vec<Point>) {
        if level == 0 {
            return;
        }
        turtle.turn(Turn::Right.rotation(sign));
        recursive(level - 1, -sign, turtle, out);
        out.push(turtle.forward());
        turtle.turn(Turn::Left.rotation(sign));
        recursive(level - 1, sign, turtle, out);
        out.push(turtle.forward());
        recursive(level - 1, sign, turtle, out);
        turtle.turn(Turn::Left.rotation(sign));
        out.push(turtle.forward());
        recursive(level - 1, -sign, turtle, out);
        turtle.turn(Turn::Right.rotation(sign));
    }

    #[test]
    fn depth_zero_is_empty() {
        assert_eq!(HilbertSteps::new(0, Sign::Positive, reference_turtle()).count(), 0);
        assert_eq!(step_count(0), 0);
    }
    #[test]
    fn depth_one() {
        let points = HilbertSteps::new(1, Sign::Positive, reference_turtle()).collect_vec();
        assert_eq!(points, vec![Point::new(3, -1), Point::new(4, -1), Point::new(4, 0)]);
    }
    #[test]
    fn depth_two() {
        let points = HilbertSteps::new(2, Sign::Positive, reference_turtle()).collect_vec();
        let expected = [
            (4, 0), (4, -1), (3, -1), (3, -2), (3, -3), (4, -3), (4, -2), (5, -2),
            (5, -3), (6, -3), (6, -2), (6, -1), (5, -1), (5, 0), (6, 0),
        ].into_iter().map(|(x, y)| Point::new(x, y)).collect_vec();
        assert_eq!(points, expected);
    }
    #[test]
    fn step_counts() {
        for depth in 0..=6 {
            let steps = HilbertSteps::new(depth, Sign::Positive, reference_turtle());
            assert_eq!(steps.size_hint(), (step_count(depth) as usize, Some(step_count(depth) as usize)));
            assert_eq!(steps.count() as u64, 4u64.pow(depth) - 1);
        }
    }
    #[test]
    fn matches_recursive_construction() {
        for depth in 0..=5 {
            for sign in [Sign::Positive, Sign::Negative] {
                let mut turtle = reference_turtle();
                let mut expected = Vec::new();
                recursive(depth, sign, &mut turtle, &mut expected);
                let mut steps = HilbertSteps::new(depth, sign, reference_turtle());
                assert_eq!(steps.by_ref().collect_vec(), expected);
                assert_eq!(steps.turtle().heading(), turtle.heading());
            }
        }
    }
    #[test]
    fn consecutive_points_are_unit_steps() {
        let start = reference_turtle().position();
        let points = std::iter::once(start)
            .chain(HilbertSteps::new(5, Sign::Positive, reference_turtle()))
            .collect_vec();
        for (a, b) in points.iter().tuple_windows() {
            assert_eq!(a.manhattan_distance(b), 1, "{:?} -> {:?}", a, b);
        }
    }
    #[test]
    fn fills_the_grid() {
        for depth in 1..=5 {
            let start = reference_turtle().position();
            let points: HashSet<Point> = std::iter::once(start)
                .chain(HilbertSteps::new(depth, Sign::Positive, reference_turtle()))
                .collect();
            let side = 1i64 << depth;
            assert_eq!(points.len() as i64, side * side);
            let (min_x, max_x) = points.iter().map(|p| p.x).minmax().into_option().unwrap();
            let (min_y, max_y) = points.iter().map(|p| p.y).minmax().into_option().unwrap();
            assert_eq!(max_x - min_x + 1, side);
            assert_eq!(max_y - min_y + 1, side);
        }
    }
    #[test]
    fn negative_angle_mirrors_across_start_row() {
        let positive = HilbertSteps::new(4, Sign::Positive, reference_turtle()).collect_vec();
        let negative = HilbertSteps::new(4, Sign::Negative, reference_turtle()).collect_vec();
        let mirrored = positive.iter().map(|p| Point::new(p.x, -p.y)).collect_vec();
        assert_eq!(negative, mirrored);
    }
    #[test]
    fn heading_is_restored() {
        let mut steps = HilbertSteps::new(3, Sign::Positive, reference_turtle());
        steps.by_ref().for_each(drop);
        assert_eq!(steps.turtle().heading(), Heading::Right);
    }
}
