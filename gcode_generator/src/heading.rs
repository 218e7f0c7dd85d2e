use std::ops::Neg;

/// Sign of the turning angle handed to each recursion level.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Sign { Positive, Negative }
impl Sign {
    pub fn of(angle: i32) -> Option<Sign> {
        match angle {
            0 => None,
            a if a > 0 => Some(Sign::Positive),
            _ => Some(Sign::Negative),
        }
    }
    pub fn apply<T: Neg<Output = T>>(self, value: T) -> T {
        match self {
            Sign::Positive => value,
            Sign::Negative => -value,
        }
    }
}
impl Neg for Sign {
    type Output = Sign;

    fn neg(self) -> Self::Output {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation { Clockwise, Counterclockwise }
impl Rotation {
    fn steps(self) -> u8 {
        match self {
            Rotation::Clockwise => 1,
            Rotation::Counterclockwise => 3,
        }
    }
}
impl Neg for Rotation {
    type Output = Rotation;
    fn neg(self) -> Self::Output {
        match self {
            Rotation::Clockwise => Rotation::Counterclockwise,
            Rotation::Counterclockwise => Rotation::Clockwise,
        }
    }
}

/// Compass heading, numbered clockwise from `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Heading {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}
impl Heading {
    pub fn from_index(index: u8) -> Heading {
        match index % 4 {
            0 => Heading::Up,
            1 => Heading::Right,
            2 => Heading::Down,
            _ => Heading::Left,
        }
    }
    pub fn index(self) -> u8 {
        self as u8
    }
    pub fn turned(self, rotation: Rotation) -> Heading {
        Heading::from_index(self.index() + rotation.steps())
    }
    /// Unit vector of travel; `Up` is +y.
    pub fn unit(self) -> (i64, i64) {
        match self {
            Heading::Up => (0, 1),
            Heading::Right => (1, 0),
            Heading::Down => (0, -1),
            Heading::Left => (-1, 0),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clockwise_cycles_through_compass() {
        let mut heading = Heading::Up;
        let mut seen = Vec::new();
        for _ in 0..4 {
            heading = heading.turned(Rotation::Clockwise);
            seen.push(heading);
        }
        assert_eq!(seen, vec![Heading::Right, Heading::Down, Heading::Left, Heading::Up]);
    }
    #[test]
    fn counterclockwise_undoes_clockwise() {
        for index in 0..4 {
            let heading = Heading::from_index(index);
            assert_eq!(heading.turned(Rotation::Clockwise).turned(Rotation::Counterclockwise), heading);
        }
        assert_eq!(Heading::Up.turned(Rotation::Counterclockwise), Heading::Left);
    }
    #[test]
    fn sign_of_angle() {
        assert_eq!(Sign::of(90), Some(Sign::Positive));
        assert_eq!(Sign::of(-90), Some(Sign::Negative));
        assert_eq!(Sign::of(0), None);
        assert_eq!(Sign::Negative.apply(Rotation::Clockwise), Rotation::Counterclockwise);
        assert_eq!(-Sign::Negative, Sign::Positive);
    }
}
