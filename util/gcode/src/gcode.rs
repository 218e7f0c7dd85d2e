use crate::coordinates::PartialPosition;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoordinateMode { Absolute } // or Incremental - unsupported
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MotionMode { Controlled, Rapid }
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct ModalUpdates {
    pub feedrate: Option<f64>,
    pub motion_mode: Option<MotionMode>,
    pub coordinate_mode: Option<CoordinateMode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearMove(pub PartialPosition);

#[derive(Debug, Clone, PartialEq)]
pub enum CommandContent {
    LinearMove(LinearMove),
}
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub modal_updates: ModalUpdates,
    pub command: Option<CommandContent>,
}

impl Line {
    /// A bare modal switch to absolute coordinates (`G90`).
    pub fn absolute_mode() -> Self {
        Line {
            modal_updates: ModalUpdates {
                coordinate_mode: Some(CoordinateMode::Absolute),
                ..Default::default()
            },
            command: None,
        }
    }
    pub fn rapid(target: PartialPosition, feedrate: f64) -> Self {
        Self::linear(MotionMode::Rapid, target, feedrate)
    }
    pub fn linear(motion_mode: MotionMode, target: PartialPosition, feedrate: f64) -> Self {
        Line {
            modal_updates: ModalUpdates {
                feedrate: Some(feedrate),
                motion_mode: Some(motion_mode),
                coordinate_mode: None,
            },
            command: Some(CommandContent::LinearMove(LinearMove(target))),
        }
    }
    pub fn target(&self) -> Option<&PartialPosition> {
        match &self.command {
            Some(CommandContent::LinearMove(LinearMove(target))) => Some(target),
            None => None,
        }
    }
}
