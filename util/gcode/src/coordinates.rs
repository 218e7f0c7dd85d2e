/// Target of a move; `None` leaves that axis where it is.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialPosition(pub Vec<Option<f64>>);

impl PartialPosition {
    pub fn xy(x: f64, y: f64) -> Self {
        PartialPosition(vec![Some(x), Some(y), None])
    }
    pub fn z(z: f64) -> Self {
        PartialPosition(vec![None, None, Some(z)])
    }
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}
