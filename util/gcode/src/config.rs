#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WordLayout {
    /// Every word separated by a space: `G0 X1.000 Y2.000 F10.000`
    Spaced,
    /// Motion and axis words glued together, feed separated: `G0X1Y2 F10`
    Compact,
}
#[derive(Clone, Debug)]
pub struct MachineConfiguration {
    pub axis_characters: Vec<char>,
    pub precision: u8,
    pub layout: WordLayout,
}
impl MachineConfiguration {
    pub fn standard_3_axis() -> Self {
        Self {
            axis_characters: vec!['X', 'Y', 'Z'],
            precision: 3,
            layout: WordLayout::Spaced,
        }
    }
    /// The dialect accepted by small pen-plotter style controllers; integer
    /// coordinates only.
    pub fn compact_integer() -> Self {
        Self {
            axis_characters: vec!['X', 'Y', 'Z'],
            precision: 0,
            layout: WordLayout::Compact,
        }
    }
}
