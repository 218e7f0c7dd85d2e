use crate::{gcode::{Line, LinearMove, CommandContent, ModalUpdates, MotionMode, CoordinateMode}, config::MachineConfiguration, coordinates::PartialPosition};

struct Item<'a> {
    head: char,
    value: &'a str
}
// input should be trimmed.
fn parse_item<'a>(input: &'a str) -> Option<(&'a str, Item<'a>)> {
    let head = input.chars().next().filter(|c| c.is_ascii_alphabetic())?;
    let input = &input[1..];
    // Words may be glued together ("G0X3Y-1"), so a value ends at the next letter.
    let last = input.find(|v: char| !v.is_ascii_digit() && v != '.' && v != '-' && v != '+').unwrap_or(input.len());
    if last == 0 {
        return None;
    }
    Some((
        &input[last..],
        Item {
            head: head.to_ascii_uppercase(),
            value: &input[..last],
        }
    ))
}
struct ItemSet<'a>(Vec<Item<'a>>);
impl<'a> ItemSet<'a> {
    pub fn pop_map<T>(&mut self, predicate: impl Fn(&Item<'a>) -> Option<T>) -> Option<T> {
        let (index, result) = self.0.iter().enumerate().find_map(|(index, value)| predicate(value).map(|result| (index, result)))?;
        self.0.remove(index);
        Some(result)
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn parse_to_items<'a>(mut input: &'a str) -> Option<ItemSet<'a>> {
    let mut items = ItemSet(Vec::new());
    loop {
        input = input.trim_start();
        if input.is_empty() {
            return Some(items)
        }
        let (new_input, item) = parse_item(input)?;
        items.0.push(item);
        input = new_input;
    }
}
fn parse_item_set<'a>(config: &MachineConfiguration, mut item_set: ItemSet<'a>) -> Option<Line> {
    let axis_words = PartialPosition(config.axis_characters.iter().map(|c| item_set.pop_map(|item|
        if item.head == *c {
            item.value.parse::<f64>().ok()
        } else {
            None
        }
    )).collect());
    let command = if axis_words.is_empty() {
        None
    } else {
        Some(CommandContent::LinearMove(LinearMove(axis_words)))
    };
    let modal_updates = ModalUpdates {
        feedrate: item_set.pop_map(|item| if item.head == 'F' {
            item.value.parse::<f64>().ok()
        } else {
            None
        }),
        motion_mode: item_set.pop_map(|item| if item.head == 'G' {
            match item.value {
                "0" | "00" => Some(MotionMode::Rapid),
                "1" | "01" => Some(MotionMode::Controlled),
                _ => None,
            }
        } else {
            None
        }),
        coordinate_mode: item_set.pop_map(|item| if item.head == 'G' {
            match item.value {
                "90" => Some(CoordinateMode::Absolute),
                _ => None,
            }
        } else {
            None
        }),
    };
    if !item_set.is_empty() {
        return None;
    }
    Some(Line {
        modal_updates,
        command,
    })
}
/// Parses one line in either word layout; `None` if any word is not understood.
pub fn parse_line(config: &MachineConfiguration, input: &str) -> Option<Line> {
    parse_to_items(input).and_then(|item_set| parse_item_set(config, item_set))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_compact() {
        let config = MachineConfiguration::compact_integer();
        assert_eq!(
            parse_line(&config, "G0X3Y-1 F10"),
            Some(Line::rapid(PartialPosition::xy(3.0, -1.0), 10.0))
        );
    }
    #[test]
    fn test_spaced() {
        let config = MachineConfiguration::standard_3_axis();
        let input = "G90 G1 X1.000 Y2.000 Z3.000 F1000.000";
        assert_eq!(
            parse_line(&config, input),
            Some(Line {
                modal_updates: ModalUpdates {
                    feedrate: Some(1000.0),
                    motion_mode: Some(MotionMode::Controlled),
                    coordinate_mode: Some(CoordinateMode::Absolute),
                },
                command: Some(CommandContent::LinearMove(LinearMove(PartialPosition(vec![Some(1.0), Some(2.0), Some(3.0)])))),
            })
        );
    }
    #[test]
    fn test_modal_only() {
        let config = MachineConfiguration::compact_integer();
        assert_eq!(parse_line(&config, "G90"), Some(Line::absolute_mode()));
    }
    #[test]
    fn test_pen_axis() {
        let config = MachineConfiguration::compact_integer();
        assert_eq!(
            parse_line(&config, "G0Z5 F100"),
            Some(Line::rapid(PartialPosition::z(5.0), 100.0))
        );
    }
    #[test]
    fn test_rejects_unknown_words() {
        let config = MachineConfiguration::compact_integer();
        assert_eq!(parse_line(&config, "G2X1Y1I1"), None);
        assert_eq!(parse_line(&config, "M3"), None);
        assert_eq!(parse_line(&config, "G0X"), None);
    }
}
