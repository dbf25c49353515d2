use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// A `percent_x` by `percent_y` rectangle centred in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// A rectangle of at most `width` by `height` cells in one corner of `area`.
pub fn corner_rect(area: Rect, width: u16, height: u16, right: bool, bottom: bool) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: if right {
            area.x + area.width - width
        } else {
            area.x
        },
        y: if bottom {
            area.y + area.height - height
        } else {
            area.y
        },
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centred() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn corner_rect_stays_inside() {
        let area = Rect::new(10, 5, 30, 10);
        assert_eq!(corner_rect(area, 12, 4, true, true), Rect::new(28, 11, 12, 4));
        assert_eq!(corner_rect(area, 50, 20, false, false), area);
    }
}
