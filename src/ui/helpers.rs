use anyhow::Error;
use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Uppercase the first character, leaving the rest as written.
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A `percent_x` by `percent_y` share of `area`, centered in it. Used for
/// modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [column] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(column);
    popup
}

/// Terminal position for a text cursor `column` cells right and `row` lines
/// down from the top-left of `inner`, kept inside `inner`.
pub(crate) fn cursor_in(inner: Rect, column: usize, row: usize) -> (u16, u16) {
    let clamp = |offset: usize, extent: u16| {
        u16::try_from(offset)
            .unwrap_or(u16::MAX)
            .min(extent.saturating_sub(1))
    };
    (
        inner.x.saturating_add(clamp(column, inner.width)),
        inner.y.saturating_add(clamp(row, inner.height)),
    )
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn capitalize_handles_cyrillic_and_empty() {
        assert_eq!(capitalize("кот, кошка"), "Кот, кошка");
        assert_eq!(capitalize("bridge"), "Bridge");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn surface_error_picks_root_cause() {
        let err = anyhow!("disk full").context("failed to save dictionary");
        assert_eq!(surface_error(&err), "disk full");
    }

    #[test]
    fn cursor_stays_inside_its_box() {
        let inner = Rect::new(5, 2, 20, 3);

        assert_eq!(cursor_in(inner, 4, 1), (9, 3));
        assert_eq!(cursor_in(inner, 70_000, 0), (24, 2));
        assert_eq!(cursor_in(inner, 0, usize::MAX), (5, 4));
        assert_eq!(cursor_in(Rect::new(u16::MAX - 1, 0, 0, 0), 10, 10), (u16::MAX - 1, 0));
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);

        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 15);
    }
}
