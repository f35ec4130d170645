//! Grid tables that flow across pages.
//!
//! Rows are laid out one at a time: a row that doesn't fit below the cursor is
//! moved to a new page, and the header row is drawn again at the top of every
//! page the table continues on. A row taller than a whole page is split
//! between its lines.

use crate::colour::colours;
use crate::page::{Paint, Shape};
use crate::report::canvas::{Canvas, TextStyle};
use crate::report::mm;
use crate::units::Pt;

const HEADER_STYLE: TextStyle = TextStyle::bold(10.0, colours::WHITE);
const BODY_STYLE: TextStyle = TextStyle::regular(9.0, colours::BODY);
/// Rounding allowance when counting how many lines fit in a space
const LINE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub width: Pt,
}

impl Column {
    pub fn new<S: ToString>(header: S, width: Pt) -> Column {
        Column {
            header: header.to_string(),
            width,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    /// Space between a cell's border and its text
    pub padding: Pt,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Table {
        Table {
            columns,
            rows: Vec::new(),
            padding: mm(2.0),
        }
    }

    /// Add a row. Missing cells are left blank and extra cells are ignored.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn width(&self) -> Pt {
        self.columns.iter().map(|column| column.width).sum()
    }
}

/// A row after its cells have been wrapped
struct WrappedRow {
    cells: Vec<Vec<String>>,
}

impl WrappedRow {
    fn line_count(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0).max(1)
    }
}

impl Canvas {
    fn table_line_height(&self, style: TextStyle) -> Pt {
        self.font(style.bold).line_height(style.size)
    }

    fn header_height(&self, table: &Table) -> Pt {
        self.table_line_height(HEADER_STYLE) + table.padding * 2.0
    }

    fn row_height(&self, table: &Table, lines: usize) -> Pt {
        self.table_line_height(BODY_STYLE) * lines as f32 + table.padding * 2.0
    }

    /// Lay a table out at the cursor, left-aligned to the margin
    pub fn table(&mut self, table: &Table) {
        let header_height = self.header_height(table);
        let rows: Vec<WrappedRow> = table
            .rows
            .iter()
            .map(|row| self.wrap_row(table, row))
            .collect();

        // the header always goes down together with the whole first row, or
        // as much of it as a page can hold
        let whole_page = self.geometry().content_height() - header_height;
        let first_row = rows
            .first()
            .map(|row| self.row_height(table, row.line_count()))
            .unwrap_or_else(|| self.row_height(table, 1));
        self.state.ensure_space(header_height + first_row.min(whole_page));
        self.table_header(table);

        for row in rows.iter() {
            self.table_row(table, row);
        }
    }

    fn wrap_row(&self, table: &Table, row: &[String]) -> WrappedRow {
        let cells = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let text = row.get(i).map(String::as_str).unwrap_or_default();
                self.wrap(text, BODY_STYLE, column.width - table.padding * 2.0)
            })
            .collect();
        WrappedRow { cells }
    }

    fn table_header(&mut self, table: &Table) {
        let height = self.header_height(table);
        let top = self.state.cursor_y();
        let baseline = top + table.padding + self.font(true).ascent(HEADER_STYLE.size);

        let mut x = self.geometry().left();
        for column in table.columns.iter() {
            let rect = self.page_rect(x, top, column.width, height);
            self.place_shape(
                Shape::Rect(rect),
                Paint::FillAndStroke {
                    fill: colours::TABLE_HEADER,
                    stroke: colours::RULE,
                    width: Pt(0.5),
                },
            );
            let label = self.truncate(
                &column.header,
                HEADER_STYLE,
                column.width - table.padding * 2.0,
            );
            self.place_text(&label, x + table.padding, baseline, HEADER_STYLE);
            x += column.width;
        }
        self.state.advance(height);
    }

    fn table_row(&mut self, table: &Table, row: &WrappedRow) {
        let line_height = self.table_line_height(BODY_STYLE);
        let header_height = self.header_height(table);
        let mut remaining = row.line_count();
        let mut first_line = 0;

        while remaining > 0 {
            let height = self.row_height(table, remaining);
            if self.state.remaining() < height {
                // lines that still fit on this page; a row that fits a fresh
                // page whole is never split
                let fits_here =
                    ((self.state.remaining() - table.padding * 2.0) / line_height + LINE_EPSILON).floor();
                let whole_page = self.geometry().content_height() - header_height;
                if height <= whole_page || fits_here < 1.0 {
                    self.state.break_page();
                    self.table_header(table);
                }
            }

            let available = self.state.remaining() - table.padding * 2.0;
            let lines =
                (((available / line_height + LINE_EPSILON).floor()).max(1.0) as usize).min(remaining);
            self.table_row_slice(table, row, first_line, lines);
            first_line += lines;
            remaining -= lines;
        }
    }

    fn table_row_slice(&mut self, table: &Table, row: &WrappedRow, first: usize, count: usize) {
        let line_height = self.table_line_height(BODY_STYLE);
        let height = self.row_height(table, count);
        let top = self.state.cursor_y();
        let baseline = top + table.padding + self.font(false).ascent(BODY_STYLE.size);

        let mut x = self.geometry().left();
        for (column, lines) in table.columns.iter().zip(row.cells.iter()) {
            let rect = self.page_rect(x, top, column.width, height);
            self.place_shape(
                Shape::Rect(rect),
                Paint::Stroke {
                    colour: colours::RULE,
                    width: Pt(0.5),
                },
            );
            for (i, line) in lines.iter().skip(first).take(count).enumerate() {
                self.place_text(
                    line,
                    x + table.padding,
                    baseline + line_height * i as f32,
                    BODY_STYLE,
                );
            }
            x += column.width;
        }
        self.state.advance(height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportConfig;

    fn canvas() -> Canvas {
        Canvas::new(&ReportConfig::default()).expect("helvetica always loads")
    }

    fn table(rows: usize, description: &str) -> Table {
        let mut table = Table::new(vec![
            Column::new("Component", mm(40.0)),
            Column::new("Type", mm(30.0)),
            Column::new("Description", mm(90.0)),
        ]);
        for i in 0..rows {
            table.push_row(vec![
                format!("component {i}"),
                "service".to_string(),
                description.to_string(),
            ]);
        }
        table
    }

    #[test]
    fn short_tables_stay_on_one_page() {
        let mut canvas = canvas();
        canvas.table(&table(3, "a short description"));
        assert_eq!(canvas.state().page_count(), 1);
        let page = &canvas.state().pages()[0];
        assert!(page.has_text("Component"));
        assert!(page.has_text("component 2"));
    }

    #[test]
    fn headers_repeat_on_every_page() {
        let mut canvas = canvas();
        canvas.table(&table(80, "a short description"));
        let pages = canvas.state().pages();
        assert!(pages.len() > 1);
        for page in pages {
            let headers: Vec<&str> = page
                .spans()
                .filter(|span| span.font.size == HEADER_STYLE.size)
                .map(|span| span.text.as_str())
                .collect();
            assert_eq!(headers, vec!["Component", "Type", "Description"]);
        }
        for i in 0..80 {
            let name = format!("component {i}");
            assert_eq!(pages.iter().filter(|p| p.has_text(&name)).count(), 1);
        }
    }

    #[test]
    fn headers_are_not_left_alone_at_the_bottom_of_a_page() {
        let mut canvas = canvas();
        let table = table(1, &lipsum::lipsum(40));
        let one_line_row = canvas.header_height(&table) + canvas.row_height(&table, 1);
        let remaining = canvas.state().remaining();
        canvas.space(remaining - one_line_row - Pt(1.0));
        canvas.table(&table);

        let pages = canvas.state().pages();
        assert_eq!(pages.len(), 2);
        assert!(!pages[0].has_text("Component"));
        assert!(pages[1].has_text("Component"));
        assert!(pages[1].has_text("component 0"));
    }

    #[test]
    fn rows_taller_than_a_page_are_split() {
        let mut canvas = canvas();
        let description = lipsum::lipsum(1500);
        let table = table(1, &description);
        let expected = canvas.wrap(&description, BODY_STYLE, mm(90.0) - table.padding * 2.0);
        canvas.table(&table);

        let pages = canvas.state().pages();
        assert!(pages.len() > 1);
        let placed: Vec<String> = pages
            .iter()
            .flat_map(|page| page.spans())
            .filter(|span| span.font.size == BODY_STYLE.size)
            .filter(|span| span.text != "component 0" && span.text != "service")
            .map(|span| span.text.clone())
            .collect();
        assert_eq!(placed, expected);
        for page in pages {
            assert!(page.has_text("Description"));
        }
    }

    #[test]
    fn rows_never_cross_the_content_bottom() {
        let mut canvas = canvas();
        canvas.table(&table(60, &lipsum::lipsum(40)));
        let geometry = canvas.geometry();
        let lowest = geometry.to_page_y(geometry.content_bottom);
        for page in canvas.state().pages() {
            for shape in page.shapes() {
                if let Shape::Rect(rect) = shape.shape {
                    assert!(rect.y1.0 >= lowest.0 - 0.05);
                }
            }
        }
    }
}
