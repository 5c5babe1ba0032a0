use crate::extraction::Table;

/// Reconstruct tables from `pdftotext -layout` output.
///
/// pdftotext -layout preserves column alignment using spaces. A table is a
/// run of lines that split into at least two cells on gaps of two or more
/// spaces. The first line of the run is the header and fixes the column
/// start positions; each later line is cut into those columns. Blank lines
/// inside a run are ignored, a non-blank single-cell line (titles, page
/// footers) closes it.
pub fn detect_tables(lines: &[String]) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Option<TableBuilder> = None;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let segments = split_by_whitespace_gaps(line);
        if segments.len() < MIN_TABLE_COLUMNS {
            if let Some(builder) = current.take() {
                tables.push(builder.finish());
            }
            continue;
        }

        match current.as_mut() {
            Some(builder) => builder.push(&segments),
            None => current = Some(TableBuilder::new(&segments)),
        }
    }

    if let Some(builder) = current {
        tables.push(builder.finish());
    }

    tables
}

const MIN_TABLE_COLUMNS: usize = 2;

/// Cells may start this many characters left of their header and still
/// belong to its column.
const ALIGN_TOLERANCE: usize = 2;

/// A run of text on a layout line and the character column it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub column: usize,
    pub text: &'a str,
}

/// Split a line by gaps of 2+ whitespace characters.
pub fn split_by_whitespace_gaps(line: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    let mut end = 0;
    let mut space_count = 0;

    for (column, (i, c)) in line.char_indices().enumerate() {
        if c.is_whitespace() {
            space_count += 1;
            if space_count == 2 {
                if let Some((col, s)) = start.take() {
                    segments.push(Segment {
                        column: col,
                        text: &line[s..end],
                    });
                }
            }
        } else {
            if start.is_none() {
                start = Some((column, i));
            }
            space_count = 0;
            end = i + c.len_utf8();
        }
    }

    if let Some((col, s)) = start {
        segments.push(Segment {
            column: col,
            text: &line[s..end],
        });
    }

    segments
}

struct TableBuilder {
    boundaries: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    fn new(header: &[Segment<'_>]) -> Self {
        TableBuilder {
            boundaries: header.iter().map(|s| s.column).collect(),
            rows: vec![header.iter().map(|s| s.text.to_string()).collect()],
        }
    }

    fn push(&mut self, segments: &[Segment<'_>]) {
        let mut cells = vec![String::new(); self.boundaries.len()];
        for segment in segments {
            let cell = &mut cells[self.column_for(segment.column)];
            if !cell.is_empty() {
                cell.push(' ');
            }
            cell.push_str(segment.text);
        }
        self.rows.push(cells);
    }

    fn column_for(&self, column: usize) -> usize {
        self.boundaries
            .iter()
            .rposition(|&b| b <= column + ALIGN_TOLERANCE)
            .unwrap_or(0)
    }

    fn finish(self) -> Table {
        self.rows
    }
}
