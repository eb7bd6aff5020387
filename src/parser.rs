// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

/// One line of the export, split into raw (untrimmed, still quoted) fields.
pub type Row = Vec<String>;

/// A parsed survey export: the header line plus every line after it.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyTable {
    header: Row,
    rows: Vec<Row>,
}

impl SurveyTable {
    /// Parse the raw document and split off the header row.
    ///
    /// Trailing blank lines are kept as single-field rows; the aggregates
    /// skip them on their own.
    pub fn parse(text: &str) -> Self {
        let mut rows = parse_rows(text).into_iter();
        let header = rows.next().unwrap_or_default();
        Self {
            header,
            rows: rows.collect(),
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Split text into rows on `\n`, then each row into fields.
pub fn parse_rows(text: &str) -> Vec<Row> {
    text.split('\n').map(split_line).collect()
}

/// Split a single line on commas that sit outside double quotes.
///
/// A comma is a delimiter only when the number of `"` seen from the start
/// of the line up to it is even. Quotes are left in place and doubled quotes
/// are not unescaped.
pub fn split_line(line: &str) -> Row {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut quotes = 0usize;

    // Both delimiters are ASCII, so byte offsets are always char boundaries.
    for (i, byte) in line.bytes().enumerate() {
        match byte {
            b'"' => quotes += 1,
            b',' if quotes % 2 == 0 => {
                fields.push(line[start..i].to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(line[start..].to_string());

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_comma_stays_in_field() {
        let fields = split_line(r#"a,"b,c",d"#);
        assert_eq!(fields, vec!["a", r#""b,c""#, "d"]);

        // Same shape without the embedded comma gives the same field count
        assert_eq!(split_line(r#"a,"bc",d"#).len(), fields.len());
    }

    #[test]
    fn test_empty_line_is_one_empty_field() {
        assert_eq!(split_line(""), vec![String::new()]);
        assert_eq!(parse_rows(""), vec![vec![String::new()]]);
    }

    #[test]
    fn test_fields_are_not_trimmed() {
        let fields = split_line(" Cat , \"Dog\" ,7\r");
        assert_eq!(fields, vec![" Cat ", " \"Dog\" ", "7\r"]);
    }

    #[test]
    fn test_consecutive_and_trailing_commas() {
        assert_eq!(split_line("a,,b,"), vec!["a", "", "b", ""]);
    }

    #[test]
    fn test_multiple_quoted_fields() {
        let fields = split_line(r#""x, y",plain,"1,2,3""#);
        assert_eq!(fields, vec![r#""x, y""#, "plain", r#""1,2,3""#]);
    }

    #[test]
    fn test_unicode_fields_split_cleanly() {
        let fields = split_line("時間,\"貓, 狗\",七");
        assert_eq!(fields, vec!["時間", "\"貓, 狗\"", "七"]);
    }

    #[test]
    fn test_table_drops_header_and_keeps_trailing_line() {
        let table = SurveyTable::parse("ts,creature,faction\n1,Cat,Night\n2,Dog,Day\n");

        assert_eq!(table.header(), &["ts", "creature", "faction"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0], vec!["1", "Cat", "Night"]);
        assert_eq!(table.rows()[2], vec![String::new()]);
    }

    #[test]
    fn test_empty_document_has_no_data_rows() {
        let table = SurveyTable::parse("");
        assert_eq!(table.header(), &[String::new()]);
        assert!(table.is_empty());
    }
}
