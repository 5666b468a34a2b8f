use std::mem::take;

/// Minimal CSV reader: quoted fields, doubled-quote escapes, CRLF. Blank lines are skipped.
/// A leading byte-order mark (Excel writes one) is dropped.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let text = text.trim_start_matches('\u{feff}');
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && matches!(chars.peek(), Some('"')) => {
                chars.next();
                field.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                push_row(&mut rows, take(&mut row));
            }
            _ => field.push(ch),
        }
    }

    row.push(field);
    push_row(&mut rows, row);
    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    let blank = row.iter().all(|cell| cell.trim().is_empty());
    if !blank {
        rows.push(row);
    }
}

/// Header-name lookup for a parsed sheet. Names compare trimmed and case-insensitive.
pub struct Header {
    names: Vec<String>,
}

impl Header {
    pub fn new(row: &[String]) -> Self {
        Self {
            names: row.iter().map(|c| c.trim().to_ascii_lowercase()).collect(),
        }
    }

    pub fn index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quotes_and_crlf() {
        let rows = parse_rows("a,b\r\n\"x, y\",\"say \"\"hi\"\"\"\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["x, y", "say \"hi\""]]);
    }

    #[test]
    fn leading_bom_is_not_part_of_the_first_header() {
        let rows = parse_rows("\u{feff}player_id,owner\r\n1,Sai\r\n");
        assert_eq!(rows[0][0], "player_id");
        assert_eq!(Header::new(&rows[0]).index("player_id"), Some(0));
    }

    #[test]
    fn skips_blank_lines_and_handles_missing_trailing_newline() {
        let rows = parse_rows("h1,h2\n\n1,2");
        assert_eq!(rows, vec![vec!["h1", "h2"], vec!["1", "2"]]);
    }

    #[test]
    fn header_lookup_ignores_case_and_padding() {
        let header = Header::new(&[" Player_ID".to_string(), "OWNER ".to_string()]);
        assert_eq!(header.index("player_id"), Some(0));
        assert_eq!(header.index("owner"), Some(1));
        assert_eq!(header.index("team_id"), None);
    }
}
