// * Operator-supplied term list: a CSV with a TERMINOS column, one search
// * term per row, trimmed and lower-cased on load. Consumed by the driver as
// * the query sequence; the pipeline itself never reads files.

use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

const TERM_COLUMN: &str = "TERMINOS";

/// Loads search terms from `path`. Rows without a value in the TERMINOS
/// column are skipped; a file without that column yields no terms.
pub fn load_terms(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines();

    let Some(header) = lines.next() else {
        return Ok(Vec::new());
    };
    let columns: Vec<&str> = header
        .trim_start_matches('\u{feff}')
        .split(',')
        .map(str::trim)
        .collect();
    let Some(term_idx) = columns.iter().position(|c| *c == TERM_COLUMN) else {
        warn!(path = %path.display(), "term list has no {TERM_COLUMN} column");
        return Ok(Vec::new());
    };

    let terms = lines
        .filter_map(|line| line.split(',').nth(term_idx))
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect();
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_terms_lowercased_and_trimmed() {
        let file = write_csv("TERMINOS\nFeminicidio\n  Violencia de Género \nmachismo\n");
        let terms = load_terms(file.path()).unwrap();
        assert_eq!(
            terms,
            vec!["feminicidio", "violencia de género", "machismo"]
        );
    }

    #[test]
    fn test_picks_terminos_column_among_others() {
        let file = write_csv("ID,TERMINOS,NOTA\n1,feminicidio,x\n2,acoso,y\n");
        let terms = load_terms(file.path()).unwrap();
        assert_eq!(terms, vec!["feminicidio", "acoso"]);
    }

    #[test]
    fn test_missing_column_yields_no_terms() {
        let file = write_csv("PALABRAS\nfeminicidio\n");
        assert!(load_terms(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_blank_rows_skipped() {
        let file = write_csv("TERMINOS\n\nfeminicidio\n   \n");
        assert_eq!(load_terms(file.path()).unwrap(), vec!["feminicidio"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_terms(Path::new("/nonexistent/terms.csv")).is_err());
    }
}
