use std::env;
use std::fs;
use std::process;

use rowcsv::{
    Dialect, Error, MalformedKind, ReadRow, ReaderBuilder, Row, RowReader,
    RowWriter, WriterBuilder,
};

fn read_all(data: &str) -> Vec<Vec<String>> {
    RowReader::from_str(data)
        .into_rows()
        .map(|row| row.unwrap().into_fields())
        .collect()
}

fn write_all(rows: &[Vec<&str>]) -> String {
    let mut wtr = RowWriter::from_memory();
    wtr.write_rows(rows).unwrap();
    wtr.into_inner().unwrap()
}

macro_rules! rows {
    ($([$($field:expr),*]),*) => {{
        #[allow(unused_mut)]
        let mut rows: Vec<Vec<String>> = vec![];
        $(
            rows.push(vec![$($field.to_string()),*]);
        )*
        rows
    }};
}

#[test]
fn empty_field_round_trip() {
    let data = write_all(&[vec!["a", "", "c"]]);
    assert_eq!(data, "a,,c\n");
    assert_eq!(read_all(&data), rows![["a", "", "c"]]);
}

#[test]
fn empty_row_reads_back_as_one_empty_field() {
    let data = write_all(&[vec![]]);
    assert_eq!(data, "\n");
    assert_eq!(read_all(&data), rows![[""]]);
}

#[test]
fn embedded_newline_is_one_row() {
    let data = write_all(&[vec!["x\ny", "z"]]);
    assert_eq!(data, "\"x\ny\",z\n");
    assert_eq!(read_all(&data), rows![["x\ny", "z"]]);
}

#[test]
fn doubled_quotes() {
    let data = write_all(&[vec!["He said \"hi\""]]);
    assert_eq!(data, "\"He said \"\"hi\"\"\"\n");
    assert_eq!(read_all(&data), rows![["He said \"hi\""]]);
}

#[test]
fn trailing_delimiter() {
    assert_eq!(read_all("a,b,\n"), rows![["a", "b", ""]]);
}

#[test]
fn no_final_terminator() {
    assert_eq!(read_all("a,b"), rows![["a", "b"]]);
}

#[test]
fn delimiter_field_round_trip() {
    let data = write_all(&[vec![","]]);
    assert_eq!(data, "\",\"\n");
    assert_eq!(read_all(&data), rows![[","]]);
}

#[test]
fn line_endings() {
    let expected = rows![["a", "b"], ["c", "d"], ["e"]];
    assert_eq!(read_all("a,b\nc,d\ne\n"), expected);
    assert_eq!(read_all("a,b\r\nc,d\r\ne\r\n"), expected);
    assert_eq!(read_all("a,b\rc,d\re"), expected);
    assert_eq!(read_all("a,b\r\nc,d\ne\r"), expected);
}

#[test]
fn blank_lines() {
    assert_eq!(read_all("a\n\nb\n"), rows![["a"], [""], ["b"]]);
    assert_eq!(read_all("a\r\n\r\nb"), rows![["a"], [""], ["b"]]);
}

#[test]
fn quoted_crlf_is_kept() {
    assert_eq!(read_all("\"a\r\nb\",c\r\n"), rows![["a\r\nb", "c"]]);
}

#[test]
fn lenient_quoting() {
    assert_eq!(read_all("a\"b,c\n"), rows![["a\"b", "c"]]);
    assert_eq!(read_all("\"ab\"cd,e\n"), rows![["abcd", "e"]]);
    assert_eq!(read_all("\"unterminated"), rows![["unterminated"]]);
}

#[test]
fn end_is_idempotent() {
    let mut rdr = RowReader::from_str("a\n");
    assert!(!rdr.read_row().unwrap().is_end());
    for _ in 0..3 {
        assert!(rdr.read_row().unwrap().is_end());
    }
    assert!(rdr.is_done());
}

#[test]
fn strict_errors_and_recovery() {
    let data = "a,b\nc\"d,e\nf,g\n\"h\"i\nj\n";
    let mut rdr = ReaderBuilder::new().strict(true).from_str(data);

    assert_eq!(rdr.read_row().unwrap().into_row().unwrap(), vec!["a", "b"]);
    match rdr.read_row() {
        Err(Error::MalformedQuoting { pos, offset, err }) => {
            assert_eq!(pos.row(), 1);
            assert_eq!(pos.line(), 2);
            assert_eq!(offset, 5);
            assert_eq!(err.kind, MalformedKind::QuoteInUnquotedField);
        }
        res => panic!("expected malformed quoting, got {:?}", res),
    }
    assert_eq!(rdr.read_row().unwrap().into_row().unwrap(), vec!["f", "g"]);
    match rdr.read_row() {
        Err(Error::MalformedQuoting { err, .. }) => {
            assert_eq!(err.kind, MalformedKind::DataAfterClosingQuote);
            assert_eq!(err.found, 'i');
        }
        res => panic!("expected malformed quoting, got {:?}", res),
    }
    assert_eq!(rdr.read_row().unwrap().into_row().unwrap(), vec!["j"]);
    assert!(rdr.read_row().unwrap().is_end());
}

#[test]
fn strict_accepts_regular_input() {
    let data = "\"a,b\",\"c\"\"d\"\n\"\",e\n";
    let rows: Vec<Row> = ReaderBuilder::new()
        .strict(true)
        .from_str(data)
        .into_rows()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(rows, vec![vec!["a,b", "c\"d"], vec!["", "e"]]);
}

#[test]
fn tab_dialect() {
    let rows = vec![vec!["a b", "c\td", "e,f"]];
    let mut wtr = WriterBuilder::new().delimiter('\t').from_memory();
    wtr.write_rows(&rows).unwrap();
    let data = wtr.into_inner().unwrap();
    assert_eq!(data, "a b\t\"c\td\"\te,f\n");

    let got: Vec<Row> = ReaderBuilder::new()
        .delimiter('\t')
        .from_str(&data)
        .into_rows()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(got, rows);
}

#[test]
fn multibyte_dialect() {
    let dialect = Dialect::new().delimiter('│').quote('«');
    let rows = vec![vec!["a│b", "«x", "plain"], vec!["", "y\nz"]];
    let mut wtr = WriterBuilder::new().dialect(dialect).from_memory();
    wtr.write_rows(&rows).unwrap();
    let data = wtr.into_inner().unwrap();
    assert_eq!(data, "«a│b«│«««x«│plain\n│«y\nz«\n");

    let got: Vec<Row> = ReaderBuilder::new()
        .dialect(dialect)
        .from_str(&data)
        .into_rows()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(got, rows);
}

#[test]
#[should_panic(expected = "invalid dialect")]
fn newline_delimiter_is_rejected() {
    WriterBuilder::new().delimiter('\n').from_memory();
}

#[test]
#[should_panic(expected = "invalid dialect")]
fn delimiter_equal_to_quote_is_rejected() {
    ReaderBuilder::new().delimiter('"').from_str("a\"b");
}

#[test]
fn io_round_trip() {
    let rows = vec![vec!["☃", "snow man"], vec!["日本", "\"quoted\""]];
    let mut wtr = RowWriter::from_writer(vec![]);
    wtr.write_rows(&rows).unwrap();
    let bytes = wtr.into_inner().unwrap().into_inner().unwrap();

    let got: Vec<Row> = ReaderBuilder::new()
        .buffer_capacity(5)
        .from_reader(&bytes[..])
        .into_rows()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(got, rows);
}

#[test]
fn invalid_utf8_is_io_error() {
    let mut rdr = RowReader::from_reader(&b"a,\xFF\n"[..]);
    match rdr.read_row() {
        Err(ref err) if err.is_io_error() => {}
        res => panic!("expected I/O error, got {:?}", res),
    }
}

#[test]
fn path_round_trip() {
    let path = env::temp_dir()
        .join(format!("rowcsv-path-round-trip-{}.csv", process::id()));
    let rows = vec![vec!["a", "b,c"], vec!["d\r\ne", ""]];
    {
        let mut wtr = RowWriter::from_path(&path).unwrap();
        wtr.write_rows(&rows).unwrap();
        wtr.flush().unwrap();
    }
    let got: Vec<Row> = RowReader::from_path(&path)
        .unwrap()
        .into_rows()
        .collect::<Result<_, _>>()
        .unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(got, rows);
}

#[test]
fn positions_survive_into_rows() {
    let mut rdr = RowReader::from_str("a\n\"b\nc\"\nd");
    let mut got = vec![];
    while let ReadRow::Row(row) = rdr.read_row().unwrap() {
        let pos = row.position().unwrap();
        got.push((pos.char(), pos.line(), pos.row()));
    }
    assert_eq!(got, vec![(0, 1, 0), (2, 2, 1), (8, 4, 2)]);
}

#[cfg(feature = "serde")]
mod serde_tests {
    use serde::Serialize;

    use rowcsv::{Error, RowReader, RowWriter};

    #[derive(Serialize)]
    enum Kind {
        City,
    }

    #[derive(Serialize)]
    struct Place<'a> {
        name: &'a str,
        kind: Kind,
        population: Option<u64>,
        lat: f64,
    }

    #[test]
    fn serialize_round_trip() {
        let mut wtr = RowWriter::from_memory();
        wtr.serialize(Place {
            name: "Boston, MA",
            kind: Kind::City,
            population: Some(4628910),
            lat: 42.36,
        })
        .unwrap();
        wtr.serialize(Place {
            name: "Nowhere",
            kind: Kind::City,
            population: None,
            lat: -0.5,
        })
        .unwrap();
        let data = wtr.into_inner().unwrap();
        assert_eq!(
            data,
            "\"Boston, MA\",City,4628910,42.36\nNowhere,City,,-0.5\n"
        );
        let rows: Vec<Vec<String>> = RowReader::from_str(&data)
            .into_rows()
            .map(|row| row.unwrap().into_fields())
            .collect();
        assert_eq!(rows[0], vec!["Boston, MA", "City", "4628910", "42.36"]);
    }

    #[test]
    fn unsupported_value_writes_nothing() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert("k", "v");
        let mut wtr = RowWriter::from_memory();
        wtr.write_row(&["before"]).unwrap();
        match wtr.serialize(("x", map)) {
            Err(Error::UnsupportedValue(_)) => {}
            res => panic!("expected unsupported value, got {:?}", res),
        }
        assert_eq!(wtr.as_str(), "before\n");
    }
}
