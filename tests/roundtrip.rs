use quickcheck::{quickcheck, TestResult};

use rowcsv::{Dialect, ReaderBuilder, Row, RowReader, WriterBuilder};

fn write(dialect: Dialect, rows: &[Vec<String>]) -> String {
    let mut wtr = WriterBuilder::new().dialect(dialect).from_memory();
    wtr.write_rows(rows).unwrap();
    wtr.into_inner().unwrap()
}

fn read(dialect: Dialect, data: &str) -> Vec<Row> {
    ReaderBuilder::new()
        .dialect(dialect)
        .strict(true)
        .from_str(data)
        .into_rows()
        .collect::<Result<_, _>>()
        .unwrap()
}

// A row with no fields is written as a blank line and reads back as `[""]`.
fn has_empty_row(rows: &[Vec<String>]) -> bool {
    rows.iter().any(|row| row.is_empty())
}

#[test]
fn same_record() {
    fn prop(input: Vec<String>) -> TestResult {
        if input.is_empty() {
            return TestResult::discard();
        }
        let data = write(Dialect::default(), &[input.clone()]);
        let output = read(Dialect::default(), &data);
        TestResult::from_bool(output == vec![input])
    }
    quickcheck(prop as fn(Vec<String>) -> TestResult);
}

#[test]
fn same_records() {
    fn prop(input: Vec<Vec<String>>) -> TestResult {
        if has_empty_row(&input) {
            return TestResult::discard();
        }
        let data = write(Dialect::default(), &input);
        let output = read(Dialect::default(), &data);
        TestResult::from_bool(output == input)
    }
    quickcheck(prop as fn(Vec<Vec<String>>) -> TestResult);
}

#[test]
fn same_records_custom_dialect() {
    fn prop(input: Vec<Vec<String>>) -> TestResult {
        if has_empty_row(&input) {
            return TestResult::discard();
        }
        let dialect = Dialect::new().delimiter(';').quote('\'');
        let data = write(dialect, &input);
        let output = read(dialect, &data);
        TestResult::from_bool(output == input)
    }
    quickcheck(prop as fn(Vec<Vec<String>>) -> TestResult);
}

#[test]
fn lenient_never_fails() {
    fn prop(input: String) -> bool {
        RowReader::from_str(&input).into_rows().all(|row| row.is_ok())
    }
    quickcheck(prop as fn(String) -> bool);
}

#[test]
fn strict_always_terminates() {
    fn prop(input: String) -> bool {
        let rows = ReaderBuilder::new()
            .strict(true)
            .from_str(&input)
            .into_rows()
            .count();
        rows <= input.chars().count() + 1
    }
    quickcheck(prop as fn(String) -> bool);
}
