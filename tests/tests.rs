use dsv::{
    Dialect, DialectBuilder, Error, QuoteStyle, Quoter, Reader, Record,
    Writer,
};

fn read_all(dialect: Dialect, data: &[u8]) -> Vec<Record> {
    Reader::from_reader(dialect, data)
        .records()
        .collect::<dsv::Result<Vec<Record>>>()
        .unwrap()
}

#[test]
fn tab_to_comma_conversion() {
    let tsv = DialectBuilder::new().delimiter(b'\t').build().unwrap();
    let csv = Dialect::default();

    let mut rdr = Reader::from_reader(tsv, &b"a\tb\tc\n,\t,\n"[..]);
    let mut wtr = Writer::new(csv, vec![]);
    let mut rec = Record::new();
    while rdr.read_record(&mut rec).unwrap() {
        wtr.write_record(&rec).unwrap();
    }
    assert_eq!(wtr.into_inner(), b"a,b,c\n\",\",\",\"\n".to_vec());
}

#[test]
fn comma_to_tab_conversion_requotes() {
    let csv = Dialect::default();
    let tsv = DialectBuilder::new().delimiter(b'\t').build().unwrap();

    // "a,b" needs quotes under the comma dialect but not under tabs;
    // "x\ty" is the other way around.
    let mut rdr = Reader::from_reader(csv, &b"\"a,b\",\"x\ty\"\n"[..]);
    let mut wtr = Writer::new(tsv, vec![]);
    let mut rec = Record::new();
    while rdr.read_record(&mut rec).unwrap() {
        wtr.write_record(&rec).unwrap();
    }
    assert_eq!(wtr.into_inner(), b"a,b\t\"x\ty\"\n".to_vec());
}

#[test]
fn quote_record_converts_dialects() {
    let tsv = DialectBuilder::new().delimiter(b'\t').build().unwrap();
    let records = read_all(tsv, b"a\tb\tc\n");
    assert_eq!(records.len(), 1);

    let mut rec = records[0].clone();
    Quoter::new(Dialect::default()).quote_record(&mut rec);
    assert_eq!(rec, vec!["a", "b", "c"]);
}

#[test]
fn round_trip_necessary_style() {
    let dialect = Dialect::default();
    let fields: Vec<&[u8]> = vec![
        b"plain",
        b"",
        b"has,delimiter",
        b"has\"quote",
        b"has\nterminator",
        b"\"",
        b",\n\"",
    ];

    let mut wtr = Writer::new(dialect, vec![]);
    wtr.write_record(&fields).unwrap();
    let encoded = wtr.into_inner();

    let records = read_all(dialect, &encoded);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0], fields);
}

#[test]
fn round_trip_always_style() {
    let dialect = Dialect::default();
    let fields: Vec<&[u8]> = vec![b"plain", b"", b"a\"b,c\nd"];

    let mut wtr = Writer::with_style(dialect, QuoteStyle::Always, vec![]);
    wtr.write_record(&fields).unwrap();
    let encoded = wtr.into_inner();

    let records = read_all(dialect, &encoded);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0], fields);
}

#[test]
fn round_trip_multiline_value_through_writer_and_reader() {
    let dialect = Dialect::default();
    let mut wtr = Writer::new(dialect, vec![]);
    wtr.write_record(&["line1\nline2", "x"]).unwrap();
    let encoded = wtr.into_inner();
    assert_eq!(encoded, b"\"line1\nline2\",x\n".to_vec());

    let mut rdr = Reader::from_reader(dialect, &*encoded);
    let mut rec = Record::new();
    assert!(rdr.read_record(&mut rec).unwrap());
    assert_eq!(rec, vec!["line1\nline2", "x"]);
    // One record, but two physical lines.
    assert_eq!(rdr.position().line(), 2);
    assert!(!rdr.read_record(&mut rec).unwrap());
}

#[test]
fn force_quoted_empty_field_reads_back_empty() {
    let dialect = Dialect::default();
    let quoter = Quoter::with_style(dialect, QuoteStyle::Always);

    let mut rec = Record::from(vec![""]);
    quoter.quote_record(&mut rec);
    assert_eq!(rec, vec!["\"\""]);

    let records = read_all(dialect, b"\"\"\n");
    assert_eq!(records, vec![Record::from(vec![""])]);
}

#[test]
fn invalid_dialect_fails_before_any_parsing() {
    let err = Dialect::new(b'"', b'"', b'\n').unwrap_err();
    assert!(err.to_string().contains("delimiter"));
    assert!(err.to_string().contains("quote"));
}

#[test]
fn parse_error_display_names_the_position() {
    let mut rdr =
        Reader::from_reader(Dialect::default(), &b"ok\nbad\"field\n"[..]);
    let mut rec = Record::new();
    assert!(rdr.read_record(&mut rec).unwrap());
    let err = rdr.read_record(&mut rec).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("record 2"), "bad message: {}", msg);
    assert!(msg.contains("line 2"), "bad message: {}", msg);
    match err {
        Error::Parse(_) => {}
        err => panic!("unexpected error: {:?}", err),
    }
}

#[test]
fn unclosed_quote_at_end_of_input_is_fatal() {
    let mut rdr = Reader::from_reader(
        Dialect::default(),
        &b"fine,record\n\"never closed\nstill open"[..],
    );
    let mut rec = Record::new();
    assert!(rdr.read_record(&mut rec).unwrap());
    let err = rdr.read_record(&mut rec).unwrap_err();
    assert!(err.to_string().contains("never closed"));
}

#[test]
fn crlf_is_a_caller_concern() {
    // With a b'\n' terminator, the carriage return stays in the last
    // field.
    let records = read_all(Dialect::default(), b"a,b\r\nc,d\r\n");
    assert_eq!(records[0], vec!["a", "b\r"]);
    assert_eq!(records[1], vec!["c", "d\r"]);
}

#[test]
fn pipe_terminated_single_stream() {
    let dialect = Dialect::new(b',', b'"', b'|').unwrap();
    let records = read_all(dialect, b"a,b|\"c|d\",e|");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], vec!["a", "b"]);
    assert_eq!(records[1], vec!["c|d", "e"]);
}
