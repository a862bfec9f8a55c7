mod common;
use common::*;
use std::fs;

#[test]
fn test_print_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let mut r = runtime();
    r.enter(&format!(r#"OPEN "{}" FOR OUTPUT AS #1"#, path.display()));
    r.enter(r#"PRINT #1, "HI";1"#);
    r.enter("CLOSE #1");
    exec(&mut r);
    assert_eq!(fs::read_to_string(&path).unwrap(), "HI 1 \n");
    assert_eq!(r.session().files.len(), 0);
}

#[test]
fn test_append_and_end_closes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.txt");
    fs::write(&path, "A\n").unwrap();
    let mut r = runtime();
    r.enter(&format!(r#"10 OPEN "{}" FOR APPEND AS 2"#, path.display()));
    r.enter(r#"20 PRINT #2, "B""#);
    r.enter("30 END");
    r.enter("RUN");
    assert_eq!(exec(&mut r), "");
    assert_eq!(fs::read_to_string(&path).unwrap(), "A\nB\n");
    assert_eq!(r.session().files.len(), 0);
}

#[test]
fn test_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in.txt");
    fs::write(&path, "X").unwrap();
    let mut r = runtime();
    r.enter(&format!(r#"OPEN "{}" FOR INPUT AS #1"#, path.display()));
    r.enter(r#"PRINT #1, "NO""#);
    r.enter(&format!(r#"OPEN "{}" FOR INPUT AS #1"#, path.display()));
    r.enter(r#"PRINT #3, "NO""#);
    r.enter(&format!(r#"OPEN "{}" FOR INPUT AS #16"#, path.display()));
    assert_eq!(
        exec(&mut r),
        "Ok\nBad file mode\nOk\nFile already open\nOk\nBad file number\nOk\nBad file number\n"
    );
}

#[test]
fn test_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    let mut r = runtime();
    r.enter(&format!(r#"OPEN "{}" FOR INPUT AS #1"#, path.display()));
    assert_eq!(exec(&mut r), "File not found\n");
}
