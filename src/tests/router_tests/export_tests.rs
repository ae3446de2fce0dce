use super::{context, get, seeded_context};
use crate::errors::ServerError;
use crate::router::handle;
use crate::spreadsheets::sheet_to_xlsx;
use crate::domain::table::SheetTable;
use std::io::Read;

#[test]
fn export_downloads_the_worksheet() {
    let ctx = seeded_context();
    let resp = handle(get("/export", None), &ctx).expect("Handler failed");

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("filename*=UTF-8''test%20book.xlsx"));

    let mut bytes = Vec::new();
    resp.into_body().reader().read_to_end(&mut bytes).unwrap();
    // XLSX is a zip archive.
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn export_without_data_is_not_found() {
    let ctx = context();
    assert!(matches!(
        handle(get("/export", None), &ctx),
        Err(ServerError::NotFound)
    ));
}

#[test]
fn invalid_worksheet_name_is_an_xlsx_error() {
    let table = SheetTable::default();
    assert!(matches!(
        sheet_to_xlsx(&table, "bad[name]"),
        Err(ServerError::XlsxError(_))
    ));
}
