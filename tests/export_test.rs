mod common;

use anyhow::Result;
use common::{StandardExpenses, ledger_path, parse_date, test_service};
use outlay::application::AppError;

#[test]
fn test_export_subset_has_header_and_rows() -> Result<()> {
    let (mut service, temp) = test_service()?;
    StandardExpenses::create(&mut service);
    let out = temp.path().join("february.csv");

    let subset = service.monthly_expenses(2, 2024);
    assert_eq!(subset.len(), 2);
    let count = service.export_csv(&out, subset)?;
    assert_eq!(count, 2);

    let contents = std::fs::read_to_string(&out)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Name,Category,Amount,Date,Notes");
    assert_eq!(lines[1], "Cinema,Entertainment,20.00,2024-02-01,");

    Ok(())
}

#[test]
fn test_export_replaces_commas_in_free_text() -> Result<()> {
    let (mut service, temp) = test_service()?;
    service.add_expense(
        "Books, used",
        "Misc",
        1200,
        parse_date("2024-07-01"),
        Some("two, paperbacks".into()),
    );
    let out = temp.path().join("all.csv");

    service.export_all(&out)?;

    let contents = std::fs::read_to_string(&out)?;
    assert_eq!(
        contents.lines().nth(1),
        Some("Books  used,Misc,12.00,2024-07-01,two  paperbacks")
    );

    Ok(())
}

#[test]
fn test_export_month_and_ledger_untouched() -> Result<()> {
    let (mut service, temp) = test_service()?;
    StandardExpenses::create(&mut service);
    let ledger_before = std::fs::read_to_string(ledger_path(&temp))?;
    let out = temp.path().join("january.csv");

    assert_eq!(service.export_month(1, 2024, &out)?, 4);
    assert_eq!(service.export_month(1, 1999, &out)?, 0);
    assert_eq!(std::fs::read_to_string(&out)?.lines().count(), 1);

    assert_eq!(std::fs::read_to_string(ledger_path(&temp))?, ledger_before);
    assert_eq!(service.all_expenses().len(), 6);

    Ok(())
}

#[test]
fn test_export_to_unwritable_path_fails() -> Result<()> {
    let (mut service, temp) = test_service()?;
    StandardExpenses::create(&mut service);
    let out = temp.path().join("missing-dir").join("out.csv");

    let err = service.export_all(&out).unwrap_err();
    assert!(matches!(err, AppError::Export { .. }));
    assert_eq!(service.all_expenses().len(), 6);

    Ok(())
}

#[test]
fn test_export_month_rejects_invalid_month() -> Result<()> {
    let (mut service, temp) = test_service()?;
    StandardExpenses::create(&mut service);
    let out = temp.path().join("month13.csv");

    let err = service.export_month(13, 2024, &out).unwrap_err();
    assert!(matches!(err, AppError::InvalidMonth(13)));
    assert!(matches!(
        service.export_month(0, 2024, &out),
        Err(AppError::InvalidMonth(0))
    ));
    assert!(!out.exists());

    Ok(())
}
