mod common;

use anyhow::Result;
use common::{StandardExpenses, parse_date, test_service};
use outlay::application::{AppError, Intensity};
use outlay::domain::Category;

#[test]
fn test_category_totals_sum_to_grand_total() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    StandardExpenses::create(&mut service);
    service.add_expense("Gift", "Gifts", 2500, parse_date("2024-02-20"), None);

    let expenses = service.all_expenses();
    let totals = service.category_totals(expenses);
    let direct: i64 = expenses.iter().map(|e| e.amount_cents()).sum();

    assert_eq!(totals.values().sum::<i64>(), direct);
    assert_eq!(service.total(expenses), direct);
    assert_eq!(totals["Food"], 6550);
    assert_eq!(totals["Gifts"], 2500);

    Ok(())
}

#[test]
fn test_category_totals_over_subset() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    StandardExpenses::create(&mut service);

    let february = service.monthly_expenses(2, 2024);
    let totals = service.category_totals(february);
    assert_eq!(totals.len(), 2);
    assert!(!totals.contains_key("Food"));

    Ok(())
}

#[test]
fn test_category_report() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    StandardExpenses::create(&mut service);

    let report = service.category_report();
    assert_eq!(report.total, 21050);
    assert_eq!(report.other, 0);

    let bills = report
        .categories
        .iter()
        .find(|c| c.category == Category::Bills)
        .expect("Should have bills summary");
    assert_eq!(bills.total, 8000);
    assert_eq!(bills.count, 1);
    assert!((bills.share_of_max - 1.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_monthly_report() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    StandardExpenses::create(&mut service);

    let report = service.monthly_report(1, 2024)?;
    assert_eq!(report.expenses.len(), 4);
    assert_eq!(report.total, 17550);
    assert_eq!(report.breakdown["Food"], 6550);
    assert_eq!(report.breakdown["Transport"], 3000);
    assert_eq!(report.breakdown["Bills"], 8000);

    assert!(service.monthly_report(12, 2030)?.is_empty());
    assert!(matches!(
        service.monthly_report(13, 2024),
        Err(AppError::InvalidMonth(13))
    ));

    Ok(())
}

#[test]
fn test_expense_chart() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    StandardExpenses::create(&mut service);

    let chart = service.expense_chart();
    assert_eq!(chart.len(), 6);
    // Electricity is the largest
    assert_eq!(chart[3].intensity, Intensity::High);
    assert!((chart[3].share_of_max - 1.0).abs() < 1e-9);
    // Groceries 45.50 of 80.00 is above 30%
    assert_eq!(chart[0].intensity, Intensity::Medium);
    // Umbrella 15.00 of 80.00 is below 30%
    assert_eq!(chart[5].intensity, Intensity::Low);

    Ok(())
}
