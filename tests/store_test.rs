mod common;

use anyhow::Result;
use common::{category, parse_date, record, test_service};
use finlens::application::AppError;
use finlens::domain::{BudgetPeriod, CategoryType, MAX_AMOUNT, Transaction, TransactionType};
use uuid::Uuid;

#[test]
fn test_negative_amount_is_rejected() {
    let mut service = test_service();
    let food = category(&service, "Food & Dining").id;

    let expense = Transaction::expense(-100, food, parse_date("2024-01-01"));
    let result = service.record_transaction(expense);
    assert!(matches!(result, Err(AppError::InvalidAmount(-100))));
    assert!(service.store().transactions().is_empty());
}

#[test]
fn test_amount_above_maximum_is_rejected() -> Result<()> {
    let mut service = test_service();
    let housing = category(&service, "Housing").id;

    let expense = Transaction::expense(MAX_AMOUNT + 1, housing, parse_date("2024-01-01"));
    let result = service.record_transaction(expense);
    assert!(matches!(result, Err(AppError::InvalidAmount(amount)) if amount == MAX_AMOUNT + 1));
    assert!(matches!(
        service.add_budget(housing, i64::MAX, BudgetPeriod::Monthly, 80.0),
        Err(AppError::InvalidAmount(_))
    ));

    // The maximum itself is accepted and aggregates without overflow
    record(&mut service, TransactionType::Expense, MAX_AMOUNT, "Housing", "2024-01-01")?;
    record(&mut service, TransactionType::Expense, MAX_AMOUNT, "Housing", "2024-01-02")?;
    assert_eq!(service.current_balance(parse_date("2024-01-31")), -2 * MAX_AMOUNT);

    Ok(())
}

#[test]
fn test_unknown_category_is_rejected() {
    let mut service = test_service();
    let expense = Transaction::expense(100, Uuid::new_v4(), parse_date("2024-01-01"));
    let result = service.record_transaction(expense);
    assert!(matches!(result, Err(AppError::CategoryNotFound(_))));
}

#[test]
fn test_category_type_must_accept_transaction() -> Result<()> {
    let mut service = test_service();

    let result = record(&mut service, TransactionType::Revenue, 100, "Housing", "2024-01-01");
    assert!(result.is_err());

    // "Both" categories take either side
    record(&mut service, TransactionType::Revenue, 100, "Investments", "2024-01-01")?;
    record(&mut service, TransactionType::Expense, 100, "Investments", "2024-01-02")?;
    assert_eq!(service.store().transactions().len(), 2);

    Ok(())
}

#[test]
fn test_update_and_delete_transaction() -> Result<()> {
    let mut service = test_service();
    let mut transaction =
        record(&mut service, TransactionType::Expense, 2_500, "Shopping", "2024-05-01")?;

    transaction.amount = 3_000;
    transaction = transaction.with_description("Shoes");
    service.update_transaction(transaction.clone())?;
    let stored = service
        .store()
        .get_transaction(transaction.id)
        .expect("transaction should exist");
    assert_eq!(stored.amount, 3_000);
    assert_eq!(stored.description.as_deref(), Some("Shoes"));

    service.delete_transaction(transaction.id)?;
    assert!(service.store().transactions().is_empty());
    assert!(matches!(
        service.delete_transaction(transaction.id),
        Err(AppError::TransactionNotFound(_))
    ));

    let shopping = category(&service, "Shopping").id;
    let ghost = Transaction::expense(1, shopping, parse_date("2024-05-01"));
    assert!(matches!(
        service.update_transaction(ghost),
        Err(AppError::TransactionNotFound(_))
    ));

    Ok(())
}

#[test]
fn test_category_management() -> Result<()> {
    let mut service = test_service();

    let pets = service.add_category(
        "  Pets ".into(),
        CategoryType::Expense,
        Some("#123456".into()),
        None,
    )?;
    assert_eq!(pets.name, "Pets");
    assert_eq!(pets.color, "#123456");

    assert!(matches!(
        service.add_category("pets".into(), CategoryType::Both, None, None),
        Err(AppError::CategoryAlreadyExists(_))
    ));
    assert!(matches!(
        service.add_category("   ".into(), CategoryType::Both, None, None),
        Err(AppError::InvalidQuery(_))
    ));

    // Lookup by id or by name
    assert_eq!(service.resolve_category(&pets.id.to_string())?.id, pets.id);
    assert_eq!(service.resolve_category("PETS")?.id, pets.id);

    service.pin_category(pets.id, true)?;
    let listed = service.list_categories();
    assert_eq!(listed[0].name, "Pets");
    assert!(listed[0].is_pinned);
    assert!(listed[1..].iter().all(|c| !c.is_pinned));

    service.remove_category(pets.id)?;
    assert!(matches!(
        service.resolve_category("Pets"),
        Err(AppError::CategoryNotFound(_))
    ));

    Ok(())
}

#[test]
fn test_budget_refresh_and_status() -> Result<()> {
    let mut service = test_service();
    let housing = category(&service, "Housing").id;
    let food = category(&service, "Food & Dining").id;

    service.add_budget(housing, 100_000, BudgetPeriod::Monthly, 80.0)?;
    service.add_budget(food, 50_000, BudgetPeriod::Monthly, 80.0)?;

    record(&mut service, TransactionType::Expense, 120_000, "Housing", "2024-06-03")?;
    record(&mut service, TransactionType::Expense, 20_000, "Food & Dining", "2024-06-10")?;
    // Outside the current month
    record(&mut service, TransactionType::Expense, 99_000, "Food & Dining", "2024-05-28")?;

    let today = parse_date("2024-06-20");
    assert_eq!(service.refresh_budgets(today), 2);
    assert_eq!(service.refresh_budgets(today), 0);

    let statuses = service.budget_statuses(today);
    let housing_status = statuses
        .iter()
        .find(|s| s.category_name == "Housing")
        .expect("housing budget");
    assert_eq!(housing_status.budget.spent, 120_000);
    assert!(housing_status.exceeded);
    assert!(housing_status.alert);
    assert!((housing_status.usage_percentage - 120.0).abs() < 1e-9);
    assert_eq!(housing_status.remaining, -20_000);

    let food_status = statuses
        .iter()
        .find(|s| s.category_name == "Food & Dining")
        .expect("food budget");
    assert_eq!(food_status.budget.spent, 20_000);
    assert!(!food_status.alert);
    assert!(!food_status.exceeded);
    let period = food_status.period.expect("monthly period");
    assert_eq!(period.start(), parse_date("2024-06-01"));
    assert_eq!(period.end(), parse_date("2024-06-30"));

    Ok(())
}

#[test]
fn test_budget_validation() {
    let mut service = test_service();
    let housing = category(&service, "Housing").id;

    assert!(matches!(
        service.add_budget(housing, -1, BudgetPeriod::Monthly, 80.0),
        Err(AppError::InvalidAmount(-1))
    ));
    assert!(matches!(
        service.add_budget(housing, 1_000, BudgetPeriod::Monthly, 150.0),
        Err(AppError::InvalidPercentage(_))
    ));
    assert!(matches!(
        service.add_budget(Uuid::new_v4(), 1_000, BudgetPeriod::Weekly, 50.0),
        Err(AppError::CategoryNotFound(_))
    ));
    assert!(matches!(
        service.remove_budget(Uuid::new_v4()),
        Err(AppError::BudgetNotFound(_))
    ));
}

#[test]
fn test_set_budget_spent() -> Result<()> {
    let mut service = test_service();
    let housing = category(&service, "Housing").id;
    let budget = service.add_budget(housing, 100_000, BudgetPeriod::Monthly, 80.0)?;

    let updated = service.set_budget_spent(budget.id, 85_000)?;
    assert_eq!(updated.spent, 85_000);
    let statuses = service.budget_statuses(parse_date("2024-06-20"));
    assert!(statuses[0].alert);
    assert!(!statuses[0].exceeded);

    assert!(matches!(
        service.set_budget_spent(budget.id, -1),
        Err(AppError::InvalidAmount(-1))
    ));
    assert!(matches!(
        service.set_budget_spent(Uuid::new_v4(), 1),
        Err(AppError::BudgetNotFound(_))
    ));

    Ok(())
}

#[test]
fn test_current_balance_respects_as_of() -> Result<()> {
    let mut service = test_service();
    record(&mut service, TransactionType::Revenue, 10_000, "Salary", "2024-01-01")?;
    record(&mut service, TransactionType::Expense, 2_500, "Shopping", "2024-01-15")?;
    record(&mut service, TransactionType::Expense, 1_000, "Shopping", "2024-02-01")?;

    assert_eq!(service.current_balance(parse_date("2023-12-31")), 0);
    assert_eq!(service.current_balance(parse_date("2024-01-15")), 7_500);
    assert_eq!(service.current_balance(parse_date("2024-12-31")), 6_500);

    Ok(())
}
