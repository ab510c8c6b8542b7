use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use incentive::aggregate::Aggregator;
use incentive::api::{allocation, dashboard, sales, settings};
use incentive::auth::auth::AuthUser;
use incentive::calc::CalculationModel;
use incentive::error::CoreError;
use incentive::model::allocation::AllocationKind;
use incentive::model::money::{Money, Percent};
use incentive::model::period::{PeriodQuery, YearMonth};
use incentive::model::role::Role;
use incentive::model::sales::{NewSalesEntry, SalesTotals};
use incentive::model::team::Team;
use incentive::model::user::Employee;
use incentive::store::{MemoryStore, Store};

fn admin() -> AuthUser {
    AuthUser {
        user_id: 100,
        email: "admin@example.com".to_string(),
        role: Role::Admin,
        team: None,
    }
}

fn member(id: u64, name: &str, role: Role, team: Option<Team>) -> Employee {
    Employee {
        id,
        email: format!("{}@example.com", name.to_lowercase()),
        name: name.to_string(),
        role,
        team,
    }
}

fn caller(employee: &Employee) -> AuthUser {
    AuthUser {
        user_id: employee.id,
        email: employee.email.clone(),
        role: employee.role,
        team: employee.team,
    }
}

fn june() -> YearMonth {
    YearMonth::new(2025, 6).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn new_entry(amount: Money, profit: Money) -> NewSalesEntry {
    NewSalesEntry {
        year: Some(2025),
        month: Some(6),
        amount: Some(amount),
        profit,
        description: Some("  kitchen remodel ".to_string()),
        entry_date: None,
    }
}

/// Roster of three teams, 25%/10% company ratios and June salaries of
/// 1,000,000 / 600,000 / 400,000.
async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.upsert_employee(member(1, "Ahn", Role::TeamLeader, Some(Team::Design))).await;
    store.upsert_employee(member(2, "Baek", Role::Employee, Some(Team::Field))).await;
    store.upsert_employee(member(3, "Choi", Role::Employee, Some(Team::Sales))).await;
    store.upsert_employee(member(4, "Do", Role::Employee, Some(Team::Design))).await;

    settings::update_settings(
        &admin(),
        &store,
        &json!({ "labor_cost_ratio": 25, "incentive_ratio": 10 }),
    )
    .await
    .unwrap();

    allocation::submit(
        &admin(),
        &store,
        AllocationKind::Salary,
        &json!({
            "year": 2025,
            "month": 6,
            "salaries": [
                { "user_id": 1, "amount": 1000000 },
                { "user_id": 2, "amount": 600000 },
                { "user_id": 3, "amount": 400000 }
            ]
        }),
    )
    .await
    .unwrap();

    store
}

#[tokio::test]
async fn summary_without_settings_is_not_configured() {
    let store = MemoryStore::new();
    let result = dashboard::summary(
        &store,
        CalculationModel::ProfitBased,
        PeriodQuery::default(),
        today(),
    )
    .await;
    assert!(matches!(result, Err(CoreError::NotConfigured)));
}

#[tokio::test]
async fn settings_update_fills_team_defaults() {
    let store = seeded_store().await;
    let saved = settings::get_settings(&store).await.unwrap();

    assert_eq!(saved.labor_cost_ratio, Percent::whole(25));
    assert_eq!(saved.design_team_labor_cost_ratio, Percent::whole(20));
    assert_eq!(saved.sales_team_incentive_ratio, Percent::whole(10));
    assert!(saved.updated_at.is_some());
}

#[tokio::test]
async fn settings_update_rejects_out_of_range_ratio() {
    let store = MemoryStore::new();
    let result = settings::update_settings(
        &admin(),
        &store,
        &json!({ "labor_cost_ratio": 125, "incentive_ratio": 10 }),
    )
    .await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
    assert!(store.load_settings().await.unwrap().is_none());
}

#[tokio::test]
async fn profit_summary_serializes_flat_record() {
    let store = seeded_store().await;
    sales::add_sales_entry(
        &admin(),
        &store,
        new_entry(Money::new(dec!(10000000)), Money::new(dec!(9000000))),
    )
    .await
    .unwrap();
    allocation::submit(
        &admin(),
        &store,
        AllocationKind::Incentive,
        &json!({ "year": 2025, "month": 6, "incentives": [{ "user_id": 1, "amount": 150000 }] }),
    )
    .await
    .unwrap();

    let summary = dashboard::summary(
        &store,
        CalculationModel::ProfitBased,
        PeriodQuery::default(),
        today(),
    )
    .await
    .unwrap();
    let value = serde_json::to_value(&summary).unwrap();

    assert_eq!(value["year"], json!(2025));
    assert_eq!(value["month"], json!(6));
    assert_eq!(value["model"], json!("profit_based"));
    assert_eq!(value["totalLaborCost"], json!(2000000.0));
    assert_eq!(value["targetProfit"], json!(8000000.0));
    assert_eq!(value["excessProfit"], json!(1000000.0));
    assert_eq!(value["incentiveTotal"], json!(100000.0));
    assert_eq!(value["designTeamLaborCost"], json!(1000000.0));
    assert_eq!(value["designTeamTargetProfit"], json!(5000000.0));
    assert_eq!(value["fieldTeamExcessProfit"], json!(6000000.0));
    assert_eq!(value["salesTeamIncentive"], json!(700000.0));
    assert_eq!(value["distributedIncentive"], json!(150000.0));
    assert!(value.get("targetSales").is_none());
}

#[tokio::test]
async fn sales_summary_prorates_team_shares() {
    let store = seeded_store().await;
    sales::add_sales_entry(
        &admin(),
        &store,
        new_entry(Money::new(dec!(10000000)), Money::ZERO),
    )
    .await
    .unwrap();

    let summary = dashboard::summary(
        &store,
        CalculationModel::SalesBased,
        PeriodQuery::new(2025, 6),
        today(),
    )
    .await
    .unwrap();

    // pool = (10,000,000 - 8,000,000) * 10%; teams get 20/25 of it each
    assert_eq!(summary.result.company.incentive_total, Money::new(dec!(200000)));
    for (_, team) in summary.result.teams.iter() {
        assert_eq!(team.incentive, Money::new(dec!(160000)));
        assert!(team.target.is_none());
    }
    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["targetSales"], json!(8000000.0));
    assert!(value.get("designTeamTargetSales").is_none());
}

#[tokio::test]
async fn deleting_the_only_entry_leaves_a_zero_aggregate() {
    let store = seeded_store().await;
    let entry = sales::add_sales_entry(
        &admin(),
        &store,
        new_entry(Money::new(dec!(500)), Money::new(dec!(120))),
    )
    .await
    .unwrap();
    assert_eq!(entry.description.as_deref(), Some("kitchen remodel"));

    let removed = sales::delete_sales_entry(&admin(), &store, entry.id).await.unwrap();
    assert_eq!(removed.id, entry.id);

    let month = sales::list_sales(&store, PeriodQuery::new(2025, 6)).await.unwrap();
    assert!(month.entries.is_empty());
    assert_eq!(month.aggregate, Some(SalesTotals::default()));
}

#[tokio::test]
async fn deleting_an_unknown_entry_is_not_found() {
    let store = seeded_store().await;
    let result = sales::delete_sales_entry(&admin(), &store, 42).await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn failed_recompute_rolls_back_the_entry() {
    let store = seeded_store().await;
    sales::add_sales_entry(
        &admin(),
        &store,
        new_entry(Money::new(Decimal::MAX), Money::ZERO),
    )
    .await
    .unwrap();
    let before = store.sales_aggregate(june()).await.unwrap();

    let result = sales::add_sales_entry(
        &admin(),
        &store,
        new_entry(Money::new(dec!(1)), Money::ZERO),
    )
    .await;

    assert!(matches!(result, Err(CoreError::Overflow(_))));
    assert_eq!(store.sales_entries(june()).await.unwrap().len(), 1);
    assert_eq!(store.sales_aggregate(june()).await.unwrap(), before);
}

#[tokio::test]
async fn cached_aggregate_matches_recomputed_entries() {
    let store = seeded_store().await;
    let mut ids = Vec::new();
    for (amount, profit) in [(dec!(1000), dec!(300)), (dec!(2500), dec!(-200)), (dec!(750), dec!(75))] {
        let entry = sales::add_sales_entry(
            &admin(),
            &store,
            new_entry(Money::new(amount), Money::new(profit)),
        )
        .await
        .unwrap();
        ids.push(entry.id);
    }
    sales::delete_sales_entry(&admin(), &store, ids[1]).await.unwrap();

    let aggregator = Aggregator::new(&store);
    let cached = aggregator.sales(june()).await.unwrap();
    assert_eq!(cached, aggregator.recomputed_sales(june()).await.unwrap());
    assert_eq!(cached.amount, Money::new(dec!(1750)));
    assert_eq!(cached.profit, Money::new(dec!(375)));
}

#[tokio::test]
async fn sales_mutations_are_admin_only() {
    let store = seeded_store().await;
    let leader = caller(&member(1, "Ahn", Role::TeamLeader, Some(Team::Design)));
    let result = sales::add_sales_entry(
        &leader,
        &store,
        new_entry(Money::new(dec!(10)), Money::ZERO),
    )
    .await;

    assert!(matches!(result, Err(CoreError::Forbidden(_))));
    assert!(store.sales_aggregate(june()).await.unwrap().is_none());
}

#[tokio::test]
async fn team_totals_follow_the_current_roster() {
    let store = seeded_store().await;
    let aggregator = Aggregator::new(&store);

    let before = aggregator.team_labor_costs(june()).await.unwrap();
    assert_eq!(before[Team::Design], Money::new(dec!(1000000)));
    assert_eq!(before[Team::Field], Money::new(dec!(600000)));

    store.upsert_employee(member(1, "Ahn", Role::TeamLeader, Some(Team::Field))).await;

    let after = aggregator.team_labor_costs(june()).await.unwrap();
    assert_eq!(after[Team::Design], Money::ZERO);
    assert_eq!(after[Team::Field], Money::new(dec!(1600000)));
    assert_eq!(
        aggregator.labor_cost(june(), None).await.unwrap(),
        Money::new(dec!(2000000))
    );
}

#[tokio::test]
async fn salary_listing_is_scoped_by_role() {
    let store = seeded_store().await;
    allocation::submit(
        &admin(),
        &store,
        AllocationKind::Salary,
        &json!({ "year": 2025, "month": 6, "salaries": [{ "user_id": 4, "amount": 300000 }] }),
    )
    .await
    .unwrap();
    let query = PeriodQuery::new(2025, 6);

    let everything = allocation::list(&admin(), &store, AllocationKind::Salary, query, None)
        .await
        .unwrap();
    let names: Vec<&str> = everything.iter().map(|row| row.user_name.as_str()).collect();
    assert_eq!(names, ["Ahn", "Baek", "Choi", "Do"]);

    let field = allocation::list(&admin(), &store, AllocationKind::Salary, query, Some(Team::Field))
        .await
        .unwrap();
    assert_eq!(field.len(), 1);
    assert_eq!(field[0].user_id, 2);

    let leader = caller(&member(1, "Ahn", Role::TeamLeader, Some(Team::Design)));
    let design = allocation::list(&leader, &store, AllocationKind::Salary, query, Some(Team::Sales))
        .await
        .unwrap();
    assert_eq!(design.iter().map(|row| row.user_id).collect::<Vec<_>>(), [1, 4]);

    let employee = caller(&member(3, "Choi", Role::Employee, Some(Team::Sales)));
    let own = allocation::list(&employee, &store, AllocationKind::Salary, query, None)
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].amount, Money::new(dec!(400000)));
}

#[tokio::test]
async fn resubmitting_a_salary_overwrites_it() {
    let store = seeded_store().await;
    allocation::submit(
        &admin(),
        &store,
        AllocationKind::Salary,
        &json!({ "year": 2025, "month": 6, "salaries": [{ "user_id": 2, "amount": 650000 }] }),
    )
    .await
    .unwrap();

    let total = Aggregator::new(&store).labor_cost(june(), None).await.unwrap();
    assert_eq!(total, Money::new(dec!(2050000)));
}

#[tokio::test]
async fn empty_submission_is_rejected() {
    let store = seeded_store().await;
    let result = allocation::submit(
        &admin(),
        &store,
        AllocationKind::Incentive,
        &json!({ "year": 2025, "month": 6, "incentives": [] }),
    )
    .await;
    assert!(matches!(result, Err(CoreError::Validation(_))));
}

#[tokio::test]
async fn chart_covers_twelve_months_with_zero_fill() {
    let store = seeded_store().await;
    let january = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();

    let points = dashboard::chart(&store, CalculationModel::SalesBased, january)
        .await
        .unwrap();

    assert_eq!(points.len(), 12);
    assert_eq!(points[0].period, YearMonth::new(2025, 2).unwrap());
    assert_eq!(points[11].period, YearMonth::new(2026, 1).unwrap());

    let june_point = points.iter().find(|point| point.period == june()).unwrap();
    assert_eq!(june_point.labor_cost, Money::new(dec!(2000000)));
    assert_eq!(june_point.target, Money::new(dec!(8000000)));
    assert_eq!(june_point.actual, Money::ZERO);

    let empty = &points[0];
    assert_eq!(empty.labor_cost, Money::ZERO);
    assert_eq!(empty.target, Money::ZERO);
}
