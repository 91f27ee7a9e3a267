use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame};

use mrdc_clean::{AgePolicy, CleanContext, CleanError, clean_frame};
use mrdc_model::{Entity, canonical_columns};
use mrdc_standards::CardLengthRegistry;

fn context() -> CleanContext {
    let now = NaiveDate::from_ymd_opt(2024, 6, 1)
        .expect("date")
        .and_hms_opt(12, 0, 0)
        .expect("time");
    CleanContext::load_default().expect("standards").with_now(now)
}

fn opt_frame(names: &[&str], rows: &[Vec<Option<&str>>]) -> DataFrame {
    let columns = names
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let values: Vec<Option<String>> = rows
                .iter()
                .map(|row| row[col].map(str::to_string))
                .collect();
            Column::new((*name).into(), values)
        })
        .collect();
    DataFrame::new(columns).expect("frame")
}

fn frame(names: &[&str], rows: &[Vec<&str>]) -> DataFrame {
    let wrapped: Vec<Vec<Option<&str>>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| Some(*cell)).collect())
        .collect();
    opt_frame(names, &wrapped)
}

fn column_names(df: &DataFrame) -> Vec<&str> {
    df.get_column_names().iter().map(|n| n.as_str()).collect()
}

fn canonical_names(entity: Entity) -> Vec<&'static str> {
    canonical_columns(entity).iter().map(|c| c.name).collect()
}

fn str_cell(df: &DataFrame, name: &str, idx: usize) -> Option<String> {
    df.column(name)
        .expect("column")
        .str()
        .expect("utf8")
        .get(idx)
        .map(str::to_string)
}

fn f64_cell(df: &DataFrame, name: &str, idx: usize) -> Option<f64> {
    df.column(name)
        .expect("column")
        .f64()
        .expect("f64")
        .get(idx)
}

fn i64_cell(df: &DataFrame, name: &str, idx: usize) -> Option<i64> {
    df.column(name)
        .expect("column")
        .i64()
        .expect("i64")
        .get(idx)
}

const USER_COLUMNS: [&str; 12] = [
    "index",
    "first_name",
    "last_name",
    "date_of_birth",
    "company",
    "email_address",
    "address",
    "country",
    "country_code",
    "phone_number",
    "join_date",
    "user_uuid",
];

fn user_row(
    index: &'static str,
    dob: &'static str,
    code: &'static str,
    join: &'static str,
    uuid: &'static str,
) -> Vec<&'static str> {
    vec![
        index,
        "Sigfried",
        "Noack",
        dob,
        "Rudolph GmbH",
        "s.noack@example.de",
        "Flat 2, Example House",
        "Germany",
        code,
        "+49 681 com",
        join,
        uuid,
    ]
}

fn raw_users() -> DataFrame {
    frame(
        &USER_COLUMNS,
        &[
            user_row(
                "0",
                "1990-09-30",
                "DE",
                "2018-10-10",
                "93caf182-e4e9-4c58-a977-9b4cf2f50f6a",
            ),
            user_row(
                "1",
                "16 October 1968",
                "GGB",
                "2001/05/29",
                "8FE96C3A-D62D-4EB5-B313-CF12D9126A49",
            ),
            // Fully corrupt row: dates fail to parse, so it drops as missing.
            user_row("2", "S0AHBM3KEO", "XX", "UZGSD0AEBT", "S0AHBM3KEO"),
            user_row(
                "3",
                "2000-01-01",
                "GB",
                "1999-01-01",
                "44ac2a40-8167-4bdf-ab60-b80eec9b39c7",
            ),
            user_row(
                "4",
                "2000-01-01",
                "GB",
                "2030-01-01",
                "44ac2a40-8167-4bdf-ab60-b80eec9b39c7",
            ),
            user_row("5", "1985-02-28", "GB", "2012-03-04", "not-a-uuid"),
        ],
    )
}

#[test]
fn user_cleaning_keeps_valid_rows_and_repairs_country_codes() {
    let cleaned = clean_frame(Entity::User, raw_users(), &context()).expect("clean");

    assert_eq!(cleaned.height(), 2);
    assert_eq!(column_names(&cleaned), canonical_names(Entity::User));
    assert_eq!(str_cell(&cleaned, "country_code", 0).as_deref(), Some("DE"));
    assert_eq!(str_cell(&cleaned, "country_code", 1).as_deref(), Some("GB"));
    assert_eq!(
        str_cell(&cleaned, "date_of_birth", 1).as_deref(),
        Some("1968-10-16")
    );
    assert_eq!(
        str_cell(&cleaned, "join_date", 1).as_deref(),
        Some("2001-05-29")
    );
    assert_eq!(i64_cell(&cleaned, "index", 1), Some(1));
}

#[test]
fn bounded_age_policy_drops_minors_the_permissive_policy_keeps() {
    let df = frame(
        &USER_COLUMNS,
        &[
            user_row(
                "0",
                "2015-01-01",
                "GB",
                "2023-01-01",
                "93caf182-e4e9-4c58-a977-9b4cf2f50f6a",
            ),
            user_row(
                "1",
                "1990-09-30",
                "GB",
                "2018-10-10",
                "8fe96c3a-d62d-4eb5-b313-cf12d9126a49",
            ),
        ],
    );

    let permissive = clean_frame(Entity::User, df.clone(), &context()).expect("clean");
    assert_eq!(permissive.height(), 2);

    let bounded_ctx = context().with_age_policy(AgePolicy::Bounded);
    let bounded = clean_frame(Entity::User, df, &bounded_ctx).expect("clean");
    assert_eq!(bounded.height(), 1);
    assert_eq!(
        str_cell(&bounded, "date_of_birth", 0).as_deref(),
        Some("1990-09-30")
    );
}

#[test]
fn user_cleaning_is_idempotent() {
    let ctx = context();
    let once = clean_frame(Entity::User, raw_users(), &ctx).expect("first pass");
    let twice = clean_frame(Entity::User, once.clone(), &ctx).expect("second pass");
    assert!(once.equals_missing(&twice));
}

const CARD_COLUMNS: [&str; 4] = [
    "card_number",
    "expiry_date",
    "card_provider",
    "date_payment_confirmed",
];

fn raw_cards() -> DataFrame {
    opt_frame(
        &CARD_COLUMNS,
        &[
            vec![
                Some("4971858637664481"),
                Some("09/26"),
                Some("Visa 16 digit"),
                Some("2021-05-29"),
            ],
            vec![
                Some("?? 344132437598598 ?"),
                Some("10/27"),
                Some("American Express"),
                Some("2020/01/02"),
            ],
            vec![
                Some("VAB4childish99"),
                Some("12/28"),
                Some("Visa 16 digit"),
                Some("2019-03-04"),
            ],
            // 14 digits against a 16 digit provider.
            vec![
                Some("49718586376644"),
                Some("09/26"),
                Some("Visa 16 digit"),
                Some("2021-05-29"),
            ],
            vec![
                Some("5491987026852345"),
                Some("11/26"),
                Some("Bank of Nowhere"),
                Some("2021-05-29"),
            ],
            vec![None, None, None, None],
        ],
    )
}

#[test]
fn card_cleaning_strips_padding_and_validates_lengths() {
    let cleaned = clean_frame(Entity::Card, raw_cards(), &context()).expect("clean");

    assert_eq!(cleaned.height(), 2);
    assert_eq!(column_names(&cleaned), canonical_names(Entity::Card));
    assert_eq!(i64_cell(&cleaned, "card_number", 0), Some(4971858637664481));
    assert_eq!(i64_cell(&cleaned, "card_number", 1), Some(344132437598598));
    assert_eq!(i64_cell(&cleaned, "index", 0), Some(0));
    assert_eq!(i64_cell(&cleaned, "index", 1), Some(1));
    assert_eq!(str_cell(&cleaned, "expiry_date", 0).as_deref(), Some("09/26"));
    assert_eq!(
        str_cell(&cleaned, "date_payment_confirmed", 1).as_deref(),
        Some("2020-01-02")
    );
}

#[test]
fn card_cleaning_is_idempotent() {
    let ctx = context();
    let once = clean_frame(Entity::Card, raw_cards(), &ctx).expect("first pass");
    let twice = clean_frame(Entity::Card, once.clone(), &ctx).expect("second pass");
    assert!(once.equals_missing(&twice));
}

#[test]
fn oversized_card_numbers_abort_as_contract_violations() {
    // Nineteen nines passes the length check for a 19 digit provider but
    // overflows a 64-bit integer, which the strict coercion must surface.
    let df = frame(
        &CARD_COLUMNS,
        &[vec![
            "9999999999999999999",
            "09/26",
            "VISA 19 digit",
            "2021-05-29",
        ]],
    );
    let err = clean_frame(Entity::Card, df, &context()).expect_err("overflow");
    assert!(matches!(
        err,
        CleanError::Contract {
            entity: Entity::Card,
            ..
        }
    ));
}

#[test]
fn narrowed_registry_drops_providers_it_does_not_know() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("card_lengths.toml");
    std::fs::write(&path, "[lengths]\n16 = [\"Visa 16 digit\"]\n").expect("write");
    let registry = CardLengthRegistry::load(&path).expect("registry");

    let now = NaiveDate::from_ymd_opt(2024, 6, 1)
        .expect("date")
        .and_hms_opt(12, 0, 0)
        .expect("time");
    let ctx = CleanContext::new(registry).with_now(now);

    let cleaned = clean_frame(Entity::Card, raw_cards(), &ctx).expect("clean");
    // Only the Visa row survives; American Express is no longer registered.
    assert_eq!(cleaned.height(), 1);
    assert_eq!(i64_cell(&cleaned, "card_number", 0), Some(4971858637664481));
}

const STORE_COLUMNS: [&str; 12] = [
    "index",
    "address",
    "longitude",
    "lat",
    "locality",
    "store_code",
    "staff_numbers",
    "opening_date",
    "store_type",
    "latitude",
    "country_code",
    "continent",
];

fn raw_stores() -> DataFrame {
    opt_frame(
        &STORE_COLUMNS,
        &[
            vec![
                Some("0"),
                Some("Flat 72W\nSally isle\nEast Deantown\nE7B 8EB"),
                Some("-0.1257"),
                Some("NULL"),
                Some("High Wycombe"),
                Some("HI-9B97EE4E"),
                Some("34"),
                Some("2014-01-02"),
                Some("Local"),
                Some("51.5074"),
                Some("GB"),
                Some("Europe"),
            ],
            vec![
                Some("1"),
                Some("Heckerstraße 4"),
                Some("6.9603"),
                Some("NULL"),
                Some("Saarbrücken"),
                Some("SA-C1B2D3E4"),
                Some("3n9"),
                Some("2016 October 15"),
                Some("Super Store"),
                Some("45.12394"),
                Some("DE"),
                Some("eeEurope"),
            ],
            // The web store row has no physical location.
            vec![
                Some("2"),
                None,
                None,
                None,
                None,
                Some("WEB-1388012W"),
                Some("325"),
                Some("2010-06-12"),
                Some("Web Portal"),
                None,
                Some("GB"),
                Some("Europe"),
            ],
            vec![
                Some("3"),
                Some("XQLG9SNP1A"),
                Some("XQLG9SNP1A"),
                Some("XQLG9SNP1A"),
                Some("XQLG9SNP1A"),
                Some("XQLG9SNP1A"),
                Some("XQLG9SNP1A"),
                Some("XQLG9SNP1A"),
                Some("XQLG9SNP1A"),
                Some("XQLG9SNP1A"),
                Some("XQLG9SNP1A"),
                Some("XQLG9SNP1A"),
            ],
            vec![
                Some("4"),
                Some("1 Ocean Drive"),
                Some("-120.5"),
                Some("NULL"),
                Some("Valparaíso"),
                Some("VA-55AA66BB"),
                Some("12"),
                Some("2019-11-23"),
                Some("Outlet"),
                Some("91.2345"),
                Some("CL"),
                Some("eeAmerica"),
            ],
        ],
    )
}

#[test]
fn store_cleaning_repairs_continents_and_bounds_coordinates() {
    let cleaned = clean_frame(Entity::Store, raw_stores(), &context()).expect("clean");

    assert_eq!(cleaned.height(), 4);
    assert_eq!(column_names(&cleaned), canonical_names(Entity::Store));

    assert_eq!(
        str_cell(&cleaned, "address", 0).as_deref(),
        Some("Flat 72W, Sally isle, East Deantown, E7B 8EB")
    );
    assert_eq!(str_cell(&cleaned, "continent", 1).as_deref(), Some("Europe"));
    assert_eq!(str_cell(&cleaned, "continent", 3).as_deref(), Some("America"));
    assert_eq!(f64_cell(&cleaned, "latitude", 1), Some(45.1239));

    let staff = cleaned.column("staff_numbers").expect("staff");
    assert_eq!(staff.i32().expect("i32").get(1), Some(39));
    assert_eq!(staff.i32().expect("i32").get(2), Some(325));

    // The web store keeps its row with null coordinates.
    assert_eq!(str_cell(&cleaned, "store_code", 2).as_deref(), Some("WEB-1388012W"));
    assert_eq!(f64_cell(&cleaned, "latitude", 2), None);

    // Out-of-range coordinates are nulled, not dropped.
    assert_eq!(f64_cell(&cleaned, "latitude", 3), None);
    assert_eq!(f64_cell(&cleaned, "longitude", 3), None);
    assert_eq!(
        str_cell(&cleaned, "opening_date", 1).as_deref(),
        Some("2016-10-15")
    );
}

const PRODUCT_COLUMNS: [&str; 10] = [
    "index",
    "product_name",
    "product_price",
    "weight",
    "category",
    "EAN",
    "date_added",
    "uuid",
    "removed",
    "product_code",
];

fn product_row(
    index: &'static str,
    name: &'static str,
    weight: &'static str,
    date_added: &'static str,
    code: &'static str,
) -> Vec<&'static str> {
    vec![
        index,
        name,
        "£9.99",
        weight,
        "homeware",
        "7425710935115",
        date_added,
        "83dc0a69-f96f-4c34-bcb7-928acae19a94",
        "Still_avaliable",
        code,
    ]
}

fn raw_products() -> DataFrame {
    frame(
        &PRODUCT_COLUMNS,
        &[
            product_row("0", "Tiered Hanging Basket", "2 x 200g", "2018-10-22", "H2-1"),
            product_row("1", "Dried Flowers", "16oz", "2017-01-31", "H2-2"),
            product_row("2", "Scented Candle", "500g", "2013/04/16", "H2-3"),
            product_row("3", "Cast Iron Pot", "0.77kg", "2019-09-09", "H2-4"),
            product_row("4", "Corrupt Entry", "MX180RYSHX", "QI1CL1BD6I", "H2-5"),
            product_row("5", "Russell Hobbs Toaster", "20g", "2020-02-11", "H2-6"),
            product_row("6", "Tiered Hanging Basket", "2 x 200g", "2018-10-22", "H2-7"),
            product_row("7", "Mystery Seeds", "120g", "not a date", "H2-8"),
        ],
    )
}

#[test]
fn product_weights_convert_to_kilograms() {
    let cleaned = clean_frame(Entity::Product, raw_products(), &context()).expect("clean");

    assert_eq!(cleaned.height(), 6);
    assert_eq!(column_names(&cleaned), canonical_names(Entity::Product));

    let close = |idx: usize, expected: f64| {
        let got = f64_cell(&cleaned, "weight", idx).expect("weight");
        assert!((got - expected).abs() < 1e-9, "row {idx}: {got} != {expected}");
    };
    close(0, 0.4);
    close(1, 16.0 / 35.27);
    close(2, 0.5);
    close(3, 0.77);
    close(4, 20.0);

    assert_eq!(
        str_cell(&cleaned, "date_added", 2).as_deref(),
        Some("2013-04-16")
    );
    // Unparsable dates stay missing without dropping the row.
    assert_eq!(str_cell(&cleaned, "date_added", 5), None);
    // The duplicate basket row is gone, keeping the first occurrence.
    assert_eq!(str_cell(&cleaned, "product_code", 0).as_deref(), Some("H2-1"));
}

#[test]
fn product_cleaning_is_idempotent() {
    let ctx = context();
    let once = clean_frame(Entity::Product, raw_products(), &ctx).expect("first pass");
    let twice = clean_frame(Entity::Product, once.clone(), &ctx).expect("second pass");
    assert!(once.equals_missing(&twice));
}

const ORDER_COLUMNS: [&str; 11] = [
    "level_0",
    "index",
    "date_uuid",
    "first_name",
    "last_name",
    "user_uuid",
    "card_number",
    "store_code",
    "product_code",
    "1",
    "product_quantity",
];

#[test]
fn order_cleaning_drops_leaked_columns() {
    let df = frame(
        &ORDER_COLUMNS,
        &[
            vec![
                "0",
                "0",
                "6d9fbe46-d1ab-4c05-ad31-dbc9b529b4bb",
                "Dorothy",
                "Kelly",
                "93caf182-e4e9-4c58-a977-9b4cf2f50f6a",
                "4971858637664481",
                "HI-9B97EE4E",
                "H2-1",
                "NULL",
                "3",
            ],
            vec![
                "1",
                "1",
                "2d14b3b6-128e-41b4-bbd9-f8318e029da9",
                "Sigfried",
                "Noack",
                "8fe96c3a-d62d-4eb5-b313-cf12d9126a49",
                "344132437598598",
                "WEB-1388012W",
                "H2-3",
                "NULL",
                "1",
            ],
        ],
    );

    let cleaned = clean_frame(Entity::Order, df, &context()).expect("clean");

    assert_eq!(cleaned.height(), 2);
    assert_eq!(column_names(&cleaned), canonical_names(Entity::Order));
    assert!(!column_names(&cleaned).contains(&"first_name"));
    assert!(!column_names(&cleaned).contains(&"level_0"));
    assert_eq!(i64_cell(&cleaned, "card_number", 1), Some(344132437598598));
    assert_eq!(i64_cell(&cleaned, "product_quantity", 0), Some(3));
}

const EVENT_COLUMNS: [&str; 6] = [
    "timestamp",
    "month",
    "year",
    "day",
    "time_period",
    "date_uuid",
];

fn raw_events() -> DataFrame {
    opt_frame(
        &EVENT_COLUMNS,
        &[
            vec![
                Some("22:00:06"),
                Some("5"),
                Some("2022"),
                Some("21"),
                Some("Evening"),
                Some("3060f00a-7d08-4305-b608-ce7fa7e85acc"),
            ],
            vec![
                Some("09:15:30"),
                Some("11"),
                Some("2012"),
                Some("3"),
                Some("Morning"),
                Some("b2c52a01-d83f-4a34-bb0f-5b0bb4df90c1"),
            ],
            vec![
                Some("9:8:7"),
                Some("5"),
                Some("2022"),
                Some("21"),
                Some("Evening"),
                Some("c0290f26-c356-4af5-a2af-c0ee2f4dc4e1"),
            ],
            vec![
                Some("1JCRGU3GIE"),
                Some("5"),
                Some("2022"),
                Some("21"),
                Some("Evening"),
                Some("d2ad7a52-9c09-42f0-82e2-62ba01b33a39"),
            ],
            vec![
                Some("13:45:00"),
                None,
                Some("2022"),
                Some("21"),
                Some("Midday"),
                Some("e62b27b9-1a4e-428c-a566-5e9969736cfb"),
            ],
            vec![
                Some("13:45:00"),
                Some("13"),
                Some("2022"),
                Some("32"),
                Some("Midday"),
                Some("f0cfec0b-feb5-4f5a-9b7e-2a4e2afea1c2"),
            ],
        ],
    )
}

#[test]
fn event_cleaning_assembles_datetimes_from_split_parts() {
    let cleaned = clean_frame(Entity::Event, raw_events(), &context()).expect("clean");

    assert_eq!(cleaned.height(), 2);
    assert_eq!(column_names(&cleaned), canonical_names(Entity::Event));
    assert_eq!(
        str_cell(&cleaned, "datetime", 0).as_deref(),
        Some("2022-05-21 22:00:06")
    );
    // Single-digit month and day are zero-padded before assembly.
    assert_eq!(
        str_cell(&cleaned, "datetime", 1).as_deref(),
        Some("2012-11-03 09:15:30")
    );
    assert_eq!(str_cell(&cleaned, "time_period", 1).as_deref(), Some("Morning"));
}
