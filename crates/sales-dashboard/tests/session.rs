use std::io::Cursor;
use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sales_dashboard::{
    ConfigError, DashboardConfig, DashboardSession, DateWindow, FilterSelection, RenderRequest,
    SessionError,
};
use sales_model::{CsvOptions, Dataset, GeoTable, ImportError, LoadError, LoadReport};

const ORDERS: &str = "\
Region,State,Product Name,Sales,Profit,Order Date,Ship Date
A,Texas,Widget,100,20,11/08/2016,11/12/2016
A,Texas,Widget,50,-5,11/08/2016,
B,Ohio,Gadget,10,1,06/12/2016,not a date
B,Ohio,Gadget,12,2,sometime,06/20/2016
";

fn session() -> DashboardSession {
    DashboardSession::from_csv(
        Cursor::new(ORDERS),
        &CsvOptions::default(),
        Arc::new(GeoTable::us_states()),
        DashboardConfig::default(),
    )
    .unwrap()
}

fn region(name: &str) -> RenderRequest {
    RenderRequest::new(FilterSelection::all().with_region(name))
}

#[test]
fn loads_csv_and_keeps_the_report() {
    let session = session();
    assert_eq!(session.dataset().len(), 3);
    assert_eq!(session.report().total_rows, 4);
    assert_eq!(session.report().unparseable_dates, 1);
    assert_eq!(session.report().cleared_ship_dates, 1);
    assert_eq!(session.geo().len(), 52);
}

#[test]
fn missing_column_fails_the_session() {
    let err = DashboardSession::from_csv(
        Cursor::new("Region,State,Sales\nA,Texas,1\n"),
        &CsvOptions::default(),
        Arc::new(GeoTable::us_states()),
        DashboardConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Load(LoadError::MissingField { ref column }) if column == "Product Name"
    ));
}

#[test]
fn empty_csv_fails_the_session() {
    let err = DashboardSession::from_csv(
        Cursor::new(""),
        &CsvOptions::default(),
        Arc::new(GeoTable::us_states()),
        DashboardConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SessionError::Import(ImportError::EmptyInput)));
}

#[test]
fn invalid_config_is_rejected_by_every_constructor() {
    let reversed = DashboardConfig {
        fallback_window: DateWindow {
            start: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        },
        ..DashboardConfig::default()
    };
    let zero_top_n = DashboardConfig {
        top_n: 0,
        ..DashboardConfig::default()
    };
    let zero_width = DashboardConfig {
        label_width: 0,
        ..DashboardConfig::default()
    };

    let err = DashboardSession::new(
        Arc::new(Dataset::default()),
        Arc::new(GeoTable::us_states()),
        reversed.clone(),
        LoadReport::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidFallbackWindow { .. }));

    let err = DashboardSession::from_csv(
        Cursor::new(ORDERS),
        &CsvOptions::default(),
        Arc::new(GeoTable::us_states()),
        zero_top_n,
    )
    .unwrap_err();
    assert!(matches!(err, SessionError::Config(ConfigError::ZeroTopN)));

    let table = sales_model::import_csv(Cursor::new(ORDERS), &CsvOptions::default()).unwrap();
    let err = DashboardSession::load(&table, Arc::new(GeoTable::us_states()), zero_width)
        .unwrap_err();
    assert!(matches!(err, SessionError::Config(ConfigError::ZeroLabelWidth)));

    let err = DashboardSession::load(&table, Arc::new(GeoTable::us_states()), reversed)
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Config(ConfigError::InvalidFallbackWindow { .. })
    ));
}

#[test]
fn nothing_is_published_before_the_first_refresh() {
    assert!(session().latest().is_none());
}

#[test]
fn refresh_publishes_the_rendered_view() {
    let session = session();
    assert!(session.refresh(&region("A")));
    let latest = session.latest().unwrap();
    assert_eq!(latest.row_count, 2);
    assert_eq!(*latest, session.render(&region("A")));
}

#[test]
fn superseded_renders_are_discarded() {
    let session = session();
    let slow = session.begin_refresh();
    let fast = session.begin_refresh();
    assert!(slow < fast);

    assert!(session.publish(fast, session.render(&region("B"))));
    assert!(!session.publish(slow, session.render(&region("A"))));
    assert_eq!(session.latest().unwrap().row_count, 1);
}

#[test]
fn a_newer_ticket_blocks_an_older_unpublished_one() {
    let session = session();
    let first = session.begin_refresh();
    let _second = session.begin_refresh();

    assert!(!session.publish(first, session.render(&region("A"))));
    assert!(session.latest().is_none());
}

#[test]
fn concurrent_refreshes_leave_the_newest_ticket_published() {
    let session = session();
    let tickets: Vec<_> = (0..8).map(|_| session.begin_refresh()).collect();
    let newest = *tickets.last().unwrap();

    std::thread::scope(|scope| {
        for (idx, ticket) in tickets.iter().copied().enumerate() {
            let session = &session;
            scope.spawn(move || {
                let request = if idx % 2 == 0 { region("A") } else { region("B") };
                session.publish(ticket, session.render(&request))
            });
        }
    });

    // Ticket 8 rendered region "B" (idx 7).
    assert_eq!(newest.generation(), 8);
    assert_eq!(session.latest().unwrap().row_count, 1);
}
