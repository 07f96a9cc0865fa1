use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use customerd::{
    customer::{Customer, CustomerChanges, NewCustomer},
    error::PipelineError,
    pipeline,
    store::{RecordStore, memory::MemoryStore, sqlite::SqliteStore},
    types::CustomerId,
    validate::ListQuery,
};

#[derive(Debug, Clone)]
enum Action {
    Create { email_idx: u8, day: u8 },
    ChangeEmail { target: u8, email_idx: u8 },
    ChangeName { target: u8, name_idx: u8 },
    Delete { target: u8 },
    DeleteMissing { offset: u8 },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u8..12, 1u8..29).prop_map(|(email_idx, day)| Action::Create { email_idx, day }),
        (0u8..24, 0u8..12)
            .prop_map(|(target, email_idx)| Action::ChangeEmail { target, email_idx }),
        (0u8..24, 0u8..8).prop_map(|(target, name_idx)| Action::ChangeName { target, name_idx }),
        (0u8..24).prop_map(|target| Action::Delete { target }),
        (1u8..8).prop_map(|offset| Action::DeleteMissing { offset }),
    ]
}

fn email(idx: u8) -> String {
    format!("user{idx}@example.com")
}

fn input(email_idx: u8, day: u8) -> NewCustomer {
    NewCustomer {
        first_name: Some(format!("F{email_idx}")),
        last_name: Some("Prop".to_string()),
        email: Some(email(email_idx)),
        date_of_birth: Some(format!("1990-02-{day:02}")),
    }
}

/// Mirrors the store contents independently of any backend.
#[derive(Default)]
struct Model {
    rows: BTreeMap<CustomerId, Customer>,
    max_id: CustomerId,
}

impl Model {
    fn email_owner(&self, email: &str) -> Option<CustomerId> {
        self.rows.values().find(|r| r.email == email).map(|r| r.id)
    }

    fn pick(&self, target: u8) -> Option<CustomerId> {
        if self.rows.is_empty() {
            return None;
        }
        self.rows.keys().nth(usize::from(target) % self.rows.len()).copied()
    }
}

fn fail(err: PipelineError) -> TestCaseError {
    TestCaseError::fail(err.to_string())
}

fn run(store: &mut dyn RecordStore, actions: &[Action]) -> Result<(), TestCaseError> {
    let mut model = Model::default();

    for action in actions {
        match *action {
            Action::Create { email_idx, day } => {
                let res = pipeline::create(store, input(email_idx, day));
                match model.email_owner(&email(email_idx)) {
                    Some(_) => {
                        prop_assert!(
                            matches!(res, Err(PipelineError::DuplicateKey { .. })),
                            "{res:?}"
                        );
                    }
                    None => {
                        let rec = res.map_err(fail)?;
                        prop_assert!(rec.id > model.max_id, "id {} not fresh", rec.id);
                        prop_assert_eq!(
                            rec.date_of_birth,
                            NaiveDate::from_ymd_opt(1990, 2, u32::from(day)).expect("date")
                        );
                        model.max_id = rec.id;
                        model.rows.insert(rec.id, rec);
                    }
                }
            }
            Action::ChangeEmail { target, email_idx } => {
                let Some(id) = model.pick(target) else { continue };
                let wanted = email(email_idx);
                let res = pipeline::update(
                    store,
                    id,
                    CustomerChanges {
                        email: Some(wanted.clone()),
                        ..CustomerChanges::default()
                    },
                );
                match model.email_owner(&wanted) {
                    Some(owner) if owner != id => {
                        prop_assert!(
                            matches!(res, Err(PipelineError::DuplicateKey { .. })),
                            "{res:?}"
                        );
                    }
                    _ => {
                        let rec = res.map_err(fail)?;
                        prop_assert_eq!(&rec.email, &wanted);
                        model.rows.insert(id, rec);
                    }
                }
            }
            Action::ChangeName { target, name_idx } => {
                let Some(id) = model.pick(target) else { continue };
                let rec = pipeline::update(
                    store,
                    id,
                    CustomerChanges {
                        last_name: Some(format!("L{name_idx}")),
                        ..CustomerChanges::default()
                    },
                )
                .map_err(fail)?;
                let before = &model.rows[&id];
                prop_assert_eq!(&rec.first_name, &before.first_name);
                prop_assert_eq!(&rec.email, &before.email);
                prop_assert_eq!(rec.date_of_birth, before.date_of_birth);
                model.rows.insert(id, rec);
            }
            Action::Delete { target } => {
                let Some(id) = model.pick(target) else { continue };
                pipeline::delete(store, id).map_err(fail)?;
                model.rows.remove(&id);
            }
            Action::DeleteMissing { offset } => {
                let id = model.max_id + CustomerId::from(offset);
                prop_assert!(
                    matches!(pipeline::delete(store, id), Err(PipelineError::NotFound(_))),
                    "delete of never-issued id {id}"
                );
            }
        }

        // Emails stay unique among live rows.
        let mut emails: Vec<_> = model.rows.values().map(|r| r.email.as_str()).collect();
        emails.sort_unstable();
        emails.dedup();
        prop_assert_eq!(emails.len(), model.rows.len());
    }

    let listed = pipeline::list(&*store, &ListQuery::page(0, 1000)).map_err(fail)?;
    let expected: Vec<Customer> = model.rows.values().cloned().collect();
    prop_assert_eq!(&listed, &expected);

    for rec in &expected {
        prop_assert_eq!(&pipeline::get(&*store, rec.id).map_err(fail)?, rec);
    }

    let in_range = pipeline::list(&*store, &ListQuery::range("1990-02-10", "1990-02-20"))
        .map_err(fail)?;
    let expected_range: Vec<Customer> = expected
        .iter()
        .filter(|r| (10..=20).contains(&r.date_of_birth.day()))
        .cloned()
        .collect();
    prop_assert_eq!(in_range, expected_range);

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn memory_store_matches_model(actions in prop::collection::vec(action_strategy(), 1..120)) {
        let mut store = MemoryStore::new();
        run(&mut store, &actions)?;
    }

    #[test]
    fn sqlite_store_matches_model(actions in prop::collection::vec(action_strategy(), 1..120)) {
        let mut store = SqliteStore::open_in_memory().expect("open sqlite");
        run(&mut store, &actions)?;
    }
}
