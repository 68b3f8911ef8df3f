//! Property tests for paging and allow-listed ordering.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use clinic_core::db::{QueryPlan, SortKey};
use clinic_core::{ConsultationSort, Database, Pager, Patient, PatientSort, Repository, Sex};
use proptest::prelude::*;

const NAMES: &[&str] = &[
    "Ana Silva",
    "Bruno Souza",
    "Carla Silva",
    "Davi Lima",
    "Eva Costa",
];
const PLANS: &[&str] = &["", "Unimed", "Amil"];
const SEARCHES: &[&str] = &["", "silva", "SOUZA", "p-1", "amil", "a", "zzz", "50%"];

#[derive(Debug, Clone)]
struct Seed {
    name: usize,
    plan: usize,
    year: i32,
    sex: Sex,
}

fn seed_strategy() -> impl Strategy<Value = Seed> {
    (
        0..NAMES.len(),
        0..PLANS.len(),
        1940..2020i32,
        prop_oneof![Just(Sex::Male), Just(Sex::Female), Just(Sex::Other)],
    )
        .prop_map(|(name, plan, year, sex)| Seed {
            name,
            plan,
            year,
            sex,
        })
}

fn order_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(PatientSort::ALL).prop_map(|k| k.key().to_string()),
        "[a-z ]{0,12}",
    ]
}

fn matches_search(patient: &Patient, search: &str) -> bool {
    let needle = search.to_ascii_lowercase();
    [&patient.name, &patient.record_number, &patient.insurance_plan]
        .iter()
        .any(|field| field.to_ascii_lowercase().contains(&needle))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn concatenated_pages_cover_every_match_once(
        seeds in proptest::collection::vec(seed_strategy(), 0..30),
        page_size in 1i64..8,
        order_by in order_strategy(),
        search in proptest::sample::select(SEARCHES),
    ) {
        let repo: Repository<Patient> =
            Repository::new(Arc::new(Database::open_in_memory().unwrap()));

        let mut stored = Vec::new();
        for (i, seed) in seeds.iter().enumerate() {
            let mut patient = Patient::new(
                NAMES[seed.name].to_string(),
                seed.sex,
                NaiveDate::from_ymd_opt(seed.year, 1, 1).unwrap(),
                format!("P-{}", i + 1),
            );
            patient.insurance_plan = PLANS[seed.plan].to_string();
            stored.push(repo.create(patient).unwrap().data.unwrap());
        }

        let expected: HashSet<i64> = stored
            .iter()
            .filter(|p| matches_search(p, search))
            .map(|p| p.id)
            .collect();

        let first = repo.list(&Pager::new(1, page_size, order_by.clone(), search)).unwrap();
        prop_assert_eq!(first.count, expected.len() as i64);

        let pages = (first.count + page_size - 1) / page_size;
        let mut seen = Vec::new();
        for page in 1..=pages {
            let result = repo
                .list(&Pager::new(page, page_size, order_by.clone(), search))
                .unwrap();
            prop_assert_eq!(result.count, first.count);
            prop_assert!(result.items.len() as i64 <= page_size);
            seen.extend(result.items.into_iter().map(|p| p.id));
        }

        prop_assert_eq!(seen.len() as i64, first.count);
        let unique: HashSet<i64> = seen.iter().copied().collect();
        prop_assert_eq!(unique.len(), seen.len());
        prop_assert_eq!(unique, expected);

        let beyond = repo
            .list(&Pager::new(pages + 1, page_size, order_by, search))
            .unwrap();
        prop_assert!(beyond.items.is_empty());
    }

    #[test]
    fn unknown_patient_keys_resolve_to_default(input in ".*") {
        prop_assume!(!PatientSort::ALL.iter().any(|k| k.key() == input));
        prop_assert_eq!(PatientSort::resolve(&input).fragment(), "id DESC");
    }

    #[test]
    fn unknown_consultation_keys_resolve_to_default(input in ".*") {
        prop_assume!(!ConsultationSort::ALL.iter().any(|k| k.key() == input));
        prop_assert_eq!(ConsultationSort::resolve(&input).fragment(), "id DESC");
    }

    #[test]
    fn plan_never_carries_caller_order_text(
        page in -5i64..50,
        page_size in -5i64..50,
        order_by in ".*",
    ) {
        let plan = QueryPlan::new::<PatientSort>(&Pager::new(page, page_size, order_by, ""));
        prop_assert!(plan.limit >= 1);
        prop_assert!(plan.offset >= 0);
        prop_assert!(PatientSort::ALL.iter().any(|k| k.fragment() == plan.order));
    }
}

#[test]
fn allow_listed_patient_keys_map_literally() {
    let table = [
        ("id asc", "id ASC"),
        ("id desc", "id DESC"),
        ("nome asc", "name ASC"),
        ("nome desc", "name DESC"),
        ("dtnascimento asc", "birth_date ASC"),
        ("dtnascimento desc", "birth_date DESC"),
        ("sexo asc", "sex ASC"),
        ("sexo desc", "sex DESC"),
        ("prontuario asc", "record_number ASC"),
        ("prontuario desc", "record_number DESC"),
        ("convenio asc", "insurance_plan ASC"),
        ("convenio desc", "insurance_plan DESC"),
    ];
    assert_eq!(table.len(), PatientSort::ALL.len());
    for (key, fragment) in table {
        assert_eq!(PatientSort::resolve(key).fragment(), fragment, "key {}", key);
    }
}

#[test]
fn allow_listed_consultation_keys_map_literally() {
    let table = [
        ("id asc", "id ASC"),
        ("id desc", "id DESC"),
        ("data asc", "consulted_on ASC"),
        ("data desc", "consulted_on DESC"),
        ("cid asc", "diagnosis_code ASC"),
        ("cid desc", "diagnosis_code DESC"),
        ("pacienteid asc", "patient_id ASC"),
        ("pacienteid desc", "patient_id DESC"),
    ];
    assert_eq!(table.len(), ConsultationSort::ALL.len());
    for (key, fragment) in table {
        assert_eq!(ConsultationSort::resolve(key).fragment(), fragment, "key {}", key);
    }
}
