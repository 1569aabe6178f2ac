#![forbid(unsafe_code)]
use rota::{DayRange, Person, PersonRecord, Role};

#[test]
fn availability_precedence_on_construction() {
    let person = Person::new("p1", "Noether", 10)
        .with_limits(6, 0)
        .with_scheduled(DayRange::new(0, 1))
        .with_analysis(DayRange::day(3))
        .with_greyout(DayRange::day(5))
        .with_blackout(DayRange::new(7, 8))
        .with_greyout(DayRange::day(8));

    insta::assert_snapshot!(person.attendance(), @"mm.a.x.XX.");
    assert_eq!(person.allocated_days(), 3);
    assert_eq!(person.blackout_days().collect::<Vec<_>>(), vec![7, 8]);
    assert_eq!(person.greyout_days().collect::<Vec<_>>(), vec![5]);
    assert!(person.is_prescheduled(1));
    assert!(!person.is_prescheduled(3));
    assert_eq!(person.allocation_text(), "Noether   3/6");
}

#[test]
fn scheduled_days_skip_blackout() {
    let person = Person::new("p1", "Noether", 10)
        .with_blackout(DayRange::new(7, 8))
        .with_scheduled(DayRange::new(7, 20));
    assert_eq!(person.role(8), Role::Blackout);
    assert!(!person.is_prescheduled(8));
    assert_eq!(person.role(9), Role::OnDuty);
    assert!(person.is_prescheduled(9));
    assert_eq!(person.role(42), Role::Free);
}

#[test]
fn role_codes_are_unique() {
    for role in Role::ALL {
        assert_eq!(Role::from_code(role.code()), Some(role));
    }
    assert_eq!(Role::from_code('?'), None);
}

#[test]
fn record_without_id_gets_generated_one() {
    let json = r#"{
        "surname": "Hopper",
        "max_days": 5,
        "blackout": [ { "first": 2, "last": 3 } ],
        "obligations": [ { "task": "MS-1" } ]
    }"#;
    let record: PersonRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.id.as_str().len(), 36);
    assert_eq!(record.obligations[0].role, rota::RequestedRole::Console);

    let person = Person::from_record(&record, 6);
    assert_eq!(person.attendance(), "..XX..");
    assert_eq!(person.max_allocation, 5);
}

#[test]
fn huge_ranges_are_clamped_to_the_horizon() {
    let person = Person::new("p1", "Wide", 10)
        .with_blackout(DayRange::new(8, i64::MAX / 2))
        .with_greyout(DayRange::new(i64::MIN, 1))
        .with_scheduled(DayRange::new(-5, i64::MAX));
    assert_eq!(person.attendance(), "xxmmmmmmXX");
    assert_eq!(DayRange::new(20, 30).clamp(10), None);
    assert_eq!(DayRange::new(-3, 2).clamp(10), Some(0..=2));
    assert_eq!(DayRange::new(0, 0).clamp(0), None);
}
