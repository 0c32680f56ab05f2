use rollcall::{
    resolve, ClarificationError, ClarificationSession, DirectoryIndex, PersonId, PersonRecord,
    ResolutionReport, ResolverConfig,
};

fn company() -> Vec<PersonRecord> {
    vec![
        PersonRecord::new(1, "Ahmet Yılmaz", "ahmet.yilmaz@company.com"),
        PersonRecord::new(2, "Ahmet Kaya", "ahmet.kaya@company.com"),
        PersonRecord::new(3, "Ahmet Özkan", "a.ozkan@company.com"),
        PersonRecord::new(4, "Ali Şahin", "ali.sahin@company.com"),
        PersonRecord::new(5, "Ali Demir", "ali.demir@company.com"),
        PersonRecord::new(10, "Arda Orçun", "arda.orcun@company.com"),
        PersonRecord::new(11, "Ege Gülünay", "ege.gulunay@company.com"),
    ]
}

fn index() -> DirectoryIndex {
    DirectoryIndex::build(company()).unwrap()
}

/// Full round trip: resolve, open a session, answer with a line copied from
/// the prompt, and get back the complete attendee list.
#[test]
fn ambiguous_name_clears_after_one_round_trip() {
    let index = index();
    let outcomes = resolve(
        &["Ege Gülünay", "Ahmet"],
        &index,
        &ResolverConfig::default(),
    );
    assert!(outcomes.iter().any(|o| !o.is_resolved()));

    let context = serde_json::json!({"subject": "sprint planning", "duration_minutes": 45});
    let session = ClarificationSession::open(&outcomes, context.clone());

    let prompt = session.prompt();
    assert!(prompt.contains("Options for 'Ahmet':"));
    assert!(prompt.contains("1. Ahmet Yılmaz (ahmet.yilmaz@company.com)"));
    assert!(prompt.contains("2. Ahmet Kaya (ahmet.kaya@company.com)"));
    assert!(prompt.contains("3. Ahmet Özkan (a.ozkan@company.com)"));

    let attendees = session
        .merge("2. Ahmet Kaya (ahmet.kaya@company.com)")
        .unwrap();

    assert_eq!(attendees.len(), 2);
    assert_eq!(attendees[0].full_name, "Ege Gülünay");
    assert_eq!(attendees[1].full_name, "Ahmet Kaya");
    assert_eq!(session.context(), &context);
}

#[test]
fn session_survives_the_report_round_trip() {
    let index = index();
    let outcomes = resolve(
        &["Ege Gülünay", "Ahmet"],
        &index,
        &ResolverConfig::default(),
    );

    // The caller serializes the report across the turn boundary and hands it
    // back verbatim with the user's answer.
    let report = ResolutionReport::from_outcomes(&outcomes);
    let wire = serde_json::to_string(&report).unwrap();
    let returned: ResolutionReport = serde_json::from_str(&wire).unwrap();

    let session = ClarificationSession::from_report(&returned, serde_json::Value::Null);
    let attendees = session.merge("Ahmet Özkan").unwrap();

    assert_eq!(attendees.len(), 2);
    assert!(attendees.iter().any(|p| p.id == PersonId::from(3)));
    assert!(attendees.iter().any(|p| p.full_name == "Ege Gülünay"));
}

#[test]
fn two_ambiguous_names_settle_from_a_structured_answer() {
    let index = index();
    let outcomes = resolve(&["Ahmet", "Ali"], &index, &ResolverConfig::default());
    let session = ClarificationSession::open(&outcomes, serde_json::Value::Null);

    let attendees = session
        .merge("1. Ahmet Yılmaz (ahmet.yilmaz@company.com)\n2. Ali Demir (ali.demir@company.com)")
        .unwrap();

    assert_eq!(attendees.len(), 2);
    assert_eq!(attendees[0].id, PersonId::from(1));
    assert_eq!(attendees[1].id, PersonId::from(5));
}

#[test]
fn unhelpful_answer_fails_without_losing_resolved_names() {
    let index = index();
    let outcomes = resolve(
        &["Arda Orçun", "Ahmet"],
        &index,
        &ResolverConfig::default(),
    );
    let session = ClarificationSession::open(&outcomes, serde_json::Value::Null);

    let err = session.merge("someone else entirely").unwrap_err();
    assert!(matches!(err, ClarificationError::Unresolved { ref name } if name == "Ahmet"));

    // The retry path still has the confident resolution intact.
    assert_eq!(session.already_resolved().len(), 1);
    assert_eq!(session.already_resolved()[0].matched_user.full_name, "Arda Orçun");

    let attendees = session.merge("Ahmet Kaya").unwrap();
    assert_eq!(attendees.len(), 2);
    assert_eq!(attendees[0].full_name, "Arda Orçun");
}

#[test]
fn unmatched_name_forces_a_fresh_session_after_reentry() {
    let index = index();
    let config = ResolverConfig::default();
    let outcomes = resolve(&["Ege Gülünay", "Zzzqqq Nonexistent"], &index, &config);
    let session = ClarificationSession::open(&outcomes, serde_json::Value::Null);

    // The prompt asks for re-entry, and merge cannot satisfy the name.
    assert!(session.prompt().contains("re-enter"));
    let err = session.merge("Zzzqqq Nonexistent").unwrap_err();
    assert!(matches!(err, ClarificationError::Unresolved { .. }));

    // The caller re-resolves the corrected name in a fresh session; the
    // prior session is simply dropped.
    let retry = resolve(&["Ege Gülünay", "Arda Orçun"], &index, &config);
    assert!(retry.iter().all(rollcall::ResolutionOutcome::is_resolved));
}

#[test]
fn merged_attendees_reconstruct_full_directory_records() {
    let index = index();
    let outcomes = resolve(&["Ahmet"], &index, &ResolverConfig::default());
    let session = ClarificationSession::open(&outcomes, serde_json::Value::Null);

    let attendees = session.merge("Ahmet Özkan").unwrap();
    let ozkan = &attendees[0];
    assert_eq!(ozkan.id, PersonId::from(3));
    assert_eq!(ozkan.email, "a.ozkan@company.com");
    assert_eq!(
        index.person(&ozkan.id).unwrap().email,
        ozkan.email,
        "merged record must agree with the directory"
    );
}
