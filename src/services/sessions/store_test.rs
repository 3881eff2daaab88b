use super::*;

fn fields_for(session_secret: &str, subject_id: Uuid) -> SessionFields {
    (
        Some(digest_secret(session_secret)),
        Some(subject_id),
        Some(1_700_000_000),
        Some(1_700_604_800),
    )
}

#[test]
fn secret_digests_are_64_hex_chars() {
    let digest = digest_secret("secret-1");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(digest, digest_secret("secret-1"));
}

#[test]
fn matching_fields_rebuild_the_record() {
    let subject_id = Uuid::new_v4();

    let record = stored_session(
        "sess-1",
        "secret-1",
        subject_id,
        fields_for("secret-1", subject_id),
    )
    .unwrap();

    assert_eq!(record.session_id, "sess-1");
    assert_eq!(record.subject_id, subject_id);
    assert_eq!(record.created_at.unix_timestamp(), 1_700_000_000);
    assert_eq!(record.expires_at.unix_timestamp(), 1_700_604_800);
}

#[test]
fn mismatched_secret_reads_as_absent() {
    let subject_id = Uuid::new_v4();
    let fields = fields_for("secret-1", subject_id);
    assert!(stored_session("sess-1", "wrong-secret", subject_id, fields).is_none());
}

#[test]
fn foreign_subject_reads_as_absent() {
    let fields = fields_for("secret-1", Uuid::new_v4());
    assert!(stored_session("sess-1", "secret-1", Uuid::new_v4(), fields).is_none());
}

#[test]
fn reaped_session_reads_back_as_fully_absent() {
    // A deleted key answers every requested field as nil, not as an error.
    let reply = redis::Value::Array(vec![redis::Value::Nil; 4]);
    let fields: SessionFields = redis::FromRedisValue::from_redis_value(&reply).unwrap();
    assert!(stored_session("sess-1", "secret-1", Uuid::new_v4(), fields).is_none());
}

#[test]
fn partially_absent_fields_read_as_absent() {
    let subject_id = Uuid::new_v4();
    let (digest, subject, created, _) = fields_for("secret-1", subject_id);
    let fields = (digest, subject, created, None);
    assert!(stored_session("sess-1", "secret-1", subject_id, fields).is_none());
}
