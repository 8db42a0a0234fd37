//! Format round trips through synthesized accessors.

use jsonbind::bigdecimal::BigDecimal;
use jsonbind::chrono::{DateTime, NaiveDate, Utc};
use jsonbind::num_bigint::BigInt;
use jsonbind::prelude::*;
use jsonbind::{Base64Encoding, OctetEncoding};
use proptest::prelude::*;

const RECORD: &str = r#"{"properties": {
    "day": {"type": "string", "format": "date"},
    "at": {"type": "integer", "format": "utc-millisec"},
    "count": {"type": "string", "format": "big-integer"},
    "amount": {"type": "string", "format": "big-decimal"},
    "payload": {"type": "string", "format": "byte"},
    "raw": {"type": "string", "format": "binary"}
}}"#;

fn record_session() -> BuildSession {
    let mut session = BuildSession::default();
    session.add_schema("Record", RECORD).unwrap();
    session.run("Record").unwrap();
    session
}

fn round_trip(setter: &str, getter: &str, value: TypedValue) -> Option<TypedValue> {
    let session = record_session();
    let set = session.descriptors("Record").unwrap();
    let record = DynamicObject::new(set, session.graph(), "Record").unwrap();
    record.set(setter, value).unwrap();

    // Reparse the canonical text so the value really comes back from storage
    let stored = Bindings::from_json(&record.to_canonical_text()).unwrap();
    let reread = DynamicObject::wrap(set, session.graph(), "Record", stored).unwrap();
    reread.get(getter).unwrap()
}

#[test]
fn test_big_integer_extremes() {
    for text in [
        "-170141183460469231731687303715884105728",
        "340282366920938463463374607431768211455",
        "0",
    ] {
        let n: BigInt = text.parse().unwrap();
        assert_eq!(
            round_trip("set_count", "count", TypedValue::BigInteger(n.clone())),
            Some(TypedValue::BigInteger(n))
        );
    }
}

#[test]
fn test_big_decimal_many_fraction_digits() {
    let n: BigDecimal = "-0.000000000000000000000000000000123456789012345678901234567890"
        .parse()
        .unwrap();
    assert_eq!(
        round_trip("set_amount", "amount", TypedValue::BigDecimal(n.clone())),
        Some(TypedValue::BigDecimal(n))
    );
}

#[test]
fn test_date_and_timestamp() {
    let day = NaiveDate::from_ymd_opt(1999, 5, 22).unwrap();
    assert_eq!(
        round_trip("set_day", "day", TypedValue::Date(day)),
        Some(TypedValue::Date(day))
    );

    let at: DateTime<Utc> = DateTime::from_timestamp_millis(951_008_520_123).unwrap();
    assert_eq!(
        round_trip("set_at", "at", TypedValue::Timestamp(at)),
        Some(TypedValue::Timestamp(at))
    );
}

proptest! {
    #[test]
    fn base64_payloads_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let read = round_trip(
            "set_payload",
            "payload",
            TypedValue::Base64(Base64Encoding::from_bytes(&bytes)),
        );
        let Some(TypedValue::Base64(read)) = read else {
            panic!("expected a base64 payload");
        };
        prop_assert_eq!(read.bytes().unwrap(), bytes.clone());
        prop_assert_eq!(read.bytes().unwrap(), bytes);
    }

    #[test]
    fn octet_payloads_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let read = round_trip(
            "set_raw",
            "raw",
            TypedValue::Octet(OctetEncoding::from_bytes(&bytes)),
        );
        let Some(TypedValue::Octet(read)) = read else {
            panic!("expected an octet payload");
        };
        prop_assert_eq!(read.bytes().unwrap(), bytes);
    }

    #[test]
    fn big_integers_round_trip(n in any::<i128>()) {
        let n = BigInt::from(n);
        prop_assert_eq!(
            round_trip("set_count", "count", TypedValue::BigInteger(n.clone())),
            Some(TypedValue::BigInteger(n))
        );
    }
}
