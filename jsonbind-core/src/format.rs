//! Format codecs.
//!
//! A codec gives a stored scalar a typed meaning. Every codec satisfies
//! `decode(&encode(&x)) == Ok(x)` for all representable `x`; see each codec
//! for what representable means.
//!
//! | Format | Typed value | Stored as |
//! |---|---|---|
//! | `date` | [`NaiveDate`] | `"1999-05-22"` |
//! | `date-time` | [`NaiveDateTime`] | `"2000-02-20T01:02:00"` |
//! | `time` | [`NaiveTime`] | `"01:02:03.000000004"` |
//! | `utc-millisec` | [`DateTime<Utc>`] | integer milliseconds since the Unix epoch |
//! | `big-integer` | [`BigInt`] | decimal text |
//! | `big-decimal` | [`BigDecimal`] | plain decimal text |
//! | `byte` | [`Base64Encoding`] | base64 text |
//! | `binary` | [`OctetEncoding`] | one char per byte |

use crate::binary::{Base64Encoding, OctetEncoding};
use crate::error::FormatError;
use crate::value::Value;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use num_bigint::{BigInt, Sign};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Named scalar formats understood by synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Calendar date.
    Date,
    /// Local date and time.
    DateTime,
    /// Local time of day.
    Time,
    /// Milliseconds since the Unix epoch.
    TimestampMillis,
    /// Arbitrary-precision integer.
    BigInteger,
    /// Arbitrary-precision decimal.
    BigDecimal,
    /// Base64-encoded binary.
    Base64Binary,
    /// Octet-encoded binary.
    OctetBinary,
}

impl Format {
    /// All formats, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Date,
        Self::DateTime,
        Self::Time,
        Self::TimestampMillis,
        Self::BigInteger,
        Self::BigDecimal,
        Self::Base64Binary,
        Self::OctetBinary,
    ];

    /// Parses a schema `format` keyword.
    ///
    /// Unknown keywords return `None`; synthesis treats them as plain scalars.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "date" => Some(Self::Date),
            "date-time" | "datetime" => Some(Self::DateTime),
            "time" => Some(Self::Time),
            "utc-millisec" | "timestamp" | "timestamp-millis" => Some(Self::TimestampMillis),
            "big-integer" | "biginteger" | "big-int" => Some(Self::BigInteger),
            "big-decimal" | "bigdecimal" | "big-dec" | "decimal" => Some(Self::BigDecimal),
            "byte" | "base64" => Some(Self::Base64Binary),
            "binary" | "octet" => Some(Self::OctetBinary),
            _ => None,
        }
    }

    /// Returns the canonical keyword.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Time => "time",
            Self::TimestampMillis => "utc-millisec",
            Self::BigInteger => "big-integer",
            Self::BigDecimal => "big-decimal",
            Self::Base64Binary => "byte",
            Self::OctetBinary => "binary",
        }
    }

    /// Returns the typed Rust value produced by this format's codec.
    #[must_use]
    pub const fn rust_type(&self) -> &'static str {
        match self {
            Self::Date => "chrono::NaiveDate",
            Self::DateTime => "chrono::NaiveDateTime",
            Self::Time => "chrono::NaiveTime",
            Self::TimestampMillis => "chrono::DateTime<chrono::Utc>",
            Self::BigInteger => "num_bigint::BigInt",
            Self::BigDecimal => "bigdecimal::BigDecimal",
            Self::Base64Binary => "jsonbind::Base64Encoding",
            Self::OctetBinary => "jsonbind::OctetEncoding",
        }
    }

    /// Returns the codec type name in this module.
    #[must_use]
    pub const fn codec_name(&self) -> &'static str {
        match self {
            Self::Date => "DateCodec",
            Self::DateTime => "DateTimeCodec",
            Self::Time => "TimeCodec",
            Self::TimestampMillis => "TimestampMillisCodec",
            Self::BigInteger => "BigIntegerCodec",
            Self::BigDecimal => "BigDecimalCodec",
            Self::Base64Binary => "Base64Codec",
            Self::OctetBinary => "OctetCodec",
        }
    }

    /// Returns true if the stored value decodes under this format.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Date => DateCodec::decode(value).is_ok(),
            Self::DateTime => DateTimeCodec::decode(value).is_ok(),
            Self::Time => TimeCodec::decode(value).is_ok(),
            Self::TimestampMillis => TimestampMillisCodec::decode(value).is_ok(),
            Self::BigInteger => BigIntegerCodec::decode(value).is_ok(),
            Self::BigDecimal => BigDecimalCodec::decode(value).is_ok(),
            Self::Base64Binary => Base64Codec::decode(value).is_ok(),
            Self::OctetBinary => OctetCodec::decode(value).is_ok(),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Encode/decode pair between stored [`Value`]s and typed values.
pub trait FormatCodec {
    /// Format keyword used in error messages.
    const FORMAT: &'static str;

    /// Typed value produced by `decode`.
    type Typed;

    /// Decodes a stored value.
    ///
    /// # Errors
    /// Returns `FormatError` if the stored value does not conform.
    fn decode(value: &Value) -> Result<Self::Typed, FormatError>;

    /// Encodes a typed value for storage.
    fn encode(typed: &Self::Typed) -> Value;
}

fn expect_str<'a>(format: &'static str, value: &'a Value) -> Result<&'a str, FormatError> {
    value
        .as_str()
        .ok_or_else(|| FormatError::unexpected(format, "string", value.kind()))
}

/// Plain text without format.
pub struct StringCodec;

impl FormatCodec for StringCodec {
    const FORMAT: &'static str = "string";
    type Typed = String;

    fn decode(value: &Value) -> Result<String, FormatError> {
        expect_str(Self::FORMAT, value).map(str::to_string)
    }

    fn encode(typed: &String) -> Value {
        Value::String(typed.clone())
    }
}

/// Boolean scalar.
pub struct BooleanCodec;

impl FormatCodec for BooleanCodec {
    const FORMAT: &'static str = "boolean";
    type Typed = bool;

    fn decode(value: &Value) -> Result<bool, FormatError> {
        value
            .as_bool()
            .ok_or_else(|| FormatError::unexpected(Self::FORMAT, "boolean", value.kind()))
    }

    fn encode(typed: &bool) -> Value {
        Value::Bool(*typed)
    }
}

/// 64-bit integer. Whole-valued numbers within range are accepted on decode.
pub struct IntegerCodec;

impl FormatCodec for IntegerCodec {
    const FORMAT: &'static str = "integer";
    type Typed = i64;

    fn decode(value: &Value) -> Result<i64, FormatError> {
        match value {
            Value::Integer(i) => Ok(*i),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => Ok(*n as i64),
            other => Err(FormatError::unexpected(
                Self::FORMAT,
                "integer",
                other.kind(),
            )),
        }
    }

    fn encode(typed: &i64) -> Value {
        Value::Integer(*typed)
    }
}

/// Double-precision number. Integers are widened on decode.
pub struct NumberCodec;

impl FormatCodec for NumberCodec {
    const FORMAT: &'static str = "number";
    type Typed = f64;

    fn decode(value: &Value) -> Result<f64, FormatError> {
        value
            .as_f64()
            .ok_or_else(|| FormatError::unexpected(Self::FORMAT, "number", value.kind()))
    }

    fn encode(typed: &f64) -> Value {
        Value::Number(*typed)
    }
}

/// `date`: ISO 8601 calendar date, `YYYY-MM-DD`.
pub struct DateCodec;

impl FormatCodec for DateCodec {
    const FORMAT: &'static str = "date";
    type Typed = NaiveDate;

    fn decode(value: &Value) -> Result<NaiveDate, FormatError> {
        let text = expect_str(Self::FORMAT, value)?;
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|e| FormatError::malformed(Self::FORMAT, text, e))
    }

    fn encode(typed: &NaiveDate) -> Value {
        Value::String(typed.format("%Y-%m-%d").to_string())
    }
}

/// `date-time`: ISO 8601 local date-time.
///
/// Fractional seconds are written only when non-zero. Decode also accepts
/// minute precision (`2000-02-20T01:02`) and RFC 3339 text with an offset,
/// which is normalized to UTC.
pub struct DateTimeCodec;

impl FormatCodec for DateTimeCodec {
    const FORMAT: &'static str = "date-time";
    type Typed = NaiveDateTime;

    fn decode(value: &Value) -> Result<NaiveDateTime, FormatError> {
        let text = expect_str(Self::FORMAT, value)?;
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
            .or_else(|_| DateTime::parse_from_rfc3339(text).map(|dt| dt.naive_utc()))
            .map_err(|e| FormatError::malformed(Self::FORMAT, text, e))
    }

    fn encode(typed: &NaiveDateTime) -> Value {
        let pattern = if typed.nanosecond() == 0 {
            "%Y-%m-%dT%H:%M:%S"
        } else {
            "%Y-%m-%dT%H:%M:%S%.f"
        };
        Value::String(typed.format(pattern).to_string())
    }
}

/// `time`: ISO 8601 local time, `HH:MM:SS[.fraction]`.
pub struct TimeCodec;

impl FormatCodec for TimeCodec {
    const FORMAT: &'static str = "time";
    type Typed = NaiveTime;

    fn decode(value: &Value) -> Result<NaiveTime, FormatError> {
        let text = expect_str(Self::FORMAT, value)?;
        NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
            .map_err(|e| FormatError::malformed(Self::FORMAT, text, e))
    }

    fn encode(typed: &NaiveTime) -> Value {
        let pattern = if typed.nanosecond() == 0 {
            "%H:%M:%S"
        } else {
            "%H:%M:%S%.f"
        };
        Value::String(typed.format(pattern).to_string())
    }
}

/// `utc-millisec`: integer milliseconds since 1970-01-01T00:00:00Z.
///
/// Representable values are instants with millisecond precision; encode
/// truncates anything finer.
pub struct TimestampMillisCodec;

impl FormatCodec for TimestampMillisCodec {
    const FORMAT: &'static str = "utc-millisec";
    type Typed = DateTime<Utc>;

    fn decode(value: &Value) -> Result<DateTime<Utc>, FormatError> {
        let millis = match value {
            Value::Integer(ms) => *ms,
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => *n as i64,
            other => {
                return Err(FormatError::unexpected(
                    Self::FORMAT,
                    "integer",
                    other.kind(),
                ));
            }
        };
        DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            FormatError::malformed(Self::FORMAT, millis.to_string(), "timestamp out of range")
        })
    }

    fn encode(typed: &DateTime<Utc>) -> Value {
        Value::Integer(typed.timestamp_millis())
    }
}

/// `big-integer`: arbitrary-precision integer stored as decimal text.
pub struct BigIntegerCodec;

impl FormatCodec for BigIntegerCodec {
    const FORMAT: &'static str = "big-integer";
    type Typed = BigInt;

    fn decode(value: &Value) -> Result<BigInt, FormatError> {
        match value {
            Value::Integer(i) => Ok(BigInt::from(*i)),
            Value::String(s) => {
                BigInt::from_str(s).map_err(|e| FormatError::malformed(Self::FORMAT, s.as_str(), e))
            }
            other => Err(FormatError::unexpected(
                Self::FORMAT,
                "string",
                other.kind(),
            )),
        }
    }

    fn encode(typed: &BigInt) -> Value {
        Value::String(typed.to_string())
    }
}

/// `big-decimal`: arbitrary-precision decimal stored as plain decimal text.
///
/// Encode never uses scientific notation. Decode accepts exponent forms
/// (`1E+3`) and numeric JSON values.
pub struct BigDecimalCodec;

impl FormatCodec for BigDecimalCodec {
    const FORMAT: &'static str = "big-decimal";
    type Typed = BigDecimal;

    fn decode(value: &Value) -> Result<BigDecimal, FormatError> {
        match value {
            Value::Integer(i) => Ok(BigDecimal::from(*i)),
            Value::Number(n) => {
                let text = n.to_string();
                BigDecimal::from_str(&text)
                    .map_err(|e| FormatError::malformed(Self::FORMAT, text.as_str(), e))
            }
            Value::String(s) => BigDecimal::from_str(s)
                .map_err(|e| FormatError::malformed(Self::FORMAT, s.as_str(), e)),
            other => Err(FormatError::unexpected(
                Self::FORMAT,
                "string",
                other.kind(),
            )),
        }
    }

    fn encode(typed: &BigDecimal) -> Value {
        Value::String(plain_decimal_text(typed))
    }
}

/// Renders a decimal without an exponent, keeping its scale.
#[must_use]
pub fn plain_decimal_text(value: &BigDecimal) -> String {
    let (mantissa, scale) = value.as_bigint_and_exponent();
    let digits = mantissa.magnitude().to_string();
    let mut out = String::with_capacity(digits.len() + 3);
    if mantissa.sign() == Sign::Minus {
        out.push('-');
    }
    if scale <= 0 {
        out.push_str(&digits);
        if !mantissa.is_zero() {
            out.extend(std::iter::repeat_n('0', scale.unsigned_abs() as usize));
        }
    } else {
        let scale = scale as usize;
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            out.push_str(int);
            out.push('.');
            out.push_str(frac);
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat_n('0', scale - digits.len()));
            out.push_str(&digits);
        }
    }
    out
}

/// `byte`: base64 text.
pub struct Base64Codec;

impl FormatCodec for Base64Codec {
    const FORMAT: &'static str = "byte";
    type Typed = Base64Encoding;

    fn decode(value: &Value) -> Result<Base64Encoding, FormatError> {
        let text = expect_str(Self::FORMAT, value)?;
        STANDARD
            .decode(text)
            .map_err(|e| FormatError::malformed(Self::FORMAT, text, e))?;
        Ok(Base64Encoding::from_encoded(text))
    }

    fn encode(typed: &Base64Encoding) -> Value {
        Value::String(typed.as_str().to_string())
    }
}

/// `binary`: octet text, one char per byte.
pub struct OctetCodec;

impl FormatCodec for OctetCodec {
    const FORMAT: &'static str = "binary";
    type Typed = OctetEncoding;

    fn decode(value: &Value) -> Result<OctetEncoding, FormatError> {
        let encoding = OctetEncoding::from_encoded(expect_str(Self::FORMAT, value)?);
        encoding.bytes()?;
        Ok(encoding)
    }

    fn encode(typed: &OctetEncoding) -> Value {
        Value::String(typed.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_keywords() {
        for format in Format::ALL {
            assert_eq!(Format::from_keyword(format.keyword()), Some(format));
        }
        assert_eq!(Format::from_keyword("DATE-TIME"), Some(Format::DateTime));
        assert_eq!(Format::from_keyword("int64"), None);
        assert_eq!(Format::from_keyword("email"), None);
    }

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(1999, 5, 22).unwrap();
        let stored = DateCodec::encode(&date);
        assert_eq!(stored, Value::from("1999-05-22"));
        assert_eq!(DateCodec::decode(&stored).unwrap(), date);
    }

    #[test]
    fn test_date_time_round_trip() {
        let dt = NaiveDate::from_ymd_opt(2000, 2, 20)
            .unwrap()
            .and_hms_opt(1, 2, 0)
            .unwrap();
        let stored = DateTimeCodec::encode(&dt);
        assert_eq!(stored, Value::from("2000-02-20T01:02:00"));
        assert_eq!(DateTimeCodec::decode(&stored).unwrap(), dt);
        assert_eq!(
            DateTimeCodec::decode(&Value::from("2000-02-20T01:02")).unwrap(),
            dt
        );
    }

    #[test]
    fn test_date_time_with_offset_normalizes_to_utc() {
        let decoded = DateTimeCodec::decode(&Value::from("2000-02-20T03:02:00+02:00")).unwrap();
        let expected = NaiveDate::from_ymd_opt(2000, 2, 20)
            .unwrap()
            .and_hms_opt(1, 2, 0)
            .unwrap();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_time_nanosecond_round_trip() {
        let time = NaiveTime::from_hms_nano_opt(1, 2, 3, 4).unwrap();
        let stored = TimeCodec::encode(&time);
        assert_eq!(stored, Value::from("01:02:03.000000004"));
        assert_eq!(TimeCodec::decode(&stored).unwrap(), time);
    }

    #[test]
    fn test_timestamp_millis_is_exact() {
        let ts = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap();
        let stored = TimestampMillisCodec::encode(&ts);
        assert_eq!(stored, Value::Integer(1_700_000_000_123));
        assert_eq!(TimestampMillisCodec::decode(&stored).unwrap(), ts);
    }

    #[test]
    fn test_big_integer_extremes() {
        for text in [
            "1000000000000000000000",
            "-340282366920938463463374607431768211456",
            "0",
        ] {
            let value = BigInt::from_str(text).unwrap();
            let stored = BigIntegerCodec::encode(&value);
            assert_eq!(stored, Value::from(text));
            assert_eq!(BigIntegerCodec::decode(&stored).unwrap(), value);
        }
        assert_eq!(
            BigIntegerCodec::decode(&Value::Integer(i64::MIN)).unwrap(),
            BigInt::from(i64::MIN)
        );
    }

    #[test]
    fn test_big_decimal_many_fraction_digits() {
        let text = "1000000000000000000000.0000000000000000000001";
        let value = BigDecimal::from_str(text).unwrap();
        let stored = BigDecimalCodec::encode(&value);
        assert_eq!(stored, Value::from(text));
        assert_eq!(BigDecimalCodec::decode(&stored).unwrap(), value);
    }

    #[test]
    fn test_big_decimal_never_scientific() {
        let value = BigDecimal::from_str("1E+25").unwrap();
        assert_eq!(
            BigDecimalCodec::encode(&value),
            Value::from("10000000000000000000000000")
        );
        let tiny = BigDecimal::from_str("-1.5E-12").unwrap();
        let stored = BigDecimalCodec::encode(&tiny);
        assert_eq!(stored, Value::from("-0.0000000000015"));
        assert_eq!(BigDecimalCodec::decode(&stored).unwrap(), tiny);
    }

    #[test]
    fn test_big_decimal_trailing_zero_exponent() {
        let value = BigDecimal::from_str("4.500").unwrap();
        let stored = BigDecimalCodec::encode(&value);
        assert_eq!(stored, Value::from("4.500"));
        assert_eq!(BigDecimalCodec::decode(&stored).unwrap(), value);
        assert_eq!(
            BigDecimalCodec::decode(&Value::from("45E-1")).unwrap(),
            BigDecimal::from_str("4.5").unwrap()
        );
    }

    #[test]
    fn test_malformed_values() {
        assert!(matches!(
            DateCodec::decode(&Value::from("22/05/1999")),
            Err(FormatError::Malformed { format: "date", .. })
        ));
        assert!(matches!(
            DateCodec::decode(&Value::Integer(3)),
            Err(FormatError::UnexpectedValue {
                found: "integer",
                ..
            })
        ));
        assert!(BigIntegerCodec::decode(&Value::from("12.5")).is_err());
        assert!(BigDecimalCodec::decode(&Value::from("abc")).is_err());
        assert!(Base64Codec::decode(&Value::from("%%%")).is_err());
        assert!(TimestampMillisCodec::decode(&Value::from(true)).is_err());
    }

    #[test]
    fn test_format_accepts() {
        assert!(Format::Date.accepts(&Value::from("1999-05-22")));
        assert!(!Format::Date.accepts(&Value::from("Joe")));
        assert!(Format::TimestampMillis.accepts(&Value::Integer(0)));
        assert!(!Format::TimestampMillis.accepts(&Value::from("0")));
        assert!(Format::BigInteger.accepts(&Value::from("123")));
    }

    #[test]
    fn test_scalar_codecs() {
        assert_eq!(IntegerCodec::decode(&Value::Number(8.0)).unwrap(), 8);
        assert!(IntegerCodec::decode(&Value::Number(8.5)).is_err());
        assert_eq!(NumberCodec::decode(&Value::Integer(5)).unwrap(), 5.0);
        assert_eq!(
            StringCodec::decode(&Value::from("hi")).unwrap(),
            "hi".to_string()
        );
        assert!(BooleanCodec::decode(&Value::Null).is_err());
        assert_eq!(IntegerCodec::encode(&i64::MAX), Value::Integer(i64::MAX));
    }

    #[test]
    fn test_binary_codecs_repeat_read() {
        let payload: Vec<u8> = (0..=255).collect();
        let stored = Base64Codec::encode(&Base64Encoding::from_bytes(&payload));
        let decoded = Base64Codec::decode(&stored).unwrap();
        assert_eq!(decoded.bytes().unwrap(), payload);
        assert_eq!(decoded.bytes().unwrap(), payload);

        let stored = OctetCodec::encode(&OctetEncoding::from_bytes(&payload));
        let decoded = OctetCodec::decode(&stored).unwrap();
        assert_eq!(decoded.bytes().unwrap(), payload);
        assert_eq!(decoded.bytes().unwrap(), payload);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn big_integer_round_trip(hi in any::<i128>(), lo in any::<u64>()) {
            let value = BigInt::from(hi) * BigInt::from(u64::MAX) + BigInt::from(lo);
            prop_assert_eq!(BigIntegerCodec::decode(&BigIntegerCodec::encode(&value)).unwrap(), value);
        }

        #[test]
        fn big_decimal_round_trip(mantissa in any::<i128>(), scale in -40i64..60) {
            let value = BigDecimal::new(BigInt::from(mantissa), scale);
            let stored = BigDecimalCodec::encode(&value);
            let text = stored.as_str().unwrap_or_default().to_string();
            prop_assert!(!text.contains('e') && !text.contains('E'));
            prop_assert_eq!(BigDecimalCodec::decode(&stored).unwrap(), value);
        }

        #[test]
        fn date_round_trip(days in -100_000i64..100_000) {
            let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + chrono::Duration::days(days);
            prop_assert_eq!(DateCodec::decode(&DateCodec::encode(&date)).unwrap(), date);
        }

        #[test]
        fn date_time_round_trip(secs in 0i64..4_000_000_000, nanos in 0u32..1_000_000_000) {
            let dt = DateTime::<Utc>::from_timestamp(secs, nanos).unwrap().naive_utc();
            prop_assert_eq!(DateTimeCodec::decode(&DateTimeCodec::encode(&dt)).unwrap(), dt);
        }

        #[test]
        fn timestamp_round_trip(millis in -62_000_000_000_000i64..250_000_000_000_000) {
            let ts = DateTime::<Utc>::from_timestamp_millis(millis).unwrap();
            prop_assert_eq!(TimestampMillisCodec::decode(&TimestampMillisCodec::encode(&ts)).unwrap(), ts);
        }

        #[test]
        fn base64_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let stored = Base64Codec::encode(&Base64Encoding::from_bytes(&bytes));
            let decoded = Base64Codec::decode(&stored).unwrap();
            prop_assert_eq!(decoded.bytes().unwrap(), bytes.clone());
            prop_assert_eq!(decoded.bytes().unwrap(), bytes);
        }

        #[test]
        fn octet_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let stored = OctetCodec::encode(&OctetEncoding::from_bytes(&bytes));
            let decoded = OctetCodec::decode(&stored).unwrap();
            prop_assert_eq!(decoded.bytes().unwrap(), bytes);
        }
    }
}
