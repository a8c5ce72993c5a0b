use bson::{Bson, Document as BsonDocument, Regex as BsonRegex};
use lru::LruCache;
use parking_lot::Mutex;
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::num::NonZeroUsize;
use std::sync::LazyLock;

// Compiled `$match` patterns kept around between calls
const REGEX_CACHE_CAPACITY: usize = 256;

static REGEX_CACHE: LazyLock<Mutex<LruCache<(String, String), Regex>>> = LazyLock::new(|| {
    let cap = NonZeroUsize::new(REGEX_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
    Mutex::new(LruCache::new(cap))
});

/// Equality of a looked-up field against a query operand.
///
/// A missing field equals `Undefined` and nothing else; `Null` is a value.
pub fn field_equals(actual: Option<&Bson>, expected: &Bson) -> bool {
    match (actual, expected) {
        (None | Some(Bson::Undefined), Bson::Undefined) => true,
        (None, _) => false,
        (Some(a), e) => deep_equal(a, e),
    }
}

/// Structural equality across arrays and documents.
///
/// Numbers form a single domain, so `Int32(1)`, `Int64(1)` and `Double(1.0)` are equal.
/// NaN equals NaN. Document key order is not significant.
pub fn deep_equal(a: &Bson, b: &Bson) -> bool {
    if let Some(ord) = compare_numbers(a, b) {
        return ord == Ordering::Equal;
    }
    match (a, b) {
        (Bson::Double(x), Bson::Double(y)) if x.is_nan() && y.is_nan() => true,
        (Bson::Array(xs), Bson::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
        }
        (Bson::Document(x), Bson::Document(y)) => documents_equal(x, y),
        (Bson::RegularExpression(x), Bson::RegularExpression(y)) => {
            x.pattern.as_str() == y.pattern.as_str() && x.options.as_str() == y.options.as_str()
        }
        _ => is_number(a) == is_number(b) && a == b,
    }
}

fn documents_equal(x: &BsonDocument, y: &BsonDocument) -> bool {
    x.len() == y.len() && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| deep_equal(v, w)))
}

pub fn is_number(v: &Bson) -> bool {
    matches!(v, Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_))
}

/// Orders two numeric values; `None` when either is not a number or a NaN is involved.
///
/// Integers are never widened to `f64`, so `Int64(2^53 + 1)` stays greater than `Double(2^53)`.
pub fn compare_numbers(a: &Bson, b: &Bson) -> Option<Ordering> {
    match (as_i64(a), as_i64(b)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        (Some(x), None) => cmp_int_float(x, as_f64(b)?),
        (None, Some(y)) => cmp_int_float(y, as_f64(a)?).map(Ordering::reverse),
        (None, None) => as_f64(a)?.partial_cmp(&as_f64(b)?),
    }
}

fn as_i64(x: &Bson) -> Option<i64> {
    match x {
        Bson::Int32(i) => Some(i64::from(*i)),
        Bson::Int64(i) => Some(*i),
        _ => None,
    }
}

fn as_f64(x: &Bson) -> Option<f64> {
    match x {
        Bson::Double(f) => Some(*f),
        _ => None,
    }
}

// 2^63, exactly representable as f64
const I64_EDGE: f64 = 9_223_372_036_854_775_808.0;

#[allow(clippy::cast_possible_truncation)]
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= I64_EDGE {
        return Some(Ordering::Less);
    }
    if f < -I64_EDGE {
        return Some(Ordering::Greater);
    }
    // |f| < 2^63 here, so its integral part fits in i64 exactly
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(f - whole)),
        ord => Some(ord),
    }
}

/// Compile a BSON regular expression, honouring the `i`, `m`, `s`, `x` and `u` options.
///
/// # Errors
/// Returns the `regex` crate error when the pattern is not supported.
pub fn compile_regex(re: &BsonRegex) -> Result<Regex, regex::Error> {
    let key = (re.pattern.as_str().to_owned(), re.options.as_str().to_owned());
    if let Some(hit) = REGEX_CACHE.lock().get(&key) {
        return Ok(hit.clone());
    }
    let mut builder = RegexBuilder::new(&key.0);
    for opt in key.1.chars() {
        match opt {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'u' => builder.unicode(true),
            _ => &mut builder,
        };
    }
    let compiled = builder.build()?;
    REGEX_CACHE.lock().put(key, compiled.clone());
    Ok(compiled)
}
